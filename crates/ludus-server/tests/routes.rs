//! Route-level tests driven through the full router, access gate included.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode, header};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use ludus_client::ChzzkClient;
use ludus_oauth::{MemoryTokenStore, SharedTokenStore, TokenManager, TokenManagerOptions};
use ludus_server::{Server, ServerConfig};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ALLOWED_IP: &str = "127.0.0.1";
const ALLOWED_ORIGIN: &str = "https://app.example.com";

fn config() -> ServerConfig {
    ServerConfig::new("https://app.example.com/auth/callback")
        .with_allowed_ips(vec![ALLOWED_IP.to_string()])
        .with_allowed_origins(vec![ALLOWED_ORIGIN.to_string()])
        .with_basic_auth("admin", "hunter2")
}

/// Router backed by a mock upstream. `seed` controls whether the token
/// manager starts with a token pair (obtained through a real code exchange
/// against the mock).
async fn router_with(upstream: &MockServer, config: ServerConfig, seed: bool) -> Router {
    let store: SharedTokenStore = Arc::new(MemoryTokenStore::new());
    let tokens = Arc::new(
        TokenManager::new(
            TokenManagerOptions::new("cid", "csecret").with_base_url(upstream.uri()),
            store,
        )
        .unwrap(),
    );

    if seed {
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": {
                    "accessToken": "A1",
                    "refreshToken": "R1",
                    "expiresIn": 86400,
                    "tokenType": "Bearer",
                    "scope": "유저 조회"
                }
            })))
            .mount(upstream)
            .await;
        tokens.exchange_code("seed-code", "seed-state").await.unwrap();
    }

    let chzzk = ChzzkClient::builder(tokens.clone())
        .base_url(upstream.uri())
        .build()
        .unwrap();

    Server::new(tokens, chzzk, config).router()
}

fn request(uri: &str, client_ip: &str) -> Request<Body> {
    let addr: SocketAddr = format!("{client_ip}:51234").parse().unwrap();
    let mut request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

fn with_basic_auth(mut request: Request<Body>, username: &str, password: &str) -> Request<Body> {
    let encoded = BASE64.encode(format!("{username}:{password}"));
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Basic {encoded}").parse().unwrap(),
    );
    request
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Access gate
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn allowed_ip_passes_the_gate() {
    let upstream = MockServer::start().await;
    let router = router_with(&upstream, config(), false).await;

    let response = router.oneshot(request("/", ALLOWED_IP)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, Value::String("Hello, world!".to_string()));
}

#[tokio::test]
async fn unknown_ip_without_origin_is_forbidden() {
    let upstream = MockServer::start().await;
    let router = router_with(&upstream, config(), false).await;

    let response = router.oneshot(request("/", "10.0.0.9")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], "Forbidden");
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn unknown_ip_with_allowed_origin_passes() {
    let upstream = MockServer::start().await;
    let router = router_with(&upstream, config(), false).await;

    let mut req = request("/", "10.0.0.9");
    req.headers_mut()
        .insert(header::ORIGIN, ALLOWED_ORIGIN.parse().unwrap());

    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_ip_with_allowed_referer_passes() {
    let upstream = MockServer::start().await;
    let router = router_with(&upstream, config(), false).await;

    let mut req = request("/", "10.0.0.9");
    req.headers_mut().insert(
        header::REFERER,
        format!("{ALLOWED_ORIGIN}/some/page?x=1").parse().unwrap(),
    );

    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_ip_allow_list_is_a_server_error() {
    let upstream = MockServer::start().await;
    let router = router_with(&upstream, config().with_allowed_ips(Vec::new()), false).await;

    let response = router.oneshot(request("/", ALLOWED_IP)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["message"], "Internal Server Error");
}

// ─────────────────────────────────────────────────────────────────────────────
// Basic auth
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_without_credentials_is_challenged() {
    let upstream = MockServer::start().await;
    let router = router_with(&upstream, config(), false).await;

    let response = router
        .oneshot(request("/auth/login", ALLOWED_IP))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let upstream = MockServer::start().await;
    let router = router_with(&upstream, config(), false).await;

    let req = with_basic_auth(request("/auth/login", ALLOWED_IP), "admin", "wrong");
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_redirects_to_consent_page() {
    let upstream = MockServer::start().await;
    let router = router_with(&upstream, config(), false).await;

    let req = with_basic_auth(request("/auth/login", ALLOWED_IP), "admin", "hunter2");
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with(ludus_oauth::AUTH_URL));
    assert!(location.contains("clientId=cid"));
    assert!(location.contains("state="));
}

#[tokio::test]
async fn unconfigured_basic_auth_is_a_server_error() {
    let upstream = MockServer::start().await;
    let mut cfg = config();
    cfg.basic_auth = None;
    let router = router_with(&upstream, cfg, false).await;

    let response = router
        .oneshot(request("/auth/login", ALLOWED_IP))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ─────────────────────────────────────────────────────────────────────────────
// OAuth callback
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn callback_without_params_is_a_bad_request() {
    let upstream = MockServer::start().await;
    let router = router_with(&upstream, config(), false).await;

    let response = router
        .oneshot(request("/auth/callback", ALLOWED_IP))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["ok"], false);
}

#[tokio::test]
async fn callback_exchanges_the_code() {
    let upstream = MockServer::start().await;
    let router = router_with(&upstream, config(), true).await;

    let response = router
        .oneshot(request("/auth/callback?code=abc&state=xyz", ALLOWED_IP))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["message"], Value::Null);
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn callback_surfaces_exchange_failure() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid code"))
        .mount(&upstream)
        .await;
    let router = router_with(&upstream, config(), false).await;

    let response = router
        .oneshot(request("/auth/callback?code=bad&state=xyz", ALLOWED_IP))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["message"], "Token issuance failed.");
}

// ─────────────────────────────────────────────────────────────────────────────
// /me
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn me_without_token_is_unauthorized() {
    let upstream = MockServer::start().await;
    let router = router_with(&upstream, config(), false).await;

    let req = with_basic_auth(request("/me", ALLOWED_IP), "admin", "hunter2");
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], "Access token is missing. Authenticate again.");
}

#[tokio::test]
async fn me_returns_user_profile() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/open/v1/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": { "channelId": "c1", "channelName": "tester" }
        })))
        .mount(&upstream)
        .await;
    let router = router_with(&upstream, config(), true).await;

    let req = with_basic_auth(request("/me", ALLOWED_IP), "admin", "hunter2");
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["data"]["content"]["channelName"], "tester");
}

// ─────────────────────────────────────────────────────────────────────────────
// Game routes
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn game_search_validates_parameters() {
    let upstream = MockServer::start().await;
    let router = router_with(&upstream, config(), true).await;

    let response = router
        .clone()
        .oneshot(request("/game/search?size=20", ALLOWED_IP))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(request("/game/search?categoryName=liar&size=51", ALLOWED_IP))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn game_search_rejects_malformed_size_with_an_envelope() {
    let upstream = MockServer::start().await;
    let router = router_with(&upstream, config(), true).await;

    let response = router
        .oneshot(request("/game/search?categoryName=liar&size=abc", ALLOWED_IP))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A non-numeric size must still produce the enveloped shape, not the
    // extractor's plain-text rejection.
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], "size is required and must be between 1 and 50");
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn game_search_filters_to_game_categories() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/open/v1/categories/search"))
        .and(query_param("query", "liar"))
        .and(query_param("size", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": { "data": [
                { "categoryType": "GAME", "categoryId": "g1", "categoryName": "Liar's Bar" },
                { "categoryType": "ETC", "categoryId": "e1", "categoryName": "Liar Talk" }
            ]}
        })))
        .mount(&upstream)
        .await;
    let router = router_with(&upstream, config(), true).await;

    let response = router
        .oneshot(request("/game/search?categoryName=liar&size=20", ALLOWED_IP))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let games = body["data"].as_array().unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0]["categoryId"], "g1");
}

#[tokio::test]
async fn game_search_with_no_matches_returns_null_data() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/open/v1/categories/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": { "data": [] }
        })))
        .mount(&upstream)
        .await;
    let router = router_with(&upstream, config(), true).await;

    let response = router
        .oneshot(request("/game/search?categoryName=zzz&size=20", ALLOWED_IP))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn auto_complete_returns_name_id_pairs() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/open/v1/categories/search"))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": { "data": [
                { "categoryType": "GAME", "categoryId": "g1", "categoryName": "Liar's Bar" }
            ]}
        })))
        .mount(&upstream)
        .await;
    let router = router_with(&upstream, config(), true).await;

    let response = router
        .oneshot(request("/game/auto_complete?query=liar", ALLOWED_IP))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(
        body["data"],
        serde_json::json!([{ "name": "Liar's Bar", "id": "g1" }])
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Fallback
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_path_gets_an_enveloped_404() {
    let upstream = MockServer::start().await;
    let router = router_with(&upstream, config(), false).await;

    let response = router
        .oneshot(request("/no/such/route", ALLOWED_IP))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], "Not Found");
}
