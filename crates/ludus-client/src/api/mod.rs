//! Endpoint groups, one module per upstream API surface.

mod category;
mod channel;
mod chat;
mod drops;
mod live;
mod user;

pub use category::CategoryApi;
pub use channel::ChannelApi;
pub use chat::ChatApi;
pub use drops::DropsApi;
pub use live::LiveApi;
pub use user::UserApi;
