pub mod client;
pub mod discussions;
pub mod dto;
pub mod users;

pub use client::GatewayClient;
pub use discussions::DiscussionsApi;
pub use users::UsersApi;
