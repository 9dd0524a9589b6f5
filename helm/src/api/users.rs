use super::client::GatewayClient;
use super::dto::{LoginRequest, LoginResponse, RegisterRequest, UserProfile};
use crate::error::Result;

/// Typed endpoints of the users service.
#[derive(Clone)]
pub struct UsersApi {
    client: GatewayClient,
}

impl UsersApi {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, body: &LoginRequest) -> Result<LoginResponse> {
        self.client.post("/api/users/login", body).await
    }

    pub async fn register(&self, body: &RegisterRequest) -> Result<()> {
        let _: serde_json::Value = self.client.post("/api/users/register", body).await?;
        Ok(())
    }

    pub async fn profile(&self) -> Result<UserProfile> {
        self.client.get("/api/users/profile", &[]).await
    }
}
