use super::client::GatewayClient;
use super::dto::{AddQuestionRequest, CreateDiscussionRequest, DiscussionDetails, DiscussionsResponse};
use crate::error::Result;

/// Typed endpoints of the discussions service.
#[derive(Clone)]
pub struct DiscussionsApi {
    client: GatewayClient,
}

impl DiscussionsApi {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<DiscussionsResponse> {
        self.client.get("/api/discussions/discussions", &[]).await
    }

    pub async fn details(&self, discussion_id: &str) -> Result<DiscussionDetails> {
        self.client
            .get(
                "/api/discussions/discussion",
                &[("discussionId", discussion_id)],
            )
            .await
    }

    // Both writes may answer with or without a body; neither payload is used.
    pub async fn create(&self, body: &CreateDiscussionRequest) -> Result<()> {
        let _: serde_json::Value = self.client.post("/api/discussions/discussion", body).await?;
        Ok(())
    }

    pub async fn add_question(&self, body: &AddQuestionRequest) -> Result<()> {
        let _: serde_json::Value = self.client.post("/api/discussions/question", body).await?;
        Ok(())
    }
}
