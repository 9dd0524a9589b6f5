use std::sync::Arc;
use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Client, Method, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{HelmError, Result};
use crate::session::SessionStore;

/// HTTP client bound to one backend service.
///
/// Every request carries the session's bearer token when one exists, and
/// every non-2xx response becomes [`HelmError::Api`] with the best message
/// the body offers.
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl GatewayClient {
    pub fn new(base_url: &str, timeout_secs: u64, session: Arc<SessionStore>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| HelmError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let request = self.request(Method::GET, path)?.query(query);
        self.execute(request, path).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.request(Method::POST, path)?.json(body);
        self.execute(request, path).await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.request(method, url);

        if let Some(token) = self.session.token() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| HelmError::Internal(format!("Invalid token header: {e}")))?;
            builder = builder.header(AUTHORIZATION, value);
        }

        Ok(builder)
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            debug!(path, error = %e, "Request failed before a response");
            HelmError::Transport(e.to_string())
        })?;

        let status = response.status();
        debug!(path, status = status.as_u16(), "Response received");

        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        let text = response.text().await?;
        decode_body(&text)
    }
}

/// Turn a failed response into an API error, preferring the body's `message`.
async fn error_from_response(response: Response) -> HelmError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    HelmError::Api {
        status,
        message: extract_message(&body).unwrap_or_else(|| HelmError::status_message(status)),
    }
}

pub(crate) fn extract_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Parse a success body. An empty body decodes as JSON `null`, so endpoints
/// with no payload can ask for `()`.
fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T> {
    if text.trim().is_empty() {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_str(text)?)
}
