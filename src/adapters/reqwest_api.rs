//! Reqwest-based REST client.
//!
//! Every endpoint is a JSON `POST` to `{base_url}/<name>` with the access
//! token in the body as `i`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::HttpConfig;
use crate::error::{classify_reqwest_error, ApiError};
use crate::models::{Instance, PostId};
use crate::traits::{ApiClient, InstanceMeta, Visibility};

/// REST client for one account.
///
/// # Example
///
/// ```ignore
/// let api = ReqwestApiClient::new(&instance, &config.http)?;
/// let id = api.create_post(Visibility::Home, "hello").await?;
/// ```
#[derive(Clone)]
pub struct ReqwestApiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Serialize)]
struct CreatePostRequest<'a> {
    i: &'a str,
    visibility: Visibility,
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePostResponse {
    created_note: CreatedNote,
}

#[derive(Deserialize)]
struct CreatedNote {
    id: PostId,
}

#[derive(Serialize)]
struct MetaRequest<'a> {
    i: &'a str,
    detail: bool,
}

impl ReqwestApiClient {
    pub fn new(instance: &Instance, config: &HttpConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("feedterm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| classify_reqwest_error(&e, instance.api_root()))?;
        Ok(Self::with_client(client, instance))
    }

    /// Use a preconfigured `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, instance: &Instance) -> Self {
        Self {
            client,
            base_url: instance.api_root().to_string(),
            token: instance.access_token.clone(),
        }
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    async fn call<B, R>(&self, name: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(name);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, &url))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(&e, &url))?;
        debug!(%url, status = status.as_u16(), "api call finished");

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ApiClient for ReqwestApiClient {
    async fn create_post(&self, visibility: Visibility, text: &str) -> Result<PostId, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::EmptyPost);
        }
        let request = CreatePostRequest {
            i: &self.token,
            visibility,
            text,
        };
        let response: CreatePostResponse = self.call("notes/create", &request).await?;
        Ok(response.created_note.id)
    }

    async fn meta(&self) -> Result<InstanceMeta, ApiError> {
        let request = MetaRequest {
            i: &self.token,
            detail: true,
        };
        self.call("meta", &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let instance = Instance::new("https://misskey.example/api/", "a", "t");
        let client = ReqwestApiClient::new(&instance, &HttpConfig::default()).unwrap();
        assert_eq!(
            client.endpoint("notes/create"),
            "https://misskey.example/api/notes/create"
        );
    }

    #[tokio::test]
    async fn test_empty_post_rejected_locally() {
        let instance = Instance::new("http://127.0.0.1:1", "a", "t");
        let client = ReqwestApiClient::new(&instance, &HttpConfig::default()).unwrap();
        assert_eq!(
            client.create_post(Visibility::Public, "   ").await,
            Err(ApiError::EmptyPost)
        );
    }
}
