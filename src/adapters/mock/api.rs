//! Mock REST client for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::ApiError;
use crate::models::PostId;
use crate::traits::{ApiClient, InstanceMeta, Visibility};

/// A post submitted through the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPost {
    pub visibility: Visibility,
    pub text: String,
}

/// REST client that records posts and returns configured results.
#[derive(Debug, Clone, Default)]
pub struct MockApiClient {
    posts: Arc<Mutex<Vec<RecordedPost>>>,
    post_error: Arc<Mutex<Option<ApiError>>>,
    meta: Arc<Mutex<InstanceMeta>>,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `create_post` fail with `err`.
    pub fn fail_posts_with(&self, err: ApiError) {
        *lock(&self.post_error) = Some(err);
    }

    pub fn set_meta(&self, meta: InstanceMeta) {
        *lock(&self.meta) = meta;
    }

    pub fn posts(&self) -> Vec<RecordedPost> {
        lock(&self.posts).clone()
    }
}

#[async_trait]
impl ApiClient for MockApiClient {
    async fn create_post(&self, visibility: Visibility, text: &str) -> Result<PostId, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::EmptyPost);
        }
        if let Some(err) = lock(&self.post_error).clone() {
            return Err(err);
        }
        let mut posts = lock(&self.posts);
        posts.push(RecordedPost {
            visibility,
            text: text.to_string(),
        });
        Ok(format!("mock-{}", posts.len()))
    }

    async fn meta(&self) -> Result<InstanceMeta, ApiError> {
        Ok(lock(&self.meta).clone())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_posts() {
        let api = MockApiClient::new();
        assert_eq!(
            api.create_post(Visibility::Home, "hi").await,
            Ok("mock-1".to_string())
        );
        assert_eq!(
            api.posts(),
            vec![RecordedPost {
                visibility: Visibility::Home,
                text: "hi".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_configured_failure() {
        let api = MockApiClient::new();
        api.fail_posts_with(ApiError::Status {
            status: 500,
            body: String::new(),
        });
        assert!(api.create_post(Visibility::Public, "x").await.is_err());
        assert!(api.posts().is_empty());
    }
}
