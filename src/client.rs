//! Remote captioning and story-generation API.

use reqwest::multipart;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::story::StoryRequest;

#[async_trait::async_trait]
pub trait Captioner: Send + Sync {
    async fn caption(&self, image: &[u8]) -> Result<String>;
}

#[async_trait::async_trait]
pub trait StoryTeller: Send + Sync {
    async fn generate_story(&self, request: &StoryRequest) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct CaptionResponse {
    caption: String,
}

#[derive(Debug, Deserialize)]
struct StoryResponse {
    story: String,
}

/// HTTP client for `generate_caption/` and `generate_story/`.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api_host: String,
}

impl ApiClient {
    pub fn new(api_host: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_host: api_host.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_host, path)
    }

    async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let excerpt: String = body.chars().take(200).collect();
        Err(AppError::RequestFailure(format!(
            "{} API returned {}: {}",
            what, status, excerpt
        )))
    }
}

fn request_failure(what: &'static str) -> impl Fn(reqwest::Error) -> AppError {
    move |e| AppError::RequestFailure(format!("{} call failed: {}", what, e))
}

#[async_trait::async_trait]
impl Captioner for ApiClient {
    async fn caption(&self, image: &[u8]) -> Result<String> {
        let part = multipart::Part::bytes(image.to_vec()).file_name("file");
        let form = multipart::Form::new().part("file", part);

        tracing::debug!("sending {} bytes to captioning API", image.len());

        let response = self
            .client
            .post(self.endpoint("generate_caption/"))
            .multipart(form)
            .send()
            .await
            .map_err(request_failure("caption"))?;

        let body: CaptionResponse = Self::check(response, "caption")
            .await?
            .json()
            .await
            .map_err(request_failure("caption"))?;

        Ok(body.caption)
    }
}

#[async_trait::async_trait]
impl StoryTeller for ApiClient {
    async fn generate_story(&self, request: &StoryRequest) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint("generate_story/"))
            .form(&request.to_form())
            .send()
            .await
            .map_err(request_failure("story"))?;

        let body: StoryResponse = Self::check(response, "story")
            .await?
            .json()
            .await
            .map_err(request_failure("story"))?;

        Ok(body.story)
    }
}
