//! REST implementation of [`ResumeGateway`].
//!
//! Requests are made exactly once. Retrying a failed save is a user
//! decision, taken after the editor reports the failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::gateway::{GatewayError, ResumeGateway};
use crate::models::resume::{ResumePayload, ResumeSnapshot};

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct HttpResumeGateway {
    client: Client,
    resumes: Url,
    token: Option<String>,
}

impl HttpResumeGateway {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let base_url = base_url.into();
        let resumes = format!("{}/resumes", base_url.trim_end_matches('/'));
        let resumes = match Url::parse(&resumes) {
            Ok(url) if !url.cannot_be_a_base() => url,
            _ => return Err(GatewayError::InvalidUrl(base_url)),
        };
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            resumes,
            token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        Self::new(
            config.api_url.clone(),
            config.api_token.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn resumes_url(&self) -> Url {
        self.resumes.clone()
    }

    /// `id` is one path segment; `/`, `?` and `#` in it are escaped.
    fn resume_url(&self, id: &str) -> Url {
        let mut url = self.resumes.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header("accept", "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<ResumeSnapshot, GatewayError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!("Resume gateway {what} returned {status}");

        if !status.is_success() {
            let message = error_message(response).await;
            warn!("Resume gateway {what} failed ({status}): {message}");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// The server's `{"message": ..}` when present, the raw body otherwise.
async fn error_message(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    parse_error_message(&body)
}

fn parse_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.to_string())
}

#[async_trait]
impl ResumeGateway for HttpResumeGateway {
    async fn fetch(&self, id: &str) -> Result<ResumeSnapshot, GatewayError> {
        let url = self.resume_url(id);
        self.send(self.request(Method::GET, url), "fetch").await
    }

    async fn create(&self, payload: &ResumePayload) -> Result<ResumeSnapshot, GatewayError> {
        let url = self.resumes_url();
        self.send(self.request(Method::POST, url).json(payload), "create")
            .await
    }

    async fn update(&self, id: &str, payload: &ResumePayload) -> Result<ResumeSnapshot, GatewayError> {
        let url = self.resume_url(id);
        self.send(self.request(Method::PUT, url).json(payload), "update")
            .await
    }
}
