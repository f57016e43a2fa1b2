//! Persistence gateway: the only way résumé data leaves the editor.
//!
//! `EditorSession` holds an `Arc<dyn ResumeGateway>`, so tests and hosts
//! can swap the HTTP backend without touching the save workflow.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::resume::{ResumePayload, ResumeSnapshot};

pub mod http;

pub use http::HttpResumeGateway;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid gateway URL '{0}'")]
    InvalidUrl(String),
}

#[async_trait]
pub trait ResumeGateway: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<ResumeSnapshot, GatewayError>;

    async fn create(&self, payload: &ResumePayload) -> Result<ResumeSnapshot, GatewayError>;

    async fn update(&self, id: &str, payload: &ResumePayload) -> Result<ResumeSnapshot, GatewayError>;
}
