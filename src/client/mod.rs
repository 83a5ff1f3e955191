//! Document data client.
//!
//! The desk never renders PDFs or sends mail itself; it asks the admin API.
//! `DocumentClient` is the seam the workflow depends on, `AdminApiClient` the
//! HTTP implementation.

pub mod admin_api;

pub use admin_api::AdminApiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::documents::{DocumentKind, DocumentPayload, DocumentRequest};

/// Errors raised while talking to the admin API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{operation} is not available for {kind}")]
    Unsupported {
        kind: DocumentKind,
        operation: &'static str,
    },
    #[error("invalid API URL: {0}")]
    Url(String),
}

/// Response wrapper used by every admin API endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// The data, when the envelope reports success and actually carries it.
    pub fn into_data(self) -> Option<T> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}

/// What the backend echoes after dispatching a document email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailReceipt {
    pub recipient_email: String,
}

/// Retrieval, PDF generation and email dispatch for the loan documents.
#[async_trait]
pub trait DocumentClient: Send + Sync {
    async fn fetch_document(
        &self,
        kind: DocumentKind,
        request: &DocumentRequest,
    ) -> Result<Envelope<DocumentPayload>, ClientError>;

    /// Render the given HTML to PDF bytes.
    async fn generate_pdf(
        &self,
        kind: DocumentKind,
        request: &DocumentRequest,
        html: &str,
    ) -> Result<Vec<u8>, ClientError>;

    async fn email_pdf(
        &self,
        kind: DocumentKind,
        loan_id: u64,
        html: &str,
        recipient_email: &str,
        recipient_name: &str,
    ) -> Result<Envelope<EmailReceipt>, ClientError>;
}
