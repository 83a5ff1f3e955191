//! HTTP implementation of [`DocumentClient`] against the admin API.

use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;

use super::{ClientError, DocumentClient, EmailReceipt, Envelope};
use crate::config::ApiConfig;
use crate::documents::{DocumentKind, DocumentPayload, DocumentRequest};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PdfRequestBody<'a> {
    html_content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extension_number: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailRequestBody<'a> {
    html_content: &'a str,
    recipient_email: &'a str,
    recipient_name: &'a str,
}

/// Admin API client.
#[derive(Clone)]
pub struct AdminApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl AdminApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .pool_idle_timeout(std::time::Duration::from_secs(900))
            .timeout(config.timeout)
            .user_agent(concat!("loan-document-desk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_http_client(
            http,
            &config.base_url,
            config.token.clone(),
        ))
    }

    pub fn with_http_client(http: reqwest::Client, base_url: &str, token: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Endpoint suffix for email dispatch; kinds without a live route return `None`.
    fn email_route(kind: DocumentKind) -> Option<&'static str> {
        match kind {
            DocumentKind::Kfs | DocumentKind::LoanAgreement => Some("email-pdf"),
            DocumentKind::Noc | DocumentKind::ExtensionLetter => None,
        }
    }

    fn document_url(
        &self,
        kind: DocumentKind,
        loan_id: u64,
        suffix: Option<&str>,
    ) -> Result<Url, ClientError> {
        let mut raw = format!("{}/api/admin/{}/{}", self.base_url, kind.slug(), loan_id);
        if let Some(suffix) = suffix {
            raw.push('/');
            raw.push_str(suffix);
        }
        Url::parse(&raw).map_err(|e| ClientError::Url(format!("{}: {}", raw, e)))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Decode an envelope body, turning undecodable non-2xx bodies into status errors.
    fn decode_envelope(
        kind: DocumentKind,
        status: StatusCode,
        body: &[u8],
    ) -> Result<Envelope<Value>, ClientError> {
        match serde_json::from_slice::<Envelope<Value>>(body) {
            Ok(envelope) => Ok(envelope),
            Err(e) if status.is_success() => Err(ClientError::Decode(e)),
            Err(_) => Err(status_error(kind, status, body)),
        }
    }
}

fn status_error(kind: DocumentKind, status: StatusCode, body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<Envelope<Value>>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| format!("{} request failed with status {}", kind, status.as_u16()));
    ClientError::Status {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl DocumentClient for AdminApiClient {
    async fn fetch_document(
        &self,
        kind: DocumentKind,
        request: &DocumentRequest,
    ) -> Result<Envelope<DocumentPayload>, ClientError> {
        let mut url = self.document_url(kind, request.loan_id, None)?;
        if kind == DocumentKind::ExtensionLetter {
            if let Some(transaction_id) = &request.transaction_id {
                url.query_pairs_mut()
                    .append_pair("transactionId", transaction_id);
            }
            if let Some(number) = request.extension_number {
                url.query_pairs_mut()
                    .append_pair("extensionNumber", &number.to_string());
            }
        }

        debug!("GET {}", url);
        let response = self.authorize(self.http.get(url)).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        let envelope = Self::decode_envelope(kind, status, &body)?;

        if !envelope.success {
            warn!(
                "{} fetch for loan {} reported failure: {}",
                kind,
                request.loan_id,
                envelope.message.as_deref().unwrap_or("no message")
            );
        }

        let data = match envelope.data {
            Some(value) if envelope.success && !value.is_null() => {
                Some(DocumentPayload::from_value(kind, value)?)
            }
            _ => None,
        };

        Ok(Envelope {
            success: envelope.success,
            data,
            message: envelope.message,
        })
    }

    async fn generate_pdf(
        &self,
        kind: DocumentKind,
        request: &DocumentRequest,
        html: &str,
    ) -> Result<Vec<u8>, ClientError> {
        let url = self.document_url(kind, request.loan_id, Some("generate-pdf"))?;
        let body = PdfRequestBody {
            html_content: html,
            transaction_id: request.transaction_id.as_deref(),
            extension_number: request.extension_number,
        };

        debug!("POST {} ({} bytes of html)", url, html.len());
        let response = self.authorize(self.http.post(url)).json(&body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            error!(
                "{} PDF generation for loan {} failed with status {}",
                kind, request.loan_id, status
            );
            return Err(status_error(kind, status, &bytes));
        }

        Ok(bytes.to_vec())
    }

    async fn email_pdf(
        &self,
        kind: DocumentKind,
        loan_id: u64,
        html: &str,
        recipient_email: &str,
        recipient_name: &str,
    ) -> Result<Envelope<EmailReceipt>, ClientError> {
        let route = Self::email_route(kind).ok_or(ClientError::Unsupported {
            kind,
            operation: "email",
        })?;
        let url = self.document_url(kind, loan_id, Some(route))?;
        let body = EmailRequestBody {
            html_content: html,
            recipient_email,
            recipient_name,
        };

        debug!("POST {}", url);
        let response = self.authorize(self.http.post(url)).json(&body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let envelope = Self::decode_envelope(kind, status, &bytes)?;

        let data = match envelope.data {
            Some(value) if envelope.success && !value.is_null() => {
                Some(serde_json::from_value::<EmailReceipt>(value)?)
            }
            _ => None,
        };

        Ok(Envelope {
            success: envelope.success,
            data,
            message: envelope.message,
        })
    }
}
