#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use loan_document_desk::client::{ClientError, DocumentClient, EmailReceipt, Envelope};
use loan_document_desk::documents::{
    BorrowerInfo, DocumentKind, DocumentPayload, DocumentRequest, ExtensionLetterDocument,
    KfsDocument, LoanAgreementDocument, LoanSummary, NocDocument,
};
use loan_document_desk::platform::{Platform, PlatformError};
use loan_document_desk::shell::{AuthGuard, Navigator, SessionMarkers};
use loan_document_desk::template::{DocumentTemplate, HtmlTemplate};
use loan_document_desk::workflow::WorkflowContext;

/// How the mock answers the initial document fetch.
#[derive(Clone)]
pub enum FetchBehavior {
    /// Success envelope with a sample payload for the requested loan.
    Payload,
    /// Sample payload whose borrower has no email on file.
    PayloadWithoutEmail,
    /// Success flag but no data.
    Empty,
    /// Failure envelope.
    Failure,
    /// Transport error with the given message.
    Transport(String),
}

pub fn sample_payload(kind: DocumentKind, loan_id: u64) -> DocumentPayload {
    sample_payload_for(kind, loan_id, Some("ravi@example.com"))
}

fn sample_payload_for(kind: DocumentKind, loan_id: u64, email: Option<&str>) -> DocumentPayload {
    let loan = LoanSummary {
        id: Some(loan_id),
        application_number: Some(format!("APP{}", loan_id)),
        loan_amount: Some(10000.0),
        ..Default::default()
    };
    let borrower = BorrowerInfo {
        name: "Ravi Kumar".to_string(),
        email: email.map(str::to_string),
        ..Default::default()
    };
    match kind {
        DocumentKind::Kfs => DocumentPayload::Kfs(KfsDocument {
            loan,
            borrower,
            ..Default::default()
        }),
        DocumentKind::Noc => DocumentPayload::Noc(NocDocument {
            loan,
            borrower,
            ..Default::default()
        }),
        DocumentKind::LoanAgreement => DocumentPayload::LoanAgreement(LoanAgreementDocument {
            loan,
            borrower,
            ..Default::default()
        }),
        DocumentKind::ExtensionLetter => {
            DocumentPayload::ExtensionLetter(ExtensionLetterDocument {
                loan,
                borrower,
                ..Default::default()
            })
        }
    }
}

/// In-memory DocumentClient recording every call.
pub struct MockDocumentClient {
    fetch: FetchBehavior,
    pdf: Result<Vec<u8>, String>,
    email: Envelope<EmailReceipt>,
    email_error: Option<String>,
    pdf_delay: Duration,
    slow_loan_id: Option<u64>,
    pub fetch_calls: AtomicUsize,
    pub pdf_calls: AtomicUsize,
    pub email_calls: AtomicUsize,
    pub last_html: Mutex<Option<String>>,
    pub last_request: Mutex<Option<DocumentRequest>>,
    pub last_email: Mutex<Option<(u64, String, String)>>,
}

impl MockDocumentClient {
    pub fn new(fetch: FetchBehavior) -> Self {
        Self {
            fetch,
            pdf: Ok(b"%PDF-1.7 mock".to_vec()),
            email: Envelope::ok(EmailReceipt {
                recipient_email: "ravi@example.com".to_string(),
            }),
            email_error: None,
            pdf_delay: Duration::ZERO,
            slow_loan_id: None,
            fetch_calls: AtomicUsize::new(0),
            pdf_calls: AtomicUsize::new(0),
            email_calls: AtomicUsize::new(0),
            last_html: Mutex::new(None),
            last_request: Mutex::new(None),
            last_email: Mutex::new(None),
        }
    }

    pub fn with_pdf_error(mut self, message: &str) -> Self {
        self.pdf = Err(message.to_string());
        self
    }

    pub fn with_pdf_delay(mut self, delay: Duration) -> Self {
        self.pdf_delay = delay;
        self
    }

    pub fn with_email_envelope(mut self, envelope: Envelope<EmailReceipt>) -> Self {
        self.email = envelope;
        self
    }

    pub fn with_email_error(mut self, message: &str) -> Self {
        self.email_error = Some(message.to_string());
        self
    }

    /// Fetches for this loan id answer only after a delay.
    pub fn with_slow_loan(mut self, loan_id: u64) -> Self {
        self.slow_loan_id = Some(loan_id);
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn pdfs(&self) -> usize {
        self.pdf_calls.load(Ordering::SeqCst)
    }

    pub fn emails(&self) -> usize {
        self.email_calls.load(Ordering::SeqCst)
    }
}

fn transport_error(message: &str) -> ClientError {
    ClientError::Status {
        status: 503,
        message: message.to_string(),
    }
}

#[async_trait]
impl DocumentClient for MockDocumentClient {
    async fn fetch_document(
        &self,
        kind: DocumentKind,
        request: &DocumentRequest,
    ) -> Result<Envelope<DocumentPayload>, ClientError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request.clone());
        if self.slow_loan_id == Some(request.loan_id) {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        match &self.fetch {
            FetchBehavior::Payload => Ok(Envelope::ok(sample_payload(kind, request.loan_id))),
            FetchBehavior::PayloadWithoutEmail => {
                Ok(Envelope::ok(sample_payload_for(kind, request.loan_id, None)))
            }
            FetchBehavior::Empty => Ok(Envelope {
                success: true,
                data: None,
                message: None,
            }),
            FetchBehavior::Failure => Ok(Envelope::failure("Loan not found")),
            FetchBehavior::Transport(message) => Err(transport_error(message)),
        }
    }

    async fn generate_pdf(
        &self,
        _kind: DocumentKind,
        _request: &DocumentRequest,
        html: &str,
    ) -> Result<Vec<u8>, ClientError> {
        self.pdf_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_html.lock() = Some(html.to_string());
        if !self.pdf_delay.is_zero() {
            tokio::time::sleep(self.pdf_delay).await;
        }
        self.pdf.clone().map_err(|message| transport_error(&message))
    }

    async fn email_pdf(
        &self,
        _kind: DocumentKind,
        loan_id: u64,
        html: &str,
        recipient_email: &str,
        recipient_name: &str,
    ) -> Result<Envelope<EmailReceipt>, ClientError> {
        self.email_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_html.lock() = Some(html.to_string());
        *self.last_email.lock() = Some((
            loan_id,
            recipient_email.to_string(),
            recipient_name.to_string(),
        ));
        if let Some(message) = &self.email_error {
            return Err(transport_error(message));
        }
        Ok(self.email.clone())
    }
}

/// Platform recording prompts and side effects.
pub struct MockPlatform {
    confirm_answer: bool,
    fail_saves: bool,
    pub alerts: Mutex<Vec<String>>,
    pub confirmations: Mutex<Vec<String>>,
    pub printed: Mutex<Vec<String>>,
    pub saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MockPlatform {
    pub fn new(confirm_answer: bool) -> Self {
        Self {
            confirm_answer,
            fail_saves: false,
            alerts: Mutex::new(Vec::new()),
            confirmations: Mutex::new(Vec::new()),
            printed: Mutex::new(Vec::new()),
            saved: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().clone()
    }
}

impl Platform for MockPlatform {
    fn print(&self, html: &str) {
        self.printed.lock().push(html.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        self.confirmations.lock().push(message.to_string());
        self.confirm_answer
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().push(message.to_string());
    }

    fn save_file(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, PlatformError> {
        if self.fail_saves {
            return Err(PlatformError::Write {
                path: PathBuf::from(filename),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.saved.lock().push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from("/downloads").join(filename))
    }
}

#[derive(Default)]
pub struct MockNavigator {
    pub back_calls: AtomicUsize,
    pub login_redirects: AtomicUsize,
}

impl Navigator for MockNavigator {
    fn go_back(&self) {
        self.back_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn redirect_to_login(&self) {
        self.login_redirects.fetch_add(1, Ordering::SeqCst);
    }
}

/// Template that renders without the content marker.
pub struct MarkerlessTemplate;

impl DocumentTemplate for MarkerlessTemplate {
    fn render(&self, _payload: &DocumentPayload, _content_marker: &str) -> String {
        "<div class=\"placeholder\">nothing to export</div>".to_string()
    }
}

pub struct Harness {
    pub client: Arc<MockDocumentClient>,
    pub platform: Arc<MockPlatform>,
    pub navigator: Arc<MockNavigator>,
    pub ctx: WorkflowContext,
}

pub fn harness(client: MockDocumentClient, platform: MockPlatform) -> Harness {
    harness_with(
        client,
        platform,
        Arc::new(HtmlTemplate),
        Arc::new(SessionMarkers::new(Some("token".to_string()), None)),
    )
}

pub fn harness_with(
    client: MockDocumentClient,
    platform: MockPlatform,
    template: Arc<dyn DocumentTemplate>,
    auth: Arc<dyn AuthGuard>,
) -> Harness {
    let client = Arc::new(client);
    let platform = Arc::new(platform);
    let navigator = Arc::new(MockNavigator::default());
    let ctx = WorkflowContext {
        client: client.clone(),
        template,
        platform: platform.clone(),
        navigator: navigator.clone(),
        auth,
    };
    Harness {
        client,
        platform,
        navigator,
        ctx,
    }
}
