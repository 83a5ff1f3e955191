//! Document export workflow.
//!
//! One generic state machine drives every document page:
//! `Idle -> Loading -> {Ready, Error}`. While `Ready`, the page offers print,
//! download-as-PDF and email-as-PDF. Export actions never fail outward:
//! every problem ends in a platform alert and the busy flag being lowered.

pub mod state;

pub use state::{ExportOutcome, Phase, WorkflowState};

use log::{error, info, warn};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::client::DocumentClient;
use crate::documents::{
    parse_loan_id, Disambiguators, DocumentBinding, DocumentKind, DocumentPayload,
    DocumentRequest, EmailDispatch,
};
use crate::markup::{find_element_by_class, standalone_document};
use crate::platform::Platform;
use crate::shell::{AuthGuard, Navigator, RouteParams};
use crate::template::DocumentTemplate;
use state::{BusyGuard, ExportFlag, Inner};

/// Collaborators shared by every workflow instance.
#[derive(Clone)]
pub struct WorkflowContext {
    pub client: Arc<dyn DocumentClient>,
    pub template: Arc<dyn DocumentTemplate>,
    pub platform: Arc<dyn Platform>,
    pub navigator: Arc<dyn Navigator>,
    pub auth: Arc<dyn AuthGuard>,
}

/// Loaded document plus what is needed to export it.
struct ExportSnapshot {
    raw_loan_id: String,
    request: DocumentRequest,
    payload: DocumentPayload,
    rendered: String,
}

pub struct DocumentWorkflow {
    binding: DocumentBinding,
    ctx: WorkflowContext,
    inner: Mutex<Inner>,
    load_token: AtomicU64,
}

impl DocumentWorkflow {
    pub fn new(binding: DocumentBinding, ctx: WorkflowContext) -> Self {
        Self {
            binding,
            ctx,
            inner: Mutex::new(Inner::default()),
            load_token: AtomicU64::new(0),
        }
    }

    pub fn for_kind(kind: DocumentKind, ctx: WorkflowContext) -> Self {
        Self::new(DocumentBinding::for_kind(kind), ctx)
    }

    pub fn kind(&self) -> DocumentKind {
        self.binding.kind
    }

    pub fn binding(&self) -> &DocumentBinding {
        &self.binding
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> WorkflowState {
        self.inner.lock().state.clone()
    }

    /// Markup produced by the template once the document is ready.
    pub fn rendered_markup(&self) -> Option<String> {
        self.inner.lock().rendered.clone()
    }

    fn label(&self) -> &'static str {
        self.binding.kind.label()
    }

    fn load_failed_message(&self) -> String {
        format!("Failed to load {} data", self.label())
    }

    /// Mount the page: check the session once, then load the routed document.
    pub async fn mount(&self, route: &RouteParams) -> Phase {
        if !self.ctx.auth.is_authenticated() {
            warn!("No admin session; redirecting to login from {} page", self.label());
            self.ctx.navigator.redirect_to_login();
            return self.state().phase;
        }
        self.initialize(&route.loan_id, &route.disambiguators()).await
    }

    /// Validate the route id and load the document.
    ///
    /// Every state write happens under the lock together with a check of the
    /// load token, so a slower earlier load can never overwrite a newer one.
    pub async fn initialize(&self, raw_loan_id: &str, extra: &Disambiguators) -> Phase {
        let parsed = DocumentRequest::from_route(raw_loan_id, extra);

        let (token, request) = {
            let mut inner = self.inner.lock();
            let token = self.load_token.fetch_add(1, Ordering::SeqCst) + 1;
            inner.raw_loan_id = raw_loan_id.to_string();
            match parsed {
                Ok(request) => {
                    inner.request = Some(request.clone());
                    inner.state.phase = Phase::Loading;
                    inner.state.error_message = None;
                    (token, request)
                }
                Err(e) => {
                    warn!("Rejected {} request: {}", self.label(), e);
                    inner.request = None;
                    inner.rendered = None;
                    inner.state.phase = Phase::Error;
                    inner.state.payload = None;
                    inner.state.error_message = Some(e.message);
                    return Phase::Error;
                }
            }
        };
        info!("Loading {} for loan {}", self.label(), request.loan_id);

        let loaded = match self.ctx.client.fetch_document(self.binding.kind, &request).await {
            Ok(envelope) => match envelope.into_data() {
                Some(payload) => {
                    let rendered = self
                        .ctx
                        .template
                        .render(&payload, self.binding.content_marker);
                    Ok((payload, rendered))
                }
                None => {
                    warn!(
                        "{} for loan {} came back without data",
                        self.label(),
                        request.loan_id
                    );
                    Err(self.load_failed_message())
                }
            },
            Err(e) => {
                error!(
                    "Failed to fetch {} for loan {}: {}",
                    self.label(),
                    request.loan_id,
                    e
                );
                let message = e.to_string();
                if message.trim().is_empty() {
                    Err(self.load_failed_message())
                } else {
                    Err(message)
                }
            }
        };

        self.settle_load(token, &request, loaded)
    }

    fn settle_load(
        &self,
        token: u64,
        request: &DocumentRequest,
        loaded: Result<(DocumentPayload, String), String>,
    ) -> Phase {
        let mut inner = self.inner.lock();
        if self.load_token.load(Ordering::SeqCst) != token {
            warn!(
                "Discarding stale {} response for loan {}",
                self.label(),
                request.loan_id
            );
            return inner.state.phase;
        }

        match loaded {
            Ok((payload, rendered)) => {
                inner.rendered = Some(rendered);
                inner.state.payload = Some(payload);
                inner.state.phase = Phase::Ready;
                info!("{} for loan {} ready", self.label(), request.loan_id);
                Phase::Ready
            }
            Err(message) => {
                inner.rendered = None;
                inner.state.payload = None;
                inner.state.phase = Phase::Error;
                inner.state.error_message = Some(message);
                Phase::Error
            }
        }
    }

    fn snapshot(&self) -> Option<ExportSnapshot> {
        let inner = self.inner.lock();
        Some(ExportSnapshot {
            raw_loan_id: inner.raw_loan_id.clone(),
            request: inner.request.clone()?,
            payload: inner.state.payload.clone()?,
            rendered: inner.rendered.clone()?,
        })
    }

    /// Alert and report a failed export.
    fn fail_export(&self, message: String) -> ExportOutcome {
        self.ctx.platform.alert(&message);
        ExportOutcome::Failed { message }
    }

    /// Re-check the id and cut the printable region out as a standalone page.
    fn export_html(&self, snapshot: &ExportSnapshot, title: &str) -> Result<String, ExportOutcome> {
        if let Err(e) = parse_loan_id(&snapshot.raw_loan_id) {
            return Err(self.fail_export(e.message));
        }
        match find_element_by_class(&snapshot.rendered, self.binding.content_marker) {
            Some(fragment) => Ok(standalone_document(&fragment, title)),
            None => {
                warn!(
                    "Content marker '{}' missing from rendered {}",
                    self.binding.content_marker,
                    self.label()
                );
                Err(self.fail_export(format!("{} content not found", self.label())))
            }
        }
    }

    /// Open the print surface for the loaded document.
    pub fn print(&self) -> ExportOutcome {
        let rendered = {
            let inner = self.inner.lock();
            if !inner.state.is_ready() {
                return ExportOutcome::NotReady;
            }
            inner.rendered.clone()
        };
        match rendered {
            Some(html) => {
                self.ctx.platform.print(&html);
                ExportOutcome::Printed
            }
            None => ExportOutcome::NotReady,
        }
    }

    /// Render the loaded document to PDF on the backend and save it.
    pub async fn download(&self) -> ExportOutcome {
        let _busy = match BusyGuard::claim(&self.inner, ExportFlag::Downloading) {
            Ok(guard) => guard,
            Err(outcome) => return outcome,
        };
        let Some(snapshot) = self.snapshot() else {
            return ExportOutcome::NotReady;
        };

        let filename = self.binding.file_name(&snapshot.payload, &snapshot.request);
        let html = match self.export_html(&snapshot, filename.trim_end_matches(".pdf")) {
            Ok(html) => html,
            Err(outcome) => return outcome,
        };

        let pdf = match self
            .ctx
            .client
            .generate_pdf(self.binding.kind, &snapshot.request, &html)
            .await
        {
            Ok(pdf) => pdf,
            Err(e) => {
                error!("{} PDF generation failed: {}", self.label(), e);
                return self.fail_export(format!("Failed to download {} PDF: {}", self.label(), e));
            }
        };

        match self.ctx.platform.save_file(&filename, &pdf) {
            Ok(path) => {
                info!("Saved {} ({} bytes) to {}", filename, pdf.len(), path.display());
                ExportOutcome::Downloaded { filename }
            }
            Err(e) => {
                error!("Could not save {}: {}", filename, e);
                self.fail_export(format!("Failed to download {} PDF: {}", self.label(), e))
            }
        }
    }

    /// Email the loaded document to the borrower after the operator confirms.
    pub async fn email(&self) -> ExportOutcome {
        let (recipient_email, recipient_name) = {
            let inner = self.inner.lock();
            if inner.state.emailing {
                return ExportOutcome::Busy;
            }
            let Some(payload) = inner.state.payload.as_ref().filter(|_| inner.state.is_ready()) else {
                return ExportOutcome::NotReady;
            };
            (
                payload.borrower_email().map(str::to_string),
                payload.borrower().name.clone(),
            )
        };

        let recipient_email = match recipient_email {
            Some(email) => email,
            None if self.binding.email == EmailDispatch::ComingSoon => {
                return self.email_coming_soon();
            }
            None => return self.fail_export("Borrower email not available".to_string()),
        };

        let question = format!("Send {} PDF to {}?", self.label(), recipient_email);
        if !self.ctx.platform.confirm(&question) {
            info!("{} email declined by operator", self.label());
            return ExportOutcome::Declined;
        }

        let _busy = match BusyGuard::claim(&self.inner, ExportFlag::Emailing) {
            Ok(guard) => guard,
            Err(outcome) => return outcome,
        };
        let Some(snapshot) = self.snapshot() else {
            return ExportOutcome::NotReady;
        };

        let title = self
            .binding
            .file_name(&snapshot.payload, &snapshot.request)
            .trim_end_matches(".pdf")
            .to_string();
        let html = match self.export_html(&snapshot, &title) {
            Ok(html) => html,
            Err(outcome) => return outcome,
        };

        if self.binding.email == EmailDispatch::ComingSoon {
            return self.email_coming_soon();
        }

        let result = self
            .ctx
            .client
            .email_pdf(
                self.binding.kind,
                snapshot.request.loan_id,
                &html,
                &recipient_email,
                &recipient_name,
            )
            .await;

        match result {
            Ok(envelope) if envelope.success => {
                let recipient = envelope
                    .data
                    .map(|receipt| receipt.recipient_email)
                    .unwrap_or(recipient_email);
                info!("{} emailed to {}", self.label(), recipient);
                self.ctx
                    .platform
                    .alert(&format!("{} sent to {}", self.label(), recipient));
                ExportOutcome::Emailed { recipient }
            }
            Ok(envelope) => {
                let message = envelope
                    .message
                    .unwrap_or_else(|| format!("Failed to send {} email", self.label()));
                warn!("{} email rejected: {}", self.label(), message);
                self.fail_export(message)
            }
            Err(e) => {
                error!("{} email failed: {}", self.label(), e);
                self.fail_export(format!("Failed to send {} email: {}", self.label(), e))
            }
        }
    }

    fn email_coming_soon(&self) -> ExportOutcome {
        info!("{} email dispatch is not available yet", self.label());
        self.ctx
            .platform
            .alert(&format!("Email for {} is coming soon", self.label()));
        ExportOutcome::ComingSoon
    }

    pub fn go_back(&self) {
        self.ctx.navigator.go_back();
    }
}
