use anyhow::{anyhow, bail};
use std::sync::Arc;

pub mod client;
pub mod config;
pub mod documents;
pub mod markup;
pub mod platform;
pub mod shell;
pub mod template;
pub mod workflow;

pub use crate::client::{AdminApiClient, ClientError, DocumentClient, EmailReceipt, Envelope};
pub use crate::config::{ApiConfig, AppConfig, ConfigError};
pub use crate::documents::{DocumentBinding, DocumentKind, DocumentPayload, DocumentRequest};
pub use crate::workflow::{DocumentWorkflow, ExportOutcome, Phase, WorkflowContext, WorkflowState};

/// What the operator wants done with the document once it is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Print,
    Download,
    Email,
}

/// A single desk invocation: which document, for which route, doing what.
#[derive(Debug, Clone)]
pub struct DeskOptions {
    pub kind: DocumentKind,
    pub route: shell::RouteParams,
    pub action: Action,
    pub assume_yes: bool,
}

/// Navigator for the terminal: there is no page history to return to.
struct TerminalNavigator;

impl shell::Navigator for TerminalNavigator {
    fn go_back(&self) {
        log::info!("Leaving document view");
    }

    fn redirect_to_login(&self) {
        eprintln!("No admin session found. Set ADMIN_API_TOKEN or ADMIN_USER and try again.");
    }
}

pub async fn run(options: DeskOptions) -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let client = AdminApiClient::new(&config.api)?;

    let ctx = WorkflowContext {
        client: Arc::new(client),
        template: Arc::new(template::HtmlTemplate),
        platform: Arc::new(platform::TerminalPlatform::new(
            config.download_dir.clone(),
            options.assume_yes,
        )),
        navigator: Arc::new(TerminalNavigator),
        auth: Arc::new(shell::SessionMarkers::new(
            config.api.token.clone(),
            config.admin_user.clone(),
        )),
    };

    let workflow = DocumentWorkflow::for_kind(options.kind, ctx);
    match workflow.mount(&options.route).await {
        Phase::Ready => {}
        Phase::Error => {
            let state = workflow.state();
            bail!(
                "{}",
                state
                    .error_message
                    .unwrap_or_else(|| format!("Failed to load {} data", options.kind))
            );
        }
        Phase::Idle | Phase::Loading => bail!("{} page could not be opened", options.kind),
    }

    let outcome = match options.action {
        Action::View => {
            let state = workflow.state();
            if let Some(payload) = state.payload.as_ref() {
                let loan = payload.loan();
                println!(
                    "{} loaded for {} (application {})",
                    options.kind,
                    payload.borrower().name,
                    loan.application_number.as_deref().unwrap_or("-")
                );
            }
            workflow.go_back();
            return Ok(());
        }
        Action::Print => workflow.print(),
        Action::Download => workflow.download().await,
        Action::Email => workflow.email().await,
    };
    workflow.go_back();

    log::info!("{} {:?} finished: {:?}", options.kind, options.action, outcome);
    match outcome {
        ExportOutcome::Failed { message } => Err(anyhow!(message)),
        _ => Ok(()),
    }
}
