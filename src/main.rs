use clap::{Parser, ValueEnum};

use loan_document_desk::shell::RouteParams;
use loan_document_desk::{Action, DeskOptions, DocumentKind};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliAction {
    View,
    Print,
    Download,
    Email,
}

impl From<CliAction> for Action {
    fn from(action: CliAction) -> Self {
        match action {
            CliAction::View => Action::View,
            CliAction::Print => Action::Print,
            CliAction::Download => Action::Download,
            CliAction::Email => Action::Email,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "loan-docs",
    version = env!("CARGO_PKG_VERSION"),
    about = "View, print, download and email loan documents from the admin API"
)]
struct Cli {
    /// Document kind (kfs, noc, loan-agreement, extension-letter)
    kind: DocumentKind,

    /// Loan id as it appears in the route (a leading ':' is tolerated)
    loan_id: String,

    /// Extension transaction id (extension letters)
    #[arg(long)]
    transaction_id: Option<String>,

    /// Extension sequence number (extension letters)
    #[arg(long)]
    extension_number: Option<String>,

    /// What to do once the document is loaded
    #[arg(short, long, value_enum, default_value = "view")]
    action: CliAction,

    /// Answer yes to confirmation prompts
    #[arg(short = 'y', long)]
    assume_yes: bool,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut route = RouteParams::new(cli.loan_id);
    route.transaction_id = cli.transaction_id;
    route.extension_number = cli.extension_number;

    let options = DeskOptions {
        kind: cli.kind,
        route,
        action: cli.action.into(),
        assume_yes: cli.assume_yes,
    };

    if let Err(e) = loan_document_desk::run(options).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
