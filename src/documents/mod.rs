//! Documents module - typed payloads and per-kind bindings for the loan documents.
//!
//! Each document kind lives in its own submodule:
//! - `kfs` - Key Facts Statement
//! - `noc` - No-Objection / No-Dues Certificate
//! - `loan_agreement` - Loan Agreement
//! - `extension_letter` - Loan Tenure Extension Letter
//!
//! A submodule owns the kind's payload shape, its export binding (content
//! marker, email availability, filename pattern) and the body markup the
//! template renders.

pub mod common;
pub mod extension_letter;
pub mod kfs;
mod lenient;
pub mod loan_agreement;
pub mod noc;
pub mod validation;

pub use extension_letter::ExtensionLetterDocument;
pub use kfs::KfsDocument;
pub use loan_agreement::LoanAgreementDocument;
pub use noc::NocDocument;
pub use validation::{parse_loan_id, ValidationError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four loan documents the desk can view and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Kfs,
    Noc,
    LoanAgreement,
    ExtensionLetter,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::Kfs,
        DocumentKind::Noc,
        DocumentKind::LoanAgreement,
        DocumentKind::ExtensionLetter,
    ];

    /// Human label used in alerts and error messages.
    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Kfs => "KFS",
            DocumentKind::Noc => "NOC",
            DocumentKind::LoanAgreement => "Loan Agreement",
            DocumentKind::ExtensionLetter => "Extension Letter",
        }
    }

    /// Path segment used by the admin API.
    pub fn slug(self) -> &'static str {
        match self {
            DocumentKind::Kfs => "kfs",
            DocumentKind::Noc => "noc",
            DocumentKind::LoanAgreement => "loan-agreement",
            DocumentKind::ExtensionLetter => "extension-letter",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        DocumentKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown document kind '{}' (expected one of: kfs, noc, loan-agreement, extension-letter)",
                    s
                )
            })
    }
}

/// Optional identifiers that narrow down which Extension Letter is meant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Disambiguators {
    pub transaction_id: Option<String>,
    pub extension_number: Option<u32>,
}

/// What to fetch: a validated loan id plus optional disambiguators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRequest {
    pub loan_id: u64,
    pub transaction_id: Option<String>,
    pub extension_number: Option<u32>,
}

impl DocumentRequest {
    pub fn new(loan_id: u64) -> Self {
        Self {
            loan_id,
            transaction_id: None,
            extension_number: None,
        }
    }

    /// Parse the route-supplied id and attach the disambiguators.
    pub fn from_route(raw_loan_id: &str, extra: &Disambiguators) -> Result<Self, ValidationError> {
        let loan_id = parse_loan_id(raw_loan_id)?;
        Ok(Self {
            loan_id,
            transaction_id: extra.transaction_id.clone(),
            extension_number: extra.extension_number,
        })
    }
}

/// Lender details printed in every document header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInfo {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub address: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub cin: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub rbi_registration_number: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanSummary {
    #[serde(deserialize_with = "lenient::identifier")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub application_number: Option<String>,
    #[serde(deserialize_with = "lenient::amount")]
    pub loan_amount: Option<f64>,
    #[serde(deserialize_with = "lenient::amount")]
    pub disbursed_amount: Option<f64>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub disbursed_on: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub due_date: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub tenure_days: Option<u32>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BorrowerInfo {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub address: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub pan_number: Option<String>,
}

/// A loaded document, one variant per kind.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentPayload {
    Kfs(KfsDocument),
    Noc(NocDocument),
    LoanAgreement(LoanAgreementDocument),
    ExtensionLetter(ExtensionLetterDocument),
}

impl DocumentPayload {
    /// Decode the `data` part of an envelope as the given kind.
    pub fn from_value(kind: DocumentKind, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            DocumentKind::Kfs => DocumentPayload::Kfs(serde_json::from_value(value)?),
            DocumentKind::Noc => DocumentPayload::Noc(serde_json::from_value(value)?),
            DocumentKind::LoanAgreement => {
                DocumentPayload::LoanAgreement(serde_json::from_value(value)?)
            }
            DocumentKind::ExtensionLetter => {
                DocumentPayload::ExtensionLetter(serde_json::from_value(value)?)
            }
        })
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentPayload::Kfs(_) => DocumentKind::Kfs,
            DocumentPayload::Noc(_) => DocumentKind::Noc,
            DocumentPayload::LoanAgreement(_) => DocumentKind::LoanAgreement,
            DocumentPayload::ExtensionLetter(_) => DocumentKind::ExtensionLetter,
        }
    }

    pub fn company(&self) -> &CompanyInfo {
        match self {
            DocumentPayload::Kfs(doc) => &doc.company,
            DocumentPayload::Noc(doc) => &doc.company,
            DocumentPayload::LoanAgreement(doc) => &doc.company,
            DocumentPayload::ExtensionLetter(doc) => &doc.company,
        }
    }

    pub fn loan(&self) -> &LoanSummary {
        match self {
            DocumentPayload::Kfs(doc) => &doc.loan,
            DocumentPayload::Noc(doc) => &doc.loan,
            DocumentPayload::LoanAgreement(doc) => &doc.loan,
            DocumentPayload::ExtensionLetter(doc) => &doc.loan,
        }
    }

    pub fn borrower(&self) -> &BorrowerInfo {
        match self {
            DocumentPayload::Kfs(doc) => &doc.borrower,
            DocumentPayload::Noc(doc) => &doc.borrower,
            DocumentPayload::LoanAgreement(doc) => &doc.borrower,
            DocumentPayload::ExtensionLetter(doc) => &doc.borrower,
        }
    }

    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        match self {
            DocumentPayload::Kfs(doc) => doc.generated_at,
            DocumentPayload::Noc(doc) => doc.generated_at,
            DocumentPayload::LoanAgreement(doc) => doc.generated_at,
            DocumentPayload::ExtensionLetter(doc) => doc.generated_at,
        }
    }

    /// Borrower email, if the backend supplied a non-blank one.
    pub fn borrower_email(&self) -> Option<&str> {
        self.borrower()
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

/// Whether a kind can be emailed from the desk yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailDispatch {
    Live,
    ComingSoon,
}

/// Per-kind configuration the generic workflow is instantiated with.
#[derive(Clone, Copy)]
pub struct DocumentBinding {
    pub kind: DocumentKind,
    /// Class marking the printable region in the rendered markup.
    pub content_marker: &'static str,
    pub email: EmailDispatch,
    pub filename: fn(&DocumentPayload, &DocumentRequest) -> String,
}

impl fmt::Debug for DocumentBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentBinding")
            .field("kind", &self.kind)
            .field("content_marker", &self.content_marker)
            .field("email", &self.email)
            .finish()
    }
}

impl DocumentBinding {
    pub fn for_kind(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Kfs => kfs::binding(),
            DocumentKind::Noc => noc::binding(),
            DocumentKind::LoanAgreement => loan_agreement::binding(),
            DocumentKind::ExtensionLetter => extension_letter::binding(),
        }
    }

    pub fn file_name(&self, payload: &DocumentPayload, request: &DocumentRequest) -> String {
        (self.filename)(payload, request)
    }
}
