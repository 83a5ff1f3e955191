//! Loan Tenure Extension Letter.
//!
//! A loan may be extended several times; the letter is identified by the
//! loan id plus the extension's transaction id and/or sequence number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{escape_or_dash, filename_fragment, format_optional_amount, ordinal_word};
use super::lenient;
use super::{
    BorrowerInfo, CompanyInfo, DocumentBinding, DocumentKind, DocumentPayload, DocumentRequest,
    EmailDispatch, LoanSummary,
};

pub const CONTENT_MARKER: &str = "extension-letter-document";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionTerms {
    #[serde(deserialize_with = "lenient::count")]
    pub extension_number: Option<u32>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub transaction_id: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub original_due_date: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub new_due_date: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub extension_days: Option<u32>,
    #[serde(deserialize_with = "lenient::amount")]
    pub extension_fee: Option<f64>,
    #[serde(deserialize_with = "lenient::amount")]
    pub outstanding_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionLetterDocument {
    #[serde(deserialize_with = "lenient::or_default")]
    pub company: CompanyInfo,
    #[serde(deserialize_with = "lenient::or_default")]
    pub loan: LoanSummary,
    #[serde(deserialize_with = "lenient::or_default")]
    pub borrower: BorrowerInfo,
    #[serde(deserialize_with = "lenient::or_default")]
    pub extension: ExtensionTerms,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub generated_at: Option<DateTime<Utc>>,
}

pub fn binding() -> DocumentBinding {
    DocumentBinding {
        kind: DocumentKind::ExtensionLetter,
        content_marker: CONTENT_MARKER,
        email: EmailDispatch::ComingSoon,
        filename,
    }
}

/// Extension sequence number: payload first, then the route, then the first extension.
pub fn extension_number(payload: &DocumentPayload, request: &DocumentRequest) -> u32 {
    let from_payload = match payload {
        DocumentPayload::ExtensionLetter(doc) => doc.extension.extension_number,
        _ => None,
    };
    from_payload.or(request.extension_number).unwrap_or(1)
}

fn filename(payload: &DocumentPayload, request: &DocumentRequest) -> String {
    format!(
        "Loan_Tenure_Extension_{}_{}.pdf",
        ordinal_word(extension_number(payload, request)),
        filename_fragment(payload, request)
    )
}

pub(crate) fn render_body(doc: &ExtensionLetterDocument) -> String {
    let ordinal = ordinal_word(doc.extension.extension_number.unwrap_or(1));
    let days = doc
        .extension
        .extension_days
        .map(|days| format!("{} days", days))
        .unwrap_or_else(|| "-".to_string());

    format!(
        r#"<section class="extension-terms">
  <h3>Sub: {} extension of loan tenure</h3>
  <p>Dear {},</p>
  <p>With reference to your request, the tenure of your loan has been extended as below.</p>
  <table>
    <tr><th>Transaction reference</th><td>{}</td></tr>
    <tr><th>Original due date</th><td>{}</td></tr>
    <tr><th>Extended by</th><td>{}</td></tr>
    <tr><th>New due date</th><td>{}</td></tr>
    <tr><th>Extension fee</th><td>{}</td></tr>
    <tr><th>Outstanding amount</th><td>{}</td></tr>
  </table>
  <p>All other terms of the loan agreement remain unchanged.</p>
</section>"#,
        ordinal,
        escape_or_dash(Some(doc.borrower.name.as_str())),
        escape_or_dash(doc.extension.transaction_id.as_deref()),
        escape_or_dash(doc.extension.original_due_date.as_deref()),
        days,
        escape_or_dash(doc.extension.new_due_date.as_deref()),
        format_optional_amount(doc.extension.extension_fee),
        format_optional_amount(doc.extension.outstanding_amount),
    )
}
