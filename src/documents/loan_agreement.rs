//! Loan Agreement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{escape_html, escape_or_dash, filename_fragment, format_optional_amount};
use super::lenient;
use super::{
    BorrowerInfo, CompanyInfo, DocumentBinding, DocumentKind, DocumentPayload, DocumentRequest,
    EmailDispatch, LoanSummary,
};

pub const CONTENT_MARKER: &str = "loan-agreement-document";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgreementTerms {
    #[serde(deserialize_with = "lenient::amount")]
    pub sanctioned_amount: Option<f64>,
    #[serde(deserialize_with = "lenient::count")]
    pub tenure_days: Option<u32>,
    #[serde(deserialize_with = "lenient::amount")]
    pub interest_rate: Option<f64>,
    #[serde(deserialize_with = "lenient::amount")]
    pub processing_fee: Option<f64>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub penal_charges: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanAgreementDocument {
    #[serde(deserialize_with = "lenient::or_default")]
    pub company: CompanyInfo,
    #[serde(deserialize_with = "lenient::or_default")]
    pub loan: LoanSummary,
    #[serde(deserialize_with = "lenient::or_default")]
    pub borrower: BorrowerInfo,
    #[serde(deserialize_with = "lenient::or_default")]
    pub terms: AgreementTerms,
    #[serde(deserialize_with = "lenient::or_default")]
    pub clauses: Vec<String>,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub generated_at: Option<DateTime<Utc>>,
}

pub fn binding() -> DocumentBinding {
    DocumentBinding {
        kind: DocumentKind::LoanAgreement,
        content_marker: CONTENT_MARKER,
        email: EmailDispatch::Live,
        filename,
    }
}

fn filename(payload: &DocumentPayload, request: &DocumentRequest) -> String {
    format!("Loan_Agreement_{}.pdf", filename_fragment(payload, request))
}

pub(crate) fn render_body(doc: &LoanAgreementDocument) -> String {
    let clauses: String = doc
        .clauses
        .iter()
        .map(|clause| format!("<li>{}</li>", escape_html(clause)))
        .collect();

    let tenure = doc
        .terms
        .tenure_days
        .map(|days| format!("{} days", days))
        .unwrap_or_else(|| "-".to_string());
    let rate = doc
        .terms
        .interest_rate
        .map(|rate| format!("{:.2}% per day", rate))
        .unwrap_or_else(|| "-".to_string());

    format!(
        r#"<section class="agreement-terms">
  <h3>Principal terms</h3>
  <table>
    <tr><th>Sanctioned amount</th><td>{}</td></tr>
    <tr><th>Tenure</th><td>{}</td></tr>
    <tr><th>Rate of interest</th><td>{}</td></tr>
    <tr><th>Processing fee</th><td>{}</td></tr>
    <tr><th>Penal charges</th><td>{}</td></tr>
  </table>
</section>
<section class="agreement-clauses">
  <h3>Terms and conditions</h3>
  <ol>{}</ol>
</section>
<section class="agreement-signatures">
  <div class="signature">For {}</div>
  <div class="signature">Borrower: {}</div>
</section>"#,
        format_optional_amount(doc.terms.sanctioned_amount),
        tenure,
        rate,
        format_optional_amount(doc.terms.processing_fee),
        escape_or_dash(doc.terms.penal_charges.as_deref()),
        clauses,
        escape_or_dash(Some(doc.company.name.as_str())),
        escape_or_dash(Some(doc.borrower.name.as_str())),
    )
}
