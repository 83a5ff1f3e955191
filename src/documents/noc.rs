//! No-Objection / No-Dues Certificate (NOC) issued when a loan is closed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{escape_html, escape_or_dash, filename_fragment, format_optional_amount};
use super::lenient;
use super::{
    BorrowerInfo, CompanyInfo, DocumentBinding, DocumentKind, DocumentPayload, DocumentRequest,
    EmailDispatch, LoanSummary,
};

pub const CONTENT_MARKER: &str = "noc-document";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClosureDetails {
    #[serde(deserialize_with = "lenient::optional_text")]
    pub certificate_number: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub closed_on: Option<String>,
    #[serde(deserialize_with = "lenient::amount")]
    pub total_paid: Option<f64>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NocDocument {
    #[serde(deserialize_with = "lenient::or_default")]
    pub company: CompanyInfo,
    #[serde(deserialize_with = "lenient::or_default")]
    pub loan: LoanSummary,
    #[serde(deserialize_with = "lenient::or_default")]
    pub borrower: BorrowerInfo,
    #[serde(deserialize_with = "lenient::or_default")]
    pub closure: ClosureDetails,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub generated_at: Option<DateTime<Utc>>,
}

pub fn binding() -> DocumentBinding {
    DocumentBinding {
        kind: DocumentKind::Noc,
        content_marker: CONTENT_MARKER,
        // Dispatch endpoint not live on the backend yet.
        email: EmailDispatch::ComingSoon,
        filename,
    }
}

fn filename(payload: &DocumentPayload, request: &DocumentRequest) -> String {
    format!("NOC_{}.pdf", filename_fragment(payload, request))
}

pub(crate) fn render_body(doc: &NocDocument) -> String {
    let application = escape_or_dash(doc.loan.application_number.as_deref());
    let remarks = doc
        .closure
        .remarks
        .as_deref()
        .map(|text| format!("<p class=\"noc-remarks\">{}</p>", escape_html(text)))
        .unwrap_or_default();

    format!(
        r#"<section class="noc-certificate">
  <h3>No Dues Certificate</h3>
  <p>Certificate No: {}</p>
  <p>This is to certify that {} has repaid in full the loan bearing application number {}.
  The loan was closed on {} with a total repayment of {}, and no dues remain outstanding
  against the borrower for this loan.</p>
  {}
</section>"#,
        escape_or_dash(doc.closure.certificate_number.as_deref()),
        escape_or_dash(Some(doc.borrower.name.as_str())),
        application,
        escape_or_dash(doc.closure.closed_on.as_deref()),
        format_optional_amount(doc.closure.total_paid),
        remarks,
    )
}
