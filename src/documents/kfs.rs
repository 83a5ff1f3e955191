//! Key Facts Statement (KFS).
//!
//! The regulatory disclosure handed to a borrower before disbursal: interest,
//! every fee and charge, and the repayment schedule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{escape_html, escape_or_dash, filename_fragment, format_optional_amount};
use super::lenient;
use super::{
    BorrowerInfo, CompanyInfo, DocumentBinding, DocumentKind, DocumentPayload, DocumentRequest,
    EmailDispatch, LoanSummary,
};

pub const CONTENT_MARKER: &str = "kfs-document";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterestDetails {
    #[serde(deserialize_with = "lenient::amount")]
    pub rate_per_day: Option<f64>,
    #[serde(deserialize_with = "lenient::amount")]
    pub annual_rate: Option<f64>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub rate_type: Option<String>,
    #[serde(deserialize_with = "lenient::amount")]
    pub apr: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Charge {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::amount")]
    pub amount: Option<f64>,
    #[serde(deserialize_with = "lenient::amount")]
    pub gst: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeeBreakdown {
    #[serde(deserialize_with = "lenient::or_default")]
    pub charges: Vec<Charge>,
    #[serde(deserialize_with = "lenient::amount")]
    pub total_charges: Option<f64>,
    #[serde(deserialize_with = "lenient::amount")]
    pub net_disbursal: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Installment {
    #[serde(deserialize_with = "lenient::number")]
    pub number: u32,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub due_date: Option<String>,
    #[serde(deserialize_with = "lenient::amount")]
    pub principal: Option<f64>,
    #[serde(deserialize_with = "lenient::amount")]
    pub interest: Option<f64>,
    #[serde(deserialize_with = "lenient::amount")]
    pub total: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepaymentSchedule {
    #[serde(deserialize_with = "lenient::or_default")]
    pub installments: Vec<Installment>,
    #[serde(deserialize_with = "lenient::amount")]
    pub total_repayable: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KfsDocument {
    #[serde(deserialize_with = "lenient::or_default")]
    pub company: CompanyInfo,
    #[serde(deserialize_with = "lenient::or_default")]
    pub loan: LoanSummary,
    #[serde(deserialize_with = "lenient::or_default")]
    pub borrower: BorrowerInfo,
    #[serde(deserialize_with = "lenient::or_default")]
    pub interest: InterestDetails,
    #[serde(deserialize_with = "lenient::or_default")]
    pub fees: FeeBreakdown,
    #[serde(deserialize_with = "lenient::or_default")]
    pub repayment: RepaymentSchedule,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub generated_at: Option<DateTime<Utc>>,
}

pub fn binding() -> DocumentBinding {
    DocumentBinding {
        kind: DocumentKind::Kfs,
        content_marker: CONTENT_MARKER,
        email: EmailDispatch::Live,
        filename,
    }
}

fn filename(payload: &DocumentPayload, request: &DocumentRequest) -> String {
    format!("KFS_{}.pdf", filename_fragment(payload, request))
}

fn percent(value: Option<f64>) -> String {
    value
        .map(|rate| format!("{:.2}%", rate))
        .unwrap_or_else(|| "-".to_string())
}

/// Kind-specific sections of the KFS.
pub(crate) fn render_body(doc: &KfsDocument) -> String {
    let charges: String = doc
        .fees
        .charges
        .iter()
        .map(|charge| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&charge.name),
                format_optional_amount(charge.amount),
                format_optional_amount(charge.gst),
            )
        })
        .collect();

    let installments: String = doc
        .repayment
        .installments
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                row.number,
                escape_or_dash(row.due_date.as_deref()),
                format_optional_amount(row.principal),
                format_optional_amount(row.interest),
                format_optional_amount(row.total),
            )
        })
        .collect();

    format!(
        r#"<section class="kfs-interest">
  <h3>Interest</h3>
  <table>
    <tr><th>Rate per day</th><td>{}</td></tr>
    <tr><th>Annual rate</th><td>{}</td></tr>
    <tr><th>Rate type</th><td>{}</td></tr>
    <tr><th>Annual percentage rate (APR)</th><td>{}</td></tr>
  </table>
</section>
<section class="kfs-fees">
  <h3>Fees and charges</h3>
  <table>
    <tr><th>Charge</th><th>Amount</th><th>GST</th></tr>
    {}
    <tr><th>Total charges</th><td colspan="2">{}</td></tr>
    <tr><th>Net disbursal</th><td colspan="2">{}</td></tr>
  </table>
</section>
<section class="kfs-repayment">
  <h3>Repayment schedule</h3>
  <table>
    <tr><th>#</th><th>Due date</th><th>Principal</th><th>Interest</th><th>Total</th></tr>
    {}
  </table>
  <p>Total amount repayable: {}</p>
</section>"#,
        percent(doc.interest.rate_per_day),
        percent(doc.interest.annual_rate),
        escape_or_dash(doc.interest.rate_type.as_deref()),
        percent(doc.interest.apr),
        charges,
        format_optional_amount(doc.fees.total_charges),
        format_optional_amount(doc.fees.net_disbursal),
        installments,
        format_optional_amount(doc.repayment.total_repayable),
    )
}
