//! Presentational templates.
//!
//! A template turns a loaded payload into print-ready markup. It holds no
//! state: the same payload always renders the same markup. The printable
//! region is wrapped in an element carrying the binding's content marker so
//! the export actions can find it again.

use crate::documents::common::{escape_or_dash, format_document_date, format_optional_amount};
use crate::documents::{self, DocumentPayload};

/// Renders a payload into HTML.
pub trait DocumentTemplate: Send + Sync {
    fn render(&self, payload: &DocumentPayload, content_marker: &str) -> String;
}

/// Stock HTML template used for all four document kinds.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlTemplate;

impl HtmlTemplate {
    fn title(payload: &DocumentPayload) -> &'static str {
        match payload {
            DocumentPayload::Kfs(_) => "Key Facts Statement",
            DocumentPayload::Noc(_) => "No Objection Certificate",
            DocumentPayload::LoanAgreement(_) => "Loan Agreement",
            DocumentPayload::ExtensionLetter(_) => "Loan Tenure Extension Letter",
        }
    }

    fn header(payload: &DocumentPayload) -> String {
        let company = payload.company();
        let registration = match (&company.cin, &company.rbi_registration_number) {
            (Some(cin), Some(rbi)) => format!(
                "<p>CIN: {} | RBI Reg. No: {}</p>",
                escape_or_dash(Some(cin.as_str())),
                escape_or_dash(Some(rbi.as_str()))
            ),
            (Some(cin), None) => {
                format!("<p>CIN: {}</p>", escape_or_dash(Some(cin.as_str())))
            }
            (None, Some(rbi)) => {
                format!("<p>RBI Reg. No: {}</p>", escape_or_dash(Some(rbi.as_str())))
            }
            (None, None) => String::new(),
        };
        let generated = payload
            .generated_at()
            .map(|at| format!("<p class=\"generated-at\">Date: {}</p>", format_document_date(&at)))
            .unwrap_or_default();

        format!(
            r#"<header class="document-header">
  <h1>{}</h1>
  <p>{}</p>
  {}
  <p>{} | {}</p>
  <h2>{}</h2>
  {}
</header>"#,
            escape_or_dash(Some(company.name.as_str())),
            escape_or_dash(company.address.as_deref()),
            registration,
            escape_or_dash(company.email.as_deref()),
            escape_or_dash(company.phone.as_deref()),
            Self::title(payload),
            generated,
        )
    }

    fn parties(payload: &DocumentPayload) -> String {
        let loan = payload.loan();
        let borrower = payload.borrower();
        let loan_id = loan
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());

        format!(
            r#"<section class="document-parties">
  <table>
    <tr><th>Borrower</th><td>{}</td><th>Application No.</th><td>{}</td></tr>
    <tr><th>Email</th><td>{}</td><th>Loan ID</th><td>{}</td></tr>
    <tr><th>Phone</th><td>{}</td><th>Loan amount</th><td>{}</td></tr>
    <tr><th>PAN</th><td>{}</td><th>Disbursed on</th><td>{}</td></tr>
    <tr><th>Address</th><td>{}</td><th>Due date</th><td>{}</td></tr>
  </table>
</section>"#,
            escape_or_dash(Some(borrower.name.as_str())),
            escape_or_dash(loan.application_number.as_deref()),
            escape_or_dash(borrower.email.as_deref()),
            loan_id,
            escape_or_dash(borrower.phone.as_deref()),
            format_optional_amount(loan.loan_amount),
            escape_or_dash(borrower.pan_number.as_deref()),
            escape_or_dash(loan.disbursed_on.as_deref()),
            escape_or_dash(borrower.address.as_deref()),
            escape_or_dash(loan.due_date.as_deref()),
        )
    }
}

impl DocumentTemplate for HtmlTemplate {
    fn render(&self, payload: &DocumentPayload, content_marker: &str) -> String {
        let body = match payload {
            DocumentPayload::Kfs(doc) => documents::kfs::render_body(doc),
            DocumentPayload::Noc(doc) => documents::noc::render_body(doc),
            DocumentPayload::LoanAgreement(doc) => documents::loan_agreement::render_body(doc),
            DocumentPayload::ExtensionLetter(doc) => {
                documents::extension_letter::render_body(doc)
            }
        };

        format!(
            "<div class=\"document-viewer\">\n<div class=\"{}\">\n{}\n{}\n{}\n</div>\n</div>",
            escape_or_dash(Some(content_marker)),
            Self::header(payload),
            Self::parties(payload),
            body,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{BorrowerInfo, DocumentBinding, DocumentKind, NocDocument};
    use crate::markup::find_element_by_class;

    #[test]
    fn test_rendered_markup_contains_marker_for_every_kind() {
        for kind in DocumentKind::ALL {
            let payload = DocumentPayload::from_value(kind, serde_json::json!({})).unwrap();
            let marker = DocumentBinding::for_kind(kind).content_marker;
            let html = HtmlTemplate.render(&payload, marker);
            let region = find_element_by_class(&html, marker).unwrap();
            assert!(region.contains("document-header"));
        }
    }

    #[test]
    fn test_borrower_fields_are_escaped() {
        let payload = DocumentPayload::Noc(NocDocument {
            borrower: BorrowerInfo {
                name: "<img src=x onerror=alert(1)>".to_string(),
                ..Default::default()
            },
            ..Default::default()
        });
        let html = HtmlTemplate.render(&payload, "noc-document");
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }
}
