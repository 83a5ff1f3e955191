//! Common utilities shared by the document kinds.
//!
//! Filename fragments, ordinal words and the value formatting used by the
//! templates.

use chrono::{DateTime, Utc};

use super::{DocumentPayload, DocumentRequest};

/// Format a timestamp as a printed date (e.g., "18 October 2026").
pub fn format_document_date(at: &DateTime<Utc>) -> String {
    at.format("%-d %B %Y").to_string()
}

/// Format an amount in rupees with Indian digit grouping (e.g., "₹1,25,000.00").
pub fn format_amount(amount: f64) -> String {
    let negative = amount < 0.0;
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let grouped = if whole.len() > 3 {
        let (head, tail) = whole.split_at(whole.len() - 3);
        let mut groups = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (left, right) = rest.split_at(rest.len() - 2);
            groups.push(right);
            rest = left;
        }
        groups.push(rest);
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    } else {
        whole.to_string()
    };

    format!("{}₹{}.{}", if negative { "-" } else { "" }, grouped, fraction)
}

pub fn format_optional_amount(amount: Option<f64>) -> String {
    amount.map(format_amount).unwrap_or_else(|| "-".to_string())
}

/// Escape text for interpolation into HTML.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escape an optional value, rendering a dash when absent or blank.
pub fn escape_or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => escape_html(text),
        _ => "-".to_string(),
    }
}

/// Ordinal word for an extension number; beyond the fourth the bare number is used.
pub fn ordinal_word(number: u32) -> String {
    match number {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        4 => "4th".to_string(),
        other => other.to_string(),
    }
}

/// Human part of an export filename: the application number, or the raw loan id.
pub fn filename_fragment(payload: &DocumentPayload, request: &DocumentRequest) -> String {
    payload
        .loan()
        .application_number
        .as_deref()
        .map(sanitize_filename::sanitize)
        .map(|name| name.trim().replace(' ', "_"))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| request.loan_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{KfsDocument, LoanSummary};
    use chrono::TimeZone;

    fn kfs_with_application(number: Option<&str>) -> DocumentPayload {
        DocumentPayload::Kfs(KfsDocument {
            loan: LoanSummary {
                application_number: number.map(str::to_string),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    #[test]
    fn test_ordinal_words() {
        let words: Vec<String> = (1..=5).map(ordinal_word).collect();
        assert_eq!(words, vec!["1st", "2nd", "3rd", "4th", "5"]);
        assert_eq!(ordinal_word(11), "11");
    }

    #[test]
    fn test_amount_grouping() {
        assert_eq!(format_amount(0.0), "₹0.00");
        assert_eq!(format_amount(999.5), "₹999.50");
        assert_eq!(format_amount(1000.0), "₹1,000.00");
        assert_eq!(format_amount(125000.0), "₹1,25,000.00");
        assert_eq!(format_amount(12345678.9), "₹1,23,45,678.90");
        assert_eq!(format_amount(-2500.0), "-₹2,500.00");
        assert_eq!(format_optional_amount(None), "-");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_or_dash(Some("  ")), "-");
        assert_eq!(escape_or_dash(None), "-");
    }

    #[test]
    fn test_document_date() {
        let at = Utc.with_ymd_and_hms(2026, 10, 8, 9, 30, 0).unwrap();
        assert_eq!(format_document_date(&at), "8 October 2026");
    }

    #[test]
    fn test_filename_fragment_falls_back_to_loan_id() {
        let request = DocumentRequest::new(981);
        assert_eq!(
            filename_fragment(&kfs_with_application(Some("APP2024001")), &request),
            "APP2024001"
        );
        assert_eq!(filename_fragment(&kfs_with_application(None), &request), "981");
        assert_eq!(filename_fragment(&kfs_with_application(Some("   ")), &request), "981");
        assert_eq!(
            filename_fragment(&kfs_with_application(Some("APP/12 A")), &request),
            "APP12_A"
        );
    }
}
