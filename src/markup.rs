//! Markup helpers for locating the printable region of a rendered document
//! and turning it into a standalone HTML page for the PDF backend.

use regex::Regex;

const PRINT_STYLESHEET: &str = r#"
  body { font-family: "Helvetica Neue", Arial, sans-serif; font-size: 12px; color: #111; margin: 0; padding: 24px; }
  h1, h2, h3 { margin: 12px 0 6px; }
  table { width: 100%; border-collapse: collapse; margin: 8px 0; }
  th, td { border: 1px solid #999; padding: 4px 6px; text-align: left; vertical-align: top; }
  .document-header { border-bottom: 2px solid #333; margin-bottom: 12px; }
  .signature { display: inline-block; width: 45%; margin-top: 48px; border-top: 1px solid #333; }
  @page { size: A4; margin: 16mm; }
"#;

/// Outer HTML of the first element whose `class` attribute contains `class_name`
/// as a whole token. Nested elements with the same tag name are matched so the
/// returned fragment is balanced.
pub fn find_element_by_class(html: &str, class_name: &str) -> Option<String> {
    let open_tag = Regex::new(
        r#"<([A-Za-z][A-Za-z0-9-]*)\b[^>]*?\bclass\s*=\s*(?:"([^"]*)"|'([^']*)')[^>]*>"#,
    )
    .ok()?;

    let found = open_tag.captures_iter(html).find(|caps| {
        caps.get(2)
            .or_else(|| caps.get(3))
            .map(|classes| classes.as_str().split_whitespace().any(|c| c == class_name))
            .unwrap_or(false)
    })?;

    let whole = found.get(0)?;
    let tag = found.get(1)?.as_str();
    if whole.as_str().ends_with("/>") {
        return Some(whole.as_str().to_string());
    }

    let same_tag = Regex::new(&format!(r"(?i)<(/?){}\b[^>]*>", regex::escape(tag))).ok()?;
    let mut depth = 1usize;
    for caps in same_tag.captures_iter(&html[whole.end()..]) {
        let m = caps.get(0)?;
        let closing = caps.get(1).map(|c| !c.as_str().is_empty()).unwrap_or(false);
        if closing {
            depth -= 1;
            if depth == 0 {
                let end = whole.end() + m.end();
                return Some(html[whole.start()..end].to_string());
            }
        } else if !m.as_str().ends_with("/>") {
            depth += 1;
        }
    }

    None
}

/// Wrap a fragment in a complete HTML document with the print stylesheet inlined.
pub fn standalone_document(fragment: &str, title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        crate::documents::common::escape_html(title),
        PRINT_STYLESHEET,
        fragment
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_nested_element() {
        let html = r#"<main><nav>menu</nav><div class="page kfs-document" id="doc"><div class="inner"><p>Hi</p></div><div>tail</div></div><footer>x</footer></main>"#;
        let found = find_element_by_class(html, "kfs-document").unwrap();
        assert_eq!(
            found,
            r#"<div class="page kfs-document" id="doc"><div class="inner"><p>Hi</p></div><div>tail</div></div>"#
        );
    }

    #[test]
    fn test_class_must_match_whole_token() {
        let html = r#"<div class="kfs-document-wrapper">x</div>"#;
        assert!(find_element_by_class(html, "kfs-document").is_none());
    }

    #[test]
    fn test_single_quoted_class_and_missing_close() {
        assert_eq!(
            find_element_by_class("<section class='noc-document'>ok</section>", "noc-document")
                .as_deref(),
            Some("<section class='noc-document'>ok</section>")
        );
        assert!(find_element_by_class("<div class=\"noc-document\">unterminated", "noc-document")
            .is_none());
    }

    #[test]
    fn test_standalone_document_wraps_fragment() {
        let page = standalone_document("<div>body</div>", "KFS <42>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>KFS &lt;42&gt;</title>"));
        assert!(page.contains("<div>body</div>"));
        assert!(page.contains("@page"));
    }
}
