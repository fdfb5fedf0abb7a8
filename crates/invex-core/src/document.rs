//! Paragraph-structured document model.
//!
//! The extraction engine consumes an ordered sequence of paragraph-like text
//! blocks and does not care how they were produced. Converted invoices arrive
//! as Tika-style XHTML where each logical table row is one line inside a
//! `<p>` element, so HTML ingestion walks `<p>` blocks in document order and
//! turns interior markup into line breaks.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref P_BLOCK: Regex = Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").unwrap();
    static ref TAG: Regex = Regex::new(r"(?s)<[^>]+>").unwrap();
}

/// One paragraph-like text block; may contain multiple lines.
#[derive(Debug, Clone)]
pub struct Paragraph {
    pub text: String,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The paragraph's lines, in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// An ordered sequence of paragraphs from one converted document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    /// Build a document from converted HTML/XHTML by walking `<p>` elements
    /// in order. Interior tags become line breaks, basic entities are
    /// decoded, and empty blocks are dropped.
    pub fn from_html(html: &str) -> Self {
        let paragraphs = P_BLOCK
            .captures_iter(html)
            .map(|caps| decode_entities(&TAG.replace_all(&caps[1], "\n")))
            .filter(|text| !text.trim().is_empty())
            .map(Paragraph::new)
            .collect();
        Self { paragraphs }
    }

    /// Build a document from plain text, treating blank-line-separated blocks
    /// as paragraphs.
    pub fn from_text(text: &str) -> Self {
        let mut paragraphs = Vec::new();
        let mut current = String::new();

        for line in text.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    paragraphs.push(Paragraph::new(std::mem::take(&mut current)));
                }
            } else {
                if !current.is_empty() {
                    current.push('\n');
                }
                current.push_str(line);
            }
        }
        if !current.is_empty() {
            paragraphs.push(Paragraph::new(current));
        }

        Self { paragraphs }
    }

    /// All paragraph texts joined in original order; the document-wide
    /// fallback scope for metadata searches.
    pub fn full_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

/// Decode the handful of entities Tika output actually contains. `&nbsp;`
/// stays a non-breaking space here; normalization handles it downstream.
fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", "\u{00a0}")
        .replace("&#160;", "\u{00a0}")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_html_walks_paragraphs_in_order() {
        let html = r#"<html><body>
            <p>Invoice</p>
            <p>Invoice # 1234567890<br/>Currency: USD</p>
            <p class="table">EVT1 Fee SVC A 1 1.00 1.00 0.00 1.00</p>
        </body></html>"#;

        let doc = Document::from_html(html);
        assert_eq!(doc.paragraphs.len(), 3);
        assert_eq!(doc.paragraphs[0].text, "Invoice");
        assert_eq!(
            doc.paragraphs[1].lines().collect::<Vec<_>>(),
            vec!["Invoice # 1234567890", "Currency: USD"]
        );
    }

    #[test]
    fn test_from_html_decodes_entities() {
        let doc = Document::from_html("<p>Smith&nbsp;&amp;&nbsp;Co</p>");
        assert_eq!(doc.paragraphs[0].text, "Smith\u{00a0}&\u{00a0}Co");
    }

    #[test]
    fn test_from_html_drops_empty_blocks() {
        let doc = Document::from_html("<p>  </p><p>x</p><p></p>");
        assert_eq!(doc.paragraphs.len(), 1);
        assert_eq!(doc.paragraphs[0].text, "x");
    }

    #[test]
    fn test_from_text_splits_on_blank_lines() {
        let doc = Document::from_text("a\nb\n\nc\n\n\nd");
        let texts: Vec<_> = doc.paragraphs.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["a\nb", "c", "d"]);
    }

    #[test]
    fn test_full_text_preserves_order() {
        let doc = Document::from_text("first\n\nsecond");
        assert_eq!(doc.full_text(), "first\nsecond");
    }
}
