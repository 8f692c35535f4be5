//! Content extraction
//!
//! Turns a fetched body into what gets persisted or delivered:
//! - the bytes unchanged
//! - the body re-serialized through the HTML parser
//! - the document title packaged with its URL

use crate::config::ExtractMode;
use scraper::{Html, Selector};

/// A page title together with the URL it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Text of the first `<title>` element, empty if there is none
    pub title: String,

    /// The source URL exactly as requested
    pub url: String,
}

/// Output of the extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedContent {
    /// HTML to be written to a file
    Document(Vec<u8>),

    /// Structured record for channel delivery
    Record(PageRecord),
}

impl ExtractedContent {
    /// Returns the document bytes, if this is a document
    pub fn as_document(&self) -> Option<&[u8]> {
        match self {
            Self::Document(bytes) => Some(bytes),
            Self::Record(_) => None,
        }
    }

    pub fn as_record(&self) -> Option<&PageRecord> {
        match self {
            Self::Record(record) => Some(record),
            Self::Document(_) => None,
        }
    }
}

/// Extracts content from a fetched body according to `mode`
///
/// # Arguments
///
/// * `raw` - The response body; never modified
/// * `mode` - What to produce
/// * `url` - Source URL, attached to title records
///
/// Bodies are decoded lossily: bytes that are not UTF-8 (a Latin-1 page,
/// say) become U+FFFD instead of failing the task. HTML parsing itself
/// never fails.
///
/// # Example
///
/// ```
/// use harvest::config::ExtractMode;
/// use harvest::pipeline::{extract, ExtractedContent};
///
/// let html = b"<html><head><title>Test</title></head><body></body></html>";
/// let content = extract(html, ExtractMode::Title, "https://example.com/");
/// assert_eq!(content.as_record().unwrap().title, "Test");
/// ```
pub fn extract(raw: &[u8], mode: ExtractMode, url: &str) -> ExtractedContent {
    match mode {
        ExtractMode::Raw => ExtractedContent::Document(raw.to_vec()),
        ExtractMode::Reparse => {
            let html = String::from_utf8_lossy(raw);
            ExtractedContent::Document(reserialize(&html).into_bytes())
        }
        ExtractMode::Title => {
            let document = Html::parse_document(&String::from_utf8_lossy(raw));
            ExtractedContent::Record(PageRecord {
                title: extract_title(&document),
                url: url.to_string(),
            })
        }
    }
}

/// Parses an HTML document and serializes it back out
///
/// The parser repairs missing structure, so the output always has
/// `<html>`, `<head>` and `<body>` elements.
pub fn reserialize(html: &str) -> String {
    Html::parse_document(html).html()
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    let Ok(title_selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}
