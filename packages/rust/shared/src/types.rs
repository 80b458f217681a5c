//! Core domain types for coursesmith.

use serde::{Deserialize, Serialize};

/// Sentinel title used when a page has no `<title>` element.
pub const NO_TITLE: &str = "No title found";

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// A fetched and extracted web page. Immutable after construction and scoped
/// to a single pipeline run — nothing is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// The URL the page was fetched from.
    pub url: String,
    /// Page title, or [`NO_TITLE`] when absent.
    pub title: String,
    /// Cleaned plain-text body (empty when the page has no `<body>`).
    pub text: String,
    /// Raw outbound hyperlink targets, in document order (relative or
    /// absolute, unresolved, unfiltered).
    pub links: Vec<String>,
}

impl Page {
    /// Title and text in the block format the pipeline aggregates.
    pub fn contents(&self) -> String {
        format!(
            "Webpage Title: {}\nWebpage Content:\n{}\n",
            self.title, self.text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contents_formats_title_and_text() {
        let page = Page {
            url: "https://example.com/".into(),
            title: "Example".into(),
            text: "Hello\nWorld".into(),
            links: vec!["/a".into()],
        };

        let contents = page.contents();
        assert!(contents.starts_with("Webpage Title: Example\n"));
        assert!(contents.contains("Webpage Content:\nHello\nWorld\n"));
    }

    #[test]
    fn page_serializes() {
        let page = Page {
            url: "https://example.com/".into(),
            title: NO_TITLE.into(),
            text: String::new(),
            links: vec![],
        };
        let json = serde_json::to_string(&page).expect("serialize");
        let parsed: Page = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.title, NO_TITLE);
        assert!(parsed.links.is_empty());
    }
}
