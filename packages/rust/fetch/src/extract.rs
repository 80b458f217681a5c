//! HTML content extraction: title, cleaned body text, and outbound links.
//!
//! Pure, synchronous transforms over parsed HTML — no I/O. The cleaning
//! policy drops `script`, `style`, `img`, and `input` subtrees and joins the
//! remaining text nodes with newline separators, each trimmed.

use scraper::{Html, Node, Selector};

use coursesmith_shared::{NO_TITLE, Page};

/// Elements removed from the body before text extraction.
const STRIPPED_TAGS: &[&str] = &["script", "style", "img", "input"];

/// Parse raw HTML into a [`Page`] for the given source URL.
pub fn extract_page(url: &str, html: &str) -> Page {
    let doc = Html::parse_document(html);

    Page {
        url: url.to_string(),
        title: extract_title(&doc),
        text: extract_text(&doc),
        links: extract_links(&doc),
    }
}

/// The `<title>` text, or the [`NO_TITLE`] sentinel when absent.
pub fn extract_title(doc: &Html) -> String {
    let title_sel = Selector::parse("title").unwrap();

    doc.select(&title_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// Cleaned plain text of the `<body>`, or the empty string when there is none.
pub fn extract_text(doc: &Html) -> String {
    let body_sel = Selector::parse("body").unwrap();

    let Some(body) = doc.select(&body_sel).next() else {
        return String::new();
    };

    let mut parts: Vec<String> = Vec::new();

    for node in body.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let in_stripped = node.ancestors().any(|a| {
            matches!(a.value(), Node::Element(el) if STRIPPED_TAGS.contains(&el.name()))
        });
        if in_stripped {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed.to_string());
        }
    }

    parts.join("\n")
}

/// Every non-empty `href` of every anchor, raw and in document order.
pub fn extract_links(doc: &Html) -> Vec<String> {
    let anchor_sel = Selector::parse("a").unwrap();

    doc.select(&anchor_sel)
        .filter_map(|el| el.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn title_extracted() {
        let doc = parse("<html><head><title> Learn Things </title></head><body></body></html>");
        assert_eq!(extract_title(&doc), "Learn Things");
    }

    #[test]
    fn missing_title_yields_sentinel() {
        let doc = parse("<html><body><p>No head here.</p></body></html>");
        assert_eq!(extract_title(&doc), NO_TITLE);
    }

    #[test]
    fn body_text_joined_with_newlines() {
        let doc = parse(
            "<html><body><h1>Heading</h1><p>First paragraph.</p><p>Second paragraph.</p></body></html>",
        );
        assert_eq!(
            extract_text(&doc),
            "Heading\nFirst paragraph.\nSecond paragraph."
        );
    }

    #[test]
    fn script_style_img_input_stripped() {
        let doc = parse(
            r#"<html><body>
                <p>Visible.</p>
                <script>console.log("hidden");</script>
                <style>.x { color: red; }</style>
                <img src="pic.png" alt="">
                <form><input value="field"></form>
                <p>Also visible.</p>
            </body></html>"#,
        );

        let text = extract_text(&doc);
        assert!(text.contains("Visible."));
        assert!(text.contains("Also visible."));
        assert!(!text.contains("console.log"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn no_body_yields_empty_text() {
        let doc = parse("<html><head><title>Only a head</title></head></html>");
        assert_eq!(extract_text(&doc), "");
    }

    #[test]
    fn links_are_raw_and_ordered() {
        let doc = parse(
            r##"<html><body>
                <a href="/relative">Rel</a>
                <a href="https://example.com/abs">Abs</a>
                <a href="#frag">Frag</a>
            </body></html>"##,
        );

        assert_eq!(
            extract_links(&doc),
            vec!["/relative", "https://example.com/abs", "#frag"]
        );
    }

    #[test]
    fn anchors_without_href_skipped() {
        let doc = parse(r#"<html><body><a name="top">No href</a><a href="">Empty</a><a href="/ok">Ok</a></body></html>"#);

        let links = extract_links(&doc);
        assert_eq!(links, vec!["/ok"]);
        assert!(links.iter().all(|l| !l.is_empty()));
    }

    #[test]
    fn extract_page_combines_everything() {
        let page = extract_page(
            "https://example.com/course",
            r#"<html><head><title>Course</title></head>
               <body><p>Welcome.</p><a href="/lesson-1">Lesson 1</a></body></html>"#,
        );

        assert_eq!(page.url, "https://example.com/course");
        assert_eq!(page.title, "Course");
        assert_eq!(page.text, "Welcome.\nLesson 1");
        assert_eq!(page.links, vec!["/lesson-1"]);
    }
}
