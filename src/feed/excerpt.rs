//! Body excerpt extraction.
//!
//! A paragraph is the text of a `<p>`, `<blockquote>` or `<li>` element.
//! Bodies without any of those are treated as plain text and split on blank
//! lines.

use scraper::{ElementRef, Html, Selector};
use unicode_segmentation::UnicodeSegmentation;

/// Shown when neither the body nor the listing has any text.
pub const PLACEHOLDER: &str = "Article snippet unavailable.";

const PARAGRAPH_SELECTOR: &str = "p, blockquote, li";

/// Limits applied to each excerpt.
#[derive(Debug, Clone, Copy)]
pub struct ExcerptLimits {
    pub max_paragraphs: usize,
    pub max_paragraph_chars: usize,
}

impl Default for ExcerptLimits {
    fn default() -> Self {
        Self {
            max_paragraphs: 3,
            max_paragraph_chars: 600,
        }
    }
}

/// Extract at most `max` non-empty paragraphs from a body.
pub fn extract_paragraphs(body_html: &str, max: usize) -> Vec<String> {
    if body_html.trim().is_empty() || max == 0 {
        return Vec::new();
    }

    let document = Html::parse_fragment(body_html);
    let selector = match Selector::parse(PARAGRAPH_SELECTOR) {
        Ok(selector) => selector,
        Err(e) => {
            log::error!("Invalid paragraph selector: {e:?}");
            return Vec::new();
        }
    };

    let mut structural = document.select(&selector).peekable();
    if structural.peek().is_none() {
        let text: String = document.root_element().text().collect();
        return split_blank_lines(&text, max);
    }

    structural
        .filter(|node| !inside_paragraph(node))
        .map(|node| collapse_whitespace(&node.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .take(max)
        .collect()
}

/// Paragraphs for a feed item, with the summary and placeholder fallbacks.
pub fn excerpt(body_html: &str, summary: &str, limits: ExcerptLimits) -> Vec<String> {
    let mut paragraphs = extract_paragraphs(body_html, limits.max_paragraphs);

    if paragraphs.is_empty() {
        let summary = collapse_whitespace(summary);
        paragraphs.push(if summary.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            summary
        });
    }

    paragraphs
        .into_iter()
        .map(|p| truncate_graphemes(&p, limits.max_paragraph_chars))
        .collect()
}

/// Render paragraphs as an HTML fragment.
///
/// Paragraph text is escaped here; the whole fragment is escaped again when
/// it is written into the feed.
pub fn to_html(paragraphs: &[String]) -> String {
    paragraphs
        .iter()
        .map(|p| format!("<p>{}</p>", quick_xml::escape::escape(p.as_str())))
        .collect()
}

/// True when an enclosing element is itself a paragraph, so quoted or
/// listed `<p>` children are not counted twice.
fn inside_paragraph(node: &ElementRef<'_>) -> bool {
    node.ancestors().any(|ancestor| {
        ancestor
            .value()
            .as_element()
            .is_some_and(|el| matches!(el.name(), "p" | "blockquote" | "li"))
    })
}

fn split_blank_lines(text: &str, max: usize) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(collapse_whitespace(&current.join(" ")));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(collapse_whitespace(&current.join(" ")));
    }

    paragraphs.retain(|p| !p.is_empty());
    paragraphs.truncate(max);
    paragraphs
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_graphemes(text: &str, max: usize) -> String {
    if max == 0 {
        return text.to_string();
    }
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(max).collect();
    if graphemes.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_paragraphs_capped() {
        let body = "<p>one</p><p>two</p><p>three</p><p>four</p><p>five</p>";
        assert_eq!(extract_paragraphs(body, 3), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_nested_markup_is_flattened() {
        let body = "<p>Use <code>cargo</code>\n   and <a href=\"#\">friends</a></p>";
        assert_eq!(extract_paragraphs(body, 3), vec!["Use cargo and friends"]);
    }

    #[test]
    fn test_blockquote_and_list_items_count() {
        let body = "<h2>Intro</h2><blockquote>quoted</blockquote><ul><li>first</li><li></li></ul>";
        assert_eq!(extract_paragraphs(body, 5), vec!["quoted", "first"]);
    }

    #[test]
    fn test_quoted_paragraph_counted_once() {
        let body = "<blockquote><p>quoted text</p></blockquote><ul><li><p>item</p></li></ul><p>after</p>";
        assert_eq!(extract_paragraphs(body, 5), vec!["quoted text", "item", "after"]);
    }

    #[test]
    fn test_plain_text_split_on_blank_lines() {
        let body = "First line\ncontinues\n\nSecond\n\n\nThird\n\nFourth";
        assert_eq!(
            extract_paragraphs(body, 3),
            vec!["First line continues", "Second", "Third"]
        );
    }

    #[test]
    fn test_empty_body_uses_summary_then_placeholder() {
        let limits = ExcerptLimits::default();
        assert_eq!(excerpt("", "  short  intro ", limits), vec!["short intro"]);
        assert_eq!(excerpt("   ", "", limits), vec![PLACEHOLDER]);
    }

    #[test]
    fn test_long_paragraph_truncated() {
        let limits = ExcerptLimits {
            max_paragraphs: 3,
            max_paragraph_chars: 5,
        };
        assert_eq!(excerpt("<p>abcdefgh</p><p>abc</p>", "", limits), vec!["abcde…", "abc"]);
    }

    #[test]
    fn test_truncation_respects_graphemes() {
        assert_eq!(truncate_graphemes("héllo wörld", 6), "héllo…");
        assert_eq!(truncate_graphemes("👍🏽👍🏽", 1), "👍🏽…");
    }

    #[test]
    fn test_to_html_escapes_text() {
        let html = to_html(&["a < b & c".to_string(), "x".to_string()]);
        assert_eq!(html, "<p>a &lt; b &amp; c</p><p>x</p>");
    }
}
