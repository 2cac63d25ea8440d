//! Report rendering
//!
//! Converts the writer stage's lightweight markup into HTML that can be
//! embedded in a page without further escaping.
//!
//! The transform runs in three passes:
//!
//! 1. **Sanitize** - strip every tag, decode basic entities, then escape the
//!    whole text. Escaping last means nothing from the input can survive as
//!    markup, including malformed or unterminated tags.
//! 2. **Classify** - each non-blank line becomes a [`RenderedBlock`]
//!    (heading, list item or paragraph), with inline emphasis and links
//!    applied to list items and paragraphs.
//! 3. **Group** - runs of list items are wrapped in a single `<ul>`.
//!
//! Only [`render`] can construct a [`SafeHtml`].

use regex::{Captures, Regex};
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*<>]+?)\*").unwrap());
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'{}|\\^`\[\]]+"#).unwrap());

const H1_CLASS: &str = "mt-5 mb-4 text-primary border-bottom pb-2";
const H2_CLASS: &str = "mt-4 mb-3 text-primary border-bottom pb-2";
const H3_CLASS: &str = "mt-4 mb-3 text-dark";
const LI_CLASS: &str = "mb-2";
const P_CLASS: &str = "mb-3 lh-lg";
const UL_CLASS: &str = "mb-4 ps-4";

/// Entities (possibly produced by escaping a URL) that never end a link
const TRAILING_ENTITIES: [&str; 5] = ["&quot;", "&#x27;", "&gt;", "&lt;", "&amp;"];

/// HTML that is safe to embed as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeHtml(String);

impl SafeHtml {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One classified line; inner text is already escaped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedBlock {
    Heading { level: u8, text: String },
    ListItem(String),
    Paragraph(String),
}

impl RenderedBlock {
    fn to_html(&self) -> String {
        match self {
            RenderedBlock::Heading { level, text } => {
                let class = match level {
                    1 => H1_CLASS,
                    2 => H2_CLASS,
                    _ => H3_CLASS,
                };
                format!("<h{level} class=\"{class}\">{text}</h{level}>")
            }
            RenderedBlock::ListItem(text) => format!("<li class=\"{LI_CLASS}\">{text}</li>"),
            RenderedBlock::Paragraph(text) => format!("<p class=\"{P_CLASS}\">{text}</p>"),
        }
    }
}

/// Render a report to HTML
pub fn render(report: &str) -> SafeHtml {
    let plain = decode_entities(&strip_tags(report));

    let blocks: Vec<RenderedBlock> = plain
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(classify_line)
        .collect();

    SafeHtml(group_blocks(&blocks))
}

/// Remove every `<...>` run
pub fn strip_tags(input: &str) -> String {
    TAG_RE.replace_all(input, "").into_owned()
}

/// Classify one trimmed, non-blank, unescaped line
pub fn classify_line(line: &str) -> RenderedBlock {
    if let Some(rest) = line.strip_prefix("### ") {
        RenderedBlock::Heading {
            level: 3,
            text: escape_html(rest),
        }
    } else if let Some(rest) = line.strip_prefix("## ") {
        RenderedBlock::Heading {
            level: 2,
            text: escape_html(rest),
        }
    } else if let Some(rest) = line.strip_prefix("# ") {
        RenderedBlock::Heading {
            level: 1,
            text: escape_html(rest),
        }
    } else if let Some(rest) = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
    {
        RenderedBlock::ListItem(format_inline(&escape_html(rest.trim())))
    } else {
        RenderedBlock::Paragraph(format_inline(&escape_html(line)))
    }
}

/// Emit blocks, wrapping consecutive list items in one `<ul>`
pub fn group_blocks(blocks: &[RenderedBlock]) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut items: Vec<String> = Vec::new();

    for block in blocks {
        match block {
            RenderedBlock::ListItem(_) => items.push(block.to_html()),
            _ => {
                if !items.is_empty() {
                    out.push(wrap_list(&items));
                    items.clear();
                }
                out.push(block.to_html());
            }
        }
    }
    if !items.is_empty() {
        out.push(wrap_list(&items));
    }

    out.join("\n")
}

fn wrap_list(items: &[String]) -> String {
    format!("<ul class=\"{UL_CLASS}\">{}</ul>", items.join("\n"))
}

/// Bold, then italic, then bare links. Input must already be escaped.
fn format_inline(escaped: &str) -> String {
    let text = BOLD_RE.replace_all(escaped, "<strong>${1}</strong>");
    let text = ITALIC_RE.replace_all(&text, "<em>${1}</em>");
    URL_RE
        .replace_all(&text, |caps: &Captures| {
            let (url, trailing) = split_trailing(&caps[0]);
            format!(
                "<a href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"text-decoration-underline\">{url}</a>{trailing}"
            )
        })
        .into_owned()
}

/// Split sentence punctuation and escaped quotes off the end of a URL match
fn split_trailing(matched: &str) -> (&str, &str) {
    let mut end = matched.len();
    loop {
        let head = &matched[..end];
        if let Some(entity) = TRAILING_ENTITIES.iter().find(|e| head.ends_with(**e)) {
            end -= entity.len();
        } else if head.ends_with(&['.', ',', ';', ':', '!', '?', ')'][..]) {
            end -= 1;
        } else {
            break;
        }
    }
    matched.split_at(end)
}

/// Escape text for HTML element and attribute content
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Visible text of rendered HTML, one entry per line
    fn text_content(html: &str) -> Vec<String> {
        decode_entities(&strip_tags(html))
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }

    #[rstest]
    #[case("### Deep Dive", RenderedBlock::Heading { level: 3, text: "Deep Dive".into() })]
    #[case("## Market Analysis", RenderedBlock::Heading { level: 2, text: "Market Analysis".into() })]
    #[case("# Executive Summary", RenderedBlock::Heading { level: 1, text: "Executive Summary".into() })]
    #[case("- plain item", RenderedBlock::ListItem("plain item".into()))]
    #[case("* star item", RenderedBlock::ListItem("star item".into()))]
    #[case("#hashtag", RenderedBlock::Paragraph("#hashtag".into()))]
    #[case("-dash", RenderedBlock::Paragraph("-dash".into()))]
    #[case("Just text", RenderedBlock::Paragraph("Just text".into()))]
    fn test_classify_line(#[case] line: &str, #[case] expected: RenderedBlock) {
        assert_eq!(classify_line(line), expected);
    }

    #[test]
    fn test_heading_example() {
        let html = render("## Market Analysis");
        assert_eq!(
            html.as_str(),
            "<h2 class=\"mt-4 mb-3 text-primary border-bottom pb-2\">Market Analysis</h2>"
        );
    }

    #[test]
    fn test_bold_list_item_example() {
        let html = render("- **Funding:** $2M");
        assert_eq!(
            html.as_str(),
            "<ul class=\"mb-4 ps-4\"><li class=\"mb-2\"><strong>Funding:</strong> $2M</li></ul>"
        );
    }

    #[test]
    fn test_headings_get_no_inline_formatting() {
        let html = render("# **Bold** title");
        assert!(html.as_str().contains(">**Bold** title</h1>"));
    }

    #[test]
    fn test_italic_not_confused_with_bold() {
        let html = render("A **strong** and *soft* claim");
        assert!(html.as_str().contains("<strong>strong</strong>"));
        assert!(html.as_str().contains("<em>soft</em>"));
        assert!(!html.as_str().contains("<em>*"));
    }

    #[test]
    fn test_urls_become_safe_links() {
        let html = render("Source: https://example.com/report?id=1&page=2.");
        let expected_href = "https://example.com/report?id=1&amp;page=2";
        assert!(html.as_str().contains(&format!(
            "<a href=\"{expected_href}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"text-decoration-underline\">{expected_href}</a>."
        )));
    }

    #[test]
    fn test_urls_linked_in_list_items() {
        let html = render("- see https://example.com");
        assert!(html.as_str().contains("<li class=\"mb-2\">see <a href=\"https://example.com\""));
    }

    #[test]
    fn test_quoted_url_excludes_quote() {
        let html = render("\"https://example.com\"");
        assert!(html.as_str().contains("href=\"https://example.com\""));
        assert!(html.as_str().contains("</a>&quot;"));
    }

    #[test]
    fn test_consecutive_items_grouped() {
        let html = render("# Title\n- one\n- two\n\nMiddle\n* three");
        let expected = [
            "<h1 class=\"mt-5 mb-4 text-primary border-bottom pb-2\">Title</h1>",
            "<ul class=\"mb-4 ps-4\"><li class=\"mb-2\">one</li>\n<li class=\"mb-2\">two</li></ul>",
            "<p class=\"mb-3 lh-lg\">Middle</p>",
            "<ul class=\"mb-4 ps-4\"><li class=\"mb-2\">three</li></ul>",
        ]
        .join("\n");
        assert_eq!(html.as_str(), expected);
    }

    #[test]
    fn test_blank_lines_dropped() {
        assert!(render("\n   \n\t\n").is_empty());
        assert_eq!(render("  padded  ").as_str(), "<p class=\"mb-3 lh-lg\">padded</p>");
    }

    #[rstest]
    #[case("<script>alert(1)</script>")]
    #[case("&lt;script&gt;alert(1)&lt;/script&gt;")]
    #[case("<scr<script>ipt>alert(1)</script>")]
    #[case("<script src=https://evil.example/x.js")]
    #[case("- <img src=x onerror=alert(1)>item")]
    #[case("## <script>alert('h')</script>")]
    fn test_script_never_survives(#[case] input: &str) {
        let html = render(input);
        let lower = html.as_str().to_lowercase();
        assert!(!lower.contains("<script"), "unsafe output: {}", html);
        assert!(!lower.contains("<img"), "unsafe output: {}", html);
    }

    #[test]
    fn test_existing_markup_stripped() {
        let html = render("<div><b>Hello</b> world</div>");
        assert_eq!(html.as_str(), "<p class=\"mb-3 lh-lg\">Hello world</p>");
    }

    #[test]
    fn test_special_characters_escaped() {
        let html = render("Tom & Jerry's \"show\"");
        assert_eq!(
            html.as_str(),
            "<p class=\"mb-3 lh-lg\">Tom &amp; Jerry&#x27;s &quot;show&quot;</p>"
        );
    }

    #[rstest]
    #[case("# Executive Summary\nThe market grew *fast*.\n- **Funding:** $2M\n- AT&T invests\nSee https://example.com/a?b=1&c=2")]
    #[case("## Market Analysis\n\n### Trends\n* one\n* two")]
    #[case("Plain text with no markers at all")]
    fn test_rendering_own_output_keeps_text(#[case] input: &str) {
        let once = render(input);
        let twice = render(once.as_str());
        assert_eq!(text_content(twice.as_str()), text_content(once.as_str()));

        let thrice = render(twice.as_str());
        assert_eq!(thrice, twice);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">'&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }
}
