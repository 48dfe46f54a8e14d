// file: src/reader/markdown.rs
// description: markdown to plain text conversion with pulldown-cmark
// reference: https://docs.rs/pulldown-cmark

use pulldown_cmark::{Event, Parser, TagEnd};

pub struct MarkdownParser;

impl MarkdownParser {
    pub fn new() -> Self {
        Self
    }

    /// Flattens markdown to plain text. Block ends become blank lines so the
    /// sentence splitter still sees paragraph boundaries; code is kept verbatim.
    pub fn to_plain_text(&self, content: &str) -> String {
        let parser = Parser::new(content);
        let mut plain_text = String::new();

        for event in parser {
            match event {
                Event::Text(text) | Event::Code(text) => {
                    plain_text.push_str(&text);
                }
                Event::SoftBreak => plain_text.push(' '),
                Event::HardBreak => plain_text.push('\n'),
                Event::End(TagEnd::Heading(_)) => {
                    if !plain_text.ends_with(['.', '!', '?']) {
                        plain_text.push('.');
                    }
                    plain_text.push_str("\n\n");
                }
                Event::End(TagEnd::Paragraph)
                | Event::End(TagEnd::CodeBlock)
                | Event::End(TagEnd::Item)
                | Event::End(TagEnd::BlockQuote(_)) => {
                    plain_text.push_str("\n\n");
                }
                _ => {}
            }
        }

        plain_text.trim().to_string()
    }

    pub fn is_markdown(path: &std::path::Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("md") | Some("markdown")
        )
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_basic_conversion() {
        let parser = MarkdownParser::new();
        let text = parser.to_plain_text("# Title\n\nSome *content* here.");

        assert!(text.starts_with("Title."));
        assert!(text.contains("Some content here."));
        assert!(!text.contains('#'));
        assert!(!text.contains('*'));
    }

    #[test]
    fn test_links_keep_text() {
        let parser = MarkdownParser::new();
        let text = parser.to_plain_text("See [the article](https://example.com).");

        assert_eq!(text, "See the article.");
    }

    #[test]
    fn test_list_items_are_separated() {
        let parser = MarkdownParser::new();
        let text = parser.to_plain_text("- first\n- second");

        assert!(text.contains("first"));
        assert!(text.contains("second"));
        assert!(!text.contains("firstsecond"));
    }

    #[test]
    fn test_is_markdown() {
        assert!(MarkdownParser::is_markdown(Path::new("a.md")));
        assert!(MarkdownParser::is_markdown(Path::new("a.markdown")));
        assert!(!MarkdownParser::is_markdown(Path::new("a.txt")));
    }
}
