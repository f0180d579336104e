// file: src/parser/markdown.rs
// description: reduces markdown corpus files to plain text with pulldown-cmark
// reference: https://docs.rs/pulldown-cmark

use pulldown_cmark::{Event, Parser, TagEnd};

pub struct MarkdownParser;

impl MarkdownParser {
    pub fn new() -> Self {
        Self
    }

    /// Paragraphs, headings and list items end with a newline so header
    /// lines like `City: Pune` survive on their own line. Heading text is
    /// kept inline with the body.
    pub fn to_plain_text(&self, content: &str) -> String {
        let parser = Parser::new(content);

        let mut plain_text = String::new();

        for event in parser {
            match event {
                Event::End(TagEnd::Heading(_))
                | Event::End(TagEnd::Paragraph)
                | Event::End(TagEnd::Item)
                | Event::End(TagEnd::CodeBlock) => {
                    plain_text.push('\n');
                }
                Event::Text(text) | Event::Code(text) => {
                    plain_text.push_str(&text);
                }
                Event::SoftBreak | Event::HardBreak => {
                    plain_text.push('\n');
                }
                _ => {}
            }
        }

        collapse_blank_lines(&plain_text)
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

fn collapse_blank_lines(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
