//! Rendering of records as markdown documents.

use std::fmt;

/// An append-only markdown document.
///
/// Empty headings and empty paragraphs are never emitted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MarkdownDocument {
    blocks: Vec<String>,
}

impl MarkdownDocument {
    /// Create an empty document.
    #[must_use]
    pub const fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Append a heading of the given level (clamped to 1..=6).
    pub fn heading(&mut self, level: usize, text: &str) -> &mut Self {
        if !text.is_empty() {
            let hashes = "#".repeat(level.clamp(1, 6));
            self.blocks.push(format!("{hashes} {text}"));
        }
        self
    }

    /// Append a paragraph.
    pub fn paragraph(&mut self, text: &str) -> &mut Self {
        let text = text.trim_end();
        if !text.is_empty() {
            self.blocks.push(text.to_string());
        }
        self
    }

    /// Append a level-2 section with an upper case heading, unless the body
    /// is empty.
    pub fn section(&mut self, name: &str, body: &str) -> &mut Self {
        if body.trim().is_empty() {
            return self;
        }
        self.heading(2, &name.to_uppercase()).paragraph(body)
    }

    /// Whether nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl fmt::Display for MarkdownDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            writeln!(f, "{block}")?;
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headings_and_paragraphs() {
        let mut doc = MarkdownDocument::new();
        doc.heading(1, "Valid Title")
            .section("description", "Some text")
            .section("rationale", "");

        assert_eq!(
            doc.to_string(),
            "# Valid Title\n\n## DESCRIPTION\n\nSome text\n\n"
        );
    }

    #[test]
    fn blank_sections_are_skipped_and_paragraphs_trimmed() {
        let mut doc = MarkdownDocument::new();
        doc.heading(1, "Valid Title")
            .section("description", "first line\nsecond line\n\n")
            .section("rationale", " \n\t");

        assert_eq!(
            doc.to_string(),
            "# Valid Title\n\n## DESCRIPTION\n\nfirst line\nsecond line\n\n"
        );
    }

    #[test]
    fn skips_empty_blocks() {
        let mut doc = MarkdownDocument::new();
        doc.heading(2, "").paragraph("   ");
        assert!(doc.is_empty());
    }
}
