use alloc::string::String;
use alloc::vec::Vec;

/// A build-description file held as an ordered list of lines.
///
/// Lines are split on `\n` only, so a `\r` stays part of its line and every
/// untouched line renders back byte for byte. Inserted lines take the `\r\n`
/// ending when the file already uses it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    lines: Vec<String>,
    trailing_newline: bool,
    crlf: bool,
    already_augmented: bool,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let trailing_newline = text.ends_with('\n');
        let body = text.strip_suffix('\n').unwrap_or(text);
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            body.split('\n').map(String::from).collect()
        };

        Self {
            lines,
            trailing_newline,
            crlf: text.contains("\r\n"),
            already_augmented: false,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_crlf(&self) -> bool {
        self.crlf
    }

    pub fn already_augmented(&self) -> bool {
        self.already_augmented
    }

    /// Latches the augmented flag. There is no way to clear it again, and a
    /// latched document takes no further insertions.
    pub(crate) fn mark_augmented(&mut self) {
        self.already_augmented = true;
    }

    /// Index just past the last line that is neither blank nor a comment.
    ///
    /// Trailing blank and comment lines stay below whatever is inserted here.
    /// A document made only of blanks and comments gets its insertion at the end.
    pub fn insertion_point(&self) -> usize {
        self.lines
            .iter()
            .rposition(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with('#')
            })
            .map(|idx| idx + 1)
            .unwrap_or(self.lines.len())
    }

    /// Splices `block` in as one chunk before the line currently at `at`, then
    /// latches the augmented flag. Returns `false` without touching the lines
    /// when the document is already augmented.
    pub(crate) fn insert(&mut self, at: usize, block: impl IntoIterator<Item = String>) -> bool {
        if self.already_augmented {
            return false;
        }

        let tail = self.lines.split_off(at.min(self.lines.len()));
        let mut block: Vec<String> = block.into_iter().collect();

        if self.crlf {
            // Without a final newline the last line has no `\r` yet; once
            // the block follows it, it needs one, and the block's own last
            // line takes over as the unterminated one.
            let unterminated = tail.is_empty() && !self.trailing_newline;
            if unterminated && !block.is_empty() {
                if let Some(last) = self.lines.last_mut() {
                    last.push('\r');
                }
            }
            let terminated = if unterminated {
                block.len().saturating_sub(1)
            } else {
                block.len()
            };
            for line in &mut block[..terminated] {
                line.push('\r');
            }
        }

        self.lines.extend(block);
        self.lines.extend(tail);
        self.mark_augmented();
        true
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_is_exact() {
        for text in ["", "a", "a\n", "a\r\nb\r\n", "\n\nx\n\n", "all:\n\tcc -o $@ $<"] {
            assert_eq!(Document::parse(text).render(), text);
        }
    }

    #[test]
    fn test_insertion_point_skips_trailing_comments() {
        let doc = Document::parse("A := 1\nall: a\n\n# trailing\n\n");
        assert_eq!(doc.insertion_point(), 2);
    }

    #[test]
    fn test_insertion_point_without_content() {
        let doc = Document::parse("# only\n   # comments\n\n");
        assert_eq!(doc.insertion_point(), doc.lines().len());
    }

    #[test]
    fn test_insert_keeps_surrounding_lines() {
        let mut doc = Document::parse("one\ntwo\n# end\n");
        let at = doc.insertion_point();
        assert!(doc.insert(at, ["x".to_string(), "y".to_string()]));
        assert!(doc.already_augmented());
        assert_eq!(doc.render(), "one\ntwo\nx\ny\n# end\n");
    }

    #[test]
    fn test_insert_follows_crlf_endings() {
        let mut doc = Document::parse("one\r\ntwo\r\n# end\r\n");
        assert!(doc.is_crlf());
        let at = doc.insertion_point();
        doc.insert(at, ["".to_string(), "x".to_string()]);
        assert_eq!(doc.render(), "one\r\ntwo\r\n\r\nx\r\n# end\r\n");
    }

    #[test]
    fn test_insert_at_unterminated_crlf_end() {
        let mut doc = Document::parse("one\r\ntwo");
        doc.insert(2, ["x".to_string(), "y".to_string()]);
        assert_eq!(doc.render(), "one\r\ntwo\r\nx\r\ny");
    }

    #[test]
    fn test_insert_keeps_lf_endings() {
        let mut doc = Document::parse("one\ntwo\n");
        assert!(!doc.is_crlf());
        doc.insert(2, ["x".to_string()]);
        assert_eq!(doc.render(), "one\ntwo\nx\n");
    }

    #[test]
    fn test_mark_augmented_latches() {
        let mut doc = Document::parse("x");
        assert!(!doc.already_augmented());
        doc.mark_augmented();
        doc.mark_augmented();
        assert!(doc.already_augmented());
    }

    #[test]
    fn test_augmented_document_takes_no_insertion() {
        let mut doc = Document::parse("all:\n");
        doc.mark_augmented();
        assert!(!doc.insert(1, ["x".to_string()]));
        assert_eq!(doc.render(), "all:\n");

        let mut doc = Document::parse("all:\n");
        assert!(doc.insert(1, ["x".to_string()]));
        assert!(!doc.insert(1, ["y".to_string()]));
        assert_eq!(doc.render(), "all:\nx\n");
    }
}
