//! Output accumulation
//!
//!     Passes write their result into an [OutputBuilder]: a growing string plus the current
//!     indent level. The level never goes below zero; lowering it past zero clamps.

/// Output buffer and indent state for one pass invocation.
#[derive(Debug, Clone)]
pub struct OutputBuilder {
    code: String,
    indent: usize,
    indent_unit: String,
    newline: String,
}

impl OutputBuilder {
    pub fn new(indent_unit: impl Into<String>, newline: impl Into<String>) -> Self {
        OutputBuilder {
            code: String::new(),
            indent: 0,
            indent_unit: indent_unit.into(),
            newline: newline.into(),
        }
    }

    pub fn append(&mut self, text: &str) {
        self.code.push_str(text);
    }

    /// Drop trailing spaces and tabs from the buffer, then append. Newlines are kept.
    pub fn rtrim_append(&mut self, text: &str) {
        let kept = self.code.trim_end_matches([' ', '\t']).len();
        self.code.truncate(kept);
        self.code.push_str(text);
    }

    /// The indent for `level + delta` without changing the level. Negative totals give an
    /// empty string.
    pub fn indent_string(&self, delta: isize) -> String {
        self.indent_unit.repeat(offset_level(self.indent, delta))
    }

    pub fn adjust_indent(&mut self, delta: isize) {
        self.indent = offset_level(self.indent, delta);
    }

    pub fn indent_level(&self) -> usize {
        self.indent
    }

    pub fn indent_unit(&self) -> &str {
        &self.indent_unit
    }

    pub fn newline(&self) -> &str {
        &self.newline
    }

    /// A newline followed by the current indent.
    pub fn newline_indent(&self) -> String {
        format!("{}{}", self.newline, self.indent_string(0))
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn into_string(self) -> String {
        self.code
    }
}

fn offset_level(level: usize, delta: isize) -> usize {
    level.saturating_add_signed(delta)
}
