//! Indented source-text buffer shared by every emitter.

/// Accumulates generated C source with block-aware indentation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeBuilder {
    /// Current indentation level.
    indent: usize,
    output: String,
}

impl CodeBuilder {
    pub fn new() -> Self {
        CodeBuilder {
            indent: 0,
            output: String::with_capacity(1024),
        }
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
    }

    /// Write a full line at the current indentation.
    pub fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.output.push_str(s);
        self.output.push('\n');
    }

    /// Write `header {` and indent.
    pub fn open_block(&mut self, header: &str) {
        if header.is_empty() {
            self.writeln("{");
        } else {
            self.writeln(&format!("{header} {{"));
        }
        self.indent();
    }

    /// Dedent and write `}` followed by `suffix` (e.g. `;` or ` u;`).
    pub fn close_block(&mut self, suffix: &str) {
        self.dedent();
        self.writeln(&format!("}}{suffix}"));
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn finish(self) -> String {
        self.output
    }
}
