//! Indentation-aware text sink the Swift emitter drives.
//!
//! [`CodeSink`] is the interface (write token, write line, manage indent, open/close block); [`SourceWriter`] is the
//! in-memory implementation used for every generation run.

use super::config::EmitConfig;

/// Line-oriented sink for generated source text.
pub trait CodeSink {
    /// Write text on the current line, indenting first if the line is empty.
    fn write(&mut self, text: &str);

    /// End the current line.
    fn newline(&mut self);

    /// Increase indentation level
    fn indent(&mut self);

    /// Decrease indentation level
    fn dedent(&mut self);

    /// Write a full line.
    fn write_line(&mut self, text: &str) {
        self.write(text);
        self.newline();
    }

    /// Put `{` on its own line and indent (type and method bodies).
    fn open_block(&mut self) {
        self.write_line("{");
        self.indent();
    }

    /// Finish the current line with ` {` and indent (statement bodies).
    fn open_child(&mut self) {
        self.write(" {");
        self.newline();
        self.indent();
    }

    /// Dedent and write `}` on its own line.
    fn close_block(&mut self) {
        self.dedent();
        self.write_line("}");
    }

    /// Blank line separating declarations; suppressed at the start of the output or of a block.
    fn separate(&mut self);
}

/// In-memory [`CodeSink`].
#[derive(Debug)]
pub struct SourceWriter {
    /// The output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// Text of one indentation level
    indent_unit: String,
    /// Whether we're at the start of a line
    at_line_start: bool,
    /// Whether the last completed line opened a block (or nothing was written yet)
    after_open: bool,
}

impl SourceWriter {
    pub fn new(config: &EmitConfig) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_unit: config.indent_unit(),
            at_line_start: true,
            after_open: true,
        }
    }

    /// Get the written text
    pub fn finish(self) -> String {
        self.output
    }

    /// Current indentation level
    pub fn current_indent(&self) -> usize {
        self.indent_level
    }

    /// Append text produced by another writer verbatim.
    pub fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.output.push_str(text);
        self.at_line_start = text.ends_with('\n');
        self.after_open = false;
    }

    fn write_indent(&mut self) {
        if self.at_line_start {
            for _ in 0..self.indent_level {
                self.output.push_str(&self.indent_unit);
            }
            self.at_line_start = false;
        }
    }
}

impl CodeSink for SourceWriter {
    fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(text);
    }

    fn newline(&mut self) {
        self.after_open = self.output.ends_with('{');
        self.output.push('\n');
        self.at_line_start = true;
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    fn separate(&mut self) {
        if !self.after_open {
            self.output.push('\n');
            self.after_open = true;
        }
    }
}
