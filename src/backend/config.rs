//! Emission configuration for generated Swift.
//!
//! Only whitespace and the banner line are configurable; nothing here changes what the generated code means.

/// Banner written as the first line of every generated file.
pub const GENERATED_HEADER: &str = "// Generated automatically. Do not edit.";

/// Emission configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitConfig {
    /// Number of spaces per indentation level (ignored when `use_tabs` is set)
    pub indent_width: usize,
    /// Indent with one tab per level
    pub use_tabs: bool,
    /// Write [`GENERATED_HEADER`] before the imports
    pub emit_header: bool,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            use_tabs: true,
            emit_header: true,
        }
    }
}

impl EmitConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Indent with `width` spaces instead of tabs
    pub fn with_spaces(mut self, width: usize) -> Self {
        self.indent_width = width;
        self.use_tabs = false;
        self
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set whether to indent with tabs
    pub fn with_tabs(mut self, use_tabs: bool) -> Self {
        self.use_tabs = use_tabs;
        self
    }

    /// Set whether to write the generated-file banner
    pub fn with_header(mut self, emit_header: bool) -> Self {
        self.emit_header = emit_header;
        self
    }

    /// Text of one indentation level
    pub fn indent_unit(&self) -> String {
        if self.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.indent_width)
        }
    }
}
