//! Swift code generation facade
//!
//! This module provides [`SwiftCodegen`], the entry point for generating Swift from a resolved program:
//!
//! ```text
//! Program → SwiftEmitter (types, expressions, statements, decls) → runtime helpers → String
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ciswift::backend::{EmitConfig, SwiftCodegen};
//!
//! let codegen = SwiftCodegen::with_config(EmitConfig::new().with_spaces(4));
//! let swift = codegen.try_generate(&program)?;
//! ```
//!
//! ## Error Handling
//!
//! [`SwiftCodegen::try_generate`] returns the first [`EmitError`]. Callers can tell a program that cannot target
//! Swift ([`EmitError::Unsupported`]) from a malformed input tree ([`EmitError::Internal`]). No partial output is
//! returned on failure.

use ciswift_ast::Program;

use super::config::EmitConfig;
use super::swift::{EmitError, emit_program};

/// Swift code generator.
///
/// Holds only configuration; every call to [`try_generate`](Self::try_generate) starts from fresh emission state,
/// so one generator can be reused across programs.
#[derive(Debug, Clone, Default)]
pub struct SwiftCodegen {
    config: EmitConfig,
}

impl SwiftCodegen {
    /// Create a generator with the default configuration (tab indentation, banner line).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EmitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitConfig {
        &self.config
    }

    /// Generate Swift source for `program`.
    ///
    /// ## Errors
    ///
    /// Returns [`EmitError`] when a construct has no Swift rendering or the tree breaks an upstream contract.
    pub fn try_generate(&self, program: &Program) -> Result<String, EmitError> {
        emit_program(program, &self.config)
    }
}
