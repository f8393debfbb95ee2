//! ciswift backend
//!
//! This module turns a resolved [`Program`](ciswift_ast::Program) into the text of one Swift source file.
//!
//! The pipeline is:
//! 1. Resolved program (deserialized or built in memory) → [`SwiftCodegen`]
//! 2. [`swift::emit_program`] walks the declarations once, collecting runtime helper and import requirements
//! 3. Output assembly: header, imports, declarations, runtime helpers, resources
//!
//! ## Module Organization
//!
//! - `codegen.rs` - [`SwiftCodegen`] facade and entry point
//! - `config.rs` - Indentation and banner settings
//! - `writer.rs` - Indentation-aware text sink
//! - `swift/` - The Swift visitors
//!   - `types.rs` - Type syntax and default values
//!   - `expressions/` - Expressions, operators, builtin calls, string formatting
//!   - `statements.rs`, `loops.rs` - Statement lowering
//!   - `decls.rs` - Classes, enums and flags
//!   - `shims.rs`, `resources.rs` - Trailing runtime helpers and embedded resources

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]

pub mod codegen;
pub mod config;
pub mod swift;
pub mod writer;

pub use codegen::SwiftCodegen;
pub use config::EmitConfig;
pub use swift::{EmitError, EmitResult};
