//! Swift emission from resolved Ć programs.
//!
//! [`SwiftEmitter`] walks one [`Program`] and writes Swift source into a [`SourceWriter`]. The visitors are split by
//! concern, each adding an `impl SwiftEmitter` block:
//!
//! - [`types`]: type syntax, default values and storage construction
//! - [`expressions`]: expressions with precedence-driven parenthesization
//! - [`statements`] and [`loops`]: statement lowering, including the `++`/`--` and `do`-`while` rewrites
//! - [`decls`]: classes, enums, flags, fields, constants and methods
//! - [`shims`] and [`resources`]: trailing runtime helpers and embedded resources
//! - [`program`]: output assembly
//!
//! ## Notes
//!
//! - All run state lives in [`EmitContext`]; a new emitter is built for every run, so runs never share flags.
//! - Only the first error aborts the run. There is no partial output.
//!
//! ## See also
//!
//! - `src/backend/codegen.rs`: the public facade over this module

mod context;
mod decls;
pub mod errors;
mod expressions;
pub mod flags;
mod loops;
mod names;
mod program;
mod resources;
mod shims;
mod statements;
mod types;

use std::collections::HashMap;

use ciswift_ast::{Enum, Program};

use super::config::EmitConfig;
use super::writer::SourceWriter;
use context::EmitContext;

pub use errors::{EmitError, EmitResult};
pub use program::emit_program;

/// Stateful Swift writer for one program.
pub(crate) struct SwiftEmitter<'a> {
    program: &'a Program,
    config: &'a EmitConfig,
    ctx: EmitContext<'a>,
    out: SourceWriter,
    /// Enum declarations by name, for default values.
    enums: HashMap<&'a str, &'a Enum>,
}

impl<'a> SwiftEmitter<'a> {
    pub(crate) fn new(program: &'a Program, config: &'a EmitConfig) -> Self {
        Self {
            program,
            config,
            ctx: EmitContext::new(),
            out: SourceWriter::new(config),
            enums: program.enums().map(|e| (e.name.as_str(), e)).collect(),
        }
    }
}
