//! Output assembly for one program.
//!
//! The declarations are written first into their own buffer, because the imports they need are only known
//! afterwards. The final file is: optional header, sorted imports, declarations, runtime helpers, resources.

use ciswift_ast::{Decl, Program};

use super::SwiftEmitter;
use super::context::Shim;
use super::errors::EmitResult;
use crate::backend::config::{EmitConfig, GENERATED_HEADER};
use crate::backend::writer::{CodeSink, SourceWriter};

/// Translate `program` into the text of one Swift source file.
///
/// ## Errors
///
/// - [`EmitError::Unsupported`](super::EmitError::Unsupported) for constructs with no Swift rendering.
/// - [`EmitError::Internal`](super::EmitError::Internal) for malformed input trees.
#[tracing::instrument(
    skip_all,
    fields(decl_count = program.declarations.len(), resource_count = program.resources.len())
)]
pub fn emit_program(program: &Program, config: &EmitConfig) -> EmitResult<String> {
    SwiftEmitter::new(program, config).run()
}

impl<'a> SwiftEmitter<'a> {
    fn run(mut self) -> EmitResult<String> {
        let program = self.program;
        for decl in &program.declarations {
            tracing::trace!(name = decl.name(), "emitting declaration");
            match decl {
                Decl::Class(class) => self.write_class(class)?,
                Decl::Enum(enu) => self.write_enum(enu)?,
            }
        }
        if !program.resources.is_empty() {
            self.ctx.activate(Shim::ArrayRef);
        }
        self.write_library();
        self.write_resources()?;

        let body = self.out.finish();
        let mut file = SourceWriter::new(self.config);
        if self.config.emit_header {
            file.write_line(GENERATED_HEADER);
        }
        let mut preamble = self.config.emit_header;
        for module in self.ctx.includes() {
            file.write_line(&format!("import {module}"));
            preamble = true;
        }
        if preamble && !body.is_empty() {
            file.newline();
        }
        file.append(&body);
        let text = file.finish();
        tracing::debug!(bytes = text.len(), "Swift emission finished");
        Ok(text)
    }
}
