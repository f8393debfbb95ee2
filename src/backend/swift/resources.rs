//! Embedded binary resources.
//!
//! Every resource becomes a `static let` byte array on one `fileprivate` holder class, ordered by name so the
//! output does not depend on map iteration order. Two names that sanitize to the same identifier are rejected.

use std::collections::HashMap;

use super::SwiftEmitter;
use super::errors::{EmitError, EmitResult};
use super::names::resource_name;
use crate::backend::writer::CodeSink;

const BYTES_PER_LINE: usize = 16;

impl<'a> SwiftEmitter<'a> {
    pub(crate) fn write_resources(&mut self) -> EmitResult<()> {
        let program = self.program;
        if program.resources.is_empty() {
            return Ok(());
        }
        let mut names: Vec<&'a String> = program.resources.keys().collect();
        names.sort();
        tracing::debug!(count = names.len(), "writing resources");

        let mut seen: HashMap<String, &str> = HashMap::new();
        for name in &names {
            if let Some(other) = seen.insert(resource_name(name), name.as_str()) {
                return Err(EmitError::unsupported(format!(
                    "resources `{other}` and `{name}` both map to `{}`",
                    resource_name(name)
                )));
            }
        }

        self.out.separate();
        self.out.write_line("fileprivate final class CiResource");
        self.out.open_block();
        for name in names {
            let bytes = &program.resources[name];
            let ident = resource_name(name);
            if bytes.is_empty() {
                self.out.write_line(&format!("static let {ident} = ArrayRef<UInt8>([])"));
                continue;
            }
            self.out.write_line(&format!("static let {ident} = ArrayRef<UInt8>(["));
            self.out.indent();
            let lines: Vec<&[u8]> = bytes.chunks(BYTES_PER_LINE).collect();
            for (i, chunk) in lines.iter().enumerate() {
                let mut line = chunk.iter().map(u8::to_string).collect::<Vec<_>>().join(", ");
                if i + 1 < lines.len() {
                    line.push(',');
                }
                self.out.write_line(&line);
            }
            self.out.dedent();
            self.out.write_line("])");
        }
        self.out.close_block();
        Ok(())
    }
}
