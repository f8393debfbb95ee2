//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use ciswift_ast::Program;

use super::{CliError, CliResult, ExitCode};
use crate::backend::{EmitConfig, EmitError, SwiftCodegen};

// ============================================================================
// Input loading
// ============================================================================

/// Read and deserialize a program from `path`.
pub fn load_program(path: &Path) -> CliResult<Program> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::failure(format!("Error reading {}: {}", path.display(), e)))?;
    parse_program(&text, &path.display().to_string())
}

/// Deserialize a program from JSON text; `origin` names the source in error messages.
pub fn parse_program(text: &str, origin: &str) -> CliResult<Program> {
    serde_json::from_str(text).map_err(|e| CliError::failure(format!("Error: {origin} is not a valid program: {e}")))
}

// ============================================================================
// Generation
// ============================================================================

/// Generate Swift for `program`, mapping emission errors to CLI errors.
pub fn generate(program: &Program, config: EmitConfig) -> CliResult<String> {
    SwiftCodegen::with_config(config)
        .try_generate(program)
        .map_err(generation_error)
}

fn generation_error(err: EmitError) -> CliError {
    let exit_code = if err.is_internal() {
        ExitCode::INTERNAL
    } else {
        ExitCode::FAILURE
    };
    CliError::new(format!("Code generation error: {err}"), exit_code)
}

// ============================================================================
// Commands
// ============================================================================

/// `emit`: write Swift for the program in `file` to `output`, or to stdout.
pub fn emit_file(file: &Path, output: Option<&Path>, config: EmitConfig) -> CliResult<ExitCode> {
    let program = load_program(file)?;
    let swift = generate(&program, config)?;
    match output {
        Some(path) => {
            fs::write(path, &swift)
                .map_err(|e| CliError::failure(format!("Error writing {}: {}", path.display(), e)))?;
            tracing::info!(output = %path.display(), bytes = swift.len(), "wrote Swift source");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(swift.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| CliError::failure(format!("Error writing to stdout: {e}")))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// `check`: generate without writing anything.
pub fn check_file(file: &Path) -> CliResult<ExitCode> {
    let program = load_program(file)?;
    generate(&program, EmitConfig::default())?;
    println!("✓ {} can be generated as Swift", file.display());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_program() {
        let program = parse_program(r#"{"declarations": []}"#, "inline").unwrap();
        assert!(program.declarations.is_empty());
        assert!(program.resources.is_empty());
    }

    #[test]
    fn test_parse_invalid_json_names_origin() {
        let err = parse_program("{", "broken.json").unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("broken.json"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = load_program(Path::new("definitely/not/here.json")).unwrap_err();
        assert!(err.message.starts_with("Error reading"));
    }

    #[test]
    fn test_generate_empty_program_without_header() {
        let program = Program::default();
        assert_eq!(generate(&program, EmitConfig::new().with_header(false)).unwrap(), "");
    }

    #[test]
    fn test_internal_errors_get_their_own_exit_code() {
        let err = generation_error(EmitError::internal("unexpected node"));
        assert_eq!(err.exit_code, ExitCode::INTERNAL);
        let err = generation_error(EmitError::unsupported("OrderedDictionary"));
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("OrderedDictionary"));
    }
}
