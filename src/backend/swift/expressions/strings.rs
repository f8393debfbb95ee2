//! String interpolation.
//!
//! Plain interpolations use Swift's native `"\(x)"`. As soon as one part carries a width, a format letter or a
//! precision, the whole string goes through Foundation's `String(format:)` with `printf` conversions.

use ciswift_ast::{CiType, InterpolatedPart, IntRange, TypeKind};
use ciswift_core::strings::escape_string_literal;

use super::Priority;
use crate::backend::swift::SwiftEmitter;
use crate::backend::swift::errors::EmitResult;

/// `printf` conversion for one interpolated argument.
fn conversion(part: &InterpolatedPart) -> String {
    let mut spec = String::from("%");
    if let Some(width) = part.width {
        spec.push_str(&width.to_string());
    }
    if let Some(precision) = part.precision {
        spec.push_str(&format!(".{precision}"));
    }
    let ty = &part.argument.ty;
    let letter = match part.format {
        _ if ty.is_string() => "@".to_string(),
        Some('x') => "lx".to_string(),
        Some('X') => "lX".to_string(),
        Some(c @ ('e' | 'E' | 'f' | 'F' | 'g' | 'G')) if ty.is_floating() => c.to_string(),
        Some('e' | 'E' | 'f' | 'F' | 'g' | 'G') => "ld".to_string(),
        _ if ty.is_floating() => if part.precision.is_some() { "f" } else { "g" }.to_string(),
        _ => "ld".to_string(),
    };
    spec.push_str(&letter);
    spec
}

fn needs_int_widening(ty: &CiType) -> bool {
    !matches!(
        ty.kind,
        TypeKind::Integer(IntRange::Int) | TypeKind::Integer(IntRange::Long)
    ) && ty.is_integer()
}

impl<'a> SwiftEmitter<'a> {
    pub(super) fn interpolated(&mut self, parts: &[InterpolatedPart], suffix: &str) -> EmitResult<String> {
        if parts.iter().any(InterpolatedPart::is_formatted) {
            return self.formatted(parts, suffix);
        }
        let mut text = String::from("\"");
        for part in parts {
            text.push_str(&escape_string_literal(&part.prefix));
            let value = self.unwrapped(&part.argument, Priority::Argument, true)?;
            text.push_str(&format!("\\({value})"));
        }
        text.push_str(&escape_string_literal(suffix));
        text.push('"');
        Ok(text)
    }

    fn formatted(&mut self, parts: &[InterpolatedPart], suffix: &str) -> EmitResult<String> {
        self.ctx.include("Foundation");
        let mut format = String::new();
        let mut args = Vec::with_capacity(parts.len());
        for part in parts {
            format.push_str(&escape_string_literal(&part.prefix.replace('%', "%%")));
            format.push_str(&conversion(part));
            let arg = &part.argument;
            args.push(if needs_int_widening(&arg.ty) {
                self.coerced(&CiType::int(), arg, Priority::Argument)?
            } else {
                self.unwrapped(arg, Priority::Argument, false)?
            });
        }
        format.push_str(&escape_string_literal(&suffix.replace('%', "%%")));
        Ok(format!("String(format: \"{format}\", {})", args.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::config::EmitConfig;
    use ciswift_ast::{Expr, Program};

    fn emit(expr: &Expr) -> (String, Vec<&'static str>) {
        let program = Program::default();
        let config = EmitConfig::default();
        let mut emitter = SwiftEmitter::new(&program, &config);
        let text = emitter.expr(expr, Priority::Argument).unwrap();
        (text, emitter.ctx.includes().collect())
    }

    #[test]
    fn test_native_interpolation() {
        let expr = Expr::interpolated(
            vec![
                InterpolatedPart::new("x=", Expr::local("x", CiType::int())),
                InterpolatedPart::new(", name=", Expr::local("name", CiType::string().into_nullable())),
            ],
            "!",
        );
        let (text, includes) = emit(&expr);
        assert_eq!(text, "\"x=\\(x), name=\\(name!)!\"");
        assert!(includes.is_empty());
    }

    #[test]
    fn test_formatted_interpolation() {
        let mut hex = InterpolatedPart::new("0x", Expr::local("b", CiType::byte()));
        hex.format = Some('X');
        hex.width = Some(2);
        let mut ratio = InterpolatedPart::new(" at ", Expr::local("r", CiType::double()));
        ratio.format = Some('F');
        ratio.precision = Some(2);
        let expr = Expr::interpolated(vec![hex, ratio], "%");
        let (text, includes) = emit(&expr);
        assert_eq!(text, "String(format: \"0x%2lX at %.2F%%\", Int(b), r)");
        assert_eq!(includes, vec!["Foundation"]);
    }

    #[test]
    fn test_string_argument_uses_object_conversion() {
        let mut part = InterpolatedPart::new("", Expr::local("s", CiType::string()));
        part.width = Some(-8);
        assert_eq!(conversion(&part), "%-8@");
    }
}
