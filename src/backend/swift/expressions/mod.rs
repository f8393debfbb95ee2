//! Emit Swift expressions from resolved expression trees.
//!
//! Every visitor returns the expression text and receives the [`Priority`] of its parent, parenthesizing itself only
//! when its own precedence is lower.
//!
//! ## Module organization
//!
//! - [`operators`]: unary and binary operators, indexing
//! - [`calls`]: user method calls and the library builtin table
//! - [`strings`]: string interpolation, including `printf`-style formatting
//! - [`effects`]: throw analysis and hoisting of `++`/`--` side effects
//!
//! ## Notes
//!
//! - **Increments are hoisted**: a `++x` or `x--` nested in an expression emits only `x`. Statement emission writes
//!   the `x += 1` before or after the statement (see [`effects`]).
//! - **Unwrap is explicit**: nullable values read where a non-null value is expected get a `!` through
//!   [`SwiftEmitter::unwrapped`]. Forced unwraps are never elided.
//!
//! ## See also
//!
//! - `src/backend/swift/statements.rs`: statement lowering that consumes [`effects`]

mod calls;
pub(crate) mod effects;
mod operators;
mod strings;

use ciswift_ast::{Builtin, CiType, ExprKind, Expr, FieldInit, Literal, SymbolKind, SymbolRef};
use ciswift_core::strings::escape_string_literal;

use super::SwiftEmitter;
use super::context::Shim;
use super::errors::{EmitError, EmitResult};
use super::names::{member_name, method_const_name, resource_name};
use super::types::is_array_ref;

/// Binding strength of a Swift expression position, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Priority {
    Statement,
    Argument,
    Assign,
    Select,
    CondOr,
    CondAnd,
    Comparison,
    NilCoalesce,
    Range,
    Add,
    Mul,
    Shift,
    Unary,
    Primary,
}

impl Priority {
    /// The next tighter level.
    pub(crate) fn next(self) -> Self {
        match self {
            Priority::Statement => Priority::Argument,
            Priority::Argument => Priority::Assign,
            Priority::Assign => Priority::Select,
            Priority::Select => Priority::CondOr,
            Priority::CondOr => Priority::CondAnd,
            Priority::CondAnd => Priority::Comparison,
            Priority::Comparison => Priority::NilCoalesce,
            Priority::NilCoalesce => Priority::Range,
            Priority::Range => Priority::Add,
            Priority::Add => Priority::Mul,
            Priority::Mul => Priority::Shift,
            Priority::Shift => Priority::Unary,
            Priority::Unary | Priority::Primary => Priority::Primary,
        }
    }
}

/// Wrap `text` in parentheses when an expression at `own` sits in a `parent` position that binds tighter.
pub(crate) fn parenthesize(text: String, own: Priority, parent: Priority) -> String {
    if parent > own { format!("({text})") } else { text }
}

/// `.` or `!.` depending on whether the receiver may be nil.
pub(crate) fn member_op(left: &Expr) -> &'static str {
    if left.ty.nullable { "!." } else { "." }
}

/// Swift text of a floating literal.
pub(crate) fn double_literal(value: f64) -> String {
    if value.is_nan() {
        "Double.nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Double.infinity" } else { "-Double.infinity" }.to_string()
    } else {
        format!("{value:?}")
    }
}

impl<'a> SwiftEmitter<'a> {
    /// Emit `expr` in a position of strength `parent`.
    pub(crate) fn expr(&mut self, expr: &Expr, parent: Priority) -> EmitResult<String> {
        self.expr_kind(expr, parent).map_err(|e| e.at(expr.span))
    }

    fn expr_kind(&mut self, expr: &Expr, parent: Priority) -> EmitResult<String> {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(literal_text(literal, parent)),
            ExprKind::Interpolated { parts, suffix } => self.interpolated(parts, suffix),
            ExprKind::Symbol(symbol) => self.symbol(symbol, parent),
            ExprKind::Prefix { op, inner } => self.prefix(*op, inner, parent),
            // the increment itself is hoisted by the enclosing statement
            ExprKind::Postfix { inner, .. } => self.expr(inner, parent),
            ExprKind::Binary { op, left, right } => self.binary(*op, left, right, &expr.ty, parent),
            ExprKind::Call { method, args } => self.call(method, args, &expr.ty, parent),
            ExprKind::Lambda { param, body } => {
                let body = self.expr(body, Priority::Statement)?;
                Ok(format!("{{ {} in {body} }}", member_name(param)))
            }
            ExprKind::ArrayInit(items) => self.array_init(items, &expr.ty),
            ExprKind::ObjectInit(fields) => self.object_init(fields, &expr.ty),
            ExprKind::Select {
                cond,
                on_true,
                on_false,
            } => {
                let cond = self.expr(cond, Priority::CondOr)?;
                let on_true = self.coerced(&expr.ty, on_true, Priority::Select)?;
                let on_false = self.coerced(&expr.ty, on_false, Priority::Select)?;
                Ok(parenthesize(format!("{cond} ? {on_true} : {on_false}"), Priority::Select, parent))
            }
            ExprKind::New => Ok(format!("{}()", self.class_name(&expr.ty)?)),
            ExprKind::NewArray { element, length } => {
                let length = self.coerced(&CiType::int(), length, Priority::Argument)?;
                self.new_array(element, &length)
            }
            ExprKind::Resource { name } => Ok(format!("CiResource.{}", resource_name(name))),
        }
    }

    /// Emit `expr`, forcing it non-nil and converting a `Substring` back to `String` unless `substring_ok`.
    pub(crate) fn unwrapped(&mut self, expr: &Expr, parent: Priority, substring_ok: bool) -> EmitResult<String> {
        if expr.ty.nullable && !expr.ty.is_void() {
            Ok(format!("{}!", self.expr(expr, Priority::Primary)?))
        } else if !substring_ok && expr.builtin() == Some(Builtin::StringSubstring) {
            Ok(format!("String({})", self.expr(expr, Priority::Argument)?))
        } else {
            self.expr(expr, parent)
        }
    }

    /// Emit `expr` where a value of type `ty` is expected.
    ///
    /// Numeric values of a different kind are converted explicitly. Nullable values read into a non-null slot are
    /// unwrapped.
    pub(crate) fn coerced(&mut self, ty: &CiType, expr: &Expr, parent: Priority) -> EmitResult<String> {
        if ty.is_numeric() && expr.ty.is_numeric() && !expr.is_literal() && ty.kind != expr.ty.kind {
            let target = self.swift_type(&CiType::new(ty.kind.clone()))?;
            if ty.nullable && expr.ty.nullable {
                let value = self.expr(expr, Priority::Primary)?;
                return Ok(format!("{value}.map {{ {target}($0) }}"));
            }
            let inner = match (&expr.kind, expr.builtin()) {
                // Swift integer conversion already truncates toward zero
                (ExprKind::Call { args, .. }, Some(Builtin::MathTruncate)) if ty.is_integer() && !args.is_empty() => {
                    self.unwrapped(&args[0], Priority::Argument, true)?
                }
                _ => self.unwrapped(expr, Priority::Argument, true)?,
            };
            Ok(format!("{target}({inner})"))
        } else if !ty.nullable {
            self.unwrapped(expr, parent, false)
        } else {
            self.expr(expr, parent)
        }
    }

    fn symbol(&mut self, symbol: &SymbolRef, parent: Priority) -> EmitResult<String> {
        let name = &symbol.name;
        match &symbol.symbol {
            SymbolKind::This => Ok("self".to_string()),
            SymbolKind::Base => Ok("super".to_string()),
            SymbolKind::Type => Ok(name.clone()),
            SymbolKind::MathNaN => Ok("Float.nan".to_string()),
            SymbolKind::MathPositiveInfinity => Ok("Float.infinity".to_string()),
            SymbolKind::MathNegativeInfinity => {
                Ok(parenthesize("-Float.infinity".to_string(), Priority::Unary, parent))
            }
            SymbolKind::StringElement => Ok(format!("Int({}.value)", member_name(name))),
            SymbolKind::StringLength => {
                let left = required_left(symbol)?;
                Ok(format!("{}.count", self.unwrapped(left, Priority::Primary, true)?))
            }
            SymbolKind::CollectionCount => {
                let left = required_left(symbol)?;
                Ok(format!("{}{}count", self.expr(left, Priority::Primary)?, member_op(left)))
            }
            SymbolKind::MethodConst { owner, method } => Ok(format!("{owner}.{}", method_const_name(method, name))),
            SymbolKind::EnumConst { owner } => Ok(format!("{owner}.{}", member_name(name))),
            SymbolKind::Static { owner } => match symbol.left.as_deref() {
                Some(left) => self.qualified(left, name),
                None => Ok(format!("{owner}.{}", member_name(name))),
            },
            SymbolKind::Local | SymbolKind::Field => match symbol.left.as_deref() {
                Some(left) => self.qualified(left, name),
                None => Ok(member_name(name)),
            },
        }
    }

    fn qualified(&mut self, left: &Expr, name: &str) -> EmitResult<String> {
        Ok(format!("{}{}{}", self.expr(left, Priority::Primary)?, member_op(left), member_name(name)))
    }

    fn array_init(&mut self, items: &[Expr], ty: &CiType) -> EmitResult<String> {
        let element = ty
            .element()
            .cloned()
            .ok_or_else(|| EmitError::internal("array initializer without an element type"))?;
        let items = items
            .iter()
            .map(|item| self.coerced(&element, item, Priority::Argument))
            .collect::<EmitResult<Vec<_>>>()?
            .join(", ");
        if is_array_ref(ty) {
            self.ctx.activate(Shim::ArrayRef);
            Ok(format!("ArrayRef<{}>([{items}])", self.swift_type(&element)?))
        } else {
            Ok(format!("[{items}]"))
        }
    }

    /// `new C() { X = 1 }` as an immediately invoked closure.
    fn object_init(&mut self, fields: &[FieldInit], ty: &CiType) -> EmitResult<String> {
        let class = self.class_name(ty)?;
        let mut text = format!("{{ () -> {class} in let ciObject = {class}(); ");
        for field in fields {
            let value = self.expr(&field.value, Priority::Argument)?;
            text.push_str(&format!("ciObject.{} = {value}; ", member_name(&field.name)));
        }
        text.push_str("return ciObject }()");
        Ok(text)
    }
}

fn required_left(symbol: &SymbolRef) -> EmitResult<&Expr> {
    symbol
        .left
        .as_deref()
        .ok_or_else(|| EmitError::internal(format!("`{}` without a receiver", symbol.name)))
}

fn literal_text(literal: &Literal, parent: Priority) -> String {
    match literal {
        Literal::Null => "nil".to_string(),
        Literal::Bool(value) => value.to_string(),
        Literal::Int(value) if *value < 0 => parenthesize(value.to_string(), Priority::Unary, parent),
        Literal::Int(value) => value.to_string(),
        Literal::Double(value) if value.is_sign_negative() => {
            parenthesize(double_literal(*value), Priority::Unary, parent)
        }
        Literal::Double(value) => double_literal(*value),
        Literal::String(text) => format!("\"{}\"", escape_string_literal(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::config::EmitConfig;
    use ciswift_ast::{ClassRef, Program};

    fn emit(expr: &Expr, parent: Priority) -> String {
        let program = Program::default();
        let config = EmitConfig::default();
        let mut emitter = SwiftEmitter::new(&program, &config);
        emitter.expr(expr, parent).unwrap()
    }

    #[test]
    fn test_priority_order() {
        assert!(Priority::Primary > Priority::Unary);
        assert!(Priority::Comparison < Priority::NilCoalesce);
        assert_eq!(Priority::Add.next(), Priority::Mul);
        assert_eq!(Priority::Primary.next(), Priority::Primary);
    }

    #[test]
    fn test_literals() {
        assert_eq!(emit(&Expr::null(), Priority::Argument), "nil");
        assert_eq!(emit(&Expr::int(42), Priority::Argument), "42");
        assert_eq!(emit(&Expr::int(-1), Priority::Primary), "(-1)");
        assert_eq!(emit(&Expr::double(1.5), Priority::Argument), "1.5");
        assert_eq!(emit(&Expr::double(2.0), Priority::Argument), "2.0");
        assert_eq!(emit(&Expr::string("a\"b\n"), Priority::Argument), "\"a\\\"b\\n\"");
    }

    #[test]
    fn test_double_special_values() {
        assert_eq!(double_literal(f64::NAN), "Double.nan");
        assert_eq!(double_literal(f64::NEG_INFINITY), "-Double.infinity");
    }

    #[test]
    fn test_member_access_unwraps_nullable_receiver() {
        let node = CiType::class("Node", ClassRef::ReadWrite).into_nullable();
        let expr = Expr::member(Expr::local("next", node), "Value", CiType::int());
        assert_eq!(emit(&expr, Priority::Argument), "next!.value");
    }

    #[test]
    fn test_keyword_local_is_escaped() {
        assert_eq!(emit(&Expr::local("in", CiType::int()), Priority::Argument), "in_");
    }

    #[test]
    fn test_select_parenthesized_inside_addition() {
        let select = Expr::select(Expr::local("c", CiType::bool()), Expr::int(1), Expr::int(2));
        assert_eq!(emit(&select, Priority::Argument), "c ? 1 : 2");
        assert_eq!(emit(&select, Priority::Add), "(c ? 1 : 2)");
    }

    #[test]
    fn test_coerced_numeric_conversion() {
        let program = Program::default();
        let config = EmitConfig::default();
        let mut emitter = SwiftEmitter::new(&program, &config);
        let b = Expr::local("b", CiType::byte());
        assert_eq!(emitter.coerced(&CiType::int(), &b, Priority::Argument).unwrap(), "Int(b)");
        assert_eq!(emitter.coerced(&CiType::long(), &Expr::int(3), Priority::Argument).unwrap(), "3");
    }

    #[test]
    fn test_nullable_string_unwrapped_into_non_null_slot() {
        let program = Program::default();
        let config = EmitConfig::default();
        let mut emitter = SwiftEmitter::new(&program, &config);
        let s = Expr::local("s", CiType::string().into_nullable());
        assert_eq!(emitter.coerced(&CiType::string(), &s, Priority::Argument).unwrap(), "s!");
        assert_eq!(emitter.coerced(&CiType::string().into_nullable(), &s, Priority::Argument).unwrap(), "s");
    }

    #[test]
    fn test_nullable_number_converted_to_other_kind() {
        let program = Program::default();
        let config = EmitConfig::default();
        let mut emitter = SwiftEmitter::new(&program, &config);
        let b = Expr::local("b", CiType::byte().into_nullable());
        assert_eq!(emitter.coerced(&CiType::int(), &b, Priority::Argument).unwrap(), "Int(b!)");
        assert_eq!(
            emitter.coerced(&CiType::int().into_nullable(), &b, Priority::Argument).unwrap(),
            "b.map { Int($0) }"
        );
    }

    #[test]
    fn test_enum_constant_and_count() {
        assert_eq!(emit(&Expr::enum_const("Color", "Red"), Priority::Argument), "Color.red");
        let list = Expr::local("items", CiType::list(CiType::int()));
        assert_eq!(emit(&Expr::count(list), Priority::Argument), "items.count");
    }
}
