//! Classes, enums and their members.
//!
//! ## Notes
//!
//! - Source visibility maps onto Swift access levels: `internal` becomes `fileprivate`, `protected` becomes `public`.
//! - Fields whose initializer calls a method cannot be initialized in place, because Swift property initializers run
//!   before `self` exists. Those are assigned at the top of a synthesized `init()`.
//! - Flags enums become `OptionSet` structs (see [`super::flags`]).

use ciswift_ast::{
    CallType, CiType, Class, ClassRef, CodeDoc, Const, DocBlock, Enum, Expr, ExprKind, Field, Method, TypeKind,
    Visibility,
};

use super::SwiftEmitter;
use super::errors::{EmitError, EmitResult};
use super::expressions::Priority;
use super::expressions::effects::throws;
use super::flags::union_of_earlier;
use super::names::{member_name, method_const_name, param_shadow_name};
use super::types::is_array_ref;
use crate::backend::writer::CodeSink;

fn visibility(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Private => "private ",
        Visibility::Internal => "fileprivate ",
        Visibility::Protected | Visibility::Public => "public ",
    }
}

/// Whether the initializer must run inside `init()`.
fn initialized_in_constructor(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Call { .. } | ExprKind::ObjectInit(_) => true,
        ExprKind::Binary { left, right, .. } => initialized_in_constructor(left) || initialized_in_constructor(right),
        ExprKind::Prefix { inner, .. } | ExprKind::Postfix { inner, .. } => initialized_in_constructor(inner),
        ExprKind::Select {
            cond,
            on_true,
            on_false,
        } => [cond, on_true, on_false].into_iter().any(|e| initialized_in_constructor(e)),
        ExprKind::ArrayInit(items) => items.iter().any(initialized_in_constructor),
        ExprKind::Interpolated { parts, .. } => parts.iter().any(|p| initialized_in_constructor(&p.argument)),
        _ => false,
    }
}

impl<'a> SwiftEmitter<'a> {
    /// `///` comment lines for `doc`.
    pub(crate) fn write_doc(&mut self, doc: Option<&CodeDoc>) {
        let Some(doc) = doc else {
            return;
        };
        for line in doc.summary.lines() {
            self.out.write_line(&format!("/// {line}"));
        }
        for block in &doc.details {
            self.out.write_line("///");
            match block {
                DocBlock::Para(text) => {
                    for line in text.lines() {
                        self.out.write_line(&format!("/// {line}"));
                    }
                }
                DocBlock::List(items) => {
                    for item in items {
                        self.out.write_line(&format!("/// * {item}"));
                    }
                }
            }
        }
    }

    pub(crate) fn write_class(&mut self, class: &'a Class) -> EmitResult<()> {
        self.out.separate();
        self.write_doc(class.doc.as_ref());
        let mut header = String::new();
        if class.is_public {
            header.push_str("public ");
        }
        if class.call_type == CallType::Sealed {
            header.push_str("final ");
        }
        header.push_str("class ");
        header.push_str(&class.name);
        if let Some(base) = &class.base {
            header.push_str(&format!(" : {base}"));
        }
        if class.adds_to_string() {
            header.push_str(if class.base.is_some() { ", " } else { " : " });
            header.push_str("CustomStringConvertible");
        }
        self.out.write_line(&header);
        self.out.open_block();

        self.write_constructor(class).map_err(|e| e.at(class.span))?;
        for konst in &class.consts {
            self.write_const(konst).map_err(|e| e.at(konst.span))?;
        }
        for field in &class.fields {
            self.write_field(field).map_err(|e| e.at(field.span))?;
        }
        for method in &class.methods {
            self.write_method(method).map_err(|e| e.at(method.span))?;
        }

        self.out.close_block();
        Ok(())
    }

    fn write_constructor(&mut self, class: &'a Class) -> EmitResult<()> {
        let deferred: Vec<&'a Field> = class
            .fields
            .iter()
            .filter(|f| f.value.as_ref().is_some_and(initialized_in_constructor))
            .collect();
        if class.constructor.is_none() && deferred.is_empty() {
            return Ok(());
        }
        self.out.separate();
        let mut header = match &class.constructor {
            Some(constructor) => {
                self.write_doc(constructor.doc.as_ref());
                visibility(constructor.visibility).to_string()
            }
            None => "fileprivate ".to_string(),
        };
        if class.base.is_some() {
            header.push_str("override ");
        }
        header.push_str("init()");
        self.out.write_line(&header);
        self.out.open_block();
        self.ctx.push_scope();
        for field in deferred {
            let Some(value) = &field.value else {
                continue;
            };
            if throws(value) {
                return Err(EmitError::unsupported("throwing field initializer"));
            }
            let value = self.coerced(&field.ty, value, Priority::Argument)?;
            self.out.write_line(&format!("self.{} = {value}", member_name(&field.name)));
        }
        if let Some(constructor) = &class.constructor {
            self.write_statements(&constructor.body)?;
        }
        self.ctx.pop_scope();
        self.out.close_block();
        Ok(())
    }

    fn write_const(&mut self, konst: &'a Const) -> EmitResult<()> {
        self.out.separate();
        self.write_doc(konst.doc.as_ref());
        let name = match &konst.in_method {
            Some(method) => method_const_name(method, &konst.name),
            None => member_name(&konst.name),
        };
        let plain = matches!(
            konst.ty.kind,
            TypeKind::Integer(ciswift_ast::IntRange::Int)
                | TypeKind::Enum { .. }
                | TypeKind::String(ciswift_ast::StringKind::Ptr)
        ) || matches!(konst.value.kind, ExprKind::ArrayInit(_));
        let value = self.expr(&konst.value, Priority::Argument)?;
        let value = if plain {
            value
        } else {
            format!("{}({value})", self.swift_type(&konst.ty)?)
        };
        self.out
            .write_line(&format!("{}static let {name} = {value}", visibility(konst.visibility)));
        Ok(())
    }

    fn write_field(&mut self, field: &'a Field) -> EmitResult<()> {
        self.out.separate();
        self.write_doc(field.doc.as_ref());
        let mut line = visibility(field.visibility).to_string();
        if is_unowned(&field.ty) {
            line.push_str("unowned ");
        }
        let keyword = match &field.ty.kind {
            TypeKind::Class {
                reference: ClassRef::Storage,
                ..
            } if !field.is_assigned => "let",
            TypeKind::ArrayStorage { .. } if is_array_ref(&field.ty) => "let",
            TypeKind::Lock => "let",
            _ => "var",
        };
        line.push_str(&format!("{keyword} {}", member_name(&field.name)));
        if !field.ty.is_storage() {
            line.push_str(&format!(" : {}", self.swift_type(&field.ty)?));
        }
        match &field.value {
            Some(value) if !initialized_in_constructor(value) => {
                line.push_str(&format!(" = {}", self.coerced(&field.ty, value, Priority::Argument)?));
            }
            Some(_) => {}
            None if field.ty.is_storage() => line.push_str(&format!(" = {}", self.new_storage(&field.ty)?)),
            None if field.ty.is_numeric() || field.ty.is_enum() || field.ty.is_string_storage() => {
                line.push_str(&format!(" = {}", self.default_value(&field.ty)?));
            }
            None => {}
        }
        self.out.write_line(&line);
        Ok(())
    }

    fn write_method(&mut self, method: &'a Method) -> EmitResult<()> {
        self.out.separate();
        self.write_doc(method.doc.as_ref());
        for param in &method.params {
            if let Some(doc) = &param.doc {
                self.out
                    .write_line(&format!("/// - parameter {} {doc}", member_name(&param.name)));
            }
        }
        let dynamic = if method.visibility == Visibility::Internal { "fileprivate " } else { "open " };
        let mut header = match method.call_type {
            CallType::Static => format!("{}static ", visibility(method.visibility)),
            CallType::Normal => visibility(method.visibility).to_string(),
            CallType::Abstract | CallType::Virtual => dynamic.to_string(),
            CallType::Override => format!("{dynamic}override "),
            CallType::Sealed => format!("{}final override ", visibility(method.visibility)),
        };
        if method.is_to_string {
            header.push_str("var description : String");
        } else {
            let mut params = Vec::with_capacity(method.params.len());
            for param in &method.params {
                let name = if param.is_assigned {
                    param_shadow_name(&param.name)
                } else {
                    member_name(&param.name)
                };
                let mut text = format!("_ {name} : {}", self.swift_type(&param.ty)?);
                if let Some(default) = &param.default {
                    text.push_str(&format!(" = {}", self.coerced(&param.ty, default, Priority::Argument)?));
                }
                params.push(text);
            }
            header.push_str(&format!("func {}({})", member_name(&method.name), params.join(", ")));
            if method.throws {
                header.push_str(" throws");
            }
            if !method.return_type.is_void() {
                header.push_str(&format!(" -> {}", self.swift_type(&method.return_type)?));
            }
        }
        self.out.write_line(&header);
        self.out.open_block();
        if method.call_type == CallType::Abstract {
            self.out.write_line("preconditionFailure(\"Abstract method called\")");
        } else {
            self.ctx.push_scope();
            for param in method.params.iter().filter(|p| p.is_assigned) {
                let name = member_name(&param.name);
                let ty = self.swift_type(&param.ty)?;
                self.out
                    .write_line(&format!("var {name} : {ty} = {}", param_shadow_name(&param.name)));
                self.ctx.declare(&name);
            }
            let returns = (!method.return_type.is_void()).then_some(&method.return_type);
            self.ctx.set_return_type(returns);
            let result = self.write_statements(&method.body);
            self.ctx.set_return_type(None);
            self.ctx.pop_scope();
            result?;
        }
        self.out.close_block();
        Ok(())
    }

    pub(crate) fn write_enum(&mut self, enu: &'a Enum) -> EmitResult<()> {
        self.out.separate();
        self.write_doc(enu.doc.as_ref());
        let public = if enu.is_public { "public " } else { "" };
        if enu.flags {
            self.write_flags(enu, public);
            return Ok(());
        }
        let raw = if enu.constants.iter().any(|c| c.explicit) { " : Int" } else { "" };
        self.out.write_line(&format!("{public}enum {}{raw}", enu.name));
        self.out.open_block();
        let mut first_by_value: Vec<(i64, String)> = Vec::new();
        for konst in &enu.constants {
            self.write_doc(konst.doc.as_ref());
            let name = member_name(&konst.name);
            match first_by_value.iter().find(|(v, _)| *v == konst.value) {
                Some((_, original)) => self.out.write_line(&format!("static let {name} = {original}")),
                None => {
                    if konst.explicit {
                        self.out.write_line(&format!("case {name} = {}", konst.value));
                    } else {
                        self.out.write_line(&format!("case {name}"));
                    }
                    first_by_value.push((konst.value, name));
                }
            }
        }
        self.out.close_block();
        Ok(())
    }

    fn write_flags(&mut self, enu: &'a Enum, public: &str) {
        self.out.write_line(&format!("{public}struct {} : OptionSet", enu.name));
        self.out.open_block();
        if enu.is_public {
            self.out.write_line("public let rawValue : Int");
            self.out.write("public init(rawValue: Int)");
            self.out.open_child();
            self.out.write_line("self.rawValue = rawValue");
            self.out.close_block();
        } else {
            self.out.write_line("let rawValue : Int");
        }
        for (index, konst) in enu.constants.iter().enumerate() {
            self.write_doc(konst.doc.as_ref());
            let value = if konst.value == 0 {
                "[]".to_string()
            } else if let Some(members) = union_of_earlier(enu, index) {
                let members: Vec<String> = members.iter().map(|m| format!(".{}", member_name(m))).collect();
                format!("[{}]", members.join(", "))
            } else {
                format!("rawValue: {}", konst.value)
            };
            self.out.write_line(&format!(
                "{public}static let {} = {}({value})",
                member_name(&konst.name),
                enu.name
            ));
        }
        self.out.close_block();
    }
}

/// Whether a field of type `ty` must not keep its target alive.
fn is_unowned(ty: &CiType) -> bool {
    matches!(
        ty.kind,
        TypeKind::Class {
            reference: ClassRef::ReadOnly | ClassRef::ReadWrite,
            ..
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::config::EmitConfig;
    use ciswift_ast::{EnumConst, Param, Program, Stmt};

    fn emit_with<'a>(program: &'a Program, f: impl FnOnce(&mut SwiftEmitter<'a>) -> EmitResult<()>) -> String {
        let config: &'a EmitConfig = Box::leak(Box::new(EmitConfig::new().with_spaces(4)));
        let mut emitter = SwiftEmitter::new(program, config);
        f(&mut emitter).unwrap();
        std::mem::replace(&mut emitter.out, crate::backend::writer::SourceWriter::new(config)).finish()
    }

    #[test]
    fn test_plain_enum_with_alias() {
        let enu = Enum {
            name: "Level".to_string(),
            is_public: true,
            flags: false,
            constants: vec![
                EnumConst::new("Low", 0),
                EnumConst {
                    explicit: true,
                    ..EnumConst::new("High", 5)
                },
                EnumConst {
                    explicit: true,
                    ..EnumConst::new("Max", 5)
                },
            ],
            doc: None,
            span: None,
        };
        let program = Program::default();
        let text = emit_with(&program, |e| e.write_enum(&enu));
        assert_eq!(
            text,
            "public enum Level : Int\n{\n    case low\n    case high = 5\n    static let max = high\n}\n"
        );
    }

    #[test]
    fn test_flags_struct() {
        let enu = Enum {
            name: "Access".to_string(),
            is_public: false,
            flags: true,
            constants: vec![
                EnumConst::new("None", 0),
                EnumConst::new("Read", 1),
                EnumConst::new("Write", 2),
                EnumConst::new("All", 3),
            ],
            doc: None,
            span: None,
        };
        let program = Program::default();
        let text = emit_with(&program, |e| e.write_enum(&enu));
        assert_eq!(
            text,
            "struct Access : OptionSet\n{\n    let rawValue : Int\n    static let none = Access([])\n    \
             static let read = Access(rawValue: 1)\n    static let write = Access(rawValue: 2)\n    \
             static let all = Access([.read, .write])\n}\n"
        );
    }

    #[test]
    fn test_field_defaults_and_unowned() {
        let mut parent = Field::new("Parent", CiType::class("Node", ClassRef::ReadWrite).into_nullable());
        parent.visibility = Visibility::Internal;
        let count = Field::new("Count", CiType::int());
        assert!(is_unowned(&parent.ty));
        let program = Program::default();
        let text = emit_with(&program, |e| {
            e.write_field(&parent)?;
            e.write_field(&count)
        });
        assert_eq!(text, "fileprivate unowned var parent : Node?\n\nprivate var count : Int = 0\n");
    }

    #[test]
    fn test_method_with_reassigned_parameter() {
        let mut param = Param::new("n", CiType::int());
        param.is_assigned = true;
        let mut method = Method::new("Countdown", CiType::void());
        method.params = vec![param];
        method.body = vec![Stmt::compound(
            ciswift_ast::AssignOp::Sub,
            Expr::local("n", CiType::int()),
            Expr::int(1),
        )];
        let program = Program::default();
        let text = emit_with(&program, |e| e.write_method(&method));
        assert_eq!(
            text,
            "public func countdown(_ ciParamN : Int)\n{\n    var n : Int = ciParamN\n    n -= 1\n}\n"
        );
    }

    #[test]
    fn test_abstract_method_body() {
        let mut method = Method::new("Area", CiType::double());
        method.call_type = CallType::Abstract;
        let program = Program::default();
        let text = emit_with(&program, |e| e.write_method(&method));
        assert_eq!(
            text,
            "open func area() -> Double\n{\n    preconditionFailure(\"Abstract method called\")\n}\n"
        );
    }
}
