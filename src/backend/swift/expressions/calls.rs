//! Method calls and library builtins.
//!
//! User methods keep their shape (`receiver.name(args)`). Calls bound to a library builtin are rewritten to the
//! closest Swift standard library or Foundation API, activating a runtime helper where Swift has none.

use ciswift_ast::{Builtin, CiType, Expr, ExprKind, MethodRef, SymbolKind, TypeKind};
use ciswift_core::strings::camel_case;

use super::{Priority, member_op, parenthesize};
use crate::backend::swift::SwiftEmitter;
use crate::backend::swift::context::Shim;
use crate::backend::swift::errors::{EmitError, EmitResult};
use crate::backend::swift::names::member_name;
use crate::backend::swift::types::is_array_ref;

fn arg(args: &[Expr], index: usize) -> EmitResult<&Expr> {
    args.get(index)
        .ok_or_else(|| EmitError::internal(format!("missing argument {index} of a library call")))
}

fn receiver(method: &MethodRef) -> EmitResult<&Expr> {
    method
        .left
        .as_deref()
        .ok_or_else(|| EmitError::internal(format!("`{}` called without a receiver", method.name)))
}

fn is_base(expr: &Expr) -> bool {
    matches!(&expr.kind, ExprKind::Symbol(symbol) if symbol.symbol == SymbolKind::Base)
}

impl<'a> SwiftEmitter<'a> {
    pub(super) fn call(
        &mut self,
        method: &MethodRef,
        args: &[Expr],
        result: &CiType,
        parent: Priority,
    ) -> EmitResult<String> {
        let Some(builtin) = method.builtin else {
            return self.user_call(method, args);
        };
        let int = CiType::int();
        match builtin {
            Builtin::ListContains | Builtin::ListSortAll | Builtin::SetContains | Builtin::SetRemove => {
                self.user_call(method, args)
            }
            Builtin::ClassToString => match method.left.as_deref() {
                Some(obj) => Ok(format!("{}{}description", self.expr(obj, Priority::Primary)?, member_op(obj))),
                None => Ok("description".to_string()),
            },
            Builtin::StringContains => self.string_method(method, args, "contains"),
            Builtin::StringStartsWith => self.string_method(method, args, "hasPrefix"),
            Builtin::StringEndsWith => self.string_method(method, args, "hasSuffix"),
            Builtin::StringIndexOf | Builtin::StringLastIndexOf => {
                self.ctx.include("Foundation");
                self.ctx.activate(Shim::StringIndexOf);
                let s = self.unwrapped(receiver(method)?, Priority::Argument, true)?;
                let needle = self.unwrapped(arg(args, 0)?, Priority::Argument, true)?;
                let options = if builtin == Builtin::StringLastIndexOf { ", .backwards" } else { "" };
                Ok(format!("ciStringIndexOf({s}, {needle}{options})"))
            }
            Builtin::StringReplace => {
                self.ctx.include("Foundation");
                let s = self.unwrapped(receiver(method)?, Priority::Primary, true)?;
                let from = self.unwrapped(arg(args, 0)?, Priority::Argument, true)?;
                let to = self.unwrapped(arg(args, 1)?, Priority::Argument, true)?;
                Ok(format!("{s}.replacingOccurrences(of: {from}, with: {to})"))
            }
            Builtin::StringSubstring => {
                let obj = receiver(method)?;
                let offset = arg(args, 0)?;
                let mut text = if offset.is_literal_zero() {
                    self.unwrapped(obj, Priority::Primary, true)?
                } else {
                    self.ctx.activate(Shim::StringSubstring);
                    let s = self.unwrapped(obj, Priority::Argument, false)?;
                    let offset = self.coerced(&int, offset, Priority::Argument)?;
                    format!("ciStringSubstring({s}, {offset})")
                };
                if let Some(length) = args.get(1) {
                    text.push_str(&format!(".prefix({})", self.coerced(&int, length, Priority::Argument)?));
                }
                Ok(text)
            }
            Builtin::ArrayCopyTo | Builtin::ListCopyTo => {
                let obj = receiver(method)?;
                let (source_index, dest, dest_index, count) = (arg(args, 0)?, arg(args, 1)?, arg(args, 2)?, arg(args, 3)?);
                let dest = self.open_indexing(dest)?;
                let dest_range = self.range(dest_index, count)?;
                let source = self.open_indexing(obj)?;
                let source_range = self.range(source_index, count)?;
                Ok(format!("{dest}{dest_range}] = {source}{source_range}]"))
            }
            Builtin::ArrayFillAll | Builtin::ArrayFillPart => self.array_fill(method, args),
            Builtin::ArraySortAll => {
                let obj = receiver(method)?;
                let TypeKind::ArrayStorage { length, .. } = &obj.ty.kind else {
                    return self.mutating(method, ".sort()");
                };
                let length = *length;
                Ok(format!("{}0..<{length}].sort()", self.open_indexing(obj)?))
            }
            Builtin::ArraySortPart | Builtin::ListSortPart => {
                let obj = receiver(method)?;
                let open = self.open_indexing(obj)?;
                let range = self.range(arg(args, 0)?, arg(args, 1)?)?;
                Ok(format!("{open}{range}].sort()"))
            }
            Builtin::ListAdd | Builtin::QueueEnqueue | Builtin::StackPush => {
                let obj = receiver(method)?;
                let element = element_of(obj)?;
                let value = match args.first() {
                    Some(value) => self.coerced(&element, value, Priority::Argument)?,
                    None => self.new_storage(&element)?,
                };
                Ok(format!("{}{}append({value})", self.expr(obj, Priority::Primary)?, member_op(obj)))
            }
            Builtin::ListAddRange => {
                let obj = receiver(method)?;
                let target = self.expr(obj, Priority::Assign)?;
                Ok(format!("{target} += {}", self.expr(arg(args, 0)?, Priority::Argument)?))
            }
            Builtin::ListAll => self.predicate(method, args, "allSatisfy"),
            Builtin::ListAny => self.predicate(method, args, "contains"),
            Builtin::ListClear => self.mutating(method, ".removeAll()"),
            Builtin::ListIndexOf => {
                let obj = receiver(method)?;
                let element = element_of(obj)?;
                let value = self.coerced(&element, arg(args, 0)?, Priority::Argument)?;
                let text = format!("{}{}firstIndex(of: {value}) ?? -1", self.expr(obj, Priority::Primary)?, member_op(obj));
                Ok(parenthesize(text, Priority::NilCoalesce, parent))
            }
            Builtin::ListInsert => {
                let obj = receiver(method)?;
                let element = element_of(obj)?;
                let index = self.coerced(&int, arg(args, 0)?, Priority::Argument)?;
                let value = match args.get(1) {
                    Some(value) => self.coerced(&element, value, Priority::Argument)?,
                    None => self.new_storage(&element)?,
                };
                Ok(format!("{}{}insert({value}, at: {index})", self.expr(obj, Priority::Primary)?, member_op(obj)))
            }
            Builtin::ListLast | Builtin::StackPeek => self.mutating(method, ".last!"),
            Builtin::QueuePeek => self.mutating(method, ".first!"),
            Builtin::ListRemoveAt => {
                let index = self.coerced(&int, arg(args, 0)?, Priority::Argument)?;
                self.mutating(method, &format!(".remove(at: {index})"))
            }
            Builtin::ListRemoveRange => {
                let range = self.range(arg(args, 0)?, arg(args, 1)?)?;
                self.mutating(method, &format!(".removeSubrange({range})"))
            }
            Builtin::QueueDequeue => self.mutating(method, ".removeFirst()"),
            Builtin::StackPop => self.mutating(method, ".removeLast()"),
            Builtin::SetAdd => {
                let obj = receiver(method)?;
                let element = element_of(obj)?;
                let value = self.coerced(&element, arg(args, 0)?, Priority::Argument)?;
                self.mutating(method, &format!(".insert({value})"))
            }
            Builtin::DictionaryAdd => {
                let obj = receiver(method)?;
                let value_type = obj
                    .ty
                    .value()
                    .cloned()
                    .ok_or_else(|| EmitError::internal("dictionary without a value type"))?;
                let slot = self.indexing(obj, arg(args, 0)?)?;
                Ok(format!("{slot} = {}", self.new_storage(&value_type)?))
            }
            Builtin::DictionaryContainsKey => {
                let slot = self.indexing(receiver(method)?, arg(args, 0)?)?;
                Ok(parenthesize(format!("{slot} != nil"), Priority::Comparison, parent))
            }
            Builtin::DictionaryRemove => {
                let obj = receiver(method)?;
                let key = match obj.ty.key() {
                    Some(key) => key.clone(),
                    None => return Err(EmitError::internal("dictionary without a key type")),
                };
                let key = self.coerced(&key, arg(args, 0)?, Priority::Argument)?;
                self.mutating(method, &format!(".removeValue(forKey: {key})"))
            }
            Builtin::ConsoleWrite => {
                let value = self.unwrapped(arg(args, 0)?, Priority::Argument, true)?;
                Ok(format!("print({value}, terminator: \"\")"))
            }
            Builtin::ConsoleWriteLine => match args.first() {
                Some(value) => Ok(format!("print({})", self.unwrapped(value, Priority::Argument, true)?)),
                None => Ok("print()".to_string()),
            },
            Builtin::Utf8GetByteCount => {
                Ok(format!("{}.utf8.count", self.unwrapped(arg(args, 0)?, Priority::Primary, true)?))
            }
            Builtin::Utf8GetBytes => Err(EmitError::internal("UTF-8 GetBytes used as a value")),
            Builtin::Utf8GetString => {
                let open = self.open_indexing(arg(args, 0)?)?;
                let range = self.range(arg(args, 1)?, arg(args, 2)?)?;
                Ok(format!("String(decoding: {open}{range}], as: UTF8.self)"))
            }
            Builtin::EnvironmentGetVariable => {
                self.ctx.include("Foundation");
                let name = self.unwrapped(arg(args, 0)?, Priority::Argument, false)?;
                Ok(format!("ProcessInfo.processInfo.environment[{name}]"))
            }
            Builtin::MathFunction => {
                self.ctx.include("Foundation");
                self.free_call(&camel_case(&method.name), method, args)
            }
            Builtin::MathAbs | Builtin::MathMax | Builtin::MathMin => {
                self.free_call(&camel_case(&method.name), method, args)
            }
            Builtin::MathCeiling => {
                self.ctx.include("Foundation");
                self.free_call("ceil", method, args)
            }
            Builtin::MathFusedMultiplyAdd => {
                self.ctx.include("Foundation");
                self.free_call("fma", method, args)
            }
            Builtin::MathTruncate => {
                self.ctx.include("Foundation");
                self.free_call("trunc", method, args)
            }
            Builtin::MathClamp => {
                let value = self.coerced(result, arg(args, 0)?, Priority::Argument)?;
                let low = self.coerced(result, arg(args, 1)?, Priority::Argument)?;
                let high = self.coerced(result, arg(args, 2)?, Priority::Argument)?;
                Ok(format!("min(max({value}, {low}), {high})"))
            }
            Builtin::MathIsFinite => self.property_of_first(args, ".isFinite"),
            Builtin::MathIsInfinity => self.property_of_first(args, ".isInfinite"),
            Builtin::MathIsNaN => self.property_of_first(args, ".isNaN"),
            Builtin::MathRound => self.property_of_first(args, ".rounded()"),
        }
    }

    fn user_call(&mut self, method: &MethodRef, args: &[Expr]) -> EmitResult<String> {
        let prefix = match method.left.as_deref() {
            Some(left) if is_base(left) => "super.".to_string(),
            Some(left) => format!("{}{}", self.expr(left, Priority::Primary)?, member_op(left)),
            None if method.is_static => method.owner.as_ref().map(|o| format!("{o}.")).unwrap_or_default(),
            None => String::new(),
        };
        let args = self.arguments(method, args)?;
        Ok(format!("{prefix}{}({args})", member_name(&method.name)))
    }

    /// Comma-separated arguments, each coerced to its declared parameter type when known.
    fn arguments(&mut self, method: &MethodRef, args: &[Expr]) -> EmitResult<String> {
        let mut texts = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            texts.push(match method.params.get(i) {
                Some(param) => self.coerced(param, arg, Priority::Argument)?,
                None => self.expr(arg, Priority::Argument)?,
            });
        }
        Ok(texts.join(", "))
    }

    fn free_call(&mut self, name: &str, method: &MethodRef, args: &[Expr]) -> EmitResult<String> {
        Ok(format!("{name}({})", self.arguments(method, args)?))
    }

    fn string_method(&mut self, method: &MethodRef, args: &[Expr], name: &str) -> EmitResult<String> {
        let s = self.unwrapped(receiver(method)?, Priority::Primary, true)?;
        let value = self.unwrapped(arg(args, 0)?, Priority::Argument, true)?;
        Ok(format!("{s}.{name}({value})"))
    }

    /// `receiver` followed by `suffix`, forcing a nullable receiver.
    fn mutating(&mut self, method: &MethodRef, suffix: &str) -> EmitResult<String> {
        let obj = receiver(method)?;
        Ok(format!("{}{suffix}", self.unwrapped(obj, Priority::Primary, true)?))
    }

    fn property_of_first(&mut self, args: &[Expr], suffix: &str) -> EmitResult<String> {
        Ok(format!("{}{suffix}", self.unwrapped(arg(args, 0)?, Priority::Primary, true)?))
    }

    /// `list.allSatisfy { x in ... }` with the lambda as trailing closure.
    fn predicate(&mut self, method: &MethodRef, args: &[Expr], name: &str) -> EmitResult<String> {
        let lambda = self.expr(arg(args, 0)?, Priority::Argument)?;
        self.mutating(method, &format!(".{name} {lambda}"))
    }

    fn array_fill(&mut self, method: &MethodRef, args: &[Expr]) -> EmitResult<String> {
        let obj = receiver(method)?;
        let element = element_of(obj)?;
        let value = self.coerced(&element, arg(args, 0)?, Priority::Argument)?;
        let value_array = matches!(obj.ty.kind, TypeKind::ArrayStorage { .. }) && !is_array_ref(&obj.ty);
        match (method.builtin, value_array) {
            (Some(Builtin::ArrayFillAll), true) => {
                let TypeKind::ArrayStorage { length, .. } = &obj.ty.kind else {
                    return Err(EmitError::internal("expected a storage array"));
                };
                let length = *length;
                let target = self.expr(obj, Priority::Assign)?;
                let element_type = self.swift_type(&element)?;
                Ok(format!("{target} = [{element_type}](repeating: {value}, count: {length})"))
            }
            (Some(Builtin::ArrayFillPart), true) => {
                let open = self.open_indexing(obj)?;
                let (start, count) = (arg(args, 1)?, arg(args, 2)?);
                let range = self.range(start, count)?;
                let count = self.coerced(&CiType::int(), count, Priority::Argument)?;
                Ok(format!("{open}{range}] = ArraySlice(repeating: {value}, count: {count})"))
            }
            (_, _) => {
                let mut texts = vec![value];
                for extra in args.iter().skip(1) {
                    texts.push(self.coerced(&CiType::int(), extra, Priority::Argument)?);
                }
                self.mutating(method, &format!(".fill({})", texts.join(", ")))
            }
        }
    }

    /// `start..<start + count` over `Int` offsets.
    pub(crate) fn range(&mut self, start: &Expr, count: &Expr) -> EmitResult<String> {
        let int = CiType::int();
        let from = self.coerced(&int, start, Priority::Add)?;
        let to = match (&start.kind, &count.kind) {
            (
                ExprKind::Literal(ciswift_ast::Literal::Int(a)),
                ExprKind::Literal(ciswift_ast::Literal::Int(b)),
            ) => a.checked_add(*b).map_or_else(|| format!("{a} + {b}"), |end| end.to_string()),
            _ if start.is_literal_zero() => self.coerced(&int, count, Priority::Add)?,
            _ => format!("{from} + {}", self.coerced(&int, count, Priority::Mul)?),
        };
        Ok(format!("{from}..<{to}"))
    }
}

fn element_of(obj: &Expr) -> EmitResult<CiType> {
    obj.ty
        .element()
        .cloned()
        .ok_or_else(|| EmitError::internal("collection without an element type"))
}
