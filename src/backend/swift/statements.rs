//! Statement lowering.
//!
//! ## Notes
//!
//! - **Hoisted increments**: prefix `++`/`--` found in a statement are written as `x += 1` before it, postfix ones
//!   after it. An `if` runs its postfix effects at the start of both branches and a `switch` at the start of every
//!   case, since the condition is consumed before either.
//! - **`try`**: a statement whose expression may throw is prefixed with `try` once, covering the whole expression.
//! - **Scopes**: every block pushes a frame in [`EmitContext`](super::context::EmitContext). Redefining a local in the
//!   same frame becomes an assignment.

use ciswift_ast::{AssignOp, Builtin, CaseValue, CiType, Expr, ExprKind, PrefixOp, Stmt, StmtKind, SwitchCase, TypeKind, VarDecl};

use super::SwiftEmitter;
use super::context::Shim;
use super::errors::{EmitError, EmitResult};
use super::expressions::Priority;
use super::expressions::effects::{Fixity, has_xcrement, throws, xcrements};
use super::flags::FlagsOp;
use super::names::member_name;
use super::types::is_array_ref;
use crate::backend::writer::CodeSink;

fn is_get_bytes(stmt: &Stmt) -> bool {
    matches!(&stmt.kind, StmtKind::Expr(e) if e.builtin() == Some(Builtin::Utf8GetBytes))
}

/// An `else` branch consisting of a single `if`, which chains as `} else if`.
#[allow(clippy::type_complexity)]
fn else_if(branch: Option<&[Stmt]>) -> Option<(&Stmt, &Expr, &[Stmt], Option<&[Stmt]>)> {
    match branch {
        Some(
            [
                nested @ Stmt {
                    kind:
                        StmtKind::If {
                            cond,
                            then_branch,
                            else_branch,
                        },
                    ..
                },
            ],
        ) => Some((nested, cond, then_branch.as_slice(), else_branch.as_deref())),
        _ => None,
    }
}

fn try_prefix(throwing: bool) -> &'static str {
    if throwing { "try " } else { "" }
}

impl<'a> SwiftEmitter<'a> {
    /// Emit a statement list in the current scope.
    pub(crate) fn write_statements(&mut self, stmts: &'a [Stmt]) -> EmitResult<()> {
        let byte_conversions = stmts.iter().filter(|s| is_get_bytes(s)).count();
        self.ctx.set_mutable_bytes(byte_conversions > 1);
        for stmt in stmts {
            self.write_stmt(stmt)?;
        }
        Ok(())
    }

    pub(crate) fn write_stmt(&mut self, stmt: &'a Stmt) -> EmitResult<()> {
        self.write_stmt_kind(stmt).map_err(|e| e.at(stmt.span))
    }

    fn write_stmt_kind(&mut self, stmt: &'a Stmt) -> EmitResult<()> {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.write_expr_stmt(expr),
            StmtKind::Var(var) => self.write_var(var),
            StmtKind::Assign { op, target, value } => self.write_assign(*op, target, value),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.write_if(cond, then_branch, else_branch.as_deref()),
            StmtKind::For {
                init,
                cond,
                advance,
                body,
            } => self.write_for(init.as_deref(), cond.as_ref(), advance.as_deref(), body),
            StmtKind::ForRange {
                var,
                start,
                bound,
                end,
                step,
                body,
            } => self.write_for_range(var, start, *bound, end, *step, body),
            StmtKind::While { cond, body } => self.write_while(cond, body),
            StmtKind::DoWhile { body, cond } => self.write_do_while(body, cond),
            StmtKind::Foreach {
                vars,
                collection,
                body,
            } => self.write_foreach(vars, collection, body),
            StmtKind::Switch { value, cases, default } => self.write_switch(value, cases, default.as_deref()),
            StmtKind::Throw(message) => self.write_throw(message),
            StmtKind::Lock { lock, body } => self.write_lock(lock, body),
            StmtKind::Return(value) => self.write_return(value.as_ref()),
            StmtKind::Break => {
                self.out.write_line("break");
                Ok(())
            }
            StmtKind::Continue => self.write_continue(),
            StmtKind::Block(body) => {
                self.out.write("do");
                self.write_child(body)
            }
            StmtKind::Assert { cond, message } => self.write_assert(cond, message.as_ref()),
        }
    }

    /// ` {`, the body in a fresh scope, `}`.
    pub(crate) fn write_child(&mut self, body: &'a [Stmt]) -> EmitResult<()> {
        self.open_scope();
        self.write_statements(body)?;
        self.close_scope();
        Ok(())
    }

    pub(crate) fn open_scope(&mut self) {
        self.out.open_child();
        self.ctx.push_scope();
    }

    pub(crate) fn close_scope(&mut self) {
        self.ctx.pop_scope();
        self.out.close_block();
    }

    /// Write the hoisted increments of `expr` with the given fixity.
    pub(crate) fn write_effects(&mut self, expr: &Expr, fixity: Fixity) -> EmitResult<()> {
        for effect in xcrements(expr, fixity) {
            let target = self.expr(effect.target, Priority::Assign)?;
            self.out.write_line(&format!("{target}{}", effect.operator()));
        }
        Ok(())
    }

    /// Expression text at statement level, with `try` when it may throw.
    pub(crate) fn stmt_expr(&mut self, expr: &Expr, parent: Priority) -> EmitResult<String> {
        let text = self.expr(expr, parent)?;
        Ok(format!("{}{text}", try_prefix(throws(expr))))
    }

    /// [`Self::coerced`] at statement level, with `try` when it may throw.
    pub(crate) fn stmt_coerced(&mut self, ty: &CiType, expr: &Expr) -> EmitResult<String> {
        let text = self.coerced(ty, expr, Priority::Argument)?;
        Ok(format!("{}{text}", try_prefix(throws(expr))))
    }

    fn write_expr_stmt(&mut self, expr: &'a Expr) -> EmitResult<()> {
        if let ExprKind::Call { method, args } = &expr.kind {
            if method.builtin == Some(Builtin::Utf8GetBytes) {
                return self.write_get_bytes(args);
            }
        }
        self.write_effects(expr, Fixity::Prefix)?;
        let bare_xcrement = matches!(
            &expr.kind,
            ExprKind::Postfix { .. }
                | ExprKind::Prefix {
                    op: PrefixOp::Increment | PrefixOp::Decrement,
                    ..
                }
        );
        if !bare_xcrement {
            let text = self.stmt_expr(expr, Priority::Statement)?;
            let discard = matches!(expr.kind, ExprKind::Call { .. }) && !expr.ty.is_void();
            self.out.write_line(&if discard { format!("_ = {text}") } else { text });
        }
        self.write_effects(expr, Fixity::Postfix)
    }

    fn write_var(&mut self, var: &'a VarDecl) -> EmitResult<()> {
        if let Some(value) = &var.value {
            self.write_effects(value, Fixity::Prefix)?;
        }
        let name = member_name(&var.name);
        let value = match &var.value {
            Some(value) => Some(self.stmt_coerced(&var.ty, value)?),
            None if var.ty.is_storage() => Some(self.new_storage(&var.ty)?),
            None => None,
        };
        if self.ctx.declare(&name) {
            let keyword = match &var.ty.kind {
                TypeKind::ArrayStorage { .. } => {
                    if is_array_ref(&var.ty) {
                        "let"
                    } else {
                        "var"
                    }
                }
                _ if !var.is_assigned && !var.ty.is_storage() => "let",
                _ => "var",
            };
            let mut line = format!("{keyword} {name}");
            if !var.ty.is_storage() {
                line.push_str(&format!(" : {}", self.swift_type(&var.ty)?));
            }
            if let Some(value) = value {
                line.push_str(&format!(" = {value}"));
            }
            self.out.write_line(&line);
        } else if let Some(value) = value {
            self.out.write_line(&format!("{name} = {value}"));
        }
        match &var.value {
            Some(value) => self.write_effects(value, Fixity::Postfix),
            None => Ok(()),
        }
    }

    fn write_assign(&mut self, op: AssignOp, target: &'a Expr, value: &'a Expr) -> EmitResult<()> {
        self.write_effects(target, Fixity::Prefix)?;
        self.write_effects(value, Fixity::Prefix)?;
        let try_ = try_prefix(throws(target) || throws(value));
        let flags = target.ty.is_flags();
        match op {
            AssignOp::And if target.ty.is_bool() => {
                let cond = match &value.kind {
                    ExprKind::Prefix {
                        op: PrefixOp::Not,
                        inner,
                    } => self.expr(inner, Priority::Argument)?,
                    _ => format!("!{}", self.expr(value, Priority::Primary)?),
                };
                let target = self.expr(target, Priority::Assign)?;
                self.write_flag_reset(&format!("if {try_}{cond}"), &format!("{target} = false"));
            }
            AssignOp::Or if target.ty.is_bool() => {
                let cond = self.expr(value, Priority::Argument)?;
                let target = self.expr(target, Priority::Assign)?;
                self.write_flag_reset(&format!("if {try_}{cond}"), &format!("{target} = true"));
            }
            AssignOp::Xor if target.ty.is_bool() => {
                let lhs = self.expr(target, Priority::Assign)?;
                let read = self.expr(target, Priority::NilCoalesce)?;
                let rhs = self.expr(value, Priority::NilCoalesce)?;
                self.out.write_line(&format!("{try_}{lhs} = {read} != {rhs}"));
            }
            AssignOp::And | AssignOp::Or | AssignOp::Xor if flags => {
                let (flags_op, value) = match (op, &value.kind) {
                    (
                        AssignOp::And,
                        ExprKind::Prefix {
                            op: PrefixOp::Complement,
                            inner,
                        },
                    ) => (FlagsOp::Subtracting, &**inner),
                    (AssignOp::And, _) => (FlagsOp::Intersection, value),
                    (AssignOp::Or, _) => (FlagsOp::Union, value),
                    _ => (FlagsOp::SymmetricDifference, value),
                };
                let target = self.expr(target, Priority::Primary)?;
                let value = self.expr(value, Priority::Argument)?;
                self.out
                    .write_line(&format!("{try_}{target}.{}({value})", flags_op.in_place_method()));
            }
            _ => {
                let lhs = self.expr(target, Priority::Assign)?;
                let rhs = match (&value.kind, &target.kind) {
                    (
                        ExprKind::Literal(ciswift_ast::Literal::Null),
                        ExprKind::Binary {
                            op: ciswift_ast::BinaryOp::Index,
                            left,
                            ..
                        },
                    ) if left.ty.is_dictionary() => {
                        // `dict[k] = nil` would remove the key
                        format!("{}.none", self.swift_type(&target.ty.clone().into_nullable())?)
                    }
                    _ => self.coerced(&target.ty, value, Priority::Argument)?,
                };
                self.out.write_line(&format!("{try_}{lhs} {} {rhs}", op.as_str()));
            }
        }
        self.write_effects(target, Fixity::Postfix)?;
        self.write_effects(value, Fixity::Postfix)
    }

    fn write_flag_reset(&mut self, header: &str, assignment: &str) {
        self.out.write(header);
        self.out.open_child();
        self.out.write_line(assignment);
        self.out.close_block();
    }

    fn write_if(&mut self, cond: &'a Expr, then_branch: &'a [Stmt], else_branch: Option<&'a [Stmt]>) -> EmitResult<()> {
        self.write_effects(cond, Fixity::Prefix)?;
        let text = self.stmt_expr(cond, Priority::Argument)?;
        self.out.write(&format!("if {text}"));
        self.write_if_rest(cond, then_branch, else_branch)
    }

    /// Branches of an `if` whose header is already written.
    fn write_if_rest(
        &mut self,
        cond: &'a Expr,
        then_branch: &'a [Stmt],
        else_branch: Option<&'a [Stmt]>,
    ) -> EmitResult<()> {
        let has_postfix = !xcrements(cond, Fixity::Postfix).is_empty();
        self.open_scope();
        self.write_effects(cond, Fixity::Postfix)?;
        self.write_statements(then_branch)?;
        self.ctx.pop_scope();
        self.out.dedent();

        if let Some((nested, nested_cond, nested_then, nested_else)) = else_if(else_branch) {
            if !has_postfix && xcrements(nested_cond, Fixity::Prefix).is_empty() {
                let text = self.stmt_expr(nested_cond, Priority::Argument)?;
                self.out.write(&format!("}} else if {text}"));
                return self
                    .write_if_rest(nested_cond, nested_then, nested_else)
                    .map_err(|e| e.at(nested.span));
            }
        }

        match else_branch {
            Some(body) => {
                self.out.write("} else");
                self.open_scope();
                self.write_effects(cond, Fixity::Postfix)?;
                self.write_statements(body)?;
                self.close_scope();
            }
            None if has_postfix => {
                self.out.write("} else");
                self.open_scope();
                self.write_effects(cond, Fixity::Postfix)?;
                self.close_scope();
            }
            None => self.out.write_line("}"),
        }
        Ok(())
    }

    fn write_switch(
        &mut self,
        value: &'a Expr,
        cases: &'a [SwitchCase],
        default: Option<&'a [Stmt]>,
    ) -> EmitResult<()> {
        self.write_effects(value, Fixity::Prefix)?;
        let text = self.stmt_expr(value, Priority::Argument)?;
        self.out.write_line(&format!("switch {text} {{"));
        for case in cases {
            let mut labels = Vec::with_capacity(case.values.len());
            for case_value in &case.values {
                labels.push(self.case_label(&value.ty, case_value)?);
            }
            self.out.write_line(&format!("case {}:", labels.join(", ")));
            self.write_case_body(value, &case.values, &case.body)?;
        }
        match default {
            Some(body) => {
                self.out.write_line("default:");
                self.write_case_body(value, &[], body)?;
            }
            // Swift switches must be exhaustive; only plain enums can be covered case by case
            None if !matches!(value.ty.kind, TypeKind::Enum { flags: false, .. }) => {
                self.out.write_line("default:");
                self.write_case_body(value, &[], &[])?;
            }
            None => {}
        }
        self.out.write_line("}");
        Ok(())
    }

    fn case_label(&mut self, switched: &CiType, case_value: &'a CaseValue) -> EmitResult<String> {
        match case_value {
            CaseValue::Expr(expr) => self.coerced(switched, expr, Priority::Argument),
            CaseValue::Pattern { name, ty, guard } => {
                let type_name = self.class_name(ty)?;
                let mut label = if name == "_" {
                    format!("is {type_name}")
                } else {
                    format!("let {} as {type_name}", member_name(name))
                };
                if let Some(guard) = guard {
                    label.push_str(&format!(" where {}", self.expr(guard, Priority::Argument)?));
                }
                Ok(label)
            }
        }
    }

    fn write_case_body(&mut self, value: &Expr, labels: &[CaseValue], body: &'a [Stmt]) -> EmitResult<()> {
        self.out.indent();
        self.ctx.push_scope();
        for label in labels {
            match label {
                CaseValue::Pattern { name, .. } if name != "_" => {
                    self.ctx.declare(&member_name(name));
                }
                _ => {}
            }
        }
        self.write_effects(value, Fixity::Postfix)?;
        let body = match body {
            [rest @ .., last] if !rest.is_empty() && matches!(last.kind, StmtKind::Break) => rest,
            _ => body,
        };
        if body.is_empty() {
            self.out.write_line("break");
        }
        self.write_statements(body)?;
        self.ctx.pop_scope();
        self.out.dedent();
        Ok(())
    }

    fn write_throw(&mut self, message: &'a Expr) -> EmitResult<()> {
        self.ctx.activate(Shim::CiError);
        self.write_effects(message, Fixity::Prefix)?;
        let text = self.stmt_coerced(&CiType::string(), message)?;
        self.out.write_line(&format!("throw CiError.error({text})"));
        Ok(())
    }

    fn write_lock(&mut self, lock: &'a Expr, body: &'a [Stmt]) -> EmitResult<()> {
        if has_xcrement(lock) {
            return Err(EmitError::unsupported("increment inside a lock expression"));
        }
        let lock = self.expr(lock, Priority::Primary)?;
        self.out.write_line(&format!("{lock}.lock()"));
        self.out.write("do");
        self.open_scope();
        self.out.write_line(&format!("defer {{ {lock}.unlock() }}"));
        self.write_statements(body)?;
        self.close_scope();
        Ok(())
    }

    fn write_return(&mut self, value: Option<&'a Expr>) -> EmitResult<()> {
        let Some(value) = value else {
            self.out.write_line("return");
            return Ok(());
        };
        let return_type = self
            .ctx
            .return_type()
            .ok_or_else(|| EmitError::internal("return with a value outside a method returning one"))?;
        self.write_effects(value, Fixity::Prefix)?;
        let text = self.stmt_coerced(return_type, value)?;
        if xcrements(value, Fixity::Postfix).is_empty() {
            self.out.write_line(&format!("return {text}"));
        } else {
            // the value must be captured before the postfix effects run
            let ty = self.swift_type(return_type)?;
            self.out.write_line(&format!("let result : {ty} = {text}"));
            self.write_effects(value, Fixity::Postfix)?;
            self.out.write_line("return result");
        }
        Ok(())
    }

    /// `assert` takes non-throwing autoclosures, so throwing operands are evaluated first inside a `do` block.
    fn write_assert(&mut self, cond: &'a Expr, message: Option<&'a Expr>) -> EmitResult<()> {
        self.write_effects(cond, Fixity::Prefix)?;
        let hoist = throws(cond) || message.is_some_and(throws);
        if hoist {
            self.out.write("do");
            self.open_scope();
        }
        let mut text = if throws(cond) {
            let value = self.expr(cond, Priority::Argument)?;
            self.out.write_line(&format!("let ciCondition = try {value}"));
            "assert(ciCondition".to_string()
        } else {
            format!("assert({}", self.expr(cond, Priority::Argument)?)
        };
        if let Some(message) = message {
            let value = self.coerced(&CiType::string(), message, Priority::Argument)?;
            if throws(message) {
                self.out.write_line(&format!("let ciMessage = try {value}"));
                text.push_str(", ciMessage");
            } else {
                text.push_str(&format!(", {value}"));
            }
        }
        text.push(')');
        self.out.write_line(&text);
        if hoist {
            self.close_scope();
        }
        self.write_effects(cond, Fixity::Postfix)
    }

    /// `Encoding.UTF8.GetBytes(s, array, offset)` through a `cibytes` temporary.
    fn write_get_bytes(&mut self, args: &'a [Expr]) -> EmitResult<()> {
        let [source, target, offset, ..] = args else {
            return Err(EmitError::internal("UTF-8 GetBytes needs a string, an array and an offset"));
        };
        let keyword = if !self.ctx.declare("cibytes") {
            ""
        } else if self.ctx.mutable_bytes() {
            "var "
        } else {
            "let "
        };
        let source = self.unwrapped(source, Priority::Primary, true)?;
        self.out.write_line(&format!("{keyword}cibytes = [UInt8]({source}.utf8)"));
        let open = self.open_indexing(target)?;
        let range = if offset.is_literal_zero() {
            "0..<cibytes.count".to_string()
        } else {
            let start = self.coerced(&CiType::int(), offset, Priority::Add)?;
            format!("{start} ..< {start} + cibytes.count")
        };
        self.out.write_line(&format!("{open}{range}] = cibytes[...]"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::config::EmitConfig;
    use ciswift_ast::{BinaryOp, MethodRef, PostfixOp, Program};

    fn emit(stmts: &[Stmt]) -> String {
        let program = Program::default();
        let config = EmitConfig::new().with_spaces(2);
        let mut emitter = SwiftEmitter::new(&program, &config);
        emitter.ctx.push_scope();
        emitter.write_statements(stmts).unwrap();
        emitter.out.finish()
    }

    fn int(name: &str) -> Expr {
        Expr::local(name, CiType::int())
    }

    fn boolean(name: &str) -> Expr {
        Expr::local(name, CiType::bool())
    }

    #[test]
    fn test_redeclaration_in_same_scope_assigns() {
        let stmts = [
            Stmt::mutable_var("x", CiType::int(), Some(Expr::int(1))),
            Stmt::mutable_var("x", CiType::int(), Some(Expr::int(2))),
        ];
        assert_eq!(emit(&stmts), "var x : Int = 1\nx = 2\n");
    }

    #[test]
    fn test_increment_statements_are_hoisted() {
        let stmts = [
            Stmt::expr(Expr::prefix(PrefixOp::Increment, int("x"))),
            Stmt::var("y", CiType::int(), Some(Expr::postfix(PostfixOp::Increment, int("x")))),
        ];
        assert_eq!(emit(&stmts), "x += 1\nlet y : Int = x\nx += 1\n");
    }

    #[test]
    fn test_boolean_compound_assignment() {
        let stmts = [
            Stmt::compound(AssignOp::And, boolean("ok"), boolean("check")),
            Stmt::compound(AssignOp::Xor, boolean("ok"), boolean("check")),
        ];
        assert_eq!(emit(&stmts), "if !check {\n  ok = false\n}\nok = ok != check\n");
    }

    #[test]
    fn test_postfix_in_condition_runs_in_both_branches() {
        let cond = Expr::compare(BinaryOp::Greater, Expr::postfix(PostfixOp::Increment, int("x")), Expr::int(0));
        let stmts = [Stmt::if_else(cond, vec![], None)];
        assert_eq!(emit(&stmts), "if x > 0 {\n  x += 1\n} else {\n  x += 1\n}\n");
    }

    #[test]
    fn test_nested_if_chains_as_else_if() {
        let nested = Stmt::if_else(boolean("b"), vec![], None);
        let stmts = [Stmt::if_else(boolean("a"), vec![], Some(vec![nested]))];
        assert_eq!(emit(&stmts), "if a {\n} else if b {\n}\n");
    }

    #[test]
    fn test_switch_on_int_gets_default() {
        let case = SwitchCase {
            values: vec![CaseValue::Expr(Expr::int(1))],
            body: vec![Stmt::compound(AssignOp::Add, int("x"), Expr::int(1)), Stmt::brk()],
        };
        let stmts = [Stmt::new(StmtKind::Switch {
            value: int("n"),
            cases: vec![case],
            default: None,
        })];
        assert_eq!(emit(&stmts), "switch n {\ncase 1:\n  x += 1\ndefault:\n  break\n}\n");
    }

    #[test]
    fn test_assert_with_message() {
        let stmts = [Stmt::new(StmtKind::Assert {
            cond: boolean("ok"),
            message: Some(Expr::string("bad")),
        })];
        assert_eq!(emit(&stmts), "assert(ok, \"bad\")\n");
    }

    #[test]
    fn test_assert_evaluates_throwing_condition_first() {
        let parse = Expr::call(MethodRef::new("Parse").throwing(), vec![], CiType::int());
        let stmts = [Stmt::new(StmtKind::Assert {
            cond: Expr::compare(BinaryOp::Greater, parse, Expr::int(0)),
            message: Some(Expr::string("negative")),
        })];
        assert_eq!(
            emit(&stmts),
            "do {\n  let ciCondition = try parse() > 0\n  assert(ciCondition, \"negative\")\n}\n"
        );
    }
}
