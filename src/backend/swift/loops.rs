//! Loop lowering.
//!
//! Native Swift loops are used where they fit. Conditions with increments, and `do`-`while` loops whose condition
//! has one, are rewritten to `while true` with an explicit `ciDoLoop` test so the effects run in source order.
//! `continue` then has to replay whatever the loop head skipped; [`ContinueAction`] records what that is.

use ciswift_ast::{CollectionKind, Expr, RangeBound, Stmt, StmtKind};

use super::SwiftEmitter;
use super::context::ContinueAction;
use super::errors::{EmitError, EmitResult};
use super::expressions::Priority;
use super::expressions::effects::{Fixity, has_xcrement, throws};
use super::names::member_name;
use crate::backend::writer::CodeSink;

/// Whether `body` has a `continue` bound to the loop that owns it.
fn has_own_continue(body: &[Stmt]) -> bool {
    body.iter().any(|stmt| match &stmt.kind {
        StmtKind::Continue => true,
        StmtKind::If {
            then_branch,
            else_branch,
            ..
        } => has_own_continue(then_branch) || else_branch.as_deref().is_some_and(has_own_continue),
        StmtKind::Block(body) | StmtKind::Lock { body, .. } => has_own_continue(body),
        StmtKind::Switch { cases, default, .. } => {
            cases.iter().any(|c| has_own_continue(&c.body)) || default.as_deref().is_some_and(has_own_continue)
        }
        _ => false,
    })
}

impl<'a> SwiftEmitter<'a> {
    /// `let ciDoLoop = cond` followed by the exit test.
    fn write_condition_check(&mut self, cond: &Expr, label: Option<&str>) -> EmitResult<()> {
        self.write_effects(cond, Fixity::Prefix)?;
        let text = self.stmt_expr(cond, Priority::Argument)?;
        self.out.write_line(&format!("let ciDoLoop = {text}"));
        self.write_effects(cond, Fixity::Postfix)?;
        self.out.write("if !ciDoLoop");
        self.out.open_child();
        self.out.write_line(&match label {
            Some(label) => format!("break {label}"),
            None => "break".to_string(),
        });
        self.out.close_block();
        Ok(())
    }

    /// Loop body with `continue` bound to `action`.
    fn write_loop_body(&mut self, action: ContinueAction<'a>, body: &'a [Stmt]) -> EmitResult<()> {
        self.ctx.push_loop(action);
        let result = self.write_statements(body);
        self.ctx.pop_loop();
        result
    }

    pub(crate) fn write_while(&mut self, cond: &'a Expr, body: &'a [Stmt]) -> EmitResult<()> {
        if has_xcrement(cond) {
            self.out.write("while true");
            self.open_scope();
            self.write_condition_check(cond, None)?;
        } else {
            let text = self.stmt_expr(cond, Priority::Argument)?;
            self.out.write(&format!("while {text}"));
            self.open_scope();
        }
        self.write_loop_body(ContinueAction::Plain, body)?;
        self.close_scope();
        Ok(())
    }

    pub(crate) fn write_for(
        &mut self,
        init: Option<&'a Stmt>,
        cond: Option<&'a Expr>,
        advance: Option<&'a Stmt>,
        body: &'a [Stmt],
    ) -> EmitResult<()> {
        // the loop variable must not leak into the enclosing Swift scope
        let scoped = matches!(init, Some(Stmt { kind: StmtKind::Var(_), .. }));
        if scoped {
            self.out.write("do");
            self.open_scope();
        }
        if let Some(init) = init {
            self.write_stmt(init)?;
        }
        match cond {
            Some(cond) if !has_xcrement(cond) => {
                let text = self.stmt_expr(cond, Priority::Argument)?;
                self.out.write(&format!("while {text}"));
                self.open_scope();
            }
            Some(cond) => {
                self.out.write("while true");
                self.open_scope();
                self.write_condition_check(cond, None)?;
            }
            None => {
                self.out.write("while true");
                self.open_scope();
            }
        }
        let action = advance.map_or(ContinueAction::Plain, ContinueAction::Advance);
        self.write_loop_body(action, body)?;
        if let Some(advance) = advance {
            if body.last().is_none_or(Stmt::completes_normally) {
                self.write_stmt(advance)?;
            }
        }
        self.close_scope();
        if scoped {
            self.close_scope();
        }
        Ok(())
    }

    pub(crate) fn write_for_range(
        &mut self,
        var: &str,
        start: &'a Expr,
        bound: RangeBound,
        end: &'a Expr,
        step: i64,
        body: &'a [Stmt],
    ) -> EmitResult<()> {
        if has_xcrement(start) || has_xcrement(end) {
            return Err(EmitError::unsupported("increment inside range loop bounds"));
        }
        let range = if step == 1 {
            let operator = match bound {
                RangeBound::Less => "..<",
                RangeBound::LessEq => "...",
                RangeBound::Greater | RangeBound::GreaterEq => {
                    return Err(EmitError::internal("ascending range loop with a descending bound"));
                }
            };
            let from = self.expr(start, Priority::Add)?;
            let to = self.expr(end, Priority::Add)?;
            format!("{from}{operator}{to}")
        } else {
            let label = match bound {
                RangeBound::Less | RangeBound::Greater => "to",
                RangeBound::LessEq | RangeBound::GreaterEq => "through",
            };
            let from = self.expr(start, Priority::Argument)?;
            let to = self.expr(end, Priority::Argument)?;
            format!("stride(from: {from}, {label}: {to}, by: {step})")
        };
        let try_ = if throws(start) || throws(end) { "try " } else { "" };
        let name = member_name(var);
        self.out.write(&format!("for {name} in {try_}{range}"));
        self.open_scope();
        self.ctx.declare(&name);
        self.write_loop_body(ContinueAction::Plain, body)?;
        self.close_scope();
        Ok(())
    }

    pub(crate) fn write_do_while(&mut self, body: &'a [Stmt], cond: &'a Expr) -> EmitResult<()> {
        if !has_xcrement(cond) {
            self.out.write("repeat");
            self.open_scope();
            self.write_loop_body(ContinueAction::Plain, body)?;
            self.ctx.pop_scope();
            self.out.dedent();
            let text = self.stmt_expr(cond, Priority::Argument)?;
            self.out.write_line(&format!("}} while {text}"));
            return Ok(());
        }

        let label = has_own_continue(body).then(|| self.ctx.fresh_label());
        match &label {
            Some(label) => self.out.write(&format!("{label}: while true")),
            None => self.out.write("while true"),
        }
        self.open_scope();
        let action = match &label {
            Some(label) => ContinueAction::CheckCondition {
                cond,
                label: label.clone(),
            },
            None => ContinueAction::Plain,
        };
        self.write_loop_body(action, body)?;
        if body.last().is_none_or(Stmt::completes_normally) {
            self.write_condition_check(cond, None)?;
        }
        self.close_scope();
        Ok(())
    }

    pub(crate) fn write_foreach(&mut self, vars: &'a [String], collection: &'a Expr, body: &'a [Stmt]) -> EmitResult<()> {
        if has_xcrement(collection) {
            return Err(EmitError::unsupported("increment inside a foreach collection"));
        }
        let names: Vec<String> = vars.iter().map(|v| member_name(v)).collect();
        let pattern = match names.as_slice() {
            [single] => single.clone(),
            [key, value] => format!("({key}, {value})"),
            _ => return Err(EmitError::internal("foreach binds one or two variables")),
        };
        let source = self.iterated(collection)?;
        let try_ = if throws(collection) { "try " } else { "" };
        self.out.write(&format!("for {pattern} in {try_}{source}"));
        self.open_scope();
        for name in &names {
            self.ctx.declare(name);
        }
        self.write_loop_body(ContinueAction::Plain, body)?;
        self.close_scope();
        Ok(())
    }

    /// The sequence a `foreach` walks: scalars of a string, sorted views of sorted collections.
    fn iterated(&mut self, collection: &Expr) -> EmitResult<String> {
        if collection.ty.is_string() {
            return Ok(format!("{}.unicodeScalars", self.unwrapped(collection, Priority::Primary, true)?));
        }
        match collection.ty.collection_kind() {
            Some(CollectionKind::SortedSet) => {
                Ok(format!("{}.sorted()", self.unwrapped(collection, Priority::Primary, true)?))
            }
            Some(CollectionKind::SortedDictionary) => {
                let by = if collection.ty.key().is_some_and(|k| k.nullable) {
                    "{ $0.key! < $1.key! }"
                } else {
                    "{ $0.key < $1.key }"
                };
                Ok(format!("{}.sorted(by: {by})", self.unwrapped(collection, Priority::Primary, true)?))
            }
            _ => self.unwrapped(collection, Priority::Argument, true),
        }
    }

    /// `continue`, preceded by whatever the loop head would have run.
    pub(crate) fn write_continue(&mut self) -> EmitResult<()> {
        match self.ctx.current_loop().cloned() {
            None => return Err(EmitError::internal("continue outside a loop")),
            Some(ContinueAction::Plain) => {}
            Some(ContinueAction::Advance(advance)) => self.write_stmt(advance)?,
            Some(ContinueAction::CheckCondition { cond, label }) => {
                self.out.write("do");
                self.open_scope();
                self.write_condition_check(cond, Some(&label))?;
                self.close_scope();
            }
        }
        self.out.write_line("continue");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_continue_ignores_nested_loops() {
        let inner = Stmt::while_loop(Expr::bool(true), vec![Stmt::cont()]);
        assert!(!has_own_continue(&[inner]));
        let guarded = Stmt::if_else(Expr::bool(true), vec![Stmt::cont()], None);
        assert!(has_own_continue(&[guarded]));
    }
}
