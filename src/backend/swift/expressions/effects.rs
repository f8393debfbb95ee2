//! Side-effect analysis of expressions.
//!
//! Swift has no `++`/`--`, so an increment nested in an expression is split off: prefix forms are written as
//! `x += 1` before the enclosing statement, postfix forms after it. Both walks skip lambda bodies, which run later.

use ciswift_ast::{Expr, ExprKind, PostfixOp, PrefixOp};

/// Whether an increment happens before or after the value is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fixity {
    Prefix,
    Postfix,
}

/// One hoisted `++`/`--`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Xcrement<'e> {
    pub(crate) target: &'e Expr,
    pub(crate) increment: bool,
}

impl Xcrement<'_> {
    pub(crate) fn operator(&self) -> &'static str {
        if self.increment { " += 1" } else { " -= 1" }
    }
}

/// Whether evaluating `expr` may throw, so the statement needs `try`.
pub(crate) fn throws(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Literal(_) | ExprKind::Lambda { .. } | ExprKind::New | ExprKind::Resource { .. } => false,
        ExprKind::Interpolated { parts, .. } => parts.iter().any(|p| throws(&p.argument)),
        ExprKind::Symbol(symbol) => symbol.left.as_deref().is_some_and(throws),
        ExprKind::Prefix { inner, .. } | ExprKind::Postfix { inner, .. } => throws(inner),
        ExprKind::Binary { left, right, .. } => throws(left) || throws(right),
        ExprKind::Call { method, args } => {
            method.throws || method.left.as_deref().is_some_and(throws) || args.iter().any(throws)
        }
        ExprKind::ArrayInit(items) => items.iter().any(throws),
        ExprKind::ObjectInit(fields) => fields.iter().any(|f| throws(&f.value)),
        ExprKind::Select {
            cond,
            on_true,
            on_false,
        } => throws(cond) || throws(on_true) || throws(on_false),
        ExprKind::NewArray { length, .. } => throws(length),
    }
}

/// Increments of the given fixity in evaluation order.
pub(crate) fn xcrements(expr: &Expr, fixity: Fixity) -> Vec<Xcrement<'_>> {
    let mut found = Vec::new();
    collect(expr, fixity, &mut found);
    found
}

/// Whether `expr` contains any increment.
pub(crate) fn has_xcrement(expr: &Expr) -> bool {
    !xcrements(expr, Fixity::Prefix).is_empty() || !xcrements(expr, Fixity::Postfix).is_empty()
}

fn collect<'e>(expr: &'e Expr, fixity: Fixity, found: &mut Vec<Xcrement<'e>>) {
    match &expr.kind {
        ExprKind::Prefix { op, inner } => {
            collect(inner, fixity, found);
            if fixity == Fixity::Prefix && matches!(op, PrefixOp::Increment | PrefixOp::Decrement) {
                found.push(Xcrement {
                    target: inner,
                    increment: *op == PrefixOp::Increment,
                });
            }
        }
        ExprKind::Postfix { op, inner } => {
            collect(inner, fixity, found);
            if fixity == Fixity::Postfix {
                found.push(Xcrement {
                    target: inner,
                    increment: *op == PostfixOp::Increment,
                });
            }
        }
        ExprKind::Literal(_) | ExprKind::Lambda { .. } | ExprKind::New | ExprKind::Resource { .. } => {}
        ExprKind::Interpolated { parts, .. } => parts.iter().for_each(|p| collect(&p.argument, fixity, found)),
        ExprKind::Symbol(symbol) => {
            if let Some(left) = symbol.left.as_deref() {
                collect(left, fixity, found);
            }
        }
        ExprKind::Binary { left, right, .. } => {
            collect(left, fixity, found);
            collect(right, fixity, found);
        }
        ExprKind::Call { method, args } => {
            if let Some(left) = method.left.as_deref() {
                collect(left, fixity, found);
            }
            args.iter().for_each(|a| collect(a, fixity, found));
        }
        ExprKind::ArrayInit(items) => items.iter().for_each(|i| collect(i, fixity, found)),
        ExprKind::ObjectInit(fields) => fields.iter().for_each(|f| collect(&f.value, fixity, found)),
        ExprKind::Select {
            cond,
            on_true,
            on_false,
        } => {
            collect(cond, fixity, found);
            collect(on_true, fixity, found);
            collect(on_false, fixity, found);
        }
        ExprKind::NewArray { length, .. } => collect(length, fixity, found),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ciswift_ast::{BinaryOp, CiType, MethodRef};

    fn local(name: &str) -> Expr {
        Expr::local(name, CiType::int())
    }

    #[test]
    fn test_collects_by_fixity() {
        // i++ + --j
        let expr = Expr::binary(
            BinaryOp::Add,
            Expr::postfix(PostfixOp::Increment, local("i")),
            Expr::prefix(PrefixOp::Decrement, local("j")),
            CiType::int(),
        );
        let post = xcrements(&expr, Fixity::Postfix);
        assert_eq!(post.len(), 1);
        assert!(post[0].increment);
        assert_eq!(post[0].operator(), " += 1");
        let pre = xcrements(&expr, Fixity::Prefix);
        assert_eq!(pre.len(), 1);
        assert!(!pre[0].increment);
        assert!(has_xcrement(&expr));
    }

    #[test]
    fn test_negation_is_not_an_increment() {
        let expr = Expr::prefix(PrefixOp::Neg, local("x"));
        assert!(!has_xcrement(&expr));
    }

    #[test]
    fn test_lambda_bodies_are_skipped() {
        let body = Expr::postfix(PostfixOp::Increment, local("n"));
        let lambda = Expr::lambda("x", body, CiType::bool());
        assert!(!has_xcrement(&lambda));
    }

    #[test]
    fn test_throw_analysis() {
        let call = Expr::call(MethodRef::new("Parse").throwing(), vec![], CiType::int());
        let sum = Expr::binary(BinaryOp::Add, local("a"), call, CiType::int());
        assert!(throws(&sum));
        assert!(!throws(&local("a")));
        let safe = Expr::call(MethodRef::new("Size"), vec![local("a")], CiType::int());
        assert!(!throws(&safe));
    }
}
