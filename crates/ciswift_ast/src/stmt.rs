//! Statement nodes.

use serde::{Deserialize, Serialize};

use crate::Span;
use crate::expr::{CaseValue, Expr};
use crate::types::CiType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

/// Local variable definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub ty: CiType,
    #[serde(default)]
    pub value: Option<Expr>,
    /// The variable is assigned after its definition.
    #[serde(default)]
    pub is_assigned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    And,
    Or,
    Xor,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::And => "&=",
            AssignOp::Or => "|=",
            AssignOp::Xor => "^=",
        }
    }
}

/// Comparison that terminates a counted range loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeBound {
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub values: Vec<CaseValue>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StmtKind {
    Expr(Expr),
    Var(VarDecl),
    Assign {
        op: AssignOp,
        target: Expr,
        value: Expr,
    },
    If {
        cond: Expr,
        then_branch: Vec<Stmt>,
        #[serde(default)]
        else_branch: Option<Vec<Stmt>>,
    },
    /// General `for (init; cond; advance)` loop.
    For {
        #[serde(default)]
        init: Option<Box<Stmt>>,
        #[serde(default)]
        cond: Option<Expr>,
        #[serde(default)]
        advance: Option<Box<Stmt>>,
        body: Vec<Stmt>,
    },
    /// Counted loop `for (T var = start; var bound end; var += step)` recognised upstream.
    ForRange {
        var: String,
        start: Expr,
        bound: RangeBound,
        end: Expr,
        step: i64,
        body: Vec<Stmt>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    DoWhile {
        body: Vec<Stmt>,
        cond: Expr,
    },
    /// `foreach (x in c)` or `foreach ((k, v) in c)`.
    Foreach {
        vars: Vec<String>,
        collection: Expr,
        body: Vec<Stmt>,
    },
    Switch {
        value: Expr,
        cases: Vec<SwitchCase>,
        #[serde(default)]
        default: Option<Vec<Stmt>>,
    },
    /// Throw an exception carrying a message.
    Throw(Expr),
    Lock {
        lock: Expr,
        body: Vec<Stmt>,
    },
    Return(Option<Expr>),
    Break,
    Continue,
    Block(Vec<Stmt>),
    Assert {
        cond: Expr,
        #[serde(default)]
        message: Option<Expr>,
    },
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self { kind, span: None }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn expr(expr: Expr) -> Self {
        Self::new(StmtKind::Expr(expr))
    }

    pub fn var(name: impl Into<String>, ty: CiType, value: Option<Expr>) -> Self {
        Self::new(StmtKind::Var(VarDecl {
            name: name.into(),
            ty,
            value,
            is_assigned: false,
        }))
    }

    /// A variable that is assigned again later.
    pub fn mutable_var(name: impl Into<String>, ty: CiType, value: Option<Expr>) -> Self {
        Self::new(StmtKind::Var(VarDecl {
            name: name.into(),
            ty,
            value,
            is_assigned: true,
        }))
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Self::compound(AssignOp::Assign, target, value)
    }

    pub fn compound(op: AssignOp, target: Expr, value: Expr) -> Self {
        Self::new(StmtKind::Assign { op, target, value })
    }

    pub fn if_else(cond: Expr, then_branch: Vec<Stmt>, else_branch: Option<Vec<Stmt>>) -> Self {
        Self::new(StmtKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    pub fn while_loop(cond: Expr, body: Vec<Stmt>) -> Self {
        Self::new(StmtKind::While { cond, body })
    }

    pub fn do_while(body: Vec<Stmt>, cond: Expr) -> Self {
        Self::new(StmtKind::DoWhile { body, cond })
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Self::new(StmtKind::Return(value))
    }

    pub fn throw(message: Expr) -> Self {
        Self::new(StmtKind::Throw(message))
    }

    pub fn brk() -> Self {
        Self::new(StmtKind::Break)
    }

    pub fn cont() -> Self {
        Self::new(StmtKind::Continue)
    }

    /// Whether control can fall off the end of this statement.
    pub fn completes_normally(&self) -> bool {
        match &self.kind {
            StmtKind::Return(_) | StmtKind::Throw(_) | StmtKind::Break | StmtKind::Continue => false,
            StmtKind::Block(body) => body.last().is_none_or(Stmt::completes_normally),
            StmtKind::If {
                then_branch,
                else_branch: Some(else_branch),
                ..
            } => {
                then_branch.last().is_none_or(Stmt::completes_normally)
                    || else_branch.last().is_none_or(Stmt::completes_normally)
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completes_normally() {
        assert!(Stmt::expr(Expr::int(1)).completes_normally());
        assert!(!Stmt::ret(None).completes_normally());
        let both_return = Stmt::if_else(Expr::bool(true), vec![Stmt::ret(None)], Some(vec![Stmt::brk()]));
        assert!(!both_return.completes_normally());
        let one_returns = Stmt::if_else(Expr::bool(true), vec![Stmt::ret(None)], None);
        assert!(one_returns.completes_normally());
    }

    #[test]
    fn test_assign_op_spelling() {
        assert_eq!(AssignOp::Shl.as_str(), "<<=");
        assert_eq!(AssignOp::Assign.as_str(), "=");
    }
}
