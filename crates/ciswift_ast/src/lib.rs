//! Typed program tree consumed by the Swift backend.
//!
//! The tree arrives fully resolved: every expression carries its static type, every symbol reference is bound and
//! every method's throwing capability is known. The backend only reads it.
//!
//! ## Notes
//!
//! - All node types derive `serde::{Serialize, Deserialize}` so an upstream resolver can hand programs over as JSON.
//! - Constructor helpers (`Expr::int`, `Expr::local`, `Stmt::expr`, `CiType::int`, ...) exist mainly to keep tests
//!   readable; they never perform any resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod decl;
pub mod expr;
pub mod stmt;
pub mod types;

pub use decl::{
    CallType, Class, CodeDoc, Const, Constructor, Decl, DocBlock, Enum, EnumConst, Field, Method, Param, Program,
    Visibility,
};
pub use expr::{
    BinaryOp, Builtin, CaseValue, Expr, ExprKind, FieldInit, InterpolatedPart, Literal, MethodRef, PostfixOp, PrefixOp,
    SymbolKind, SymbolRef,
};
pub use stmt::{AssignOp, RangeBound, Stmt, StmtKind, SwitchCase, VarDecl};
pub use types::{CiType, ClassRef, CollectionKind, IntRange, StringKind, TypeKind};

/// Source position of a node (1-based line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
