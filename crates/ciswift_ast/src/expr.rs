//! Expression nodes.
//!
//! Every [`Expr`] carries the type the resolver inferred for it. Operators keep the source-language meaning: for
//! example [`BinaryOp::BitAnd`] on two booleans is the non-short-circuit `&`, while [`BinaryOp::CondAnd`] is `&&`.

use serde::{Deserialize, Serialize};

use crate::Span;
use crate::types::{CiType, ClassRef};

/// A typed expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: CiType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
}

/// One `{argument}` hole of an interpolated string, preceded by literal text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolatedPart {
    pub prefix: String,
    pub argument: Expr,
    /// Minimum field width; negative values left-align.
    #[serde(default)]
    pub width: Option<i32>,
    /// Format character such as `x`, `D`, `F` or `E`.
    #[serde(default)]
    pub format: Option<char>,
    #[serde(default)]
    pub precision: Option<u32>,
}

impl InterpolatedPart {
    pub fn new(prefix: impl Into<String>, argument: Expr) -> Self {
        Self {
            prefix: prefix.into(),
            argument,
            width: None,
            format: None,
            precision: None,
        }
    }

    /// Whether this part needs printf-style formatting.
    pub fn is_formatted(&self) -> bool {
        self.width.is_some() || self.format.is_some() || self.precision.is_some()
    }
}

/// What a symbol reference is bound to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// Local variable or parameter.
    Local,
    /// Loop variable of a `foreach` over a string; it names a code point.
    StringElement,
    /// Instance field.
    Field,
    /// Class-level constant or static member, qualified by its owner when referenced without a left side.
    Static { owner: String },
    /// Constant declared inside a method; it lives at class level under a method-prefixed name.
    MethodConst { owner: String, method: String },
    /// Enum member.
    EnumConst { owner: String },
    /// Reference to a type name (left side of a static access).
    Type,
    This,
    Base,
    StringLength,
    CollectionCount,
    MathNaN,
    MathNegativeInfinity,
    MathPositiveInfinity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolRef {
    #[serde(default)]
    pub left: Option<Box<Expr>>,
    pub name: String,
    pub symbol: SymbolKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixOp {
    Neg,
    Not,
    Complement,
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostfixOp {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Eq,
    NotEq,
    /// `&`: bitwise on integers, set intersection on flags, non-short-circuit on booleans.
    BitAnd,
    BitOr,
    BitXor,
    /// `&&`
    CondAnd,
    /// `||`
    CondOr,
    /// `left[right]`
    Index,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Less
                | BinaryOp::LessEq
                | BinaryOp::Greater
                | BinaryOp::GreaterEq
                | BinaryOp::Eq
                | BinaryOp::NotEq
        )
    }
}

/// Library methods with a dedicated Swift lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Builtin {
    ClassToString,
    StringContains,
    StringStartsWith,
    StringEndsWith,
    StringIndexOf,
    StringLastIndexOf,
    StringReplace,
    StringSubstring,
    ListAdd,
    ListAddRange,
    ListAll,
    ListAny,
    ListClear,
    ListContains,
    ListCopyTo,
    ListIndexOf,
    ListInsert,
    ListLast,
    ListRemoveAt,
    ListRemoveRange,
    ListSortAll,
    ListSortPart,
    QueueEnqueue,
    QueueDequeue,
    QueuePeek,
    StackPush,
    StackPop,
    StackPeek,
    SetAdd,
    SetContains,
    SetRemove,
    DictionaryAdd,
    DictionaryContainsKey,
    DictionaryRemove,
    ArrayCopyTo,
    ArrayFillAll,
    ArrayFillPart,
    ArraySortAll,
    ArraySortPart,
    ConsoleWrite,
    ConsoleWriteLine,
    Utf8GetByteCount,
    Utf8GetBytes,
    Utf8GetString,
    EnvironmentGetVariable,
    /// Foundation math function spelled like the method (`Sin` -> `sin`).
    MathFunction,
    MathAbs,
    MathMax,
    MathMin,
    MathCeiling,
    MathClamp,
    MathFusedMultiplyAdd,
    MathIsFinite,
    MathIsInfinity,
    MathIsNaN,
    MathRound,
    MathTruncate,
}

/// The method a call is bound to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodRef {
    /// Receiver; `None` for unqualified calls.
    #[serde(default)]
    pub left: Option<Box<Expr>>,
    pub name: String,
    #[serde(default)]
    pub builtin: Option<Builtin>,
    /// The method is declared as throwing.
    #[serde(default)]
    pub throws: bool,
    #[serde(default)]
    pub is_static: bool,
    /// Declaring class, used to qualify unqualified static calls.
    #[serde(default)]
    pub owner: Option<String>,
    /// Declared parameter types, used to coerce arguments.
    #[serde(default)]
    pub params: Vec<CiType>,
}

impl MethodRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            left: None,
            name: name.into(),
            builtin: None,
            throws: false,
            is_static: false,
            owner: None,
            params: Vec::new(),
        }
    }

    pub fn on(mut self, left: Expr) -> Self {
        self.left = Some(Box::new(left));
        self
    }

    pub fn builtin(mut self, builtin: Builtin) -> Self {
        self.builtin = Some(builtin);
        self
    }

    pub fn throwing(mut self) -> Self {
        self.throws = true;
        self
    }

    pub fn static_in(mut self, owner: impl Into<String>) -> Self {
        self.is_static = true;
        self.owner = Some(owner.into());
        self
    }

    pub fn with_params(mut self, params: Vec<CiType>) -> Self {
        self.params = params;
        self
    }
}

/// `Field = value` item of an object initializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInit {
    pub name: String,
    pub value: Expr,
}

/// A matched value of a `switch` case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseValue {
    Expr(Expr),
    /// `case T name when guard`; `name` is `_` for a discard binding.
    Pattern {
        name: String,
        ty: CiType,
        #[serde(default)]
        guard: Option<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    Literal(Literal),
    Interpolated {
        parts: Vec<InterpolatedPart>,
        suffix: String,
    },
    Symbol(SymbolRef),
    Prefix {
        op: PrefixOp,
        inner: Box<Expr>,
    },
    Postfix {
        op: PostfixOp,
        inner: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        method: MethodRef,
        #[serde(default)]
        args: Vec<Expr>,
    },
    Lambda {
        param: String,
        body: Box<Expr>,
    },
    /// `{ a, b, c }` for an array.
    ArrayInit(Vec<Expr>),
    /// `new C() { X = 1 }`; the object type is the expression type.
    ObjectInit(Vec<FieldInit>),
    Select {
        cond: Box<Expr>,
        on_true: Box<Expr>,
        on_false: Box<Expr>,
    },
    /// `new C()` of the expression type.
    New,
    /// `new T[length]`.
    NewArray {
        element: CiType,
        length: Box<Expr>,
    },
    /// `resource<byte[]>("name")`.
    Resource {
        name: String,
    },
}

impl Expr {
    pub fn new(kind: ExprKind, ty: CiType) -> Self {
        Self { kind, ty, span: None }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn null() -> Self {
        Self::new(ExprKind::Literal(Literal::Null), CiType::null())
    }

    pub fn bool(value: bool) -> Self {
        Self::new(ExprKind::Literal(Literal::Bool(value)), CiType::bool())
    }

    pub fn int(value: i64) -> Self {
        Self::new(ExprKind::Literal(Literal::Int(value)), CiType::int())
    }

    pub fn double(value: f64) -> Self {
        Self::new(ExprKind::Literal(Literal::Double(value)), CiType::double())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ExprKind::Literal(Literal::String(value.into())), CiType::string())
    }

    fn symbol(left: Option<Expr>, name: impl Into<String>, symbol: SymbolKind, ty: CiType) -> Self {
        Self::new(
            ExprKind::Symbol(SymbolRef {
                left: left.map(Box::new),
                name: name.into(),
                symbol,
            }),
            ty,
        )
    }

    pub fn local(name: impl Into<String>, ty: CiType) -> Self {
        Self::symbol(None, name, SymbolKind::Local, ty)
    }

    pub fn field(name: impl Into<String>, ty: CiType) -> Self {
        Self::symbol(None, name, SymbolKind::Field, ty)
    }

    /// `left.name` field access.
    pub fn member(left: Expr, name: impl Into<String>, ty: CiType) -> Self {
        Self::symbol(Some(left), name, SymbolKind::Field, ty)
    }

    pub fn this(class: impl Into<String>) -> Self {
        Self::symbol(None, "this", SymbolKind::This, CiType::class(class, ClassRef::ReadWrite))
    }

    pub fn enum_const(owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let ty = CiType::enumeration(owner.clone());
        Self::symbol(None, name, SymbolKind::EnumConst { owner }, ty)
    }

    pub fn flags_const(owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let ty = CiType::flags(owner.clone());
        Self::symbol(None, name, SymbolKind::EnumConst { owner }, ty)
    }

    pub fn static_const(owner: impl Into<String>, name: impl Into<String>, ty: CiType) -> Self {
        Self::symbol(None, name, SymbolKind::Static { owner: owner.into() }, ty)
    }

    /// `left.Length` on a string.
    pub fn string_length(left: Expr) -> Self {
        Self::symbol(Some(left), "Length", SymbolKind::StringLength, CiType::int())
    }

    /// `left.Count` on a collection.
    pub fn count(left: Expr) -> Self {
        Self::symbol(Some(left), "Count", SymbolKind::CollectionCount, CiType::int())
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr, ty: CiType) -> Self {
        Self::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty,
        )
    }

    /// A comparison, typed `bool`.
    pub fn compare(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::binary(op, left, right, CiType::bool())
    }

    pub fn index(collection: Expr, index: Expr, ty: CiType) -> Self {
        Self::binary(BinaryOp::Index, collection, index, ty)
    }

    pub fn prefix(op: PrefixOp, inner: Expr) -> Self {
        let ty = inner.ty.clone();
        Self::new(ExprKind::Prefix { op, inner: Box::new(inner) }, ty)
    }

    pub fn postfix(op: PostfixOp, inner: Expr) -> Self {
        let ty = inner.ty.clone();
        Self::new(ExprKind::Postfix { op, inner: Box::new(inner) }, ty)
    }

    pub fn call(method: MethodRef, args: Vec<Expr>, ty: CiType) -> Self {
        Self::new(ExprKind::Call { method, args }, ty)
    }

    pub fn select(cond: Expr, on_true: Expr, on_false: Expr) -> Self {
        let ty = on_true.ty.clone();
        Self::new(
            ExprKind::Select {
                cond: Box::new(cond),
                on_true: Box::new(on_true),
                on_false: Box::new(on_false),
            },
            ty,
        )
    }

    pub fn new_object(ty: CiType) -> Self {
        Self::new(ExprKind::New, ty)
    }

    pub fn lambda(param: impl Into<String>, body: Expr, ty: CiType) -> Self {
        Self::new(
            ExprKind::Lambda {
                param: param.into(),
                body: Box::new(body),
            },
            ty,
        )
    }

    pub fn interpolated(parts: Vec<InterpolatedPart>, suffix: impl Into<String>) -> Self {
        Self::new(
            ExprKind::Interpolated {
                parts,
                suffix: suffix.into(),
            },
            CiType::string_storage(),
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, ExprKind::Literal(_))
    }

    pub fn is_literal_zero(&self) -> bool {
        matches!(self.kind, ExprKind::Literal(Literal::Int(0)))
    }

    /// The bound builtin, if this is a call to one.
    pub fn builtin(&self) -> Option<Builtin> {
        match &self.kind {
            ExprKind::Call { method, .. } => method.builtin,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_inherits_operand_type() {
        let e = Expr::prefix(PrefixOp::Neg, Expr::local("x", CiType::double()));
        assert_eq!(e.ty, CiType::double());
    }

    #[test]
    fn test_builtin_lookup() {
        let call = Expr::call(
            MethodRef::new("Substring")
                .on(Expr::local("s", CiType::string()))
                .builtin(Builtin::StringSubstring),
            vec![Expr::int(1)],
            CiType::string_storage(),
        );
        assert_eq!(call.builtin(), Some(Builtin::StringSubstring));
        assert_eq!(Expr::int(0).builtin(), None);
    }

    #[test]
    fn test_formatted_part_detection() {
        let mut part = InterpolatedPart::new("x=", Expr::local("x", CiType::int()));
        assert!(!part.is_formatted());
        part.format = Some('x');
        assert!(part.is_formatted());
    }
}
