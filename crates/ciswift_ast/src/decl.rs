//! Declarations and the program root.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Span;
use crate::expr::Expr;
use crate::stmt::Stmt;
use crate::types::CiType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Private,
    Internal,
    Protected,
    Public,
}

/// Dispatch classification of methods (and of classes: `Normal`, `Abstract`, `Sealed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    Static,
    #[default]
    Normal,
    Abstract,
    Virtual,
    Override,
    Sealed,
}

/// Block of a documentation comment after the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocBlock {
    Para(String),
    List(Vec<String>),
}

/// Structured documentation comment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CodeDoc {
    pub summary: String,
    #[serde(default)]
    pub details: Vec<DocBlock>,
}

impl CodeDoc {
    pub fn summary(text: impl Into<String>) -> Self {
        Self {
            summary: text.into(),
            details: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: CiType,
    #[serde(default)]
    pub default: Option<Expr>,
    /// The method body assigns to this parameter.
    #[serde(default)]
    pub is_assigned: bool,
    #[serde(default)]
    pub doc: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: CiType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            is_assigned: false,
            doc: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub call_type: CallType,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub throws: bool,
    pub return_type: CiType,
    #[serde(default)]
    pub body: Vec<Stmt>,
    /// This is the `ToString()` override that describes the object.
    #[serde(default)]
    pub is_to_string: bool,
    #[serde(default)]
    pub doc: Option<CodeDoc>,
    #[serde(default)]
    pub span: Option<Span>,
}

impl Method {
    pub fn new(name: impl Into<String>, return_type: CiType) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            call_type: CallType::Normal,
            params: Vec::new(),
            throws: false,
            return_type,
            body: Vec::new(),
            is_to_string: false,
            doc: None,
            span: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    pub ty: CiType,
    #[serde(default)]
    pub value: Option<Expr>,
    /// The field is assigned outside its initializer.
    #[serde(default)]
    pub is_assigned: bool,
    #[serde(default)]
    pub doc: Option<CodeDoc>,
    #[serde(default)]
    pub span: Option<Span>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: CiType) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Private,
            ty,
            value: None,
            is_assigned: true,
            doc: None,
            span: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Const {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    pub ty: CiType,
    pub value: Expr,
    /// Name of the method declaring this constant, for method-local constants.
    #[serde(default)]
    pub in_method: Option<String>,
    #[serde(default)]
    pub doc: Option<CodeDoc>,
    #[serde(default)]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Constructor {
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub doc: Option<CodeDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
    /// `Normal`, `Abstract` or `Sealed`.
    #[serde(default)]
    pub call_type: CallType,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub consts: Vec<Const>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub constructor: Option<Constructor>,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub doc: Option<CodeDoc>,
    #[serde(default)]
    pub span: Option<Span>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_public: false,
            call_type: CallType::Normal,
            base: None,
            consts: Vec::new(),
            fields: Vec::new(),
            constructor: None,
            methods: Vec::new(),
            doc: None,
            span: None,
        }
    }

    /// The class introduces `ToString()` rather than overriding an inherited one.
    pub fn adds_to_string(&self) -> bool {
        self.methods
            .iter()
            .any(|m| m.is_to_string && !matches!(m.call_type, CallType::Override | CallType::Sealed))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumConst {
    pub name: String,
    pub value: i64,
    /// The value was written in the source rather than counted.
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub doc: Option<CodeDoc>,
}

impl EnumConst {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            explicit: false,
            doc: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub flags: bool,
    pub constants: Vec<EnumConst>,
    #[serde(default)]
    pub doc: Option<CodeDoc>,
    #[serde(default)]
    pub span: Option<Span>,
}

impl Enum {
    /// Plain enum with sequentially numbered constants.
    pub fn sequential(name: impl Into<String>, constants: &[&str]) -> Self {
        Self {
            name: name.into(),
            is_public: false,
            flags: false,
            constants: constants
                .iter()
                .zip(0..)
                .map(|(c, i)| EnumConst::new(*c, i))
                .collect(),
            doc: None,
            span: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decl {
    Class(Class),
    Enum(Enum),
}

impl Decl {
    pub fn name(&self) -> &str {
        match self {
            Decl::Class(c) => &c.name,
            Decl::Enum(e) => &e.name,
        }
    }
}

/// A resolved program: declarations in source order plus named binary resources.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub declarations: Vec<Decl>,
    #[serde(default)]
    pub resources: HashMap<String, Vec<u8>>,
}

impl Program {
    pub fn new(declarations: Vec<Decl>) -> Self {
        Self {
            declarations,
            resources: HashMap::new(),
        }
    }

    pub fn enums(&self) -> impl Iterator<Item = &Enum> {
        self.declarations.iter().filter_map(|d| match d {
            Decl::Enum(e) => Some(e),
            Decl::Class(_) => None,
        })
    }

    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.declarations.iter().filter_map(|d| match d {
            Decl::Class(c) => Some(c),
            Decl::Enum(_) => None,
        })
    }
}
