//! Type-AST consumed by the TypeScript renderer.
//!
//! The model mirrors the full upstream signature vocabulary, not just the part
//! we can render. Unsupported variants still deserialize; they are rejected by
//! [`render::render`] so a single action can be skipped instead of the whole
//! document failing to load.
//!
//! The one exception is vocabulary drift: an upstream catalog naming a variant
//! this module does not know about (or omitting one it does) is fatal, see
//! [`Vocabulary::validate`].
pub mod render;
pub mod signature;

use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use render::render;
pub use signature::{params_projection, return_projection};

// ------------------------------- Catalog ---------------------------------- //

/// Every `"kind"` tag of [`TypeNode`], in declaration order.
pub const TYPE_KINDS: &[&str] = &[
    "base",
    "literal",
    "tuple",
    "record",
    "union",
    "intersection",
    "optional",
    "class_instance",
    "function",
    "interface",
    "class_singleton",
    "variable",
    "alias",
    "proc",
];

/// Every `"name"` of [`BaseKind`].
pub const BASE_KINDS: &[&str] = &[
    "any", "void", "nil", "bool", "top", "bottom", "self", "instance", "class",
];

/// Variant catalog as reported by the tool that dumped the signatures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    pub types: Vec<String>,
    pub bases: Vec<String>,
}

impl Vocabulary {
    pub fn known() -> Self {
        Self {
            types: TYPE_KINDS.iter().map(|s| s.to_string()).collect(),
            bases: BASE_KINDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Both catalogs must match ours exactly (as sets).
    pub fn validate(&self) -> Result<()> {
        let mut unknown = Vec::new();
        let mut missing = Vec::new();
        diff_catalog("", &self.types, TYPE_KINDS, &mut unknown, &mut missing);
        diff_catalog("base.", &self.bases, BASE_KINDS, &mut unknown, &mut missing);
        if unknown.is_empty() && missing.is_empty() {
            Ok(())
        } else {
            Err(Error::VocabularyMismatch { unknown, missing })
        }
    }
}

fn diff_catalog(
    prefix: &str,
    reported: &[String],
    known: &[&str],
    unknown: &mut Vec<String>,
    missing: &mut Vec<String>,
) {
    let reported: BTreeSet<&str> = reported.iter().map(String::as_str).collect();
    let known: BTreeSet<&str> = known.iter().copied().collect();
    unknown.extend(reported.difference(&known).map(|k| format!("{prefix}{k}")));
    missing.extend(known.difference(&reported).map(|k| format!("{prefix}{k}")));
}

// ------------------------------- Model ------------------------------------ //

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeNode {
    Base { name: BaseKind },
    Literal { literal: Literal },
    Tuple { types: Vec<TypeNode> },
    /// Fields keep their declaration order.
    Record { fields: Vec<RecordField> },
    Union { types: Vec<TypeNode> },
    Intersection { types: Vec<TypeNode> },
    Optional {
        #[serde(rename = "type")]
        inner: Box<TypeNode>,
    },
    /// A (possibly generic) class application such as `Array[String]`.
    ClassInstance {
        name: String,
        #[serde(default)]
        args: Vec<TypeNode>,
    },
    Function(FunctionSignature),

    // Representable but never rendered.
    Interface {
        name: String,
        #[serde(default)]
        args: Vec<TypeNode>,
    },
    ClassSingleton { name: String },
    Variable { name: String },
    Alias { name: String },
    Proc {
        #[serde(rename = "type")]
        function: Box<FunctionSignature>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseKind {
    Any,
    Void,
    Nil,
    Bool,
    Top,
    Bottom,
    #[serde(rename = "self")]
    SelfType,
    Instance,
    Class,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    String(String),
    Symbol(String),
    Integer(i64),
    Bool(bool),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Symbol(String),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordField {
    pub key: FieldKey,
    #[serde(rename = "type")]
    pub ty: TypeNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSignature {
    #[serde(default)]
    pub params: Vec<ParamSpec>,
    pub returns: Box<TypeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Positional parameters may be declared without a name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeNode,
    pub kind: ParamKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    RequiredPositional,
    OptionalPositional,
    TrailingPositional,
    RequiredKeyword,
    OptionalKeyword,
    RestPositional,
    RestKeyword,
}

/// One overload of a method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodType {
    #[serde(default)]
    pub type_params: Vec<String>,
    #[serde(default)]
    pub block: Option<Block>,
    #[serde(rename = "type")]
    pub function: FunctionSignature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub required: bool,
}

// ----------------------------- Constructors -------------------------------- //

impl TypeNode {
    pub fn base(name: BaseKind) -> Self { TypeNode::Base { name } }
    pub fn literal(literal: Literal) -> Self { TypeNode::Literal { literal } }
    pub fn optional(inner: TypeNode) -> Self { TypeNode::Optional { inner: Box::new(inner) } }
    pub fn union(types: Vec<TypeNode>) -> Self { TypeNode::Union { types } }
    pub fn intersection(types: Vec<TypeNode>) -> Self { TypeNode::Intersection { types } }
    pub fn class(name: &str, args: Vec<TypeNode>) -> Self {
        TypeNode::ClassInstance { name: name.to_string(), args }
    }
    pub fn record(fields: impl IntoIterator<Item = (FieldKey, TypeNode)>) -> Self {
        TypeNode::Record {
            fields: fields.into_iter().map(|(key, ty)| RecordField { key, ty }).collect(),
        }
    }

    /// The catalog tag this node deserializes from.
    pub fn kind(&self) -> &'static str {
        match self {
            TypeNode::Base { .. } => "base",
            TypeNode::Literal { .. } => "literal",
            TypeNode::Tuple { .. } => "tuple",
            TypeNode::Record { .. } => "record",
            TypeNode::Union { .. } => "union",
            TypeNode::Intersection { .. } => "intersection",
            TypeNode::Optional { .. } => "optional",
            TypeNode::ClassInstance { .. } => "class_instance",
            TypeNode::Function(_) => "function",
            TypeNode::Interface { .. } => "interface",
            TypeNode::ClassSingleton { .. } => "class_singleton",
            TypeNode::Variable { .. } => "variable",
            TypeNode::Alias { .. } => "alias",
            TypeNode::Proc { .. } => "proc",
        }
    }
}

impl ParamSpec {
    pub fn new(name: &str, ty: TypeNode, kind: ParamKind) -> Self {
        Self { name: Some(name.to_string()), ty, kind }
    }
}

// ------------------------------- Tests ------------------------------------ //
