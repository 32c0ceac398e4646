//! Path-AST of a route pattern such as `/widgets/:id(.:format)`.
//!
//! - [`parse`] reads the pattern syntax into a tree.
//! - [`render`] compiles the tree into a TypeScript path-building expression.
//! - [`evaluate`] interprets the tree the way the compiled expression behaves at runtime.
pub mod eval;
pub mod parse;
pub mod render;

use std::fmt;
use serde::{Deserialize, Serialize};

pub use eval::evaluate;
pub use parse::parse;
pub use render::{path_function, render};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathNode {
    Literal { text: String },
    /// `:name`, or `*name` when `wildcard` is set.
    Symbol {
        name: String,
        #[serde(default)]
        wildcard: bool,
    },
    /// Optional sub-path, `( ... )`.
    Group { body: Box<PathNode> },
    Concat { left: Box<PathNode>, right: Box<PathNode> },
    Alternation { children: Vec<PathNode> },
}

impl PathNode {
    pub fn literal(text: &str) -> Self {
        PathNode::Literal { text: text.to_string() }
    }
    pub fn symbol(name: &str) -> Self {
        PathNode::Symbol { name: name.to_string(), wildcard: false }
    }
    pub fn wildcard(name: &str) -> Self {
        PathNode::Symbol { name: name.to_string(), wildcard: true }
    }
    pub fn group(body: PathNode) -> Self {
        PathNode::Group { body: Box::new(body) }
    }
    pub fn concat(left: PathNode, right: PathNode) -> Self {
        PathNode::Concat { left: Box::new(left), right: Box::new(right) }
    }

    /// Names of every dynamic segment, in pattern order.
    pub fn symbol_names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            PathNode::Literal { .. } => {}
            PathNode::Symbol { name, .. } => out.push(name),
            PathNode::Group { body } => body.collect_symbols(out),
            PathNode::Concat { left, right } => {
                left.collect_symbols(out);
                right.collect_symbols(out);
            }
            PathNode::Alternation { children } => {
                for c in children { c.collect_symbols(out); }
            }
        }
    }
}

/// Prints the pattern syntax back; routes compare path specs by this form.
impl fmt::Display for PathNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathNode::Literal { text } => f.write_str(text),
            PathNode::Symbol { name, wildcard: false } => write!(f, ":{name}"),
            PathNode::Symbol { name, wildcard: true } => write!(f, "*{name}"),
            PathNode::Group { body } => write!(f, "({body})"),
            PathNode::Concat { left, right } => write!(f, "{left}{right}"),
            PathNode::Alternation { children } => {
                for (i, c) in children.iter().enumerate() {
                    if i > 0 { f.write_str("|")?; }
                    write!(f, "{c}")?;
                }
                Ok(())
            }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
