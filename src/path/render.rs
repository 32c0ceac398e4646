//! PathNode → TypeScript expression that builds the path from destructured params.
//!
//! Every function here is pure: the accumulated expression is passed in as
//! `seed` and a new string comes back.
use super::PathNode;
use crate::types::render::quote;

pub fn render(node: &PathNode, seed: &str) -> String {
    match node {
        PathNode::Literal { text } => format!("{seed}{}", quote(text)),
        PathNode::Concat { left, right } => {
            let left = render(left, seed);
            render(right, &format!("{left} + "))
        }
        PathNode::Alternation { children } => {
            let last = children.len().saturating_sub(1);
            children.iter().enumerate().fold(seed.to_string(), |acc, (i, child)| {
                let mut out = render(child, &acc);
                if i != last {
                    out.push('|');
                }
                out
            })
        }
        PathNode::Group { body } => {
            let open = format!("{seed}(() => {{ try {{ return ");
            format!("{} }} catch {{ return \"\" }} }})()", render(body, &open))
        }
        PathNode::Symbol { name, wildcard: true } => format!("{seed}({name} ?? \"\")"),
        PathNode::Symbol { name, wildcard: false } => {
            format!("{seed}(() => {{ if ({name}) return {name}; throw {} }})()", quote(name))
        }
    }
}

/// Arrow function taking `{ name, ... }` (or nothing) and returning the path.
pub fn path_function(spec: &PathNode, names: &[String]) -> String {
    let params = if names.is_empty() {
        String::new()
    } else {
        format!("{{ {} }}: any", names.join(", "))
    };
    format!("({params}) => {}", render(spec, ""))
}

// ------------------------------- Tests ------------------------------------ //
