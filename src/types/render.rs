//! TypeNode → TypeScript type syntax.
//!
//! `level` is the precedence context: 0 at the top of a type expression, 1
//! under an optional, 2 under an intersection. Unions and intersections
//! parenthesize whenever `level > 0`.
use once_cell::sync::Lazy;
use regex::Regex;

use super::{BaseKind, FieldKey, Literal, TypeNode};
use crate::error::{Error, Result};

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A[A-Za-z_][A-Za-z0-9_]*\z").expect("static regex")
});

/// Words the signature language reserves; such record keys are quoted.
static RESERVED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\A(?:bool|bot|class|instance|interface|nil|self|singleton|top|void|type|unchecked",
        r"|in|out|end|def|include|extend|prepend|alias|module|attr_reader|attr_writer",
        r"|attr_accessor|public|private|untyped|true|false)\z",
    ))
    .expect("static regex")
});

pub fn render(node: &TypeNode, level: u8) -> Result<String> {
    match node {
        TypeNode::Base { name } => render_base(*name),
        TypeNode::Literal { literal } => render_literal(literal),
        TypeNode::Tuple { types } => {
            if types.is_empty() {
                return Ok("[ ]".to_string());
            }
            let elems = render_all(types, 0)?;
            Ok(format!("[ {} ]", elems.join(", ")))
        }
        TypeNode::Record { fields } => {
            if fields.is_empty() {
                return Ok("{ }".to_string());
            }
            let fields = fields
                .iter()
                .map(|f| Ok(format!("{}: {}", render_key(&f.key), render(&f.ty, 0)?)))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("{{ {} }}", fields.join("; ")))
        }
        TypeNode::Union { types } => {
            let body = render_all(types, 0)?.join(" | ");
            Ok(parenthesize(body, level))
        }
        TypeNode::Intersection { types } => {
            let body = render_all(types, 2)?.join(" & ");
            Ok(parenthesize(body, level))
        }
        TypeNode::Optional { inner } => {
            let rendered = render(inner, 1)?;
            // Symbol literals keep a space before `?`.
            match inner.as_ref() {
                TypeNode::Literal { literal: Literal::Symbol(_) } => Ok(format!("{rendered} ?")),
                _ => Ok(format!("{rendered}?")),
            }
        }
        TypeNode::ClassInstance { name, args } => render_class(name, args),
        TypeNode::Function(_) => Err(Error::unsupported("function type used as a value type")),
        TypeNode::Interface { name, .. } => Err(Error::unsupported(format!("interface `{name}`"))),
        TypeNode::ClassSingleton { name } => Err(Error::unsupported(format!("singleton(`{name}`)"))),
        TypeNode::Variable { name } => Err(Error::unsupported(format!("type variable `{name}`"))),
        TypeNode::Alias { name } => Err(Error::unsupported(format!("type alias `{name}`"))),
        TypeNode::Proc { .. } => Err(Error::unsupported("proc type")),
    }
}

fn render_all(types: &[TypeNode], level: u8) -> Result<Vec<String>> {
    types.iter().map(|t| render(t, level)).collect()
}

fn parenthesize(body: String, level: u8) -> String {
    if level > 0 { format!("({body})") } else { body }
}

fn render_base(base: BaseKind) -> Result<String> {
    let s = match base {
        BaseKind::Any => "any",
        BaseKind::Void => "void",
        BaseKind::Nil => "null",
        BaseKind::Bool => "boolean",
        BaseKind::Top => return Err(Error::unsupported("top type")),
        BaseKind::Bottom => return Err(Error::unsupported("bottom type")),
        BaseKind::SelfType => return Err(Error::unsupported("self type")),
        BaseKind::Instance => return Err(Error::unsupported("instance type")),
        BaseKind::Class => return Err(Error::unsupported("class type")),
    };
    Ok(s.to_string())
}

fn render_literal(literal: &Literal) -> Result<String> {
    match literal {
        Literal::String(s) | Literal::Symbol(s) => Ok(quote(s)),
        Literal::Integer(i) => Ok(i.to_string()),
        Literal::Bool(b) => Ok(b.to_string()),
        Literal::Float(f) => Err(Error::unsupported(format!("literal {f}"))),
    }
}

fn render_key(key: &FieldKey) -> String {
    match key {
        FieldKey::Symbol(k) if IDENTIFIER.is_match(k) && !RESERVED.is_match(k) => k.clone(),
        FieldKey::Symbol(k) | FieldKey::String(k) => quote(k),
    }
}

fn render_class(name: &str, args: &[TypeNode]) -> Result<String> {
    match (name.trim_start_matches("::"), args) {
        ("Integer", []) => Ok("number".to_string()),
        ("String", []) => Ok("string".to_string()),
        ("Array", [item]) => Ok(format!("{}[]", render(item, 0)?)),
        (_, args) => Err(Error::unsupported(format!("class `{name}` with {} type argument(s)", args.len()))),
    }
}

pub(crate) fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BASE_KINDS, FunctionSignature, ParamKind, ParamSpec};

    fn sym(s: &str) -> TypeNode { TypeNode::literal(Literal::Symbol(s.into())) }
    fn string() -> TypeNode { TypeNode::class("::String", vec![]) }
    fn integer() -> TypeNode { TypeNode::class("::Integer", vec![]) }
    fn r0(node: &TypeNode) -> String { render(node, 0).unwrap() }
    fn callback() -> FunctionSignature {
        FunctionSignature {
            params: vec![ParamSpec::new("x", integer(), ParamKind::RequiredPositional)],
            returns: Box::new(TypeNode::base(BaseKind::Void)),
        }
    }

    #[test]
    fn bases() {
        assert_eq!(r0(&TypeNode::base(BaseKind::Any)), "any");
        assert_eq!(r0(&TypeNode::base(BaseKind::Void)), "void");
        assert_eq!(r0(&TypeNode::base(BaseKind::Nil)), "null");
        assert_eq!(r0(&TypeNode::base(BaseKind::Bool)), "boolean");
    }

    #[test]
    fn unsupported_bases_fail() {
        let all: Vec<BaseKind> = BASE_KINDS
            .iter()
            .map(|k| serde_json::from_value(serde_json::json!(k)).unwrap())
            .collect();
        let failing = all
            .into_iter()
            .filter(|b| render(&TypeNode::base(*b), 0).is_err())
            .count();
        assert_eq!(failing, 5);
    }

    #[test]
    fn literals() {
        assert_eq!(r0(&sym("x")), "\"x\"");
        assert_eq!(r0(&TypeNode::literal(Literal::String("a\"b".into()))), "\"a\\\"b\"");
        assert_eq!(r0(&TypeNode::literal(Literal::Integer(-3))), "-3");
        assert_eq!(r0(&TypeNode::literal(Literal::Bool(true))), "true");
        assert!(matches!(
            render(&TypeNode::literal(Literal::Float(1.5)), 0),
            Err(Error::UnsupportedConstruct(_))
        ));
    }

    #[test]
    fn empty_containers() {
        assert_eq!(r0(&TypeNode::Tuple { types: vec![] }), "[ ]");
        assert_eq!(r0(&TypeNode::Record { fields: vec![] }), "{ }");
    }

    #[test]
    fn tuples_and_records() {
        let tuple = TypeNode::Tuple { types: vec![integer(), string()] };
        assert_eq!(r0(&tuple), "[ number, string ]");

        let record = TypeNode::record([
            (FieldKey::Symbol("id".into()), integer()),
            (FieldKey::Symbol("type".into()), string()),
            (FieldKey::Symbol("content-type".into()), string()),
            (FieldKey::String("name".into()), string()),
        ]);
        assert_eq!(
            r0(&record),
            r#"{ id: number; "type": string; "content-type": string; "name": string }"#
        );
    }

    #[test]
    fn union_parenthesizes_only_when_nested() {
        let u = TypeNode::union(vec![integer(), string()]);
        assert_eq!(r0(&u), "number | string");
        assert_eq!(render(&u, 1).unwrap(), "(number | string)");
    }

    #[test]
    fn intersection_forces_member_parens() {
        let i = TypeNode::intersection(vec![TypeNode::union(vec![integer(), string()])]);
        assert_eq!(r0(&i), "(number | string)");

        let i = TypeNode::intersection(vec![
            TypeNode::record([(FieldKey::Symbol("a".into()), integer())]),
            TypeNode::union(vec![string(), TypeNode::base(BaseKind::Nil)]),
        ]);
        assert_eq!(r0(&i), "{ a: number } & (string | null)");
        assert_eq!(render(&i, 1).unwrap(), "({ a: number } & (string | null))");
    }

    #[test]
    fn optional_symbol_keeps_space() {
        assert_eq!(r0(&TypeNode::optional(sym("x"))), "\"x\" ?");
        assert_eq!(r0(&TypeNode::optional(TypeNode::base(BaseKind::Bool))), "boolean?");
        let u = TypeNode::optional(TypeNode::union(vec![integer(), string()]));
        assert_eq!(r0(&u), "(number | string)?");
    }

    #[test]
    fn class_mapping() {
        assert_eq!(r0(&integer()), "number");
        assert_eq!(r0(&TypeNode::class("String", vec![])), "string");
        assert_eq!(r0(&TypeNode::class("::Array", vec![string()])), "string[]");
        assert!(render(&TypeNode::class("::Array", vec![string(), integer()]), 0).is_err());
        assert!(render(&TypeNode::class("::Array", vec![]), 0).is_err());
        assert!(render(&TypeNode::class("::Hash", vec![string(), integer()]), 0).is_err());
        assert!(render(&TypeNode::class("::Integer", vec![string()]), 0).is_err());
    }

    #[test]
    fn unsupported_variants_fail_loudly() {
        let nodes = vec![
            TypeNode::Interface { name: "_Each".into(), args: vec![] },
            TypeNode::ClassSingleton { name: "::String".into() },
            TypeNode::Variable { name: "T".into() },
            TypeNode::Alias { name: "json".into() },
            TypeNode::Tuple { types: vec![integer(), TypeNode::Variable { name: "T".into() }] },
            TypeNode::Function(callback()),
            TypeNode::Proc { function: Box::new(callback()) },
        ];
        for node in nodes {
            assert!(matches!(render(&node, 0), Err(Error::UnsupportedConstruct(_))), "{node:?}");
        }
    }
}
