//! Reference interpreter for compiled path expressions.
//!
//! Mirrors what the rendered TypeScript does when called with a params
//! object: required segments use JavaScript truthiness, wildcards coalesce
//! only `null`/absent, groups swallow a missing segment. Alternation is
//! emitted as a bare `|`, which JavaScript reads as bitwise OR at lower
//! precedence than `+`, so each expression scope (the top level or a group
//! body) is a `|`-separated list of `+`-chains.
use serde_json::{Map, Value};

use super::PathNode;
use crate::error::MissingRequiredSegment;

pub fn evaluate(node: &PathNode, params: &Map<String, Value>) -> Result<String, MissingRequiredSegment> {
    Ok(eval_scope(node, params)?.into_string())
}

/// The JavaScript values a path expression can produce.
#[derive(Debug, Clone)]
enum JsValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl JsValue {
    fn from_param(v: &Value) -> Self {
        match v {
            Value::Null => JsValue::Null,
            Value::Bool(b) => JsValue::Bool(*b),
            Value::Number(n) => JsValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => JsValue::Str(s.clone()),
            // Arrays and objects only ever reach `+` and `|` through ToPrimitive.
            other => JsValue::Str(js_string(other)),
        }
    }

    fn into_string(self) -> String {
        match self {
            JsValue::Null => "null".to_string(),
            JsValue::Bool(b) => b.to_string(),
            JsValue::Number(f) => number_string(f),
            JsValue::Str(s) => s,
        }
    }

    fn to_number(&self) -> f64 {
        match self {
            JsValue::Null => 0.0,
            JsValue::Bool(b) => f64::from(u8::from(*b)),
            JsValue::Number(f) => *f,
            JsValue::Str(s) => string_to_number(s),
        }
    }

    fn add(self, rhs: JsValue) -> JsValue {
        match (self, rhs) {
            (JsValue::Str(a), b) => JsValue::Str(a + &b.into_string()),
            (a, JsValue::Str(b)) => JsValue::Str(a.into_string() + &b),
            (a, b) => JsValue::Number(a.to_number() + b.to_number()),
        }
    }

    fn bit_or(&self, rhs: &JsValue) -> JsValue {
        JsValue::Number(f64::from(to_int32(self.to_number()) | to_int32(rhs.to_number())))
    }
}

/// Splits one expression scope into its `|`-separated `+`-chains of atoms.
fn chains(node: &PathNode) -> Vec<Vec<&PathNode>> {
    match node {
        PathNode::Concat { left, right } => {
            let mut out = chains(left);
            let mut rest = chains(right).into_iter();
            if let Some(first) = rest.next() {
                match out.last_mut() {
                    Some(last) => last.extend(first),
                    None => out.push(first),
                }
            }
            out.extend(rest);
            out
        }
        PathNode::Alternation { children } => children.iter().flat_map(chains).collect(),
        atom => vec![vec![atom]],
    }
}

fn eval_scope(node: &PathNode, params: &Map<String, Value>) -> Result<JsValue, MissingRequiredSegment> {
    let mut result: Option<JsValue> = None;
    for chain in chains(node) {
        let mut value: Option<JsValue> = None;
        for atom in chain {
            let atom = eval_atom(atom, params)?;
            value = Some(match value {
                Some(acc) => acc.add(atom),
                None => atom,
            });
        }
        let value = value.unwrap_or_else(|| JsValue::Str(String::new()));
        result = Some(match result {
            Some(acc) => acc.bit_or(&value),
            None => value,
        });
    }
    Ok(result.unwrap_or_else(|| JsValue::Str(String::new())))
}

fn eval_atom(node: &PathNode, params: &Map<String, Value>) -> Result<JsValue, MissingRequiredSegment> {
    match node {
        PathNode::Literal { text } => Ok(JsValue::Str(text.clone())),
        PathNode::Group { body } => {
            Ok(eval_scope(body, params).unwrap_or_else(|_| JsValue::Str(String::new())))
        }
        PathNode::Symbol { name, wildcard: true } => match params.get(name) {
            None | Some(Value::Null) => Ok(JsValue::Str(String::new())),
            Some(v) => Ok(JsValue::from_param(v)),
        },
        PathNode::Symbol { name, wildcard: false } => match params.get(name) {
            Some(v) if truthy(v) => Ok(JsValue::from_param(v)),
            _ => Err(MissingRequiredSegment(name.clone())),
        },
        PathNode::Concat { .. } | PathNode::Alternation { .. } => eval_scope(node, params),
    }
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn js_string(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), number_string),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|i| if i.is_null() { String::new() } else { js_string(i) })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_string(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

/// `ToNumber` on a string: blank is 0, anything non-numeric is NaN.
fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    match s {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if s.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')) => {
            s.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

fn to_int32(f: f64) -> i32 {
    if !f.is_finite() {
        return 0;
    }
    f.trunc().rem_euclid(4_294_967_296.0) as u32 as i32
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn required_segment_present_and_absent() {
        let node = PathNode::concat(PathNode::literal("/users/"), PathNode::symbol("id"));
        assert_eq!(evaluate(&node, &params(json!({"id": 42}))).unwrap(), "/users/42");
        assert_eq!(
            evaluate(&node, &params(json!({}))),
            Err(MissingRequiredSegment("id".into()))
        );
    }

    #[test]
    fn falsy_values_count_as_missing() {
        let node = PathNode::symbol("id");
        for v in [json!(""), json!(0), json!(false), json!(null)] {
            assert!(evaluate(&node, &params(json!({"id": v}))).is_err());
        }
    }

    #[test]
    fn optional_group() {
        let node = PathNode::group(PathNode::concat(PathNode::literal("/"), PathNode::symbol("format")));
        assert_eq!(evaluate(&node, &params(json!({}))).unwrap(), "");
        assert_eq!(evaluate(&node, &params(json!({"format": "json"}))).unwrap(), "/json");
    }

    #[test]
    fn wildcard_only_coalesces_null() {
        let node = PathNode::wildcard("rest");
        assert_eq!(evaluate(&node, &params(json!({}))).unwrap(), "");
        assert_eq!(evaluate(&node, &params(json!({"rest": false}))).unwrap(), "false");
        assert_eq!(evaluate(&node, &params(json!({"rest": "a/b"}))).unwrap(), "a/b");
    }

    #[test]
    fn nested_groups() {
        let node = crate::path::parse("/a(/:b(/:c))").unwrap();
        assert_eq!(evaluate(&node, &params(json!({}))).unwrap(), "/a");
        assert_eq!(evaluate(&node, &params(json!({"b": "x"}))).unwrap(), "/a/x");
        assert_eq!(evaluate(&node, &params(json!({"b": "x", "c": 1.0}))).unwrap(), "/a/x/1");
        assert_eq!(evaluate(&node, &params(json!({"c": "y"}))).unwrap(), "/a");
    }

    fn alternation(children: Vec<PathNode>) -> PathNode {
        PathNode::Alternation { children }
    }

    #[test]
    fn alternation_is_bitwise_or_of_chains() {
        // "/x/" + "a"|"b" reads as ("/x/" + "a") | "b"
        let node = PathNode::concat(
            PathNode::literal("/x/"),
            alternation(vec![PathNode::literal("a"), PathNode::literal("b")]),
        );
        assert_eq!(crate::path::render(&node, ""), r#""/x/" + "a"|"b""#);
        assert_eq!(evaluate(&node, &params(json!({}))).unwrap(), "0");

        let digits = alternation(vec![PathNode::literal("1"), PathNode::literal("6")]);
        assert_eq!(evaluate(&digits, &params(json!({}))).unwrap(), "7");
    }

    #[test]
    fn alternation_inside_group_stays_scoped() {
        let node = PathNode::concat(
            PathNode::literal("/p/"),
            PathNode::group(alternation(vec![PathNode::symbol("n"), PathNode::literal("4")])),
        );
        assert_eq!(evaluate(&node, &params(json!({"n": 3}))).unwrap(), "/p/7");
        assert_eq!(evaluate(&node, &params(json!({}))).unwrap(), "/p/");
    }

    #[test]
    fn alternation_still_raises_missing_segments() {
        let node = alternation(vec![PathNode::literal("a"), PathNode::symbol("id")]);
        assert_eq!(
            evaluate(&node, &params(json!({}))),
            Err(MissingRequiredSegment("id".into()))
        );
    }
}
