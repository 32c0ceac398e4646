//! Reading the route table and signature documents from disk.
use std::path::{Path, PathBuf};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::routes::{RouteRecord, RouteTable};
use crate::signatures::SignatureEnvironment;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(source_path: &Path, src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| Error::Load {
        source_path: source_path.to_path_buf(),
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

fn from_value_with_path<T: DeserializeOwned>(source_path: &Path, value: Value) -> Result<T> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(|err| Error::Load {
        source_path: source_path.to_path_buf(),
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })
}

/// Accepts a bare array of routes or `{ "routes": [...] }`.
pub fn parse_route_table(source_path: &Path, src: &str) -> Result<RouteTable> {
    let value: Value = from_str_with_path(source_path, src)?;
    match value {
        Value::Array(_) => {
            let routes: Vec<RouteRecord> = from_value_with_path(source_path, value)?;
            Ok(RouteTable { routes })
        }
        other => from_value_with_path(source_path, other),
    }
}

pub fn load_route_table(path: &Path) -> Result<RouteTable> {
    let table = parse_route_table(path, &read(path)?)?;
    debug!(path = %path.display(), routes = table.routes.len(), "loaded route table");
    Ok(table)
}

/// Loads and merges every signature document, in the given order.
pub fn load_signatures(paths: &[PathBuf]) -> Result<SignatureEnvironment> {
    let mut env = SignatureEnvironment::default();
    for path in paths {
        let part: SignatureEnvironment = from_str_with_path(path, &read(path)?)?;
        debug!(path = %path.display(), controllers = part.controllers.len(), "loaded signatures");
        env.merge(part)?;
    }
    Ok(env)
}

/// Literal paths pass through; glob patterns expand (sorted) and must match something.
pub fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                anyhow::bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }
    Ok(out)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_table_accepts_both_shapes() {
        let bare = r#"[{"verb": "GET", "name": "root", "spec": "/"}]"#;
        let wrapped = r#"{"routes": [{"verb": "GET", "name": "root", "spec": "/"}]}"#;
        let p = Path::new("routes.json");
        assert_eq!(parse_route_table(p, bare).unwrap().routes.len(), 1);
        assert_eq!(parse_route_table(p, wrapped).unwrap().routes.len(), 1);
    }

    #[test]
    fn load_errors_name_the_json_path() {
        let src = r#"{"controllers": [{"name": "WidgetsController", "methods": {"show": {"overloads": [
            {"type": {"params": [], "returns": {"kind": "refinement"}}}
        ]}}}]}"#;
        let err = from_str_with_path::<SignatureEnvironment>(Path::new("sig.json"), src).unwrap_err();
        match err {
            Error::Load { path, message, .. } => {
                assert!(path.starts_with("controllers[0].methods.show.overloads[0]"), "{path}");
                assert!(message.contains("refinement"), "{message}");
            }
            other => panic!("expected load error, got {other:?}"),
        }
    }

    #[test]
    fn bad_route_pattern_names_the_route() {
        let src = r#"[{"name": "ok", "spec": "/"}, {"name": "bad", "spec": "/a)"}]"#;
        match parse_route_table(Path::new("routes.json"), src) {
            Err(Error::Load { path, .. }) => assert!(path.starts_with("[1]"), "{path}"),
            other => panic!("expected load error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_route_table(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn literal_paths_pass_through() {
        let out = resolve_file_path_patterns(["a.json", "b/c.json"]).unwrap();
        assert_eq!(out, vec![PathBuf::from("a.json"), PathBuf::from("b/c.json")]);
        assert!(resolve_file_path_patterns(["/definitely/not/here/*.json"]).is_err());
    }
}
