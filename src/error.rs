use std::path::PathBuf;

/// Generation-time failures.
///
/// `UnsupportedConstruct` and `AmbiguousOverload` are recoverable per action
/// (the collector turns them into a [`Diagnostic`]); everything else aborts the run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unsupported construct: {0}")]
    UnsupportedConstruct(String),

    #[error("expected exactly one overload, found {0}")]
    AmbiguousOverload(usize),

    #[error("signature vocabulary mismatch (unknown: [{}], missing: [{}])", unknown.join(", "), missing.join(", "))]
    VocabularyMismatch {
        unknown: Vec<String>,
        missing: Vec<String>,
    },

    #[error("no signature document carries the variant catalog (`vocabulary`)")]
    MissingVocabulary,

    #[error("path syntax error at byte {offset} in `{pattern}`: {message}")]
    PathSyntax {
        pattern: String,
        offset: usize,
        message: String,
    },

    #[error("failed to load {}: at JSON path {path} → {message}", source_path.display())]
    Load {
        source_path: PathBuf,
        path: String,
        message: String,
    },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn unsupported(what: impl Into<String>) -> Self {
        Error::UnsupportedConstruct(what.into())
    }

    /// Whether the collector may skip the offending action and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::UnsupportedConstruct(_) | Error::AmbiguousOverload(_))
    }
}

/// Raised by an evaluated path when a required dynamic segment has no value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("missing required path segment `{0}`")]
pub struct MissingRequiredSegment(pub String);

/// One skipped action or route, reported next to the generated output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub subject: String,
    pub reason: String,
}

impl Diagnostic {
    pub fn new(subject: impl Into<String>, reason: impl ToString) -> Self {
        Self { subject: subject.into(), reason: reason.to_string() }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} not supported: {}", self.subject, self.reason)
    }
}
