//! Error types
//!
//! Traversal never fails: "no such move" is a `false` return on the cursor.
//! Everything here aborts the query that produced it and nothing else.

/// Crate-wide result alias
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All failure modes of schema construction, instance validation and
/// XPath evaluation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Instance data and schema disagree (unknown field, kind mismatch,
    /// list entry without its key).
    #[error("schema mismatch at {path}: {reason}")]
    SchemaMismatch { path: String, reason: String },

    /// A leaf holds a value that has no canonical string rendering.
    #[error("unsupported value type at {path}: {reason}")]
    UnsupportedValueType { path: String, reason: String },

    /// The schema declaration itself is inconsistent.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// Expression text could not be parsed.
    #[error("XPath syntax error: {0}")]
    Syntax(String),

    #[error("unknown function: {0}()")]
    UnknownFunction(String),

    #[error("{function}() requires {expected}")]
    Arity {
        function: &'static str,
        expected: &'static str,
    },

    #[error("{function}() argument must be {expected}")]
    ArgumentType {
        function: &'static str,
        expected: &'static str,
    },

    #[error("unbound variable: ${0}")]
    UnboundVariable(String),

    #[error("{0} is not supported")]
    Unsupported(String),

    /// `select` was used on an expression that yields a scalar.
    #[error("expression did not return a node-set")]
    NotNodeSet,

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn mismatch(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::SchemaMismatch {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
