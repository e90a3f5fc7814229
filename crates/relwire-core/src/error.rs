use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A relational operator was built with a missing or invalid mandatory
    /// payload. Raised at construction, never at encode time.
    #[error("malformed {operator} operator: {reason}")]
    MalformedOperator {
        operator: &'static str,
        reason: String,
    },

    /// An expression node was built with an invalid shape (e.g. an if/then
    /// with no clauses).
    #[error("malformed {kind} expression: {reason}")]
    MalformedExpression { kind: &'static str, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Schema error: {0}")]
    Schema(String),
}

impl Error {
    pub fn malformed(operator: &'static str, reason: impl Into<String>) -> Self {
        Error::MalformedOperator {
            operator,
            reason: reason.into(),
        }
    }

    pub fn malformed_expr(kind: &'static str, reason: impl Into<String>) -> Self {
        Error::MalformedExpression {
            kind,
            reason: reason.into(),
        }
    }

    /// True for construction-time operator validation failures.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedOperator { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display_names_operator() {
        let e = Error::malformed("filter", "missing condition");
        assert!(e.is_malformed());
        assert_eq!(e.to_string(), "malformed filter operator: missing condition");
    }

    #[test]
    fn config_is_not_malformed() {
        assert!(!Error::Config("bad".into()).is_malformed());
    }
}
