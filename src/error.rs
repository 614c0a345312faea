use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CompilerError>;

/// Canonical error surface for habitgraph.
///
/// Deliberately small: malformed input *data* is never an error here.
/// Triplets the schema cannot express surface as reason-tagged
/// [`Leftover`](crate::Leftover)s and unparseable dates degrade to property
/// omission. Only API misuse at the orchestration boundary is fallible.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompilerError {
    #[error("unknown backend {0:?} (expected \"sql\" or \"neo4j\")")]
    UnknownBackend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_backend_names_the_offender() {
        let err = CompilerError::UnknownBackend("mongo".to_string());
        assert!(err.to_string().contains("mongo"));
    }
}
