//! Failures of a chatbot turn
//!
//! "I did not understand the question" is not an error and never appears
//! here; it is a normal reply. These variants mean something is broken.

use thiserror::Error;

use crate::intent::Intent;
use crate::matchers::Stage;

#[derive(Debug, Error)]
pub enum ChatError {
    /// A matcher stage could not run (model inference failed)
    #[error("{stage} stage failed")]
    Model {
        stage: Stage,
        #[source]
        source: anyhow::Error,
    },

    /// The query behind a database-backed intent failed
    #[error("database lookup for intent {intent} failed")]
    Database {
        intent: Intent,
        #[source]
        source: anyhow::Error,
    },
}

impl ChatError {
    /// Short failure class for logs and HTTP error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::Model { .. } => "model_failure",
            ChatError::Database { .. } => "database_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::error::Error as _;

    #[test]
    fn test_source_is_kept() {
        let err = ChatError::Database {
            intent: Intent::Progress,
            source: anyhow!("connection refused"),
        };
        assert_eq!(err.to_string(), "database lookup for intent progresso failed");
        assert_eq!(err.source().unwrap().to_string(), "connection refused");
        assert_eq!(err.kind(), "database_failure");
    }

    #[test]
    fn test_model_failure_names_stage() {
        let err = ChatError::Model {
            stage: Stage::Classifier,
            source: anyhow!("bad tensor"),
        };
        assert_eq!(err.to_string(), "classifier stage failed");
        assert_eq!(err.kind(), "model_failure");
    }
}
