use thiserror::Error;

use crate::editor::entity::EntityKind;
use crate::editor::validation::Violation;
use crate::gateway::GatewayError;

/// Editor-level error type.
/// Every variant leaves the document editable; none of them is fatal.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("{kind} #{id} not found")]
    EntityNotFound { kind: EntityKind, id: u64 },

    #[error("{kind}.{field}: index {index} out of range (len {len})")]
    IndexOutOfRange {
        kind: EntityKind,
        field: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{kind}.{field} expects {expected}, got {got}")]
    FieldType {
        kind: EntityKind,
        field: &'static str,
        expected: &'static str,
        got: &'static str,
    },

    #[error("A save is already in progress")]
    SaveInProgress,

    #[error("Validation failed with {} violation(s)", .0.len())]
    Invalid(Vec<Violation>),

    #[error("Save failed: {0}")]
    Transport(#[from] GatewayError),

    #[error("Editor session is closed")]
    SessionClosed,
}

impl EditorError {
    /// Stable machine-readable code for host UIs and logs.
    pub fn code(&self) -> &'static str {
        match self {
            EditorError::EntityNotFound { .. } => "NOT_FOUND",
            EditorError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            EditorError::FieldType { .. } => "FIELD_TYPE",
            EditorError::SaveInProgress => "SAVE_IN_PROGRESS",
            EditorError::Invalid(_) => "VALIDATION_ERROR",
            EditorError::Transport(_) => "TRANSPORT_ERROR",
            EditorError::SessionClosed => "SESSION_CLOSED",
        }
    }

    /// Violations carried by a validation failure, empty otherwise.
    pub fn violations(&self) -> &[Violation] {
        match self {
            EditorError::Invalid(violations) => violations,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_messages() {
        let err = EditorError::EntityNotFound {
            kind: EntityKind::Skill,
            id: 7,
        };
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "skill #7 not found");

        let err = EditorError::Transport(GatewayError::Api {
            status: 503,
            message: "maintenance".into(),
        });
        assert_eq!(err.code(), "TRANSPORT_ERROR");
        assert!(err.to_string().contains("maintenance"));
        assert!(err.violations().is_empty());
    }
}
