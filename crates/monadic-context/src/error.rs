//! Errors raised while resolving services from a [`Context`](crate::Context).

use crate::tag::TagId;
use thiserror::Error;

/// Result type for every context-requiring computation.
pub type ContextResult<T> = Result<T, ContextError>;

/// Failure to resolve a service from a context.
///
/// Both variants indicate a context that was under-provisioned or
/// mis-provisioned relative to what the computation asked for. They are
/// programming errors: re-running against the same context fails the same
/// way, so callers that want to recover must build an augmented context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The requested identity has no entry in the context.
    #[error("service `{id}` not found in context; available services: [{}]", join_ids(.available))]
    MissingService {
        /// The identity that was requested.
        id: TagId,
        /// Identities the context does provide, in insertion order.
        available: Vec<TagId>,
    },

    /// The identity is present but holds a value of another type.
    ///
    /// Happens when two tags of different service types share an explicit
    /// identity string.
    #[error("service `{id}` holds a `{found}`, not the requested `{expected}`")]
    TypeMismatch {
        /// The identity that was requested.
        id: TagId,
        /// Type name the requesting tag is parameterised with.
        expected: &'static str,
        /// Type name of the value actually stored.
        found: &'static str,
    },
}

impl ContextError {
    /// Returns true if this is a [`ContextError::MissingService`].
    #[must_use]
    pub fn is_missing_service(&self) -> bool {
        matches!(self, Self::MissingService { .. })
    }

    /// The identity whose resolution failed.
    #[must_use]
    pub fn id(&self) -> &TagId {
        match self {
            Self::MissingService { id, .. } | Self::TypeMismatch { id, .. } => id,
        }
    }

    /// The identity that was absent, if this is a missing-service error.
    #[must_use]
    pub fn missing_id(&self) -> Option<&TagId> {
        match self {
            Self::MissingService { id, .. } => Some(id),
            Self::TypeMismatch { .. } => None,
        }
    }
}

fn join_ids(ids: &[TagId]) -> String {
    ids.iter()
        .map(TagId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_service_message() {
        let err = ContextError::MissingService {
            id: TagId::from_static("db"),
            available: vec![TagId::from_static("port"), TagId::from_static("host")],
        };
        assert_eq!(
            err.to_string(),
            "service `db` not found in context; available services: [port, host]"
        );
        assert!(err.is_missing_service());
        assert_eq!(err.missing_id().map(TagId::as_str), Some("db"));
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = ContextError::TypeMismatch {
            id: TagId::from_static("port"),
            expected: "u16",
            found: "alloc::string::String",
        };
        assert!(!err.is_missing_service());
        assert_eq!(err.missing_id(), None);
        assert_eq!(err.id().as_str(), "port");
        assert!(err.to_string().contains("not the requested `u16`"));
    }
}
