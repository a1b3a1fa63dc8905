use std::fmt;

use crate::document_state::VerificationState;
use crate::types::{Address, DocumentId, Role};

/// The kind of record a lookup failed to find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    Document(DocumentId),
    Student(Address),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document(id) => write!(f, "document {}", id),
            Self::Student(addr) => write!(f, "student {}", addr),
        }
    }
}

/// Registry errors. Every failure is reported before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("permission denied: {caller} lacks the {required} role")]
    PermissionDenied { caller: Address, required: Role },

    #[error("not found: {0}")]
    NotFound(Missing),

    #[error("document {0} is already verified")]
    AlreadyVerified(DocumentId),

    #[error("{caller} did not submit document {document_id}")]
    NotDocumentOwner {
        caller: Address,
        document_id: DocumentId,
    },

    #[error("student already registered: {0}")]
    AlreadyExists(Address),

    #[error("registry is already initialized")]
    AlreadyInitialized,

    #[error("registry is not initialized")]
    NotInitialized,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        from: VerificationState,
        to: VerificationState,
    },
}

impl RegistryError {
    pub fn document_not_found(id: DocumentId) -> Self {
        Self::NotFound(Missing::Document(id))
    }

    pub fn student_not_found(addr: &Address) -> Self {
        Self::NotFound(Missing::Student(addr.clone()))
    }

    pub fn permission_denied(caller: &Address, required: Role) -> Self {
        Self::PermissionDenied {
            caller: caller.clone(),
            required,
        }
    }
}
