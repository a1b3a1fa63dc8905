use std::fmt;

use crate::error::RegistryError;

/// Verification lifecycle of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum VerificationState {
    /// Submitted, awaiting a verifier.
    Unverified,
    /// Attested by a verifier. Final state.
    Verified,
}

impl VerificationState {
    /// Whether this is a final (terminal) state.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Verified)
    }
}

impl fmt::Display for VerificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unverified => write!(f, "Unverified"),
            Self::Verified => write!(f, "Verified"),
        }
    }
}

/// Events that trigger document state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEvent {
    /// A verifier attests the document.
    Verify,
}

/// Applies lifecycle events to document states.
///
/// Valid transitions:
/// - Unverified → Verified (Verify)
pub struct DocumentStateMachine;

impl DocumentStateMachine {
    /// Attempt a state transition based on an event.
    pub fn transition(
        current: VerificationState,
        event: DocumentEvent,
    ) -> Result<VerificationState, RegistryError> {
        let new_state = match (current, event) {
            (VerificationState::Unverified, DocumentEvent::Verify) => VerificationState::Verified,
            (VerificationState::Verified, DocumentEvent::Verify) => {
                return Err(RegistryError::InvalidStateTransition {
                    from: current,
                    to: VerificationState::Verified,
                });
            }
        };

        tracing::debug!(
            from = %current,
            to = %new_state,
            event = ?event,
            "document state transition"
        );

        Ok(new_state)
    }

    /// Check if a transition is valid without performing it.
    pub fn can_transition(current: VerificationState, event: DocumentEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}
