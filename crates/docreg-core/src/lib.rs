//! Docreg Core — Fundamental types, errors, the verification lifecycle and
//! time sources for the docreg document registry.

pub mod clock;
pub mod document_state;
pub mod error;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use document_state::{DocumentEvent, DocumentStateMachine, VerificationState};
pub use error::{Missing, RegistryError};
pub use types::{Address, Branch, Document, DocumentId, Role, StudentProfile, Year};
