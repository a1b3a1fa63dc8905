//! Docreg Registry — principal directory, document store, access ledger,
//! and the registry service that composes them.

pub mod access;
pub mod command;
pub mod directory;
pub mod events;
pub mod service;
pub mod snapshot;
pub mod store;

pub use access::AccessLedger;
pub use command::{CommandOutcome, RegistryCommand};
pub use directory::PrincipalDirectory;
pub use events::{EventLog, RecordedEvent, RegistryEvent};
pub use service::{RegistryService, RegistryState};
pub use snapshot::{AccessGrant, AdminEntry, RegistrySnapshot, StudentEntry};
pub use store::{DocumentStore, DocumentSubmission};
