//! Append-only audit log of successful registry mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docreg_core::{Address, DocumentId};

/// A state change recorded by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegistryEvent {
    Initialized {
        owner: Address,
    },
    AdminAdded {
        admin: Address,
        name: String,
    },
    VerifierAdded {
        verifier: Address,
    },
    StudentRegistered {
        student: Address,
        registered_by: Address,
    },
    DocumentSubmitted {
        document_id: DocumentId,
        submitter: Address,
    },
    DocumentVerified {
        document_id: DocumentId,
        verifier: Address,
    },
    AccessGranted {
        document_id: DocumentId,
        grantee: Address,
    },
}

/// An event with its position in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// Starts at 1.
    pub sequence: u64,
    pub at: DateTime<Utc>,
    pub event: RegistryEvent,
}

#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Vec<RecordedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: RegistryEvent, at: DateTime<Utc>) -> u64 {
        let sequence = self.entries.len() as u64 + 1;
        self.entries.push(RecordedEvent {
            sequence,
            at,
            event,
        });
        sequence
    }

    pub fn entries(&self) -> &[RecordedEvent] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
