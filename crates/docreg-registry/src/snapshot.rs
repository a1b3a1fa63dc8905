//! Serializable point-in-time view of the whole registry.

use serde::{Deserialize, Serialize};

use docreg_core::{Address, Document, DocumentId, StudentProfile};

use crate::events::RecordedEvent;
use crate::service::RegistryState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminEntry {
    pub address: Address,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentEntry {
    pub address: Address,
    pub profile: StudentProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    pub document_id: DocumentId,
    pub grantee: Address,
}

/// Consistent copy of the registry, taken under the registry lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub owner: Option<Address>,
    pub admins: Vec<AdminEntry>,
    pub verifiers: Vec<Address>,
    pub students: Vec<StudentEntry>,
    pub documents: Vec<Document>,
    pub grants: Vec<AccessGrant>,
    pub document_count: u64,
    pub events: Vec<RecordedEvent>,
}

impl RegistrySnapshot {
    pub(crate) fn capture(state: &RegistryState) -> Self {
        Self {
            owner: state.directory.owner().cloned(),
            admins: state
                .directory
                .admins()
                .map(|(address, name)| AdminEntry {
                    address: address.clone(),
                    name: name.to_string(),
                })
                .collect(),
            verifiers: state.directory.verifiers().cloned().collect(),
            students: state
                .directory
                .students()
                .map(|(address, profile)| StudentEntry {
                    address: address.clone(),
                    profile: profile.clone(),
                })
                .collect(),
            documents: state.documents.iter().cloned().collect(),
            grants: state
                .access
                .iter()
                .map(|(document_id, grantee)| AccessGrant {
                    document_id: *document_id,
                    grantee: grantee.clone(),
                })
                .collect(),
            document_count: state.documents.count(),
            events: state.events.entries().to_vec(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
