use std::collections::BTreeSet;

use docreg_core::{Address, DocumentId};

/// Explicit per-document access grants, keyed by (document, grantee).
///
/// The ledger only records grants. It does not gate reads; any layer that
/// exposes documents to unprivileged parties must consult `has_access`.
#[derive(Debug, Clone, Default)]
pub struct AccessLedger {
    grants: BTreeSet<(DocumentId, Address)>,
}

impl AccessLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a grant. Returns `false` if it already existed.
    pub fn grant(&mut self, document_id: DocumentId, grantee: &Address) -> bool {
        self.grants.insert((document_id, grantee.clone()))
    }

    pub fn has_access(&self, document_id: DocumentId, user: &Address) -> bool {
        self.grants.contains(&(document_id, user.clone()))
    }

    /// Grantees of one document, in address order.
    pub fn grantees(&self, document_id: DocumentId) -> Vec<Address> {
        self.grants
            .range((document_id, Address::new(String::new()))..)
            .take_while(|(id, _)| *id == document_id)
            .map(|(_, grantee)| grantee.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(DocumentId, Address)> {
        self.grants.iter()
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}
