use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use docreg_core::{
    Address, Document, DocumentEvent, DocumentId, DocumentStateMachine, RegistryError,
};

/// Caller-supplied fields of a new document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSubmission {
    pub document_type: String,
    pub content_hash: String,
    #[serde(default)]
    pub metadata: String,
    pub student_id_number: String,
}

impl DocumentSubmission {
    pub fn new(
        document_type: impl Into<String>,
        content_hash: impl Into<String>,
        metadata: impl Into<String>,
        student_id_number: impl Into<String>,
    ) -> Self {
        Self {
            document_type: document_type.into(),
            content_hash: content_hash.into(),
            metadata: metadata.into(),
            student_id_number: student_id_number.into(),
        }
    }
}

/// Documents keyed by their sequential identifier.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: BTreeMap<DocumentId, Document>,
    /// Last identifier handed out; `0` before the first submission.
    last_id: DocumentId,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new unverified document under the next identifier.
    /// Duplicate content hashes are accepted.
    pub fn submit(
        &mut self,
        submitter: &Address,
        submission: DocumentSubmission,
        now: DateTime<Utc>,
    ) -> Result<DocumentId, RegistryError> {
        let id = self.next_id()?;
        let document = Document {
            id,
            document_type: submission.document_type,
            content_hash: submission.content_hash,
            metadata: submission.metadata,
            created_at: now,
            submitter: submitter.clone(),
            verified: false,
            verified_by: Vec::new(),
            verified_at: None,
            student_id_number: submission.student_id_number,
        };
        self.documents.insert(id, document);
        self.last_id = id;
        Ok(id)
    }

    /// Mark a document verified by `verifier`. One-shot: a verified document
    /// rejects every later attempt with `AlreadyVerified`.
    pub fn verify(
        &mut self,
        verifier: &Address,
        id: DocumentId,
        now: DateTime<Utc>,
    ) -> Result<&Document, RegistryError> {
        let document = self
            .documents
            .get_mut(&id)
            .ok_or_else(|| RegistryError::document_not_found(id))?;
        DocumentStateMachine::transition(document.state(), DocumentEvent::Verify)
            .map_err(|_| RegistryError::AlreadyVerified(id))?;

        document.verified = true;
        document.verified_at = Some(now);
        document.verified_by.push(verifier.clone());
        Ok(document)
    }

    /// A copy of the document; the stored record is never handed out.
    pub fn get(&self, id: DocumentId) -> Result<Document, RegistryError> {
        self.documents
            .get(&id)
            .cloned()
            .ok_or_else(|| RegistryError::document_not_found(id))
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.documents.contains_key(&id)
    }

    pub fn submitter_of(&self, id: DocumentId) -> Result<&Address, RegistryError> {
        self.documents
            .get(&id)
            .map(|doc| &doc.submitter)
            .ok_or_else(|| RegistryError::document_not_found(id))
    }

    /// Documents submitted by `submitter`, in identifier order.
    pub fn by_submitter(&self, submitter: &Address) -> Vec<Document> {
        self.documents
            .values()
            .filter(|doc| &doc.submitter == submitter)
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Number of documents ever submitted.
    pub fn count(&self) -> u64 {
        self.last_id
    }

    /// Identifier the next submission will receive.
    pub fn next_id(&self) -> Result<DocumentId, RegistryError> {
        self.last_id.checked_add(1).ok_or_else(|| {
            RegistryError::InvalidArgument("document identifier space exhausted".into())
        })
    }
}
