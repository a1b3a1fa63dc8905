//! The registry service: authorization, lifecycle, and composition of the
//! directory, document store, access ledger and event log.
//!
//! Every operation runs under one lock over the whole `RegistryState`, so
//! concurrent callers observe a serialized ledger. Each mutating operation
//! checks every precondition before it touches state; a failed call leaves
//! the registry unchanged.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use docreg_core::{
    Address, Branch, Clock, Document, DocumentId, RegistryError, Role, StudentProfile,
    SystemClock, Year,
};

use crate::access::AccessLedger;
use crate::directory::PrincipalDirectory;
use crate::events::{EventLog, RecordedEvent, RegistryEvent};
use crate::snapshot::RegistrySnapshot;
use crate::store::{DocumentStore, DocumentSubmission};

/// The aggregate guarded by the registry lock.
#[derive(Debug, Default)]
pub struct RegistryState {
    pub(crate) directory: PrincipalDirectory,
    pub(crate) documents: DocumentStore,
    pub(crate) access: AccessLedger,
    pub(crate) events: EventLog,
}

pub struct RegistryService {
    state: Mutex<RegistryState>,
    clock: Arc<dyn Clock>,
}

impl RegistryService {
    /// Create an uninitialized registry. `initialize` must run before any
    /// mutating operation.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            clock,
        }
    }

    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Install `owner` as the registry owner and first admin.
    pub fn initialize(&self, owner: Address) -> Result<(), RegistryError> {
        self.transact("initialize", |state, now| {
            state.directory.initialize(owner.clone())?;
            state
                .events
                .record(RegistryEvent::Initialized { owner: owner.clone() }, now);
            tracing::info!(owner = %owner, "registry initialized");
            Ok(())
        })
    }

    /// Grant the admin role. Owner only; re-adding an admin is a no-op.
    pub fn add_admin(
        &self,
        caller: &Address,
        target: &Address,
        name: &str,
    ) -> Result<(), RegistryError> {
        self.mutate("add_admin", |state, now| {
            if state.directory.add_admin(caller, target, name)? {
                state.events.record(
                    RegistryEvent::AdminAdded {
                        admin: target.clone(),
                        name: name.to_string(),
                    },
                    now,
                );
                tracing::info!(admin = %target, name, "admin added");
            }
            Ok(())
        })
    }

    /// Grant the verifier role. Owner only; re-adding a verifier is a no-op.
    pub fn add_verifier(&self, caller: &Address, target: &Address) -> Result<(), RegistryError> {
        self.mutate("add_verifier", |state, now| {
            if state.directory.add_verifier(caller, target)? {
                state.events.record(
                    RegistryEvent::VerifierAdded {
                        verifier: target.clone(),
                    },
                    now,
                );
                tracing::info!(verifier = %target, "verifier added");
            }
            Ok(())
        })
    }

    /// Register a student profile. Admin only.
    pub fn register_student(
        &self,
        caller: &Address,
        addr: &Address,
        profile: StudentProfile,
    ) -> Result<(), RegistryError> {
        self.mutate("register_student", |state, now| {
            Self::record_student(state, caller, addr, profile, now)
        })
    }

    /// Register a student from numeric year and branch codes (0..=3 each).
    /// The codes are decoded only after the caller is known to be an admin.
    pub fn register_student_codes(
        &self,
        caller: &Address,
        addr: &Address,
        name: String,
        year: u8,
        branch: u8,
        id_number: String,
    ) -> Result<(), RegistryError> {
        self.mutate("register_student", |state, now| {
            if !state.directory.is_admin(caller) {
                return Err(RegistryError::permission_denied(caller, Role::Admin));
            }
            let profile = StudentProfile::new(
                name,
                Year::from_code(year)?,
                Branch::from_code(branch)?,
                id_number,
            );
            Self::record_student(state, caller, addr, profile, now)
        })
    }

    fn record_student(
        state: &mut RegistryState,
        caller: &Address,
        addr: &Address,
        profile: StudentProfile,
        now: DateTime<Utc>,
    ) -> Result<(), RegistryError> {
        state.directory.register_student(caller, addr, profile)?;
        state.events.record(
            RegistryEvent::StudentRegistered {
                student: addr.clone(),
                registered_by: caller.clone(),
            },
            now,
        );
        tracing::info!(student = %addr, admin = %caller, "student registered");
        Ok(())
    }

    /// Submit a document on behalf of a registered student.
    pub fn submit_document(
        &self,
        caller: &Address,
        submission: DocumentSubmission,
    ) -> Result<DocumentId, RegistryError> {
        self.mutate("submit_document", |state, now| {
            if !state.directory.is_student(caller) {
                return Err(RegistryError::permission_denied(caller, Role::Student));
            }
            let id = state.documents.submit(caller, submission, now)?;
            state.events.record(
                RegistryEvent::DocumentSubmitted {
                    document_id: id,
                    submitter: caller.clone(),
                },
                now,
            );
            tracing::info!(document_id = id, submitter = %caller, "document submitted");
            Ok(id)
        })
    }

    /// Verify a document. The first verifier to act wins; any later call
    /// fails with `AlreadyVerified`.
    pub fn verify_document(
        &self,
        caller: &Address,
        document_id: DocumentId,
    ) -> Result<(), RegistryError> {
        self.mutate("verify_document", |state, now| {
            if !state.directory.is_verifier(caller) {
                return Err(RegistryError::permission_denied(caller, Role::Verifier));
            }
            state.documents.verify(caller, document_id, now)?;
            state.events.record(
                RegistryEvent::DocumentVerified {
                    document_id,
                    verifier: caller.clone(),
                },
                now,
            );
            tracing::info!(document_id, verifier = %caller, "document verified");
            Ok(())
        })
    }

    /// Let `grantee` access a document. Only the document's submitter may
    /// grant, whatever other roles the caller holds.
    pub fn grant_access(
        &self,
        caller: &Address,
        document_id: DocumentId,
        grantee: &Address,
    ) -> Result<(), RegistryError> {
        self.mutate("grant_access", |state, now| {
            let submitter = state.documents.submitter_of(document_id)?;
            if submitter != caller {
                return Err(RegistryError::NotDocumentOwner {
                    caller: caller.clone(),
                    document_id,
                });
            }
            if state.access.grant(document_id, grantee) {
                state.events.record(
                    RegistryEvent::AccessGranted {
                        document_id,
                        grantee: grantee.clone(),
                    },
                    now,
                );
                tracing::info!(document_id, grantee = %grantee, "access granted");
            }
            Ok(())
        })
    }

    /// Read-only copy of a document. Reads are not gated by access grants.
    pub fn get_document(&self, document_id: DocumentId) -> Result<Document, RegistryError> {
        self.lock().documents.get(document_id)
    }

    pub fn get_student(&self, addr: &Address) -> Result<StudentProfile, RegistryError> {
        self.lock().directory.student(addr).cloned()
    }

    /// Whether `user` holds an explicit grant on the document. Unknown
    /// documents report `false`.
    pub fn has_access(&self, document_id: DocumentId, user: &Address) -> bool {
        self.lock().access.has_access(document_id, user)
    }

    pub fn grantees(&self, document_id: DocumentId) -> Vec<Address> {
        self.lock().access.grantees(document_id)
    }

    pub fn is_owner(&self, addr: &Address) -> bool {
        self.lock().directory.is_owner(addr)
    }

    pub fn is_admin(&self, addr: &Address) -> bool {
        self.lock().directory.is_admin(addr)
    }

    pub fn is_verifier(&self, addr: &Address) -> bool {
        self.lock().directory.is_verifier(addr)
    }

    pub fn roles_of(&self, addr: &Address) -> Vec<Role> {
        self.lock().directory.roles_of(addr)
    }

    pub fn documents_by_submitter(&self, submitter: &Address) -> Vec<Document> {
        self.lock().documents.by_submitter(submitter)
    }

    pub fn document_count(&self) -> u64 {
        self.lock().documents.count()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.lock().events.entries().to_vec()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot::capture(&self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a mutating operation on an initialized registry.
    fn mutate<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut RegistryState, DateTime<Utc>) -> Result<T, RegistryError>,
    ) -> Result<T, RegistryError> {
        self.transact(op, |state, now| {
            state.directory.require_initialized()?;
            f(state, now)
        })
    }

    /// Run `f` under the registry lock with the current clock reading.
    fn transact<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut RegistryState, DateTime<Utc>) -> Result<T, RegistryError>,
    ) -> Result<T, RegistryError> {
        let mut state = self.lock();
        let now = self.clock.now();
        f(&mut state, now).map_err(|err| {
            tracing::debug!(op, error = %err, "registry call rejected");
            err
        })
    }
}

impl Default for RegistryService {
    fn default() -> Self {
        Self::with_system_clock()
    }
}
