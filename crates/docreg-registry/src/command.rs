//! Serializable registry operations and their outcomes, for hosts that
//! drive the registry from scripts or message queues.

use serde::{Deserialize, Serialize};

use docreg_core::{Address, Document, DocumentId, RegistryError, Role, StudentProfile};

use crate::service::RegistryService;
use crate::store::DocumentSubmission;

/// One call against the registry, tagged by `op`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RegistryCommand {
    Initialize {
        owner: Address,
    },
    AddAdmin {
        caller: Address,
        target: Address,
        name: String,
    },
    AddVerifier {
        caller: Address,
        target: Address,
    },
    RegisterStudent {
        caller: Address,
        address: Address,
        name: String,
        /// 0..=3, FE through BE.
        year: u8,
        /// 0..=3: Mechanical, Civil, CS, Mechatronics.
        branch: u8,
        id_number: String,
    },
    SubmitDocument {
        caller: Address,
        #[serde(flatten)]
        submission: DocumentSubmission,
    },
    VerifyDocument {
        caller: Address,
        document_id: DocumentId,
    },
    GrantAccess {
        caller: Address,
        document_id: DocumentId,
        grantee: Address,
    },
    GetDocument {
        document_id: DocumentId,
    },
    GetStudent {
        address: Address,
    },
    HasAccess {
        document_id: DocumentId,
        user: Address,
    },
    RolesOf {
        address: Address,
    },
    DocumentsBySubmitter {
        submitter: Address,
    },
}

impl RegistryCommand {
    /// The `op` tag of this command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialize { .. } => "initialize",
            Self::AddAdmin { .. } => "add_admin",
            Self::AddVerifier { .. } => "add_verifier",
            Self::RegisterStudent { .. } => "register_student",
            Self::SubmitDocument { .. } => "submit_document",
            Self::VerifyDocument { .. } => "verify_document",
            Self::GrantAccess { .. } => "grant_access",
            Self::GetDocument { .. } => "get_document",
            Self::GetStudent { .. } => "get_student",
            Self::HasAccess { .. } => "has_access",
            Self::RolesOf { .. } => "roles_of",
            Self::DocumentsBySubmitter { .. } => "documents_by_submitter",
        }
    }
}

/// Successful result of a `RegistryCommand`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommandOutcome {
    Done,
    Submitted { document_id: DocumentId },
    Document { document: Document },
    Student { profile: StudentProfile },
    Access { granted: bool },
    Roles { roles: Vec<Role> },
    Documents { documents: Vec<Document> },
}

impl RegistryService {
    /// Dispatch a command to the matching registry operation.
    pub fn execute(&self, command: RegistryCommand) -> Result<CommandOutcome, RegistryError> {
        tracing::debug!(op = command.name(), "executing registry command");
        match command {
            RegistryCommand::Initialize { owner } => {
                self.initialize(owner)?;
                Ok(CommandOutcome::Done)
            }
            RegistryCommand::AddAdmin {
                caller,
                target,
                name,
            } => {
                self.add_admin(&caller, &target, &name)?;
                Ok(CommandOutcome::Done)
            }
            RegistryCommand::AddVerifier { caller, target } => {
                self.add_verifier(&caller, &target)?;
                Ok(CommandOutcome::Done)
            }
            RegistryCommand::RegisterStudent {
                caller,
                address,
                name,
                year,
                branch,
                id_number,
            } => {
                self.register_student_codes(&caller, &address, name, year, branch, id_number)?;
                Ok(CommandOutcome::Done)
            }
            RegistryCommand::SubmitDocument { caller, submission } => {
                let document_id = self.submit_document(&caller, submission)?;
                Ok(CommandOutcome::Submitted { document_id })
            }
            RegistryCommand::VerifyDocument {
                caller,
                document_id,
            } => {
                self.verify_document(&caller, document_id)?;
                Ok(CommandOutcome::Done)
            }
            RegistryCommand::GrantAccess {
                caller,
                document_id,
                grantee,
            } => {
                self.grant_access(&caller, document_id, &grantee)?;
                Ok(CommandOutcome::Done)
            }
            RegistryCommand::GetDocument { document_id } => Ok(CommandOutcome::Document {
                document: self.get_document(document_id)?,
            }),
            RegistryCommand::GetStudent { address } => Ok(CommandOutcome::Student {
                profile: self.get_student(&address)?,
            }),
            RegistryCommand::HasAccess { document_id, user } => Ok(CommandOutcome::Access {
                granted: self.has_access(document_id, &user),
            }),
            RegistryCommand::RolesOf { address } => Ok(CommandOutcome::Roles {
                roles: self.roles_of(&address),
            }),
            RegistryCommand::DocumentsBySubmitter { submitter } => {
                Ok(CommandOutcome::Documents {
                    documents: self.documents_by_submitter(&submitter),
                })
            }
        }
    }
}
