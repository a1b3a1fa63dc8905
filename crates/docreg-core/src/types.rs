use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::document_state::VerificationState;
use crate::error::RegistryError;

/// Registry-wide document identifier. The first document is `1`.
pub type DocumentId = u64;

/// An authenticated principal. The registry never validates the format;
/// identity binding happens before a call reaches it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Permission classes a principal can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Singular, fixed at initialization.
    Owner,
    Admin,
    Verifier,
    /// Registered student with a profile.
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => write!(f, "Owner"),
            Self::Admin => write!(f, "Admin"),
            Self::Verifier => write!(f, "Verifier"),
            Self::Student => write!(f, "Student"),
        }
    }
}

/// Academic year: first through final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Year {
    FE,
    SE,
    TE,
    BE,
}

impl Year {
    /// Decode from the numeric code 0..=3.
    pub fn from_code(code: u8) -> Result<Self, RegistryError> {
        match code {
            0 => Ok(Self::FE),
            1 => Ok(Self::SE),
            2 => Ok(Self::TE),
            3 => Ok(Self::BE),
            _ => Err(RegistryError::InvalidArgument(format!(
                "invalid year code: {}",
                code
            ))),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::FE => 0,
            Self::SE => 1,
            Self::TE => 2,
            Self::BE => 3,
        }
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FE => write!(f, "FE"),
            Self::SE => write!(f, "SE"),
            Self::TE => write!(f, "TE"),
            Self::BE => write!(f, "BE"),
        }
    }
}

/// Engineering branch a student is enrolled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    Mechanical,
    Civil,
    #[serde(rename = "CS")]
    ComputerScience,
    Mechatronics,
}

impl Branch {
    /// Decode from the numeric code 0..=3.
    pub fn from_code(code: u8) -> Result<Self, RegistryError> {
        match code {
            0 => Ok(Self::Mechanical),
            1 => Ok(Self::Civil),
            2 => Ok(Self::ComputerScience),
            3 => Ok(Self::Mechatronics),
            _ => Err(RegistryError::InvalidArgument(format!(
                "invalid branch code: {}",
                code
            ))),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Mechanical => 0,
            Self::Civil => 1,
            Self::ComputerScience => 2,
            Self::Mechatronics => 3,
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mechanical => write!(f, "Mechanical"),
            Self::Civil => write!(f, "Civil"),
            Self::ComputerScience => write!(f, "CS"),
            Self::Mechatronics => write!(f, "Mechatronics"),
        }
    }
}

/// Profile data for a registered student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub name: String,
    pub year: Year,
    pub branch: Branch,
    /// Institution-issued id. Not checked for uniqueness.
    pub id_number: String,
}

impl StudentProfile {
    pub fn new(
        name: impl Into<String>,
        year: Year,
        branch: Branch,
        id_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            year,
            branch,
            id_number: id_number.into(),
        }
    }
}

/// A submitted document. Content fields never change after submission;
/// only the verification fields do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub document_type: String,
    /// Opaque content digest supplied by the submitter.
    pub content_hash: String,
    pub metadata: String,
    pub created_at: DateTime<Utc>,
    pub submitter: Address,
    pub verified: bool,
    /// Append-only; holds at most one entry.
    pub verified_by: Vec<Address>,
    pub verified_at: Option<DateTime<Utc>>,
    /// Free text, not cross-checked against the submitter's profile.
    pub student_id_number: String,
}

impl Document {
    /// Current position in the verification lifecycle.
    pub fn state(&self) -> VerificationState {
        if self.verified {
            VerificationState::Verified
        } else {
            VerificationState::Unverified
        }
    }
}
