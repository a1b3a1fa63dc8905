use std::collections::{BTreeMap, BTreeSet};

use docreg_core::{Address, RegistryError, Role, StudentProfile};

/// Name recorded for the owner's implicit admin entry.
const OWNER_ADMIN_NAME: &str = "owner";

/// Tracks role holders and registered students.
#[derive(Debug, Clone, Default)]
pub struct PrincipalDirectory {
    /// Installed once by `initialize`.
    owner: Option<Address>,
    /// Admin address → display name.
    admins: BTreeMap<Address, String>,
    verifiers: BTreeSet<Address>,
    students: BTreeMap<Address, StudentProfile>,
}

impl PrincipalDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the owner, who also becomes the first admin.
    pub fn initialize(&mut self, owner: Address) -> Result<(), RegistryError> {
        if self.owner.is_some() {
            return Err(RegistryError::AlreadyInitialized);
        }
        self.admins.insert(owner.clone(), OWNER_ADMIN_NAME.to_string());
        self.owner = Some(owner);
        Ok(())
    }

    pub fn owner(&self) -> Option<&Address> {
        self.owner.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.owner.is_some()
    }

    /// Fails with `NotInitialized` before `initialize` has run.
    pub fn require_initialized(&self) -> Result<&Address, RegistryError> {
        self.owner.as_ref().ok_or(RegistryError::NotInitialized)
    }

    /// Grant the admin role. Owner only. Returns `false` if `target` was
    /// already an admin, in which case nothing changes.
    pub fn add_admin(
        &mut self,
        caller: &Address,
        target: &Address,
        name: &str,
    ) -> Result<bool, RegistryError> {
        self.require_owner(caller)?;
        if self.admins.contains_key(target) {
            return Ok(false);
        }
        self.admins.insert(target.clone(), name.to_string());
        Ok(true)
    }

    /// Grant the verifier role. Owner only, idempotent like `add_admin`.
    pub fn add_verifier(
        &mut self,
        caller: &Address,
        target: &Address,
    ) -> Result<bool, RegistryError> {
        self.require_owner(caller)?;
        Ok(self.verifiers.insert(target.clone()))
    }

    /// Register a student profile. Admin only; an address registers once.
    pub fn register_student(
        &mut self,
        caller: &Address,
        addr: &Address,
        profile: StudentProfile,
    ) -> Result<(), RegistryError> {
        if !self.is_admin(caller) {
            return Err(RegistryError::permission_denied(caller, Role::Admin));
        }
        if self.students.contains_key(addr) {
            return Err(RegistryError::AlreadyExists(addr.clone()));
        }
        self.students.insert(addr.clone(), profile);
        Ok(())
    }

    pub fn is_owner(&self, addr: &Address) -> bool {
        self.owner.as_ref() == Some(addr)
    }

    pub fn is_admin(&self, addr: &Address) -> bool {
        self.admins.contains_key(addr)
    }

    pub fn is_verifier(&self, addr: &Address) -> bool {
        self.verifiers.contains(addr)
    }

    pub fn is_student(&self, addr: &Address) -> bool {
        self.students.contains_key(addr)
    }

    pub fn admin_name(&self, addr: &Address) -> Option<&str> {
        self.admins.get(addr).map(String::as_str)
    }

    pub fn student(&self, addr: &Address) -> Result<&StudentProfile, RegistryError> {
        self.students
            .get(addr)
            .ok_or_else(|| RegistryError::student_not_found(addr))
    }

    /// Every role `addr` holds, in declaration order.
    pub fn roles_of(&self, addr: &Address) -> Vec<Role> {
        let mut roles = Vec::new();
        if self.is_owner(addr) {
            roles.push(Role::Owner);
        }
        if self.is_admin(addr) {
            roles.push(Role::Admin);
        }
        if self.is_verifier(addr) {
            roles.push(Role::Verifier);
        }
        if self.is_student(addr) {
            roles.push(Role::Student);
        }
        roles
    }

    pub fn admins(&self) -> impl Iterator<Item = (&Address, &str)> {
        self.admins.iter().map(|(addr, name)| (addr, name.as_str()))
    }

    pub fn verifiers(&self) -> impl Iterator<Item = &Address> {
        self.verifiers.iter()
    }

    pub fn students(&self) -> impl Iterator<Item = (&Address, &StudentProfile)> {
        self.students.iter()
    }

    fn require_owner(&self, caller: &Address) -> Result<(), RegistryError> {
        let owner = self.require_initialized()?;
        if owner != caller {
            return Err(RegistryError::permission_denied(caller, Role::Owner));
        }
        Ok(())
    }
}
