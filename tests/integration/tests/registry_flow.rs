//! Integration test: full document lifecycle across crates.
//!
//! Tests the owner → admin → student → verifier → grantee flow using
//! docreg-registry and docreg-core together.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use docreg_core::{
    Address, Branch, ManualClock, RegistryError, Role, StudentProfile, VerificationState, Year,
};
use docreg_registry::{DocumentSubmission, RegistryEvent, RegistryService};

fn addr(s: &str) -> Address {
    Address::new(s)
}

/// Helper: a registry with owner O, admin A, verifier V and student S.
fn create_registry() -> (RegistryService, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
    ));
    let registry = RegistryService::new(clock.clone());
    registry.initialize(addr("O")).unwrap();
    registry.add_admin(&addr("O"), &addr("A"), "Alice").unwrap();
    registry.add_verifier(&addr("O"), &addr("V")).unwrap();
    registry
        .register_student(
            &addr("A"),
            &addr("S"),
            StudentProfile::new("Bob", Year::SE, Branch::Civil, "B100"),
        )
        .unwrap();
    (registry, clock)
}

fn submission(hash: &str) -> DocumentSubmission {
    DocumentSubmission::new("marksheet", hash, "semester 3", "B100")
}

// =========================================================================
// End-to-end scenario
// =========================================================================

#[test]
fn test_full_scenario() {
    let registry = RegistryService::with_system_clock();
    registry.initialize(addr("O")).unwrap();

    registry.add_admin(&addr("O"), &addr("A"), "Alice").unwrap();
    assert!(registry.is_admin(&addr("A")));

    registry
        .register_student(
            &addr("A"),
            &addr("S"),
            StudentProfile::new(
                "Bob",
                Year::from_code(1).unwrap(),
                Branch::from_code(2).unwrap(),
                "B100",
            ),
        )
        .expect("admin registers student");

    let id = registry
        .submit_document(&addr("S"), submission("0xfeed"))
        .expect("student submits");
    assert_eq!(id, 1);

    let denied = registry.verify_document(&addr("V2"), 1);
    assert!(matches!(
        denied,
        Err(RegistryError::PermissionDenied {
            required: Role::Verifier,
            ..
        })
    ));

    registry.add_verifier(&addr("O"), &addr("V")).unwrap();
    registry.verify_document(&addr("V"), 1).expect("verifier verifies");
    assert_eq!(
        registry.get_document(1).unwrap().state(),
        VerificationState::Verified
    );

    assert_eq!(
        registry.verify_document(&addr("V"), 1),
        Err(RegistryError::AlreadyVerified(1))
    );

    registry.grant_access(&addr("S"), 1, &addr("X")).unwrap();
    assert!(registry.has_access(1, &addr("X")));
    assert!(!registry.has_access(1, &addr("Y")));
}

// =========================================================================
// Identifier assignment
// =========================================================================

#[test]
fn test_identifiers_strictly_increasing_without_gaps() {
    let (registry, _) = create_registry();
    registry
        .register_student(
            &addr("O"),
            &addr("S2"),
            StudentProfile::new("Eve", Year::FE, Branch::Mechanical, "E1"),
        )
        .unwrap();

    let mut ids = Vec::new();
    for i in 0..20 {
        let who = if i % 2 == 0 { "S" } else { "S2" };
        ids.push(registry.submit_document(&addr(who), submission("dup")).unwrap());
        // Rejected submissions must not consume identifiers.
        assert!(registry
            .submit_document(&addr("A"), submission("dup"))
            .is_err());
    }
    let expected: Vec<u64> = (1..=20).collect();
    assert_eq!(ids, expected);
    assert_eq!(registry.document_count(), 20);
}

// =========================================================================
// Verification
// =========================================================================

#[test]
fn test_verification_succeeds_at_most_once() {
    let (registry, clock) = create_registry();
    for v in ["V2", "V3"] {
        registry.add_verifier(&addr("O"), &addr(v)).unwrap();
    }
    let id = registry.submit_document(&addr("S"), submission("h")).unwrap();

    clock.advance(Duration::minutes(10));
    let results: Vec<_> = ["V", "V2", "V3", "V"]
        .iter()
        .map(|v| registry.verify_document(&addr(v), id))
        .collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results[1..]
        .iter()
        .all(|r| *r == Err(RegistryError::AlreadyVerified(id))));

    let doc = registry.get_document(id).unwrap();
    assert_eq!(doc.verified_by, vec![addr("V")]);
    assert_eq!(doc.verified_at, Some(doc.created_at + Duration::minutes(10)));
}

#[test]
fn test_owner_and_admin_cannot_verify_without_role() {
    let (registry, _) = create_registry();
    let id = registry.submit_document(&addr("S"), submission("h")).unwrap();
    for caller in ["O", "A", "S"] {
        assert!(matches!(
            registry.verify_document(&addr(caller), id),
            Err(RegistryError::PermissionDenied { .. })
        ));
    }
    assert!(!registry.get_document(id).unwrap().verified);
}

// =========================================================================
// Access grants
// =========================================================================

#[test]
fn test_only_submitter_can_grant() {
    let (registry, _) = create_registry();
    let id = registry.submit_document(&addr("S"), submission("h")).unwrap();
    for caller in ["O", "A", "V", "X"] {
        assert!(matches!(
            registry.grant_access(&addr(caller), id, &addr("X")),
            Err(RegistryError::NotDocumentOwner { .. })
        ));
    }
    assert!(registry.grantees(id).is_empty());
}

#[test]
fn test_has_access_lifecycle() {
    let (registry, _) = create_registry();
    let id = registry.submit_document(&addr("S"), submission("h")).unwrap();

    assert!(!registry.has_access(id, &addr("X")));
    registry.grant_access(&addr("S"), id, &addr("X")).unwrap();
    assert!(registry.has_access(id, &addr("X")));
    registry.grant_access(&addr("S"), id, &addr("X")).unwrap();
    assert!(registry.has_access(id, &addr("X")));
    assert_eq!(registry.grantees(id), vec![addr("X")]);

    // Unknown documents never fail, only report no access.
    assert!(!registry.has_access(404, &addr("X")));
}

#[test]
fn test_grants_survive_verification() {
    let (registry, _) = create_registry();
    let id = registry.submit_document(&addr("S"), submission("h")).unwrap();
    registry.grant_access(&addr("S"), id, &addr("X")).unwrap();
    registry.verify_document(&addr("V"), id).unwrap();
    assert!(registry.has_access(id, &addr("X")));
    registry.grant_access(&addr("S"), id, &addr("Y")).unwrap();
    assert!(registry.has_access(id, &addr("Y")));
}

// =========================================================================
// Principal directory
// =========================================================================

#[test]
fn test_add_admin_idempotent() {
    let (registry, _) = create_registry();
    registry.add_admin(&addr("O"), &addr("A"), "Alice").unwrap();
    registry.add_admin(&addr("O"), &addr("A"), "Alice").unwrap();
    let snapshot = registry.snapshot();
    let entries = snapshot
        .admins
        .iter()
        .filter(|a| a.address == addr("A"))
        .count();
    assert_eq!(entries, 1);
}

#[test]
fn test_admin_cannot_add_admin() {
    let (registry, _) = create_registry();
    assert!(matches!(
        registry.add_admin(&addr("A"), &addr("Z"), "Zed"),
        Err(RegistryError::PermissionDenied {
            required: Role::Owner,
            ..
        })
    ));
    assert!(!registry.is_admin(&addr("Z")));
}

#[test]
fn test_student_registration_rules() {
    let (registry, _) = create_registry();
    let profile = StudentProfile::new("Mallory", Year::BE, Branch::Mechatronics, "M1");

    assert!(matches!(
        registry.register_student(&addr("V"), &addr("M"), profile.clone()),
        Err(RegistryError::PermissionDenied { .. })
    ));
    assert_eq!(
        registry.register_student(&addr("A"), &addr("S"), profile),
        Err(RegistryError::AlreadyExists(addr("S")))
    );
    assert_eq!(registry.get_student(&addr("S")).unwrap().name, "Bob");
    assert!(matches!(
        registry.get_student(&addr("M")),
        Err(RegistryError::NotFound(_))
    ));
}

// =========================================================================
// Audit log and snapshots
// =========================================================================

#[test]
fn test_event_log_order() {
    let (registry, _) = create_registry();
    let id = registry.submit_document(&addr("S"), submission("h")).unwrap();
    registry.verify_document(&addr("V"), id).unwrap();
    registry.grant_access(&addr("S"), id, &addr("X")).unwrap();

    let kinds: Vec<_> = registry
        .events()
        .into_iter()
        .map(|e| match e.event {
            RegistryEvent::Initialized { .. } => "initialized",
            RegistryEvent::AdminAdded { .. } => "admin_added",
            RegistryEvent::VerifierAdded { .. } => "verifier_added",
            RegistryEvent::StudentRegistered { .. } => "student_registered",
            RegistryEvent::DocumentSubmitted { .. } => "document_submitted",
            RegistryEvent::DocumentVerified { .. } => "document_verified",
            RegistryEvent::AccessGranted { .. } => "access_granted",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "initialized",
            "admin_added",
            "verifier_added",
            "student_registered",
            "document_submitted",
            "document_verified",
            "access_granted",
        ]
    );
    let sequences: Vec<u64> = registry.events().iter().map(|e| e.sequence).collect();
    assert_eq!(sequences, (1..=7).collect::<Vec<_>>());
}

#[test]
fn test_snapshot_json() {
    let (registry, _) = create_registry();
    let id = registry.submit_document(&addr("S"), submission("h")).unwrap();
    registry.grant_access(&addr("S"), id, &addr("X")).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&registry.snapshot().to_json_pretty().unwrap()).unwrap();
    assert_eq!(json["owner"], "O");
    assert_eq!(json["document_count"], 1);
    assert_eq!(json["documents"][0]["content_hash"], "h");
    assert_eq!(json["documents"][0]["verified"], false);
    assert_eq!(json["grants"][0]["grantee"], "X");
    assert_eq!(json["students"][0]["profile"]["branch"], "Civil");
}
