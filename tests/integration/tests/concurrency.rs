//! Integration test: concurrent callers see a serialized registry.

use std::sync::Arc;
use std::thread;

use docreg_core::{Address, Branch, RegistryError, StudentProfile, Year};
use docreg_registry::{DocumentSubmission, RegistryService};

fn registry_with_students(students: usize, verifiers: usize) -> Arc<RegistryService> {
    let registry = Arc::new(RegistryService::with_system_clock());
    let owner = Address::new("owner");
    registry.initialize(owner.clone()).unwrap();
    for i in 0..students {
        registry
            .register_student(
                &owner,
                &Address::new(format!("student-{}", i)),
                StudentProfile::new(format!("S{}", i), Year::TE, Branch::Civil, format!("ID{}", i)),
            )
            .unwrap();
    }
    for i in 0..verifiers {
        registry
            .add_verifier(&owner, &Address::new(format!("verifier-{}", i)))
            .unwrap();
    }
    registry
}

#[test]
fn test_concurrent_submissions_never_collide() {
    let registry = registry_with_students(8, 0);
    let per_thread = 25;

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let student = Address::new(format!("student-{}", i));
                (0..per_thread)
                    .map(|_| {
                        registry
                            .submit_document(
                                &student,
                                DocumentSubmission::new("t", "h", "", format!("ID{}", i)),
                            )
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    ids.sort_unstable();
    let expected: Vec<u64> = (1..=(8 * per_thread) as u64).collect();
    assert_eq!(ids, expected);
    assert_eq!(registry.document_count(), 8 * per_thread as u64);
}

#[test]
fn test_concurrent_verifications_single_winner() {
    let registry = registry_with_students(1, 8);
    let id = registry
        .submit_document(
            &Address::new("student-0"),
            DocumentSubmission::new("t", "h", "", "ID0"),
        )
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                registry.verify_document(&Address::new(format!("verifier-{}", i)), id)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| **r == Err(RegistryError::AlreadyVerified(id)))
            .count(),
        7
    );

    let doc = registry.get_document(id).unwrap();
    assert!(doc.verified);
    assert!(doc.verified_at.is_some());
    assert_eq!(doc.verified_by.len(), 1);
}

#[test]
fn test_readers_never_see_partial_verification() {
    let registry = registry_with_students(1, 1);
    let ids: Vec<u64> = (0..50)
        .map(|_| {
            registry
                .submit_document(
                    &Address::new("student-0"),
                    DocumentSubmission::new("t", "h", "", "ID0"),
                )
                .unwrap()
        })
        .collect();

    let writer = {
        let registry = Arc::clone(&registry);
        let ids = ids.clone();
        thread::spawn(move || {
            for id in ids {
                registry
                    .verify_document(&Address::new("verifier-0"), id)
                    .unwrap();
            }
        })
    };

    for _ in 0..5 {
        for &id in &ids {
            let doc = registry.get_document(id).unwrap();
            assert_eq!(doc.verified, doc.verified_at.is_some());
            assert_eq!(doc.verified, doc.verified_by.len() == 1);
        }
    }
    writer.join().unwrap();
}
