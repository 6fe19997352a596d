//! PostgreSQL integration tests for infra_db
//!
//! These start a container through testcontainers and are ignored by
//! default. Run them with `cargo test -p infra_db -- --ignored`.

use std::sync::Arc;

use chrono::Utc;

use core_kernel::{BeneficiaryId, DocumentTypeId, PortError};
use domain_beneficiary::{
    BeneficiaryError, BeneficiaryStore, DocumentRuleRegistry, Sex, ValidatedBeneficiary,
};
use infra_db::{PostgresBeneficiaryStore, PostgresDocumentRuleRegistry};

use test_utils::{
    assert_duplicate_document, assert_not_found, assert_view_matches_draft,
    create_isolated_test_database, get_shared_test_database, BeneficiaryDraftBuilder,
    BeneficiaryFixtures, DocumentTypeFixtures,
};

fn record(document_type_id: DocumentTypeId, number: &str) -> ValidatedBeneficiary {
    ValidatedBeneficiary {
        first_names: "Julio César".to_string(),
        last_names: "Mamani Condori".to_string(),
        document_type_id,
        document_number: number.to_string(),
        birth_date: BeneficiaryFixtures::birth_date(),
        sex: Sex::Male,
        recorded_at: Utc::now(),
    }
}

// ============================================================================
// Document Type Tests
// ============================================================================

mod document_type_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_seeded_active_types_ordered_by_country_then_name() {
        let db = get_shared_test_database().await;
        let registry = PostgresDocumentRuleRegistry::new(db.pool().clone());

        let types = registry.list_active().await.unwrap();

        let abbreviations: Vec<&str> = types.iter().map(|t| t.abbreviation.as_str()).collect();
        assert_eq!(abbreviations, vec!["CI", "CC", "CE", "DNI", "PAS", "RUC"]);
        assert!(types.iter().all(|t| t.active));
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_get_inactive_type_matches_fixture() {
        let db = get_shared_test_database().await;
        let registry = PostgresDocumentRuleRegistry::new(db.pool().clone());
        let expected = DocumentTypeFixtures::libreta_electoral();

        let stored = registry.get_by_id(expected.id).await.unwrap();

        assert_eq!(stored.abbreviation, expected.abbreviation);
        assert_eq!(stored.expected_length, expected.expected_length);
        assert_eq!(stored.numeric_only, expected.numeric_only);
        assert!(!stored.active);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_unknown_type_is_not_found() {
        let db = get_shared_test_database().await;
        let registry = PostgresDocumentRuleRegistry::new(db.pool().clone());

        let err = registry.get_by_id(DocumentTypeFixtures::unknown_id()).await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_health_check_reports_operational() {
        let db = get_shared_test_database().await;
        let registry = PostgresDocumentRuleRegistry::new(db.pool().clone());

        let result = core_kernel::HealthCheckable::health_check(&registry).await;

        assert!(result.is_operational());
    }
}

// ============================================================================
// Beneficiary Workflow Tests
// ============================================================================

mod beneficiary_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_create_then_get_returns_joined_row() {
        let db = create_isolated_test_database().await.unwrap();
        let repo = db.repository();
        let draft = BeneficiaryDraftBuilder::new().build();

        let created = repo.create(draft.clone()).await.unwrap();
        let fetched = repo.get_by_id(created.id()).await.unwrap();

        assert_view_matches_draft(&fetched, &draft);
        assert_eq!(fetched.document_abbreviation, "DNI");
        assert_eq!(fetched.beneficiary.created_at, created.beneficiary.created_at);
        assert_eq!(fetched.beneficiary.created_at, fetched.beneficiary.modified_at);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_duplicate_document_rejected() {
        let db = create_isolated_test_database().await.unwrap();
        let repo = db.repository();
        repo.create(BeneficiaryDraftBuilder::new().build()).await.unwrap();

        let result = repo
            .create(BeneficiaryDraftBuilder::random().with_document_number(BeneficiaryFixtures::dni_number()).build())
            .await;

        assert_duplicate_document(&result);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_same_number_allowed_under_other_type() {
        let db = create_isolated_test_database().await.unwrap();
        let repo = db.repository();
        repo.create(BeneficiaryDraftBuilder::new().build()).await.unwrap();

        let other = BeneficiaryDraftBuilder::new()
            .with_document(DocumentTypeFixtures::libreta_electoral().id, BeneficiaryFixtures::dni_number())
            .build();

        let view = repo.create(other).await.unwrap();
        assert_eq!(view.document_abbreviation, "LE");
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_list_newest_first() {
        let db = create_isolated_test_database().await.unwrap();
        let repo = db.repository();
        let first = repo.create(BeneficiaryDraftBuilder::random().build()).await.unwrap();
        let second = repo
            .create(
                BeneficiaryDraftBuilder::new()
                    .with_document(DocumentTypeFixtures::passport().id, BeneficiaryFixtures::passport_number())
                    .build(),
            )
            .await
            .unwrap();

        let ids: Vec<BeneficiaryId> = repo.list().await.unwrap().iter().map(|v| v.id()).collect();

        assert_eq!(ids, vec![second.id(), first.id()]);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_update_keeps_created_at() {
        let db = create_isolated_test_database().await.unwrap();
        let repo = db.repository();
        let created = repo.create(BeneficiaryDraftBuilder::new().build()).await.unwrap();

        let replacement = BeneficiaryDraftBuilder::new()
            .with_first_names("María Isabel")
            .with_sex("F")
            .build();
        repo.update(created.id(), replacement).await.unwrap();

        let stored = repo.get_by_id(created.id()).await.unwrap();
        assert_eq!(stored.beneficiary.first_names, "María Isabel");
        assert_eq!(stored.beneficiary.created_at, created.beneficiary.created_at);
        assert!(stored.beneficiary.modified_at >= created.beneficiary.modified_at);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_update_missing_is_not_found() {
        let db = create_isolated_test_database().await.unwrap();
        let repo = db.repository();

        let result = repo.update(BeneficiaryId::new(404), BeneficiaryDraftBuilder::new().build()).await;

        assert_not_found(&result);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_delete_removes_row() {
        let db = create_isolated_test_database().await.unwrap();
        let repo = db.repository();
        let created = repo.create(BeneficiaryDraftBuilder::new().build()).await.unwrap();

        repo.delete(created.id()).await.unwrap();

        assert_not_found(&repo.get_by_id(created.id()).await);
        assert_not_found(&repo.delete(created.id()).await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore = "requires Docker"]
    async fn test_concurrent_creates_lose_as_duplicates() {
        let db = create_isolated_test_database().await.unwrap();
        let repo = db.repository();

        for round in 0..5 {
            let number = format!("5555555{round}");
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let repo = repo.clone();
                    let draft = BeneficiaryDraftBuilder::random().with_document_number(number.clone()).build();
                    tokio::spawn(async move { repo.create(draft).await })
                })
                .collect();

            let mut created = 0;
            for handle in handles {
                match handle.await.unwrap() {
                    Ok(_) => created += 1,
                    Err(BeneficiaryError::DuplicateDocument { .. }) => {}
                    Err(other) => panic!("round {round}: expected duplicate, got {:?}", other),
                }
            }
            assert_eq!(created, 1, "round {round}");
        }

        assert_eq!(repo.list().await.unwrap().len(), 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore = "requires Docker"]
    async fn test_concurrent_updates_to_same_document_keep_one_holder() {
        let db = create_isolated_test_database().await.unwrap();
        let repo = db.repository();

        let mut ids = Vec::new();
        for n in 0..4 {
            let draft = BeneficiaryDraftBuilder::random().with_document_number(format!("6000000{n}")).build();
            ids.push(repo.create(draft).await.unwrap().id());
        }

        let handles: Vec<_> = ids
            .iter()
            .map(|&id| {
                let repo = repo.clone();
                let draft = BeneficiaryDraftBuilder::random().with_document_number("77777777").build();
                tokio::spawn(async move { repo.update(id, draft).await })
            })
            .collect();

        let mut updated = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => updated += 1,
                Err(BeneficiaryError::DuplicateDocument { .. }) => {}
                Err(other) => panic!("expected duplicate, got {:?}", other),
            }
        }

        assert_eq!(updated, 1);
        let holders = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .filter(|v| v.beneficiary.document_number == "77777777")
            .count();
        assert_eq!(holders, 1);
    }
}

// ============================================================================
// Store Adapter Tests
// ============================================================================

mod store_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_unique_violation_maps_to_conflict() {
        let db = create_isolated_test_database().await.unwrap();
        let store = Arc::new(PostgresBeneficiaryStore::new(db.pool().clone()));
        let dni = DocumentTypeFixtures::dni().id;

        let mut uow = store.begin().await.unwrap();
        uow.insert(record(dni, "87654321")).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        let err = uow.insert(record(dni, "87654321")).await.unwrap_err();

        assert!(err.is_conflict());
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_unknown_type_maps_to_missing_reference() {
        let db = create_isolated_test_database().await.unwrap();
        let store = PostgresBeneficiaryStore::new(db.pool().clone());

        let mut uow = store.begin().await.unwrap();
        let err = uow
            .insert(record(DocumentTypeFixtures::unknown_id(), "87654321"))
            .await
            .unwrap_err();

        assert!(matches!(err, PortError::MissingReference { .. }));
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_uncommitted_work_is_discarded() {
        let db = create_isolated_test_database().await.unwrap();
        let store = PostgresBeneficiaryStore::new(db.pool().clone());

        {
            let mut uow = store.begin().await.unwrap();
            uow.insert(record(DocumentTypeFixtures::dni().id, "11223344")).await.unwrap();
        }

        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_document_in_use_excludes_self() {
        let db = create_isolated_test_database().await.unwrap();
        let store = PostgresBeneficiaryStore::new(db.pool().clone());
        let dni = DocumentTypeFixtures::dni().id;

        let mut uow = store.begin().await.unwrap();
        let stored = uow.insert(record(dni, "11223344")).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        assert!(uow.document_in_use(dni, "11223344", None).await.unwrap());
        assert!(!uow.document_in_use(dni, "11223344", Some(stored.id)).await.unwrap());
        assert!(uow.exists(stored.id).await.unwrap());
    }
}
