//! Integration tests for warbler-core services
//!
//! These tests verify data integrity scenarios using real DuckDB.
//!
//! Run with: cargo test --test directory_integration_tests -- --nocapture

use std::sync::Arc;
use tempfile::TempDir;

use warbler_core::adapters::duckdb::DuckDbRepository;
use warbler_core::config::{Config, DatabaseLocation};
use warbler_core::ports::DirectoryStore;
use warbler_core::services::{MessageService, StatusService, UserDirectory};
use warbler_core::{Error, NewUser, User, WarblerContext};

// ============================================================================
// Test Helpers
// ============================================================================

/// Create a test repository with schema initialized
fn create_test_repo(temp_dir: &TempDir) -> Arc<DuckDbRepository> {
    let db_path = temp_dir.path().join("test.duckdb");
    let repo = DuckDbRepository::new(&db_path).expect("Failed to create repository");
    repo.ensure_schema().expect("Failed to initialize schema");
    Arc::new(repo)
}

fn services(repo: &Arc<DuckDbRepository>) -> (UserDirectory, MessageService, StatusService) {
    let store: Arc<dyn DirectoryStore> = repo.clone();
    (
        UserDirectory::new(Arc::clone(&store)),
        MessageService::new(Arc::clone(&store)),
        StatusService::new(store),
    )
}

fn create_user(directory: &UserDirectory, name: &str) -> User {
    directory
        .create(NewUser::new(
            format!("{}@test.com", name),
            name,
            "HASHED_PASSWORD",
        ))
        .unwrap()
}

// ============================================================================
// Uniqueness
// ============================================================================

#[test]
fn test_duplicate_email_is_constraint_violation() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, _, _) = services(&repo);

    directory
        .create(NewUser::new("same@test.com", "first", "HASHED_PASSWORD"))
        .unwrap();
    let err = directory
        .create(NewUser::new("same@test.com", "second", "HASHED_PASSWORD"))
        .unwrap_err();

    assert!(
        matches!(err, Error::ConstraintViolation(_)),
        "expected constraint violation, got {:?}",
        err
    );
    assert_eq!(directory.list().unwrap().len(), 1);
}

#[test]
fn test_duplicate_username_is_constraint_violation() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, _, _) = services(&repo);

    create_user(&directory, "alice");
    let err = directory
        .create(NewUser::new("other@test.com", "alice", "HASHED_PASSWORD"))
        .unwrap_err();

    assert!(err.is_constraint_violation());
}

// ============================================================================
// Users
// ============================================================================

#[test]
fn test_profile_defaults_and_lookup_by_username() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, _, _) = services(&repo);

    let created = directory
        .create(
            NewUser::new("loc@test.com", "located", "HASHED_PASSWORD")
                .with_bio("hello")
                .with_location("Lisbon"),
        )
        .unwrap();

    let fetched = directory.get_by_username("located").unwrap().unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.image_url, "/static/images/default-pic.png");
    assert_eq!(fetched.header_image_url, "/static/images/warbler-hero.jpg");
    assert_eq!(fetched.bio.as_deref(), Some("hello"));
    assert_eq!(fetched.location.as_deref(), Some("Lisbon"));
    assert_eq!(fetched.password, "HASHED_PASSWORD");

    assert!(directory.get_by_username("nobody").unwrap().is_none());
}

#[test]
fn test_list_is_ordered_by_id() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, _, _) = services(&repo);

    let a = create_user(&directory, "a");
    let b = create_user(&directory, "b");
    let c = create_user(&directory, "c");

    let ids: Vec<i64> = directory.list().unwrap().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![a.id, b.id, c.id]);
}

/// Deleting a user removes their edges in both directions and their messages
#[test]
fn test_delete_user_removes_related_data() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, messages, status) = services(&repo);

    let alice = create_user(&directory, "alice");
    let bob = create_user(&directory, "bob");
    let carol = create_user(&directory, "carol");

    directory.follow(&alice, &bob).unwrap();
    directory.follow(&bob, &alice).unwrap();
    directory.follow(&carol, &bob).unwrap();
    messages.post(alice.id, "first warble").unwrap();
    messages.post(bob.id, "bob here").unwrap();

    assert!(directory.delete(alice.id).unwrap());

    assert!(directory.get(alice.id).unwrap().is_none());
    assert_eq!(directory.followers(&bob).unwrap(), vec![carol.clone()]);
    assert!(directory.following(&bob).unwrap().is_empty());
    assert_eq!(messages.message_count(alice.id).unwrap(), 0);

    let summary = status.get_status().unwrap();
    assert_eq!(summary.total_users, 2);
    assert_eq!(summary.total_follows, 1);
    assert_eq!(summary.total_messages, 1);

    // Deleting again is not an error
    assert!(!directory.delete(alice.id).unwrap());
}

// ============================================================================
// Follows
// ============================================================================

#[test]
fn test_followers_and_following_views() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, _, _) = services(&repo);

    let alice = create_user(&directory, "alice");
    let bob = create_user(&directory, "bob");
    let carol = create_user(&directory, "carol");

    directory.follow(&alice, &carol).unwrap();
    directory.follow(&bob, &carol).unwrap();
    directory.follow(&carol, &alice).unwrap();

    assert_eq!(directory.followers(&carol).unwrap(), vec![alice.clone(), bob.clone()]);
    assert_eq!(directory.following(&carol).unwrap(), vec![alice.clone()]);
    assert_eq!(directory.follower_count(&carol).unwrap(), 2);
    assert_eq!(directory.following_count(&carol).unwrap(), 1);
    assert_eq!(directory.following_count(&bob).unwrap(), 1);
    assert_eq!(directory.follower_count(&bob).unwrap(), 0);
}

#[test]
fn test_follow_unknown_user_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, _, _) = services(&repo);

    let alice = create_user(&directory, "alice");
    let err = directory.follow_ids(alice.id, alice.id + 1000).unwrap_err();

    assert!(err.is_not_found());
}

// ============================================================================
// Messages
// ============================================================================

#[test]
fn test_messages_newest_first() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, messages, _) = services(&repo);

    let alice = create_user(&directory, "alice");
    let first = messages.post(alice.id, "first").unwrap();
    let second = messages.post(alice.id, "second").unwrap();

    let listed = messages.messages_for(alice.id).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
    assert_eq!(listed[1], first);
    assert_eq!(messages.message_count(alice.id).unwrap(), 2);

    assert!(messages.delete(first.id).unwrap());
    assert_eq!(messages.message_count(alice.id).unwrap(), 1);
}

#[test]
fn test_message_validation() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, messages, _) = services(&repo);

    let alice = create_user(&directory, "alice");

    assert!(matches!(
        messages.post(alice.id, "   ").unwrap_err(),
        Error::Validation(_)
    ));
    assert!(matches!(
        messages.post(alice.id, &"x".repeat(141)).unwrap_err(),
        Error::Validation(_)
    ));
    assert!(messages.post(alice.id + 1000, "ghost").unwrap_err().is_not_found());
    assert_eq!(messages.message_count(alice.id).unwrap(), 0);
}

// ============================================================================
// Reset and persistence
// ============================================================================

#[test]
fn test_reset_clears_everything() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, messages, status) = services(&repo);

    let alice = create_user(&directory, "alice");
    let bob = create_user(&directory, "bob");
    directory.follow(&alice, &bob).unwrap();
    messages.post(bob.id, "hi").unwrap();

    directory.reset().unwrap();

    let summary = status.get_status().unwrap();
    assert_eq!(summary.total_users, 0);
    assert_eq!(summary.total_messages, 0);
    assert_eq!(summary.total_follows, 0);

    // Same unique values can be used again after a reset
    create_user(&directory, "alice");
}

#[test]
fn test_data_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.duckdb");

    let (alice_id, bob_id) = {
        let repo = create_test_repo(&temp_dir);
        let (directory, _, _) = services(&repo);
        let alice = create_user(&directory, "alice");
        let bob = create_user(&directory, "bob");
        directory.follow(&alice, &bob).unwrap();
        (alice.id, bob.id)
    };

    let repo = Arc::new(DuckDbRepository::new(&db_path).unwrap());
    repo.ensure_schema().unwrap();
    let (directory, _, _) = services(&repo);

    let alice = directory.get_or_error(alice_id).unwrap();
    let bob = directory.get_or_error(bob_id).unwrap();
    assert!(directory.is_following(&alice, &bob).unwrap());

    // The sequence continues after reopening
    let carol = create_user(&directory, "carol");
    assert!(carol.id > bob_id);
}

/// Testing mode starts from an empty schema; normal mode keeps the data
#[test]
fn test_testing_mode_recreates_schema_on_open() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.duckdb");
    let config = Config::for_database(DatabaseLocation::File(db_path));

    {
        let ctx = WarblerContext::from_config(config.clone()).unwrap();
        create_user(&ctx.directory, "alice");
    }
    {
        let ctx = WarblerContext::from_config(config.clone()).unwrap();
        assert_eq!(ctx.directory.list().unwrap().len(), 1);
    }

    let mut testing = config;
    testing.testing = true;
    let ctx = WarblerContext::from_config(testing).unwrap();
    assert!(ctx.directory.list().unwrap().is_empty());

    // Sequences restart with the schema
    assert_eq!(create_user(&ctx.directory, "bob").id, 1);
}
