//! Contract checks for the in-memory store fixture
//!
//! The fixture has to refuse the same things the hosted store refuses,
//! or tests built on it prove nothing. These pin the optimistic-write
//! and branch semantics.

use metasync_remote::{ContentHash, ReadOutcome, RemoteError, RemoteStore, RepoLocator};
use metasync_test_utils::InMemoryRemoteStore;

fn repo() -> RepoLocator {
    RepoLocator::new("acme", "site")
}

#[tokio::test]
async fn stale_write_is_rejected_and_content_unchanged() {
    let store = InMemoryRemoteStore::new("main").with_file("a.seo.json", "{}");

    let err = store
        .write_file(
            &repo(),
            "a.seo.json",
            "{\"x\":1}",
            "msg",
            "main",
            Some(ContentHash::new("some-other-hash")),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::Stale { .. }));
    assert_eq!(store.file_content("main", "a.seo.json").unwrap(), "{}");
}

#[tokio::test]
async fn write_with_observed_hash_succeeds() {
    let store = InMemoryRemoteStore::new("main").with_file("a.seo.json", "{}");

    let ReadOutcome::File(file) = store.read_file(&repo(), "a.seo.json", "main").await.unwrap()
    else {
        panic!("expected text file");
    };
    let new_hash = store
        .write_file(
            &repo(),
            "a.seo.json",
            "{\"x\":1}",
            "msg",
            "main",
            Some(file.content_hash.clone()),
        )
        .await
        .unwrap();

    assert_ne!(new_hash, file.content_hash);
    assert_eq!(
        store.file_content("main", "a.seo.json").unwrap(),
        "{\"x\":1}"
    );
}

#[tokio::test]
async fn update_without_hash_is_stale() {
    let store = InMemoryRemoteStore::new("main").with_file("a.seo.json", "{}");

    let err = store
        .write_file(&repo(), "a.seo.json", "{\"x\":1}", "msg", "main", None)
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::Stale { .. }));
}

#[tokio::test]
async fn duplicate_branch_name_conflicts() {
    let store = InMemoryRemoteStore::new("main");

    assert!(!store.branch_exists(&repo(), "feature").await.unwrap());
    store.create_branch(&repo(), "feature", "main").await.unwrap();
    assert!(store.branch_exists(&repo(), "feature").await.unwrap());

    let err = store
        .create_branch(&repo(), "feature", "main")
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::Conflict(_)));
}

#[tokio::test]
async fn branch_copies_see_source_files() {
    let store = InMemoryRemoteStore::new("main").with_file("a.seo.json", "{}");
    store.create_branch(&repo(), "work", "main").await.unwrap();

    let outcome = store.read_file(&repo(), "a.seo.json", "work").await.unwrap();
    assert!(matches!(outcome, ReadOutcome::File(_)));
}
