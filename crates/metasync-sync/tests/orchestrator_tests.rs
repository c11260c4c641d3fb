//! Orchestrator protocol tests against a mocked remote store
//!
//! Each test scripts one step's outcome and asserts the terminal state
//! the pipeline reports, including the partial-success path where the
//! merge is blocked but the proposal stays open.

use async_trait::async_trait;
use metasync_remote::{
    BinaryContent, ContentHash, MergeStrategy, ProposalId, ReadOutcome, RemoteError, RemoteFile,
    RemoteStore, RepoLocator,
};
use metasync_sync::{SafeUpdateOrchestrator, SyncError, SyncOutcome, SyncRequest, SyncState};
use mockall::mock;
use std::sync::Arc;

mock! {
    Store {}

    #[async_trait]
    impl RemoteStore for Store {
        async fn read_file(
            &self,
            repo: &RepoLocator,
            path: &str,
            reference: &str,
        ) -> Result<ReadOutcome, RemoteError>;

        async fn create_branch(
            &self,
            repo: &RepoLocator,
            new_branch: &str,
            from_ref: &str,
        ) -> Result<(), RemoteError>;

        async fn branch_exists(&self, repo: &RepoLocator, branch: &str) -> Result<bool, RemoteError>;

        async fn write_file(
            &self,
            repo: &RepoLocator,
            path: &str,
            content: &str,
            message: &str,
            branch: &str,
            expected_hash: Option<ContentHash>,
        ) -> Result<ContentHash, RemoteError>;

        #[mockall::concretize]
        async fn propose_merge(
            &self,
            repo: &RepoLocator,
            title: &str,
            source_branch: &str,
            target_branch: &str,
            body: Option<&str>,
        ) -> Result<ProposalId, RemoteError>;

        async fn complete_merge(
            &self,
            repo: &RepoLocator,
            proposal: ProposalId,
            strategy: MergeStrategy,
        ) -> Result<(), RemoteError>;

        async fn last_commit_date(
            &self,
            repo: &RepoLocator,
            path: &str,
        ) -> Result<Option<String>, RemoteError>;
    }
}

fn request() -> SyncRequest {
    SyncRequest::new(
        RepoLocator::new("acme", "site"),
        "pages/about.seo.json",
        "{\n  \"title\": \"About\"\n}",
    )
}

fn remote_file(hash: &str) -> RemoteFile {
    RemoteFile {
        name: "about.seo.json".to_string(),
        path: "pages/about.seo.json".to_string(),
        content: "{}".to_string(),
        content_hash: ContentHash::new(hash),
        size: 2,
        download_url: None,
        file_type: "json".to_string(),
    }
}

fn transient() -> RemoteError {
    RemoteError::Transient {
        status: Some(503),
        message: "service unavailable".to_string(),
    }
}

#[tokio::test]
async fn happy_path_completes_with_merge() {
    let mut store = MockStore::new();
    let mut seq = mockall::Sequence::new();

    store
        .expect_create_branch()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));
    store
        .expect_read_file()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|_, _, reference| reference == "main")
        .returning(|_, _, _| Ok(ReadOutcome::File(remote_file("h1"))));
    store
        .expect_write_file()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|_, _, _, _, _, expected| {
            expected.as_ref().map(ContentHash::as_str) == Some("h1")
        })
        .returning(|_, _, _, _, _, _| Ok(ContentHash::new("h2")));
    store
        .expect_propose_merge()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _, _, _| Ok(ProposalId(12)));
    store
        .expect_complete_merge()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|_, proposal, strategy| {
            *proposal == ProposalId(12) && *strategy == MergeStrategy::Squash
        })
        .returning(|_, _, _| Ok(()));

    let orchestrator = SafeUpdateOrchestrator::new(Arc::new(store));
    let outcome = orchestrator.execute(request()).await.unwrap();

    match outcome {
        SyncOutcome::Completed {
            proposal, new_hash, ..
        } => {
            assert_eq!(proposal, ProposalId(12));
            assert_eq!(new_hash.as_str(), "h2");
        }
        other => panic!("expected Completed, got {other:?}"),
    }
}

#[tokio::test]
async fn blocked_merge_reports_pending_review() {
    let mut store = MockStore::new();
    store.expect_create_branch().returning(|_, _, _| Ok(()));
    store
        .expect_read_file()
        .returning(|_, _, _| Ok(ReadOutcome::File(remote_file("h1"))));
    store
        .expect_write_file()
        .returning(|_, _, _, _, _, _| Ok(ContentHash::new("h2")));
    store
        .expect_propose_merge()
        .returning(|_, _, _, _, _| Ok(ProposalId(7)));
    store
        .expect_complete_merge()
        .returning(|_, _, _| Err(RemoteError::NotMergeable("review required".to_string())));

    let orchestrator = SafeUpdateOrchestrator::new(Arc::new(store));
    let outcome = orchestrator.execute(request()).await.unwrap();

    // Partial success, not failure: the proposal is durably recorded
    match outcome {
        SyncOutcome::PendingReview { proposal, .. } => assert_eq!(proposal, ProposalId(7)),
        other => panic!("expected PendingReview, got {other:?}"),
    }
}

#[tokio::test]
async fn transient_merge_failure_reports_pending_review() {
    let mut store = MockStore::new();
    store.expect_create_branch().returning(|_, _, _| Ok(()));
    store
        .expect_read_file()
        .returning(|_, _, _| Ok(ReadOutcome::File(remote_file("h1"))));
    store
        .expect_write_file()
        .returning(|_, _, _, _, _, _| Ok(ContentHash::new("h2")));
    store
        .expect_propose_merge()
        .returning(|_, _, _, _, _| Ok(ProposalId(9)));
    store
        .expect_complete_merge()
        .returning(|_, _, _| Err(transient()));

    let orchestrator = SafeUpdateOrchestrator::new(Arc::new(store));
    let outcome = orchestrator.execute(request()).await.unwrap();

    assert!(!outcome.is_live());
    assert_eq!(outcome.proposal(), ProposalId(9));
}

#[tokio::test]
async fn branch_collision_fails_without_further_steps() {
    let mut store = MockStore::new();
    store
        .expect_create_branch()
        .times(1)
        .returning(|_, branch, _| Err(RemoteError::Conflict(branch.to_string())));
    // No other expectations: any later step would panic the mock

    let orchestrator = SafeUpdateOrchestrator::new(Arc::new(store));
    let err = orchestrator.execute(request()).await.unwrap_err();

    match err {
        SyncError::BranchCollision { branch } => {
            assert!(branch.starts_with("content-update-pages-about-seo-json-"));
        }
        other => panic!("expected BranchCollision, got {other:?}"),
    }
}

#[tokio::test]
async fn stale_write_fails_with_conflict_reason() {
    let mut store = MockStore::new();
    store.expect_create_branch().returning(|_, _, _| Ok(()));
    store
        .expect_read_file()
        .returning(|_, _, _| Ok(ReadOutcome::File(remote_file("h1"))));
    store.expect_write_file().returning(|_, path, _, _, _, _| {
        Err(RemoteError::Stale {
            path: path.to_string(),
        })
    });

    let orchestrator = SafeUpdateOrchestrator::new(Arc::new(store));
    let err = orchestrator.execute(request()).await.unwrap_err();

    match err {
        SyncError::StaleContent { path } => assert_eq!(path, "pages/about.seo.json"),
        other => panic!("expected StaleContent, got {other:?}"),
    }
    assert!(!SyncError::StaleContent {
        path: "x".to_string()
    }
    .is_retryable());
}

#[tokio::test]
async fn transient_read_fails_at_content_fetching() {
    let mut store = MockStore::new();
    store.expect_create_branch().returning(|_, _, _| Ok(()));
    store.expect_read_file().returning(|_, _, _| Err(transient()));

    let orchestrator = SafeUpdateOrchestrator::new(Arc::new(store));
    let err = orchestrator.execute(request()).await.unwrap_err();

    assert_eq!(err.failed_state(), Some(SyncState::ContentFetching));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn proposal_failure_is_terminal_failure() {
    let mut store = MockStore::new();
    store.expect_create_branch().returning(|_, _, _| Ok(()));
    store
        .expect_read_file()
        .returning(|_, _, _| Ok(ReadOutcome::File(remote_file("h1"))));
    store
        .expect_write_file()
        .returning(|_, _, _, _, _, _| Ok(ContentHash::new("h2")));
    store
        .expect_propose_merge()
        .returning(|_, _, _, _, _| Err(transient()));

    let orchestrator = SafeUpdateOrchestrator::new(Arc::new(store));
    let err = orchestrator.execute(request()).await.unwrap_err();

    assert_eq!(err.failed_state(), Some(SyncState::ProposalOpening));
}

#[tokio::test]
async fn missing_file_commits_without_expected_hash() {
    let mut store = MockStore::new();
    store.expect_create_branch().returning(|_, _, _| Ok(()));
    store
        .expect_read_file()
        .returning(|_, _, _| Ok(ReadOutcome::NotFound));
    store
        .expect_write_file()
        .withf(|_, _, _, _, _, expected| expected.is_none())
        .returning(|_, _, _, _, _, _| Ok(ContentHash::new("h1")));
    store
        .expect_propose_merge()
        .returning(|_, _, _, _, _| Ok(ProposalId(3)));
    store.expect_complete_merge().returning(|_, _, _| Ok(()));

    let orchestrator = SafeUpdateOrchestrator::new(Arc::new(store));
    let outcome = orchestrator.execute(request()).await.unwrap();
    assert!(outcome.is_live());
}

#[tokio::test]
async fn binary_target_still_checks_its_hash() {
    let mut store = MockStore::new();
    store.expect_create_branch().returning(|_, _, _| Ok(()));
    store.expect_read_file().returning(|_, _, _| {
        Ok(ReadOutcome::Binary(BinaryContent {
            name: "logo.png".to_string(),
            path: "assets/logo.png".to_string(),
            content_hash: ContentHash::new("bin1"),
            size: 1024,
            download_url: None,
        }))
    });
    store
        .expect_write_file()
        .withf(|_, _, _, _, _, expected| {
            expected.as_ref().map(ContentHash::as_str) == Some("bin1")
        })
        .returning(|_, _, _, _, _, _| Ok(ContentHash::new("bin2")));
    store
        .expect_propose_merge()
        .returning(|_, _, _, _, _| Ok(ProposalId(4)));
    store.expect_complete_merge().returning(|_, _, _| Ok(()));

    let orchestrator = SafeUpdateOrchestrator::new(Arc::new(store));
    let outcome = orchestrator.execute(request()).await.unwrap();
    assert!(outcome.is_live());
}

#[tokio::test]
async fn commit_lands_on_generated_branch_not_base() {
    let mut store = MockStore::new();
    store.expect_create_branch().returning(|_, _, _| Ok(()));
    store
        .expect_read_file()
        .returning(|_, _, _| Ok(ReadOutcome::NotFound));
    store
        .expect_write_file()
        .withf(|_, _, _, _, branch, _| branch != "main" && branch.starts_with("content-update-"))
        .returning(|_, _, _, _, _, _| Ok(ContentHash::new("h1")));
    store
        .expect_propose_merge()
        .withf(|_, _, source, target, _| source.starts_with("content-update-") && target == "main")
        .returning(|_, _, _, _, _| Ok(ProposalId(5)));
    store.expect_complete_merge().returning(|_, _, _| Ok(()));

    let orchestrator = SafeUpdateOrchestrator::new(Arc::new(store));
    orchestrator.execute(request()).await.unwrap();
}
