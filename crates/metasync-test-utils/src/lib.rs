//! Testing utilities for the MetaSync workspace
//!
//! Shared fixtures: an in-memory remote store with scriptable merge
//! blocking, plus document builders.

#![allow(missing_docs)]

use async_trait::async_trait;
use metasync_document::StructuredDocument;
use metasync_remote::{
    ContentHash, MergeStrategy, ProposalId, ReadOutcome, RemoteError, RemoteFile, RemoteStore,
    RepoLocator,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Sample metadata document text used across tests
pub const SAMPLE_METADATA_JSON: &str = r#"{
  "title": "About Us",
  "meta_description": "Everything about the team",
  "keywords": [
    "team",
    "company"
  ],
  "og": {
    "title": "About Us",
    "image": "/img/og-about.png"
  }
}"#;

pub fn sample_metadata_document() -> StructuredDocument {
    StructuredDocument::parse(SAMPLE_METADATA_JSON).expect("sample metadata parses")
}

#[derive(Debug, Clone)]
struct FileRecord {
    content: String,
    hash: String,
}

#[derive(Debug)]
struct ProposalRecord {
    source: String,
    target: String,
    merged: bool,
}

#[derive(Debug, Clone, Default)]
struct BranchState {
    files: HashMap<String, FileRecord>,
    // Paths written on this branch since it was created; merging copies
    // only these into the target, like a real merge applies the diff
    changed: HashSet<String>,
}

#[derive(Debug)]
struct StoreState {
    branches: HashMap<String, BranchState>,
    proposals: HashMap<u64, ProposalRecord>,
    next_proposal: u64,
    hash_counter: u64,
    merge_block: Option<String>,
    last_commit_date: Option<String>,
}

/// In-memory remote store
///
/// Behaves like the hosted store for the protocol paths the engine
/// exercises: branch copies, optimistic hash checks on writes, proposals
/// that merge source files into the target. `block_merges` scripts the
/// review-gated remote that refuses to complete merges.
#[derive(Debug)]
pub struct InMemoryRemoteStore {
    base_branch: String,
    state: Mutex<StoreState>,
}

impl InMemoryRemoteStore {
    pub fn new(base_branch: impl Into<String>) -> Self {
        let base_branch = base_branch.into();
        let mut branches = HashMap::new();
        branches.insert(base_branch.clone(), BranchState::default());
        Self {
            base_branch,
            state: Mutex::new(StoreState {
                branches,
                proposals: HashMap::new(),
                next_proposal: 1,
                hash_counter: 0,
                merge_block: None,
                last_commit_date: None,
            }),
        }
    }

    /// Seed a file on the base branch
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        {
            let mut state = self.state.lock().expect("store state");
            let hash = next_hash(&mut state);
            let branch = state
                .branches
                .get_mut(self.base_branch.as_str())
                .expect("base branch");
            branch.files.insert(
                path.into(),
                FileRecord {
                    content: content.into(),
                    hash,
                },
            );
        }
        self
    }

    /// Make every merge completion fail `NotMergeable` with this reason
    pub fn block_merges(&self, reason: impl Into<String>) {
        self.state.lock().expect("store state").merge_block = Some(reason.into());
    }

    /// Script the date reported for the latest commit on any path
    pub fn set_last_commit_date(&self, date: impl Into<String>) {
        self.state.lock().expect("store state").last_commit_date = Some(date.into());
    }

    /// Current content of a file on a branch, for assertions
    #[must_use]
    pub fn file_content(&self, branch: &str, path: &str) -> Option<String> {
        let state = self.state.lock().expect("store state");
        state
            .branches
            .get(branch)
            .and_then(|branch| branch.files.get(path))
            .map(|record| record.content.clone())
    }

    /// All branch names, for assertions
    #[must_use]
    pub fn branch_names(&self) -> Vec<String> {
        let state = self.state.lock().expect("store state");
        state.branches.keys().cloned().collect()
    }

    /// Number of proposals ever opened
    #[must_use]
    pub fn proposal_count(&self) -> usize {
        self.state.lock().expect("store state").proposals.len()
    }

    /// Check whether a proposal was merged
    #[must_use]
    pub fn proposal_merged(&self, proposal: ProposalId) -> bool {
        let state = self.state.lock().expect("store state");
        state
            .proposals
            .get(&proposal.0)
            .map(|record| record.merged)
            .unwrap_or(false)
    }
}

fn next_hash(state: &mut StoreState) -> String {
    state.hash_counter += 1;
    format!("hash-{}", state.hash_counter)
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn extension_of(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

#[async_trait]
impl RemoteStore for InMemoryRemoteStore {
    async fn read_file(
        &self,
        _repo: &RepoLocator,
        path: &str,
        reference: &str,
    ) -> Result<ReadOutcome, RemoteError> {
        let state = self.state.lock().expect("store state");
        let branch = state
            .branches
            .get(reference)
            .ok_or_else(|| RemoteError::NotFound(reference.to_string()))?;
        match branch.files.get(path) {
            None => Ok(ReadOutcome::NotFound),
            Some(record) => {
                let name = file_name(path).to_string();
                let file_type = extension_of(&name);
                Ok(ReadOutcome::File(RemoteFile {
                    file_type,
                    content: record.content.clone(),
                    content_hash: ContentHash::new(record.hash.clone()),
                    size: record.content.len() as u64,
                    download_url: None,
                    path: path.to_string(),
                    name,
                }))
            }
        }
    }

    async fn create_branch(
        &self,
        _repo: &RepoLocator,
        new_branch: &str,
        from_ref: &str,
    ) -> Result<(), RemoteError> {
        let mut state = self.state.lock().expect("store state");
        if state.branches.contains_key(new_branch) {
            return Err(RemoteError::Conflict(new_branch.to_string()));
        }
        let files = state
            .branches
            .get(from_ref)
            .ok_or_else(|| RemoteError::NotFound(from_ref.to_string()))?
            .files
            .clone();
        state.branches.insert(
            new_branch.to_string(),
            BranchState {
                files,
                changed: HashSet::new(),
            },
        );
        Ok(())
    }

    async fn branch_exists(&self, _repo: &RepoLocator, branch: &str) -> Result<bool, RemoteError> {
        let state = self.state.lock().expect("store state");
        Ok(state.branches.contains_key(branch))
    }

    async fn write_file(
        &self,
        _repo: &RepoLocator,
        path: &str,
        content: &str,
        _message: &str,
        branch: &str,
        expected_hash: Option<ContentHash>,
    ) -> Result<ContentHash, RemoteError> {
        let mut state = self.state.lock().expect("store state");
        if !state.branches.contains_key(branch) {
            return Err(RemoteError::NotFound(branch.to_string()));
        }
        let current = state
            .branches
            .get(branch)
            .and_then(|branch| branch.files.get(path))
            .map(|record| record.hash.clone());
        let matches = match (&current, &expected_hash) {
            (None, None) => true,
            (Some(current), Some(expected)) => current == expected.as_str(),
            _ => false,
        };
        if !matches {
            return Err(RemoteError::Stale {
                path: path.to_string(),
            });
        }

        let hash = next_hash(&mut state);
        let branch_state = state.branches.get_mut(branch).expect("branch");
        branch_state.files.insert(
            path.to_string(),
            FileRecord {
                content: content.to_string(),
                hash: hash.clone(),
            },
        );
        branch_state.changed.insert(path.to_string());
        Ok(ContentHash::new(hash))
    }

    async fn propose_merge(
        &self,
        _repo: &RepoLocator,
        _title: &str,
        source_branch: &str,
        target_branch: &str,
        _body: Option<&str>,
    ) -> Result<ProposalId, RemoteError> {
        let mut state = self.state.lock().expect("store state");
        if !state.branches.contains_key(source_branch) {
            return Err(RemoteError::NotFound(source_branch.to_string()));
        }
        let id = state.next_proposal;
        state.next_proposal += 1;
        state.proposals.insert(
            id,
            ProposalRecord {
                source: source_branch.to_string(),
                target: target_branch.to_string(),
                merged: false,
            },
        );
        Ok(ProposalId(id))
    }

    async fn complete_merge(
        &self,
        _repo: &RepoLocator,
        proposal: ProposalId,
        _strategy: MergeStrategy,
    ) -> Result<(), RemoteError> {
        let mut state = self.state.lock().expect("store state");
        if let Some(reason) = &state.merge_block {
            return Err(RemoteError::NotMergeable(reason.clone()));
        }
        let record = state
            .proposals
            .get(&proposal.0)
            .ok_or_else(|| RemoteError::NotFound(proposal.to_string()))?;
        let (source, target) = (record.source.clone(), record.target.clone());
        let source_branch = state
            .branches
            .get(&source)
            .ok_or_else(|| RemoteError::NotFound(source.clone()))?
            .clone();
        let target_branch = state
            .branches
            .get_mut(&target)
            .ok_or_else(|| RemoteError::NotFound(target.clone()))?;
        for path in &source_branch.changed {
            if let Some(record) = source_branch.files.get(path) {
                target_branch.files.insert(path.clone(), record.clone());
                target_branch.changed.insert(path.clone());
            }
        }
        state
            .proposals
            .get_mut(&proposal.0)
            .expect("proposal")
            .merged = true;
        Ok(())
    }

    async fn last_commit_date(
        &self,
        _repo: &RepoLocator,
        _path: &str,
    ) -> Result<Option<String>, RemoteError> {
        Ok(self.state.lock().expect("store state").last_commit_date.clone())
    }
}
