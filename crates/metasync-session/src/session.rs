//! Editor session state
//!
//! One session edits one file at a time. Opening reads through the
//! remote store on the base branch; saving serializes the held content
//! and hands it to the safe-update orchestrator. The session never talks
//! to the remote store between those two points — edits are purely
//! in-memory.

use crate::error::SessionError;
use crate::validate::validate_file_name;
use metasync_document::{text_to_list, FieldPath, FieldValue, StructuredDocument};
use metasync_remote::{ReadOutcome, RemoteFile, RemoteFileHandle, RemoteStore, RepoLocator};
use metasync_sync::{SafeUpdateOrchestrator, SyncOutcome, SyncRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Suffix identifying structured metadata files
    pub metadata_suffix: String,
    /// Branch files are read from and changes are proposed into
    pub base_branch: String,
}

impl SessionConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a different metadata suffix
    #[inline]
    #[must_use]
    pub fn with_metadata_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.metadata_suffix = suffix.into();
        self
    }

    /// With a different base branch
    #[inline]
    #[must_use]
    pub fn with_base_branch(mut self, branch: impl Into<String>) -> Self {
        self.base_branch = branch.into();
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            metadata_suffix: ".seo.json".to_string(),
            base_branch: "main".to_string(),
        }
    }
}

/// Content held for the open file
#[derive(Debug, Clone, PartialEq)]
pub enum EditorContent {
    /// Parsed metadata document, edited field-by-field
    Structured(StructuredDocument),
    /// Raw text for non-metadata files
    Raw(String),
}

/// The open file plus its editing state
#[derive(Debug, Clone)]
pub struct OpenFile {
    /// The remote file as read
    pub file: RemoteFile,
    /// Editable content
    pub content: EditorContent,
    /// Warning recorded while opening (parse fallback), for display
    pub warning: Option<String>,
    /// Date of the last commit touching the path, short hash fallback
    pub last_updated: String,
    /// Unsaved edits present
    pub dirty: bool,
}

/// UI-facing editing state over the sync engine
#[derive(Debug)]
pub struct EditorSession<S> {
    store: Arc<S>,
    orchestrator: SafeUpdateOrchestrator<S>,
    repo: RepoLocator,
    config: SessionConfig,
    open: Option<OpenFile>,
}

impl<S: RemoteStore> EditorSession<S> {
    /// Create a session with default configuration
    #[inline]
    #[must_use]
    pub fn new(store: Arc<S>, repo: RepoLocator) -> Self {
        Self::with_config(store, repo, SessionConfig::default())
    }

    /// Create a session with explicit configuration
    #[inline]
    #[must_use]
    pub fn with_config(store: Arc<S>, repo: RepoLocator, config: SessionConfig) -> Self {
        Self {
            orchestrator: SafeUpdateOrchestrator::new(store.clone()),
            store,
            repo,
            config,
            open: None,
        }
    }

    /// Check if a path names a structured metadata file
    #[inline]
    #[must_use]
    pub fn is_metadata_path(&self, path: &str) -> bool {
        path.ends_with(&self.config.metadata_suffix)
    }

    /// The open file, if any
    #[inline]
    #[must_use]
    pub fn open_file(&self) -> Option<&OpenFile> {
        self.open.as_ref()
    }

    /// Write handle for the open file
    ///
    /// Carries the content hash observed when the file was opened. The
    /// orchestrator re-fetches a fresh hash at save time; this handle is
    /// for display and for callers tracking what revision they started
    /// from.
    #[must_use]
    pub fn handle(&self) -> Option<RemoteFileHandle> {
        let open = self.open.as_ref()?;
        Some(RemoteFileHandle {
            repo: self.repo.clone(),
            path: open.file.path.clone(),
            content_hash: open.file.content_hash.clone(),
            branch: self.config.base_branch.clone(),
        })
    }

    /// The open structured document, if one is held
    #[inline]
    #[must_use]
    pub fn document(&self) -> Option<&StructuredDocument> {
        match self.open.as_ref()?.content {
            EditorContent::Structured(ref doc) => Some(doc),
            EditorContent::Raw(_) => None,
        }
    }

    /// Open a file for editing, replacing any previously open file
    ///
    /// Metadata files parse into a document; a parse failure falls back
    /// to an empty document with a recorded warning instead of failing
    /// the open. Other files hold raw text.
    ///
    /// # Errors
    /// - `SessionError::NotFound` if the path is absent (callers offer
    ///   creation)
    /// - `SessionError::Binary` if the file has no editable text
    pub async fn open(&mut self, path: &str) -> Result<(), SessionError> {
        let file = match self
            .store
            .read_file(&self.repo, path, &self.config.base_branch)
            .await?
        {
            ReadOutcome::NotFound => return Err(SessionError::NotFound(path.to_string())),
            ReadOutcome::Binary(binary) => {
                return Err(SessionError::Binary {
                    path: binary.path,
                    download_url: binary.download_url,
                })
            }
            ReadOutcome::File(file) => file,
        };

        let (content, warning) = if self.is_metadata_path(path) {
            match StructuredDocument::parse(&file.content) {
                Ok(doc) => (EditorContent::Structured(doc), None),
                Err(err) => {
                    tracing::warn!("Could not parse {}: {}", file.name, err);
                    (
                        EditorContent::Structured(StructuredDocument::new()),
                        Some(format!(
                            "{} is not a valid metadata document ({err}); starting from an empty one",
                            file.name
                        )),
                    )
                }
            }
        } else {
            (EditorContent::Raw(file.content.clone()), None)
        };

        // Best-effort display stamp; a failed lookup falls back to the
        // short content hash.
        let last_updated = self
            .store
            .last_commit_date(&self.repo, path)
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| file.content_hash.short().to_string());

        self.open = Some(OpenFile {
            file,
            content,
            warning,
            last_updated,
            dirty: false,
        });
        Ok(())
    }

    /// Close the open file, discarding unsaved edits
    #[inline]
    pub fn close(&mut self) {
        self.open = None;
    }

    /// Set a field on the open document
    ///
    /// # Errors
    /// `NothingOpen` / `NotStructured` / document path misuse
    pub fn set_field(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), SessionError> {
        let open = self.open.as_mut().ok_or(SessionError::NothingOpen)?;
        let EditorContent::Structured(doc) = &mut open.content else {
            return Err(SessionError::NotStructured);
        };
        doc.set(path, value)?;
        open.dirty = true;
        Ok(())
    }

    /// Set a field from edited text, honoring the field's current shape
    ///
    /// A field currently holding a list takes the text through the
    /// comma-join codec; everything else becomes plain text.
    ///
    /// # Errors
    /// `NothingOpen` / `NotStructured` / document path misuse
    pub fn set_field_text(&mut self, path: &FieldPath, text: &str) -> Result<(), SessionError> {
        let open = self.open.as_mut().ok_or(SessionError::NothingOpen)?;
        let EditorContent::Structured(doc) = &mut open.content else {
            return Err(SessionError::NotStructured);
        };
        let value = match doc.get(path) {
            Some(FieldValue::List(_)) => FieldValue::List(text_to_list(text)),
            _ => FieldValue::Text(text.to_string()),
        };
        doc.set(path, value)?;
        open.dirty = true;
        Ok(())
    }

    /// Remove a field (and everything nested under it)
    ///
    /// # Errors
    /// `NothingOpen` / `NotStructured`
    pub fn remove_field(&mut self, path: &FieldPath) -> Result<(), SessionError> {
        let open = self.open.as_mut().ok_or(SessionError::NothingOpen)?;
        let EditorContent::Structured(doc) = &mut open.content else {
            return Err(SessionError::NotStructured);
        };
        if doc.remove(path).is_some() {
            open.dirty = true;
        }
        Ok(())
    }

    /// Replace the raw text of a non-metadata file
    ///
    /// # Errors
    /// `NothingOpen`, or `NotStructured` inverted: structured documents
    /// are edited field-by-field
    pub fn set_raw_text(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        let open = self.open.as_mut().ok_or(SessionError::NothingOpen)?;
        match &mut open.content {
            EditorContent::Raw(current) => {
                *current = text.into();
                open.dirty = true;
                Ok(())
            }
            EditorContent::Structured(_) => Err(SessionError::NotStructured),
        }
    }

    /// Save the open file through the safe-update protocol
    ///
    /// The returned outcome is either fully live or pending review;
    /// callers surface the two distinctly. Local edits are considered
    /// saved in both cases (the content is durably recorded remotely).
    ///
    /// # Errors
    /// `NothingOpen`, serialization failure, or any sync failure
    pub async fn save(&mut self) -> Result<SyncOutcome, SessionError> {
        let open = self.open.as_ref().ok_or(SessionError::NothingOpen)?;
        let content = match &open.content {
            EditorContent::Structured(doc) => doc.serialize()?,
            EditorContent::Raw(text) => text.clone(),
        };
        let request = SyncRequest::new(self.repo.clone(), open.file.path.clone(), content)
            .with_base_branch(self.config.base_branch.clone())
            .with_commit_message(format!("Update {} via MetaSync", open.file.name))
            .with_title(format!("Update {}", open.file.path));

        let outcome = self.orchestrator.execute(request).await?;
        if let Some(open) = self.open.as_mut() {
            open.dirty = false;
        }
        Ok(outcome)
    }

    /// Create a new file through the safe-update protocol
    ///
    /// Metadata content is validated as a document (object root) before
    /// anything is sent. Does not change the open file.
    ///
    /// # Errors
    /// `InvalidFileName`, document validation failure, or any sync
    /// failure
    pub async fn create(
        &self,
        directory: &str,
        name: &str,
        content: &str,
    ) -> Result<SyncOutcome, SessionError> {
        validate_file_name(name)?;
        if name.ends_with(&self.config.metadata_suffix) {
            StructuredDocument::parse(content)?;
        }
        let path = if directory.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", directory.trim_end_matches('/'), name)
        };
        let request = SyncRequest::new(self.repo.clone(), path.clone(), content)
            .with_base_branch(self.config.base_branch.clone())
            .with_commit_message(format!("Create {name} via MetaSync"))
            .with_title(format!("Create {path}"));
        Ok(self.orchestrator.execute(request).await?)
    }
}
