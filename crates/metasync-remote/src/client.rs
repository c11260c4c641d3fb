//! Production remote store client
//!
//! [`RemoteStoreClient`] speaks the hosted content API over HTTPS:
//! REST+JSON, bearer-token authentication, file bodies transported
//! base64-encoded. Each call is a single remote interaction; HTTP
//! statuses are mapped to the typed outcomes in [`RemoteError`] here and
//! nowhere else.

use crate::error::RemoteError;
use crate::store::RemoteStore;
use crate::types::{
    BinaryContent, ContentHash, MergeStrategy, ProposalId, ReadOutcome, RemoteFile, RepoLocator,
};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "MetaSync-App";

/// Remote client configuration
///
/// The bearer credential is treated as an opaque string; its lifecycle
/// and refresh are owned by the identity provider, not the client.
#[derive(Debug, Clone)]
pub struct RemoteClientConfig {
    /// API base URL
    pub base_url: String,
    /// Bearer credential for every request
    pub token: String,
    /// User agent header value
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl RemoteClientConfig {
    /// Create configuration with defaults for everything but the credential
    #[inline]
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }

    /// With a different API base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With a different user agent
    #[inline]
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// With a different request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Typed client over the remote content API
#[derive(Debug, Clone)]
pub struct RemoteStoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteStoreClient {
    /// Build a client from configuration
    ///
    /// # Errors
    /// Returns `RemoteError::Config` for an unparseable base URL or a
    /// credential that cannot form a header value
    pub fn new(config: RemoteClientConfig) -> Result<Self, RemoteError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| RemoteError::Config(format!("base url: {e}")))?;

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| RemoteError::Config(format!("credential: {e}")))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| RemoteError::Config(format!("user agent: {e}")))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RemoteError::Config(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, repo: &RepoLocator, tail: &str) -> String {
        format!("{}/repos/{}/{}/{}", self.base_url, repo.owner, repo.name, tail)
    }

    /// Read the remote's error message and classify a non-success status
    async fn api_error(status: StatusCode, response: reqwest::Response) -> RemoteError {
        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_default();
        match status.as_u16() {
            401 | 403 => RemoteError::Auth {
                status: status.as_u16(),
            },
            s if s >= 500 => RemoteError::Transient {
                status: Some(s),
                message,
            },
            s => RemoteError::Api { status: s, message },
        }
    }
}

#[async_trait]
impl RemoteStore for RemoteStoreClient {
    async fn read_file(
        &self,
        repo: &RepoLocator,
        path: &str,
        reference: &str,
    ) -> Result<ReadOutcome, RemoteError> {
        tracing::debug!("Reading {}/{} at {}", repo, path, reference);
        let response = self
            .http
            .get(self.endpoint(repo, &format!("contents/{path}")))
            .query(&[("ref", reference)])
            .send()
            .await
            .map_err(RemoteError::from_transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(ReadOutcome::NotFound);
        }
        if !status.is_success() {
            return Err(Self::api_error(status, response).await);
        }

        let payload: ContentsResponse = response
            .json()
            .await
            .map_err(RemoteError::from_transport)?;
        match payload {
            ContentsResponse::Listing(_) => Err(RemoteError::NotAFile {
                path: path.to_string(),
            }),
            ContentsResponse::File(file) => decode_contents(path, file),
        }
    }

    async fn create_branch(
        &self,
        repo: &RepoLocator,
        new_branch: &str,
        from_ref: &str,
    ) -> Result<(), RemoteError> {
        tracing::debug!("Creating branch {} in {} from {}", new_branch, repo, from_ref);

        // Resolve the current tip of the source ref
        let response = self
            .http
            .get(self.endpoint(repo, &format!("git/ref/heads/{from_ref}")))
            .send()
            .await
            .map_err(RemoteError::from_transport)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(from_ref.to_string()));
        }
        if !status.is_success() {
            return Err(Self::api_error(status, response).await);
        }
        let tip: RefPayload = response.json().await.map_err(RemoteError::from_transport)?;

        // Point a new ref at it
        let response = self
            .http
            .post(self.endpoint(repo, "git/refs"))
            .json(&CreateRefBody {
                reference: format!("refs/heads/{new_branch}"),
                sha: &tip.object.sha,
            })
            .send()
            .await
            .map_err(RemoteError::from_transport)?;
        let status = response.status();
        if status.as_u16() == 409 || status.as_u16() == 422 {
            return Err(RemoteError::Conflict(new_branch.to_string()));
        }
        if !status.is_success() {
            return Err(Self::api_error(status, response).await);
        }
        Ok(())
    }

    async fn branch_exists(&self, repo: &RepoLocator, branch: &str) -> Result<bool, RemoteError> {
        let response = self
            .http
            .get(self.endpoint(repo, &format!("git/ref/heads/{branch}")))
            .send()
            .await
            .map_err(RemoteError::from_transport)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(Self::api_error(status, response).await);
        }
        Ok(true)
    }

    async fn write_file(
        &self,
        repo: &RepoLocator,
        path: &str,
        content: &str,
        message: &str,
        branch: &str,
        expected_hash: Option<ContentHash>,
    ) -> Result<ContentHash, RemoteError> {
        tracing::debug!("Writing {}/{} on {}", repo, path, branch);
        let response = self
            .http
            .put(self.endpoint(repo, &format!("contents/{path}")))
            .json(&WriteBody {
                message,
                content: BASE64.encode(content.as_bytes()),
                branch,
                sha: expected_hash.as_ref().map(ContentHash::as_str),
            })
            .send()
            .await
            .map_err(RemoteError::from_transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(path.to_string()));
        }
        if status.as_u16() == 409 || status.as_u16() == 422 {
            return Err(RemoteError::Stale {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(Self::api_error(status, response).await);
        }

        let payload: WriteResponse = response.json().await.map_err(RemoteError::from_transport)?;
        Ok(ContentHash::new(payload.content.sha))
    }

    async fn propose_merge(
        &self,
        repo: &RepoLocator,
        title: &str,
        source_branch: &str,
        target_branch: &str,
        body: Option<&str>,
    ) -> Result<ProposalId, RemoteError> {
        tracing::debug!("Proposing merge of {} into {} in {}", source_branch, target_branch, repo);
        let response = self
            .http
            .post(self.endpoint(repo, "pulls"))
            .json(&ProposalBody {
                title,
                head: source_branch,
                base: target_branch,
                body,
            })
            .send()
            .await
            .map_err(RemoteError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::api_error(status, response).await);
        }
        let payload: ProposalResponse =
            response.json().await.map_err(RemoteError::from_transport)?;
        Ok(ProposalId(payload.number))
    }

    async fn complete_merge(
        &self,
        repo: &RepoLocator,
        proposal: ProposalId,
        strategy: MergeStrategy,
    ) -> Result<(), RemoteError> {
        tracing::debug!("Completing merge of {} in {} ({})", proposal, repo, strategy.as_str());
        let response = self
            .http
            .put(self.endpoint(repo, &format!("pulls/{}/merge", proposal.0)))
            .json(&MergeBody {
                merge_method: strategy.as_str(),
            })
            .send()
            .await
            .map_err(RemoteError::from_transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(proposal.to_string()));
        }
        if status.as_u16() == 405 || status.as_u16() == 409 {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_default();
            return Err(RemoteError::NotMergeable(message));
        }
        if !status.is_success() {
            return Err(Self::api_error(status, response).await);
        }
        Ok(())
    }

    async fn last_commit_date(
        &self,
        repo: &RepoLocator,
        path: &str,
    ) -> Result<Option<String>, RemoteError> {
        let response = self
            .http
            .get(self.endpoint(repo, "commits"))
            .query(&[("path", path), ("per_page", "1")])
            .send()
            .await
            .map_err(RemoteError::from_transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Self::api_error(status, response).await);
        }
        let commits: Vec<CommitEntry> =
            response.json().await.map_err(RemoteError::from_transport)?;
        Ok(commits
            .into_iter()
            .next()
            .and_then(|entry| entry.commit.committer)
            .and_then(|committer| committer.date))
    }
}

/// Decode a contents payload into a read outcome
///
/// A body that is not base64, or not valid UTF-8 once decoded, surfaces
/// as binary content with the download reference.
fn decode_contents(path: &str, payload: ContentsPayload) -> Result<ReadOutcome, RemoteError> {
    if payload.kind != "file" {
        return Err(RemoteError::NotAFile {
            path: path.to_string(),
        });
    }

    let encoded: Option<String> = if payload.encoding.as_deref() == Some("base64") {
        payload
            .content
            .as_deref()
            .map(|c| c.split_whitespace().collect())
    } else {
        None
    };
    let Some(encoded) = encoded else {
        return Ok(binary_outcome(payload));
    };
    let Ok(bytes) = BASE64.decode(encoded) else {
        return Ok(binary_outcome(payload));
    };
    let Ok(content) = String::from_utf8(bytes) else {
        return Ok(binary_outcome(payload));
    };

    let file_type = extension_of(&payload.name);
    Ok(ReadOutcome::File(RemoteFile {
        name: payload.name,
        path: payload.path,
        content,
        content_hash: ContentHash::new(payload.sha),
        size: payload.size,
        download_url: payload.download_url,
        file_type,
    }))
}

fn binary_outcome(payload: ContentsPayload) -> ReadOutcome {
    ReadOutcome::Binary(BinaryContent {
        name: payload.name,
        path: payload.path,
        content_hash: ContentHash::new(payload.sha),
        size: payload.size,
        download_url: payload.download_url,
    })
}

/// Lowercase extension of a file name, empty when there is none
fn extension_of(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<ContentsPayload>),
    File(ContentsPayload),
}

#[derive(Debug, Deserialize)]
struct ContentsPayload {
    name: String,
    path: String,
    sha: String,
    size: u64,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    download_url: Option<String>,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct RefPayload {
    object: RefObject,
}

#[derive(Debug, Deserialize)]
struct RefObject {
    sha: String,
}

#[derive(Debug, Serialize)]
struct CreateRefBody<'a> {
    #[serde(rename = "ref")]
    reference: String,
    sha: &'a str,
}

#[derive(Debug, Serialize)]
struct WriteBody<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    content: WriteContent,
}

#[derive(Debug, Deserialize)]
struct WriteContent {
    sha: String,
}

#[derive(Debug, Serialize)]
struct ProposalBody<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ProposalResponse {
    number: u64,
}

#[derive(Debug, Serialize)]
struct MergeBody<'a> {
    merge_method: &'a str,
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    commit: CommitMeta,
}

#[derive(Debug, Deserialize)]
struct CommitMeta {
    #[serde(default)]
    committer: Option<CommitSignature>,
}

#[derive(Debug, Deserialize)]
struct CommitSignature {
    #[serde(default)]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}
