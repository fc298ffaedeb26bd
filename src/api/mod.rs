//! HTTP client for the remote user directory.
//!
//! Wraps the four REST calls the directory service exposes: list the
//! collection, create a user, update a user, delete a user. The collection
//! is always re-fetched wholesale after a mutation; this module does no
//! caching or diffing of its own.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when talking to the directory service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed before a response arrived
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned a non-2xx response
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A 2xx response did not have the expected shape
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Invalid base URL
    #[error("invalid directory URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Text suitable for the notification banner. For server errors this is
    /// the server-provided message verbatim; other variants use their
    /// display form.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type for directory operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Server-assigned user identifier. The service hands these out as either
/// JSON integers or strings; the client treats them as opaque and only
/// echoes them back in request paths.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Int(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Int(n) => write!(f, "{}", n),
            UserId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A user record as returned by the directory service.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// The form's working copy: what gets POSTed on create and PUT on update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
struct ListEnvelope {
    data: Vec<User>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the user directory REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct DirectoryClient {
    http: Client,
    base_url: String,
}

impl DirectoryClient {
    /// Create a client for the given collection endpoint base URL.
    ///
    /// The URL is normalized (trailing slash trimmed) and must use an
    /// http or https scheme.
    pub fn new(base_url: &str) -> Result<Self> {
        if base_url.is_empty() {
            return Err(ApiError::InvalidUrl("URL cannot be empty".into()));
        }
        let url = base_url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("userdir-manager/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: url,
        })
    }

    /// The normalized collection endpoint URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the whole user collection, in server order.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        debug!(url = %self.base_url, "fetching user collection");
        let response = self.http.get(&self.base_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(server_error(status.as_u16(), response.text().await.ok()));
        }
        let envelope: ListEnvelope = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(format!("bad list response: {}", e)))?;
        debug!(count = envelope.data.len(), "fetched user collection");
        Ok(envelope.data)
    }

    /// Create a user from the draft.
    pub async fn create_user(&self, draft: &UserDraft) -> Result<()> {
        debug!(url = %self.base_url, name = %draft.name, "creating user");
        let response = self.http.post(&self.base_url).json(draft).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(server_error(status.as_u16(), response.text().await.ok()));
        }
        Ok(())
    }

    /// Replace the named user's fields with the draft (full update).
    pub async fn update_user(&self, id: &UserId, draft: &UserDraft) -> Result<()> {
        let url = format!("{}/{}", self.base_url, id);
        debug!(url = %url, "updating user");
        let response = self.http.put(&url).json(draft).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(server_error(status.as_u16(), response.text().await.ok()));
        }
        Ok(())
    }

    /// Delete the named user.
    pub async fn delete_user(&self, id: &UserId) -> Result<()> {
        let url = format!("{}/{}", self.base_url, id);
        debug!(url = %url, "deleting user");
        let response = self.http.delete(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(server_error(status.as_u16(), response.text().await.ok()));
        }
        Ok(())
    }
}

/// Build a Server error from a non-2xx response body. The service reports
/// failures as `{ "message": ... }`; anything else falls back to a generic
/// string so a malformed body never takes the client down.
fn server_error(status: u16, body: Option<String>) -> ApiError {
    let message = body
        .as_deref()
        .and_then(|text| serde_json::from_str::<ErrorBody>(text).ok())
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("request failed with status {}", status));
    ApiError::Server { status, message }
}
