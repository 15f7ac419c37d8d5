//! GitHub GraphQL access for contribution calendars

mod client;
mod transport;

pub use client::{build_query, parse_response, ContributionClient, DEFAULT_ENDPOINT};
pub use transport::ReqwestTransport;

use crate::types::{ContribtrackError, FetchError, Result};

/// Maximum length of a GitHub login
const MAX_LOGIN_LEN: usize = 39;

/// Validated GitHub account identifier.
///
/// The login is embedded directly in the query document, so only the
/// characters GitHub allows in logins are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login(String);

impl Login {
    pub fn parse(raw: &str) -> Result<Self> {
        let login = raw.trim().trim_start_matches('@');
        if login.is_empty() {
            return Err(ContribtrackError::Config("GitHub login is empty".into()));
        }
        if login.len() > MAX_LOGIN_LEN {
            return Err(ContribtrackError::Config(format!(
                "GitHub login '{}' is longer than {} characters",
                login, MAX_LOGIN_LEN
            )));
        }
        if login.starts_with('-')
            || !login.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ContribtrackError::Config(format!(
                "'{}' is not a valid GitHub login",
                login
            )));
        }
        Ok(Self(login.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Public profile URL
    pub fn profile_url(&self) -> String {
        format!("https://github.com/{}", self.0)
    }
}

impl std::fmt::Display for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bearer credential. Debug output is redacted.
#[derive(Clone)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let token = raw.into().trim().to_string();
        if token.is_empty() {
            return Err(ContribtrackError::Config("GitHub token is empty".into()));
        }
        Ok(Self(token))
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Raw HTTP reply handed back by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Single-request POST seam between the client and the network
pub trait Transport: Send + Sync {
    /// POST a JSON body with a bearer credential.
    /// Connection and timeout failures map to `FetchError::Network`.
    fn post_json(
        &self,
        url: &str,
        token: &AuthToken,
        body: &str,
    ) -> std::result::Result<HttpResponse, FetchError>;
}
