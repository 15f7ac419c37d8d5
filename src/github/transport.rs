//! Blocking reqwest transport

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use super::{AuthToken, HttpResponse, Transport};
use crate::types::{ContribtrackError, FetchError, Result};

/// GitHub rejects requests without a User-Agent
const USER_AGENT: &str = concat!("contribtrack/", env!("CARGO_PKG_VERSION"));

/// Transport backed by `reqwest::blocking`. Timeouts are whatever the
/// reqwest client enforces; none are added here.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ContribtrackError::Config(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn post_json(
        &self,
        url: &str,
        token: &AuthToken,
        body: &str,
    ) -> std::result::Result<HttpResponse, FetchError> {
        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, token.bearer())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body.to_string())
            .send()
            .map_err(|e| FetchError::Network(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| FetchError::Network(format!("cannot read response body: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_names_crate() {
        assert!(USER_AGENT.starts_with("contribtrack/"));
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        let transport = ReqwestTransport::new().unwrap();
        let token = AuthToken::new("ghp_test").unwrap();
        // Port 9 on localhost has no listener in test environments
        let result = transport.post_json("http://127.0.0.1:9/graphql", &token, "{}");
        assert!(matches!(result, Err(FetchError::Network(_))));
    }
}
