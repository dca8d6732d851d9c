use std::time::Duration;

use indexmap::IndexMap;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::config::Credentials;
use crate::error::{CibotError, Result};

/// HTTP transport to the CI server: one authenticated request per call,
/// no retries, no caching. Non-success statuses become `Api` errors with
/// the response body, so callers never inspect transport faults.
pub struct JenkinsClient {
    client: Client,
    base_url: Url,
    user: String,
    token: Token,
}

impl JenkinsClient {
    pub fn new(credentials: Credentials, timeout: Option<Duration>) -> Result<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("cibot/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| CibotError::Config(format!("Failed to create HTTP client: {e}")))?;

        // Url::join treats the last path segment as a file unless the base
        // ends with a slash.
        let mut base = credentials.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }

        let base_url = Url::parse(&base)
            .map_err(|e| CibotError::Config(format!("Invalid base URL '{base}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            user: credentials.user,
            token: credentials.token,
        })
    }

    /// Helper to build authenticated requests
    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.user, Some(self.token.as_str()))
    }

    fn endpoint_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| CibotError::Config(format!("Invalid endpoint URL '{path}': {e}")))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint_url(path)?;
        debug!("GET {url}");

        let response = self.auth_request(self.client.get(url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(CibotError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// POST with query-style parameters. The CI server acknowledges a
    /// queued build with 201; anything else is a failure.
    pub async fn post_expect_created(
        &self,
        path: &str,
        params: &IndexMap<String, String>,
    ) -> Result<()> {
        let url = self.endpoint_url(path)?;
        debug!("POST {url}");

        let mut request = self.client.post(url);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = self.auth_request(request).send().await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(CibotError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(base_url: &str) -> Credentials {
        Credentials {
            base_url: base_url.to_string(),
            user: "svc-cibot".to_string(),
            token: Token::from("11abcdef"),
        }
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = JenkinsClient::new(credentials("http://ci.example.com:8080"), None).unwrap();
        let url = client.endpoint_url("job/deploy/api/json").unwrap();
        assert_eq!(url.as_str(), "http://ci.example.com:8080/job/deploy/api/json");
    }

    #[test]
    fn test_base_url_with_context_path() {
        let client =
            JenkinsClient::new(credentials("http://ci.example.com/jenkins"), None).unwrap();
        let url = client.endpoint_url("api/json").unwrap();
        assert_eq!(url.as_str(), "http://ci.example.com/jenkins/api/json");
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let result = JenkinsClient::new(credentials("not a url"), None);
        assert!(matches!(result, Err(CibotError::Config(_))));
    }
}
