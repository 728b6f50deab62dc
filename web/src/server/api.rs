//! HTTP client for the project API.
//!
//! Listing requests translate the page query into the API's parameter
//! names; error bodies (`{"Error": …, "SubCode": …}`) become [`FetchError`]s.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT_LANGUAGE, AUTHORIZATION};
use serde::de::DeserializeOwned;
use taskmap_common::api_params;
use taskmap_common::config::Config;
use taskmap_common::fetch::{ListPayload, ListRequest, ProjectFetcher, ProjectPayload};
use taskmap_common::FetchError;
use tracing::debug;
use url::Url;

/// Cheap to clone; the connection pool is shared.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    locale: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Cannot build HTTP client")?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            locale: config.locale.clone(),
        })
    }

    fn url(&self, path: &str, params: &[(String, String)]) -> Result<Url, FetchError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let parsed = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        parsed.map_err(|e| FetchError::Network(format!("Invalid API URL {raw}: {e}")))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url, token: Option<&str>) -> Result<T, FetchError> {
        debug!(%url, "API request");
        let mut request = self.http.get(url).header(ACCEPT_LANGUAGE, &self.locale);
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request = request.header(AUTHORIZATION, format!("Token {token}"));
        }

        let resp = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::from_response(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl ProjectFetcher for ApiClient {
    async fn list_projects(&self, request: &ListRequest) -> Result<ListPayload, FetchError> {
        let today = chrono::Local::now().date_naive();
        let params = api_params::list_params(&request.query, request.action.as_deref(), today);
        let url = self.url("projects/", &params)?;
        self.get(url, request.token.as_deref()).await
    }

    async fn get_project(&self, id: &str, token: Option<&str>) -> Result<ProjectPayload, FetchError> {
        let url = self.url(&format!("projects/{id}/"), &[])?;
        self.get(url, token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        let config = Config {
            api_base_url: "https://tasks.example.org/api/v2/".into(),
            ..Config::default()
        };
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_url_joins_base_and_params() {
        let params = vec![
            ("mappingTypes".to_string(), "ROADS,BUILDINGS".to_string()),
            ("page".to_string(), "2".to_string()),
        ];
        let url = client().url("projects/", &params).unwrap();
        assert_eq!(
            url.as_str(),
            "https://tasks.example.org/api/v2/projects/?mappingTypes=ROADS%2CBUILDINGS&page=2"
        );
    }

    #[test]
    fn test_url_without_params() {
        let url = client().url("/projects/42/", &[]).unwrap();
        assert_eq!(url.as_str(), "https://tasks.example.org/api/v2/projects/42/");
    }
}
