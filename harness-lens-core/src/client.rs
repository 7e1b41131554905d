//! # client: REST implementation of the [`HarnessApi`] contract
//!
//! Issues authenticated GET requests against the hosted Harness instance and
//! maps the vendor's response envelopes onto the contract types. All listing
//! endpoints share the same page envelope (`data.content[]` plus a `last`
//! flag); the execution-config endpoints live under the CI gateway prefix
//! instead of the NextGen one.
//!
//! Requests are sequential and carry a fixed timeout. A non-2xx response is
//! an error carrying the status and body; an empty `data` payload is not.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::contract::{
    ApiError, ConfigVariant, HarnessApi, Organization, Page, PipelineSummary, Project,
};
use crate::settings::Settings;

/// Page size requested from every listing endpoint.
pub const PAGE_SIZE: u32 = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Harness NextGen API.
pub struct RestClient {
    http: Client,
    settings: Settings,
}

impl RestClient {
    pub fn new(settings: Settings) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(RestClient { http, settings })
    }

    /// Issues an authenticated GET and returns the parsed JSON body.
    ///
    /// The account identifier is appended to every request; `query` carries
    /// the endpoint-specific parameters.
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.settings.base_url, path);
        debug!(url = %url, "GET");

        let response = self
            .http
            .get(&url)
            .header("x-api-key", &self.settings.api_token)
            .query(&[("accountIdentifier", self.settings.account_id.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to decode response body>"));
            error!(status = %status, url = %url, "Harness API returned error: {body}");
            return Err(format!("Harness API error: GET {url} returned {status}: {body}").into());
        }

        let body = response.json::<Value>().await?;
        Ok(body)
    }
}

/// Maps a page-envelope response body onto a typed [`Page`].
///
/// Absent `data` or `content` terminates pagination with an empty page; a
/// bare array under `data` is accepted as a single terminal page. Entries
/// the parser rejects are skipped with a warning.
fn parse_page<T>(body: &Value, parse: fn(&Value) -> Option<T>) -> Page<T> {
    let data = match body.get("data") {
        Some(data) => data,
        None => return Page::empty(),
    };
    let entries = match data
        .as_array()
        .or_else(|| data.get("content").and_then(Value::as_array))
    {
        Some(entries) => entries,
        None => return Page::empty(),
    };
    let last = data.get("last").and_then(Value::as_bool).unwrap_or(true);

    let mut content = Vec::with_capacity(entries.len());
    for entry in entries {
        match parse(entry) {
            Some(item) => content.push(item),
            None => warn!(entry = %entry, "Skipping listing entry without a usable identifier"),
        }
    }
    Page { content, last }
}

#[async_trait]
impl HarnessApi for RestClient {
    async fn organizations_page(&self, page_index: u32) -> Result<Page<Organization>, ApiError> {
        let page_index = page_index.to_string();
        let page_size = PAGE_SIZE.to_string();
        let body = self
            .get_json(
                "/ng/api/organizations",
                &[("pageIndex", &page_index), ("pageSize", &page_size)],
            )
            .await?;
        Ok(parse_page(&body, Organization::from_entry))
    }

    async fn projects_page(&self, org: &str, page_index: u32) -> Result<Page<Project>, ApiError> {
        let page_index = page_index.to_string();
        let page_size = PAGE_SIZE.to_string();
        let body = self
            .get_json(
                "/ng/api/projects",
                &[
                    ("orgIdentifier", org),
                    ("pageIndex", &page_index),
                    ("pageSize", &page_size),
                ],
            )
            .await?;
        Ok(parse_page(&body, Project::from_entry))
    }

    async fn pipelines_page(
        &self,
        org: &str,
        project: &str,
        page_index: u32,
    ) -> Result<Page<PipelineSummary>, ApiError> {
        let page_index = page_index.to_string();
        let page_size = PAGE_SIZE.to_string();
        let body = self
            .get_json(
                "/ng/api/pipelines",
                &[
                    ("orgIdentifier", org),
                    ("projectIdentifier", project),
                    ("page", &page_index),
                    ("limit", &page_size),
                ],
            )
            .await?;
        Ok(parse_page(&body, PipelineSummary::from_entry))
    }

    async fn pipeline_yaml(
        &self,
        org: &str,
        project: &str,
        pipeline: &str,
    ) -> Result<Option<String>, ApiError> {
        let path = format!("/ng/api/pipelines/{pipeline}");
        let body = self
            .get_json(
                &path,
                &[("orgIdentifier", org), ("projectIdentifier", project)],
            )
            .await?;
        let data = body.get("data").unwrap_or(&body);
        // The YAML field name varies between API versions.
        for field in ["yamlPipeline", "yaml", "pipelineYaml"] {
            if let Some(yaml) = data.get(field).and_then(Value::as_str) {
                return Ok(Some(yaml.to_string()));
            }
        }
        Ok(None)
    }

    async fn execution_config(&self, variant: ConfigVariant) -> Result<Value, ApiError> {
        let (path, query): (&str, &[(&str, &str)]) = match variant {
            ConfigVariant::Default => (
                "/gateway/ci/execution-config/get-default-config",
                &[("infra", "K8")],
            ),
            ConfigVariant::Customer => (
                "/gateway/ci/execution-config/get-customer-config",
                &[("infra", "K8"), ("overridesOnly", "true")],
            ),
        };
        let body = self.get_json(path, query).await?;
        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    }
}
