//! # contract: Capability interface for the Harness NextGen API
//!
//! This module defines a single trait (`HarnessApi`) and the wire-level data
//! types shared by every consumer: page envelopes, account hierarchy entries
//! (organizations, projects, pipelines) and the execution-config variants.
//!
//! ## Interface & Extensibility
//! - Implement the [`HarnessApi`] trait to create new API clients (REST,
//!   recorded fixtures, mocks).
//! - All methods are async, returning results with boxed error types.
//! - Error handling is uniform: all transport/API errors return boxed trait
//!   objects.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit/integration tests without network access.

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;

/// Error type for API operations (simple boxed error).
pub type ApiError = Box<dyn std::error::Error + Send + Sync>;

/// One page of results from a paginated listing endpoint.
///
/// Mirrors the vendor's page envelope: the entries of the current page plus
/// the `last` flag that terminates the page loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub last: bool,
}

impl<T> Page<T> {
    /// An empty terminal page, used when a response carries no data.
    pub fn empty() -> Self {
        Page {
            content: Vec::new(),
            last: true,
        }
    }
}

/// Top-level grouping of projects in the account hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Organization {
    pub identifier: String,
    pub name: String,
}

impl Organization {
    /// Parses a listing entry. The API sometimes nests the payload under an
    /// `organization` wrapper key; both shapes are accepted.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        let body = entry.get("organization").unwrap_or(entry);
        let identifier = body.get("identifier")?.as_str()?.to_string();
        let name = body
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(&identifier)
            .to_string();
        Some(Organization { identifier, name })
    }
}

/// Grouping of pipelines within an organization.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Project {
    pub identifier: String,
    pub name: String,
}

impl Project {
    /// Parses a listing entry, unwrapping the optional `project` wrapper key.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        let body = entry.get("project").unwrap_or(entry);
        let identifier = body.get("identifier")?.as_str()?.to_string();
        let name = body
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(&identifier)
            .to_string();
        Some(Project { identifier, name })
    }
}

/// A CI/CD workflow definition counted per project.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PipelineSummary {
    pub identifier: String,
    pub name: String,
}

impl PipelineSummary {
    /// Parses a listing entry, unwrapping the optional `pipeline` wrapper
    /// key. Entries without an `identifier` fall back to `name`.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        let body = entry.get("pipeline").unwrap_or(entry);
        let identifier = body
            .get("identifier")
            .or_else(|| body.get("name"))
            .and_then(Value::as_str)?
            .to_string();
        let name = body
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(&identifier)
            .to_string();
        Some(PipelineSummary { identifier, name })
    }
}

/// Selects which execution-config document to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigVariant {
    /// The platform-wide default configuration.
    Default,
    /// The customer override document (overrides only).
    Customer,
}

/// Trait for read-only access to the Harness NextGen API.
///
/// Listing methods return one page at a time; callers own the page loop.
/// The trait is implemented by the real REST client and by test mocks.
///
/// The trait is `Send` + `Sync` and intended for async/await usage.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait HarnessApi: Send + Sync {
    /// Fetch one page of organizations in the account.
    async fn organizations_page(&self, page_index: u32) -> Result<Page<Organization>, ApiError>;

    /// Fetch one page of projects within an organization.
    async fn projects_page(&self, org: &str, page_index: u32) -> Result<Page<Project>, ApiError>;

    /// Fetch one page of pipelines within a project.
    async fn pipelines_page(
        &self,
        org: &str,
        project: &str,
        page_index: u32,
    ) -> Result<Page<PipelineSummary>, ApiError>;

    /// Fetch the YAML representation of a pipeline, if the API exposes one.
    async fn pipeline_yaml(
        &self,
        org: &str,
        project: &str,
        pipeline: &str,
    ) -> Result<Option<String>, ApiError>;

    /// Fetch an execution-config document. Returns the unwrapped `data`
    /// payload; `Value::Null` when the response carries none, which for the
    /// customer variant means "no overrides" rather than an error.
    async fn execution_config(&self, variant: ConfigVariant) -> Result<Value, ApiError>;
}
