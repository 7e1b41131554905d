//! # tags: appID usage scan across pipeline YAML
//!
//! Walks every pipeline discovered by the census hierarchy, fetches its YAML
//! representation and extracts appID values: a case-insensitive regex over
//! the raw text covers the `appid` / `app_id` / `applicationId` spellings,
//! and the parsed document's top-level `tags:` mapping is inspected for
//! appID-like keys. If the YAML does not parse, the regex pass still
//! applies.
//!
//! Unlike the listing calls, a pipeline whose YAML cannot be fetched does
//! not abort the scan: it is counted as unreadable and the walk continues.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use tracing::{info, warn};

use crate::census::{collect_organizations, collect_pipelines, collect_projects};
use crate::contract::{ApiError, HarnessApi};

// Covers appid, app_id, appId, application_id and applicationId, with
// optional quoting around the value.
const APP_ID_PATTERN: &str = r#"(?i)\b(?:app_?id|application_?id)\s*:\s*["']?([^"'\s]+)"#;

/// Where a tagged pipeline lives in the account hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub struct TagLocation {
    pub organization: String,
    pub project: String,
    pub pipeline: String,
}

/// Usage of a single appID across the account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TagCount {
    pub app_id: String,
    pub pipelines: u64,
    pub locations: Vec<TagLocation>,
}

/// Aggregated appID scan over the whole account.
///
/// `tags` is sorted by pipeline count descending, then appID.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct TagReport {
    pub tags: Vec<TagCount>,
    pub total_pipelines: u64,
    pub tagged: u64,
    pub unreadable: u64,
}

impl TagReport {
    /// Share of the pipeline total, in percent.
    pub fn share(&self, pipelines: u64) -> f64 {
        if self.total_pipelines == 0 {
            0.0
        } else {
            pipelines as f64 / self.total_pipelines as f64 * 100.0
        }
    }

    /// Fraction of pipelines carrying at least one appID, in percent.
    pub fn coverage(&self) -> f64 {
        self.share(self.tagged)
    }

    pub fn most_used(&self) -> Option<&TagCount> {
        self.tags.iter().max_by_key(|tag| tag.pipelines)
    }
}

/// Extracts every appID value from a pipeline YAML document.
pub fn extract_app_ids(yaml: &str) -> BTreeSet<String> {
    let mut ids = BTreeSet::new();

    let pattern = Regex::new(APP_ID_PATTERN).unwrap();
    for captures in pattern.captures_iter(yaml) {
        if let Some(value) = captures.get(1) {
            ids.insert(value.as_str().to_string());
        }
    }

    // The tags: mapping may carry the appID under an arbitrary key spelling.
    if let Ok(parsed) = serde_yaml::from_str::<serde_yaml::Value>(yaml) {
        if let Some(tags) = parsed.get("tags").and_then(|tags| tags.as_mapping()) {
            for (key, value) in tags {
                let key = key.as_str().unwrap_or_default().to_ascii_lowercase();
                if !key.contains("appid") && !key.contains("app_id") {
                    continue;
                }
                if let Some(value) = value.as_str() {
                    ids.insert(value.to_string());
                } else if let Some(value) = value.as_i64() {
                    ids.insert(value.to_string());
                }
            }
        }
    }

    ids
}

/// Entrypoint: counts pipelines per appID across the account.
pub async fn run_scan<A>(api: &A) -> Result<TagReport, ApiError>
where
    A: HarnessApi + ?Sized,
{
    info!("Starting appID scan");

    let organizations = collect_organizations(api).await?;
    info!(count = organizations.len(), "Fetched organizations");

    let mut counts: BTreeMap<String, TagCount> = BTreeMap::new();
    let mut total_pipelines = 0;
    let mut tagged = 0;
    let mut unreadable = 0;

    for org in &organizations {
        let projects = collect_projects(api, &org.identifier).await?;
        for project in &projects {
            let pipelines = collect_pipelines(api, &org.identifier, &project.identifier).await?;
            total_pipelines += pipelines.len() as u64;

            for pipeline in &pipelines {
                let yaml = match api
                    .pipeline_yaml(&org.identifier, &project.identifier, &pipeline.identifier)
                    .await
                {
                    Ok(Some(yaml)) => yaml,
                    Ok(None) => {
                        warn!(
                            org = %org.identifier,
                            project = %project.identifier,
                            pipeline = %pipeline.identifier,
                            "Pipeline has no YAML representation"
                        );
                        unreadable += 1;
                        continue;
                    }
                    Err(e) => {
                        warn!(
                            error = ?e,
                            org = %org.identifier,
                            project = %project.identifier,
                            pipeline = %pipeline.identifier,
                            "Failed to fetch pipeline YAML"
                        );
                        unreadable += 1;
                        continue;
                    }
                };

                let app_ids = extract_app_ids(&yaml);
                if app_ids.is_empty() {
                    continue;
                }
                tagged += 1;
                for app_id in app_ids {
                    let entry = counts.entry(app_id.clone()).or_insert_with(|| TagCount {
                        app_id,
                        pipelines: 0,
                        locations: Vec::new(),
                    });
                    entry.pipelines += 1;
                    entry.locations.push(TagLocation {
                        organization: org.name.clone(),
                        project: project.name.clone(),
                        pipeline: pipeline.name.clone(),
                    });
                }
            }
        }
    }

    let mut tags: Vec<TagCount> = counts.into_values().collect();
    for tag in &mut tags {
        tag.locations.sort();
    }
    tags.sort_by(|a, b| {
        b.pipelines
            .cmp(&a.pipelines)
            .then_with(|| a.app_id.cmp(&b.app_id))
    });

    info!(
        total_pipelines,
        tagged,
        unreadable,
        unique = tags.len(),
        "AppID scan complete"
    );
    Ok(TagReport {
        tags,
        total_pipelines,
        tagged,
        unreadable,
    })
}
