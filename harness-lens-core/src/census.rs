//! High-level pipeline: walks the organization → project → pipeline
//! hierarchy and accumulates counts per organization.
//!
//! Every level is fetched through the vendor's page envelope; the loop stops
//! on an empty page or when the envelope flags the last page. Any failed
//! listing call propagates immediately and aborts the run; this is a
//! one-shot diagnostic, not a service, so there is no partial-report
//! recovery.

use tracing::info;

use crate::contract::{ApiError, HarnessApi, Organization, PipelineSummary, Project};

/// Pipeline count for a single project.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ProjectCount {
    pub identifier: String,
    pub name: String,
    pub pipelines: u64,
}

/// Pipeline count for an organization, with the per-project breakdown.
///
/// `pipelines` always equals the sum of the project counts.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct OrgCount {
    pub identifier: String,
    pub name: String,
    pub pipelines: u64,
    pub projects: Vec<ProjectCount>,
}

/// Aggregated census over the whole account.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct CensusReport {
    pub organizations: Vec<OrgCount>,
    pub total_pipelines: u64,
}

impl CensusReport {
    /// Share of the grand total, in percent.
    pub fn share(&self, pipelines: u64) -> f64 {
        if self.total_pipelines == 0 {
            0.0
        } else {
            pipelines as f64 / self.total_pipelines as f64 * 100.0
        }
    }

    pub fn average_per_organization(&self) -> f64 {
        if self.organizations.is_empty() {
            0.0
        } else {
            self.total_pipelines as f64 / self.organizations.len() as f64
        }
    }

    /// The organization with the most pipelines.
    pub fn busiest(&self) -> Option<&OrgCount> {
        self.organizations.iter().max_by_key(|org| org.pipelines)
    }
}

/// Fetches every organization in the account, page by page.
pub async fn collect_organizations<A>(api: &A) -> Result<Vec<Organization>, ApiError>
where
    A: HarnessApi + ?Sized,
{
    let mut organizations = Vec::new();
    let mut page_index = 0;
    loop {
        let page = api.organizations_page(page_index).await?;
        if page.content.is_empty() {
            break;
        }
        organizations.extend(page.content);
        if page.last {
            break;
        }
        page_index += 1;
    }
    Ok(organizations)
}

/// Fetches every project within an organization, page by page.
pub async fn collect_projects<A>(api: &A, org: &str) -> Result<Vec<Project>, ApiError>
where
    A: HarnessApi + ?Sized,
{
    let mut projects = Vec::new();
    let mut page_index = 0;
    loop {
        let page = api.projects_page(org, page_index).await?;
        if page.content.is_empty() {
            break;
        }
        projects.extend(page.content);
        if page.last {
            break;
        }
        page_index += 1;
    }
    Ok(projects)
}

/// Fetches every pipeline within a project, page by page.
pub async fn collect_pipelines<A>(
    api: &A,
    org: &str,
    project: &str,
) -> Result<Vec<PipelineSummary>, ApiError>
where
    A: HarnessApi + ?Sized,
{
    let mut pipelines = Vec::new();
    let mut page_index = 0;
    loop {
        let page = api.pipelines_page(org, project, page_index).await?;
        if page.content.is_empty() {
            break;
        }
        pipelines.extend(page.content);
        if page.last {
            break;
        }
        page_index += 1;
    }
    Ok(pipelines)
}

/// Entrypoint: counts pipelines per organization across the account.
pub async fn run_census<A>(api: &A) -> Result<CensusReport, ApiError>
where
    A: HarnessApi + ?Sized,
{
    info!("Starting pipeline census");

    let organizations = collect_organizations(api).await?;
    info!(count = organizations.len(), "Fetched organizations");

    let mut report = CensusReport::default();
    for org in &organizations {
        let projects = collect_projects(api, &org.identifier).await?;
        info!(
            org = %org.identifier,
            projects = projects.len(),
            "Fetched projects for organization"
        );

        let mut org_count = OrgCount {
            identifier: org.identifier.clone(),
            name: org.name.clone(),
            pipelines: 0,
            projects: Vec::with_capacity(projects.len()),
        };
        for project in &projects {
            let pipelines = collect_pipelines(api, &org.identifier, &project.identifier).await?;
            org_count.pipelines += pipelines.len() as u64;
            org_count.projects.push(ProjectCount {
                identifier: project.identifier.clone(),
                name: project.name.clone(),
                pipelines: pipelines.len() as u64,
            });
        }

        info!(
            org = %org.identifier,
            pipelines = org_count.pipelines,
            "Organization total"
        );
        report.total_pipelines += org_count.pipelines;
        report.organizations.push(org_count);
    }

    Ok(report)
}
