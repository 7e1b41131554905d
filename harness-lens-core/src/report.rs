//! # report: Console rendering for diff, census and tag results
//!
//! Every renderer is a pure function from a computed result to aligned
//! fixed-width text, so the same computation can back other renderings.
//! Sections use `=` and `-` rules with counts and one-decimal percentages.

use std::fmt::Write;

use serde_json::Value;

use crate::census::CensusReport;
use crate::diff::ConfigDiff;
use crate::tags::TagReport;

const WIDE_RULE: usize = 80;
const RULE: usize = 50;

/// Scalar strings render bare; everything else renders as JSON.
fn fmt_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders the four-way configuration comparison.
pub fn render_config_diff(diff: &ConfigDiff) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(WIDE_RULE));
    let _ = writeln!(out, "HARNESS CONFIGURATION COMPARISON");
    let _ = writeln!(out, "{}", "=".repeat(WIDE_RULE));
    let _ = writeln!(out, "Customer config has overrides. Analyzing differences...");
    let _ = writeln!(out);

    if !diff.overridden.is_empty() {
        let _ = writeln!(out, "OVERRIDDEN VALUES:");
        let _ = writeln!(out, "{}", "-".repeat(RULE));
        for entry in &diff.overridden {
            let _ = writeln!(out, "Key: {}", entry.key);
            let _ = writeln!(out, "  Default:  {}", fmt_value(&entry.default));
            let _ = writeln!(out, "  Customer: {}", fmt_value(&entry.customer));
            let _ = writeln!(out);
        }
    }

    if !diff.customer_only.is_empty() {
        let _ = writeln!(out, "CUSTOMER-ONLY SETTINGS:");
        let _ = writeln!(out, "{}", "-".repeat(RULE));
        for entry in &diff.customer_only {
            let _ = writeln!(out, "Key: {}", entry.key);
            let _ = writeln!(out, "  Value: {}", fmt_value(&entry.value));
            let _ = writeln!(out);
        }
    }

    if !diff.default_only.is_empty() {
        let _ = writeln!(out, "DEFAULT-ONLY SETTINGS (not overridden):");
        let _ = writeln!(out, "{}", "-".repeat(RULE));
        for entry in &diff.default_only {
            let _ = writeln!(out, "Key: {}", entry.key);
            let _ = writeln!(out, "  Value: {}", fmt_value(&entry.value));
            let _ = writeln!(out);
        }
    }

    if !diff.unchanged.is_empty() {
        let _ = writeln!(
            out,
            "UNCHANGED VALUES: {} settings match between default and customer config",
            diff.unchanged.len()
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "=".repeat(RULE));
    let _ = writeln!(out, "SUMMARY:");
    let _ = writeln!(out, "  Overridden values: {}", diff.overridden.len());
    let _ = writeln!(out, "  Customer-only settings: {}", diff.customer_only.len());
    let _ = writeln!(out, "  Default-only settings: {}", diff.default_only.len());
    let _ = writeln!(out, "  Unchanged values: {}", diff.unchanged.len());
    out
}

/// Renders the "no overrides" result: the customer runs the default
/// configuration, which is printed in full.
pub fn render_no_overrides(default_doc: &Value) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(WIDE_RULE));
    let _ = writeln!(out, "HARNESS CONFIGURATION COMPARISON");
    let _ = writeln!(out, "{}", "=".repeat(WIDE_RULE));
    let _ = writeln!(
        out,
        "RESULT: customer config is using the DEFAULT configuration (no overrides)"
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Default configuration:");
    let pretty = serde_json::to_string_pretty(default_doc)
        .unwrap_or_else(|_| default_doc.to_string());
    let _ = writeln!(out, "{pretty}");
    out
}

/// Renders the pipelines-per-organization summary, busiest first.
pub fn render_census(report: &CensusReport) -> String {
    let mut organizations: Vec<_> = report.organizations.iter().collect();
    organizations.sort_by(|a, b| {
        b.pipelines
            .cmp(&a.pipelines)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(RULE));
    let _ = writeln!(out, "PIPELINE COUNT SUMMARY");
    let _ = writeln!(out, "{}", "=".repeat(RULE));
    for org in &organizations {
        let _ = writeln!(
            out,
            "{:<30} | {:>5} pipelines ({:>5.1}%)",
            org.name,
            org.pipelines,
            report.share(org.pipelines)
        );
    }
    let _ = writeln!(out, "{}", "-".repeat(RULE));
    let _ = writeln!(
        out,
        "{:<30} | {:>5} pipelines",
        "TOTAL", report.total_pipelines
    );
    let _ = writeln!(out, "{}", "=".repeat(RULE));

    if !report.organizations.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Average pipelines per organization: {:.1}",
            report.average_per_organization()
        );
        if let Some(busiest) = report.busiest() {
            let _ = writeln!(
                out,
                "Organization with most pipelines: {} ({} pipelines)",
                busiest.name, busiest.pipelines
            );
        }
    }
    out
}

/// Renders appID usage: summary rows, per-appID breakdown, statistics.
pub fn render_tag_report(report: &TagReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(70));
    let _ = writeln!(out, "PIPELINE APPID ANALYSIS");
    let _ = writeln!(out, "{}", "=".repeat(70));

    if report.tags.is_empty() {
        let _ = writeln!(out, "No appIDs found in any pipeline YAML");
    } else {
        let _ = writeln!(out, "APPID USAGE SUMMARY:");
        let _ = writeln!(out, "{}", "-".repeat(RULE));
        for tag in &report.tags {
            let _ = writeln!(
                out,
                "{:<30} | {:>3} pipelines ({:>5.1}%)",
                tag.app_id,
                tag.pipelines,
                report.share(tag.pipelines)
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "DETAILED BREAKDOWN:");
        let _ = writeln!(out, "{}", "-".repeat(RULE));
        for tag in &report.tags {
            let _ = writeln!(out);
            let _ = writeln!(out, "AppID: {} ({} pipelines)", tag.app_id, tag.pipelines);
            for location in &tag.locations {
                let _ = writeln!(
                    out,
                    "    {} -> {} -> {}",
                    location.organization, location.project, location.pipeline
                );
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "=".repeat(70));
    let _ = writeln!(out, "SUMMARY STATISTICS");
    let _ = writeln!(out, "{}", "=".repeat(70));
    let _ = writeln!(out, "Total pipelines found: {}", report.total_pipelines);
    let _ = writeln!(out, "Pipelines with appIDs: {}", report.tagged);
    let _ = writeln!(out, "Pipelines without readable YAML: {}", report.unreadable);
    let _ = writeln!(out, "Unique appIDs found: {}", report.tags.len());
    if report.total_pipelines > 0 {
        let _ = writeln!(out, "AppID coverage: {:.1}%", report.coverage());
    }
    if let Some(most_used) = report.most_used() {
        let _ = writeln!(
            out,
            "Most used appID: {} ({} pipelines)",
            most_used.app_id, most_used.pipelines
        );
    }
    out
}
