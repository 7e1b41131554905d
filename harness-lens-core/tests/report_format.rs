use serde_json::json;

use harness_lens_core::census::{CensusReport, OrgCount, ProjectCount};
use harness_lens_core::diff::diff_configs;
use harness_lens_core::report::{
    render_census, render_config_diff, render_no_overrides, render_tag_report,
};
use harness_lens_core::tags::{TagCount, TagLocation, TagReport};

fn sample_census() -> CensusReport {
    CensusReport {
        organizations: vec![
            OrgCount {
                identifier: "org1".to_string(),
                name: "Org1".to_string(),
                pipelines: 5,
                projects: vec![
                    ProjectCount {
                        identifier: "a".to_string(),
                        name: "ProjA".to_string(),
                        pipelines: 3,
                    },
                    ProjectCount {
                        identifier: "b".to_string(),
                        name: "ProjB".to_string(),
                        pipelines: 2,
                    },
                ],
            },
            OrgCount {
                identifier: "org2".to_string(),
                name: "Org2".to_string(),
                pipelines: 5,
                projects: vec![ProjectCount {
                    identifier: "c".to_string(),
                    name: "ProjC".to_string(),
                    pipelines: 5,
                }],
            },
        ],
        total_pipelines: 10,
    }
}

#[test]
fn census_rows_are_aligned_with_percentages() {
    let rendered = render_census(&sample_census());

    assert!(rendered.contains("PIPELINE COUNT SUMMARY"));
    assert!(rendered.contains("Org1                           |     5 pipelines ( 50.0%)"));
    assert!(rendered.contains("Org2                           |     5 pipelines ( 50.0%)"));
    assert!(rendered.contains("TOTAL                          |    10 pipelines"));
    assert!(rendered.contains("Average pipelines per organization: 5.0"));
}

#[test]
fn diff_report_lists_sections_and_summary() {
    let diff = diff_configs(
        &json!({"a": 1, "b": 2, "gone": true}),
        &json!({"a": 1, "b": 3, "c": 4}),
    );

    let rendered = render_config_diff(&diff);

    assert!(rendered.contains("HARNESS CONFIGURATION COMPARISON"));
    assert!(rendered.contains("OVERRIDDEN VALUES:"));
    assert!(rendered.contains("Key: b"));
    assert!(rendered.contains("  Default:  2"));
    assert!(rendered.contains("  Customer: 3"));
    assert!(rendered.contains("CUSTOMER-ONLY SETTINGS:"));
    assert!(rendered.contains("DEFAULT-ONLY SETTINGS (not overridden):"));
    assert!(rendered.contains("UNCHANGED VALUES: 1 settings match"));
    assert!(rendered.contains("SUMMARY:"));
    assert!(rendered.contains("  Overridden values: 1"));
    assert!(rendered.contains("  Customer-only settings: 1"));
    assert!(rendered.contains("  Default-only settings: 1"));
    assert!(rendered.contains("  Unchanged values: 1"));
}

#[test]
fn no_overrides_report_prints_the_default_document() {
    let rendered = render_no_overrides(&json!({"memory": "512Mi"}));

    assert!(rendered.contains("using the DEFAULT configuration (no overrides)"));
    assert!(rendered.contains("\"memory\": \"512Mi\""));
}

#[test]
fn tag_report_includes_breakdown_and_statistics() {
    let report = TagReport {
        tags: vec![TagCount {
            app_id: "payments".to_string(),
            pipelines: 2,
            locations: vec![
                TagLocation {
                    organization: "Org1".to_string(),
                    project: "ProjA".to_string(),
                    pipeline: "build".to_string(),
                },
                TagLocation {
                    organization: "Org1".to_string(),
                    project: "ProjB".to_string(),
                    pipeline: "deploy".to_string(),
                },
            ],
        }],
        total_pipelines: 4,
        tagged: 2,
        unreadable: 1,
    };

    let rendered = render_tag_report(&report);

    assert!(rendered.contains("PIPELINE APPID ANALYSIS"));
    assert!(rendered.contains("payments                       |   2 pipelines ( 50.0%)"));
    assert!(rendered.contains("Org1 -> ProjA -> build"));
    assert!(rendered.contains("Total pipelines found: 4"));
    assert!(rendered.contains("Pipelines with appIDs: 2"));
    assert!(rendered.contains("Pipelines without readable YAML: 1"));
    assert!(rendered.contains("AppID coverage: 50.0%"));
    assert!(rendered.contains("Most used appID: payments (2 pipelines)"));
}

#[test]
fn empty_tag_report_states_that_nothing_was_found() {
    let report = TagReport::default();

    let rendered = render_tag_report(&report);

    assert!(rendered.contains("No appIDs found in any pipeline YAML"));
    assert!(rendered.contains("Total pipelines found: 0"));
    assert!(!rendered.contains("AppID coverage"));
}
