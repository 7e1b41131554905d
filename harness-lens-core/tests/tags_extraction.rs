use harness_lens_core::contract::{MockHarnessApi, Organization, Page, PipelineSummary, Project};
use harness_lens_core::tags::{extract_app_ids, run_scan};

#[test]
fn extracts_every_app_id_spelling() {
    let yaml = r#"
pipeline:
  name: build
  properties:
    appId: payments
    app_id: "billing"
    applicationId: 'ledger'
    application_id: accounts
    APPID: shouting
"#;

    let ids = extract_app_ids(yaml);

    for expected in ["payments", "billing", "ledger", "accounts", "shouting"] {
        assert!(ids.contains(expected), "missing {expected} in {ids:?}");
    }
}

#[test]
fn extracts_app_ids_from_the_tags_mapping() {
    let yaml = r#"
name: deploy
tags:
  team: payments-platform
  appID-code: "4711"
  app_id_legacy: billing
"#;

    let ids = extract_app_ids(yaml);

    assert!(ids.contains("4711"));
    assert!(ids.contains("billing"));
    assert!(!ids.contains("payments-platform"));
}

#[test]
fn falls_back_to_regex_when_yaml_does_not_parse() {
    // Unbalanced bracket: serde_yaml rejects this document.
    let yaml = "broken: [unclosed\nappId: survivor\n";

    let ids = extract_app_ids(yaml);

    assert!(ids.contains("survivor"));
}

#[test]
fn untagged_yaml_yields_no_ids() {
    let ids = extract_app_ids("pipeline:\n  name: plain\n");
    assert!(ids.is_empty());
}

fn single_org_api() -> MockHarnessApi {
    let mut api = MockHarnessApi::new();
    api.expect_organizations_page().returning(|_| {
        Ok(Page {
            content: vec![Organization {
                identifier: "org".to_string(),
                name: "Org".to_string(),
            }],
            last: true,
        })
    });
    api.expect_projects_page().returning(|_, _| {
        Ok(Page {
            content: vec![Project {
                identifier: "proj".to_string(),
                name: "Proj".to_string(),
            }],
            last: true,
        })
    });
    api
}

#[tokio::test]
async fn scan_counts_tagged_and_unreadable_pipelines() {
    let mut api = single_org_api();
    api.expect_pipelines_page().returning(|_, _, _| {
        Ok(Page {
            content: vec![
                PipelineSummary {
                    identifier: "tagged".to_string(),
                    name: "tagged".to_string(),
                },
                PipelineSummary {
                    identifier: "opaque".to_string(),
                    name: "opaque".to_string(),
                },
            ],
            last: true,
        })
    });
    api.expect_pipeline_yaml()
        .withf(|_, _, pipeline| pipeline == "tagged")
        .returning(|_, _, _| Ok(Some("stage:\n  appId: payments\n".to_string())));
    api.expect_pipeline_yaml()
        .withf(|_, _, pipeline| pipeline == "opaque")
        .returning(|_, _, _| Ok(None));

    let report = run_scan(&api).await.expect("scan should succeed");

    assert_eq!(report.total_pipelines, 2);
    assert_eq!(report.tagged, 1);
    assert_eq!(report.unreadable, 1);
    assert_eq!(report.tags.len(), 1);
    assert_eq!(report.tags[0].app_id, "payments");
    assert_eq!(report.tags[0].pipelines, 1);
    assert_eq!(report.tags[0].locations.len(), 1);
    assert_eq!(report.tags[0].locations[0].organization, "Org");
    assert_eq!(report.coverage(), 50.0);
    assert_eq!(report.most_used().map(|t| t.app_id.as_str()), Some("payments"));
}

#[tokio::test]
async fn a_failed_yaml_fetch_does_not_abort_the_scan() {
    let mut api = single_org_api();
    api.expect_pipelines_page().returning(|_, _, _| {
        Ok(Page {
            content: vec![
                PipelineSummary {
                    identifier: "flaky".to_string(),
                    name: "flaky".to_string(),
                },
                PipelineSummary {
                    identifier: "good".to_string(),
                    name: "good".to_string(),
                },
            ],
            last: true,
        })
    });
    api.expect_pipeline_yaml()
        .withf(|_, _, pipeline| pipeline == "flaky")
        .returning(|_, _, _| Err("pipeline endpoint returned 404".into()));
    api.expect_pipeline_yaml()
        .withf(|_, _, pipeline| pipeline == "good")
        .returning(|_, _, _| Ok(Some("tags:\n  appid: billing\n".to_string())));

    let report = run_scan(&api).await.expect("scan continues past YAML errors");

    assert_eq!(report.total_pipelines, 2);
    assert_eq!(report.unreadable, 1);
    assert_eq!(report.tagged, 1);
    assert_eq!(report.tags[0].app_id, "billing");
}

#[tokio::test]
async fn tags_are_sorted_by_usage_descending() {
    let mut api = single_org_api();
    api.expect_pipelines_page().returning(|_, _, _| {
        Ok(Page {
            content: (0..3)
                .map(|i| PipelineSummary {
                    identifier: format!("pipe{i}"),
                    name: format!("pipe{i}"),
                })
                .collect(),
            last: true,
        })
    });
    // Two pipelines carry "common", one carries "rare".
    api.expect_pipeline_yaml()
        .withf(|_, _, pipeline| pipeline == "pipe0")
        .returning(|_, _, _| Ok(Some("appId: common\n".to_string())));
    api.expect_pipeline_yaml()
        .withf(|_, _, pipeline| pipeline == "pipe1")
        .returning(|_, _, _| Ok(Some("appId: common\n".to_string())));
    api.expect_pipeline_yaml()
        .withf(|_, _, pipeline| pipeline == "pipe2")
        .returning(|_, _, _| Ok(Some("appId: rare\n".to_string())));

    let report = run_scan(&api).await.expect("scan should succeed");

    let order: Vec<&str> = report.tags.iter().map(|t| t.app_id.as_str()).collect();
    assert_eq!(order, vec!["common", "rare"]);
    assert_eq!(report.tags[0].pipelines, 2);
}
