use super::{
    condition_dependencies, conditions_defined, outputs_documented, required_sections,
    resource_types, run_all,
};
use crate::test_support::{config_all, config_with_check, model, s3_template};
use condeval_types::{Severity, ids};

const BROKEN: &str = r#"
AWSTemplateFormatVersion: "2010-09-09"
Conditions:
  Known: !Equals [!Ref Env, prod]
Resources:
  Bucket:
    Type: AWS::S3::Bucket
    Condition: Ghost
    Properties:
      Tags: !If [Phantom, [], !Ref AWS::NoValue]
  Untyped:
    Properties: {}
  Gated:
    Type: AWS::SNS::Topic
    Condition: Known
Outputs:
  Documented:
    Description: fine
    Value: !Ref Bucket
  Bare:
    Value: !Ref Bucket
    Export:
      Value: nameless
"#;

#[test]
fn s3_template_passes_every_structure_check() {
    let m = model(s3_template());
    let mut out = Vec::new();
    run_all(&m, &config_all(Severity::Error), &mut out);

    assert!(!out.is_empty());
    let failed: Vec<_> = out.iter().filter(|c| !c.passed).collect();
    assert!(failed.is_empty(), "{failed:?}");
}

#[test]
fn required_sections_reports_each_missing_section() {
    let cfg = config_with_check(ids::CHECK_TEMPLATE_REQUIRED_SECTIONS, Severity::Warning);
    let mut out = Vec::new();
    required_sections::run(&model(BROKEN), &cfg, &mut out);

    assert_eq!(out.len(), 4);
    let missing: Vec<_> = out
        .iter()
        .filter(|c| !c.passed)
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(missing, vec!["section Description", "section Parameters"]);
    assert!(out.iter().all(|c| c.severity == Severity::Warning));
    assert!(
        out.iter()
            .filter(|c| !c.passed)
            .all(|c| c.code == ids::CODE_MISSING_SECTION)
    );
}

#[test]
fn conditions_defined_covers_gates_and_if_operands() {
    let cfg = config_with_check(ids::CHECK_TEMPLATE_CONDITIONS_DEFINED, Severity::Error);
    let mut out = Vec::new();
    conditions_defined::run(&model(BROKEN), &cfg, &mut out);

    let names: Vec<_> = out.iter().map(|c| (c.name.as_str(), c.passed)).collect();
    assert_eq!(
        names,
        vec![
            ("condition Ghost", false),
            ("condition Known", true),
            ("condition Phantom", false),
        ]
    );
    let ghost = &out[0];
    assert_eq!(ghost.code, ids::CODE_UNDEFINED_CONDITION);
    assert_eq!(ghost.data["referenced_by"][0], "Resources.Bucket");
}

#[test]
fn outputs_documented_checks_description_value_and_export_name() {
    let cfg = config_with_check(ids::CHECK_TEMPLATE_OUTPUTS_DOCUMENTED, Severity::Error);
    let mut out = Vec::new();
    outputs_documented::run(&model(BROKEN), &cfg, &mut out);

    let failed: Vec<_> = out
        .iter()
        .filter(|c| !c.passed)
        .map(|c| c.code.as_str())
        .collect();
    assert_eq!(
        failed,
        vec![ids::CODE_OUTPUT_MISSING_DESCRIPTION, ids::CODE_EXPORT_MISSING_NAME]
    );
    // Bare: description, value, export name. Documented: description, value.
    assert_eq!(out.len(), 5);
}

#[test]
fn resource_types_flags_untyped_resources() {
    let cfg = config_with_check(ids::CHECK_TEMPLATE_RESOURCE_TYPES, Severity::Error);
    let mut out = Vec::new();
    resource_types::run(&model(BROKEN), &cfg, &mut out);

    assert_eq!(out.len(), 3);
    let failed: Vec<_> = out.iter().filter(|c| !c.passed).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].name, "resource Untyped type");
    assert_eq!(failed[0].code, ids::CODE_MISSING_TYPE);
}

#[test]
fn condition_dependencies_follow_the_graph_transitively() {
    let mut cfg = config_with_check(ids::CHECK_TEMPLATE_CONDITION_DEPENDENCIES, Severity::Error);
    cfg.dependencies.insert(
        "TransitionToGlacierEnabled".to_string(),
        vec!["S3LifecycleConfigurationEnabled".to_string()],
    );
    cfg.dependencies.insert(
        "HasNotificationFilters".to_string(),
        vec![
            "HasNotificationPrefix".to_string(),
            "S3LifecycleConfigurationEnabled".to_string(),
        ],
    );
    cfg.dependencies.insert(
        "Missing".to_string(),
        vec!["S3LifecycleConfigurationEnabled".to_string()],
    );

    let mut out = Vec::new();
    condition_dependencies::run(&model(s3_template()), &cfg, &mut out);

    let results: Vec<_> = out
        .iter()
        .map(|c| (c.name.as_str(), c.code.as_str()))
        .collect();
    assert_eq!(
        results,
        vec![
            (
                "condition HasNotificationFilters depends on HasNotificationPrefix",
                ids::CODE_OK
            ),
            (
                "condition HasNotificationFilters depends on S3LifecycleConfigurationEnabled",
                ids::CODE_MISSING_DEPENDENCY
            ),
            (
                "condition Missing depends on S3LifecycleConfigurationEnabled",
                ids::CODE_UNDEFINED_CONDITION
            ),
            (
                "condition TransitionToGlacierEnabled depends on S3LifecycleConfigurationEnabled",
                ids::CODE_OK
            ),
        ]
    );
    assert_eq!(out[0].data["direct"][0], "HasNotificationPrefix");
}

#[test]
fn disabled_checks_emit_nothing() {
    let cfg = config_with_check(ids::CHECK_SCENARIO_FEATURE, Severity::Error);
    let mut out = Vec::new();
    run_all(&model(BROKEN), &cfg, &mut out);
    assert!(out.is_empty());
}
