use crate::model::{ParamValue, ParameterAssignment, TemplateModel};
use crate::policy::{CheckPolicy, EffectiveConfig, FailOn};
use crate::scenario::{FeatureExpectation, Scenario};
use condeval_types::Severity;
use std::collections::BTreeMap;

/// The S3 bucket template shared with the CLI fixtures.
pub fn s3_template() -> &'static str {
    include_str!("../../../tests/fixtures/s3-bucket/template.yaml")
}

pub fn model(yaml: &str) -> TemplateModel {
    let doc = condeval_template::parse(yaml).expect("template should parse");
    TemplateModel::build(doc).expect("template should build")
}

pub fn assignment(pairs: &[(&str, &str)]) -> ParameterAssignment {
    pairs
        .iter()
        .map(|(k, v)| (*k, ParamValue::from(*v)))
        .collect()
}

pub fn scenario(name: &str, params: &[(&str, &str)], expect: &[(&str, &str, bool)]) -> Scenario {
    Scenario {
        name: name.to_string(),
        assignment: assignment(params),
        expectations: expect
            .iter()
            .map(|(feature, condition, expected)| {
                FeatureExpectation::new(*feature, *condition, *expected)
            })
            .collect(),
        expected_resources: Vec::new(),
        expected_properties: Vec::new(),
    }
}

pub fn config_with_check(check_id: &str, severity: Severity) -> EffectiveConfig {
    let mut checks = BTreeMap::new();
    checks.insert(check_id.to_string(), CheckPolicy::enabled(severity));
    EffectiveConfig {
        profile: "test".to_string(),
        fail_on: FailOn::Error,
        checks,
        dependencies: BTreeMap::new(),
    }
}

/// Every known check enabled at `severity`.
pub fn config_all(severity: Severity) -> EffectiveConfig {
    let checks = condeval_types::explain::all_check_ids()
        .iter()
        .map(|id| (id.to_string(), CheckPolicy::enabled(severity)))
        .collect();
    EffectiveConfig {
        profile: "test".to_string(),
        fail_on: FailOn::Error,
        checks,
        dependencies: BTreeMap::new(),
    }
}
