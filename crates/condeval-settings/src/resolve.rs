use crate::model::{ParameterInput, ParameterScalar, PropertyConfig, ScenarioConfig, SuiteConfigV1};
use crate::presets;
use anyhow::Context;
use condeval_domain::model::{ParamValue, ParameterAssignment};
use condeval_domain::policy::{CheckPolicy, EffectiveConfig, FailOn};
use condeval_domain::scenario::{FeatureExpectation, PropertyExpectation, PropertyState, Scenario};
use condeval_types::Severity;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    pub scenarios: Vec<Scenario>,
}

pub fn resolve_config(cfg: SuiteConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile);

    // per-check overrides
    for (check_id, cc) in cfg.checks.iter() {
        let entry = effective
            .checks
            .entry(check_id.clone())
            .or_insert_with(CheckPolicy::disabled);

        if let Some(enabled) = cc.enabled {
            entry.enabled = enabled;
        }
        if let Some(sev) = cc.severity.as_deref() {
            entry.severity =
                parse_severity(sev).with_context(|| format!("invalid severity for {check_id}"))?;
        }
    }

    // fail_on override from config
    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    effective.dependencies = cfg.dependencies.clone();

    let mut seen = BTreeSet::new();
    let mut scenarios = Vec::with_capacity(cfg.scenarios.len());
    for sc in &cfg.scenarios {
        if sc.name.trim().is_empty() {
            anyhow::bail!("scenario #{} has an empty name", scenarios.len() + 1);
        }
        if !seen.insert(sc.name.as_str()) {
            anyhow::bail!("duplicate scenario name: {}", sc.name);
        }
        let scenario = resolve_scenario(sc, &cfg.features)
            .with_context(|| format!("invalid scenario {}", sc.name))?;
        scenarios.push(scenario);
    }

    Ok(ResolvedConfig {
        effective,
        scenarios,
    })
}

fn resolve_scenario(
    sc: &ScenarioConfig,
    features: &BTreeMap<String, String>,
) -> anyhow::Result<Scenario> {
    let assignment: ParameterAssignment = sc
        .parameters
        .iter()
        .map(|(name, input)| (name.clone(), param_value(input)))
        .collect();

    let expectations = sc
        .expect
        .iter()
        .map(|(feature, expected)| {
            // Unmapped feature names are taken as condition names.
            let condition = features.get(feature).unwrap_or(feature);
            FeatureExpectation::new(feature.clone(), condition.clone(), *expected)
        })
        .collect();

    let expected_properties = sc
        .properties
        .iter()
        .map(property_expectation)
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Scenario {
        name: sc.name.clone(),
        assignment,
        expectations,
        expected_resources: sc.expected_resources.clone(),
        expected_properties,
    })
}

fn property_expectation(pc: &PropertyConfig) -> anyhow::Result<PropertyExpectation> {
    if pc.path.split('.').all(str::is_empty) {
        anyhow::bail!("property of {} has an empty path", pc.resource);
    }
    let expected = match (&pc.equals, pc.present) {
        (Some(_), false) => anyhow::bail!(
            "property {}.{} sets `equals` with `present = false`",
            pc.resource,
            pc.path
        ),
        (Some(value), true) => PropertyState::Equals(value.text()),
        (None, true) => PropertyState::Present,
        (None, false) => PropertyState::Absent,
    };
    Ok(PropertyExpectation {
        resource: pc.resource.clone(),
        path: pc.path.clone(),
        expected,
    })
}

fn param_value(input: &ParameterInput) -> ParamValue {
    match input {
        ParameterInput::Scalar(ParameterScalar::Integer(i)) => ParamValue::Number(*i as f64),
        ParameterInput::Scalar(ParameterScalar::Float(f)) => ParamValue::Number(*f),
        ParameterInput::Scalar(scalar) => ParamValue::String(scalar.text()),
        ParameterInput::List(items) => {
            ParamValue::List(items.iter().map(ParameterScalar::text).collect())
        }
    }
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "info" => Ok(Severity::Info),
        "warning" | "warn" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => anyhow::bail!("unknown severity: {other} (expected info|warning|error)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}
