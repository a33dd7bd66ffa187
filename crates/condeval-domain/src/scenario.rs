use crate::checks::utils::{fail, pass};
use crate::constraints::{ViolationKind, validate};
use crate::eval::Evaluator;
use crate::model::{ParamValue, ParameterAssignment, TemplateModel, is_pseudo_parameter};
use crate::value::Value;
use condeval_types::{CheckResult, ScenarioReport, ids};
use serde_json::json;

/// Expected outcome of one feature, identified by the condition that gates it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureExpectation {
    pub feature: String,
    pub condition: String,
    pub expected: bool,
}

impl FeatureExpectation {
    pub fn new(feature: impl Into<String>, condition: impl Into<String>, expected: bool) -> Self {
        Self {
            feature: feature.into(),
            condition: condition.into(),
            expected,
        }
    }
}

/// Expected state of one resource property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyState {
    Absent,
    Present,
    /// Present and resolving to this text.
    Equals(String),
}

/// A property of a resource, addressed by a dotted path below `Properties`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyExpectation {
    pub resource: String,
    pub path: String,
    pub expected: PropertyState,
}

/// One parameter assignment plus the outcomes it should produce.
#[derive(Clone, Debug, Default)]
pub struct Scenario {
    pub name: String,
    pub assignment: ParameterAssignment,
    pub expectations: Vec<FeatureExpectation>,
    /// Resources that must be declared and active under the assignment.
    pub expected_resources: Vec<String>,
    pub expected_properties: Vec<PropertyExpectation>,
}

/// Run every expectation and constraint check of one scenario.
///
/// Checks never stop early: every expectation, every assigned parameter, every expected
/// resource and every expected property yields exactly one result. Severities are `error` here; the suite engine applies
/// configured policy afterwards.
pub fn run_scenario(scenario: &Scenario, model: &TemplateModel) -> ScenarioReport {
    let evaluator = Evaluator::new(model, &scenario.assignment);
    let mut checks = Vec::new();

    for expectation in &scenario.expectations {
        checks.push(feature_check(&evaluator, expectation));
    }
    for (name, value) in scenario.assignment.iter() {
        checks.push(parameter_check(model, name, value));
    }
    for resource in &scenario.expected_resources {
        checks.push(resource_check(&evaluator, model, resource));
    }
    for property in &scenario.expected_properties {
        checks.push(property_check(&evaluator, model, property));
    }

    let report = ScenarioReport::new(scenario.name.clone(), checks);
    tracing::debug!(
        scenario = %scenario.name,
        passed = report.counts.passed,
        failed = report.counts.failed,
        "ran scenario"
    );
    report
}

fn feature_check(evaluator: &Evaluator<'_>, expectation: &FeatureExpectation) -> CheckResult {
    let name = format!("feature {}", expectation.feature);
    let base = json!({
        "feature": expectation.feature,
        "condition": expectation.condition,
        "expected": expectation.expected,
    });

    match evaluator.evaluate_condition(&expectation.condition) {
        Ok(actual) if actual == expectation.expected => {
            let mut data = base;
            data["actual"] = json!(actual);
            pass(name, ids::CHECK_SCENARIO_FEATURE, data)
        }
        Ok(actual) => {
            let mut data = base;
            data["actual"] = json!(actual);
            fail(
                name,
                ids::CHECK_SCENARIO_FEATURE,
                ids::CODE_FEATURE_MISMATCH,
                format!(
                    "feature '{}' (condition '{}') expected {}, got {}",
                    expectation.feature, expectation.condition, expectation.expected, actual
                ),
                "Check the condition expression against the parameters this scenario supplies.",
                data,
            )
        }
        Err(err) => {
            let mut data = base;
            data["error"] = json!(err.to_string());
            fail(
                name,
                ids::CHECK_SCENARIO_FEATURE,
                ids::CODE_EVALUATION_ERROR,
                format!(
                    "feature '{}' (condition '{}') could not be evaluated: {err}",
                    expectation.feature, expectation.condition
                ),
                "Fix the referenced parameter, condition, or operand named in the message.",
                data,
            )
        }
    }
}

fn parameter_check(
    model: &TemplateModel,
    name: &str,
    value: &ParamValue,
) -> CheckResult {
    let check_name = format!("parameter {name}");
    let mut data = json!({
        "parameter": name,
        "value": value.text(),
    });

    if is_pseudo_parameter(name) && !model.parameters().contains(name) {
        data["pseudo"] = json!(true);
        return pass(check_name, ids::CHECK_SCENARIO_PARAMETER, data);
    }

    let violations = validate(name, value, model.parameters());
    if violations.is_empty() {
        return pass(check_name, ids::CHECK_SCENARIO_PARAMETER, data);
    }

    data["violations"] = violations
        .iter()
        .map(|v| {
            json!({
                "kind": v.kind.as_str(),
                "element": v.element,
                "message": v.message,
            })
        })
        .collect();

    let undeclared = violations
        .iter()
        .all(|v| v.kind == ViolationKind::UndeclaredParameter);
    let (code, help) = if undeclared {
        (
            ids::CODE_UNDECLARED_PARAMETER,
            "Remove the value from the scenario or declare the parameter in the template.",
        )
    } else {
        let help = model
            .parameters()
            .get(name)
            .and_then(|p| p.constraint_description.as_deref())
            .unwrap_or("Supply a value that satisfies the declared constraints.");
        (ids::CODE_CONSTRAINT_VIOLATION, help)
    };

    let detail = violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    fail(
        check_name,
        ids::CHECK_SCENARIO_PARAMETER,
        code,
        detail,
        help,
        data,
    )
}

fn resource_check(evaluator: &Evaluator<'_>, model: &TemplateModel, logical_id: &str) -> CheckResult {
    let name = format!("resource {logical_id}");
    let Some(resource) = model.resource(logical_id) else {
        return fail(
            name,
            ids::CHECK_SCENARIO_RESOURCE,
            ids::CODE_RESOURCE_MISSING,
            format!("resource '{logical_id}' is not declared"),
            "Declare the resource or fix the name in the scenario.",
            json!({ "resource": logical_id }),
        );
    };

    let mut data = json!({
        "resource": logical_id,
        "condition": resource.condition,
    });
    match evaluator.is_resource_active(logical_id) {
        Ok(true) => pass(name, ids::CHECK_SCENARIO_RESOURCE, data),
        Ok(false) => fail(
            name,
            ids::CHECK_SCENARIO_RESOURCE,
            ids::CODE_RESOURCE_INACTIVE,
            format!(
                "resource '{logical_id}' is not created: condition '{}' is false",
                resource.condition.as_deref().unwrap_or_default()
            ),
            "Adjust the scenario parameters or the resource-level Condition.",
            data,
        ),
        Err(err) => {
            data["error"] = json!(err.to_string());
            fail(
                name,
                ids::CHECK_SCENARIO_RESOURCE,
                ids::CODE_EVALUATION_ERROR,
                format!("resource '{logical_id}' condition could not be evaluated: {err}"),
                "Fix the resource-level Condition named in the message.",
                data,
            )
        }
    }
}

fn property_check(
    evaluator: &Evaluator<'_>,
    model: &TemplateModel,
    expectation: &PropertyExpectation,
) -> CheckResult {
    let PropertyExpectation {
        resource,
        path,
        expected,
    } = expectation;
    let name = format!("property {resource}.{path}");
    let wanted = match expected {
        PropertyState::Absent => "absent".to_string(),
        PropertyState::Present => "present".to_string(),
        PropertyState::Equals(text) => format!("{text:?}"),
    };
    let mut data = json!({
        "resource": resource,
        "path": path,
        "expected": wanted,
    });

    if model.resource(resource).is_none() {
        return fail(
            name,
            ids::CHECK_SCENARIO_PROPERTY,
            ids::CODE_RESOURCE_MISSING,
            format!("resource '{resource}' is not declared"),
            "Declare the resource or fix the name in the scenario.",
            data,
        );
    }

    // Properties of a resource that is not created are absent.
    let resolved = evaluator.is_resource_active(resource).and_then(|active| {
        if active {
            evaluator.resolve_resource_property(resource, path)
        } else {
            Ok(None)
        }
    });
    let actual = match resolved {
        Ok(actual) => actual,
        Err(err) => {
            data["error"] = json!(err.to_string());
            return fail(
                name,
                ids::CHECK_SCENARIO_PROPERTY,
                ids::CODE_EVALUATION_ERROR,
                format!("property '{resource}.{path}' could not be resolved: {err}"),
                "Fix the condition or expression named in the message.",
                data,
            );
        }
    };
    data["actual"] = actual
        .as_ref()
        .map_or(serde_json::Value::Null, |v| json!(v.to_string()));

    let matched = match (expected, &actual) {
        (PropertyState::Absent, None) => true,
        (PropertyState::Present, Some(_)) => true,
        (PropertyState::Equals(text), Some(value)) => property_text(value).as_ref() == Some(text),
        _ => false,
    };
    if matched {
        return pass(name, ids::CHECK_SCENARIO_PROPERTY, data);
    }

    let found = actual.map_or_else(|| "absent".to_string(), |v| v.to_string());
    fail(
        name,
        ids::CHECK_SCENARIO_PROPERTY,
        ids::CODE_PROPERTY_MISMATCH,
        format!("property '{resource}.{path}' expected {wanted}, got {found}"),
        "Check the Fn::If that selects the property and the condition it names.",
        data,
    )
}

/// Text compared against an expected property value: scalars by canonical text, lists of
/// scalars comma-joined.
fn property_text(value: &Value) -> Option<String> {
    match value {
        Value::List(items) => items
            .iter()
            .map(Value::scalar_text)
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.join(",")),
        other => other.scalar_text(),
    }
}
