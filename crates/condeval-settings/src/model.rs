use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `condeval.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SuiteConfigV1 {
    /// Optional schema string for tooling (`condeval.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// When to fail the check: `error` (default) or `warning`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// Feature name -> condition name.
    #[serde(default)]
    pub features: BTreeMap<String, String>,

    /// Map of check_id -> config.
    #[serde(default)]
    pub checks: BTreeMap<String, CheckConfig>,

    /// Condition name -> conditions it must depend on, directly or transitively.
    #[serde(default)]
    pub dependencies: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub scenarios: Vec<ScenarioConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckConfig {
    /// Override preset enable/disable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Override preset severity: `info`, `warning`, `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioConfig {
    pub name: String,

    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterInput>,

    /// Feature (or condition) name -> expected outcome.
    #[serde(default)]
    pub expect: BTreeMap<String, bool>,

    #[serde(default)]
    pub expected_resources: Vec<String>,

    #[serde(default)]
    pub properties: Vec<PropertyConfig>,
}

/// Expected state of a resource property (`[[scenarios.properties]]`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PropertyConfig {
    pub resource: String,

    /// Dotted path below `Properties`; numeric segments index lists.
    pub path: String,

    /// Whether the property must exist. Defaults to `true`.
    #[serde(default = "default_present")]
    pub present: bool,

    /// Exact text the property must resolve to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<ParameterScalar>,
}

fn default_present() -> bool {
    true
}

/// A parameter value as written in TOML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ParameterInput {
    Scalar(ParameterScalar),
    List(Vec<ParameterScalar>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ParameterScalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl ParameterScalar {
    /// Canonical text: booleans lowercase, integral numbers without a fraction.
    pub fn text(&self) -> String {
        match self {
            ParameterScalar::Bool(b) => b.to_string(),
            ParameterScalar::Integer(i) => i.to_string(),
            ParameterScalar::Float(f) => condeval_domain::value::number_text(*f),
            ParameterScalar::String(s) => s.clone(),
        }
    }
}
