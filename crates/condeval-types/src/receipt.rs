use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use time::OffsetDateTime;

/// Stable schema identifier for condeval reports.
pub const SCHEMA_REPORT_V1: &str = "condeval.report.v1";

/// Severity is intentionally small: it maps cleanly to CI signals.
///
/// Only failed checks carry meaning here; a passing check keeps the severity its policy
/// would have reported so the report stays uniform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

/// One named check and its outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckResult {
    /// Human-readable check name, unique within its list.
    pub name: String,
    pub check_id: String,
    pub code: String,
    pub passed: bool,
    pub severity: Severity,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Stable identifier for failed checks. A hash of
    /// `check_id + code + scenario + subject`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Check-specific structured payload (kept open-ended for forward compatibility).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

impl CheckResult {
    pub fn is_failure(&self) -> bool {
        !self.passed
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckCounts {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
}

impl CheckCounts {
    pub fn from_checks(checks: &[CheckResult]) -> Self {
        let passed = checks.iter().filter(|c| c.passed).count() as u32;
        let total = checks.len() as u32;
        CheckCounts {
            total,
            passed,
            failed: total - passed,
        }
    }

    pub fn add(&mut self, other: CheckCounts) {
        self.total += other.total;
        self.passed += other.passed;
        self.failed += other.failed;
    }
}

/// Every check run for one parameter assignment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioReport {
    pub scenario: String,
    pub checks: Vec<CheckResult>,
    pub counts: CheckCounts,
}

impl ScenarioReport {
    pub fn new(scenario: impl Into<String>, checks: Vec<CheckResult>) -> Self {
        let counts = CheckCounts::from_checks(&checks);
        Self {
            scenario: scenario.into(),
            checks,
            counts,
        }
    }

    pub fn passed(&self) -> bool {
        self.counts.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Condeval-specific summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct SuiteData {
    pub template: String,
    pub profile: String,

    pub parameters_declared: u32,
    pub conditions_declared: u32,
    pub scenarios_run: u32,

    pub checks_total: u32,
    pub checks_passed: u32,
    pub checks_failed: u32,
}

/// A generic report envelope.
///
/// Keeping this generic allows condeval to embed suite-specific data while still enforcing a
/// stable outer shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = SuiteData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    /// Template-level structure checks, independent of any scenario.
    #[serde(default)]
    pub structure: Vec<CheckResult>,
    #[serde(default)]
    pub scenarios: Vec<ScenarioReport>,
    pub data: TData,
}

pub type CondevalReport = ReportEnvelope<SuiteData>;

#[cfg(test)]
mod tests {
    use super::*;

    fn check(name: &str, passed: bool) -> CheckResult {
        CheckResult {
            name: name.to_string(),
            check_id: "scenario.feature".to_string(),
            code: if passed { "ok" } else { "feature_mismatch" }.to_string(),
            passed,
            severity: Severity::Error,
            detail: None,
            help: None,
            fingerprint: None,
            data: JsonValue::Null,
        }
    }

    #[test]
    fn counts_are_derived_from_checks() {
        let report = ScenarioReport::new(
            "minimal",
            vec![check("a", true), check("b", false), check("c", true)],
        );
        assert_eq!(
            report.counts,
            CheckCounts {
                total: 3,
                passed: 2,
                failed: 1
            }
        );
        assert!(!report.passed());
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn null_data_and_empty_options_are_not_serialized() {
        let json = serde_json::to_value(check("a", true)).expect("serialize");
        let obj = json.as_object().expect("object");
        assert!(!obj.contains_key("data"));
        assert!(!obj.contains_key("detail"));
        assert!(!obj.contains_key("fingerprint"));
        assert_eq!(obj["severity"], "error");
    }
}
