use condeval_types::{CheckResult, Severity, ids};
use serde_json::Value;

/// A passing result. Severity is filled in from policy by the engine.
pub fn pass(name: String, check_id: &str, data: Value) -> CheckResult {
    CheckResult {
        name,
        check_id: check_id.to_string(),
        code: ids::CODE_OK.to_string(),
        passed: true,
        severity: Severity::Error,
        detail: None,
        help: None,
        fingerprint: None,
        data,
    }
}

pub fn fail(
    name: String,
    check_id: &str,
    code: &str,
    detail: String,
    help: &str,
    data: Value,
) -> CheckResult {
    CheckResult {
        name,
        check_id: check_id.to_string(),
        code: code.to_string(),
        passed: false,
        severity: Severity::Error,
        detail: Some(detail),
        help: Some(help.to_string()),
        fingerprint: None,
        data,
    }
}
