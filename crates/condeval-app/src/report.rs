use anyhow::Context;
use condeval_render::{
    RenderableCheck, RenderableData, RenderableReport, RenderableScenario, RenderableSeverity,
    RenderableVerdictStatus,
};
use condeval_types::{
    CheckResult, CondevalReport, SCHEMA_REPORT_V1, Severity, SuiteData, ToolMeta, Verdict, ids,
};
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<CondevalReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema}");
    }

    serde_json::from_value(value).context("parse condeval v1 report")
}

pub fn serialize_report(report: &CondevalReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &CondevalReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Warn => RenderableVerdictStatus::Warn,
            Verdict::Fail => RenderableVerdictStatus::Fail,
        },
        data: RenderableData {
            template: report.data.template.clone(),
            profile: report.data.profile.clone(),
            checks_total: report.data.checks_total,
            checks_passed: report.data.checks_passed,
            checks_failed: report.data.checks_failed,
        },
        structure_total: report.structure.len() as u32,
        structure_failures: failures(&report.structure),
        scenarios: report
            .scenarios
            .iter()
            .map(|s| RenderableScenario {
                name: s.scenario.clone(),
                passed: s.counts.passed,
                failed: s.counts.failed,
                failures: failures(&s.checks),
            })
            .collect(),
    }
}

fn failures(checks: &[CheckResult]) -> Vec<RenderableCheck> {
    checks
        .iter()
        .filter(|c| !c.passed)
        .map(|c| RenderableCheck {
            severity: match c.severity {
                Severity::Info => RenderableSeverity::Info,
                Severity::Warning => RenderableSeverity::Warning,
                Severity::Error => RenderableSeverity::Error,
            },
            check_id: c.check_id.clone(),
            code: c.code.clone(),
            name: c.name.clone(),
            detail: c.detail.clone(),
            help: c.help.clone(),
        })
        .collect()
}

/// A failing report carrying one `tool.runtime` check, written when the run cannot complete.
pub fn runtime_error_report(message: &str) -> CondevalReport {
    let now = OffsetDateTime::now_utc();
    CondevalReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "condeval".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        structure: vec![CheckResult {
            name: "condeval".to_string(),
            check_id: ids::CHECK_TOOL_RUNTIME.to_string(),
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            passed: false,
            severity: Severity::Error,
            detail: Some(message.to_string()),
            help: Some("Fix the tool error and re-run condeval.".to_string()),
            fingerprint: None,
            data: serde_json::Value::Null,
        }],
        scenarios: Vec::new(),
        data: SuiteData {
            profile: "unknown".to_string(),
            checks_total: 1,
            checks_failed: 1,
            ..SuiteData::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_error_report_fails_with_one_check() {
        let report = runtime_error_report("template not found");
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.structure.len(), 1);
        assert_eq!(report.structure[0].detail.as_deref(), Some("template not found"));

        let renderable = to_renderable(&report);
        assert_eq!(renderable.structure_failures.len(), 1);
        assert_eq!(renderable.data.checks_failed, 1);
    }

    #[test]
    fn serialized_report_parses_back() {
        let report = runtime_error_report("boom");
        let bytes = serialize_report(&report).expect("serialize");
        let text = String::from_utf8(bytes).expect("utf8");
        assert!(text.contains("\"schema\": \"condeval.report.v1\""));
        assert_eq!(parse_report_json(&text).expect("parse"), report);
    }

    #[test]
    fn unknown_schema_is_rejected() {
        let err = parse_report_json(r#"{"schema":"other.v9"}"#).expect_err("schema");
        assert!(err.to_string().contains("unknown report schema: other.v9"));
        assert!(parse_report_json("not json").is_err());
    }
}
