//! The `check` use case: evaluate a suite against a template and produce a report.

use anyhow::Context;
use condeval_domain::model::TemplateModel;
use condeval_domain::report::DomainReport;
use condeval_settings::{Overrides, ResolvedConfig};
use condeval_types::{CondevalReport, ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta, Verdict};
use time::OffsetDateTime;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Template path as it should appear in the report.
    pub template_path: &'a str,
    /// Template contents (YAML or JSON).
    pub template_text: &'a str,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    /// The generated report.
    pub report: CondevalReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case: parse config, parse and model the template, evaluate every
/// scenario, produce a report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        condeval_settings::SuiteConfigV1::default()
    } else {
        condeval_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = condeval_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let document = condeval_template::parse(input.template_text)
        .with_context(|| format!("parse template {}", input.template_path))?;
    let model = TemplateModel::build(document)
        .with_context(|| format!("build template model for {}", input.template_path))?;

    tracing::debug!(
        template = input.template_path,
        scenarios = resolved.scenarios.len(),
        profile = %resolved.effective.profile,
        "running suite"
    );

    let DomainReport {
        verdict,
        structure,
        scenarios,
        mut data,
        counts: _,
    } = condeval_domain::evaluate_suite(&model, &resolved.scenarios, &resolved.effective);
    data.template = input.template_path.to_string();

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "condeval".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict,
        structure,
        scenarios,
        data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
