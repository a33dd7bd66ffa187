use crate::checks;
use crate::fingerprint::fingerprint_for_check;
use crate::model::TemplateModel;
use crate::policy::{EffectiveConfig, FailOn};
use crate::report::DomainReport;
use crate::scenario::{Scenario, run_scenario};
use condeval_types::{CheckCounts, CheckResult, ScenarioReport, Severity, SuiteData, Verdict};
use std::cmp::Ordering;

/// Run structure checks and every scenario, then apply policy and compute the verdict.
pub fn evaluate_suite(
    model: &TemplateModel,
    scenarios: &[Scenario],
    cfg: &EffectiveConfig,
) -> DomainReport {
    let mut structure: Vec<CheckResult> = Vec::new();
    checks::run_all(model, cfg, &mut structure);
    finalize(&mut structure, "");

    let scenarios: Vec<ScenarioReport> = scenarios
        .iter()
        .map(|scenario| {
            let raw = run_scenario(scenario, model);
            let mut checks = apply_policy(raw.checks, cfg);
            finalize(&mut checks, &scenario.name);
            ScenarioReport::new(raw.scenario, checks)
        })
        .collect();

    let mut counts = CheckCounts::from_checks(&structure);
    for report in &scenarios {
        counts.add(report.counts);
    }

    let verdict = {
        let failed = structure
            .iter()
            .chain(scenarios.iter().flat_map(|s| s.checks.iter()))
            .filter(|c| !c.passed);
        compute_verdict(failed, cfg.fail_on)
    };

    let data = SuiteData {
        template: String::new(),
        profile: cfg.profile.clone(),
        parameters_declared: model.parameters().len() as u32,
        conditions_declared: model.conditions().len() as u32,
        scenarios_run: scenarios.len() as u32,
        checks_total: counts.total,
        checks_passed: counts.passed,
        checks_failed: counts.failed,
    };

    tracing::info!(
        verdict = ?verdict,
        total = counts.total,
        failed = counts.failed,
        "evaluated suite"
    );

    DomainReport {
        verdict,
        structure,
        scenarios,
        data,
        counts,
    }
}

/// Drop checks whose id is disabled and stamp configured severity on the rest.
fn apply_policy(checks: Vec<CheckResult>, cfg: &EffectiveConfig) -> Vec<CheckResult> {
    checks
        .into_iter()
        .filter_map(|mut check| {
            let policy = cfg.check_policy(&check.check_id)?;
            check.severity = policy.severity;
            Some(check)
        })
        .collect()
}

fn finalize(checks: &mut [CheckResult], scenario: &str) {
    for check in checks.iter_mut().filter(|c| !c.passed) {
        check.fingerprint = Some(fingerprint_for_check(
            &check.check_id,
            &check.code,
            scenario,
            &check.name,
        ));
    }
    // Stable: passing checks keep their input order.
    checks.sort_by(compare_checks);
}

fn compute_verdict<'a>(
    failed: impl Iterator<Item = &'a CheckResult>,
    fail_on: FailOn,
) -> Verdict {
    let mut has_warn = false;
    for check in failed {
        match check.severity {
            Severity::Error => return Verdict::Fail,
            Severity::Warning => has_warn = true,
            Severity::Info => {}
        }
    }

    if has_warn {
        return match fail_on {
            FailOn::Warning => Verdict::Fail,
            FailOn::Error => Verdict::Warn,
        };
    }

    Verdict::Pass
}

fn compare_checks(a: &CheckResult, b: &CheckResult) -> Ordering {
    // Ordering priority:
    // 1) failures before passes
    // 2) severity (error -> warning -> info)
    // 3) check_id
    // 4) code
    // 5) name
    let severity_rank = |sev: Severity| match sev {
        Severity::Error => 0,
        Severity::Warning => 1,
        Severity::Info => 2,
    };

    match (a.passed, b.passed) {
        (true, true) => Ordering::Equal,
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (false, false) => severity_rank(a.severity)
            .cmp(&severity_rank(b.severity))
            .then_with(|| a.check_id.cmp(&b.check_id))
            .then_with(|| a.code.cmp(&b.code))
            .then_with(|| a.name.cmp(&b.name)),
    }
}
