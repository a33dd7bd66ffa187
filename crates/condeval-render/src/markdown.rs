use crate::{RenderableCheck, RenderableReport, RenderableSeverity, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Condeval report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    let data = &report.data;
    out.push_str(&format!(
        "- Template: `{}`\n- Profile: {}\n- Verdict: **{}**\n- Checks: {} total, {} passed, {} failed\n\n",
        data.template, data.profile, verdict, data.checks_total, data.checks_passed, data.checks_failed
    ));

    out.push_str("## Template structure\n\n");
    if report.structure_failures.is_empty() {
        out.push_str(&format!(
            "All {} structure checks passed.\n\n",
            report.structure_total
        ));
    } else {
        push_failures(&mut out, &report.structure_failures);
        out.push('\n');
    }

    out.push_str("## Scenarios\n\n");
    if report.scenarios.is_empty() {
        out.push_str("No scenarios.\n");
        return out;
    }

    out.push_str("| Scenario | Passed | Failed | Result |\n");
    out.push_str("|---|---:|---:|---|\n");
    for s in &report.scenarios {
        let result = if s.failed == 0 { "PASS" } else { "FAIL" };
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape_cell(&s.name),
            s.passed,
            s.failed,
            result
        ));
    }

    for s in report.scenarios.iter().filter(|s| !s.failures.is_empty()) {
        out.push_str(&format!("\n### Scenario `{}`\n\n", s.name));
        push_failures(&mut out, &s.failures);
    }

    out
}

fn push_failures(out: &mut String, checks: &[RenderableCheck]) {
    for c in checks {
        let sev = match c.severity {
            RenderableSeverity::Info => "INFO",
            RenderableSeverity::Warning => "WARN",
            RenderableSeverity::Error => "ERROR",
        };
        match &c.detail {
            Some(detail) => out.push_str(&format!(
                "- [{}] `{}` / `{}`: {}: {}\n",
                sev, c.check_id, c.code, c.name, detail
            )),
            None => out.push_str(&format!(
                "- [{}] `{}` / `{}`: {}\n",
                sev, c.check_id, c.code, c.name
            )),
        }
        if let Some(help) = &c.help {
            out.push_str(&format!("  - help: {}\n", help));
        }
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
