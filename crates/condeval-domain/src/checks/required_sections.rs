use super::utils::{fail, pass};
use crate::model::TemplateModel;
use crate::policy::EffectiveConfig;
use condeval_types::{CheckResult, ids};
use serde_json::json;

pub const REQUIRED_SECTIONS: &[&str] = &[
    "AWSTemplateFormatVersion",
    "Description",
    "Parameters",
    "Resources",
];

pub fn run(model: &TemplateModel, cfg: &EffectiveConfig, out: &mut Vec<CheckResult>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_TEMPLATE_REQUIRED_SECTIONS) else {
        return;
    };

    for section in REQUIRED_SECTIONS {
        let name = format!("section {section}");
        let data = json!({ "section": section });
        let mut result = if model.document().section(section).is_some() {
            pass(name, ids::CHECK_TEMPLATE_REQUIRED_SECTIONS, data)
        } else {
            fail(
                name,
                ids::CHECK_TEMPLATE_REQUIRED_SECTIONS,
                ids::CODE_MISSING_SECTION,
                format!("template has no top-level '{section}' section"),
                "Add the section at the top level of the template.",
                data,
            )
        };
        result.severity = policy.severity;
        out.push(result);
    }
}
