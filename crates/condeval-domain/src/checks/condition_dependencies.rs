use super::utils::{fail, pass};
use crate::model::TemplateModel;
use crate::policy::EffectiveConfig;
use condeval_types::{CheckResult, ids};
use serde_json::json;

pub fn run(model: &TemplateModel, cfg: &EffectiveConfig, out: &mut Vec<CheckResult>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_TEMPLATE_CONDITION_DEPENDENCIES) else {
        return;
    };
    let graph = model.conditions();

    for (condition, required) in &cfg.dependencies {
        for parent in required {
            let name = format!("condition {condition} depends on {parent}");
            let data = json!({
                "condition": condition,
                "depends_on": parent,
                "direct": graph.dependencies(condition).collect::<Vec<_>>(),
            });

            let mut result = if !graph.contains(condition) {
                fail(
                    name,
                    ids::CHECK_TEMPLATE_CONDITION_DEPENDENCIES,
                    ids::CODE_UNDEFINED_CONDITION,
                    format!("condition '{condition}' is not declared"),
                    "Declare the condition or fix the name under [dependencies].",
                    data,
                )
            } else if graph.depends_on(condition, parent) {
                pass(name, ids::CHECK_TEMPLATE_CONDITION_DEPENDENCIES, data)
            } else {
                fail(
                    name,
                    ids::CHECK_TEMPLATE_CONDITION_DEPENDENCIES,
                    ids::CODE_MISSING_DEPENDENCY,
                    format!("condition '{condition}' does not depend on '{parent}'"),
                    "Gate the condition on its parent with Fn::And and !Condition.",
                    data,
                )
            };
            result.severity = policy.severity;
            out.push(result);
        }
    }
}
