use super::utils::{fail, pass};
use crate::graph::referenced_conditions;
use crate::model::TemplateModel;
use crate::policy::EffectiveConfig;
use condeval_template::Node;
use condeval_types::{CheckResult, ids};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

pub fn run(model: &TemplateModel, cfg: &EffectiveConfig, out: &mut Vec<CheckResult>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_TEMPLATE_CONDITIONS_DEFINED) else {
        return;
    };

    for (condition, referrers) in collect_references(model) {
        let name = format!("condition {condition}");
        let data = json!({
            "condition": condition,
            "referenced_by": referrers,
        });
        let mut result = if model.conditions().contains(&condition) {
            pass(name, ids::CHECK_TEMPLATE_CONDITIONS_DEFINED, data)
        } else {
            fail(
                name,
                ids::CHECK_TEMPLATE_CONDITIONS_DEFINED,
                ids::CODE_UNDEFINED_CONDITION,
                format!(
                    "condition '{condition}' is referenced by {} but not declared",
                    referrers.iter().cloned().collect::<Vec<_>>().join(", ")
                ),
                "Declare the condition in the Conditions section or fix the reference.",
                data,
            )
        };
        result.severity = policy.severity;
        out.push(result);
    }
}

/// Condition name -> `Section.LogicalId` entries that reference it.
fn collect_references(model: &TemplateModel) -> BTreeMap<String, BTreeSet<String>> {
    let mut refs: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for section in ["Resources", "Outputs"] {
        let Some(entries) = model.document().section(section).and_then(Node::as_mapping) else {
            continue;
        };
        for (id, entry) in entries {
            let referrer = format!("{section}.{id}");
            let mut names = referenced_conditions(entry);
            if let Some(gate) = entry.get("Condition").and_then(Node::as_str) {
                names.insert(gate.to_string());
            }
            for name in names {
                refs.entry(name).or_default().insert(referrer.clone());
            }
        }
    }
    refs
}
