use super::utils::{fail, pass};
use crate::model::TemplateModel;
use crate::policy::EffectiveConfig;
use condeval_template::Node;
use condeval_types::{CheckResult, ids};
use serde_json::json;

pub fn run(model: &TemplateModel, cfg: &EffectiveConfig, out: &mut Vec<CheckResult>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_TEMPLATE_OUTPUTS_DOCUMENTED) else {
        return;
    };
    let Some(outputs) = model.document().section("Outputs").and_then(Node::as_mapping) else {
        return;
    };

    for (output, decl) in outputs {
        let mut require = |what: &str, present: bool, code: &str| {
            let name = format!("output {output} {what}");
            let data = json!({ "output": output, "field": what });
            let mut result = if present {
                pass(name, ids::CHECK_TEMPLATE_OUTPUTS_DOCUMENTED, data)
            } else {
                fail(
                    name,
                    ids::CHECK_TEMPLATE_OUTPUTS_DOCUMENTED,
                    code,
                    format!("output '{output}' has no {what}"),
                    "Document every output with a Description and a Value; name every Export.",
                    data,
                )
            };
            result.severity = policy.severity;
            out.push(result);
        };

        require(
            "description",
            decl.get("Description").is_some(),
            ids::CODE_OUTPUT_MISSING_DESCRIPTION,
        );
        require(
            "value",
            decl.get("Value").is_some(),
            ids::CODE_OUTPUT_MISSING_VALUE,
        );
        if let Some(export) = decl.get("Export") {
            require(
                "export name",
                export.get("Name").is_some(),
                ids::CODE_EXPORT_MISSING_NAME,
            );
        }
    }
}
