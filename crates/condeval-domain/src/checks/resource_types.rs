use super::utils::{fail, pass};
use crate::model::TemplateModel;
use crate::policy::EffectiveConfig;
use condeval_types::{CheckResult, ids};
use serde_json::json;

pub fn run(model: &TemplateModel, cfg: &EffectiveConfig, out: &mut Vec<CheckResult>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_TEMPLATE_RESOURCE_TYPES) else {
        return;
    };

    for resource in model.resources() {
        let name = format!("resource {} type", resource.logical_id);
        let mut result = match &resource.resource_type {
            Some(ty) => pass(
                name,
                ids::CHECK_TEMPLATE_RESOURCE_TYPES,
                json!({ "resource": resource.logical_id, "type": ty }),
            ),
            None => fail(
                name,
                ids::CHECK_TEMPLATE_RESOURCE_TYPES,
                ids::CODE_MISSING_TYPE,
                format!("resource '{}' has no string Type", resource.logical_id),
                "Add a Type such as AWS::S3::Bucket.",
                json!({ "resource": resource.logical_id }),
            ),
        };
        result.severity = policy.severity;
        out.push(result);
    }
}
