use crate::model::TemplateModel;
use crate::policy::EffectiveConfig;
use condeval_types::CheckResult;

mod condition_dependencies;
mod conditions_defined;
mod outputs_documented;
mod required_sections;
mod resource_types;
pub(crate) mod utils;

#[cfg(test)]
mod tests;

/// Run every enabled template structure check.
pub fn run_all(model: &TemplateModel, cfg: &EffectiveConfig, out: &mut Vec<CheckResult>) {
    required_sections::run(model, cfg, out);
    conditions_defined::run(model, cfg, out);
    outputs_documented::run(model, cfg, out);
    resource_types::run(model, cfg, out);
    condition_dependencies::run(model, cfg, out);
}
