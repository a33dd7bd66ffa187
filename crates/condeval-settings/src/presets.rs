use condeval_domain::policy::{CheckPolicy, EffectiveConfig, FailOn};
use condeval_types::Severity;
use condeval_types::explain::all_check_ids;
use std::collections::BTreeMap;

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into the suite config.
pub fn preset(profile: &str) -> EffectiveConfig {
    match profile {
        "warn" => warn_profile(),
        // default
        _ => strict_profile(),
    }
}

fn strict_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        fail_on: FailOn::Error,
        checks: default_checks(Severity::Error),
        dependencies: BTreeMap::new(),
    }
}

fn warn_profile() -> EffectiveConfig {
    // Everything reported, nothing blocks unless `fail_on = "warning"`.
    EffectiveConfig {
        profile: "warn".to_string(),
        fail_on: FailOn::Error,
        checks: default_checks(Severity::Warning),
        dependencies: BTreeMap::new(),
    }
}

fn default_checks(default_severity: Severity) -> BTreeMap<String, CheckPolicy> {
    all_check_ids()
        .iter()
        .map(|id| (id.to_string(), CheckPolicy::enabled(default_severity)))
        .collect()
}
