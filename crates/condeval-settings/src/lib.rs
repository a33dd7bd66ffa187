//! Suite configuration parsing and profile/scenario resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{
    CheckConfig, ParameterInput, ParameterScalar, PropertyConfig, ScenarioConfig, SuiteConfigV1,
};
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `condeval.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<SuiteConfigV1> {
    let cfg: SuiteConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective policy and the scenarios to run (profile + overrides + per-check
/// config + feature map).
pub fn resolve_config(cfg: SuiteConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
