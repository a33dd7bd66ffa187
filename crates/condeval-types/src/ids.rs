//! Stable identifiers for checks and result codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks: scenario
pub const CHECK_SCENARIO_FEATURE: &str = "scenario.feature";
pub const CHECK_SCENARIO_PARAMETER: &str = "scenario.parameter";
pub const CHECK_SCENARIO_RESOURCE: &str = "scenario.resource";
pub const CHECK_SCENARIO_PROPERTY: &str = "scenario.property";

// Checks: template structure
pub const CHECK_TEMPLATE_REQUIRED_SECTIONS: &str = "template.required_sections";
pub const CHECK_TEMPLATE_CONDITIONS_DEFINED: &str = "template.conditions_defined";
pub const CHECK_TEMPLATE_OUTPUTS_DOCUMENTED: &str = "template.outputs_documented";
pub const CHECK_TEMPLATE_RESOURCE_TYPES: &str = "template.resource_types";
pub const CHECK_TEMPLATE_CONDITION_DEPENDENCIES: &str = "template.condition_dependencies";

/// Code carried by every passing check.
pub const CODE_OK: &str = "ok";

// Codes: scenario.feature
pub const CODE_FEATURE_MISMATCH: &str = "feature_mismatch";
pub const CODE_EVALUATION_ERROR: &str = "evaluation_error";

// Codes: scenario.parameter
pub const CODE_CONSTRAINT_VIOLATION: &str = "constraint_violation";
pub const CODE_UNDECLARED_PARAMETER: &str = "undeclared_parameter";

// Codes: scenario.resource
pub const CODE_RESOURCE_MISSING: &str = "resource_missing";
pub const CODE_RESOURCE_INACTIVE: &str = "resource_inactive";

// Codes: scenario.property
pub const CODE_PROPERTY_MISMATCH: &str = "property_mismatch";

// Codes: template.required_sections
pub const CODE_MISSING_SECTION: &str = "missing_section";

// Codes: template.conditions_defined
pub const CODE_UNDEFINED_CONDITION: &str = "undefined_condition";

// Codes: template.outputs_documented
pub const CODE_OUTPUT_MISSING_DESCRIPTION: &str = "output_missing_description";
pub const CODE_OUTPUT_MISSING_VALUE: &str = "output_missing_value";
pub const CODE_EXPORT_MISSING_NAME: &str = "export_missing_name";

// Codes: template.resource_types
pub const CODE_MISSING_TYPE: &str = "missing_type";

// Codes: template.condition_dependencies
pub const CODE_MISSING_DEPENDENCY: &str = "missing_dependency";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
