//! Explain registry for checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix failures.
    pub remediation: &'static str,
    /// Before/after template examples.
    pub examples: ExamplePair,
}

/// Before and after template examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Template text that would fail the check.
    pub before: &'static str,
    /// Template text that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Check IDs
        ids::CHECK_SCENARIO_FEATURE => Some(explain_scenario_feature()),
        ids::CHECK_SCENARIO_PARAMETER => Some(explain_scenario_parameter()),
        ids::CHECK_SCENARIO_RESOURCE => Some(explain_scenario_resource()),
        ids::CHECK_SCENARIO_PROPERTY => Some(explain_scenario_property()),
        ids::CHECK_TEMPLATE_REQUIRED_SECTIONS => Some(explain_required_sections()),
        ids::CHECK_TEMPLATE_CONDITIONS_DEFINED => Some(explain_conditions_defined()),
        ids::CHECK_TEMPLATE_OUTPUTS_DOCUMENTED => Some(explain_outputs_documented()),
        ids::CHECK_TEMPLATE_RESOURCE_TYPES => Some(explain_resource_types()),
        ids::CHECK_TEMPLATE_CONDITION_DEPENDENCIES => Some(explain_condition_dependencies()),

        // Codes
        ids::CODE_FEATURE_MISMATCH => Some(explain_feature_mismatch()),
        ids::CODE_EVALUATION_ERROR => Some(explain_evaluation_error()),
        ids::CODE_CONSTRAINT_VIOLATION => Some(explain_constraint_violation()),
        ids::CODE_UNDECLARED_PARAMETER => Some(explain_undeclared_parameter()),
        ids::CODE_RESOURCE_MISSING => Some(explain_resource_missing()),
        ids::CODE_RESOURCE_INACTIVE => Some(explain_resource_inactive()),
        ids::CODE_PROPERTY_MISMATCH => Some(explain_property_mismatch()),
        ids::CODE_MISSING_SECTION => Some(explain_missing_section()),
        ids::CODE_UNDEFINED_CONDITION => Some(explain_undefined_condition()),
        ids::CODE_OUTPUT_MISSING_DESCRIPTION => Some(explain_output_missing_description()),
        ids::CODE_OUTPUT_MISSING_VALUE => Some(explain_output_missing_value()),
        ids::CODE_EXPORT_MISSING_NAME => Some(explain_export_missing_name()),
        ids::CODE_MISSING_TYPE => Some(explain_missing_type()),
        ids::CODE_MISSING_DEPENDENCY => Some(explain_missing_dependency()),

        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_SCENARIO_FEATURE,
        ids::CHECK_SCENARIO_PARAMETER,
        ids::CHECK_SCENARIO_RESOURCE,
        ids::CHECK_SCENARIO_PROPERTY,
        ids::CHECK_TEMPLATE_REQUIRED_SECTIONS,
        ids::CHECK_TEMPLATE_CONDITIONS_DEFINED,
        ids::CHECK_TEMPLATE_OUTPUTS_DOCUMENTED,
        ids::CHECK_TEMPLATE_RESOURCE_TYPES,
        ids::CHECK_TEMPLATE_CONDITION_DEPENDENCIES,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_FEATURE_MISMATCH,
        ids::CODE_EVALUATION_ERROR,
        ids::CODE_CONSTRAINT_VIOLATION,
        ids::CODE_UNDECLARED_PARAMETER,
        ids::CODE_RESOURCE_MISSING,
        ids::CODE_RESOURCE_INACTIVE,
        ids::CODE_PROPERTY_MISMATCH,
        ids::CODE_MISSING_SECTION,
        ids::CODE_UNDEFINED_CONDITION,
        ids::CODE_OUTPUT_MISSING_DESCRIPTION,
        ids::CODE_OUTPUT_MISSING_VALUE,
        ids::CODE_EXPORT_MISSING_NAME,
        ids::CODE_MISSING_TYPE,
        ids::CODE_MISSING_DEPENDENCY,
    ]
}

// --- Check-level explanations ---

fn explain_scenario_feature() -> Explanation {
    Explanation {
        title: "Scenario Feature Expectation",
        description: "\
Evaluates a named condition against the scenario's parameter assignment and compares the
result with the expected feature state.

Features are mapped to conditions in the suite config (`[features]`). The engine has no
built-in knowledge of what a feature means: it only evaluates the condition the feature
points at.",
        remediation: "\
Either the template's condition does not express the intended logic, or the scenario's
expectation is wrong. Inspect the condition expression and the parameters the scenario
supplies. Parameters left unassigned fall back to their `Default`, or to the empty string.",
        examples: ExamplePair {
            before: r#"Conditions:
  EnableKMSEncryption: !Equals [!Ref KmsMasterKeyArn, ""]"#,
            after: r#"Conditions:
  EnableKMSEncryption: !Not [!Equals [!Ref KmsMasterKeyArn, ""]]"#,
        },
    }
}

fn explain_scenario_parameter() -> Explanation {
    Explanation {
        title: "Scenario Parameter Constraints",
        description: "\
Validates every parameter value supplied by a scenario against the constraints declared in
the template: `AllowedValues`, `AllowedPattern`, `MinLength`/`MaxLength`, and
`MinValue`/`MaxValue`.

All violated constraints are reported together. Patterns must match the whole value, and
numeric bounds are inclusive. When `AllowedValues` is declared, pattern and length
constraints are not checked.",
        remediation: "\
Change the scenario value so it satisfies the declared constraints, or relax the constraint
in the template if the value is legitimate.",
        examples: ExamplePair {
            before: r#"ProjectName:
  Type: String
  AllowedPattern: "[a-z0-9-]+"
  MinLength: 5
# scenario value: "My_Project""#,
            after: r#"ProjectName:
  Type: String
  AllowedPattern: "[a-z0-9-]+"
  MinLength: 5
# scenario value: "my-project""#,
        },
    }
}

fn explain_scenario_resource() -> Explanation {
    Explanation {
        title: "Scenario Expected Resource",
        description: "\
Checks that a resource the scenario expects is declared in the template and is active under
the scenario's assignment. A resource with a resource-level `Condition` is active only when
that condition evaluates to true.",
        remediation: "\
Declare the resource, or adjust the resource's `Condition` (or the scenario's parameters) so
the resource is created for this scenario.",
        examples: ExamplePair {
            before: r#"Resources:
  NotificationPermission:
    Type: AWS::Lambda::Permission
    Condition: LambdaEventNotifyConfigEnabled
# scenario does not set LambdaFunctionArn"#,
            after: r#"Resources:
  NotificationPermission:
    Type: AWS::Lambda::Permission
    Condition: LambdaEventNotifyConfigEnabled
# scenario sets LambdaFunctionArn to a function ARN"#,
        },
    }
}

fn explain_scenario_property() -> Explanation {
    Explanation {
        title: "Scenario Expected Property",
        description: "\
Resolves a resource property under the scenario's assignment and compares it with the
expected state. The property is addressed by a dotted path below `Properties`; numeric
segments index into lists.

A property resolving to `AWS::NoValue`, or belonging to a resource that is not created,
counts as absent. An expected value is compared with the resolved value's text.",
        remediation: "\
Check the `Fn::If` that selects the property and the condition it names, or correct the
path or expected value in the scenario.",
        examples: ExamplePair {
            before: r#"Properties:
  VersioningConfiguration: !If
    - EnableKMSEncryption
    - {Status: Enabled}
    - !Ref AWS::NoValue"#,
            after: r#"Properties:
  VersioningConfiguration: !If
    - BucketVersioningEnabled
    - {Status: Enabled}
    - !Ref AWS::NoValue"#,
        },
    }
}

fn explain_required_sections() -> Explanation {
    Explanation {
        title: "Required Template Sections",
        description: "\
Checks that the template declares `AWSTemplateFormatVersion`, `Description`, `Parameters`,
and `Resources` at the top level.",
        remediation: "\
Add the missing top-level section. `Parameters` may be an empty mapping when the template
takes no input.",
        examples: ExamplePair {
            before: r#"Resources:
  S3Bucket:
    Type: AWS::S3::Bucket"#,
            after: r#"AWSTemplateFormatVersion: "2010-09-09"
Description: Bucket stack
Parameters: {}
Resources:
  S3Bucket:
    Type: AWS::S3::Bucket"#,
        },
    }
}

fn explain_conditions_defined() -> Explanation {
    Explanation {
        title: "Referenced Conditions Are Defined",
        description: "\
Finds every condition referenced from `Resources` and `Outputs` (resource-level `Condition`
keys, the first operand of `Fn::If`, and `Condition` operands) and checks it is declared in
the `Conditions` section.",
        remediation: "\
Declare the missing condition, or fix the spelling of the reference.",
        examples: ExamplePair {
            before: r#"Resources:
  S3Bucket:
    Type: AWS::S3::Bucket
    Properties:
      VersioningConfiguration: !If [VersioningOn, {Status: Enabled}, !Ref AWS::NoValue]"#,
            after: r#"Conditions:
  VersioningOn: !Equals [!Ref BucketVersioningEnabled, "true"]
Resources:
  S3Bucket:
    Type: AWS::S3::Bucket
    Properties:
      VersioningConfiguration: !If [VersioningOn, {Status: Enabled}, !Ref AWS::NoValue]"#,
        },
    }
}

fn explain_outputs_documented() -> Explanation {
    Explanation {
        title: "Outputs Are Documented",
        description: "\
Checks that every output declares a `Description` and a `Value`, and that an `Export`
block carries a `Name`.",
        remediation: "\
Add the missing key to the output definition.",
        examples: ExamplePair {
            before: r#"Outputs:
  S3BucketArn:
    Value: !GetAtt S3Bucket.Arn
    Export: {}"#,
            after: r#"Outputs:
  S3BucketArn:
    Description: ARN of the bucket
    Value: !GetAtt S3Bucket.Arn
    Export:
      Name: !Sub "${AWS::StackName}-S3BucketArn""#,
        },
    }
}

fn explain_resource_types() -> Explanation {
    Explanation {
        title: "Resources Declare a Type",
        description: "\
Checks that every resource declares a string `Type`.",
        remediation: "\
Add the resource type, e.g. `Type: AWS::S3::Bucket`.",
        examples: ExamplePair {
            before: r#"Resources:
  S3Bucket:
    Properties: {}"#,
            after: r#"Resources:
  S3Bucket:
    Type: AWS::S3::Bucket
    Properties: {}"#,
        },
    }
}

fn explain_condition_dependencies() -> Explanation {
    Explanation {
        title: "Condition Dependencies",
        description: "\
Checks that a condition depends, directly or through other conditions, on each condition
the suite config lists for it under `[dependencies]`. Dependencies come from `Condition`
operands and the condition named by `Fn::If`.",
        remediation: "\
Gate the condition on its parent, usually with `Fn::And` and `!Condition`.",
        examples: ExamplePair {
            before: r#"Conditions:
  TransitionToGlacierEnabled: !Equals [!Ref TransitionToGlacierEnabled, "true"]"#,
            after: r#"Conditions:
  TransitionToGlacierEnabled: !And
    - !Condition S3LifecycleConfigurationEnabled
    - !Equals [!Ref TransitionToGlacierEnabled, "true"]"#,
        },
    }
}

// --- Code-level explanations ---

fn explain_feature_mismatch() -> Explanation {
    let mut exp = explain_scenario_feature();
    exp.title = "Feature Mismatch";
    exp
}

fn explain_evaluation_error() -> Explanation {
    Explanation {
        title: "Condition Evaluation Error",
        description: "\
The condition behind a feature could not be evaluated. Causes:
- a `Ref` names a parameter that is not declared
- a `Condition` names a condition that is not declared
- an operand has the wrong kind or count for its operator (e.g. `Fn::And` given a string)
- a numeric parameter has neither a value nor a `Default`
- the expression uses an intrinsic function the engine does not know",
        remediation: "\
Read the detail message; it names the offending reference or operator. Fix the template
expression, or supply the missing parameter value in the scenario.",
        examples: ExamplePair {
            before: r#"Conditions:
  HasPrefix: !And [!Ref NotificationPrefix, true]"#,
            after: r#"Conditions:
  HasPrefix: !Not [!Equals [!Ref NotificationPrefix, ""]]"#,
        },
    }
}

fn explain_constraint_violation() -> Explanation {
    let mut exp = explain_scenario_parameter();
    exp.title = "Constraint Violation";
    exp
}

fn explain_undeclared_parameter() -> Explanation {
    Explanation {
        title: "Undeclared Parameter",
        description: "\
The scenario assigns a value to a parameter that the template does not declare. The value is
never consulted by condition evaluation.",
        remediation: "\
Remove the assignment from the scenario, or declare the parameter in the template.",
        examples: ExamplePair {
            before: r#"[scenarios.parameters]
KmsKeyArn = "arn:aws:kms:...""#,
            after: r#"[scenarios.parameters]
KmsMasterKeyArn = "arn:aws:kms:...""#,
        },
    }
}

fn explain_resource_missing() -> Explanation {
    let mut exp = explain_scenario_resource();
    exp.title = "Expected Resource Missing";
    exp
}

fn explain_resource_inactive() -> Explanation {
    let mut exp = explain_scenario_resource();
    exp.title = "Expected Resource Inactive";
    exp
}

fn explain_property_mismatch() -> Explanation {
    let mut exp = explain_scenario_property();
    exp.title = "Property Mismatch";
    exp
}

fn explain_missing_section() -> Explanation {
    let mut exp = explain_required_sections();
    exp.title = "Missing Section";
    exp
}

fn explain_undefined_condition() -> Explanation {
    let mut exp = explain_conditions_defined();
    exp.title = "Undefined Condition";
    exp
}

fn explain_output_missing_description() -> Explanation {
    let mut exp = explain_outputs_documented();
    exp.title = "Output Missing Description";
    exp
}

fn explain_output_missing_value() -> Explanation {
    let mut exp = explain_outputs_documented();
    exp.title = "Output Missing Value";
    exp
}

fn explain_export_missing_name() -> Explanation {
    let mut exp = explain_outputs_documented();
    exp.title = "Export Missing Name";
    exp
}

fn explain_missing_type() -> Explanation {
    let mut exp = explain_resource_types();
    exp.title = "Missing Resource Type";
    exp
}

fn explain_missing_dependency() -> Explanation {
    let mut exp = explain_condition_dependencies();
    exp.title = "Missing Condition Dependency";
    exp
}
