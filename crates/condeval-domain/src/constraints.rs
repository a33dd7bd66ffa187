use crate::model::ParamValue;
use crate::registry::{Parameter, ParameterRegistry, ParameterType, split_list};
use crate::value::number_text;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    UndeclaredParameter,
    NotAllowed,
    PatternMismatch,
    TooShort,
    TooLong,
    BelowMinimum,
    AboveMaximum,
    NotANumber,
}

impl ViolationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationKind::UndeclaredParameter => "undeclared_parameter",
            ViolationKind::NotAllowed => "not_allowed",
            ViolationKind::PatternMismatch => "pattern_mismatch",
            ViolationKind::TooShort => "too_short",
            ViolationKind::TooLong => "too_long",
            ViolationKind::BelowMinimum => "below_minimum",
            ViolationKind::AboveMaximum => "above_maximum",
            ViolationKind::NotANumber => "not_a_number",
        }
    }
}

/// One failed constraint.
#[derive(Clone, Debug, PartialEq)]
pub struct Violation {
    pub parameter: String,
    pub kind: ViolationKind,
    /// Element index when the violation concerns one item of a list value.
    pub element: Option<usize>,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.element {
            Some(i) => write!(f, "{}[{}]: {}", self.parameter, i, self.message),
            None => write!(f, "{}: {}", self.parameter, self.message),
        }
    }
}

/// Check a candidate value against everything the parameter declares.
///
/// Every violated constraint is reported. When `AllowedValues` is declared, pattern and length
/// constraints are skipped.
pub fn validate(name: &str, value: &ParamValue, registry: &ParameterRegistry) -> Vec<Violation> {
    let Some(param) = registry.get(name) else {
        return vec![Violation {
            parameter: name.to_string(),
            kind: ViolationKind::UndeclaredParameter,
            element: None,
            message: "parameter is not declared in the template".to_string(),
        }];
    };

    let mut out = Vec::new();
    match (value, param.kind) {
        (ParamValue::List(items), _) => {
            for (i, item) in items.iter().enumerate() {
                check_text(param, item, Some(i), &mut out);
            }
        }
        (ParamValue::String(text), ParameterType::List) => {
            for (i, item) in split_list(text).iter().enumerate() {
                check_text(param, item, Some(i), &mut out);
            }
        }
        (ParamValue::String(text), ParameterType::Number) => {
            check_text(param, text, None, &mut out);
            match text.trim().parse::<f64>() {
                Ok(n) => check_bounds(param, n, &mut out),
                Err(_) => out.push(violation(
                    param,
                    ViolationKind::NotANumber,
                    None,
                    format!("value '{text}' is not a number"),
                )),
            }
        }
        (ParamValue::String(text), ParameterType::String) => {
            check_text(param, text, None, &mut out);
        }
        (ParamValue::Number(n), _) => {
            check_text(param, &number_text(*n), None, &mut out);
            check_bounds(param, *n, &mut out);
        }
    }

    tracing::trace!(parameter = name, violations = out.len(), "validated parameter");
    out
}

fn check_text(param: &Parameter, text: &str, element: Option<usize>, out: &mut Vec<Violation>) {
    if let Some(allowed) = &param.allowed_values {
        if !allowed.iter().any(|a| a == text) {
            out.push(violation(
                param,
                ViolationKind::NotAllowed,
                element,
                format!("value '{text}' is not one of [{}]", allowed.join(", ")),
            ));
        }
        return;
    }

    if let Some(pattern) = &param.allowed_pattern
        && !pattern.is_match(text)
    {
        out.push(violation(
            param,
            ViolationKind::PatternMismatch,
            element,
            format!("value '{text}' does not match pattern '{}'", pattern.as_str()),
        ));
    }

    let length = text.chars().count() as u64;
    if let Some(min) = param.min_length
        && length < min
    {
        out.push(violation(
            param,
            ViolationKind::TooShort,
            element,
            format!("length {length} is below MinLength {min}"),
        ));
    }
    if let Some(max) = param.max_length
        && length > max
    {
        out.push(violation(
            param,
            ViolationKind::TooLong,
            element,
            format!("length {length} exceeds MaxLength {max}"),
        ));
    }
}

fn check_bounds(param: &Parameter, n: f64, out: &mut Vec<Violation>) {
    if let Some(min) = param.min_value
        && n < min
    {
        out.push(violation(
            param,
            ViolationKind::BelowMinimum,
            None,
            format!("{} is below MinValue {}", number_text(n), number_text(min)),
        ));
    }
    if let Some(max) = param.max_value
        && n > max
    {
        out.push(violation(
            param,
            ViolationKind::AboveMaximum,
            None,
            format!("{} exceeds MaxValue {}", number_text(n), number_text(max)),
        ));
    }
}

fn violation(
    param: &Parameter,
    kind: ViolationKind,
    element: Option<usize>,
    message: String,
) -> Violation {
    Violation {
        parameter: param.name.clone(),
        kind,
        element,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use condeval_template::parse;

    fn registry() -> ParameterRegistry {
        let doc = parse(
            r#"
Parameters:
  ProjectName:
    Type: String
    AllowedPattern: "[a-z0-9-]+"
    MinLength: 5
    MaxLength: 30
  Environment:
    Type: String
    AllowedValues: [devl, test, prod]
    MinLength: 10
  TransitionToDeepArchiveDays:
    Type: Number
    MinValue: 365
    MaxValue: 500
  NotificationEvents:
    Type: CommaDelimitedList
    AllowedValues: ["s3:ObjectCreated:*", "s3:ObjectRemoved:*"]
  GitHubOrg:
    Type: String
    MaxLength: 5
"#,
        )
        .expect("parse");
        ParameterRegistry::build(&doc).expect("registry")
    }

    fn kinds(v: &[Violation]) -> Vec<ViolationKind> {
        v.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn valid_values_produce_no_violations() {
        let reg = registry();
        assert!(validate("ProjectName", &"my-project".into(), &reg).is_empty());
        assert!(validate("Environment", &"prod".into(), &reg).is_empty());
        assert!(validate("TransitionToDeepArchiveDays", &"400".into(), &reg).is_empty());
    }

    #[test]
    fn length_and_pattern_violations_are_both_reported() {
        let out = validate("ProjectName", &"AB".into(), &registry());
        assert_eq!(
            kinds(&out),
            vec![ViolationKind::PatternMismatch, ViolationKind::TooShort]
        );
    }

    #[test]
    fn allowed_values_skip_pattern_and_length() {
        let reg = registry();
        // MinLength 10 would reject "prod", but AllowedValues takes precedence.
        assert!(validate("Environment", &"prod".into(), &reg).is_empty());
        assert_eq!(
            kinds(&validate("Environment", &"Prod".into(), &reg)),
            vec![ViolationKind::NotAllowed]
        );
    }

    #[test]
    fn numeric_bounds_are_inclusive() {
        let reg = registry();
        for ok in [365.0, 500.0] {
            assert!(validate("TransitionToDeepArchiveDays", &ParamValue::Number(ok), &reg).is_empty());
        }
        assert_eq!(
            kinds(&validate("TransitionToDeepArchiveDays", &ParamValue::Number(364.0), &reg)),
            vec![ViolationKind::BelowMinimum]
        );
        assert_eq!(
            kinds(&validate("TransitionToDeepArchiveDays", &"501".into(), &reg)),
            vec![ViolationKind::AboveMaximum]
        );
    }

    #[test]
    fn non_numeric_string_for_number_parameter() {
        let out = validate("TransitionToDeepArchiveDays", &"soon".into(), &registry());
        assert_eq!(kinds(&out), vec![ViolationKind::NotANumber]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let reg = registry();
        assert!(validate("GitHubOrg", &"ééééé".into(), &reg).is_empty());
        assert_eq!(
            kinds(&validate("GitHubOrg", &"éééééé".into(), &reg)),
            vec![ViolationKind::TooLong]
        );
    }

    #[test]
    fn list_values_are_checked_per_element() {
        let reg = registry();
        let value = ParamValue::List(vec!["s3:ObjectCreated:*".into(), "s3:Bogus".into()]);
        let out = validate("NotificationEvents", &value, &reg);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].element, Some(1));
        assert_eq!(out[0].to_string(), format!("NotificationEvents[1]: {}", out[0].message));

        let text = ParamValue::from("s3:ObjectRemoved:*,s3:Nope");
        assert_eq!(validate("NotificationEvents", &text, &reg)[0].element, Some(1));
    }

    #[test]
    fn undeclared_parameter_is_a_single_violation() {
        let out = validate("KmsKeyArn", &"arn".into(), &registry());
        assert_eq!(kinds(&out), vec![ViolationKind::UndeclaredParameter]);
    }
}
