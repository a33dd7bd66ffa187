//! Expression evaluation against one parameter assignment.
//!
//! Conditions evaluate to booleans; any other expression resolves to a [`Value`]. Errors are
//! returned, never folded into `false`.

use crate::error::{EvalError, ReferenceKind};
use crate::model::{NO_VALUE, ParameterAssignment, TemplateModel, is_pseudo_parameter};
use crate::registry::{ParameterType, split_list};
use crate::value::Value;
use condeval_template::{FunctionNode, Node, Operator};
use std::collections::BTreeMap;

/// Context name used in errors for a bare expression in boolean position.
const CONDITION_CONTEXT: &str = "condition";

pub struct Evaluator<'a> {
    model: &'a TemplateModel,
    assignment: &'a ParameterAssignment,
}

impl<'a> Evaluator<'a> {
    pub fn new(model: &'a TemplateModel, assignment: &'a ParameterAssignment) -> Self {
        Self { model, assignment }
    }

    /// Evaluate an expression in boolean position.
    pub fn evaluate(&self, node: &Node) -> Result<bool, EvalError> {
        self.truth(node, CONDITION_CONTEXT, &mut Vec::new())
    }

    /// Evaluate a named condition from the `Conditions` section.
    pub fn evaluate_condition(&self, name: &str) -> Result<bool, EvalError> {
        self.condition(name, &mut Vec::new())
    }

    /// Resolve a value-producing expression.
    pub fn resolve(&self, node: &Node) -> Result<Value, EvalError> {
        self.value(node, &mut Vec::new())
    }

    /// Whether a resource is created under this assignment. Resources without a
    /// resource-level `Condition` are always active.
    pub fn is_resource_active(&self, logical_id: &str) -> Result<bool, EvalError> {
        let resource = self
            .model
            .resource(logical_id)
            .ok_or_else(|| undeclared_resource(logical_id))?;
        match &resource.condition {
            Some(condition) => self.evaluate_condition(condition),
            None => Ok(true),
        }
    }

    /// Resolve a dotted path below a resource's `Properties`
    /// (e.g. `BucketEncryption.ServerSideEncryptionConfiguration.0`).
    ///
    /// Returns `Ok(None)` when the path does not exist or resolves to `AWS::NoValue`.
    pub fn resolve_resource_property(
        &self,
        logical_id: &str,
        path: &str,
    ) -> Result<Option<Value>, EvalError> {
        let resource = self
            .model
            .resource(logical_id)
            .ok_or_else(|| undeclared_resource(logical_id))?;
        let Some(properties) = &resource.properties else {
            return Ok(None);
        };

        let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
        let mut node = properties;
        for (i, segment) in segments.iter().enumerate() {
            let next = match node {
                Node::Mapping(map) => map.get(*segment),
                Node::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                Node::Function(_) => {
                    let value = self.resolve(node)?;
                    return Ok(select(value, &segments[i..]));
                }
                _ => None,
            };
            match next {
                Some(n) => node = n,
                None => return Ok(None),
            }
        }

        Ok(select(self.resolve(node)?, &[]))
    }

    fn condition(&self, name: &str, stack: &mut Vec<String>) -> Result<bool, EvalError> {
        if let Some(start) = stack.iter().position(|n| n == name) {
            let mut cycle = stack[start..].to_vec();
            cycle.push(name.to_string());
            return Err(EvalError::CyclicCondition { cycle });
        }
        let Some(expr) = self.model.conditions().get(name) else {
            return Err(EvalError::UnresolvedReference {
                kind: ReferenceKind::Condition,
                name: name.to_string(),
                detail: "condition is not declared".to_string(),
            });
        };

        stack.push(name.to_string());
        let result = self.truth(expr, CONDITION_CONTEXT, stack);
        stack.pop();

        tracing::trace!(condition = name, ?result, "evaluated condition");
        result
    }

    fn truth(&self, node: &Node, context: &str, stack: &mut Vec<String>) -> Result<bool, EvalError> {
        let f = match node {
            Node::Bool(b) => return Ok(*b),
            Node::Function(f) => f,
            other => {
                return Err(EvalError::mismatch(
                    context,
                    format!("expected a boolean, found {}", other.kind()),
                ));
            }
        };

        match &f.operator {
            Operator::And => {
                for operand in at_least(f, 2)? {
                    if !self.truth(operand, "Fn::And", stack)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Operator::Or => {
                for operand in at_least(f, 2)? {
                    if self.truth(operand, "Fn::Or", stack)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Operator::Not => {
                let [operand] = exactly::<1>(f)?;
                Ok(!self.truth(operand, "Fn::Not", stack)?)
            }
            Operator::Equals => {
                let [left, right] = exactly::<2>(f)?;
                let left = self.value(left, stack)?;
                let right = self.value(right, stack)?;
                values_equal(&left, &right)
            }
            Operator::Condition => {
                let name = name_operand(f)?;
                self.condition(name, stack)
            }
            _ => {
                let value = self.value(node, stack)?;
                value.as_bool().ok_or_else(|| {
                    EvalError::mismatch(
                        context,
                        format!("expected a boolean, {} produced {}", f.operator, value.kind()),
                    )
                })
            }
        }
    }

    fn value(&self, node: &Node, stack: &mut Vec<String>) -> Result<Value, EvalError> {
        match node {
            Node::Null => Ok(Value::Null),
            Node::Bool(b) => Ok(Value::Bool(*b)),
            Node::Number(n) => Ok(Value::Number(n.as_f64())),
            Node::String(s) => Ok(Value::String(s.clone())),
            Node::Sequence(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match self.value(item, stack)? {
                        Value::NoValue => {}
                        v => out.push(v),
                    }
                }
                Ok(Value::List(out))
            }
            Node::Mapping(map) => {
                let mut out = BTreeMap::new();
                for (key, item) in map {
                    match self.value(item, stack)? {
                        Value::NoValue => {}
                        v => {
                            out.insert(key.clone(), v);
                        }
                    }
                }
                Ok(Value::Map(out))
            }
            Node::Function(f) => self.function_value(node, f, stack),
        }
    }

    fn function_value(
        &self,
        node: &Node,
        f: &FunctionNode,
        stack: &mut Vec<String>,
    ) -> Result<Value, EvalError> {
        match &f.operator {
            Operator::Ref => self.reference(name_operand(f)?),
            Operator::And
            | Operator::Or
            | Operator::Not
            | Operator::Equals
            | Operator::Condition => self.truth(node, CONDITION_CONTEXT, stack).map(Value::Bool),
            Operator::If => {
                let [test, when_true, when_false] = exactly::<3>(f)?;
                let chosen = match test {
                    Node::String(name) => self.condition(name, stack)?,
                    other => self.truth(other, "Fn::If", stack)?,
                };
                self.value(if chosen { when_true } else { when_false }, stack)
            }
            Operator::Unknown(name) => Err(EvalError::UnknownFunction { name: name.clone() }),
            Operator::GetAtt
            | Operator::Join
            | Operator::Sub
            | Operator::Select
            | Operator::Split
            | Operator::Base64
            | Operator::GetAZs
            | Operator::ImportValue => Ok(Value::Opaque {
                operator: f.operator.long_key(),
                detail: opaque_detail(f),
            }),
        }
    }

    fn reference(&self, name: &str) -> Result<Value, EvalError> {
        if let Some(param) = self.model.parameters().get(name) {
            let supplied = self.assignment.get(name).or(param.default.as_ref());
            return match (supplied, param.kind) {
                (Some(value), ParameterType::List) => Ok(match value.to_value() {
                    Value::String(s) => {
                        Value::List(split_list(&s).into_iter().map(Value::String).collect())
                    }
                    other => other,
                }),
                (Some(value), _) => Ok(value.to_value()),
                (None, ParameterType::String) => Ok(Value::String(String::new())),
                (None, ParameterType::List) => Ok(Value::List(Vec::new())),
                (None, ParameterType::Number) => Err(EvalError::UnresolvedReference {
                    kind: ReferenceKind::Parameter,
                    name: name.to_string(),
                    detail: "number parameter has no value and no default".to_string(),
                }),
            };
        }

        if name == NO_VALUE {
            return Ok(Value::NoValue);
        }
        if is_pseudo_parameter(name) {
            return Ok(match self.assignment.get(name) {
                Some(value) => value.to_value(),
                None => Value::Opaque {
                    operator: Operator::Ref.long_key(),
                    detail: name.to_string(),
                },
            });
        }
        if self.model.resource(name).is_some() {
            return Ok(Value::Opaque {
                operator: Operator::Ref.long_key(),
                detail: name.to_string(),
            });
        }

        Err(EvalError::UnresolvedReference {
            kind: ReferenceKind::Parameter,
            name: name.to_string(),
            detail: "not a declared parameter, resource, or pseudo parameter".to_string(),
        })
    }
}

/// Equality for `Fn::Equals`.
///
/// Two numbers compare numerically; other scalars compare by canonical text (case-sensitive);
/// lists compare element-wise. A list compared with a scalar uses its comma-joined text, so an
/// empty list parameter equals `""`. Placeholders and maps cannot be compared.
pub fn values_equal(left: &Value, right: &Value) -> Result<bool, EvalError> {
    match (left, right) {
        (Value::List(items), other) | (other, Value::List(items))
            if !matches!(other, Value::List(_)) =>
        {
            let Some(text) = other.scalar_text() else {
                return Err(EvalError::mismatch(
                    "Fn::Equals",
                    format!("cannot compare list with {}", other.kind()),
                ));
            };
            Ok(joined_text(items)? == text)
        }
        (Value::Number(a), Value::Number(b)) => Ok(a == b),
        (Value::List(a), Value::List(b)) => {
            if a.len() != b.len() {
                return Ok(false);
            }
            for (x, y) in a.iter().zip(b) {
                if !values_equal(x, y)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (a, b) => {
            for v in [a, b] {
                if matches!(v, Value::Opaque { .. } | Value::NoValue | Value::Map(_)) {
                    return Err(EvalError::mismatch(
                        "Fn::Equals",
                        format!("cannot compare {}", v.kind()),
                    ));
                }
            }
            match (a.scalar_text(), b.scalar_text()) {
                (Some(x), Some(y)) => Ok(x == y),
                _ => Err(EvalError::mismatch(
                    "Fn::Equals",
                    format!("cannot compare {} with {}", a.kind(), b.kind()),
                )),
            }
        }
    }
}

fn joined_text(items: &[Value]) -> Result<String, EvalError> {
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        let text = item.scalar_text().ok_or_else(|| {
            EvalError::mismatch(
                "Fn::Equals",
                format!("cannot compare a list holding a {} with a scalar", item.kind()),
            )
        })?;
        parts.push(text);
    }
    Ok(parts.join(","))
}

fn at_least(f: &FunctionNode, min: usize) -> Result<&[Node], EvalError> {
    if f.operands.len() < min {
        return Err(EvalError::mismatch(
            f.operator.long_key(),
            format!("expected at least {min} operands, found {}", f.operands.len()),
        ));
    }
    Ok(&f.operands)
}

fn exactly<const N: usize>(f: &FunctionNode) -> Result<&[Node; N], EvalError> {
    <&[Node; N]>::try_from(f.operands.as_slice()).map_err(|_| {
        EvalError::mismatch(
            f.operator.long_key(),
            format!("expected {N} operand(s), found {}", f.operands.len()),
        )
    })
}

fn name_operand(f: &FunctionNode) -> Result<&str, EvalError> {
    let [operand] = exactly::<1>(f)?;
    operand.as_str().ok_or_else(|| {
        EvalError::mismatch(
            f.operator.long_key(),
            format!("expected a name, found {}", operand.kind()),
        )
    })
}

fn opaque_detail(f: &FunctionNode) -> String {
    match f.sole_operand() {
        Some(Node::String(s)) => s.clone(),
        _ => {
            let operands: Vec<_> = f.operands.iter().map(Node::to_json).collect();
            serde_json::Value::Array(operands).to_string()
        }
    }
}

fn undeclared_resource(logical_id: &str) -> EvalError {
    EvalError::UnresolvedReference {
        kind: ReferenceKind::Resource,
        name: logical_id.to_string(),
        detail: "resource is not declared".to_string(),
    }
}

/// Walk the remaining path segments inside a resolved value.
fn select(value: Value, segments: &[&str]) -> Option<Value> {
    let mut current = value;
    for segment in segments {
        current = match current {
            Value::Map(mut map) => map.remove(*segment)?,
            Value::List(mut items) => {
                let i = segment.parse::<usize>().ok()?;
                if i >= items.len() {
                    return None;
                }
                items.swap_remove(i)
            }
            _ => return None,
        };
    }
    match current {
        Value::NoValue => None,
        v => Some(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParamValue;
    use crate::test_support::{assignment, model};

    const TEMPLATE: &str = r#"
Parameters:
  KmsMasterKeyArn:
    Type: String
    Default: ""
  Environment:
    Type: String
    AllowedValues: [devl, test, prod]
    Default: devl
  S3LifecycleConfigurationEnabled:
    Type: String
    Default: "false"
  TransitionToGlacierDays:
    Type: Number
  ExpirationDays:
    Type: Number
    Default: 365
  NotificationEvents:
    Type: CommaDelimitedList
Conditions:
  EnableKMSEncryption: !Not [!Equals [!Ref KmsMasterKeyArn, ""]]
  S3LifecycleConfigurationEnabled: !Equals [!Ref S3LifecycleConfigurationEnabled, "true"]
  TransitionToGlacierEnabled: !And
    - !Condition S3LifecycleConfigurationEnabled
    - !Not [!Equals [!Ref TransitionToGlacierDays, ""]]
  IsProd: !Equals [!Ref Environment, prod]
  LongExpiration: !Equals [!Ref ExpirationDays, 365]
  HasEvents: !Not [!Equals [!Ref NotificationEvents, []]]
  EventsNotEmpty: !Not [!Equals [!Ref NotificationEvents, ""]]
  Dangling: !Condition NotDeclared
  StringInAnd: !And [IsProd, true]
  Unknown: !Cidr [a, b]
  Undeclared: !Equals [!Ref Nope, x]
  Opaque: !Equals [!GetAtt S3Bucket.Arn, x]
  ShortAnd: !And [true]
Resources:
  S3Bucket:
    Type: AWS::S3::Bucket
    Properties:
      BucketEncryption: !If
        - EnableKMSEncryption
        - ServerSideEncryptionConfiguration:
            - ServerSideEncryptionByDefault:
                SSEAlgorithm: aws:kms
                KMSMasterKeyID: !Ref KmsMasterKeyArn
        - !Ref AWS::NoValue
      Tags:
        - Key: Environment
          Value: !Ref Environment
  Permission:
    Type: AWS::Lambda::Permission
    Condition: IsProd
"#;

    #[test]
    fn empty_value_convention_for_unassigned_string() {
        let m = model(TEMPLATE);
        let none = assignment(&[]);
        assert!(!Evaluator::new(&m, &none).evaluate_condition("EnableKMSEncryption").expect("eval"));

        let arn = assignment(&[("KmsMasterKeyArn", "arn:aws:kms:us-east-1:123:key/abc")]);
        assert!(Evaluator::new(&m, &arn).evaluate_condition("EnableKMSEncryption").expect("eval"));
    }

    #[test]
    fn defaults_apply_when_unassigned() {
        let m = model(TEMPLATE);
        let none = assignment(&[]);
        let eval = Evaluator::new(&m, &none);
        assert!(!eval.evaluate_condition("IsProd").expect("eval"));
        assert!(eval.evaluate_condition("LongExpiration").expect("eval"));
        assert!(!eval.evaluate_condition("HasEvents").expect("eval"));
    }

    #[test]
    fn dependent_condition_is_false_when_master_is_false() {
        let m = model(TEMPLATE);
        let a = assignment(&[
            ("S3LifecycleConfigurationEnabled", "false"),
            ("TransitionToGlacierDays", "90"),
        ]);
        assert!(!Evaluator::new(&m, &a).evaluate_condition("TransitionToGlacierEnabled").expect("eval"));

        let on = assignment(&[
            ("S3LifecycleConfigurationEnabled", "true"),
            ("TransitionToGlacierDays", "90"),
        ]);
        assert!(Evaluator::new(&m, &on).evaluate_condition("TransitionToGlacierEnabled").expect("eval"));
    }

    #[test]
    fn and_short_circuits_before_unresolved_number() {
        // TransitionToGlacierDays has no default, but the master condition is false first.
        let m = model(TEMPLATE);
        let none = assignment(&[]);
        assert_eq!(
            Evaluator::new(&m, &none).evaluate_condition("TransitionToGlacierEnabled"),
            Ok(false)
        );
    }

    #[test]
    fn number_without_value_or_default_is_unresolved() {
        let m = model(TEMPLATE);
        let on = assignment(&[("S3LifecycleConfigurationEnabled", "true")]);
        let err = Evaluator::new(&m, &on)
            .evaluate_condition("TransitionToGlacierEnabled")
            .expect_err("unresolved");
        assert!(matches!(
            err,
            EvalError::UnresolvedReference { kind: ReferenceKind::Parameter, ref name, .. }
                if name == "TransitionToGlacierDays"
        ));
    }

    #[test]
    fn numeric_equality_ignores_representation() {
        let m = model(TEMPLATE);
        let a: ParameterAssignment = [("ExpirationDays", ParamValue::Number(365.0))]
            .into_iter()
            .collect();
        assert!(Evaluator::new(&m, &a).evaluate_condition("LongExpiration").expect("eval"));

        let text = assignment(&[("ExpirationDays", "365")]);
        assert!(Evaluator::new(&m, &text).evaluate_condition("LongExpiration").expect("eval"));
    }

    #[test]
    fn error_cases_are_reported_not_coerced() {
        let m = model(TEMPLATE);
        let none = assignment(&[]);
        let eval = Evaluator::new(&m, &none);

        assert!(matches!(
            eval.evaluate_condition("Dangling"),
            Err(EvalError::UnresolvedReference { kind: ReferenceKind::Condition, .. })
        ));
        assert!(matches!(
            eval.evaluate_condition("StringInAnd"),
            Err(EvalError::TypeMismatch { ref operator, .. }) if operator == "Fn::And"
        ));
        assert_eq!(
            eval.evaluate_condition("Unknown"),
            Err(EvalError::UnknownFunction { name: "Cidr".into() })
        );
        assert!(matches!(
            eval.evaluate_condition("Undeclared"),
            Err(EvalError::UnresolvedReference { ref name, .. }) if name == "Nope"
        ));
        assert!(matches!(
            eval.evaluate_condition("Opaque"),
            Err(EvalError::TypeMismatch { ref operator, .. }) if operator == "Fn::Equals"
        ));
        assert!(matches!(
            eval.evaluate_condition("ShortAnd"),
            Err(EvalError::TypeMismatch { ref detail, .. }) if detail.contains("at least 2")
        ));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let m = model(TEMPLATE);
        let a = assignment(&[("Environment", "prod"), ("KmsMasterKeyArn", "arn")]);
        let eval = Evaluator::new(&m, &a);
        for name in m.conditions().names() {
            assert_eq!(eval.evaluate_condition(name), eval.evaluate_condition(name), "{name}");
        }
    }

    #[test]
    fn if_resolves_only_the_selected_branch() {
        let m = model(TEMPLATE);
        let none = assignment(&[]);
        let eval = Evaluator::new(&m, &none);
        let node = condeval_template::parse("!If [IsProd, !Cidr [x], kept]")
            .expect("parse")
            .into_root();
        assert_eq!(eval.resolve(&node), Ok(Value::String("kept".into())));
    }

    #[test]
    fn refs_to_resources_and_pseudo_parameters() {
        let m = model(TEMPLATE);
        let a: ParameterAssignment = [("AWS::Region", ParamValue::from("eu-west-1"))]
            .into_iter()
            .collect();
        let eval = Evaluator::new(&m, &a);

        assert_eq!(
            eval.resolve(&Node::reference("AWS::Region")),
            Ok(Value::String("eu-west-1".into()))
        );
        assert!(matches!(
            eval.resolve(&Node::reference("AWS::AccountId")),
            Ok(Value::Opaque { .. })
        ));
        assert!(matches!(eval.resolve(&Node::reference("S3Bucket")), Ok(Value::Opaque { .. })));
        assert_eq!(eval.resolve(&Node::reference("AWS::NoValue")), Ok(Value::NoValue));
    }

    #[test]
    fn resource_properties_follow_if_and_drop_no_value() {
        let m = model(TEMPLATE);
        let none = assignment(&[]);
        let eval = Evaluator::new(&m, &none);
        assert_eq!(eval.resolve_resource_property("S3Bucket", "BucketEncryption"), Ok(None));
        assert_eq!(
            eval.resolve_resource_property("S3Bucket", "Tags.0.Value"),
            Ok(Some(Value::String("devl".into())))
        );

        let arn = assignment(&[("KmsMasterKeyArn", "arn:key")]);
        let eval = Evaluator::new(&m, &arn);
        assert_eq!(
            eval.resolve_resource_property(
                "S3Bucket",
                "BucketEncryption.ServerSideEncryptionConfiguration.0.ServerSideEncryptionByDefault.KMSMasterKeyID"
            ),
            Ok(Some(Value::String("arn:key".into())))
        );
        assert!(eval.resolve_resource_property("Missing", "X").is_err());
    }

    #[test]
    fn resource_activity_honours_resource_conditions() {
        let m = model(TEMPLATE);
        let devl = assignment(&[]);
        let eval = Evaluator::new(&m, &devl);
        assert_eq!(eval.is_resource_active("S3Bucket"), Ok(true));
        assert_eq!(eval.is_resource_active("Permission"), Ok(false));

        let prod = assignment(&[("Environment", "prod")]);
        assert_eq!(Evaluator::new(&m, &prod).is_resource_active("Permission"), Ok(true));
    }

    #[test]
    fn list_parameters_split_comma_delimited_text() {
        let m = model(TEMPLATE);
        let a = assignment(&[("NotificationEvents", "s3:ObjectCreated:*,s3:ObjectRemoved:*")]);
        let eval = Evaluator::new(&m, &a);
        assert!(eval.evaluate_condition("HasEvents").expect("eval"));
        assert_eq!(
            eval.resolve(&Node::reference("NotificationEvents")),
            Ok(Value::List(vec![
                Value::String("s3:ObjectCreated:*".into()),
                Value::String("s3:ObjectRemoved:*".into()),
            ]))
        );
    }

    #[test]
    fn empty_list_parameter_equals_empty_string() {
        let m = model(TEMPLATE);
        for a in [assignment(&[]), assignment(&[("NotificationEvents", "")])] {
            let eval = Evaluator::new(&m, &a);
            assert_eq!(eval.evaluate_condition("EventsNotEmpty"), Ok(false));
            assert_eq!(eval.evaluate_condition("HasEvents"), Ok(false));
        }

        let set = assignment(&[("NotificationEvents", "s3:ObjectCreated:*")]);
        assert_eq!(
            Evaluator::new(&m, &set).evaluate_condition("EventsNotEmpty"),
            Ok(true)
        );
    }

    #[test]
    fn list_compared_with_scalar_uses_joined_text() {
        let list = Value::List(vec![Value::String("a".into()), Value::String("b".into())]);
        assert_eq!(values_equal(&list, &Value::String("a,b".into())), Ok(true));
        assert_eq!(values_equal(&Value::String("a".into()), &list), Ok(false));
        assert_eq!(
            values_equal(&Value::List(vec![Value::String("a".into())]), &Value::String("a".into())),
            Ok(true)
        );

        let opaque = Value::List(vec![Value::Opaque {
            operator: "Fn::GetAtt".into(),
            detail: "S3Bucket.Arn".into(),
        }]);
        assert!(matches!(
            values_equal(&opaque, &Value::String(String::new())),
            Err(EvalError::TypeMismatch { .. })
        ));
        assert!(matches!(
            values_equal(&list, &Value::NoValue),
            Err(EvalError::TypeMismatch { .. })
        ));
    }
}
