use crate::error::TemplateError;
use crate::graph::ConditionGraph;
use crate::registry::ParameterRegistry;
use crate::value::{Value, number_text};
use condeval_template::{Document, Node};
use std::collections::BTreeMap;

/// `AWS::NoValue`, the pseudo parameter that removes a property.
pub const NO_VALUE: &str = "AWS::NoValue";

/// Pseudo parameters a `Ref` may name without a declaration.
pub const PSEUDO_PARAMETERS: &[&str] = &[
    "AWS::AccountId",
    "AWS::NotificationARNs",
    NO_VALUE,
    "AWS::Partition",
    "AWS::Region",
    "AWS::StackId",
    "AWS::StackName",
    "AWS::URLSuffix",
];

pub fn is_pseudo_parameter(name: &str) -> bool {
    PSEUDO_PARAMETERS.contains(&name)
}

/// One value supplied for a parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    String(String),
    Number(f64),
    List(Vec<String>),
}

impl ParamValue {
    /// The value as the evaluator sees it.
    pub fn to_value(&self) -> Value {
        match self {
            ParamValue::String(s) => Value::String(s.clone()),
            ParamValue::Number(n) => Value::Number(*n),
            ParamValue::List(items) => {
                Value::List(items.iter().cloned().map(Value::String).collect())
            }
        }
    }

    /// Text form of a scalar value; lists are comma-joined.
    pub fn text(&self) -> String {
        match self {
            ParamValue::String(s) => s.clone(),
            ParamValue::Number(n) => number_text(*n),
            ParamValue::List(items) => items.join(","),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(items: Vec<String>) -> Self {
        ParamValue::List(items)
    }
}

/// Concrete parameter values for one scenario. Immutable once built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterAssignment {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterAssignment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterAssignment
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// One entry of the `Resources` section.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceDecl {
    pub logical_id: String,
    pub resource_type: Option<String>,
    /// Resource-level `Condition` gating creation.
    pub condition: Option<String>,
    pub properties: Option<Node>,
}

/// Everything the engine needs from one template. Built once, read-only afterwards.
#[derive(Clone, Debug)]
pub struct TemplateModel {
    document: Document,
    parameters: ParameterRegistry,
    conditions: ConditionGraph,
    resources: BTreeMap<String, ResourceDecl>,
    outputs: Vec<String>,
}

impl TemplateModel {
    pub fn build(document: Document) -> Result<Self, TemplateError> {
        if document.root().as_mapping().is_none() {
            return Err(TemplateError::RootNotMapping {
                found: document.root().kind(),
            });
        }

        let parameters = ParameterRegistry::build(&document)?;
        let conditions = ConditionGraph::build(&document)?;
        let resources = read_resources(&document);
        let outputs = document
            .section("Outputs")
            .and_then(Node::as_mapping)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();

        tracing::debug!(
            parameters = parameters.len(),
            conditions = conditions.len(),
            resources = resources.len(),
            "built template model"
        );

        Ok(Self {
            document,
            parameters,
            conditions,
            resources,
            outputs,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn parameters(&self) -> &ParameterRegistry {
        &self.parameters
    }

    pub fn conditions(&self) -> &ConditionGraph {
        &self.conditions
    }

    pub fn resource(&self, logical_id: &str) -> Option<&ResourceDecl> {
        self.resources.get(logical_id)
    }

    /// Resources in logical-ID order.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceDecl> {
        self.resources.values()
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }
}

fn read_resources(document: &Document) -> BTreeMap<String, ResourceDecl> {
    let Some(section) = document.section("Resources").and_then(Node::as_mapping) else {
        return BTreeMap::new();
    };

    section
        .iter()
        .map(|(id, decl)| {
            let resource = ResourceDecl {
                logical_id: id.clone(),
                resource_type: decl.get("Type").and_then(Node::as_str).map(str::to_string),
                condition: decl
                    .get("Condition")
                    .and_then(Node::as_str)
                    .map(str::to_string),
                properties: decl.get("Properties").cloned(),
            };
            (id.clone(), resource)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use condeval_template::parse;

    #[test]
    fn model_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TemplateModel>();
        assert_send_sync::<ParameterAssignment>();
    }

    #[test]
    fn root_must_be_a_mapping() {
        let err = TemplateModel::build(parse("- a\n- b\n").expect("parse")).expect_err("root");
        assert_eq!(err, TemplateError::RootNotMapping { found: "sequence" });
    }

    #[test]
    fn resources_record_type_and_condition() {
        let text = r#"
Resources:
  S3Bucket:
    Type: AWS::S3::Bucket
    Properties:
      BucketName: demo
  Permission:
    Type: AWS::Lambda::Permission
    Condition: LambdaEventNotifyConfigEnabled
  Broken: 42
Outputs:
  S3BucketArn:
    Value: !GetAtt S3Bucket.Arn
"#;
        let model = TemplateModel::build(parse(text).expect("parse")).expect("model");
        let ids: Vec<_> = model.resources().map(|r| r.logical_id.as_str()).collect();
        assert_eq!(ids, vec!["Broken", "Permission", "S3Bucket"]);

        let permission = model.resource("Permission").expect("Permission");
        assert_eq!(
            permission.condition.as_deref(),
            Some("LambdaEventNotifyConfigEnabled")
        );
        assert_eq!(model.resource("Broken").and_then(|r| r.resource_type.clone()), None);
        assert!(model.resource("S3Bucket").and_then(|r| r.properties.as_ref()).is_some());
        assert_eq!(model.outputs(), ["S3BucketArn".to_string()]);
    }

    #[test]
    fn assignment_is_built_from_pairs() {
        let assignment: ParameterAssignment = [
            ("Environment", ParamValue::from("prod")),
            ("TransitionToGlacierDays", ParamValue::from(120.0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(assignment.len(), 2);
        assert_eq!(assignment.get("Environment").map(ParamValue::text).as_deref(), Some("prod"));
        assert_eq!(
            assignment.get("TransitionToGlacierDays").map(ParamValue::text).as_deref(),
            Some("120")
        );
        assert!(!assignment.contains("ProjectName"));
    }
}
