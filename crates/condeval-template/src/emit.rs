//! Re-serialization of parsed templates.
//!
//! YAML output restores the surface syntax each intrinsic was read from. JSON has no tags, so
//! JSON output always uses the long form.

use crate::error::EmitError;
use crate::node::{Document, Form, FunctionNode, Node, OperandShape};
use crate::number::Number;
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use serde_yaml::value::{Tag, TaggedValue};

impl Document {
    pub fn to_yaml_string(&self) -> Result<String, EmitError> {
        Ok(serde_yaml::to_string(&self.root().to_yaml())?)
    }

    pub fn to_json(&self) -> JsonValue {
        self.root().to_json()
    }
}

impl Node {
    pub fn to_yaml(&self) -> YamlValue {
        match self {
            Node::Null => YamlValue::Null,
            Node::Bool(b) => YamlValue::Bool(*b),
            Node::Number(n) => yaml_number(*n),
            Node::String(s) => YamlValue::String(s.clone()),
            Node::Sequence(items) => YamlValue::Sequence(items.iter().map(Node::to_yaml).collect()),
            Node::Mapping(map) => YamlValue::Mapping(
                map.iter()
                    .map(|(k, v)| (YamlValue::String(k.clone()), v.to_yaml()))
                    .collect(),
            ),
            Node::Function(f) => function_to_yaml(f),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Node::Null => JsonValue::Null,
            Node::Bool(b) => JsonValue::Bool(*b),
            Node::Number(n) => json_number(*n),
            Node::String(s) => JsonValue::String(s.clone()),
            Node::Sequence(items) => JsonValue::Array(items.iter().map(Node::to_json).collect()),
            Node::Mapping(map) => JsonValue::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Node::Function(f) => {
                let body = match f.shape {
                    OperandShape::List => {
                        JsonValue::Array(f.operands.iter().map(Node::to_json).collect())
                    }
                    OperandShape::Single => f.sole_operand().map_or(JsonValue::Null, Node::to_json),
                };
                let mut obj = serde_json::Map::new();
                obj.insert(f.operator.long_key(), body);
                JsonValue::Object(obj)
            }
        }
    }
}

fn function_to_yaml(f: &FunctionNode) -> YamlValue {
    let body = match f.shape {
        OperandShape::List => YamlValue::Sequence(f.operands.iter().map(Node::to_yaml).collect()),
        OperandShape::Single => f.sole_operand().map_or(YamlValue::Null, Node::to_yaml),
    };

    match f.form {
        Form::Tag => YamlValue::Tagged(Box::new(TaggedValue {
            tag: Tag::new(f.operator.name()),
            value: body,
        })),
        Form::Long => {
            let mut mapping = serde_yaml::Mapping::new();
            mapping.insert(YamlValue::String(f.operator.long_key()), body);
            YamlValue::Mapping(mapping)
        }
    }
}

fn yaml_number(n: Number) -> YamlValue {
    match n {
        Number::Int(i) => YamlValue::Number(i.into()),
        Number::UInt(u) => YamlValue::Number(u.into()),
        Number::Float(f) => YamlValue::Number(f.into()),
    }
}

fn json_number(n: Number) -> JsonValue {
    match n {
        Number::Int(i) => JsonValue::from(i),
        Number::UInt(u) => JsonValue::from(u),
        Number::Float(f) => serde_json::Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
    }
}
