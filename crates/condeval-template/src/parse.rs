use crate::error::ParseError;
use crate::node::{Document, Form, FunctionNode, Node};
use crate::number::Number;
use crate::operator::Operator;
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Parse template text into a [`Document`].
///
/// JSON is accepted as a YAML subset. Custom tags become [`FunctionNode`]s regardless of the
/// node they are attached to, and single-key mappings keyed by `Ref`, `Condition`, or
/// `Fn::<Name>` are normalized the same way.
pub fn parse(text: &str) -> Result<Document, ParseError> {
    let value: Value = serde_yaml::from_str(text).map_err(|e| {
        let location = e.location();
        ParseError::Syntax {
            message: e.to_string(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
        }
    })?;

    let root = convert(value)?;
    tracing::debug!(
        sections = root.as_mapping().map(|m| m.len()).unwrap_or(0),
        "parsed template"
    );
    Ok(Document::new(root))
}

fn convert(value: Value) -> Result<Node, ParseError> {
    match value {
        Value::Null => Ok(Node::Null),
        Value::Bool(b) => Ok(Node::Bool(b)),
        Value::Number(n) => Ok(Node::Number(Number::from(&n))),
        Value::String(s) => Ok(Node::String(s)),
        Value::Sequence(items) => items
            .into_iter()
            .map(convert)
            .collect::<Result<Vec<_>, _>>()
            .map(Node::Sequence),
        Value::Mapping(mapping) => {
            let mut map = BTreeMap::new();
            for (k, v) in mapping {
                map.insert(key_string(k)?, convert(v)?);
            }
            Ok(long_form(map))
        }
        Value::Tagged(tagged) => {
            let tag = tagged.tag.to_string();
            let operator = Operator::from_tag(tag.trim_start_matches('!'));
            let function = function(operator, tagged.value)?;
            Ok(Node::Function(function))
        }
    }
}

fn function(operator: Operator, value: Value) -> Result<FunctionNode, ParseError> {
    Ok(match value {
        Value::Sequence(items) => FunctionNode::list(
            operator,
            items
                .into_iter()
                .map(convert)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        other => FunctionNode::single(operator, convert(other)?),
    })
}

/// Collapse `{"Fn::Name": x}` into a function node; other mappings pass through.
fn long_form(mut map: BTreeMap<String, Node>) -> Node {
    if map.len() != 1 {
        return Node::Mapping(map);
    }
    let Some(operator) = map.keys().next().and_then(|k| Operator::from_long_key(k)) else {
        return Node::Mapping(map);
    };
    let Some((_, operand)) = map.pop_first() else {
        return Node::Mapping(map);
    };

    let function = match operand {
        Node::Sequence(items) => FunctionNode::list(operator, items),
        other => FunctionNode::single(operator, other),
    };
    Node::Function(function.with_form(Form::Long))
}

fn key_string(key: Value) -> Result<String, ParseError> {
    match key {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Sequence(_) => Err(ParseError::UnsupportedKey { kind: "sequence" }),
        Value::Mapping(_) => Err(ParseError::UnsupportedKey { kind: "mapping" }),
        Value::Tagged(_) => Err(ParseError::UnsupportedKey { kind: "tagged" }),
    }
}
