use crate::error::TemplateError;
use crate::model::ParamValue;
use condeval_template::{Document, Node};
use regex::Regex;
use std::collections::BTreeMap;

const SECTION: &str = "Parameters";

/// Declared type family of a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterType {
    String,
    Number,
    /// `CommaDelimitedList` and `List<...>`.
    List,
}

impl ParameterType {
    /// Map a declared `Type` string onto a family. Unrecognized types are strings
    /// (e.g. `AWS::EC2::VPC::Id`).
    pub fn from_declared(declared: &str) -> Self {
        match declared {
            "Number" => ParameterType::Number,
            "CommaDelimitedList" => ParameterType::List,
            d if d.starts_with("List<") => ParameterType::List,
            _ => ParameterType::String,
        }
    }
}

/// A compiled `AllowedPattern`, anchored to the whole value.
#[derive(Clone, Debug)]
pub struct AllowedPattern {
    source: String,
    regex: Regex,
}

impl AllowedPattern {
    fn compile(parameter: &str, source: &str) -> Result<Self, TemplateError> {
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(|e| {
            TemplateError::InvalidPattern {
                parameter: parameter.to_string(),
                pattern: source.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

#[derive(Clone, Debug)]
pub struct Parameter {
    pub name: String,
    /// The `Type` string as written in the template.
    pub declared_type: String,
    pub kind: ParameterType,
    pub allowed_values: Option<Vec<String>>,
    pub allowed_pattern: Option<AllowedPattern>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub default: Option<ParamValue>,
    pub description: Option<String>,
    pub constraint_description: Option<String>,
}

impl Parameter {
    /// A bare parameter with no constraints.
    pub fn new(name: impl Into<String>, kind: ParameterType) -> Self {
        let declared_type = match kind {
            ParameterType::String => "String",
            ParameterType::Number => "Number",
            ParameterType::List => "CommaDelimitedList",
        };
        Self {
            name: name.into(),
            declared_type: declared_type.to_string(),
            kind,
            allowed_values: None,
            allowed_pattern: None,
            min_length: None,
            max_length: None,
            min_value: None,
            max_value: None,
            default: None,
            description: None,
            constraint_description: None,
        }
    }
}

/// Declared parameters, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct ParameterRegistry {
    params: BTreeMap<String, Parameter>,
}

impl ParameterRegistry {
    /// Read the top-level `Parameters` section. A missing section yields an empty registry.
    pub fn build(doc: &Document) -> Result<Self, TemplateError> {
        let mut params = BTreeMap::new();
        let section = match doc.section(SECTION) {
            None | Some(Node::Null) => return Ok(Self { params }),
            Some(node) => node.as_mapping().ok_or_else(|| {
                invalid(format!("expected a mapping, found {}", node.kind()))
            })?,
        };

        for (name, decl) in section {
            let param = parse_parameter(name, decl)?;
            params.insert(name.clone(), param);
        }

        tracing::debug!(parameters = params.len(), "built parameter registry");
        Ok(Self { params })
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.values()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl FromIterator<Parameter> for ParameterRegistry {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().map(|p| (p.name.clone(), p)).collect(),
        }
    }
}

fn invalid(detail: String) -> TemplateError {
    TemplateError::InvalidSection {
        section: SECTION.to_string(),
        detail,
    }
}

fn parse_parameter(name: &str, decl: &Node) -> Result<Parameter, TemplateError> {
    let Some(fields) = decl.as_mapping() else {
        return Err(invalid(format!(
            "parameter '{name}' must be a mapping, found {}",
            decl.kind()
        )));
    };

    let declared_type = match fields.get("Type") {
        None => "String".to_string(),
        Some(node) => node
            .as_str()
            .ok_or_else(|| invalid(format!("parameter '{name}' has a non-string Type")))?
            .to_string(),
    };
    let kind = ParameterType::from_declared(&declared_type);

    let allowed_values = match fields.get("AllowedValues") {
        None => None,
        Some(Node::Sequence(items)) => Some(
            items
                .iter()
                .map(|item| {
                    scalar_text(item).ok_or_else(|| {
                        invalid(format!(
                            "parameter '{name}' has a non-scalar AllowedValues entry"
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Some(other) => {
            return Err(invalid(format!(
                "parameter '{name}' AllowedValues must be a sequence, found {}",
                other.kind()
            )));
        }
    };

    let allowed_pattern = match fields.get("AllowedPattern") {
        None => None,
        Some(node) => {
            let source = node.as_str().ok_or_else(|| {
                invalid(format!("parameter '{name}' has a non-string AllowedPattern"))
            })?;
            Some(AllowedPattern::compile(name, source)?)
        }
    };

    let number = |field: &str| -> Result<Option<f64>, TemplateError> {
        match fields.get(field) {
            None => Ok(None),
            Some(node) => numeric(node).map(Some).ok_or_else(|| {
                invalid(format!("parameter '{name}' {field} must be numeric"))
            }),
        }
    };
    let length = |field: &str| -> Result<Option<u64>, TemplateError> {
        match number(field)? {
            None => Ok(None),
            Some(n) if n >= 0.0 && n.fract() == 0.0 => Ok(Some(n as u64)),
            Some(n) => Err(invalid(format!(
                "parameter '{name}' {field} must be a non-negative integer, found {n}"
            ))),
        }
    };

    let default = match fields.get("Default") {
        None => None,
        Some(node) => Some(default_value(name, kind, node)?),
    };

    Ok(Parameter {
        name: name.to_string(),
        declared_type,
        kind,
        allowed_values,
        allowed_pattern,
        min_length: length("MinLength")?,
        max_length: length("MaxLength")?,
        min_value: number("MinValue")?,
        max_value: number("MaxValue")?,
        default,
        description: fields.get("Description").and_then(scalar_text),
        constraint_description: fields.get("ConstraintDescription").and_then(scalar_text),
    })
}

fn default_value(name: &str, kind: ParameterType, node: &Node) -> Result<ParamValue, TemplateError> {
    if let Some(items) = node.as_sequence() {
        let items = items
            .iter()
            .map(|i| {
                scalar_text(i).ok_or_else(|| {
                    invalid(format!("parameter '{name}' has a non-scalar Default entry"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(ParamValue::List(items));
    }

    let text = scalar_text(node)
        .ok_or_else(|| invalid(format!("parameter '{name}' has a non-scalar Default")))?;
    Ok(match (kind, node) {
        (ParameterType::Number, Node::Number(n)) => ParamValue::Number(n.as_f64()),
        (ParameterType::List, _) => ParamValue::List(split_list(&text)),
        _ => ParamValue::String(text),
    })
}

/// Canonical text of a scalar node; `None` for sequences, mappings, and functions.
pub(crate) fn scalar_text(node: &Node) -> Option<String> {
    match node {
        Node::String(s) => Some(s.clone()),
        Node::Number(n) => Some(n.to_string()),
        Node::Bool(b) => Some(b.to_string()),
        Node::Null => Some(String::new()),
        Node::Sequence(_) | Node::Mapping(_) | Node::Function(_) => None,
    }
}

fn numeric(node: &Node) -> Option<f64> {
    match node {
        Node::Number(n) => Some(n.as_f64()),
        Node::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Split a `CommaDelimitedList` value. The empty string is the empty list; elements keep
/// surrounding whitespace.
pub(crate) fn split_list(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(',').map(str::to_string).collect()
}
