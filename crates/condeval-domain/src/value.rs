use std::collections::BTreeMap;
use std::fmt;

/// Result of resolving a value-producing expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// Placeholder for intrinsics whose result is only known at deploy time
    /// (`GetAtt`, `Sub`, `Join`, resource `Ref`s, ...).
    Opaque { operator: String, detail: String },
    /// `Ref AWS::NoValue`: removes the enclosing property.
    NoValue,
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Opaque { .. } => "opaque value",
            Value::NoValue => "AWS::NoValue",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Canonical text of a scalar, used for equality and enumerated-value membership.
    ///
    /// Non-scalars return `None`.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Value::Null => Some(String::new()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(number_text(*n)),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(map) => write!(f, "{{{} keys}}", map.len()),
            Value::Opaque { operator, detail } => write!(f, "<{operator} {detail}>"),
            Value::NoValue => f.write_str("<AWS::NoValue>"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Number(n) => f.write_str(&number_text(*n)),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => f.write_str("null"),
        }
    }
}

/// Integral numbers render without a fractional part (`30`, not `30.0`).
pub fn number_text(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_have_a_canonical_text() {
        assert_eq!(number_text(30.0), "30");
        assert_eq!(number_text(-2.0), "-2");
        assert_eq!(number_text(0.5), "0.5");
    }

    #[test]
    fn only_scalars_have_scalar_text() {
        assert_eq!(Value::Bool(true).scalar_text().as_deref(), Some("true"));
        assert_eq!(Value::String("prod".into()).scalar_text().as_deref(), Some("prod"));
        assert!(Value::List(vec![]).scalar_text().is_none());
        assert!(Value::NoValue.scalar_text().is_none());
    }
}
