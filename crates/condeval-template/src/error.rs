use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Malformed YAML/JSON markup.
    #[error("template syntax error{}: {message}", position(.line, .column))]
    Syntax {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    /// A mapping key that is itself a sequence, mapping, or tagged node.
    #[error("unsupported mapping key: {kind} keys cannot be represented")]
    UnsupportedKey { kind: &'static str },
}

#[derive(Debug, Error)]
#[error("failed to serialize template: {0}")]
pub struct EmitError(#[from] pub serde_yaml::Error);

fn position(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(l), Some(c)) => format!(" at line {l}, column {c}"),
        (Some(l), None) => format!(" at line {l}"),
        _ => String::new(),
    }
}
