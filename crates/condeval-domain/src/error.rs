use std::fmt;
use thiserror::Error;

/// Fatal problems found while building a [`crate::model::TemplateModel`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template root must be a mapping, found {found}")]
    RootNotMapping { found: &'static str },

    #[error("invalid {section} section: {detail}")]
    InvalidSection { section: String, detail: String },

    #[error("parameter '{parameter}' has an invalid AllowedPattern '{pattern}': {message}")]
    InvalidPattern {
        parameter: String,
        pattern: String,
        message: String,
    },

    #[error("cyclic condition dependency: {}", .cycle.join(" -> "))]
    CyclicCondition { cycle: Vec<String> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceKind {
    Parameter,
    Condition,
    Resource,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReferenceKind::Parameter => "parameter",
            ReferenceKind::Condition => "condition",
            ReferenceKind::Resource => "resource",
        })
    }
}

/// Failure of a single evaluation. Never coerced to `false`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("unresolved {kind} reference '{name}': {detail}")]
    UnresolvedReference {
        kind: ReferenceKind,
        name: String,
        detail: String,
    },

    #[error("type mismatch in {operator}: {detail}")]
    TypeMismatch { operator: String, detail: String },

    #[error("cyclic condition dependency: {}", .cycle.join(" -> "))]
    CyclicCondition { cycle: Vec<String> },

    #[error("unknown intrinsic function '{name}'")]
    UnknownFunction { name: String },
}

impl EvalError {
    pub(crate) fn mismatch(operator: impl Into<String>, detail: impl Into<String>) -> Self {
        EvalError::TypeMismatch {
            operator: operator.into(),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_messages_list_the_path() {
        let err = TemplateError::CyclicCondition {
            cycle: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "cyclic condition dependency: A -> B -> A");
    }

    #[test]
    fn unresolved_reference_names_the_kind() {
        let err = EvalError::UnresolvedReference {
            kind: ReferenceKind::Condition,
            name: "IsProd".into(),
            detail: "condition is not declared".into(),
        };
        assert_eq!(
            err.to_string(),
            "unresolved condition reference 'IsProd': condition is not declared"
        );
    }
}
