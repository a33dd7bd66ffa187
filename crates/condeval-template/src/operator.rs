use std::fmt;

/// Prefix shared by every long-form intrinsic key except `Ref` and `Condition`.
pub const LONG_FORM_PREFIX: &str = "Fn::";

/// Intrinsic function carried by a [`crate::FunctionNode`].
///
/// The set is closed; anything else is kept as [`Operator::Unknown`] so documents using newer
/// intrinsics still parse. Unknown operators only fail when evaluated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    Ref,
    GetAtt,
    Join,
    Sub,
    Select,
    Split,
    Base64,
    GetAZs,
    ImportValue,
    If,
    Not,
    Equals,
    And,
    Or,
    Condition,
    Unknown(String),
}

impl Operator {
    /// Resolve a short-form tag name (without the leading `!`).
    pub fn from_tag(name: &str) -> Self {
        match name {
            "Ref" => Operator::Ref,
            "GetAtt" => Operator::GetAtt,
            "Join" => Operator::Join,
            "Sub" => Operator::Sub,
            "Select" => Operator::Select,
            "Split" => Operator::Split,
            "Base64" => Operator::Base64,
            "GetAZs" => Operator::GetAZs,
            "ImportValue" => Operator::ImportValue,
            "If" => Operator::If,
            "Not" => Operator::Not,
            "Equals" => Operator::Equals,
            "And" => Operator::And,
            "Or" => Operator::Or,
            "Condition" => Operator::Condition,
            other => Operator::Unknown(other.to_string()),
        }
    }

    /// Resolve a long-form mapping key (`Ref`, `Condition`, `Fn::Name`).
    ///
    /// Returns `None` for keys that do not denote an intrinsic.
    pub fn from_long_key(key: &str) -> Option<Self> {
        match key {
            "Ref" => Some(Operator::Ref),
            "Condition" => Some(Operator::Condition),
            _ => {
                let name = key.strip_prefix(LONG_FORM_PREFIX)?;
                if name.is_empty() {
                    return None;
                }
                Some(Operator::from_tag(name))
            }
        }
    }

    /// Short tag name, as written after `!`.
    pub fn name(&self) -> &str {
        match self {
            Operator::Ref => "Ref",
            Operator::GetAtt => "GetAtt",
            Operator::Join => "Join",
            Operator::Sub => "Sub",
            Operator::Select => "Select",
            Operator::Split => "Split",
            Operator::Base64 => "Base64",
            Operator::GetAZs => "GetAZs",
            Operator::ImportValue => "ImportValue",
            Operator::If => "If",
            Operator::Not => "Not",
            Operator::Equals => "Equals",
            Operator::And => "And",
            Operator::Or => "Or",
            Operator::Condition => "Condition",
            Operator::Unknown(name) => name,
        }
    }

    /// Key used by the long (JSON) form.
    pub fn long_key(&self) -> String {
        match self {
            Operator::Ref | Operator::Condition => self.name().to_string(),
            other => format!("{LONG_FORM_PREFIX}{}", other.name()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Operator::Unknown(_))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.long_key())
    }
}
