use crate::number::Number;
use crate::operator::Operator;
use std::collections::BTreeMap;

/// How the operands were written.
///
/// `Single` means the intrinsic was applied to a scalar, a mapping, or another intrinsic, and
/// `operands` holds exactly one element. `List` means it was applied to a sequence whose
/// elements are the operands. A `Single` operand is never a [`Node::Sequence`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandShape {
    Single,
    List,
}

/// Which surface syntax produced the intrinsic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Form {
    /// `!Name value`
    Tag,
    /// `{"Fn::Name": value}` (or `Ref` / `Condition`)
    Long,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionNode {
    pub operator: Operator,
    pub operands: Vec<Node>,
    pub shape: OperandShape,
    pub form: Form,
}

impl FunctionNode {
    pub fn single(operator: Operator, operand: Node) -> Self {
        Self {
            operator,
            operands: vec![operand],
            shape: OperandShape::Single,
            form: Form::Tag,
        }
    }

    pub fn list(operator: Operator, operands: Vec<Node>) -> Self {
        Self {
            operator,
            operands,
            shape: OperandShape::List,
            form: Form::Tag,
        }
    }

    pub fn with_form(mut self, form: Form) -> Self {
        self.form = form;
        self
    }

    /// The operand when the intrinsic carries exactly one.
    pub fn sole_operand(&self) -> Option<&Node> {
        match self.operands.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

/// One node of a parsed template.
///
/// Mapping keys are stored sorted; source key order carries no meaning.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Node>),
    Mapping(BTreeMap<String, Node>),
    Function(FunctionNode),
}

impl Node {
    pub fn string(s: impl Into<String>) -> Self {
        Node::String(s.into())
    }

    pub fn mapping<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Node)>,
        K: Into<String>,
    {
        Node::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build `!Ref name`.
    pub fn reference(name: impl Into<String>) -> Self {
        Node::Function(FunctionNode::single(Operator::Ref, Node::string(name)))
    }

    /// Build `!Condition name`.
    pub fn condition(name: impl Into<String>) -> Self {
        Node::Function(FunctionNode::single(Operator::Condition, Node::string(name)))
    }

    /// Build a list-shaped intrinsic such as `!And [a, b]`.
    pub fn call(operator: Operator, operands: Vec<Node>) -> Self {
        Node::Function(FunctionNode::list(operator, operands))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "boolean",
            Node::Number(_) => "number",
            Node::String(_) => "string",
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
            Node::Function(_) => "function",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionNode> {
        match self {
            Node::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Look up a key when this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping()?.get(key)
    }

    /// Pre-order traversal over this node and every descendant, operands included.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        let children: Box<dyn Iterator<Item = &'a Node>> = match self {
            Node::Sequence(items) => Box::new(items.iter()),
            Node::Mapping(map) => Box::new(map.values()),
            Node::Function(f) => Box::new(f.operands.iter()),
            Node::Null | Node::Bool(_) | Node::Number(_) | Node::String(_) => return,
        };
        for child in children {
            child.walk(visit);
        }
    }
}

/// A parsed template.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    root: Node,
}

impl Document {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    /// A top-level section such as `Parameters` or `Conditions`.
    pub fn section(&self, name: &str) -> Option<&Node> {
        self.root.get(name)
    }
}
