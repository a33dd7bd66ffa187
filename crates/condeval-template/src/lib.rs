//! Tagged-node parser for CloudFormation-style templates.
//!
//! Turns YAML (or JSON) text into a [`Document`] where every intrinsic function, whether
//! written as a short tag (`!Equals [a, b]`) or as a long-form mapping
//! (`{"Fn::Equals": [a, b]}`), becomes a [`FunctionNode`]. No evaluation happens here.

#![forbid(unsafe_code)]

mod emit;
mod error;
mod node;
mod number;
mod operator;
mod parse;

pub use error::{EmitError, ParseError};
pub use node::{Document, Form, FunctionNode, Node, OperandShape};
pub use number::Number;
pub use operator::{LONG_FORM_PREFIX, Operator};
pub use parse::parse;
