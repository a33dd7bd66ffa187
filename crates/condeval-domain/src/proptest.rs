//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Boolean algebra of the logical operators
//! - Evaluation idempotence
//! - Cycle detection for arbitrary condition names

use crate::error::TemplateError;
use crate::eval::Evaluator;
use crate::graph::ConditionGraph;
use crate::model::ParameterAssignment;
use crate::test_support::model;
use condeval_template::{Node, Operator};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

const FLAGS: &str = r#"
Parameters:
  Flag0: { Type: String, Default: "false" }
  Flag1: { Type: String, Default: "false" }
  Flag2: { Type: String, Default: "false" }
  Flag3: { Type: String, Default: "false" }
"#;

// ============================================================================
// Strategies
// ============================================================================

/// Boolean expressions over `Flag0..Flag3`, nested up to a few levels.
fn arb_expr() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Node::Bool),
        (0usize..4).prop_map(|i| {
            Node::call(
                Operator::Equals,
                vec![Node::reference(format!("Flag{i}")), Node::string("true")],
            )
        }),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(not),
            prop::collection::vec(inner.clone(), 2..4)
                .prop_map(|ops| Node::call(Operator::And, ops)),
            prop::collection::vec(inner, 2..4).prop_map(|ops| Node::call(Operator::Or, ops)),
        ]
    })
}

fn arb_assignment() -> impl Strategy<Value = ParameterAssignment> {
    prop::collection::vec(any::<bool>(), 4).prop_map(|flags| {
        flags
            .into_iter()
            .enumerate()
            .map(|(i, on)| (format!("Flag{i}"), on.to_string()))
            .collect()
    })
}

/// Distinct condition names.
fn arb_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[A-Z][A-Za-z0-9]{0,11}", 1..8)
        .prop_map(|names: BTreeSet<String>| names.into_iter().collect())
}

fn not(node: Node) -> Node {
    Node::call(Operator::Not, vec![node])
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn and_or_are_commutative(p in arb_expr(), q in arb_expr(), a in arb_assignment()) {
        let m = model(FLAGS);
        let eval = Evaluator::new(&m, &a);

        let pq = eval.evaluate(&Node::call(Operator::And, vec![p.clone(), q.clone()]));
        let qp = eval.evaluate(&Node::call(Operator::And, vec![q.clone(), p.clone()]));
        prop_assert_eq!(pq, qp);

        let pq = eval.evaluate(&Node::call(Operator::Or, vec![p.clone(), q.clone()]));
        let qp = eval.evaluate(&Node::call(Operator::Or, vec![q, p]));
        prop_assert_eq!(pq, qp);
    }

    #[test]
    fn double_negation_is_identity(p in arb_expr(), a in arb_assignment()) {
        let m = model(FLAGS);
        let eval = Evaluator::new(&m, &a);
        prop_assert_eq!(eval.evaluate(&not(not(p.clone()))), eval.evaluate(&p));
    }

    #[test]
    fn excluded_middle_and_contradiction(p in arb_expr(), a in arb_assignment()) {
        let m = model(FLAGS);
        let eval = Evaluator::new(&m, &a);
        let or = Node::call(Operator::Or, vec![p.clone(), not(p.clone())]);
        let and = Node::call(Operator::And, vec![p.clone(), not(p)]);
        prop_assert_eq!(eval.evaluate(&or), Ok(true));
        prop_assert_eq!(eval.evaluate(&and), Ok(false));
    }

    #[test]
    fn evaluation_is_idempotent(p in arb_expr(), a in arb_assignment()) {
        let m = model(FLAGS);
        let eval = Evaluator::new(&m, &a);
        let first = eval.evaluate(&p);
        prop_assert_eq!(eval.evaluate(&p), first.clone());
        prop_assert_eq!(Evaluator::new(&m, &a).evaluate(&p), first);
    }

    #[test]
    fn ring_of_conditions_is_rejected(names in arb_names()) {
        let conditions: BTreeMap<String, Node> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let next = &names[(i + 1) % names.len()];
                (name.clone(), Node::condition(next.clone()))
            })
            .collect();

        match ConditionGraph::from_conditions(conditions) {
            Err(TemplateError::CyclicCondition { cycle }) => {
                prop_assert_eq!(cycle.len(), names.len() + 1);
                prop_assert_eq!(cycle.first(), cycle.last());
            }
            other => prop_assert!(false, "expected a cycle, got {:?}", other.map(|g| g.len())),
        }
    }

    #[test]
    fn chain_of_conditions_is_accepted(names in arb_names()) {
        let conditions: BTreeMap<String, Node> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let expr = match names.get(i + 1) {
                    Some(next) => Node::condition(next.clone()),
                    None => Node::Bool(true),
                };
                (name.clone(), expr)
            })
            .collect();

        let graph = ConditionGraph::from_conditions(conditions);
        prop_assert!(graph.is_ok());
        prop_assert_eq!(graph.map(|g| g.len()).unwrap_or_default(), names.len());
    }
}
