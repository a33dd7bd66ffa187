use crate::error::TemplateError;
use condeval_template::{Document, Node, Operator};
use std::collections::{BTreeMap, BTreeSet};

const SECTION: &str = "Conditions";

/// Named conditions and the dependency edges between them. Acyclic by construction.
#[derive(Clone, Debug, Default)]
pub struct ConditionGraph {
    conditions: BTreeMap<String, Node>,
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl ConditionGraph {
    /// Read the top-level `Conditions` section and reject dependency cycles.
    ///
    /// References to conditions that are not declared are not an error here; they fail at
    /// evaluation.
    pub fn build(doc: &Document) -> Result<Self, TemplateError> {
        let conditions = match doc.section(SECTION) {
            None | Some(Node::Null) => BTreeMap::new(),
            Some(Node::Mapping(map)) => map.clone(),
            Some(other) => {
                return Err(TemplateError::InvalidSection {
                    section: SECTION.to_string(),
                    detail: format!("expected a mapping, found {}", other.kind()),
                });
            }
        };
        Self::from_conditions(conditions)
    }

    pub fn from_conditions(conditions: BTreeMap<String, Node>) -> Result<Self, TemplateError> {
        let edges = conditions
            .iter()
            .map(|(name, expr)| (name.clone(), referenced_conditions(expr)))
            .collect();

        let graph = Self { conditions, edges };
        if let Some(cycle) = graph.find_cycle() {
            return Err(TemplateError::CyclicCondition { cycle });
        }

        tracing::debug!(conditions = graph.len(), "built condition graph");
        Ok(graph)
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.conditions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.conditions.contains_key(name)
    }

    /// Condition names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.conditions.keys().map(String::as_str)
    }

    /// Direct dependencies of `name`, declared or not.
    pub fn dependencies(&self, name: &str) -> impl Iterator<Item = &str> {
        self.edges
            .get(name)
            .into_iter()
            .flat_map(|deps| deps.iter().map(String::as_str))
    }

    /// Whether `name` reaches `ancestor` through one or more dependency edges.
    ///
    /// Undeclared conditions are followed as leaves. The graph is acyclic, so the walk ends.
    pub fn depends_on(&self, name: &str, ancestor: &str) -> bool {
        let mut seen = BTreeSet::new();
        let mut pending: Vec<&str> = self.dependencies(name).collect();
        while let Some(next) = pending.pop() {
            if next == ancestor {
                return true;
            }
            if seen.insert(next) {
                pending.extend(self.dependencies(next));
            }
        }
        false
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    fn find_cycle(&self) -> Option<Vec<String>> {
        let mut marks: BTreeMap<&str, Mark> = BTreeMap::new();
        let mut path: Vec<&str> = Vec::new();
        for name in self.names() {
            if !marks.contains_key(name) {
                if let Err(cycle) = self.visit(name, &mut marks, &mut path) {
                    return Some(cycle);
                }
            }
        }
        None
    }

    fn visit<'a>(
        &'a self,
        name: &'a str,
        marks: &mut BTreeMap<&'a str, Mark>,
        path: &mut Vec<&'a str>,
    ) -> Result<(), Vec<String>> {
        marks.insert(name, Mark::InProgress);
        path.push(name);

        for dep in self.dependencies(name) {
            if !self.contains(dep) {
                continue;
            }
            match marks.get(dep) {
                Some(Mark::Done) => {}
                Some(Mark::InProgress) => {
                    let start = path.iter().position(|n| *n == dep).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[start..].iter().map(|n| n.to_string()).collect();
                    cycle.push(dep.to_string());
                    return Err(cycle);
                }
                None => self.visit(dep, marks, path)?,
            }
        }

        path.pop();
        marks.insert(name, Mark::Done);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Condition names an expression depends on: `Condition` operands and the
/// condition-name first operand of `If`.
pub fn referenced_conditions(expr: &Node) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    expr.walk(&mut |node| {
        let Some(f) = node.as_function() else {
            return;
        };
        let name = match f.operator {
            Operator::Condition => f.sole_operand().and_then(Node::as_str),
            Operator::If => f.operands.first().and_then(Node::as_str),
            _ => None,
        };
        if let Some(name) = name {
            out.insert(name.to_string());
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use condeval_template::parse;

    fn graph(yaml: &str) -> Result<ConditionGraph, TemplateError> {
        ConditionGraph::build(&parse(yaml).expect("parse"))
    }

    #[test]
    fn edges_come_from_condition_and_if() {
        let g = graph(
            r#"
Conditions:
  Lifecycle: !Equals [!Ref S3LifecycleConfigurationEnabled, "true"]
  Glacier: !And [!Condition Lifecycle, !Not [!Equals [!Ref Days, ""]]]
  Picked: !Equals [!If [Glacier, a, b], a]
"#,
        )
        .expect("graph");

        assert_eq!(g.names().collect::<Vec<_>>(), vec!["Glacier", "Lifecycle", "Picked"]);
        assert_eq!(g.dependencies("Glacier").collect::<Vec<_>>(), vec!["Lifecycle"]);
        assert_eq!(g.dependencies("Picked").collect::<Vec<_>>(), vec!["Glacier"]);
        assert_eq!(g.dependencies("Lifecycle").count(), 0);
    }

    #[test]
    fn two_node_cycle_is_reported_with_path() {
        let err = graph("Conditions:\n  A: !Condition B\n  B: !Condition A\n").expect_err("cycle");
        assert_eq!(
            err,
            TemplateError::CyclicCondition {
                cycle: vec!["A".into(), "B".into(), "A".into()]
            }
        );
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let err = graph("Conditions:\n  A: !Not [!Condition A]\n").expect_err("cycle");
        assert_eq!(err.to_string(), "cyclic condition dependency: A -> A");
    }

    #[test]
    fn cycle_through_if_is_detected() {
        let err = graph(
            "Conditions:\n  A: !Equals [!If [B, x, y], x]\n  B: !Or [!Condition C, true]\n  C: !Condition A\n",
        )
        .expect_err("cycle");
        assert!(matches!(err, TemplateError::CyclicCondition { ref cycle } if cycle.len() == 4));
    }

    #[test]
    fn undeclared_references_are_not_build_errors() {
        let g = graph("Conditions:\n  A: !Condition Missing\n").expect("graph");
        assert_eq!(g.dependencies("A").collect::<Vec<_>>(), vec!["Missing"]);
    }

    #[test]
    fn depends_on_follows_edges_transitively() {
        let g = graph(
            "Conditions:\n  Master: !Equals [!Ref On, \"true\"]\n  Glacier: !And [!Condition Master, true]\n  Deep: !If [Glacier, true, false]\n  Loose: !Equals [!Ref On, x]\n",
        )
        .expect("graph");

        assert!(g.depends_on("Glacier", "Master"));
        assert!(g.depends_on("Deep", "Master"));
        assert!(!g.depends_on("Loose", "Master"));
        assert!(!g.depends_on("Master", "Master"));
        assert!(!g.depends_on("Missing", "Master"));
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        graph(
            "Conditions:\n  Top: !And [!Condition L, !Condition R]\n  L: !Condition Base\n  R: !Condition Base\n  Base: true\n",
        )
        .expect("diamond is acyclic");
    }
}
