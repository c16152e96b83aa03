use crate::classifiers::tree::TermStatistics;
use crate::classifiers::tree::nodes::{Node, SplitPredicate};
use crate::core::instances::{AttributesMap, Instance};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch<TS> {
    pub(crate) attribute: String,
    pub(crate) predicate: SplitPredicate,
    pub(crate) probability_of_true_child: f64,
    pub(crate) score: f64,
    pub(crate) term_statistics: TS,
    pub(crate) depth: usize,
    pub(crate) true_child: Box<Node<TS>>,
    pub(crate) false_child: Box<Node<TS>>,
}

impl<TS: TermStatistics> Branch<TS> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        attribute: impl Into<String>,
        predicate: SplitPredicate,
        probability_of_true_child: f64,
        score: f64,
        term_statistics: TS,
        depth: usize,
        true_child: Node<TS>,
        false_child: Node<TS>,
    ) -> Self {
        debug_assert!((0.0..=1.0).contains(&probability_of_true_child));
        debug_assert_eq!(true_child.depth(), depth + 1);
        debug_assert_eq!(false_child.depth(), depth + 1);
        Self {
            attribute: attribute.into(),
            predicate,
            probability_of_true_child,
            score,
            term_statistics,
            depth,
            true_child: Box::new(true_child),
            false_child: Box::new(false_child),
        }
    }

    pub fn decide(&self, attributes: &AttributesMap) -> bool {
        self.predicate.decide(attributes.get(&self.attribute))
    }

    pub fn decide_instance(&self, instance: &Instance) -> bool {
        self.decide(instance.attributes())
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn predicate(&self) -> &SplitPredicate {
        &self.predicate
    }

    pub fn probability_of_true_child(&self) -> f64 {
        self.probability_of_true_child
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn term_statistics(&self) -> &TS {
        &self.term_statistics
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn true_child(&self) -> &Node<TS> {
        &self.true_child
    }

    pub fn false_child(&self) -> &Node<TS> {
        &self.false_child
    }

    pub fn to_not_string(&self) -> String {
        self.predicate.describe(&self.attribute, true)
    }
}

/// Structural equality: same attribute and equal children.
impl<TS: PartialEq> PartialEq for Branch<TS> {
    fn eq(&self, other: &Self) -> bool {
        self.attribute == other.attribute
            && self.true_child == other.true_child
            && self.false_child == other.false_child
    }
}

impl<TS> fmt::Display for Branch<TS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.predicate.describe(&self.attribute, false))
    }
}
