use crate::classifiers::tree::TermStatistics;
use crate::classifiers::tree::nodes::{Branch, Leaf};
use crate::core::instances::{AttributeValue, AttributesMap};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "kebab-case")]
pub enum Node<TS> {
    Branch(Branch<TS>),
    Leaf(Leaf<TS>),
}

/// Leaf depths weighted by the training weight reaching each leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LeafDepthStats {
    pub total_depth: f64,
    pub total_weight: f64,
}

impl LeafDepthStats {
    pub fn mean_depth(&self) -> f64 {
        if self.total_weight > 0.0 {
            self.total_depth / self.total_weight
        } else {
            0.0
        }
    }
}

impl<TS> Node<TS> {
    pub fn depth(&self) -> usize {
        match self {
            Node::Branch(b) => b.depth,
            Node::Leaf(l) => l.depth,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn size(&self) -> usize {
        match self {
            Node::Branch(b) => 1 + b.true_child.size() + b.false_child.size(),
            Node::Leaf(_) => 1,
        }
    }
}

impl<TS: TermStatistics> Node<TS> {
    pub fn term_statistics(&self) -> &TS {
        match self {
            Node::Branch(b) => &b.term_statistics,
            Node::Leaf(l) => &l.term_statistics,
        }
    }

    pub fn get_leaf(&self, attributes: &AttributesMap) -> &Leaf<TS> {
        let mut node = self;
        loop {
            match node {
                Node::Branch(b) => {
                    node = if b.decide(attributes) {
                        &b.true_child
                    } else {
                        &b.false_child
                    };
                }
                Node::Leaf(l) => return l,
            }
        }
    }

    /// Probability of `label` when the attributes in `attributes_to_ignore`
    /// are treated as unknown. Branches on an ignored attribute blend both
    /// children by the probability of the true child seen in training.
    pub fn probability_without_attributes(
        &self,
        attributes: &AttributesMap,
        label: &AttributeValue,
        attributes_to_ignore: &HashSet<String>,
    ) -> f64 {
        match self {
            Node::Branch(b) => {
                if attributes_to_ignore.contains(&b.attribute) {
                    let p = b.probability_of_true_child;
                    p * b.true_child.probability_without_attributes(
                        attributes,
                        label,
                        attributes_to_ignore,
                    ) + (1.0 - p)
                        * b.false_child.probability_without_attributes(
                            attributes,
                            label,
                            attributes_to_ignore,
                        )
                } else if b.decide(attributes) {
                    b.true_child
                        .probability_without_attributes(attributes, label, attributes_to_ignore)
                } else {
                    b.false_child
                        .probability_without_attributes(attributes, label, attributes_to_ignore)
                }
            }
            Node::Leaf(l) => l.term_statistics.point_estimate(label),
        }
    }

    pub fn calc_mean_depth(&self, stats: &mut LeafDepthStats) {
        match self {
            Node::Branch(b) => {
                b.true_child.calc_mean_depth(stats);
                b.false_child.calc_mean_depth(stats);
            }
            Node::Leaf(l) => {
                let w = l.term_statistics.total_weight();
                stats.total_depth += l.depth as f64 * w;
                stats.total_weight += w;
            }
        }
    }

    /// Writes the subtree in pre-order: each branch, its true subtree, the
    /// negated branch, then its false subtree. Children are indented two more
    /// spaces than their parent.
    pub fn dump<W: Write + ?Sized>(&self, indent: usize, sink: &mut W) -> io::Result<()> {
        let pad = " ".repeat(indent);
        match self {
            Node::Branch(b) => {
                writeln!(sink, "{pad}{b}")?;
                b.true_child.dump(indent + 2, sink)?;
                writeln!(sink, "{pad}{}", b.to_not_string())?;
                b.false_child.dump(indent + 2, sink)
            }
            Node::Leaf(l) => writeln!(sink, "{pad}{l}"),
        }
    }
}
