use crate::classifiers::tree::nodes::{LeafDepthStats, Node};
use crate::classifiers::tree::{ClassificationCounter, TermStatistics};
use crate::classifiers::{Classifier, PredictionMap};
use crate::core::instances::{AttributeValue, AttributesMap};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree<TS = ClassificationCounter> {
    root: Node<TS>,
}

impl<TS: TermStatistics> DecisionTree<TS> {
    pub fn new(root: Node<TS>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node<TS> {
        &self.root
    }

    pub fn size(&self) -> usize {
        self.root.size()
    }

    pub fn mean_leaf_depth(&self) -> f64 {
        let mut stats = LeafDepthStats::default();
        self.root.calc_mean_depth(&mut stats);
        stats.mean_depth()
    }

    pub fn dump<W: Write + ?Sized>(&self, sink: &mut W) -> io::Result<()> {
        self.root.dump(0, sink)
    }
}

impl<TS: TermStatistics> Classifier for DecisionTree<TS> {
    fn predict(&self, attributes: &AttributesMap) -> PredictionMap {
        let statistics = self.root.get_leaf(attributes).term_statistics();
        statistics
            .labels()
            .into_iter()
            .map(|label| {
                let p = statistics.point_estimate(&label);
                (label, p)
            })
            .collect()
    }

    fn probability(&self, attributes: &AttributesMap, label: &AttributeValue) -> f64 {
        self.root
            .get_leaf(attributes)
            .term_statistics()
            .point_estimate(label)
    }

    fn probability_without_attributes(
        &self,
        attributes: &AttributesMap,
        label: &AttributeValue,
        attributes_to_ignore: &HashSet<String>,
    ) -> f64 {
        self.root
            .probability_without_attributes(attributes, label, attributes_to_ignore)
    }
}
