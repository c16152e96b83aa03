use crate::classifiers::tree::TermStatistics;
use crate::classifiers::tree::scorers::Scorer;

/// Per-value statistics of one candidate attribute plus their aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeStats<TS> {
    stats: Vec<TS>,
    aggregate: TS,
    attribute: String,
}

impl<TS: TermStatistics> AttributeStats<TS> {
    pub fn new(stats: Vec<TS>, aggregate: TS, attribute: impl Into<String>) -> Self {
        Self {
            stats,
            aggregate,
            attribute: attribute.into(),
        }
    }

    pub fn stats(&self) -> &[TS] {
        &self.stats
    }

    pub fn aggregate(&self) -> &TS {
        &self.aggregate
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn score(&self, scorer: &dyn Scorer) -> f64 {
        let labels = self.aggregate.labels();
        let pre_split = self.aggregate.weights_for(&labels);
        let post_split: Vec<Vec<f64>> = self
            .stats
            .iter()
            .map(|s| s.weights_for(&labels))
            .collect();
        scorer.score_split(&pre_split, &post_split)
    }

    /// Two-bucket view: the merge of the buckets selected by `in_true_set`
    /// followed by the merge of the rest.
    pub fn binary_split(&self, in_true_set: impl Fn(&TS) -> bool) -> AttributeStats<TS> {
        let mut true_side = TS::for_value(None);
        let mut false_side = TS::for_value(None);
        for s in &self.stats {
            if in_true_set(s) {
                true_side.merge(s);
            } else {
                false_side.merge(s);
            }
        }
        AttributeStats::new(
            vec![true_side, false_side],
            self.aggregate.clone(),
            self.attribute.clone(),
        )
    }
}
