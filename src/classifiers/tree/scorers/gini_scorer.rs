use crate::classifiers::tree::scorers::scorer::{Scorer, impurity_reduction};

#[derive(Debug, Default, Clone, Copy)]
pub struct GiniScorer {}

impl GiniScorer {
    pub fn new() -> Self {
        Self {}
    }

    pub fn compute_gini(&self, distribution: &[f64], distribution_sum_of_weights: f64) -> f64 {
        let mut gini = 1.0;
        for i in distribution {
            let rel_freq = i / distribution_sum_of_weights;
            gini -= rel_freq.powf(2.0);
        }
        gini
    }
}

impl Scorer for GiniScorer {
    fn score_split(&self, pre_split: &[f64], post_split: &[Vec<f64>]) -> f64 {
        impurity_reduction(pre_split, post_split, |d, w| self.compute_gini(d, w))
    }

    fn name(&self) -> &'static str {
        "gini"
    }
}
