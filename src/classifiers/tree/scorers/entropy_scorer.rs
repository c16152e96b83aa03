use crate::classifiers::tree::scorers::scorer::{Scorer, impurity_reduction};

/// Information gain in bits.
#[derive(Debug, Default, Clone, Copy)]
pub struct EntropyScorer {}

impl EntropyScorer {
    pub fn new() -> Self {
        Self {}
    }

    pub fn compute_entropy(&self, distribution: &[f64], distribution_sum_of_weights: f64) -> f64 {
        distribution
            .iter()
            .filter(|&&w| w > 0.0)
            .map(|&w| {
                let p = w / distribution_sum_of_weights;
                -p * p.log2()
            })
            .sum()
    }
}

impl Scorer for EntropyScorer {
    fn score_split(&self, pre_split: &[f64], post_split: &[Vec<f64>]) -> f64 {
        impurity_reduction(pre_split, post_split, |d, w| self.compute_entropy(d, w))
    }

    fn name(&self) -> &'static str {
        "entropy"
    }
}
