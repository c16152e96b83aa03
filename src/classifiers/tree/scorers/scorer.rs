use crate::classifiers::tree::scorers::{EntropyScorer, GiniScorer};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Score of a split that was never evaluated. Every real score beats it.
pub const NO_SCORE: f64 = f64::MIN;

/// Rates a candidate split; higher is better.
pub trait Scorer: Send + Sync {
    fn score_split(&self, pre_split: &[f64], post_split: &[Vec<f64>]) -> f64;

    fn name(&self) -> &'static str;
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ScorerKind {
    #[default]
    Gini,
    Entropy,
}

impl ScorerKind {
    pub fn scorer(self) -> Box<dyn Scorer> {
        match self {
            ScorerKind::Gini => Box::new(GiniScorer::new()),
            ScorerKind::Entropy => Box::new(EntropyScorer::new()),
        }
    }
}

pub(super) fn impurity_reduction(
    pre_split: &[f64],
    post_split: &[Vec<f64>],
    impurity: impl Fn(&[f64], f64) -> f64,
) -> f64 {
    let total: f64 = pre_split.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }

    let mut weighted = 0.0;
    for dist in post_split {
        let w: f64 = dist.iter().sum();
        if w > 0.0 {
            weighted += (w / total) * impurity(dist, w);
        }
    }
    impurity(pre_split, total) - weighted
}
