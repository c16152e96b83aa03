mod entropy_scorer;
mod gini_scorer;
mod scorer;

pub use entropy_scorer::EntropyScorer;
pub use gini_scorer::GiniScorer;
pub use scorer::{NO_SCORE, Scorer, ScorerKind};
