use crate::classifiers::tree::TermStatistics;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaf<TS> {
    pub(crate) term_statistics: TS,
    pub(crate) depth: usize,
}

impl<TS: TermStatistics> Leaf<TS> {
    pub fn new(term_statistics: TS, depth: usize) -> Self {
        Self {
            term_statistics,
            depth,
        }
    }

    pub fn term_statistics(&self) -> &TS {
        &self.term_statistics
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl<TS: PartialEq> PartialEq for Leaf<TS> {
    fn eq(&self, other: &Self) -> bool {
        self.term_statistics == other.term_statistics
    }
}

impl<TS: TermStatistics> fmt::Display for Leaf<TS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .term_statistics
            .labels()
            .iter()
            .map(|l| format!("{l}={:.3}", self.term_statistics.point_estimate(l)))
            .collect();
        write!(
            f,
            "{{{}}} weight={}",
            parts.join(", "),
            self.term_statistics.total_weight()
        )
    }
}
