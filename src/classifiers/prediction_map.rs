use crate::core::instances::{AttributeValue, keyed_by_value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionMap(#[serde(with = "keyed_by_value")] BTreeMap<AttributeValue, f64>);

impl PredictionMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, label: AttributeValue, probability: f64) {
        self.0.insert(label, probability);
    }

    pub fn probability(&self, label: &AttributeValue) -> f64 {
        self.0.get(label).copied().unwrap_or(0.0)
    }

    pub fn most_likely(&self) -> Option<(&AttributeValue, f64)> {
        let mut best: Option<(&AttributeValue, f64)> = None;
        for (label, &p) in &self.0 {
            if best.is_none_or(|(_, bp)| p > bp) {
                best = Some((label, p));
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttributeValue, f64)> {
        self.0.iter().map(|(k, &v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(AttributeValue, f64)> for PredictionMap {
    fn from_iter<T: IntoIterator<Item = (AttributeValue, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
