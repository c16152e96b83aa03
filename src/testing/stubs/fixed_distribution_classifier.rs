use crate::classifiers::{Classifier, PredictionMap};
use crate::core::instances::{AttributeValue, AttributesMap};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedDistributionClassifier {
    distribution: PredictionMap,
}

impl FixedDistributionClassifier {
    pub fn new(distribution: PredictionMap) -> Self {
        Self { distribution }
    }

    pub fn binary(label: impl Into<AttributeValue>, p: f64, other: impl Into<AttributeValue>) -> Self {
        let mut distribution = PredictionMap::new();
        distribution.insert(label.into(), p);
        distribution.insert(other.into(), 1.0 - p);
        Self { distribution }
    }
}

impl Classifier for FixedDistributionClassifier {
    fn predict(&self, _attributes: &AttributesMap) -> PredictionMap {
        self.distribution.clone()
    }
}
