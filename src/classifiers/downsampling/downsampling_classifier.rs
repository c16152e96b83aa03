use crate::classifiers::{Classifier, PredictionMap};
use crate::core::instances::{AttributeValue, AttributesMap};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Wraps a model trained on majority-downsampled data and maps its
/// probabilities back to the original class balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownsamplingClassifier<C> {
    wrapped: C,
    majority_label: AttributeValue,
    minority_label: AttributeValue,
    drop_probability: f64,
}

impl<C: Classifier> DownsamplingClassifier<C> {
    pub fn new(
        wrapped: C,
        majority_label: AttributeValue,
        minority_label: AttributeValue,
        drop_probability: f64,
    ) -> Self {
        debug_assert!((0.0..1.0).contains(&drop_probability));
        Self {
            wrapped,
            majority_label,
            minority_label,
            drop_probability,
        }
    }

    pub fn wrapped(&self) -> &C {
        &self.wrapped
    }

    pub fn majority_label(&self) -> &AttributeValue {
        &self.majority_label
    }

    pub fn minority_label(&self) -> &AttributeValue {
        &self.minority_label
    }

    pub fn drop_probability(&self) -> f64 {
        self.drop_probability
    }

    fn corrected_majority_probability(&self, q: f64) -> f64 {
        if self.drop_probability == 0.0 {
            return q;
        }
        let denominator = q + (1.0 - self.drop_probability) * (1.0 - q);
        if denominator > 0.0 { q / denominator } else { q }
    }

    fn probability_from_majority(&self, majority: f64, label: &AttributeValue) -> f64 {
        if label == &self.majority_label {
            majority
        } else if label == &self.minority_label {
            1.0 - majority
        } else {
            0.0
        }
    }
}

impl<C: Classifier> Classifier for DownsamplingClassifier<C> {
    fn predict(&self, attributes: &AttributesMap) -> PredictionMap {
        if self.drop_probability == 0.0 {
            return self.wrapped.predict(attributes);
        }
        let q = self.wrapped.probability(attributes, &self.majority_label);
        let majority = self.corrected_majority_probability(q);
        let mut prediction = PredictionMap::new();
        prediction.insert(self.majority_label.clone(), majority);
        prediction.insert(self.minority_label.clone(), 1.0 - majority);
        prediction
    }

    fn probability(&self, attributes: &AttributesMap, label: &AttributeValue) -> f64 {
        if self.drop_probability == 0.0 {
            return self.wrapped.probability(attributes, label);
        }
        let q = self.wrapped.probability(attributes, &self.majority_label);
        self.probability_from_majority(self.corrected_majority_probability(q), label)
    }

    fn probability_without_attributes(
        &self,
        attributes: &AttributesMap,
        label: &AttributeValue,
        attributes_to_ignore: &HashSet<String>,
    ) -> f64 {
        if self.drop_probability == 0.0 {
            return self
                .wrapped
                .probability_without_attributes(attributes, label, attributes_to_ignore);
        }
        let q = self.wrapped.probability_without_attributes(
            attributes,
            &self.majority_label,
            attributes_to_ignore,
        );
        self.probability_from_majority(self.corrected_majority_probability(q), label)
    }
}
