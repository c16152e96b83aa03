use crate::classifiers::PredictionMap;
use crate::core::instances::{AttributeValue, AttributesMap};
use std::collections::HashSet;

/// A trained model answering label-probability queries.
pub trait Classifier: Send + Sync {
    fn predict(&self, attributes: &AttributesMap) -> PredictionMap;

    fn probability(&self, attributes: &AttributesMap, label: &AttributeValue) -> f64 {
        self.predict(attributes).probability(label)
    }

    /// Probability of `label` if the attributes in `attributes_to_ignore` were
    /// unknown. Models that cannot marginalize fall back to `probability`.
    fn probability_without_attributes(
        &self,
        attributes: &AttributesMap,
        label: &AttributeValue,
        _attributes_to_ignore: &HashSet<String>,
    ) -> f64 {
        self.probability(attributes, label)
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict(&self, attributes: &AttributesMap) -> PredictionMap {
        (**self).predict(attributes)
    }

    fn probability(&self, attributes: &AttributesMap, label: &AttributeValue) -> f64 {
        (**self).probability(attributes, label)
    }

    fn probability_without_attributes(
        &self,
        attributes: &AttributesMap,
        label: &AttributeValue,
        attributes_to_ignore: &HashSet<String>,
    ) -> f64 {
        (**self).probability_without_attributes(attributes, label, attributes_to_ignore)
    }
}
