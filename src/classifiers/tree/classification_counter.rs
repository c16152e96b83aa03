use crate::classifiers::tree::TermStatistics;
use crate::core::instances::{AttributeValue, Instance, keyed_by_value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weighted tally of labels for one attribute value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationCounter {
    attribute_value: Option<AttributeValue>,
    #[serde(with = "keyed_by_value")]
    counts: BTreeMap<AttributeValue, f64>,
    total: f64,
}

impl ClassificationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(attribute_value: AttributeValue) -> Self {
        Self {
            attribute_value: Some(attribute_value),
            ..Self::default()
        }
    }

    pub fn from_instances<'a, I>(instances: I) -> Self
    where
        I: IntoIterator<Item = &'a Instance>,
    {
        let mut counter = Self::new();
        for instance in instances {
            counter.add_classification(instance.label().clone(), instance.weight());
        }
        counter
    }

    pub fn add_classification(&mut self, label: AttributeValue, weight: f64) {
        debug_assert!(weight >= 0.0, "classification weights are never negative");
        *self.counts.entry(label).or_insert(0.0) += weight;
        self.total += weight;
    }

    pub fn count(&self, label: &AttributeValue) -> f64 {
        self.counts.get(label).copied().unwrap_or(0.0)
    }

    pub fn counts(&self) -> &BTreeMap<AttributeValue, f64> {
        &self.counts
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn most_popular(&self) -> Option<(&AttributeValue, f64)> {
        let mut best: Option<(&AttributeValue, f64)> = None;
        for (label, &w) in &self.counts {
            if best.is_none_or(|(_, bw)| w > bw) {
                best = Some((label, w));
            }
        }
        best
    }
}

impl TermStatistics for ClassificationCounter {
    fn for_value(attribute_value: Option<AttributeValue>) -> Self {
        Self {
            attribute_value,
            ..Self::default()
        }
    }

    fn attribute_value(&self) -> Option<&AttributeValue> {
        self.attribute_value.as_ref()
    }

    fn add_instance(&mut self, instance: &Instance) {
        self.add_classification(instance.label().clone(), instance.weight());
    }

    fn merge(&mut self, other: &Self) {
        for (label, &w) in &other.counts {
            *self.counts.entry(label.clone()).or_insert(0.0) += w;
        }
        self.total += other.total;
    }

    fn total_weight(&self) -> f64 {
        self.total
    }

    fn labels(&self) -> Vec<AttributeValue> {
        self.counts.keys().cloned().collect()
    }

    fn weights_for(&self, labels: &[AttributeValue]) -> Vec<f64> {
        labels.iter().map(|l| self.count(l)).collect()
    }

    fn point_estimate(&self, label: &AttributeValue) -> f64 {
        if self.total > 0.0 {
            self.count(label) / self.total
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPS: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= EPS
    }

    #[test]
    fn accumulates_weight_per_label() {
        let mut cc = ClassificationCounter::new();
        cc.add_classification("A".into(), 1.0);
        cc.add_classification("B".into(), 3.0);
        cc.add_classification("A".into(), 0.5);

        assert!(approx_eq(cc.count(&"A".into()), 1.5));
        assert!(approx_eq(cc.count(&"B".into()), 3.0));
        assert!(approx_eq(cc.count(&"C".into()), 0.0));
        assert!(approx_eq(cc.total(), 4.5));
        assert!(approx_eq(cc.counts().values().sum::<f64>(), cc.total()));
    }

    #[test]
    fn point_estimate_is_relative_frequency() {
        let mut cc = ClassificationCounter::new();
        cc.add_classification("A".into(), 1.0);
        cc.add_classification("B".into(), 3.0);
        assert!(approx_eq(cc.point_estimate(&"B".into()), 0.75));
        assert!(approx_eq(cc.point_estimate(&"Z".into()), 0.0));
        assert!(approx_eq(
            ClassificationCounter::new().point_estimate(&"A".into()),
            0.0
        ));
    }

    #[test]
    fn merge_adds_counts_and_keeps_own_value() {
        let mut left = ClassificationCounter::with_value("red".into());
        left.add_classification("A".into(), 1.0);
        let mut right = ClassificationCounter::with_value("blue".into());
        right.add_classification("A".into(), 2.0);
        right.add_classification("B".into(), 4.0);

        left.merge(&right);
        assert_eq!(left.attribute_value(), Some(&AttributeValue::from("red")));
        assert!(approx_eq(left.count(&"A".into()), 3.0));
        assert!(approx_eq(left.count(&"B".into()), 4.0));
        assert!(approx_eq(left.total(), 7.0));
    }

    #[test]
    fn projection_aligns_with_requested_labels() {
        let mut cc = ClassificationCounter::new();
        cc.add_classification("B".into(), 2.0);
        let labels = vec![AttributeValue::from("A"), AttributeValue::from("B")];
        assert_eq!(cc.weights_for(&labels), vec![0.0, 2.0]);
        assert_eq!(cc.labels(), vec![AttributeValue::from("B")]);
    }

    #[test]
    fn purity_and_most_popular() {
        let mut cc = ClassificationCounter::new();
        assert!(cc.is_pure());
        assert!(cc.most_popular().is_none());
        cc.add_classification("A".into(), 2.0);
        assert!(cc.is_pure());
        cc.add_classification("B".into(), 2.0);
        assert!(!cc.is_pure());
        let (label, w) = cc.most_popular().unwrap();
        assert_eq!(label, &AttributeValue::from("A"));
        assert!(approx_eq(w, 2.0));
    }
}
