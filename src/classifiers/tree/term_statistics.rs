use crate::core::instances::{AttributeValue, Instance};

/// Statistics accumulated over the instances reaching a bucket or node.
pub trait TermStatistics: Clone + Send + Sync {
    /// Empty statistics for the bucket holding `attribute_value`
    /// (`None` for the aggregate or the MISSING bucket).
    fn for_value(attribute_value: Option<AttributeValue>) -> Self;

    fn attribute_value(&self) -> Option<&AttributeValue>;

    fn add_instance(&mut self, instance: &Instance);

    fn merge(&mut self, other: &Self);

    fn total_weight(&self) -> f64;

    fn labels(&self) -> Vec<AttributeValue>;

    fn weights_for(&self, labels: &[AttributeValue]) -> Vec<f64>;

    fn point_estimate(&self, label: &AttributeValue) -> f64;

    fn is_pure(&self) -> bool {
        let labels = self.labels();
        self.weights_for(&labels)
            .iter()
            .filter(|&&w| w > 0.0)
            .count()
            < 2
    }
}
