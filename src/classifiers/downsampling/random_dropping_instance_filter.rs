use crate::core::instances::{AttributeValue, Instance};
use rand::Rng;

/// Drops instances of one label with a fixed probability. Every other label
/// is always kept.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomDroppingInstanceFilter {
    label_to_drop: AttributeValue,
    drop_probability: f64,
}

impl RandomDroppingInstanceFilter {
    pub fn new(label_to_drop: AttributeValue, drop_probability: f64) -> Self {
        Self {
            label_to_drop,
            drop_probability: drop_probability.clamp(0.0, 1.0),
        }
    }

    pub fn drop_probability(&self) -> f64 {
        self.drop_probability
    }

    pub fn retain<R: Rng>(&self, instance: &Instance, rng: &mut R) -> bool {
        if instance.label() != &self.label_to_drop {
            return true;
        }
        rng.random::<f64>() >= self.drop_probability
    }

    pub fn apply<R: Rng>(&self, instances: &[Instance], rng: &mut R) -> Vec<Instance> {
        instances
            .iter()
            .filter(|i| self.retain(i, rng))
            .cloned()
            .collect()
    }
}
