use crate::core::instances::{AttributeValue, AttributesMap};
use crate::error::{ModelError, Result};
use std::sync::Arc;

/// One labeled, weighted observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    attributes: Arc<AttributesMap>,
    label: AttributeValue,
    weight: f64,
}

impl Instance {
    pub fn new(
        attributes: AttributesMap,
        label: impl Into<AttributeValue>,
        weight: f64,
    ) -> Result<Self> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ModelError::InvalidInstanceWeight { weight });
        }
        Ok(Self {
            attributes: Arc::new(attributes),
            label: label.into(),
            weight,
        })
    }

    pub fn unweighted(attributes: AttributesMap, label: impl Into<AttributeValue>) -> Self {
        Self {
            attributes: Arc::new(attributes),
            label: label.into(),
            weight: 1.0,
        }
    }

    pub fn attributes(&self) -> &AttributesMap {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn label(&self) -> &AttributeValue {
        &self.label
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}
