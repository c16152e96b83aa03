use crate::core::attributes::AttributeFamily;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeDomain {
    Numeric,
    Nominal(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderAttribute {
    pub name: String,
    pub domain: AttributeDomain,
}

impl HeaderAttribute {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: AttributeDomain::Numeric,
        }
    }

    pub fn nominal(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            domain: AttributeDomain::Nominal(values),
        }
    }

    pub fn family(&self) -> AttributeFamily {
        match self.domain {
            AttributeDomain::Numeric => AttributeFamily::Numeric,
            AttributeDomain::Nominal(_) => AttributeFamily::Nominal,
        }
    }

    pub fn accepts_nominal(&self, value: &str) -> bool {
        match &self.domain {
            AttributeDomain::Nominal(values) => values.iter().any(|v| v == value),
            AttributeDomain::Numeric => false,
        }
    }
}

pub struct InstanceHeader {
    relation_name: String,
    pub attributes: Vec<HeaderAttribute>,
    class_index: usize,
}

impl InstanceHeader {
    pub fn new(
        relation_name: String,
        attributes: Vec<HeaderAttribute>,
        class_index: usize,
    ) -> InstanceHeader {
        InstanceHeader {
            relation_name,
            attributes,
            class_index,
        }
    }

    pub fn number_of_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn attribute_at_index(&self, index: usize) -> Option<&HeaderAttribute> {
        self.attributes.get(index)
    }

    pub fn index_of_attribute(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn class_attribute(&self) -> Option<&HeaderAttribute> {
        self.attributes.get(self.class_index)
    }

    pub fn number_of_classes(&self) -> usize {
        match self.class_attribute().map(|a| &a.domain) {
            Some(AttributeDomain::Nominal(values)) => values.len(),
            _ => 0,
        }
    }
}

impl fmt::Debug for InstanceHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceHeader")
            .field("relation_name", &self.relation_name)
            .field("class_index", &self.class_index)
            .field("n_attributes", &self.attributes.len())
            .finish()
    }
}
