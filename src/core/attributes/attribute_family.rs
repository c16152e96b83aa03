use crate::core::instances::{AttributeValue, Instance};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AttributeFamily {
    Nominal,
    Numeric,
}

impl AttributeFamily {
    pub fn of(value: &AttributeValue) -> Self {
        if value.is_numeric() {
            AttributeFamily::Numeric
        } else {
            AttributeFamily::Nominal
        }
    }

    /// Numeric iff at least one value is present and every present value is
    /// numeric.
    pub fn infer<'a, I>(instances: I, attribute: &str) -> Self
    where
        I: IntoIterator<Item = &'a Instance>,
    {
        let mut seen = false;
        for instance in instances {
            if let Some(value) = instance.attribute(attribute) {
                if !value.is_numeric() {
                    return AttributeFamily::Nominal;
                }
                seen = true;
            }
        }
        if seen {
            AttributeFamily::Numeric
        } else {
            AttributeFamily::Nominal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instances::AttributesMap;

    fn inst(value: Option<AttributeValue>) -> Instance {
        let mut attrs = AttributesMap::new();
        if let Some(v) = value {
            attrs.insert("x".into(), v);
        }
        Instance::unweighted(attrs, "a")
    }

    #[test]
    fn infers_numeric_only_when_every_present_value_is_numeric() {
        let numeric = vec![inst(Some(1.0.into())), inst(None), inst(Some(2.0.into()))];
        assert_eq!(
            AttributeFamily::infer(&numeric, "x"),
            AttributeFamily::Numeric
        );

        let mixed = vec![inst(Some(1.0.into())), inst(Some("b".into()))];
        assert_eq!(AttributeFamily::infer(&mixed, "x"), AttributeFamily::Nominal);

        let absent = vec![inst(None)];
        assert_eq!(AttributeFamily::infer(&absent, "x"), AttributeFamily::Nominal);
    }

    #[test]
    fn parses_kebab_case() {
        assert_eq!(
            "numeric".parse::<AttributeFamily>().unwrap(),
            AttributeFamily::Numeric
        );
        assert_eq!(AttributeFamily::Nominal.to_string(), "nominal");
    }
}
