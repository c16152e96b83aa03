use crate::core::instances::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Decision a [`Branch`](super::Branch) applies to its attribute's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SplitPredicate {
    Categorical {
        true_set: BTreeSet<AttributeValue>,
        missing_is_true: bool,
    },
    Numeric { threshold: f64, missing_is_true: bool },
}

impl SplitPredicate {
    pub fn decide(&self, value: Option<&AttributeValue>) -> bool {
        match (self, value) {
            (SplitPredicate::Categorical { true_set, .. }, Some(v)) => true_set.contains(v),
            (SplitPredicate::Numeric { threshold, .. }, Some(v)) => {
                v.as_f64().is_some_and(|x| x > *threshold)
            }
            (
                SplitPredicate::Categorical {
                    missing_is_true, ..
                }
                | SplitPredicate::Numeric {
                    missing_is_true, ..
                },
                None,
            ) => *missing_is_true,
        }
    }

    pub fn describe(&self, attribute: &str, negated: bool) -> String {
        match self {
            SplitPredicate::Categorical {
                true_set,
                missing_is_true,
            } => {
                let mut values: Vec<String> = true_set.iter().map(|v| v.to_string()).collect();
                if *missing_is_true {
                    values.push("?".to_string());
                }
                let op = if negated { "not in" } else { "in" };
                format!("{attribute} {op} [{}]", values.join(", "))
            }
            SplitPredicate::Numeric {
                threshold,
                missing_is_true,
            } => match (negated, missing_is_true) {
                (false, false) => format!("{attribute} > {threshold}"),
                (false, true) => format!("{attribute} > {threshold} or ?"),
                (true, false) => format!("{attribute} <= {threshold} or ?"),
                (true, true) => format!("{attribute} <= {threshold}"),
            },
        }
    }
}
