use crate::core::attributes::AttributeFamily;
use serde::{Deserialize, Serialize};

/// Which attribute families route absent values into a MISSING bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingValuePolicy {
    pub accept_nominal: bool,
    pub accept_numeric: bool,
}

impl MissingValuePolicy {
    pub fn accept_all() -> Self {
        Self {
            accept_nominal: true,
            accept_numeric: true,
        }
    }

    pub fn reject_all() -> Self {
        Self {
            accept_nominal: false,
            accept_numeric: false,
        }
    }

    pub fn accepts(&self, family: AttributeFamily) -> bool {
        match family {
            AttributeFamily::Nominal => self.accept_nominal,
            AttributeFamily::Numeric => self.accept_numeric,
        }
    }
}

impl Default for MissingValuePolicy {
    fn default() -> Self {
        Self::accept_all()
    }
}
