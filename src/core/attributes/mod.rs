mod attribute_family;
mod missing_value_policy;

pub use attribute_family::AttributeFamily;
pub use missing_value_policy::MissingValuePolicy;
