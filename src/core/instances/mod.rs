mod attribute_value;
mod instance;

pub(crate) use attribute_value::keyed_by_value;
pub use attribute_value::{AttributeValue, AttributesMap};
pub use instance::Instance;
