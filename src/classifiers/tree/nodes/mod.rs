mod branch;
mod leaf;
mod node;
mod split_predicate;

pub use branch::Branch;
pub use leaf::Leaf;
pub use node::{LeafDepthStats, Node};
pub use split_predicate::SplitPredicate;
