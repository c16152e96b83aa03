mod attribute_statistics_builder;
mod attribute_stats;
mod classification_counter;
mod decision_tree;
pub mod decision_tree_builder;
pub mod nodes;
pub mod scorers;
mod term_statistics;

pub use attribute_statistics_builder::AttributeStatisticsBuilder;
pub use attribute_stats::AttributeStats;
pub use classification_counter::ClassificationCounter;
pub use decision_tree::DecisionTree;
pub use decision_tree_builder::{DecisionTreeBuilder, DecisionTreeConfig};
pub use term_statistics::TermStatistics;
