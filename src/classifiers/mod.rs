mod classifier;
pub mod downsampling;
mod prediction_map;
pub mod predictive_model_builder;
pub mod tree;

pub use classifier::Classifier;
pub use prediction_map::PredictionMap;
pub use predictive_model_builder::{BuilderConfig, PredictiveModelBuilder};
