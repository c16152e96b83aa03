mod downsampling_classifier;
pub mod downsampling_classifier_builder;
mod random_dropping_instance_filter;

pub use downsampling_classifier::DownsamplingClassifier;
pub use downsampling_classifier_builder::{
    DownsamplingClassifierBuilder, MINORITY_INSTANCE_PROPORTION, drop_probability,
};
pub use random_dropping_instance_filter::RandomDroppingInstanceFilter;
