mod fixed_distribution_classifier;

pub use fixed_distribution_classifier::FixedDistributionClassifier;
