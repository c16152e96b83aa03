mod classifier_no_predictions;

pub use classifier_no_predictions::ClassifierNoPredictions;
