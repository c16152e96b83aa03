mod cross_validator;

pub use cross_validator::{CrossValidationReport, CrossValidator, FoldLoss};
