mod classifier_log_cv_loss_function;
mod classifier_loss_function;
mod classifier_rmse_loss_function;

pub use classifier_log_cv_loss_function::{ClassifierLogCvLossFunction, DEFAULT_MIN_PROBABILITY};
pub use classifier_loss_function::{ClassifierLossFunction, LossFunctionKind};
pub use classifier_rmse_loss_function::ClassifierRmseLossFunction;
