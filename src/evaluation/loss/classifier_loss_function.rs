use crate::evaluation::PredictionMapResults;
use crate::evaluation::loss::{ClassifierLogCvLossFunction, ClassifierRmseLossFunction};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Scores a batch of predictions against their true labels; lower is better.
pub trait ClassifierLossFunction: Send + Sync {
    fn loss(&self, results: &PredictionMapResults) -> f64;

    fn name(&self) -> &'static str;
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LossFunctionKind {
    #[default]
    LogCv,
    Rmse,
}

impl LossFunctionKind {
    pub fn loss_function(self) -> Box<dyn ClassifierLossFunction> {
        match self {
            LossFunctionKind::LogCv => Box::new(ClassifierLogCvLossFunction::default()),
            LossFunctionKind::Rmse => Box::new(ClassifierRmseLossFunction),
        }
    }
}
