use crate::error::{ModelError, Result};
use crate::evaluation::PredictionMapResults;
use crate::evaluation::loss::ClassifierLossFunction;

pub const DEFAULT_MIN_PROBABILITY: f64 = 1e-7;

/// Weighted mean negative log-likelihood of the true labels. Probabilities at
/// or below `min_probability` are charged a flat `-ln(min_probability)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierLogCvLossFunction {
    min_probability: f64,
    max_error: f64,
}

impl ClassifierLogCvLossFunction {
    pub const NAME: &'static str = "LOG_CV";

    pub fn new(min_probability: f64) -> Result<Self> {
        if !(min_probability > 0.0 && min_probability < 1.0) {
            return Err(ModelError::invalid_config(
                "minProbability",
                format!("must be strictly between 0 and 1, got {min_probability}"),
            ));
        }
        Ok(Self {
            min_probability,
            max_error: -min_probability.ln(),
        })
    }

    pub fn min_probability(&self) -> f64 {
        self.min_probability
    }

    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    fn loss_for_instance(&self, correct_probability: f64, weight: f64) -> f64 {
        if correct_probability > self.min_probability {
            -weight * correct_probability.ln()
        } else {
            weight * self.max_error
        }
    }
}

impl Default for ClassifierLogCvLossFunction {
    fn default() -> Self {
        Self {
            min_probability: DEFAULT_MIN_PROBABILITY,
            max_error: -DEFAULT_MIN_PROBABILITY.ln(),
        }
    }
}

impl ClassifierLossFunction for ClassifierLogCvLossFunction {
    fn loss(&self, results: &PredictionMapResults) -> f64 {
        let total_weight = results.total_weight();
        if total_weight <= 0.0 {
            return 0.0;
        }
        let total_loss: f64 = results
            .iter()
            .map(|r| self.loss_for_instance(r.prediction_for_label(), r.weight()))
            .sum();
        total_loss / total_weight
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
