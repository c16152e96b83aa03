use crate::evaluation::PredictionMapResults;
use crate::evaluation::loss::ClassifierLossFunction;

/// Weighted root mean square of `1 - p(true label)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassifierRmseLossFunction;

impl ClassifierRmseLossFunction {
    pub const NAME: &'static str = "RMSE";
}

impl ClassifierLossFunction for ClassifierRmseLossFunction {
    fn loss(&self, results: &PredictionMapResults) -> f64 {
        let total_weight = results.total_weight();
        if total_weight <= 0.0 {
            return 0.0;
        }
        let squared: f64 = results
            .iter()
            .map(|r| r.weight() * (1.0 - r.prediction_for_label()).powi(2))
            .sum();
        (squared / total_weight).sqrt()
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
