use crate::classifiers::PredictiveModelBuilder;
use crate::core::instances::Instance;
use crate::error::{ModelError, Result};
use crate::evaluation::PredictionMapResults;
use crate::evaluation::loss::{ClassifierLossFunction, LossFunctionKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::fmt::{Display, Formatter, Result as FmtResult};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct FoldLoss {
    pub fold: usize,
    pub loss: f64,
    pub weight: f64,
    pub instances: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossValidationReport {
    pub loss_name: &'static str,
    pub folds: Vec<FoldLoss>,
    pub loss: f64,
}

impl CrossValidationReport {
    #[inline]
    fn fmtv(v: f64) -> String {
        if v.is_nan() {
            "NaN".into()
        } else {
            format!("{:.6}", v)
        }
    }
}

impl Display for CrossValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(
            f,
            "{} over {} folds: {}",
            self.loss_name,
            self.folds.len(),
            Self::fmtv(self.loss)
        )?;
        for fold in &self.folds {
            writeln!(
                f,
                "  fold={}, n={}, weight={}, loss={}",
                fold.fold,
                fold.instances,
                Self::fmtv(fold.weight),
                Self::fmtv(fold.loss)
            )?;
        }
        Ok(())
    }
}

pub struct CrossValidator {
    folds: usize,
    seed: u64,
    loss: Box<dyn ClassifierLossFunction>,
}

impl CrossValidator {
    pub fn new(folds: usize, seed: u64, loss: Box<dyn ClassifierLossFunction>) -> Result<Self> {
        if folds < 2 {
            return Err(ModelError::invalid_config(
                "folds",
                format!("need at least 2 folds, got {folds}"),
            ));
        }
        Ok(Self { folds, seed, loss })
    }

    pub fn with_kind(folds: usize, seed: u64, kind: LossFunctionKind) -> Result<Self> {
        Self::new(folds, seed, kind.loss_function())
    }

    pub fn folds(&self) -> usize {
        self.folds
    }

    #[instrument(skip_all, fields(n_folds = self.folds, n_instances = data.len(), loss = self.loss.name()))]
    pub fn evaluate<B: PredictiveModelBuilder>(
        &self,
        builder: &mut B,
        data: &[Instance],
    ) -> Result<CrossValidationReport> {
        if data.len() < self.folds {
            return Err(ModelError::InvalidTrainingData {
                reason: format!(
                    "{} instances cannot fill {} folds",
                    data.len(),
                    self.folds
                ),
            });
        }

        let mut order: Vec<usize> = (0..data.len()).collect();
        order.shuffle(&mut StdRng::seed_from_u64(self.seed));

        let mut folds = Vec::with_capacity(self.folds);
        for fold in 0..self.folds {
            let mut training = Vec::with_capacity(data.len());
            let mut held_out = Vec::with_capacity(data.len() / self.folds + 1);
            for (position, &index) in order.iter().enumerate() {
                if position % self.folds == fold {
                    held_out.push(data[index].clone());
                } else {
                    training.push(data[index].clone());
                }
            }

            let model = builder.build_predictive_model(&training)?;
            let results = PredictionMapResults::from_classifier(&model, &held_out);
            let loss = self.loss.loss(&results);
            info!(fold, loss, "fold completed");
            folds.push(FoldLoss {
                fold,
                loss,
                weight: results.total_weight(),
                instances: held_out.len(),
            });
        }

        let total_weight: f64 = folds.iter().map(|f| f.weight).sum();
        let loss = if total_weight > 0.0 {
            folds.iter().map(|f| f.loss * f.weight).sum::<f64>() / total_weight
        } else {
            0.0
        };
        info!(loss, "cross validation complete");

        Ok(CrossValidationReport {
            loss_name: self.loss.name(),
            folds,
            loss,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::tree::DecisionTreeBuilder;
    use crate::core::instances::AttributesMap;
    use crate::evaluation::loss::ClassifierLogCvLossFunction;
    use crate::testing::spies::TrainSpyBuilder;
    use crate::testing::stubs::FixedDistributionClassifier;
    use std::collections::HashMap;

    fn data(n: usize) -> Vec<Instance> {
        (0..n)
            .map(|i| {
                let mut attrs = AttributesMap::new();
                attrs.insert("id".to_string(), (i as f64).into());
                let label = if i % 2 == 0 { "A" } else { "B" };
                Instance::unweighted(attrs, label)
            })
            .collect()
    }

    #[test]
    fn every_instance_is_held_out_exactly_once() {
        let (mut spy, handle) =
            TrainSpyBuilder::new(FixedDistributionClassifier::binary("A", 0.8, "B"));
        let cv = CrossValidator::with_kind(4, 9, LossFunctionKind::LogCv).unwrap();
        let report = cv.evaluate(&mut spy, &data(10)).unwrap();

        assert_eq!(report.folds.len(), 4);
        assert_eq!(report.folds.iter().map(|f| f.instances).sum::<usize>(), 10);

        let sets = handle.training_sets();
        assert_eq!(sets.len(), 4);
        let mut appearances: HashMap<String, usize> = HashMap::new();
        for set in &sets {
            for instance in set {
                let id = instance.attribute("id").map(|v| v.to_string()).unwrap_or_default();
                *appearances.entry(id).or_default() += 1;
            }
        }
        assert_eq!(appearances.len(), 10);
        assert!(appearances.values().all(|&n| n == 3));
    }

    #[test]
    fn overall_loss_is_weighted_over_all_instances() {
        let (mut spy, _) = TrainSpyBuilder::new(FixedDistributionClassifier::binary("A", 0.8, "B"));
        let cv = CrossValidator::new(5, 1, Box::new(ClassifierLogCvLossFunction::default())).unwrap();
        let report = cv.evaluate(&mut spy, &data(20)).unwrap();
        let expected = (-(0.8f64).ln() - (0.2f64).ln()) / 2.0;
        assert!((report.loss - expected).abs() < 1e-9);
        assert_eq!(report.loss_name, "LOG_CV");
        assert!(report.to_string().starts_with("LOG_CV over 5 folds"));
    }

    #[test]
    fn same_seed_same_report() {
        let cv = CrossValidator::with_kind(3, 42, LossFunctionKind::Rmse).unwrap();
        let mut a: DecisionTreeBuilder = DecisionTreeBuilder::new();
        let mut b: DecisionTreeBuilder = DecisionTreeBuilder::new();
        assert_eq!(
            cv.evaluate(&mut a, &data(30)).unwrap(),
            cv.evaluate(&mut b, &data(30)).unwrap()
        );
    }

    #[test]
    fn rejects_degenerate_setups() {
        assert!(matches!(
            CrossValidator::with_kind(1, 0, LossFunctionKind::LogCv),
            Err(ModelError::InvalidConfiguration { .. })
        ));
        let cv = CrossValidator::with_kind(5, 0, LossFunctionKind::LogCv).unwrap();
        let (mut spy, _) = TrainSpyBuilder::new(FixedDistributionClassifier::default());
        let err = cv.evaluate(&mut spy, &data(3)).unwrap_err();
        assert!(err.is_invalid_training_data());
    }
}
