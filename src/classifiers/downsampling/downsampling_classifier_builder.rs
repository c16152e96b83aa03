use crate::classifiers::downsampling::{DownsamplingClassifier, RandomDroppingInstanceFilter};
use crate::classifiers::predictive_model_builder::{BuilderConfig, PredictiveModelBuilder, config_f64};
use crate::core::instances::{AttributeValue, Instance};
use crate::error::{ModelError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

pub const MINORITY_INSTANCE_PROPORTION: &str = "minorityInstanceProportion";

pub const DIAGNOSTIC_SAMPLE_LIMIT: usize = 1000;
pub const DIAGNOSTIC_SAMPLE_STRIDE: usize = 100;

pub type DiagnosticSink = Box<dyn FnMut(usize, &Instance) + Send>;

/// Trains a wrapped builder on data whose majority label has been randomly
/// thinned until the minority label reaches a target proportion.
pub struct DownsamplingClassifierBuilder<B, R = StdRng> {
    wrapped: B,
    target_minority_proportion: f64,
    rng: R,
    diagnostic_label: AttributeValue,
    diagnostic_sink: Option<DiagnosticSink>,
}

impl<B: PredictiveModelBuilder> DownsamplingClassifierBuilder<B, StdRng> {
    pub fn new(wrapped: B, target_minority_proportion: f64) -> Result<Self> {
        Self::with_rng(wrapped, target_minority_proportion, StdRng::from_os_rng())
    }

    pub fn seeded(wrapped: B, target_minority_proportion: f64, seed: u64) -> Result<Self> {
        Self::with_rng(
            wrapped,
            target_minority_proportion,
            StdRng::seed_from_u64(seed),
        )
    }
}

impl<B: PredictiveModelBuilder, R: Rng> DownsamplingClassifierBuilder<B, R> {
    pub fn with_rng(wrapped: B, target_minority_proportion: f64, rng: R) -> Result<Self> {
        validate_target(target_minority_proportion)?;
        Ok(Self {
            wrapped,
            target_minority_proportion,
            rng,
            diagnostic_label: AttributeValue::Numeric(1.0),
            diagnostic_sink: None,
        })
    }

    pub fn target_minority_proportion(&self) -> f64 {
        self.target_minority_proportion
    }

    pub fn set_target_minority_proportion(&mut self, target: f64) -> Result<()> {
        validate_target(target)?;
        self.target_minority_proportion = target;
        Ok(())
    }

    pub fn with_diagnostic_label(mut self, label: impl Into<AttributeValue>) -> Self {
        self.diagnostic_label = label.into();
        self
    }

    pub fn with_diagnostic_sink(mut self, sink: DiagnosticSink) -> Self {
        self.diagnostic_sink = Some(sink);
        self
    }

    pub fn wrapped(&self) -> &B {
        &self.wrapped
    }

    fn report_sample_instances(&mut self, training_data: &[Instance]) {
        info!(
            n_instances = training_data.len(),
            "unexpected label count, sampling instances for inspection"
        );
        let Self {
            diagnostic_label,
            diagnostic_sink,
            ..
        } = self;
        let sampled = training_data
            .iter()
            .enumerate()
            .take(DIAGNOSTIC_SAMPLE_LIMIT + 1)
            .step_by(DIAGNOSTIC_SAMPLE_STRIDE)
            .filter(|(_, instance)| instance.label() == &*diagnostic_label);
        for (position, instance) in sampled {
            match diagnostic_sink.as_mut() {
                Some(sink) => sink(position, instance),
                None => info!(
                    position,
                    attributes = ?instance.attributes(),
                    label = %instance.label(),
                    weight = instance.weight(),
                    "sample instance"
                ),
            }
        }
    }
}

impl<B, R> PredictiveModelBuilder for DownsamplingClassifierBuilder<B, R>
where
    B: PredictiveModelBuilder,
    R: Rng,
{
    type Model = DownsamplingClassifier<B::Model>;

    #[instrument(skip_all, fields(n_instances = training_data.len(), target_minority_proportion = self.target_minority_proportion))]
    fn build_predictive_model(&mut self, training_data: &[Instance]) -> Result<Self::Model> {
        let proportions = label_proportions(training_data);
        if proportions.len() != 2 {
            self.report_sample_instances(training_data);
            return Err(ModelError::WrongLabelCount {
                found: proportions.len(),
                labels: proportions.into_keys().collect(),
            });
        }
        if proportions.values().any(|p| !p.is_finite()) {
            return Err(ModelError::InvalidTrainingData {
                reason: "total instance weight is zero".to_string(),
            });
        }

        let mut entries = proportions.into_iter();
        let (Some(first), Some(second)) = (entries.next(), entries.next()) else {
            return Err(ModelError::InvalidTrainingData {
                reason: "expected two labels".to_string(),
            });
        };
        let ((majority_label, majority_proportion), (minority_label, _)) = if second.1 > first.1 {
            (second, first)
        } else {
            (first, second)
        };
        let natural_minority_proportion = 1.0 - majority_proportion;
        let target = self.target_minority_proportion;

        if natural_minority_proportion <= 0.0 || natural_minority_proportion >= target {
            if natural_minority_proportion <= 0.0 {
                warn!(
                    minority = %minority_label,
                    "minority label carries no weight, training without downsampling"
                );
            } else {
                info!(
                    natural_minority_proportion,
                    "minority already at target, training without downsampling"
                );
            }
            let model = self.wrapped.build_predictive_model(training_data)?;
            return Ok(DownsamplingClassifier::new(
                model,
                majority_label,
                minority_label,
                0.0,
            ));
        }

        let drop_probability = drop_probability(natural_minority_proportion, target);
        let filter = RandomDroppingInstanceFilter::new(majority_label.clone(), drop_probability);
        let downsampled = filter.apply(training_data, &mut self.rng);
        info!(
            natural_minority_proportion,
            drop_probability,
            kept = downsampled.len(),
            dropped = training_data.len() - downsampled.len(),
            "downsampled majority label"
        );

        let model = self.wrapped.build_predictive_model(&downsampled)?;
        Ok(DownsamplingClassifier::new(
            model,
            majority_label,
            minority_label,
            drop_probability,
        ))
    }

    fn update_builder_config(&mut self, config: &BuilderConfig) -> Result<()> {
        self.wrapped.update_builder_config(config)?;
        if let Some(target) = config_f64(config, MINORITY_INSTANCE_PROPORTION)? {
            self.set_target_minority_proportion(target)?;
        }
        Ok(())
    }
}

fn validate_target(target: f64) -> Result<()> {
    if target > 0.0 && target < 1.0 {
        Ok(())
    } else {
        Err(ModelError::invalid_config(
            MINORITY_INSTANCE_PROPORTION,
            format!("must be strictly between 0 and 1, got {target}"),
        ))
    }
}

fn label_proportions(training_data: &[Instance]) -> BTreeMap<AttributeValue, f64> {
    let mut weights: BTreeMap<AttributeValue, f64> = BTreeMap::new();
    let mut total = 0.0;
    for instance in training_data {
        *weights.entry(instance.label().clone()).or_insert(0.0) += instance.weight();
        total += instance.weight();
    }
    for w in weights.values_mut() {
        *w /= total;
    }
    weights
}

/// Probability of dropping a majority instance so that a minority share of
/// `natural` becomes `target` in expectation. Always in `[0, 1)`; a minority
/// without weight cannot be rebalanced and gets 0.
pub fn drop_probability(natural: f64, target: f64) -> f64 {
    if natural <= 0.0 || natural >= target {
        return 0.0;
    }
    let kept = (natural - target * natural) / (target - target * natural);
    (1.0 - kept).clamp(0.0, 1.0 - f64::EPSILON)
}
