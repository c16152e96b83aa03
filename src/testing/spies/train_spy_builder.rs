use crate::classifiers::predictive_model_builder::{BuilderConfig, PredictiveModelBuilder};
use crate::core::instances::Instance;
use crate::error::Result;
use crate::testing::stubs::FixedDistributionClassifier;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct TrainSpyHandle {
    training_sets: Arc<Mutex<Vec<Vec<Instance>>>>,
    configs: Arc<Mutex<Vec<BuilderConfig>>>,
}

impl TrainSpyHandle {
    pub fn training_sets(&self) -> Vec<Vec<Instance>> {
        self.training_sets
            .lock()
            .map(|sets| sets.clone())
            .unwrap_or_default()
    }

    pub fn last_training_set(&self) -> Option<Vec<Instance>> {
        self.training_sets().pop()
    }

    pub fn configs(&self) -> Vec<BuilderConfig> {
        self.configs.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

pub struct TrainSpyBuilder {
    model: FixedDistributionClassifier,
    handle: TrainSpyHandle,
}

impl TrainSpyBuilder {
    pub fn new(model: FixedDistributionClassifier) -> (Self, TrainSpyHandle) {
        let handle = TrainSpyHandle::default();
        (
            Self {
                model,
                handle: handle.clone(),
            },
            handle,
        )
    }
}

impl PredictiveModelBuilder for TrainSpyBuilder {
    type Model = FixedDistributionClassifier;

    fn build_predictive_model(&mut self, training_data: &[Instance]) -> Result<Self::Model> {
        if let Ok(mut sets) = self.handle.training_sets.lock() {
            sets.push(training_data.to_vec());
        }
        Ok(self.model.clone())
    }

    fn update_builder_config(&mut self, config: &BuilderConfig) -> Result<()> {
        if let Ok(mut configs) = self.handle.configs.lock() {
            configs.push(config.clone());
        }
        Ok(())
    }
}
