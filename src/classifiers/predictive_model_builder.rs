use crate::classifiers::Classifier;
use crate::core::instances::Instance;
use crate::error::{ModelError, Result};
use serde_json::{Map, Value};

/// Loosely typed options handed to builders, keyed by camelCase option name.
pub type BuilderConfig = Map<String, Value>;

pub trait PredictiveModelBuilder {
    type Model: Classifier;

    fn build_predictive_model(&mut self, training_data: &[Instance]) -> Result<Self::Model>;

    /// Applies the options this builder recognizes and ignores the rest, so a
    /// wrapping builder can forward one config to everything it wraps.
    fn update_builder_config(&mut self, config: &BuilderConfig) -> Result<()>;
}

pub(crate) fn config_f64(config: &BuilderConfig, key: &str) -> Result<Option<f64>> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| ModelError::invalid_config(key, format!("expected a number, got {v}"))),
    }
}

pub(crate) fn config_usize(config: &BuilderConfig, key: &str) -> Result<Option<usize>> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v.as_u64().map(|n| Some(n as usize)).ok_or_else(|| {
            ModelError::invalid_config(key, format!("expected a non-negative integer, got {v}"))
        }),
    }
}

pub(crate) fn config_bool(config: &BuilderConfig, key: &str) -> Result<Option<bool>> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_bool()
            .map(Some)
            .ok_or_else(|| ModelError::invalid_config(key, format!("expected a boolean, got {v}"))),
    }
}

pub(crate) fn config_str<'a>(config: &'a BuilderConfig, key: &str) -> Result<Option<&'a str>> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_str()
            .map(Some)
            .ok_or_else(|| ModelError::invalid_config(key, format!("expected a string, got {v}"))),
    }
}
