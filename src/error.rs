use crate::core::instances::AttributeValue;

/// Errors raised while configuring, training or inspecting a model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid configuration for '{option}': {reason}")]
    InvalidConfiguration {
        option: String,
        reason: String,
    },

    #[error("invalid training data: {reason}")]
    InvalidTrainingData {
        reason: String,
    },

    #[error("training data must contain exactly 2 classifications, but it had {found}: {labels:?}")]
    WrongLabelCount {
        found: usize,
        labels: Vec<AttributeValue>,
    },

    #[error("instance weight must be finite and non-negative, got {weight}")]
    InvalidInstanceWeight {
        weight: f64,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ModelError {
    pub(crate) fn invalid_config(option: &str, reason: impl Into<String>) -> Self {
        ModelError::InvalidConfiguration {
            option: option.to_string(),
            reason: reason.into(),
        }
    }

    /// True for both flavours of bad training data.
    pub fn is_invalid_training_data(&self) -> bool {
        matches!(
            self,
            ModelError::InvalidTrainingData { .. } | ModelError::WrongLabelCount { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
