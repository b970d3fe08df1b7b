//! Configuration for summarising performances

use crate::{
    error::FeatureError,
    features::{TransitionNormalization, DEFAULT_DENSITY_INTERVAL},
};

/// Feature extraction parameters
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureConfig {
    /// Note density window length in seconds (default: 5.0)
    pub density_interval: f64,

    /// Scaling applied to the pitch class transition matrix (default: None)
    pub transition_normalization: TransitionNormalization,

    /// Worker threads for batch extraction (default: 0, the rayon default)
    pub threads: usize,

    /// Keep every loaded performance in the batch report (default: false)
    /// Needed for statistics across files such as `used_pitch_across`
    pub retain_performances: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            density_interval: DEFAULT_DENSITY_INTERVAL,
            transition_normalization: TransitionNormalization::None,
            threads: 0,
            retain_performances: false,
        }
    }
}

impl FeatureConfig {
    pub fn validate(&self) -> Result<(), FeatureError> {
        if !(self.density_interval.is_finite() && self.density_interval > 0.0) {
            return Err(FeatureError::InvalidArgument(format!(
                "density_interval must be a positive number of seconds, got {}",
                self.density_interval
            )));
        }
        Ok(())
    }
}
