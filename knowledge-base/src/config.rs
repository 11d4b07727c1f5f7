//! Matcher configuration.

use crate::errors::KbError;

/// Default cosine threshold a document must strictly exceed.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub struct MatcherConfig {
    /// Best document score must be `> threshold` to be answered.
    pub threshold: f32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl MatcherConfig {
    /// Threshold must be finite and lie on the cosine scale.
    pub fn validate(&self) -> Result<(), KbError> {
        if !self.threshold.is_finite() || !(-1.0..=1.0).contains(&self.threshold) {
            return Err(KbError::Config(format!(
                "similarity threshold {} outside [-1, 1]",
                self.threshold
            )));
        }
        Ok(())
    }
}
