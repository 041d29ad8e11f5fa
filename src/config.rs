use crate::error::{Result, VoronoiError};

/// Tunables of the sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepConfig {
    /// How much the bounding box of the sites is grown on each side before the sweep, as a
    /// fraction of `extent + 1` on that axis.
    pub margin_ratio: f64,
    /// Tolerance of the coordinate equality tests that pick the degenerate branches of the
    /// predicates (equal focus x, focus on the directrix, collinear triples).
    ///
    /// The default of `0.0` means exact comparison. Raising it makes more inputs take the
    /// degenerate branches.
    pub epsilon: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            margin_ratio: 0.2,
            epsilon: 0.0,
        }
    }
}

impl SweepConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_margin_ratio(mut self, ratio: f64) -> Self {
        self.margin_ratio = ratio;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.margin_ratio.is_finite() || self.margin_ratio < 0.0 {
            return Err(VoronoiError::InvalidConfiguration {
                message: format!(
                    "margin ratio must be finite and non-negative, got {}",
                    self.margin_ratio
                ),
            });
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(VoronoiError::InvalidConfiguration {
                message: format!(
                    "epsilon must be finite and non-negative, got {}",
                    self.epsilon
                ),
            });
        }
        Ok(())
    }
}
