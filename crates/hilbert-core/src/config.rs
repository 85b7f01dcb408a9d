//! Diagnostics configuration.
//!
//! All numeric constants used by the pipeline live here as explicit values
//! that are passed into each computation. There is no module-level mutable
//! state: a test that wants a different epsilon builds a different config.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Floor applied to vector norms before division in coherence.
pub const DEFAULT_NORM_FLOOR: f64 = 1e-12;

/// Additive epsilon in `stability = 1 / (total_delta + epsilon)`.
pub const DEFAULT_STABILITY_EPSILON: f64 = 1e-9;

/// Maximum absolute disagreement tolerated between an accelerated entropy
/// backend and the reference computation.
pub const BACKEND_PARITY_TOLERANCE: f64 = 1e-12;

/// Number of projection components used by the leave-one-out geometry delta.
pub const STABILITY_PROJECTION_COMPONENTS: usize = 2;

/// Top-level configuration for a diagnostics run.
///
/// # Example
///
/// ```
/// use hilbert_core::config::DiagnosticsConfig;
///
/// let config = DiagnosticsConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.stability.projection_components, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Lower clamp for row and centroid norms in coherence.
    pub norm_floor: f64,

    /// Leave-one-out stability settings.
    #[serde(default)]
    pub stability: StabilityConfig,

    /// Shared-projection overlay settings.
    #[serde(default)]
    pub overlay: OverlayConfig,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            norm_floor: DEFAULT_NORM_FLOOR,
            stability: StabilityConfig::default(),
            overlay: OverlayConfig::default(),
        }
    }
}

impl DiagnosticsConfig {
    /// Validate the configuration, returning an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.norm_floor.is_finite() && self.norm_floor > 0.0) {
            return Err(format!(
                "norm_floor must be finite and > 0, got {}",
                self.norm_floor
            ));
        }
        self.stability.validate()?;
        self.overlay.validate()?;
        Ok(())
    }

    /// Load from a JSON string and validate.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate().map_err(CoreError::Config)?;
        Ok(config)
    }
}

/// Leave-one-out stability settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityConfig {
    /// Epsilon keeping `1 / (total_delta + epsilon)` finite.
    pub epsilon: f64,

    /// Dimensionality of the projection compared by the geometry delta.
    /// Only 2 is supported.
    pub projection_components: usize,

    /// Run leave-one-out iterations on the rayon pool.
    pub parallel: bool,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_STABILITY_EPSILON,
            projection_components: STABILITY_PROJECTION_COMPONENTS,
            parallel: true,
        }
    }
}

impl StabilityConfig {
    /// Validate the stability configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(format!(
                "stability.epsilon must be finite and > 0, got {}",
                self.epsilon
            ));
        }
        if self.projection_components != STABILITY_PROJECTION_COMPONENTS {
            return Err(format!(
                "stability.projection_components must be {}, got {}",
                STABILITY_PROJECTION_COMPONENTS, self.projection_components
            ));
        }
        Ok(())
    }
}

/// Shared-projection overlay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Number of shared components (2 or 3).
    pub n_components: usize,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self { n_components: 3 }
    }
}

impl OverlayConfig {
    /// Validate the overlay configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(2..=3).contains(&self.n_components) {
            return Err(format!(
                "overlay.n_components must be 2 or 3, got {}",
                self.n_components
            ));
        }
        Ok(())
    }
}
