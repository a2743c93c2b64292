//! Solar power prediction from environmental readings.
//!
//! Readings are validated into [`SolarConditions`], turned into a
//! [`FeatureVector`] and scored by an injected [`PowerModel`].

pub mod conditions;
pub mod error;
pub mod features;
pub mod forecast;
pub mod model;

pub use conditions::{SolarConditions, SolarConditionsInput};
pub use error::{ForecastError, ForecastResult};
pub use features::{feature_labels, FeatureVector, FEATURE_NAMES};
pub use forecast::{GenerationStatus, PowerForecaster, PowerPrediction, DEFAULT_CAPACITY_MW};
pub use model::{LinearPowerModel, ModelArtifact, PowerModel, ScalerParams};
