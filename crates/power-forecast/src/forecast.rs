use crate::conditions::SolarConditions;
use crate::error::{ForecastError, ForecastResult};
use crate::features::FeatureVector;
use crate::model::PowerModel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Plant nameplate capacity used for efficiency figures.
pub const DEFAULT_CAPACITY_MW: f64 = 33_500.0;

const MODERATE_THRESHOLD: f64 = 10_000.0;
const HIGH_THRESHOLD: f64 = 20_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationStatus {
    Low,
    Moderate,
    High,
}

impl GenerationStatus {
    pub fn classify(power_output: f64) -> Self {
        if power_output < MODERATE_THRESHOLD {
            GenerationStatus::Low
        } else if power_output < HIGH_THRESHOLD {
            GenerationStatus::Moderate
        } else {
            GenerationStatus::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GenerationStatus::Low => "Low",
            GenerationStatus::Moderate => "Moderate",
            GenerationStatus::High => "High",
        }
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerPrediction {
    pub power_output: f64,
    pub efficiency_pct: f64,
    pub status: GenerationStatus,
    pub model: String,
}

pub struct PowerForecaster {
    model: Arc<dyn PowerModel>,
    capacity_mw: f64,
}

impl PowerForecaster {
    pub fn new(model: Arc<dyn PowerModel>) -> Self {
        Self {
            model,
            capacity_mw: DEFAULT_CAPACITY_MW,
        }
    }

    /// Non-positive capacities are ignored.
    pub fn with_capacity(mut self, capacity_mw: f64) -> Self {
        if capacity_mw > 0.0 && capacity_mw.is_finite() {
            self.capacity_mw = capacity_mw;
        }
        self
    }

    pub fn capacity_mw(&self) -> f64 {
        self.capacity_mw
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub async fn forecast(&self, conditions: &SolarConditions) -> ForecastResult<PowerPrediction> {
        let features = FeatureVector::from_conditions(conditions);
        let power_output = self.model.predict(&features).await?;
        if !power_output.is_finite() {
            return Err(ForecastError::InvalidPrediction(power_output));
        }

        let prediction = PowerPrediction {
            power_output,
            efficiency_pct: power_output / self.capacity_mw * 100.0,
            status: GenerationStatus::classify(power_output),
            model: self.model.name().to_string(),
        };
        tracing::debug!(
            "Power forecast via {}: {:.2} ({})",
            prediction.model,
            prediction.power_output,
            prediction.status
        );
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use async_trait::async_trait;

    struct FixedModel(f64);

    #[async_trait]
    impl PowerModel for FixedModel {
        async fn predict(&self, _features: &FeatureVector) -> ForecastResult<f64> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn conditions() -> SolarConditions {
        SolarConditions::new(0.2, 70, 27, 8.0, 0, 30, 9.0, 29.9).unwrap()
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(GenerationStatus::classify(0.0), GenerationStatus::Low);
        assert_eq!(GenerationStatus::classify(9_999.99), GenerationStatus::Low);
        assert_eq!(GenerationStatus::classify(10_000.0), GenerationStatus::Moderate);
        assert_eq!(GenerationStatus::classify(19_999.99), GenerationStatus::Moderate);
        assert_eq!(GenerationStatus::classify(20_000.0), GenerationStatus::High);
        assert_eq!(GenerationStatus::High.to_string(), "High");
    }

    #[tokio::test]
    async fn test_forecast_efficiency() {
        let forecaster = PowerForecaster::new(Arc::new(FixedModel(16_750.0)));
        let prediction = forecaster.forecast(&conditions()).await.unwrap();

        assert_relative_eq!(prediction.efficiency_pct, 50.0);
        assert_eq!(prediction.status, GenerationStatus::Moderate);
        assert_eq!(prediction.model, "fixed");
    }

    #[tokio::test]
    async fn test_custom_capacity() {
        let forecaster = PowerForecaster::new(Arc::new(FixedModel(5_000.0))).with_capacity(10_000.0);
        let prediction = forecaster.forecast(&conditions()).await.unwrap();
        assert_relative_eq!(prediction.efficiency_pct, 50.0);

        let ignored = PowerForecaster::new(Arc::new(FixedModel(1.0))).with_capacity(0.0);
        assert_relative_eq!(ignored.capacity_mw(), DEFAULT_CAPACITY_MW);
    }

    #[tokio::test]
    async fn test_rejects_non_finite_output() {
        let forecaster = PowerForecaster::new(Arc::new(FixedModel(f64::NAN)));
        let err = forecaster.forecast(&conditions()).await.unwrap_err();
        assert!(matches!(err, ForecastError::InvalidPrediction(_)));
    }
}
