use crate::error::{ForecastError, ForecastResult};
use crate::features::{FeatureVector, FEATURE_NAMES};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A pretrained regressor mapping features to a power output.
#[async_trait]
pub trait PowerModel: Send + Sync {
    async fn predict(&self, features: &FeatureVector) -> ForecastResult<f64>;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Serialized form of a fitted linear model, as written by the training job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub scaler: Option<ScalerParams>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// Standardize-then-linear regression evaluated in process.
#[derive(Debug, Clone)]
pub struct LinearPowerModel {
    /// Canonical feature index for each artifact column.
    columns: Vec<usize>,
    mean: Vec<f64>,
    scale: Vec<f64>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearPowerModel {
    pub fn load(path: impl AsRef<Path>) -> ForecastResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let artifact: ModelArtifact = serde_json::from_str(&raw)?;
        let model = Self::from_artifact(artifact)?;
        tracing::info!("Loaded power model from {}", path.display());
        Ok(model)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> ForecastResult<Self> {
        let n = artifact.feature_names.len();
        if n != FEATURE_NAMES.len() {
            return Err(ForecastError::InvalidArtifact(format!(
                "expected {} features, artifact lists {}",
                FEATURE_NAMES.len(),
                n
            )));
        }
        if artifact.coefficients.len() != n {
            return Err(ForecastError::InvalidArtifact(format!(
                "{} coefficients for {} features",
                artifact.coefficients.len(),
                n
            )));
        }

        let mut columns = Vec::with_capacity(n);
        for name in &artifact.feature_names {
            let idx = FEATURE_NAMES
                .iter()
                .position(|f| f == name)
                .ok_or_else(|| ForecastError::InvalidArtifact(format!("unknown feature '{}'", name)))?;
            if columns.contains(&idx) {
                return Err(ForecastError::InvalidArtifact(format!("duplicate feature '{}'", name)));
            }
            columns.push(idx);
        }

        let (mean, scale) = match artifact.scaler {
            Some(s) => {
                if s.mean.len() != n || s.scale.len() != n {
                    return Err(ForecastError::InvalidArtifact(
                        "scaler length does not match feature count".to_string(),
                    ));
                }
                if let Some(i) = s.scale.iter().position(|v| *v == 0.0 || !v.is_finite()) {
                    return Err(ForecastError::InvalidArtifact(format!(
                        "scale for '{}' must be non-zero",
                        artifact.feature_names[i]
                    )));
                }
                (s.mean, s.scale)
            }
            None => (vec![0.0; n], vec![1.0; n]),
        };

        Ok(Self {
            columns,
            mean,
            scale,
            coefficients: artifact.coefficients,
            intercept: artifact.intercept,
        })
    }

    pub fn evaluate(&self, features: &FeatureVector) -> f64 {
        let values = features.values();
        self.columns
            .iter()
            .enumerate()
            .map(|(i, &col)| self.coefficients[i] * (values[col] - self.mean[i]) / self.scale[i])
            .sum::<f64>()
            + self.intercept
    }
}

#[async_trait]
impl PowerModel for LinearPowerModel {
    async fn predict(&self, features: &FeatureVector) -> ForecastResult<f64> {
        Ok(self.evaluate(features))
    }

    fn name(&self) -> &str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::SolarConditions;
    use approx::assert_relative_eq;
    use std::io::Write;

    fn names() -> Vec<String> {
        FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
    }

    fn features() -> FeatureVector {
        let c = SolarConditions::new(0.5, 60, 16, 10.0, 2, 50, 15.0, 30.0).unwrap();
        FeatureVector::from_conditions(&c)
    }

    #[test]
    fn test_unscaled_linear_prediction() {
        let mut coefficients = vec![0.0; 9];
        coefficients[1] = 100.0; // temperature
        coefficients[4] = -10.0; // humidity
        let model = LinearPowerModel::from_artifact(ModelArtifact {
            feature_names: names(),
            scaler: None,
            coefficients,
            intercept: 500.0,
        })
        .unwrap();

        assert_relative_eq!(model.evaluate(&features()), 100.0 * 60.0 - 10.0 * 50.0 + 500.0);
    }

    #[test]
    fn test_reorders_columns_by_name() {
        let mut feature_names = names();
        feature_names.swap(0, 1);
        let mut coefficients = vec![0.0; 9];
        coefficients[0] = 2.0; // now temperature

        let mut mean = vec![0.0; 9];
        mean[0] = 50.0;
        let mut scale = vec![1.0; 9];
        scale[0] = 5.0;

        let model = LinearPowerModel::from_artifact(ModelArtifact {
            feature_names,
            scaler: Some(ScalerParams { mean, scale }),
            coefficients,
            intercept: 0.0,
        })
        .unwrap();

        assert_relative_eq!(model.evaluate(&features()), 2.0 * (60.0 - 50.0) / 5.0);
    }

    #[test]
    fn test_rejects_bad_artifacts() {
        let base = ModelArtifact {
            feature_names: names(),
            scaler: None,
            coefficients: vec![1.0; 9],
            intercept: 0.0,
        };

        let mut short = base.clone();
        short.coefficients.pop();
        assert!(matches!(LinearPowerModel::from_artifact(short), Err(ForecastError::InvalidArtifact(_))));

        let mut unknown = base.clone();
        unknown.feature_names[3] = "cloud-ceiling".to_string();
        assert!(matches!(LinearPowerModel::from_artifact(unknown), Err(ForecastError::InvalidArtifact(_))));

        let mut duplicate = base.clone();
        duplicate.feature_names[3] = duplicate.feature_names[2].clone();
        assert!(matches!(LinearPowerModel::from_artifact(duplicate), Err(ForecastError::InvalidArtifact(_))));

        let mut zero_scale = base.clone();
        let mut scale = vec![1.0; 9];
        scale[5] = 0.0;
        zero_scale.scaler = Some(ScalerParams { mean: vec![0.0; 9], scale });
        let err = LinearPowerModel::from_artifact(zero_scale).unwrap_err();
        assert!(err.to_string().contains("average-wind-speed-(period)"));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let artifact = ModelArtifact {
            feature_names: names(),
            scaler: None,
            coefficients: vec![0.0; 9],
            intercept: 12345.0,
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&artifact).unwrap().as_bytes()).unwrap();

        let model = LinearPowerModel::load(file.path()).unwrap();
        assert_relative_eq!(model.predict(&features()).await.unwrap(), 12345.0);
        assert_eq!(model.name(), "linear");
    }

    #[test]
    fn test_load_missing_file() {
        let err = LinearPowerModel::load("/nonexistent/model.json").unwrap_err();
        assert!(matches!(err, ForecastError::Io(_)));
    }
}
