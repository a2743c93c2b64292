use anyhow::{Context, Result};
use power_forecast::DEFAULT_CAPACITY_MW;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Local linear model artifact; the remote power service is used when unset
    pub power_model_path: Option<PathBuf>,
    pub plant_capacity_mw: f64,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            power_model_path: env::var("POWER_MODEL_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            plant_capacity_mw: env::var("PLANT_CAPACITY_MW")
                .unwrap_or_else(|_| DEFAULT_CAPACITY_MW.to_string())
                .parse()
                .context("PLANT_CAPACITY_MW must be a number")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.plant_capacity_mw > 0.0 && self.plant_capacity_mw.is_finite()) {
            anyhow::bail!("PLANT_CAPACITY_MW must be positive, got {}", self.plant_capacity_mw);
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            power_model_path: None,
            plant_capacity_mw: DEFAULT_CAPACITY_MW,
        }
    }
}
