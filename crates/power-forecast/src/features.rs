use crate::conditions::SolarConditions;
use serde::Serialize;
use std::collections::BTreeMap;
use std::f64::consts::PI;

/// Model feature names in canonical order.
pub const FEATURE_NAMES: [&str; 9] = [
    "distance-to-solar-noon",
    "temperature",
    "wind-speed",
    "sky-cover",
    "humidity",
    "average-wind-speed-(period)",
    "average-pressure-(period)",
    "wind_dir_sin",
    "wind_dir_cos",
];

/// Human-readable names of the eight inputs, in form order.
pub fn feature_labels() -> [&'static str; 8] {
    [
        "Distance",
        "Temperature",
        "Wind Direction",
        "Wind Speed",
        "Sky Cover",
        "Humidity",
        "Average Wind Speed",
        "Average Pressure",
    ]
}

/// The derived values a power model consumes.
///
/// Wind direction is replaced by its sine and cosine so that sectors either
/// side of north end up close together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    values: [f64; 9],
}

impl FeatureVector {
    pub fn from_conditions(conditions: &SolarConditions) -> Self {
        let radians = 2.0 * PI * f64::from(conditions.wind_direction()) / 360.0;
        Self {
            values: [
                conditions.distance_to_solar_noon(),
                f64::from(conditions.temperature()),
                conditions.wind_speed(),
                f64::from(conditions.sky_cover()),
                f64::from(conditions.humidity()),
                conditions.average_wind_speed(),
                conditions.average_pressure(),
                radians.sin(),
                radians.cos(),
            ],
        }
    }

    pub fn values(&self) -> &[f64; 9] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }

    /// Name-keyed form for JSON payloads.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

impl From<&SolarConditions> for FeatureVector {
    fn from(conditions: &SolarConditions) -> Self {
        Self::from_conditions(conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn conditions(wind_direction: u8) -> SolarConditions {
        SolarConditions::new(0.5, 60, wind_direction, 10.0, 2, 50, 15.0, 30.0).unwrap()
    }

    #[test]
    fn test_canonical_order() {
        let features = FeatureVector::from_conditions(&conditions(16));
        let values = features.values();
        assert_relative_eq!(values[0], 0.5);
        assert_relative_eq!(values[1], 60.0);
        assert_relative_eq!(values[2], 10.0);
        assert_relative_eq!(values[3], 2.0);
        assert_relative_eq!(values[4], 50.0);
        assert_relative_eq!(values[5], 15.0);
        assert_relative_eq!(values[6], 30.0);
        assert_eq!(features.get("humidity"), Some(50.0));
        assert_eq!(features.get("wind-direction"), None);
    }

    #[test]
    fn test_wind_direction_encoding() {
        let features = FeatureVector::from_conditions(&conditions(16));
        let radians = 2.0 * PI * 16.0 / 360.0;
        assert_relative_eq!(features.get("wind_dir_sin").unwrap(), radians.sin());
        assert_relative_eq!(features.get("wind_dir_cos").unwrap(), radians.cos());

        let (s, c) = (features.values()[7], features.values()[8]);
        assert_relative_eq!(s * s + c * c, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_map_uses_feature_names() {
        let map = FeatureVector::from_conditions(&conditions(1)).to_map();
        assert_eq!(map.len(), 9);
        for name in FEATURE_NAMES {
            assert!(map.contains_key(name), "missing {}", name);
        }
    }

    #[test]
    fn test_labels_cover_inputs() {
        let labels = feature_labels();
        assert_eq!(labels.len(), 8);
        assert_eq!(labels[2], "Wind Direction");
    }
}
