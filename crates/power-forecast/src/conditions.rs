use crate::error::{ForecastError, ForecastResult};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const DISTANCE_RANGE: RangeInclusive<f64> = 0.0..=1.5;
pub const TEMPERATURE_RANGE: RangeInclusive<i32> = 42..=78;
pub const WIND_DIRECTION_RANGE: RangeInclusive<u8> = 1..=32;
pub const WIND_SPEED_RANGE: RangeInclusive<f64> = 1.1..=22.1;
pub const SKY_COVER_RANGE: RangeInclusive<u8> = 0..=4;
pub const HUMIDITY_RANGE: RangeInclusive<u8> = 0..=100;
pub const AVERAGE_WIND_SPEED_RANGE: RangeInclusive<f64> = 0.0..=30.0;
pub const AVERAGE_PRESSURE_RANGE: RangeInclusive<f64> = 29.64..=30.39;

/// Raw, unchecked readings as they arrive from a form, CLI flags or JSON.
///
/// Integer fields are carried as `f64` so that a fractional or out-of-type
/// value is reported as out of range instead of failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarConditionsInput {
    pub distance_to_solar_noon: f64,
    pub temperature: f64,
    pub wind_direction: f64,
    pub wind_speed: f64,
    pub sky_cover: f64,
    pub humidity: f64,
    pub average_wind_speed: f64,
    pub average_pressure: f64,
}

/// Environmental readings for one forecast. Every field is within its
/// documented range, so a value of this type can always be fed to a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarConditions {
    distance_to_solar_noon: f64,
    temperature: i32,
    wind_direction: u8,
    wind_speed: f64,
    sky_cover: u8,
    humidity: u8,
    average_wind_speed: f64,
    average_pressure: f64,
}

impl SolarConditions {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        distance_to_solar_noon: f64,
        temperature: i32,
        wind_direction: u8,
        wind_speed: f64,
        sky_cover: u8,
        humidity: u8,
        average_wind_speed: f64,
        average_pressure: f64,
    ) -> ForecastResult<Self> {
        Ok(Self {
            distance_to_solar_noon: check_float("distance_to_solar_noon", distance_to_solar_noon, &DISTANCE_RANGE)?,
            temperature: check_int("temperature", temperature, &TEMPERATURE_RANGE)?,
            wind_direction: check_int("wind_direction", wind_direction, &WIND_DIRECTION_RANGE)?,
            wind_speed: check_float("wind_speed", wind_speed, &WIND_SPEED_RANGE)?,
            sky_cover: check_int("sky_cover", sky_cover, &SKY_COVER_RANGE)?,
            humidity: check_int("humidity", humidity, &HUMIDITY_RANGE)?,
            average_wind_speed: check_float("average_wind_speed", average_wind_speed, &AVERAGE_WIND_SPEED_RANGE)?,
            average_pressure: check_float("average_pressure", average_pressure, &AVERAGE_PRESSURE_RANGE)?,
        })
    }

    pub fn distance_to_solar_noon(&self) -> f64 {
        self.distance_to_solar_noon
    }

    pub fn temperature(&self) -> i32 {
        self.temperature
    }

    /// Compass sector, 1..=32.
    pub fn wind_direction(&self) -> u8 {
        self.wind_direction
    }

    pub fn wind_speed(&self) -> f64 {
        self.wind_speed
    }

    pub fn sky_cover(&self) -> u8 {
        self.sky_cover
    }

    pub fn humidity(&self) -> u8 {
        self.humidity
    }

    pub fn average_wind_speed(&self) -> f64 {
        self.average_wind_speed
    }

    pub fn average_pressure(&self) -> f64 {
        self.average_pressure
    }
}

impl TryFrom<SolarConditionsInput> for SolarConditions {
    type Error = ForecastError;

    fn try_from(input: SolarConditionsInput) -> ForecastResult<Self> {
        Self::new(
            input.distance_to_solar_noon,
            whole("temperature", input.temperature, &TEMPERATURE_RANGE)?,
            whole("wind_direction", input.wind_direction, &WIND_DIRECTION_RANGE)?,
            input.wind_speed,
            whole("sky_cover", input.sky_cover, &SKY_COVER_RANGE)?,
            whole("humidity", input.humidity, &HUMIDITY_RANGE)?,
            input.average_wind_speed,
            input.average_pressure,
        )
    }
}

impl From<SolarConditions> for SolarConditionsInput {
    fn from(c: SolarConditions) -> Self {
        Self {
            distance_to_solar_noon: c.distance_to_solar_noon,
            temperature: c.temperature as f64,
            wind_direction: c.wind_direction as f64,
            wind_speed: c.wind_speed,
            sky_cover: c.sky_cover as f64,
            humidity: c.humidity as f64,
            average_wind_speed: c.average_wind_speed,
            average_pressure: c.average_pressure,
        }
    }
}

fn out_of_range(field: &'static str, value: f64, min: f64, max: f64) -> ForecastError {
    ForecastError::OutOfRange { field, value, min, max }
}

fn check_float(field: &'static str, value: f64, range: &RangeInclusive<f64>) -> ForecastResult<f64> {
    if value.is_finite() && range.contains(&value) {
        Ok(value)
    } else {
        Err(out_of_range(field, value, *range.start(), *range.end()))
    }
}

fn check_int<T>(field: &'static str, value: T, range: &RangeInclusive<T>) -> ForecastResult<T>
where
    T: PartialOrd + Copy + Into<f64>,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(out_of_range(field, value.into(), (*range.start()).into(), (*range.end()).into()))
    }
}

/// Narrow a raw reading to an integer field, rejecting fractions and anything
/// outside the field's range before the cast.
fn whole<T>(field: &'static str, value: f64, range: &RangeInclusive<T>) -> ForecastResult<T>
where
    T: Copy + Into<f64> + TryFrom<i64>,
{
    let (min, max) = ((*range.start()).into(), (*range.end()).into());
    if !value.is_finite() || value.fract() != 0.0 || value < min || value > max {
        return Err(out_of_range(field, value, min, max));
    }
    T::try_from(value as i64).map_err(|_| out_of_range(field, value, min, max))
}
