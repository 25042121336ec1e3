/// Decoding of Meteobridge template responses into observations
use log::{debug, warn};

use crate::bridge::template::{Field, TemplateCatalog};
use crate::error::{BridgeError, Result};
use crate::models::{Lightning, Observation, PressureTrend};

/// Meteobridge echoes the bracketed token back when it has no value for it
const PLACEHOLDER_MARKER: char = '[';

/// Station identities that report ET0 themselves
const NATIVE_ET0_STATION_PREFIX: &str = "vantage";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawField<'a> {
    Value(&'a str),
    /// Sensor not present; the bridge returned the unresolved token
    Absent,
}

/// One response split into positional fields, in catalog order
#[derive(Debug)]
pub struct RawReading<'a> {
    catalog: &'a TemplateCatalog,
    fields: Vec<RawField<'a>>,
}

/// Split a response body on single spaces and mark unresolved tokens
///
/// Splitting on exactly one space keeps an empty value (the bridge sometimes
/// returns an empty cardinal direction) in its position. One trailing empty
/// element, left by a trailing separator, is dropped.
pub fn split_response<'a>(body: &'a str, catalog: &'a TemplateCatalog) -> Result<RawReading<'a>> {
    let body = body.trim_end_matches(['\r', '\n']);
    let mut parts: Vec<&str> = body.split(' ').collect();

    if parts.len() == catalog.len() + 1 && parts.last() == Some(&"") {
        parts.pop();
    }

    if parts.len() != catalog.len() {
        return Err(BridgeError::FieldCount {
            expected: catalog.len(),
            actual: parts.len(),
        });
    }

    let fields: Vec<RawField> = parts
        .into_iter()
        .map(|part| {
            if part.contains(PLACEHOLDER_MARKER) {
                RawField::Absent
            } else {
                RawField::Value(part)
            }
        })
        .collect();

    debug!("Sanitized reading: {:?}", fields);

    Ok(RawReading { catalog, fields })
}

impl<'a> RawReading<'a> {
    pub fn get(&self, field: Field) -> Option<RawField<'a>> {
        self.catalog
            .field_index(field)
            .and_then(|index| self.fields.get(index).copied())
    }

    /// Parsed value, or None when the sensor is absent or the value is bad
    pub fn float(&self, field: Field) -> Option<f64> {
        match self.get(field)? {
            RawField::Absent => {
                if let Some(spec) = self.catalog.spec(field) {
                    debug!("{:?} sensor {} not reported by the station", spec.family, spec.token);
                }
                None
            }
            RawField::Value(text) => match text.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => Some(value),
                _ => {
                    warn!("Invalid value for {:?}: '{}', using 0", field, text);
                    None
                }
            },
        }
    }

    pub fn float_or_zero(&self, field: Field) -> f64 {
        self.float(field).unwrap_or(0.0)
    }

    /// Integer fields may come back as "1" or "1.0"
    pub fn integer_or_zero(&self, field: Field) -> i64 {
        self.float(field).map(|value| value as i64).unwrap_or(0)
    }

    pub fn text(&self, field: Field) -> Option<&'a str> {
        match self.get(field)? {
            RawField::Value(text) if !text.trim().is_empty() => Some(text.trim()),
            _ => None,
        }
    }
}

/// Decode a Meteobridge response body into an Observation
///
/// A missing or non-numeric outdoor temperature means the payload can't be
/// trusted at all. Every other field falls back to zero (or None for
/// optional sensors) on its own.
pub fn decode_observation(body: &str, catalog: &TemplateCatalog) -> Result<Observation> {
    let reading = split_response(body, catalog)?;

    let temperature = match reading.get(Field::Temperature) {
        Some(RawField::Value(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| BridgeError::InvalidTemperature(text.to_string()))?,
        _ => {
            return Err(BridgeError::InvalidTemperature(
                catalog
                    .token(Field::Temperature)
                    .unwrap_or_default()
                    .to_string(),
            ))
        }
    };

    let station = reading.text(Field::Station).unwrap_or_default().to_string();
    let native_et0_capable = is_native_et0_station(&station);

    let lightning = if catalog.has_lightning() {
        Some(Lightning {
            strikes: reading.float_or_zero(Field::LightningStrikes),
            distance: reading.float_or_zero(Field::LightningDistance),
        })
    } else {
        None
    };

    Ok(Observation {
        temperature,
        dewpoint: reading.float_or_zero(Field::Dewpoint),
        windchill: reading.float_or_zero(Field::Windchill),
        temperature_max: reading.float_or_zero(Field::TemperatureMax),
        temperature_min: reading.float_or_zero(Field::TemperatureMin),
        indoor_temperature: reading.float_or_zero(Field::IndoorTemperature),
        indoor_dewpoint: reading.float_or_zero(Field::IndoorDewpoint),

        humidity: reading.float_or_zero(Field::Humidity),
        humidity_max: reading.float_or_zero(Field::HumidityMax),
        humidity_min: reading.float_or_zero(Field::HumidityMin),
        indoor_humidity: reading.float_or_zero(Field::IndoorHumidity),

        station_pressure: reading.float_or_zero(Field::StationPressure),
        sealevel_pressure: reading.float_or_zero(Field::SealevelPressure),
        pressure_trend: PressureTrend::from_reported(reading.float_or_zero(Field::PressureTrend)),

        solar_radiation: reading.float(Field::SolarRadiation),
        uv_index: reading.float(Field::UvIndex),
        evapotranspiration: if native_et0_capable {
            reading.float(Field::Evapotranspiration)
        } else {
            None
        },

        wind_speed: reading.float_or_zero(Field::WindSpeed),
        wind_gust: reading.float_or_zero(Field::WindGust),
        wind_direction: reading.float_or_zero(Field::WindDirection),
        wind_cardinal_label: reading.text(Field::WindCardinal).map(str::to_string),
        wind_cardinal: None,

        rain_rate: reading.float_or_zero(Field::RainRate),
        rain_daily: reading.float_or_zero(Field::RainDaily),
        rain_24h: reading.float_or_zero(Field::Rain24h),
        rain_yesterday: reading.float_or_zero(Field::RainYesterday),
        rain_monthly: reading.float_or_zero(Field::RainMonthly),
        rain_yearly: reading.float_or_zero(Field::RainYearly),

        station,
        station_number: reading.integer_or_zero(Field::StationNumber),
        native_et0_capable,
        console_battery: reading.integer_or_zero(Field::ConsoleBattery),
        iss_battery: reading.integer_or_zero(Field::IssBattery),
        clock_time: reading.integer_or_zero(Field::ClockTime),
        epoch: reading.integer_or_zero(Field::Epoch),
        last_good_data: reading.integer_or_zero(Field::LastGoodData),

        lightning,
    })
}

/// Davis Vantage consoles compute ET0 themselves
pub fn is_native_et0_station(station: &str) -> bool {
    station.to_lowercase().starts_with(NATIVE_ET0_STATION_PREFIX)
}
