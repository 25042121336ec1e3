use std::fmt;
use std::str::FromStr;

/// Target unit system for everything published to the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSystem {
    #[default]
    Metric,
    Us,
}

impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "us" => Ok(UnitSystem::Us),
            other => Err(format!(
                "unknown unit system '{}', expected 'metric' or 'us'",
                other
            )),
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "metric"),
            UnitSystem::Us => write!(f, "us"),
        }
    }
}

/// Three hour barometric trend, encoded the way the hub expects (0/1/2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressureTrend {
    Falling = 0,
    #[default]
    Steady = 1,
    Rising = 2,
}

impl PressureTrend {
    /// Meteobridge reports -1/0/+1; only the sign is significant.
    pub fn from_reported(value: f64) -> Self {
        if value < 0.0 {
            PressureTrend::Falling
        } else if value > 0.0 {
            PressureTrend::Rising
        } else {
            PressureTrend::Steady
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lightning {
    pub strikes: f64,
    pub distance: f64,
}

/// Raw HTTP answer from the bridge device
#[derive(Debug, Clone)]
pub struct BridgeResponse {
    pub status: u16,
    pub body: String,
}

/// One decoded reading in the units Meteobridge reports
/// (°C, %, mb, m/s, mm, km, W/m²).
///
/// Optional sensors are `None` when the bridge echoed the template token back.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Observation {
    pub temperature: f64,
    pub dewpoint: f64,
    pub windchill: f64,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub indoor_temperature: f64,
    pub indoor_dewpoint: f64,

    pub humidity: f64,
    pub humidity_max: f64,
    pub humidity_min: f64,
    pub indoor_humidity: f64,

    pub station_pressure: f64,
    pub sealevel_pressure: f64,
    pub pressure_trend: PressureTrend,

    pub solar_radiation: Option<f64>,
    pub uv_index: Option<f64>,
    /// mm/day, native or estimated
    pub evapotranspiration: Option<f64>,

    pub wind_speed: f64,
    pub wind_gust: f64,
    pub wind_direction: f64,
    pub wind_cardinal_label: Option<String>,
    /// 0 = N .. 15 = NNW, filled in by the wind resolver
    pub wind_cardinal: Option<u8>,

    pub rain_rate: f64,
    pub rain_daily: f64,
    pub rain_24h: f64,
    pub rain_yesterday: f64,
    pub rain_monthly: f64,
    pub rain_yearly: f64,

    pub station: String,
    pub station_number: i64,
    pub native_et0_capable: bool,
    pub console_battery: i64,
    pub iss_battery: i64,
    pub clock_time: i64,
    pub epoch: i64,
    pub last_good_data: i64,

    pub lightning: Option<Lightning>,
}

/// Observation expressed in the configured unit system, ready for publishing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConvertedObservation {
    pub units: UnitSystem,

    pub temperature: f64,
    pub dewpoint: f64,
    pub windchill: f64,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub indoor_temperature: f64,
    pub indoor_dewpoint: f64,

    pub humidity: f64,
    pub humidity_max: f64,
    pub humidity_min: f64,
    pub indoor_humidity: f64,

    pub station_pressure: f64,
    pub sealevel_pressure: f64,
    pub pressure_trend: PressureTrend,

    pub solar_radiation: Option<f64>,
    pub uv_index: Option<f64>,
    pub evapotranspiration: Option<f64>,

    pub wind_speed: f64,
    pub wind_gust: f64,
    /// kph in metric, mph in US
    pub wind_speed_alt: f64,
    pub wind_gust_alt: f64,
    pub wind_direction: f64,
    pub wind_cardinal: Option<u8>,

    pub rain_rate: f64,
    pub rain_daily: f64,
    pub rain_24h: f64,
    pub rain_yesterday: f64,
    pub rain_monthly: f64,
    pub rain_yearly: f64,

    pub station: String,
    pub console_battery: i64,
    pub iss_battery: i64,
    pub clock_time: i64,
    pub epoch: i64,
    pub last_good_data: i64,

    pub lightning: Option<Lightning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_system_parse() {
        assert_eq!("Metric".parse::<UnitSystem>(), Ok(UnitSystem::Metric));
        assert_eq!(" US ".parse::<UnitSystem>(), Ok(UnitSystem::Us));
        assert!("imperial".parse::<UnitSystem>().is_err());
    }

    #[test]
    fn test_pressure_trend_shift() {
        assert_eq!(PressureTrend::from_reported(-1.0).code(), 0);
        assert_eq!(PressureTrend::from_reported(0.0).code(), 1);
        assert_eq!(PressureTrend::from_reported(1.0).code(), 2);
        assert_eq!(PressureTrend::from_reported(-2.0), PressureTrend::Falling);
    }
}
