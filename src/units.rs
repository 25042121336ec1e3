/// Unit conversion from Meteobridge's metric readings to the configured system
use crate::models::{ConvertedObservation, Lightning, Observation, UnitSystem};
use crate::utils::round_to;

const INHG_PER_MB: f64 = 0.02952998751;
const MPH_PER_MPS: f64 = 2.23694;
const KPH_PER_MPS: f64 = 3.6;
const IN_PER_MM: f64 = 0.03937;
const MM_PER_IN: f64 = 25.4;
const KM_PER_MI: f64 = 1.6;

/// Conversion rule for one kind of quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionFamily {
    /// °C → °F
    Temperature,
    /// mb → inHg
    Pressure,
    /// m/s → mph
    WindSpeed,
    /// m/s → kph in metric, mph in US
    WindSpeedAlternate,
    /// mm → in
    Precipitation,
    /// mm → in, finer resolution
    Evapotranspiration,
    /// km → mi
    Distance,
    /// Same value in both systems, rounded
    Passthrough { decimals: u32 },
}

impl ConversionFamily {
    pub fn convert(self, value: f64, units: UnitSystem) -> f64 {
        use ConversionFamily::*;

        match (self, units) {
            (Temperature, UnitSystem::Us) => round_to(value * 1.8 + 32.0, 1),
            (Temperature, UnitSystem::Metric) => round_to(value, 1),
            (Pressure, UnitSystem::Us) => round_to(value * INHG_PER_MB, 2),
            (Pressure, UnitSystem::Metric) => round_to(value, 1),
            (WindSpeed, UnitSystem::Us) => round_to(value * MPH_PER_MPS, 2),
            (WindSpeed, UnitSystem::Metric) => round_to(value, 2),
            (WindSpeedAlternate, UnitSystem::Us) => round_to(value * MPH_PER_MPS, 1),
            (WindSpeedAlternate, UnitSystem::Metric) => round_to(value * KPH_PER_MPS, 1),
            (Precipitation, UnitSystem::Us) => round_to(value * IN_PER_MM, 2),
            (Precipitation, UnitSystem::Metric) => round_to(value, 1),
            (Evapotranspiration, UnitSystem::Us) => round_to(value / MM_PER_IN, 3),
            (Evapotranspiration, UnitSystem::Metric) => round_to(value, 1),
            (Distance, UnitSystem::Us) => round_to(value / KM_PER_MI, 1),
            (Distance, UnitSystem::Metric) => round_to(value, 1),
            (Passthrough { decimals }, _) => round_to(value, decimals),
        }
    }
}

const HUMIDITY: ConversionFamily = ConversionFamily::Passthrough { decimals: 1 };
const DEGREES: ConversionFamily = ConversionFamily::Passthrough { decimals: 0 };
const LIGHT: ConversionFamily = ConversionFamily::Passthrough { decimals: 1 };
const COUNT: ConversionFamily = ConversionFamily::Passthrough { decimals: 0 };

/// Express a metric observation in `units`. The input is left untouched.
///
/// Conversions are lossy: values are rounded per family, so converting a
/// US result back to metric won't reproduce the original reading exactly.
pub fn convert(obs: &Observation, units: UnitSystem) -> ConvertedObservation {
    use ConversionFamily::*;

    let c = |family: ConversionFamily, value: f64| family.convert(value, units);

    ConvertedObservation {
        units,

        temperature: c(Temperature, obs.temperature),
        dewpoint: c(Temperature, obs.dewpoint),
        windchill: c(Temperature, obs.windchill),
        temperature_max: c(Temperature, obs.temperature_max),
        temperature_min: c(Temperature, obs.temperature_min),
        indoor_temperature: c(Temperature, obs.indoor_temperature),
        indoor_dewpoint: c(Temperature, obs.indoor_dewpoint),

        humidity: c(HUMIDITY, obs.humidity),
        humidity_max: c(HUMIDITY, obs.humidity_max),
        humidity_min: c(HUMIDITY, obs.humidity_min),
        indoor_humidity: c(HUMIDITY, obs.indoor_humidity),

        station_pressure: c(Pressure, obs.station_pressure),
        sealevel_pressure: c(Pressure, obs.sealevel_pressure),
        pressure_trend: obs.pressure_trend,

        solar_radiation: obs.solar_radiation.map(|v| c(LIGHT, v)),
        uv_index: obs.uv_index.map(|v| c(LIGHT, v)),
        evapotranspiration: obs.evapotranspiration.map(|v| c(Evapotranspiration, v)),

        wind_speed: c(WindSpeed, obs.wind_speed),
        wind_gust: c(WindSpeed, obs.wind_gust),
        wind_speed_alt: c(WindSpeedAlternate, obs.wind_speed),
        wind_gust_alt: c(WindSpeedAlternate, obs.wind_gust),
        wind_direction: c(DEGREES, obs.wind_direction),
        wind_cardinal: obs.wind_cardinal,

        rain_rate: c(Precipitation, obs.rain_rate),
        rain_daily: c(Precipitation, obs.rain_daily),
        rain_24h: c(Precipitation, obs.rain_24h),
        rain_yesterday: c(Precipitation, obs.rain_yesterday),
        rain_monthly: c(Precipitation, obs.rain_monthly),
        rain_yearly: c(Precipitation, obs.rain_yearly),

        station: obs.station.clone(),
        console_battery: obs.console_battery,
        iss_battery: obs.iss_battery,
        clock_time: obs.clock_time,
        epoch: obs.epoch,
        last_good_data: obs.last_good_data,

        lightning: obs.lightning.map(|l| Lightning {
            strikes: c(COUNT, l.strikes),
            distance: c(Distance, l.distance),
        }),
    }
}
