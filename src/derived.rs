/// Values computed from an observation rather than read from the station
use log::{debug, info};

use crate::models::Observation;

// FAO-56 style constants
const ALBEDO: f64 = 0.23;
const SOIL_HEAT_FLUX: f64 = 0.0;
const PSYCHROMETRIC_CONSTANT: f64 = 0.665e-3;
/// W/m² held for a day, expressed in MJ/m²/day
const WM2_TO_MJ_PER_DAY: f64 = 0.0864;

/// Reference evapotranspiration estimate in mm/day
///
/// Daily Penman-Monteith approximation fed with a single averaged sample:
/// mean of today's max/min temperature (°C) and humidity (%), average wind
/// (m/s) and current solar radiation (W/m²). It turns an instantaneous
/// reading into a daily-equivalent figure, so treat the result as an
/// estimate, not an instrument value.
pub fn estimate_et0(air_temp: f64, rel_humidity: f64, wind_speed: f64, solar_wm2: f64) -> f64 {
    let radiation = solar_wm2 * WM2_TO_MJ_PER_DAY;

    // Saturation and actual vapour pressure (kPa)
    let es = 0.6108 * 10f64.powf((7.5 * air_temp) / (237.3 + air_temp));
    let ea = es * (rel_humidity / 100.0);

    // Slope of the vapour pressure curve
    let delta = (4098.0 * es) / (air_temp + 237.3).powi(2);

    let net_radiation = (1.0 - ALBEDO) * radiation - 0.34 * (1.35 * radiation / 2.3 - 1.0);

    (0.408 * delta * (net_radiation - SOIL_HEAT_FLUX)
        + PSYCHROMETRIC_CONSTANT * (900.0 / (air_temp + 273.0)) * wind_speed * (es - ea))
        / (delta + PSYCHROMETRIC_CONSTANT * (1.0 + 0.34 * wind_speed))
}

/// Evapotranspiration to publish for this observation, in mm/day
///
/// Needs solar radiation. Stations that report ET0 themselves keep their
/// value; for everyone else it is estimated.
pub fn evapotranspiration(obs: &Observation) -> Option<f64> {
    let solar = match obs.solar_radiation {
        Some(solar) => solar,
        None => {
            info!("Evapotranspiration not available (no solar radiation sensor)");
            return None;
        }
    };

    if obs.native_et0_capable {
        return obs.evapotranspiration;
    }

    let air_temp = (obs.temperature_max + obs.temperature_min) / 2.0;
    let rel_humidity = (obs.humidity_max + obs.humidity_min) / 2.0;
    let et0 = estimate_et0(air_temp, rel_humidity, obs.wind_speed, solar);

    debug!(
        "ET0 estimated: {:.3} mm/day (T={:.1}°C, RH={:.0}%, wind={:.1} m/s, solar={:.0} W/m²)",
        et0, air_temp, rel_humidity, obs.wind_speed, solar
    );

    if et0.is_finite() {
        Some(et0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_golden_value() {
        let et0 = estimate_et0(20.0, 50.0, 2.0, 500.0);
        assert!(et0.is_finite() && et0 > 0.0);
        assert!((et0 - 10.147644638038742).abs() < 1e-9, "got {}", et0);
    }

    #[test]
    fn test_estimate_rises_with_radiation() {
        let low = estimate_et0(20.0, 50.0, 2.0, 100.0);
        let high = estimate_et0(20.0, 50.0, 2.0, 800.0);
        assert!(high > low);
    }

    fn observation() -> Observation {
        Observation {
            temperature_max: 24.0,
            temperature_min: 16.0,
            humidity_max: 70.0,
            humidity_min: 30.0,
            wind_speed: 2.0,
            solar_radiation: Some(500.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_uses_daily_means() {
        let et0 = evapotranspiration(&observation()).unwrap();
        assert_eq!(et0, estimate_et0(20.0, 50.0, 2.0, 500.0));
    }

    #[test]
    fn test_no_solar_means_no_et0() {
        let obs = Observation {
            solar_radiation: None,
            native_et0_capable: true,
            evapotranspiration: Some(3.1),
            ..observation()
        };
        assert_eq!(evapotranspiration(&obs), None);
    }

    #[test]
    fn test_native_value_used_unchanged() {
        let obs = Observation {
            native_et0_capable: true,
            evapotranspiration: Some(3.1),
            ..observation()
        };
        assert_eq!(evapotranspiration(&obs), Some(3.1));
    }
}
