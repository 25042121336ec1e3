/// Static mapping from observation fields to hub node drivers
use std::fmt;

use crate::models::{ConvertedObservation, UnitSystem};

// Hub unit-of-measure codes
const UOM_BOOLEAN: u16 = 2;
const UOM_TEMP_C: u16 = 4;
const UOM_DEGREE: u16 = 14;
const UOM_TEMP_F: u16 = 17;
const UOM_INHG: u16 = 23;
const UOM_INHR: u16 = 24;
const UOM_INDEX: u16 = 25;
const UOM_KPH: u16 = 32;
const UOM_MPS: u16 = 40;
const UOM_MMHR: u16 = 46;
const UOM_MPH: u16 = 48;
const UOM_HUMIDITY: u16 = 51;
const UOM_COUNT: u16 = 56;
const UOM_SECONDS: u16 = 58;
const UOM_UV: u16 = 71;
const UOM_RADIATION: u16 = 74;
const UOM_MM: u16 = 82;
const UOM_KM: u16 = 83;
const UOM_INCHES: u16 = 105;
const UOM_MILE: u16 = 116;
const UOM_MB: u16 = 117;

/// Virtual devices the bridge exposes on the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Controller,
    Temperature,
    Humidity,
    Pressure,
    Wind,
    Precipitation,
    Light,
    Lightning,
}

impl NodeKind {
    pub fn address(&self) -> &'static str {
        match self {
            NodeKind::Controller => "controller",
            NodeKind::Temperature => "temps",
            NodeKind::Humidity => "humid",
            NodeKind::Pressure => "press",
            NodeKind::Wind => "winds",
            NodeKind::Precipitation => "precip",
            NodeKind::Light => "solar",
            NodeKind::Lightning => "lightning",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.address())
    }
}

/// Controller status driver: 1 when the last cycle published, 0 otherwise
pub const STATUS_DRIVER: &str = "ST";
pub const STATUS_UOM: u16 = UOM_BOOLEAN;

struct DriverSpec {
    node: NodeKind,
    driver: &'static str,
    metric_uom: u16,
    us_uom: u16,
    /// None means "don't publish this cycle"
    value: fn(&ConvertedObservation) -> Option<f64>,
}

impl DriverSpec {
    fn uom(&self, units: UnitSystem) -> u16 {
        match units {
            UnitSystem::Metric => self.metric_uom,
            UnitSystem::Us => self.us_uom,
        }
    }
}

const DRIVERS: &[DriverSpec] = &[
    // Temperatures
    DriverSpec { node: NodeKind::Temperature, driver: "ST", metric_uom: UOM_TEMP_C, us_uom: UOM_TEMP_F, value: |o| Some(o.temperature) },
    DriverSpec { node: NodeKind::Temperature, driver: "GV0", metric_uom: UOM_TEMP_C, us_uom: UOM_TEMP_F, value: |o| Some(o.dewpoint) },
    DriverSpec { node: NodeKind::Temperature, driver: "GV1", metric_uom: UOM_TEMP_C, us_uom: UOM_TEMP_F, value: |o| Some(o.windchill) },
    DriverSpec { node: NodeKind::Temperature, driver: "GV4", metric_uom: UOM_TEMP_C, us_uom: UOM_TEMP_F, value: |o| Some(o.indoor_temperature) },
    DriverSpec { node: NodeKind::Temperature, driver: "GV14", metric_uom: UOM_TEMP_C, us_uom: UOM_TEMP_F, value: |o| Some(o.indoor_dewpoint) },
    DriverSpec { node: NodeKind::Temperature, driver: "GV15", metric_uom: UOM_TEMP_C, us_uom: UOM_TEMP_F, value: |o| Some(o.temperature_max) },
    DriverSpec { node: NodeKind::Temperature, driver: "GV16", metric_uom: UOM_TEMP_C, us_uom: UOM_TEMP_F, value: |o| Some(o.temperature_min) },
    // Humidity
    DriverSpec { node: NodeKind::Humidity, driver: "ST", metric_uom: UOM_HUMIDITY, us_uom: UOM_HUMIDITY, value: |o| Some(o.humidity) },
    DriverSpec { node: NodeKind::Humidity, driver: "GV0", metric_uom: UOM_HUMIDITY, us_uom: UOM_HUMIDITY, value: |o| Some(o.indoor_humidity) },
    DriverSpec { node: NodeKind::Humidity, driver: "GV1", metric_uom: UOM_HUMIDITY, us_uom: UOM_HUMIDITY, value: |o| Some(o.humidity_max) },
    DriverSpec { node: NodeKind::Humidity, driver: "GV2", metric_uom: UOM_HUMIDITY, us_uom: UOM_HUMIDITY, value: |o| Some(o.humidity_min) },
    // Barometric pressure
    DriverSpec { node: NodeKind::Pressure, driver: "ST", metric_uom: UOM_MB, us_uom: UOM_INHG, value: |o| Some(o.station_pressure) },
    DriverSpec { node: NodeKind::Pressure, driver: "GV0", metric_uom: UOM_MB, us_uom: UOM_INHG, value: |o| Some(o.sealevel_pressure) },
    DriverSpec { node: NodeKind::Pressure, driver: "GV1", metric_uom: UOM_INDEX, us_uom: UOM_INDEX, value: |o| Some(o.pressure_trend.code() as f64) },
    // Wind
    DriverSpec { node: NodeKind::Wind, driver: "ST", metric_uom: UOM_MPS, us_uom: UOM_MPH, value: |o| Some(o.wind_speed) },
    DriverSpec { node: NodeKind::Wind, driver: "GV0", metric_uom: UOM_MPS, us_uom: UOM_MPH, value: |o| Some(o.wind_gust) },
    DriverSpec { node: NodeKind::Wind, driver: "GV1", metric_uom: UOM_DEGREE, us_uom: UOM_DEGREE, value: |o| Some(o.wind_direction) },
    DriverSpec { node: NodeKind::Wind, driver: "GV2", metric_uom: UOM_INDEX, us_uom: UOM_INDEX, value: |o| o.wind_cardinal.map(f64::from) },
    DriverSpec { node: NodeKind::Wind, driver: "GV3", metric_uom: UOM_KPH, us_uom: UOM_MPH, value: |o| Some(o.wind_speed_alt) },
    DriverSpec { node: NodeKind::Wind, driver: "GV4", metric_uom: UOM_KPH, us_uom: UOM_MPH, value: |o| Some(o.wind_gust_alt) },
    // Precipitation
    DriverSpec { node: NodeKind::Precipitation, driver: "ST", metric_uom: UOM_MMHR, us_uom: UOM_INHR, value: |o| Some(o.rain_rate) },
    DriverSpec { node: NodeKind::Precipitation, driver: "GV1", metric_uom: UOM_MM, us_uom: UOM_INCHES, value: |o| Some(o.rain_daily) },
    DriverSpec { node: NodeKind::Precipitation, driver: "GV2", metric_uom: UOM_MM, us_uom: UOM_INCHES, value: |o| Some(o.rain_24h) },
    DriverSpec { node: NodeKind::Precipitation, driver: "GV3", metric_uom: UOM_MM, us_uom: UOM_INCHES, value: |o| Some(o.rain_monthly) },
    DriverSpec { node: NodeKind::Precipitation, driver: "GV4", metric_uom: UOM_MM, us_uom: UOM_INCHES, value: |o| Some(o.rain_yearly) },
    DriverSpec { node: NodeKind::Precipitation, driver: "GV6", metric_uom: UOM_MM, us_uom: UOM_INCHES, value: |o| Some(o.rain_yesterday) },
    // Illumination; absent sensors read as 0
    DriverSpec { node: NodeKind::Light, driver: "ST", metric_uom: UOM_UV, us_uom: UOM_UV, value: |o| Some(o.uv_index.unwrap_or(0.0)) },
    DriverSpec { node: NodeKind::Light, driver: "GV0", metric_uom: UOM_RADIATION, us_uom: UOM_RADIATION, value: |o| Some(o.solar_radiation.unwrap_or(0.0)) },
    DriverSpec { node: NodeKind::Light, driver: "GV2", metric_uom: UOM_MM, us_uom: UOM_INCHES, value: |o| Some(o.evapotranspiration.unwrap_or(0.0)) },
    // Lightning, only with the lightning template
    DriverSpec { node: NodeKind::Lightning, driver: "ST", metric_uom: UOM_COUNT, us_uom: UOM_COUNT, value: |o| o.lightning.map(|l| l.strikes) },
    DriverSpec { node: NodeKind::Lightning, driver: "GV0", metric_uom: UOM_KM, us_uom: UOM_MILE, value: |o| o.lightning.map(|l| l.distance) },
    // Controller: station health
    DriverSpec { node: NodeKind::Controller, driver: "GV0", metric_uom: UOM_INDEX, us_uom: UOM_INDEX, value: |o| Some(o.console_battery as f64) },
    DriverSpec { node: NodeKind::Controller, driver: "GV1", metric_uom: UOM_INDEX, us_uom: UOM_INDEX, value: |o| Some(o.iss_battery as f64) },
    DriverSpec { node: NodeKind::Controller, driver: "GV2", metric_uom: UOM_COUNT, us_uom: UOM_COUNT, value: |o| Some(o.clock_time as f64) },
    DriverSpec { node: NodeKind::Controller, driver: "GV3", metric_uom: UOM_SECONDS, us_uom: UOM_SECONDS, value: |o| Some(o.last_good_data as f64) },
];

/// One value destined for a hub driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverUpdate {
    pub node: NodeKind,
    pub driver: &'static str,
    pub value: f64,
    pub uom: u16,
}

/// Driver updates for a converted observation, in table order
pub fn driver_updates(obs: &ConvertedObservation) -> Vec<DriverUpdate> {
    DRIVERS
        .iter()
        .filter_map(|spec| {
            (spec.value)(obs).map(|value| DriverUpdate {
                node: spec.node,
                driver: spec.driver,
                value,
                uom: spec.uom(obs.units),
            })
        })
        .collect()
}

/// Driver layout per node for the given units, for node creation
pub fn node_definitions(
    units: UnitSystem,
    with_lightning: bool,
) -> Vec<(NodeKind, &'static str, u16)> {
    let mut definitions = vec![(NodeKind::Controller, STATUS_DRIVER, STATUS_UOM)];
    definitions.extend(
        DRIVERS
            .iter()
            .filter(|spec| with_lightning || spec.node != NodeKind::Lightning)
            .map(|spec| (spec.node, spec.driver, spec.uom(units))),
    );
    definitions
}
