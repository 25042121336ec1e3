/// One fetch → decode → derive → convert → publish cycle
use log::{debug, info};

use crate::bridge::decoder::decode_observation;
use crate::bridge::template::TemplateCatalog;
use crate::derived;
use crate::error::{BridgeError, Result};
use crate::hub::drivers::{driver_updates, NodeKind, STATUS_DRIVER, STATUS_UOM};
use crate::hub::sink::DriverSink;
use crate::models::{BridgeResponse, ConvertedObservation, Observation, UnitSystem};
use crate::units;
use crate::utils::format_epoch;
use crate::wind::{self, LastKnownWindDirection};

/// Poll cycle state: catalog and units are fixed, the last wind direction
/// is carried from one cycle to the next.
#[derive(Debug)]
pub struct PollCycle {
    catalog: TemplateCatalog,
    units: UnitSystem,
    last_wind: LastKnownWindDirection,
}

impl PollCycle {
    pub fn new(catalog: TemplateCatalog, units: UnitSystem) -> Self {
        PollCycle {
            catalog,
            units,
            last_wind: LastKnownWindDirection::default(),
        }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn last_wind(&self) -> LastKnownWindDirection {
        self.last_wind
    }

    /// Decode a response body and express it in the configured units
    pub fn process(&mut self, body: &str) -> Result<ConvertedObservation> {
        let obs = decode_observation(body, &self.catalog)?;
        debug!(
            "Station {} #{}, last good data {}s ago",
            obs.station, obs.station_number, obs.last_good_data
        );

        let evapotranspiration = derived::evapotranspiration(&obs);
        let wind_cardinal = wind::resolve(obs.wind_cardinal_label.as_deref(), &mut self.last_wind);

        debug!(
            "Wind: {} m/s, gust: {} m/s, dir: {}°, cardinal: {:?} -> {:?}",
            obs.wind_speed, obs.wind_gust, obs.wind_direction, obs.wind_cardinal_label, wind_cardinal
        );

        let obs = Observation {
            evapotranspiration,
            wind_cardinal,
            ..obs
        };

        Ok(units::convert(&obs, self.units))
    }

    /// Finish a cycle with whatever the transport produced
    ///
    /// On success every driver is published and the controller status goes
    /// to 1. On any failure only the status goes to 0; all other drivers
    /// keep the values from the last good cycle.
    pub fn complete<S: DriverSink>(
        &mut self,
        fetched: Result<BridgeResponse>,
        sink: &mut S,
    ) -> Result<ConvertedObservation> {
        let outcome = fetched.and_then(|response| {
            if response.status != 200 {
                return Err(BridgeError::HttpStatus(response.status));
            }
            self.process(&response.body)
        });

        match &outcome {
            Ok(converted) => {
                publish(converted, sink);
                sink.publish(NodeKind::Controller, STATUS_DRIVER, 1.0, STATUS_UOM);
                info!(
                    "Updated data from Meteobridge ({}, observed {})",
                    converted.station,
                    format_epoch(converted.epoch).unwrap_or_else(|| "at unknown time".into())
                );
            }
            Err(_) => {
                sink.publish(NodeKind::Controller, STATUS_DRIVER, 0.0, STATUS_UOM);
            }
        }

        outcome
    }
}

/// Push every driver value of a converted observation to the sink
pub fn publish<S: DriverSink>(obs: &ConvertedObservation, sink: &mut S) {
    for update in driver_updates(obs) {
        sink.publish(update.node, update.driver, update.value, update.uom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::decoder::tests::FIXTURE;
    use crate::bridge::template::CatalogVersion;
    use crate::hub::sink::NodeSink;

    fn cycle(units: UnitSystem) -> PollCycle {
        PollCycle::new(TemplateCatalog::new(CatalogVersion::WithLightning), units)
    }

    fn ok(body: &str) -> Result<BridgeResponse> {
        Ok(BridgeResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    #[test]
    fn test_end_to_end_us_values() {
        let mut cycle = cycle(UnitSystem::Us);
        let mut sink = NodeSink::new();

        cycle.complete(ok(FIXTURE), &mut sink).unwrap();

        assert_eq!(sink.value(NodeKind::Temperature, "ST"), Some(70.5));
        assert_eq!(sink.uom(NodeKind::Temperature, "ST"), Some(17));
        assert_eq!(sink.value(NodeKind::Pressure, "ST"), Some(29.6));
        assert_eq!(sink.value(NodeKind::Pressure, "GV0"), Some(30.0));
        assert_eq!(sink.value(NodeKind::Pressure, "GV1"), Some(0.0));
        assert_eq!(sink.value(NodeKind::Precipitation, "ST"), Some(0.02));
        assert_eq!(sink.value(NodeKind::Precipitation, "GV1"), Some(0.13));
        assert_eq!(sink.value(NodeKind::Precipitation, "GV4"), Some(12.22));
        assert_eq!(sink.value(NodeKind::Wind, "ST"), Some(5.59));
        assert_eq!(sink.value(NodeKind::Wind, "GV2"), Some(11.0));
        assert_eq!(sink.value(NodeKind::Light, "GV2"), Some(0.409));
        assert_eq!(sink.value(NodeKind::Lightning, "GV0"), Some(4.7));
        assert_eq!(sink.value(NodeKind::Controller, "ST"), Some(1.0));
        assert_eq!(sink.value(NodeKind::Controller, "GV1"), Some(1.0));
        assert_eq!(sink.value(NodeKind::Controller, "GV3"), Some(12.0));
    }

    #[test]
    fn test_metric_values_pass_through() {
        let mut cycle = cycle(UnitSystem::Metric);
        let converted = cycle.process(FIXTURE).unwrap();

        assert_eq!(converted.temperature, 21.4);
        assert_eq!(converted.station_pressure, 1002.3);
        assert_eq!(converted.rain_yearly, 310.5);
        assert_eq!(converted.wind_speed_alt, 9.0);
        assert_eq!(converted.evapotranspiration, Some(10.4));
    }

    #[test]
    fn test_same_reading_twice_is_identical() {
        let mut cycle = cycle(UnitSystem::Us);
        let first = cycle.process(FIXTURE).unwrap();
        let second = cycle.process(FIXTURE).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_failed_cycle_keeps_previous_values() {
        let mut cycle = cycle(UnitSystem::Metric);
        let mut sink = NodeSink::new();
        cycle.complete(ok(FIXTURE), &mut sink).unwrap();

        let err = cycle
            .complete(Err(BridgeError::HttpStatus(500)), &mut sink)
            .unwrap_err();
        assert!(matches!(err, BridgeError::HttpStatus(500)));

        let garbled = FIXTURE.replacen("21.4", "ERR", 1);
        assert!(cycle.complete(ok(&garbled), &mut sink).is_err());

        assert_eq!(sink.value(NodeKind::Controller, "ST"), Some(0.0));
        assert_eq!(sink.value(NodeKind::Temperature, "ST"), Some(21.4));
        assert_eq!(sink.value(NodeKind::Precipitation, "GV4"), Some(310.5));
    }

    #[test]
    fn test_non_200_response_is_rejected() {
        let mut cycle = cycle(UnitSystem::Metric);
        let mut sink = NodeSink::new();
        let fetched = Ok(BridgeResponse {
            status: 401,
            body: FIXTURE.to_string(),
        });
        assert!(matches!(
            cycle.complete(fetched, &mut sink),
            Err(BridgeError::HttpStatus(401))
        ));
        assert_eq!(sink.value(NodeKind::Temperature, "ST"), None);
    }

    #[test]
    fn test_wind_direction_carried_between_cycles() {
        let mut cycle = cycle(UnitSystem::Metric);
        cycle.process(FIXTURE).unwrap();

        let blank = FIXTURE.replace(" WSW ", "  ");
        let converted = cycle.process(&blank).unwrap();

        assert_eq!(converted.wind_cardinal, Some(11));
        assert_eq!(cycle.last_wind().get(), Some(11));
    }
}
