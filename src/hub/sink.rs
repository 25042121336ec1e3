/// Delivery of driver values to the hub's virtual nodes
use log::debug;
use std::collections::BTreeMap;

use crate::hub::drivers::NodeKind;

/// Receiver for driver values
pub trait DriverSink {
    fn publish(&mut self, node: NodeKind, driver: &'static str, value: f64, uom: u16);
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DriverState {
    value: f64,
    uom: u16,
}

/// Node-side driver store
///
/// Keeps the last value of every driver and only reports changes, the way
/// hub nodes do. Values stay in place when a cycle publishes nothing.
#[derive(Debug, Default)]
pub struct NodeSink {
    drivers: BTreeMap<(NodeKind, &'static str), DriverState>,
    reports: usize,
}

impl NodeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, node: NodeKind, driver: &str) -> Option<f64> {
        self.drivers
            .iter()
            .find(|((n, d), _)| *n == node && *d == driver)
            .map(|(_, state)| state.value)
    }

    pub fn uom(&self, node: NodeKind, driver: &str) -> Option<u16> {
        self.drivers
            .iter()
            .find(|((n, d), _)| *n == node && *d == driver)
            .map(|(_, state)| state.uom)
    }

    /// Number of driver changes reported so far
    pub fn reports(&self) -> usize {
        self.reports
    }
}

impl DriverSink for NodeSink {
    fn publish(&mut self, node: NodeKind, driver: &'static str, value: f64, uom: u16) {
        let state = DriverState { value, uom };
        if self.drivers.get(&(node, driver)) == Some(&state) {
            return;
        }

        debug!("{}.{} = {} (uom {})", node, driver, value, uom);
        self.drivers.insert((node, driver), state);
        self.reports += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_changes_are_reported() {
        let mut sink = NodeSink::new();
        sink.publish(NodeKind::Temperature, "ST", 21.4, 4);
        sink.publish(NodeKind::Temperature, "ST", 21.4, 4);
        assert_eq!(sink.reports(), 1);

        sink.publish(NodeKind::Temperature, "ST", 21.5, 4);
        assert_eq!(sink.reports(), 2);
        assert_eq!(sink.value(NodeKind::Temperature, "ST"), Some(21.5));
        assert_eq!(sink.uom(NodeKind::Temperature, "ST"), Some(4));
    }

    #[test]
    fn test_drivers_are_per_node() {
        let mut sink = NodeSink::new();
        sink.publish(NodeKind::Wind, "ST", 2.5, 40);
        sink.publish(NodeKind::Humidity, "ST", 56.0, 51);

        assert_eq!(sink.value(NodeKind::Wind, "ST"), Some(2.5));
        assert_eq!(sink.value(NodeKind::Humidity, "ST"), Some(56.0));
        assert_eq!(sink.value(NodeKind::Pressure, "ST"), None);
    }
}
