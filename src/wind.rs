/// Cardinal wind direction resolution with last-known-good fallback
use log::info;

/// 16-point compass, clockwise from north
const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Compass index for a label such as "NNE" (N = 0 .. NNW = 15)
pub fn cardinal_index(label: &str) -> Option<u8> {
    let label = label.trim();
    COMPASS_POINTS
        .iter()
        .position(|point| point.eq_ignore_ascii_case(label))
        .map(|index| index as u8)
}

/// The last cardinal index that resolved successfully
///
/// The only state carried from one poll cycle to the next. It is owned by
/// the poll cycle and handed to [`resolve`] by reference once per cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LastKnownWindDirection(Option<u8>);

impl LastKnownWindDirection {
    pub fn get(&self) -> Option<u8> {
        self.0
    }
}

/// Resolve this cycle's cardinal direction
///
/// The bridge sometimes returns an empty or unresolved label; in that case
/// the last good index is reused and left unchanged. Returns None only when
/// no label has resolved since startup.
pub fn resolve(label: Option<&str>, last_known: &mut LastKnownWindDirection) -> Option<u8> {
    match label.and_then(cardinal_index) {
        Some(index) => {
            last_known.0 = Some(index);
            Some(index)
        }
        None => {
            info!(
                "Cardinal wind direction substituted for last good reading: {:?} ({:?})",
                last_known.0,
                label.unwrap_or_default()
            );
            last_known.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_index() {
        assert_eq!(cardinal_index("N"), Some(0));
        assert_eq!(cardinal_index("NE"), Some(2));
        assert_eq!(cardinal_index("wsw"), Some(11));
        assert_eq!(cardinal_index("NNW"), Some(15));
        assert_eq!(cardinal_index(""), None);
        assert_eq!(cardinal_index("NORTH"), None);
    }

    #[test]
    fn test_fallback_sequence() {
        let mut last_known = LastKnownWindDirection::default();
        resolve(Some("N"), &mut last_known);
        let resolved: Vec<Option<u8>> = ["N", "", "NE"]
            .iter()
            .map(|label| resolve(Some(*label), &mut last_known))
            .collect();

        assert_eq!(resolved, vec![Some(0), Some(0), Some(2)]);
        assert_eq!(last_known.get(), Some(2));
    }

    #[test]
    fn test_unrecognized_or_missing_label_keeps_last_known() {
        let mut last_known = LastKnownWindDirection::default();
        resolve(Some("SSE"), &mut last_known);
        assert_eq!(resolve(Some("XYZ"), &mut last_known), Some(7));
        assert_eq!(resolve(None, &mut last_known), Some(7));
        assert_eq!(last_known.get(), Some(7));
    }

    #[test]
    fn test_unknown_until_first_resolution() {
        let mut last_known = LastKnownWindDirection::default();
        assert_eq!(resolve(None, &mut last_known), None);
        assert_eq!(resolve(Some("S"), &mut last_known), Some(8));
    }
}
