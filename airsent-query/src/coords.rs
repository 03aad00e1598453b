//! Lenient parsing of `"lat,long"` coordinate strings

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Parse a coordinate pair such as `(40.5, -73.9)`, `[40.5, -73.9]` or `40.5,-73.9`.
///
/// One matching pair of enclosing brackets is stripped. Values must be finite
/// and within geographic range; anything else yields `None`.
pub fn parse_coordinates(raw: &str) -> Option<Coordinates> {
    let inner = strip_brackets(raw.trim());

    let mut parts = inner.split(',');
    let latitude = parts.next()?.trim().parse::<f64>().ok()?;
    let longitude = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }

    if !latitude.is_finite() || !longitude.is_finite() {
        return None;
    }
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }

    Some(Coordinates { latitude, longitude })
}

fn strip_brackets(value: &str) -> &str {
    for (open, close) in [('(', ')'), ('[', ']'), ('{', '}')] {
        if let Some(inner) = value.strip_prefix(open).and_then(|v| v.strip_suffix(close)) {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parenthesised_pair() {
        let coords = parse_coordinates("(40.5, -73.9)").unwrap();
        assert_eq!(coords.latitude, 40.5);
        assert_eq!(coords.longitude, -73.9);
    }

    #[test]
    fn test_dataset_format() {
        let coords = parse_coordinates("[40.64656067, -73.78334045]").unwrap();
        assert_eq!(coords.latitude, 40.64656067);
        assert_eq!(coords.longitude, -73.78334045);
    }

    #[test]
    fn test_bare_pair() {
        assert!(parse_coordinates(" 1.0,2.0 ").is_some());
    }

    #[test]
    fn test_malformed_values() {
        assert!(parse_coordinates("").is_none());
        assert!(parse_coordinates("[]").is_none());
        assert!(parse_coordinates("(40.5)").is_none());
        assert!(parse_coordinates("(40.5, -73.9, 1.0)").is_none());
        assert!(parse_coordinates("(north, west)").is_none());
        assert!(parse_coordinates("(NaN, 1.0)").is_none());
        assert!(parse_coordinates("(inf, 1.0)").is_none());
        assert!(parse_coordinates("(91.0, 0.0)").is_none());
        assert!(parse_coordinates("(0.0, 181.0)").is_none());
        assert!(parse_coordinates("(40.5, -73.9]").is_none());
    }

    proptest! {
        #[test]
        fn prop_parsed_values_are_finite(raw in ".{0,40}") {
            if let Some(coords) = parse_coordinates(&raw) {
                prop_assert!(coords.latitude.is_finite());
                prop_assert!(coords.longitude.is_finite());
            }
        }

        #[test]
        fn prop_formatted_pairs_parse(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            let raw = format!("[{}, {}]", lat, lon);
            let coords = parse_coordinates(&raw).unwrap();
            prop_assert_eq!(coords.latitude, lat);
            prop_assert_eq!(coords.longitude, lon);
        }
    }
}
