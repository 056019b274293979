use crate::types::Coordinate;

#[derive(Debug, PartialEq, Clone, serde::Deserialize)]
pub struct Airport {
    pub code: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

impl Airport {
    #[must_use]
    pub fn new(code: &str, latitude: f64, longitude: f64) -> Self {
        Airport {
            code: code.to_string(),
            coordinate: Coordinate::new(latitude, longitude),
        }
    }
}

/// Built-in airport table used when the config does not provide one.
#[must_use]
pub fn default_airports() -> Vec<Airport> {
    vec![
        Airport::new("PHL", 39.871_898_651_123_05, -75.241_096_496_582_03),
        Airport::new("DEN", 39.861_698_150_635, -104.672_996_521),
        Airport::new("MIA", 25.793_199_539_184_57, -80.290_603_637_695_31),
        Airport::new("MSP", 44.882_0, -93.221_802),
        Airport::new("JFK", 40.639_801_03, -73.778_900_15),
    ]
}

/// Looks up the airport sitting exactly on `coordinate`.
#[must_use]
pub fn airport_at<'a>(airports: &'a [Airport], coordinate: &Coordinate) -> Option<&'a Airport> {
    airports
        .iter()
        .find(|airport| airport.coordinate == *coordinate)
}

#[cfg(test)]
mod tests {
    use super::{airport_at, default_airports};

    #[test]
    fn when_using_default_table_then_five_distinct_airports_exist() {
        let airports = default_airports();
        assert_eq!(airports.len(), 5);
        for (i, a) in airports.iter().enumerate() {
            for b in airports.iter().skip(i + 1) {
                assert_ne!(a.coordinate, b.coordinate);
            }
        }
    }

    #[test]
    fn when_looking_up_by_coordinate_then_matching_airport_is_found() {
        let airports = default_airports();
        let jfk = airports[4].coordinate;
        assert_eq!(airport_at(&airports, &jfk).map(|a| a.code.as_str()), Some("JFK"));
    }
}
