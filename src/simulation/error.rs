use crate::types::Callsign;

#[derive(Debug, PartialEq, Clone)]
pub enum SimulationError {
    DuplicateCallsign(Callsign),
    FlightNotFound(Callsign),
    NotEnoughAirports(usize),
    InvalidHeading(f64),
    InvalidAltitude(f64),
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::DuplicateCallsign(callsign) => {
                write!(f, "Flight {callsign} is already active")
            }
            SimulationError::FlightNotFound(callsign) => {
                write!(f, "Flight {callsign} could not be found")
            }
            SimulationError::NotEnoughAirports(count) => {
                write!(f, "Need at least two airports to spawn flights, have {count}")
            }
            SimulationError::InvalidHeading(value) => {
                write!(f, "Heading {value} is outside 0-360 degrees")
            }
            SimulationError::InvalidAltitude(value) => write!(
                f,
                "Altitude {value} is outside 0-{} feet",
                crate::flight::MAX_ALTITUDE
            ),
        }
    }
}

impl std::error::Error for SimulationError {}
