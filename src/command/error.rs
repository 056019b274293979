use crate::simulation::error::SimulationError;
use crate::types::{Callsign, CallsignError};

#[derive(Debug, PartialEq)]
pub enum CommandError {
    MalformedCommand(String),
    InvalidCallsign(CallsignError),
    InvalidNumber { operator: String, value: String },
    InvalidValue(SimulationError),
    FlightNotFound(Callsign),
    UnknownOperator(String),
    Unimplemented(String),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::MalformedCommand(line) => write!(
                f,
                "Malformed command '{line}', expected <CALLSIGN> <OP> <VALUE>"
            ),
            CommandError::InvalidCallsign(e) => write!(f, "{e}"),
            CommandError::InvalidNumber { operator, value } => {
                write!(f, "Operator {operator} needs a number, got '{value}'")
            }
            CommandError::InvalidValue(e) => write!(f, "{e}"),
            CommandError::FlightNotFound(callsign) => {
                write!(f, "Flight {callsign} could not be found")
            }
            CommandError::UnknownOperator(operator) => write!(f, "Unknown operator '{operator}'"),
            CommandError::Unimplemented(operator) => write!(f, "{operator} is not implemented"),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::InvalidCallsign(error) => Some(error),
            CommandError::InvalidValue(error) => Some(error),
            _ => None,
        }
    }
}
