pub mod error;

use crate::command::error::CommandError;
use crate::flight::Flight;
use crate::simulation::FlightSimulation;
use crate::types::{Action, Callsign};

/// One tokenised `<CALLSIGN> <OP> <VALUE>` line. The operator and its
/// arguments are only interpreted once the flight has been found.
#[derive(Debug, PartialEq, Clone)]
pub struct Command {
    pub callsign: Callsign,
    /// Uppercased.
    pub operator: String,
    pub arguments: Vec<String>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Instruction {
    /// `H <degrees>`
    Heading(f64),
    /// `A <feet>`
    Altitude(f64),
    /// `FLYTO <coords>`, accepted by the parser but never applied.
    FlyTo(String),
}

impl std::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let [callsign, operator, arguments @ ..] = tokens.as_slice() else {
            return Err(CommandError::MalformedCommand(s.trim().to_string()));
        };
        if arguments.is_empty() {
            return Err(CommandError::MalformedCommand(s.trim().to_string()));
        }

        Ok(Command {
            callsign: Callsign::new(callsign).map_err(CommandError::InvalidCallsign)?,
            operator: operator.to_ascii_uppercase(),
            arguments: arguments.iter().map(|token| (*token).to_string()).collect(),
        })
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.callsign,
            self.operator,
            self.arguments.join(" ")
        )
    }
}

impl Command {
    /// Decodes the operator and its arguments.
    pub fn instruction(&self) -> Result<Instruction, CommandError> {
        let value = match self.operator.as_str() {
            "FLYTO" => return Ok(Instruction::FlyTo(self.arguments.join(" "))),
            _ => match self.arguments.as_slice() {
                [value] => value,
                _ => return Err(CommandError::MalformedCommand(self.to_string())),
            },
        };
        match self.operator.as_str() {
            "H" => Ok(Instruction::Heading(parse_number(&self.operator, value)?)),
            "A" => Ok(Instruction::Altitude(parse_number(&self.operator, value)?)),
            _ => Err(CommandError::UnknownOperator(self.operator.clone())),
        }
    }

    /// Looks the flight up, then decodes and applies the instruction.
    /// Nothing changes when an error is returned.
    pub fn apply(&self, simulation: &mut FlightSimulation) -> Result<(), CommandError> {
        let flight = simulation
            .flight_mut(&self.callsign)
            .ok_or_else(|| CommandError::FlightNotFound(self.callsign.clone()))?;
        let instruction = self.instruction()?;
        apply_instruction(flight, &instruction)?;
        log::info!("{} accepted {instruction:?}", self.callsign);
        Ok(())
    }
}

fn apply_instruction(flight: &mut Flight, instruction: &Instruction) -> Result<(), CommandError> {
    match instruction {
        Instruction::Heading(degrees) => {
            flight
                .set_bearing(*degrees)
                .map_err(CommandError::InvalidValue)?;
            flight.set_action(Action::Heading);
        }
        Instruction::Altitude(feet) => {
            flight
                .set_altitude(*feet)
                .map_err(CommandError::InvalidValue)?;
        }
        Instruction::FlyTo(_) => {
            return Err(CommandError::Unimplemented(String::from("FLYTO")));
        }
    }
    Ok(())
}

/// Parses and applies one command line.
pub fn execute(simulation: &mut FlightSimulation, line: &str) -> Result<(), CommandError> {
    let command: Command = line.parse()?;
    command.apply(simulation)
}

fn parse_number(operator: &str, value: &str) -> Result<f64, CommandError> {
    value
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidNumber {
            operator: operator.to_string(),
            value: value.to_string(),
        })
}
