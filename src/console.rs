use crate::command::error::CommandError;
use crate::command::Command;
use crate::controller::{ControllerError, FlightController};
use crate::renderer::flight_table;
use crate::simulation::error::SimulationError;
use crate::types::{Action, Callsign};

pub const HELP: &str = "\
Commands:
  <CALLSIGN> H <degrees>    assign a heading (0-360)
  <CALLSIGN> A <feet>       assign an altitude (0-60000)
  <CALLSIGN> FLYTO <coords> reserved, not implemented
  select <CALLSIGN>         focus a flight
  deselect                  clear the focus
  land | hold | fly         change what the focused flight is doing
  spawn                     add a random flight
  pause | play              stop or resume the clock
  rate <ms>                 set the tick rate (16-1200 ms)
  list                      show active flights
  time                      show the simulation clock
  help                      show this text
  quit                      leave";

/// One line of operator input.
#[derive(Debug, PartialEq, Clone)]
pub enum ConsoleInput {
    Select(Callsign),
    Deselect,
    SetAction(Action),
    Spawn,
    Pause,
    Play,
    Rate(u64),
    List,
    Time,
    Help,
    Quit,
    Flight(Command),
}

impl std::str::FromStr for ConsoleInput {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let keyword = tokens
            .first()
            .map(|token| token.to_ascii_lowercase())
            .unwrap_or_default();

        let input = match (keyword.as_str(), tokens.as_slice()) {
            ("select", [_, callsign]) => ConsoleInput::Select(
                Callsign::new(callsign)
                    .map_err(|e| ConsoleError::Command(CommandError::InvalidCallsign(e)))?,
            ),
            ("deselect", [_]) => ConsoleInput::Deselect,
            ("land" | "hold" | "fly" | "takeoff", [action]) => ConsoleInput::SetAction(
                action
                    .parse()
                    .map_err(|_| {
                        ConsoleError::Command(CommandError::UnknownOperator(keyword.clone()))
                    })?,
            ),
            ("spawn", [_]) => ConsoleInput::Spawn,
            ("pause", [_]) => ConsoleInput::Pause,
            ("play" | "resume", [_]) => ConsoleInput::Play,
            ("rate", [_, rate]) => ConsoleInput::Rate(
                rate.parse()
                    .map_err(|_| ConsoleError::InvalidTickRate((*rate).to_string()))?,
            ),
            ("list", [_]) => ConsoleInput::List,
            ("time", [_]) => ConsoleInput::Time,
            ("help", [_]) => ConsoleInput::Help,
            ("quit" | "exit", [_]) => ConsoleInput::Quit,
            _ => ConsoleInput::Flight(s.parse().map_err(ConsoleError::Command)?),
        };
        Ok(input)
    }
}

#[derive(Debug, PartialEq)]
pub enum ConsoleOutcome {
    Continue(Option<String>),
    Quit,
}

/// Carries out one console input against the controller.
pub fn execute(
    controller: &mut FlightController,
    input: ConsoleInput,
) -> Result<ConsoleOutcome, ConsoleError> {
    let message = match input {
        ConsoleInput::Select(callsign) => {
            controller
                .with_simulation(|simulation| simulation.select_flight(&callsign))?
                .map_err(ConsoleError::Simulation)?;
            Some(format!("Selected {callsign}"))
        }
        ConsoleInput::Deselect => {
            controller.with_simulation(crate::simulation::FlightSimulation::deselect)?;
            None
        }
        ConsoleInput::SetAction(action) => {
            let callsign = controller.with_simulation(|simulation| {
                simulation.selected_flight_mut().map(|flight| {
                    flight.set_action(action);
                    flight.callsign().clone()
                })
            })?;
            let callsign = callsign.ok_or(ConsoleError::NoFlightSelected)?;
            log::info!("{callsign} told to {action}");
            Some(format!("{callsign} will {action}"))
        }
        ConsoleInput::Spawn => {
            let callsign = controller
                .with_simulation(crate::simulation::FlightSimulation::add_random_flight)?
                .map_err(ConsoleError::Simulation)?;
            Some(format!("Spawned {callsign}"))
        }
        ConsoleInput::Pause => {
            controller.pause()?;
            log::info!("Simulation paused");
            Some(String::from("Simulation paused"))
        }
        ConsoleInput::Play => {
            controller.play()?;
            log::info!("Simulation resumed");
            Some(String::from("Simulation resumed"))
        }
        ConsoleInput::Rate(rate_ms) => {
            let period = controller.set_tick_rate(rate_ms)?;
            Some(format!("Tick rate {} ms", period.as_millis()))
        }
        ConsoleInput::List => {
            Some(controller.with_simulation(|simulation| flight_table(simulation))?)
        }
        ConsoleInput::Time => {
            Some(controller.with_simulation(|simulation| simulation.simulation_time())?)
        }
        ConsoleInput::Help => Some(HELP.to_string()),
        ConsoleInput::Quit => return Ok(ConsoleOutcome::Quit),
        ConsoleInput::Flight(command) => {
            controller
                .with_simulation(|simulation| command.apply(simulation))?
                .map_err(ConsoleError::Command)?;
            None
        }
    };
    Ok(ConsoleOutcome::Continue(message))
}

/// Reads commands line by line until `quit` or end of input. Rejected
/// commands are reported and the loop carries on.
pub fn run_repl<R, W>(
    controller: &mut FlightController,
    reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    R: std::io::BufRead,
    W: std::io::Write,
{
    writeln!(writer, "{HELP}")?;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let outcome = line
            .parse::<ConsoleInput>()
            .and_then(|input| execute(controller, input));
        match outcome {
            Ok(ConsoleOutcome::Continue(Some(message))) => writeln!(writer, "{message}")?,
            Ok(ConsoleOutcome::Continue(None)) => {}
            Ok(ConsoleOutcome::Quit) => break,
            Err(err) => {
                log::warn!("Rejected '{}': {err}", line.trim());
                writeln!(writer, "Error: {err}")?;
            }
        }
    }
    Ok(())
}

#[derive(Debug)]
pub enum ConsoleError {
    Command(CommandError),
    Simulation(SimulationError),
    Controller(ControllerError),
    NoFlightSelected,
    InvalidTickRate(String),
}

impl From<ControllerError> for ConsoleError {
    fn from(error: ControllerError) -> Self {
        ConsoleError::Controller(error)
    }
}

impl std::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsoleError::Command(e) => write!(f, "{e}"),
            ConsoleError::Simulation(e) => write!(f, "{e}"),
            ConsoleError::Controller(e) => write!(f, "{e}"),
            ConsoleError::NoFlightSelected => write!(f, "No flight selected"),
            ConsoleError::InvalidTickRate(value) => {
                write!(f, "Tick rate must be a whole number of milliseconds, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConsoleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConsoleError::Command(error) => Some(error),
            ConsoleError::Simulation(error) => Some(error),
            ConsoleError::Controller(error) => Some(error),
            ConsoleError::NoFlightSelected | ConsoleError::InvalidTickRate(_) => None,
        }
    }
}
