use crate::clock::errors::ClockError;
use crate::clock::{clamp_tick_rate, SimulationClock, SteppableTask};
use crate::simulation::error::SimulationError;
use crate::simulation::FlightSimulation;

/// Ticks the shared simulation once per step.
pub struct SimulationStepper {
    simulation: std::sync::Arc<std::sync::Mutex<FlightSimulation>>,
}

impl SteppableTask for SimulationStepper {
    fn step(&mut self) -> bool {
        match self.simulation.lock() {
            Ok(mut simulation) => {
                simulation.execute_tick();
            }
            Err(_) => log::error!("Simulation lock poisoned, skipping tick"),
        }
        true
    }
}

/// Owns the simulation for the lifetime of a session: the flights, the
/// selection and the clock driving them.
pub struct FlightController {
    simulation: std::sync::Arc<std::sync::Mutex<FlightSimulation>>,
    clock: SimulationClock<SimulationStepper>,
    shut_down: bool,
}

impl FlightController {
    #[must_use]
    pub fn new(simulation: FlightSimulation, tick_rate_ms: u64) -> Self {
        let simulation = std::sync::Arc::new(std::sync::Mutex::new(simulation));
        let stepper = SimulationStepper {
            simulation: simulation.clone(),
        };
        FlightController {
            simulation,
            clock: SimulationClock::new(stepper, clamp_tick_rate(tick_rate_ms)),
            shut_down: false,
        }
    }

    /// Spawns the initial fleet and runs the first tick so the clock shows
    /// a time before playback starts.
    pub fn init(&mut self, initial_flights: usize) -> Result<(), ControllerError> {
        log::info!("FlightController: Spawning {initial_flights} flights");
        self.with_simulation(|simulation| {
            for _ in 0..initial_flights {
                simulation.add_random_flight()?;
            }
            simulation.execute_tick();
            Ok::<(), SimulationError>(())
        })?
        .map_err(ControllerError::Simulation)
    }

    pub fn play(&mut self) -> Result<(), ControllerError> {
        self.clock.play().map_err(ControllerError::Clock)
    }

    pub fn pause(&mut self) -> Result<(), ControllerError> {
        self.clock.pause().map_err(ControllerError::Clock)
    }

    /// Clamps `rate_ms` and restarts the clock at the new rate. The clock
    /// is playing afterwards even if it was paused before.
    pub fn set_tick_rate(&mut self, rate_ms: u64) -> Result<std::time::Duration, ControllerError> {
        self.pause()?;
        let period = clamp_tick_rate(rate_ms);
        self.clock
            .set_period(period)
            .map_err(ControllerError::Clock)?;
        self.play()?;
        log::info!("FlightController: Tick rate set to {period:?}");
        Ok(period)
    }

    #[must_use]
    pub fn tick_rate(&self) -> std::time::Duration {
        self.clock.period()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    /// Runs `f` with the simulation locked. Ticks wait until it returns.
    pub fn with_simulation<R>(
        &self,
        f: impl FnOnce(&mut FlightSimulation) -> R,
    ) -> Result<R, ControllerError> {
        let mut simulation = self
            .simulation
            .lock()
            .map_err(|_| ControllerError::LockPoisoned)?;
        Ok(f(&mut simulation))
    }

    /// Stops the clock and releases every flight.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        if let Err(err) = self.clock.pause() {
            log::error!("FlightController: {err}");
        }
        match self.simulation.lock() {
            Ok(mut simulation) => simulation.clear(),
            Err(_) => log::error!("FlightController: Simulation lock poisoned during shutdown"),
        }
        log::info!("FlightController: Shut down");
    }
}

impl Drop for FlightController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[derive(Debug)]
pub enum ControllerError {
    Clock(ClockError),
    Simulation(SimulationError),
    LockPoisoned,
}

impl std::fmt::Display for ControllerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControllerError::Clock(e) => write!(f, "{e}"),
            ControllerError::Simulation(e) => write!(f, "{e}"),
            ControllerError::LockPoisoned => write!(f, "Simulation lock poisoned"),
        }
    }
}

impl std::error::Error for ControllerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ControllerError::Clock(error) => Some(error),
            ControllerError::Simulation(error) => Some(error),
            ControllerError::LockPoisoned => None,
        }
    }
}
