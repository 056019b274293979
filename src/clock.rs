use log::info;

pub const MIN_TICK_RATE_MS: u64 = 16;
pub const MAX_TICK_RATE_MS: u64 = 1200;
pub const DEFAULT_TICK_RATE_MS: u64 = 128;

pub trait SteppableTask: Send + 'static {
    /// Runs one step. Returning `false` ends the worker thread.
    fn step(&mut self) -> bool;
}

/// Clamps a requested tick rate to `[16, 1200]` milliseconds.
#[must_use]
pub fn clamp_tick_rate(rate_ms: u64) -> std::time::Duration {
    std::time::Duration::from_millis(rate_ms.clamp(MIN_TICK_RATE_MS, MAX_TICK_RATE_MS))
}

/// Runs a task on its own thread once per period. Pausing joins the thread
/// and keeps the task, so playing again resumes from the same state.
pub struct SimulationClock<T: SteppableTask> {
    period: std::time::Duration,
    state: ClockState<T>,
}

enum ClockState<T> {
    Idle(T),
    Running(RunningTask<T>),
    /// The task was lost to a failed spawn or a panic.
    Failed,
}

struct RunningTask<T> {
    handle: std::thread::JoinHandle<T>,
    stop_sender: crossbeam_channel::Sender<()>,
}

impl<T: SteppableTask> SimulationClock<T> {
    #[must_use]
    pub fn new(task: T, period: std::time::Duration) -> Self {
        SimulationClock {
            period,
            state: ClockState::Idle(task),
        }
    }

    /// Starts the worker thread. Does nothing if it is already running.
    ///
    /// # Errors
    ///
    /// Fails if the thread cannot be spawned or an earlier failure lost the task.
    pub fn play(&mut self) -> Result<(), errors::ClockError> {
        match std::mem::replace(&mut self.state, ClockState::Failed) {
            ClockState::Idle(task) => {
                let (stop_sender, stop_receiver) = crossbeam_channel::bounded::<()>(1);
                let period = self.period;
                let handle = std::thread::Builder::new()
                    .name(std::any::type_name::<T>().to_string())
                    .spawn(move || run_task_with_period(task, period, &stop_receiver))
                    .map_err(errors::ClockError::Spawn)?;
                info!("SimulationClock: Playing every {period:?}");
                self.state = ClockState::Running(RunningTask {
                    handle,
                    stop_sender,
                });
                Ok(())
            }
            running @ ClockState::Running(_) => {
                self.state = running;
                Ok(())
            }
            ClockState::Failed => Err(errors::ClockError::TaskLost),
        }
    }

    /// Stops the worker thread and takes the task back. Ticks that would
    /// have happened while paused are not replayed.
    ///
    /// # Errors
    ///
    /// Fails if the task panicked or an earlier failure lost it.
    pub fn pause(&mut self) -> Result<(), errors::ClockError> {
        match std::mem::replace(&mut self.state, ClockState::Failed) {
            ClockState::Running(running) => {
                info!("SimulationClock: Signaling task to stop...");
                let _ = running.stop_sender.send(());
                let task = running
                    .handle
                    .join()
                    .map_err(|_| errors::ClockError::TaskPanicked)?;
                self.state = ClockState::Idle(task);
                Ok(())
            }
            idle @ ClockState::Idle(_) => {
                self.state = idle;
                Ok(())
            }
            ClockState::Failed => Err(errors::ClockError::TaskLost),
        }
    }

    /// Changes the period, restarting the worker if it was running.
    ///
    /// # Errors
    ///
    /// See [`SimulationClock::pause`] and [`SimulationClock::play`].
    pub fn set_period(&mut self, period: std::time::Duration) -> Result<(), errors::ClockError> {
        let was_playing = matches!(self.state, ClockState::Running(_));
        self.pause()?;
        self.period = period;
        if was_playing {
            self.play()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn period(&self) -> std::time::Duration {
        self.period
    }

    /// True while the worker thread is alive.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        match &self.state {
            ClockState::Running(running) => !running.handle.is_finished(),
            _ => false,
        }
    }

    /// The task, available only while paused.
    #[must_use]
    pub fn task(&self) -> Option<&T> {
        match &self.state {
            ClockState::Idle(task) => Some(task),
            _ => None,
        }
    }
}

impl<T: SteppableTask> Drop for SimulationClock<T> {
    fn drop(&mut self) {
        if let Err(err) = self.pause() {
            log::debug!("SimulationClock dropped without its task: {err}");
        }
    }
}

fn run_task_with_period<T: SteppableTask>(
    mut task: T,
    period: std::time::Duration,
    stop_receiver: &crossbeam_channel::Receiver<()>,
) -> T {
    let mut next_run = std::time::Instant::now();
    loop {
        if !task.step() {
            break;
        }

        next_run += period;
        let now = std::time::Instant::now();

        if next_run > now {
            let sleep_dur = next_run - now;
            // Wait for timeout (next loop) OR stop signal
            match stop_receiver.recv_timeout(sleep_dur) {
                Ok(()) | Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            }
        } else {
            // Lagging: drop the missed ticks instead of catching up
            log::debug!("Tick overran its period");
            next_run = now;

            if let Ok(()) = stop_receiver.try_recv() {
                break;
            }
        }
    }
    task
}

pub mod errors {
    #[derive(Debug)]
    pub enum ClockError {
        Spawn(std::io::Error),
        TaskPanicked,
        TaskLost,
    }
    impl std::fmt::Display for ClockError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                ClockError::Spawn(error) => write!(f, "Failed to spawn clock thread: {error}"),
                ClockError::TaskPanicked => write!(f, "Clock task panicked"),
                ClockError::TaskLost => {
                    write!(f, "Clock task is unavailable after an earlier failure")
                }
            }
        }
    }
    impl std::error::Error for ClockError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                ClockError::Spawn(error) => Some(error),
                _ => None,
            }
        }
    }
}
