use crate::airport::Airport;
use crate::clock::DEFAULT_TICK_RATE_MS;
use crate::flight::{MotionParameters, CRUISE_ALTITUDE, GPS_ERROR_MARGIN, TICK_TRAVEL};
use crate::simulation::SimulationSettings;

#[derive(serde::Deserialize, Debug, Default)]
pub struct ApplicationConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Replaces the built-in airport table when present.
    pub airports: Option<Vec<Airport>>,
}

impl ApplicationConfig {
    pub fn construct_from_path(
        path: &std::path::PathBuf,
    ) -> Result<ApplicationConfig, errors::ApplicationConfigError> {
        let string =
            std::fs::read_to_string(path).map_err(|error| errors::ApplicationConfigError::Io {
                source: error,
                path: path.clone(),
            })?;

        let config: ApplicationConfig =
            toml::from_str(&string).map_err(|error| errors::ApplicationConfigError::Parse {
                source: error,
                path: path.clone(),
            })?;
        config.validate().map_err(|reason| errors::ApplicationConfigError::Invalid {
            reason,
            path: path.clone(),
        })?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if let Some(airports) = &self.airports {
            if airports.len() < 2 {
                return Err(format!(
                    "at least two airports are required, found {}",
                    airports.len()
                ));
            }
        }
        let simulation = &self.simulation;
        if !(simulation.tick_travel.is_finite() && simulation.tick_travel > 0.0) {
            return Err(String::from("tick_travel must be positive"));
        }
        if !(simulation.gps_error_margin.is_finite() && simulation.gps_error_margin > 0.0) {
            return Err(String::from("gps_error_margin must be positive"));
        }
        if simulation.gps_error_margin < simulation.tick_travel / 2.0 {
            return Err(format!(
                "gps_error_margin ({}) must be at least half of tick_travel ({}) or flights overshoot their destination",
                simulation.gps_error_margin, simulation.tick_travel
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn simulation_settings(&self) -> SimulationSettings {
        SimulationSettings {
            airports: self
                .airports
                .clone()
                .unwrap_or_else(crate::airport::default_airports),
            parameters: MotionParameters {
                tick_travel: self.simulation.tick_travel,
                gps_error_margin: self.simulation.gps_error_margin,
                cruise_altitude: self.simulation.cruise_altitude,
            },
            seed: self.simulation.seed,
        }
    }
}

#[derive(serde::Deserialize, Debug)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_rate_ms: u64,
    pub initial_flights: usize,
    pub tick_travel: f64,
    pub gps_error_margin: f64,
    pub cruise_altitude: f64,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
            initial_flights: 6,
            tick_travel: TICK_TRAVEL,
            gps_error_margin: GPS_ERROR_MARGIN,
            cruise_altitude: CRUISE_ALTITUDE,
            seed: None,
        }
    }
}

pub mod errors {

    #[derive(Debug)]
    pub enum ApplicationConfigError {
        Parse {
            source: toml::de::Error,
            path: std::path::PathBuf,
        },
        Io {
            source: std::io::Error,
            path: std::path::PathBuf,
        },
        Invalid {
            reason: String,
            path: std::path::PathBuf,
        },
    }
    impl std::fmt::Display for ApplicationConfigError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                ApplicationConfigError::Io {
                    source: error,
                    path,
                } => {
                    write!(
                        f,
                        "Failed to read config file '{}': {}",
                        path.display(),
                        error
                    )
                }
                ApplicationConfigError::Parse {
                    source: error,
                    path,
                } => {
                    write!(
                        f,
                        "Failed to parse config file '{}': {}",
                        path.display(),
                        error
                    )
                }
                ApplicationConfigError::Invalid { reason, path } => {
                    write!(f, "Invalid config file '{}': {}", path.display(), reason)
                }
            }
        }
    }
    impl std::error::Error for ApplicationConfigError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                ApplicationConfigError::Io { source: error, .. } => Some(error),
                ApplicationConfigError::Parse { source: error, .. } => Some(error),
                ApplicationConfigError::Invalid { .. } => None,
            }
        }
    }
}
