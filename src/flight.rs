use crate::airport::{airport_at, Airport};
use crate::simulation::error::SimulationError;
use crate::types::{Action, Callsign, Coordinate};

/// Degrees travelled per tick along the bearing.
pub const TICK_TRAVEL: f64 = 0.01;
/// Distance in degrees under which a flight counts as arrived.
pub const GPS_ERROR_MARGIN: f64 = 0.05;
pub const CRUISE_ALTITUDE: f64 = 35_000.0;
pub const MAX_ALTITUDE: f64 = 60_000.0;

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct MotionParameters {
    pub tick_travel: f64,
    pub gps_error_margin: f64,
    pub cruise_altitude: f64,
}

impl Default for MotionParameters {
    fn default() -> Self {
        MotionParameters {
            tick_travel: TICK_TRAVEL,
            gps_error_margin: GPS_ERROR_MARGIN,
            cruise_altitude: CRUISE_ALTITUDE,
        }
    }
}

/// Initial heading from `origin` to `destination` in coordinate space.
///
/// Compass convention: 0 is north (increasing latitude), 90 is east
/// (increasing longitude). Result is in `[0, 360)`.
#[must_use]
pub fn compute_bearing(origin: &Coordinate, destination: &Coordinate) -> f64 {
    let delta_latitude = destination.latitude - origin.latitude;
    let delta_longitude = destination.longitude - origin.longitude;
    normalize_bearing(delta_longitude.atan2(delta_latitude).to_degrees())
}

fn normalize_bearing(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs and
    // keeps the sign of -0.0
    if normalized >= 360.0 || normalized == 0.0 {
        0.0
    } else {
        normalized
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    callsign: Callsign,
    origin: Coordinate,
    destination: Coordinate,
    position: Coordinate,
    bearing: f64,
    altitude: f64,
    action: Action,
    selected: bool,
    tick_travel: f64,
    gps_error_margin: f64,
}

impl Flight {
    #[must_use]
    pub fn new(
        callsign: Callsign,
        origin: Coordinate,
        destination: Coordinate,
        parameters: MotionParameters,
    ) -> Self {
        Flight {
            callsign,
            origin,
            destination,
            position: origin,
            bearing: compute_bearing(&origin, &destination),
            altitude: parameters.cruise_altitude,
            action: Action::Fly,
            selected: false,
            tick_travel: parameters.tick_travel,
            gps_error_margin: parameters.gps_error_margin,
        }
    }

    /// Advances the position one step along the bearing when the action
    /// allows movement.
    pub fn on_tick(&mut self, tick_index: u64) {
        if !self.action.advances() {
            return;
        }
        let radians = self.bearing.to_radians();
        self.position.latitude += self.tick_travel * radians.cos();
        self.position.longitude += self.tick_travel * radians.sin();
        log::trace!(
            "{} tick {tick_index}: now at {} heading {:.1}",
            self.callsign,
            self.position,
            self.bearing
        );
    }

    /// Inclusive: a flight exactly on the margin has landed.
    #[must_use]
    pub fn has_landed(&self) -> bool {
        self.position.distance_to(&self.destination) <= self.gps_error_margin
    }

    pub fn set_action(&mut self, action: Action) {
        self.action = action;
    }

    pub fn set_bearing(&mut self, degrees: f64) -> Result<(), SimulationError> {
        if !degrees.is_finite() || !(0.0..=360.0).contains(&degrees) {
            return Err(SimulationError::InvalidHeading(degrees));
        }
        self.bearing = normalize_bearing(degrees);
        Ok(())
    }

    pub fn set_altitude(&mut self, feet: f64) -> Result<(), SimulationError> {
        if !feet.is_finite() || !(0.0..=MAX_ALTITUDE).contains(&feet) {
            return Err(SimulationError::InvalidAltitude(feet));
        }
        self.altitude = feet;
        Ok(())
    }

    pub fn select(&mut self) {
        self.selected = true;
    }

    pub fn deselect(&mut self) {
        self.selected = false;
    }

    #[must_use]
    pub fn callsign(&self) -> &Callsign {
        &self.callsign
    }

    #[must_use]
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    #[must_use]
    pub fn destination(&self) -> Coordinate {
        self.destination
    }

    #[must_use]
    pub fn position(&self) -> Coordinate {
        self.position
    }

    #[must_use]
    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    #[must_use]
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected
    }
}

/// Label such as `UAL123 PHL-DEN`. Endpoints that are not airports are
/// shown as coordinates.
#[must_use]
pub fn flight_name(flight: &Flight, airports: &[Airport]) -> String {
    let label = |coordinate: &Coordinate| {
        airport_at(airports, coordinate)
            .map_or_else(|| coordinate.to_string(), |airport| airport.code.clone())
    };
    format!(
        "{} {}-{}",
        flight.callsign(),
        label(&flight.origin()),
        label(&flight.destination())
    )
}
