use crate::display::DisplaySink;
use crate::flight::{flight_name, Flight};
use crate::simulation::FlightSimulation;

/// Display sink for a terminal session: flight events go to the log and
/// the flight table is printed on request.
pub struct TerminalRenderer {
    airports: Vec<crate::airport::Airport>,
}

impl TerminalRenderer {
    #[must_use]
    pub fn new(airports: Vec<crate::airport::Airport>) -> Self {
        Self { airports }
    }
}

impl DisplaySink for TerminalRenderer {
    fn flight_added(&mut self, flight: &Flight) {
        log::info!("Radar: {} appeared", flight_name(flight, &self.airports));
    }

    fn flight_moved(&mut self, flight: &Flight) {
        log::trace!("Radar: {} at {}", flight.callsign(), flight.position());
    }

    fn flight_removed(&mut self, flight: &Flight) {
        log::info!(
            "Radar: {} left the scope at {}",
            flight.callsign(),
            flight.position()
        );
    }

    fn selection_changed(&mut self, flight: Option<&Flight>) {
        match flight {
            Some(flight) => log::info!(
                "Radar: Centering on {} at {}",
                flight.callsign(),
                flight.position()
            ),
            None => log::info!("Radar: Selection cleared"),
        }
    }

    fn clock_updated(&mut self, simulation_time: &str) {
        log::debug!("Radar: Clock {simulation_time}");
    }
}

/// Renders the active flights as a fixed-width table. The selected flight
/// is marked with `*`.
#[must_use]
pub fn flight_table(simulation: &FlightSimulation) -> String {
    let mut table = format!(
        "Time {}\n  {:<16} {:<8} {:>9} {:>10} {:>7} {:>8}\n",
        simulation.simulation_time(),
        "Flight",
        "Action",
        "Latitude",
        "Longitude",
        "Heading",
        "Altitude"
    );
    if simulation.is_empty() {
        table.push_str("  No flights active.\n");
        return table;
    }
    for flight in simulation.flights() {
        let marker = if flight.is_selected() { '*' } else { ' ' };
        let position = flight.position();
        table.push_str(&format!(
            "{marker} {:<16} {:<8} {:>9.4} {:>10.4} {:>7.1} {:>8.0}\n",
            flight_name(flight, simulation.airports()),
            flight.action().to_string(),
            position.latitude,
            position.longitude,
            flight.bearing(),
            flight.altitude()
        ));
    }
    table
}
