pub mod error;

use crate::airport::Airport;
use crate::display::DisplaySink;
use crate::flight::{Flight, MotionParameters};
use crate::simulation::error::SimulationError;
use crate::types::{Action, Callsign};
use rand::{Rng, SeedableRng};

/// Simulated milliseconds per tick used by the clock display, independent
/// of the real tick rate.
pub const SIMULATED_MS_PER_TICK: u64 = 128;

const AIRLINE_PREFIXES: [&str; 6] = ["AAL", "DAL", "UAL", "SWA", "JBU", "ASA"];

pub struct SimulationSettings {
    pub airports: Vec<Airport>,
    pub parameters: MotionParameters,
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings {
            airports: crate::airport::default_airports(),
            parameters: MotionParameters::default(),
            seed: None,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct TickReport {
    pub arrivals: Vec<Callsign>,
    pub spawned: Vec<Callsign>,
}

/// Owns the active flights and advances them one tick at a time.
pub struct FlightSimulation {
    airports: Vec<Airport>,
    parameters: MotionParameters,
    flights: std::collections::HashMap<Callsign, Flight>,
    // insertion order of `flights`
    order: Vec<Callsign>,
    selected: Option<Callsign>,
    tick_count: u64,
    rng: rand::rngs::StdRng,
    display: Box<dyn DisplaySink>,
}

impl FlightSimulation {
    #[must_use]
    pub fn new(settings: SimulationSettings, display: Box<dyn DisplaySink>) -> Self {
        let rng = match settings.seed {
            Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
            None => rand::rngs::StdRng::from_entropy(),
        };
        FlightSimulation {
            airports: settings.airports,
            parameters: settings.parameters,
            flights: std::collections::HashMap::new(),
            order: Vec::new(),
            selected: None,
            tick_count: 0,
            rng,
            display,
        }
    }

    pub fn add_flight(&mut self, flight: Flight) -> Result<(), SimulationError> {
        let callsign = flight.callsign().clone();
        if self.flights.contains_key(&callsign) {
            return Err(SimulationError::DuplicateCallsign(callsign));
        }
        log::info!(
            "Adding flight {}",
            crate::flight::flight_name(&flight, &self.airports)
        );
        self.display.flight_added(&flight);
        self.order.push(callsign.clone());
        self.flights.insert(callsign, flight);
        Ok(())
    }

    /// Spawns a flight between two distinct airports picked at random.
    pub fn add_random_flight(&mut self) -> Result<Callsign, SimulationError> {
        let airport_count = self.airports.len();
        if airport_count < 2 {
            return Err(SimulationError::NotEnoughAirports(airport_count));
        }

        let origin_index = self.rng.gen_range(0..airport_count);
        let mut destination_index = self.rng.gen_range(0..airport_count);
        while destination_index == origin_index {
            destination_index = self.rng.gen_range(0..airport_count);
        }

        let callsign = self.generate_callsign();
        let flight = Flight::new(
            callsign.clone(),
            self.airports[origin_index].coordinate,
            self.airports[destination_index].coordinate,
            self.parameters,
        );
        self.add_flight(flight)?;
        Ok(callsign)
    }

    pub fn remove_flight(&mut self, callsign: &Callsign) -> Result<Flight, SimulationError> {
        let flight = self
            .flights
            .remove(callsign)
            .ok_or_else(|| SimulationError::FlightNotFound(callsign.clone()))?;
        self.order.retain(|active| active != callsign);

        if self.selected.as_ref() == Some(callsign) {
            self.selected = None;
            self.display.selection_changed(None);
        }
        log::info!("Removing flight {callsign}");
        self.display.flight_removed(&flight);
        Ok(flight)
    }

    /// Advances every active flight once. Arrived flights are replaced by a
    /// random one within the same tick, so the fleet size never changes.
    pub fn execute_tick(&mut self) -> TickReport {
        let tick_index = self.tick_count;
        let mut report = TickReport::default();

        // Replacements spawned during this pass are appended to `order` and
        // must not be advanced until the next tick.
        let snapshot = self.order.clone();
        for callsign in snapshot {
            let Some(flight) = self.flights.get_mut(&callsign) else {
                continue;
            };
            flight.on_tick(tick_index);
            self.display.flight_moved(flight);
            let arrived = flight.action() == Action::Fly && flight.has_landed();

            if arrived {
                if let Err(err) = self.remove_flight(&callsign) {
                    log::error!("Failed to remove arrived flight: {err}");
                    continue;
                }
                report.arrivals.push(callsign);
                match self.add_random_flight() {
                    Ok(spawned) => report.spawned.push(spawned),
                    Err(err) => log::error!("Failed to spawn replacement flight: {err}"),
                }
            }
        }

        self.tick_count += 1;
        let simulation_time = self.simulation_time();
        self.display.clock_updated(&simulation_time);
        log::debug!(
            "Tick {tick_index} done at {simulation_time}: {} arrived",
            report.arrivals.len()
        );
        report
    }

    #[must_use]
    pub fn simulation_time(&self) -> String {
        format_simulation_time(self.tick_count)
    }

    pub fn select_flight(&mut self, callsign: &Callsign) -> Result<(), SimulationError> {
        if !self.flights.contains_key(callsign) {
            return Err(SimulationError::FlightNotFound(callsign.clone()));
        }
        if let Some(previous) = self.selected.take() {
            if let Some(flight) = self.flights.get_mut(&previous) {
                flight.deselect();
            }
        }
        if let Some(flight) = self.flights.get_mut(callsign) {
            flight.select();
            self.display.selection_changed(Some(&*flight));
        }
        self.selected = Some(callsign.clone());
        log::info!("Selected flight {callsign}");
        Ok(())
    }

    pub fn deselect(&mut self) {
        if let Some(previous) = self.selected.take() {
            if let Some(flight) = self.flights.get_mut(&previous) {
                flight.deselect();
            }
            self.display.selection_changed(None);
        }
    }

    #[must_use]
    pub fn selected_flight(&self) -> Option<&Flight> {
        self.selected
            .as_ref()
            .and_then(|callsign| self.flights.get(callsign))
    }

    pub fn selected_flight_mut(&mut self) -> Option<&mut Flight> {
        self.selected
            .as_ref()
            .and_then(|callsign| self.flights.get_mut(callsign))
    }

    #[must_use]
    pub fn flight(&self, callsign: &Callsign) -> Option<&Flight> {
        self.flights.get(callsign)
    }

    pub fn flight_mut(&mut self, callsign: &Callsign) -> Option<&mut Flight> {
        self.flights.get_mut(callsign)
    }

    /// Active flights in the order they were added.
    pub fn flights(&self) -> impl Iterator<Item = &Flight> {
        self.order
            .iter()
            .filter_map(|callsign| self.flights.get(callsign))
    }

    #[must_use]
    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Removes every flight, notifying the display for each.
    pub fn clear(&mut self) {
        for callsign in self.order.clone() {
            if let Err(err) = self.remove_flight(&callsign) {
                log::error!("Failed to remove flight while clearing: {err}");
            }
        }
    }

    fn generate_callsign(&mut self) -> Callsign {
        loop {
            let prefix = AIRLINE_PREFIXES[self.rng.gen_range(0..AIRLINE_PREFIXES.len())];
            let number: u16 = self.rng.gen_range(1..=9999);
            if let Ok(callsign) = Callsign::new(&format!("{prefix}{number}")) {
                if !self.flights.contains_key(&callsign) {
                    return callsign;
                }
            }
        }
    }
}

/// Formats elapsed simulated time as `00:MM:SS`.
///
/// Seconds are rounded. When they round up to 60 the minutes are bumped
/// after the zero padding was decided, so 9:59.6 renders as `00:010:00`.
#[must_use]
pub fn format_simulation_time(tick_count: u64) -> String {
    let run_time_ms = tick_count * SIMULATED_MS_PER_TICK;
    let minutes = run_time_ms / 60_000;
    let seconds = (run_time_ms % 60_000 + 500) / 1000;
    let padding = if minutes < 10 { "0" } else { "" };
    if seconds == 60 {
        format!("00:{padding}{}:00", minutes + 1)
    } else {
        format!("00:{padding}{minutes}:{seconds:02}")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{format_simulation_time, FlightSimulation, SimulationSettings};
    use crate::airport::Airport;
    use crate::display::tests::{DisplayEvent, RecordingDisplay};
    use crate::flight::tests::create_dummy_flight;
    use crate::flight::MotionParameters;
    use crate::simulation::error::SimulationError;
    use crate::types::{Action, Callsign, Coordinate};

    /// Three airports close enough that every flight arrives within ~30 ticks.
    pub(crate) fn close_airports() -> Vec<Airport> {
        vec![
            Airport::new("AAA", 0.0, 0.0),
            Airport::new("BBB", 0.0, 0.2),
            Airport::new("CCC", 0.2, 0.0),
        ]
    }

    pub(crate) fn create_simulation(
        airports: Vec<Airport>,
    ) -> (FlightSimulation, RecordingDisplay) {
        let display = RecordingDisplay::default();
        let simulation = FlightSimulation::new(
            SimulationSettings {
                airports,
                parameters: MotionParameters::default(),
                seed: Some(7),
            },
            Box::new(display.clone()),
        );
        (simulation, display)
    }

    #[test]
    fn when_ticking_many_times_then_fleet_size_is_constant() {
        let (mut simulation, _display) = create_simulation(close_airports());
        for _ in 0..6 {
            simulation.add_random_flight().unwrap();
        }

        let mut arrivals = 0;
        for _ in 0..200 {
            let report = simulation.execute_tick();
            assert_eq!(report.arrivals.len(), report.spawned.len());
            assert_eq!(simulation.len(), 6);
            arrivals += report.arrivals.len();
        }
        assert!(arrivals > 0, "expected some flights to arrive");
    }

    #[test]
    fn when_spawning_random_flights_then_origin_never_equals_destination() {
        let (mut simulation, _display) = create_simulation(vec![
            Airport::new("AAA", 10.0, 10.0),
            Airport::new("BBB", 20.0, 20.0),
        ]);
        for _ in 0..500 {
            let callsign = simulation.add_random_flight().unwrap();
            let flight = simulation.remove_flight(&callsign).unwrap();
            assert_ne!(flight.origin(), flight.destination());
        }
    }

    #[test]
    fn when_spawning_with_one_airport_then_error_is_returned() {
        let (mut simulation, _display) = create_simulation(vec![Airport::new("AAA", 1.0, 1.0)]);
        assert_eq!(
            simulation.add_random_flight(),
            Err(SimulationError::NotEnoughAirports(1))
        );
        assert!(simulation.is_empty());
    }

    #[test]
    fn when_spawning_many_flights_then_callsigns_are_unique() {
        let (mut simulation, _display) = create_simulation(close_airports());
        for _ in 0..300 {
            simulation.add_random_flight().unwrap();
        }
        assert_eq!(simulation.len(), 300);
    }

    #[test]
    fn when_adding_duplicate_callsign_then_fleet_is_unchanged() {
        let (mut simulation, display) = create_simulation(close_airports());
        let first = create_dummy_flight("UAL123", Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0));
        let second = create_dummy_flight("ual123", Coordinate::new(5.0, 5.0), Coordinate::new(1.0, 1.0));
        simulation.add_flight(first).unwrap();

        let result = simulation.add_flight(second);

        assert_eq!(
            result,
            Err(SimulationError::DuplicateCallsign(Callsign::new("UAL123").unwrap()))
        );
        assert_eq!(simulation.len(), 1);
        let kept = simulation.flight(&Callsign::new("UAL123").unwrap()).unwrap();
        assert_eq!(kept.origin(), Coordinate::new(0.0, 0.0));
        assert_eq!(display.take(), vec![DisplayEvent::Added("UAL123".to_string())]);
    }

    #[test]
    fn when_removing_unknown_flight_then_not_found_is_returned() {
        let (mut simulation, _display) = create_simulation(close_airports());
        let callsign = Callsign::new("ZZZ99").unwrap();
        assert_eq!(
            simulation.remove_flight(&callsign),
            Err(SimulationError::FlightNotFound(callsign))
        );
    }

    #[test]
    fn when_flights_are_listed_then_insertion_order_is_kept() {
        let (mut simulation, _display) = create_simulation(close_airports());
        for callsign in ["CCC1", "AAA1", "BBB1"] {
            simulation
                .add_flight(create_dummy_flight(callsign, Coordinate::new(0.0, 0.0), Coordinate::new(9.0, 9.0)))
                .unwrap();
        }
        simulation.remove_flight(&Callsign::new("AAA1").unwrap()).unwrap();
        let listed: Vec<String> = simulation.flights().map(|f| f.callsign().to_string()).collect();
        assert_eq!(listed, vec!["CCC1", "BBB1"]);
    }

    #[cfg(test)]
    mod when_executing_a_tick {
        use super::*;

        #[test]
        fn and_flight_arrives_then_it_is_replaced_without_being_advanced() {
            let (mut simulation, display) = create_simulation(vec![
                Airport::new("AAA", 10.0, 10.0),
                Airport::new("BBB", 20.0, 20.0),
            ]);
            let spot = Coordinate::new(1.0, 1.0);
            simulation
                .add_flight(create_dummy_flight("UAL1", spot, spot))
                .unwrap();
            display.take();

            let report = simulation.execute_tick();

            assert_eq!(report.arrivals, vec![Callsign::new("UAL1").unwrap()]);
            assert_eq!(report.spawned.len(), 1);
            assert_eq!(simulation.len(), 1);
            let replacement = simulation.flight(&report.spawned[0]).unwrap();
            assert_eq!(replacement.position(), replacement.origin());

            let events = display.take();
            assert_eq!(events[0], DisplayEvent::Moved("UAL1".to_string()));
            assert_eq!(events[1], DisplayEvent::Removed("UAL1".to_string()));
            assert!(matches!(events[2], DisplayEvent::Added(_)));
            assert_eq!(events[3], DisplayEvent::Clock("00:00:00".to_string()));
        }

        #[test]
        fn and_flight_is_holding_at_destination_then_it_is_kept() {
            let (mut simulation, _display) = create_simulation(close_airports());
            let spot = Coordinate::new(1.0, 1.0);
            let mut flight = create_dummy_flight("UAL1", spot, spot);
            flight.set_action(Action::Hold);
            simulation.add_flight(flight).unwrap();

            let report = simulation.execute_tick();

            assert!(report.arrivals.is_empty());
            let flight = simulation.flight(&Callsign::new("UAL1").unwrap()).unwrap();
            assert_eq!(flight.position(), spot);
        }

        #[test]
        fn and_middle_flight_arrives_then_neighbours_are_each_advanced_once() {
            let (mut simulation, _display) = create_simulation(close_airports());
            let origin = Coordinate::new(0.0, 0.0);
            let far = Coordinate::new(0.0, 50.0);
            simulation.add_flight(create_dummy_flight("AAA1", origin, far)).unwrap();
            simulation.add_flight(create_dummy_flight("BBB1", far, far)).unwrap();
            simulation.add_flight(create_dummy_flight("CCC1", origin, far)).unwrap();

            let report = simulation.execute_tick();

            assert_eq!(report.arrivals, vec![Callsign::new("BBB1").unwrap()]);
            for callsign in ["AAA1", "CCC1"] {
                let flight = simulation.flight(&Callsign::new(callsign).unwrap()).unwrap();
                assert!((flight.position().longitude - 0.01).abs() < 1e-9);
            }
        }

        #[test]
        fn then_tick_count_and_clock_advance() {
            let (mut simulation, _display) = create_simulation(close_airports());
            for _ in 0..10 {
                simulation.execute_tick();
            }
            assert_eq!(simulation.tick_count(), 10);
            assert_eq!(simulation.simulation_time(), "00:00:01");
        }
    }

    #[cfg(test)]
    mod when_selecting {
        use super::*;

        fn simulation_with_two_flights() -> (FlightSimulation, RecordingDisplay) {
            let (mut simulation, display) = create_simulation(close_airports());
            let origin = Coordinate::new(0.0, 0.0);
            let far = Coordinate::new(0.0, 50.0);
            simulation.add_flight(create_dummy_flight("AAA1", origin, far)).unwrap();
            simulation.add_flight(create_dummy_flight("BBB1", origin, far)).unwrap();
            display.take();
            (simulation, display)
        }

        #[test]
        fn and_another_flight_is_selected_then_only_one_is_selected() {
            let (mut simulation, display) = simulation_with_two_flights();
            simulation.select_flight(&Callsign::new("AAA1").unwrap()).unwrap();
            simulation.select_flight(&Callsign::new("BBB1").unwrap()).unwrap();

            let selected: Vec<String> = simulation
                .flights()
                .filter(|f| f.is_selected())
                .map(|f| f.callsign().to_string())
                .collect();
            assert_eq!(selected, vec!["BBB1"]);
            assert_eq!(
                simulation.selected_flight().map(|f| f.callsign().to_string()),
                Some("BBB1".to_string())
            );
            assert_eq!(
                display.take(),
                vec![
                    DisplayEvent::Selected(Some("AAA1".to_string())),
                    DisplayEvent::Selected(Some("BBB1".to_string())),
                ]
            );
        }

        #[test]
        fn and_selected_flight_is_removed_then_selection_is_cleared() {
            let (mut simulation, _display) = simulation_with_two_flights();
            let callsign = Callsign::new("AAA1").unwrap();
            simulation.select_flight(&callsign).unwrap();
            simulation.remove_flight(&callsign).unwrap();
            assert!(simulation.selected_flight().is_none());
        }

        #[test]
        fn and_flight_is_unknown_then_previous_selection_is_kept() {
            let (mut simulation, _display) = simulation_with_two_flights();
            simulation.select_flight(&Callsign::new("AAA1").unwrap()).unwrap();
            let missing = Callsign::new("ZZZ9").unwrap();
            assert_eq!(
                simulation.select_flight(&missing),
                Err(SimulationError::FlightNotFound(missing))
            );
            assert!(simulation.selected_flight().is_some());
        }

        #[test]
        fn and_deselect_is_called_then_no_flight_is_selected() {
            let (mut simulation, _display) = simulation_with_two_flights();
            simulation.select_flight(&Callsign::new("AAA1").unwrap()).unwrap();
            simulation.deselect();
            assert!(simulation.selected_flight().is_none());
            assert!(simulation.flights().all(|f| !f.is_selected()));
        }
    }

    #[test]
    fn when_clearing_then_every_flight_is_removed() {
        let (mut simulation, display) = create_simulation(close_airports());
        for _ in 0..3 {
            simulation.add_random_flight().unwrap();
        }
        display.take();
        simulation.clear();
        assert!(simulation.is_empty());
        assert_eq!(simulation.flights().count(), 0);
        let removed = display
            .take()
            .into_iter()
            .filter(|e| matches!(e, DisplayEvent::Removed(_)))
            .count();
        assert_eq!(removed, 3);
    }

    #[cfg(test)]
    mod when_formatting_simulation_time {
        use super::*;

        #[test]
        fn and_no_ticks_elapsed_then_time_is_zero() {
            assert_eq!(format_simulation_time(0), "00:00:00");
        }

        #[test]
        fn and_seconds_round_up_to_sixty_then_minutes_roll_over() {
            // 465 * 128 ms = 59.52 s
            assert_eq!(format_simulation_time(465), "00:01:00");
            // 469 * 128 ms = 60.032 s
            assert_eq!(format_simulation_time(469), "00:01:00");
        }

        #[test]
        fn and_seconds_are_single_digit_then_they_are_padded() {
            // 40 * 128 ms = 5.12 s
            assert_eq!(format_simulation_time(40), "00:00:05");
        }

        #[test]
        fn and_rollover_reaches_ten_minutes_then_padding_is_kept() {
            // 4683 * 128 ms = 9 min 59.424 s
            assert_eq!(format_simulation_time(4683), "00:09:59");
            // 4684 * 128 ms = 9 min 59.552 s
            assert_eq!(format_simulation_time(4684), "00:010:00");
        }
    }
}
