use crate::flight::Flight;

/// Receives everything the simulation wants drawn. Calls are synchronous
/// and happen while the simulation is locked, so implementations should
/// not block.
pub trait DisplaySink: Send + 'static {
    fn flight_added(&mut self, flight: &Flight);
    fn flight_moved(&mut self, flight: &Flight);
    fn flight_removed(&mut self, flight: &Flight);
    /// `None` when the selection was cleared.
    fn selection_changed(&mut self, flight: Option<&Flight>);
    fn clock_updated(&mut self, simulation_time: &str);
}
