use airspace_sim::cli::Cli;
use airspace_sim::config::ApplicationConfig;
use airspace_sim::console::run_repl;
use airspace_sim::controller::FlightController;
use airspace_sim::logging::setup_logging;
use airspace_sim::renderer::TerminalRenderer;
use airspace_sim::simulation::FlightSimulation;
use clap::Parser;
use log::info;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.logging_level);

    let application_config = match &cli.config_file {
        Some(path) => ApplicationConfig::construct_from_path(path).unwrap_or_else(|e| {
            log::error!("{e}");
            std::process::exit(1)
        }),
        None => ApplicationConfig::default(),
    };
    info!("Main: Application started.");

    let settings = application_config.simulation_settings();
    let renderer = TerminalRenderer::new(settings.airports.clone());
    let simulation = FlightSimulation::new(settings, Box::new(renderer));

    let mut controller =
        FlightController::new(simulation, application_config.simulation.tick_rate_ms);
    if let Err(e) = controller.init(application_config.simulation.initial_flights) {
        log::error!("Failed to spawn initial flights: {e}");
        std::process::exit(1);
    }
    if !cli.paused {
        if let Err(e) = controller.play() {
            log::error!("Failed to start the clock: {e}");
            std::process::exit(1);
        }
    }

    if let Some(duration) = cli.duration {
        std::thread::sleep(std::time::Duration::from_secs(duration));
    } else {
        let stdin = std::io::stdin();
        if let Err(e) = run_repl(&mut controller, stdin.lock(), std::io::stdout()) {
            log::error!("Console error: {e}");
        }
    }

    controller.shutdown();
    info!("Main: Program finished.");
}
