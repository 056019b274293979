pub mod airport;
pub mod cli;
pub mod clock;
pub mod command;
pub mod config;
pub mod console;
pub mod controller;
pub mod display;
pub mod flight;
pub mod logging;
pub mod renderer;
pub mod simulation;
pub mod types;
