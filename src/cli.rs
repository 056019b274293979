use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Run without the console for this many seconds, then exit.
    #[arg(long)]
    pub duration: Option<u64>,

    /// Start with the clock stopped.
    #[arg(long, default_value_t = false)]
    pub paused: bool,

    #[arg(short, long, default_value_t = log::LevelFilter::Info)]
    pub logging_level: log::LevelFilter,

    #[arg(long)]
    pub config_file: Option<std::path::PathBuf>,
}
