use anyhow::Result;
use clap::Parser;

use lockcurve_simulator::{run, Args, Command, SimulatorConfig};

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .default_filter_or(if args.verbose { "debug" } else { "info" })
    ).init();

    log::info!("Starting lockcurve simulator");

    // Load configuration
    let config = match (&args.config, &args.command) {
        (_, Command::InitConfig { .. }) | (None, _) => SimulatorConfig::default(),
        (Some(path), _) => {
            let config = SimulatorConfig::load(path)?;
            log::info!("Loaded configuration from {}", path.display());
            config
        }
    };

    log::debug!("Protocol configuration: {:?}", config.protocol);

    let output = run(&args.command, &config)?;
    println!("{}", output);

    Ok(())
}
