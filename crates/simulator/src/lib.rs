pub mod cli;
pub mod config;
pub mod runner;
pub mod snapshot;

pub use cli::{Args, Command, Position, Side};
pub use config::{create_example_config, OutputConfig, SimulatorConfig};
pub use runner::run;
pub use snapshot::MarketSnapshot;
