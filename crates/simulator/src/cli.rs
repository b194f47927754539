use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use lockcurve_core::{Direction, OrderType};

#[derive(Parser, Debug)]
#[command(name = "lockcurve-sim")]
#[command(about = "Offline quotes, liquidity walks and stop-loss placement for lockcurve markets")]
pub struct Args {
    /// Path to simulator configuration file (protocol defaults if omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Amounts exchanged moving the price between two levels
    Range {
        #[arg(long, value_enum)]
        side: Side,
        /// Start price in SOL per token
        #[arg(long)]
        start: String,
        /// End price in SOL per token
        #[arg(long)]
        end: String,
    },

    /// Quote a trade sized by one leg, ignoring locked orders
    Quote {
        #[arg(long, value_enum)]
        side: Side,
        /// Raw amount of the fixed leg
        #[arg(long)]
        amount: u64,
        /// Fix the output leg instead of the input leg
        #[arg(long)]
        exact_out: bool,
        /// Start price in SOL per token (genesis price if omitted)
        #[arg(long)]
        price: Option<String>,
    },

    /// Walk a snapshot's locked orders for a trade
    Simulate {
        /// JSON market snapshot
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long, value_enum)]
        side: Side,
        /// Raw amount of the fixed leg
        #[arg(long)]
        amount: u64,
        /// Fix the output leg instead of the input leg
        #[arg(long)]
        exact_out: bool,
        /// Order whose locked liquidity may be used instead of force-closed
        #[arg(long)]
        pass_order: Option<String>,
    },

    /// Check a price interval against a snapshot's locked orders
    Overlap {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long, value_enum)]
        position: Position,
        /// Interval start in SOL per token
        #[arg(long)]
        start: String,
        /// Interval end in SOL per token
        #[arg(long)]
        end: String,
    },

    /// Search for a non-overlapping stop-loss price
    StopLoss {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long, value_enum)]
        position: Position,
        /// Position size in token base units
        #[arg(long)]
        size: u64,
        /// Desired stop price in SOL per token
        #[arg(long)]
        stop_price: String,
    },

    /// Write an example configuration file
    InitConfig {
        #[arg(default_value = "lockcurve.toml")]
        path: PathBuf,
    },
}

/// Trade side
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl From<Side> for Direction {
    fn from(side: Side) -> Self {
        match side {
            Side::Buy => Direction::Up,
            Side::Sell => Direction::Down,
        }
    }
}

/// Margin position side
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Long,
    Short,
}

impl From<Position> for OrderType {
    fn from(position: Position) -> Self {
        match position {
            Position::Long => OrderType::Long,
            Position::Short => OrderType::Short,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simulate_command() {
        let args = Args::try_parse_from([
            "lockcurve-sim",
            "-v",
            "simulate",
            "--snapshot",
            "market.json",
            "--side",
            "buy",
            "--amount",
            "1000000000",
            "--pass-order",
            "mine",
        ])
        .unwrap();

        assert!(args.verbose);
        assert_eq!(
            args.command,
            Command::Simulate {
                snapshot: PathBuf::from("market.json"),
                side: Side::Buy,
                amount: 1_000_000_000,
                exact_out: false,
                pass_order: Some("mine".to_string()),
            }
        );
    }

    #[test]
    fn test_side_mapping() {
        assert_eq!(Direction::from(Side::Sell), Direction::Down);
        assert_eq!(OrderType::from(Position::Short), OrderType::Short);
        let bad_side = ["lockcurve-sim", "quote", "--side", "sideways", "--amount", "1"];
        assert!(Args::try_parse_from(bad_side).is_err());
    }
}
