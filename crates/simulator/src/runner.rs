use anyhow::{ensure, Context, Result};
use lockcurve_core::math::fixed_point::{parse_price, Rounding};
use lockcurve_core::{
    check_overlap, CurveEngine, Direction, OrderType, SegmentWalker, StopLossSearch, TradeTarget,
};
use serde::Serialize;

use crate::cli::Command;
use crate::config::{create_example_config, SimulatorConfig};
use crate::snapshot::MarketSnapshot;

/// Result of a single-leg quote
#[derive(Debug, Serialize)]
struct QuoteReport {
    start_price: u128,
    end_price: u128,
    amount: u64,
}

/// Run one command and return its result rendered as JSON
pub fn run(command: &Command, config: &SimulatorConfig) -> Result<String> {
    let pretty = config.output.pretty;
    let engine = CurveEngine::from_config(&config.protocol)?;

    match command {
        Command::Range { side, start, end } => {
            let direction = Direction::from(*side);
            let start = price_arg(start)?;
            let end = price_arg(end)?;
            let quote = engine.quote_price_range(direction, start, end)?;
            log::info!(
                "{:?} {} -> {}: in {}, out {}",
                direction,
                start,
                end,
                quote.amount_in,
                quote.amount_out
            );
            render(&quote, pretty)
        }

        Command::Quote { side, amount, exact_out, price } => {
            let direction = Direction::from(*side);
            let start = match price {
                Some(price) => price_arg(price)?,
                None => engine.initial_price()?,
            };
            let quote = if *exact_out {
                engine.quote_exact_out(direction, start, *amount)?
            } else {
                engine.quote_exact_in(direction, start, *amount)?
            };
            render(
                &QuoteReport {
                    start_price: start,
                    end_price: quote.end_price,
                    amount: quote.amount,
                },
                pretty,
            )
        }

        Command::Simulate { snapshot, side, amount, exact_out, pass_order } => {
            let snapshot = MarketSnapshot::load(snapshot)?;
            let direction = Direction::from(*side);
            let orders = snapshot.order_list(direction)?;
            let current_price = snapshot.current_price(&engine)?;
            let target = if *exact_out {
                TradeTarget::ExactOut(*amount)
            } else {
                TradeTarget::ExactIn(*amount)
            };

            let walker = SegmentWalker::new(&engine, &config.protocol);
            let result = walker.simulate(current_price, target, &orders, pass_order.as_deref())?;

            match result.limit_reason {
                None => log::info!(
                    "Trade fully executable, {} order(s) force-closed",
                    result.force_close_num
                ),
                Some(reason) => log::warn!(
                    "Trade {:.2}% executable ({:?}), suggested amount {:?}",
                    result.completion_rate,
                    reason,
                    result.suggested_amount
                ),
            }
            render(&result, pretty)
        }

        Command::Overlap { snapshot, position, start, end } => {
            let snapshot = MarketSnapshot::load(snapshot)?;
            let direction = Direction::for_order_type(OrderType::from(*position));
            let orders = snapshot.order_list(direction)?;
            let check =
                check_overlap(&orders, price_arg(start)?, price_arg(end)?, &config.protocol)?;
            render(&check, pretty)
        }

        Command::StopLoss { snapshot, position, size, stop_price } => {
            let snapshot = MarketSnapshot::load(snapshot)?;
            let order_type = OrderType::from(*position);
            let orders = snapshot.order_list(Direction::for_order_type(order_type))?;
            let current_price = snapshot.current_price(&engine)?;

            let search = StopLossSearch::new(&engine, &config.protocol);
            let placement = search.find_executable_price(
                order_type,
                current_price,
                *size,
                price_arg(stop_price)?,
                &orders,
            )?;
            log::info!(
                "Stop-loss placed at {} after {} iteration(s)",
                placement.executable_price,
                placement.iterations
            );
            render(&placement, pretty)
        }

        Command::InitConfig { path } => {
            create_example_config(path)?;
            log::info!("Wrote example configuration to {}", path.display());
            render(&serde_json::json!({ "written": path.display().to_string() }), pretty)
        }
    }
}

// u128 prices do not fit serde_json::Value
fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

/// Parse a SOL-per-token decimal into a raw price
fn price_arg(input: &str) -> Result<u128> {
    let price = parse_price(input, Rounding::Floor)
        .with_context(|| format!("Invalid price '{}'", input))?;
    ensure!(price > 0, "Price '{}' rounds to zero", input);
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Side;

    #[test]
    fn test_price_arg() {
        assert_eq!(
            price_arg("0.0000000279589934762348555452").unwrap(),
            279_589_934_762_348_555_452
        );
        assert!(price_arg("0").is_err());
        assert!(price_arg("abc").is_err());
    }

    #[test]
    fn test_quote_from_genesis() {
        let config = SimulatorConfig::default();
        let command = Command::Quote {
            side: Side::Buy,
            amount: 1_000_000_000,
            exact_out: false,
            price: None,
        };

        let text = run(&command, &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let amount = value["amount"].as_u64().unwrap();
        assert!((34_612_903_225_000..=34_612_903_226_000).contains(&amount));
    }

    #[test]
    fn test_simulate_snapshot_file() {
        let dir = std::env::temp_dir().join(format!("lockcurve-sim-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.json");
        std::fs::write(&path, "{}").unwrap();

        let command = Command::Simulate {
            snapshot: path.clone(),
            side: Side::Sell,
            amount: 1_000_000,
            exact_out: false,
            pass_order: None,
        };
        let text = run(&command, &SimulatorConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["completion_rate"].as_f64(), Some(100.0));
        assert_eq!(value["has_infinite_lp"].as_bool(), Some(true));
        assert_eq!(value["direction"].as_str(), Some("down"));

        std::fs::remove_file(&path).unwrap();
    }
}
