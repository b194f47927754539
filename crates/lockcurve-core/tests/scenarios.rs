//! # Scenario Tests
//!
//! End-to-end walks, overlap checks and stop-loss searches against small
//! hand-built order lists around the genesis price.

use lockcurve_core::{
    check_overlap, CurveEngine, Direction, LimitReason, LockCurveError, LockedOrder, OrderList,
    OrderType, OverlapReason, ProtocolConfig, SegmentKind, SegmentWalker, StopLossSearch,
    TradeTarget, LAMPORTS_PER_SOL, TOKEN_UNIT,
};

const GENESIS_PRICE: u128 = 279_589_934_762_348_555_452;

/// Genesis price scaled by `per_mille / 1000`
fn at(per_mille: u128) -> u128 {
    GENESIS_PRICE * per_mille / 1_000
}

fn order(
    id: &str,
    order_type: OrderType,
    start: u128,
    end: u128,
    tokens: u64,
    next: Option<&str>,
) -> LockedOrder {
    LockedOrder {
        order_id: id.to_string(),
        order_type,
        lock_start_price: start,
        lock_end_price: end,
        lock_sol_amount: LAMPORTS_PER_SOL,
        lock_token_amount: tokens,
        next_order: next.map(str::to_string),
    }
}

// ============================================================================
// Segment Walker
// ============================================================================

#[test]
fn test_buy_from_genesis_against_empty_list() {
    let engine = CurveEngine::default();
    let config = ProtocolConfig::default();
    let walker = SegmentWalker::new(&engine, &config);

    let result = walker
        .simulate_sol_buy(GENESIS_PRICE, LAMPORTS_PER_SOL, &OrderList::empty(Direction::Up), None)
        .unwrap();

    assert_eq!(result.completion_rate, 100.0);
    assert!(result.has_infinite_lp);
    assert_eq!(result.force_close_num, 0);
    assert!(result.end_price > GENESIS_PRICE);

    // Slightly below the naive 1 SOL / price because of curve slippage
    let naive = result.ideal_amount.unwrap();
    assert!(result.free_token_amount < naive);
    assert!(result.free_token_amount > naive * 95 / 100);
    assert_eq!(result.real_amount, result.free_token_amount);
    assert!(result.slippage_pct.unwrap() > 0.0);
}

#[test]
fn test_target_inside_gap_between_orders() {
    let engine = CurveEngine::default();
    let config = ProtocolConfig::default();
    let walker = SegmentWalker::new(&engine, &config);

    let (p1, p2, p3, p4) = (at(980), at(1_000), at(1_050), at(1_100));
    let orders = OrderList::new(
        Direction::Up,
        vec![
            order("first", OrderType::Short, p1, p2, 30_000_000 * TOKEN_UNIT, Some("second")),
            order("second", OrderType::Short, p3, p4, 30_000_000 * TOKEN_UNIT, None),
        ],
    )
    .unwrap();

    let result = walker
        .simulate_token_buy(p2, 1_000_000 * TOKEN_UNIT, &orders, None)
        .unwrap();

    assert!(result.is_complete());
    assert_eq!(result.completion_rate, 100.0);
    assert_eq!(result.force_close_num, 0);
    assert!(!result.has_infinite_lp);
    assert!(result.end_price > p2 && result.end_price < p3);
    assert_eq!(result.free_token_amount, 1_000_000 * TOKEN_UNIT);
}

#[test]
fn test_crossing_first_order_force_closes_it() {
    let engine = CurveEngine::default();
    let config = ProtocolConfig::default();
    let walker = SegmentWalker::new(&engine, &config);

    let (p1, p2, p3, p4) = (at(1_000), at(1_010), at(1_050), at(1_100));
    let locked_tokens = 30_000_000 * TOKEN_UNIT;
    let orders = OrderList::new(
        Direction::Up,
        vec![
            order("first", OrderType::Short, p1, p2, locked_tokens, Some("second")),
            order("second", OrderType::Short, p3, p4, locked_tokens, None),
        ],
    )
    .unwrap();

    let target = 5_000_000 * TOKEN_UNIT;
    let result = walker.simulate_token_buy(p1, target, &orders, None).unwrap();

    assert!(result.is_complete());
    assert_eq!(result.force_close_num, 1);
    assert_eq!(result.force_close_orders, vec!["first".to_string()]);
    assert_eq!(result.locked_token_amount, locked_tokens);
    assert_eq!(result.total_token_amount(), locked_tokens + target);
    assert!(result.end_price > p2 && result.end_price < p3);

    let kinds: Vec<SegmentKind> = result.segments.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![SegmentKind::Gap, SegmentKind::Locked, SegmentKind::Gap]);
    assert!(!result.segments[0].is_valid);
}

#[test]
fn test_order_count_limit_on_back_to_back_orders() {
    let engine = CurveEngine::default();
    let config = ProtocolConfig {
        max_orders_count: 2,
        ..ProtocolConfig::default()
    };
    let walker = SegmentWalker::new(&engine, &config);

    let orders = OrderList::new(
        Direction::Up,
        vec![
            order("a", OrderType::Short, at(1_010), at(1_020), TOKEN_UNIT, Some("b")),
            order("b", OrderType::Short, at(1_020), at(1_030), TOKEN_UNIT, Some("c")),
            order("c", OrderType::Short, at(1_030), at(1_040), TOKEN_UNIT, None),
        ],
    )
    .unwrap();

    let result = walker
        .simulate_token_buy(GENESIS_PRICE, 100_000_000 * TOKEN_UNIT, &orders, None)
        .unwrap();

    assert_eq!(result.limit_reason, Some(LimitReason::OrderCountLimit));
    assert_eq!(result.force_close_num, 2);
    // Stopped at the near edge of the third order
    assert_eq!(result.end_price, at(1_030));
    assert!(result.completion_rate > 0.0 && result.completion_rate < 100.0);

    let suggested = result.suggested_amount.unwrap();
    assert_eq!(suggested, result.free_token_amount * 975 / 1_000);
}

#[test]
fn test_pass_order_in_the_middle() {
    let engine = CurveEngine::default();
    let config = ProtocolConfig::default();
    let walker = SegmentWalker::new(&engine, &config);

    let pass_tokens = 2_000_000 * TOKEN_UNIT;
    let orders = OrderList::new(
        Direction::Up,
        vec![
            order("a", OrderType::Short, at(1_010), at(1_020), 9 * TOKEN_UNIT, Some("mine")),
            order("mine", OrderType::Short, at(1_030), at(1_040), pass_tokens, Some("c")),
            order("c", OrderType::Short, at(1_200), at(1_300), 9 * TOKEN_UNIT, None),
        ],
    )
    .unwrap();

    let target = 20_000_000 * TOKEN_UNIT;
    let result = walker
        .simulate_token_buy(GENESIS_PRICE, target, &orders, Some("mine"))
        .unwrap();

    assert!(result.is_complete());
    assert_eq!(result.force_close_orders, vec!["a".to_string()]);
    assert_eq!(result.pass_order_index, Some(1));
    assert_eq!(result.free_token_amount, target);
    assert_eq!(result.locked_token_amount, 9 * TOKEN_UNIT);
    assert!(result.end_price > at(1_040) && result.end_price < at(1_200));

    let pass = result
        .segments
        .iter()
        .find(|s| s.kind == SegmentKind::Pass)
        .unwrap();
    assert_eq!(pass.token_amount, pass_tokens);
}

#[test]
fn test_sell_through_long_order() {
    let engine = CurveEngine::default();
    let config = ProtocolConfig::default();
    let walker = SegmentWalker::new(&engine, &config);

    let orders = OrderList::new(
        Direction::Down,
        vec![order("long", OrderType::Long, at(990), at(980), 7 * TOKEN_UNIT, None)],
    )
    .unwrap();

    let target = 30_000_000 * TOKEN_UNIT;
    let result = walker
        .simulate_token_sell(GENESIS_PRICE, target, &orders, None)
        .unwrap();

    assert!(result.is_complete());
    assert!(result.has_infinite_lp);
    assert_eq!(result.force_close_num, 1);
    assert_eq!(result.free_token_amount, target);
    assert_eq!(result.locked_sol_amount, LAMPORTS_PER_SOL);
    assert!(result.end_price < at(980));
    assert_eq!(result.real_amount, result.free_sol_amount);
}

#[test]
fn test_sol_out_sell_through_gaps_locked_and_pass_orders() {
    let engine = CurveEngine::default();
    let config = ProtocolConfig::default();
    let walker = SegmentWalker::new(&engine, &config);

    let orders = OrderList::new(
        Direction::Down,
        vec![
            order("a", OrderType::Long, at(990), at(980), 7 * TOKEN_UNIT, Some("mine")),
            order("mine", OrderType::Long, at(970), at(960), 35 * TOKEN_UNIT, Some("c")),
            order("c", OrderType::Long, at(900), at(850), 7 * TOKEN_UNIT, None),
        ],
    )
    .unwrap();

    // About 0.15 SOL sits between the current price and order a
    let small = LAMPORTS_PER_SOL / 10;
    let result = walker
        .simulate_sol_sell(GENESIS_PRICE, small, &orders, Some("mine"))
        .unwrap();
    assert!(result.is_complete());
    assert_eq!(result.target, TradeTarget::ExactOut(small));
    assert_eq!(result.force_close_num, 0);
    assert_eq!(result.pass_order_index, None);
    assert_eq!(result.free_sol_amount, small);
    assert!(result.end_price > at(990) && result.end_price < GENESIS_PRICE);
    assert_eq!(result.segments.len(), 1);

    // Two gaps (~0.30 SOL) and the pass order (1 SOL) fall short of 1.5 SOL,
    // the gap after the pass order supplies the rest
    let target = 3 * LAMPORTS_PER_SOL / 2;
    let result = walker
        .simulate_sol_sell(GENESIS_PRICE, target, &orders, Some("mine"))
        .unwrap();

    assert!(result.is_complete());
    assert_eq!(result.completion_rate, 100.0);
    assert!(!result.has_infinite_lp);
    assert_eq!(result.force_close_orders, vec!["a".to_string()]);
    assert_eq!(result.pass_order_index, Some(1));
    assert_eq!(result.free_sol_amount, target);
    assert_eq!(result.locked_sol_amount, LAMPORTS_PER_SOL);
    assert_eq!(result.locked_token_amount, 7 * TOKEN_UNIT);
    assert_eq!(result.real_amount, result.free_token_amount);
    assert!(result.free_token_amount > 35 * TOKEN_UNIT);
    assert!(result.end_price < at(960) && result.end_price > at(900));

    let kinds: Vec<SegmentKind> = result.segments.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SegmentKind::Gap,
            SegmentKind::Locked,
            SegmentKind::Gap,
            SegmentKind::Pass,
            SegmentKind::Gap,
        ]
    );
    let pass = &result.segments[3];
    assert_eq!(pass.sol_amount, LAMPORTS_PER_SOL);
    assert_eq!(pass.token_amount, 35 * TOKEN_UNIT);
}

#[test]
fn test_stale_orders_are_skipped() {
    let engine = CurveEngine::default();
    let config = ProtocolConfig {
        max_orders_count: 1,
        ..ProtocolConfig::default()
    };
    let walker = SegmentWalker::new(&engine, &config);

    let orders = OrderList::new(
        Direction::Up,
        vec![
            order("old", OrderType::Short, at(900), at(950), TOKEN_UNIT, Some("new")),
            order("new", OrderType::Short, at(1_100), at(1_200), TOKEN_UNIT, None),
        ],
    )
    .unwrap();

    let result = walker
        .simulate(GENESIS_PRICE, TradeTarget::ExactIn(LAMPORTS_PER_SOL), &orders, None)
        .unwrap();

    assert!(result.is_complete());
    assert_eq!(result.force_close_num, 0);
    assert_eq!(result.segments.len(), 1);
}

// ============================================================================
// Overlap Checker
// ============================================================================

#[test]
fn test_identical_interval_always_overlaps() {
    let config = ProtocolConfig::default();
    let orders = OrderList::new(
        Direction::Down,
        vec![
            order("a", OrderType::Long, at(990), at(950), TOKEN_UNIT, Some("b")),
            order("b", OrderType::Long, at(900), at(850), TOKEN_UNIT, None),
        ],
    )
    .unwrap();

    for o in orders.orders() {
        let check = check_overlap(&orders, o.lock_start_price, o.lock_end_price, &config).unwrap();
        assert!(!check.no_overlap);
        assert_eq!(check.reason, Some(OverlapReason::OrderRange));
        assert_eq!(check.reason.unwrap().to_string(), "overlaps with existing order range");
    }
}

// ============================================================================
// Stop-Loss Search
// ============================================================================

#[test]
fn test_long_stop_loss_converges_past_order_and_buffer() {
    let engine = CurveEngine::default();
    let config = ProtocolConfig::default();
    let search = StopLossSearch::new(&engine, &config);

    let orders = OrderList::new(
        Direction::Down,
        vec![order("blocker", OrderType::Long, at(905), at(895), TOKEN_UNIT, None)],
    )
    .unwrap();

    let placement = search
        .find_executable_price(
            OrderType::Long,
            GENESIS_PRICE,
            1_000_000 * TOKEN_UNIT,
            at(900),
            &orders,
        )
        .unwrap();

    assert!(placement.iterations > 1 && placement.iterations <= 10);
    // Below the order and its reservation buffer [885, 895]
    assert!(placement.executable_price < at(885));
    assert!(placement.end_price < placement.executable_price);
    assert!(placement.trade_amount > 0);
    assert_eq!(placement.prev_order_id.as_deref(), Some("blocker"));
    assert_eq!(placement.next_order_id, None);
    assert!(placement.percentage_from_current > 10.0);

    let check =
        check_overlap(&orders, placement.executable_price, placement.end_price, &config).unwrap();
    assert!(check.no_overlap);
}

#[test]
fn test_short_stop_loss_steps_up() {
    let engine = CurveEngine::default();
    let config = ProtocolConfig::default();
    let search = StopLossSearch::new(&engine, &config);

    let orders = OrderList::new(
        Direction::Up,
        vec![order("blocker", OrderType::Short, at(1_100), at(1_120), TOKEN_UNIT, None)],
    )
    .unwrap();

    let placement = search
        .find_executable_price(
            OrderType::Short,
            GENESIS_PRICE,
            1_000_000 * TOKEN_UNIT,
            at(1_105),
            &orders,
        )
        .unwrap();

    assert!(placement.iterations > 1);
    assert!(placement.executable_price >= at(1_140));
    assert!(placement.end_price > placement.executable_price);
    assert!(placement.implied_leverage > 1.0);
}

#[test]
fn test_stop_loss_iteration_cap() {
    let engine = CurveEngine::default();
    let config = ProtocolConfig {
        max_stop_loss_iterations: 2,
        ..ProtocolConfig::default()
    };
    let search = StopLossSearch::new(&engine, &config);

    let orders = OrderList::new(
        Direction::Down,
        vec![order("blocker", OrderType::Long, at(905), at(895), TOKEN_UNIT, None)],
    )
    .unwrap();

    let result = search.find_executable_price(
        OrderType::Long,
        GENESIS_PRICE,
        1_000_000 * TOKEN_UNIT,
        at(900),
        &orders,
    );
    assert_eq!(result, Err(LockCurveError::MaxIterationsReached(2)));
}
