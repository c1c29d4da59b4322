//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Plain-text renderings of engine state for terminal output. Every function returns a String and
// never touches the engine, so callers decide where the text goes.
//
// | Function            | Output                                                               |
// |---------------------|----------------------------------------------------------------------|
// | render_book         | Vertical ladder: asks above the spread line, bids below              |
// | render_depth        | Cumulative size per level for both sides                             |
// | render_trades       | Trade table, newest first                                            |
// | render_order        | One resting order                                                    |
// | render_trade        | One executed trade                                                   |
// | render_add_result   | Trades and level changes caused by one submission                    |
// | render_load_summary | Counts from a bulk load                                              |
// | render_outcome      | Dispatches on a CommandOutcome                                       |
//--------------------------------------------------------------------------------------------------

use crate::domain::models::types::{Order, Side, Trade};
use crate::domain::services::matching_engine::AddOrderResult;
use crate::domain::services::orderbook::{DepthSnapshot, LevelSnapshot};
use crate::inbounds::commands::{CommandOutcome, HELP};
use crate::inbounds::LoadSummary;

const RULE_WIDTH: usize = 40;

fn level_row(level: &LevelSnapshot) -> String {
    let label = match level.side {
        Side::Bid => "BID",
        Side::Ask => "ASK",
    };
    format!(
        "{label:<4}{:>14}{:>14}{:>8}",
        level.price.to_string(),
        level.total_size.to_string(),
        level.order_count()
    )
}

fn spread_rule(depth: &DepthSnapshot) -> String {
    let label = match depth.spread() {
        Some(spread) => format!(" spread {spread} "),
        None => " spread n/a ".to_string(),
    };
    format!("{label:-^width$}", width = RULE_WIDTH)
}

pub fn render_book(depth: &DepthSnapshot) -> String {
    let mut lines = vec![format!("{:<4}{:>14}{:>14}{:>8}", "", "PRICE", "SIZE", "ORDERS")];

    if depth.asks.is_empty() {
        lines.push("(no asks)".to_string());
    }
    lines.extend(depth.asks.iter().rev().map(level_row));
    lines.push(spread_rule(depth));
    lines.extend(depth.bids.iter().map(level_row));
    if depth.bids.is_empty() {
        lines.push("(no bids)".to_string());
    }

    lines.join("\n")
}

pub fn render_depth(depth: &DepthSnapshot) -> String {
    let mut lines = vec![format!("{:<4}{:>14}{:>14}{:>14}", "", "PRICE", "SIZE", "CUMULATIVE")];
    for (label, side) in [("ASK", Side::Ask), ("BID", Side::Bid)] {
        let levels = depth.cumulative(side);
        if levels.is_empty() {
            lines.push(format!("{label:<4}(empty)"));
        }
        lines.extend(levels.iter().map(|level| {
            format!(
                "{label:<4}{:>14}{:>14}{:>14}",
                level.price.to_string(),
                level.size.to_string(),
                level.cumulative_size.to_string()
            )
        }));
    }
    if let Some(mid) = depth.mid_price() {
        lines.push(format!("mid {mid}"));
    }
    lines.join("\n")
}

pub fn render_trades(trades: &[Trade]) -> String {
    if trades.is_empty() {
        return "no trades".to_string();
    }
    let mut lines = vec![format!(
        "{:<36}  {:>12}  {:>12}  {:<10}  {:<10}",
        "TRADE", "PRICE", "SIZE", "BUYER", "SELLER"
    )];
    lines.extend(trades.iter().map(|trade| {
        format!(
            "{:<36}  {:>12}  {:>12}  {:<10}  {:<10}",
            trade.id.to_string(),
            trade.price.to_string(),
            trade.size.to_string(),
            trade.buy_user_id,
            trade.sell_user_id
        )
    }));
    lines.join("\n")
}

pub fn render_order(order: &Order) -> String {
    format!(
        "order {} user={} side={} price={} remaining={}/{} seq={}",
        order.id,
        order.user_id,
        order.side,
        order.price,
        order.remaining_size,
        order.initial_size,
        order.sequence_id
    )
}

pub fn render_trade(trade: &Trade) -> String {
    format!(
        "trade {} {} @ {} buy={} ({}) sell={} ({}) at {}",
        trade.id,
        trade.size,
        trade.price,
        trade.buy_order_id,
        trade.buy_user_id,
        trade.sell_order_id,
        trade.sell_user_id,
        trade.created_at.to_rfc3339()
    )
}

pub fn render_add_result(order_id: &str, result: &AddOrderResult) -> String {
    let mut lines = vec![format!(
        "order {order_id} accepted with {} trade(s)",
        result.trades.len()
    )];
    lines.extend(result.trades.iter().map(|id| format!("  trade {id}")));
    lines.extend(result.level_changes.iter().map(|change| {
        if change.is_removal() {
            format!("  {} {} removed", change.side, change.price)
        } else {
            format!("  {} {} -> {}", change.side, change.price, change.size)
        }
    }));
    lines.join("\n")
}

pub fn render_load_summary(summary: &LoadSummary) -> String {
    format!(
        "loaded {} order(s), {} trade(s) executed, {} resting",
        summary.orders_loaded,
        summary.trades_executed,
        summary.engine.order_count()
    )
}

pub fn render_outcome(outcome: &CommandOutcome) -> String {
    match outcome {
        CommandOutcome::Placed { order_id, result } => render_add_result(order_id, result),
        CommandOutcome::Rejected(err) => format!("rejected: {err}"),
        CommandOutcome::Cancelled { order_id, change } => match change {
            Some(change) if change.is_removal() => {
                format!("cancelled {order_id}; {} {} removed", change.side, change.price)
            }
            Some(change) => format!(
                "cancelled {order_id}; {} {} -> {}",
                change.side, change.price, change.size
            ),
            None => format!("no resting order {order_id}"),
        },
        CommandOutcome::OrderFound(Some(order)) => render_order(order),
        CommandOutcome::OrderFound(None) => "order not found".to_string(),
        CommandOutcome::TradeFound(Some(trade)) => render_trade(trade),
        CommandOutcome::TradeFound(None) => "trade not found".to_string(),
        CommandOutcome::Book(depth) => render_book(depth),
        CommandOutcome::Depth(depth) => render_depth(depth),
        CommandOutcome::Trades(trades) => render_trades(trades),
        CommandOutcome::Help => HELP.to_string(),
        CommandOutcome::Quit => "bye".to_string(),
    }
}
