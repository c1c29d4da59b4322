use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use super::inbound_error::CommandError;
use crate::config::Config;
use crate::domain::models::types::{
    Order, OrderId, OrderRequest, Price, Side, Size, Trade, TradeId, UserId,
};
use crate::domain::services::matching_engine::{
    AddOrderResult, LevelChange, MatchingEngine, MatchingError,
};
use crate::domain::services::orderbook::DepthSnapshot;

/// +----------------------------------------------------------+
/// | STRUCTS | TRAITS | ENUMS | FUNCTIONS                     |
/// +----------+-------+-------+------------------------------+
/// | Enums:                                                   |
/// |   - Command                                              |
/// |   - CommandOutcome                                       |
/// | Structs:                                                 |
/// |   - OrderEntry                                           |
/// +----------------------------------------------------------+

pub const HELP: &str = "\
commands:
  buy <price> <size> [user]    place a bid
  sell <price> <size> [user]   place an ask
  cancel <order-id>            remove a resting order
  order <order-id>             show a resting order
  trade <trade-id>             show an executed trade
  book [levels]                show the top of the book
  depth [levels]               show cumulative depth
  trades [count]               show the most recent trades
  help                         show this message
  quit                         leave the session";

/// One line of interactive order entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Place {
        side: Side,
        price: Price,
        size: Size,
        user_id: Option<UserId>,
    },
    Cancel { order_id: OrderId },
    Order { order_id: OrderId },
    Trade { trade_id: TradeId },
    Book { levels: Option<usize> },
    Depth { levels: Option<usize> },
    Trades { count: Option<usize> },
    Help,
    Quit,
}

fn decimal_arg(value: Option<&str>, name: &'static str) -> Result<Decimal, CommandError> {
    let value = value.ok_or(CommandError::MissingArgument(name))?;
    Decimal::from_str(value).map_err(|_| CommandError::InvalidArgument {
        name,
        value: value.to_string(),
    })
}

fn count_arg(value: Option<&str>, name: &'static str) -> Result<Option<usize>, CommandError> {
    value
        .map(|value| {
            value.parse::<usize>().map_err(|_| CommandError::InvalidArgument {
                name,
                value: value.to_string(),
            })
        })
        .transpose()
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let keyword = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();

        let command = match keyword.as_str() {
            "buy" | "bid" | "sell" | "ask" => {
                let side = keyword
                    .parse::<Side>()
                    .map_err(|_| CommandError::Unknown(keyword.clone()))?;
                let price = decimal_arg(words.next(), "price")?;
                let size = decimal_arg(words.next(), "size")?;
                let user_id = words.next().map(str::to_string);
                Command::Place {
                    side,
                    price,
                    size,
                    user_id,
                }
            }
            "cancel" => Command::Cancel {
                order_id: words
                    .next()
                    .ok_or(CommandError::MissingArgument("order id"))?
                    .to_string(),
            },
            "order" => Command::Order {
                order_id: words
                    .next()
                    .ok_or(CommandError::MissingArgument("order id"))?
                    .to_string(),
            },
            "trade" => {
                let raw = words.next().ok_or(CommandError::MissingArgument("trade id"))?;
                let trade_id = Uuid::parse_str(raw).map_err(|_| CommandError::InvalidArgument {
                    name: "trade id",
                    value: raw.to_string(),
                })?;
                Command::Trade { trade_id }
            }
            "book" => Command::Book {
                levels: count_arg(words.next(), "levels")?,
            },
            "depth" => Command::Depth {
                levels: count_arg(words.next(), "levels")?,
            },
            "trades" => Command::Trades {
                count: count_arg(words.next(), "count")?,
            },
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(keyword)),
        };
        Ok(command)
    }
}

/// Result of executing a command against an engine.
#[derive(Debug, Clone)]
pub enum CommandOutcome {
    Placed {
        order_id: OrderId,
        result: AddOrderResult,
    },
    Rejected(MatchingError),
    Cancelled {
        order_id: OrderId,
        change: Option<LevelChange>,
    },
    OrderFound(Option<Order>),
    TradeFound(Option<Trade>),
    Book(DepthSnapshot),
    Depth(DepthSnapshot),
    Trades(Vec<Trade>),
    Help,
    Quit,
}

/// Executes commands, filling in session defaults.
#[derive(Debug, Clone)]
pub struct OrderEntry {
    default_user: UserId,
    book_levels: usize,
    recent_trades: usize,
}

impl OrderEntry {
    pub fn new(config: &Config) -> Self {
        Self {
            default_user: config.default_user.clone(),
            book_levels: config.book_levels,
            recent_trades: config.recent_trades,
        }
    }

    pub fn execute(&self, engine: &mut MatchingEngine, command: Command) -> CommandOutcome {
        match command {
            Command::Place {
                side,
                price,
                size,
                user_id,
            } => {
                let order_id = Uuid::new_v4().to_string();
                let user_id = user_id.unwrap_or_else(|| self.default_user.clone());
                let request = OrderRequest::new(order_id.clone(), user_id, side, price, size);

                match engine.add_order(request) {
                    Ok(result) => {
                        info!(
                            order_id = %order_id,
                            %side,
                            %price,
                            %size,
                            trades = result.trades.len(),
                            "order placed"
                        );
                        CommandOutcome::Placed { order_id, result }
                    }
                    Err(err) => {
                        warn!(error = %err, "order rejected");
                        CommandOutcome::Rejected(err)
                    }
                }
            }
            Command::Cancel { order_id } => {
                let change = engine.remove_order(&order_id);
                CommandOutcome::Cancelled { order_id, change }
            }
            Command::Order { order_id } => {
                CommandOutcome::OrderFound(engine.get_order_by_id(&order_id).cloned())
            }
            Command::Trade { trade_id } => {
                CommandOutcome::TradeFound(engine.get_trade_by_id(&trade_id).cloned())
            }
            Command::Book { levels } => {
                CommandOutcome::Book(engine.depth(levels.unwrap_or(self.book_levels)))
            }
            Command::Depth { levels } => {
                CommandOutcome::Depth(engine.depth(levels.unwrap_or(self.book_levels)))
            }
            Command::Trades { count } => CommandOutcome::Trades(
                engine
                    .get_recent_trades(count.unwrap_or(self.recent_trades))
                    .into_iter()
                    .cloned()
                    .collect(),
            ),
            Command::Help => CommandOutcome::Help,
            Command::Quit => CommandOutcome::Quit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry() -> OrderEntry {
        OrderEntry::new(&Config::default())
    }

    #[test]
    fn test_parse_place() {
        assert_eq!(
            "BUY 100.5 3".parse::<Command>().unwrap(),
            Command::Place {
                side: Side::Bid,
                price: dec!(100.5),
                size: dec!(3),
                user_id: None,
            }
        );
        assert_eq!(
            "sell 101 2 alice".parse::<Command>().unwrap(),
            Command::Place {
                side: Side::Ask,
                price: dec!(101),
                size: dec!(2),
                user_id: Some("alice".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_queries() {
        assert_eq!("book".parse::<Command>().unwrap(), Command::Book { levels: None });
        assert_eq!("depth 3".parse::<Command>().unwrap(), Command::Depth { levels: Some(3) });
        assert_eq!("trades 7".parse::<Command>().unwrap(), Command::Trades { count: Some(7) });
        assert_eq!(
            "cancel abc".parse::<Command>().unwrap(),
            Command::Cancel {
                order_id: "abc".to_string()
            }
        );
        assert_eq!("exit".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>().unwrap_err(), CommandError::Empty);
        assert_eq!("buy".parse::<Command>().unwrap_err(), CommandError::MissingArgument("price"));
        assert_eq!("buy 10".parse::<Command>().unwrap_err(), CommandError::MissingArgument("size"));
        assert!(matches!(
            "sell ten 1".parse::<Command>().unwrap_err(),
            CommandError::InvalidArgument { name: "price", .. }
        ));
        assert!(matches!(
            "trade not-a-uuid".parse::<Command>().unwrap_err(),
            CommandError::InvalidArgument { name: "trade id", .. }
        ));
        assert_eq!(
            "launch".parse::<Command>().unwrap_err(),
            CommandError::Unknown("launch".to_string())
        );
    }

    #[test]
    fn test_execute_place_and_match() {
        let mut engine = MatchingEngine::new();
        let entry = entry();

        let outcome = entry.execute(&mut engine, "sell 100 5 alice".parse().unwrap());
        let resting_id = match outcome {
            CommandOutcome::Placed { order_id, result } => {
                assert!(result.trades.is_empty());
                order_id
            }
            other => panic!("unexpected outcome: {other:?}"),
        };
        assert_eq!(engine.get_order_by_id(&resting_id).unwrap().user_id, "alice");

        match entry.execute(&mut engine, "buy 100 2".parse().unwrap()) {
            CommandOutcome::Placed { order_id, result } => {
                assert_eq!(result.trades.len(), 1);
                assert!(engine.get_order_by_id(&order_id).is_none());
                let trade = engine.get_trade_by_id(&result.trades[0]).unwrap();
                assert_eq!(trade.buy_user_id, Config::default().default_user);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_execute_rejects_zero_size() {
        let mut engine = MatchingEngine::new();
        let outcome = entry().execute(&mut engine, "buy 100 0".parse().unwrap());
        assert!(matches!(outcome, CommandOutcome::Rejected(MatchingError::InvalidOrder(_))));
        assert_eq!(engine.order_count(), 0);
    }

    #[test]
    fn test_execute_cancel_unknown_is_noop() {
        let mut engine = MatchingEngine::new();
        match entry().execute(&mut engine, "cancel ghost".parse().unwrap()) {
            CommandOutcome::Cancelled { order_id, change } => {
                assert_eq!(order_id, "ghost");
                assert!(change.is_none());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
