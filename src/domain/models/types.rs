//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module defines the core value types used throughout the matching engine:
// the side of the book, resting orders, executed trades and the typed order submission.
//
// | Section            | Description                                                      |
// |--------------------|------------------------------------------------------------------|
// | ALIASES            | Price, size and identifier types.                                |
// | ENUMS              | Side of the book.                                                |
// | STRUCTS            | Order, Trade and OrderRequest.                                   |
// | TESTS              | Contains unit tests for the defined types.                       |
//--------------------------------------------------------------------------------------------------

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

//--------------------------------------------------------------------------------------------------
//  ALIASES
//--------------------------------------------------------------------------------------------------
// | Name          | Description                                            |
// |---------------|--------------------------------------------------------|
// | Price         | Exact decimal price, also the price level key.         |
// | Size          | Exact decimal quantity.                                |
// | OrderId       | Client supplied order identifier.                      |
// | UserId        | Identifier of the user owning an order.                |
// | TradeId       | Engine minted trade identifier.                        |
//--------------------------------------------------------------------------------------------------

/// Price of an order or trade. Compared exactly, never with a tolerance.
pub type Price = Decimal;

/// Quantity of an order or trade.
pub type Size = Decimal;

/// Identifier chosen by whoever submits the order.
pub type OrderId = String;

/// Identifier of the user owning an order.
pub type UserId = String;

/// Identifier minted by the engine for every trade.
pub type TradeId = Uuid;

//--------------------------------------------------------------------------------------------------
//  ENUMS
//--------------------------------------------------------------------------------------------------

/// Represents the side of an order (Buy or Sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// A buy order, resting on the bid side.
    #[serde(rename = "buy", alias = "bid")]
    Bid,
    /// A sell order, resting on the ask side.
    #[serde(rename = "sell", alias = "ask")]
    Ask,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Self::Bid => Self::Ask,
            Self::Ask => Self::Bid,
        }
    }

    /// Wire name of the side, as used in flat order records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bid => "buy",
            Self::Ask => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a side cannot be parsed from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid side specified: {0}")]
pub struct ParseSideError(pub String);

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" | "bid" => Ok(Self::Bid),
            "sell" | "ask" => Ok(Self::Ask),
            _ => Err(ParseSideError(s.to_string())),
        }
    }
}

//--------------------------------------------------------------------------------------------------
//  STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name          | Description                                                  |
// |---------------|--------------------------------------------------------------|
// | OrderRequest  | Typed submission, validated before any Order exists.         |
// | Order         | A limit order, resting or about to rest.                     |
// | Trade         | An execution between a buy and a sell order.                 |
//--------------------------------------------------------------------------------------------------

/// A limit order submission.
///
/// Every field is required; an empty id or user id, or a price or size that is
/// not strictly positive, is rejected by the engine before anything changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub id: OrderId,
    pub user_id: UserId,
    pub side: Side,
    pub price: Price,
    pub size: Size,
}

impl OrderRequest {
    pub fn new(
        id: impl Into<OrderId>,
        user_id: impl Into<UserId>,
        side: Side,
        price: Price,
        size: Size,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            side,
            price,
            size,
        }
    }

    /// Shorthand for a buy submission.
    pub fn buy(
        id: impl Into<OrderId>,
        user_id: impl Into<UserId>,
        price: Price,
        size: Size,
    ) -> Self {
        Self::new(id, user_id, Side::Bid, price, size)
    }

    /// Shorthand for a sell submission.
    pub fn sell(
        id: impl Into<OrderId>,
        user_id: impl Into<UserId>,
        price: Price,
        size: Size,
    ) -> Self {
        Self::new(id, user_id, Side::Ask, price, size)
    }
}

/// A limit order known to the engine.
///
/// Only `remaining_size` changes after creation, and only through fills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Identifier supplied with the submission.
    pub id: OrderId,
    /// User that placed the order.
    pub user_id: UserId,
    /// Side of the order (Buy or Sell).
    pub side: Side,
    /// Limit price. The order rests at exactly this price.
    pub price: Price,
    /// Size at submission.
    pub initial_size: Size,
    /// Size still open; 0 <= remaining_size <= initial_size.
    pub remaining_size: Size,
    /// Arrival sequence assigned by the engine, used for time priority.
    pub sequence_id: u64,
    /// Wall clock time of acceptance.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Builds a fresh, unfilled order from an already validated request.
    pub fn from_request(request: OrderRequest, sequence_id: u64) -> Self {
        Self {
            id: request.id,
            user_id: request.user_id,
            side: request.side,
            price: request.price,
            initial_size: request.size,
            remaining_size: request.size,
            sequence_id,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn filled_size(&self) -> Size {
        self.initial_size - self.remaining_size
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.remaining_size.is_zero()
    }
}

/// Represents a completed trade resulting from matching two orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique identifier for the trade.
    pub id: TradeId,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buy_user_id: UserId,
    pub sell_user_id: UserId,
    /// Execution price, always the resting order's price.
    pub price: Price,
    pub size: Size,
    /// Timestamp when the trade occurred.
    pub created_at: DateTime<Utc>,
}

impl Trade {
    pub fn new(buy_order: &Order, sell_order: &Order, price: Price, size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            buy_order_id: buy_order.id.clone(),
            sell_order_id: sell_order.id.clone(),
            buy_user_id: buy_order.user_id.clone(),
            sell_user_id: sell_order.user_id.clone(),
            price,
            size,
            created_at: Utc::now(),
        }
    }

    /// Notional value of the execution, or `None` if it does not fit in a `Decimal`.
    #[inline]
    pub fn notional(&self) -> Option<Decimal> {
        self.price.checked_mul(self.size)
    }
}

//--------------------------------------------------------------------------------------------------
//  TESTS
//--------------------------------------------------------------------------------------------------
// | Name                       | Description                                      |
// |----------------------------|--------------------------------------------------|
// | test_side_parsing          | Side accepts buy/sell and bid/ask in any case.   |
// | test_side_serde            | Side serializes to its wire name.                |
// | test_order_from_request    | Fresh orders are unfilled.                       |
// | test_trade_creation        | Trade copies both counterparties.                |
//--------------------------------------------------------------------------------------------------
