//! Wire-adjacent domain types consumed and produced at the edges of this
//! crate: requests from the upstream gateway, execution reports from the
//! venue adapter, and the order snapshots this crate hands back.
//!
//! Grounded on the teacher's `execution::types` module (`Order`, `Fill`,
//! `Side`), but reworked to the string-keyed, `f64`-valued model the wire
//! format in [`crate::codec`] requires — this crate has no fixed-point hot
//! path to protect, so there is no reason to pay fixed-point's complexity.

use serde::{Deserialize, Serialize};

/// Order side. The numeric discriminant is part of the WAL wire contract —
/// do not renumber without bumping [`crate::codec::CURRENT_VERSION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    Buy = 0,
    Sell = 1,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order type. Wire tag, see [`Side`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum OrderType {
    Limit = 0,
    Market = 1,
}

impl OrderType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(OrderType::Limit),
            1 => Some(OrderType::Market),
            _ => None,
        }
    }
}

/// Time-in-force. Wire tag, see [`Side`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TimeInForce {
    GTC = 0,
    IOC = 1,
    FOK = 2,
}

impl TimeInForce {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(TimeInForce::GTC),
            1 => Some(TimeInForce::IOC),
            2 => Some(TimeInForce::FOK),
            _ => None,
        }
    }
}

/// A new-order request as it arrives from the upstream gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub client_order_id: String,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub tif: TimeInForce,
    pub qty: f64,
    pub price: Option<f64>,
}

/// A fill/status report as it arrives from the downstream venue adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub client_order_id: String,
    pub venue_order_id: String,
    pub symbol: String,
    pub status: String,
    pub last_fill_qty: f64,
    pub last_fill_price: f64,
    pub ts_recv_ns: i64,
}

/// Terminal lifecycle states. Once in one of these, [`OrderState::status`]
/// does not change (spec I3 / P4).
pub const STATUS_FILLED: &str = "FILLED";
pub const STATUS_CANCELED: &str = "CANCELED";
pub const STATUS_REJECTED: &str = "REJECTED";
pub const STATUS_EXPIRED: &str = "EXPIRED";
pub const STATUS_NEW: &str = "NEW";
pub const STATUS_PARTIALLY_FILLED: &str = "PARTIALLY_FILLED";

pub fn is_terminal(status: &str) -> bool {
    matches!(
        status,
        STATUS_FILLED | STATUS_CANCELED | STATUS_REJECTED | STATUS_EXPIRED
    )
}

/// Floating-point slack absorbing fill-accounting drift (spec I1).
pub const QTY_EPSILON: f64 = 1e-12;

/// The unit of mutable order state, keyed by `client_order_id` (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderState {
    pub client_order_id: String,
    pub symbol: String,
    pub side: String,
    pub order_qty: Option<f64>,
    pub limit_price: Option<f64>,
    pub executed_qty: f64,
    pub avg_price: f64,
    pub venue_order_id: String,
    pub status: String,
    pub reason: String,
    pub created_ts_ns: i64,
    pub last_ts_ns: i64,
}

impl OrderState {
    /// A freshly-created record for a `client_order_id` the store has not
    /// seen before. All mutators create lazily via this constructor.
    pub fn new(client_order_id: String) -> Self {
        Self {
            client_order_id,
            symbol: String::new(),
            side: String::new(),
            order_qty: None,
            limit_price: None,
            executed_qty: 0.0,
            avg_price: 0.0,
            venue_order_id: String::new(),
            status: String::new(),
            reason: String::new(),
            created_ts_ns: 0,
            last_ts_ns: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        is_terminal(&self.status)
    }
}
