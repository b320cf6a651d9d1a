//! Order Management Store and Write-Ahead Log.
//!
//! The durable, crash-recoverable core of a trading gateway: orders flow
//! in from a gateway, are appended to a binary write-ahead log, mutated
//! by execution reports and fills, and must survive process crashes with
//! exact state reconstruction.
//!
//! ## Modules
//! - [`types`]: the wire-adjacent domain types (`OrderState`,
//!   `PlaceOrderRequest`, `ExecutionReport`) and the order lifecycle
//!   constants.
//! - [`codec`]: pure encode/decode of the binary record payloads.
//! - [`store`]: [`store::OrderStore`], the concurrent in-memory index.
//! - [`wal`]: [`wal::OrderWal`], the append-only durable log and its
//!   replay protocol.
//! - [`config`]: TOML + environment configuration loading for
//!   [`wal::WalConfig`].
//! - [`errors`]: the crate's error enums.
//! - [`utils`]: operational ergonomics (tracing initialization).

pub mod codec;
pub mod config;
pub mod errors;
pub mod store;
pub mod types;
pub mod utils;
pub mod wal;

pub use errors::{ConfigError, WalError};
pub use store::OrderStore;
pub use types::{ExecutionReport, OrderState, OrderType, PlaceOrderRequest, Side, TimeInForce};
pub use wal::{OrderWal, WalConfig, WalEntryType, WalStats};

/// Open a WAL and replay it into `store` as a single fallible startup step.
///
/// Hosts wiring this crate up at process start have exactly one thing they
/// care about at that point: "did recovery succeed, and if not, why" — they
/// do not want to match on `WalError` versus `std::io::Error` separately for
/// what is conceptually one operation. This is the crate's one outward-facing
/// `anyhow::Result` boundary; every internal mutator keeps its concrete error
/// type (or, for `OrderStore`, no `Result` at all per spec.md §7).
pub fn open_and_recover(config: WalConfig, store: &OrderStore) -> anyhow::Result<OrderWal> {
    let wal = OrderWal::open(config)?;
    wal.replay_into(store)?;
    Ok(wal)
}

/// Convenience re-exports for consumers of this crate.
pub mod prelude {
    pub use crate::codec;
    pub use crate::config;
    pub use crate::errors::{ConfigError, WalError};
    pub use crate::store::OrderStore;
    pub use crate::types::{
        is_terminal, ExecutionReport, OrderState, OrderType, PlaceOrderRequest, Side, TimeInForce,
    };
    pub use crate::utils::init_tracing;
    pub use crate::wal::{OrderWal, WalConfig, WalEntryType, WalStats};
}
