//! Error types for the order store and its write-ahead log.
//!
//! Mirrors the domain-specific error enums in the teacher's `core::errors`
//! module: narrow, `thiserror`-derived types per failing subsystem rather
//! than one grab-bag error. Neither `OrderStore` nor `OrderWal::write_entry`
//! return a `Result` at all (see module docs) — these enums cover the two
//! places this crate's public API can actually fail: opening/rotating a WAL
//! directory, and loading configuration.

use std::path::PathBuf;

/// Errors that can occur opening or rotating the write-ahead log.
#[derive(Debug, thiserror::Error)]
pub enum WalError {
    #[error("wal io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("wal directory is not usable: {0}")]
    InvalidDirectory(PathBuf),
}

/// Errors that can occur loading or validating a [`crate::wal::WalConfig`]
/// value via [`crate::config::load`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
