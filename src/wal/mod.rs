//! The append-only write-ahead log: durable records with per-entry
//! headers and CRC, file rotation by size, checkpointing, and the replay
//! protocol that reconstructs an [`crate::store::OrderStore`].
//!
//! Grounded on the teacher's `execution::journal::AsyncJournal` for the
//! overall shape (a guarded mutable writer state plus a stats struct),
//! generalized from its JSON-lines/channel design to the synchronous,
//! fixed-header binary framing this format requires — sourced from the
//! WAL-shaped reference implementations in the wider pack (mmap-backed
//! record scanners using the same `[header][payload]`, `crc32fast`-checked
//! layout). The WAL is owned by a single writer thread at a time; its
//! mutable state is guarded by one `parking_lot::Mutex`, matching the
//! teacher's preference for `parking_lot` over `std::sync` everywhere it
//! guards hot concurrent state.

mod config;
mod header;

pub use config::WalConfig;
pub use header::WalEntryType;

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use tracing::warn;

use crate::codec::{self, crc32};
use crate::errors::WalError;
use crate::store::OrderStore;
use crate::types::{OrderType, PlaceOrderRequest, Side, TimeInForce, STATUS_CANCELED};
use header::{encode_header, RecordHeader, HEADER_SIZE};

fn wall_clock_ns() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0)
}

fn filename_for(prefix: &str, sequence: u64) -> String {
    format!("{prefix}_{sequence:016x}.wal")
}

/// Strictly parse `<prefix>_<16-hex-digits>.wal`; any deviation — wrong
/// prefix, wrong length, non-hex digits, wrong extension — is rejected,
/// which causes the file to be ignored during startup/replay scanning.
fn parse_filename(name: &str, prefix: &str) -> Option<u64> {
    let stem = name.strip_suffix(".wal")?;
    let hex = stem.strip_prefix(prefix)?.strip_prefix('_')?;
    if hex.len() != 16 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(hex, 16).ok()
}

fn list_wal_files(directory: &Path, prefix: &str) -> io::Result<Vec<(u64, PathBuf)>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(seq) = parse_filename(name, prefix) {
            out.push((seq, entry.path()));
        }
    }
    out.sort_by_key(|(seq, _)| *seq);
    Ok(out)
}

fn open_for_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).read(true).open(path)
}

/// Point-in-time counters exposed by [`OrderWal::stats`].
#[derive(Debug, Clone, Default)]
pub struct WalStats {
    pub entries_written: u64,
    pub bytes_written: u64,
    pub entries_replayed: u64,
    pub bytes_replayed: u64,
    pub rotations: u64,
    pub checkpoints: u64,
    pub corrupted_entries: u64,
    pub current_sequence: u64,
}

struct WalState {
    file: File,
    file_path: PathBuf,
    file_size: u64,
    sequence: u64,
    healthy: bool,
    last_error: Option<String>,
    entries_since_checkpoint: u64,
    stats: WalStats,
}

/// Durable append-only log over a directory of `<prefix>_<hex16>.wal`
/// files.
pub struct OrderWal {
    config: WalConfig,
    state: Mutex<WalState>,
}

impl OrderWal {
    /// Open (or create) a WAL over `config.directory`. Scans existing
    /// files to resume the sequence counter and appends to the most
    /// recent one, per spec.md §4.3 "Startup".
    pub fn open(config: WalConfig) -> Result<Self, WalError> {
        let meta = fs::metadata(&config.directory)
            .map_err(|_| WalError::InvalidDirectory(config.directory.clone()))?;
        if !meta.is_dir() {
            return Err(WalError::InvalidDirectory(config.directory.clone()));
        }

        let files = list_wal_files(&config.directory, &config.file_prefix)?;
        let (sequence, path) = match files.last() {
            Some((seq, path)) => (*seq, path.clone()),
            None => {
                let path = config.directory.join(filename_for(&config.file_prefix, 1));
                (0, path)
            }
        };
        let file = open_for_append(&path)?;
        let file_size = file.metadata()?.len();

        Ok(Self {
            config,
            state: Mutex::new(WalState {
                file,
                file_path: path,
                file_size,
                sequence,
                healthy: true,
                last_error: None,
                entries_since_checkpoint: 0,
                stats: WalStats {
                    current_sequence: sequence,
                    ..Default::default()
                },
            }),
        })
    }

    pub fn is_healthy(&self) -> bool {
        self.state.lock().healthy
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    pub fn stats(&self) -> WalStats {
        self.state.lock().stats.clone()
    }

    /// Sync the current file handle early. Not required for correctness
    /// (`Drop` below performs the same sync unconditionally) but gives
    /// callers a deterministic point to log a clean shutdown from, and
    /// surfaces the `io::Error` `Drop` has no way to return.
    pub fn close(&self) -> io::Result<()> {
        let state = self.state.lock();
        state.file.sync_all()
    }

    fn rotate_if_due(state: &mut WalState, config: &WalConfig) -> io::Result<()> {
        if state.file_size < config.max_file_size {
            return Ok(());
        }
        if config.sync_on_write {
            state.file.sync_all()?;
        }
        let next_seq = state.sequence + 1;
        let path = config.directory.join(filename_for(&config.file_prefix, next_seq));
        let file = open_for_append(&path)?;
        state.file = file;
        state.file_path = path;
        state.file_size = 0;
        state.stats.rotations += 1;
        Ok(())
    }

    fn append_record(state: &mut WalState, config: &WalConfig, entry_type: u8, payload: &[u8]) -> io::Result<u64> {
        let sequence = state.sequence + 1;
        let timestamp_ns = wall_clock_ns();
        let checksum = crc32(payload);
        let header = encode_header(entry_type, sequence, timestamp_ns, payload.len() as u32, checksum);

        state.file.write_all(&header)?;
        state.file.write_all(payload)?;
        if config.sync_on_write {
            state.file.sync_all()?;
        }

        let written = (HEADER_SIZE + payload.len()) as u64;
        state.file_size += written;
        state.sequence = sequence;
        state.entries_since_checkpoint += 1;
        state.stats.current_sequence = sequence;
        state.stats.entries_written += 1;
        state.stats.bytes_written += written;
        Ok(sequence)
    }

    /// Append one record. If the WAL is unhealthy, no-ops and returns the
    /// current sequence unchanged. On any I/O failure, marks the WAL
    /// unhealthy and returns the sequence as of the last successful
    /// write — the caller can reason about durability from this value.
    pub fn write_entry(&self, entry_type: u8, payload: &[u8]) -> u64 {
        let mut state = self.state.lock();
        if !state.healthy {
            return state.stats.current_sequence;
        }
        let result = Self::rotate_if_due(&mut state, &self.config)
            .and_then(|_| Self::append_record(&mut state, &self.config, entry_type, payload));
        match result {
            Ok(seq) => seq,
            Err(err) => {
                warn!(error = %err, "wal write failed, marking unhealthy");
                state.healthy = false;
                state.last_error = Some(err.to_string());
                state.stats.current_sequence
            }
        }
    }

    pub fn log_order_new(&self, req: &PlaceOrderRequest) -> u64 {
        let mut payload = Vec::new();
        codec::encode_place_order_request(&mut payload, req);
        self.write_entry(WalEntryType::OrderNew as u8, &payload)
    }

    pub fn log_order_update(
        &self,
        client_order_id: &str,
        venue_order_id: &str,
        status: &str,
        reason: &str,
        ts_ns: i64,
    ) -> u64 {
        let mut payload = Vec::new();
        codec::encode_order_update(
            &mut payload,
            &codec::OrderUpdatePayload {
                client_order_id: client_order_id.to_string(),
                venue_order_id: venue_order_id.to_string(),
                status: status.to_string(),
                reason: reason.to_string(),
                ts_ns,
            },
        );
        self.write_entry(WalEntryType::OrderUpdate as u8, &payload)
    }

    pub fn log_order_fill(&self, client_order_id: &str, symbol: &str, qty: f64, price: f64, ts_ns: i64) -> u64 {
        let mut payload = Vec::new();
        codec::encode_order_fill(
            &mut payload,
            &codec::OrderFillPayload {
                client_order_id: client_order_id.to_string(),
                symbol: symbol.to_string(),
                qty,
                price,
                ts_ns,
            },
        );
        self.write_entry(WalEntryType::OrderFill as u8, &payload)
    }

    pub fn log_order_cancel(&self, client_order_id: &str, reason: &str, ts_ns: i64) -> u64 {
        let mut payload = Vec::new();
        codec::encode_order_cancel(
            &mut payload,
            &codec::OrderCancelPayload {
                client_order_id: client_order_id.to_string(),
                reason: reason.to_string(),
                ts_ns,
            },
        );
        self.write_entry(WalEntryType::OrderCancel as u8, &payload)
    }

    /// Serialize `store.list()` as a `Checkpoint` record and reset the
    /// since-checkpoint counter. Checkpoints are ordinary records in the
    /// sequence — subject to the same rotation/health rules as any other
    /// write — not a separate file header.
    pub fn write_checkpoint(&self, store: &OrderStore) -> u64 {
        let snapshot = store.list();
        let mut payload = Vec::new();
        codec::encode_checkpoint(&mut payload, &snapshot);
        let seq = self.write_entry(WalEntryType::Checkpoint as u8, &payload);
        let mut state = self.state.lock();
        state.stats.checkpoints += 1;
        state.entries_since_checkpoint = 0;
        seq
    }

    /// Append a zero-length `Rotation` marker, then close the current
    /// file and open the next one, unconditionally (unlike the implicit
    /// size-triggered rotation inside `write_entry`).
    pub fn rotate(&self) -> u64 {
        let mut state = self.state.lock();
        if !state.healthy {
            return state.stats.current_sequence;
        }
        let result = (|| -> io::Result<u64> {
            let seq = Self::append_record(&mut state, &self.config, WalEntryType::Rotation as u8, &[])?;
            state.file.sync_all()?;
            let next_seq = state.sequence + 1;
            let path = self.config.directory.join(filename_for(&self.config.file_prefix, next_seq));
            let file = open_for_append(&path)?;
            state.file = file;
            state.file_path = path;
            state.file_size = 0;
            state.stats.rotations += 1;
            Ok(seq)
        })();
        match result {
            Ok(seq) => seq,
            Err(err) => {
                warn!(error = %err, "wal rotation failed, marking unhealthy");
                state.healthy = false;
                state.last_error = Some(err.to_string());
                state.stats.current_sequence
            }
        }
    }

    /// List WAL files in sequence order, read each fully, and invoke
    /// `callback` for every valid, non-duplicate record in strict
    /// sequence order. See spec.md §4.3 "Replay protocol" for the exact
    /// corruption/truncation handling this implements.
    pub fn replay(&self, mut callback: impl FnMut(WalEntryType, &[u8])) -> io::Result<()> {
        let files = list_wal_files(&self.config.directory, &self.config.file_prefix)?;

        let mut last_seen_sequence: u64 = 0;
        let mut entries_replayed: u64 = 0;
        let mut bytes_replayed: u64 = 0;
        let mut corrupted_entries: u64 = 0;

        for (_, path) in files {
            let data = fs::read(&path)?;
            let mut offset = 0usize;

            loop {
                if data.len() - offset < HEADER_SIZE {
                    break; // truncated header: clean end-of-log, not corruption
                }
                let header = RecordHeader::decode(&data[offset..offset + HEADER_SIZE]);
                if !header.is_valid_magic_version() {
                    corrupted_entries += 1;
                    break; // stop scanning this file, move to the next
                }

                let payload_start = offset + HEADER_SIZE;
                let payload_size = header.payload_size as usize;
                if data.len() - payload_start < payload_size {
                    break; // truncated payload: clean end-of-log
                }
                let payload = &data[payload_start..payload_start + payload_size];
                let next_offset = payload_start + payload_size;

                if crc32(payload) != header.checksum {
                    corrupted_entries += 1;
                    offset = next_offset;
                    continue;
                }

                if header.sequence <= last_seen_sequence {
                    offset = next_offset; // duplicate / out-of-order
                    continue;
                }
                if last_seen_sequence > 0 && header.sequence > last_seen_sequence + 1 {
                    warn!(
                        from = last_seen_sequence,
                        to = header.sequence,
                        "sequence gap during wal replay"
                    );
                }

                match WalEntryType::from_tag(header.entry_type) {
                    Some(entry_type) => callback(entry_type, payload),
                    None => corrupted_entries += 1,
                }

                entries_replayed += 1;
                bytes_replayed += (HEADER_SIZE + payload_size) as u64;
                last_seen_sequence = header.sequence;
                offset = next_offset;
            }
        }

        let mut state = self.state.lock();
        state.stats.entries_replayed += entries_replayed;
        state.stats.bytes_replayed += bytes_replayed;
        state.stats.corrupted_entries += corrupted_entries;
        if last_seen_sequence > state.stats.current_sequence {
            state.stats.current_sequence = last_seen_sequence;
        }
        if last_seen_sequence > state.sequence {
            state.sequence = last_seen_sequence;
        }
        Ok(())
    }

    /// Reconstruct `store` from every record on disk, dispatching by
    /// type. See spec.md §4.3 "Replay into store".
    pub fn replay_into(&self, store: &OrderStore) -> io::Result<()> {
        self.replay(|entry_type, payload| match entry_type {
            WalEntryType::OrderNew => {
                let req = codec::decode_place_order_request(payload);
                if store.get(&req.client_order_id).is_some() {
                    return; // duplicate OrderNew, ignore
                }
                store.note_order_params(&req);
            }
            WalEntryType::OrderUpdate => {
                let p = codec::decode_order_update(payload);
                match store.get(&p.client_order_id) {
                    Some(existing) if existing.last_ts_ns >= p.ts_ns => {
                        warn!(coid = %p.client_order_id, "skipping stale order update during replay");
                    }
                    Some(_) => {
                        store.apply_order_update(&p.client_order_id, "", "", &p.venue_order_id, &p.status, &p.reason, p.ts_ns);
                    }
                    None => {
                        warn!(coid = %p.client_order_id, "order update for unknown order during replay, applying anyway");
                        store.apply_order_update(&p.client_order_id, "", "", &p.venue_order_id, &p.status, &p.reason, p.ts_ns);
                    }
                }
            }
            WalEntryType::OrderFill => {
                let p = codec::decode_order_fill(payload);
                match store.get(&p.client_order_id) {
                    Some(existing) if existing.last_ts_ns >= p.ts_ns => {
                        warn!(coid = %p.client_order_id, "skipping stale fill during replay");
                    }
                    _ => {
                        store.apply_fill(&p.client_order_id, &p.symbol, p.qty, p.price, p.ts_ns);
                    }
                }
            }
            WalEntryType::OrderCancel => {
                let p = codec::decode_order_cancel(payload);
                match store.get(&p.client_order_id) {
                    Some(existing) if existing.last_ts_ns >= p.ts_ns => {
                        warn!(coid = %p.client_order_id, "skipping stale cancel during replay");
                    }
                    _ => {
                        store.apply_order_update(&p.client_order_id, "", "", "", STATUS_CANCELED, &p.reason, p.ts_ns);
                    }
                }
            }
            WalEntryType::Checkpoint => {
                let snapshot = codec::decode_checkpoint(payload);
                store.clear();
                for state in snapshot {
                    store.restore_snapshot(state);
                }
            }
            WalEntryType::Rotation => {}
        })
    }

    /// Remove the oldest WAL files beyond `max_files`. Never runs
    /// implicitly; the host calls this after a checkpoint.
    pub fn cleanup_old_files(&self) -> io::Result<()> {
        let files = list_wal_files(&self.config.directory, &self.config.file_prefix)?;
        if files.len() <= self.config.max_files {
            return Ok(());
        }
        let to_remove = files.len() - self.config.max_files;
        for (_, path) in files.into_iter().take(to_remove) {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl Drop for OrderWal {
    /// Sync and close the current file handle, per spec.md §5 "Lifetime":
    /// "The WAL owns its current file handle; on destruction it syncs and
    /// closes." Errors are logged, not propagated — `Drop` has no Result to
    /// return them through, and a failing sync at shutdown is the same
    /// "mark unhealthy, the operator already needs to look at the disk"
    /// situation write_entry's own I/O failure path describes.
    fn drop(&mut self) {
        let state = self.state.lock();
        if let Err(err) = state.file.sync_all() {
            warn!(error = %err, "wal sync failed on drop");
        }
    }
}

/// Build a synthesized [`PlaceOrderRequest`] from a checkpointed
/// [`crate::types::OrderState`], used only where a caller needs to
/// re-derive request shape (e.g. inspecting what a checkpoint would
/// have produced on a fresh `note_order_params` call); replay itself
/// restores snapshots directly via `OrderStore::restore_snapshot`.
pub fn synthesize_place_order_request(state: &crate::types::OrderState) -> PlaceOrderRequest {
    let side = if state.side == "SELL" { Side::Sell } else { Side::Buy };
    PlaceOrderRequest {
        client_order_id: state.client_order_id.clone(),
        symbol: state.symbol.clone(),
        side,
        order_type: OrderType::Limit,
        tif: TimeInForce::GTC,
        qty: state.order_qty.unwrap_or(0.0),
        price: state.limit_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderType, Side, TimeInForce};
    use tempfile::tempdir;

    fn cfg(dir: &Path) -> WalConfig {
        WalConfig {
            directory: dir.to_path_buf(),
            file_prefix: "orders".to_string(),
            max_file_size: 64 * 1024 * 1024,
            max_files: 8,
            sync_on_write: true,
        }
    }

    fn place(coid: &str, qty: f64, price: Option<f64>) -> PlaceOrderRequest {
        PlaceOrderRequest {
            client_order_id: coid.to_string(),
            symbol: "BTCUSDT".to_string(),
            side: Side::Buy,
            order_type: OrderType::Limit,
            tif: TimeInForce::GTC,
            qty,
            price,
        }
    }

    #[test]
    fn filename_parsing_is_strict() {
        assert_eq!(parse_filename("orders_0000000000000001.wal", "orders"), Some(1));
        assert!(parse_filename("orders_1.wal", "orders").is_none());
        assert!(parse_filename("other_0000000000000001.wal", "orders").is_none());
        assert!(parse_filename("orders_000000000000000g.wal", "orders").is_none());
        assert!(parse_filename("orders_0000000000000001.log", "orders").is_none());
    }

    #[test]
    fn b1_empty_payload_crc_matches_empty_sequence() {
        assert_eq!(crc32(&[]), crc32(&[]));
        assert_eq!(crc32(&[]), 0);
    }

    #[test]
    fn scenario_s1_write_then_replay_reconstructs_store() {
        let dir = tempdir().unwrap();
        let wal = OrderWal::open(cfg(dir.path())).unwrap();
        wal.log_order_new(&place("A", 2.0, Some(50000.0)));
        wal.log_order_update("A", "V1", "NEW", "", 1000);
        wal.log_order_fill("A", "BTCUSDT", 0.5, 50000.0, 2000);
        wal.log_order_fill("A", "BTCUSDT", 1.0, 49990.0, 3000);
        wal.log_order_fill("A", "BTCUSDT", 0.5, 50010.0, 4000);

        let store = OrderStore::new();
        wal.replay_into(&store).unwrap();
        let order = store.get("A").unwrap();
        assert_eq!(order.status, "FILLED");
        assert!((order.executed_qty - 2.0).abs() < 1e-9);
    }

    #[test]
    fn scenario_s2_crash_recovery_with_checkpoint() {
        let dir = tempdir().unwrap();
        let wal = OrderWal::open(cfg(dir.path())).unwrap();
        let store = OrderStore::new();

        wal.log_order_new(&place("A", 1.0, None));
        store.note_order_params(&place("A", 1.0, None));
        wal.log_order_update("A", "", "NEW", "", 100);
        store.apply_order_update("A", "", "", "", "NEW", "", 100);
        wal.write_checkpoint(&store);

        wal.log_order_new(&place("B", 5.0, None));
        wal.log_order_fill("B", "BTCUSDT", 5.0, 3000.0, 200);

        drop(wal);
        let wal2 = OrderWal::open(cfg(dir.path())).unwrap();
        let fresh = OrderStore::new();
        wal2.replay_into(&fresh).unwrap();

        assert_eq!(fresh.count(), 2);
        assert_eq!(fresh.get("A").unwrap().status, "NEW");
        assert!((fresh.get("B").unwrap().executed_qty - 5.0).abs() < 1e-9);
    }

    #[test]
    fn scenario_s3_rotation_across_many_records() {
        let dir = tempdir().unwrap();
        let mut config = cfg(dir.path());
        config.max_file_size = 1024;
        let wal = OrderWal::open(config).unwrap();

        for i in 0..50 {
            wal.log_order_new(&place(&format!("ORD{i}"), 1.0, Some(100.0)));
        }

        assert!(wal.stats().rotations >= 1);
        let files = list_wal_files(dir.path(), "orders").unwrap();
        assert!(files.len() >= 2);

        let store = OrderStore::new();
        wal.replay_into(&store).unwrap();
        assert_eq!(store.count(), 50);
    }

    #[test]
    fn scenario_s4_crc_mismatch_skips_single_record() {
        let dir = tempdir().unwrap();
        let wal = OrderWal::open(cfg(dir.path())).unwrap();
        wal.log_order_new(&place("A", 1.0, None));
        wal.log_order_new(&place("B", 1.0, None));
        drop(wal);

        let files = list_wal_files(dir.path(), "orders").unwrap();
        let path = &files[0].1;
        let mut bytes = fs::read(path).unwrap();
        // Flip a byte inside the first record's payload (past the 32-byte header).
        bytes[HEADER_SIZE + 4] ^= 0xff;
        fs::write(path, bytes).unwrap();

        let wal2 = OrderWal::open(cfg(dir.path())).unwrap();
        let store = OrderStore::new();
        wal2.replay_into(&store).unwrap();

        assert_eq!(wal2.stats().corrupted_entries, 1);
        assert_eq!(store.count(), 1);
        assert!(store.get("B").is_some());
    }

    #[test]
    fn scenario_s5_truncated_tail_stops_cleanly() {
        let dir = tempdir().unwrap();
        let wal = OrderWal::open(cfg(dir.path())).unwrap();
        wal.log_order_new(&place("A", 1.0, None));
        wal.log_order_new(&place("B", 1.0, None));
        wal.log_order_new(&place("C", 1.0, None));
        drop(wal);

        let files = list_wal_files(dir.path(), "orders").unwrap();
        let path = &files[0].1;
        let bytes = fs::read(path).unwrap();
        // Truncate partway into the third record's header.
        let cut = bytes.len() - (HEADER_SIZE - 5);
        fs::write(path, &bytes[..cut]).unwrap();

        let wal2 = OrderWal::open(cfg(dir.path())).unwrap();
        let store = OrderStore::new();
        wal2.replay_into(&store).unwrap();

        assert_eq!(wal2.stats().corrupted_entries, 0);
        assert_eq!(wal2.stats().current_sequence, 2);
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn b3_bad_magic_skips_whole_file() {
        let dir = tempdir().unwrap();
        let wal = OrderWal::open(cfg(dir.path())).unwrap();
        wal.log_order_new(&place("A", 1.0, None));
        drop(wal);

        let files = list_wal_files(dir.path(), "orders").unwrap();
        let path = &files[0].1;
        let mut bytes = fs::read(path).unwrap();
        bytes[0] = 0;
        fs::write(path, bytes).unwrap();

        let wal2 = OrderWal::open(cfg(dir.path())).unwrap();
        let store = OrderStore::new();
        wal2.replay_into(&store).unwrap();

        assert_eq!(wal2.stats().corrupted_entries, 1);
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn rotate_writes_marker_and_switches_files() {
        let dir = tempdir().unwrap();
        let wal = OrderWal::open(cfg(dir.path())).unwrap();
        wal.log_order_new(&place("A", 1.0, None));
        let seq_before = wal.stats().current_sequence;
        wal.rotate();
        assert_eq!(wal.stats().current_sequence, seq_before + 1);
        assert_eq!(wal.stats().rotations, 1);

        let files = list_wal_files(dir.path(), "orders").unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn cleanup_old_files_enforces_retention() {
        let dir = tempdir().unwrap();
        let mut config = cfg(dir.path());
        config.max_file_size = 64;
        config.max_files = 2;
        let wal = OrderWal::open(config).unwrap();
        for i in 0..20 {
            wal.log_order_new(&place(&format!("ORD{i}"), 1.0, Some(1.0)));
        }
        assert!(list_wal_files(dir.path(), "orders").unwrap().len() > 2);
        wal.cleanup_old_files().unwrap();
        assert_eq!(list_wal_files(dir.path(), "orders").unwrap().len(), 2);
    }

    #[test]
    fn unhealthy_wal_no_ops_writes() {
        let dir = tempdir().unwrap();
        let wal = OrderWal::open(cfg(dir.path())).unwrap();
        wal.log_order_new(&place("A", 1.0, None));
        let seq = wal.stats().current_sequence;
        {
            let mut state = wal.state.lock();
            state.healthy = false;
        }
        let returned = wal.log_order_new(&place("B", 1.0, None));
        assert_eq!(returned, seq);
        assert!(!wal.is_healthy());
    }
}
