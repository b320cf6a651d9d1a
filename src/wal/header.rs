//! The fixed 32-byte record header and the closed set of WAL entry types.
//!
//! Layout (all little-endian, 32 bytes total):
//! `u32 magic | u16 version | u8 type | u8 reserved | u64 sequence |
//! i64 timestamp_ns | u32 payload_size | u32 checksum`.

use crate::codec::{CURRENT_VERSION, MAGIC};

/// Size in bytes of the header preceding every payload.
pub const HEADER_SIZE: usize = 32;

/// The six record kinds a WAL file can contain. The tag is part of the
/// wire contract (§6) and is written as a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalEntryType {
    OrderNew = 1,
    OrderUpdate = 2,
    OrderFill = 3,
    OrderCancel = 4,
    Checkpoint = 5,
    Rotation = 6,
}

impl WalEntryType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::OrderNew),
            2 => Some(Self::OrderUpdate),
            3 => Some(Self::OrderFill),
            4 => Some(Self::OrderCancel),
            5 => Some(Self::Checkpoint),
            6 => Some(Self::Rotation),
            _ => None,
        }
    }
}

/// A decoded header.
#[derive(Debug, Clone, Copy)]
pub struct RecordHeader {
    pub magic: u32,
    pub version: u16,
    pub entry_type: u8,
    pub sequence: u64,
    pub timestamp_ns: i64,
    pub payload_size: u32,
    pub checksum: u32,
}

impl RecordHeader {
    pub fn is_valid_magic_version(&self) -> bool {
        self.magic == MAGIC && self.version == CURRENT_VERSION
    }

    /// Decode a header from a slice of at least [`HEADER_SIZE`] bytes.
    /// Caller must have already checked the slice is long enough; this is
    /// the sole indivisible read used by the replay scanner.
    pub fn decode(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() >= HEADER_SIZE);
        Self {
            magic: u32::from_le_bytes(bytes[0..4].try_into().unwrap()),
            version: u16::from_le_bytes(bytes[4..6].try_into().unwrap()),
            entry_type: bytes[6],
            sequence: u64::from_le_bytes(bytes[8..16].try_into().unwrap()),
            timestamp_ns: i64::from_le_bytes(bytes[16..24].try_into().unwrap()),
            payload_size: u32::from_le_bytes(bytes[24..28].try_into().unwrap()),
            checksum: u32::from_le_bytes(bytes[28..32].try_into().unwrap()),
        }
    }
}

/// Encode a complete header, ready to be followed by `payload_size` bytes
/// of payload.
pub fn encode_header(
    entry_type: u8,
    sequence: u64,
    timestamp_ns: i64,
    payload_size: u32,
    checksum: u32,
) -> [u8; HEADER_SIZE] {
    let mut buf = [0u8; HEADER_SIZE];
    buf[0..4].copy_from_slice(&MAGIC.to_le_bytes());
    buf[4..6].copy_from_slice(&CURRENT_VERSION.to_le_bytes());
    buf[6] = entry_type;
    buf[7] = 0;
    buf[8..16].copy_from_slice(&sequence.to_le_bytes());
    buf[16..24].copy_from_slice(&timestamp_ns.to_le_bytes());
    buf[24..28].copy_from_slice(&payload_size.to_le_bytes());
    buf[28..32].copy_from_slice(&checksum.to_le_bytes());
    buf
}
