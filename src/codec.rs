//! Binary wire codec: little-endian fixed-width primitives and
//! length-prefixed strings, shared by every WAL record payload and by
//! checkpoint snapshots.
//!
//! Pure and allocation-explicit, in the spirit of the teacher's codec-facing
//! modules — encoders append into a caller-owned `Vec<u8>`, decoders read
//! from an advancing [`Cursor`] and degrade to empty/zero values on a short
//! buffer rather than returning a `Result`. The WAL's header framing (magic,
//! version, CRC) is the sole integrity boundary; a payload that is merely
//! too short to decode fully is not itself treated as corruption here.

use crate::types::{
    ExecutionReport, OrderState, OrderType, PlaceOrderRequest, Side, TimeInForce,
};

/// Magic value stamped on every WAL record header: ASCII "WALO" read
/// little-endian.
pub const MAGIC: u32 = 0x5741_4C4F;

/// Current on-disk format version. A reader that sees anything else skips
/// the containing file (spec.md §4.3 "Startup" / §6).
pub const CURRENT_VERSION: u16 = 1;

/// Compute the CRC32 (IEEE 802.3 polynomial 0xEDB88320) of a payload.
pub fn crc32(payload: &[u8]) -> u32 {
    crc32fast::hash(payload)
}

fn encode_u8(buf: &mut Vec<u8>, v: u8) {
    buf.push(v);
}

fn encode_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn encode_i64(buf: &mut Vec<u8>, v: i64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn encode_f64(buf: &mut Vec<u8>, v: f64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn encode_string(buf: &mut Vec<u8>, s: &str) {
    encode_u32(buf, s.len() as u32);
    buf.extend_from_slice(s.as_bytes());
}

fn encode_option_f64(buf: &mut Vec<u8>, v: Option<f64>) {
    match v {
        Some(value) => {
            encode_u8(buf, 1);
            encode_f64(buf, value);
        }
        None => encode_u8(buf, 0),
    }
}

/// A cursor over a decode payload. Every read that would run past the end
/// of the buffer returns the zero value for its type instead of failing,
/// and pins the cursor at the end so later reads keep returning zeroes.
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn read_u8(&mut self) -> u8 {
        if self.remaining() < 1 {
            self.pos = self.data.len();
            return 0;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        v
    }

    pub fn read_u32(&mut self) -> u32 {
        if self.remaining() < 4 {
            self.pos = self.data.len();
            return 0;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().unwrap());
        self.pos += 4;
        v
    }

    pub fn read_i64(&mut self) -> i64 {
        if self.remaining() < 8 {
            self.pos = self.data.len();
            return 0;
        }
        let v = i64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().unwrap());
        self.pos += 8;
        v
    }

    pub fn read_f64(&mut self) -> f64 {
        if self.remaining() < 8 {
            self.pos = self.data.len();
            return 0.0;
        }
        let v = f64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().unwrap());
        self.pos += 8;
        v
    }

    pub fn read_string(&mut self) -> String {
        let len = self.read_u32() as usize;
        if self.remaining() < len {
            self.pos = self.data.len();
            return String::new();
        }
        let s = String::from_utf8_lossy(&self.data[self.pos..self.pos + len]).into_owned();
        self.pos += len;
        s
    }

    pub fn read_option_f64(&mut self) -> Option<f64> {
        if self.read_u8() == 1 {
            Some(self.read_f64())
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------
// PlaceOrderRequest
// ---------------------------------------------------------------------

pub fn encode_place_order_request(buf: &mut Vec<u8>, req: &PlaceOrderRequest) {
    encode_string(buf, &req.client_order_id);
    encode_string(buf, &req.symbol);
    encode_u8(buf, req.side as u8);
    encode_u8(buf, req.order_type as u8);
    encode_u8(buf, req.tif as u8);
    encode_f64(buf, req.qty);
    encode_option_f64(buf, req.price);
}

pub fn decode_place_order_request(data: &[u8]) -> PlaceOrderRequest {
    let mut cur = Cursor::new(data);
    let client_order_id = cur.read_string();
    let symbol = cur.read_string();
    let side = Side::from_tag(cur.read_u8()).unwrap_or(Side::Buy);
    let order_type = OrderType::from_tag(cur.read_u8()).unwrap_or(OrderType::Limit);
    let tif = TimeInForce::from_tag(cur.read_u8()).unwrap_or(TimeInForce::GTC);
    let qty = cur.read_f64();
    let price = cur.read_option_f64();
    PlaceOrderRequest {
        client_order_id,
        symbol,
        side,
        order_type,
        tif,
        qty,
        price,
    }
}

// ---------------------------------------------------------------------
// Order update: (client_order_id, venue_order_id, status, reason, ts_ns)
// ---------------------------------------------------------------------

pub struct OrderUpdatePayload {
    pub client_order_id: String,
    pub venue_order_id: String,
    pub status: String,
    pub reason: String,
    pub ts_ns: i64,
}

pub fn encode_order_update(buf: &mut Vec<u8>, p: &OrderUpdatePayload) {
    encode_string(buf, &p.client_order_id);
    encode_string(buf, &p.venue_order_id);
    encode_string(buf, &p.status);
    encode_string(buf, &p.reason);
    encode_i64(buf, p.ts_ns);
}

pub fn decode_order_update(data: &[u8]) -> OrderUpdatePayload {
    let mut cur = Cursor::new(data);
    OrderUpdatePayload {
        client_order_id: cur.read_string(),
        venue_order_id: cur.read_string(),
        status: cur.read_string(),
        reason: cur.read_string(),
        ts_ns: cur.read_i64(),
    }
}

// ---------------------------------------------------------------------
// Order fill: (client_order_id, symbol, qty, price, ts_ns)
// ---------------------------------------------------------------------

pub struct OrderFillPayload {
    pub client_order_id: String,
    pub symbol: String,
    pub qty: f64,
    pub price: f64,
    pub ts_ns: i64,
}

pub fn encode_order_fill(buf: &mut Vec<u8>, p: &OrderFillPayload) {
    encode_string(buf, &p.client_order_id);
    encode_string(buf, &p.symbol);
    encode_f64(buf, p.qty);
    encode_f64(buf, p.price);
    encode_i64(buf, p.ts_ns);
}

pub fn decode_order_fill(data: &[u8]) -> OrderFillPayload {
    let mut cur = Cursor::new(data);
    OrderFillPayload {
        client_order_id: cur.read_string(),
        symbol: cur.read_string(),
        qty: cur.read_f64(),
        price: cur.read_f64(),
        ts_ns: cur.read_i64(),
    }
}

// ---------------------------------------------------------------------
// Order cancel: (client_order_id, reason, ts_ns)
// ---------------------------------------------------------------------

pub struct OrderCancelPayload {
    pub client_order_id: String,
    pub reason: String,
    pub ts_ns: i64,
}

pub fn encode_order_cancel(buf: &mut Vec<u8>, p: &OrderCancelPayload) {
    encode_string(buf, &p.client_order_id);
    encode_string(buf, &p.reason);
    encode_i64(buf, p.ts_ns);
}

pub fn decode_order_cancel(data: &[u8]) -> OrderCancelPayload {
    let mut cur = Cursor::new(data);
    OrderCancelPayload {
        client_order_id: cur.read_string(),
        reason: cur.read_string(),
        ts_ns: cur.read_i64(),
    }
}

// ---------------------------------------------------------------------
// OrderState / Checkpoint
// ---------------------------------------------------------------------

pub fn encode_order_state(buf: &mut Vec<u8>, s: &OrderState) {
    encode_string(buf, &s.client_order_id);
    encode_string(buf, &s.symbol);
    encode_string(buf, &s.side);
    encode_option_f64(buf, s.order_qty);
    encode_option_f64(buf, s.limit_price);
    encode_f64(buf, s.executed_qty);
    encode_f64(buf, s.avg_price);
    encode_string(buf, &s.venue_order_id);
    encode_string(buf, &s.status);
    encode_string(buf, &s.reason);
    encode_i64(buf, s.created_ts_ns);
    encode_i64(buf, s.last_ts_ns);
}

pub fn decode_order_state(cur: &mut Cursor<'_>) -> OrderState {
    OrderState {
        client_order_id: cur.read_string(),
        symbol: cur.read_string(),
        side: cur.read_string(),
        order_qty: cur.read_option_f64(),
        limit_price: cur.read_option_f64(),
        executed_qty: cur.read_f64(),
        avg_price: cur.read_f64(),
        venue_order_id: cur.read_string(),
        status: cur.read_string(),
        reason: cur.read_string(),
        created_ts_ns: cur.read_i64(),
        last_ts_ns: cur.read_i64(),
    }
}

pub fn encode_checkpoint(buf: &mut Vec<u8>, states: &[OrderState]) {
    encode_u32(buf, states.len() as u32);
    for s in states {
        encode_order_state(buf, s);
    }
}

pub fn decode_checkpoint(data: &[u8]) -> Vec<OrderState> {
    let mut cur = Cursor::new(data);
    let count = cur.read_u32() as usize;
    let mut out = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        if cur.remaining() == 0 {
            break;
        }
        out.push(decode_order_state(&mut cur));
    }
    out
}

/// Build an [`ExecutionReport`] into its constituent fill/update payloads —
/// convenience used by `OrderStore::apply_execution_report` callers who log
/// the report to the WAL in the same shape the replay path expects.
pub fn execution_report_to_fill(report: &ExecutionReport) -> OrderFillPayload {
    OrderFillPayload {
        client_order_id: report.client_order_id.clone(),
        symbol: report.symbol.clone(),
        qty: report.last_fill_qty,
        price: report.last_fill_price,
        ts_ns: report.ts_recv_ns,
    }
}
