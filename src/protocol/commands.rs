//! # Command Byte Builders
//!
//! Signature constants and byte builders for the two commands raspa
//! understands. The builders produce exactly the layout the decoders in
//! [`super::vertical`] and [`super::row`] read back, which makes them the
//! easiest way to synthesize a stream:
//!
//! ```
//! use raspa::protocol::commands;
//!
//! let mut stream = Vec::new();
//! stream.extend(commands::move_vert_pos(5));
//! stream.extend(commands::start_row(&[0x07, 0x00, 0x05]));
//!
//! assert_eq!(stream, b"\x1b*rY\x05\x00b\x03\x00\x07\x00\x05");
//! ```
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

// ============================================================================
// SIGNATURES
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// Signature of the position-reset sentinel (`ESC * r Y`).
pub const MOVE_VERT_POS: &[u8] = &[ESC, b'*', b'r', b'Y'];

/// Signature of the row-data command (`b`).
pub const START_ROW: &[u8] = b"b";

// ============================================================================
// POSITION RESET
// ============================================================================

/// # Move Vertical Position (ESC * r Y n 0)
///
/// Resets the vertical print position. A stream emits one of these before
/// every image, so it is the boundary between image regions.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC * r Y n NUL |
/// | Hex     | 1B 2A 72 59 n 00 |
/// | Decimal | 27 42 114 89 n 0 |
///
/// ## Parameters
///
/// - `n`: Dot count (unsigned byte)
/// - The trailing byte is reserved and always 0
///
/// ## Example
///
/// ```
/// use raspa::protocol::commands;
///
/// assert_eq!(commands::move_vert_pos(5), vec![0x1B, 0x2A, 0x72, 0x59, 0x05, 0x00]);
/// ```
pub fn move_vert_pos(n_dots: u8) -> Vec<u8> {
    let mut cmd = Vec::with_capacity(MOVE_VERT_POS.len() + 2);
    cmd.extend_from_slice(MOVE_VERT_POS);
    cmd.push(n_dots);
    cmd.push(0); // reserved
    cmd
}

// ============================================================================
// ROW DATA
// ============================================================================

/// # Row Data (b nL nH d1...dk)
///
/// Sends one raster row. The header declares the row length in bytes; the
/// row bytes follow immediately.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | b nL nH d1...dk |
/// | Hex     | 62 nL nH d1...dk |
/// | Decimal | 98 nL nH d1...dk |
///
/// ## Parameters
///
/// - `nL + nH × 256`: Row length k in bytes
/// - `d1...dk`: Row data, 8 dots per byte, MSB = leftmost dot, 1 = black
///
/// ## Example
///
/// ```
/// use raspa::protocol::commands;
///
/// let cmd = commands::start_row(&[0x03, 0x01]);
/// assert_eq!(cmd, vec![0x62, 0x02, 0x00, 0x03, 0x01]);
/// ```
pub fn start_row(data: &[u8]) -> Vec<u8> {
    debug_assert!(
        data.len() <= u16::MAX as usize,
        "Row data must fit a u16 length. Got {} bytes",
        data.len()
    );

    let mut cmd = Vec::with_capacity(START_ROW.len() + 2 + data.len());
    cmd.extend_from_slice(&start_row_header(data.len() as u16));
    cmd.extend_from_slice(data);
    cmd
}

/// Header of a row-data command without its payload.
///
/// Useful for building malformed streams whose declared length does not
/// match the bytes that follow.
#[inline]
pub const fn start_row_header(n_bytes: u16) -> [u8; 3] {
    let [lo, hi] = u16_le(n_bytes);
    [b'b', lo, hi]
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ## Example
///
/// ```
/// use raspa::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(576), [0x40, 0x02]); // 576 = 0x0240
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================
