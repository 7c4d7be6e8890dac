//! Fixed geometry of the accelerator's input-fetch path.
//!
//! The first convolution layer is hard-wired for a single input shape, so
//! these values are constants of the gateware rather than runtime
//! configuration. The input image is depth 1 (one byte per pixel) and
//! 322 pixels wide; the layer samples it with a stride of 2 in both axes.
//!
//! # Scan geometry
//!
//! The address walk visits one 4-byte span per step. Each span carries two
//! sampled (even-column) pixels, and 80 spans cover the 160 sampled columns
//! of a row. Moving down one output row skips two image rows, so row starts
//! are 2 * 322 = 644 bytes apart.
//!
//! # Memory geometry
//!
//! The backing store is four word-wide banks interleaved on byte address:
//!
//! ```text
//! byte addr:  0..4    4..8    8..12   12..16  16..20  ...
//! location:   bank0   bank1   bank2   bank3   bank0   ...
//!             word0   word0   word0   word0   word1
//! ```
//!
//! Byte addresses are 18 bits (256 KiB); bank word addresses are the upper
//! 14 bits. All address arithmetic wraps at those widths, matching the
//! hardware register widths.

// ============================================================================
// Scan geometry
// ============================================================================

/// Input image width in pixels (depth 1, one byte per pixel).
pub const IMAGE_WIDTH: u32 = 322;

/// Bytes between the starts of successive scan rows.
/// The vertical stride of 2 skips one image row per output row.
pub const ROW_STRIDE: u32 = 2 * IMAGE_WIDTH;

/// Bytes between successive addresses within a row (two sampled pixels).
pub const COLUMN_STRIDE: u32 = 4;

/// Addresses generated per scan row.
pub const ADDRESSES_PER_ROW: u8 = 80;

/// Advance pulses each address is held for before the walk moves on.
pub const DWELL_ADVANCES: u8 = 8;

// ============================================================================
// Memory geometry
// ============================================================================

/// Width of a byte address in bits.
pub const ADDR_BITS: u32 = 18;

/// Mask for byte addresses (18 bits).
pub const ADDR_MASK: u32 = (1 << ADDR_BITS) - 1;

/// Total byte-addressable memory: 256 KiB.
pub const MEMORY_SIZE: usize = 1 << ADDR_BITS;

/// Number of interleaved banks.
pub const NUM_BANKS: usize = 4;

/// Bytes per bank word.
pub const BANK_WORD_BYTES: usize = 4;

/// Bytes per block (one word from each bank).
pub const BLOCK_BYTES: usize = NUM_BANKS * BANK_WORD_BYTES;

/// Width of a bank word address in bits.
pub const BANK_ADDR_BITS: u32 = 14;

/// Mask for bank word addresses and block indices (14 bits).
pub const BLOCK_MASK: u32 = (1 << BANK_ADDR_BITS) - 1;

/// Words per bank.
pub const WORDS_PER_BANK: usize = 1 << BANK_ADDR_BITS;

/// Cycles from presenting a read request to the data being available.
pub const READ_LATENCY: u8 = 1;

/// Bytes spanned by one window fetch: [addr, addr + 6).
pub const WINDOW_BYTES: usize = 6;
