//! Address decode for window fetches.
//!
//! A window starting at even byte address `A` needs the word containing
//! `A` and the word after it. The bank interleave makes both locations a
//! pure bit-field decomposition of `A`:
//!
//! ```text
//!  17                    4   3  2   1   0
//! ┌───────────────────────┬──────┬───┬───┐
//! │      block index      │ phase│ b │ 0 │    b = byte select
//! └───────────────────────┴──────┴───┴───┘
//! ```
//!
//! - `block index` names the 16-byte block, which is also the word address
//!   every bank uses for that block.
//! - `phase` says which bank holds the word containing `A`, and so drives
//!   the service's channel rotation.
//! - `byte select` says whether `A` starts at the half-word; it decides
//!   the recombination one cycle later.
//!
//! Channel 0 is given the block itself. Channel 3 wants the following
//! word: same block for phases 0 to 2, next block when the phase wraps.
//! Block arithmetic is 14 bits wide, so the block after 0x3FFF is 0.

use crate::geometry::{ADDR_MASK, BLOCK_MASK};
use crate::mem::{ChannelRequest, NUM_CHANNELS};

/// Which 16-byte block the address falls in (bits 17..4).
#[inline]
pub fn block_index(addr: u32) -> u32 {
    ((addr & ADDR_MASK) >> 4) & BLOCK_MASK
}

/// Position of the containing word within its block (bits 3..2).
#[inline]
pub fn phase(addr: u32) -> u8 {
    ((addr >> 2) & 0b11) as u8
}

/// Whether the window starts at the upper half of its word (bit 1).
#[inline]
pub fn byte_select(addr: u32) -> u8 {
    ((addr >> 1) & 1) as u8
}

/// Build the channel request for a window starting at `addr`.
///
/// Channels 1 and 2 are unused by the fetch path and driven with
/// address 0. Odd addresses are outside the contract; debug builds
/// assert, release builds decode the even address below.
pub fn channel_request(addr: u32) -> ChannelRequest {
    debug_assert_eq!(addr & 1, 0, "window addresses are even");

    let block = block_index(addr);
    let phase = phase(addr);

    let mut req = ChannelRequest {
        phase,
        addrs: [0; NUM_CHANNELS],
    };
    req.addrs[0] = block;
    req.addrs[3] = if phase == 3 {
        (block + 1) & BLOCK_MASK
    } else {
        block
    };
    req
}
