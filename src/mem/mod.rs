//! Banked memory service feeding the fetch pipeline.
//!
//! The store behind the input-fetch path is physically four independent
//! word-wide banks. It is not exposed as a flat byte space: clients present
//! one bank-local word address per channel plus a shared 2-bit phase, and
//! the phase rotates which bank each channel reads.
//!
//! # Read contract
//!
//! - Four read channels, each taking a 14-bit word address.
//! - Addresses and phase presented on cycle `t` yield word contents on
//!   cycle `t + 1`. The read is registered, never transparent.
//! - Phase `p` routes bank `p` to channel 0 and bank `(p + 1) % 4` to
//!   channel 3, so one request can span a block boundary.
//! - Unused channels may be driven with address 0 and ignored.
//!
//! [`BankedRam`] is the reference implementation; [`ChannelService`] is the
//! seam a different backing model plugs into.

pub mod banked;

pub use banked::{BankedRam, MemoryError};

use crate::geometry;

/// Number of read channels exposed by the memory service.
pub const NUM_CHANNELS: usize = geometry::NUM_BANKS;

/// One cycle's read request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelRequest {
    /// Bank rotation selector (2 bits).
    pub phase: u8,
    /// Bank-local word address per channel (14 bits each).
    pub addrs: [u32; NUM_CHANNELS],
}

/// Word contents returned one cycle after the matching request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelResponse {
    /// One 32-bit word per channel.
    pub words: [u32; NUM_CHANNELS],
}

/// A clocked four-channel read service with a one-cycle latency.
pub trait ChannelService {
    /// Advance one clock edge.
    ///
    /// Latches `req` and returns the words for the request presented on
    /// the previous cycle. The first tick after power-on returns the
    /// reset value of the output registers (all zeros for [`BankedRam`]).
    fn tick(&mut self, req: &ChannelRequest) -> ChannelResponse;
}
