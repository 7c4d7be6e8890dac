//! Window fetch and byte recombination.
//!
//! One window is the six bytes `[addr, addr + 6)`, delivered as two
//! overlapping little-endian words:
//!
//! ```text
//! out0 = bytes [addr,     addr + 4)
//! out1 = bytes [addr + 2, addr + 6)
//! ```
//!
//! The six bytes span two physical words. The reader issues both word
//! fetches in the cycle the address is presented and splices the returned
//! words in the next cycle, in lockstep with the memory's one-cycle read:
//!
//! ```text
//! cycle t:     addr -> decode -> channel request      (combinational)
//!              byte select of addr -> register
//! cycle t+1:   response words + registered byte select -> out0/out1
//! ```
//!
//! # Splicing
//!
//! The response carries the word containing `addr` on channel 0 and the
//! following word on channel 3. Their middle halves form the `mixed`
//! word, and the registered byte select picks which two of the three
//! candidate words are the outputs:
//!
//! ```text
//! mixed = (word0 >> 16) | (word3 << 16)
//!
//! byte select 0 (addr = 4n):      out0 = word0,  out1 = mixed
//! byte select 1 (addr = 4n + 2):  out0 = mixed,  out1 = word3
//! ```

use crate::fetch::decode;
use crate::mem::{ChannelRequest, ChannelResponse};

/// The two overlapping output words of one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowPair {
    /// Bytes `[addr, addr + 4)`, little-endian.
    pub out0: u32,
    /// Bytes `[addr + 2, addr + 6)`, little-endian.
    pub out1: u32,
}

/// Recombines fetched channel words into aligned window pairs.
///
/// The only state is the byte select registered alongside each issued
/// request; everything else is combinational. Presenting a new address
/// every cycle keeps a window completing every cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowReader {
    /// Byte select of the previous cycle's address (resets to 0).
    byte_select: u8,
}

impl WindowReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel request for a window starting at `addr` (combinational).
    #[inline]
    pub fn channel_request(&self, addr: u32) -> ChannelRequest {
        decode::channel_request(addr)
    }

    /// Advance one clock edge.
    ///
    /// `resp` carries the words for the address presented on the previous
    /// cycle, and the returned pair belongs to that address. The byte
    /// select of `addr` is registered for the next cycle.
    pub fn tick(&mut self, addr: u32, resp: &ChannelResponse) -> WindowPair {
        let pair = splice(self.byte_select, resp.words[0], resp.words[3]);
        self.byte_select = decode::byte_select(addr);
        pair
    }
}

/// Splice the containing word and its successor into the output pair.
fn splice(byte_select: u8, word0: u32, word3: u32) -> WindowPair {
    let mixed = (word0 >> 16) | (word3 << 16);
    if byte_select == 0 {
        WindowPair {
            out0: word0,
            out1: mixed,
        }
    } else {
        WindowPair {
            out0: mixed,
            out1: word3,
        }
    }
}
