//! Reference model of the four-bank interleaved store.
//!
//! # Byte interleave
//!
//! A byte address splits into bank, word and lane fields:
//!
//! | byte address `A` | field      |
//! |------------------|------------|
//! | `A[1:0]`         | byte lane  |
//! | `A[3:2]`         | bank       |
//! | `A[17:4]`        | bank word  |
//!
//! Word `w` of bank `b` therefore holds bytes `[16w + 4b, 16w + 4b + 4)`,
//! packed little-endian.
//!
//! # Channel rotation
//!
//! Reads go through four channels, not banks. A 2-bit phase rotates the
//! bank-to-channel routing so that channel 0 always returns the word the
//! phase selects and channel 3 the word after it:
//!
//! | phase | ch0 | ch1 | ch2 | ch3 |
//! |-------|-----|-----|-----|-----|
//! | 0     |  0  |  3  |  2  |  1  |
//! | 1     |  1  |  0  |  3  |  2  |
//! | 2     |  2  |  1  |  0  |  3  |
//! | 3     |  3  |  2  |  1  |  0  |
//!
//! Channel `c` with phase `p` reads bank `(p - c) mod 4`. Only channels 0
//! and 3 are pinned by the fetch path; the middle channels continue the
//! same rotation.

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

use super::{ChannelRequest, ChannelResponse, ChannelService};
use crate::geometry::{
    ADDR_MASK, BANK_WORD_BYTES, BLOCK_BYTES, BLOCK_MASK, MEMORY_SIZE, NUM_BANKS, WORDS_PER_BANK,
};

/// Error raised when loading a byte image into the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// Image data would extend past the end of the address space.
    #[error("image of {len} bytes at offset 0x{offset:05x} does not fit in 0x{limit:05x} bytes")]
    ImageOverflow {
        offset: usize,
        len: usize,
        limit: usize,
    },
}

/// Four-bank interleaved memory with registered (one-cycle) reads.
///
/// Power-on contents and the channel output registers are all zeros.
#[derive(Debug, Clone)]
pub struct BankedRam {
    /// Word storage, one array per bank.
    banks: [Vec<u32>; NUM_BANKS],
    /// Output registers holding the words for the previous request.
    latched: ChannelResponse,
}

#[inline]
fn bank_of(addr: u32) -> usize {
    ((addr >> 2) as usize) & (NUM_BANKS - 1)
}

#[inline]
fn word_of(addr: u32) -> usize {
    ((addr >> 4) & BLOCK_MASK) as usize
}

impl BankedRam {
    /// Create a zeroed store.
    pub fn new() -> Self {
        Self {
            banks: std::array::from_fn(|_| vec![0u32; WORDS_PER_BANK]),
            latched: ChannelResponse::default(),
        }
    }

    /// Bank read by `channel` when the request carries `phase`.
    #[inline]
    pub fn bank_for_channel(phase: u8, channel: usize) -> usize {
        (phase as usize + NUM_BANKS - channel) % NUM_BANKS
    }

    /// Read one bank word directly, bypassing the channel pipeline.
    #[inline]
    pub fn read_word(&self, bank: usize, word: u32) -> u32 {
        self.banks[bank][(word & BLOCK_MASK) as usize]
    }

    /// Write one bank word directly.
    #[inline]
    pub fn write_word(&mut self, bank: usize, word: u32, value: u32) {
        self.banks[bank][(word & BLOCK_MASK) as usize] = value;
    }

    /// Read one byte through the flat byte-space view.
    pub fn read_byte(&self, addr: u32) -> u8 {
        let addr = addr & ADDR_MASK;
        let shift = (addr & 3) * 8;
        (self.banks[bank_of(addr)][word_of(addr)] >> shift) as u8
    }

    /// Write one byte through the flat byte-space view.
    pub fn write_byte(&mut self, addr: u32, value: u8) {
        let addr = addr & ADDR_MASK;
        let shift = (addr & 3) * 8;
        let slot = &mut self.banks[bank_of(addr)][word_of(addr)];
        *slot = (*slot & !(0xFF << shift)) | (u32::from(value) << shift);
    }

    /// Scatter a byte image across the banks starting at `offset`.
    ///
    /// Word-aligned stretches land as whole little-endian words; the
    /// ragged edges go in byte by byte.
    pub fn load_bytes(&mut self, offset: usize, data: &[u8]) -> Result<(), MemoryError> {
        let end = offset.checked_add(data.len());
        if end.map_or(true, |end| end > MEMORY_SIZE) {
            return Err(MemoryError::ImageOverflow {
                offset,
                len: data.len(),
                limit: MEMORY_SIZE,
            });
        }

        let mut addr = offset;
        let mut rest = data;

        // Leading bytes up to the next word boundary.
        while addr % BANK_WORD_BYTES != 0 && !rest.is_empty() {
            self.write_byte(addr as u32, rest[0]);
            addr += 1;
            rest = &rest[1..];
        }

        // Whole words straight into their owning bank. A 4-byte-aligned
        // group always falls entirely within one bank word.
        let mut words = rest.chunks_exact(BANK_WORD_BYTES);
        for chunk in &mut words {
            let a = addr as u32;
            self.banks[bank_of(a)][word_of(a)] = LittleEndian::read_u32(chunk);
            addr += BANK_WORD_BYTES;
        }

        // Trailing bytes.
        for &byte in words.remainder() {
            self.write_byte(addr as u32, byte);
            addr += 1;
        }

        Ok(())
    }

    /// Fill every byte address `k` with `k` modulo 256.
    ///
    /// With this pattern the word at byte address `A` reads as the four
    /// ascending bytes starting at `A`, which makes misrouted fetches
    /// immediately visible.
    pub fn fill_ramp(&mut self) {
        for (bank, words) in self.banks.iter_mut().enumerate() {
            for (word, slot) in words.iter_mut().enumerate() {
                let base = (word * BLOCK_BYTES + bank * BANK_WORD_BYTES) as u32;
                *slot = u32::from_le_bytes([
                    base as u8,
                    (base + 1) as u8,
                    (base + 2) as u8,
                    (base + 3) as u8,
                ]);
            }
        }
    }
}

impl ChannelService for BankedRam {
    fn tick(&mut self, req: &ChannelRequest) -> ChannelResponse {
        let out = self.latched;
        let mut next = ChannelResponse::default();
        for (channel, word) in next.words.iter_mut().enumerate() {
            let bank = Self::bank_for_channel(req.phase, channel);
            *word = self.banks[bank][(req.addrs[channel] & BLOCK_MASK) as usize];
        }
        self.latched = next;
        out
    }
}

impl Default for BankedRam {
    fn default() -> Self {
        Self::new()
    }
}
