//! Pipeline driver.
//!
//! Wires the address generator, window reader and memory service together
//! and advances them in lockstep, one clock edge per `step`. The engine
//! stands in for the layer scheduler: it issues the start pulse, paces
//! the advance pulses and collects the finished windows.
//!
//! # Cycle order
//!
//! Within a step, combinational values are sampled first and registers
//! commit at the end, the way the hardware's clock edge sees them:
//!
//! 1. sample the generator's registered address
//! 2. decode it into a channel request and tick the memory, which
//!    returns the previous request's words
//! 3. tick the reader, completing the window presented one cycle ago
//! 4. tick the generator with this cycle's start and advance pulses
//!
//! The first window therefore completes two cycles after the start pulse:
//! one for the address to come out of the generator, one for the read.

use crate::fetch::{PixelAddressGenerator, WindowPair, WindowReader};
use crate::geometry::ADDRESSES_PER_ROW;
use crate::mem::ChannelService;

/// One completed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSample {
    /// Cycle the window completed on.
    pub cycle: u64,
    /// Address the window was fetched for.
    pub addr: u32,
    /// The two overlapping output words.
    pub pair: WindowPair,
}

/// Counters accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// Clock edges stepped.
    pub cycles: u64,
    /// Windows completed.
    pub samples: u64,
    /// Distinct addresses presented by the generator.
    pub addresses: u64,
    /// Times the walk wrapped to a new row.
    pub row_wraps: u64,
}

/// Drives the fetch pipeline against a memory service.
pub struct FetchEngine<M> {
    generator: PixelAddressGenerator,
    reader: WindowReader,
    memory: M,
    /// Cycles between advance pulses (1 = every cycle).
    advance_period: u32,
    advance_tick: u32,
    /// A start pulse is issued on the next step.
    start_pending: bool,
    /// The first start pulse has landed; the generator output is live.
    started: bool,
    /// Address whose response is in flight, if any.
    pending: Option<u32>,
    last_presented: Option<u32>,
    cycle: u64,
    stats: FetchStats,
}

impl<M: ChannelService> FetchEngine<M> {
    pub fn new(memory: M) -> Self {
        Self {
            generator: PixelAddressGenerator::new(),
            reader: WindowReader::new(),
            memory,
            advance_period: 1,
            advance_tick: 0,
            start_pending: false,
            started: false,
            pending: None,
            last_presented: None,
            cycle: 0,
            stats: FetchStats::default(),
        }
    }

    /// Pulse advance every `period` cycles instead of every cycle.
    pub fn with_advance_period(mut self, period: u32) -> Self {
        self.advance_period = period.max(1);
        self
    }

    /// Program the scan's base address. Takes effect on the next start.
    pub fn set_base_addr(&mut self, base: u32) {
        self.generator.set_base_addr(base);
    }

    /// Schedule a one-cycle start pulse for the next step.
    pub fn start(&mut self) {
        self.start_pending = true;
    }

    /// Advance the whole pipeline one clock edge.
    ///
    /// Returns the window that completed this cycle, if the pipeline is
    /// primed and delivering.
    pub fn step(&mut self) -> Option<WindowSample> {
        let start = self.start_pending;
        self.start_pending = false;

        let mut advance = false;
        if self.started {
            self.advance_tick += 1;
            if self.advance_tick >= self.advance_period {
                advance = true;
                self.advance_tick = 0;
            }
        }

        // Until the first start pulse lands, the generator output is the
        // power-on register value and nothing meaningful is fetched.
        let completed = if self.started {
            let addr = self.generator.addr();
            let req = self.reader.channel_request(addr);
            let resp = self.memory.tick(&req);
            let pair = self.reader.tick(addr, &resp);
            let done = self.pending.take().map(|prev| WindowSample {
                cycle: self.cycle,
                addr: prev,
                pair,
            });
            self.pending = Some(addr);
            if self.last_presented != Some(addr) {
                self.last_presented = Some(addr);
                self.stats.addresses += 1;
            }
            done
        } else {
            None
        };

        let column_before = self.generator.position().column;
        self.generator.tick(start, advance);
        if advance
            && !start
            && column_before + 1 == ADDRESSES_PER_ROW
            && self.generator.position().column == 0
        {
            self.stats.row_wraps += 1;
            log::debug!("row wrap, next row starts at 0x{:05x}", self.generator.addr());
        }

        if start {
            self.started = true;
            self.advance_tick = 0;
        }

        self.cycle += 1;
        self.stats.cycles += 1;
        if let Some(sample) = &completed {
            self.stats.samples += 1;
            log::trace!(
                "cycle {}: 0x{:05x} -> out0=0x{:08x} out1=0x{:08x}",
                sample.cycle,
                sample.addr,
                sample.pair.out0,
                sample.pair.out1
            );
        }

        completed
    }

    /// Step `cycles` clock edges and collect the completed windows.
    pub fn run(&mut self, cycles: u64) -> Vec<WindowSample> {
        let mut samples = Vec::new();
        for _ in 0..cycles {
            if let Some(sample) = self.step() {
                samples.push(sample);
            }
        }
        samples
    }

    /// Counters accumulated so far.
    #[inline]
    pub fn stats(&self) -> FetchStats {
        self.stats
    }

    /// Clock edges stepped so far.
    #[inline]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// The backing memory service.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Mutable access to the backing memory service, for reloading
    /// contents between runs.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }
}
