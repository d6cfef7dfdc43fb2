// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! DMA (Direct Memory Access) Engine
//!
//! This module implements a small memory-mapped DMA engine that copies bytes
//! between slots of its internal byte store. A transfer is triggered through
//! the control byte and reported through the status byte.
//!
//! # Pins
//!
//! | Signal  | Width | Direction | Meaning                          |
//! |---------|-------|-----------|----------------------------------|
//! | clk     | 1     | in        | one `tick` per rising edge       |
//! | rst_n   | 1     | in        | synchronous reset, active low    |
//! | ena     | 1     | in        | global enable gate               |
//! | ui_in   | 8     | in        | control byte                     |
//! | uo_out  | 8     | out       | status byte                      |
//!
//! # Transfer State Machine
//!
//! ```text
//!            start                      copy src -> dst
//!   Idle ──────────────> SingleCopy ─────────────────────┐
//!    │                                                   v
//!    │ start (burst)                                   Done ──┐
//!    └──────────> BurstCopy{0} -> .. -> BurstCopy{N-1} ─^     │ start
//!                                                             │
//!        (Done accepts a new start on the same edge) <────────┘
//! ```
//!
//! - **Single**: one copy step, one clock edge
//! - **Burst**: `BURST_LENGTH` copy steps in increasing offset order, one per edge
//!
//! The source window is captured on the start edge. Each copy step writes one
//! captured byte, so overlapping windows still copy the pre-transfer bytes.
//!
//! The start bit is edge-detected: a start held high across several edges
//! triggers at most one transfer, and start pulses seen while a copy is in
//! flight are dropped.

pub mod registers;

pub use registers::{is_start, Command, ControlFlags, Status, StatusFlags, TransferMode};

use crate::core::memory::ByteStore;
use crate::core::save_state::{EngineState, StateSave};
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
mod tests;

/// Copy steps performed by a burst command
pub const BURST_LENGTH: usize = 4;

/// Engine input pins sampled on each rising clock edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Pins {
    /// Active-low synchronous reset (`rst_n`)
    pub reset_n: bool,
    /// Global enable (`ena`)
    pub enable: bool,
    /// Control byte (`ui_in`)
    pub control: u8,
}

impl Default for Pins {
    fn default() -> Self {
        Self {
            reset_n: true,
            enable: true,
            control: 0,
        }
    }
}

/// Transfer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode)]
pub enum TransferState {
    /// Waiting for a start pulse (reset state)
    #[default]
    Idle,
    /// Copying a single byte
    SingleCopy,
    /// Copying burst step `offset`
    BurstCopy { offset: u8 },
    /// Transfer complete, done flag raised
    Done,
}

impl TransferState {
    /// Check whether a copy is in flight
    #[inline(always)]
    pub fn is_busy(self) -> bool {
        matches!(self, TransferState::SingleCopy | TransferState::BurstCopy { .. })
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferState::Idle => write!(f, "IDLE"),
            TransferState::SingleCopy => write!(f, "SINGLE_COPY"),
            TransferState::BurstCopy { offset } => write!(f, "BURST_COPY[{}]", offset),
            TransferState::Done => write!(f, "DONE"),
        }
    }
}

/// DMA engine
///
/// The engine owns no memory itself: the byte store is passed by exclusive
/// reference to each `tick`, so a whole transfer is deterministic and
/// replayable.
///
/// # Examples
///
/// ```
/// use ttdma::core::dma::{Command, DmaEngine, Pins};
/// use ttdma::core::memory::ByteStore;
///
/// let mut engine = DmaEngine::new();
/// let mut store = ByteStore::new();
///
/// // Present a single copy 0 -> 4 for one edge
/// let mut pins = Pins { control: Command::single(0, 4).start_byte(), ..Pins::default() };
/// engine.tick(&pins, &mut store);
///
/// // Clear start and let the copy run
/// pins.control = 0;
/// let status = engine.tick(&pins, &mut store);
///
/// assert_eq!(status, 0x80 | b'a');
/// assert_eq!(store.read(4), b'a');
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmaEngine {
    /// Current state
    state: TransferState,

    /// Command latched when the transfer started
    latched: Command,

    /// Source window captured when the transfer started
    window: [u8; BURST_LENGTH],

    /// Byte written by the most recent copy step (full 8 bits)
    last_data: u8,

    /// Start bit level sampled on the previous edge
    start_prev: bool,
}

impl DmaEngine {
    /// Create an engine in its reset state
    pub fn new() -> Self {
        Self {
            state: TransferState::Idle,
            latched: Command::default(),
            window: [0; BURST_LENGTH],
            last_data: 0,
            start_prev: false,
        }
    }

    /// Advance the engine by one rising clock edge
    ///
    /// # Arguments
    ///
    /// * `pins` - Input pin levels sampled on this edge
    /// * `store` - Byte store the engine copies within
    ///
    /// # Returns
    ///
    /// The status byte driven after the edge
    pub fn tick(&mut self, pins: &Pins, store: &mut ByteStore) -> u8 {
        let start = is_start(pins.control);

        if !pins.reset_n {
            self.reset(store);
            // A start held through reset is stale, not a fresh pulse
            self.start_prev = start;
            return self.status_byte();
        }

        if !pins.enable {
            return self.status_byte();
        }

        let start_edge = start && !self.start_prev;
        self.start_prev = start;

        match self.state {
            TransferState::Idle | TransferState::Done => {
                if start_edge {
                    self.accept(Command::decode(pins.control), store);
                }
            }
            TransferState::SingleCopy => {
                if start_edge {
                    log::warn!("DMA start ignored: single copy in flight");
                }
                self.copy_step(store, 0);
                self.complete();
            }
            TransferState::BurstCopy { offset } => {
                if start_edge {
                    log::warn!("DMA start ignored: burst step {} in flight", offset);
                }
                self.copy_step(store, offset as usize);
                if offset as usize + 1 >= BURST_LENGTH {
                    self.complete();
                } else {
                    self.state = TransferState::BurstCopy { offset: offset + 1 };
                }
            }
        }

        self.status_byte()
    }

    /// Synchronous reset
    ///
    /// Returns to `Idle`, clears done and data, and reloads the store fixture.
    pub fn reset(&mut self, store: &mut ByteStore) {
        log::trace!("DMA reset");
        self.state = TransferState::Idle;
        self.latched = Command::default();
        self.window = [0; BURST_LENGTH];
        self.last_data = 0;
        store.restore_fixture();
    }

    /// Latch a command and its source window, then enter the matching copy state
    ///
    /// Copy steps write from the captured window, so a destination that
    /// overlaps the source still receives the pre-transfer bytes.
    fn accept(&mut self, command: Command, store: &ByteStore) {
        log::debug!("DMA started: {}", command);
        self.latched = command;
        self.window = [0; BURST_LENGTH];
        for (offset, slot) in self.window.iter_mut().take(command.length()).enumerate() {
            *slot = store.read(command.src as usize + offset);
        }
        self.state = match command.mode {
            TransferMode::Single => TransferState::SingleCopy,
            TransferMode::Burst => TransferState::BurstCopy { offset: 0 },
        };
    }

    /// Write the captured byte at `offset` to the latched destination
    #[inline(always)]
    fn copy_step(&mut self, store: &mut ByteStore, offset: usize) {
        let src = self.latched.src as usize + offset;
        let dst = self.latched.dst as usize + offset;

        let value = self.window[offset];
        store.write(dst, value);
        self.last_data = value;

        log::trace!("DMA copy [{}] -> [{}] = 0x{:02X}", src, dst, value);
    }

    fn complete(&mut self) {
        self.state = TransferState::Done;
        log::debug!(
            "DMA transfer complete: {} last=0x{:02X}",
            self.latched,
            self.last_data
        );
    }

    /// Current status register
    #[inline(always)]
    pub fn status(&self) -> Status {
        Status::new(self.is_done(), self.last_data)
    }

    /// Current status byte (`uo_out`)
    #[inline(always)]
    pub fn status_byte(&self) -> u8 {
        self.status().to_byte()
    }

    /// Done flag, raised only in `Done`
    #[inline(always)]
    pub fn is_done(&self) -> bool {
        self.state == TransferState::Done
    }

    /// Check whether a copy is in flight
    #[inline(always)]
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// Current transfer state
    pub fn state(&self) -> TransferState {
        self.state
    }

    /// Command latched by the most recent start
    pub fn latched(&self) -> Command {
        self.latched
    }

    /// Full 8-bit value written by the most recent copy step
    pub fn last_data(&self) -> u8 {
        self.last_data
    }

    /// Start bit level seen on the previous edge
    ///
    /// While high, a start bit on the next edge is not a fresh pulse.
    pub fn start_level(&self) -> bool {
        self.start_prev
    }
}

impl Default for DmaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateSave for DmaEngine {
    type State = EngineState;

    fn to_state(&self) -> Self::State {
        EngineState {
            state: self.state,
            latched: self.latched,
            window: self.window,
            last_data: self.last_data,
            start_prev: self.start_prev,
        }
    }

    fn restore_from_state(&mut self, state: &Self::State) {
        self.state = state.state;
        self.latched = state.latched;
        self.window = state.window;
        self.last_data = state.last_data;
        self.start_prev = state.start_prev;
    }
}
