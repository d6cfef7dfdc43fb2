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

//! System integration module
//!
//! This module ties the DMA engine to its byte store and input pins, and
//! provides the clock loop a host uses to drive it: the reset sequence,
//! one-cycle start pulses and polling for done.

use super::config::SimConfig;
use super::dma::{Command, DmaEngine, Pins, Status, TransferState};
use super::error::{Result, SimError};
use super::memory::ByteStore;
use super::save_state::{SaveState, StateSave};
use super::tracer::TransferTracer;

#[cfg(test)]
mod tests;

/// DMA device
///
/// Owns the engine, its byte store and the pin levels presented to it.
///
/// # Components
/// - Engine: transfer state machine
/// - Store: 16-slot byte store
/// - Pins: `rst_n`, `ena`, `ui_in` as the host last drove them
/// - Tracer: optional per-edge recorder
///
/// # Example
/// ```
/// use ttdma::core::dma::Command;
/// use ttdma::core::system::System;
///
/// let mut system = System::new();
/// system.reset();
///
/// let status = system.execute(Command::single(0, 4)).unwrap();
/// assert!(status.done());
/// assert_eq!(status.data(), b'a');
/// ```
pub struct System {
    /// DMA engine
    engine: DmaEngine,
    /// Byte store the engine copies within
    store: ByteStore,
    /// Pin levels sampled on the next edge
    pins: Pins,
    /// Total clock edges simulated
    cycles: u64,
    /// Per-edge tracer (optional)
    tracer: Option<TransferTracer>,
    /// Edges to hold reset low in `reset`
    reset_cycles: u32,
    /// Edges to wait in `wait_done`
    done_timeout: u32,
}

impl System {
    /// Create a System with default settings
    pub fn new() -> Self {
        let config = SimConfig::default();
        Self {
            engine: DmaEngine::new(),
            store: ByteStore::new(),
            pins: Pins::default(),
            cycles: 0,
            tracer: None,
            reset_cycles: config.reset_cycles,
            done_timeout: config.done_timeout,
        }
    }

    /// Create a System from validated settings
    ///
    /// # Errors
    /// Returns `SimError::Config` if the settings violate the pin contract.
    pub fn with_config(config: &SimConfig) -> Result<Self> {
        config.validate()?;

        let mut system = Self::new();
        system.store = ByteStore::with_fixture(config.fixture_bytes())?;
        system.reset_cycles = config.reset_cycles;
        system.done_timeout = config.done_timeout;
        if config.trace {
            system.enable_tracing();
        }
        Ok(system)
    }

    /// Drive `rst_n` (true = reset asserted, i.e. pin low)
    pub fn set_reset(&mut self, asserted: bool) {
        self.pins.reset_n = !asserted;
    }

    /// Drive `ena`
    pub fn set_enable(&mut self, enable: bool) {
        self.pins.enable = enable;
    }

    /// Drive `ui_in`
    pub fn set_control(&mut self, control: u8) {
        log::trace!("ui_in = 0x{:02X}", control);
        self.pins.control = control;
    }

    /// Simulate one rising clock edge
    ///
    /// # Returns
    /// Status byte (`uo_out`) after the edge
    pub fn tick(&mut self) -> u8 {
        let status = self.engine.tick(&self.pins, &mut self.store);
        self.cycles += 1;

        if let Some(tracer) = self.tracer.as_mut() {
            tracer.record(self.cycles, &self.pins, status, self.engine.state());
        }

        status
    }

    /// Simulate `cycles` rising clock edges
    pub fn run(&mut self, cycles: u32) -> u8 {
        let mut status = self.engine.status_byte();
        for _ in 0..cycles {
            status = self.tick();
        }
        status
    }

    /// Reset sequence
    ///
    /// Enables the engine, clears the control byte, holds reset for the
    /// configured number of edges and releases it. No edge is simulated after
    /// the release.
    pub fn reset(&mut self) {
        log::debug!("Reset asserted for {} cycles", self.reset_cycles);

        self.set_enable(true);
        self.set_control(0);
        self.set_reset(true);
        self.run(self.reset_cycles);
        self.set_reset(false);

        debug_assert_eq!(self.engine.status_byte(), 0);
        log::debug!("Reset released");
    }

    /// Issue a command
    ///
    /// Presents the command with start high for exactly one edge, then clears
    /// the control byte.
    ///
    /// # Errors
    /// - `SimError::Command` if the command fails driver-side validation
    /// - `SimError::InReset` if reset is asserted
    /// - `SimError::NotEnabled` if `ena` is low
    /// - `SimError::Busy` if a transfer is already in flight
    pub fn issue(&mut self, command: Command) -> Result<()> {
        if let Err(e) = command.validate(self.store.capacity()) {
            log::warn!("Rejected command {}: {}", command, e);
            return Err(e.into());
        }
        if !self.pins.reset_n {
            return Err(SimError::InReset);
        }
        if !self.pins.enable {
            return Err(SimError::NotEnabled);
        }
        if self.engine.is_busy() {
            return Err(SimError::Busy);
        }

        // A start level left high would hide the new pulse
        if self.engine.start_level() {
            log::debug!("Start still high, re-arming for one cycle");
            self.set_control(0);
            self.tick();
        }

        log::debug!("Issuing {} (ui_in=0x{:02X})", command, command.start_byte());
        self.set_control(command.start_byte());
        self.tick();
        self.set_control(0);

        Ok(())
    }

    /// Tick until the done flag is observed
    ///
    /// Checks the status before each edge, so a transfer that already
    /// completed returns without simulating anything.
    ///
    /// # Errors
    /// Returns `SimError::Timeout` if done is not observed within the
    /// configured number of edges.
    pub fn wait_done(&mut self) -> Result<Status> {
        let mut waited = 0;
        loop {
            let status = self.engine.status();
            if status.done() {
                log::debug!("Done after {} cycles: {}", waited, status);
                return Ok(status);
            }
            if waited >= self.done_timeout {
                return Err(SimError::Timeout { cycles: waited });
            }
            self.tick();
            waited += 1;
        }
    }

    /// Issue a command and wait for it to complete
    pub fn execute(&mut self, command: Command) -> Result<Status> {
        self.issue(command)?;
        self.wait_done()
    }

    /// Restore engine, store and pins from a snapshot
    pub fn restore(&mut self, state: &SaveState) -> Result<()> {
        self.store.load_raw(&state.store.data, &state.store.fixture)?;
        self.engine.restore_from_state(&state.engine);
        self.pins = state.pins;
        self.cycles = state.metadata.cycles;
        Ok(())
    }

    /// Start recording every edge
    pub fn enable_tracing(&mut self) {
        if self.tracer.is_none() {
            self.tracer = Some(TransferTracer::new());
        }
    }

    /// Stop recording and hand back the tracer
    pub fn take_tracer(&mut self) -> Option<TransferTracer> {
        self.tracer.take()
    }

    /// Get tracer reference (if tracing)
    pub fn tracer(&self) -> Option<&TransferTracer> {
        self.tracer.as_ref()
    }

    /// Current status register
    pub fn status(&self) -> Status {
        self.engine.status()
    }

    /// Current transfer state
    pub fn state(&self) -> TransferState {
        self.engine.state()
    }

    /// Get engine reference
    pub fn engine(&self) -> &DmaEngine {
        &self.engine
    }

    /// Get byte store reference
    pub fn store(&self) -> &ByteStore {
        &self.store
    }

    /// Current pin levels
    pub fn pins(&self) -> Pins {
        self.pins
    }

    /// Total clock edges simulated
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Configured reset length
    pub fn reset_cycles(&self) -> u32 {
        self.reset_cycles
    }

    /// Configured done timeout
    pub fn done_timeout(&self) -> u32 {
        self.done_timeout
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}
