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

//! Per-edge transfer tracer for debugging
//!
//! Records the pins and status of every simulated clock edge, then dumps them
//! as JSON or as a plain line log.

use crate::core::dma::{Pins, TransferState};
use crate::core::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// One recorded clock edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Edge number (1-based, counted since the system was created)
    pub cycle: u64,
    /// `rst_n` level
    pub reset_n: bool,
    /// `ena` level
    pub enable: bool,
    /// Control byte (`ui_in`)
    pub control: u8,
    /// Status byte after the edge (`uo_out`)
    pub status: u8,
    /// Engine state after the edge
    pub state: TransferState,
}

/// Transfer tracer
///
/// Each entry shows:
/// - Edge number
/// - Reset and enable levels
/// - Control and status bytes
/// - Engine state after the edge
///
/// # Example
/// ```
/// use ttdma::core::dma::{Pins, TransferState};
/// use ttdma::core::tracer::TransferTracer;
///
/// let mut tracer = TransferTracer::new();
/// tracer.record(1, &Pins::default(), 0x00, TransferState::Idle);
/// assert_eq!(tracer.entries().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransferTracer {
    /// Enable/disable recording
    enabled: bool,
    /// Recorded edges
    entries: Vec<TraceEntry>,
}

impl TransferTracer {
    /// Create an enabled tracer with no entries
    pub fn new() -> Self {
        Self {
            enabled: true,
            entries: Vec::new(),
        }
    }

    /// Enable or disable recording
    ///
    /// When disabled, `record` returns immediately.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check if recording is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record one edge
    pub fn record(&mut self, cycle: u64, pins: &Pins, status: u8, state: TransferState) {
        if !self.enabled {
            return;
        }

        self.entries.push(TraceEntry {
            cycle,
            reset_n: pins.reset_n,
            enable: pins.enable,
            control: pins.control,
            status,
            state,
        });
    }

    /// Recorded edges, oldest first
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Drop every recorded edge
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Render the trace as a JSON array
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.entries).map_err(|e| SimError::Trace(e.to_string()))
    }

    /// Write the trace as a JSON array
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.entries)
            .map_err(|e| SimError::Trace(e.to_string()))?;
        writer.flush()?;
        Ok(())
    }

    /// Write the trace as one text line per edge
    pub fn write_log<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        for entry in &self.entries {
            writeln!(writer, "{}", format_entry(entry))?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// Format one entry as a log line
pub fn format_entry(entry: &TraceEntry) -> String {
    format!(
        "cycle={:06} rst_n={} ena={} ui_in=0x{:02X} uo_out=0x{:02X} | {}",
        entry.cycle,
        u8::from(entry.reset_n),
        u8::from(entry.enable),
        entry.control,
        entry.status,
        entry.state
    )
}
