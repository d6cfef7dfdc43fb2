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

/// Simulator error types
use thiserror::Error;

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimError>;

/// Main error type for the simulator
///
/// The DMA engine itself never fails; every variant here belongs to the
/// harness, the driver-side command validation, or the file-backed surfaces
/// (configuration, traces, snapshots).
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Command rejected: {0}")]
    Command(#[from] CommandError),

    #[error("Timed out after {cycles} cycles waiting for done")]
    Timeout { cycles: u32 },

    #[error("Engine is not enabled (ena low)")]
    NotEnabled,

    #[error("Engine is held in reset (rst_n low)")]
    InReset,

    #[error("Transfer already in flight")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Save state error: {0}")]
    SaveState(String),

    #[error("Trace error: {0}")]
    Trace(String),
}

/// Driver-side command validation errors
///
/// These are raised before a start pulse is ever presented to the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("{field} index {index} out of range (valid range: 0-7)")]
    IndexOutOfRange { field: &'static str, index: u8 },

    #[error("{field} window at {index} (length {length}) exceeds store capacity {capacity}")]
    BurstOutOfRange {
        field: &'static str,
        index: u8,
        length: usize,
        capacity: usize,
    },

    #[error("Start bit clear in raw command 0x{raw:02X}")]
    StartBitClear { raw: u8 },
}
