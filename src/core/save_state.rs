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

//! Snapshot serialization for the DMA simulator
//!
//! A snapshot captures everything needed to resume a simulation on the exact
//! clock edge it was taken:
//! - Metadata (timestamp, cycle count, label)
//! - Engine state (transfer state, latched command and source window, last data,
//!   start level)
//! - Byte store contents and its reset fixture
//! - Input pin levels
//!
//! Snapshots are serialized using bincode. Loading a snapshot with a
//! different version fails with an error.
//!
//! # Example
//!
//! ```no_run
//! use ttdma::core::save_state::SaveState;
//! use ttdma::core::System;
//!
//! let mut system = System::new();
//! // ... run simulation ...
//!
//! let state = SaveState::from_system(&system);
//! state.save_to_file("dma.state").unwrap();
//!
//! let loaded = SaveState::load_from_file("dma.state").unwrap();
//! loaded.apply_to(&mut system).unwrap();
//! ```

use crate::core::dma::{Command, Pins, TransferState, BURST_LENGTH};
use crate::core::error::{Result, SimError};
use crate::core::System;
use bincode::{config, Decode, Encode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Snapshot version for compatibility checking
///
/// Incremented whenever the snapshot layout changes incompatibly.
pub const SAVE_STATE_VERSION: u32 = 1;

/// Complete simulator snapshot
#[derive(Debug, Serialize, Deserialize, Encode, Decode)]
pub struct SaveState {
    /// Version number for compatibility checking
    pub version: u32,

    /// Snapshot metadata
    pub metadata: SaveStateMetadata,

    /// Engine state
    pub engine: EngineState,

    /// Byte store image
    pub store: StoreState,

    /// Input pin levels
    pub pins: Pins,
}

/// Snapshot metadata
#[derive(Debug, Serialize, Deserialize, Encode, Decode)]
#[bincode(encode_bounds = "", decode_bounds = "")]
pub struct SaveStateMetadata {
    /// Timestamp when the snapshot was created
    #[bincode(with_serde)]
    pub timestamp: DateTime<Utc>,

    /// Clock edges simulated so far
    pub cycles: u64,

    /// Free-form label
    pub label: String,
}

/// DMA engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct EngineState {
    pub state: TransferState,
    pub latched: Command,
    pub window: [u8; BURST_LENGTH],
    pub last_data: u8,
    pub start_prev: bool,
}

/// Byte store image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct StoreState {
    /// Current contents
    pub data: Vec<u8>,

    /// Fixture restored on reset
    pub fixture: Vec<u8>,
}

impl SaveState {
    /// Capture the current system state
    ///
    /// # Example
    ///
    /// ```
    /// # use ttdma::core::{System, save_state::SaveState};
    /// # let system = System::new();
    /// let state = SaveState::from_system(&system);
    /// assert_eq!(state.metadata.cycles, 0);
    /// ```
    pub fn from_system(system: &System) -> Self {
        Self {
            version: SAVE_STATE_VERSION,
            metadata: SaveStateMetadata {
                timestamp: Utc::now(),
                cycles: system.cycles(),
                label: String::new(),
            },
            engine: system.engine().to_state(),
            store: StoreState {
                data: system.store().as_slice().to_vec(),
                fixture: system.store().fixture().to_vec(),
            },
            pins: system.pins(),
        }
    }

    /// Attach a label to the snapshot
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.metadata.label = label.into();
        self
    }

    /// Restore this snapshot into `system`
    ///
    /// # Errors
    ///
    /// Returns `SimError::SaveState` if the store image has the wrong size.
    /// The system is left untouched in that case.
    pub fn apply_to(&self, system: &mut System) -> Result<()> {
        system.restore(self)
    }

    /// Encode to bincode bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::encode_to_vec(self, config::standard())
            .map_err(|e| SimError::SaveState(e.to_string()))
    }

    /// Decode from bincode bytes and check the version
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (state, _): (SaveState, usize) =
            bincode::decode_from_slice(bytes, config::standard())
                .map_err(|e| SimError::SaveState(e.to_string()))?;

        if state.version != SAVE_STATE_VERSION {
            return Err(SimError::SaveState(format!(
                "Incompatible save state version: expected {}, got {}",
                SAVE_STATE_VERSION, state.version
            )));
        }

        Ok(state)
    }

    /// Save to file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created, or encoding or writing fails.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let encoded = self.to_bytes()?;
        let mut file = File::create(path)?;
        file.write_all(&encoded)?;
        Ok(())
    }

    /// Load from file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, decoding fails, or the
    /// version is incompatible.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Self::from_bytes(&buffer)
    }
}

/// Trait for components that can be saved and restored
pub trait StateSave {
    /// The state type for this component
    type State: Serialize + for<'de> Deserialize<'de>;

    /// Convert this component to a saveable state
    fn to_state(&self) -> Self::State;

    /// Restore this component from a saved state
    fn restore_from_state(&mut self, state: &Self::State);
}
