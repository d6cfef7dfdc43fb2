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

//! Internal byte store of the DMA engine
//!
//! The engine addresses its store with 3-bit source/destination indices, and a
//! burst reaches up to `index + BURST_LENGTH - 1`. The store is therefore sized
//! to 16 slots, which covers every index a valid command can touch.
//!
//! # Layout
//!
//! | Index | Reset value (default fixture) |
//! |-------|-------------------------------|
//! | 0-3   | `a` `b` `c` `d`               |
//! | 4-7   | `e` `f` `g` `h`               |
//! | 8-15  | `i` .. `p`                    |
//!
//! # Example
//!
//! ```
//! use ttdma::core::memory::ByteStore;
//!
//! let mut store = ByteStore::new();
//! assert_eq!(store.read(0), b'a');
//!
//! store.write(4, b'a');
//! assert_eq!(store.read(4), b'a');
//!
//! // Reset reloads the fixture
//! store.restore_fixture();
//! assert_eq!(store.read(4), b'e');
//! ```

use crate::core::error::{Result, SimError};

#[cfg(test)]
mod tests;

/// Number of byte slots in the store
pub const STORE_SIZE: usize = 16;

/// Fixture pattern loaded into the store at reset
pub const DEFAULT_FIXTURE: &[u8] = b"abcdefghijklmnop";

/// Fixed-size byte store owned by the engine's device
///
/// Only completed copy steps mutate the store; it is never resized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteStore {
    /// Current contents
    data: [u8; STORE_SIZE],

    /// Contents restored on reset
    fixture: [u8; STORE_SIZE],
}

impl ByteStore {
    /// Create a store pre-loaded with the default fixture
    pub fn new() -> Self {
        let mut fixture = [0u8; STORE_SIZE];
        fixture.copy_from_slice(DEFAULT_FIXTURE);
        Self {
            data: fixture,
            fixture,
        }
    }

    /// Create a store pre-loaded with a custom fixture
    ///
    /// Slots past the end of `fixture` reset to zero.
    ///
    /// # Arguments
    ///
    /// * `fixture` - Between 1 and `STORE_SIZE` bytes
    ///
    /// # Returns
    ///
    /// - `Ok(ByteStore)` if the fixture fits
    /// - `Err(SimError::Config)` if the fixture is empty or too long
    pub fn with_fixture(fixture: &[u8]) -> Result<Self> {
        if fixture.is_empty() || fixture.len() > STORE_SIZE {
            return Err(SimError::Config(format!(
                "fixture must be 1-{} bytes, got {}",
                STORE_SIZE,
                fixture.len()
            )));
        }

        let mut pattern = [0u8; STORE_SIZE];
        pattern[..fixture.len()].copy_from_slice(fixture);
        Ok(Self {
            data: pattern,
            fixture: pattern,
        })
    }

    /// Number of addressable slots
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        STORE_SIZE
    }

    /// Read the byte at `index`
    ///
    /// Out-of-range reads are logged and return 0.
    #[inline(always)]
    pub fn read(&self, index: usize) -> u8 {
        match self.data.get(index) {
            Some(&value) => value,
            None => {
                log::error!("Store read out of bounds: index {}", index);
                0
            }
        }
    }

    /// Write `value` at `index`
    ///
    /// Out-of-range writes are logged and dropped.
    #[inline(always)]
    pub fn write(&mut self, index: usize, value: u8) {
        match self.data.get_mut(index) {
            Some(slot) => *slot = value,
            None => log::error!("Store write out of bounds: index {}", index),
        }
    }

    /// Reload the fixture pattern
    pub fn restore_fixture(&mut self) {
        self.data = self.fixture;
    }

    /// Current contents
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Fixture pattern loaded at reset
    pub fn fixture(&self) -> &[u8] {
        &self.fixture
    }

    /// Overwrite contents and fixture from raw slices
    ///
    /// Used when restoring a snapshot. Both slices must be exactly
    /// `STORE_SIZE` bytes long.
    pub(crate) fn load_raw(&mut self, data: &[u8], fixture: &[u8]) -> Result<()> {
        if data.len() != STORE_SIZE || fixture.len() != STORE_SIZE {
            return Err(SimError::SaveState(format!(
                "store image must be {} bytes (data={}, fixture={})",
                STORE_SIZE,
                data.len(),
                fixture.len()
            )));
        }
        self.data.copy_from_slice(data);
        self.fixture.copy_from_slice(fixture);
        Ok(())
    }
}

impl Default for ByteStore {
    fn default() -> Self {
        Self::new()
    }
}
