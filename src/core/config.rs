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

//! Simulator configuration
//!
//! Settings come from three layers, later layers winning:
//! 1. Built-in defaults
//! 2. A TOML file (`SimConfig::load`)
//! 3. `TTDMA_*` environment variables (`SimConfig::apply_env`), which the
//!    binary may populate from a `.env` file
//!
//! # TOML Format
//!
//! ```toml
//! fixture = "abcdefghijklmnop"
//! reset_cycles = 5
//! done_timeout = 64
//! trace = false
//! ```
//!
//! # Example
//!
//! ```
//! use ttdma::core::config::SimConfig;
//!
//! let config = SimConfig::from_toml_str("reset_cycles = 8").unwrap();
//! assert_eq!(config.reset_cycles, 8);
//! assert_eq!(config.done_timeout, 64);
//! ```

use crate::core::error::{Result, SimError};
use crate::core::memory::{DEFAULT_FIXTURE, STORE_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Minimum reset length required by the pin contract
pub const MIN_RESET_CYCLES: u32 = 5;

/// Environment variable overriding the store fixture
pub const ENV_FIXTURE: &str = "TTDMA_FIXTURE";
/// Environment variable overriding the reset length
pub const ENV_RESET_CYCLES: &str = "TTDMA_RESET_CYCLES";
/// Environment variable overriding the done timeout
pub const ENV_DONE_TIMEOUT: &str = "TTDMA_DONE_TIMEOUT";
/// Environment variable enabling per-edge tracing
pub const ENV_TRACE: &str = "TTDMA_TRACE";

/// Simulator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Bytes loaded into the store at reset (1-16 bytes, zero-filled)
    pub fixture: String,

    /// Edges to hold reset low during the reset sequence
    pub reset_cycles: u32,

    /// Edges to wait for done before giving up
    pub done_timeout: u32,

    /// Record every edge in a transfer trace
    pub trace: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixture: String::from_utf8_lossy(DEFAULT_FIXTURE).into_owned(),
            reset_cycles: MIN_RESET_CYCLES,
            done_timeout: 64,
            trace: false,
        }
    }
}

impl SimConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SimConfig =
            toml::from_str(text).map_err(|e| SimError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serialize to a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| SimError::Config(e.to_string()))
    }

    /// Apply `TTDMA_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `TTDMA_*` overrides from an arbitrary lookup
    ///
    /// Re-validates the result.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(fixture) = lookup(ENV_FIXTURE) {
            log::debug!("{} override: {:?}", ENV_FIXTURE, fixture);
            self.fixture = fixture;
        }
        if let Some(value) = lookup(ENV_RESET_CYCLES) {
            self.reset_cycles = parse_number(ENV_RESET_CYCLES, &value)?;
        }
        if let Some(value) = lookup(ENV_DONE_TIMEOUT) {
            self.done_timeout = parse_number(ENV_DONE_TIMEOUT, &value)?;
        }
        if let Some(value) = lookup(ENV_TRACE) {
            self.trace = parse_flag(ENV_TRACE, &value)?;
        }
        self.validate()
    }

    /// Check every setting against the pin contract
    pub fn validate(&self) -> Result<()> {
        let len = self.fixture.len();
        if len == 0 || len > STORE_SIZE {
            return Err(SimError::Config(format!(
                "fixture must be 1-{} bytes, got {}",
                STORE_SIZE, len
            )));
        }
        if self.reset_cycles < MIN_RESET_CYCLES {
            return Err(SimError::Config(format!(
                "reset_cycles must be at least {}, got {}",
                MIN_RESET_CYCLES, self.reset_cycles
            )));
        }
        if self.done_timeout == 0 {
            return Err(SimError::Config("done_timeout must be at least 1".into()));
        }
        Ok(())
    }

    /// Fixture as raw bytes
    pub fn fixture_bytes(&self) -> &[u8] {
        self.fixture.as_bytes()
    }
}

fn parse_number(key: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| SimError::Parse(format!("{}: expected a number, got {:?}", key, value)))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(SimError::Parse(format!(
            "{}: expected a boolean, got {:?}",
            key, value
        ))),
    }
}
