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

//! Simulator components
//!
//! - DMA engine (control decode, transfer state machine, status encode)
//! - Byte store backing the transfers
//! - System harness (pins, clock, reset sequence, host driver)
//! - Configuration, tracing and snapshots

pub mod config;
pub mod dma;
pub mod error;
pub mod memory;
pub mod save_state;
pub mod system;
pub mod tracer;

// Re-export commonly used types
pub use config::SimConfig;
pub use dma::{Command, DmaEngine, Pins, Status, TransferMode, TransferState};
pub use error::{CommandError, Result, SimError};
pub use memory::ByteStore;
pub use system::System;
pub use tracer::TransferTracer;
