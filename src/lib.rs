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

//! Cycle-level simulator of a tiny memory-mapped DMA engine
//!
//! The engine lives behind a Tiny Tapeout style pin interface: one control
//! byte in, one status byte out, an active-low reset and an enable line.
//! Each call to [`core::System::tick`] is one rising clock edge.
//!
//! # Example
//!
//! ```
//! use ttdma::core::dma::Command;
//! use ttdma::core::System;
//!
//! let mut system = System::new();
//! system.reset();
//!
//! let status = system.execute(Command::single(0, 4)).unwrap();
//! assert!(status.done());
//! assert_eq!(status.data(), b'a');
//! ```

pub mod core;
