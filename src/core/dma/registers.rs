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

//! Control and status register decode
//!
//! ## Control Byte (`ui_in`)
//!
//! ```text
//! 7:   Start pulse
//! 6-4: Source index
//! 3-1: Destination index
//! 0:   Mode (0=single, 1=burst)
//! ```
//!
//! ## Status Byte (`uo_out`)
//!
//! ```text
//! 7:   Done flag
//! 6-0: Last copied byte (low 7 bits)
//! ```

use super::BURST_LENGTH;
use crate::core::error::CommandError;
use bincode::{Decode, Encode};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Single-bit fields of the control byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ControlFlags: u8 {
        /// Start pulse (bit 7)
        const START = 0x80;
        /// Burst mode (bit 0)
        const BURST = 0x01;
    }
}

bitflags! {
    /// Single-bit fields of the status byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        /// Transfer complete (bit 7)
        const DONE = 0x80;
    }
}

/// Transfer mode (control bit 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode)]
pub enum TransferMode {
    /// One byte per command
    #[default]
    Single,
    /// `BURST_LENGTH` consecutive bytes per command
    Burst,
}

impl TransferMode {
    /// Number of copy steps a command in this mode performs
    #[inline(always)]
    pub fn length(self) -> usize {
        match self {
            TransferMode::Single => 1,
            TransferMode::Burst => BURST_LENGTH,
        }
    }
}

/// Decoded command fields
///
/// The start bit is not part of the command: it is the trigger that makes the
/// engine latch these fields.
///
/// # Examples
///
/// ```
/// use ttdma::core::dma::{Command, TransferMode};
///
/// let cmd = Command::decode(0b1000_1001);
/// assert_eq!(cmd.src, 0);
/// assert_eq!(cmd.dst, 4);
/// assert_eq!(cmd.mode, TransferMode::Burst);
/// assert_eq!(cmd.start_byte(), 0b1000_1001);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct Command {
    /// Source index (0-7)
    pub src: u8,
    /// Destination index (0-7)
    pub dst: u8,
    /// Single or burst
    pub mode: TransferMode,
}

impl Command {
    const SRC_SHIFT: u8 = 4;
    const DST_SHIFT: u8 = 1;
    const INDEX_MASK: u8 = 0x07;

    /// Highest index a 3-bit field can hold
    pub const MAX_INDEX: u8 = Self::INDEX_MASK;

    /// Single-byte copy from `src` to `dst`
    pub fn single(src: u8, dst: u8) -> Self {
        Self {
            src,
            dst,
            mode: TransferMode::Single,
        }
    }

    /// Burst copy from `src..src+BURST_LENGTH` to `dst..dst+BURST_LENGTH`
    pub fn burst(src: u8, dst: u8) -> Self {
        Self {
            src,
            dst,
            mode: TransferMode::Burst,
        }
    }

    /// Decode the command fields of a raw control byte
    ///
    /// Pure mapping, the start bit is ignored.
    #[inline(always)]
    pub fn decode(raw: u8) -> Self {
        let mode = if ControlFlags::from_bits_truncate(raw).contains(ControlFlags::BURST) {
            TransferMode::Burst
        } else {
            TransferMode::Single
        };

        Self {
            src: (raw >> Self::SRC_SHIFT) & Self::INDEX_MASK,
            dst: (raw >> Self::DST_SHIFT) & Self::INDEX_MASK,
            mode,
        }
    }

    /// Decode a raw control byte that must carry a start pulse
    ///
    /// Used by drivers replaying recorded control bytes.
    pub fn from_start_byte(raw: u8) -> Result<Self, CommandError> {
        if !is_start(raw) {
            return Err(CommandError::StartBitClear { raw });
        }
        Ok(Self::decode(raw))
    }

    /// Encode the command fields with the start bit clear
    ///
    /// Indices must fit their 3-bit fields (see `validate`). Debug builds
    /// panic on a wider index; release builds drop the bits above bit 2.
    #[inline(always)]
    pub fn encode(&self) -> u8 {
        debug_assert!(
            self.src <= Self::MAX_INDEX && self.dst <= Self::MAX_INDEX,
            "command index out of range: {}",
            self
        );
        let mut raw = ((self.src & Self::INDEX_MASK) << Self::SRC_SHIFT)
            | ((self.dst & Self::INDEX_MASK) << Self::DST_SHIFT);
        if self.mode == TransferMode::Burst {
            raw |= ControlFlags::BURST.bits();
        }
        raw
    }

    /// Encode the command with the start bit set
    #[inline(always)]
    pub fn start_byte(&self) -> u8 {
        self.encode() | ControlFlags::START.bits()
    }

    /// Number of copy steps this command performs
    #[inline(always)]
    pub fn length(&self) -> usize {
        self.mode.length()
    }

    /// Driver-side validation
    ///
    /// Checks that both indices fit in their 3-bit fields and that the whole
    /// source and destination windows fit in a store of `capacity` slots.
    pub fn validate(&self, capacity: usize) -> Result<(), CommandError> {
        for (field, index) in [("source", self.src), ("destination", self.dst)] {
            if index > Self::MAX_INDEX {
                return Err(CommandError::IndexOutOfRange { field, index });
            }
            if index as usize + self.length() > capacity {
                return Err(CommandError::BurstOutOfRange {
                    field,
                    index,
                    length: self.length(),
                    capacity,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            TransferMode::Single => "single",
            TransferMode::Burst => "burst",
        };
        write!(f, "{} src={} dst={}", mode, self.src, self.dst)
    }
}

/// Check the start bit of a raw control byte
#[inline(always)]
pub fn is_start(raw: u8) -> bool {
    ControlFlags::from_bits_truncate(raw).contains(ControlFlags::START)
}

/// Decoded status byte
///
/// # Examples
///
/// ```
/// use ttdma::core::dma::Status;
///
/// let status = Status::from_byte(0xE1);
/// assert!(status.done());
/// assert_eq!(status.data(), 0x61);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Status {
    done: bool,
    data: u8,
}

impl Status {
    const DATA_MASK: u8 = 0x7F;

    /// Build a status from the done flag and the last copied byte
    ///
    /// Only the low 7 bits of `last_byte` are visible.
    pub fn new(done: bool, last_byte: u8) -> Self {
        Self {
            done,
            data: last_byte & Self::DATA_MASK,
        }
    }

    /// Decode a raw status byte
    #[inline(always)]
    pub fn from_byte(raw: u8) -> Self {
        Self {
            done: StatusFlags::from_bits_truncate(raw).contains(StatusFlags::DONE),
            data: raw & Self::DATA_MASK,
        }
    }

    /// Encode as a raw status byte
    #[inline(always)]
    pub fn to_byte(&self) -> u8 {
        let flags = if self.done {
            StatusFlags::DONE
        } else {
            StatusFlags::empty()
        };
        flags.bits() | self.data
    }

    /// Done flag (bit 7)
    #[inline(always)]
    pub fn done(&self) -> bool {
        self.done
    }

    /// Last copied byte (bits 6-0)
    #[inline(always)]
    pub fn data(&self) -> u8 {
        self.data
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "done={} data=0x{:02X}",
            u8::from(self.done),
            self.data
        )
    }
}
