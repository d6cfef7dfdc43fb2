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

//! Custom assertions for DMA simulator testing

use ttdma::core::system::System;

/// Assert the status byte reports done with the expected data
#[allow(dead_code)]
pub fn assert_done_with(status: u8, expected: u8) {
    assert_eq!(
        status & 0x80,
        0x80,
        "done flag not set: uo_out=0x{:02X}",
        status
    );
    assert_eq!(
        status & 0x7F,
        expected & 0x7F,
        "data mismatch: expected 0x{:02X}, got 0x{:02X}",
        expected & 0x7F,
        status & 0x7F
    );
}

/// Assert a window of the store holds the expected bytes
#[allow(dead_code)]
pub fn assert_store_window(system: &System, start: usize, expected: &[u8]) {
    let actual = &system.store().as_slice()[start..start + expected.len()];
    assert_eq!(
        actual,
        expected,
        "store[{}..{}] mismatch: expected {:?}, got {:?}",
        start,
        start + expected.len(),
        String::from_utf8_lossy(expected),
        String::from_utf8_lossy(actual)
    );
}
