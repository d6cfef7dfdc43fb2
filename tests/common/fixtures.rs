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

//! Test fixtures for common test scenarios

use ttdma::core::config::SimConfig;
use ttdma::core::system::System;

/// Install the test logger once per binary
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Create a System and run the reset sequence
#[allow(dead_code)]
pub fn create_and_reset_system() -> System {
    let mut system = System::new();
    system.reset();
    system
}

/// Create a System over a custom fixture and run the reset sequence
#[allow(dead_code)]
pub fn system_with_fixture(fixture: &str) -> System {
    let config = SimConfig {
        fixture: fixture.to_string(),
        ..SimConfig::default()
    };
    let mut system = System::with_config(&config).expect("valid fixture");
    system.reset();
    system
}

/// Drive a raw control byte for one edge, then clear it
///
/// Bypasses the driver's validation, the way a test bench pokes `ui_in`.
#[allow(dead_code)]
pub fn pulse_control(system: &mut System, control: u8) {
    system.set_control(control);
    system.tick();
    system.set_control(0);
}

/// Tick until bit 7 of `uo_out` is set, returning the status byte
#[allow(dead_code)]
pub fn poll_done(system: &mut System, limit: u32) -> u8 {
    let mut status = system.status().to_byte();
    for _ in 0..limit {
        if status & 0x80 != 0 {
            return status;
        }
        status = system.tick();
    }
    panic!("done not observed within {} cycles", limit);
}
