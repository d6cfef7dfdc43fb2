// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Helper functions for DMA tests

use super::super::*;

/// Pins with the given control byte, reset released and enable high
pub(super) fn pins(control: u8) -> Pins {
    Pins {
        control,
        ..Pins::default()
    }
}

/// Present `command` with start high for one edge, then clear start
///
/// Returns the status byte after the start edge. Panics if the command
/// cannot be encoded on the control pins.
pub(super) fn start(engine: &mut DmaEngine, store: &mut ByteStore, command: Command) -> u8 {
    if let Err(e) = command.validate(store.capacity()) {
        panic!("invalid test command {}: {}", command, e);
    }
    engine.tick(&pins(command.start_byte()), store)
}

/// Tick with an idle control byte until done, returning the edges spent
pub(super) fn run_to_done(engine: &mut DmaEngine, store: &mut ByteStore) -> usize {
    let idle = pins(0);
    let mut edges = 0;
    while !engine.is_done() {
        engine.tick(&idle, store);
        edges += 1;
        assert!(edges <= 16, "engine never reached DONE");
    }
    edges
}

/// Issue a command and run it to completion
pub(super) fn execute(engine: &mut DmaEngine, store: &mut ByteStore, command: Command) -> u8 {
    start(engine, store, command);
    run_to_done(engine, store);
    engine.status_byte()
}

#[test]
fn test_execute_helper_single() {
    let mut engine = DmaEngine::new();
    let mut store = ByteStore::new();

    let status = execute(&mut engine, &mut store, Command::single(1, 5));
    assert_eq!(status, 0x80 | b'b');
}

#[test]
#[should_panic(expected = "invalid test command")]
fn test_start_helper_rejects_wide_index() {
    let mut engine = DmaEngine::new();
    let mut store = ByteStore::new();

    start(&mut engine, &mut store, Command::burst(2, 8));
}
