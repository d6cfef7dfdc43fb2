// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Host driver tests (issue, wait_done, execute)

use super::super::*;
use crate::core::error::CommandError;

fn ready_system() -> System {
    let mut system = System::new();
    system.reset();
    system
}

#[test]
fn test_issue_presents_one_cycle_pulse() {
    let mut system = ready_system();
    system.enable_tracing();

    system.issue(Command::single(0, 4)).unwrap();

    let tracer = system.tracer().unwrap();
    assert_eq!(tracer.entries().len(), 1);
    assert_eq!(tracer.entries()[0].control, 0x88);
    // Control byte cleared after the pulse
    assert_eq!(system.pins().control, 0);
    assert_eq!(system.state(), TransferState::SingleCopy);
}

#[test]
fn test_single_transfer() {
    let mut system = ready_system();

    let status = system.execute(Command::single(0, 4)).unwrap();

    assert!(status.done());
    assert_eq!(status.data(), 0x61);
    assert_eq!(system.store().read(4), b'a');
    // 5 reset edges, 1 start edge, 1 copy edge
    assert_eq!(system.cycles(), 7);
}

#[test]
fn test_burst_transfer() {
    let mut system = ready_system();

    let status = system.execute(Command::burst(0, 4)).unwrap();

    assert!(status.done());
    assert_eq!(status.data(), 0x64);
    assert_eq!(&system.store().as_slice()[4..8], b"abcd");
    assert_eq!(system.cycles(), 5 + 1 + 4);
}

#[test]
fn test_wait_done_returns_immediately_when_done() {
    let mut system = ready_system();
    system.execute(Command::single(1, 2)).unwrap();

    let cycles = system.cycles();
    let status = system.wait_done().unwrap();
    assert_eq!(system.cycles(), cycles);
    assert_eq!(status.data(), b'b');
}

#[test]
fn test_wait_done_timeout() {
    let mut system = ready_system();

    // Nothing issued: done never rises
    let result = system.wait_done();
    assert!(matches!(result, Err(SimError::Timeout { cycles: 64 })));

    // Transfer frozen by ena low
    let config = SimConfig {
        done_timeout: 4,
        ..SimConfig::default()
    };
    let mut system = System::with_config(&config).unwrap();
    system.reset();
    system.issue(Command::burst(0, 4)).unwrap();
    system.set_enable(false);
    assert!(matches!(
        system.wait_done(),
        Err(SimError::Timeout { cycles: 4 })
    ));

    system.set_enable(true);
    assert_eq!(system.wait_done().unwrap().data(), b'd');
}

#[test]
fn test_issue_rejects_invalid_command() {
    let mut system = ready_system();

    let result = system.issue(Command::single(8, 0));
    assert!(matches!(
        result,
        Err(SimError::Command(CommandError::IndexOutOfRange { index: 8, .. }))
    ));
    // Nothing was driven
    assert_eq!(system.cycles(), 5);
}

#[test]
fn test_issue_rejected_in_reset_or_disabled() {
    let mut system = ready_system();

    system.set_reset(true);
    assert!(matches!(
        system.issue(Command::single(0, 1)),
        Err(SimError::InReset)
    ));
    system.set_reset(false);

    system.set_enable(false);
    assert!(matches!(
        system.issue(Command::single(0, 1)),
        Err(SimError::NotEnabled)
    ));
}

#[test]
fn test_issue_rejected_while_busy() {
    let mut system = ready_system();

    system.issue(Command::burst(0, 4)).unwrap();
    assert!(matches!(
        system.issue(Command::single(7, 0)),
        Err(SimError::Busy)
    ));

    // The burst is unaffected
    let status = system.wait_done().unwrap();
    assert_eq!(status.data(), b'd');
    assert_eq!(system.store().read(0), b'a');
}

#[test]
fn test_back_to_back_commands() {
    let mut system = ready_system();

    let first = system.execute(Command::single(0, 4)).unwrap();
    let second = system.execute(Command::burst(0, 4)).unwrap();
    let third = system.execute(Command::burst(0, 4)).unwrap();

    assert_eq!(first.to_byte(), 0xE1);
    assert_eq!(second.to_byte(), 0xE4);
    assert_eq!(third, second);
    assert_eq!(&system.store().as_slice()[..8], b"abcdabcd");
}

#[test]
fn test_start_held_high_runs_one_burst() {
    let mut system = ready_system();

    // Overlapping burst so a second run would change the store
    system.set_control(Command::burst(0, 1).start_byte());
    let mut done_edges = 0;
    for _ in 0..12 {
        if system.tick() & 0x80 != 0 {
            done_edges += 1;
        }
    }

    // Done rises on the last copy edge (5th) and holds for the rest
    assert_eq!(done_edges, 8);
    assert_eq!(&system.store().as_slice()[..6], b"aabcdf");
}
