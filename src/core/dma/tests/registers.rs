// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Control/status register decode tests

use super::super::*;
use crate::core::error::CommandError;
use crate::core::memory::STORE_SIZE;

#[test]
fn test_control_decode_fields() {
    // start=1, src=000, dst=100, mode=0
    let cmd = Command::decode(0b1000_1000);
    assert_eq!(cmd, Command::single(0, 4));
    assert!(is_start(0b1000_1000));

    // start=1, src=000, dst=100, mode=1
    let cmd = Command::decode(0b1000_1001);
    assert_eq!(cmd, Command::burst(0, 4));

    // start=0, src=111, dst=011, mode=1
    let cmd = Command::decode(0b0111_0111);
    assert_eq!(cmd.src, 7);
    assert_eq!(cmd.dst, 3);
    assert_eq!(cmd.mode, TransferMode::Burst);
    assert!(!is_start(0b0111_0111));
}

#[test]
fn test_control_encode() {
    assert_eq!(Command::single(0, 4).encode(), 0b0000_1000);
    assert_eq!(Command::single(0, 4).start_byte(), 0b1000_1000);
    assert_eq!(Command::burst(7, 7).start_byte(), 0xFF);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "command index out of range")]
fn test_encode_wide_index_panics_in_debug() {
    Command::burst(2, 8).start_byte();
}

#[test]
#[cfg(not(debug_assertions))]
fn test_encode_wide_index_truncates_in_release() {
    assert_eq!(Command::single(9, 0).encode(), 0b0001_0000);
}

#[test]
fn test_decode_encode_all_bytes() {
    for raw in 0..=u8::MAX {
        let cmd = Command::decode(raw);
        assert_eq!(cmd.encode(), raw & 0x7F, "raw=0x{:02X}", raw);
    }
}

#[test]
fn test_from_start_byte() {
    assert_eq!(
        Command::from_start_byte(0x89).unwrap(),
        Command::burst(0, 4)
    );
    assert_eq!(
        Command::from_start_byte(0x09),
        Err(CommandError::StartBitClear { raw: 0x09 })
    );
}

#[test]
fn test_control_flags() {
    let flags = ControlFlags::from_bits_truncate(0x89);
    assert!(flags.contains(ControlFlags::START));
    assert!(flags.contains(ControlFlags::BURST));

    let flags = ControlFlags::from_bits_truncate(0x08);
    assert!(flags.is_empty());
}

#[test]
fn test_status_encode_decode() {
    let status = Status::new(true, b'a');
    assert_eq!(status.to_byte(), 0xE1);

    let status = Status::from_byte(0x64);
    assert!(!status.done());
    assert_eq!(status.data(), 0x64);

    // Data field is only 7 bits wide
    let status = Status::new(false, 0xE4);
    assert_eq!(status.data(), 0x64);
    assert_eq!(status.to_byte(), 0x64);
    assert_eq!(Status::default().to_byte(), 0x00);
}

#[test]
fn test_status_display() {
    assert_eq!(Status::from_byte(0xE1).to_string(), "done=1 data=0x61");
    assert_eq!(Command::burst(0, 4).to_string(), "burst src=0 dst=4");
}

#[test]
fn test_transfer_length() {
    assert_eq!(Command::single(0, 0).length(), 1);
    assert_eq!(Command::burst(0, 0).length(), BURST_LENGTH);
}

#[test]
fn test_validate_accepts_every_encodable_command() {
    for raw in 0..=0x7Fu8 {
        let cmd = Command::decode(raw);
        assert!(cmd.validate(STORE_SIZE).is_ok(), "{}", cmd);
    }
}

#[test]
fn test_validate_rejects_wide_index() {
    assert_eq!(
        Command::single(8, 0).validate(STORE_SIZE),
        Err(CommandError::IndexOutOfRange {
            field: "source",
            index: 8
        })
    );
    assert_eq!(
        Command::burst(0, 12).validate(STORE_SIZE),
        Err(CommandError::IndexOutOfRange {
            field: "destination",
            index: 12
        })
    );
}

#[test]
fn test_validate_rejects_window_past_store() {
    // An 8-slot store cannot hold a burst starting at 5
    assert_eq!(
        Command::burst(5, 0).validate(8),
        Err(CommandError::BurstOutOfRange {
            field: "source",
            index: 5,
            length: BURST_LENGTH,
            capacity: 8
        })
    );
    assert!(Command::burst(4, 4).validate(8).is_ok());
    assert!(Command::single(7, 7).validate(8).is_ok());
}
