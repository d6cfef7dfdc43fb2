// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Byte store tests
//!
//! Covers:
//! - Fixture loading and reset behavior
//! - Single-slot reads and writes
//! - Out-of-range access policy (logged, never panics)

use super::*;
