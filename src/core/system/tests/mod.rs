// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! System integration tests organized by category

mod driver;
