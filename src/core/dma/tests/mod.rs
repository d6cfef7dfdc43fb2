// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Unit tests for the DMA engine organized by category

mod helpers;
mod registers;
