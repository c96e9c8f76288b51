// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable JSON document storage for Coursegen
//!
//! One store per data root. Documents are plain JSON files written with an
//! atomic replace; every path is validated to stay inside the root.

pub mod docs;
mod store;

pub use store::{DocStore, StorageError};
