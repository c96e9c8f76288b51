// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Coursegen daemon (cgd)
//!
//! Background process that owns the pipeline runtime and serves the
//! unix-socket protocol used by the `cg` CLI.

pub mod lifecycle;
pub mod protocol;
pub mod server;

pub use lifecycle::{Config, Daemon, LifecycleError};
pub use protocol::{ProtocolError, Request, Response, PROTOCOL_VERSION};
