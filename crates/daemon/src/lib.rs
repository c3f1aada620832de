// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Daemon library: lifecycle, wire protocol, socket server
//!
//! The `onsited` binary drives these pieces; the CLI links this library
//! for the protocol types and message framing.

pub mod lifecycle;
pub mod protocol;
pub mod server;

pub use protocol::{Request, Response};
