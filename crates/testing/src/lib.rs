// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Test doubles for the stream runtime and codec layer

mod json;
mod logging;
mod memory;

pub use json::{JsonKeySerde, JsonRowSerde, JsonSerdeFactory};
pub use logging::init_tracing;
pub use memory::{MemoryStore, MemoryStreams, MemoryTable};
