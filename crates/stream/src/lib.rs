// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod codec;
mod config;
mod context;
mod error;
pub mod runtime;
pub mod source;
mod transform;

pub use config::{StreamConfig, StreamConfigBuilder};
pub use context::QueryContext;
pub use error::StreamError;
pub use rowflow_type::{Error, Result};
pub use source::{PlanInfo, RuntimeBuildContext, SourceBuilder, TableHolder, TableSource};
pub use transform::{IdentityTransform, ProjectGenuineValueColumns};
