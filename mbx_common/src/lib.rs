/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! generic support for the mailbox monitor crates: error/cli/logging macros, date helpers
//! and the object store abstraction all persisted artifacts go through

#[macro_use]
pub mod macros;

pub mod datetime;
pub mod fs;
pub mod store;

#[cfg(feature="s3")]
pub mod s3;

// re-exported so that our logging macros expand without a direct tracing dependency in client crates
pub use tracing;

use tracing_subscriber::EnvFilter;

/// install a fmt subscriber that is controlled by RUST_LOG (default level is "info").
/// This uses `try_init()` so it can be called repeatedly (e.g. from tests) - only the first call takes effect
pub fn init_tracing () {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter( filter).try_init();
}

// a global fn that can be used with serde(skip_serializing_if="mbx_common::is_none")
#[inline] pub fn is_none<T> (opt: &Option<T>)->bool { opt.is_none() }

