// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Backend-agnostic rendering API types.
//!
//! - **[`handle`]**: resource handles, allocation domains and native object ids.
//! - **[`buffer`]**, **[`shader`]**, **[`texture`]**: creation descriptors for GPU objects.
//! - **[`pipeline`]**: vertex layout description and primitive topology.
//! - **[`state`]**: fixed-function state blocks (raster, blend, depth, clear, viewport).
//! - **[`query`]**: GPU query types and domains.
//! - **[`stats`]**: per-device counters.
//! - **[`flags`]**: the flag-set macro shared by the modules above.

pub mod buffer;
pub mod flags;
pub mod handle;
pub mod pipeline;
pub mod query;
pub mod shader;
pub mod state;
pub mod stats;
pub mod texture;

pub use self::buffer::*;
pub use self::handle::*;
pub use self::pipeline::*;
pub use self::query::*;
pub use self::shader::*;
pub use self::state::*;
pub use self::stats::*;
pub use self::texture::*;
