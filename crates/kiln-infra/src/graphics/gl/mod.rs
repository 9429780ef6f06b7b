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

//! A state-caching backend for GL-style drivers.
//!
//! [`GlDevice`] implements [`kiln_core::GraphicsDevice`] over any
//! [`kiln_core::RenderDriver`]. Resources live in a fixed handle-indexed table,
//! pipeline bindings are reconciled lazily before each draw, and linked programs
//! are cached per shader pair.

mod allocator;
mod device;
mod format;
mod pool;
mod program_cache;
mod query;
mod sampler;
mod state;

pub use self::device::GlDevice;
pub use self::format::{calc_mip_level_size, mip_chain_size};
pub use self::state::{AttributeMask, PipelineStateView};
