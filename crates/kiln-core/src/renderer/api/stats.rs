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

//! Per-device counters.

/// Counters accumulated by a device since creation.
///
/// They describe how much work the state cache avoided, which makes them useful
/// both in logs and as assertions in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Draw calls submitted, indexed or not.
    pub draw_calls: u64,
    /// Pipeline reconciliations run (one per draw).
    pub reconciliations: u64,
    /// Native programs linked.
    pub program_links: u64,
    /// Program lookups served from the link cache.
    pub program_cache_hits: u64,
    /// Times an input layout's vertex attributes were described again.
    pub vertex_layout_rebuilds: u64,
    /// Resource slots currently assigned, excluding the null slot.
    pub live_resources: u64,
}
