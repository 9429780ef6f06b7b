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

//! GPU query types and allocation domains.

use crate::kiln_bitflags;
use std::fmt;

/// An index into a device's query table, tagged with the domain it was allocated in.
///
/// Both domains share one index space, so the same `index` may be live in each
/// domain at once; the domain tag tells the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryIndex {
    /// Position in the query table.
    pub index: u32,
    /// Domain the index was allocated in.
    pub domain: QueryDomain,
}

impl QueryIndex {
    /// Returns the table position.
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for QueryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "query #{} ({:?})", self.index, self.domain)
    }
}

kiln_bitflags! {
    /// Independent allocation domains over the query index space.
    ///
    /// The same index may be held by both domains at once.
    pub struct QueryDomain: u8 {
        /// Timer and timestamp queries.
        const TIMER = 1 << 0;
        /// Stream-output statistics queries.
        const SO_STATS = 1 << 1;
    }
}

kiln_bitflags! {
    /// State of one buffered native query inside a query slot.
    pub struct QueryBufferFlags: u32 {
        /// The query has been begun and not yet ended.
        const ACTIVE = 1 << 0;
        /// The query has been ended and its result is pending.
        const ISSUED = 1 << 1;
    }
}

/// The kind of GPU query to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    /// Elapsed GPU time between begin and end.
    TimeElapsed,
    /// A single GPU timestamp, written at end.
    Timestamp,
    /// Number of primitives written to stream-output buffers.
    StreamOutStatistics,
}

impl QueryType {
    /// The allocation domain queries of this type are drawn from.
    pub const fn domain(&self) -> QueryDomain {
        match self {
            QueryType::TimeElapsed | QueryType::Timestamp => QueryDomain::TIMER,
            QueryType::StreamOutStatistics => QueryDomain::SO_STATS,
        }
    }
}

/// A query command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryAction {
    /// Start measuring into the next buffered native query.
    Begin,
    /// Stop measuring; the result becomes available later.
    End,
}
