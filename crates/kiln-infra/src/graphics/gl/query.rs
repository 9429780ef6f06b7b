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

//! The query table: domain-tagged slots, each buffering several native queries.

use kiln_core::renderer::{
    NativeId, QueryAction, QueryBufferFlags, QueryDomain, QueryError, QueryIndex, QueryTarget,
    QueryType, RenderDriver,
};

use super::allocator::SlotAllocator;

/// One allocated query and its ring of native queries.
#[derive(Debug, Clone)]
struct QuerySlot {
    query_type: QueryType,
    natives: Vec<NativeId>,
    flags: Vec<QueryBufferFlags>,
    /// Ring position of the most recently begun query.
    cursor: usize,
    /// Bit pattern of the last completed result, read back as `f64`.
    last_result: u64,
}

impl QuerySlot {
    fn target(&self) -> QueryTarget {
        match self.query_type {
            QueryType::TimeElapsed => QueryTarget::TimeElapsed,
            QueryType::Timestamp => QueryTarget::Timestamp,
            QueryType::StreamOutStatistics => QueryTarget::PrimitivesWritten,
        }
    }

    fn advance(&mut self) -> NativeId {
        self.cursor = (self.cursor + 1) % self.natives.len();
        if self.flags[self.cursor].contains(QueryBufferFlags::ISSUED) {
            log::trace!("GlDevice: Query buffer overwritten before its result was read");
        }
        self.natives[self.cursor]
    }
}

/// The device's query table.
///
/// Timer and stream-output queries draw indices from one shared index space, each
/// domain allocating independently. Payloads are kept per domain.
#[derive(Debug)]
pub(crate) struct QueryPool {
    allocator: SlotAllocator,
    timer: Vec<Option<QuerySlot>>,
    so_stats: Vec<Option<QuerySlot>>,
    buffers: usize,
}

impl QueryPool {
    pub(crate) fn new(capacity: usize, buffers: usize) -> Self {
        Self {
            allocator: SlotAllocator::new(capacity),
            timer: vec![None; capacity],
            so_stats: vec![None; capacity],
            buffers: buffers.max(1),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.allocator.capacity()
    }

    /// Reserves the first index free in `domain`.
    ///
    /// # Errors
    /// * `QueryError::Exhausted` - If every index is held in `domain`.
    pub(crate) fn allocate(&mut self, domain: QueryDomain) -> Result<QueryIndex, QueryError> {
        let index = self
            .allocator
            .allocate(domain.bits())
            .ok_or(QueryError::Exhausted {
                capacity: self.capacity(),
            })?;
        Ok(QueryIndex {
            index: index as u32,
            domain,
        })
    }

    /// Allocates a slot for `query_type` and generates its native queries.
    pub(crate) fn create<D: RenderDriver>(
        &mut self,
        driver: &mut D,
        query_type: QueryType,
    ) -> Result<QueryIndex, QueryError> {
        let index = self.allocate(query_type.domain())?;
        let natives = (0..self.buffers).map(|_| driver.gen_query()).collect();
        let slot = QuerySlot {
            query_type,
            natives,
            flags: vec![QueryBufferFlags::empty(); self.buffers],
            cursor: self.buffers - 1,
            last_result: 0,
        };
        *self.entry_mut(index)? = Some(slot);
        Ok(index)
    }

    /// Begins or ends a query.
    ///
    /// `Begin` moves to the next native query in the ring and starts it. `End`
    /// stops it and marks its result as pending. Timestamps have no begin; their
    /// `End` moves to the next native query and records the counter there.
    pub(crate) fn set<D: RenderDriver>(
        &mut self,
        driver: &mut D,
        index: QueryIndex,
        action: QueryAction,
    ) -> Result<(), QueryError> {
        let slot = self.slot_mut(index)?;
        let target = slot.target();
        match (slot.query_type, action) {
            (QueryType::Timestamp, QueryAction::Begin) => {}
            (QueryType::Timestamp, QueryAction::End) => {
                let native = slot.advance();
                driver.query_counter(native);
                slot.flags[slot.cursor] = QueryBufferFlags::ISSUED;
            }
            (_, QueryAction::Begin) => {
                let native = slot.advance();
                driver.begin_query(target, native);
                slot.flags[slot.cursor] = QueryBufferFlags::ACTIVE;
            }
            (_, QueryAction::End) => {
                driver.end_query(target);
                slot.flags[slot.cursor] = QueryBufferFlags::ISSUED;
            }
        }
        Ok(())
    }

    /// Polls every pending native query, oldest first, and stores completed results.
    pub(crate) fn update<D: RenderDriver>(&mut self, driver: &mut D) {
        for slot in self.timer.iter_mut().chain(self.so_stats.iter_mut()).flatten() {
            let len = slot.natives.len();
            for step in 1..=len {
                let position = (slot.cursor + step) % len;
                if !slot.flags[position].contains(QueryBufferFlags::ISSUED) {
                    continue;
                }
                if let Some(value) = driver.query_result(slot.natives[position]) {
                    slot.last_result = (value as f64).to_bits();
                    slot.flags[position].remove(QueryBufferFlags::ISSUED);
                }
            }
        }
    }

    /// Returns the last stored result.
    pub(crate) fn last_result(&self, index: QueryIndex) -> Result<f64, QueryError> {
        let slot = self
            .entry(index)?
            .as_ref()
            .ok_or(QueryError::NotAllocated(index))?;
        Ok(f64::from_bits(slot.last_result))
    }

    /// Overwrites the stored result with a raw bit pattern.
    pub(crate) fn write_result_bits(
        &mut self,
        index: QueryIndex,
        bits: u64,
    ) -> Result<(), QueryError> {
        self.slot_mut(index)?.last_result = bits;
        Ok(())
    }

    /// Deletes the native queries and frees the index in its domain.
    pub(crate) fn release<D: RenderDriver>(
        &mut self,
        driver: &mut D,
        index: QueryIndex,
    ) -> Result<(), QueryError> {
        let slot = self
            .entry_mut(index)?
            .take()
            .ok_or(QueryError::NotAllocated(index))?;
        for native in slot.natives {
            driver.delete_query(native);
        }
        self.allocator.release(index.index(), index.domain.bits());
        Ok(())
    }

    /// Deletes every live query.
    pub(crate) fn clear<D: RenderDriver>(&mut self, driver: &mut D) {
        for slot in self.timer.iter_mut().chain(self.so_stats.iter_mut()) {
            if let Some(slot) = slot.take() {
                for native in slot.natives {
                    driver.delete_query(native);
                }
            }
        }
        self.allocator = SlotAllocator::new(self.capacity());
    }

    /// Number of indices held in `domain`.
    pub(crate) fn assigned_count(&self, domain: QueryDomain) -> usize {
        self.allocator.assigned_count(domain.bits())
    }

    fn table(&self, domain: QueryDomain) -> Option<&Vec<Option<QuerySlot>>> {
        match domain {
            QueryDomain::TIMER => Some(&self.timer),
            QueryDomain::SO_STATS => Some(&self.so_stats),
            _ => None,
        }
    }

    fn entry(&self, index: QueryIndex) -> Result<&Option<QuerySlot>, QueryError> {
        self.table(index.domain)
            .and_then(|table| table.get(index.index()))
            .ok_or(QueryError::InvalidIndex(index))
    }

    fn entry_mut(&mut self, index: QueryIndex) -> Result<&mut Option<QuerySlot>, QueryError> {
        let table = match index.domain {
            QueryDomain::TIMER => &mut self.timer,
            QueryDomain::SO_STATS => &mut self.so_stats,
            _ => return Err(QueryError::InvalidIndex(index)),
        };
        table
            .get_mut(index.index())
            .ok_or(QueryError::InvalidIndex(index))
    }

    fn slot_mut(&mut self, index: QueryIndex) -> Result<&mut QuerySlot, QueryError> {
        self.entry_mut(index)?
            .as_mut()
            .ok_or(QueryError::NotAllocated(index))
    }
}
