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

//! Domain-tagged first-fit slot allocation.

/// Allocation state of a fixed-size index space shared by several domains.
///
/// Each slot stores the union of the domain bits currently holding it. An index
/// is free for a domain when none of that domain's bits are set, so disjoint
/// domains can hold the same index at once. The scan is bounded by the table
/// size: a full table is reported as `None`, never waited on.
#[derive(Debug, Clone)]
pub(crate) struct SlotAllocator {
    assigned: Vec<u8>,
}

impl SlotAllocator {
    /// Creates an allocator with `capacity` free slots.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            assigned: vec![0; capacity],
        }
    }

    /// Number of slots in the table.
    pub(crate) fn capacity(&self) -> usize {
        self.assigned.len()
    }

    /// Marks `index` as held by every domain in `bits`.
    pub(crate) fn pin(&mut self, index: usize, bits: u8) {
        if let Some(slot) = self.assigned.get_mut(index) {
            *slot |= bits;
        }
    }

    /// Finds the first slot free for `bits`, marks it and returns its index.
    ///
    /// An empty bit set holds nothing and is refused.
    pub(crate) fn allocate(&mut self, bits: u8) -> Option<usize> {
        if bits == 0 {
            return None;
        }
        let index = self.assigned.iter().position(|slot| slot & bits == 0)?;
        self.assigned[index] |= bits;
        Some(index)
    }

    /// Clears `bits` on `index`. Returns `false` if none of them were set.
    pub(crate) fn release(&mut self, index: usize, bits: u8) -> bool {
        match self.assigned.get_mut(index) {
            Some(slot) if *slot & bits != 0 => {
                *slot &= !bits;
                true
            }
            _ => false,
        }
    }

    /// Returns `true` if any of `bits` holds `index`.
    pub(crate) fn is_assigned(&self, index: usize, bits: u8) -> bool {
        self.assigned
            .get(index)
            .is_some_and(|slot| slot & bits != 0)
    }

    /// Number of slots held by any of `bits`.
    pub(crate) fn assigned_count(&self, bits: u8) -> usize {
        self.assigned.iter().filter(|slot| *slot & bits != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: u8 = 1;
    const B: u8 = 2;

    #[test]
    fn first_fit_skips_pinned_slots() {
        let mut alloc = SlotAllocator::new(4);
        alloc.pin(0, 0xff);
        assert_eq!(alloc.allocate(A), Some(1));
        assert_eq!(alloc.allocate(A), Some(2));
    }

    #[test]
    fn domains_share_indices_independently() {
        let mut alloc = SlotAllocator::new(2);
        assert_eq!(alloc.allocate(A), Some(0));
        assert_eq!(alloc.allocate(B), Some(0));
        assert_eq!(alloc.allocate(A), Some(1));
        assert_eq!(alloc.allocate(A), None);
        assert_eq!(alloc.allocate(B), Some(1));
    }

    #[test]
    fn combined_bits_need_both_free() {
        let mut alloc = SlotAllocator::new(3);
        alloc.allocate(B);
        assert_eq!(alloc.allocate(A | B), Some(1));
        assert_eq!(alloc.assigned_count(A), 1);
        assert_eq!(alloc.assigned_count(B), 2);
    }

    #[test]
    fn release_is_reported_once() {
        let mut alloc = SlotAllocator::new(2);
        let index = alloc.allocate(A).unwrap();
        assert!(alloc.release(index, A));
        assert!(!alloc.release(index, A));
        assert!(!alloc.is_assigned(index, A));
        assert!(!alloc.release(7, A));
    }

    #[test]
    fn empty_bits_are_refused() {
        let mut alloc = SlotAllocator::new(2);
        assert_eq!(alloc.allocate(0), None);
        assert_eq!(alloc.assigned_count(0xff), 0);
        assert_eq!(alloc.allocate(A), Some(0));
    }

    #[test]
    fn exhaustion_is_bounded() {
        let mut alloc = SlotAllocator::new(3);
        for _ in 0..3 {
            assert!(alloc.allocate(A).is_some());
        }
        assert_eq!(alloc.allocate(A), None);
        assert_eq!(alloc.capacity(), 3);
    }
}
