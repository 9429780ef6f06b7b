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

//! Integration tests for the query table: per-domain allocation, the native
//! query ring and result read-back.

use kiln_core::renderer::{
    NativeId, QueryAction, QueryDomain, QueryError, QueryIndex, QueryTarget, QueryType,
};
use kiln_core::{GraphicsDevice, RendererSettings};
use kiln_infra::graphics::gl::GlDevice;
use kiln_infra::graphics::recording::{DriverCall, RecordingDriver};

fn device() -> GlDevice<RecordingDriver> {
    let _ = env_logger::builder().is_test(true).try_init();
    GlDevice::new(RecordingDriver::new(), RendererSettings::default()).unwrap()
}

/// Native ids generated by the most recent `create_query`, in ring order.
fn generated_queries(device: &GlDevice<RecordingDriver>) -> Vec<NativeId> {
    device
        .driver()
        .calls()
        .iter()
        .filter_map(|call| match call {
            DriverCall::GenQuery(id) => Some(*id),
            _ => None,
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Allocation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_timer_domain_exhausts_at_capacity() {
    let mut device = device();
    for expected in 0..64 {
        let index = device.create_query(QueryType::TimeElapsed).unwrap();
        assert_eq!(index.index, expected);
        assert_eq!(index.domain, QueryDomain::TIMER);
    }
    assert_eq!(
        device.create_query(QueryType::Timestamp),
        Err(QueryError::Exhausted { capacity: 64 })
    );

    // The other domain allocates independently over the same index space.
    let so = device.create_query(QueryType::StreamOutStatistics).unwrap();
    assert_eq!(
        so,
        QueryIndex {
            index: 0,
            domain: QueryDomain::SO_STATS
        }
    );
}

#[test]
fn test_released_index_is_reused_first() {
    let mut device = device();
    let queries: Vec<_> = (0..4)
        .map(|_| device.create_query(QueryType::TimeElapsed).unwrap())
        .collect();
    device.release_query(queries[2]).unwrap();
    let reused = device.create_query(QueryType::Timestamp).unwrap();
    assert_eq!(reused.index, 2);
}

#[test]
fn test_release_deletes_every_buffered_query() {
    let mut device = device();
    let index = device.create_query(QueryType::TimeElapsed).unwrap();
    let natives = generated_queries(&device);
    assert_eq!(natives.len(), 4);

    device.driver_mut().clear_calls();
    device.release_query(index).unwrap();
    let deleted: Vec<_> = natives.iter().map(|id| DriverCall::DeleteQuery(*id)).collect();
    assert_eq!(device.driver().calls(), deleted.as_slice());

    assert_eq!(
        device.release_query(index),
        Err(QueryError::NotAllocated(index))
    );
    assert_eq!(
        device.get_last_query_result(index),
        Err(QueryError::NotAllocated(index))
    );
}

#[test]
fn test_index_outside_table_is_invalid() {
    let mut device = device();
    let index = QueryIndex {
        index: 500,
        domain: QueryDomain::TIMER,
    };
    assert_eq!(
        device.set_query(index, QueryAction::Begin),
        Err(QueryError::InvalidIndex(index))
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_elapsed_query_lifecycle() {
    let mut device = device();
    let index = device.create_query(QueryType::TimeElapsed).unwrap();
    let natives = generated_queries(&device);

    device.driver_mut().clear_calls();
    device.set_query(index, QueryAction::Begin).unwrap();
    device.set_query(index, QueryAction::End).unwrap();
    assert_eq!(
        device.driver().calls(),
        &[
            DriverCall::BeginQuery(QueryTarget::TimeElapsed, natives[0]),
            DriverCall::EndQuery(QueryTarget::TimeElapsed),
        ]
    );

    // Not ready yet: the stored result stays at zero.
    device.update_queries();
    assert_eq!(device.get_last_query_result(index), Ok(0.0));

    device.driver_mut().set_query_result(natives[0], 16_600_000);
    device.update_queries();
    assert_eq!(device.get_last_query_result(index), Ok(16_600_000.0));

    // Collected results are not polled again.
    device.driver_mut().clear_calls();
    device.update_queries();
    assert!(device.driver().calls().is_empty());
}

#[test]
fn test_timestamp_records_counter_on_end_only() {
    let mut device = device();
    let index = device.create_query(QueryType::Timestamp).unwrap();
    let natives = generated_queries(&device);

    device.driver_mut().clear_calls();
    device.set_query(index, QueryAction::Begin).unwrap();
    assert!(device.driver().calls().is_empty());

    device.set_query(index, QueryAction::End).unwrap();
    device.set_query(index, QueryAction::End).unwrap();
    assert_eq!(
        device.driver().calls(),
        &[
            DriverCall::QueryCounter(natives[0]),
            DriverCall::QueryCounter(natives[1]),
        ]
    );
}

#[test]
fn test_newest_completed_result_wins() {
    let mut device = device();
    let index = device.create_query(QueryType::StreamOutStatistics).unwrap();
    let natives = generated_queries(&device);
    for _ in 0..2 {
        device.set_query(index, QueryAction::Begin).unwrap();
        device.set_query(index, QueryAction::End).unwrap();
    }
    assert!(device
        .driver()
        .calls()
        .contains(&DriverCall::BeginQuery(QueryTarget::PrimitivesWritten, natives[1])));

    device.driver_mut().set_query_result(natives[0], 10);
    device.driver_mut().set_query_result(natives[1], 20);
    device.update_queries();
    assert_eq!(device.get_last_query_result(index), Ok(20.0));
}

#[test]
fn test_stored_result_bits_round_trip_exactly() {
    let mut device = device();
    let index = device.create_query(QueryType::TimeElapsed).unwrap();
    let bits = std::f64::consts::PI.to_bits() ^ 1;
    device.write_query_result_bits(index, bits).unwrap();
    let value = device.get_last_query_result(index).unwrap();
    assert_eq!(value.to_bits(), bits);
}

#[test]
fn test_shutdown_deletes_live_queries() {
    let mut device = device();
    device.create_query(QueryType::TimeElapsed).unwrap();
    device.create_query(QueryType::StreamOutStatistics).unwrap();
    let driver = device.shutdown();
    assert_eq!(driver.count(|c| matches!(c, DriverCall::DeleteQuery(_))), 8);
}
