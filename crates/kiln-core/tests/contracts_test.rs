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

//! Tests for the contracts shared by every backend: settings, error chaining
//! and the value types callers build descriptors from.

use std::error::Error;

use kiln_core::renderer::{
    AllocationDomain, ClearFlags, ClearState, QueryDomain, QueryError, QueryIndex, QueryType,
    RenderError, ResourceError, ResourceHandle, ResourceKind, SamplerDescriptor, ShaderError,
    ShaderStage,
};
use kiln_core::RendererSettings;

#[test]
fn test_settings_json_overrides_only_given_fields() {
    let settings = RendererSettings::from_json(r#"{ "max_resources": 128, "query_buffers": 2 }"#)
        .unwrap();
    assert_eq!(settings.max_resources, 128);
    assert_eq!(settings.query_buffers, 2);
    assert_eq!(settings.max_queries, RendererSettings::default().max_queries);
}

#[test]
fn test_settings_reject_unusable_capacities() {
    for json in [
        r#"{ "max_resources": 1 }"#,
        r#"{ "max_queries": 0 }"#,
        r#"{ "query_buffers": 0 }"#,
        r#"{ "max_vertex_attributes": 33 }"#,
    ] {
        assert!(
            matches!(
                RendererSettings::from_json(json),
                Err(RenderError::InvalidSettings(_))
            ),
            "{json} should be rejected"
        );
    }
}

#[test]
fn test_render_error_chains_to_shader_diagnostics() {
    let shader = ShaderError::CompilationFailed {
        stage: ShaderStage::Pixel,
        log: "0:3: 'o_color' undeclared".to_string(),
    };
    let err = RenderError::from(ResourceError::from(shader.clone()));

    let resource = err.source().unwrap();
    assert!(resource.to_string().contains("Shader resource error"));
    let innermost = resource.source().unwrap();
    assert_eq!(innermost.to_string(), shader.to_string());
    assert!(innermost.source().is_none());
}

#[test]
fn test_query_error_names_the_domain() {
    let index = QueryIndex {
        index: 7,
        domain: QueryDomain::SO_STATS,
    };
    let err = RenderError::from(QueryError::NotAllocated(index));
    assert!(err.to_string().contains("query #7"));
    assert!(err.source().is_some());
}

#[test]
fn test_query_types_map_to_domains() {
    assert_eq!(QueryType::TimeElapsed.domain(), QueryDomain::TIMER);
    assert_eq!(QueryType::Timestamp.domain(), QueryDomain::TIMER);
    assert_eq!(
        QueryType::StreamOutStatistics.domain(),
        QueryDomain::SO_STATS
    );
}

#[test]
fn test_kind_mismatch_display() {
    let err = ResourceError::KindMismatch {
        handle: ResourceHandle(4),
        expected: ResourceKind::Buffer,
        found: ResourceKind::Empty,
    };
    assert_eq!(err.to_string(), "Resource #4 is a empty, expected a buffer.");
}

#[test]
fn test_flag_sets_compose() {
    let both = AllocationDomain::DIRECT | AllocationDomain::DEFERRED;
    assert!(both.contains(AllocationDomain::DEFERRED));
    assert!(AllocationDomain::ALL.contains(both));

    let mut flags = ClearState::default().flags;
    assert_eq!(flags, ClearFlags::COLOR_DEPTH);
    flags.remove(ClearFlags::DEPTH);
    flags.insert(ClearFlags::STENCIL);
    assert_eq!(flags, ClearFlags::COLOR | ClearFlags::STENCIL);
}

#[test]
fn test_sampler_lod_clamps_above_sentinel_only() {
    let sampler = SamplerDescriptor {
        min_lod: -0.5,
        max_lod: SamplerDescriptor::LOD_UNSET,
        ..SamplerDescriptor::default()
    };
    assert_eq!(sampler.min_lod_clamp(), Some(-0.5));
    assert_eq!(sampler.max_lod_clamp(), None);
}
