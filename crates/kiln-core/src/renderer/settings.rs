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

//! Capacities and limits of a rendering device.

use crate::renderer::error::RenderError;
use serde::{Deserialize, Serialize};

/// Capacities of the fixed tables a device allocates at startup.
///
/// Every table is sized once and never grows; running out of slots is reported
/// as an exhaustion error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Slots in the resource table, including the reserved null slot.
    pub max_resources: usize,
    /// Slots in the query table.
    pub max_queries: usize,
    /// Native queries buffered per query slot, to tolerate GPU latency.
    pub query_buffers: usize,
    /// Vertex attribute locations managed by the input-layout cache (at most 32).
    pub max_vertex_attributes: u32,
}

impl RendererSettings {
    /// Upper bound for [`Self::max_vertex_attributes`].
    pub const ATTRIBUTE_LIMIT: u32 = 32;

    /// Parses settings from JSON. Missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        let settings: Self = serde_json::from_str(json).map_err(|e| {
            log::warn!("RendererSettings: Could not parse settings: {e}");
            RenderError::InvalidSettings(e.to_string())
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that every capacity is usable.
    pub fn validate(&self) -> Result<(), RenderError> {
        self.check_capacities().map_err(|reason| {
            log::warn!("RendererSettings: Rejected settings: {reason}");
            RenderError::InvalidSettings(reason)
        })
    }

    fn check_capacities(&self) -> Result<(), String> {
        if self.max_resources < 2 {
            return Err(format!(
                "max_resources must leave room beside the null slot, got {}",
                self.max_resources
            ));
        }
        if self.max_resources > u32::MAX as usize {
            return Err(format!(
                "max_resources must fit a 32-bit handle, got {}",
                self.max_resources
            ));
        }
        if self.max_queries == 0 || self.max_queries > u32::MAX as usize {
            return Err(format!(
                "max_queries must be between 1 and {}, got {}",
                u32::MAX,
                self.max_queries
            ));
        }
        if self.query_buffers == 0 {
            return Err("query_buffers must be at least 1".to_string());
        }
        if self.max_vertex_attributes == 0 || self.max_vertex_attributes > Self::ATTRIBUTE_LIMIT {
            return Err(format!(
                "max_vertex_attributes must be between 1 and {}, got {}",
                Self::ATTRIBUTE_LIMIT,
                self.max_vertex_attributes
            ));
        }
        Ok(())
    }
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            max_resources: 10_000,
            max_queries: 64,
            query_buffers: 4,
            max_vertex_attributes: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(RendererSettings::default().validate().is_ok());
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let settings = RendererSettings::from_json(r#"{ "max_queries": 8 }"#).unwrap();
        assert_eq!(settings.max_queries, 8);
        assert_eq!(settings.max_resources, 10_000);
        assert_eq!(settings.query_buffers, 4);
    }

    #[test]
    fn too_many_attributes_is_rejected() {
        let err = RendererSettings::from_json(r#"{ "max_vertex_attributes": 64 }"#).unwrap_err();
        assert!(matches!(err, RenderError::InvalidSettings(_)));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = RendererSettings::from_json("{ max_queries: }").unwrap_err();
        assert!(matches!(err, RenderError::InvalidSettings(_)));
    }
}
