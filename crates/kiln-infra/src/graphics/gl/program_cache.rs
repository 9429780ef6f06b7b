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

//! Linked programs keyed by their shader pair.

use kiln_core::renderer::{NativeId, RenderDriver, ResourceHandle, ShaderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ProgramEntry {
    vertex_shader: ResourceHandle,
    pixel_shader: ResourceHandle,
    program: NativeId,
}

/// The result of looking up a shader pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProgramLookup {
    pub(crate) program: NativeId,
    /// `true` if the program came from the cache.
    pub(crate) cached: bool,
    /// Link diagnostics reported by the driver, for freshly linked programs.
    pub(crate) diagnostics: Option<ShaderError>,
}

/// A cache of linked native programs keyed by `(vertex_shader, pixel_shader)`.
///
/// The cache owns every native program it links. Entries live until one of
/// their shaders is released (its handle may then be reused by another shader)
/// or the device shuts down.
#[derive(Debug, Default)]
pub(crate) struct ProgramCache {
    entries: Vec<ProgramEntry>,
}

impl ProgramCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the program linked for exactly this pair, if any.
    pub(crate) fn find(
        &self,
        vertex_shader: ResourceHandle,
        pixel_shader: ResourceHandle,
    ) -> Option<NativeId> {
        self.entries
            .iter()
            .find(|entry| {
                entry.vertex_shader == vertex_shader && entry.pixel_shader == pixel_shader
            })
            .map(|entry| entry.program)
    }

    /// Returns the cached program for the pair, linking and caching a new one on a miss.
    ///
    /// A failed link still yields a cached program; the driver's text is returned
    /// as diagnostics and logged.
    pub(crate) fn get_or_link<D: RenderDriver>(
        &mut self,
        driver: &mut D,
        vertex_shader: (ResourceHandle, NativeId),
        pixel_shader: (ResourceHandle, NativeId),
    ) -> ProgramLookup {
        if let Some(program) = self.find(vertex_shader.0, pixel_shader.0) {
            return ProgramLookup {
                program,
                cached: true,
                diagnostics: None,
            };
        }

        let program = driver.create_program();
        driver.attach_shader(program, vertex_shader.1);
        driver.attach_shader(program, pixel_shader.1);
        let diagnostics = driver.link_program(program).map(|text| {
            let err = ShaderError::LinkFailed {
                vertex_shader: vertex_shader.0,
                pixel_shader: pixel_shader.0,
                log: text,
            };
            log::warn!("GlDevice: {err}");
            err
        });

        self.entries.push(ProgramEntry {
            vertex_shader: vertex_shader.0,
            pixel_shader: pixel_shader.0,
            program,
        });
        log::debug!(
            "GlDevice: Linked program {:?} for ({}, {})",
            program,
            vertex_shader.0,
            pixel_shader.0
        );

        ProgramLookup {
            program,
            cached: false,
            diagnostics,
        }
    }

    /// Deletes every program built from `shader` and returns how many were dropped.
    pub(crate) fn evict_shader<D: RenderDriver>(
        &mut self,
        driver: &mut D,
        shader: ResourceHandle,
    ) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| {
            let stale = entry.vertex_shader == shader || entry.pixel_shader == shader;
            if stale {
                driver.delete_program(entry.program);
            }
            !stale
        });
        before - self.entries.len()
    }

    /// Deletes every cached program.
    pub(crate) fn clear<D: RenderDriver>(&mut self, driver: &mut D) {
        for entry in self.entries.drain(..) {
            driver.delete_program(entry.program);
        }
    }
}
