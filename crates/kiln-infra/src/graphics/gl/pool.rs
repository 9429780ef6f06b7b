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

//! The fixed resource table and the payloads its slots own.

use kiln_core::renderer::{
    AllocationDomain, BlendStateDescriptor, BufferTarget, ClearState, CullMode,
    DepthStencilDescriptor, ElementType, FillMode, NativeId, RasterStateDescriptor,
    ResourceError, ResourceHandle, ResourceKind, SamplerDescriptor, ShaderStage,
};

use super::allocator::SlotAllocator;
use super::state::AttributeMask;

/// One vertex attribute of an input layout. The location is the attribute's
/// position in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VertexAttribute {
    pub(crate) location: u32,
    pub(crate) element_type: ElementType,
    pub(crate) element_count: u32,
    pub(crate) offset: u32,
}

/// An input layout and the native vertex-array object describing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InputLayout {
    pub(crate) attributes: Vec<VertexAttribute>,
    /// Generated lazily on the first draw that uses the layout.
    pub(crate) vertex_array: NativeId,
    /// Vertex buffer the attributes were last described against.
    pub(crate) bound_vertex_buffer: ResourceHandle,
}

impl InputLayout {
    pub(crate) fn attribute_mask(&self) -> AttributeMask {
        self.attributes
            .iter()
            .fold(AttributeMask::EMPTY, |mask, attr| mask.with(attr.location))
    }
}

/// Rasterizer state, already translated to driver switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RasterState {
    pub(crate) culling_enabled: bool,
    pub(crate) cull_face: CullMode,
    pub(crate) polygon_mode: FillMode,
    pub(crate) depth_clamp_enabled: bool,
    pub(crate) scissor_enabled: bool,
}

impl RasterState {
    /// The driver's power-on state, applied when no raster state is bound.
    pub(crate) const DRIVER_DEFAULT: Self = Self {
        culling_enabled: false,
        cull_face: CullMode::Back,
        polygon_mode: FillMode::Solid,
        depth_clamp_enabled: false,
        scissor_enabled: false,
    };
}

impl From<&RasterStateDescriptor> for RasterState {
    fn from(desc: &RasterStateDescriptor) -> Self {
        Self {
            culling_enabled: desc.cull_mode != CullMode::None,
            cull_face: desc.cull_mode,
            polygon_mode: desc.fill_mode,
            depth_clamp_enabled: !desc.depth_clip_enable,
            scissor_enabled: desc.scissor_enable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BufferResource {
    pub(crate) native: NativeId,
    pub(crate) target: BufferTarget,
    pub(crate) size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ShaderResource {
    pub(crate) native: NativeId,
    pub(crate) stage: ShaderStage,
}

/// A native texture and the highest mip level it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TextureInfo {
    pub(crate) native: NativeId,
    pub(crate) max_mip_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RenderTargetResource {
    pub(crate) framebuffer: NativeId,
    pub(crate) texture: TextureInfo,
}

/// A linked program slot. The native program is owned by the link cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ProgramResource {
    pub(crate) vertex_shader: ResourceHandle,
    pub(crate) pixel_shader: ResourceHandle,
    pub(crate) program: NativeId,
}

/// The payload of one table slot. The slot owns it; releasing the slot drops it.
#[derive(Debug, Clone, Default)]
pub(crate) enum ResourceSlot {
    #[default]
    Empty,
    ClearState(ClearState),
    InputLayout(InputLayout),
    RasterState(RasterState),
    DepthStencilState(DepthStencilDescriptor),
    BlendState(BlendStateDescriptor),
    Buffer(BufferResource),
    Shader(ShaderResource),
    Texture(TextureInfo),
    RenderTarget(RenderTargetResource),
    Sampler(SamplerDescriptor),
    ShaderProgram(ProgramResource),
}

impl ResourceSlot {
    pub(crate) fn kind(&self) -> ResourceKind {
        match self {
            ResourceSlot::Empty => ResourceKind::Empty,
            ResourceSlot::ClearState(_) => ResourceKind::ClearState,
            ResourceSlot::InputLayout(_) => ResourceKind::InputLayout,
            ResourceSlot::RasterState(_) => ResourceKind::RasterState,
            ResourceSlot::DepthStencilState(_) => ResourceKind::DepthStencilState,
            ResourceSlot::BlendState(_) => ResourceKind::BlendState,
            ResourceSlot::Buffer(_) => ResourceKind::Buffer,
            ResourceSlot::Shader(_) => ResourceKind::Shader,
            ResourceSlot::Texture(_) => ResourceKind::Texture,
            ResourceSlot::RenderTarget(_) => ResourceKind::RenderTarget,
            ResourceSlot::Sampler(_) => ResourceKind::Sampler,
            ResourceSlot::ShaderProgram(_) => ResourceKind::ShaderProgram,
        }
    }
}

/// Generates kind-checked shared accessors over the slot table.
macro_rules! slot_accessors {
    ($($name:ident => $variant:ident($ty:ty);)*) => {
        $(
            pub(crate) fn $name(&self, handle: ResourceHandle) -> Result<&$ty, ResourceError> {
                match self.get(handle)? {
                    ResourceSlot::$variant(payload) => Ok(payload),
                    other => Err(ResourceError::KindMismatch {
                        handle,
                        expected: ResourceKind::$variant,
                        found: other.kind(),
                    }),
                }
            }
        )*
    };
}

/// The device's resource table: a fixed array of slots indexed by handle.
///
/// Slot 0 is pinned in every domain at construction and never handed out.
#[derive(Debug)]
pub(crate) struct ResourcePool {
    allocator: SlotAllocator,
    slots: Vec<ResourceSlot>,
    /// Domain bits each live payload was allocated with.
    owners: Vec<AllocationDomain>,
}

impl ResourcePool {
    pub(crate) const NAME: &'static str = "resource";

    pub(crate) fn new(capacity: usize) -> Self {
        let mut allocator = SlotAllocator::new(capacity);
        allocator.pin(0, AllocationDomain::ALL.bits());
        Self {
            allocator,
            slots: vec![ResourceSlot::Empty; capacity],
            owners: vec![AllocationDomain::empty(); capacity],
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.allocator.capacity()
    }

    /// Reserves the first index free in `domain`.
    ///
    /// # Errors
    /// * `ResourceError::InvalidHandle` - If `domain` is empty. Such a
    ///   reservation could only resolve to the null slot.
    /// * `ResourceError::Exhausted` - If every index is held in `domain`.
    pub(crate) fn allocate(
        &mut self,
        domain: AllocationDomain,
    ) -> Result<ResourceHandle, ResourceError> {
        if domain.is_empty() {
            return Err(ResourceError::InvalidHandle(ResourceHandle::NULL));
        }
        let index = self
            .allocator
            .allocate(domain.bits())
            .ok_or(ResourceError::Exhausted {
                pool: Self::NAME,
                capacity: self.capacity(),
            })?;
        // Indices are bounded by a u32-sized table.
        Ok(ResourceHandle(index as u32))
    }

    /// Clears `domain` on a reserved index.
    ///
    /// Bits owned by a stored payload are only freed through [`Self::remove`].
    ///
    /// # Errors
    /// * `ResourceError::KindMismatch` - If `domain` overlaps the bits of the
    ///   payload stored at `handle`. Nothing is released.
    /// * `ResourceError::InvalidHandle` - If `handle` is null, out of range, or
    ///   not held in `domain`.
    pub(crate) fn release(
        &mut self,
        handle: ResourceHandle,
        domain: AllocationDomain,
    ) -> Result<(), ResourceError> {
        self.check(handle)?;
        let index = handle.index();
        let owner = self.owners[index];
        if owner.intersects(domain) && self.allocator.is_assigned(index, owner.bits()) {
            return Err(ResourceError::KindMismatch {
                handle,
                expected: ResourceKind::Empty,
                found: self.slots[index].kind(),
            });
        }
        if self.allocator.release(index, domain.bits()) {
            Ok(())
        } else {
            Err(ResourceError::InvalidHandle(handle))
        }
    }

    /// Allocates an index in `domain` and stores `payload` in it.
    pub(crate) fn insert(
        &mut self,
        domain: AllocationDomain,
        payload: ResourceSlot,
    ) -> Result<ResourceHandle, ResourceError> {
        let handle = self.allocate(domain)?;
        self.fill(handle, domain, payload);
        Ok(handle)
    }

    /// Stores `payload` in an index previously reserved with [`Self::allocate`].
    ///
    /// Lets callers reserve a slot before creating the native objects it will own.
    pub(crate) fn fill(
        &mut self,
        handle: ResourceHandle,
        domain: AllocationDomain,
        payload: ResourceSlot,
    ) {
        let index = handle.index();
        if index < self.slots.len() {
            self.slots[index] = payload;
            self.owners[index] = domain;
        }
    }

    /// Takes the payload out of a slot of the `expected` kind and frees the index.
    ///
    /// # Errors
    /// * `ResourceError::KindMismatch` - If the slot is empty (already released)
    ///   or holds another kind. The slot is left untouched.
    pub(crate) fn remove(
        &mut self,
        handle: ResourceHandle,
        expected: ResourceKind,
    ) -> Result<ResourceSlot, ResourceError> {
        let found = self.get(handle)?.kind();
        if found != expected {
            return Err(ResourceError::KindMismatch {
                handle,
                expected,
                found,
            });
        }
        let index = handle.index();
        let owner = std::mem::take(&mut self.owners[index]);
        self.allocator.release(index, owner.bits());
        Ok(std::mem::take(&mut self.slots[index]))
    }

    pub(crate) fn get(&self, handle: ResourceHandle) -> Result<&ResourceSlot, ResourceError> {
        self.check(handle)?;
        Ok(&self.slots[handle.index()])
    }

    /// Returns `ResourceKind::Empty` for the null handle and out-of-range handles.
    pub(crate) fn kind(&self, handle: ResourceHandle) -> ResourceKind {
        self.get(handle)
            .map(ResourceSlot::kind)
            .unwrap_or(ResourceKind::Empty)
    }

    slot_accessors! {
        clear_state => ClearState(ClearState);
        input_layout => InputLayout(InputLayout);
        raster_state => RasterState(RasterState);
        depth_stencil_state => DepthStencilState(DepthStencilDescriptor);
        blend_state => BlendState(BlendStateDescriptor);
        buffer => Buffer(BufferResource);
        shader => Shader(ShaderResource);
        sampler => Sampler(SamplerDescriptor);
        render_target => RenderTarget(RenderTargetResource);
        program => ShaderProgram(ProgramResource);
    }

    pub(crate) fn input_layout_mut(
        &mut self,
        handle: ResourceHandle,
    ) -> Result<&mut InputLayout, ResourceError> {
        self.check(handle)?;
        match &mut self.slots[handle.index()] {
            ResourceSlot::InputLayout(layout) => Ok(layout),
            other => Err(ResourceError::KindMismatch {
                handle,
                expected: ResourceKind::InputLayout,
                found: other.kind(),
            }),
        }
    }

    /// Resolves a texture or a render target to the texture it samples from.
    pub(crate) fn texture_source(
        &self,
        handle: ResourceHandle,
    ) -> Result<TextureInfo, ResourceError> {
        match self.get(handle)? {
            ResourceSlot::Texture(info) => Ok(*info),
            ResourceSlot::RenderTarget(target) => Ok(target.texture),
            other => Err(ResourceError::KindMismatch {
                handle,
                expected: ResourceKind::Texture,
                found: other.kind(),
            }),
        }
    }

    /// Number of indices held in any of `domain`'s bits, including the null slot.
    pub(crate) fn assigned_count(&self, domain: AllocationDomain) -> usize {
        self.allocator.assigned_count(domain.bits())
    }

    /// Number of slots holding a payload.
    pub(crate) fn live_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| !matches!(slot, ResourceSlot::Empty))
            .count()
    }

    /// Iterates mutably over the program slots linked from `shader`.
    pub(crate) fn programs_using_mut(
        &mut self,
        shader: ResourceHandle,
    ) -> impl Iterator<Item = &mut ProgramResource> {
        self.slots.iter_mut().filter_map(move |slot| match slot {
            ResourceSlot::ShaderProgram(program)
                if program.vertex_shader == shader || program.pixel_shader == shader =>
            {
                Some(program)
            }
            _ => None,
        })
    }

    /// Iterates over every live payload with its handle.
    pub(crate) fn iter_live(&self) -> impl Iterator<Item = (ResourceHandle, &ResourceSlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !matches!(slot, ResourceSlot::Empty))
            .map(|(index, slot)| (ResourceHandle(index as u32), slot))
    }

    fn check(&self, handle: ResourceHandle) -> Result<(), ResourceError> {
        if handle.is_null() || handle.index() >= self.slots.len() {
            Err(ResourceError::InvalidHandle(handle))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_slot(depth: f32) -> ResourceSlot {
        ResourceSlot::ClearState(ClearState {
            depth,
            ..Default::default()
        })
    }

    #[test]
    fn null_slot_is_never_allocated() {
        let mut pool = ResourcePool::new(3);
        let a = pool.insert(AllocationDomain::DIRECT, clear_slot(1.0)).unwrap();
        let b = pool.insert(AllocationDomain::DIRECT, clear_slot(1.0)).unwrap();
        assert_eq!((a, b), (ResourceHandle(1), ResourceHandle(2)));
        assert_eq!(
            pool.insert(AllocationDomain::DIRECT, clear_slot(1.0)),
            Err(ResourceError::Exhausted {
                pool: "resource",
                capacity: 3
            })
        );
    }

    #[test]
    fn deferred_reservation_does_not_block_direct() {
        let mut pool = ResourcePool::new(3);
        let reserved = pool.allocate(AllocationDomain::DEFERRED).unwrap();
        let direct = pool.insert(AllocationDomain::DIRECT, clear_slot(0.5)).unwrap();
        assert_eq!(reserved, direct);
        pool.release(reserved, AllocationDomain::DEFERRED).unwrap();
        assert_eq!(pool.kind(direct), ResourceKind::ClearState);
    }

    #[test]
    fn empty_domain_is_refused() {
        let mut pool = ResourcePool::new(3);
        assert_eq!(
            pool.allocate(AllocationDomain::empty()),
            Err(ResourceError::InvalidHandle(ResourceHandle::NULL))
        );
        assert_eq!(pool.allocate(AllocationDomain::DIRECT), Ok(ResourceHandle(1)));
    }

    #[test]
    fn release_leaves_stored_payloads_alone() {
        let mut pool = ResourcePool::new(3);
        let handle = pool.insert(AllocationDomain::DIRECT, clear_slot(0.75)).unwrap();
        assert_eq!(
            pool.release(handle, AllocationDomain::DIRECT),
            Err(ResourceError::KindMismatch {
                handle,
                expected: ResourceKind::Empty,
                found: ResourceKind::ClearState,
            })
        );
        assert!(pool.release(handle, AllocationDomain::ALL).is_err());

        let next = pool.insert(AllocationDomain::DIRECT, clear_slot(0.0)).unwrap();
        assert_ne!(next, handle);
        assert!(matches!(pool.clear_state(handle), Ok(cs) if cs.depth == 0.75));

        let reserved = pool.allocate(AllocationDomain::DEFERRED).unwrap();
        assert_eq!(reserved, handle);
        pool.release(reserved, AllocationDomain::DEFERRED).unwrap();
        assert_eq!(pool.kind(handle), ResourceKind::ClearState);
    }

    #[test]
    fn remove_checks_kind_and_frees_index() {
        let mut pool = ResourcePool::new(4);
        let handle = pool.insert(AllocationDomain::DIRECT, clear_slot(0.25)).unwrap();
        assert!(matches!(
            pool.remove(handle, ResourceKind::Buffer),
            Err(ResourceError::KindMismatch {
                expected: ResourceKind::Buffer,
                found: ResourceKind::ClearState,
                ..
            })
        ));
        let payload = pool.remove(handle, ResourceKind::ClearState).unwrap();
        assert!(matches!(payload, ResourceSlot::ClearState(cs) if cs.depth == 0.25));
        assert_eq!(pool.kind(handle), ResourceKind::Empty);
        assert!(pool.remove(handle, ResourceKind::ClearState).is_err());
        assert_eq!(pool.insert(AllocationDomain::DIRECT, clear_slot(0.0)).unwrap(), handle);
    }

    #[test]
    fn accessors_reject_null_and_out_of_range() {
        let pool = ResourcePool::new(2);
        assert_eq!(
            pool.clear_state(ResourceHandle::NULL),
            Err(ResourceError::InvalidHandle(ResourceHandle::NULL))
        );
        assert_eq!(
            pool.buffer(ResourceHandle(9)),
            Err(ResourceError::InvalidHandle(ResourceHandle(9)))
        );
    }

    #[test]
    fn render_target_resolves_as_texture_source() {
        let mut pool = ResourcePool::new(4);
        let texture = TextureInfo {
            native: NativeId(7),
            max_mip_level: 0,
        };
        let handle = pool
            .insert(
                AllocationDomain::DIRECT,
                ResourceSlot::RenderTarget(RenderTargetResource {
                    framebuffer: NativeId(3),
                    texture,
                }),
            )
            .unwrap();
        assert_eq!(pool.texture_source(handle), Ok(texture));
        assert_eq!(pool.live_count(), 1);
    }

    #[test]
    fn program_slots_are_found_by_either_stage() {
        let mut pool = ResourcePool::new(8);
        let (vs, ps, other) = (ResourceHandle(5), ResourceHandle(6), ResourceHandle(7));
        for pixel_shader in [ps, other] {
            pool.insert(
                AllocationDomain::DIRECT,
                ResourceSlot::ShaderProgram(ProgramResource {
                    vertex_shader: vs,
                    pixel_shader,
                    program: NativeId(11),
                }),
            )
            .unwrap();
        }
        assert_eq!(pool.programs_using_mut(vs).count(), 2);
        assert_eq!(pool.programs_using_mut(other).count(), 1);
        assert_eq!(pool.programs_using_mut(ResourceHandle(3)).count(), 0);
    }

    #[test]
    fn raster_descriptor_translation() {
        let state = RasterState::from(&RasterStateDescriptor {
            cull_mode: CullMode::None,
            fill_mode: FillMode::Wireframe,
            depth_clip_enable: false,
            scissor_enable: true,
        });
        assert!(!state.culling_enabled);
        assert!(state.depth_clamp_enabled);
        assert!(state.scissor_enabled);
        assert_eq!(state.polygon_mode, FillMode::Wireframe);
    }
}
