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

//! Fixed-function state blocks.

use crate::kiln_bitflags;

kiln_bitflags! {
    /// Which buffers a clear operation touches.
    pub struct ClearFlags: u32 {
        /// Clear the colour buffer.
        const COLOR = 1 << 0;
        /// Clear the depth buffer.
        const DEPTH = 1 << 1;
        /// Clear the stencil buffer.
        const STENCIL = 1 << 2;
        /// Clear colour and depth.
        const COLOR_DEPTH = Self::COLOR.bits() | Self::DEPTH.bits();
    }
}

/// Values written by a clear operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearState {
    /// Clear colour as `[r, g, b, a]`.
    pub rgba: [f32; 4],
    /// Clear depth.
    pub depth: f32,
    /// Buffers to clear.
    pub flags: ClearFlags,
}

impl Default for ClearState {
    fn default() -> Self {
        Self {
            rgba: [0.0, 0.0, 0.0, 1.0],
            depth: 1.0,
            flags: ClearFlags::COLOR_DEPTH,
        }
    }
}

/// Which triangle faces are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    /// No culling.
    #[default]
    None,
    /// Discard front faces.
    Front,
    /// Discard back faces.
    Back,
}

/// How polygons are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillMode {
    /// Filled polygons.
    #[default]
    Solid,
    /// Polygon edges only.
    Wireframe,
}

/// A descriptor used to create a raster state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterStateDescriptor {
    /// Face culling mode.
    pub cull_mode: CullMode,
    /// Polygon fill mode.
    pub fill_mode: FillMode,
    /// If `false`, depth is clamped instead of clipped.
    pub depth_clip_enable: bool,
    /// Enables the scissor test.
    pub scissor_enable: bool,
}

impl Default for RasterStateDescriptor {
    fn default() -> Self {
        Self {
            cull_mode: CullMode::Back,
            fill_mode: FillMode::Solid,
            depth_clip_enable: true,
            scissor_enable: false,
        }
    }
}

/// A multiplier applied to source or destination colours during blending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    InvSrcColor,
    SrcAlpha,
    InvSrcAlpha,
    DestAlpha,
    InvDestAlpha,
    DestColor,
    InvDestColor,
}

/// How weighted source and destination values are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
pub enum BlendOperation {
    #[default]
    Add,
    Subtract,
    RevSubtract,
    Min,
    Max,
}

/// Blending for one colour target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetBlend {
    /// Enables blending for this target.
    pub blend_enable: bool,
    /// Source factor for colour.
    pub src_blend: BlendFactor,
    /// Destination factor for colour.
    pub dest_blend: BlendFactor,
    /// Colour operation.
    pub blend_op: BlendOperation,
    /// Source factor for alpha.
    pub src_blend_alpha: BlendFactor,
    /// Destination factor for alpha.
    pub dest_blend_alpha: BlendFactor,
    /// Alpha operation.
    pub blend_op_alpha: BlendOperation,
}

impl RenderTargetBlend {
    /// Classic `src * a + dst * (1 - a)` alpha blending.
    pub const ALPHA: Self = Self {
        blend_enable: true,
        src_blend: BlendFactor::SrcAlpha,
        dest_blend: BlendFactor::InvSrcAlpha,
        blend_op: BlendOperation::Add,
        src_blend_alpha: BlendFactor::One,
        dest_blend_alpha: BlendFactor::InvSrcAlpha,
        blend_op_alpha: BlendOperation::Add,
    };

    /// Blending disabled.
    pub const DISABLED: Self = Self {
        blend_enable: false,
        src_blend: BlendFactor::One,
        dest_blend: BlendFactor::Zero,
        blend_op: BlendOperation::Add,
        src_blend_alpha: BlendFactor::One,
        dest_blend_alpha: BlendFactor::Zero,
        blend_op_alpha: BlendOperation::Add,
    };
}

/// A descriptor used to create a blend state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlendStateDescriptor {
    /// Use separate colour and alpha equations.
    pub independent_blend_enable: bool,
    /// Per-target blending, indexed by colour attachment.
    pub render_targets: Vec<RenderTargetBlend>,
}

/// A comparison used by the depth test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
pub enum CompareFunction {
    Never,
    #[default]
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

/// A descriptor used to create a depth-stencil state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DepthStencilDescriptor {
    /// Enables the depth test.
    pub depth_enable: bool,
    /// Depth comparison.
    pub depth_func: CompareFunction,
    /// Enables depth writes.
    pub depth_write_mask: bool,
}

/// Viewport rectangle and depth range. Origin is bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Left edge.
    pub x: f32,
    /// Bottom edge.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Near depth, `0..=1`.
    pub min_depth: f32,
    /// Far depth, `0..=1`.
    pub max_depth: f32,
}

/// Scissor rectangle in top-left origin window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[allow(missing_docs)]
pub struct ScissorRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}
