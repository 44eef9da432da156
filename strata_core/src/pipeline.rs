// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering-pipeline contract.
//!
//! The concrete rasterization backend — draw-call issuance, shader and
//! pipeline selection, GPU caches — implements [`RenderPipeline`]. A
//! pipeline is selected once at context construction, exclusively owned by
//! the context, and never swapped afterwards.

use alloc::sync::Arc;

use kurbo::Rect;

use crate::damage::DamageAccumulator;
use crate::node::RenderNode;
use crate::surface::FrameTarget;

use core::fmt;

/// Opaque handle to a mutable image the backend may pin to its GPU cache.
///
/// Assigned by the scene graph / resource layer; passed through without
/// interpretation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageHandle(pub u64);

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageHandle({})", self.0)
    }
}

/// Shadow-casting light parameters for the frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightingInfo {
    /// Radius of the area light.
    pub radius: f32,
    /// Alpha applied to ambient shadows.
    pub ambient_alpha: u8,
    /// Alpha applied to spot shadows.
    pub spot_alpha: u8,
    /// Light position in surface space.
    pub center: [f32; 3],
}

impl Default for LightingInfo {
    fn default() -> Self {
        Self {
            radius: 0.0,
            ambient_alpha: 0,
            spot_alpha: 0,
            center: [0.0; 3],
        }
    }
}

/// Everything a pipeline needs to render one frame's content.
#[derive(Debug)]
pub struct DrawContent<'a> {
    /// The dequeued presentation target.
    pub target: &'a FrameTarget,
    /// The rectangle that must be repainted, already widened for swap-chain
    /// buffer reuse and clamped to the surface bounds.
    pub dirty: Rect,
    /// Scene nodes in painter's order, back to front.
    pub scene: &'a [Arc<dyn RenderNode>],
    /// Whether the surface content is fully opaque.
    pub opaque: bool,
    /// Light parameters for shadow rendering.
    pub lighting: LightingInfo,
    /// Bounds of the main content within the surface.
    pub content_draw_bounds: Rect,
}

/// The injected rasterization backend.
///
/// All methods are called from the render thread only.
pub trait RenderPipeline {
    /// Makes the GPU context current for the bound surface.
    ///
    /// Returns `false` when no context could be made current; the frame is
    /// then failed (logged, not fatal) and damage is retained for retry.
    fn make_current(&mut self) -> bool;

    /// Creates or updates the offscreen layer attached to `node`.
    ///
    /// Returns `true` if the layer was created or updated.
    fn create_or_update_layer(
        &mut self,
        node: &Arc<dyn RenderNode>,
        damage: &DamageAccumulator,
    ) -> bool;

    /// Renders the frame's content into the target.
    ///
    /// Returns `false` on an unexpected backend failure; the orchestrator
    /// logs it and abandons the frame without presenting.
    fn draw(&mut self, content: &DrawContent<'_>) -> bool;

    /// Pins mutable images to the GPU cache so no CPU copy is needed.
    ///
    /// Returns `false` if any image could not be pinned (e.g. cache limits
    /// exceeded); the caller must fall back to a copy. Non-fatal.
    fn pin_images(&mut self, images: &[ImageHandle]) -> bool;

    /// Unpins any images previously pinned via
    /// [`pin_images`](Self::pin_images).
    fn unpin_images(&mut self);

    /// Notifies the pipeline that drawing is suspended so it can release
    /// transient per-surface state.
    fn on_stopped(&mut self) {}

    /// Releases GPU resources held by the pipeline (caches, scratch
    /// targets). Called under memory pressure and during teardown.
    fn release_resources(&mut self) {}
}
