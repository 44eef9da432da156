// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentable-surface binding and swap-chain state.
//!
//! The windowing layer owns the native surface and hands the context a
//! shared reference ([`Arc<dyn NativeSurface>`]); the surface stays alive as
//! long as either side references it, but may become *invalid* at any time
//! (the compositor can revoke the underlying buffer queue between frames).
//! [`SurfaceBinding`] tracks the bound handle, its last known dimensions,
//! the active and requested [`SwapBehavior`], and the saturation query the
//! orchestrator uses to drop frames instead of stalling.

use alloc::sync::Arc;

use kurbo::Rect;
use thiserror::Error;

use crate::time::{Duration, HostTime};

/// How the swap chain treats buffer contents across swaps.
///
/// Requested via [`SurfaceBinding::set_swap_behavior`]; takes effect on the
/// *next* surface (re)binding rather than immediately, so an active
/// presentation is never reconfigured mid-flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SwapBehavior {
    /// Buffer contents survive a swap; partial redraws are possible when the
    /// backend reports a usable buffer age.
    #[default]
    Preserve,
    /// Buffer contents are discarded on swap; every frame repaints the full
    /// surface.
    Discard,
}

/// Failure reported by the native surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The surface handle is no longer backed by a valid buffer queue.
    #[error("surface is no longer valid")]
    Lost,
}

/// The dequeued presentation target for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTarget {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Number of swaps since this buffer's contents were last written, if
    /// the backend reports it. `Some(0)` means a freshly allocated buffer
    /// with undefined contents; `None` means the backend cannot tell.
    pub buffer_age: Option<u32>,
}

impl FrameTarget {
    /// The full surface bounds as a rectangle.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Timing observations from a completed buffer swap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PresentStats {
    /// When the swap was reported complete.
    pub swap_completed: HostTime,
    /// Time spent dequeuing the buffer at frame start.
    pub dequeue_duration: Duration,
    /// Time spent queuing the finished buffer for composition.
    pub queue_duration: Duration,
}

/// A native presentable surface supplied by the windowing layer.
///
/// Methods take `&self`: the handle is shared with the windowing layer and
/// all mutation happens behind the platform's own synchronization. All calls
/// come from the render thread.
pub trait NativeSurface {
    /// Current surface dimensions in pixels.
    fn size(&self) -> (u32, u32);

    /// Whether the surface is still backed by a live buffer queue.
    fn is_valid(&self) -> bool;

    /// Whether a buffer slot can be dequeued without blocking.
    ///
    /// Must never block; this is the query behind
    /// [`SurfaceBinding::is_queue_saturated`].
    fn has_free_buffer(&self) -> bool;

    /// Dequeues presentation metadata for the coming frame.
    fn begin_frame(&self) -> Result<FrameTarget, SurfaceError>;

    /// Swaps buffers, presenting `damage` to the compositor.
    fn present(&self, damage: Rect) -> Result<PresentStats, SurfaceError>;

    /// Discards any rendered-but-unqueued work.
    ///
    /// Returns `true` if there was unflushed work to discard.
    fn discard_pending(&self) -> bool;
}

impl core::fmt::Debug for dyn NativeSurface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (w, h) = self.size();
        write!(f, "NativeSurface({w}x{h})")
    }
}

/// Owns the association between a context and its native surface.
#[derive(Debug, Default)]
pub struct SurfaceBinding {
    surface: Option<Arc<dyn NativeSurface>>,
    /// Swap behavior in effect for the currently bound surface.
    active_swap_behavior: SwapBehavior,
    /// Swap behavior to apply at the next (re)binding.
    requested_swap_behavior: SwapBehavior,
    /// Set on every (re)bind; consumed by the orchestrator to force a full
    /// redraw and a GPU-context currency re-check.
    have_new_surface: bool,
    last_width: u32,
    last_height: u32,
}

impl SurfaceBinding {
    /// Creates an unbound binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates a new surface, or releases the current one when `surface`
    /// is `None`.
    ///
    /// Binding `None` while nothing is bound is a silent no-op. Binding a
    /// surface invalidates the cached dimensions, applies the requested
    /// [`SwapBehavior`], and marks the surface as new so the next draw
    /// re-evaluates GPU-context currency.
    pub fn bind(&mut self, surface: Option<Arc<dyn NativeSurface>>) {
        if surface.is_none() && self.surface.is_none() {
            return;
        }
        self.have_new_surface = surface.is_some();
        self.last_width = 0;
        self.last_height = 0;
        self.active_swap_behavior = self.requested_swap_behavior;
        self.surface = surface;
    }

    /// Swaps the bound surface for a different handle without a full
    /// teardown, used when the windowing layer recreates the underlying
    /// buffer queue (size or format change). Swap history is kept by the
    /// context and is unaffected.
    pub fn update(&mut self, surface: Arc<dyn NativeSurface>) {
        self.bind(Some(surface));
    }

    /// Releases the binding to `surface` if it is the bound one.
    ///
    /// Returns whether any unflushed work had to be discarded. Context
    /// state survives; a later [`bind`](Self::bind) resumes presentation.
    pub fn pause(&mut self, surface: &Arc<dyn NativeSurface>) -> bool {
        match &self.surface {
            Some(bound) if Arc::ptr_eq(bound, surface) => {
                let discarded = surface.discard_pending();
                self.surface = None;
                self.have_new_surface = false;
                discarded
            }
            _ => false,
        }
    }

    /// Whether a surface is currently bound.
    #[must_use]
    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// The bound surface, if any.
    #[must_use]
    pub fn surface(&self) -> Option<&Arc<dyn NativeSurface>> {
        self.surface.as_ref()
    }

    /// Requests a swap behavior for the next surface (re)binding.
    pub fn set_swap_behavior(&mut self, behavior: SwapBehavior) {
        self.requested_swap_behavior = behavior;
    }

    /// The swap behavior in effect for the bound surface.
    #[must_use]
    pub fn swap_behavior(&self) -> SwapBehavior {
        self.active_swap_behavior
    }

    /// Consumes the new-surface flag set by the last (re)bind.
    pub fn take_new_surface(&mut self) -> bool {
        core::mem::take(&mut self.have_new_surface)
    }

    /// Returns whether the presentation queue has no free buffer slot.
    ///
    /// Non-blocking. An unbound or invalid surface is not "saturated" — it
    /// fails the draw through a different path.
    #[must_use]
    pub fn is_queue_saturated(&self) -> bool {
        match &self.surface {
            Some(s) => s.is_valid() && !s.has_free_buffer(),
            None => false,
        }
    }

    /// Records the dimensions observed at the last successful frame start.
    pub fn record_dimensions(&mut self, width: u32, height: u32) {
        self.last_width = width;
        self.last_height = height;
    }

    /// Last known surface dimensions, `(0, 0)` when unknown.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.last_width, self.last_height)
    }
}
