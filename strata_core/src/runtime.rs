// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-thread runtime contract.
//!
//! Strata runs entirely on one dedicated render thread. The thread's runtime
//! — event loop, vsync source, task transport — lives outside this crate.
//! A platform integration provides the following pieces:
//!
//! - **Clock** — A [`Clock`] implementation reading the platform's monotonic
//!   clock in nanoseconds. The core never reads time on its own; every stage
//!   timestamp in the frame records comes through this trait.
//!
//! - **Frame scheduler** — A [`FrameScheduler`] implementation that
//!   registers/deregisters the context for per-vsync callbacks. The runtime
//!   is expected to call
//!   [`RenderContext::do_frame`](crate::context::RenderContext::do_frame)
//!   once per vertical-sync interval while a frame is requested.
//!
//! - **Animation context** — An [`AnimationContext`] implementation that
//!   advances time-driven property state during tree preparation. The
//!   orchestrator aggregates exactly one per context and calls it from the
//!   render thread only.
//!
//! Cross-thread submission is out of scope: every entry point on
//! [`RenderContext`](crate::context::RenderContext) is documented as
//! render-thread-only, and callers on other threads must marshal through an
//! external task processor first.

use crate::time::HostTime;

/// Monotonic nanosecond clock for the render thread.
pub trait Clock {
    /// Returns the current monotonic time.
    fn now(&self) -> HostTime;
}

/// Advances time-driven property state during tree preparation.
///
/// Purely consumed by the orchestrator; ownership of the underlying
/// animators stays with the scene graph.
pub trait AnimationContext {
    /// Called at the start of each prepared frame with the driving vsync
    /// timestamp.
    fn start_frame(&mut self, vsync: HostTime);

    /// Called after scene traversal to run animators not attached to any
    /// traversed node.
    fn run_remaining(&mut self);
}

/// Registers the context for vsync-driven frame callbacks.
pub trait FrameScheduler {
    /// Requests that the runtime deliver (at least) one more frame callback.
    ///
    /// Idempotent: requesting while a callback is already pending is a
    /// no-op.
    fn request_frame(&mut self);

    /// Deregisters any pending frame callback.
    fn cancel_frames(&mut self);
}
