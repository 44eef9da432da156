// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic test doubles for [`strata_core`].
//!
//! Everything here is hand-controlled: the clock only moves when advanced,
//! the surface presents into a `Vec`, and the pipeline records what it was
//! asked to draw. The doubles share their state through `Rc`, so a test can
//! keep a handle while the context owns the boxed trait object:
//!
//! ```
//! use strata_harness::{CountingAnimations, ManualClock, ManualScheduler, RecordingPipeline};
//! use strata_core::context::{ContextConfig, RenderContext};
//!
//! let pipeline = RecordingPipeline::new();
//! let clock = ManualClock::new();
//! let mut ctx = RenderContext::new(
//!     ContextConfig::default(),
//!     Box::new(pipeline.clone()),
//!     Box::new(CountingAnimations::new()),
//!     Box::new(ManualScheduler::new()),
//!     Box::new(clock.clone()),
//! );
//! ctx.do_frame(clock.now());
//! assert_eq!(pipeline.draw_count(), 0, "nothing to draw yet");
//! ```
#![no_std]
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET

extern crate alloc;

use alloc::rc::Rc;
use alloc::sync::Arc;
use alloc::vec::Vec;

use core::cell::{Cell, RefCell};

use kurbo::Rect;

use strata_core::damage::DamageAccumulator;
use strata_core::metrics::FrameMetricsObserver;
use strata_core::node::{NodeId, RenderNode, TreeInfo};
use strata_core::pipeline::{DrawContent, ImageHandle, RenderPipeline};
use strata_core::record::FrameRecord;
use strata_core::runtime::{AnimationContext, Clock, FrameScheduler};
use strata_core::surface::{FrameTarget, NativeSurface, PresentStats, SurfaceError};
use strata_core::time::{Duration, HostTime};
use strata_core::work::Fence;

/// A clock that only moves when told to.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    /// Creates a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by.nanos());
    }

    /// Jumps the clock to an absolute time.
    pub fn set(&self, to: HostTime) {
        self.now.set(to.0);
    }

    /// The current time without going through the trait object.
    #[must_use]
    pub fn now(&self) -> HostTime {
        HostTime(self.now.get())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> HostTime {
        HostTime(self.now.get())
    }
}

/// An in-memory surface that records every presentation.
///
/// Validity, buffer age, and queue saturation are all settable mid-test.
#[derive(Debug)]
pub struct TestSurface {
    width: Cell<u32>,
    height: Cell<u32>,
    valid: Cell<bool>,
    free_buffer: Cell<bool>,
    buffer_age: Cell<Option<u32>>,
    unflushed: Cell<bool>,
    present_fails: Cell<bool>,
    presents: RefCell<Vec<Rect>>,
}

impl TestSurface {
    /// Creates a valid surface of the given size reporting buffer age 1.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Arc<Self> {
        Arc::new(Self {
            width: Cell::new(width),
            height: Cell::new(height),
            valid: Cell::new(true),
            free_buffer: Cell::new(true),
            buffer_age: Cell::new(Some(1)),
            unflushed: Cell::new(false),
            present_fails: Cell::new(false),
            presents: RefCell::new(Vec::new()),
        })
    }

    /// Upcasts for APIs taking `Arc<dyn NativeSurface>`.
    #[must_use]
    pub fn as_dyn(self: &Arc<Self>) -> Arc<dyn NativeSurface> {
        self.clone()
    }

    /// Marks the surface lost; `begin_frame` and `present` will fail.
    pub fn set_valid(&self, valid: bool) {
        self.valid.set(valid);
    }

    /// Controls the saturation query: `false` means no free buffer slot.
    pub fn set_free_buffer(&self, free: bool) {
        self.free_buffer.set(free);
    }

    /// Sets the buffer age reported by the next `begin_frame`.
    pub fn set_buffer_age(&self, age: Option<u32>) {
        self.buffer_age.set(age);
    }

    /// Makes the next `present` fail while `begin_frame` still succeeds.
    pub fn set_present_fails(&self, fails: bool) {
        self.present_fails.set(fails);
    }

    /// Marks unflushed work, observable through `discard_pending`.
    pub fn set_unflushed(&self, unflushed: bool) {
        self.unflushed.set(unflushed);
    }

    /// Damage rectangles of every presentation so far, in order.
    #[must_use]
    pub fn presents(&self) -> Vec<Rect> {
        self.presents.borrow().clone()
    }

    /// Number of presentations so far.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.presents.borrow().len()
    }
}

impl NativeSurface for TestSurface {
    fn size(&self) -> (u32, u32) {
        (self.width.get(), self.height.get())
    }

    fn is_valid(&self) -> bool {
        self.valid.get()
    }

    fn has_free_buffer(&self) -> bool {
        self.free_buffer.get()
    }

    fn begin_frame(&self) -> Result<FrameTarget, SurfaceError> {
        if !self.valid.get() {
            return Err(SurfaceError::Lost);
        }
        Ok(FrameTarget {
            width: self.width.get(),
            height: self.height.get(),
            buffer_age: self.buffer_age.get(),
        })
    }

    fn present(&self, damage: Rect) -> Result<PresentStats, SurfaceError> {
        if !self.valid.get() || self.present_fails.get() {
            return Err(SurfaceError::Lost);
        }
        self.presents.borrow_mut().push(damage);
        Ok(PresentStats::default())
    }

    fn discard_pending(&self) -> bool {
        self.unflushed.take()
    }
}

#[derive(Debug, Default)]
struct PipelineState {
    current_ok: Cell<bool>,
    layer_ok: Cell<bool>,
    draw_ok: Cell<bool>,
    pin_ok: Cell<bool>,
    draws: RefCell<Vec<Rect>>,
    layer_updates: RefCell<Vec<NodeId>>,
    pinned: RefCell<Vec<Vec<ImageHandle>>>,
    unpins: Cell<u32>,
    stops: Cell<u32>,
    releases: Cell<u32>,
}

/// A pipeline that draws nothing but remembers everything.
///
/// All operations succeed until a failure is injected.
#[derive(Clone, Debug)]
pub struct RecordingPipeline {
    state: Rc<PipelineState>,
}

impl Default for RecordingPipeline {
    fn default() -> Self {
        let state = PipelineState::default();
        state.current_ok.set(true);
        state.layer_ok.set(true);
        state.draw_ok.set(true);
        state.pin_ok.set(true);
        Self {
            state: Rc::new(state),
        }
    }
}

impl RecordingPipeline {
    /// Creates a pipeline whose operations all succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `make_current` fail.
    pub fn set_current_ok(&self, ok: bool) {
        self.state.current_ok.set(ok);
    }

    /// Makes layer create/update calls fail.
    pub fn set_layer_ok(&self, ok: bool) {
        self.state.layer_ok.set(ok);
    }

    /// Makes `draw` report a backend failure.
    pub fn set_draw_ok(&self, ok: bool) {
        self.state.draw_ok.set(ok);
    }

    /// Makes image pinning fail.
    pub fn set_pin_ok(&self, ok: bool) {
        self.state.pin_ok.set(ok);
    }

    /// Dirty rectangles of every draw call, in order.
    #[must_use]
    pub fn draws(&self) -> Vec<Rect> {
        self.state.draws.borrow().clone()
    }

    /// Number of draw calls so far.
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.state.draws.borrow().len()
    }

    /// Nodes that received a layer create/update pass, in order.
    #[must_use]
    pub fn layer_updates(&self) -> Vec<NodeId> {
        self.state.layer_updates.borrow().clone()
    }

    /// Image sets passed to `pin_images`, one entry per frame.
    #[must_use]
    pub fn pinned(&self) -> Vec<Vec<ImageHandle>> {
        self.state.pinned.borrow().clone()
    }

    /// Number of `unpin_images` calls.
    #[must_use]
    pub fn unpin_count(&self) -> u32 {
        self.state.unpins.get()
    }

    /// Number of `on_stopped` notifications.
    #[must_use]
    pub fn stop_count(&self) -> u32 {
        self.state.stops.get()
    }

    /// Number of `release_resources` calls.
    #[must_use]
    pub fn release_count(&self) -> u32 {
        self.state.releases.get()
    }
}

impl RenderPipeline for RecordingPipeline {
    fn make_current(&mut self) -> bool {
        self.state.current_ok.get()
    }

    fn create_or_update_layer(
        &mut self,
        node: &Arc<dyn RenderNode>,
        _damage: &DamageAccumulator,
    ) -> bool {
        if !self.state.layer_ok.get() {
            return false;
        }
        self.state.layer_updates.borrow_mut().push(node.id());
        true
    }

    fn draw(&mut self, content: &DrawContent<'_>) -> bool {
        if !self.state.draw_ok.get() {
            return false;
        }
        self.state.draws.borrow_mut().push(content.dirty);
        true
    }

    fn pin_images(&mut self, images: &[ImageHandle]) -> bool {
        self.state.pinned.borrow_mut().push(images.to_vec());
        self.state.pin_ok.get()
    }

    fn unpin_images(&mut self) {
        self.state.unpins.set(self.state.unpins.get() + 1);
    }

    fn on_stopped(&mut self) {
        self.state.stops.set(self.state.stops.get() + 1);
    }

    fn release_resources(&mut self) {
        self.state.releases.set(self.state.releases.get() + 1);
    }
}

/// A scene node with hand-set one-shot damage.
///
/// Damage set via [`set_damage`](Self::set_damage) is reported by exactly
/// one `prepare` pass, mimicking a node whose display list changed once.
#[derive(Debug)]
pub struct TestNode {
    id: NodeId,
    damage: Cell<Option<Rect>>,
    images: RefCell<Vec<ImageHandle>>,
    prepare_count: Cell<u32>,
    detach_count: Cell<u32>,
}

impl TestNode {
    /// Creates a clean node.
    #[must_use]
    pub fn new(id: u64) -> Arc<Self> {
        Arc::new(Self {
            id: NodeId(id),
            damage: Cell::new(None),
            images: RefCell::new(Vec::new()),
            prepare_count: Cell::new(0),
            detach_count: Cell::new(0),
        })
    }

    /// Upcasts for APIs taking `Arc<dyn RenderNode>`.
    #[must_use]
    pub fn as_dyn(self: &Arc<Self>) -> Arc<dyn RenderNode> {
        self.clone()
    }

    /// Marks the node changed; the next `prepare` reports `rect` as damage.
    pub fn set_damage(&self, rect: Rect) {
        self.damage.set(Some(rect));
    }

    /// Makes every `prepare` request these images to be pinned.
    pub fn set_images(&self, images: Vec<ImageHandle>) {
        *self.images.borrow_mut() = images;
    }

    /// Number of `prepare` traversals that visited this node.
    #[must_use]
    pub fn prepare_count(&self) -> u32 {
        self.prepare_count.get()
    }

    /// Number of times the node's layer was detached.
    #[must_use]
    pub fn detach_count(&self) -> u32 {
        self.detach_count.get()
    }
}

impl RenderNode for TestNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn prepare(&self, info: &mut TreeInfo<'_>) {
        self.prepare_count.set(self.prepare_count.get() + 1);
        if let Some(rect) = self.damage.take() {
            info.damage.accumulate(rect);
            info.content_changed = true;
        }
        info.images.extend(self.images.borrow().iter().copied());
    }

    fn detach_layer(&self) {
        self.detach_count.set(self.detach_count.get() + 1);
    }
}

#[derive(Debug, Default)]
struct SchedulerState {
    requests: Cell<u32>,
    cancels: Cell<u32>,
}

/// A scheduler that counts requests instead of arming callbacks.
///
/// Tests drive the frame loop themselves by calling `do_frame`; the counters
/// verify that the context asked for (or cancelled) wakeups when it should.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    state: Rc<SchedulerState>,
}

impl ManualScheduler {
    /// Creates a scheduler with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frame requests so far.
    #[must_use]
    pub fn request_count(&self) -> u32 {
        self.state.requests.get()
    }

    /// Number of cancellations so far.
    #[must_use]
    pub fn cancel_count(&self) -> u32 {
        self.state.cancels.get()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.state.requests.set(self.state.requests.get() + 1);
    }

    fn cancel_frames(&mut self) {
        self.state.cancels.set(self.state.cancels.get() + 1);
    }
}

#[derive(Debug, Default)]
struct AnimationState {
    starts: Cell<u32>,
    finishes: Cell<u32>,
    last_vsync: Cell<Option<HostTime>>,
}

/// An animation context that records its callbacks.
#[derive(Clone, Debug, Default)]
pub struct CountingAnimations {
    state: Rc<AnimationState>,
}

impl CountingAnimations {
    /// Creates an animation context with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames started.
    #[must_use]
    pub fn start_count(&self) -> u32 {
        self.state.starts.get()
    }

    /// Number of `run_remaining` calls.
    #[must_use]
    pub fn finish_count(&self) -> u32 {
        self.state.finishes.get()
    }

    /// Vsync passed to the most recent `start_frame`.
    #[must_use]
    pub fn last_vsync(&self) -> Option<HostTime> {
        self.state.last_vsync.get()
    }
}

impl AnimationContext for CountingAnimations {
    fn start_frame(&mut self, vsync: HostTime) {
        self.state.starts.set(self.state.starts.get() + 1);
        self.state.last_vsync.set(Some(vsync));
    }

    fn run_remaining(&mut self) {
        self.state.finishes.set(self.state.finishes.get() + 1);
    }
}

/// A fence that counts waits instead of blocking.
#[derive(Clone, Debug, Default)]
pub struct TestFence {
    waits: Rc<Cell<u32>>,
}

impl TestFence {
    /// Creates an unsignaled fence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the fence has been waited on.
    #[must_use]
    pub fn wait_count(&self) -> u32 {
        self.waits.get()
    }
}

impl Fence for TestFence {
    fn wait(&self) {
        self.waits.set(self.waits.get() + 1);
    }
}

/// A metrics observer that records the frame numbers it sees.
#[derive(Debug, Default)]
pub struct CountingObserver {
    seen: Vec<i64>,
}

impl CountingObserver {
    /// Creates an observer that has seen nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame numbers observed, in delivery order.
    #[must_use]
    pub fn seen(&self) -> &[i64] {
        &self.seen
    }

    /// Number of callbacks received.
    #[must_use]
    pub fn count(&self) -> usize {
        self.seen.len()
    }
}

impl FrameMetricsObserver for CountingObserver {
    fn on_frame_metrics(&mut self, frame: &FrameRecord) {
        self.seen.push(frame.frame_number);
    }
}
