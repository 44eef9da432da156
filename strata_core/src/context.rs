// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-surface frame orchestrator.
//!
//! One [`RenderContext`] exists per on-screen presentation target. It owns
//! the bridge between the scene list and the bound swap chain and drives the
//! per-vsync sequence
//!
//! ```text
//!   prepare_tree ──► (layer updates) ──► draw ──► present ──► record
//! ```
//!
//! Within a frame the context moves through [`FramePhase`]s
//! `Idle → Preparing → Drawing → Presenting → Idle`. A `stopped` context
//! suspends progress without cancelling it: damage keeps accumulating and a
//! catch-up frame is scheduled when drawing resumes.
//!
//! Every method is render-thread-only. See the [`runtime`](crate::runtime)
//! module for the threading contract.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use core::cell::RefCell;
use core::fmt;

use kurbo::Rect;
use thiserror::Error;

use crate::damage::{DamageAccumulator, widen_for_buffer_age};
use crate::layer::{LayerUpdateQueue, PrefetchedLayers};
use crate::metrics::{FrameMetricsObserver, FrameMetricsReporter, ObserverId};
use crate::node::{NodeId, RenderNode, TreeInfo};
use crate::pipeline::{DrawContent, ImageHandle, LightingInfo, RenderPipeline};
use crate::record::{FRAME_HISTORY_LEN, FrameRecord, JankStats, SWAP_HISTORY_LEN, SwapRecord};
use crate::registry::TrimLevel;
use crate::ring::RingBuffer;
use crate::runtime::{AnimationContext, Clock, FrameScheduler};
use crate::surface::{NativeSurface, SurfaceBinding, SwapBehavior};
use crate::time::{Duration, HostTime};
use crate::work::{Fence, FrameWorkQueue, WorkHandle};

/// Where the context currently is within a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FramePhase {
    /// No frame in flight.
    #[default]
    Idle,
    /// Scene traversal and damage accumulation.
    Preparing,
    /// Draw-call issuance.
    Drawing,
    /// Buffer swap in progress.
    Presenting,
}

/// Why a frame attempt did not present.
///
/// All variants are recoverable: the frame is dropped, accumulated damage is
/// retained, and the next vsync retries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DrawError {
    /// `draw` was called outside the `Preparing` phase.
    #[error("draw requested without a prepared frame")]
    NotPrepared,
    /// The pipeline could not make a GPU context current.
    #[error("no current GPU context")]
    ContextNotCurrent,
    /// No surface is bound.
    #[error("no surface bound")]
    NoSurface,
    /// The bound surface became invalid between frames.
    #[error("surface lost")]
    SurfaceLost,
    /// The presentation queue has no free buffer slot; drawing would stall.
    #[error("presentation queue saturated")]
    QueueSaturated,
    /// The rendering pipeline reported an unexpected backend failure.
    #[error("pipeline draw failed")]
    PipelineFailed,
}

/// Construction-time configuration for a [`RenderContext`].
#[derive(Clone, Debug)]
pub struct ContextConfig {
    /// Diagnostic name, surfaced in logs and frame dumps.
    pub name: String,
    /// Whether the surface content is fully opaque.
    pub opaque: bool,
    /// Shadow-light parameters handed to the pipeline each frame.
    pub lighting: LightingInfo,
    /// Display refresh interval used for jank classification.
    pub refresh_interval: Duration,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            opaque: true,
            lighting: LightingInfo::default(),
            // 60 Hz reference rate.
            refresh_interval: Duration(16_666_667),
        }
    }
}

/// Per-surface render-frame orchestrator.
///
/// Owns the scene list (painter's order, back to front), the damage
/// accumulator, the layer work queues, the surface binding, both timing
/// rings, the deferred-work queue, and the lazily created metrics reporter.
/// The rendering pipeline is injected at construction and never swapped.
pub struct RenderContext {
    name: String,
    phase: FramePhase,
    /// A stopped context rejects actual redraws and defers repaint until
    /// un-stopped.
    stopped: bool,
    /// Set when an update has been received that is not yet painted onto the
    /// surface.
    is_dirty: bool,
    opaque: bool,
    lighting: LightingInfo,
    content_draw_bounds: Rect,
    /// Monotonic presented-frame counter; −1 until the first presentation.
    frame_number: i64,
    /// Vsync of the most recent frame dropped to a saturated queue.
    last_drop_vsync: Option<HostTime>,
    refresh_interval: Duration,

    binding: SurfaceBinding,
    scene: Vec<Arc<dyn RenderNode>>,
    damage: DamageAccumulator,
    layer_queue: LayerUpdateQueue,
    prefetched: PrefetchedLayers,
    pending_images: Vec<ImageHandle>,

    swap_history: RingBuffer<SwapRecord, SWAP_HISTORY_LEN>,
    frames: RingBuffer<FrameRecord, FRAME_HISTORY_LEN>,
    current_frame: Option<FrameRecord>,

    work: FrameWorkQueue,
    reporter: Option<FrameMetricsReporter>,

    pipeline: Box<dyn RenderPipeline>,
    animations: Box<dyn AnimationContext>,
    scheduler: Box<dyn FrameScheduler>,
    clock: Box<dyn Clock>,
}

impl RenderContext {
    /// Creates a context around an injected pipeline and runtime
    /// capabilities.
    #[must_use]
    pub fn new(
        config: ContextConfig,
        pipeline: Box<dyn RenderPipeline>,
        animations: Box<dyn AnimationContext>,
        scheduler: Box<dyn FrameScheduler>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            name: config.name,
            phase: FramePhase::Idle,
            stopped: false,
            is_dirty: false,
            opaque: config.opaque,
            lighting: config.lighting,
            content_draw_bounds: Rect::ZERO,
            frame_number: -1,
            last_drop_vsync: None,
            refresh_interval: config.refresh_interval,
            binding: SurfaceBinding::new(),
            scene: Vec::new(),
            damage: DamageAccumulator::new(),
            layer_queue: LayerUpdateQueue::new(),
            prefetched: PrefetchedLayers::new(),
            pending_images: Vec::new(),
            swap_history: RingBuffer::new(),
            frames: RingBuffer::new(),
            current_frame: None,
            work: FrameWorkQueue::new(),
            reporter: None,
            pipeline,
            animations,
            scheduler,
            clock,
        }
    }

    // -- Configuration -----------------------------------------------------

    /// Diagnostic name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the diagnostic name.
    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Sets whether surface content is fully opaque.
    pub fn set_opaque(&mut self, opaque: bool) {
        self.opaque = opaque;
    }

    /// Sets the shadow-light radius and alphas.
    pub fn setup(&mut self, light_radius: f32, ambient_alpha: u8, spot_alpha: u8) {
        self.lighting.radius = light_radius;
        self.lighting.ambient_alpha = ambient_alpha;
        self.lighting.spot_alpha = spot_alpha;
    }

    /// Sets the light position in surface space.
    pub fn set_light_center(&mut self, center: [f32; 3]) {
        self.lighting.center = center;
    }

    /// Sets the bounds of the main content within the surface.
    pub fn set_content_draw_bounds(&mut self, bounds: Rect) {
        self.content_draw_bounds = bounds;
    }

    /// Requests a swap behavior; takes effect at the next surface
    /// (re)binding.
    pub fn set_swap_behavior(&mut self, behavior: SwapBehavior) {
        self.binding.set_swap_behavior(behavior);
    }

    // -- Surface lifecycle -------------------------------------------------

    /// Binds a presentable surface, or releases the current one with `None`.
    ///
    /// Binding `None` when nothing is bound is a no-op. If content changed
    /// while unbound, a catch-up frame is scheduled.
    pub fn bind_surface(&mut self, surface: Option<Arc<dyn NativeSurface>>) {
        self.binding.bind(surface);
        if self.binding.has_surface() && self.is_dirty && !self.stopped {
            self.scheduler.request_frame();
        }
    }

    /// Swaps the bound surface for a recreated one without a full teardown.
    /// Swap history is preserved.
    pub fn update_surface(&mut self, surface: Arc<dyn NativeSurface>) {
        self.binding.update(surface);
        if self.is_dirty && !self.stopped {
            self.scheduler.request_frame();
        }
    }

    /// Releases the binding to `surface`, keeping context state for a later
    /// rebind. Returns whether unflushed work had to be discarded.
    pub fn pause_surface(&mut self, surface: &Arc<dyn NativeSurface>) -> bool {
        self.scheduler.cancel_frames();
        self.binding.pause(surface)
    }

    /// Whether a surface is currently bound.
    #[must_use]
    pub fn has_surface(&self) -> bool {
        self.binding.has_surface()
    }

    /// Toggles draw suppression.
    ///
    /// Stopping cancels pending frame callbacks but preserves accumulated
    /// damage; un-stopping schedules a catch-up frame if content changed
    /// while stopped.
    pub fn set_stopped(&mut self, stopped: bool) {
        if self.stopped == stopped {
            return;
        }
        self.stopped = stopped;
        if stopped {
            self.scheduler.cancel_frames();
            self.pipeline.on_stopped();
            self.phase = FramePhase::Idle;
        } else if self.is_dirty || !self.layer_queue.is_empty() {
            self.scheduler.request_frame();
        }
    }

    /// Whether drawing is currently suppressed.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    // -- Scene management --------------------------------------------------

    /// Adds a node to the scene list.
    ///
    /// `place_front` inserts ahead of all existing nodes (always-on-top
    /// content); otherwise the node is appended. A node already present is
    /// moved rather than duplicated.
    pub fn add_render_node(&mut self, node: Arc<dyn RenderNode>, place_front: bool) {
        self.scene.retain(|existing| existing.id() != node.id());
        if place_front {
            self.scene.insert(0, node);
        } else {
            self.scene.push(node);
        }
    }

    /// Removes a node from the scene and from any pending layer work,
    /// detaching its speculative layer if one exists.
    pub fn remove_render_node(&mut self, node: NodeId) {
        self.scene.retain(|existing| existing.id() != node);
        self.layer_queue.remove(node);
        if let Some(released) = self.prefetched.remove(node) {
            released.detach_layer();
        }
    }

    /// Scene nodes in traversal (painter's) order.
    #[must_use]
    pub fn render_nodes(&self) -> &[Arc<dyn RenderNode>] {
        &self.scene
    }

    /// Unions `rect` into pending damage and schedules a frame.
    ///
    /// Damage accumulated while stopped is retained and consumed by the
    /// first draw after un-stopping.
    pub fn invalidate(&mut self, rect: Rect) {
        self.damage.accumulate(rect);
        self.is_dirty = true;
        if !self.stopped {
            self.scheduler.request_frame();
        }
    }

    // -- Layer lifecycle ---------------------------------------------------

    /// Queues `node` for an offscreen-layer create/update pass on the next
    /// frame. Queueing is idempotent per node.
    pub fn queue_layer_update(&mut self, node: Arc<dyn RenderNode>) {
        self.layer_queue.enqueue(node);
        if !self.stopped {
            self.scheduler.request_frame();
        }
    }

    /// Builds or refreshes `node`'s layer immediately, out of band from
    /// normal tree drawing.
    ///
    /// The layer is tracked as prefetched until
    /// [`mark_layer_in_use`](Self::mark_layer_in_use) claims it, so it can
    /// be reclaimed under memory pressure.
    pub fn build_layer(&mut self, node: Arc<dyn RenderNode>) {
        if !self.pipeline.make_current() {
            log::warn!("{}: build_layer with no current GPU context", self.name);
            return;
        }
        // Satisfies any queued update for the same node.
        self.layer_queue.remove(node.id());
        if self.pipeline.create_or_update_layer(&node, &self.damage) {
            self.prefetched.insert(node);
        } else {
            log::warn!("{}: layer build failed for {:?}", self.name, node.id());
        }
    }

    /// Marks `node`'s layer as actively in use, exempting it from
    /// speculative-layer reclamation.
    pub fn mark_layer_in_use(&mut self, node: NodeId) {
        self.prefetched.remove(node);
    }

    /// Releases speculative (prefetched) layer resources; with
    /// [`TrimLevel::Complete`], also asks the pipeline to drop its caches.
    pub fn trim_memory(&mut self, level: TrimLevel) {
        self.free_prefetched_layers();
        if level == TrimLevel::Complete {
            self.pipeline.release_resources();
        }
    }

    /// Detaches every layer attached to tracked nodes and releases pipeline
    /// GPU resources, without tearing the context down.
    pub fn destroy_hardware_resources(&mut self) {
        self.free_prefetched_layers();
        for node in &self.scene {
            node.detach_layer();
        }
        self.pipeline.release_resources();
    }

    fn free_prefetched_layers(&mut self) {
        for node in self.prefetched.take_all() {
            node.detach_layer();
        }
    }

    // -- Frame loop --------------------------------------------------------

    /// Per-vsync entry point, invoked by the frame scheduler's callback.
    ///
    /// Equivalent to [`prepare_tree`](Self::prepare_tree) followed by
    /// [`draw`](Self::draw) when there is pending work. Safe to invoke with
    /// nothing to do: the attempt is recorded and skipped.
    pub fn do_frame(&mut self, vsync: HostTime) {
        if self.prepare_tree(vsync)
            && let Err(err) = self.draw()
        {
            log::debug!("{}: frame dropped: {err}", self.name);
        }
    }

    /// Traverses the scene, advancing animations and accumulating damage.
    ///
    /// Returns whether a draw should follow. When nothing changed (and no
    /// layer work is queued), the context stays idle and the frame is
    /// skipped — the primary back-pressure-avoidance and power-saving path.
    /// While stopped, traversal still runs so damage keeps accumulating, but
    /// drawing is always suppressed.
    pub fn prepare_tree(&mut self, vsync: HostTime) -> bool {
        if self.phase != FramePhase::Idle {
            log::warn!("{}: prepare_tree while a frame is in flight", self.name);
            return false;
        }
        self.phase = FramePhase::Preparing;
        self.current_frame = Some(FrameRecord {
            frame_number: self.frame_number + 1,
            vsync,
            prepare_start: self.clock.now(),
            ..FrameRecord::default()
        });

        self.animations.start_frame(vsync);
        self.pending_images.clear();
        let mut info = TreeInfo {
            vsync,
            damage: &mut self.damage,
            layer_queue: &mut self.layer_queue,
            images: &mut self.pending_images,
            content_changed: false,
        };
        for node in &self.scene {
            node.prepare(&mut info);
        }
        let content_changed = info.content_changed;
        self.animations.run_remaining();

        if content_changed {
            self.is_dirty = true;
        }

        let has_work = self.is_dirty || !self.layer_queue.is_empty();
        let can_draw = !self.stopped && self.binding.has_surface() && has_work;
        if !can_draw {
            self.finish_frame(false);
        }
        can_draw
    }

    /// Draws and presents the prepared frame.
    ///
    /// Only valid from the `Preparing` phase. Transient failures (no GPU
    /// context, lost surface, saturated queue) drop the frame, retain
    /// damage, and are reported through the returned error — never a panic.
    pub fn draw(&mut self) -> Result<(), DrawError> {
        if self.phase != FramePhase::Preparing {
            log::warn!("{}: draw without a prepared frame; ignored", self.name);
            return Err(DrawError::NotPrepared);
        }
        self.phase = FramePhase::Drawing;
        let draw_start = self.clock.now();
        if let Some(record) = &mut self.current_frame {
            record.draw_start = draw_start;
        }

        let result = self.draw_inner();
        match result {
            Ok(presented) => {
                self.finish_frame(presented);
                Ok(())
            }
            Err(err) => {
                match err {
                    DrawError::PipelineFailed => {
                        log::error!("{}: {err}", self.name);
                    }
                    DrawError::QueueSaturated => {
                        log::debug!("{}: {err}; dropping frame", self.name);
                    }
                    _ => log::warn!("{}: {err}; dropping frame", self.name),
                }
                self.finish_frame(false);
                Err(err)
            }
        }
    }

    /// Runs the draw sequence; returns whether a presentation happened.
    fn draw_inner(&mut self) -> Result<bool, DrawError> {
        if !self.pipeline.make_current() {
            return Err(DrawError::ContextNotCurrent);
        }
        if self.binding.take_new_surface() {
            log::debug!("{}: drawing to a new surface", self.name);
        }

        let surface = self
            .binding
            .surface()
            .ok_or(DrawError::NoSurface)?
            .clone();
        let target = surface.begin_frame().map_err(|_| DrawError::SurfaceLost)?;
        self.binding.record_dimensions(target.width, target.height);

        if self.binding.is_queue_saturated() {
            self.last_drop_vsync = self.current_frame.as_ref().map(|r| r.vsync);
            return Err(DrawError::QueueSaturated);
        }

        // Each queued node gets exactly one create/update pass.
        for node in self.layer_queue.drain() {
            if !self.pipeline.create_or_update_layer(&node, &self.damage) {
                log::warn!("{}: layer update failed for {:?}", self.name, node.id());
            }
        }

        let bounds = target.bounds();
        let force_full = self.binding.swap_behavior() == SwapBehavior::Discard;
        let dirty = match (self.damage.take(), force_full) {
            (_, true) => bounds,
            (Some(pending), false) => {
                widen_for_buffer_age(pending, target.buffer_age, &self.swap_history, bounds)
            }
            (None, false) => {
                // Layer-only work; nothing on screen changed, skip the swap.
                return Ok(false);
            }
        };

        if !self.pipeline.pin_images(&self.pending_images) {
            log::debug!("{}: image pinning failed, falling back to copies", self.name);
        }
        let content = DrawContent {
            target: &target,
            dirty,
            scene: &self.scene,
            opaque: self.opaque,
            lighting: self.lighting,
            content_draw_bounds: self.content_draw_bounds,
        };
        let drew = self.pipeline.draw(&content);
        self.pipeline.unpin_images();
        if !drew {
            // The region was consumed but never painted; put it back so the
            // next attempt repaints it.
            self.damage.accumulate(dirty);
            return Err(DrawError::PipelineFailed);
        }

        if let Some(record) = &mut self.current_frame {
            record.swap_start = self.clock.now();
        }
        self.phase = FramePhase::Presenting;
        let stats = match surface.present(dirty) {
            Ok(stats) => stats,
            Err(_) => {
                // Keep the widened region pending so the retry repaints it.
                self.damage.accumulate(dirty);
                return Err(DrawError::SurfaceLost);
            }
        };

        self.frame_number += 1;
        let vsync = self
            .current_frame
            .as_ref()
            .map(|r| r.vsync)
            .unwrap_or_default();
        self.swap_history.push(SwapRecord {
            damage: dirty,
            vsync,
            swap_completed: stats.swap_completed,
            dequeue_duration: stats.dequeue_duration,
            queue_duration: stats.queue_duration,
        });
        if let Some(record) = &mut self.current_frame {
            record.frame_number = self.frame_number;
        }
        self.is_dirty = false;
        Ok(true)
    }

    /// Closes out the in-flight frame record.
    ///
    /// Deferred frame work runs (in enqueue order) before a presented frame
    /// is stamped complete; failed and skipped attempts keep their tasks
    /// queued for the next completed frame.
    fn finish_frame(&mut self, presented: bool) {
        if presented {
            self.work.run_pending();
        }
        if let Some(mut record) = self.current_frame.take() {
            record.completed = self.clock.now();
            record.presented = presented;
            if presented {
                if let Some(reporter) = &mut self.reporter {
                    reporter.report(&record);
                }
            }
            self.frames.push(record);
        }
        self.phase = FramePhase::Idle;
    }

    /// Tears the context down, best-effort.
    ///
    /// Cancels scheduled callbacks, drops outstanding frame work, waits out
    /// GPU fences, detaches every tracked layer, and leaves the pipeline in
    /// a state where the caller can safely release the surface. Partial
    /// failures are logged and never block later steps.
    pub fn destroy(&mut self) {
        self.stopped = true;
        self.scheduler.cancel_frames();
        self.work.cancel_pending();
        self.work.wait_on_fences();
        self.free_prefetched_layers();
        for node in &self.scene {
            node.detach_layer();
        }
        let _ = self.layer_queue.drain();
        self.scene.clear();
        self.pipeline.on_stopped();
        self.pipeline.release_resources();
        self.binding.bind(None);
        self.current_frame = None;
        self.phase = FramePhase::Idle;
        log::debug!("{}: destroyed", self.name);
    }

    // -- Deferred work & fences --------------------------------------------

    /// Queues work to run, in FIFO order, strictly before the next presented
    /// frame is reported complete. Render-thread-only; not a cross-thread
    /// queue.
    pub fn enqueue_frame_work(&mut self, work: impl FnOnce() + 'static) -> WorkHandle {
        self.work.enqueue(work)
    }

    /// Registers a fence guarding previously submitted GPU work.
    pub fn add_frame_fence(&mut self, fence: Box<dyn Fence>) {
        self.work.add_fence(fence);
    }

    /// Blocks the render thread until all outstanding GPU fences signal.
    /// Returns immediately when none are outstanding.
    pub fn wait_on_fences(&mut self) {
        self.work.wait_on_fences();
    }

    // -- Metrics & diagnostics ---------------------------------------------

    /// Registers a frame-metrics observer, creating the reporter on first
    /// registration.
    pub fn add_frame_metrics_observer(
        &mut self,
        observer: Rc<RefCell<dyn FrameMetricsObserver>>,
    ) -> ObserverId {
        self.reporter
            .get_or_insert_with(FrameMetricsReporter::new)
            .add_observer(observer)
    }

    /// Deregisters an observer, tearing the reporter down when the set
    /// becomes empty.
    pub fn remove_frame_metrics_observer(&mut self, id: ObserverId) -> bool {
        let Some(reporter) = &mut self.reporter else {
            return false;
        };
        let removed = reporter.remove_observer(id);
        if !reporter.has_observers() {
            self.reporter = None;
        }
        removed
    }

    /// Whether the metrics reporter currently exists (it is created and
    /// destroyed with the observer set).
    #[must_use]
    pub fn has_metrics_reporter(&self) -> bool {
        self.reporter.is_some()
    }

    /// Sequence number of the last presented frame; −1 before any.
    #[must_use]
    pub fn frame_number(&self) -> i64 {
        self.frame_number
    }

    /// Current position in the frame state machine.
    #[must_use]
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Whether an unpainted update is pending.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Vsync of the most recent frame dropped to queue saturation.
    #[must_use]
    pub fn last_drop_vsync(&self) -> Option<HostTime> {
        self.last_drop_vsync
    }

    /// The ring of recent presentations.
    #[must_use]
    pub fn swap_history(&self) -> &RingBuffer<SwapRecord, SWAP_HISTORY_LEN> {
        &self.swap_history
    }

    /// The ring of recent frame attempts.
    #[must_use]
    pub fn frame_records(&self) -> &RingBuffer<FrameRecord, FRAME_HISTORY_LEN> {
        &self.frames
    }

    /// Refresh interval used for jank classification.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Serializes the frame-record ring as a diagnostic report.
    pub fn dump_frames(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        let (width, height) = self.binding.dimensions();
        writeln!(
            out,
            "context \"{}\": frame {} ({width}x{height})",
            self.name, self.frame_number
        )?;
        let stats = JankStats::over(self.frames.iter(), self.refresh_interval);
        writeln!(
            out,
            "  {} attempts, {} presented, {} janky (worst overrun {:.2}ms)",
            stats.total,
            stats.presented,
            stats.janky,
            stats.worst_overrun.as_millis_f64()
        )?;
        writeln!(out, "  frame  prepare     draw     swap complete")?;
        for record in self.frames.iter() {
            let offset =
                |t: HostTime| t.saturating_duration_since(record.vsync).as_millis_f64();
            writeln!(
                out,
                "  #{:<5} {:>7.2} {:>8.2} {:>8.2} {:>8.2} {}",
                record.frame_number,
                offset(record.prepare_start),
                offset(record.draw_start),
                offset(record.swap_start),
                offset(record.completed),
                if record.presented { "" } else { "(skipped)" },
            )?;
        }
        Ok(())
    }

    /// Clears timing history without touching in-flight frame state.
    pub fn reset_frame_stats(&mut self) {
        self.frames.clear();
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .field("stopped", &self.stopped)
            .field("is_dirty", &self.is_dirty)
            .field("frame_number", &self.frame_number)
            .field("nodes", &self.scene.len())
            .finish_non_exhaustive()
    }
}
