// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end frame-loop tests driving a [`RenderContext`] against the
//! harness doubles: a hand-advanced clock, an in-memory surface, and a
//! pipeline that records its calls.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use kurbo::Rect;

use strata_core::context::{ContextConfig, DrawError, RenderContext};
use strata_core::node::RenderNode;
use strata_core::pipeline::ImageHandle;
use strata_core::record::JankStats;
use strata_core::registry::TrimLevel;
use strata_core::surface::SwapBehavior;
use strata_core::time::{Duration, HostTime};
use strata_harness::{
    CountingAnimations, CountingObserver, ManualClock, ManualScheduler, RecordingPipeline,
    TestFence, TestNode, TestSurface,
};

const VSYNC_INTERVAL: Duration = Duration(16_666_667);

struct Fixture {
    ctx: RenderContext,
    pipeline: RecordingPipeline,
    scheduler: ManualScheduler,
    animations: CountingAnimations,
    clock: ManualClock,
    surface: Arc<TestSurface>,
}

impl Fixture {
    /// A context with a bound surface of the given size.
    fn new(width: u32, height: u32) -> Self {
        let pipeline = RecordingPipeline::new();
        let scheduler = ManualScheduler::new();
        let animations = CountingAnimations::new();
        let clock = ManualClock::new();
        let mut ctx = RenderContext::new(
            ContextConfig {
                name: "frame-loop-test".into(),
                ..ContextConfig::default()
            },
            Box::new(pipeline.clone()),
            Box::new(animations.clone()),
            Box::new(scheduler.clone()),
            Box::new(clock.clone()),
        );
        let surface = TestSurface::new(width, height);
        ctx.bind_surface(Some(surface.as_dyn()));
        Self {
            ctx,
            pipeline,
            scheduler,
            animations,
            clock,
            surface,
        }
    }

    /// Runs one frame at the next vsync tick.
    fn tick(&mut self) -> HostTime {
        self.clock.advance(VSYNC_INTERVAL);
        let vsync = self.clock.now();
        self.ctx.do_frame(vsync);
        vsync
    }
}

#[test_log::test]
fn first_frame_presents_exactly_the_node_damage() {
    let mut fx = Fixture::new(800, 600);
    let node = TestNode::new(1);
    node.set_damage(Rect::new(0.0, 0.0, 100.0, 100.0));
    fx.ctx.add_render_node(node.as_dyn(), false);

    fx.tick();

    assert_eq!(fx.surface.presents(), vec![Rect::new(0.0, 0.0, 100.0, 100.0)]);
    assert_eq!(fx.ctx.frame_number(), 0);

    let swaps: Vec<_> = fx.ctx.swap_history().iter().collect();
    assert_eq!(swaps.len(), 1);
    assert_eq!(swaps[0].damage, Rect::new(0.0, 0.0, 100.0, 100.0));

    let record = fx.ctx.frame_records().back().unwrap();
    assert_eq!(record.frame_number, 0);
    assert!(record.presented);
}

#[test_log::test]
fn unchanged_scene_skips_frames() {
    let mut fx = Fixture::new(320, 240);
    let node = TestNode::new(1);
    node.set_damage(Rect::new(0.0, 0.0, 10.0, 10.0));
    fx.ctx.add_render_node(node.as_dyn(), false);

    fx.tick();
    fx.tick();
    fx.tick();

    assert_eq!(fx.surface.present_count(), 1);
    assert_eq!(fx.pipeline.draw_count(), 1);
    assert_eq!(node.prepare_count(), 3, "traversal still runs every vsync");
    assert_eq!(fx.animations.start_count(), 3);

    let records: Vec<_> = fx.ctx.frame_records().iter().collect();
    assert_eq!(records.len(), 3);
    assert!(records[0].presented);
    assert!(!records[1].presented);
    assert!(!records[2].presented);
}

#[test_log::test]
fn presented_frame_numbers_increase_from_zero() {
    let mut fx = Fixture::new(100, 100);
    assert_eq!(fx.ctx.frame_number(), -1);

    for _ in 0..3 {
        fx.ctx.invalidate(Rect::new(0.0, 0.0, 50.0, 50.0));
        fx.tick();
    }

    assert_eq!(fx.ctx.frame_number(), 2);
    let presented: Vec<i64> = fx
        .ctx
        .frame_records()
        .iter()
        .filter(|r| r.presented)
        .map(|r| r.frame_number)
        .collect();
    assert_eq!(presented, vec![0, 1, 2]);
}

#[test_log::test]
fn swap_history_keeps_the_last_three_presentations() {
    let mut fx = Fixture::new(400, 400);
    for i in 0..4 {
        let x = f64::from(i) * 10.0;
        fx.ctx.invalidate(Rect::new(x, 0.0, x + 10.0, 10.0));
        fx.tick();
    }

    let swaps: Vec<_> = fx.ctx.swap_history().iter().collect();
    assert_eq!(swaps.len(), 3);
    // The first presentation was evicted; the ring starts at the second.
    assert_eq!(swaps[0].damage, Rect::new(10.0, 0.0, 20.0, 10.0));
    assert_eq!(swaps[2].damage, Rect::new(30.0, 0.0, 40.0, 10.0));
}

#[test_log::test]
fn frame_records_cap_at_one_hundred_twenty() {
    let mut fx = Fixture::new(64, 64);
    for _ in 0..125 {
        fx.tick();
    }
    assert_eq!(fx.ctx.frame_records().len(), 120);
}

#[test_log::test]
fn stopped_context_accumulates_damage_for_the_resume_frame() {
    let mut fx = Fixture::new(640, 480);

    fx.ctx.set_stopped(true);
    assert_eq!(fx.scheduler.cancel_count(), 1);
    assert_eq!(fx.pipeline.stop_count(), 1);

    fx.ctx.invalidate(Rect::new(10.0, 10.0, 50.0, 50.0));
    fx.tick();
    fx.tick();
    assert_eq!(fx.surface.present_count(), 0);
    assert!(fx.ctx.is_dirty());

    let requests_before = fx.scheduler.request_count();
    fx.ctx.set_stopped(false);
    assert_eq!(fx.scheduler.request_count(), requests_before + 1);

    fx.tick();
    assert_eq!(fx.surface.presents(), vec![Rect::new(10.0, 10.0, 50.0, 50.0)]);
}

#[test_log::test]
fn saturated_queue_drops_the_frame_and_keeps_damage() {
    let mut fx = Fixture::new(256, 256);
    fx.surface.set_free_buffer(false);
    fx.ctx.invalidate(Rect::new(0.0, 0.0, 20.0, 20.0));

    fx.clock.advance(VSYNC_INTERVAL);
    let vsync = fx.clock.now();
    assert!(fx.ctx.prepare_tree(vsync));
    assert_eq!(fx.ctx.draw(), Err(DrawError::QueueSaturated));

    assert_eq!(fx.surface.present_count(), 0);
    assert!(fx.ctx.swap_history().is_empty());
    assert_eq!(fx.ctx.last_drop_vsync(), Some(vsync));
    assert!(fx.ctx.is_dirty(), "damage survives the dropped frame");

    fx.surface.set_free_buffer(true);
    fx.tick();
    assert_eq!(fx.surface.presents(), vec![Rect::new(0.0, 0.0, 20.0, 20.0)]);
}

#[test_log::test]
fn lost_surface_fails_the_frame_and_keeps_damage() {
    let mut fx = Fixture::new(256, 256);
    fx.ctx.invalidate(Rect::new(5.0, 5.0, 25.0, 25.0));
    fx.surface.set_valid(false);

    fx.clock.advance(VSYNC_INTERVAL);
    assert!(fx.ctx.prepare_tree(fx.clock.now()));
    assert_eq!(fx.ctx.draw(), Err(DrawError::SurfaceLost));
    assert!(fx.ctx.is_dirty());

    fx.surface.set_valid(true);
    fx.tick();
    assert_eq!(fx.surface.presents(), vec![Rect::new(5.0, 5.0, 25.0, 25.0)]);
}

#[test_log::test]
fn pipeline_draw_failure_keeps_damage_for_retry() {
    let mut fx = Fixture::new(256, 256);
    fx.ctx.invalidate(Rect::new(0.0, 0.0, 100.0, 100.0));
    fx.pipeline.set_draw_ok(false);

    fx.clock.advance(VSYNC_INTERVAL);
    assert!(fx.ctx.prepare_tree(fx.clock.now()));
    assert_eq!(fx.ctx.draw(), Err(DrawError::PipelineFailed));
    assert_eq!(fx.surface.present_count(), 0);
    assert!(fx.ctx.swap_history().is_empty());
    assert!(fx.ctx.is_dirty());

    // Once the backend recovers, the retry repaints the failed region.
    fx.pipeline.set_draw_ok(true);
    fx.tick();
    assert_eq!(
        fx.surface.presents(),
        vec![Rect::new(0.0, 0.0, 100.0, 100.0)]
    );
}

#[test_log::test]
fn failed_present_reaccumulates_the_widened_region() {
    let mut fx = Fixture::new(256, 256);
    fx.ctx.invalidate(Rect::new(0.0, 0.0, 30.0, 30.0));
    fx.surface.set_present_fails(true);

    fx.clock.advance(VSYNC_INTERVAL);
    assert!(fx.ctx.prepare_tree(fx.clock.now()));
    assert_eq!(fx.ctx.draw(), Err(DrawError::SurfaceLost));
    assert_eq!(fx.ctx.frame_number(), -1, "a failed present is not counted");

    fx.surface.set_present_fails(false);
    fx.tick();
    assert_eq!(fx.surface.presents(), vec![Rect::new(0.0, 0.0, 30.0, 30.0)]);
}

#[test_log::test]
fn buffer_age_zero_forces_a_full_repaint() {
    let mut fx = Fixture::new(800, 600);
    fx.surface.set_buffer_age(Some(0));
    fx.ctx.invalidate(Rect::new(0.0, 0.0, 10.0, 10.0));

    fx.tick();
    assert_eq!(fx.surface.presents(), vec![Rect::new(0.0, 0.0, 800.0, 600.0)]);
}

#[test_log::test]
fn discard_swap_behavior_forces_a_full_repaint() {
    let mut fx = Fixture::new(800, 600);
    fx.ctx.set_swap_behavior(SwapBehavior::Discard);
    // Behavior takes effect at the next (re)bind.
    let surface = fx.surface.clone();
    fx.ctx.bind_surface(Some(surface.as_dyn()));

    fx.ctx.invalidate(Rect::new(0.0, 0.0, 10.0, 10.0));
    fx.tick();
    assert_eq!(fx.surface.presents(), vec![Rect::new(0.0, 0.0, 800.0, 600.0)]);
}

#[test_log::test]
fn place_front_puts_the_node_ahead_of_the_scene() {
    let mut fx = Fixture::new(64, 64);
    let back = TestNode::new(1);
    let front = TestNode::new(2);
    fx.ctx.add_render_node(back.as_dyn(), false);
    fx.ctx.add_render_node(front.as_dyn(), true);

    let ids: Vec<u64> = fx.ctx.render_nodes().iter().map(|n| n.id().0).collect();
    assert_eq!(ids, vec![2, 1]);

    // Re-adding moves rather than duplicates.
    fx.ctx.add_render_node(back.as_dyn(), true);
    let ids: Vec<u64> = fx.ctx.render_nodes().iter().map(|n| n.id().0).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test_log::test]
fn layer_only_frames_update_layers_without_presenting() {
    let mut fx = Fixture::new(128, 128);
    let node = TestNode::new(9);

    fx.ctx.queue_layer_update(node.as_dyn());
    assert!(fx.scheduler.request_count() > 0);

    fx.tick();
    assert_eq!(fx.pipeline.layer_updates(), vec![node.id()]);
    assert_eq!(fx.surface.present_count(), 0);

    fx.tick();
    assert_eq!(
        fx.pipeline.layer_updates().len(),
        1,
        "each queued node gets exactly one update pass"
    );
}

#[test_log::test]
fn observer_sees_presented_frames_until_removed() {
    let mut fx = Fixture::new(100, 100);
    let observer = Rc::new(RefCell::new(CountingObserver::new()));
    let id = fx.ctx.add_frame_metrics_observer(observer.clone());
    assert!(fx.ctx.has_metrics_reporter());

    fx.ctx.invalidate(Rect::new(0.0, 0.0, 10.0, 10.0));
    fx.tick();
    fx.ctx.invalidate(Rect::new(0.0, 0.0, 10.0, 10.0));
    fx.tick();
    // A skipped frame is not reported.
    fx.tick();

    assert!(fx.ctx.remove_frame_metrics_observer(id));
    assert!(!fx.ctx.has_metrics_reporter());

    fx.ctx.invalidate(Rect::new(0.0, 0.0, 10.0, 10.0));
    fx.tick();

    assert_eq!(observer.borrow().count(), 2);
    assert_eq!(observer.borrow().seen(), &[0, 1]);
}

#[test_log::test]
fn deferred_work_runs_in_order_before_frame_completion() {
    let mut fx = Fixture::new(100, 100);
    let order = Rc::new(RefCell::new(Vec::new()));
    let handles: Vec<_> = (1..=3)
        .map(|i| {
            let order = order.clone();
            fx.ctx.enqueue_frame_work(move || order.borrow_mut().push(i))
        })
        .collect();

    // A skipped frame completes nothing.
    fx.tick();
    assert!(handles.iter().all(|h| !h.is_complete()));

    fx.ctx.invalidate(Rect::new(0.0, 0.0, 10.0, 10.0));
    fx.tick();
    assert_eq!(*order.borrow(), vec![1, 2, 3]);
    assert!(handles.iter().all(|h| h.is_complete()));
}

#[test_log::test]
fn prepared_images_are_pinned_for_the_draw() {
    let mut fx = Fixture::new(100, 100);
    let node = TestNode::new(3);
    node.set_damage(Rect::new(0.0, 0.0, 10.0, 10.0));
    node.set_images(vec![ImageHandle(7), ImageHandle(8)]);
    fx.ctx.add_render_node(node.as_dyn(), false);

    fx.tick();
    assert_eq!(
        fx.pipeline.pinned().last().unwrap(),
        &vec![ImageHandle(7), ImageHandle(8)]
    );
    assert_eq!(fx.pipeline.unpin_count(), 1);
}

#[test_log::test]
fn trim_memory_releases_prefetched_layers() {
    let mut fx = Fixture::new(100, 100);
    let speculative = TestNode::new(1);
    let claimed = TestNode::new(2);
    fx.ctx.build_layer(speculative.as_dyn());
    fx.ctx.build_layer(claimed.as_dyn());
    fx.ctx.mark_layer_in_use(claimed.id());

    fx.ctx.trim_memory(TrimLevel::UiHidden);
    assert_eq!(speculative.detach_count(), 1);
    assert_eq!(claimed.detach_count(), 0, "claimed layers are exempt");
    assert_eq!(fx.pipeline.release_count(), 0);

    fx.ctx.trim_memory(TrimLevel::Complete);
    assert_eq!(fx.pipeline.release_count(), 1);
}

#[test_log::test]
fn pause_surface_discards_unflushed_work() {
    let mut fx = Fixture::new(100, 100);
    fx.surface.set_unflushed(true);
    let surface = fx.surface.clone();

    assert!(fx.ctx.pause_surface(&surface.as_dyn()));
    assert!(!fx.ctx.has_surface());
    assert!(fx.scheduler.cancel_count() > 0);

    // Rebinding resumes where we left off.
    fx.ctx.bind_surface(Some(surface.as_dyn()));
    fx.ctx.invalidate(Rect::new(0.0, 0.0, 10.0, 10.0));
    fx.tick();
    assert_eq!(fx.surface.present_count(), 1);
}

#[test_log::test]
fn destroy_tears_everything_down_without_panicking() {
    let mut fx = Fixture::new(100, 100);
    let node = TestNode::new(4);
    fx.ctx.add_render_node(node.as_dyn(), false);
    fx.ctx.build_layer(node.as_dyn());

    let fence = TestFence::new();
    fx.ctx.add_frame_fence(Box::new(fence.clone()));
    let handle = fx.ctx.enqueue_frame_work(|| {});

    fx.ctx.destroy();

    assert!(!fx.ctx.has_surface());
    assert!(fx.ctx.is_stopped());
    assert!(node.detach_count() >= 1);
    assert_eq!(fence.wait_count(), 1);
    assert!(!handle.is_complete(), "cancelled work never completes");
    assert!(fx.pipeline.release_count() >= 1);

    // Destroy is idempotent.
    fx.ctx.destroy();
}

#[test_log::test]
fn overrunning_frames_are_classified_as_janky() {
    let mut fx = Fixture::new(100, 100);

    fx.ctx.invalidate(Rect::new(0.0, 0.0, 10.0, 10.0));
    fx.clock.advance(VSYNC_INTERVAL);
    let vsync = fx.clock.now();
    assert!(fx.ctx.prepare_tree(vsync));
    // Draw lands two intervals after vsync.
    fx.clock.advance(Duration(2 * VSYNC_INTERVAL.nanos()));
    fx.ctx.draw().unwrap();

    // A second, on-time frame.
    fx.ctx.invalidate(Rect::new(0.0, 0.0, 10.0, 10.0));
    fx.tick();

    let stats = JankStats::over(fx.ctx.frame_records().iter(), fx.ctx.refresh_interval());
    assert_eq!(stats.presented, 2);
    assert_eq!(stats.janky, 1);
    assert!(stats.worst_overrun > Duration::ZERO);
}

#[test_log::test]
fn dump_frames_reports_dimensions_and_attempts() {
    let mut fx = Fixture::new(800, 600);
    fx.ctx.invalidate(Rect::new(0.0, 0.0, 10.0, 10.0));
    fx.tick();
    fx.tick();

    let mut out = String::new();
    fx.ctx.dump_frames(&mut out).unwrap();
    assert!(out.contains("frame-loop-test"), "got: {out}");
    assert!(out.contains("800x600"), "got: {out}");
    assert!(out.contains("2 attempts, 1 presented"), "got: {out}");

    fx.ctx.reset_frame_stats();
    assert!(fx.ctx.frame_records().is_empty());
    assert_eq!(fx.ctx.frame_number(), 0, "stats reset keeps the frame count");
}
