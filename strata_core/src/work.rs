// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred frame work and GPU completion fences.
//!
//! Callers can queue units of work that must run, in FIFO order, strictly
//! before the next frame is reported complete. Separately, GPU-side
//! completion [`Fence`]s guard resources the GPU may still be consuming;
//! waiting on them is intentional back-pressure on the render thread.
//!
//! Everything here is render-thread-only by contract; tasks never run
//! concurrently with drawing.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;

use core::cell::Cell;
use core::fmt;

/// A GPU-side synchronization primitive signaling completion of submitted
/// work.
pub trait Fence {
    /// Blocks the calling (render) thread until the fence signals.
    ///
    /// Bounded by driver-level fence semantics; there is no internal
    /// timeout.
    fn wait(&self);
}

/// Completion handle for a queued unit of frame work.
///
/// Becomes complete once the task has run; tasks cancelled during teardown
/// never complete.
#[derive(Clone, Debug)]
pub struct WorkHandle {
    done: Rc<Cell<bool>>,
}

impl WorkHandle {
    /// Whether the task has run.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.done.get()
    }
}

struct FrameTask {
    work: Box<dyn FnOnce()>,
    done: Rc<Cell<bool>>,
}

/// FIFO queue of deferred frame work plus outstanding GPU fences.
#[derive(Default)]
pub struct FrameWorkQueue {
    tasks: Vec<FrameTask>,
    fences: Vec<Box<dyn Fence>>,
}

impl FrameWorkQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a unit of work to run before the next frame completes.
    pub fn enqueue(&mut self, work: impl FnOnce() + 'static) -> WorkHandle {
        let done = Rc::new(Cell::new(false));
        self.tasks.push(FrameTask {
            work: Box::new(work),
            done: done.clone(),
        });
        WorkHandle { done }
    }

    /// Runs all queued tasks in enqueue order, marking each complete.
    pub fn run_pending(&mut self) {
        for task in self.tasks.drain(..) {
            (task.work)();
            task.done.set(true);
        }
    }

    /// Drops all queued tasks without running them. Their handles never
    /// complete.
    pub fn cancel_pending(&mut self) {
        self.tasks.clear();
    }

    /// Number of tasks waiting to run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Registers a fence guarding previously submitted GPU work.
    pub fn add_fence(&mut self, fence: Box<dyn Fence>) {
        self.fences.push(fence);
    }

    /// Blocks until every outstanding fence has signaled.
    ///
    /// Returns immediately when no fences are outstanding.
    pub fn wait_on_fences(&mut self) {
        for fence in self.fences.drain(..) {
            fence.wait();
        }
    }
}

impl fmt::Debug for FrameWorkQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameWorkQueue")
            .field("tasks", &self.tasks.len())
            .field("fences", &self.fences.len())
            .finish()
    }
}
