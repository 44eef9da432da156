// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-metrics observer fan-out.
//!
//! The reporter is created lazily on the first observer registration and
//! torn down when the observer set becomes empty, so an unobserved context
//! pays nothing. Observers receive one event per *presented* frame; skipped
//! and dropped attempts are never reported.

use alloc::rc::Rc;
use alloc::vec::Vec;

use core::cell::RefCell;
use core::fmt;

use crate::record::FrameRecord;

/// Receives frame-metric events after each presented frame.
pub trait FrameMetricsObserver {
    /// Called once per presented frame with the frame's timing record.
    fn on_frame_metrics(&mut self, frame: &FrameRecord);
}

/// Identifies a registered observer for removal.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl fmt::Debug for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObserverId({})", self.0)
    }
}

/// Fans presented-frame records out to registered observers.
#[derive(Default)]
pub struct FrameMetricsReporter {
    observers: Vec<(ObserverId, Rc<RefCell<dyn FrameMetricsObserver>>)>,
    next_id: u64,
}

impl FrameMetricsReporter {
    /// Creates a reporter with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer and returns its removal id.
    pub fn add_observer(&mut self, observer: Rc<RefCell<dyn FrameMetricsObserver>>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Deregisters an observer. Returns whether it was registered.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Whether any observers remain registered.
    #[must_use]
    pub fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    /// Delivers `frame` to every registered observer.
    pub fn report(&mut self, frame: &FrameRecord) {
        for (_, observer) in &self.observers {
            observer.borrow_mut().on_frame_metrics(frame);
        }
    }
}

impl fmt::Debug for FrameMetricsReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameMetricsReporter")
            .field("observers", &self.observers.len())
            .finish()
    }
}
