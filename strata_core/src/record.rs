// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-swap and per-frame timing records.
//!
//! Two fixed rings of these records form the context's timing telemetry:
//!
//! - [`SwapRecord`] — one entry per completed presentation, ring of
//!   [`SWAP_HISTORY_LEN`]. Consumed by the buffer-age damage widening in
//!   [`damage`](crate::damage) and by diagnostics.
//! - [`FrameRecord`] — one entry per frame attempt (presented or not), ring
//!   of [`FRAME_HISTORY_LEN`] (~2 seconds at 60 Hz). Consumed by jank
//!   classification, `dump_frames`, and the metrics reporter.

use kurbo::Rect;

use crate::time::{Duration, HostTime};

/// Number of retained [`SwapRecord`]s.
///
/// Matches the deepest swap-chain buffering the damage widening policy has
/// to account for (triple buffering).
pub const SWAP_HISTORY_LEN: usize = 3;

/// Number of retained [`FrameRecord`]s: two seconds of frames at a 60 Hz
/// reference rate.
pub const FRAME_HISTORY_LEN: usize = 120;

/// Timing record for one completed presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwapRecord {
    /// The rectangle handed to the swap, clamped to the surface bounds.
    pub damage: Rect,
    /// Vsync timestamp that drove the frame.
    pub vsync: HostTime,
    /// When the swap was reported complete.
    pub swap_completed: HostTime,
    /// Time spent dequeuing a buffer from the presentation queue.
    pub dequeue_duration: Duration,
    /// Time spent queuing the finished buffer back for composition.
    pub queue_duration: Duration,
}

impl Default for SwapRecord {
    fn default() -> Self {
        Self {
            damage: Rect::ZERO,
            vsync: HostTime::default(),
            swap_completed: HostTime::default(),
            dequeue_duration: Duration::ZERO,
            queue_duration: Duration::ZERO,
        }
    }
}

/// Timing record for one frame attempt.
///
/// Stage timestamps are filled in as the orchestrator advances; an attempt
/// that never reaches a stage leaves that stage's timestamp at its previous
/// value (zero for skipped stages).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameRecord {
    /// Sequence number the frame was (or would have been) presented as.
    pub frame_number: i64,
    /// Vsync timestamp that triggered the attempt.
    pub vsync: HostTime,
    /// When scene traversal began.
    pub prepare_start: HostTime,
    /// When draw-call issuance began.
    pub draw_start: HostTime,
    /// When buffer swap began.
    pub swap_start: HostTime,
    /// When the frame finished (including deferred frame work).
    pub completed: HostTime,
    /// Whether the attempt ended in a presentation.
    pub presented: bool,
}

impl FrameRecord {
    /// Wall time from vsync to completion.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.completed.saturating_duration_since(self.vsync)
    }

    /// Whether this frame missed its presentation deadline.
    ///
    /// Only presented frames are classified; skipped and dropped attempts
    /// are never counted as jank.
    #[must_use]
    pub fn is_janky(&self, refresh_interval: Duration) -> bool {
        self.presented && self.total_duration() > refresh_interval
    }
}

/// Aggregate jank statistics over a window of frame records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JankStats {
    /// Total frame attempts observed.
    pub total: u32,
    /// Attempts that ended in a presentation.
    pub presented: u32,
    /// Presented frames that missed the refresh deadline.
    pub janky: u32,
    /// Largest overrun past the refresh interval among janky frames.
    pub worst_overrun: Duration,
}

impl JankStats {
    /// Classifies every record in `records` against `refresh_interval`.
    #[must_use]
    pub fn over<'a>(
        records: impl Iterator<Item = &'a FrameRecord>,
        refresh_interval: Duration,
    ) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.total += 1;
            if record.presented {
                stats.presented += 1;
            }
            if record.is_janky(refresh_interval) {
                stats.janky += 1;
                let overrun = record.total_duration().saturating_sub(refresh_interval);
                if overrun > stats.worst_overrun {
                    stats.worst_overrun = overrun;
                }
            }
        }
        stats
    }
}
