// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage accumulation and dirty-rect computation.
//!
//! Damage is the minimal region known to need repainting. Nodes push
//! rectangles into the [`DamageAccumulator`] during tree preparation; the
//! orchestrator consumes the accumulated rectangle at draw time and widens
//! it with [`widen_for_buffer_age`] to account for swap-chain buffer reuse.
//!
//! Accumulated damage persists across suppressed (stopped) and dropped
//! frames: it is only taken by a draw that actually reaches presentation
//! checks, and re-accumulated if the presentation then fails.

use kurbo::Rect;

use crate::record::{SWAP_HISTORY_LEN, SwapRecord};
use crate::ring::RingBuffer;

/// Returns `rect` if it has positive area.
fn non_empty(rect: Rect) -> Option<Rect> {
    (rect.width() > 0.0 && rect.height() > 0.0).then_some(rect)
}

/// Accumulates dirty regions across a scene traversal.
///
/// The pending region is the union of every accumulated rectangle since the
/// last [`take`](Self::take).
#[derive(Clone, Debug, Default)]
pub struct DamageAccumulator {
    pending: Option<Rect>,
}

impl DamageAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unions `rect` into the pending damage. Degenerate rectangles are
    /// ignored.
    pub fn accumulate(&mut self, rect: Rect) {
        let Some(rect) = non_empty(rect) else {
            return;
        };
        self.pending = Some(match self.pending {
            Some(pending) => pending.union(rect),
            None => rect,
        });
    }

    /// The pending damage, if any.
    #[must_use]
    pub fn peek(&self) -> Option<Rect> {
        self.pending
    }

    /// Whether any damage is pending.
    #[must_use]
    pub fn has_damage(&self) -> bool {
        self.pending.is_some()
    }

    /// Consumes and returns the pending damage.
    pub fn take(&mut self) -> Option<Rect> {
        self.pending.take()
    }
}

/// Widens `pending` damage to what must actually be repainted this frame,
/// given swap-chain buffer reuse.
///
/// Backends hand out buffers round-robin, so the buffer being rendered into
/// holds content that is `buffer_age` swaps old; everything damaged since
/// then must be repainted on top of this frame's own damage:
///
/// - `Some(0)` — freshly allocated buffer with undefined contents: the full
///   surface is dirty.
/// - `Some(1)` — the buffer holds the previous frame: this frame's damage
///   suffices.
/// - `Some(n)` — union the damage of the last `n - 1` swaps; if history is
///   shorter than that, fall back to the full surface.
/// - `None` — the backend cannot report an age. Conservative default:
///   union the damage of the last [`SWAP_HISTORY_LEN`] swaps.
///
/// The result is always clamped to `bounds`.
#[must_use]
pub fn widen_for_buffer_age(
    pending: Rect,
    buffer_age: Option<u32>,
    history: &RingBuffer<SwapRecord, SWAP_HISTORY_LEN>,
    bounds: Rect,
) -> Rect {
    let widened = match buffer_age {
        Some(0) => bounds,
        Some(1) => pending,
        Some(age) => {
            let needed = (age - 1) as usize;
            if needed > history.len() {
                bounds
            } else {
                union_recent(pending, history, needed)
            }
        }
        None => union_recent(pending, history, SWAP_HISTORY_LEN),
    };
    clamp_to_bounds(widened, bounds)
}

/// Unions `pending` with the damage of the most recent `count` swaps (or as
/// many as exist).
fn union_recent(
    pending: Rect,
    history: &RingBuffer<SwapRecord, SWAP_HISTORY_LEN>,
    count: usize,
) -> Rect {
    history
        .iter()
        .rev()
        .take(count)
        .fold(pending, |acc, record| match non_empty(record.damage) {
            Some(damage) => match non_empty(acc) {
                Some(acc) => acc.union(damage),
                None => damage,
            },
            None => acc,
        })
}

fn clamp_to_bounds(rect: Rect, bounds: Rect) -> Rect {
    let clamped = rect.intersect(bounds);
    non_empty(clamped).unwrap_or(Rect::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{Duration, HostTime};

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    fn swap(damage: Rect) -> SwapRecord {
        SwapRecord {
            damage,
            vsync: HostTime(0),
            swap_completed: HostTime(0),
            dequeue_duration: Duration::ZERO,
            queue_duration: Duration::ZERO,
        }
    }

    fn history(damages: &[Rect]) -> RingBuffer<SwapRecord, SWAP_HISTORY_LEN> {
        let mut ring = RingBuffer::new();
        for &d in damages {
            ring.push(swap(d));
        }
        ring
    }

    #[test]
    fn accumulate_unions_rects() {
        let mut damage = DamageAccumulator::new();
        assert!(!damage.has_damage());

        damage.accumulate(Rect::new(0.0, 0.0, 10.0, 10.0));
        damage.accumulate(Rect::new(20.0, 20.0, 40.0, 40.0));
        assert_eq!(damage.peek(), Some(Rect::new(0.0, 0.0, 40.0, 40.0)));

        assert_eq!(damage.take(), Some(Rect::new(0.0, 0.0, 40.0, 40.0)));
        assert!(!damage.has_damage());
    }

    #[test]
    fn degenerate_rects_are_ignored() {
        let mut damage = DamageAccumulator::new();
        damage.accumulate(Rect::new(5.0, 5.0, 5.0, 50.0));
        damage.accumulate(Rect::ZERO);
        assert!(!damage.has_damage());
    }

    #[test]
    fn age_zero_dirties_full_bounds() {
        let pending = Rect::new(0.0, 0.0, 10.0, 10.0);
        let dirty = widen_for_buffer_age(pending, Some(0), &history(&[]), BOUNDS);
        assert_eq!(dirty, BOUNDS);
    }

    #[test]
    fn age_one_uses_pending_only() {
        let pending = Rect::new(0.0, 0.0, 10.0, 10.0);
        let old = Rect::new(100.0, 100.0, 200.0, 200.0);
        let dirty = widen_for_buffer_age(pending, Some(1), &history(&[old]), BOUNDS);
        assert_eq!(dirty, pending);
    }

    #[test]
    fn age_two_unions_previous_swap() {
        let pending = Rect::new(0.0, 0.0, 10.0, 10.0);
        let prev = Rect::new(100.0, 100.0, 200.0, 200.0);
        let older = Rect::new(700.0, 500.0, 800.0, 600.0);
        let dirty = widen_for_buffer_age(pending, Some(2), &history(&[older, prev]), BOUNDS);
        // Only the most recent swap is unioned; the older one is not.
        assert_eq!(dirty, Rect::new(0.0, 0.0, 200.0, 200.0));
    }

    #[test]
    fn age_beyond_history_falls_back_to_full_bounds() {
        let pending = Rect::new(0.0, 0.0, 10.0, 10.0);
        let dirty = widen_for_buffer_age(
            pending,
            Some(3),
            &history(&[Rect::new(50.0, 50.0, 60.0, 60.0)]),
            BOUNDS,
        );
        assert_eq!(dirty, BOUNDS);
    }

    #[test]
    fn unknown_age_unions_last_three_swaps() {
        let pending = Rect::new(0.0, 0.0, 10.0, 10.0);
        let damages = [
            Rect::new(20.0, 20.0, 30.0, 30.0),
            Rect::new(40.0, 40.0, 50.0, 50.0),
            Rect::new(60.0, 60.0, 70.0, 70.0),
        ];
        let dirty = widen_for_buffer_age(pending, None, &history(&damages), BOUNDS);
        assert_eq!(dirty, Rect::new(0.0, 0.0, 70.0, 70.0));
    }

    #[test]
    fn unknown_age_with_short_history_uses_what_exists() {
        let pending = Rect::new(0.0, 0.0, 10.0, 10.0);
        let dirty = widen_for_buffer_age(
            pending,
            None,
            &history(&[Rect::new(30.0, 30.0, 40.0, 40.0)]),
            BOUNDS,
        );
        assert_eq!(dirty, Rect::new(0.0, 0.0, 40.0, 40.0));
    }

    #[test]
    fn result_is_clamped_to_surface_bounds() {
        let pending = Rect::new(-50.0, -50.0, 900.0, 700.0);
        let dirty = widen_for_buffer_age(pending, Some(1), &history(&[]), BOUNDS);
        assert_eq!(dirty, BOUNDS);
    }
}
