// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable frame-timing reports.
//!
//! One line per frame attempt, stage offsets in milliseconds from vsync,
//! with late frames flagged and an aggregate jank summary at the end.
//! Intended for bug reports and interactive inspection, not machine
//! parsing.

use std::io::{self, Write};

use strata_core::record::{FrameRecord, JankStats};
use strata_core::time::{Duration, HostTime};

/// Writes a timing table for `records` followed by a jank summary.
///
/// `refresh_interval` is the presentation deadline used to flag late frames;
/// pass the context's configured interval.
pub fn write_report<'a>(
    records: impl Iterator<Item = &'a FrameRecord> + Clone,
    refresh_interval: Duration,
    writer: &mut dyn Write,
) -> io::Result<()> {
    writeln!(
        writer,
        "{:>7} {:>9} {:>9} {:>9} {:>9}",
        "frame", "prepare", "draw", "swap", "total"
    )?;
    for record in records.clone() {
        let from_vsync = |t: HostTime| ms(t.saturating_duration_since(record.vsync));
        if !record.presented {
            writeln!(writer, "{:>7} {:>41}", format!("#{}", record.frame_number), "skipped")?;
            continue;
        }
        write!(
            writer,
            "{:>7} {:>9.2} {:>9.2} {:>9.2} {:>9.2}",
            format!("#{}", record.frame_number),
            from_vsync(record.prepare_start),
            from_vsync(record.draw_start),
            from_vsync(record.swap_start),
            ms(record.total_duration()),
        )?;
        if record.is_janky(refresh_interval) {
            let overrun = record.total_duration().saturating_sub(refresh_interval);
            write!(writer, "  LATE +{:.2}ms", ms(overrun))?;
        }
        writeln!(writer)?;
    }

    let stats = JankStats::over(records, refresh_interval);
    writeln!(
        writer,
        "{} attempts, {} presented, {} janky, worst overrun {:.2}ms",
        stats.total,
        stats.presented,
        stats.janky,
        ms(stats.worst_overrun),
    )?;
    Ok(())
}

fn ms(d: Duration) -> f64 {
    d.as_millis_f64()
}
