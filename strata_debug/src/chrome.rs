// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] turns a window of [`FrameRecord`]s into [Chrome Trace Event
//! Format][spec] JSON, suitable for loading into `chrome://tracing` or
//! [Perfetto](https://ui.perfetto.dev/).
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use strata_core::record::FrameRecord;
use strata_core::time::HostTime;

/// Exports frame records as a JSON array of trace events.
///
/// Each presented frame contributes one complete ("X") event per stage,
/// `prepare` / `draw` / `swap`, plus an instant event at its vsync. Skipped
/// attempts contribute only the instant event, so gaps in the timeline stay
/// visible.
pub fn export<'a>(
    records: impl Iterator<Item = &'a FrameRecord>,
    writer: &mut dyn Write,
) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for record in records {
        events.push(json!({
            "ph": "i",
            "name": "Vsync",
            "cat": "Frame",
            "ts": to_us(record.vsync),
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": {
                "frame_number": record.frame_number,
                "presented": record.presented,
            }
        }));
        if !record.presented {
            continue;
        }
        let stages = [
            ("prepare", record.prepare_start, record.draw_start),
            ("draw", record.draw_start, record.swap_start),
            ("swap", record.swap_start, record.completed),
        ];
        for (name, begin, end) in stages {
            events.push(json!({
                "ph": "X",
                "name": name,
                "cat": "Frame",
                "ts": to_us(begin),
                "dur": to_us(end) - to_us(begin),
                "pid": 0,
                "tid": 0,
                "args": {
                    "frame_number": record.frame_number,
                }
            }));
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn to_us(t: HostTime) -> f64 {
    t.0 as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presented(frame_number: i64, vsync: u64) -> FrameRecord {
        FrameRecord {
            frame_number,
            vsync: HostTime(vsync),
            prepare_start: HostTime(vsync + 100_000),
            draw_start: HostTime(vsync + 2_000_000),
            swap_start: HostTime(vsync + 8_000_000),
            completed: HostTime(vsync + 9_000_000),
            presented: true,
        }
    }

    #[test]
    fn export_produces_valid_json() {
        let records = [
            presented(0, 1_000_000),
            FrameRecord {
                frame_number: 1,
                vsync: HostTime(17_666_667),
                presented: false,
                ..FrameRecord::default()
            },
        ];

        let mut out = Vec::new();
        export(records.iter(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();

        // Vsync + three stages for the presented frame, vsync only for the
        // skipped one.
        assert_eq!(parsed.len(), 5);
        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[0]["name"], "Vsync");
        assert_eq!(parsed[1]["ph"], "X");
        assert_eq!(parsed[1]["name"], "prepare");
        assert_eq!(parsed[4]["name"], "Vsync");
        assert_eq!(parsed[4]["args"]["presented"], false);
    }

    #[test]
    fn export_empty_window() {
        let mut out = Vec::new();
        export([].iter(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty());
    }
}
