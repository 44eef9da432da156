// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-timing diagnostics for strata.
//!
//! Offline consumers for the timing rings a
//! [`RenderContext`](strata_core::context::RenderContext) keeps:
//!
//! - [`report`] — human-readable per-frame timing tables with a jank
//!   summary.
//! - [`chrome`] — Chrome Trace Event Format JSON for `chrome://tracing` or
//!   Perfetto.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET

pub mod chrome;
pub mod report;
