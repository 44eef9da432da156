// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-surface render-frame orchestration.
//!
//! Strata sits between a retained scene graph and a platform swap chain and
//! decides, every vsync, whether and what to redraw. The embedder supplies
//! the platform pieces as trait objects (a [`RenderPipeline`], a
//! [`NativeSurface`], a [`FrameScheduler`], a [`Clock`]); one
//! [`RenderContext`] per surface drives them:
//!
//! ```text
//!             vsync callback
//!                   │
//!                   ▼
//!   ┌─────────────────────────────────┐
//!   │ RenderContext::do_frame         │
//!   │                                 │
//!   │  prepare_tree ── animations,    │
//!   │       │          damage, layers │
//!   │       ▼                         │
//!   │  draw ────────── dirty rect,    │
//!   │       │          pipeline.draw  │
//!   │       ▼                         │
//!   │  present ─────── swap + record  │
//!   └─────────────────────────────────┘
//!                   │
//!                   ▼
//!       SwapRecord / FrameRecord rings
//! ```
//!
//! Frames with no pending work are skipped entirely. A frame that cannot
//! present (saturated queue, lost surface) is dropped without losing the
//! accumulated damage. Timing of recent attempts is kept in fixed rings for
//! jank diagnosis; see the [`record`] module.
//!
//! This crate is `no_std` (plus `alloc`) and single-threaded by contract:
//! every context method must be called from its render thread. The `std`
//! feature only forwards to dependencies.
//!
//! [`RenderContext`]: context::RenderContext
//! [`RenderPipeline`]: pipeline::RenderPipeline
//! [`NativeSurface`]: surface::NativeSurface
//! [`FrameScheduler`]: runtime::FrameScheduler
//! [`Clock`]: runtime::Clock
#![cfg_attr(not(feature = "std"), no_std)]
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

#[cfg(test)]
use env_logger as _;
#[cfg(test)]
use strata_harness as _;
#[cfg(test)]
use test_log as _;

pub mod context;
pub mod damage;
pub mod layer;
pub mod metrics;
pub mod node;
pub mod pipeline;
pub mod record;
pub mod registry;
pub mod ring;
pub mod runtime;
pub mod surface;
pub mod time;
pub mod work;
