// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene-graph node contract.
//!
//! The retained-mode scene graph lives outside this crate. The orchestrator
//! only needs three things from a node: a stable identity for set and list
//! membership, a per-frame prepare hook that surfaces damage and layer work,
//! and a teardown hook that detaches the node's offscreen layer. Everything
//! else about the node — display lists, properties, animation bindings — is
//! opaque here.

use core::fmt;

use crate::damage::DamageAccumulator;
use crate::layer::LayerUpdateQueue;
use crate::pipeline::ImageHandle;
use crate::time::HostTime;

use alloc::vec::Vec;

/// Stable identity of a scene-graph node.
///
/// Assigned by the scene-graph implementation; the orchestrator treats it as
/// opaque and only compares it for equality.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Per-frame traversal state handed to each node's
/// [`prepare`](RenderNode::prepare).
///
/// Nodes push their dirty regions into `damage`, request offscreen-layer
/// refreshes through `layer_queue`, and register mutable images for GPU
/// pinning in `images`. Setting `content_changed` tells the orchestrator
/// that a draw is actually needed this frame.
#[derive(Debug)]
pub struct TreeInfo<'a> {
    /// Vsync timestamp driving this frame.
    pub vsync: HostTime,
    /// Accumulator for dirty regions produced during traversal.
    pub damage: &'a mut DamageAccumulator,
    /// Queue of nodes whose offscreen layers need a create/update pass.
    pub layer_queue: &'a mut LayerUpdateQueue,
    /// Mutable images to pin to the GPU cache before drawing.
    pub images: &'a mut Vec<ImageHandle>,
    /// Whether any visual content changed during traversal.
    pub content_changed: bool,
}

/// A retained-mode scene-graph node, as seen by the orchestrator.
pub trait RenderNode {
    /// Returns this node's stable identity.
    fn id(&self) -> NodeId;

    /// Advances per-node state for the coming frame.
    ///
    /// Called once per [`prepare_tree`](crate::context::RenderContext::prepare_tree)
    /// in painter's order. Implementations report dirty regions and layer
    /// work through `info`.
    fn prepare(&self, info: &mut TreeInfo<'_>);

    /// Detaches the node's offscreen layer, releasing the GPU resources the
    /// layer holds. Must be safe to call when no layer is attached.
    fn detach_layer(&self);
}

impl fmt::Debug for dyn RenderNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RenderNode({:?})", self.id())
    }
}
