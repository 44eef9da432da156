// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offscreen-layer work tracking.
//!
//! A *layer* is an offscreen render target owned by a single scene-graph
//! node. [`LayerUpdateQueue`] holds the nodes whose layers need a
//! create/update pass before the next draw; [`PrefetchedLayers`] tracks
//! layers that were built speculatively (ahead of becoming visible) so they
//! can be torn down under memory pressure without touching layers actively
//! in use.

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::node::{NodeId, RenderNode};

/// FIFO queue of nodes pending an offscreen-layer create/update pass.
///
/// Membership is a set: a node cannot be queued twice. Entries leave the
/// queue exactly once — when drained for processing or when the node is
/// removed from the scene.
#[derive(Debug, Default)]
pub struct LayerUpdateQueue {
    entries: Vec<Arc<dyn RenderNode>>,
}

impl LayerUpdateQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `node` for a layer update. A node already queued stays at its
    /// original position.
    pub fn enqueue(&mut self, node: Arc<dyn RenderNode>) {
        if self.contains(node.id()) {
            return;
        }
        self.entries.push(node);
    }

    /// Removes `node` from the queue without processing it.
    pub fn remove(&mut self, node: NodeId) {
        self.entries.retain(|entry| entry.id() != node);
    }

    /// Whether `node` is queued.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.iter().any(|entry| entry.id() == node)
    }

    /// Takes all queued nodes in FIFO order, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<Arc<dyn RenderNode>> {
        core::mem::take(&mut self.entries)
    }

    /// Number of queued nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Nodes whose layers were created speculatively.
///
/// These are eligible for eager release under memory pressure; a node moves
/// out of the set the moment its layer is actually used.
#[derive(Debug, Default)]
pub struct PrefetchedLayers {
    entries: Vec<Arc<dyn RenderNode>>,
}

impl PrefetchedLayers {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `node` as holding a speculative layer.
    pub fn insert(&mut self, node: Arc<dyn RenderNode>) {
        if self.contains(node.id()) {
            return;
        }
        self.entries.push(node);
    }

    /// Unmarks `node`, returning it if it was tracked. Called when the layer
    /// enters active use or the node goes away.
    pub fn remove(&mut self, node: NodeId) -> Option<Arc<dyn RenderNode>> {
        let index = self.entries.iter().position(|entry| entry.id() == node)?;
        Some(self.entries.swap_remove(index))
    }

    /// Whether `node` is tracked.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.iter().any(|entry| entry.id() == node)
    }

    /// Takes every tracked node, leaving the set empty.
    pub fn take_all(&mut self) -> Vec<Arc<dyn RenderNode>> {
        core::mem::take(&mut self.entries)
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
