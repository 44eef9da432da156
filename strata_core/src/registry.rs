// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit registry of live render contexts.
//!
//! The embedder owns one registry per render thread and registers every
//! context it creates, so process-wide events (memory pressure, cache
//! trimming) reach all surfaces without global mutable state.

use alloc::rc::Rc;
use alloc::vec::Vec;

use core::cell::RefCell;

use crate::context::RenderContext;

/// How aggressively to release memory on a trim request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TrimLevel {
    /// The UI is hidden; speculative layers can go.
    UiHidden,
    /// Reclaim everything reclaimable, including pipeline caches.
    Complete,
}

/// Tracks every live [`RenderContext`] on a render thread.
#[derive(Debug, Default)]
pub struct ContextRegistry {
    contexts: Vec<Rc<RefCell<RenderContext>>>,
}

impl ContextRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a context.
    pub fn register(&mut self, context: Rc<RefCell<RenderContext>>) {
        if self
            .contexts
            .iter()
            .any(|existing| Rc::ptr_eq(existing, &context))
        {
            return;
        }
        self.contexts.push(context);
    }

    /// Stops tracking a context. Callers destroy the context separately.
    pub fn unregister(&mut self, context: &Rc<RefCell<RenderContext>>) {
        self.contexts
            .retain(|existing| !Rc::ptr_eq(existing, context));
    }

    /// Fans a memory-pressure signal out to every registered context.
    pub fn trim_memory(&self, level: TrimLevel) {
        log::debug!("trimming {} contexts at {level:?}", self.contexts.len());
        for context in &self.contexts {
            context.borrow_mut().trim_memory(level);
        }
    }

    /// Number of registered contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Whether no contexts are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
