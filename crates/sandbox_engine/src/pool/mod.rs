//! Sprite object pool
//!
//! Amortizes the cost of creating and destroying renderable + physics
//! instances by recycling them across placements of the same resource key.
//! Each key gets its own free list with stack discipline: the most recently
//! returned renderable is reused first.
//!
//! Ownership model: an *active* renderable is owned by exactly one placement
//! entry; a *pooled* renderable is owned by a free list here. Moving the
//! `Box` between the two enforces the partition - a renderable can never be
//! in both states.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use thiserror::Error;

use crate::diagnostics::{DiagnosticEvent, LogSink, SharedSink};
use crate::renderable::{BodyConfig, Renderable, ResourceKey};

/// Errors that can occur during pool operations
#[derive(Debug, Error)]
pub enum PoolError {
    /// The resource backing a key cannot be resolved to a constructible renderable
    #[error("resource '{key}' is not resolved; cannot construct a renderable")]
    ResourceUnavailable {
        /// Pool partition key
        key: ResourceKey,
    },

    /// The host adapter failed to construct a renderable
    #[error("failed to construct renderable for '{key}': {reason}")]
    ConstructionFailed {
        /// Pool partition key
        key: ResourceKey,
        /// Reason reported by the adapter
        reason: String,
    },

    /// A programming error was detected; the operation was aborted safely
    #[error("pool invariant violated: {detail}")]
    InvariantViolation {
        /// Description of the violated invariant
        detail: String,
    },
}

/// Construction boundary supplied by the host engine
///
/// By the time `acquire` or `prewarm` is called, the underlying visual
/// resource must already be resolved and locally available; the pool never
/// performs network or decode work.
pub trait RenderableFactory {
    /// Whether the resource backing `key` is resolved and constructible
    fn is_resolved(&self, key: &ResourceKey) -> bool;

    /// Construct a new renderable bound to `key`
    fn create(&mut self, key: &ResourceKey) -> Result<Box<dyn Renderable>, PoolError>;
}

/// Per-key pool counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyStats {
    /// Inactive renderables waiting on the free list
    pub pooled: usize,
    /// Renderables currently owned by placement entries
    pub active: usize,
}

/// Pool statistics for diagnostics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolStats {
    /// Number of resource keys with pool bookkeeping
    pub tracked_keys: usize,
    /// Total inactive renderables across all free lists
    pub total_pooled: usize,
    /// Total renderables currently checked out
    pub total_active: usize,
    /// Renderables constructed since pool creation
    pub total_constructed: u64,
    /// Acquire operations since pool creation
    pub total_acquired: u64,
    /// Release operations since pool creation
    pub total_released: u64,
    /// Per-key breakdown
    pub per_key: BTreeMap<ResourceKey, KeyStats>,
}

/// Object pool for renderable + physics instances, partitioned by resource key
pub struct SpritePool {
    factory: Box<dyn RenderableFactory>,
    free: HashMap<ResourceKey, Vec<Box<dyn Renderable>>>,
    active: HashMap<ResourceKey, usize>,
    total_constructed: u64,
    total_acquired: u64,
    total_released: u64,
    diagnostics: SharedSink,
}

impl SpritePool {
    /// Create a pool over the given factory, logging diagnostics
    pub fn new(factory: Box<dyn RenderableFactory>) -> Self {
        Self::with_diagnostics(factory, Rc::new(LogSink))
    }

    /// Create a pool with an injected diagnostics sink
    pub fn with_diagnostics(factory: Box<dyn RenderableFactory>, diagnostics: SharedSink) -> Self {
        Self {
            factory,
            free: HashMap::new(),
            active: HashMap::new(),
            total_constructed: 0,
            total_acquired: 0,
            total_released: 0,
            diagnostics,
        }
    }

    /// Check out a renderable for `key` at the given position
    ///
    /// Reuses the most recently returned renderable for the key when one is
    /// pooled; otherwise constructs a new one through the factory. Either
    /// way, the returned renderable is in a clean-slate visual and physics
    /// state indistinguishable from a freshly constructed one: positioned at
    /// (x, y), rotation 0, scale 1, full opacity, no tint, no attached data,
    /// with an enabled immovable non-gravity body at zero velocity.
    pub fn acquire(&mut self, key: &ResourceKey, x: f32, y: f32) -> Result<Box<dyn Renderable>, PoolError> {
        let mut renderable = match self.free.get_mut(key).and_then(Vec::pop) {
            Some(recycled) => {
                self.diagnostics.record(&DiagnosticEvent::PoolHit { key: key.clone() });
                recycled
            }
            None => {
                let constructed = self.factory.create(key)?;
                self.total_constructed += 1;
                self.diagnostics.record(&DiagnosticEvent::PoolMiss { key: key.clone() });
                constructed
            }
        };

        reset_for_spawn(renderable.as_mut(), x, y);
        *self.active.entry(key.clone()).or_insert(0) += 1;
        self.total_acquired += 1;
        Ok(renderable)
    }

    /// Return a renderable to its key's free list
    ///
    /// The renderable is parked: animation stopped, physics and interactivity
    /// disabled, attached data cleared, hidden. It will not be touched again
    /// until a future `acquire`. Returning a renderable the pool believes is
    /// already inactive is a programming error; the free lists are left
    /// untouched and the renderable is dropped.
    pub fn release(&mut self, mut renderable: Box<dyn Renderable>) -> Result<(), PoolError> {
        let key = renderable.resource_key().clone();

        if !renderable.is_active() {
            return Err(self.violation(format!(
                "release of an already-inactive renderable for '{}'",
                key
            )));
        }
        let outstanding = self.active.get(&key).copied().unwrap_or(0);
        if outstanding == 0 {
            return Err(self.violation(format!(
                "release for '{}' with no active renderables outstanding",
                key
            )));
        }
        if let Some(count) = self.active.get_mut(&key) {
            *count -= 1;
        }

        park(renderable.as_mut());
        self.free.entry(key).or_default().push(renderable);
        self.total_released += 1;
        Ok(())
    }

    /// Construct `count` inactive renderables for `key` ahead of demand
    ///
    /// Pays allocation cost up front so the first placements of a key avoid
    /// construction latency. Soft-fails when the resource is not resolved.
    pub fn prewarm(&mut self, key: &ResourceKey, count: usize) {
        if !self.factory.is_resolved(key) {
            self.diagnostics.record(&DiagnosticEvent::PrewarmSkipped {
                key: key.clone(),
                requested: count,
            });
            return;
        }

        let list = self.free.entry(key.clone()).or_default();
        for built in 0..count {
            match self.factory.create(key) {
                Ok(mut renderable) => {
                    park(renderable.as_mut());
                    list.push(renderable);
                    self.total_constructed += 1;
                }
                Err(err) => {
                    log::warn!("pre-warm for '{}' stopped after {} of {}: {}", key, built, count, err);
                    return;
                }
            }
        }
        log::debug!("pre-warmed {} renderable(s) for '{}'", count, key);
    }

    /// Permanently destroy all pooled renderables for one key
    ///
    /// Active renderables are owned by placement entries and are unaffected.
    /// Returns the number destroyed.
    pub fn clear(&mut self, key: &ResourceKey) -> usize {
        self.free.remove(key).map_or(0, |list| list.len())
    }

    /// Permanently destroy all pooled renderables for every key
    pub fn clear_all(&mut self) -> usize {
        let destroyed = self.free.values().map(Vec::len).sum();
        self.free.clear();
        destroyed
    }

    /// Number of renderables pooled for `key`
    pub fn pooled_count(&self, key: &ResourceKey) -> usize {
        self.free.get(key).map_or(0, Vec::len)
    }

    /// Number of renderables checked out for `key`
    pub fn active_count(&self, key: &ResourceKey) -> usize {
        self.active.get(key).copied().unwrap_or(0)
    }

    /// Whether the resource backing `key` is resolved
    pub fn is_resolved(&self, key: &ResourceKey) -> bool {
        self.factory.is_resolved(key)
    }

    /// Snapshot of pool counts
    pub fn stats(&self) -> PoolStats {
        let mut per_key: BTreeMap<ResourceKey, KeyStats> = BTreeMap::new();
        for (key, list) in &self.free {
            per_key.entry(key.clone()).or_default().pooled = list.len();
        }
        for (key, count) in &self.active {
            if *count > 0 {
                per_key.entry(key.clone()).or_default().active = *count;
            }
        }

        PoolStats {
            tracked_keys: per_key.len(),
            total_pooled: per_key.values().map(|stats| stats.pooled).sum(),
            total_active: per_key.values().map(|stats| stats.active).sum(),
            total_constructed: self.total_constructed,
            total_acquired: self.total_acquired,
            total_released: self.total_released,
            per_key,
        }
    }

    fn violation(&self, detail: String) -> PoolError {
        self.diagnostics.record(&DiagnosticEvent::InvariantViolation { detail: detail.clone() });
        PoolError::InvariantViolation { detail }
    }
}

/// Reset a renderable to spawn state at (x, y)
///
/// Applied on every acquire so prior history never leaks into a new
/// placement.
fn reset_for_spawn(renderable: &mut dyn Renderable, x: f32, y: f32) {
    renderable.set_position(x, y);
    renderable.set_rotation(0.0);
    renderable.set_scale(1.0, 1.0);
    renderable.set_alpha(1.0);
    renderable.clear_tint();
    renderable.clear_data();
    renderable.stop_animation();
    renderable.reset_body(BodyConfig::static_body());
    renderable.set_physics_enabled(true);
    renderable.sync_body_to_bounds();
    renderable.set_interactive(true);
    renderable.set_visible(true);
    renderable.set_active(true);
}

/// Park a renderable for storage on a free list
fn park(renderable: &mut dyn Renderable) {
    renderable.stop_animation();
    renderable.set_physics_enabled(false);
    renderable.set_interactive(false);
    renderable.clear_data();
    renderable.set_visible(false);
    renderable.set_active(false);
}
