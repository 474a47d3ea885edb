//! Viewport culling pass
//!
//! Marks off-viewport entries invisible without removing them from the
//! registry or the pool - culling is a rendering optimization, never a
//! logical removal. A linear scan over the entries is sufficient at the
//! entity counts this engine targets; a spatial grid could replace the scan
//! behind the same interface for much larger worlds.
//!
//! Recompute runs whenever the camera moves or zooms; hosts may additionally
//! call it on a fixed frame cadence to catch entries that moved without a
//! camera change. Both triggers are cheap: the pass is linear and
//! idempotent.

use serde::{Serialize, Deserialize};

use crate::foundation::math::Rect;
use crate::world::PlacementRegistry;

/// Culling pass tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CullingConfig {
    /// Margin added around the viewport, in world units, to avoid visible
    /// pop-in at the edges
    pub margin: f32,
    /// Suggested recompute cadence for hosts that poll between camera moves
    pub recompute_interval_frames: u32,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            margin: 64.0,
            recompute_interval_frames: 30,
        }
    }
}

/// Per-pass visibility counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullStats {
    /// Entries intersecting the expanded viewport
    pub visible: usize,
    /// Entries fully outside the expanded viewport
    pub hidden: usize,
    /// Entries whose visibility changed this pass
    pub changed: usize,
}

/// Visibility computation over the placement registry
#[derive(Debug, Clone, Copy, Default)]
pub struct CullingPass {
    config: CullingConfig,
}

impl CullingPass {
    /// Create a pass with default tunables
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pass with explicit tunables
    pub fn with_config(config: CullingConfig) -> Self {
        Self { config }
    }

    /// The pass tunables
    pub fn config(&self) -> &CullingConfig {
        &self.config
    }

    /// Whether an entry's bounding box is visible in the given viewport
    ///
    /// A degenerate (zero-area) viewport hides everything: rendering nothing
    /// is safe, rendering everything is not.
    pub fn visible_in(&self, bounds: &Rect, viewport: &Rect) -> bool {
        if viewport.is_degenerate() {
            return false;
        }
        viewport.expanded(self.config.margin).intersects(bounds)
    }

    /// Recompute visibility for every entry against the viewport
    ///
    /// Entries intersecting the margin-expanded viewport are shown; entries
    /// fully outside are hidden but stay in the registry with their physics
    /// bodies intact. Never errors, never removes entries, and calling it
    /// twice with unchanged inputs produces the same visibility set.
    pub fn recompute(&self, viewport: Rect, registry: &mut PlacementRegistry) -> CullStats {
        let mut stats = CullStats::default();

        for entry in registry.entries_mut() {
            let visible = self.visible_in(&entry.world_bounds(), &viewport);
            if visible {
                stats.visible += 1;
            } else {
                stats.hidden += 1;
            }
            if visible != entry.is_visible() {
                entry.apply_visibility(visible);
                stats.changed += 1;
            }
        }

        log::trace!(
            "culling pass: {} visible, {} hidden, {} changed",
            stats.visible,
            stats.hidden,
            stats.changed
        );
        stats
    }
}
