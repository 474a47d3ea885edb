//! Placement registry - the authoritative set of world instances
//!
//! The registry owns the instance-id to renderable mapping and mediates
//! every transform, selection, and deletion so the pool's active/inactive
//! partition stays consistent. The pool never tracks which entries exist;
//! the registry never recycles renderables itself. That separation lets
//! placement churn during interactive editing avoid engine-level allocation
//! churn.

use std::collections::BTreeMap;
use std::rc::Rc;

use thiserror::Error;

use crate::config::WorldConfig;
use crate::diagnostics::{DiagnosticEvent, LogSink, SharedSink};
use crate::events::{EventDispatcher, WorldEvent, WorldListener};
use crate::foundation::math::Vec2;
use crate::persistence::SavedPlacement;
use crate::pool::{PoolError, PoolStats, SpritePool};
use crate::renderable::ResourceKey;
use super::placement::{InstanceId, PlaceOptions, PlacementEntry};

/// Errors that can occur during registry operations
#[derive(Debug, Error)]
pub enum WorldError {
    /// The referenced instance id is absent from the registry
    ///
    /// Non-fatal: the registry is left unchanged.
    #[error("no placement with id {id}")]
    NotFound {
        /// The id that was looked up
        id: InstanceId,
    },

    /// A pool operation failed
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Authoritative registry of placed world instances
pub struct PlacementRegistry {
    entries: BTreeMap<InstanceId, PlacementEntry>,
    pool: SpritePool,
    next_id: u64,
    next_z: u32,
    selected: Option<InstanceId>,
    dispatcher: EventDispatcher,
    diagnostics: SharedSink,
    default_collision: bool,
}

impl PlacementRegistry {
    /// Create an empty registry over the given pool
    pub fn new(pool: SpritePool) -> Self {
        Self::with_diagnostics(pool, Rc::new(LogSink))
    }

    /// Create an empty registry with an injected diagnostics sink
    pub fn with_diagnostics(pool: SpritePool, diagnostics: SharedSink) -> Self {
        Self {
            entries: BTreeMap::new(),
            pool,
            next_id: 0,
            next_z: 0,
            selected: None,
            dispatcher: EventDispatcher::new(),
            diagnostics,
            default_collision: true,
        }
    }

    /// Apply engine configuration: collision default and pool pre-warming
    pub fn apply_config(&mut self, config: &WorldConfig) {
        self.default_collision = config.default_collision;
        for entry in &config.pool.prewarm {
            self.pool.prewarm(&ResourceKey::new(entry.resource.as_str()), entry.count);
        }
    }

    /// Register a listener for world notifications
    pub fn subscribe(&mut self, listener: Box<dyn WorldListener>) {
        self.dispatcher.subscribe(listener);
    }

    /// Place a new instance into the world
    ///
    /// Acquires a renderable from the pool, assigns a fresh instance id and
    /// (unless given explicitly) the next draw-order index, and emits
    /// [`WorldEvent::Placed`].
    pub fn place(
        &mut self,
        key: &ResourceKey,
        x: f32,
        y: f32,
        options: PlaceOptions,
    ) -> Result<InstanceId, WorldError> {
        let id = InstanceId::from_raw(self.next_id);
        let collision = options.collision.unwrap_or(self.default_collision);
        let z_index = options.z_index.unwrap_or(self.next_z);

        self.spawn_entry(id, key, x, y, options.rotation, options.scale, collision, z_index)?;

        self.next_id += 1;
        self.next_z = self.next_z.max(z_index + 1);
        log::debug!("placed '{}' as {} at ({}, {})", key, id, x, y);
        Ok(id)
    }

    /// Remove an instance, returning its renderable to the pool
    ///
    /// The release happens synchronously before the entry is discarded, so
    /// there is no window in which the renderable is owned by neither side.
    pub fn remove(&mut self, id: InstanceId) -> Result<(), WorldError> {
        let Some(entry) = self.entries.remove(&id) else {
            self.diagnostics.record(&DiagnosticEvent::NotFound { id, operation: "remove" });
            return Err(WorldError::NotFound { id });
        };

        if self.selected == Some(id) {
            self.selected = None;
            self.dispatcher.emit(&WorldEvent::SelectionChanged {
                previous: Some(id),
                current: None,
            });
        }

        let key = entry.resource_key.clone();
        self.pool.release(entry.renderable)?;
        self.dispatcher.emit(&WorldEvent::Removed { id, key });
        Ok(())
    }

    /// Move an instance to a new position
    pub fn move_to(&mut self, id: InstanceId, x: f32, y: f32) -> Result<(), WorldError> {
        let entry = self.lookup_mut(id, "move")?;
        entry.position = Vec2::new(x, y);
        entry.renderable.set_position(x, y);
        self.dispatcher.emit(&WorldEvent::Moved { id, x, y });
        Ok(())
    }

    /// Set an instance's absolute rotation in radians
    pub fn rotate(&mut self, id: InstanceId, radians: f32) -> Result<(), WorldError> {
        let entry = self.lookup_mut(id, "rotate")?;
        entry.rotation = radians;
        entry.renderable.set_rotation(radians);
        self.dispatcher.emit(&WorldEvent::Rotated { id, radians });
        Ok(())
    }

    /// Set an instance's non-uniform scale factors
    pub fn scale(&mut self, id: InstanceId, sx: f32, sy: f32) -> Result<(), WorldError> {
        let entry = self.lookup_mut(id, "scale")?;
        entry.scale = Vec2::new(sx, sy);
        entry.renderable.set_scale(sx, sy);
        self.dispatcher.emit(&WorldEvent::Scaled { id, sx, sy });
        Ok(())
    }

    /// Enable or disable an instance's collision body
    ///
    /// Enabling resizes the body to the current visual bounds.
    pub fn set_collision_enabled(&mut self, id: InstanceId, enabled: bool) -> Result<(), WorldError> {
        let entry = self.lookup_mut(id, "set_collision_enabled")?;
        entry.collision_enabled = enabled;
        entry.renderable.set_physics_enabled(enabled);
        if enabled {
            entry.renderable.sync_body_to_bounds();
        }
        self.dispatcher.emit(&WorldEvent::CollisionChanged { id, enabled });
        Ok(())
    }

    /// Select an instance, implicitly deselecting the previous one
    ///
    /// Selection has no effect on pooling.
    pub fn select(&mut self, id: InstanceId) -> Result<(), WorldError> {
        if !self.entries.contains_key(&id) {
            self.diagnostics.record(&DiagnosticEvent::NotFound { id, operation: "select" });
            return Err(WorldError::NotFound { id });
        }
        if self.selected == Some(id) {
            return Ok(());
        }

        let previous = self.selected.replace(id);
        self.dispatcher.emit(&WorldEvent::SelectionChanged {
            previous,
            current: Some(id),
        });
        Ok(())
    }

    /// Clear the selection, if any
    pub fn deselect(&mut self) {
        if let Some(previous) = self.selected.take() {
            self.dispatcher.emit(&WorldEvent::SelectionChanged {
                previous: Some(previous),
                current: None,
            });
        }
    }

    /// Currently selected instance, if any
    pub fn selected(&self) -> Option<InstanceId> {
        self.selected
    }

    /// Remove every instance, returning all renderables to the pool
    pub fn clear(&mut self) -> Result<usize, WorldError> {
        self.deselect();
        let drained = std::mem::take(&mut self.entries);
        let removed = drained.len();
        for (_, entry) in drained {
            self.pool.release(entry.renderable)?;
        }
        self.dispatcher.emit(&WorldEvent::Cleared { removed });
        Ok(removed)
    }

    /// Number of placed instances
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the world has no placed instances
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an instance id is present
    pub fn contains(&self, id: InstanceId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Look up an entry by id
    pub fn get(&self, id: InstanceId) -> Option<&PlacementEntry> {
        self.entries.get(&id)
    }

    /// Iterate entries in id (placement) order
    pub fn iter(&self) -> impl Iterator<Item = &PlacementEntry> {
        self.entries.values()
    }

    /// Iterate entries mutably, for the culling pass
    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = &mut PlacementEntry> {
        self.entries.values_mut()
    }

    /// Snapshot of the underlying pool's counts
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Serialize every entry to its persisted attributes, in placement order
    ///
    /// Renderable handles are not persisted; resource keys and transforms
    /// are enough to rebuild the world.
    pub fn export_state(&self) -> Vec<SavedPlacement> {
        self.entries.values().map(SavedPlacement::from_entry).collect()
    }

    /// Rebuild the world from saved entries
    ///
    /// Clears the current world first, then replays each saved placement
    /// with its original instance id, transform, collision flag, and
    /// draw-order index. Entries whose resource no longer resolves are
    /// skipped with a diagnostic. Returns the number of restored entries.
    pub fn import_state(&mut self, saved: &[SavedPlacement]) -> Result<usize, WorldError> {
        self.clear()?;

        let mut restored = 0;
        for placement in saved {
            if !self.pool.is_resolved(&placement.resource_key) {
                self.diagnostics.record(&DiagnosticEvent::ImportSkipped {
                    key: placement.resource_key.clone(),
                });
                continue;
            }
            if self.entries.contains_key(&placement.id) {
                self.diagnostics.record(&DiagnosticEvent::InvariantViolation {
                    detail: format!("duplicate instance id {} in saved world", placement.id),
                });
                continue;
            }

            self.spawn_entry(
                placement.id,
                &placement.resource_key,
                placement.x,
                placement.y,
                placement.rotation,
                Vec2::new(placement.scale_x, placement.scale_y),
                placement.collision_enabled,
                placement.z_index,
            )?;

            self.next_id = self.next_id.max(placement.id.raw() + 1);
            self.next_z = self.next_z.max(placement.z_index + 1);
            restored += 1;
        }

        log::info!("restored {} of {} saved placement(s)", restored, saved.len());
        Ok(restored)
    }

    /// Acquire a renderable and insert a fully-formed entry under `id`
    fn spawn_entry(
        &mut self,
        id: InstanceId,
        key: &ResourceKey,
        x: f32,
        y: f32,
        rotation: f32,
        scale: Vec2,
        collision: bool,
        z_index: u32,
    ) -> Result<(), WorldError> {
        let mut renderable = self.pool.acquire(key, x, y)?;
        if rotation != 0.0 {
            renderable.set_rotation(rotation);
        }
        if scale != Vec2::new(1.0, 1.0) {
            renderable.set_scale(scale.x, scale.y);
        }
        if !collision {
            renderable.set_physics_enabled(false);
        }

        let entry = PlacementEntry {
            id,
            resource_key: key.clone(),
            position: Vec2::new(x, y),
            rotation,
            scale,
            collision_enabled: collision,
            z_index,
            visible: true,
            renderable,
        };
        self.entries.insert(id, entry);
        self.dispatcher.emit(&WorldEvent::Placed {
            id,
            key: key.clone(),
            x,
            y,
            z_index,
        });
        Ok(())
    }

    /// Look up an entry mutably, recording a diagnostic when absent
    fn lookup_mut(
        &mut self,
        id: InstanceId,
        operation: &'static str,
    ) -> Result<&mut PlacementEntry, WorldError> {
        if !self.entries.contains_key(&id) {
            self.diagnostics.record(&DiagnosticEvent::NotFound { id, operation });
        }
        self.entries.get_mut(&id).ok_or(WorldError::NotFound { id })
    }
}
