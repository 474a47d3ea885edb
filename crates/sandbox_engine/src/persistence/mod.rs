//! Persistence bridge - saving and restoring worlds through a key-value store
//!
//! The registry serializes to an ordered list of placement attributes;
//! renderable handles are never persisted. The key-value store itself is an
//! external collaborator behind the [`StateStore`] trait (browser local
//! storage in the original deployment); [`MemoryStore`] is the built-in
//! implementation for tests and headless tooling.

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::renderable::ResourceKey;
use crate::world::{InstanceId, PlacementEntry, PlacementRegistry, WorldError};

/// Errors that can occur while saving or loading worlds
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// No saved world exists under the requested slot
    #[error("no saved world in slot '{0}'")]
    SlotNotFound(String),

    /// Serializing the world failed
    #[error("encode error: {0}")]
    Encode(String),

    /// Parsing a saved world failed
    #[error("decode error: {0}")]
    Decode(String),

    /// The backing store reported a failure
    #[error("store error: {0}")]
    Store(String),

    /// Rebuilding the registry failed
    #[error(transparent)]
    World(#[from] WorldError),
}

/// Persisted attributes of one placement
///
/// Everything needed to rebuild an entry by replaying `place` + transforms:
/// resource key, transform, collision flag, and draw order. The instance id
/// is preserved so references held by collaborators survive a reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPlacement {
    /// Original instance id
    pub id: InstanceId,
    /// Resource the entry renders
    pub resource_key: ResourceKey,
    /// World position
    pub x: f32,
    /// World position
    pub y: f32,
    /// Rotation in radians
    pub rotation: f32,
    /// X scale factor
    pub scale_x: f32,
    /// Y scale factor
    pub scale_y: f32,
    /// Whether the collision body is enabled
    pub collision_enabled: bool,
    /// Draw-order index
    pub z_index: u32,
}

impl SavedPlacement {
    /// Capture the persisted attributes of a live entry
    pub fn from_entry(entry: &PlacementEntry) -> Self {
        Self {
            id: entry.id(),
            resource_key: entry.resource_key().clone(),
            x: entry.position().x,
            y: entry.position().y,
            rotation: entry.rotation(),
            scale_x: entry.scale().x,
            scale_y: entry.scale().y,
            collision_enabled: entry.collision_enabled(),
            z_index: entry.z_index(),
        }
    }
}

/// External key-value storage boundary
///
/// Slots map to whatever the host provides - browser local storage keys,
/// files, or an in-memory map.
pub trait StateStore {
    /// Write `data` under `slot`, replacing any previous value
    fn put(&mut self, slot: &str, data: &str) -> Result<(), PersistenceError>;

    /// Read the value stored under `slot`, if any
    fn get(&self, slot: &str) -> Result<Option<String>, PersistenceError>;

    /// Delete the value stored under `slot`, if any
    fn remove(&mut self, slot: &str) -> Result<(), PersistenceError>;

    /// List every populated slot
    fn slots(&self) -> Vec<String>;
}

/// In-memory state store
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn put(&mut self, slot: &str, data: &str) -> Result<(), PersistenceError> {
        self.slots.insert(slot.to_string(), data.to_string());
        Ok(())
    }

    fn get(&self, slot: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.slots.get(slot).cloned())
    }

    fn remove(&mut self, slot: &str) -> Result<(), PersistenceError> {
        self.slots.remove(slot);
        Ok(())
    }

    fn slots(&self) -> Vec<String> {
        self.slots.keys().cloned().collect()
    }
}

/// Serialize saved placements to RON text
pub fn encode_world(placements: &[SavedPlacement]) -> Result<String, PersistenceError> {
    ron::ser::to_string_pretty(placements, ron::ser::PrettyConfig::default())
        .map_err(|e| PersistenceError::Encode(e.to_string()))
}

/// Parse saved placements from RON text
pub fn decode_world(data: &str) -> Result<Vec<SavedPlacement>, PersistenceError> {
    ron::from_str(data).map_err(|e| PersistenceError::Decode(e.to_string()))
}

/// Export the registry and write it to a store slot
pub fn save_world(
    store: &mut dyn StateStore,
    slot: &str,
    registry: &PlacementRegistry,
) -> Result<(), PersistenceError> {
    let encoded = encode_world(&registry.export_state())?;
    store.put(slot, &encoded)?;
    log::info!("saved {} placement(s) to slot '{}'", registry.len(), slot);
    Ok(())
}

/// Read a store slot and rebuild the registry from it
///
/// Clears the current world first. Returns the number of restored entries.
pub fn load_world(
    store: &dyn StateStore,
    slot: &str,
    registry: &mut PlacementRegistry,
) -> Result<usize, PersistenceError> {
    let data = store
        .get(slot)?
        .ok_or_else(|| PersistenceError::SlotNotFound(slot.to_string()))?;
    let placements = decode_world(&data)?;
    let restored = registry.import_state(&placements)?;
    log::info!("loaded {} placement(s) from slot '{}'", restored, slot);
    Ok(restored)
}
