//! End-to-end lifecycle tests
//!
//! Exercises the full placement lifecycle: pool churn, registry bookkeeping,
//! selection, notifications, culling interaction, and save/restore.

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;

use crate::culling::CullingPass;
use crate::diagnostics::{CollectingSink, DiagnosticEvent};
use crate::events::{WorldEvent, WorldListener};
use crate::foundation::math::{Rect, Vec2};
use crate::persistence::{self, MemoryStore, SavedPlacement};
use crate::pool::SpritePool;
use crate::renderable::{HeadlessFactory, HeadlessRenderable, ResourceKey};
use crate::world::{InstanceId, PlaceOptions, PlacementRegistry};

fn forest_factory() -> HeadlessFactory {
    let mut factory = HeadlessFactory::new();
    factory.register("oak-tree", Vec2::new(16.0, 16.0));
    factory.register("boulder", Vec2::new(12.0, 10.0));
    factory.register("pixel-house", Vec2::new(32.0, 24.0));
    factory
}

fn forest_registry() -> PlacementRegistry {
    PlacementRegistry::new(SpritePool::new(Box::new(forest_factory())))
}

fn handle_at(registry: &PlacementRegistry, id: InstanceId) -> u64 {
    registry
        .get(id)
        .unwrap()
        .renderable()
        .as_any()
        .downcast_ref::<HeadlessRenderable>()
        .unwrap()
        .handle()
}

struct RecordingListener {
    log: Rc<RefCell<Vec<WorldEvent>>>,
}

impl WorldListener for RecordingListener {
    fn on_world_event(&mut self, event: &WorldEvent) {
        self.log.borrow_mut().push(event.clone());
    }
}

#[test]
fn test_release_then_acquire_reuses_same_renderable() {
    let mut registry = forest_registry();
    let oak = ResourceKey::new("oak-tree");

    let first = registry.place(&oak, 10.0, 20.0, PlaceOptions::new()).unwrap();
    let first_handle = handle_at(&registry, first);
    assert_eq!(registry.get(first).unwrap().position(), Vec2::new(10.0, 20.0));

    registry.remove(first).unwrap();

    let second = registry.place(&oak, 50.0, 60.0, PlaceOptions::new()).unwrap();
    assert_ne!(second, first);
    assert_eq!(handle_at(&registry, second), first_handle);

    let entry = registry.get(second).unwrap();
    assert_eq!(entry.position(), Vec2::new(50.0, 60.0));
    assert_eq!(entry.rotation(), 0.0);
    assert_eq!(registry.pool_stats().total_constructed, 1);
}

#[test]
fn test_partition_holds_through_churn() {
    let mut registry = forest_registry();
    let oak = ResourceKey::new("oak-tree");
    let boulder = ResourceKey::new("boulder");

    let mut alive = Vec::new();
    for round in 0..4 {
        for i in 0..3 {
            let key = if i % 2 == 0 { &oak } else { &boulder };
            let x = (round * 10 + i) as f32;
            alive.push(registry.place(key, x, 0.0, PlaceOptions::new()).unwrap());
        }
        // Remove every other placement from this round
        let keep = alive.split_off(alive.len() - 3);
        for (index, id) in keep.into_iter().enumerate() {
            if index == 1 {
                registry.remove(id).unwrap();
            } else {
                alive.push(id);
            }
        }

        let stats = registry.pool_stats();
        assert_eq!(stats.total_active, registry.len());
        assert_eq!(
            stats.total_active + stats.total_pooled,
            stats.total_constructed as usize,
            "active set and free lists must partition all constructed renderables"
        );
    }
}

#[test]
fn test_each_entry_owns_a_distinct_renderable() {
    let mut registry = forest_registry();
    let oak = ResourceKey::new("oak-tree");

    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(registry.place(&oak, i as f32, 0.0, PlaceOptions::new()).unwrap());
    }

    let mut handles: Vec<u64> = ids.iter().map(|&id| handle_at(&registry, id)).collect();
    handles.sort_unstable();
    handles.dedup();
    assert_eq!(handles.len(), ids.len(), "no renderable may back two entries");
}

#[test]
fn test_place_remove_roundtrip_grows_free_list_by_one() {
    let mut registry = forest_registry();
    let boulder = ResourceKey::new("boulder");
    registry.place(&boulder, 0.0, 0.0, PlaceOptions::new()).unwrap();
    let first_id = registry.iter().next().unwrap().id();
    registry.remove(first_id).unwrap();

    let before = registry.pool_stats().per_key[&boulder].pooled;

    let id = registry.place(&boulder, 5.0, 5.0, PlaceOptions::new()).unwrap();
    registry.remove(id).unwrap();

    let after = registry.pool_stats().per_key[&boulder].pooled;
    assert_eq!(after, before);
    assert!(!registry.contains(id));

    // And from empty pool: place consumes, remove returns exactly one
    let id = registry.place(&boulder, 6.0, 6.0, PlaceOptions::new()).unwrap();
    assert_eq!(registry.pool_stats().per_key[&boulder].pooled, before - 1);
    registry.remove(id).unwrap();
    assert_eq!(registry.pool_stats().per_key[&boulder].pooled, before);
}

#[test]
fn test_notifications_follow_call_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut registry = forest_registry();
    registry.subscribe(Box::new(RecordingListener { log: log.clone() }));
    let oak = ResourceKey::new("oak-tree");

    let id = registry.place(&oak, 1.0, 2.0, PlaceOptions::new()).unwrap();
    registry.move_to(id, 3.0, 4.0).unwrap();
    registry.select(id).unwrap();
    registry.remove(id).unwrap();

    let events = log.borrow();
    assert_eq!(events.len(), 5);
    assert_eq!(
        events[0],
        WorldEvent::Placed { id, key: oak.clone(), x: 1.0, y: 2.0, z_index: 0 }
    );
    assert_eq!(events[1], WorldEvent::Moved { id, x: 3.0, y: 4.0 });
    assert_eq!(
        events[2],
        WorldEvent::SelectionChanged { previous: None, current: Some(id) }
    );
    // Removing the selected entry first clears the selection
    assert_eq!(
        events[3],
        WorldEvent::SelectionChanged { previous: Some(id), current: None }
    );
    assert_eq!(events[4], WorldEvent::Removed { id, key: oak.clone() });
}

#[test]
fn test_selection_switch_emits_single_transition() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut registry = forest_registry();
    registry.subscribe(Box::new(RecordingListener { log: log.clone() }));
    let oak = ResourceKey::new("oak-tree");

    let a = registry.place(&oak, 0.0, 0.0, PlaceOptions::new()).unwrap();
    let b = registry.place(&oak, 1.0, 1.0, PlaceOptions::new()).unwrap();

    registry.select(a).unwrap();
    registry.select(b).unwrap();
    // Re-selecting the current entry is a no-op
    registry.select(b).unwrap();

    let selections: Vec<WorldEvent> = log
        .borrow()
        .iter()
        .filter(|e| matches!(e, WorldEvent::SelectionChanged { .. }))
        .cloned()
        .collect();
    assert_eq!(
        selections,
        vec![
            WorldEvent::SelectionChanged { previous: None, current: Some(a) },
            WorldEvent::SelectionChanged { previous: Some(a), current: Some(b) },
        ]
    );
}

#[test]
fn test_export_import_roundtrip_preserves_attributes() {
    let mut registry = forest_registry();
    let oak = ResourceKey::new("oak-tree");
    let boulder = ResourceKey::new("boulder");
    let house = ResourceKey::new("pixel-house");

    registry.place(&oak, 10.0, 20.0, PlaceOptions::new()).unwrap();
    let rotated = registry
        .place(&boulder, -5.0, 42.0, PlaceOptions::new().with_rotation(1.25))
        .unwrap();
    registry
        .place(&house, 300.0, 180.0, PlaceOptions::new().with_scale(2.0, 1.5).with_collision(false))
        .unwrap();
    registry.move_to(rotated, -6.0, 44.0).unwrap();
    registry.scale(rotated, 0.5, 0.5).unwrap();

    let exported = registry.export_state();
    assert_eq!(exported.len(), 3);

    // Mutate the world, then restore the snapshot
    registry.clear().unwrap();
    registry.place(&oak, 999.0, 999.0, PlaceOptions::new()).unwrap();

    let restored = registry.import_state(&exported).unwrap();
    assert_eq!(restored, 3);
    assert_eq!(registry.len(), 3);

    for saved in &exported {
        let entry = registry.get(saved.id).expect("restored entry keeps its id");
        assert_eq!(entry.resource_key(), &saved.resource_key);
        assert_relative_eq!(entry.position().x, saved.x);
        assert_relative_eq!(entry.position().y, saved.y);
        assert_relative_eq!(entry.rotation(), saved.rotation);
        assert_relative_eq!(entry.scale().x, saved.scale_x);
        assert_relative_eq!(entry.scale().y, saved.scale_y);
        assert_eq!(entry.collision_enabled(), saved.collision_enabled);
        assert_eq!(entry.z_index(), saved.z_index);
    }

    // A second export reproduces the snapshot exactly
    assert_eq!(registry.export_state(), exported);
}

#[test]
fn test_import_resumes_id_assignment_past_restored_maximum() {
    let mut registry = forest_registry();
    let oak = ResourceKey::new("oak-tree");

    let saved = vec![SavedPlacement {
        id: InstanceId::from_raw(41),
        resource_key: oak.clone(),
        x: 0.0,
        y: 0.0,
        rotation: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        collision_enabled: true,
        z_index: 9,
    }];
    registry.import_state(&saved).unwrap();

    let next = registry.place(&oak, 1.0, 1.0, PlaceOptions::new()).unwrap();
    assert!(next.raw() > 41);
    assert!(registry.get(next).unwrap().z_index() > 9);
}

#[test]
fn test_import_skips_unresolved_resources() {
    let sink = Rc::new(CollectingSink::new());
    let mut registry = PlacementRegistry::with_diagnostics(
        SpritePool::new(Box::new(forest_factory())),
        sink.clone(),
    );
    let oak = ResourceKey::new("oak-tree");
    let ghost = ResourceKey::new("deleted-generation");

    let saved = vec![
        SavedPlacement {
            id: InstanceId::from_raw(0),
            resource_key: oak.clone(),
            x: 1.0,
            y: 1.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            collision_enabled: true,
            z_index: 0,
        },
        SavedPlacement {
            id: InstanceId::from_raw(1),
            resource_key: ghost.clone(),
            x: 2.0,
            y: 2.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            collision_enabled: true,
            z_index: 1,
        },
    ];

    let restored = registry.import_state(&saved).unwrap();
    assert_eq!(restored, 1);
    assert_eq!(registry.len(), 1);
    assert_eq!(
        sink.count_matching(|e| matches!(e, DiagnosticEvent::ImportSkipped { .. })),
        1
    );
}

#[test]
fn test_save_and_load_through_store() {
    let mut registry = forest_registry();
    let oak = ResourceKey::new("oak-tree");
    let boulder = ResourceKey::new("boulder");

    registry.place(&oak, 12.0, 34.0, PlaceOptions::new()).unwrap();
    registry
        .place(&boulder, 56.0, 78.0, PlaceOptions::new().with_rotation(0.5))
        .unwrap();
    let exported = registry.export_state();

    let mut store = MemoryStore::new();
    persistence::save_world(&mut store, "slot-a", &registry).unwrap();

    registry.clear().unwrap();
    assert!(registry.is_empty());

    let restored = persistence::load_world(&store, "slot-a", &mut registry).unwrap();
    assert_eq!(restored, 2);
    assert_eq!(registry.export_state(), exported);
}

#[test]
fn test_culling_then_remove_keeps_pool_consistent() {
    let mut registry = forest_registry();
    let oak = ResourceKey::new("oak-tree");

    let near = registry.place(&oak, 10.0, 10.0, PlaceOptions::new()).unwrap();
    let far = registry.place(&oak, 9000.0, 9000.0, PlaceOptions::new()).unwrap();

    let pass = CullingPass::new();
    pass.recompute(Rect::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0)), &mut registry);
    assert!(registry.get(near).unwrap().is_visible());
    assert!(!registry.get(far).unwrap().is_visible());

    // Removing a culled entry still returns its renderable to the pool
    registry.remove(far).unwrap();
    let stats = registry.pool_stats();
    assert_eq!(stats.total_active, 1);
    assert_eq!(stats.total_pooled, 1);

    // The recycled renderable comes back clean and visible
    let reused = registry.place(&oak, 20.0, 20.0, PlaceOptions::new()).unwrap();
    let state = registry
        .get(reused)
        .unwrap()
        .renderable()
        .as_any()
        .downcast_ref::<HeadlessRenderable>()
        .unwrap();
    assert!(state.is_visible());
    assert_eq!(registry.pool_stats().total_constructed, 2);
}
