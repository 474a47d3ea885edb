//! Headless sandbox demo
//!
//! Drives the engine end to end without a rendering backend: places a small
//! scene through the pool, pans the camera across it with culling, then
//! saves and restores the world through an in-memory store.

use sandbox_engine::prelude::*;

fn build_world() -> PlacementRegistry {
    // Stand-in for the host asset system: every resource a placement may
    // reference must be resolved before placement.
    let mut factory = HeadlessFactory::new();
    factory.register("oak-tree", Vec2::new(16.0, 16.0));
    factory.register("boulder", Vec2::new(12.0, 10.0));
    factory.register("pixel-house", Vec2::new(32.0, 24.0));

    let pool = SpritePool::new(Box::new(factory));
    let mut world = PlacementRegistry::new(pool);

    let mut config = WorldConfig::default();
    config.pool.prewarm.push(sandbox_engine::config::PrewarmEntry {
        resource: "oak-tree".to_string(),
        count: 8,
    });
    world.apply_config(&config);
    world
}

fn populate(world: &mut PlacementRegistry) -> Result<InstanceId, WorldError> {
    let oak = ResourceKey::new("oak-tree");
    let boulder = ResourceKey::new("boulder");
    let house = ResourceKey::new("pixel-house");

    // A row of trees along the ground
    for i in 0..12 {
        world.place(&oak, 40.0 + 48.0 * i as f32, 300.0, PlaceOptions::new())?;
    }

    // Scattered boulders, some rotated and scaled
    world.place(&boulder, 120.0, 260.0, PlaceOptions::new().with_rotation(0.4))?;
    world.place(&boulder, 480.0, 270.0, PlaceOptions::new().with_scale(1.5, 1.5))?;

    // A house with collision disabled so the player can walk through the door
    let home = world.place(
        &house,
        320.0,
        220.0,
        PlaceOptions::new().with_collision(false),
    )?;
    world.select(home)?;
    Ok(home)
}

fn pan_camera(world: &mut PlacementRegistry) {
    let culling = CullingPass::new();
    let view_size = Vec2::new(640.0, 360.0);

    for step in 0..4 {
        let origin = Vec2::new(step as f32 * 200.0, 100.0);
        let viewport = Rect::new(origin, origin + view_size);
        let stats = culling.recompute(viewport, world);
        log::info!(
            "camera at ({:.0}, {:.0}): {} visible, {} hidden",
            origin.x,
            origin.y,
            stats.visible,
            stats.hidden
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    sandbox_engine::foundation::logging::init();
    log::info!("Starting headless sandbox demo...");

    let mut world = build_world();
    let home = populate(&mut world)?;
    log::info!("placed {} entries, selected {}", world.len(), home);

    // Interactive editing churn: move the house, delete a tree, undo-style
    // re-place at the old spot
    world.move_to(home, 352.0, 220.0)?;
    let first_tree = world
        .iter()
        .next()
        .map(PlacementEntry::id)
        .expect("world is populated");
    world.remove(first_tree)?;
    world.place(&ResourceKey::new("oak-tree"), 40.0, 300.0, PlaceOptions::new())?;

    pan_camera(&mut world);

    // Save, wipe, restore
    let mut store = MemoryStore::new();
    save_world(&mut store, "demo-world", &world)?;
    world.clear()?;
    let restored = load_world(&store, "demo-world", &mut world)?;
    log::info!("restored {} entries from save", restored);

    let stats = world.pool_stats();
    log::info!(
        "pool: {} keys tracked, {} active, {} pooled, {} constructed over {} acquire(s)",
        stats.tracked_keys,
        stats.total_active,
        stats.total_pooled,
        stats.total_constructed,
        stats.total_acquired
    );

    Ok(())
}
