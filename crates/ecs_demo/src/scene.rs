//! Demo scene setup.

use ecs_core::Entity;
use ecs_world::World;
use glam::Vec2;
use tracing::info;

use crate::components::{
    AiControlled, Collectible, Collider, Damage, Health, Lifetime, PlayerControlled, Position,
    Sprite, Velocity,
};

/// Handles to the entities of the starting scene.
#[derive(Debug, Clone, Copy)]
pub struct Scene {
    pub player: Entity,
    pub enemy: Entity,
    pub coin: Entity,
    pub projectile: Entity,
    pub tree: Entity,
}

impl Scene {
    /// Every entity of the scene.
    #[must_use]
    pub fn entities(&self) -> [Entity; 5] {
        [self.player, self.enemy, self.coin, self.projectile, self.tree]
    }
}

/// Registers every demo component type.
pub fn register_components(world: &mut World) {
    world.register_component::<Position>();
    world.register_component::<Velocity>();
    world.register_component::<Sprite>();
    world.register_component::<Health>();
    world.register_component::<PlayerControlled>();
    world.register_component::<AiControlled>();
    world.register_component::<Damage>();
    world.register_component::<Lifetime>();
    world.register_component::<Collectible>();
    world.register_component::<Collider>();
}

/// Spawns the starting entities.
pub fn populate(world: &mut World) -> Scene {
    let scene = Scene {
        player: spawn_player(world),
        enemy: spawn_enemy(world),
        coin: spawn_coin(world),
        projectile: spawn_projectile(world),
        tree: spawn_tree(world),
    };
    info!(entities = world.living_entity_count(), "scene populated");
    scene
}

/// A player that moves along a figure eight.
pub fn spawn_player(world: &mut World) -> Entity {
    let entity = world.create_entity();
    world.add_component(entity, Position::new(100.0, 100.0));
    world.add_component(entity, Velocity::ZERO);
    world.add_component(entity, Sprite::new("player.png", 32.0, 32.0));
    world.add_component(entity, Health::full(100));
    world.add_component(entity, PlayerControlled { move_speed: 80.0 });
    world.add_component(entity, Collider::solid(16.0));
    info!(%entity, "spawned player");
    entity
}

/// An enemy that patrols around its spawn point and hurts on contact.
pub fn spawn_enemy(world: &mut World) -> Entity {
    let home = Vec2::new(200.0, 150.0);
    let entity = world.create_entity();
    world.add_component(entity, Position(home));
    world.add_component(entity, Velocity::ZERO);
    world.add_component(entity, Sprite::new("enemy.png", 24.0, 24.0));
    world.add_component(entity, Health::full(50));
    world.add_component(
        entity,
        AiControlled {
            patrol_range: 100.0,
            home,
        },
    );
    world.add_component(entity, Collider::solid(12.0));
    world.add_component(
        entity,
        Damage {
            amount: 25,
            destroy_on_hit: false,
        },
    );
    info!(%entity, "spawned enemy");
    entity
}

/// A coin worth points to whichever player touches it.
pub fn spawn_coin(world: &mut World) -> Entity {
    let entity = world.create_entity();
    world.add_component(entity, Position::new(150.0, 200.0));
    world.add_component(entity, Sprite::new("coin.png", 16.0, 16.0));
    world.add_component(
        entity,
        Collectible {
            score: 50,
            pickup_sound: "coin_pickup.wav".to_string(),
        },
    );
    world.add_component(entity, Collider::trigger(8.0));
    info!(%entity, "spawned coin");
    entity
}

/// A short-lived projectile that damages what it hits.
pub fn spawn_projectile(world: &mut World) -> Entity {
    let entity = world.create_entity();
    world.add_component(entity, Position::new(80.0, 80.0));
    world.add_component(entity, Velocity::new(120.0, 60.0));
    world.add_component(entity, Sprite::new("bullet.png", 8.0, 8.0));
    world.add_component(
        entity,
        Damage {
            amount: 15,
            destroy_on_hit: true,
        },
    );
    world.add_component(entity, Lifetime { remaining: 3.0 });
    world.add_component(entity, Collider::solid(4.0));
    info!(%entity, "spawned projectile");
    entity
}

/// Static decoration. Only the renderer looks at it.
pub fn spawn_tree(world: &mut World) -> Entity {
    let entity = world.create_entity();
    world.add_component(entity, Position::new(300.0, 250.0));
    world.add_component(entity, Sprite::new("tree.png", 48.0, 64.0));
    info!(%entity, "spawned tree");
    entity
}
