//! Demo systems.
//!
//! Systems run in the order they are registered in [`register_all`]. A
//! system that can destroy an entity other than the one in hand checks
//! [`World::is_alive`] before touching later entries of its snapshot.

use ecs_core::Entity;
use ecs_world::{System, World};
use glam::Vec2;
use tracing::info;

use crate::components::{
    AiControlled, Collectible, Collider, Damage, Health, Lifetime, PlayerControlled, Position,
    Sprite, Velocity,
};

/// Seconds between render reports.
const RENDER_INTERVAL: f32 = 2.0;
/// Seconds between collision reports.
const COLLISION_REPORT_INTERVAL: f32 = 1.0;
/// Speed at which an AI heads back home.
const AI_RETURN_SPEED: f32 = 50.0;
/// Speed of AI patrol movement.
const AI_PATROL_SPEED: f32 = 30.0;

/// Registers every demo system with its component requirement.
pub fn register_all(world: &mut World) {
    world.register_system::<(Position, Velocity), _>(Movement);
    world.register_system::<(Position, Sprite), _>(Render::default());
    world.register_system::<(Position, Velocity, PlayerControlled), _>(PlayerInput::default());
    world.register_system::<(Position, Velocity, AiControlled), _>(Ai::default());
    world.register_system::<(Health,), _>(Vitals::default());
    world.register_system::<(Lifetime,), _>(Expiry::default());
    world.register_system::<(Position, Collider), _>(Collision::default());
}

/// Integrates velocity into position.
pub struct Movement;

impl System for Movement {
    fn tick(&mut self, world: &mut World, entities: &[Entity], dt: f32) {
        for &entity in entities {
            let velocity = world.get_component::<Velocity>(entity).0;
            world.get_component_mut::<Position>(entity).0 += velocity * dt;
        }
    }

    fn name(&self) -> &'static str {
        "movement"
    }
}

/// Reports what would be drawn, every [`RENDER_INTERVAL`] seconds.
#[derive(Debug, Default)]
pub struct Render {
    elapsed: f32,
    reports: u32,
}

impl Render {
    /// Number of render reports emitted so far.
    #[must_use]
    pub fn reports(&self) -> u32 {
        self.reports
    }
}

impl System for Render {
    fn tick(&mut self, world: &mut World, entities: &[Entity], dt: f32) {
        self.elapsed += dt;
        if self.elapsed < RENDER_INTERVAL {
            return;
        }
        self.elapsed = 0.0;
        self.reports += 1;

        for &entity in entities {
            let position = world.get_component::<Position>(entity).0;
            let sprite = world.get_component::<Sprite>(entity);
            info!(
                %entity,
                texture = %sprite.texture,
                x = position.x,
                y = position.y,
                width = sprite.size.x,
                height = sprite.size.y,
                "rendering"
            );
        }
    }

    fn name(&self) -> &'static str {
        "render"
    }
}

/// Simulated input: steers players along a figure eight.
#[derive(Debug, Default)]
pub struct PlayerInput {
    time: f32,
}

impl System for PlayerInput {
    fn tick(&mut self, world: &mut World, entities: &[Entity], dt: f32) {
        self.time += dt;
        let t = self.time;
        for &entity in entities {
            let speed = world.get_component::<PlayerControlled>(entity).move_speed;
            world.get_component_mut::<Velocity>(entity).0 =
                Vec2::new(t.sin() * speed, (t * 2.0).sin() * speed * 0.5);
        }
    }

    fn name(&self) -> &'static str {
        "player_input"
    }
}

/// Patrols near home and heads back when too far away.
#[derive(Debug, Default)]
pub struct Ai {
    time: f32,
}

impl System for Ai {
    fn tick(&mut self, world: &mut World, entities: &[Entity], dt: f32) {
        self.time += dt;
        for &entity in entities {
            let position = world.get_component::<Position>(entity).0;
            let ai = *world.get_component::<AiControlled>(entity);

            let offset = position - ai.home;
            let distance = offset.length();
            let velocity = if distance > ai.patrol_range {
                -offset / distance * AI_RETURN_SPEED
            } else {
                // Entity id offsets the phase so patrols don't move in sync.
                let phase = entity.id() as f32;
                Vec2::new(
                    (self.time + phase).cos(),
                    (self.time * 0.7 + phase).sin(),
                ) * AI_PATROL_SPEED
            };
            world.get_component_mut::<Velocity>(entity).0 = velocity;
        }
    }

    fn name(&self) -> &'static str {
        "ai"
    }
}

/// Removes entities whose health dropped to zero.
#[derive(Debug, Default)]
pub struct Vitals {
    deaths: u32,
}

impl Vitals {
    #[must_use]
    pub fn deaths(&self) -> u32 {
        self.deaths
    }
}

impl System for Vitals {
    fn tick(&mut self, world: &mut World, entities: &[Entity], _dt: f32) {
        for &entity in entities {
            if world.get_component::<Health>(entity).is_alive() {
                continue;
            }
            info!(%entity, "entity died");
            world.destroy_entity(entity);
            self.deaths += 1;
        }
    }

    fn name(&self) -> &'static str {
        "health"
    }
}

/// Counts lifetimes down and removes expired entities.
#[derive(Debug, Default)]
pub struct Expiry {
    expired: u32,
}

impl Expiry {
    #[must_use]
    pub fn expired(&self) -> u32 {
        self.expired
    }
}

impl System for Expiry {
    fn tick(&mut self, world: &mut World, entities: &[Entity], dt: f32) {
        for &entity in entities {
            let lifetime = world.get_component_mut::<Lifetime>(entity);
            lifetime.remaining -= dt;
            if lifetime.is_expired() {
                info!(%entity, "lifetime expired");
                world.destroy_entity(entity);
                self.expired += 1;
            }
        }
    }

    fn name(&self) -> &'static str {
        "lifetime"
    }
}

/// Pairwise circle overlap, damage and pickups.
#[derive(Debug, Default)]
pub struct Collision {
    clock: f32,
    last_report: Option<f32>,
    score: u32,
    hits: u32,
}

impl Collision {
    /// Total score collected by players.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of damage hits applied.
    #[must_use]
    pub fn hits(&self) -> u32 {
        self.hits
    }

    /// Applies what `source` does to `target` on contact.
    fn resolve(&mut self, world: &mut World, source: Entity, target: Entity) {
        if !world.is_alive(source) || !world.is_alive(target) {
            return;
        }

        if world.has_component::<Damage>(source) && world.has_component::<Health>(target) {
            let damage = *world.get_component::<Damage>(source);
            let health = world.get_component_mut::<Health>(target);
            health.damage(damage.amount);
            info!(
                %target,
                amount = damage.amount,
                current = health.current,
                max = health.max,
                fraction = health.fraction(),
                "took damage"
            );
            self.hits += 1;
            if damage.destroy_on_hit {
                world.destroy_entity(source);
                return;
            }
        }

        if world.has_component::<Collectible>(source)
            && world.has_component::<PlayerControlled>(target)
        {
            let item = world.get_component::<Collectible>(source);
            info!(score = item.score, sound = %item.pickup_sound, "player collected item");
            self.score += item.score;
            world.destroy_entity(source);
        }
    }
}

impl System for Collision {
    fn tick(&mut self, world: &mut World, entities: &[Entity], dt: f32) {
        self.clock += dt;

        for (i, &a) in entities.iter().enumerate() {
            for &b in &entities[i + 1..] {
                if !world.is_alive(a) || !world.is_alive(b) {
                    continue;
                }
                let a_at = world.get_component::<Position>(a).0;
                let b_at = world.get_component::<Position>(b).0;
                let a_collider = world.get_component::<Collider>(a);
                let b_collider = world.get_component::<Collider>(b);
                if !a_collider.overlaps(a_at, b_collider, b_at) {
                    continue;
                }

                let quiet = self
                    .last_report
                    .is_some_and(|last| self.clock - last <= COLLISION_REPORT_INTERVAL);
                if !quiet {
                    let trigger = a_collider.is_trigger || b_collider.is_trigger;
                    info!(%a, %b, trigger, "collision detected");
                    self.last_report = Some(self.clock);
                }

                self.resolve(world, a, b);
                self.resolve(world, b, a);
            }
        }
    }

    fn name(&self) -> &'static str {
        "collision"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene;

    fn world() -> World {
        let mut world = World::new();
        scene::register_components(&mut world);
        world
    }

    #[test]
    fn test_register_all_order() {
        let mut world = world();
        register_all(&mut world);
        let names: Vec<_> = world.systems().names().collect();
        assert_eq!(
            names,
            vec!["movement", "render", "player_input", "ai", "health", "lifetime", "collision"]
        );
    }

    #[test]
    fn test_movement() {
        let mut world = world();
        world.register_system::<(Position, Velocity), _>(Movement);
        let e = world.create_entity();
        world.add_component(e, Position::new(1.0, 1.0));
        world.add_component(e, Velocity::new(4.0, -2.0));

        world.tick(0.25);
        assert_eq!(world.get_component::<Position>(e), &Position::new(2.0, 0.5));
    }

    #[test]
    fn test_render_reports_on_interval() {
        let mut world = world();
        world.register_system::<(Position, Sprite), _>(Render::default());
        let e = world.create_entity();
        world.add_component(e, Position::new(0.0, 0.0));
        world.add_component(e, Sprite::new("tree.png", 48.0, 64.0));

        world.tick(1.5);
        assert_eq!(world.system::<Render>().unwrap().reports(), 0);
        world.tick(0.5);
        assert_eq!(world.system::<Render>().unwrap().reports(), 1);
    }

    #[test]
    fn test_player_input_sets_velocity() {
        let mut world = world();
        world.register_system::<(Position, Velocity, PlayerControlled), _>(PlayerInput::default());
        let e = world.create_entity();
        world.add_component(e, Position::new(0.0, 0.0));
        world.add_component(e, Velocity::ZERO);
        world.add_component(e, PlayerControlled { move_speed: 80.0 });

        world.tick(1.0);
        let velocity = world.get_component::<Velocity>(e).0;
        assert!((velocity.x - 1.0f32.sin() * 80.0).abs() < 1e-4);
        assert!((velocity.y - 2.0f32.sin() * 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_ai_returns_home_when_out_of_range() {
        let mut world = world();
        world.register_system::<(Position, Velocity, AiControlled), _>(Ai::default());
        let e = world.create_entity();
        world.add_component(e, Position::new(300.0, 0.0));
        world.add_component(e, Velocity::ZERO);
        world.add_component(
            e,
            AiControlled {
                patrol_range: 100.0,
                home: Vec2::ZERO,
            },
        );

        world.tick(0.1);
        assert_eq!(world.get_component::<Velocity>(e), &Velocity::new(-50.0, 0.0));
    }

    #[test]
    fn test_vitals_removes_all_dead() {
        let mut world = world();
        world.register_system::<(Health,), _>(Vitals::default());
        let dead: Vec<_> = (0..3)
            .map(|_| {
                let e = world.create_entity();
                world.add_component(e, Health { current: 0, max: 10 });
                e
            })
            .collect();
        let alive = world.create_entity();
        world.add_component(alive, Health::full(10));

        world.tick(0.0);
        assert!(dead.iter().all(|&e| !world.is_alive(e)));
        assert!(world.is_alive(alive));
        assert_eq!(world.system::<Vitals>().unwrap().deaths(), 3);
    }

    #[test]
    fn test_expiry_counts_down() {
        let mut world = world();
        world.register_system::<(Lifetime,), _>(Expiry::default());
        let e = world.create_entity();
        world.add_component(e, Lifetime { remaining: 1.0 });

        world.tick(0.6);
        assert!(world.is_alive(e));
        world.tick(0.6);
        assert!(!world.is_alive(e));
        assert_eq!(world.system::<Expiry>().unwrap().expired(), 1);
    }

    #[test]
    fn test_projectile_hits_and_is_consumed() {
        let mut world = world();
        world.register_system::<(Position, Collider), _>(Collision::default());

        let target = world.create_entity();
        world.add_component(target, Position::new(0.0, 0.0));
        world.add_component(target, Collider::solid(12.0));
        world.add_component(target, Health::full(50));
        let bullet = world.create_entity();
        world.add_component(bullet, Position::new(10.0, 0.0));
        world.add_component(bullet, Collider::solid(4.0));
        world.add_component(
            bullet,
            Damage {
                amount: 15,
                destroy_on_hit: true,
            },
        );

        world.tick(0.016);
        assert!(!world.is_alive(bullet));
        assert_eq!(world.get_component::<Health>(target).current, 35);
        assert_eq!(world.system::<Collision>().unwrap().hits(), 1);
    }

    #[test]
    fn test_player_collects_coin() {
        let mut world = world();
        world.register_system::<(Position, Collider), _>(Collision::default());

        let player = world.create_entity();
        world.add_component(player, Position::new(0.0, 0.0));
        world.add_component(player, Collider::solid(16.0));
        world.add_component(player, PlayerControlled::default());
        let coin = world.create_entity();
        world.add_component(coin, Position::new(5.0, 5.0));
        world.add_component(coin, Collider::trigger(8.0));
        world.add_component(
            coin,
            Collectible {
                score: 50,
                pickup_sound: "coin_pickup.wav".into(),
            },
        );
        let far = world.create_entity();
        world.add_component(far, Position::new(500.0, 500.0));
        world.add_component(far, Collider::solid(8.0));

        world.tick(0.016);
        assert!(world.is_alive(player));
        assert!(!world.is_alive(coin));
        assert!(world.is_alive(far));
        assert_eq!(world.system::<Collision>().unwrap().score(), 50);
    }
}
