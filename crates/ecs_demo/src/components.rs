//! Component definitions for the demo scene.

use ecs_core::Component;
use glam::Vec2;

/// World-space position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec2);

impl Position {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

impl Component for Position {
    fn type_name() -> &'static str {
        "Position"
    }
}

/// Linear velocity in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec2);

impl Velocity {
    /// Zero velocity.
    pub const ZERO: Self = Self(Vec2::ZERO);

    #[must_use]
    pub fn new(dx: f32, dy: f32) -> Self {
        Self(Vec2::new(dx, dy))
    }
}

impl Component for Velocity {
    fn type_name() -> &'static str {
        "Velocity"
    }
}

/// Something to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Texture asset name.
    pub texture: String,
    /// Width and height in pixels.
    pub size: Vec2,
}

impl Sprite {
    #[must_use]
    pub fn new(texture: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            texture: texture.into(),
            size: Vec2::new(width, height),
        }
    }
}

impl Component for Sprite {
    fn type_name() -> &'static str {
        "Sprite"
    }
}

/// Hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    /// Current hit points. Can go negative.
    pub current: i32,
    /// Maximum hit points.
    pub max: i32,
}

impl Health {
    /// Create a health component at full HP.
    #[must_use]
    pub fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Returns `true` while HP is above zero.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Fraction of max HP remaining; `0.0` when max is not positive.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max > 0 {
            self.current as f32 / self.max as f32
        } else {
            0.0
        }
    }

    /// Subtract `amount` from current HP.
    pub fn damage(&mut self, amount: i32) {
        self.current -= amount;
    }
}

impl Component for Health {
    fn type_name() -> &'static str {
        "Health"
    }
}

/// Marks an entity as driven by (simulated) player input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerControlled {
    pub move_speed: f32,
}

impl Default for PlayerControlled {
    fn default() -> Self {
        Self { move_speed: 100.0 }
    }
}

impl Component for PlayerControlled {
    fn type_name() -> &'static str {
        "PlayerControlled"
    }
}

/// Patrol behaviour around a home point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiControlled {
    /// Distance from home beyond which the entity heads back.
    pub patrol_range: f32,
    pub home: Vec2,
}

impl Component for AiControlled {
    fn type_name() -> &'static str {
        "AiControlled"
    }
}

/// Damage dealt on contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Damage {
    pub amount: i32,
    /// Destroy the dealer after the first hit.
    pub destroy_on_hit: bool,
}

impl Component for Damage {
    fn type_name() -> &'static str {
        "Damage"
    }
}

/// Seconds left before the entity is removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    pub remaining: f32,
}

impl Lifetime {
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

impl Component for Lifetime {
    fn type_name() -> &'static str {
        "Lifetime"
    }
}

/// Picked up by players for score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collectible {
    pub score: u32,
    pub pickup_sound: String,
}

impl Component for Collectible {
    fn type_name() -> &'static str {
        "Collectible"
    }
}

/// Circle collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub radius: f32,
    /// Triggers report overlaps but do not block.
    pub is_trigger: bool,
}

impl Collider {
    #[must_use]
    pub fn solid(radius: f32) -> Self {
        Self {
            radius,
            is_trigger: false,
        }
    }

    #[must_use]
    pub fn trigger(radius: f32) -> Self {
        Self {
            radius,
            is_trigger: true,
        }
    }

    /// Returns `true` if two colliders at the given centres overlap.
    #[must_use]
    pub fn overlaps(&self, at: Vec2, other: &Collider, other_at: Vec2) -> bool {
        at.distance(other_at) < self.radius + other.radius
    }
}

impl Component for Collider {
    fn type_name() -> &'static str {
        "Collider"
    }
}
