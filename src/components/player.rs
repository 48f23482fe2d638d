use winit::keyboard::KeyCode;

use crate::component::{Component, Context};
use crate::components::{EntityTag, RigidBody, Transform};
use crate::draw::Color;
use crate::timer::Timer;

const UP: [KeyCode; 2] = [KeyCode::KeyW, KeyCode::ArrowUp];
const DOWN: [KeyCode; 2] = [KeyCode::KeyS, KeyCode::ArrowDown];
const LEFT: [KeyCode; 2] = [KeyCode::KeyA, KeyCode::ArrowLeft];
const RIGHT: [KeyCode; 2] = [KeyCode::KeyD, KeyCode::ArrowRight];

/// Steers the sibling [`RigidBody`] from the held movement keys
#[derive(Clone, Copy, Debug)]
pub struct PlayerControlled {
    pub speed: f32,
}

impl PlayerControlled {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }
}

impl Component for PlayerControlled {
    fn update(&mut self, ctx: &mut Context<'_, '_>) {
        let input = ctx.frame.input;
        let axis = |negative: &[KeyCode], positive: &[KeyCode]| {
            f32::from(input.any_held(positive)) - f32::from(input.any_held(negative))
        };
        let mut direction = [axis(&LEFT, &RIGHT), axis(&UP, &DOWN)];

        let length = (direction[0] * direction[0] + direction[1] * direction[1]).sqrt();
        if length > 0.0 {
            direction = [direction[0] / length, direction[1] / length];
        }

        if let Some(body) = ctx.entity.get_mut::<RigidBody>() {
            body.velocity = [direction[0] * self.speed, direction[1] * self.speed];
        }
    }
}

/// Hit points with a grace period after each hit
#[derive(Clone, Copy, Debug)]
pub struct Health {
    pub current: u32,
    pub max: u32,
    grace: f32,
    invulnerable: Option<Timer>,
}

impl Health {
    pub fn new(max: u32, grace: f32) -> Self {
        Self {
            current: max,
            max,
            grace,
            invulnerable: None,
        }
    }

    /// Applies the hit unless still invulnerable from the previous one
    pub fn damage(&mut self, amount: u32) -> bool {
        if self.is_invulnerable() || self.is_dead() {
            return false;
        }

        self.current = self.current.saturating_sub(amount);
        if self.grace > 0.0 {
            self.invulnerable = Some(Timer::once(self.grace));
        }
        true
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable.is_some()
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }

    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }
}

impl Component for Health {
    fn update(&mut self, ctx: &mut Context<'_, '_>) {
        if let Some(timer) = &mut self.invulnerable {
            if timer.update(ctx.dt()) {
                self.invulnerable = None;
            }
        }
    }
}

/// Draws the sibling [`Health`] as a bar above the entity's box
#[derive(Clone, Copy, Debug)]
pub struct HealthBar {
    pub height: f32,
    pub gap: f32,
    pub fill: Color,
    pub back: Color,
}

impl Default for HealthBar {
    fn default() -> Self {
        Self {
            height: 6.0,
            gap: 4.0,
            fill: [0.2, 0.9, 0.3, 1.0],
            back: [0.3, 0.3, 0.3, 0.8],
        }
    }
}

impl Component for HealthBar {
    fn update(&mut self, ctx: &mut Context<'_, '_>) {
        let (Some(transform), Some(health)) =
            (ctx.entity.get::<Transform>(), ctx.entity.get::<Health>())
        else {
            return;
        };

        let position = [
            transform.position[0],
            transform.position[1] - self.gap - self.height,
        ];
        let width = transform.size[0];
        let fill = width * health.fraction();

        let draw = &mut *ctx.frame.draw;
        draw.fill_rect(position, [width, self.height], self.back);
        if fill > 0.0 {
            draw.fill_rect(position, [fill, self.height], self.fill);
        }
    }
}

/// Damages the sibling [`Health`] whenever the entity overlaps an entity
/// tagged [`EntityTag::Enemy`]
#[derive(Clone, Copy, Debug)]
pub struct HazardContact {
    pub damage: u32,
    hits: u32,
}

impl HazardContact {
    pub fn new(damage: u32) -> Self {
        Self { damage, hits: 0 }
    }

    /// Hits that actually cost health
    pub fn hits(&self) -> u32 {
        self.hits
    }
}

impl Default for HazardContact {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Component for HazardContact {
    fn update(&mut self, ctx: &mut Context<'_, '_>) {
        let Some(own) = ctx.entity.get::<Transform>().copied() else {
            return;
        };

        let touching = ctx.scene.iter().any(|(_, other)| {
            other.get::<EntityTag>() == Some(&EntityTag::Enemy)
                && other
                    .get::<Transform>()
                    .is_some_and(|transform| own.overlaps(transform))
        });
        if !touching {
            return;
        }

        let id = ctx.id();
        if let Some(health) = ctx.entity.get_mut::<Health>() {
            if health.damage(self.damage) {
                self.hits += 1;
                log::debug!("{id:?} hit, {} health left", health.current);
            }
        }
    }
}
