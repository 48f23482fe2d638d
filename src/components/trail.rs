use crate::component::{Component, Context};
use crate::components::{BoxRenderer, EntityTag, Fader, Transform};
use crate::entity::Entity;
use crate::timer::Timer;

/// Every `interval` seconds, leaves a copy of the entity's box behind that
/// fades out over `lifetime` seconds
#[derive(Clone, Copy, Debug)]
pub struct TrailSpawner {
    timer: Timer,
    lifetime: f32,
}

impl TrailSpawner {
    pub fn new(interval: f32, lifetime: f32) -> Self {
        Self {
            timer: Timer::repeating(interval),
            lifetime,
        }
    }

    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }
}

impl Component for TrailSpawner {
    fn update(&mut self, ctx: &mut Context<'_, '_>) {
        if !self.timer.update(ctx.dt()) {
            return;
        }

        let (Some(transform), Some(renderer)) = (
            ctx.entity.get::<Transform>().copied(),
            ctx.entity.get::<BoxRenderer>().copied(),
        ) else {
            return;
        };

        ctx.scene.add_entity(
            Entity::new()
                .with(transform)
                .with(renderer)
                .with(Fader::new(self.lifetime))
                .with(EntityTag::Trail),
        );
    }
}
