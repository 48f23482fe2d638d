use rand::Rng;

use crate::component::{Component, Context};
use crate::components::Transform;
use crate::draw::Color;
use crate::timer::Timer;

/// Draws the sibling [`Transform`] as a filled rectangle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxRenderer {
    pub color: Color,
}

impl BoxRenderer {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Component for BoxRenderer {
    fn update(&mut self, ctx: &mut Context<'_, '_>) {
        let Some(transform) = ctx.entity.get::<Transform>() else {
            return;
        };
        ctx.frame
            .draw
            .fill_rect(transform.position, transform.size, self.color);
    }
}

/// Re-rolls the sibling [`BoxRenderer`]'s rgb every frame, alpha untouched
#[derive(Clone, Copy, Debug, Default)]
pub struct Flasher;

impl Component for Flasher {
    fn update(&mut self, ctx: &mut Context<'_, '_>) {
        let Some(renderer) = ctx.entity.get_mut::<BoxRenderer>() else {
            return;
        };
        let mut rng = rand::rng();
        for channel in &mut renderer.color[..3] {
            *channel = rng.random_range(0.0..=1.0);
        }
    }
}

/// Ramps the sibling [`BoxRenderer`]'s alpha down to zero, then kills the entity
#[derive(Clone, Copy, Debug)]
pub struct Fader {
    timer: Timer,
    start_alpha: f32,
}

impl Fader {
    pub fn new(duration: f32) -> Self {
        Self {
            timer: Timer::once(duration),
            start_alpha: 1.0,
        }
    }

    pub fn percent_complete(&self) -> f32 {
        self.timer.percent_complete()
    }
}

impl Component for Fader {
    fn start(&mut self, ctx: &mut Context<'_, '_>) {
        if let Some(renderer) = ctx.entity.get::<BoxRenderer>() {
            self.start_alpha = renderer.color[3];
        }
    }

    fn update(&mut self, ctx: &mut Context<'_, '_>) {
        if self.timer.update(ctx.dt()) {
            ctx.kill();
            return;
        }

        let alpha = self.start_alpha * (1.0 - self.timer.percent_complete());
        if let Some(renderer) = ctx.entity.get_mut::<BoxRenderer>() {
            renderer.color[3] = alpha;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawCommand, WHITE};
    use crate::entity::Entity;
    use crate::scene::Scene;
    use crate::testing::Harness;
    use approx::assert_relative_eq;

    #[test]
    fn box_renderer_draws_its_transform() {
        let mut scene = Scene::new();
        let mut harness = Harness::new();
        scene.add_entity(
            Entity::new()
                .with(Transform::new([1.0, 2.0], [3.0, 4.0]))
                .with(BoxRenderer::new(WHITE)),
        );

        harness.pass(&mut scene, 0.1);

        let commands: Vec<_> = harness.draw.commands().cloned().collect();
        assert_eq!(
            commands,
            vec![DrawCommand::Rect {
                position: [1.0, 2.0],
                size: [3.0, 4.0],
                color: WHITE,
            }]
        );
    }

    #[test]
    fn box_renderer_without_transform_draws_nothing() {
        let mut scene = Scene::new();
        let mut harness = Harness::new();
        scene.add_entity(Entity::new().with(BoxRenderer::new(WHITE)));

        harness.pass(&mut scene, 0.1);

        assert_eq!(harness.draw.rect_count(), 0);
    }

    #[test]
    fn flasher_keeps_alpha_and_stays_in_range() {
        let mut scene = Scene::new();
        let id = scene.add_entity(
            Entity::new()
                .with(BoxRenderer::new([0.0, 0.0, 0.0, 0.25]))
                .with(Flasher),
        );

        Harness::new().passes(&mut scene, 0.1, 5);

        let color = scene.get(id).unwrap().get::<BoxRenderer>().unwrap().color;
        assert!(color[..3].iter().all(|c| (0.0..=1.0).contains(c)));
        assert_relative_eq!(color[3], 0.25);
    }

    #[test]
    fn fader_fades_then_kills() {
        let mut scene = Scene::new();
        let mut harness = Harness::new();
        let id = scene.add_entity(
            Entity::new()
                .with(Transform::new([0.0, 0.0], [1.0, 1.0]))
                .with(BoxRenderer::new([1.0, 1.0, 1.0, 0.5]))
                .with(Fader::new(1.0)),
        );

        harness.pass(&mut scene, 0.25);
        let alpha = scene.get(id).unwrap().get::<BoxRenderer>().unwrap().color[3];
        assert_relative_eq!(alpha, 0.375);

        harness.passes(&mut scene, 0.25, 2);
        assert!(scene.is_alive(id));

        harness.pass(&mut scene, 0.25);
        assert!(!scene.contains(id));
        assert!(scene.is_empty());
    }
}
