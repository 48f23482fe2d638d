//! Boundary policies. All of them work against the logical playfield
//! (`frame.bounds`) and need a sibling [`Transform`].

use rand::Rng;

use crate::component::{Component, Context};
use crate::components::{RigidBody, Transform};

/// Which side of the playfield an [`EdgeSpawner`] entered from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Unit direction pointing into the playfield
    pub fn inward(self) -> [f32; 2] {
        match self {
            Edge::Top => [0.0, 1.0],
            Edge::Bottom => [0.0, -1.0],
            Edge::Left => [1.0, 0.0],
            Edge::Right => [-1.0, 0.0],
        }
    }
}

/// On start, places the entity just outside a random edge, at a random spot
/// along it, and sends it inward at a random speed
#[derive(Clone, Copy, Debug)]
pub struct EdgeSpawner {
    pub speed: (f32, f32),
    edge: Option<Edge>,
}

impl EdgeSpawner {
    pub fn new(min_speed: f32, max_speed: f32) -> Self {
        Self {
            speed: (min_speed, max_speed),
            edge: None,
        }
    }

    /// Edge picked on start
    pub fn edge(&self) -> Option<Edge> {
        self.edge
    }
}

impl Component for EdgeSpawner {
    fn start(&mut self, ctx: &mut Context<'_, '_>) {
        let [width, height] = ctx.bounds();
        let mut rng = rand::rng();

        let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];
        let speed = rng.random_range(self.speed.0..=self.speed.1);
        self.edge = Some(edge);

        let Some(transform) = ctx.entity.get_mut::<Transform>() else {
            return;
        };
        let [w, h] = transform.size;
        let mut position = [
            rng.random_range(-w..=width),
            rng.random_range(-h..=height),
        ];
        match edge {
            Edge::Top => position[1] = -h,
            Edge::Bottom => position[1] = height,
            Edge::Left => position[0] = -w,
            Edge::Right => position[0] = width,
        }
        transform.position = position;

        let [dx, dy] = edge.inward();
        if let Some(body) = ctx.entity.get_mut::<RigidBody>() {
            body.velocity = [dx * speed, dy * speed];
        }
    }
}

/// Keeps the entity inside the playfield, reflecting its velocity off the walls
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeBouncer;

impl Component for EdgeBouncer {
    fn update(&mut self, ctx: &mut Context<'_, '_>) {
        let bounds = ctx.bounds();
        let Some(transform) = ctx.entity.get_mut::<Transform>() else {
            return;
        };

        let mut flip = [false, false];
        for axis in 0..2 {
            let max = bounds[axis] - transform.size[axis];
            if transform.position[axis] > max {
                transform.position[axis] = max;
                flip[axis] = true;
            }
            if transform.position[axis] < 0.0 {
                transform.position[axis] = 0.0;
                flip[axis] = true;
            }
        }

        if let Some(body) = ctx.entity.get_mut::<RigidBody>() {
            for axis in 0..2 {
                if flip[axis] {
                    body.velocity[axis] = -body.velocity[axis];
                }
            }
        }
    }
}

/// Keeps the entity inside the playfield, velocity untouched
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeClamper;

impl Component for EdgeClamper {
    fn update(&mut self, ctx: &mut Context<'_, '_>) {
        let bounds = ctx.bounds();
        let Some(transform) = ctx.entity.get_mut::<Transform>() else {
            return;
        };
        for axis in 0..2 {
            let max = (bounds[axis] - transform.size[axis]).max(0.0);
            transform.position[axis] = transform.position[axis].clamp(0.0, max);
        }
    }
}

/// Kills the entity once it is more than `margin` sizes outside the playfield
#[derive(Clone, Copy, Debug)]
pub struct EdgeKiller {
    pub margin: f32,
}

impl EdgeKiller {
    pub fn new(margin: f32) -> Self {
        Self { margin }
    }
}

impl Default for EdgeKiller {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl Component for EdgeKiller {
    fn update(&mut self, ctx: &mut Context<'_, '_>) {
        let bounds = ctx.bounds();
        let Some(transform) = ctx.entity.get::<Transform>() else {
            return;
        };

        let outside = (0..2).any(|axis| {
            let slack = transform.size[axis] * self.margin;
            transform.position[axis] > bounds[axis] + slack
                || transform.position[axis] < -slack
        });

        if outside {
            ctx.kill();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::scene::Scene;
    use crate::testing::Harness;
    use approx::assert_relative_eq;

    #[test]
    fn spawner_starts_outside_moving_in() {
        for _ in 0..32 {
            let mut scene = Scene::new();
            let id = scene.add_entity(
                Entity::new()
                    .with(Transform::new([0.0, 0.0], [32.0, 32.0]))
                    .with(RigidBody::default())
                    .with(EdgeSpawner::new(300.0, 600.0)),
            );

            // zero dt so only `start` has an observable effect
            Harness::with_bounds([1280.0, 720.0]).pass(&mut scene, 0.0);

            let entity = scene.get(id).unwrap();
            let spawner = entity.get::<EdgeSpawner>().unwrap();
            let position = entity.get::<Transform>().unwrap().position;
            let body = entity.get::<RigidBody>().unwrap();

            assert!((300.0..=600.0).contains(&body.speed()), "speed {}", body.speed());
            match spawner.edge().unwrap() {
                Edge::Top => assert_relative_eq!(position[1], -32.0),
                Edge::Bottom => assert_relative_eq!(position[1], 720.0),
                Edge::Left => assert_relative_eq!(position[0], -32.0),
                Edge::Right => assert_relative_eq!(position[0], 1280.0),
            }
        }
    }

    #[test]
    fn bouncer_reflects_off_walls() {
        let mut scene = Scene::new();
        let id = scene.add_entity(
            Entity::new()
                .with(Transform::new([95.0, 50.0], [10.0, 10.0]))
                .with(RigidBody::new([10.0, -3.0]))
                .with(EdgeBouncer),
        );

        Harness::with_bounds([100.0, 100.0]).pass(&mut scene, 1.0);

        let entity = scene.get(id).unwrap();
        assert_eq!(entity.get::<Transform>().unwrap().position, [90.0, 47.0]);
        assert_eq!(entity.get::<RigidBody>().unwrap().velocity, [-10.0, -3.0]);
    }

    #[test]
    fn bouncer_without_body_only_clamps() {
        let mut scene = Scene::new();
        let id = scene.add_entity(
            Entity::new()
                .with(Transform::new([-5.0, 10.0], [10.0, 10.0]))
                .with(EdgeBouncer),
        );

        Harness::with_bounds([100.0, 100.0]).passes(&mut scene, 1.0, 3);

        let position = scene.get(id).unwrap().get::<Transform>().unwrap().position;
        assert_eq!(position, [0.0, 10.0]);
    }

    #[test]
    fn clamper_keeps_velocity() {
        let mut scene = Scene::new();
        let id = scene.add_entity(
            Entity::new()
                .with(Transform::new([0.0, 0.0], [10.0, 10.0]))
                .with(RigidBody::new([0.0, 500.0]))
                .with(EdgeClamper),
        );

        Harness::with_bounds([100.0, 100.0]).pass(&mut scene, 1.0);

        let entity = scene.get(id).unwrap();
        assert_eq!(entity.get::<Transform>().unwrap().position, [0.0, 90.0]);
        assert_eq!(entity.get::<RigidBody>().unwrap().velocity, [0.0, 500.0]);
    }

    #[test]
    fn killer_kills_far_outside_only() {
        let mut scene = Scene::new();
        let near = scene.add_entity(
            Entity::new()
                .with(Transform::new([-15.0, 0.0], [10.0, 10.0]))
                .with(EdgeKiller::default()),
        );
        let far = scene.add_entity(
            Entity::new()
                .with(Transform::new([0.0, 121.0], [10.0, 10.0]))
                .with(EdgeKiller::default()),
        );

        Harness::with_bounds([100.0, 100.0]).pass(&mut scene, 0.1);

        assert!(scene.is_alive(near));
        assert!(!scene.contains(far));
    }
}
