use crate::component::{Component, Context};

/// Axis-aligned box in logical coordinates, origin at the top-left corner
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: [f32; 2],
    pub size: [f32; 2],
}

impl Transform {
    pub fn new(position: [f32; 2], size: [f32; 2]) -> Self {
        Self { position, size }
    }

    pub fn center(&self) -> [f32; 2] {
        [
            self.position[0] + self.size[0] * 0.5,
            self.position[1] + self.size[1] * 0.5,
        ]
    }

    /// Strict overlap, touching edges do not count
    pub fn overlaps(&self, other: &Transform) -> bool {
        self.position[0] < other.position[0] + other.size[0]
            && other.position[0] < self.position[0] + self.size[0]
            && self.position[1] < other.position[1] + other.size[1]
            && other.position[1] < self.position[1] + self.size[1]
    }
}

impl Component for Transform {}

/// Moves the sibling [`Transform`] by `velocity * dt` every frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RigidBody {
    pub velocity: [f32; 2],
}

impl RigidBody {
    pub fn new(velocity: [f32; 2]) -> Self {
        Self { velocity }
    }

    pub fn speed(&self) -> f32 {
        (self.velocity[0] * self.velocity[0] + self.velocity[1] * self.velocity[1]).sqrt()
    }
}

impl Component for RigidBody {
    fn update(&mut self, ctx: &mut Context<'_, '_>) {
        let dt = ctx.dt();
        if let Some(transform) = ctx.entity.get_mut::<Transform>() {
            transform.position[0] += self.velocity[0] * dt;
            transform.position[1] += self.velocity[1] * dt;
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
    fn rigid_body_integrates_velocity() {
        let mut scene = Scene::new();
        let id = scene.add_entity(
            Entity::new()
                .with(Transform::new([0.0, 0.0], [10.0, 10.0]))
                .with(RigidBody::new([5.0, 0.0])),
        );

        Harness::new().pass(&mut scene, 1.0);

        let transform = scene.get(id).unwrap().get::<Transform>().unwrap();
        assert_relative_eq!(transform.position[0], 5.0);
        assert_relative_eq!(transform.position[1], 0.0);
    }

    #[test]
    fn transform_without_body_stays_put() {
        let mut scene = Scene::new();
        let id = scene.add_entity(Entity::new().with(Transform::new([3.0, 4.0], [10.0, 10.0])));

        Harness::new().passes(&mut scene, 0.5, 10);

        let transform = scene.get(id).unwrap().get::<Transform>().unwrap();
        assert_eq!(transform.position, [3.0, 4.0]);
    }

    #[test]
    fn body_without_transform_is_a_no_op() {
        let mut scene = Scene::new();
        let id = scene.add_entity(Entity::new().with(RigidBody::new([1.0, 1.0])));

        Harness::new().pass(&mut scene, 1.0);

        assert!(scene.get(id).unwrap().get::<Transform>().is_none());
    }

    #[test]
    fn overlap_is_strict() {
        let a = Transform::new([0.0, 0.0], [10.0, 10.0]);
        let b = Transform::new([5.0, 5.0], [10.0, 10.0]);
        let touching = Transform::new([10.0, 0.0], [10.0, 10.0]);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&touching));
        assert_eq!(a.center(), [5.0, 5.0]);
    }
}
