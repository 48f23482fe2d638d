//! The `Component` trait and the context it runs with.
//!
//! Behaviour is composed, not inherited: an entity is a bag of independent
//! components, and each one reads or writes the shared data components of its
//! siblings (`Transform`, `RigidBody`, `BoxRenderer`, ...) through
//! [`Context::entity`]. A component whose sibling is missing simply does
//! nothing that frame.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::entity::Entity;
use crate::frame::Frame;
use crate::scene::{EntityId, Scene};

/// Type-erasure helpers, implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Per-entity unit of data and behaviour.
///
/// `start` runs once, on the first frame the component is live, before any
/// `update`. `update` runs every frame afterwards, in attachment order relative
/// to the sibling components.
pub trait Component: AsAny {
    fn start(&mut self, _ctx: &mut Context<'_, '_>) {}

    fn update(&mut self, _ctx: &mut Context<'_, '_>) {}
}

/// Storage key of a component type: one slot per concrete type per entity.
#[derive(Clone, Copy)]
pub struct ComponentKey {
    id: TypeId,
    name: &'static str,
}

impl ComponentKey {
    pub fn of<T: Component>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Unqualified type name, for diagnostics
    pub fn name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl PartialEq for ComponentKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentKey {}

impl Hash for ComponentKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a running component can reach.
///
/// The component itself is lifted out of `entity` while it runs, so looking
/// up its own type through `entity` finds nothing.
pub struct Context<'a, 'f> {
    /// The owning entity, for sibling lookups
    pub entity: &'a mut Entity,
    /// Every other entity, plus creation and kill requests
    pub scene: &'a mut Scene,
    pub frame: &'a mut Frame<'f>,
    id: EntityId,
}

impl<'a, 'f> Context<'a, 'f> {
    pub(crate) fn new(
        id: EntityId,
        entity: &'a mut Entity,
        scene: &'a mut Scene,
        frame: &'a mut Frame<'f>,
    ) -> Self {
        Self {
            entity,
            scene,
            frame,
            id,
        }
    }

    /// Handle of the owning entity
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn dt(&self) -> f32 {
        self.frame.dt
    }

    pub fn bounds(&self) -> [f32; 2] {
        self.frame.bounds
    }

    /// Kill the owning entity. Its remaining components are skipped this
    /// frame and it is gone from the scene once the pass ends.
    pub fn kill(&mut self) {
        self.scene.kill(self.id);
    }
}
