//! Gameplay components shared by every state.

mod body;
mod edges;
mod player;
mod render;
mod tag;
mod trail;

pub use body::{RigidBody, Transform};
pub use edges::{Edge, EdgeBouncer, EdgeClamper, EdgeKiller, EdgeSpawner};
pub use player::{HazardContact, Health, HealthBar, PlayerControlled};
pub use render::{BoxRenderer, Fader, Flasher};
pub use tag::EntityTag;
pub use trail::TrailSpawner;
