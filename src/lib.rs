//! A small entity-component runtime and the toy game built on it.
//!
//! Everything in here is platform free. The binary in `main.rs` adds the
//! window, clock and GPU renderer around [`Game`].

pub mod component;
pub mod components;
pub mod config;
pub mod deferred;
pub mod draw;
pub mod entity;
pub mod error;
pub mod frame;
pub mod game;
pub mod scene;
pub mod state;
pub mod states;
pub mod systems;
pub mod timer;

#[cfg(test)]
mod testing;

pub use component::{Component, ComponentKey, Context};
pub use config::Config;
pub use entity::Entity;
pub use error::{EcsError, Result};
pub use frame::Frame;
pub use game::Game;
pub use scene::{EntityId, Scene};
pub use state::{State, StateManager};
pub use timer::Timer;
