//! Platform-free application core: the state machine plus its deferred queue.
//!
//! The binary owns the window, clock and renderer and hands `Game` one delta,
//! one input snapshot and one draw list per tick. Tests drive it the same way.

use crate::config::Config;
use crate::deferred::Deferred;
use crate::draw::DrawList;
use crate::frame::Frame;
use crate::scene::Scene;
use crate::state::{State, StateManager};
use crate::states::MenuState;
use crate::systems::Input;

pub struct Game {
    states: StateManager,
    later: Deferred,
    running: bool,
}

impl Game {
    /// Starts in the menu, attached on the first tick
    pub fn new(config: Config) -> Self {
        let later = Deferred::new();
        later.invoke_later(|game| game.set_state(Box::new(MenuState::new())));

        Self {
            states: StateManager::new(config),
            later,
            running: true,
        }
    }

    /// One tick. Deferred work queued before or during the state update runs
    /// outside of it, on either side.
    pub fn update(&mut self, dt: f32, input: &Input, draw: &mut DrawList) {
        self.run_deferred();
        if !self.running {
            return;
        }

        let bounds = self.states.config().reference_size;
        draw.begin_frame(bounds);
        let mut frame = Frame::new(dt, input, draw, &self.later, bounds);
        self.states.update(&mut frame);
        draw.end_frame();

        self.run_deferred();
    }

    fn run_deferred(&mut self) {
        for callback in self.later.drain() {
            callback(self);
        }
    }

    pub fn set_state(&mut self, state: Box<dyn State>) {
        self.states.set_state(state);
    }

    pub fn stop(&mut self) {
        if self.running {
            log::info!("stopping");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn states(&self) -> &StateManager {
        &self.states
    }

    pub fn states_mut(&mut self) -> &mut StateManager {
        &mut self.states
    }

    /// Queue shared with every frame, cloneable for other threads
    pub fn later(&self) -> &Deferred {
        &self.later
    }

    /// Active state's scene, for callbacks that spawn from outside a pass
    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.states.scene_mut()
    }

    pub fn config(&self) -> &Config {
        self.states.config()
    }

    pub fn entity_count(&self) -> usize {
        self.states.entity_count()
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.states.clear();
    }
}
