//! Top-level application modes.

use crate::config::Config;
use crate::frame::Frame;
use crate::scene::Scene;

/// One application mode (menu, gameplay). Owns its scene and spawn timers.
///
/// `attach` builds everything the state needs, `detach` tears it down again.
/// Nothing a state owns survives a `detach`.
pub trait State {
    fn name(&self) -> &'static str;

    fn attach(&mut self, _config: &Config) {}

    fn detach(&mut self) {}

    fn update(&mut self, frame: &mut Frame<'_>);

    /// Scene to report in the stats overlay
    fn scene(&self) -> Option<&Scene> {
        None
    }

    /// Scene that deferred callbacks spawn into between passes
    fn scene_mut(&mut self) -> Option<&mut Scene> {
        None
    }
}

/// Holds the single active [`State`]. Swaps happen between ticks, queued
/// through [`Deferred`](crate::deferred::Deferred), never mid-update.
pub struct StateManager {
    state: Option<Box<dyn State>>,
    config: Config,
}

impl StateManager {
    pub fn new(config: Config) -> Self {
        Self {
            state: None,
            config,
        }
    }

    /// Detaches the current state, if any, then attaches `state`
    pub fn set_state(&mut self, mut state: Box<dyn State>) {
        if let Some(mut old) = self.state.take() {
            old.detach();
            log::info!("state {} -> {}", old.name(), state.name());
        } else {
            log::info!("state -> {}", state.name());
        }

        state.attach(&self.config);
        self.state = Some(state);
    }

    pub fn clear(&mut self) {
        if let Some(mut old) = self.state.take() {
            old.detach();
            log::info!("state {} detached", old.name());
        }
    }

    /// Forwards the tick to the active state, no-op without one
    pub fn update(&mut self, frame: &mut Frame<'_>) {
        if let Some(state) = &mut self.state {
            state.update(frame);
        }
    }

    pub fn state(&self) -> Option<&dyn State> {
        self.state.as_deref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.state.as_deref_mut().and_then(|state| state.scene_mut())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn entity_count(&self) -> usize {
        self.state()
            .and_then(|state| state.scene())
            .map_or(0, Scene::len)
    }
}
