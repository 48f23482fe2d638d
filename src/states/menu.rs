use rand::Rng;
use winit::keyboard::KeyCode;

use crate::components::{
    BoxRenderer, EdgeKiller, EdgeSpawner, Flasher, RigidBody, TrailSpawner, Transform,
};
use crate::config::{Config, MenuConfig};
use crate::draw::{Color, TextAlign, WHITE};
use crate::entity::Entity;
use crate::frame::Frame;
use crate::scene::Scene;
use crate::state::State;
use crate::states::PlayState;
use crate::timer::Timer;

const TITLE: &str = "WAVE";
const TITLE_SIZE: f32 = 96.0;
const ENTRY_SIZE: f32 = 40.0;
const SHADOW: Color = [0.9, 0.2, 0.4, 0.8];
const IDLE: Color = [0.6, 0.6, 0.6, 1.0];

const UP: [KeyCode; 2] = [KeyCode::KeyW, KeyCode::ArrowUp];
const DOWN: [KeyCode; 2] = [KeyCode::KeyS, KeyCode::ArrowDown];
const ACTIVATE: [KeyCode; 3] = [KeyCode::Space, KeyCode::Enter, KeyCode::NumpadEnter];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEntry {
    Play,
    Quit,
}

impl MenuEntry {
    pub const ALL: [MenuEntry; 2] = [MenuEntry::Play, MenuEntry::Quit];

    fn label(self) -> &'static str {
        match self {
            MenuEntry::Play => "Play",
            MenuEntry::Quit => "Quit",
        }
    }
}

/// Title screen over a field of flashing particles streaming in from the edges
pub struct MenuState {
    scene: Scene,
    config: MenuConfig,
    spawn: Timer,
    selected: usize,
    bounds: [f32; 2],
}

impl MenuState {
    pub fn new() -> Self {
        let config = MenuConfig::default();
        Self {
            scene: Scene::new(),
            spawn: Timer::repeating(config.particle_interval),
            config,
            selected: 0,
            bounds: Config::default().reference_size,
        }
    }

    pub fn selected(&self) -> MenuEntry {
        MenuEntry::ALL[self.selected]
    }

    fn particle(&self) -> Entity {
        let MenuConfig {
            particle_speed: [min, max],
            particle_size: size,
            trail_interval,
            trail_lifetime,
            ..
        } = self.config;

        Entity::new()
            .with(Transform::new([0.0, 0.0], [size, size]))
            .with(RigidBody::default())
            .with(Flasher)
            .with(BoxRenderer::new(WHITE))
            .with(EdgeSpawner::new(min, max))
            .with(EdgeKiller::default())
            .with(TrailSpawner::new(trail_interval, trail_lifetime))
    }

    fn handle_input(&mut self, frame: &Frame<'_>) {
        let input = frame.input;
        let count = MenuEntry::ALL.len();

        if input.any_pressed(&UP) {
            self.selected = (self.selected + count - 1) % count;
        }
        if input.any_pressed(&DOWN) {
            self.selected = (self.selected + 1) % count;
        }
        if !input.any_pressed(&ACTIVATE) {
            return;
        }

        match self.selected() {
            MenuEntry::Play => frame
                .later
                .invoke_later(|game| game.set_state(Box::new(PlayState::new()))),
            MenuEntry::Quit => frame.later.invoke_later(|game| game.stop()),
        }
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let [width, height] = self.bounds;
        let title = [width * 0.5, height * 0.3];

        let mut rng = rand::rng();
        let jitter = [rng.random_range(-4.0..=4.0), rng.random_range(-4.0..=4.0)];
        let draw = &mut *frame.draw;
        draw.text(
            TITLE,
            [title[0] + jitter[0], title[1] + jitter[1]],
            TITLE_SIZE,
            SHADOW,
            TextAlign::Center,
        );
        draw.text(TITLE, title, TITLE_SIZE, WHITE, TextAlign::Center);

        for (index, entry) in MenuEntry::ALL.iter().enumerate() {
            let position = [width * 0.5, height * 0.55 + index as f32 * ENTRY_SIZE * 1.5];
            let (label, color) = if index == self.selected {
                (format!("> {} <", entry.label()), WHITE)
            } else {
                (entry.label().to_string(), IDLE)
            };
            draw.text(label, position, ENTRY_SIZE, color, TextAlign::Center);
        }
    }
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

impl State for MenuState {
    fn name(&self) -> &'static str {
        "menu"
    }

    fn attach(&mut self, config: &Config) {
        self.config = config.menu.clone();
        self.spawn = Timer::repeating(self.config.particle_interval);
        self.bounds = config.reference_size;
        self.selected = 0;
        self.scene = Scene::new();
    }

    fn detach(&mut self) {
        self.scene.clear();
    }

    fn update(&mut self, frame: &mut Frame<'_>) {
        self.handle_input(frame);

        if self.spawn.update(frame.dt) {
            self.scene.add_entity(self.particle());
            while self.spawn.update(0.0) {
                self.scene.add_entity(self.particle());
            }
        }

        self.scene.update(frame);
        self.draw(frame);
    }

    fn scene(&self) -> Option<&Scene> {
        Some(&self.scene)
    }

    fn scene_mut(&mut self) -> Option<&mut Scene> {
        Some(&mut self.scene)
    }
}
