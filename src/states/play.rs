use std::f32::consts::TAU;

use rand::Rng;
use winit::keyboard::KeyCode;

use crate::components::{
    BoxRenderer, EdgeBouncer, EdgeClamper, EntityTag, HazardContact, Health, HealthBar,
    PlayerControlled, RigidBody, TrailSpawner, Transform,
};
use crate::config::{Config, PlayConfig};
use crate::draw::{RED, TextAlign, WHITE};
use crate::entity::Entity;
use crate::frame::Frame;
use crate::scene::{EntityId, Scene};
use crate::state::State;
use crate::states::MenuState;
use crate::timer::Timer;

const HUD_SIZE: f32 = 28.0;
/// Enemies never appear closer than this to the player's center
const SAFE_RADIUS: f32 = 200.0;

/// Survive as long as possible among bouncing enemies
pub struct PlayState {
    scene: Scene,
    config: PlayConfig,
    enemy_timer: Timer,
    player: Option<EntityId>,
    bounds: [f32; 2],
    survived: f32,
    leaving: bool,
}

impl PlayState {
    pub fn new() -> Self {
        let config = PlayConfig::default();
        Self {
            scene: Scene::new(),
            enemy_timer: Timer::repeating(config.enemy_interval),
            config,
            player: None,
            bounds: Config::default().reference_size,
            survived: 0.0,
            leaving: false,
        }
    }

    /// Seconds since attach
    pub fn survived(&self) -> f32 {
        self.survived
    }

    fn player_health(&self) -> Option<Health> {
        self.scene
            .get(self.player?)
            .and_then(|player| player.get::<Health>())
            .copied()
    }

    fn spawn_player(&mut self) -> EntityId {
        let size = self.config.player_size;
        let position = [
            (self.bounds[0] - size) * 0.5,
            (self.bounds[1] - size) * 0.5,
        ];

        self.scene.add_entity(
            Entity::new()
                .with(Transform::new(position, [size, size]))
                .with(PlayerControlled::new(self.config.player_speed))
                .with(RigidBody::default())
                .with(EdgeClamper)
                .with(Health::new(
                    self.config.player_health,
                    self.config.invulnerability,
                ))
                .with(HazardContact::default())
                .with(BoxRenderer::new(WHITE))
                .with(HealthBar::default())
                .with(EntityTag::Player),
        )
    }

    fn spawn_enemy(&mut self) -> EntityId {
        let PlayConfig {
            enemy_speed: [min, max],
            enemy_size: size,
            enemy_trail_interval,
            enemy_trail_lifetime,
            ..
        } = self.config;
        let mut rng = rand::rng();

        let avoid = self
            .player
            .and_then(|id| self.scene.get(id))
            .and_then(|player| player.get::<Transform>())
            .map(Transform::center);
        let mut position = [0.0, 0.0];
        for _ in 0..8 {
            position = [
                rng.random_range(0.0..=(self.bounds[0] - size).max(0.0)),
                rng.random_range(0.0..=(self.bounds[1] - size).max(0.0)),
            ];
            let Some([x, y]) = avoid else {
                break;
            };
            let (dx, dy) = (position[0] + size * 0.5 - x, position[1] + size * 0.5 - y);
            if dx * dx + dy * dy >= SAFE_RADIUS * SAFE_RADIUS {
                break;
            }
        }

        let angle = rng.random_range(0.0..TAU);
        let speed = rng.random_range(min..=max);

        self.scene.add_entity(
            Entity::new()
                .with(Transform::new(position, [size, size]))
                .with(RigidBody::new([angle.cos() * speed, angle.sin() * speed]))
                .with(EdgeBouncer)
                .with(BoxRenderer::new(RED))
                .with(TrailSpawner::new(enemy_trail_interval, enemy_trail_lifetime))
                .with(EntityTag::Enemy),
        )
    }

    fn back_to_menu(&mut self, frame: &Frame<'_>) {
        if self.leaving {
            return;
        }
        self.leaving = true;
        frame
            .later
            .invoke_later(|game| game.set_state(Box::new(MenuState::new())));
    }

    fn draw_hud(&self, frame: &mut Frame<'_>) {
        let draw = &mut *frame.draw;
        draw.text(
            format!("time {:.1}s", self.survived),
            [16.0, 16.0],
            HUD_SIZE,
            WHITE,
            TextAlign::TopLeft,
        );
        if let Some(health) = self.player_health() {
            draw.text(
                format!("health {}/{}", health.current, health.max),
                [16.0, 16.0 + HUD_SIZE * 1.2],
                HUD_SIZE,
                WHITE,
                TextAlign::TopLeft,
            );
        }
    }
}

impl Default for PlayState {
    fn default() -> Self {
        Self::new()
    }
}

impl State for PlayState {
    fn name(&self) -> &'static str {
        "play"
    }

    fn attach(&mut self, config: &Config) {
        self.config = config.play.clone();
        self.bounds = config.reference_size;
        self.enemy_timer = Timer::repeating(self.config.enemy_interval);
        self.survived = 0.0;
        self.leaving = false;
        self.scene = Scene::new();

        self.player = Some(self.spawn_player());
        self.spawn_enemy();
    }

    fn detach(&mut self) {
        self.scene.clear();
        self.player = None;
    }

    fn update(&mut self, frame: &mut Frame<'_>) {
        if frame.input.pressed(KeyCode::Escape) {
            self.back_to_menu(frame);
        }

        self.survived += frame.dt;
        if self.enemy_timer.update(frame.dt) {
            self.spawn_enemy();
            while self.enemy_timer.update(0.0) {
                self.spawn_enemy();
            }
        }

        self.scene.update(frame);

        match self.player_health() {
            Some(health) if !health.is_dead() => {}
            _ => {
                if !self.leaving {
                    log::info!("player down after {:.1}s", self.survived);
                }
                self.back_to_menu(frame);
            }
        }

        self.draw_hud(frame);
    }

    fn scene(&self) -> Option<&Scene> {
        Some(&self.scene)
    }

    fn scene_mut(&mut self) -> Option<&mut Scene> {
        Some(&mut self.scene)
    }
}
