use std::{sync::Arc, time::Instant};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use wave::draw::DrawList;
use wave::error::AppError;
use wave::systems::{InputCommand, InputSystem, Renderer, TimeSystem};
use wave::{Config, Game};

const CONFIG_PATH: &str = "wave.toml";

struct App {
    // Systems
    renderer: Option<Renderer>,
    timing: TimeSystem,
    input: InputSystem,

    // Game state
    game: Game,
    draw: DrawList,
}

impl App {
    fn new(config: Config) -> Self {
        Self {
            renderer: None,
            timing: TimeSystem::new(),
            input: InputSystem::new(),
            game: Game::new(config),
            draw: DrawList::new(),
        }
    }

    fn create_renderer(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let config = self.game.config();
        let [width, height] = config.window_size;
        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(width, height));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let mut renderer = pollster::block_on(Renderer::new(window.clone()))?;
        renderer.show_stats = config.show_stats;
        self.renderer = Some(renderer);

        window.request_redraw();
        Ok(())
    }

    fn handle_input_command(&mut self, event_loop: &ActiveEventLoop, command: InputCommand) {
        match command {
            InputCommand::Exit => {
                log::info!("exiting application");
                event_loop.exit();
            }
            InputCommand::TogglePause => {
                self.timing.toggle_pause();
                log::info!(
                    "paused: {} at {:.1}s",
                    self.timing.is_paused(),
                    self.timing.game_time.as_secs_f32()
                );
            }
            InputCommand::ToggleStats => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.toggle_stats();
                }
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        if let Err(err) = self.create_renderer(event_loop) {
            log::error!("{err}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window close requested");
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => {
                renderer.frame_stats.entity_count = self.game.entity_count();
                if let Err(err) = renderer.render(&self.draw) {
                    log::error!("{err}");
                }
            }

            WindowEvent::Resized(size) => {
                renderer.resize(size);
                renderer.window.request_redraw();
            }

            WindowEvent::Focused(false) => {
                self.input.focus_lost();
            }

            WindowEvent::ModifiersChanged(new_modifiers) => {
                self.input.update_modifiers(new_modifiers.state());
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(command) = self.input.handle_key_event(&event) {
                    self.handle_input_command(event_loop, command);
                }
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let now = Instant::now();

        if let Some(dt) = self.timing.tick(now) {
            self.draw.clear();
            self.game.update(dt, &self.input.state, &mut self.draw);
            self.input.end_frame();

            renderer.frame_stats.ticks_accum += 1;
            renderer.window.request_redraw();
        }

        if !self.game.is_running() {
            event_loop.exit();
            return;
        }

        let next = self.timing.next_wakeup();
        event_loop.set_control_flow(ControlFlow::WaitUntil(next));
    }
}

fn main() -> Result<(), AppError> {
    env_logger::init();

    let config = Config::load_or_default(CONFIG_PATH);
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
