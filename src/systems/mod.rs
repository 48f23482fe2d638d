mod input;
mod renderer;
mod timing;

pub use input::{Input, InputCommand, InputSystem};
pub use renderer::{FrameStats, Renderer};
pub use timing::TimeSystem;
