mod menu;
mod play;

pub use menu::{MenuEntry, MenuState};
pub use play::PlayState;
