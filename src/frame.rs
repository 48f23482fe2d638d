use crate::deferred::Deferred;
use crate::draw::DrawList;
use crate::systems::Input;

/// Everything a tick may read or emit, passed down explicitly from
/// [`Game::update`](crate::game::Game::update) to every state and component.
pub struct Frame<'a> {
    /// Seconds since the previous tick
    pub dt: f32,
    pub input: &'a Input,
    pub draw: &'a mut DrawList,
    pub later: &'a Deferred,
    /// Logical playfield size, the space positions live in
    pub bounds: [f32; 2],
}

impl<'a> Frame<'a> {
    pub fn new(
        dt: f32,
        input: &'a Input,
        draw: &'a mut DrawList,
        later: &'a Deferred,
        bounds: [f32; 2],
    ) -> Self {
        Self {
            dt: dt.max(0.0),
            input,
            draw,
            later,
            bounds,
        }
    }
}
