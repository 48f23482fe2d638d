//! Test harness: drives scenes without a window.

use crate::deferred::Deferred;
use crate::draw::DrawList;
use crate::frame::Frame;
use crate::scene::Scene;
use crate::systems::Input;

pub struct Harness {
    pub input: Input,
    pub later: Deferred,
    pub draw: DrawList,
    pub bounds: [f32; 2],
}

impl Harness {
    pub fn new() -> Self {
        Self::with_bounds([1280.0, 720.0])
    }

    pub fn with_bounds(bounds: [f32; 2]) -> Self {
        Self {
            input: Input::new(),
            later: Deferred::new(),
            draw: DrawList::new(),
            bounds,
        }
    }

    pub fn frame(&mut self, dt: f32) -> Frame<'_> {
        Frame::new(dt, &self.input, &mut self.draw, &self.later, self.bounds)
    }

    /// One scene pass inside its own draw frame
    pub fn pass(&mut self, scene: &mut Scene, dt: f32) {
        self.draw.begin_frame(self.bounds);
        scene.update(&mut self.frame(dt));
        self.draw.end_frame();
    }

    pub fn passes(&mut self, scene: &mut Scene, dt: f32, count: usize) {
        for _ in 0..count {
            self.pass(scene, dt);
        }
    }
}
