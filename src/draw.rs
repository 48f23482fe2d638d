//! Recorded draw calls.
//!
//! Gameplay code never talks to the GPU. It records rectangles and text into a
//! [`DrawList`], one [`Layer`] per `begin_frame`/`end_frame` pair, and the
//! renderer replays the list once the tick is over.

pub type Color = [f32; 4];

pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
pub const RED: Color = [1.0, 0.0, 0.0, 1.0];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    TopLeft,
    Center,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Rect {
        position: [f32; 2],
        size: [f32; 2],
        color: Color,
    },
    Text {
        content: String,
        position: [f32; 2],
        font_size: f32,
        color: Color,
        align: TextAlign,
    },
}

/// Draw calls sharing one logical coordinate space
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Logical size mapped onto the whole surface
    pub size: [f32; 2],
    pub commands: Vec<DrawCommand>,
}

#[derive(Debug, Default)]
pub struct DrawList {
    layers: Vec<Layer>,
    open: bool,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self, size: [f32; 2]) {
        if self.open {
            log::warn!("begin_frame called while a frame is still open");
        }
        self.layers.push(Layer {
            size,
            commands: Vec::new(),
        });
        self.open = true;
    }

    pub fn end_frame(&mut self) {
        self.open = false;
    }

    pub fn fill_rect(&mut self, position: [f32; 2], size: [f32; 2], color: Color) {
        self.push(DrawCommand::Rect {
            position,
            size,
            color,
        });
    }

    pub fn text(
        &mut self,
        content: impl Into<String>,
        position: [f32; 2],
        font_size: f32,
        color: Color,
        align: TextAlign,
    ) {
        self.push(DrawCommand::Text {
            content: content.into(),
            position,
            font_size,
            color,
            align,
        });
    }

    fn push(&mut self, command: DrawCommand) {
        match self.layers.last_mut() {
            Some(layer) if self.open => layer.commands.push(command),
            _ => log::trace!("draw call outside of a frame dropped"),
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.layers.iter().flat_map(|layer| layer.commands.iter())
    }

    pub fn rect_count(&self) -> usize {
        self.commands()
            .filter(|command| matches!(command, DrawCommand::Rect { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.layers.clear();
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_land_in_the_open_layer() {
        let mut draw = DrawList::new();

        draw.begin_frame([100.0, 50.0]);
        draw.fill_rect([1.0, 2.0], [3.0, 4.0], RED);
        draw.end_frame();

        draw.begin_frame([10.0, 10.0]);
        draw.text("hi", [5.0, 5.0], 12.0, WHITE, TextAlign::Center);
        draw.end_frame();

        assert_eq!(draw.layers().len(), 2);
        assert_eq!(draw.layers()[0].size, [100.0, 50.0]);
        assert_eq!(
            draw.layers()[0].commands,
            vec![DrawCommand::Rect {
                position: [1.0, 2.0],
                size: [3.0, 4.0],
                color: RED,
            }]
        );
        assert_eq!(draw.layers()[1].commands.len(), 1);
        assert_eq!(draw.rect_count(), 1);
    }

    #[test]
    fn draws_outside_a_frame_are_dropped() {
        let mut draw = DrawList::new();
        draw.fill_rect([0.0, 0.0], [1.0, 1.0], WHITE);

        draw.begin_frame([1.0, 1.0]);
        draw.end_frame();
        draw.fill_rect([0.0, 0.0], [1.0, 1.0], WHITE);

        assert_eq!(draw.commands().count(), 0);
    }
}
