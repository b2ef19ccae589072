use crate::color::Color;
use crate::display::{Display, DisplayError, Motion};
use crate::math::Coord;

/// Pixel-accurate backend on a minifb window. Pixels are staged in an ARGB
/// buffer and pushed to the window on present.
pub struct WindowDisplay {
    window: minifb::Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    background: u32,
}

impl WindowDisplay {
    pub fn new(width: usize, height: usize, background: Color) -> Result<Self, DisplayError> {
        let window = minifb::Window::new(
            "softras",
            width,
            height,
            minifb::WindowOptions::default(),
        )?;
        let background = background.to_argb();
        Ok(Self {
            window,
            buffer: vec![background; width * height],
            width,
            height,
            background,
        })
    }
}

impl Display for WindowDisplay {
    fn clear(&mut self) {
        for px in &mut self.buffer {
            *px = self.background;
        }
    }

    fn write_pixel(&mut self, at: Coord, color: Color) {
        if at.w < 0 || at.w as usize >= self.width || at.h < 0 || at.h as usize >= self.height {
            return;
        }
        self.buffer[at.w as usize + at.h as usize * self.width] = color.to_argb();
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.window
            .update_with_buffer(&self.buffer)?;
        Ok(())
    }

    fn should_close(&mut self) -> bool {
        !self.window.is_open() || self.window.is_key_down(minifb::Key::Escape)
    }

    fn poll_motion(&mut self) -> Motion {
        use minifb::Key;

        let mut motion = Motion::default();
        let axis = |neg: Key, pos: Key, window: &minifb::Window| {
            window.is_key_down(pos) as i32 as f32 - window.is_key_down(neg) as i32 as f32
        };
        motion.side = 0.1 * axis(Key::A, Key::D, &self.window);
        motion.forward = 0.1 * axis(Key::S, Key::W, &self.window);
        motion.yaw = 0.02 * axis(Key::Right, Key::Left, &self.window);
        motion.pitch = 0.02 * axis(Key::Down, Key::Up, &self.window);
        motion.roll = 0.02 * axis(Key::Q, Key::E, &self.window);
        motion.reset = self.window.is_key_down(Key::R);
        motion
    }
}
