use std::error::Error;
use std::fmt;

use crate::color::Color;
use crate::framebuffer::Framebuffer;
use crate::math::Coord;

pub mod terminal;
pub mod window;

pub use crate::display::terminal::TerminalDisplay;
pub use crate::display::window::WindowDisplay;

#[derive(Debug)]
pub enum DisplayError {
    Window(minifb::Error),
    Io(std::io::Error),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::Window(e) => write!(f, "window error: {}", e),
            DisplayError::Io(e) => write!(f, "display io error: {}", e),
        }
    }
}

impl Error for DisplayError {}

impl From<minifb::Error> for DisplayError {
    fn from(e: minifb::Error) -> Self {
        DisplayError::Window(e)
    }
}

impl From<std::io::Error> for DisplayError {
    fn from(e: std::io::Error) -> Self {
        DisplayError::Io(e)
    }
}

/// Camera motion requested by the backend's input since the last poll, in
/// steps along/about the camera's local axes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Motion {
    pub side: f32,
    pub forward: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    pub reset: bool,
}

/// A presentation backend. Construction plays the role of `init`, `Drop` the
/// role of `teardown`; pixel writes outside the backend's bounds are dropped
/// silently.
pub trait Display {
    fn clear(&mut self);
    fn write_pixel(&mut self, at: Coord, color: Color);
    fn present(&mut self) -> Result<(), DisplayError>;
    /// Polls the backend's input for a quit request (window closed, escape
    /// key, `q`).
    fn should_close(&mut self) -> bool;
    /// Polls the backend's input for camera movement. Backends without a
    /// keyboard report none.
    fn poll_motion(&mut self) -> Motion {
        Motion::default()
    }
}

/// Push a full framebuffer to a backend and present it.
pub fn blit(display: &mut dyn Display, fb: &Framebuffer) -> Result<(), DisplayError> {
    for h in 0..fb.height() as i32 {
        for w in 0..fb.width() as i32 {
            let at = Coord::new(w, h);
            display.write_pixel(at, fb.pixel_at(at));
        }
    }
    display.present()
}
