use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode};
use crossterm::{cursor, execute, style, terminal, Command};

use crate::color::Color;
use crate::display::{Display, DisplayError};
use crate::math::Coord;

// Indexed by Color::palette_index: bit 0 blue, bit 1 green, bit 2 red.
const PALETTE: [style::Color; 8] = [
    style::Color::Black,
    style::Color::Blue,
    style::Color::Green,
    style::Color::Cyan,
    style::Color::Red,
    style::Color::Magenta,
    style::Color::Yellow,
    style::Color::White,
];

/// Character-cell backend. Each pixel renders as two background-colored
/// character cells, with colors quantized to the 8-entry palette. The frame
/// is staged as an ANSI string and written to stdout in one flush.
pub struct TerminalDisplay {
    width: usize,
    height: usize,
    frame: String,
}

impl TerminalDisplay {
    pub fn new(width: usize, height: usize) -> Result<Self, DisplayError> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        log::info!("terminal display up, {}x{} pixels", width, height);
        Ok(Self {
            width,
            height,
            frame: String::new(),
        })
    }

    /// Largest pixel grid the current terminal can show, accounting for the
    /// two-cells-per-pixel width.
    pub fn max_resolution() -> Result<(usize, usize), DisplayError> {
        let (cols, rows) = terminal::size()?;
        Ok(((cols / 2) as usize, rows as usize))
    }

    fn queue(&mut self, command: impl Command) {
        // Writing into a String cannot fail.
        let _ = command.write_ansi(&mut self.frame);
    }
}

impl Display for TerminalDisplay {
    fn clear(&mut self) {
        self.frame.clear();
        self.queue(terminal::Clear(terminal::ClearType::All));
    }

    fn write_pixel(&mut self, at: Coord, color: Color) {
        if at.w < 0 || at.w as usize >= self.width || at.h < 0 || at.h as usize >= self.height {
            return;
        }
        self.queue(cursor::MoveTo(2 * at.w as u16, at.h as u16));
        self.queue(style::SetBackgroundColor(PALETTE[color.palette_index()]));
        self.queue(style::Print("  "));
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.queue(style::ResetColor);
        let mut out = io::stdout();
        out.write_all(self.frame.as_bytes())?;
        out.flush()?;
        self.frame.clear();
        Ok(())
    }

    fn should_close(&mut self) -> bool {
        while event::poll(Duration::from_millis(0)).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if let KeyCode::Char('q') | KeyCode::Esc = key.code {
                    return true;
                }
            }
        }
        false
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
