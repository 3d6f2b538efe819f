use crate::{Coords, TermInt};
use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{poll, read, Event, KeyEvent};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};

/// Owned terminal handle: raw mode and the alternate screen are acquired
/// in `activate` and released in `Drop`, so every exit path restores the
/// user's terminal. Keeps a shadow screen buffer so a message overlay can
/// be hidden by repainting the cells it covered.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
    active: bool,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    /// Queries the terminal size but changes no modes, so callers can
    /// check size preconditions while the terminal is still usable for
    /// ordinary output.
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("reading terminal size")?;
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager {
            width,
            height,
            stdout: stdout(),
            screen,
            current_msg: None,
            active: false,
        })
    }

    pub fn size(&self) -> Coords {
        (self.width, self.height)
    }

    pub fn activate(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("entering alternate screen")?;
        terminal::enable_raw_mode().context("enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("hiding cursor")?;
        self.active = true;
        Ok(())
    }

    /// Drains every key event currently available without blocking.
    pub fn read_key_events(&self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    pub fn draw_borders(&mut self, size: Coords) -> Result<()> {
        let (width, height) = size;
        let end_x = width - 1;
        let end_y = height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == end_x { '+' } else { '-' };
            self.print_at((x, 0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in 1..end_y {
            self.print_at((0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        Ok(())
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.current_msg.is_some() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.len()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0 - msg_width / 2, center.1 - msg_height / 2);

        // Top and bottom padding rows
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{: ^width$}", line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.char_indices() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush()
    }

    /// Repaints the cells the current message covered from the shadow
    /// buffer. No-op when nothing is shown.
    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        let top_left = msg.top_left;
        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let (x, y) = (top_left.0 + x_diff, top_left.1 + y_diff);
                let ch = self.screen[self.width as usize * y as usize + x as usize];
                self.print_at_no_save((x, y), ch)?;
            }
        }

        self.flush()
    }

    pub fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        self.screen[self.width as usize * pos.1 as usize + pos.0 as usize] = ch;
        Ok(())
    }

    pub fn print_text(&mut self, pos: Coords, text: &str) -> Result<()> {
        for (i, ch) in text.chars().enumerate() {
            self.print_at((pos.0 + i as TermInt, pos.1), ch)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("clearing screen")?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("flushing terminal output")
    }

    fn print_at_no_save(&mut self, pos: Coords, ch: char) -> Result<()> {
        // Message cells stay out of the shadow buffer so hide_message can
        // restore what they covered.
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        Ok(())
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        let _ = terminal::disable_raw_mode();
        let _ = execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen);
    }
}
