use std::thread::sleep;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, warn};

use crate::game::{GameState, StepResult};
use crate::highscore::HighScoreStore;
use crate::point::Point;
use crate::snake::Direction;
use crate::term::TermManager;
use crate::Coords;

const FRAME_MS: u64 = 15;
const DEFAULT_PLAYER_NAME: &str = "Player";
const MAX_NAME_LEN: usize = 12;

const SNAKE_BODY_CHAR: char = 'o';
const DEAD_SNAKE_CHAR: char = 'X';
const FRUIT_CHAR: char = '*';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const OPTIONS: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Fixed lookup, slower to faster.
    pub fn tick_interval(self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(150),
            Difficulty::Medium => Duration::from_millis(100),
            Difficulty::Hard => Duration::from_millis(50),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// While a dialog is open, directional gameplay input is suppressed and
/// these small selection machines route the keys instead.
enum Dialog {
    NameEntry { buffer: String },
    Difficulty { index: usize },
    Pause { index: usize },
    GameOver { index: usize },
}

const PAUSE_OPTIONS: [&str; 3] = ["Resume", "Restart", "Quit"];
const GAME_OVER_OPTIONS: [&str; 2] = ["Play again", "Quit"];

fn next_index(index: usize, len: usize) -> usize {
    (index + 1) % len
}

fn prev_index(index: usize, len: usize) -> usize {
    (index + len - 1) % len
}

pub struct App {
    term: TermManager,
    state: GameState,
    store: HighScoreStore,
    dialog: Option<Dialog>,
    difficulty: Difficulty,
    player_name: String,
    persisted_high_score: u32,
    quit: bool,
    last_tick: Instant,
}

impl App {
    pub fn new(mut term: TermManager, width: i32, height: i32, store: HighScoreStore) -> Result<Self> {
        term.activate()?;
        let high_score = store.load();
        Ok(App {
            term,
            state: GameState::new(width, height, high_score),
            store,
            dialog: None,
            difficulty: Difficulty::Medium,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            persisted_high_score: high_score,
            quit: false,
            last_tick: Instant::now(),
        })
    }

    /// Blocks until the user quits. Returns the final score.
    pub fn run(&mut self) -> Result<u32> {
        self.open_dialog(Dialog::NameEntry { buffer: String::new() })?;

        while !self.quit {
            sleep(Duration::from_millis(FRAME_MS));

            for ev in self.term.read_key_events()? {
                if is_ctrl_c(&ev) {
                    self.quit = true;
                    break;
                }
                if self.dialog.is_some() {
                    self.dialog_key(ev)?;
                } else {
                    self.gameplay_key(ev)?;
                }
            }

            if self.quit {
                break;
            }

            if self.dialog.is_none()
                && !self.state.over()
                && self.last_tick.elapsed() >= self.difficulty.tick_interval()
            {
                self.tick()?;
                self.last_tick = Instant::now();
            }
        }

        self.persist_high_score();
        Ok(self.state.score())
    }

    fn tick(&mut self) -> Result<()> {
        match self.state.step() {
            StepResult::Crashed => {
                info!(score = self.state.score(), "run over");
                for seg in self.state.snake().segments() {
                    let pos = cell(*seg);
                    self.term.print_at(pos, DEAD_SNAKE_CHAR)?;
                }
                self.term.flush()?;
                self.open_dialog(Dialog::GameOver { index: 0 })?;
            }
            StepResult::Moved { new_head, old_head, old_tail, ate } => {
                self.term.print_at(cell(new_head), head_glyph(self.state.snake().direction()))?;
                self.term.print_at(cell(old_head), SNAKE_BODY_CHAR)?;
                if let Some(tail) = old_tail {
                    self.term.print_at(cell(tail), ' ')?;
                }
                if ate {
                    debug!(score = self.state.score(), "fruit eaten");
                    self.term.print_at(cell(self.state.fruit_position()), FRUIT_CHAR)?;
                    self.draw_hud()?;
                    if self.state.high_score() > self.persisted_high_score {
                        self.persist_high_score();
                    }
                }
                self.term.flush()?;
            }
        }
        Ok(())
    }

    fn gameplay_key(&mut self, ev: KeyEvent) -> Result<()> {
        match ev.code {
            KeyCode::Char('w') | KeyCode::Up => self.state.set_direction(Direction::Up),
            KeyCode::Char('s') | KeyCode::Down => self.state.set_direction(Direction::Down),
            KeyCode::Char('a') | KeyCode::Left => self.state.set_direction(Direction::Left),
            KeyCode::Char('d') | KeyCode::Right => self.state.set_direction(Direction::Right),
            KeyCode::Esc => self.open_dialog(Dialog::Pause { index: 0 })?,
            _ => {}
        }
        Ok(())
    }

    fn dialog_key(&mut self, ev: KeyEvent) -> Result<()> {
        let dialog = match self.dialog.take() {
            Some(dialog) => dialog,
            None => return Ok(()),
        };

        match dialog {
            Dialog::NameEntry { mut buffer } => match ev.code {
                KeyCode::Enter => {
                    let trimmed = buffer.trim();
                    self.player_name = if trimmed.is_empty() {
                        DEFAULT_PLAYER_NAME.to_string()
                    } else {
                        trimmed.to_string()
                    };
                    // Medium preselected
                    self.open_dialog(Dialog::Difficulty { index: 1 })?;
                }
                KeyCode::Backspace => {
                    buffer.pop();
                    self.open_dialog(Dialog::NameEntry { buffer })?;
                }
                KeyCode::Char(c) if buffer.len() < MAX_NAME_LEN && (c.is_ascii_graphic() || c == ' ') => {
                    buffer.push(c);
                    self.open_dialog(Dialog::NameEntry { buffer })?;
                }
                _ => self.dialog = Some(Dialog::NameEntry { buffer }),
            },
            Dialog::Difficulty { index } => match ev.code {
                KeyCode::Up | KeyCode::Char('w') => {
                    self.open_dialog(Dialog::Difficulty {
                        index: prev_index(index, Difficulty::OPTIONS.len()),
                    })?;
                }
                KeyCode::Down | KeyCode::Char('s') => {
                    self.open_dialog(Dialog::Difficulty {
                        index: next_index(index, Difficulty::OPTIONS.len()),
                    })?;
                }
                KeyCode::Enter => {
                    self.difficulty = Difficulty::OPTIONS[index];
                    self.start_session()?;
                }
                _ => self.dialog = Some(Dialog::Difficulty { index }),
            },
            Dialog::Pause { index } => match ev.code {
                KeyCode::Up | KeyCode::Char('w') => {
                    self.open_dialog(Dialog::Pause { index: prev_index(index, PAUSE_OPTIONS.len()) })?;
                }
                KeyCode::Down | KeyCode::Char('s') => {
                    self.open_dialog(Dialog::Pause { index: next_index(index, PAUSE_OPTIONS.len()) })?;
                }
                KeyCode::Esc => self.resume()?,
                KeyCode::Enter => match index {
                    0 => self.resume()?,
                    1 => self.start_session()?,
                    _ => self.quit = true,
                },
                _ => self.dialog = Some(Dialog::Pause { index }),
            },
            Dialog::GameOver { index } => match ev.code {
                KeyCode::Up | KeyCode::Char('w') => {
                    self.open_dialog(Dialog::GameOver {
                        index: prev_index(index, GAME_OVER_OPTIONS.len()),
                    })?;
                }
                KeyCode::Down | KeyCode::Char('s') => {
                    self.open_dialog(Dialog::GameOver {
                        index: next_index(index, GAME_OVER_OPTIONS.len()),
                    })?;
                }
                KeyCode::Enter => match index {
                    0 => self.start_session()?,
                    _ => self.quit = true,
                },
                _ => self.dialog = Some(Dialog::GameOver { index }),
            },
        }
        Ok(())
    }

    fn open_dialog(&mut self, dialog: Dialog) -> Result<()> {
        let lines = self.dialog_lines(&dialog);
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        self.term.show_message(&refs)?;
        self.dialog = Some(dialog);
        Ok(())
    }

    fn dialog_lines(&self, dialog: &Dialog) -> Vec<String> {
        match dialog {
            Dialog::NameEntry { buffer } => vec![
                "Enter your name".to_string(),
                String::new(),
                format!("{}_", buffer),
                String::new(),
                "Press Enter to continue".to_string(),
            ],
            Dialog::Difficulty { index } => {
                let mut lines = vec!["Select difficulty".to_string(), String::new()];
                for (i, d) in Difficulty::OPTIONS.iter().enumerate() {
                    lines.push(option_line(d.label(), i == *index));
                }
                lines
            }
            Dialog::Pause { index } => {
                let mut lines = vec!["Paused".to_string(), String::new()];
                for (i, label) in PAUSE_OPTIONS.iter().enumerate() {
                    lines.push(option_line(label, i == *index));
                }
                lines
            }
            Dialog::GameOver { index } => {
                let mut lines = vec![
                    "Game over!".to_string(),
                    format!("Score: {}", self.state.score()),
                    String::new(),
                ];
                for (i, label) in GAME_OVER_OPTIONS.iter().enumerate() {
                    lines.push(option_line(label, i == *index));
                }
                lines
            }
        }
    }

    fn resume(&mut self) -> Result<()> {
        self.dialog = None;
        self.term.hide_message()?;
        // Don't charge the pause time against the tick gate
        self.last_tick = Instant::now();
        Ok(())
    }

    fn start_session(&mut self) -> Result<()> {
        self.state.reset();
        self.dialog = None;
        self.term.clear()?;
        self.term.draw_borders((self.state.width() as u16, self.state.height() as u16))?;
        self.draw_snake()?;
        self.term.print_at(cell(self.state.fruit_position()), FRUIT_CHAR)?;
        self.draw_hud()?;
        self.term.flush()?;
        self.last_tick = Instant::now();
        info!(difficulty = ?self.difficulty, player = %self.player_name, "session started");
        Ok(())
    }

    fn draw_snake(&mut self) -> Result<()> {
        let glyph = head_glyph(self.state.snake().direction());
        let cells: Vec<Coords> = self.state.snake().segments().map(|p| cell(*p)).collect();
        for (i, pos) in cells.into_iter().enumerate() {
            let ch = if i == 0 { glyph } else { SNAKE_BODY_CHAR };
            self.term.print_at(pos, ch)?;
        }
        Ok(())
    }

    fn draw_hud(&mut self) -> Result<()> {
        let y = self.state.height() as u16;
        let line = format!(
            "{}  Score: {}  High: {}",
            self.player_name,
            self.state.score(),
            self.state.high_score(),
        );
        let padded = format!("{: <width$}", line, width = self.state.width() as usize);
        self.term.print_text((0, y), &padded)?;
        self.term.print_text((0, y + 1), "Arrows/WASD move, Esc pauses")?;
        Ok(())
    }

    fn persist_high_score(&mut self) {
        if self.state.high_score() <= self.persisted_high_score {
            return;
        }
        match self.store.save(self.state.high_score()) {
            Ok(()) => self.persisted_high_score = self.state.high_score(),
            Err(err) => warn!(error = %err, "failed to persist high score"),
        }
    }
}

fn cell(p: Point) -> Coords {
    (p.x as u16, p.y as u16)
}

fn head_glyph(direction: Direction) -> char {
    match direction {
        Direction::Up => '^',
        Direction::Down => 'v',
        Direction::Left => '<',
        Direction::Right => '>',
    }
}

fn option_line(label: &str, selected: bool) -> String {
    if selected {
        format!("> {}", label)
    } else {
        format!("  {}", label)
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(
        ev,
        KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL }
    )
}
