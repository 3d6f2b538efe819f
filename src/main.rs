mod app;
mod fruit;
mod game;
mod highscore;
mod point;
mod snake;
mod term;

pub type TermInt = u16;
pub type Coords = (TermInt, TermInt);

use anyhow::{bail, Result};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::highscore::HighScoreStore;
use crate::term::TermManager;

// Grid size including the wall ring; playable area is (w-2) x (h-2)
const BOARD_WIDTH: i32 = 40;
const BOARD_HEIGHT: i32 = 20;
const HUD_ROWS: TermInt = 2;
const HIGH_SCORE_FILE: &str = "highscore.txt";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let term = TermManager::new()?;
    let (term_w, term_h) = term.size();
    let needed_h = BOARD_HEIGHT as TermInt + HUD_ROWS;
    if term_w < BOARD_WIDTH as TermInt || term_h < needed_h {
        bail!(
            "terminal too small: need at least {}x{}, have {}x{} - please resize and try again",
            BOARD_WIDTH,
            needed_h,
            term_w,
            term_h
        );
    }

    let store = HighScoreStore::new(HIGH_SCORE_FILE);
    let mut app = App::new(term, BOARD_WIDTH, BOARD_HEIGHT, store)?;
    let score = app.run()?;
    drop(app); // restores the terminal before we print

    println!("Final score: {}", score);
    Ok(())
}
