mod app;
mod game;
mod leaderboard;
mod render;

use app::{App, AppAction};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use game::GameSession;
use leaderboard::ScoreStore;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use sudoku_engine::Generator;

/// Terminal Sudoku with a persistent best-times list.
#[derive(Parser)]
#[command(name = "sudoku", version)]
struct Args {
    /// Seed for reproducible puzzles
    #[arg(long)]
    seed: Option<u64>,
    /// Score file location (defaults to the platform data directory)
    #[arg(long)]
    scores: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let scores_path = args.scores.unwrap_or_else(ScoreStore::default_path);
    // An unopenable score file is not fatal; play continues untracked.
    let scores = ScoreStore::open(scores_path).ok();

    let generator = match args.seed {
        Some(seed) => Generator::with_seed(seed),
        None => Generator::new(),
    };
    let mut app = App::new(GameSession::with_generator(scores, generator));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let result = run_app(&mut stdout, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    // The play clock advances once per second; input is polled in between.
    let tick_rate = Duration::from_secs(1);
    let mut last_tick = Instant::now();

    loop {
        render::render(stdout, app)?;
        stdout.flush()?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break;
                }
                match app.handle_key(key) {
                    AppAction::Continue => {}
                    AppAction::Quit => break,
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
