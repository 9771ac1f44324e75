//! Crossterm drawing for every screen. Pure output: nothing here mutates
//! the session.

use crate::app::{App, ScreenState, MENU_ITEMS};
use chrono::{Local, TimeZone};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io;
use sudoku_engine::Position;

const GRID_X: u16 = 2;
const GRID_Y: u16 = 2;
const GRID_WIDTH: u16 = 37;

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    execute!(stdout, Hide, Clear(ClearType::All), ResetColor)?;

    match app.screen_state {
        ScreenState::Menu => render_menu(stdout, app)?,
        ScreenState::Playing => render_game(stdout, app)?,
        ScreenState::Scoreboard => render_scoreboard(stdout, app)?,
        ScreenState::Rules => render_rules(stdout)?,
        ScreenState::EnterName => {
            render_game(stdout, app)?;
            render_name_prompt(stdout, app)?;
        }
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn print_at(stdout: &mut io::Stdout, x: u16, y: u16, text: &str) -> io::Result<()> {
    execute!(stdout, MoveTo(x, y), Print(text))
}

fn render_menu(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    execute!(
        stdout,
        MoveTo(GRID_X, GRID_Y),
        SetAttribute(Attribute::Bold),
        Print("S U D O K U"),
        SetAttribute(Attribute::Reset)
    )?;

    for (i, item) in MENU_ITEMS.iter().enumerate() {
        let y = GRID_Y + 2 + i as u16;
        if i == app.menu_selection {
            execute!(
                stdout,
                MoveTo(GRID_X, y),
                SetAttribute(Attribute::Reverse),
                Print(format!("> {} ", item)),
                SetAttribute(Attribute::Reset)
            )?;
        } else {
            print_at(stdout, GRID_X, y, &format!("  {} ", item))?;
        }
    }

    print_at(
        stdout,
        GRID_X,
        GRID_Y + 3 + MENU_ITEMS.len() as u16,
        "arrows + enter, or n/r/s, q to quit",
    )?;
    Ok(())
}

fn render_game(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    render_grid(stdout, app)?;

    let info_x = GRID_X + GRID_WIDTH + 3;
    execute!(
        stdout,
        MoveTo(info_x, GRID_Y),
        SetAttribute(Attribute::Bold),
        Print(format!("Time {}", app.session.elapsed_string())),
        SetAttribute(Attribute::Reset)
    )?;

    if app.session.is_won() {
        execute!(
            stdout,
            MoveTo(info_x, GRID_Y + 2),
            SetForegroundColor(Color::Green),
            Print(format!("Solved in {}", app.session.elapsed_string())),
            ResetColor
        )?;
        print_at(stdout, info_x, GRID_Y + 3, "n starts a new game")?;
    }

    if !app.session.scores_available() {
        execute!(
            stdout,
            MoveTo(info_x, GRID_Y + 5),
            SetForegroundColor(Color::DarkYellow),
            Print("scores unavailable"),
            ResetColor
        )?;
    }

    let help_y = GRID_Y + 20;
    print_at(
        stdout,
        GRID_X,
        help_y,
        "1-9 place digit   backspace clear   arrows move",
    )?;
    print_at(
        stdout,
        GRID_X,
        help_y + 1,
        "r reset   c reveal   n new game   esc menu   q quit",
    )?;

    if let Some(ref msg) = app.message {
        execute!(
            stdout,
            MoveTo(GRID_X, help_y + 3),
            SetForegroundColor(Color::Yellow),
            Print(msg),
            ResetColor
        )?;
    }
    Ok(())
}

fn render_grid(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let heavy = "+===+===+===+===+===+===+===+===+===+";
    let light = "+---+---+---+---+---+---+---+---+---+";

    print_at(stdout, GRID_X, GRID_Y, heavy)?;

    for row in 0..9 {
        let cell_y = GRID_Y + 1 + row as u16 * 2;
        execute!(stdout, MoveTo(GRID_X, cell_y))?;

        for col in 0..9 {
            let border = if col % 3 == 0 { "\u{2551}" } else { "\u{2502}" };
            execute!(stdout, Print(border))?;
            render_cell(stdout, app, Position::new(row, col))?;
        }
        execute!(stdout, Print("\u{2551}"))?;

        let sep = if (row + 1) % 3 == 0 { heavy } else { light };
        print_at(stdout, GRID_X, cell_y + 1, sep)?;
    }
    Ok(())
}

fn render_cell(stdout: &mut io::Stdout, app: &App, pos: Position) -> io::Result<()> {
    let cell = app.session.grid().cell(pos);
    let selected = app.session.selection() == Some(pos);

    if selected {
        execute!(stdout, SetBackgroundColor(Color::DarkRed))?;
    }

    match cell.value() {
        Some(value) if cell.is_given() => {
            execute!(
                stdout,
                SetAttribute(Attribute::Bold),
                Print(format!(" {} ", value)),
                SetAttribute(Attribute::Reset)
            )?;
        }
        Some(value) => {
            execute!(
                stdout,
                SetForegroundColor(Color::Cyan),
                Print(format!(" {} ", value))
            )?;
        }
        None => {
            execute!(
                stdout,
                SetForegroundColor(Color::DarkGrey),
                Print(" . ")
            )?;
        }
    }

    execute!(stdout, ResetColor)?;
    Ok(())
}

fn render_scoreboard(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    execute!(
        stdout,
        MoveTo(GRID_X, GRID_Y),
        SetAttribute(Attribute::Bold),
        Print("Best times"),
        SetAttribute(Attribute::Reset)
    )?;

    let top = app.session.leaderboard_top10();
    if !app.session.scores_available() {
        print_at(stdout, GRID_X, GRID_Y + 2, "The score file could not be opened.")?;
    } else if top.is_empty() {
        print_at(stdout, GRID_X, GRID_Y + 2, "No scores yet. Go win a game!")?;
    } else {
        print_at(
            stdout,
            GRID_X,
            GRID_Y + 2,
            &format!("{:>3}  {:<20} {:>6}  {}", "#", "name", "time", "date"),
        )?;
        for (i, (rank, record)) in top.iter().enumerate() {
            let time = format!("{:02}:{:02}", record.seconds / 60, record.seconds % 60);
            let date = Local
                .timestamp_opt(record.timestamp as i64, 0)
                .single()
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            print_at(
                stdout,
                GRID_X,
                GRID_Y + 3 + i as u16,
                &format!("{:>2}.  {:<20} {:>6}  {}", rank, record.name, time, date),
            )?;
        }
    }

    print_at(stdout, GRID_X, GRID_Y + 15, "esc back")?;
    Ok(())
}

fn render_rules(stdout: &mut io::Stdout) -> io::Result<()> {
    execute!(
        stdout,
        MoveTo(GRID_X, GRID_Y),
        SetAttribute(Attribute::Bold),
        Print("Rules"),
        SetAttribute(Attribute::Reset)
    )?;

    let lines = [
        "Fill the 9x9 board so every row, every column, and every",
        "3x3 box contains each digit from 1 to 9 exactly once.",
        "",
        "The bold digits are given and cannot be changed. Finish the",
        "board fast enough and your time enters the top-10 list.",
    ];
    for (i, line) in lines.iter().enumerate() {
        print_at(stdout, GRID_X, GRID_Y + 2 + i as u16, line)?;
    }

    print_at(stdout, GRID_X, GRID_Y + 9, "esc back")?;
    Ok(())
}

fn render_name_prompt(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let y = GRID_Y + 24;
    execute!(
        stdout,
        MoveTo(GRID_X, y),
        SetForegroundColor(Color::Green),
        SetAttribute(Attribute::Bold),
        Print("You made the scoreboard!"),
        SetAttribute(Attribute::Reset),
        ResetColor
    )?;
    print_at(
        stdout,
        GRID_X,
        y + 1,
        &format!("Enter your name: {}_", app.name_input),
    )?;
    print_at(stdout, GRID_X, y + 2, "enter saves, esc skips")?;
    Ok(())
}
