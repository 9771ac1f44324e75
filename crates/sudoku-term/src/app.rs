//! Screen state and key translation. Raw key events become [`Command`]s
//! dispatched into the session; everything drawn is read back out of it.

use crate::game::{Command, Direction, GameSession};
use crate::leaderboard::MAX_NAME_LEN;
use crossterm::event::{KeyCode, KeyEvent};
use sudoku_engine::Position;

/// Result of handling a key press.
pub enum AppAction {
    Continue,
    Quit,
}

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Menu,
    Playing,
    Scoreboard,
    Rules,
    /// Win was leaderboard-eligible; collecting the player name
    EnterName,
}

pub const MENU_ITEMS: &[&str] = &["New Game", "Rules", "Scoreboard", "Exit"];

/// The terminal application.
pub struct App {
    pub session: GameSession,
    pub screen_state: ScreenState,
    pub menu_selection: usize,
    pub name_input: String,
    pub message: Option<String>,
    message_timer: u32,
}

impl App {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            screen_state: ScreenState::Menu,
            menu_selection: 0,
            name_input: String::new(),
            message: None,
            message_timer: 0,
        }
    }

    /// One-second heartbeat: advances the play clock and expires messages.
    pub fn tick(&mut self) {
        self.session.tick();
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }
    }

    /// Show a transient status message.
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 4;
    }

    /// Handle a key press on whatever screen is active.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match self.screen_state {
            ScreenState::Menu => self.handle_menu_key(key),
            ScreenState::Playing => self.handle_game_key(key),
            ScreenState::Scoreboard | ScreenState::Rules => self.handle_static_key(key),
            ScreenState::EnterName => self.handle_name_key(key),
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_selection = self.menu_selection.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.menu_selection + 1 < MENU_ITEMS.len() {
                    self.menu_selection += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => return self.activate_menu_item(),
            KeyCode::Char('n') => {
                self.menu_selection = 0;
                return self.activate_menu_item();
            }
            KeyCode::Char('r') => self.screen_state = ScreenState::Rules,
            KeyCode::Char('s') => self.screen_state = ScreenState::Scoreboard,
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,
            _ => {}
        }
        AppAction::Continue
    }

    fn activate_menu_item(&mut self) -> AppAction {
        match self.menu_selection {
            0 => {
                self.session.handle(Command::NewGame);
                self.screen_state = ScreenState::Playing;
            }
            1 => self.screen_state = ScreenState::Rules,
            2 => self.screen_state = ScreenState::Scoreboard,
            _ => return AppAction::Quit,
        }
        AppAction::Continue
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char(ch @ '1'..='9') => {
                self.dispatch(Command::Digit(ch as u8 - b'0'));
            }
            KeyCode::Backspace | KeyCode::Delete => self.dispatch(Command::Clear),
            KeyCode::Up => self.arrow(Direction::Up),
            KeyCode::Down => self.arrow(Direction::Down),
            KeyCode::Left => self.arrow(Direction::Left),
            KeyCode::Right => self.arrow(Direction::Right),
            KeyCode::Char('r') => {
                self.dispatch(Command::Reset);
                self.show_message("Board reset");
            }
            KeyCode::Char('c') => {
                self.dispatch(Command::Cheat);
                if self.session.is_won() {
                    self.show_message("Solution revealed");
                }
            }
            KeyCode::Char('n') => self.dispatch(Command::NewGame),
            KeyCode::Esc => self.screen_state = ScreenState::Menu,
            KeyCode::Char('q') => return AppAction::Quit,
            _ => {}
        }
        AppAction::Continue
    }

    /// Arrow keys move an existing selection; the first press focuses the
    /// first editable cell instead.
    fn arrow(&mut self, direction: Direction) {
        if self.session.selection().is_none() {
            if let Some(pos) =
                Position::all().find(|&pos| !self.session.grid().cell(pos).is_given())
            {
                self.dispatch(Command::Select(pos.row, pos.col));
            }
            return;
        }
        self.dispatch(Command::Move(direction));
    }

    fn dispatch(&mut self, command: Command) {
        let was_won = self.session.is_won();
        self.session.handle(command);

        // a win on this very keystroke decides the next screen
        if !was_won && self.session.is_won() {
            if self.session.pending_score().is_some() {
                self.name_input.clear();
                self.screen_state = ScreenState::EnterName;
            } else {
                self.show_message("Solved!");
            }
        }
    }

    fn handle_static_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => AppAction::Quit,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('b') => {
                self.screen_state = ScreenState::Menu;
                AppAction::Continue
            }
            _ => AppAction::Continue,
        }
    }

    fn handle_name_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char(ch) => {
                if self.name_input.chars().count() < MAX_NAME_LEN {
                    self.name_input.push(ch);
                }
            }
            KeyCode::Backspace => {
                self.name_input.pop();
            }
            KeyCode::Enter => {
                let saved = self.session.submit_name(&self.name_input);
                self.screen_state = ScreenState::Scoreboard;
                if !saved {
                    self.show_message("Could not save the score");
                }
            }
            KeyCode::Esc => {
                // skip the leaderboard; the solved board stays on screen
                self.screen_state = ScreenState::Playing;
            }
            _ => {}
        }
        AppAction::Continue
    }
}
