//! A single play-through: grid, selection cursor, timer, and the win /
//! leaderboard handshake. The front end feeds this module commands and
//! renders whatever it reads back; no game state lives anywhere else.

use crate::leaderboard::{ScoreRecord, ScoreStore};
use sudoku_engine::{Generator, Grid, Position, Solver};

/// Selection movement for the arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// The closed set of inputs a front end can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NewGame,
    Select(usize, usize),
    Move(Direction),
    Digit(u8),
    Clear,
    Reset,
    Cheat,
}

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// No puzzle yet
    Idle,
    /// Input accepted, timer may be running
    Playing,
    /// Board solved; everything but a new game is rejected
    Won,
}

/// One game of Sudoku.
pub struct GameSession {
    grid: Grid,
    selection: Option<Position>,
    seconds: u64,
    state: GameState,
    timer_running: bool,
    generator: Generator,
    solver: Solver,
    scores: Option<ScoreStore>,
    pending_score: Option<u64>,
}

impl GameSession {
    /// A session in the idle state. `scores` is None when the score file
    /// could not be opened; play continues without tracking.
    pub fn new(scores: Option<ScoreStore>) -> Self {
        Self::with_generator(scores, Generator::new())
    }

    /// Same, with a caller-supplied generator (seeded runs, tests).
    pub fn with_generator(scores: Option<ScoreStore>, generator: Generator) -> Self {
        Self {
            grid: Grid::empty(),
            selection: None,
            seconds: 0,
            state: GameState::Idle,
            timer_running: false,
            generator,
            solver: Solver::new(),
            scores,
            pending_score: None,
        }
    }

    /// Dispatch one input command.
    pub fn handle(&mut self, command: Command) {
        match command {
            Command::NewGame => self.new_game(),
            Command::Select(row, col) => self.select(row, col),
            Command::Move(direction) => self.move_selection(direction),
            Command::Digit(digit) => self.apply_digit(digit),
            Command::Clear => self.clear_cell(),
            Command::Reset => self.reset(),
            Command::Cheat => self.cheat(),
        }
    }

    /// Start a fresh puzzle from any state.
    pub fn new_game(&mut self) {
        self.grid = self.generator.generate();
        self.selection = None;
        self.seconds = 0;
        self.state = GameState::Playing;
        self.timer_running = true;
        self.pending_score = None;
    }

    /// Focus a cell. Out-of-range coordinates and given cells are rejected,
    /// leaving the selection unchanged.
    pub fn select(&mut self, row: usize, col: usize) {
        if self.state != GameState::Playing {
            return;
        }
        let pos = Position::new(row, col);
        if !pos.in_bounds() || self.grid.cell(pos).is_given() {
            return;
        }
        self.selection = Some(pos);
    }

    /// Walk from the selection in `direction`, one cell at a time, and focus
    /// the first editable cell found. Hitting the edge first leaves the
    /// selection unchanged.
    pub fn move_selection(&mut self, direction: Direction) {
        if self.state != GameState::Playing {
            return;
        }
        let from = match self.selection {
            Some(pos) => pos,
            None => return,
        };
        let (dr, dc) = direction.delta();
        let mut row = from.row as i32 + dr;
        let mut col = from.col as i32 + dc;
        while (0..9).contains(&row) && (0..9).contains(&col) {
            let pos = Position::new(row as usize, col as usize);
            if !self.grid.cell(pos).is_given() {
                self.selection = Some(pos);
                return;
            }
            row += dr;
            col += dc;
        }
    }

    /// Write a digit into the selected cell, then run the win check.
    /// Silently ignored without a selection (given cells are never
    /// selectable, but the guard stands on its own).
    pub fn apply_digit(&mut self, digit: u8) {
        if !(1..=9).contains(&digit) {
            return;
        }
        self.edit_selected(Some(digit));
    }

    /// Empty the selected cell.
    pub fn clear_cell(&mut self) {
        self.edit_selected(None);
    }

    fn edit_selected(&mut self, value: Option<u8>) {
        if self.state != GameState::Playing {
            return;
        }
        let pos = match self.selection {
            Some(pos) => pos,
            None => return,
        };
        if self.grid.cell(pos).is_given() {
            return;
        }
        self.grid.set(pos, value);
        self.check_win();
    }

    /// Wipe the player's progress and restart the clock. Givens and the
    /// selection survive.
    pub fn reset(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        self.grid.clear_unfixed();
        self.seconds = 0;
        self.timer_running = true;
    }

    /// Reveal the answer: clear the player's digits, stop the clock, and let
    /// the solver finish the board. A cheated win never reaches the
    /// leaderboard. If the board has become unsolvable it stays cleared.
    pub fn cheat(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        self.grid.clear_unfixed();
        self.timer_running = false;
        if self.solver.solve_in_place(&mut self.grid) {
            self.state = GameState::Won;
        }
    }

    /// One second of play time. Fires only while playing with the clock
    /// running (cheat stops it without ending the game).
    pub fn tick(&mut self) {
        if self.state == GameState::Playing && self.timer_running {
            self.seconds += 1;
        }
    }

    fn check_win(&mut self) {
        if !self.grid.is_complete_and_valid() {
            return;
        }
        self.state = GameState::Won;
        self.timer_running = false;
        if let Some(store) = &self.scores {
            if store.is_eligible(self.seconds) {
                self.pending_score = Some(self.seconds);
            }
        }
    }

    // --- read surface for the front end ---

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selection(&self) -> Option<Position> {
        self.selection
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_won(&self) -> bool {
        self.state == GameState::Won
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.seconds
    }

    /// MM:SS form of the elapsed time.
    pub fn elapsed_string(&self) -> String {
        format!("{:02}:{:02}", self.seconds / 60, self.seconds % 60)
    }

    pub fn scores_available(&self) -> bool {
        self.scores.is_some()
    }

    /// A win fast enough for the leaderboard, waiting for a player name.
    pub fn pending_score(&self) -> Option<u64> {
        self.pending_score
    }

    /// The ranked top 10, ascending by completion time.
    pub fn leaderboard_top10(&self) -> Vec<(usize, ScoreRecord)> {
        match &self.scores {
            Some(store) => store
                .top10()
                .into_iter()
                .enumerate()
                .map(|(i, record)| (i + 1, record))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Record the pending win under `name`. Returns whether a record was
    /// accepted; the pending fact is consumed either way.
    pub fn submit_name(&mut self, name: &str) -> bool {
        let seconds = match self.pending_score.take() {
            Some(seconds) => seconds,
            None => return false,
        };
        match self.scores.as_mut() {
            Some(store) => store.insert(ScoreRecord::new(name, seconds)).is_ok(),
            None => false,
        }
    }

    #[cfg(test)]
    fn playing_with_grid(grid: Grid, scores: Option<ScoreStore>) -> Self {
        let mut session = Self::with_generator(scores, Generator::with_seed(0));
        session.grid = grid;
        session.state = GameState::Playing;
        session.timer_running = true;
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sudoku_engine::{Cell, EMPTY_CELLS};

    const SOLVED: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    fn seeded_session() -> GameSession {
        let mut session =
            GameSession::with_generator(Some(ScoreStore::in_memory()), Generator::with_seed(42));
        session.new_game();
        session
    }

    /// A solved board with one editable hole at (0,0); filling it with 5
    /// wins the game.
    fn one_hole_session(scores: Option<ScoreStore>) -> GameSession {
        let mut grid = Grid::from_string(SOLVED).unwrap();
        *grid.cell_mut(Position::new(0, 0)) = Cell::default();
        GameSession::playing_with_grid(grid, scores)
    }

    fn first_editable(session: &GameSession) -> Position {
        Position::all()
            .find(|&pos| !session.grid().cell(pos).is_given())
            .unwrap()
    }

    #[test]
    fn new_game_starts_playing_with_a_fresh_puzzle() {
        let session = seeded_session();
        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(session.grid().empty_count(), EMPTY_CELLS);
        assert_eq!(session.selection(), None);
        assert_eq!(session.elapsed_seconds(), 0);
        assert!(!session.is_won());
    }

    #[test]
    fn idle_session_ignores_everything_but_new_game() {
        let mut session = GameSession::new(None);
        session.handle(Command::Select(0, 0));
        session.handle(Command::Digit(5));
        session.tick();
        assert_eq!(session.state(), GameState::Idle);
        assert_eq!(session.elapsed_seconds(), 0);
        session.handle(Command::NewGame);
        assert_eq!(session.state(), GameState::Playing);
    }

    #[test]
    fn selecting_a_given_cell_is_rejected() {
        let mut session = seeded_session();
        let given = Position::all()
            .find(|&pos| session.grid().cell(pos).is_given())
            .unwrap();
        let editable = first_editable(&session);

        session.select(editable.row, editable.col);
        assert_eq!(session.selection(), Some(editable));

        session.select(given.row, given.col);
        assert_eq!(session.selection(), Some(editable), "selection unchanged");

        session.select(9, 0);
        session.select(0, 42);
        assert_eq!(session.selection(), Some(editable));
    }

    #[test]
    fn apply_digit_writes_through_the_selection() {
        let mut session = seeded_session();
        let pos = first_editable(&session);
        session.handle(Command::Select(pos.row, pos.col));
        session.handle(Command::Digit(5));
        assert_eq!(session.grid().get(pos), Some(5));
        assert!(!session.is_won(), "one digit cannot finish 60 empties");

        session.handle(Command::Clear);
        assert_eq!(session.grid().get(pos), None);
    }

    #[test]
    fn digits_without_a_selection_are_ignored() {
        let mut session = seeded_session();
        let before = session.grid().to_string_compact();
        session.handle(Command::Digit(7));
        session.handle(Command::Clear);
        session.handle(Command::Move(Direction::Left));
        assert_eq!(session.grid().to_string_compact(), before);
    }

    #[test]
    fn givens_survive_any_input_sequence() {
        let mut session = seeded_session();
        let givens: Vec<(Position, Option<u8>)> = Position::all()
            .filter(|&pos| session.grid().cell(pos).is_given())
            .map(|pos| (pos, session.grid().get(pos)))
            .collect();

        for row in 0..9 {
            for col in 0..9 {
                session.handle(Command::Select(row, col));
                session.handle(Command::Digit((row + col) as u8 % 9 + 1));
            }
        }
        session.handle(Command::Clear);
        session.handle(Command::Reset);

        for (pos, value) in givens {
            assert!(session.grid().cell(pos).is_given());
            assert_eq!(session.grid().get(pos), value);
        }
    }

    #[test]
    fn move_selection_lands_only_on_editable_cells() {
        let mut session = seeded_session();
        let start = first_editable(&session);
        session.select(start.row, start.col);

        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            for _ in 0..12 {
                session.move_selection(direction);
                let pos = session.selection().unwrap();
                assert!(pos.in_bounds());
                assert!(!session.grid().cell(pos).is_given());
            }
        }
    }

    #[test]
    fn move_selection_stops_at_the_edge() {
        // only (4,4) and (4,6) editable; everything else is given
        let mut grid = Grid::from_string(SOLVED).unwrap();
        *grid.cell_mut(Position::new(4, 4)) = Cell::default();
        *grid.cell_mut(Position::new(4, 6)) = Cell::default();
        let mut session = GameSession::playing_with_grid(grid, None);

        session.select(4, 4);
        session.move_selection(Direction::Up);
        assert_eq!(session.selection(), Some(Position::new(4, 4)));
        session.move_selection(Direction::Left);
        assert_eq!(session.selection(), Some(Position::new(4, 4)));

        // skips the given cell at (4,5)
        session.move_selection(Direction::Right);
        assert_eq!(session.selection(), Some(Position::new(4, 6)));
        session.move_selection(Direction::Right);
        assert_eq!(session.selection(), Some(Position::new(4, 6)));
    }

    #[test]
    fn reset_clears_progress_but_keeps_the_selection() {
        let mut session = seeded_session();
        let pos = first_editable(&session);
        session.select(pos.row, pos.col);
        session.apply_digit(3);
        session.tick();
        session.tick();

        session.reset();
        assert_eq!(session.grid().get(pos), None);
        assert_eq!(session.elapsed_seconds(), 0);
        assert_eq!(session.selection(), Some(pos));

        // the clock restarts
        session.tick();
        assert_eq!(session.elapsed_seconds(), 1);
    }

    #[test]
    fn timer_ticks_only_while_playing() {
        let mut session = one_hole_session(None);
        session.tick();
        assert_eq!(session.elapsed_seconds(), 1);

        session.select(0, 0);
        session.apply_digit(5);
        assert!(session.is_won());
        session.tick();
        session.tick();
        assert_eq!(session.elapsed_seconds(), 1, "clock frozen after the win");
    }

    #[test]
    fn winning_flags_an_eligible_score() {
        let mut session = one_hole_session(Some(ScoreStore::in_memory()));
        for _ in 0..90 {
            session.tick();
        }
        session.select(0, 0);
        session.apply_digit(5);

        assert!(session.is_won());
        assert_eq!(session.pending_score(), Some(90));

        assert!(session.submit_name("Erika"));
        assert_eq!(session.pending_score(), None);
        let top = session.leaderboard_top10();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].0, 1);
        assert_eq!(top[0].1.name, "Erika");
        assert_eq!(top[0].1.seconds, 90);
    }

    #[test]
    fn slow_wins_on_a_full_board_are_not_flagged() {
        let mut store = ScoreStore::in_memory();
        for seconds in [50, 60, 70, 80, 90, 100, 110, 120, 130, 140] {
            store
                .insert(ScoreRecord {
                    timestamp: seconds,
                    name: "p".to_string(),
                    seconds,
                })
                .unwrap();
        }
        let mut session = one_hole_session(Some(store));
        for _ in 0..500 {
            session.tick();
        }
        session.select(0, 0);
        session.apply_digit(5);

        assert!(session.is_won());
        assert_eq!(session.pending_score(), None);
        assert!(!session.submit_name("too slow"));
    }

    #[test]
    fn wrong_final_digit_does_not_win() {
        let mut session = one_hole_session(None);
        session.select(0, 0);
        session.apply_digit(9); // 9 already sits in row 0
        assert!(!session.is_won());
        assert_eq!(session.state(), GameState::Playing);
    }

    #[test]
    fn cheat_solves_the_board_without_a_leaderboard_entry() {
        let mut session =
            GameSession::with_generator(Some(ScoreStore::in_memory()), Generator::with_seed(7));
        session.new_game();
        for _ in 0..5 {
            session.tick();
        }
        session.handle(Command::Cheat);

        assert!(session.is_won());
        assert!(session.grid().is_complete_and_valid());
        assert_eq!(session.pending_score(), None);
        assert!(!session.submit_name("cheater"));
        assert!(session.leaderboard_top10().is_empty());
    }

    #[test]
    fn cheat_on_an_unsolvable_board_leaves_it_cleared() {
        // row 0 holds givens 1-8; the 9 required at (0,8) is blocked by the
        // given 9 at (1,8)
        let mut grid = Grid::empty();
        for col in 0..8 {
            grid.set_given(Position::new(0, col), col as u8 + 1);
        }
        grid.set_given(Position::new(1, 8), 9);
        let mut session = GameSession::playing_with_grid(grid, None);

        session.select(5, 5);
        session.apply_digit(4);
        session.cheat();

        assert_eq!(session.state(), GameState::Playing);
        for pos in Position::all() {
            if !session.grid().cell(pos).is_given() {
                assert_eq!(session.grid().get(pos), None);
            }
        }
        // the clock stays stopped after a failed reveal
        let before = session.elapsed_seconds();
        session.tick();
        assert_eq!(session.elapsed_seconds(), before);
    }

    #[test]
    fn won_session_rejects_further_edits() {
        let mut session = one_hole_session(None);
        session.select(0, 0);
        session.apply_digit(5);
        assert!(session.is_won());

        session.handle(Command::Select(0, 0));
        session.handle(Command::Digit(1));
        session.handle(Command::Clear);
        session.handle(Command::Reset);
        assert!(session.grid().is_complete_and_valid());

        session.handle(Command::NewGame);
        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(session.grid().empty_count(), EMPTY_CELLS);
    }

    #[test]
    fn sessions_without_a_store_still_win() {
        let mut session = one_hole_session(None);
        session.select(0, 0);
        session.apply_digit(5);
        assert!(session.is_won());
        assert_eq!(session.pending_score(), None);
        assert!(session.leaderboard_top10().is_empty());
        assert!(!session.scores_available());
    }

    #[test]
    fn elapsed_string_is_mm_ss() {
        let mut session = seeded_session();
        for _ in 0..125 {
            session.tick();
        }
        assert_eq!(session.elapsed_string(), "02:05");
    }
}
