//! Menu cursor state
//!
//! The menu is a phase of the session state machine, not a separate loop. It
//! only tracks which row is highlighted and which preset is selected on each
//! row; the session decides what confirming means.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// Selectable menu rows, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuRow {
    Difficulty,
    SpeedLevel,
    Start,
}

impl MenuRow {
    pub const ALL: [MenuRow; 3] = [MenuRow::Difficulty, MenuRow::SpeedLevel, MenuRow::Start];

    fn index(self) -> usize {
        match self {
            MenuRow::Difficulty => 0,
            MenuRow::SpeedLevel => 1,
            MenuRow::Start => 2,
        }
    }
}

/// Edge-triggered menu navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Up,
    Down,
    Left,
    Right,
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuState {
    pub row: MenuRow,
    pub difficulty_index: usize,
    pub speed_index: usize,
    /// A game was interrupted by opening the menu and can be resumed
    pub game_in_progress: bool,
}

impl MenuState {
    /// Cursor positioned on the given presets (first entry when unknown)
    pub fn new(config: &GameConfig, difficulty: &str, speed_level: &str) -> Self {
        let difficulty_index = config
            .difficulty_names()
            .iter()
            .position(|n| *n == difficulty)
            .unwrap_or(0);
        let speed_index = config
            .speed_level_names()
            .iter()
            .position(|n| *n == speed_level)
            .unwrap_or(0);
        Self {
            row: MenuRow::Start,
            difficulty_index,
            speed_index,
            game_in_progress: false,
        }
    }

    /// Apply one navigation step. Returns true when the player confirmed.
    pub fn apply(&mut self, action: MenuAction, config: &GameConfig) -> bool {
        let rows = MenuRow::ALL.len();
        match action {
            MenuAction::Up => {
                self.row = MenuRow::ALL[(self.row.index() + rows - 1) % rows];
            }
            MenuAction::Down => {
                self.row = MenuRow::ALL[(self.row.index() + 1) % rows];
            }
            MenuAction::Left | MenuAction::Right => {
                let step = if action == MenuAction::Right { 1 } else { -1 };
                match self.row {
                    MenuRow::Difficulty => {
                        let len = config.difficulty_names().len();
                        self.difficulty_index = cycle(self.difficulty_index, step, len);
                    }
                    MenuRow::SpeedLevel => {
                        let len = config.speed_level_names().len();
                        self.speed_index = cycle(self.speed_index, step, len);
                    }
                    MenuRow::Start => {}
                }
            }
            MenuAction::Confirm => return true,
        }
        false
    }

    pub fn difficulty(&self, config: &GameConfig) -> &'static str {
        config
            .difficulty_names()
            .get(self.difficulty_index)
            .copied()
            .unwrap_or(crate::config::DEFAULT_DIFFICULTY)
    }

    pub fn speed_level(&self, config: &GameConfig) -> &'static str {
        config
            .speed_level_names()
            .get(self.speed_index)
            .copied()
            .unwrap_or(crate::config::DEFAULT_SPEED_LEVEL)
    }
}

fn cycle(index: usize, step: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index as isize + step).rem_euclid(len as isize) as usize
}
