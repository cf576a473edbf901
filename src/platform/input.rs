//! Terminal input to per-frame `TickInput`
//!
//! Classic terminals only send key presses (with OS key repeat), so a key
//! counts as held while its last press or repeat is at most `HOLD_WINDOW`
//! frames old. Terminals with keyboard enhancement also send releases, which
//! drop the key at once.

use std::collections::HashMap;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::sim::{GamePhase, MenuAction, SpeedEffectKind, TickInput};

/// Frames a key stays held after its last press/repeat event
pub const HOLD_WINDOW: u64 = 4;

/// Collects terminal events between frames and turns them into `TickInput`s
#[derive(Debug, Default)]
pub struct InputMapper {
    /// Last frame each key was seen pressed or repeated
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
    /// One-shot input gathered since the last frame
    pending: TickInput,
    /// Autopilot toggle (I key)
    idle_mode: bool,
    quit: bool,
    resize: Option<(u16, u16)>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start in autopilot mode
    pub fn with_idle_mode(mut self, idle_mode: bool) -> Self {
        self.idle_mode = idle_mode;
        self
    }

    /// Feed one terminal event
    pub fn handle_event(&mut self, event: &Event, phase: GamePhase) {
        match event {
            Event::Key(key) => self.handle_key(key, phase),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                ..
            }) => self.pending.launch = true,
            Event::Resize(cols, rows) => self.resize = Some((*cols, *rows)),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, phase: GamePhase) {
        // Menu navigation must not leave the paddle moving after the menu closes
        let track_held = phase != GamePhase::Menu;
        match key.kind {
            KeyEventKind::Press => {
                if track_held {
                    self.key_frame.insert(key.code, self.frame);
                }
                self.handle_press(key.code, key.modifiers, phase);
            }
            KeyEventKind::Repeat if track_held => {
                self.key_frame.insert(key.code, self.frame);
            }
            KeyEventKind::Repeat => {}
            KeyEventKind::Release => {
                self.key_frame.remove(&key.code);
            }
        }
    }

    fn handle_press(&mut self, code: KeyCode, modifiers: KeyModifiers, phase: GamePhase) {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Char('q') | KeyCode::Char('Q') => self.quit = true,
            KeyCode::Esc => self.pending.menu = true,
            KeyCode::Char(' ') => self.pending.launch = true,
            KeyCode::Char('r') | KeyCode::Char('R') => self.pending.restart = true,
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.pending.speed_effect = Some(SpeedEffectKind::Boost);
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                self.pending.speed_effect = Some(SpeedEffectKind::SlowDown);
            }
            KeyCode::Char('i') | KeyCode::Char('I') => {
                self.idle_mode = !self.idle_mode;
                log::info!("Idle mode: {}", self.idle_mode);
            }
            _ => {}
        }

        if phase == GamePhase::Menu {
            let action = match code {
                KeyCode::Up => Some(MenuAction::Up),
                KeyCode::Down => Some(MenuAction::Down),
                KeyCode::Left => Some(MenuAction::Left),
                KeyCode::Right => Some(MenuAction::Right),
                KeyCode::Enter => Some(MenuAction::Confirm),
                _ => None,
            };
            if action.is_some() {
                self.pending.menu_action = action;
            }
        }
    }

    fn is_held(&self, code: KeyCode) -> bool {
        self.key_frame
            .get(&code)
            .is_some_and(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
    }

    /// Input for the frame about to run; clears one-shot state
    pub fn take_input(&mut self) -> TickInput {
        let mut input = std::mem::take(&mut self.pending);
        input.left = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]
            .into_iter()
            .any(|k| self.is_held(k));
        input.right = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]
            .into_iter()
            .any(|k| self.is_held(k));
        input.idle_mode = self.idle_mode;

        self.frame += 1;
        input
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// New terminal size, if one arrived since the last call
    pub fn take_resize(&mut self) -> Option<(u16, u16)> {
        self.resize.take()
    }
}
