/// Terminal input → intents.
///
/// All pending crossterm events are drained once per frame without
/// blocking. Keys are edge-triggered (Press/Repeat only, Release ignored).
/// Mouse drags stand in for touch swipes: terminal cells are converted to
/// the simulation's pixel space (a board cell is 2 columns × 1 row, i.e.
/// 20 × 20 pixel units).

use std::time::Duration;

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::domain::cell::{Direction, PixelPoint, CELL_SIZE};

/// Pixel units per terminal column and per terminal row.
const COL_PX: f32 = CELL_SIZE / 2.0;
const ROW_PX: f32 = CELL_SIZE;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
    Turn(Direction),
    TogglePause,
    Restart,
    Confirm,
    ToggleStats,
    Back,
    Quit,
    /// Typed character (name entry only).
    Char(char),
    Backspace,
    PointerDown(PixelPoint),
    PointerDrag(PixelPoint),
    PointerUp(PixelPoint),
}

pub struct InputState {
    /// Intents collected during the most recent drain_events() call.
    pub intents: Vec<Intent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { intents: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events. `text_entry` routes printable
    /// keys to `Intent::Char` instead of game bindings.
    pub fn drain_events(&mut self, text_entry: bool) {
        self.intents.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            let intent = match event::read() {
                Ok(Event::Key(key)) => map_key(key, text_entry),
                Ok(Event::Mouse(mouse)) => map_mouse(mouse),
                _ => None,
            };
            if let Some(i) = intent {
                self.intents.push(i);
            }
        }
    }
}

pub fn map_key(key: KeyEvent, text_entry: bool) -> Option<Intent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Some(Intent::Quit);
    }

    if text_entry {
        return match key.code {
            KeyCode::Enter => Some(Intent::Confirm),
            KeyCode::Backspace => Some(Intent::Backspace),
            KeyCode::Tab => Some(Intent::ToggleStats),
            KeyCode::Esc => Some(Intent::Quit),
            KeyCode::Char(c) if !c.is_control() => Some(Intent::Char(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Intent::Turn(Direction::Up)),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Intent::Turn(Direction::Down)),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Intent::Turn(Direction::Left)),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Intent::Turn(Direction::Right)),
        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => Some(Intent::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Intent::Restart),
        KeyCode::Enter => Some(Intent::Confirm),
        KeyCode::Char('t') | KeyCode::Char('T') | KeyCode::Tab => Some(Intent::ToggleStats),
        KeyCode::Esc => Some(Intent::Back),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Intent::Quit),
        _ => None,
    }
}

pub fn map_mouse(mouse: MouseEvent) -> Option<Intent> {
    let p = PixelPoint {
        x: mouse.column as f32 * COL_PX,
        y: mouse.row as f32 * ROW_PX,
    };
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Intent::PointerDown(p)),
        MouseEventKind::Drag(MouseButton::Left) => Some(Intent::PointerDrag(p)),
        MouseEventKind::Up(MouseButton::Left) => Some(Intent::PointerUp(p)),
        _ => None,
    }
}
