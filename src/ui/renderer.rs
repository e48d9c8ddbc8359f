/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` (a grid of Glyphs)
///   2. Compare each glyph with `back` (previous frame)
///   3. Only emit terminal commands for glyphs that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Board geometry: grid cell (gx, gy) occupies terminal columns
/// `1 + 2*gx ..= 2 + 2*gx` on row `BOARD_ROW + 1 + gy`, inside a border.

use std::io::{self, BufWriter, Write};
use std::time::Duration;

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::cell::{Cell, PixelPoint, CELL_SIZE};
use crate::sim::game::Game;
use crate::sim::world::{Phase, World};
use crate::stats::aggregate::BestPlayer;
use crate::stats::chart::{BarChart, HIGHLIGHT_SHARE};
use crate::stats::Dashboard;
use super::view::{Screen, View};

// ── Palette ──

type Rgb = (u8, u8, u8);

const BASE_BG: Rgb = (22, 22, 35);
const BOARD_BG: Rgb = (14, 14, 24);
const GRID_DOT: Rgb = (40, 42, 58);
const ACCENT: Rgb = (46, 213, 115);
const ACCENT_DIM: Rgb = (30, 158, 74);
const OBSTACLE: Rgb = (235, 141, 252);
const DANGER: Rgb = (255, 107, 107);
const TEXT: Rgb = (230, 237, 243);
const MUTED: Rgb = (139, 148, 158);
const HUD_BG: Rgb = (20, 30, 40);
const PANEL_BG: Rgb = (30, 32, 48);

fn rgb(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

/// Linear blend from `a` (t = 0) to `b` (t = 1).
fn mix(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let ch = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    (ch(a.0, b.0), ch(a.1, b.1), ch(a.2, b.2))
}

// ── Glyph: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Glyph {
    const BLANK: Glyph = Glyph {
        ch: ' ',
        fg: Color::Rgb { r: TEXT.0, g: TEXT.1, b: TEXT.2 },
        bg: Color::Rgb { r: BASE_BG.0, g: BASE_BG.1, b: BASE_BG.2 },
    };

    /// Never produced by compose; forces a full repaint when it fills `back`.
    const INVALID: Glyph = Glyph { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Rgb, bg: Rgb) -> Self {
        Glyph { ch, fg: rgb(fg), bg: rgb(bg) }
    }
}

// ── FrameBuffer: a 2D grid of Glyphs ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Glyph>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Glyph::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Glyph::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Glyph::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, g: Glyph) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = g;
        }
    }

    fn get(&self, x: usize, y: usize) -> Glyph {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Glyph::BLANK
        }
    }

    /// Keep the glyph, swap its foreground.
    fn tint(&mut self, x: usize, y: usize, ch: char, fg: Rgb) {
        if x < self.width && y < self.height {
            let g = &mut self.cells[y * self.width + x];
            g.ch = ch;
            g.fg = rgb(fg);
        }
    }

    /// One column per char.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Rgb, bg: Rgb) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Glyph::new(ch, fg, bg));
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Rgb, bg: Rgb) {
        let x = self.width.saturating_sub(s.chars().count()) / 2;
        self.put_str(x, y, s, fg, bg);
    }

    fn fill_row(&mut self, y: usize, bg: Rgb) {
        for x in 0..self.width {
            self.set(x, y, Glyph::new(' ', TEXT, bg));
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, bg: Rgb) {
        for row in y..y + h {
            for col in x..x + w {
                self.set(col, row, Glyph::new(' ', TEXT, bg));
            }
        }
    }
}

// ── Layout ──

const HUD_ROW: usize = 0;
const BOARD_ROW: usize = 2;
const CELL_W: usize = 2;

/// Terminal rows/columns per pixel unit.
const PX_PER_COL: f32 = CELL_SIZE / CELL_W as f32;
const PX_PER_ROW: f32 = CELL_SIZE;

const PARTIAL_BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const PARTICLES: usize = 16;

/// Board bounds in terminal coordinates, border included.
#[derive(Clone, Copy)]
struct BoardRect {
    size: usize,
}

impl BoardRect {
    fn cols(self) -> usize {
        self.size * CELL_W + 2
    }

    fn rows(self) -> usize {
        self.size + 2
    }

    fn cell_origin(self, c: Cell) -> (usize, usize) {
        (1 + c.x as usize * CELL_W, BOARD_ROW + 1 + c.y as usize)
    }

    /// Terminal position of a pixel-space point, None outside the board.
    fn pixel_to_term(self, p: PixelPoint) -> Option<(usize, usize)> {
        let max = self.size as f32 * CELL_SIZE;
        if p.x < 0.0 || p.y < 0.0 || p.x >= max || p.y >= max {
            return None;
        }
        let col = 1 + (p.x / PX_PER_COL) as usize;
        let row = BOARD_ROW + 1 + (p.y / PX_PER_ROW) as usize;
        Some((col, row))
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_scene: Option<(Screen, Phase)>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_scene: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(rgb(BASE_BG)),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Glyph::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, game: &Game, view: &View, now: Duration) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Glyph::INVALID);
            queue!(self.writer, SetBackgroundColor(rgb(BASE_BG)), Clear(ClearType::All))?;
        }

        // Screen or phase change → clean repaint.
        let scene = (view.screen, game.world.phase);
        if self.last_scene != Some(scene) {
            self.back.cells.fill(Glyph::INVALID);
            queue!(self.writer, SetBackgroundColor(rgb(BASE_BG)), Clear(ClearType::All))?;
            self.last_scene = Some(scene);
        }

        self.front.clear();
        match view.screen {
            Screen::Title => self.compose_title(game, view),
            Screen::Play => self.compose_play(game, now),
            Screen::Stats => match &view.dashboard {
                Some(d) => self.compose_stats(d),
                None => self.compose_stats(&game.dashboard()),
            },
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed glyphs ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Glyph::BLANK.fg;
        let mut last_bg = Glyph::BLANK.bg;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal default.
        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let g = self.front.get(x, y);
                if g == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if g.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(g.fg))?;
                    last_fg = g.fg;
                }
                if g.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(g.bg))?;
                    last_bg = g.bg;
                }
                queue!(self.writer, Print(g.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Play screen ──

    fn compose_play(&mut self, game: &Game, now: Duration) {
        let w = &game.world;
        let board = BoardRect { size: w.size.max(0) as usize };

        if self.front.width < board.cols() || self.front.height < BOARD_ROW + board.rows() + 2 {
            self.compose_too_small(board);
            return;
        }

        self.compose_hud(game, now);
        self.compose_board(w, board);
        self.compose_effects(w, board, now);

        let help_row = BOARD_ROW + board.rows();
        let help = match w.phase {
            Phase::Paused => " Space resume   Esc title   T stats   Q quit",
            Phase::GameOver => " Enter/R play again   Esc title   T stats   Q quit",
            _ => " ←↑↓→/WASD or drag steer   Space pause   R restart   T stats   Q quit",
        };
        self.front.put_str(0, help_row, help, MUTED, BASE_BG);

        match w.phase {
            Phase::Paused => self.compose_pause_overlay(board),
            Phase::GameOver => self.compose_game_over(game, board),
            _ => {}
        }
    }

    fn compose_hud(&mut self, game: &Game, now: Duration) {
        let w = &game.world;
        let secs = match w.phase {
            Phase::GameOver => game.last_session.as_ref().map_or(0, |s| s.duration_seconds),
            _ => now.saturating_sub(w.started_at).as_secs(),
        };
        let hud = format!(
            " NEON SNAKE   {}   Score {:<5}  Best {:<5}  Length {:<3}  {}:{:02} ",
            game.player_name,
            w.score,
            w.high_score,
            w.snake.len(),
            secs / 60,
            secs % 60,
        );
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(0, HUD_ROW, &hud, TEXT, HUD_BG);
        self.front.put_str(1, HUD_ROW, "NEON SNAKE", ACCENT, HUD_BG);
    }

    fn compose_board(&mut self, w: &World, board: BoardRect) {
        let (cols, rows) = (board.cols(), board.rows());
        let edge = if w.phase == Phase::GameOver { DANGER } else { ACCENT_DIM };

        // Border
        for x in 1..cols - 1 {
            self.front.set(x, BOARD_ROW, Glyph::new('─', edge, BASE_BG));
            self.front.set(x, BOARD_ROW + rows - 1, Glyph::new('─', edge, BASE_BG));
        }
        for y in BOARD_ROW + 1..BOARD_ROW + rows - 1 {
            self.front.set(0, y, Glyph::new('│', edge, BASE_BG));
            self.front.set(cols - 1, y, Glyph::new('│', edge, BASE_BG));
        }
        self.front.set(0, BOARD_ROW, Glyph::new('╭', edge, BASE_BG));
        self.front.set(cols - 1, BOARD_ROW, Glyph::new('╮', edge, BASE_BG));
        self.front.set(0, BOARD_ROW + rows - 1, Glyph::new('╰', edge, BASE_BG));
        self.front.set(cols - 1, BOARD_ROW + rows - 1, Glyph::new('╯', edge, BASE_BG));

        // Floor with a faint dot grid
        for gy in 0..board.size {
            for gx in 0..board.size {
                let (col, row) = board.cell_origin(Cell::new(gx as i32, gy as i32));
                self.front.set(col, row, Glyph::new('·', GRID_DOT, BOARD_BG));
                self.front.set(col + 1, row, Glyph::new(' ', GRID_DOT, BOARD_BG));
            }
        }

        for &o in w.obstacles.iter().filter(|c| c.in_bounds(w.size)) {
            let (col, row) = board.cell_origin(o);
            self.front.set(col, row, Glyph::new('▓', mix(OBSTACLE, BOARD_BG, 0.3), OBSTACLE));
            self.front.set(col + 1, row, Glyph::new('▓', mix(OBSTACLE, BOARD_BG, 0.3), OBSTACLE));
        }

        if let Some(f) = w.food.filter(|c| c.in_bounds(w.size)) {
            let (col, row) = board.cell_origin(f);
            self.front.set(col, row, Glyph::new('●', DANGER, BOARD_BG));
        }

        // Body fades toward the tail; head drawn last.
        let len = w.snake.len();
        for (i, &seg) in w.snake.iter().enumerate().rev() {
            if !seg.in_bounds(w.size) {
                continue;
            }
            let (col, row) = board.cell_origin(seg);
            if i == 0 {
                let head = if w.phase == Phase::GameOver { DANGER } else { ACCENT };
                self.front.set(col, row, Glyph::new('•', BOARD_BG, head));
                self.front.set(col + 1, row, Glyph::new('•', BOARD_BG, head));
            } else {
                let t = i as f32 / len.max(2) as f32 * 0.5;
                let bg = mix(ACCENT_DIM, BOARD_BG, t);
                self.front.set(col, row, Glyph::new(' ', TEXT, bg));
                self.front.set(col + 1, row, Glyph::new(' ', TEXT, bg));
            }
        }
    }

    /// Collect flash: expanding ring, a burst of particles and a fading
    /// flash on the eaten cell.
    fn compose_effects(&mut self, w: &World, board: BoardRect, now: Duration) {
        for effect in &w.effects {
            let p = match effect.progress(now, w.effect_lifetime) {
                Some(p) => p,
                None => continue,
            };
            let o = effect.origin;
            let fade = mix(ACCENT, BOARD_BG, p);

            if p < 0.35 {
                if let Some((col, row)) = board.pixel_to_term(PixelPoint { x: o.x - CELL_SIZE / 4.0, y: o.y }) {
                    let flash = mix(TEXT, ACCENT, p / 0.35);
                    self.front.set(col, row, Glyph::new(' ', TEXT, flash));
                    self.front.set(col + 1, row, Glyph::new(' ', TEXT, flash));
                }
            }

            let ring = CELL_SIZE * (0.6 + 1.4 * p);
            for k in 0..24 {
                let a = k as f32 / 24.0 * std::f32::consts::TAU;
                let pt = PixelPoint { x: o.x + ring * a.cos(), y: o.y + ring * a.sin() };
                if let Some((col, row)) = board.pixel_to_term(pt) {
                    self.front.tint(col, row, '∘', fade);
                }
            }

            let reach = CELL_SIZE * (0.4 + 2.6 * p);
            for k in 0..PARTICLES {
                let a = (k as f32 + 0.5) / PARTICLES as f32 * std::f32::consts::TAU;
                let pt = PixelPoint { x: o.x + reach * a.cos(), y: o.y + reach * a.sin() };
                if let Some((col, row)) = board.pixel_to_term(pt) {
                    self.front.tint(col, row, if p < 0.5 { '✦' } else { '·' }, fade);
                }
            }
        }
    }

    fn compose_panel(&mut self, board: BoardRect, lines: &[(String, Rgb)]) {
        let width = lines.iter().map(|(s, _)| s.chars().count()).max().unwrap_or(0) + 6;
        let height = lines.len() + 2;
        let x = board.cols().saturating_sub(width) / 2;
        let y = BOARD_ROW + board.rows().saturating_sub(height) / 2;
        self.front.fill_rect(x, y, width, height, PANEL_BG);
        for (i, (line, color)) in lines.iter().enumerate() {
            let lx = x + (width - line.chars().count()) / 2;
            self.front.put_str(lx, y + 1 + i, line, *color, PANEL_BG);
        }
    }

    fn compose_pause_overlay(&mut self, board: BoardRect) {
        let lines = [
            ("PAUSED".to_string(), ACCENT),
            (String::new(), TEXT),
            ("Space to resume".to_string(), MUTED),
        ];
        self.compose_panel(board, &lines);
    }

    fn compose_game_over(&mut self, game: &Game, board: BoardRect) {
        let w = &game.world;
        let mut lines = vec![
            ("GAME OVER".to_string(), DANGER),
            (String::new(), TEXT),
            (format!("Score {}", w.score), TEXT),
        ];
        if w.score > 0 && w.score >= w.high_score {
            lines.push(("New high score!".to_string(), ACCENT));
        }
        if let Some(s) = &game.last_session {
            lines.push((format!("Time {}:{:02}", s.duration_seconds / 60, s.duration_seconds % 60), MUTED));
        }
        lines.push((String::new(), TEXT));
        lines.push(("Enter to play again".to_string(), ACCENT_DIM));
        self.compose_panel(board, &lines);
    }

    fn compose_too_small(&mut self, board: BoardRect) {
        let need = format!("Terminal too small: need {}×{}", board.cols(), BOARD_ROW + board.rows() + 2);
        let have = format!("current {}×{}", self.front.width, self.front.height);
        let y = self.front.height / 2;
        self.front.put_centered(y.saturating_sub(1), &need, DANGER, BASE_BG);
        self.front.put_centered(y, &have, MUTED, BASE_BG);
    }

    // ── Title screen ──

    fn compose_title(&mut self, game: &Game, view: &View) {
        let logo = [
            r" _  _  ___  ___  _  _    ___  _  _   _   _  __ ___ ",
            r"| \| || __|/ _ \| \| |  / __|| \| | /_\ | |/ /| __|",
            r"| .` || _|| (_) | .` |  \__ \| .` |/ _ \| ' < | _| ",
            r"|_|\_||___|\___/|_|\_|  |___/|_|\_/_/ \_\_|\_\|___|",
        ];
        for (i, line) in logo.iter().enumerate() {
            let c = mix(ACCENT, ACCENT_DIM, i as f32 / 3.0);
            self.front.put_centered(2 + i, line, c, BASE_BG);
        }

        let field_w = crate::domain::session::MAX_NAME_LEN + 2;
        let label = "Player name";
        let fx = self.front.width.saturating_sub(field_w) / 2;
        self.front.put_centered(8, label, MUTED, BASE_BG);
        self.front.fill_rect(fx, 9, field_w, 1, PANEL_BG);
        self.front.put_str(fx + 1, 9, &view.name_input, TEXT, PANEL_BG);
        let caret = fx + 1 + view.name_input.chars().count();
        self.front.set(caret, 9, Glyph::new('▏', ACCENT, PANEL_BG));
        if view.name_input.trim().is_empty() {
            self.front.put_str(fx + 2, 9, "Player", GRID_DOT, PANEL_BG);
        }

        let best = match &view.best {
            BestPlayer::NoRecords => "Best player: No records yet".to_string(),
            BestPlayer::Player { name, score } => format!("Best player: {name} ({score})"),
        };
        self.front.put_centered(11, &best, TEXT, BASE_BG);
        self.front.put_centered(12, &format!("High score: {}", game.world.high_score), ACCENT, BASE_BG);

        let help = [
            "Enter  start",
            "Tab    statistics",
            "Esc    quit",
            "",
            "In game: ←↑↓→ / WASD or mouse drag to steer, Space to pause",
        ];
        for (i, line) in help.iter().enumerate() {
            self.front.put_centered(15 + i, line, MUTED, BASE_BG);
        }
    }

    // ── Stats screen ──

    fn compose_stats(&mut self, d: &Dashboard) {
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(1, HUD_ROW, "STATISTICS", ACCENT, HUD_BG);
        self.front.put_str(14, HUD_ROW, "T / Esc back", MUTED, HUD_BG);

        let k = &d.kpis;
        let tiles = [
            ("Games", k.total_games.to_string()),
            ("Best", k.best_score.to_string()),
            ("Average", k.average_score.to_string()),
            ("Total points", k.total_points.to_string()),
        ];
        let mut x = 2;
        for (label, value) in &tiles {
            self.front.put_str(x, 2, label, MUTED, BASE_BG);
            self.front.put_str(x, 3, value, TEXT, BASE_BG);
            x += label.len().max(value.len()) + 4;
        }
        let best = match &d.best {
            BestPlayer::NoRecords => "Best player: No records yet".to_string(),
            BestPlayer::Player { name, score } => format!("Best player: {name} ({score})"),
        };
        self.front.put_str(2, 5, &best, TEXT, BASE_BG);

        if d.is_empty() {
            self.front.put_str(2, 8, "No games played yet. Finish a game to see your stats here.", MUTED, BASE_BG);
            return;
        }

        // Two charts share the remaining height.
        let top = 7;
        let avail = self.front.height.saturating_sub(top + 1);
        let scores_h = (avail * 3 / 5).max(4);
        self.compose_chart(&d.scores, top, scores_h);
        self.compose_chart(&d.durations, top + scores_h, avail.saturating_sub(scores_h).max(4));
    }

    /// Bar chart in a `height`-row block starting at `top`:
    /// title, plot rows, x-axis line, value labels.
    fn compose_chart(&mut self, chart: &BarChart, top: usize, height: usize) {
        let plot_h = height.saturating_sub(4).max(2);
        let plot_top = top + 1;
        let axis_row = plot_top + plot_h;

        self.front.put_str(2, top, chart.title, TEXT, BASE_BG);
        if chart.trend.is_some() {
            self.front.put_str(4 + chart.title.len(), top, "• trend", DANGER, BASE_BG);
        }

        // Y-axis labels, top-down.
        let label_w = chart.axis_labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let divisions = chart.axis_labels.len().saturating_sub(1).max(1);
        for (i, label) in chart.axis_labels.iter().enumerate() {
            let f = (divisions - i.min(divisions)) as f64 / divisions as f64;
            let row = axis_row - (f * plot_h as f64).round() as usize;
            let pad = label_w - label.chars().count();
            self.front.put_str(1 + pad, row, label, MUTED, BASE_BG);
        }

        let x0 = label_w + 3;
        for y in plot_top..=axis_row {
            self.front.set(x0 - 1, y, Glyph::new(if y == axis_row { '└' } else { '│' }, GRID_DOT, BASE_BG));
        }
        let plot_w = self.front.width.saturating_sub(x0 + 1);
        for x in x0..x0 + plot_w {
            self.front.set(x, axis_row, Glyph::new('─', GRID_DOT, BASE_BG));
        }

        let n = chart.bars.len();
        if n == 0 {
            return;
        }
        let slot = (plot_w / n).clamp(2, 8);
        let bar_w = (slot - 1).max(1);

        for (i, bar) in chart.bars.iter().enumerate() {
            let bx = x0 + i * slot;
            if bx + bar_w > x0 + plot_w {
                break;
            }
            let color = if bar.height >= HIGHLIGHT_SHARE { ACCENT } else { ACCENT_DIM };

            // Height in eighths of a row.
            let eighths = (bar.height * plot_h as f64 * 8.0).round() as usize;
            for r in 0..plot_h {
                let filled = eighths.saturating_sub(r * 8).min(8);
                if filled == 0 {
                    break;
                }
                let ch = PARTIAL_BLOCKS[filled - 1];
                for c in 0..bar_w {
                    self.front.set(bx + c, axis_row - 1 - r, Glyph::new(ch, color, BASE_BG));
                }
            }

            if let Some(trend) = chart.trend {
                let level = trend.at(i, n).clamp(0.0, 1.0);
                let r = ((level * plot_h as f64).round() as usize).min(plot_h);
                let row = if r == 0 { axis_row } else { axis_row - r };
                self.front.tint(bx + bar_w / 2, row, '•', DANGER);
            }

            if bar.label.chars().count() < slot {
                self.front.put_str(bx, axis_row + 1, &bar.label, MUTED, BASE_BG);
            }
        }
    }
}
