/// Screen flow around the game: title (name entry), play, stats.
///
/// `View` owns everything the renderer needs that is not part of the
/// simulation, and routes intents either to the game or to itself.

use std::time::Duration;

use crate::domain::session::MAX_NAME_LEN;
use crate::sim::game::Game;
use crate::sim::world::Phase;
use crate::stats::aggregate::BestPlayer;
use crate::stats::Dashboard;
use super::input::Intent;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Title,
    Play,
    Stats,
}

pub struct View {
    pub screen: Screen,
    pub name_input: String,
    pub best: BestPlayer,
    /// Snapshot taken when the stats screen opens.
    pub dashboard: Option<Dashboard>,
    pub quit: bool,
    return_to: Screen,
}

impl View {
    /// Title screen with the name pre-filled: the configured name, else
    /// the best player on record.
    pub fn new(game: &Game, configured_name: &str) -> Self {
        let best = game.best_player();
        let name_input = match (&best, configured_name.trim()) {
            (_, n) if !n.is_empty() => n.to_string(),
            (BestPlayer::Player { name, .. }, _) => name.clone(),
            (BestPlayer::NoRecords, _) => String::new(),
        };
        View {
            screen: Screen::Title,
            name_input: name_input.chars().take(MAX_NAME_LEN).collect(),
            best,
            dashboard: None,
            quit: false,
            return_to: Screen::Title,
        }
    }

    /// The title screen types into the name field.
    pub fn text_entry(&self) -> bool {
        self.screen == Screen::Title
    }

    pub fn handle(&mut self, game: &mut Game, intent: Intent, now: Duration) {
        if intent == Intent::Quit {
            self.quit = true;
            return;
        }
        match self.screen {
            Screen::Title => self.handle_title(game, intent, now),
            Screen::Play => self.handle_play(game, intent, now),
            Screen::Stats => self.handle_stats(intent),
        }
    }

    fn handle_title(&mut self, game: &mut Game, intent: Intent, now: Duration) {
        match intent {
            Intent::Char(c) => {
                if self.name_input.chars().count() < MAX_NAME_LEN {
                    self.name_input.push(c);
                }
            }
            Intent::Backspace => {
                self.name_input.pop();
            }
            Intent::Confirm => {
                game.start(&self.name_input, now);
                self.name_input = game.player_name.clone();
                self.screen = Screen::Play;
            }
            Intent::ToggleStats => self.open_stats(game),
            _ => {}
        }
    }

    fn handle_play(&mut self, game: &mut Game, intent: Intent, now: Duration) {
        match intent {
            Intent::Turn(dir) => {
                game.steer(dir);
            }
            Intent::TogglePause => {
                game.toggle_pause();
            }
            Intent::Restart => {
                game.restart(now);
            }
            Intent::Confirm if game.world.phase == Phase::GameOver => {
                game.restart(now);
            }
            Intent::ToggleStats => {
                if game.world.phase == Phase::Running {
                    game.toggle_pause();
                }
                self.open_stats(game);
            }
            Intent::Back => match game.world.phase {
                Phase::Running => {
                    game.toggle_pause();
                }
                _ => self.go_title(game),
            },
            Intent::PointerDown(p) => game.pointer_down(p),
            Intent::PointerDrag(p) => game.pointer_drag(p),
            Intent::PointerUp(p) => {
                game.pointer_up(p);
            }
            _ => {}
        }
    }

    fn handle_stats(&mut self, intent: Intent) {
        if matches!(intent, Intent::ToggleStats | Intent::Back | Intent::Confirm) {
            self.screen = self.return_to;
            self.dashboard = None;
        }
    }

    fn open_stats(&mut self, game: &Game) {
        let dashboard = game.dashboard();
        tracing::debug!(games = dashboard.kpis.total_games, "stats opened");
        self.best = dashboard.best.clone();
        self.dashboard = Some(dashboard);
        self.return_to = self.screen;
        self.screen = Screen::Stats;
    }

    fn go_title(&mut self, game: &Game) {
        self.best = game.best_player();
        self.screen = Screen::Title;
    }
}
