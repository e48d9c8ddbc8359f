/// Entry point and frame loop.

mod config;
mod domain;
mod sim;
mod stats;
mod store;
mod ui;

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;

use config::GameConfig;
use sim::event::GameEvent;
use sim::game::Game;
use store::port::{default_data_dir, FileStore};
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;
use ui::view::View;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();
    let data_dir = config.data_dir.clone().unwrap_or_else(default_data_dir);
    init_logging(&data_dir, &config.log_file);
    tracing::info!(grid = config.game.grid_size, tick_ms = config.game.tick_rate_ms, "starting");

    let store = FileStore::new(&data_dir);
    tracing::info!(dir = %store.dir().display(), "using data directory");
    let mut game = Game::new(&config, Box::new(store));
    let mut view = View::new(&game, &config.player_name);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        // Raw mode may already be on when a later step failed.
        let _ = renderer.cleanup();
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();
    if sound.is_none() {
        tracing::warn!("no audio output, sound disabled");
    }

    let result = game_loop(&mut game, &mut view, &mut renderer, sound.as_ref());

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        tracing::error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Neon Snake!");
    println!("High score: {}", game.world.high_score);
}

/// File logger in the data directory. The terminal belongs to the TUI,
/// so when the file cannot be opened logging stays off.
fn init_logging(dir: &Path, file_name: &str) {
    if file_name.trim().is_empty() {
        return;
    }
    let file = fs::create_dir_all(dir).and_then(|_| {
        OpenOptions::new().create(true).append(true).open(dir.join(file_name))
    });
    let file = match file {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: logging disabled, cannot open {}: {e}", dir.join(file_name).display());
            return;
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn game_loop(
    game: &mut Game,
    view: &mut View,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = InputState::new();
    let clock = Instant::now();
    let mut last_frame = Duration::ZERO;

    loop {
        input.drain_events(view.text_entry());
        let now = clock.elapsed();

        for intent in input.intents.drain(..) {
            view.handle(game, intent, now);
        }
        if view.quit {
            break;
        }

        let delta = now.saturating_sub(last_frame);
        last_frame = now;
        let events = game.frame(delta, now);
        process_sound_events(sound, &events);

        renderer.render(game, view, now)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    // A record or a crash replaces the plain collect chirp.
    if events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })) {
        sfx.play_crash();
    } else if events.iter().any(|e| matches!(e, GameEvent::NewHighScore { .. })) {
        sfx.play_record();
    } else if events.iter().any(|e| matches!(e, GameEvent::FoodEaten { .. })) {
        sfx.play_collect();
    }
}
