/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub game: RulesConfig,
    pub collect_effect_ms: u64,
    pub swipe_threshold: f32,
    pub stats: StatsConfig,
    /// Empty = ask on the title screen (pre-filled from the best player).
    pub player_name: String,
    /// None = auto-detect (see `store::port::default_data_dir`).
    pub data_dir: Option<PathBuf>,
    pub log_file: String,
}

#[derive(Clone, Debug)]
pub struct RulesConfig {
    pub tick_rate_ms: u64,
    pub grid_size: i32,
    pub points_per_food: u32,
}

#[derive(Clone, Debug)]
pub struct StatsConfig {
    pub max_stored_games: usize,
    pub chart_window: usize,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    effects: TomlEffects,
    #[serde(default)]
    input: TomlInput,
    #[serde(default)]
    stats: TomlStats,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_grid_size")]
    grid_size: i32,
    #[serde(default = "default_points")]
    points_per_food: u32,
}

#[derive(Deserialize, Debug)]
struct TomlEffects {
    #[serde(default = "default_collect_effect")]
    collect_effect_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlInput {
    #[serde(default = "default_swipe_threshold")]
    swipe_threshold: f32,
}

#[derive(Deserialize, Debug)]
struct TomlStats {
    #[serde(default = "default_max_games")]
    max_stored_games: usize,
    #[serde(default = "default_chart_window")]
    chart_window: usize,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    player_name: String,
    #[serde(default)]
    data_dir: String,
    #[serde(default = "default_log_file")]
    log_file: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 120 }
fn default_grid_size() -> i32 { 26 }
fn default_points() -> u32 { 10 }
fn default_collect_effect() -> u64 { 550 }
fn default_swipe_threshold() -> f32 { 24.0 }
fn default_max_games() -> usize { crate::store::stats_log::DEFAULT_CAPACITY }
fn default_chart_window() -> usize { 20 }
fn default_log_file() -> String { "neon-snake.log".into() }

const MIN_GRID: i32 = 5;
const MAX_GRID: i32 = 60;

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            tick_rate_ms: default_tick_rate(),
            grid_size: default_grid_size(),
            points_per_food: default_points(),
        }
    }
}

impl Default for TomlEffects {
    fn default() -> Self {
        TomlEffects { collect_effect_ms: default_collect_effect() }
    }
}

impl Default for TomlInput {
    fn default() -> Self {
        TomlInput { swipe_threshold: default_swipe_threshold() }
    }
}

impl Default for TomlStats {
    fn default() -> Self {
        TomlStats {
            max_stored_games: default_max_games(),
            chart_window: default_chart_window(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            player_name: String::new(),
            data_dir: String::new(),
            log_file: default_log_file(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        GameConfig::from_toml(load_toml(&candidate_dirs()))
    }

    #[cfg(test)]
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(GameConfig::from_toml)
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let data_dir = match cfg.general.data_dir.trim() {
            "" => None,
            dir => Some(PathBuf::from(dir)),
        };
        GameConfig {
            game: RulesConfig {
                tick_rate_ms: cfg.game.tick_rate_ms.max(1),
                grid_size: cfg.game.grid_size.clamp(MIN_GRID, MAX_GRID),
                points_per_food: cfg.game.points_per_food,
            },
            collect_effect_ms: cfg.effects.collect_effect_ms,
            swipe_threshold: cfg.input.swipe_threshold.max(0.0),
            stats: StatsConfig {
                max_stored_games: cfg.stats.max_stored_games.max(1),
                chart_window: cfg.stats.chart_window.max(1),
            },
            player_name: cfg.general.player_name.trim().to_string(),
            data_dir,
            log_file: cfg.general.log_file,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
/// Runs before the tracing subscriber exists, so problems go to stderr.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.game.tick_rate_ms, 120);
        assert_eq!(cfg.game.grid_size, 26);
        assert_eq!(cfg.game.points_per_food, 10);
        assert_eq!(cfg.collect_effect_ms, 550);
        assert_eq!(cfg.stats.max_stored_games, 100);
        assert_eq!(cfg.stats.chart_window, 20);
        assert!(cfg.data_dir.is_none());
        assert!(cfg.player_name.is_empty());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse(
            "[game]\ntick_rate_ms = 80\n\n[general]\nplayer_name = \" zed \"\n",
        )
        .unwrap();
        assert_eq!(cfg.game.tick_rate_ms, 80);
        assert_eq!(cfg.game.grid_size, 26);
        assert_eq!(cfg.player_name, "zed");
        assert_eq!(cfg.log_file, "neon-snake.log");
    }

    #[test]
    fn grid_size_is_clamped() {
        let cfg = GameConfig::parse("[game]\ngrid_size = 2\n").unwrap();
        assert_eq!(cfg.game.grid_size, MIN_GRID);
        let cfg = GameConfig::parse("[game]\ngrid_size = 500\n").unwrap();
        assert_eq!(cfg.game.grid_size, MAX_GRID);
    }

    #[test]
    fn default_matches_empty_document() {
        let a = GameConfig::default();
        let b = GameConfig::parse("").unwrap();
        assert_eq!(a.game.tick_rate_ms, b.game.tick_rate_ms);
        assert_eq!(a.log_file, b.log_file);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(GameConfig::parse("[game\n").is_err());
    }
}
