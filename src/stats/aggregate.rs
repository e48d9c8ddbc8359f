/// Stats aggregation: KPIs, best player, trend lines.
/// Everything here is a pure function over the stored log.

use crate::domain::session::GameSession;

/// Dashboard headline numbers. All zero for an empty log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Kpis {
    pub total_games: usize,
    pub best_score: u32,
    pub average_score: u64,
    pub total_points: u64,
}

pub fn summarize(games: &[GameSession]) -> Kpis {
    if games.is_empty() {
        return Kpis::default();
    }
    let total_points: u64 = games.iter().map(|g| g.score as u64).sum();
    let best_score = games.iter().map(|g| g.score).max().unwrap_or(0);
    let average_score = (total_points as f64 / games.len() as f64).round() as u64;
    Kpis {
        total_games: games.len(),
        best_score,
        average_score,
        total_points,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BestPlayer {
    NoRecords,
    Player { name: String, score: u32 },
}

/// Highest-scoring record; ties go to the newest (first in the log).
pub fn best_player(games: &[GameSession]) -> BestPlayer {
    let mut best: Option<&GameSession> = None;
    for g in games {
        if best.map_or(true, |b| g.score > b.score) {
            best = Some(g);
        }
    }
    match best {
        Some(g) => BestPlayer::Player { name: g.player_name.clone(), score: g.score },
        None => BestPlayer::NoRecords,
    }
}

// ── Recent window ──

/// Most recent `n` records as chart series, newest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecentSeries {
    pub scores: Vec<f64>,
    pub durations_min: Vec<f64>,
}

pub fn recent(games: &[GameSession], n: usize) -> RecentSeries {
    let window = &games[..games.len().min(n)];
    RecentSeries {
        scores: window.iter().map(|g| g.score as f64).collect(),
        durations_min: window.iter().map(GameSession::duration_minutes).collect(),
    }
}

// ── Linear regression ──

/// `y = slope * x + intercept`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trend {
    pub slope: f64,
    pub intercept: f64,
}

impl Trend {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Closed-form least squares over paired samples.
///
/// Fewer than two samples give a flat line through the only value (or 0).
/// A degenerate denominator (all xs equal) gives slope 0.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Trend {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return Trend { slope: 0.0, intercept: ys.first().copied().unwrap_or(0.0) };
    }
    let (mut sx, mut sy, mut sxy, mut sx2) = (0.0, 0.0, 0.0, 0.0);
    for i in 0..n {
        sx += xs[i];
        sy += ys[i];
        sxy += xs[i] * ys[i];
        sx2 += xs[i] * xs[i];
    }
    let nf = n as f64;
    let slope = (nf * sxy - sx * sy) / (nf * sx2 - sx * sx);
    let slope = if slope.is_finite() { slope } else { 0.0 };
    Trend { slope, intercept: (sy - slope * sx) / nf }
}

/// Regression of `ys` against their indices 0..n.
pub fn index_trend(ys: &[f64]) -> Trend {
    let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64).collect();
    linear_regression(&xs, ys)
}
