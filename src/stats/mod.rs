pub mod aggregate;
pub mod chart;

use crate::domain::session::GameSession;
use aggregate::{BestPlayer, Kpis};
use chart::BarChart;

/// Everything the stats screen shows, computed once when it opens.
#[derive(Clone, Debug)]
pub struct Dashboard {
    pub kpis: Kpis,
    pub best: BestPlayer,
    pub scores: BarChart,
    pub durations: BarChart,
}

impl Dashboard {
    pub fn build(games: &[GameSession], window: usize) -> Self {
        let kpis = aggregate::summarize(games);
        let series = aggregate::recent(games, window);
        Dashboard {
            kpis,
            best: aggregate::best_player(games),
            scores: chart::scores_chart(&series, &kpis),
            durations: chart::durations_chart(&series),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kpis.total_games == 0
    }
}
