/// Chart data prep for the stats dashboard.
///
/// Converts raw series into normalized bars (0.0 ..= 1.0 of chart height),
/// value labels, y-axis labels and a clamped trend segment. The renderer
/// only maps these fractions onto terminal rows.

use super::aggregate::{self, Kpis, RecentSeries};

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub value: f64,
    /// value / scale max, clamped to [0, 1].
    pub height: f64,
    pub label: String,
}

/// Trend line endpoints at the first and last bar, as height fractions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrendSegment {
    pub start: f64,
    pub end: f64,
}

impl TrendSegment {
    /// Height of the line at bar `i` of `n`.
    pub fn at(&self, i: usize, n: usize) -> f64 {
        if n < 2 {
            return self.start;
        }
        let t = i as f64 / (n - 1) as f64;
        self.start + (self.end - self.start) * t
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarChart {
    pub title: &'static str,
    pub max: f64,
    pub bars: Vec<Bar>,
    /// Top-down axis labels.
    pub axis_labels: Vec<String>,
    pub trend: Option<TrendSegment>,
}

#[derive(Clone, Copy, Debug)]
enum Units {
    Points,
    Minutes,
}

impl Units {
    fn value_label(self, v: f64) -> String {
        match self {
            Units::Points => format!("{}", v.round() as i64),
            Units::Minutes => format!("{v:.1}"),
        }
    }

    fn axis_label(self, v: f64) -> String {
        match self {
            Units::Points => format!("{}", v.round() as i64),
            Units::Minutes => format!("{v:.1} min"),
        }
    }
}

fn build(title: &'static str, values: &[f64], max: f64, divisions: usize, units: Units) -> BarChart {
    let norm = |v: f64| if max > 0.0 { (v / max).clamp(0.0, 1.0) } else { 0.0 };

    let bars = values
        .iter()
        .map(|&v| Bar { value: v, height: norm(v), label: units.value_label(v) })
        .collect();

    let axis_labels = (0..=divisions)
        .map(|i| units.axis_label(max * (divisions - i) as f64 / divisions as f64))
        .collect();

    let trend = (values.len() >= 2).then(|| {
        let t = aggregate::index_trend(values);
        TrendSegment {
            start: norm(t.at(0.0)),
            end: norm(t.at((values.len() - 1) as f64)),
        }
    });

    BarChart { title, max, bars, axis_labels, trend }
}

/// Scores of the recent window. Scale = max(best score overall, 10, values).
pub fn scores_chart(series: &RecentSeries, kpis: &Kpis) -> BarChart {
    let max = series
        .scores
        .iter()
        .copied()
        .fold((kpis.best_score as f64).max(10.0), f64::max);
    build("Recent scores", &series.scores, max, 4, Units::Points)
}

/// Durations (minutes) of the recent window. Scale = max(1, values).
pub fn durations_chart(series: &RecentSeries) -> BarChart {
    let max = series.durations_min.iter().copied().fold(1.0, f64::max);
    build("Duration (minutes)", &series.durations_min, max, 3, Units::Minutes)
}

/// Bars at or above this share of the scale max are drawn highlighted.
pub const HIGHLIGHT_SHARE: f64 = 0.7;

#[cfg(test)]
mod tests {
    use super::*;

    fn series(scores: &[f64], mins: &[f64]) -> RecentSeries {
        RecentSeries { scores: scores.to_vec(), durations_min: mins.to_vec() }
    }

    #[test]
    fn score_scale_has_floor_of_ten() {
        let s = series(&[3.0, 5.0], &[]);
        let c = scores_chart(&s, &Kpis { best_score: 5, ..Kpis::default() });
        assert_eq!(c.max, 10.0);
        assert!((c.bars[1].height - 0.5).abs() < 1e-9);
        assert_eq!(c.axis_labels, vec!["10", "8", "5", "3", "0"]);
    }

    #[test]
    fn score_scale_uses_all_time_best() {
        let s = series(&[40.0, 20.0], &[]);
        let c = scores_chart(&s, &Kpis { best_score: 80, ..Kpis::default() });
        assert_eq!(c.max, 80.0);
        assert!((c.bars[0].height - 0.5).abs() < 1e-9);
        assert_eq!(c.bars[0].label, "40");
    }

    #[test]
    fn duration_labels_use_one_decimal() {
        let s = series(&[], &[0.5, 2.0]);
        let c = durations_chart(&s);
        assert_eq!(c.max, 2.0);
        assert_eq!(c.bars[0].label, "0.5");
        assert_eq!(c.axis_labels, vec!["2.0 min", "1.3 min", "0.7 min", "0.0 min"]);
    }

    #[test]
    fn duration_scale_floor_is_one_minute() {
        let c = durations_chart(&series(&[], &[0.25]));
        assert_eq!(c.max, 1.0);
        assert!(c.trend.is_none());
    }

    #[test]
    fn trend_follows_regression_and_is_clamped() {
        let s = series(&[10.0, 20.0, 30.0, 40.0], &[]);
        let c = scores_chart(&s, &Kpis { best_score: 40, ..Kpis::default() });
        let t = c.trend.unwrap();
        assert!((t.start - 0.25).abs() < 1e-9);
        assert!((t.end - 1.0).abs() < 1e-9);
        assert!((t.at(1, 4) - 0.5).abs() < 1e-9);

        // A steep drop extrapolates below zero at the far end: clamped.
        let s = series(&[], &[3.0, 0.0, 0.0]);
        let t = durations_chart(&s).trend.unwrap();
        assert!(t.end >= 0.0 && t.start <= 1.0);
    }

    #[test]
    fn empty_series_has_no_bars() {
        let c = scores_chart(&RecentSeries::default(), &Kpis::default());
        assert!(c.bars.is_empty());
        assert!(c.trend.is_none());
        assert_eq!(c.axis_labels.len(), 5);
    }
}
