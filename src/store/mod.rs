pub mod error;
pub mod high_score;
pub mod port;
pub mod stats_log;
