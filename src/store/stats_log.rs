/// Stats log: bounded, newest-first history of finished sessions.
///
/// Stored as a JSON array under `snake-game-stats`. Anything that fails to
/// parse is treated as an empty log; a failed write is logged and dropped.

use crate::domain::session::GameSession;
use super::error::StoreError;
use super::port::KvStore;

pub const STATS_KEY: &str = "snake-game-stats";
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatsLog {
    /// Newest first.
    entries: Vec<GameSession>,
}

impl StatsLog {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn from_entries(entries: Vec<GameSession>) -> Self {
        StatsLog { entries }
    }

    pub fn entries(&self) -> &[GameSession] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert at the front, evicting the oldest entries beyond `capacity`.
    pub fn push(&mut self, session: GameSession, capacity: usize) {
        self.entries.insert(0, session);
        self.entries.truncate(capacity);
    }

    /// Read the whole log. Missing or malformed data yields an empty log.
    pub fn load(store: &dyn KvStore) -> StatsLog {
        let raw = match store.load(STATS_KEY) {
            Some(raw) => raw,
            None => return StatsLog::default(),
        };
        match parse(&raw) {
            Ok(entries) => {
                tracing::debug!("loaded {} stored sessions", entries.len());
                StatsLog { entries }
            }
            Err(e) => {
                tracing::warn!("{e}; starting with an empty stats log");
                StatsLog::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KvStore) -> Result<(), StoreError> {
        let blob = serde_json::to_string(&self.entries).map_err(|source| StoreError::Json {
            key: STATS_KEY.to_string(),
            source,
        })?;
        store.save(STATS_KEY, &blob)
    }
}

fn parse(raw: &str) -> Result<Vec<GameSession>, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::Json {
        key: STATS_KEY.to_string(),
        source,
    })
}

/// Read-modify-write append of one session.
///
/// Returns the updated log. The in-memory result is authoritative even when
/// persisting it fails.
pub fn record_session(store: &mut dyn KvStore, session: GameSession, capacity: usize) -> StatsLog {
    let mut log = StatsLog::load(store);
    log.push(session, capacity);
    if let Err(e) = log.save(store) {
        tracing::warn!("stats log not persisted: {e}");
    }
    log
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::port::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn session(score: u32) -> GameSession {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::seconds(score as i64);
        GameSession::new(score, "tester", ts, 30)
    }

    #[test]
    fn missing_log_is_empty() {
        let store = MemoryStore::new();
        assert!(StatsLog::load(&store).is_empty());
    }

    #[test]
    fn malformed_log_is_empty() {
        let mut store = MemoryStore::new();
        store.save(STATS_KEY, "{not json").unwrap();
        assert!(StatsLog::load(&store).is_empty());
        store.save(STATS_KEY, r#"[{"score":"high"}]"#).unwrap();
        assert!(StatsLog::load(&store).is_empty());
    }

    #[test]
    fn record_prepends_and_persists() {
        let mut store = MemoryStore::new();
        record_session(&mut store, session(10), DEFAULT_CAPACITY);
        let log = record_session(&mut store, session(20), DEFAULT_CAPACITY);
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].score, 20);

        let reloaded = StatsLog::load(&store);
        assert_eq!(reloaded, log);
    }

    #[test]
    fn overflow_keeps_the_most_recent_hundred() {
        let mut store = MemoryStore::new();
        let mut log = StatsLog::default();
        for i in 0..130 {
            log = record_session(&mut store, session(i), DEFAULT_CAPACITY);
        }
        assert_eq!(log.len(), 100);
        // Newest first: 129 down to 30.
        assert_eq!(log.entries()[0].score, 129);
        assert_eq!(log.entries()[99].score, 30);
        assert_eq!(StatsLog::load(&store).len(), 100);
    }

    #[test]
    fn write_failure_keeps_in_memory_log() {
        let mut store = MemoryStore::new();
        record_session(&mut store, session(5), DEFAULT_CAPACITY);
        store.fail_writes = true;
        let log = record_session(&mut store, session(6), DEFAULT_CAPACITY);
        assert_eq!(log.len(), 2);
        assert_eq!(StatsLog::load(&store).len(), 1);
    }

    #[test]
    fn reads_logs_written_by_older_builds() {
        let mut store = MemoryStore::new();
        let raw = r#"[
            {"score":30,"playerName":"ana","date":"2025-06-01T10:00:00.000Z","duration":61},
            {"score":10,"playerName":"bo","date":"2025-05-31T09:00:00.000Z","duration":12}
        ]"#;
        store.save(STATS_KEY, raw).unwrap();
        let log = StatsLog::load(&store);
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].player_name, "ana");
        assert_eq!(log.entries()[1].duration_seconds, 12);
    }
}
