/// Persisted best score, a single decimal integer.

use super::port::KvStore;

pub const HIGH_SCORE_KEY: &str = "snake-high-score";

/// Missing or malformed data reads as 0.
pub fn load(store: &dyn KvStore) -> u32 {
    store
        .load(HIGH_SCORE_KEY)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(0)
}

/// Failures are logged; the caller's in-memory value stays authoritative.
pub fn save(store: &mut dyn KvStore, score: u32) {
    if let Err(e) = store.save(HIGH_SCORE_KEY, &score.to_string()) {
        tracing::warn!("high score not persisted: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::port::MemoryStore;

    #[test]
    fn defaults_to_zero() {
        let mut store = MemoryStore::new();
        assert_eq!(load(&store), 0);
        store.save(HIGH_SCORE_KEY, "abc").unwrap();
        assert_eq!(load(&store), 0);
    }

    #[test]
    fn saves_and_loads() {
        let mut store = MemoryStore::new();
        save(&mut store, 250);
        assert_eq!(load(&store), 250);
    }

    #[test]
    fn failed_save_is_swallowed() {
        let mut store = MemoryStore::new();
        save(&mut store, 40);
        store.fail_writes = true;
        save(&mut store, 90);
        assert_eq!(load(&store), 40);
    }
}
