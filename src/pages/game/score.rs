use std::{fs, path::PathBuf};

use color_eyre::eyre::Result;
use serde::{Deserialize, Serialize};

use crate::utils::get_data_dir;

#[derive(Debug, Serialize, Deserialize)]
struct BestScoreRecord {
    best: u32,
}

/// Best-score persistence, one JSON record in the data directory. A missing
/// or unreadable record reads as 0; the game must start whatever is on disk.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new() -> Self {
        Self::at(get_data_dir().join("best_score.json"))
    }

    pub fn at(path: PathBuf) -> Self {
        ScoreStore { path }
    }

    pub fn load(&self) -> u32 {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| serde_json::from_str::<BestScoreRecord>(&raw).ok())
            .map(|record| record.best)
            .unwrap_or(0)
    }

    pub fn save(&self, best: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(&BestScoreRecord { best })?)?;
        Ok(())
    }
}

impl Default for ScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The running score plus the persisted maximum across all runs.
#[derive(Debug)]
pub struct ScoreBoard {
    score: u32,
    best: u32,
    store: ScoreStore,
}

impl ScoreBoard {
    pub fn new(store: ScoreStore) -> Self {
        let best = store.load();
        ScoreBoard { score: 0, best, store }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// A failed write is logged and swallowed; the record is best-effort
    /// and the run keeps going without it.
    pub fn increment(&mut self) {
        self.score += 1;
        if self.score > self.best {
            self.best = self.score;
            if let Err(e) = self.store.save(self.best) {
                log::warn!("failed to persist best score: {e:?}");
            }
        }
    }

    /// Starts a fresh run; the best score survives.
    pub fn reset(&mut self) {
        self.score = 0;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn temp_store(name: &str) -> ScoreStore {
        let path = std::env::temp_dir().join(format!("flappy-rs-{}-{}.json", name, std::process::id()));
        let _ = fs::remove_file(&path);
        ScoreStore::at(path)
    }

    #[test]
    fn test_load_defaults_to_zero_when_absent() {
        let store = temp_store("absent");
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_load_defaults_to_zero_when_corrupt() {
        let store = temp_store("corrupt");
        fs::write(&store.path, "not json at all").unwrap();
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let store = temp_store("roundtrip");
        store.save(12).unwrap();
        assert_eq!(store.load(), 12);
    }

    #[test]
    fn test_increment_tracks_best() {
        let store = temp_store("board");
        let mut board = ScoreBoard::new(store.clone());
        assert_eq!(board.score(), 0);
        assert_eq!(board.best(), 0);

        board.increment();
        board.increment();
        assert_eq!(board.score(), 2);
        assert_eq!(board.best(), 2);
        assert_eq!(store.load(), 2);
    }

    #[test]
    fn test_reset_keeps_best() {
        let store = temp_store("reset");
        let mut board = ScoreBoard::new(store);
        for _ in 0..3 {
            board.increment();
        }
        board.reset();
        assert_eq!(board.score(), 0);
        assert_eq!(board.best(), 3);

        // A worse follow-up run never lowers the record.
        board.increment();
        assert_eq!(board.best(), 3);
    }

    #[test]
    fn test_best_survives_a_new_board() {
        let store = temp_store("reload");
        let mut board = ScoreBoard::new(store.clone());
        for _ in 0..5 {
            board.increment();
        }
        drop(board);

        let board = ScoreBoard::new(store);
        assert_eq!(board.best(), 5);
        assert_eq!(board.score(), 0);
    }
}
