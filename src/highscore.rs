//! Best-score record
//!
//! The shell persists a single best-score scalar (plus the tier and time it
//! was achieved) as JSON in LocalStorage. The record type and comparison
//! logic are platform-neutral; only the storage calls are wasm-gated.

use serde::{Deserialize, Serialize};

use crate::sim::Difficulty;

/// LocalStorage key
pub const STORAGE_KEY: &str = "neon_invaders_best";

/// A persisted best score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestScore {
    pub score: u32,
    pub difficulty: Difficulty,
    /// Unix timestamp (ms) when achieved
    pub timestamp_ms: f64,
}

impl BestScore {
    pub fn new(score: u32, difficulty: Difficulty, timestamp_ms: f64) -> Self {
        Self {
            score,
            difficulty,
            timestamp_ms,
        }
    }

    /// True if `score` would replace this record
    pub fn beaten_by(&self, score: u32) -> bool {
        score > self.score
    }
}

#[cfg(target_arch = "wasm32")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Load the stored best score, if any
#[cfg(target_arch = "wasm32")]
pub fn load() -> Option<BestScore> {
    let json = storage()?.get_item(STORAGE_KEY).ok()??;
    match serde_json::from_str(&json) {
        Ok(best) => Some(best),
        Err(err) => {
            log::warn!("discarding unreadable best-score record: {err}");
            None
        }
    }
}

/// Persist a new best score
#[cfg(target_arch = "wasm32")]
pub fn store(best: &BestScore) {
    let Ok(json) = serde_json::to_string(best) else {
        return;
    };
    if let Some(storage) = storage() {
        if storage.set_item(STORAGE_KEY, &json).is_err() {
            log::warn!("failed to persist best score");
        } else {
            log::info!("best score saved: {}", best.score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beaten_by() {
        let best = BestScore::new(500, Difficulty::Normal, 0.0);
        assert!(best.beaten_by(600));
        assert!(!best.beaten_by(500));
        assert!(!best.beaten_by(100));
    }

    #[test]
    fn test_json_round_trip() {
        let best = BestScore::new(1200, Difficulty::Hard, 1724580000000.0);
        let json = serde_json::to_string(&best).unwrap();
        let back: BestScore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, best);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<BestScore>("{\"score\":\"high\"}").is_err());
    }
}
