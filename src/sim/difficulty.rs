//! Difficulty policy
//!
//! Pure mapping from a tier to the pair of multipliers applied to enemy
//! bullet speed and enemy fire probability.

use serde::{Deserialize, Serialize};

/// Difficulty tiers, ordered easiest to hardest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    Normal,
    #[default]
    Hard,
}

/// Multipliers resolved from a difficulty tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyMods {
    /// Applied to enemy bullet speed
    pub speed: f32,
    /// Applied to enemy fire probability
    pub frequency: f32,
}

impl Difficulty {
    pub fn mods(self) -> DifficultyMods {
        let (speed, frequency) = match self {
            Difficulty::Easy => (1.0 / 3.0, 1.0 / 3.0),
            Difficulty::Normal => (2.0 / 3.0, 2.0 / 3.0),
            Difficulty::Hard => (1.0, 1.0),
        };
        DifficultyMods { speed, frequency }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    /// Parse a host-supplied tier name. Unrecognized values fall back to the
    /// hardest tier rather than failing.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "normal" | "medium" => Difficulty::Normal,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Hard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_multipliers() {
        assert_eq!(Difficulty::Easy.mods().speed, 1.0 / 3.0);
        assert_eq!(Difficulty::Easy.mods().frequency, 1.0 / 3.0);
        assert_eq!(Difficulty::Normal.mods().speed, 2.0 / 3.0);
        assert_eq!(Difficulty::Hard.mods(), DifficultyMods { speed: 1.0, frequency: 1.0 });
    }

    #[test]
    fn test_parse_falls_back_to_hard() {
        assert_eq!(Difficulty::parse("easy"), Difficulty::Easy);
        assert_eq!(Difficulty::parse("Normal"), Difficulty::Normal);
        assert_eq!(Difficulty::parse("HARD"), Difficulty::Hard);
        assert_eq!(Difficulty::parse("nightmare"), Difficulty::Hard);
        assert_eq!(Difficulty::parse(""), Difficulty::Hard);
    }
}
