//! Difficulty tiers and their fixed search configurations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::WinRule;
use crate::search::SearchParams;

/// Difficulty tier. Wire strings are the lowercase names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

/// Immutable per-tier configuration, fixed at process start.
#[derive(Debug, Clone, Copy)]
pub struct DifficultyConfig {
    pub depth: u32,
    /// Whether the tier asks for the neural evaluator (heuristic is the
    /// fallback either way).
    pub use_model: bool,
    pub candidate_radius: u32,
    pub root_candidates: usize,
    pub inner_candidates: usize,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    pub fn config(self) -> DifficultyConfig {
        let (depth, use_model) = match self {
            Difficulty::Easy => (1, false),
            Difficulty::Medium => (2, false),
            Difficulty::Hard => (3, true),
            Difficulty::Expert => (4, true),
        };
        DifficultyConfig {
            depth,
            use_model,
            candidate_radius: 2,
            root_candidates: 30,
            inner_candidates: 20,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

impl DifficultyConfig {
    /// Search parameters for this tier.
    pub fn search_params(&self, rule: WinRule, threads: usize) -> SearchParams {
        SearchParams {
            depth: self.depth,
            radius: self.candidate_radius,
            root_candidates: self.root_candidates,
            inner_candidates: self.inner_candidates,
            threads: threads.max(1),
            movetime: None,
            use_tt: true,
            rule,
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_table_matches_service_contract() {
        assert_eq!(Difficulty::Easy.config().depth, 1);
        assert_eq!(Difficulty::Medium.config().depth, 2);
        assert_eq!(Difficulty::Hard.config().depth, 3);
        assert_eq!(Difficulty::Expert.config().depth, 4);
        assert!(!Difficulty::Medium.config().use_model);
        assert!(Difficulty::Hard.config().use_model);
    }

    #[test]
    fn parses_wire_strings() {
        assert_eq!("expert".parse::<Difficulty>().unwrap(), Difficulty::Expert);
        assert!("impossible".parse::<Difficulty>().is_err());
    }
}
