//! Tiebreaker methods, the per-bracket cascade, and resolution records.

use crate::models::bracket::BracketError;
use crate::models::player::CompetitorId;
use serde::{Deserialize, Serialize};

/// A single way of separating two tied competitors.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TiebreakerMethod {
    /// More touchdowns among starters wins.
    MostTouchdowns,
    /// More points left on the bench wins.
    BenchPoints,
    /// Best single starting slot wins.
    HighestSlotScore,
    /// Second-best starting slot wins.
    SecondHighestSlotScore,
    /// Fewer interceptions plus fumbles lost wins.
    FewerTurnovers,
    /// Higher regular-season total wins.
    RegularSeasonScore,
    /// Numerically lower seed wins.
    LowerSeed,
}

/// Ordered, non-empty, duplicate-free list of tiebreaker methods.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TiebreakerMethod>", into = "Vec<TiebreakerMethod>")]
pub struct TiebreakerConfiguration {
    methods: Vec<TiebreakerMethod>,
}

impl TiebreakerConfiguration {
    pub fn new(methods: Vec<TiebreakerMethod>) -> Result<Self, BracketError> {
        if methods.is_empty() {
            return Err(BracketError::InvalidTiebreakers(
                "at least one tiebreaker method is required".into(),
            ));
        }
        for (i, m) in methods.iter().enumerate() {
            if methods[..i].contains(m) {
                return Err(BracketError::InvalidTiebreakers(format!(
                    "{m:?} is listed more than once"
                )));
            }
        }
        Ok(Self { methods })
    }

    pub fn methods(&self) -> &[TiebreakerMethod] {
        &self.methods
    }
}

impl Default for TiebreakerConfiguration {
    fn default() -> Self {
        Self {
            methods: vec![
                TiebreakerMethod::MostTouchdowns,
                TiebreakerMethod::BenchPoints,
                TiebreakerMethod::HighestSlotScore,
                TiebreakerMethod::RegularSeasonScore,
                TiebreakerMethod::LowerSeed,
            ],
        }
    }
}

impl TryFrom<Vec<TiebreakerMethod>> for TiebreakerConfiguration {
    type Error = BracketError;

    fn try_from(methods: Vec<TiebreakerMethod>) -> Result<Self, Self::Error> {
        Self::new(methods)
    }
}

impl From<TiebreakerConfiguration> for Vec<TiebreakerMethod> {
    fn from(config: TiebreakerConfiguration) -> Self {
        config.methods
    }
}

/// How a tie was broken.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TiebreakerResult {
    pub winner_id: CompetitorId,
    pub loser_id: CompetitorId,
    pub method_used: TiebreakerMethod,
    pub winner_value: String,
    pub loser_value: String,
    /// Every configured method tied and the lower seed was taken.
    pub cascade_exhausted: bool,
}
