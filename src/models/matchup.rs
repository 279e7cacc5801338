//! A head-to-head pairing within one round.

use crate::models::bracket::{BracketError, BracketId, LeagueId};
use crate::models::player::{CompetitorId, PlayerEntry};
use crate::models::round::Round;
use crate::models::tiebreaker::TiebreakerResult;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a matchup.
pub type MatchupId = Uuid;

/// Stable storage key: matchups are upserted by league, round and number.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct MatchupKey {
    pub league_id: LeagueId,
    pub round: Round,
    pub matchup_number: u32,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchupStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchupEvent {
    ScoreRecorded,
    Resolved,
}

impl MatchupStatus {
    /// Transition table. Completed matchups accept no events.
    pub fn on(self, event: MatchupEvent) -> Result<MatchupStatus, BracketError> {
        use MatchupEvent::*;
        use MatchupStatus::*;
        match (self, event) {
            (Scheduled | InProgress, ScoreRecorded) => Ok(InProgress),
            (InProgress, Resolved) => Ok(Completed),
            (from, event) => Err(BracketError::IllegalTransition {
                entity: "matchup",
                from: from.label(),
                event: match event {
                    ScoreRecorded => "record score",
                    Resolved => "resolve",
                },
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchupStatus::Scheduled => "scheduled",
            MatchupStatus::InProgress => "in progress",
            MatchupStatus::Completed => "completed",
        }
    }
}

/// One competitor's side of a matchup.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchupSide {
    pub competitor_id: CompetitorId,
    pub name: String,
    pub seed: u32,
}

impl From<&PlayerEntry> for MatchupSide {
    fn from(entry: &PlayerEntry) -> Self {
        Self {
            competitor_id: entry.competitor_id,
            name: entry.name.clone(),
            seed: entry.seed,
        }
    }
}

/// Result of a completed matchup.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchupOutcome {
    pub winner_id: CompetitorId,
    pub loser_id: CompetitorId,
    pub margin: BigDecimal,
    /// Winner's seed number is greater than the loser's.
    pub is_upset: bool,
    pub tiebreaker: Option<TiebreakerResult>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub id: MatchupId,
    pub bracket_id: BracketId,
    pub round: Round,
    /// 1-indexed within the round.
    pub matchup_number: u32,
    /// Higher bracket position (the better seed when the pairing is created).
    pub home: MatchupSide,
    pub away: MatchupSide,
    pub status: MatchupStatus,
    pub outcome: Option<MatchupOutcome>,
}

impl Matchup {
    pub fn new(
        bracket_id: BracketId,
        round: Round,
        matchup_number: u32,
        home: MatchupSide,
        away: MatchupSide,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            bracket_id,
            round,
            matchup_number,
            home,
            away,
            status: MatchupStatus::Scheduled,
            outcome: None,
        }
    }

    pub fn key(&self, league_id: LeagueId) -> MatchupKey {
        MatchupKey {
            league_id,
            round: self.round,
            matchup_number: self.matchup_number,
        }
    }

    pub fn has(&self, competitor_id: CompetitorId) -> bool {
        self.home.competitor_id == competitor_id || self.away.competitor_id == competitor_id
    }

    pub fn sides(&self) -> [&MatchupSide; 2] {
        [&self.home, &self.away]
    }

    pub fn winner_id(&self) -> Option<CompetitorId> {
        self.outcome.as_ref().map(|o| o.winner_id)
    }

    pub fn is_upset(&self) -> bool {
        self.outcome.as_ref().is_some_and(|o| o.is_upset)
    }

    pub fn record_score(&mut self) -> Result<(), BracketError> {
        self.status = self.status.on(MatchupEvent::ScoreRecorded)?;
        Ok(())
    }

    /// Close the matchup with its outcome.
    pub fn complete(&mut self, outcome: MatchupOutcome) -> Result<(), BracketError> {
        self.status = self.status.on(MatchupEvent::Resolved)?;
        self.outcome = Some(outcome);
        Ok(())
    }
}
