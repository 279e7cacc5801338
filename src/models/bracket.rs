//! The bracket aggregate and its error type.

use crate::models::matchup::{Matchup, MatchupKey};
use crate::models::player::{CompetitorId, PlayerEntry, PlayerStatus};
use crate::models::ranking::{PlayoffRanking, RankingView};
use crate::models::round::{BracketPhase, Round};
use crate::models::score::RosterScore;
use crate::models::tiebreaker::TiebreakerConfiguration;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for a bracket.
pub type BracketId = Uuid;

/// Identifier of the league that owns a bracket.
pub type LeagueId = Uuid;

/// Errors raised by bracket operations.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum BracketError {
    /// Seeds missing, duplicated, or out of range.
    #[error("invalid seeding: {0}")]
    InvalidSeeding(String),
    #[error("invalid tiebreaker configuration: {0}")]
    InvalidTiebreakers(String),
    /// Some scores in the round are missing or not final yet. Retry once stats finalize.
    #[error("{round} round is not fully scored ({pending} matchup(s) pending)")]
    IncompleteRound { round: Round, pending: usize },
    /// Advancement requested for a round other than the current one.
    #[error("cannot advance the {requested} round while the {current} round is current")]
    InvalidRoundTransition { requested: Round, current: Round },
    #[error("bracket is already complete")]
    AlreadyComplete,
    #[error("the {round} round is not open for scoring (current round is {current})")]
    RoundNotOpen { round: Round, current: Round },
    #[error("the {0} round is not part of this bracket")]
    RoundNotInBracket(Round),
    #[error("the {0} round has not been reached yet")]
    RoundNotReached(Round),
    /// The current round holds no matchups; the stored bracket is inconsistent.
    #[error("the {0} round has no matchups to resolve")]
    RoundHasNoMatchups(Round),
    #[error("matchup not found in the {round} round")]
    MatchupNotFound { round: Round },
    #[error("competitor {0} is not in this bracket")]
    CompetitorNotFound(CompetitorId),
    #[error("competitor {competitor_id} has no matchup in the {round} round")]
    CompetitorNotInRound {
        competitor_id: CompetitorId,
        round: Round,
    },
    #[error("cannot {event} a {from} {entity}")]
    IllegalTransition {
        entity: &'static str,
        from: &'static str,
        event: &'static str,
    },
}

impl BracketError {
    /// Incomplete rounds resolve themselves once upstream stats finalize; everything else is a caller error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BracketError::IncompleteRound { .. })
    }
}

/// Aggregate root: competitors, matchups, scores and rankings of one league's playoffs.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub id: BracketId,
    pub league_id: LeagueId,
    pub league_name: String,
    pub phase: BracketPhase,
    /// Opening round; depends on the number of competitors.
    pub first_round: Round,
    pub total_players: usize,
    pub tiebreakers: TiebreakerConfiguration,
    pub players: BTreeMap<CompetitorId, PlayerEntry>,
    /// Competitors that skip the first round, in seed order.
    pub first_round_byes: Vec<CompetitorId>,
    pub matchups: BTreeMap<Round, Vec<Matchup>>,
    pub scores: BTreeMap<Round, BTreeMap<CompetitorId, RosterScore>>,
    /// Ranking snapshots. The only state written after completion, and then once per round
    /// and view.
    pub round_rankings: BTreeMap<Round, Vec<PlayoffRanking>>,
    pub cumulative_rankings: BTreeMap<Round, Vec<PlayoffRanking>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bracket {
    /// Empty bracket opening at `first_round`. Use `initialize_bracket` to seed one.
    pub(crate) fn new(
        league_id: LeagueId,
        league_name: impl Into<String>,
        first_round: Round,
        tiebreakers: TiebreakerConfiguration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            league_id,
            league_name: league_name.into(),
            phase: BracketPhase::Active(first_round),
            first_round,
            total_players: 0,
            tiebreakers,
            players: BTreeMap::new(),
            first_round_byes: Vec::new(),
            matchups: BTreeMap::new(),
            scores: BTreeMap::new(),
            round_rankings: BTreeMap::new(),
            cumulative_rankings: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Round being played; the final round once the bracket is complete.
    pub fn current_round(&self) -> Round {
        match self.phase {
            BracketPhase::Active(round) => round,
            BracketPhase::Complete => Round::Championship,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase.is_complete()
    }

    /// Rounds this bracket plays, in order.
    pub fn rounds(&self) -> impl Iterator<Item = Round> {
        self.first_round.through_final()
    }

    pub fn contains_round(&self, round: Round) -> bool {
        round >= self.first_round
    }

    pub fn player(&self, id: CompetitorId) -> Option<&PlayerEntry> {
        self.players.get(&id)
    }

    pub fn active_players(&self) -> impl Iterator<Item = &PlayerEntry> {
        self.players.values().filter(|p| p.is_active())
    }

    pub fn champion(&self) -> Option<&PlayerEntry> {
        self.players
            .values()
            .find(|p| p.status == PlayerStatus::Champion)
    }

    pub fn matchups_for(&self, round: Round) -> &[Matchup] {
        self.matchups.get(&round).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn matchup_for_competitor(&self, round: Round, id: CompetitorId) -> Option<&Matchup> {
        self.matchups_for(round).iter().find(|m| m.has(id))
    }

    pub fn find_matchup(&self, key: &MatchupKey) -> Option<&Matchup> {
        if key.league_id != self.league_id {
            return None;
        }
        self.matchups_for(key.round)
            .iter()
            .find(|m| m.matchup_number == key.matchup_number)
    }

    pub fn score_for(&self, round: Round, id: CompetitorId) -> Option<&RosterScore> {
        self.scores.get(&round).and_then(|s| s.get(&id))
    }

    pub fn rankings(&self, round: Round, view: RankingView) -> &[PlayoffRanking] {
        let stored = match view {
            RankingView::PerRound => &self.round_rankings,
            RankingView::Cumulative => &self.cumulative_rankings,
        };
        stored.get(&round).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Write or overwrite the competitor's score for the current round.
    pub fn record_score(&mut self, score: RosterScore) -> Result<(), BracketError> {
        if self.is_complete() {
            return Err(BracketError::AlreadyComplete);
        }
        let current = self.current_round();
        if score.round != current {
            return Err(BracketError::RoundNotOpen {
                round: score.round,
                current,
            });
        }
        let matchup = self
            .matchups
            .get_mut(&current)
            .and_then(|ms| ms.iter_mut().find(|m| m.has(score.competitor_id)))
            .ok_or(BracketError::CompetitorNotInRound {
                competitor_id: score.competitor_id,
                round: current,
            })?;
        matchup.record_score()?;
        self.scores
            .entry(current)
            .or_default()
            .insert(score.competitor_id, score);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Rounds won: byes count, the round a competitor went out in does not.
    pub fn rounds_survived(&self, id: CompetitorId) -> u32 {
        let first = self.first_round.ordinal();
        match self.players.get(&id).map(|p| &p.status) {
            Some(PlayerStatus::Eliminated(e)) => e.round.ordinal() - first,
            Some(PlayerStatus::Champion) => Round::Championship.ordinal() - first + 1,
            Some(PlayerStatus::Active) => self.current_round().ordinal() - first,
            None => 0,
        }
    }
}
