//! Outbound collaborators: roster and stat feeds, and bracket storage.

use crate::models::{
    Bracket, CompetitorId, LeagueId, Matchup, MatchupKey, NflPlayerId, Round, SlotAssignment,
    StatLookup,
};
use std::collections::HashMap;
use std::sync::RwLock;

/// Failure talking to a roster or stat feed. Safe to retry; nothing is written on failure.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("timed out fetching {0}")]
    Timeout(String),
    #[error("no roster for competitor {0}")]
    RosterNotFound(CompetitorId),
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Supplies each competitor's slot assignments for a week.
pub trait RosterProvider: Send + Sync {
    fn roster_slots(
        &self,
        competitor_id: CompetitorId,
        round: Round,
        week: u32,
    ) -> Result<Vec<SlotAssignment>, ProviderError>;
}

/// Supplies NFL stat lines.
pub trait StatLineProvider: Send + Sync {
    fn stat_line(&self, player_id: NflPlayerId, week: u32) -> Result<StatLookup, ProviderError>;
}

/// A stored value together with the version it was read at.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RepositoryError {
    /// The stored bracket moved on since it was loaded.
    #[error("bracket for league {league_id} was modified concurrently (expected version {expected}, found {actual})")]
    Conflict {
        league_id: LeagueId,
        expected: u64,
        actual: u64,
    },
    #[error("a bracket already exists for league {0}")]
    AlreadyExists(LeagueId),
    #[error("no bracket stored for league {0}")]
    NotFound(LeagueId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Whole-aggregate storage keyed by league, with optimistic versioning.
pub trait BracketRepository: Send + Sync {
    fn load(&self, league_id: LeagueId) -> Result<Option<Versioned<Bracket>>, RepositoryError>;

    /// Store a new bracket at version 1.
    fn insert(&self, bracket: Bracket) -> Result<u64, RepositoryError>;

    /// Replace the bracket if the stored version still equals `expected_version`.
    fn save(&self, bracket: Bracket, expected_version: u64) -> Result<u64, RepositoryError>;

    fn find_matchup(&self, key: &MatchupKey) -> Result<Option<Matchup>, RepositoryError> {
        Ok(self
            .load(key.league_id)?
            .and_then(|b| b.value.find_matchup(key).cloned()))
    }
}

/// Process-local repository, one entry per league.
#[derive(Debug, Default)]
pub struct InMemoryBracketRepository {
    brackets: RwLock<HashMap<LeagueId, Versioned<Bracket>>>,
}

impl InMemoryBracketRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_error() -> RepositoryError {
        RepositoryError::Unavailable("lock error".into())
    }
}

impl BracketRepository for InMemoryBracketRepository {
    fn load(&self, league_id: LeagueId) -> Result<Option<Versioned<Bracket>>, RepositoryError> {
        let g = self.brackets.read().map_err(|_| Self::lock_error())?;
        Ok(g.get(&league_id).cloned())
    }

    fn insert(&self, bracket: Bracket) -> Result<u64, RepositoryError> {
        let mut g = self.brackets.write().map_err(|_| Self::lock_error())?;
        if g.contains_key(&bracket.league_id) {
            return Err(RepositoryError::AlreadyExists(bracket.league_id));
        }
        g.insert(
            bracket.league_id,
            Versioned {
                version: 1,
                value: bracket,
            },
        );
        Ok(1)
    }

    fn save(&self, bracket: Bracket, expected_version: u64) -> Result<u64, RepositoryError> {
        let mut g = self.brackets.write().map_err(|_| Self::lock_error())?;
        let league_id = bracket.league_id;
        let entry = g
            .get_mut(&league_id)
            .ok_or(RepositoryError::NotFound(league_id))?;
        if entry.version != expected_version {
            return Err(RepositoryError::Conflict {
                league_id,
                expected: expected_version,
                actual: entry.version,
            });
        }
        entry.version += 1;
        entry.value = bracket;
        Ok(entry.version)
    }
}
