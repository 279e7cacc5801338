//! Command/query façade over a bracket repository and the stat feeds.
//!
//! Every mutating command loads the bracket with its version, applies the change in memory,
//! and saves only if nobody else saved in between. On a version conflict the whole cycle is
//! retried against the fresh copy.

use crate::config::EngineConfig;
use crate::logic::{
    self, AdvancementResult, MatchupDetails, MatchupSelector, ScoringError,
};
use crate::models::{
    Bracket, BracketError, CompetitorId, LeagueId, PlayoffRanking, Round, RosterScore,
    ScoringRules, Seeding, TiebreakerConfiguration,
};
use crate::ports::{
    BracketRepository, ProviderError, RepositoryError, RosterProvider, StatLineProvider,
    Versioned,
};
use std::sync::Arc;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Bracket(#[from] BracketError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("no playoff bracket for league {0}")]
    BracketNotFound(LeagueId),
    #[error("gave up saving league {league_id} after {attempts} conflicting attempt(s)")]
    ConflictRetriesExhausted { league_id: LeagueId, attempts: u32 },
}

impl EngineError {
    /// Worth re-invoking later without changing the request.
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::Bracket(e) => e.is_retryable(),
            EngineError::Provider(_) => true,
            EngineError::Repository(RepositoryError::Unavailable(_)) => true,
            EngineError::ConflictRetriesExhausted { .. } => true,
            _ => false,
        }
    }
}

impl From<ScoringError> for EngineError {
    fn from(value: ScoringError) -> Self {
        match value {
            ScoringError::Bracket(e) => EngineError::Bracket(e),
            ScoringError::Provider(e) => EngineError::Provider(e),
        }
    }
}

pub struct PlayoffEngine {
    repository: Arc<dyn BracketRepository>,
    rosters: Arc<dyn RosterProvider>,
    stats: Arc<dyn StatLineProvider>,
    rules: ScoringRules,
    config: EngineConfig,
}

impl PlayoffEngine {
    pub fn new(
        repository: Arc<dyn BracketRepository>,
        rosters: Arc<dyn RosterProvider>,
        stats: Arc<dyn StatLineProvider>,
        rules: ScoringRules,
        config: EngineConfig,
    ) -> Self {
        Self {
            repository,
            rosters,
            stats,
            rules,
            config,
        }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Seed a new bracket for the league and store it.
    pub fn initialize_bracket(
        &self,
        league_id: LeagueId,
        league_name: &str,
        seeds: Vec<Seeding>,
        tiebreakers: TiebreakerConfiguration,
    ) -> Result<Bracket, EngineError> {
        let bracket = logic::initialize_bracket(league_id, league_name, seeds, tiebreakers)?;
        self.repository.insert(bracket.clone())?;
        Ok(bracket)
    }

    pub fn bracket(&self, league_id: LeagueId) -> Result<Bracket, EngineError> {
        Ok(self.load(league_id)?.value)
    }

    pub fn calculate_score(
        &self,
        league_id: LeagueId,
        competitor_id: CompetitorId,
        round: Round,
        week: u32,
    ) -> Result<RosterScore, EngineError> {
        self.mutate(league_id, |bracket| {
            logic::calculate_score(
                bracket,
                competitor_id,
                round,
                week,
                self.rosters.as_ref(),
                self.stats.as_ref(),
                &self.rules,
            )
            .map_err(EngineError::from)
        })
    }

    pub fn process_advancement(
        &self,
        league_id: LeagueId,
        round: Round,
    ) -> Result<AdvancementResult, EngineError> {
        self.mutate(league_id, |bracket| {
            Ok(logic::process_advancement(bracket, round)?)
        })
    }

    pub fn generate_rankings(
        &self,
        league_id: LeagueId,
        round: Round,
        cumulative: bool,
    ) -> Result<Vec<PlayoffRanking>, EngineError> {
        self.mutate(league_id, |bracket| {
            Ok(logic::generate_rankings(bracket, round, cumulative)?)
        })
    }

    pub fn matchup_details(
        &self,
        league_id: LeagueId,
        round: Round,
        selector: MatchupSelector,
    ) -> Result<MatchupDetails, EngineError> {
        let bracket = self.load(league_id)?.value;
        Ok(logic::get_matchup_details(&bracket, round, selector)?)
    }

    fn load(&self, league_id: LeagueId) -> Result<Versioned<Bracket>, EngineError> {
        self.repository
            .load(league_id)?
            .ok_or(EngineError::BracketNotFound(league_id))
    }

    /// Load, apply `f`, save with a version check; retry from a fresh load on conflict.
    /// Nothing is saved when `f` fails.
    fn mutate<T>(
        &self,
        league_id: LeagueId,
        mut f: impl FnMut(&mut Bracket) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let attempts = self.config.max_save_attempts.max(1);
        for attempt in 1..=attempts {
            let Versioned {
                version,
                value: mut bracket,
            } = self.load(league_id)?;
            let out = f(&mut bracket)?;
            match self.repository.save(bracket, version) {
                Ok(_) => return Ok(out),
                Err(RepositoryError::Conflict { .. }) => {
                    log::warn!(
                        "Concurrent update to league {league_id} bracket (attempt {attempt}/{attempts}); retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(EngineError::ConflictRetriesExhausted {
            league_id,
            attempts,
        })
    }
}
