//! Fantasy football playoff bracket: seeding, roster scoring, tiebreaks, advancement and rankings.

pub mod config;
pub mod engine;
pub mod logic;
pub mod models;
pub mod ports;

pub use config::EngineConfig;
pub use engine::{EngineError, PlayoffEngine};
pub use logic::{
    calculate_score, generate_rankings, get_matchup_details, initialize_bracket,
    process_advancement, read_seeds_csv, resolve_tie, round_matchups, AdvancementResult,
    MatchupDetails, MatchupResult, MatchupSelector, ScoringError,
};
pub use models::{
    Bracket, BracketError, BracketPhase, CompetitorId, LeagueId, Matchup, MatchupStatus,
    PlayerEntry, PlayerStatus, PlayoffRanking, Round, RosterScore, ScoringRules, Seeding,
    TiebreakerConfiguration, TiebreakerMethod, TiebreakerResult,
};
pub use ports::{
    BracketRepository, InMemoryBracketRepository, ProviderError, RepositoryError,
    RosterProvider, StatLineProvider,
};
