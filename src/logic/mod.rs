//! Bracket business logic: setup, scoring, tiebreaks, advancement, rankings and queries.

mod advancement;
mod queries;
mod rankings;
mod scoring;
mod setup;
mod tiebreaker;

pub use advancement::{process_advancement, AdvancementResult, MatchupResult};
pub use queries::{
    get_matchup_details, round_matchups, MatchupDetails, MatchupSelector, SideDetails,
    SlotComparison,
};
pub use rankings::generate_rankings;
pub use scoring::{
    calculate_score, compute_roster_score, position_points, score_slot, ScoringError,
};
pub use setup::{initialize_bracket, read_seeds_csv};
pub use tiebreaker::{cascade_order, resolve_tie, TiebreakProfile};
