//! Data structures for the playoff bracket: competitors, matchups, scores, rankings.

mod bracket;
mod matchup;
mod player;
mod ranking;
mod round;
mod rules;
mod score;
mod tiebreaker;

pub use bracket::{Bracket, BracketError, BracketId, LeagueId};
pub use matchup::{
    Matchup, MatchupEvent, MatchupId, MatchupKey, MatchupOutcome, MatchupSide, MatchupStatus,
};
pub use player::{CompetitorId, Elimination, PlayerEntry, PlayerStatus, Seeding};
pub use ranking::{PlayoffRanking, RankingView};
pub use round::{BracketPhase, Round};
pub use rules::{PointsAllowedTier, ScoringRules};
pub use score::{
    AssignedPlayer, Lineup, NflPlayerId, Position, PositionScore, RosterScore, SlotAssignment,
    SlotStatus, StatLine, StatLookup,
};
pub use tiebreaker::{TiebreakerConfiguration, TiebreakerMethod, TiebreakerResult};
