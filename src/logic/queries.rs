//! Read-only projections over a bracket for display.

use crate::models::{
    Bracket, BracketError, CompetitorId, Lineup, Matchup, MatchupId, MatchupSide, MatchupStatus,
    Position, Round, RosterScore, TiebreakerResult,
};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// How to pick a matchup within a round.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchupSelector {
    Id(MatchupId),
    Number(u32),
    Competitor(CompetitorId),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SideDetails {
    pub competitor_id: CompetitorId,
    pub name: String,
    pub seed: u32,
    /// None until a score has been recorded.
    pub score: Option<BigDecimal>,
    pub is_complete: bool,
    /// Slots still live or waiting on a game, bench included.
    pub slots_remaining: usize,
}

/// Slot-by-slot comparison row (slots are matched by position in the roster).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SlotComparison {
    pub position: Position,
    pub lineup: Lineup,
    pub home_player: Option<String>,
    pub home_points: BigDecimal,
    pub away_player: Option<String>,
    pub away_points: BigDecimal,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchupDetails {
    pub matchup_id: MatchupId,
    pub round: Round,
    pub matchup_number: u32,
    pub status: MatchupStatus,
    pub home: SideDetails,
    pub away: SideDetails,
    pub winner_id: Option<CompetitorId>,
    pub loser_id: Option<CompetitorId>,
    pub margin: Option<BigDecimal>,
    pub is_upset: bool,
    pub tiebreaker: Option<TiebreakerResult>,
    pub slot_comparisons: Vec<SlotComparison>,
}

pub fn get_matchup_details(
    bracket: &Bracket,
    round: Round,
    selector: MatchupSelector,
) -> Result<MatchupDetails, BracketError> {
    let matchup = bracket
        .matchups_for(round)
        .iter()
        .find(|m| match selector {
            MatchupSelector::Id(id) => m.id == id,
            MatchupSelector::Number(n) => m.matchup_number == n,
            MatchupSelector::Competitor(c) => m.has(c),
        })
        .ok_or(BracketError::MatchupNotFound { round })?;
    Ok(details(bracket, matchup))
}

/// Details for every matchup of a round, in matchup order.
pub fn round_matchups(bracket: &Bracket, round: Round) -> Vec<MatchupDetails> {
    bracket
        .matchups_for(round)
        .iter()
        .map(|m| details(bracket, m))
        .collect()
}

fn details(bracket: &Bracket, m: &Matchup) -> MatchupDetails {
    let home_score = bracket.score_for(m.round, m.home.competitor_id);
    let away_score = bracket.score_for(m.round, m.away.competitor_id);
    let outcome = m.outcome.as_ref();
    MatchupDetails {
        matchup_id: m.id,
        round: m.round,
        matchup_number: m.matchup_number,
        status: m.status,
        home: side_details(&m.home, home_score),
        away: side_details(&m.away, away_score),
        winner_id: outcome.map(|o| o.winner_id),
        loser_id: outcome.map(|o| o.loser_id),
        margin: outcome.map(|o| o.margin.clone()),
        is_upset: m.is_upset(),
        tiebreaker: outcome.and_then(|o| o.tiebreaker.clone()),
        slot_comparisons: match (home_score, away_score) {
            (Some(h), Some(a)) => compare_slots(h, a),
            _ => Vec::new(),
        },
    }
}

fn side_details(side: &MatchupSide, score: Option<&RosterScore>) -> SideDetails {
    SideDetails {
        competitor_id: side.competitor_id,
        name: side.name.clone(),
        seed: side.seed,
        score: score.map(|s| s.total_score.clone()),
        is_complete: score.is_some_and(|s| s.is_complete),
        slots_remaining: score.map_or(0, RosterScore::slots_remaining),
    }
}

fn compare_slots(home: &RosterScore, away: &RosterScore) -> Vec<SlotComparison> {
    home.position_scores
        .iter()
        .zip(&away.position_scores)
        .map(|(h, a)| SlotComparison {
            position: h.position,
            lineup: h.lineup,
            home_player: h.player_name().map(str::to_owned),
            home_points: h.points.clone(),
            away_player: a.player_name().map(str::to_owned),
            away_points: a.points.clone(),
        })
        .collect()
}
