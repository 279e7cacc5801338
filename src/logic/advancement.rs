//! Round advancement: resolve matchups, eliminate losers, pair winners for the next round.

use crate::logic::tiebreaker::{resolve_tie, TiebreakProfile};
use crate::models::{
    Bracket, BracketError, BracketPhase, CompetitorId, Matchup, MatchupId, MatchupOutcome,
    MatchupSide, Round, RosterScore,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One resolved matchup, as reported back to the caller.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchupResult {
    pub matchup_id: MatchupId,
    pub matchup_number: u32,
    pub outcome: MatchupOutcome,
}

/// What a round's advancement did.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AdvancementResult {
    pub round: Round,
    pub eliminated: Vec<CompetitorId>,
    /// Winners plus any first-round bye recipients, in bracket order.
    pub advancing: Vec<CompetitorId>,
    pub matchup_results: Vec<MatchupResult>,
    pub complete: bool,
    pub next_round: Option<Round>,
}

/// Resolve every matchup of `round` and move the bracket on.
///
/// Requires `round` to be the current round with both sides of every matchup fully scored.
/// Equal totals go to the tiebreaker cascade. Either the whole transition is applied or the
/// bracket is left untouched.
pub fn process_advancement(
    bracket: &mut Bracket,
    round: Round,
) -> Result<AdvancementResult, BracketError> {
    if bracket.is_complete() {
        return Err(BracketError::AlreadyComplete);
    }
    let current = bracket.current_round();
    if round != current {
        return Err(BracketError::InvalidRoundTransition {
            requested: round,
            current,
        });
    }

    let matchups = bracket.matchups_for(round);
    if matchups.is_empty() {
        return Err(BracketError::RoundHasNoMatchups(round));
    }
    let pending = matchups
        .iter()
        .filter(|m| scores_for(bracket, m).is_none())
        .count();
    if pending > 0 {
        log::debug!("{round} round not ready: {pending} matchup(s) still scoring");
        return Err(BracketError::IncompleteRound { round, pending });
    }

    let now = Utc::now();
    let outcomes = matchups
        .iter()
        .map(|m| decide(bracket, m, now))
        .collect::<Result<Vec<_>, _>>()?;
    let advancing = advancing_in_bracket_order(bracket, round, &outcomes);
    let eliminated: Vec<CompetitorId> = outcomes.iter().map(|o| o.loser_id).collect();

    let mut staged = bracket.clone();
    let mut matchup_results = Vec::with_capacity(outcomes.len());
    for (matchup, outcome) in staged
        .matchups
        .entry(round)
        .or_default()
        .iter_mut()
        .zip(&outcomes)
    {
        matchup.complete(outcome.clone())?;
        matchup_results.push(MatchupResult {
            matchup_id: matchup.id,
            matchup_number: matchup.matchup_number,
            outcome: outcome.clone(),
        });
    }
    for outcome in &outcomes {
        staged
            .players
            .get_mut(&outcome.loser_id)
            .ok_or(BracketError::CompetitorNotFound(outcome.loser_id))?
            .eliminate(round, outcome.winner_id, now)?;
    }

    match round.next() {
        None => {
            let champion_id = *advancing
                .first()
                .ok_or(BracketError::RoundHasNoMatchups(round))?;
            let champion = staged
                .players
                .get_mut(&champion_id)
                .ok_or(BracketError::CompetitorNotFound(champion_id))?;
            champion.crown()?;
            log::info!(
                "{} wins the {} playoffs",
                champion.name,
                staged.league_name
            );
        }
        Some(next) => {
            let next_matchups = pair_next_round(&staged, next, &advancing)?;
            log::info!(
                "{round} round complete: {} eliminated, {} advance to the {next} round",
                eliminated.len(),
                advancing.len()
            );
            staged.matchups.insert(next, next_matchups);
        }
    }
    staged.phase = BracketPhase::after(round);
    staged.updated_at = now;
    *bracket = staged;

    Ok(AdvancementResult {
        round,
        eliminated,
        advancing,
        matchup_results,
        complete: bracket.is_complete(),
        next_round: round.next(),
    })
}

/// Both sides' scores, if both exist and are complete.
fn scores_for<'a>(bracket: &'a Bracket, m: &Matchup) -> Option<(&'a RosterScore, &'a RosterScore)> {
    let home = bracket.score_for(m.round, m.home.competitor_id)?;
    let away = bracket.score_for(m.round, m.away.competitor_id)?;
    (home.is_complete && away.is_complete).then_some((home, away))
}

fn decide(
    bracket: &Bracket,
    m: &Matchup,
    now: DateTime<Utc>,
) -> Result<MatchupOutcome, BracketError> {
    let (home_score, away_score) = scores_for(bracket, m).ok_or(BracketError::IncompleteRound {
        round: m.round,
        pending: 1,
    })?;

    let (winner, loser, tiebreaker) = match home_score.total_score.cmp(&away_score.total_score) {
        Ordering::Greater => (&m.home, &m.away, None),
        Ordering::Less => (&m.away, &m.home, None),
        Ordering::Equal => {
            let home_profile = profile(bracket, home_score)?;
            let away_profile = profile(bracket, away_score)?;
            let result = resolve_tie(&home_profile, &away_profile, &bracket.tiebreakers);
            log::info!(
                "{} round matchup {} tied at {}; {:?} decided it ({} vs {})",
                m.round,
                m.matchup_number,
                home_score.total_score,
                result.method_used,
                result.winner_value,
                result.loser_value
            );
            if result.winner_id == m.home.competitor_id {
                (&m.home, &m.away, Some(result))
            } else {
                (&m.away, &m.home, Some(result))
            }
        }
    };

    let total = |side: &MatchupSide| -> BigDecimal {
        if side.competitor_id == m.home.competitor_id {
            home_score.total_score.clone()
        } else {
            away_score.total_score.clone()
        }
    };
    Ok(MatchupOutcome {
        winner_id: winner.competitor_id,
        loser_id: loser.competitor_id,
        margin: total(winner) - total(loser),
        is_upset: winner.seed > loser.seed,
        tiebreaker,
        completed_at: now,
    })
}

fn profile(bracket: &Bracket, score: &RosterScore) -> Result<TiebreakProfile, BracketError> {
    let entry = bracket
        .player(score.competitor_id)
        .ok_or(BracketError::CompetitorNotFound(score.competitor_id))?;
    Ok(TiebreakProfile::for_round(entry, score))
}

/// Everyone moving on from `round`, ordered by bracket slot. In the opening round a bye
/// recipient holds the slot of its seed, the same slot its matchup would have had.
fn advancing_in_bracket_order(
    bracket: &Bracket,
    round: Round,
    outcomes: &[MatchupOutcome],
) -> Vec<CompetitorId> {
    let matchups = bracket.matchups_for(round);
    if round != bracket.first_round {
        return outcomes.iter().map(|o| o.winner_id).collect();
    }
    let mut slots: Vec<(u32, CompetitorId)> = matchups
        .iter()
        .zip(outcomes)
        .map(|(m, o)| (m.home.seed, o.winner_id))
        .collect();
    slots.extend(
        bracket
            .first_round_byes
            .iter()
            .filter_map(|id| bracket.player(*id))
            .map(|p| (p.seed, p.competitor_id)),
    );
    slots.sort_by_key(|(slot, _)| *slot);
    slots.into_iter().map(|(_, id)| id).collect()
}

/// Slot i meets slot (total - i + 1), so the outside of the bracket folds onto the inside.
fn pair_next_round(
    bracket: &Bracket,
    round: Round,
    advancing: &[CompetitorId],
) -> Result<Vec<Matchup>, BracketError> {
    let side = |id: CompetitorId| -> Result<MatchupSide, BracketError> {
        bracket
            .player(id)
            .map(MatchupSide::from)
            .ok_or(BracketError::CompetitorNotFound(id))
    };
    let n = advancing.len();
    (0..n / 2)
        .map(|i| {
            Ok(Matchup::new(
                bracket.id,
                round,
                i as u32 + 1,
                side(advancing[i])?,
                side(advancing[n - 1 - i])?,
            ))
        })
        .collect()
}
