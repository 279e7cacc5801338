//! Per-round and cumulative rankings.

use crate::logic::tiebreaker::{cascade_order, TiebreakProfile};
use crate::models::{
    Bracket, BracketError, CompetitorId, PlayoffRanking, RankingView, Round, RosterScore,
};
use bigdecimal::BigDecimal;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};

/// Rank competitors for `round` and store the snapshot under its view.
///
/// Per-round view ranks everyone with a score in `round`; cumulative ranks everyone with a
/// score in any round up to and including it, by running total. Equal scores go through the
/// bracket's tiebreaker cascade, so ranks are always 1..=N with no sharing.
///
/// Once the bracket is complete, each round and view is snapshotted at most once; later
/// calls return the stored snapshot and leave the bracket untouched.
pub fn generate_rankings(
    bracket: &mut Bracket,
    round: Round,
    cumulative: bool,
) -> Result<Vec<PlayoffRanking>, BracketError> {
    if !bracket.contains_round(round) {
        return Err(BracketError::RoundNotInBracket(round));
    }
    if round > bracket.current_round() {
        return Err(BracketError::RoundNotReached(round));
    }
    let view = RankingView::from_flag(cumulative);
    if bracket.is_complete() {
        let frozen = bracket.rankings(round, view);
        if !frozen.is_empty() {
            return Ok(frozen.to_vec());
        }
    }

    let rounds: Vec<Round> = match view {
        RankingView::PerRound => vec![round],
        RankingView::Cumulative => bracket.rounds().filter(|r| *r <= round).collect(),
    };
    let mut by_competitor: BTreeMap<CompetitorId, Vec<&RosterScore>> = BTreeMap::new();
    for r in &rounds {
        for (id, score) in bracket.scores.get(r).into_iter().flatten() {
            by_competitor.entry(*id).or_default().push(score);
        }
    }

    let mut rows = Vec::with_capacity(by_competitor.len());
    for (id, scores) in by_competitor {
        let entry = bracket
            .player(id)
            .ok_or(BracketError::CompetitorNotFound(id))?;
        let total: BigDecimal = scores.iter().map(|s| &s.total_score).sum();
        rows.push((total, TiebreakProfile::cumulative(entry, scores)));
    }
    rows.sort_by(|(a_total, a), (b_total, b)| {
        b_total
            .cmp(a_total)
            .then_with(|| cascade_order(a, b, &bracket.tiebreakers))
    });

    let previous: HashMap<CompetitorId, u32> = round
        .previous()
        .filter(|r| bracket.contains_round(*r))
        .map(|r| {
            bracket
                .rankings(r, view)
                .iter()
                .map(|p| (p.competitor_id, p.rank))
                .collect()
        })
        .unwrap_or_default();

    let now = Utc::now();
    let mut rankings = Vec::with_capacity(rows.len());
    for (i, (score, profile)) in rows.into_iter().enumerate() {
        let id = profile.competitor_id;
        let entry = bracket
            .player(id)
            .ok_or(BracketError::CompetitorNotFound(id))?;
        rankings.push(PlayoffRanking {
            competitor_id: id,
            name: entry.name.clone(),
            rank: i as u32 + 1,
            previous_rank: previous.get(&id).copied(),
            score,
            round,
            is_cumulative: view.is_cumulative(),
            rounds_survived: bracket.rounds_survived(id),
            status: entry.status.clone(),
            generated_at: now,
        });
    }

    log::debug!(
        "Ranked {} competitor(s) for the {round} round ({:?})",
        rankings.len(),
        view
    );

    let stored = match view {
        RankingView::PerRound => &mut bracket.round_rankings,
        RankingView::Cumulative => &mut bracket.cumulative_rankings,
    };
    stored.insert(round, rankings.clone());
    bracket.updated_at = now;
    Ok(rankings)
}
