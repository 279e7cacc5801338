//! Roster scoring: stat lines and league rules into per-slot points and a round total.

use crate::models::{
    Bracket, BracketError, CompetitorId, Position, PositionScore, Round, RosterScore,
    ScoringRules, SlotAssignment, SlotStatus, StatLine, StatLookup,
};
use crate::ports::{ProviderError, RosterProvider, StatLineProvider};
use bigdecimal::{BigDecimal, RoundingMode, Zero};

/// Why a score could not be calculated.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    Bracket(#[from] BracketError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Calculate a competitor's score for the current round and store it on the bracket.
///
/// Produces a best-effort score while games are still live (`is_complete` false). Any
/// provider failure aborts before the bracket is touched, so an earlier score stays in place.
pub fn calculate_score(
    bracket: &mut Bracket,
    competitor_id: CompetitorId,
    round: Round,
    week: u32,
    rosters: &dyn RosterProvider,
    stats: &dyn StatLineProvider,
    rules: &ScoringRules,
) -> Result<RosterScore, ScoringError> {
    ensure_scorable(bracket, competitor_id, round)?;
    let name = bracket
        .player(competitor_id)
        .map(|p| p.name.clone())
        .ok_or(BracketError::CompetitorNotFound(competitor_id))?;

    let slots = rosters.roster_slots(competitor_id, round, week)?;
    let score = compute_roster_score(competitor_id, name, round, week, &slots, stats, rules)?;

    log::debug!(
        "Scored {} for the {} round (week {}): {} ({})",
        score.competitor_name,
        round,
        week,
        score.total_score,
        if score.is_complete { "final" } else { "in progress" }
    );

    bracket.record_score(score.clone())?;
    Ok(score)
}

fn ensure_scorable(
    bracket: &Bracket,
    competitor_id: CompetitorId,
    round: Round,
) -> Result<(), BracketError> {
    if bracket.is_complete() {
        return Err(BracketError::AlreadyComplete);
    }
    if bracket.player(competitor_id).is_none() {
        return Err(BracketError::CompetitorNotFound(competitor_id));
    }
    let current = bracket.current_round();
    if round != current {
        return Err(BracketError::RoundNotOpen { round, current });
    }
    if bracket.matchup_for_competitor(round, competitor_id).is_none() {
        return Err(BracketError::CompetitorNotInRound {
            competitor_id,
            round,
        });
    }
    Ok(())
}

/// Score every slot and aggregate. Pure apart from the stat lookups.
pub fn compute_roster_score(
    competitor_id: CompetitorId,
    competitor_name: String,
    round: Round,
    week: u32,
    slots: &[SlotAssignment],
    stats: &dyn StatLineProvider,
    rules: &ScoringRules,
) -> Result<RosterScore, ProviderError> {
    let mut position_scores = Vec::with_capacity(slots.len());
    for slot in slots {
        let lookup = match &slot.player {
            Some(player) => Some(stats.stat_line(player.player_id, week)?),
            None => None,
        };
        position_scores.push(score_slot(rules, slot, lookup));
    }
    Ok(RosterScore::from_slots(
        competitor_id,
        competitor_name,
        round,
        position_scores,
    ))
}

/// Points for one slot given what the stat feed returned (None for an empty slot).
pub fn score_slot(
    rules: &ScoringRules,
    slot: &SlotAssignment,
    lookup: Option<StatLookup>,
) -> PositionScore {
    let (status, stats) = match lookup {
        None => (SlotStatus::Empty, None),
        Some(StatLookup::Final(line)) => (SlotStatus::Final, Some(line)),
        Some(StatLookup::Live(line)) => (SlotStatus::Live, Some(line)),
        Some(StatLookup::Bye) => (SlotStatus::Bye, None),
        Some(StatLookup::DidNotPlay) => (SlotStatus::DidNotPlay, None),
        Some(StatLookup::Pending) => (SlotStatus::Pending, None),
    };
    let points = stats
        .as_ref()
        .map(|s| position_points(rules, slot.position, s))
        .unwrap_or_else(|| BigDecimal::zero().with_scale(2));
    PositionScore {
        position: slot.position,
        lineup: slot.lineup,
        player: slot.player.clone(),
        points,
        status,
        stats,
    }
}

/// Fantasy points for a stat line scored as `position`, rounded half-up to 2 places.
pub fn position_points(rules: &ScoringRules, position: Position, stats: &StatLine) -> BigDecimal {
    let raw = match position {
        Position::Qb => quarterback(rules, stats),
        Position::Rb => running_back(rules, stats),
        Position::Wr | Position::Te => receiver(rules, stats),
        Position::Flex | Position::SuperFlex => {
            if stats.rushing_yards > 0 {
                running_back(rules, stats)
            } else {
                receiver(rules, stats)
            }
        }
        Position::K => kicker(rules, stats),
        Position::Def => defense(rules, stats),
    };
    raw.with_scale_round(2, RoundingMode::HalfUp)
}

fn times(count: impl Into<i64>, rate: &BigDecimal) -> BigDecimal {
    BigDecimal::from(count.into()) * rate
}

fn bonus_if(reached: bool, bonus: &BigDecimal) -> BigDecimal {
    if reached {
        bonus.clone()
    } else {
        BigDecimal::zero()
    }
}

fn rushing(rules: &ScoringRules, s: &StatLine) -> BigDecimal {
    times(s.rushing_yards, &rules.rushing_yard) + times(s.rushing_touchdowns, &rules.rushing_touchdown)
}

fn receiving(rules: &ScoringRules, s: &StatLine) -> BigDecimal {
    times(s.receptions, &rules.reception)
        + times(s.receiving_yards, &rules.receiving_yard)
        + times(s.receiving_touchdowns, &rules.receiving_touchdown)
}

fn quarterback(rules: &ScoringRules, s: &StatLine) -> BigDecimal {
    times(s.passing_yards, &rules.passing_yard)
        + bonus_if(s.passing_yards >= 300, &rules.passing_300_bonus)
        + times(s.passing_touchdowns, &rules.passing_touchdown)
        + rushing(rules, s)
        + times(s.interceptions, &rules.interception)
        + times(s.fumbles_lost, &rules.fumble_lost)
}

fn running_back(rules: &ScoringRules, s: &StatLine) -> BigDecimal {
    rushing(rules, s)
        + bonus_if(s.rushing_yards >= 100, &rules.rushing_100_bonus)
        + receiving(rules, s)
        + times(s.fumbles_lost, &rules.fumble_lost)
}

fn receiver(rules: &ScoringRules, s: &StatLine) -> BigDecimal {
    receiving(rules, s)
        + bonus_if(s.receiving_yards >= 100, &rules.receiving_100_bonus)
        + rushing(rules, s)
        + times(s.fumbles_lost, &rules.fumble_lost)
}

fn kicker(rules: &ScoringRules, s: &StatLine) -> BigDecimal {
    times(s.extra_points, &rules.extra_point)
        + times(s.field_goals_0_39, &rules.field_goal_0_39)
        + times(s.field_goals_40_49, &rules.field_goal_40_49)
        + times(s.field_goals_50_plus, &rules.field_goal_50_plus)
}

fn defense(rules: &ScoringRules, s: &StatLine) -> BigDecimal {
    let tier = s
        .points_allowed
        .map(|allowed| rules.points_allowed_score(allowed))
        .unwrap_or_else(BigDecimal::zero);
    times(s.sacks, &rules.sack)
        + times(s.defensive_interceptions, &rules.defensive_interception)
        + times(s.fumble_recoveries, &rules.fumble_recovery)
        + times(s.safeties, &rules.safety)
        + times(s.defensive_touchdowns, &rules.defensive_touchdown)
        + tier
}
