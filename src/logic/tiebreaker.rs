//! Tiebreaker cascade shared by matchup resolution and ranking.

use crate::models::{
    CompetitorId, PlayerEntry, RosterScore, TiebreakerConfiguration, TiebreakerMethod,
    TiebreakerResult,
};
use bigdecimal::{BigDecimal, Zero};
use std::cmp::Ordering;

/// Everything the cascade can compare about one competitor.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TiebreakProfile {
    pub competitor_id: CompetitorId,
    pub seed: u32,
    pub regular_season_score: BigDecimal,
    pub touchdowns: u32,
    pub turnovers: u32,
    pub bench_points: BigDecimal,
    pub highest_slot: BigDecimal,
    pub second_highest_slot: BigDecimal,
}

impl TiebreakProfile {
    /// Profile from a single round's score.
    pub fn for_round(entry: &PlayerEntry, score: &RosterScore) -> Self {
        Self::cumulative(entry, std::iter::once(score))
    }

    /// Profile over several rounds: counts and bench points add up, slot bests are taken
    /// across every starting slot of every round.
    pub fn cumulative<'a>(
        entry: &PlayerEntry,
        scores: impl IntoIterator<Item = &'a RosterScore>,
    ) -> Self {
        let mut touchdowns = 0;
        let mut turnovers = 0;
        let mut bench_points = BigDecimal::zero();
        let mut slots: Vec<BigDecimal> = Vec::new();
        for score in scores {
            touchdowns += score.total_touchdowns;
            turnovers += score.total_turnovers;
            bench_points += score.bench_points();
            slots.extend(score.starter_points_desc());
        }
        slots.sort_by(|a, b| b.cmp(a));
        let mut best = slots.into_iter();
        Self {
            competitor_id: entry.competitor_id,
            seed: entry.seed,
            regular_season_score: entry.regular_season_score.clone(),
            touchdowns,
            turnovers,
            bench_points,
            highest_slot: best.next().unwrap_or_else(BigDecimal::zero),
            second_highest_slot: best.next().unwrap_or_else(BigDecimal::zero),
        }
    }

    /// Value compared by `method`, for display.
    pub fn value(&self, method: TiebreakerMethod) -> String {
        match method {
            TiebreakerMethod::MostTouchdowns => self.touchdowns.to_string(),
            TiebreakerMethod::BenchPoints => self.bench_points.to_string(),
            TiebreakerMethod::HighestSlotScore => self.highest_slot.to_string(),
            TiebreakerMethod::SecondHighestSlotScore => self.second_highest_slot.to_string(),
            TiebreakerMethod::FewerTurnovers => self.turnovers.to_string(),
            TiebreakerMethod::RegularSeasonScore => self.regular_season_score.to_string(),
            TiebreakerMethod::LowerSeed => self.seed.to_string(),
        }
    }
}

/// `Greater` when `a` wins on `method`.
fn advantage(method: TiebreakerMethod, a: &TiebreakProfile, b: &TiebreakProfile) -> Ordering {
    match method {
        TiebreakerMethod::MostTouchdowns => a.touchdowns.cmp(&b.touchdowns),
        TiebreakerMethod::BenchPoints => a.bench_points.cmp(&b.bench_points),
        TiebreakerMethod::HighestSlotScore => a.highest_slot.cmp(&b.highest_slot),
        TiebreakerMethod::SecondHighestSlotScore => a.second_highest_slot.cmp(&b.second_highest_slot),
        TiebreakerMethod::FewerTurnovers => b.turnovers.cmp(&a.turnovers),
        TiebreakerMethod::RegularSeasonScore => a.regular_season_score.cmp(&b.regular_season_score),
        TiebreakerMethod::LowerSeed => b.seed.cmp(&a.seed),
    }
}

/// Break a tie between two competitors with equal totals.
///
/// Methods run in configured order; the first that separates them decides. If all of them
/// tie, the lower seed wins and `cascade_exhausted` is set. Seeds are unique within a
/// bracket, so this always produces a winner.
pub fn resolve_tie(
    a: &TiebreakProfile,
    b: &TiebreakProfile,
    config: &TiebreakerConfiguration,
) -> TiebreakerResult {
    let decided = config
        .methods()
        .iter()
        .map(|&m| (m, advantage(m, a, b)))
        .find(|(_, o)| o.is_ne());
    let (method, ordering, exhausted) = match decided {
        Some((m, o)) => (m, o, false),
        None => (
            TiebreakerMethod::LowerSeed,
            advantage(TiebreakerMethod::LowerSeed, a, b),
            true,
        ),
    };
    let (winner, loser) = if ordering == Ordering::Less { (b, a) } else { (a, b) };
    if exhausted {
        log::info!(
            "Tiebreaker cascade exhausted between seeds {} and {}; lower seed advances",
            a.seed,
            b.seed
        );
    }
    TiebreakerResult {
        winner_id: winner.competitor_id,
        loser_id: loser.competitor_id,
        method_used: method,
        winner_value: winner.value(method),
        loser_value: loser.value(method),
        cascade_exhausted: exhausted,
    }
}

/// Ordering for ranking: `Less` when `a` places ahead of `b` on the cascade.
/// Total over profiles with distinct seeds.
pub fn cascade_order(
    a: &TiebreakProfile,
    b: &TiebreakProfile,
    config: &TiebreakerConfiguration,
) -> Ordering {
    config
        .methods()
        .iter()
        .map(|&m| advantage(m, a, b))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| advantage(TiebreakerMethod::LowerSeed, a, b))
        .reverse()
}
