//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use bigdecimal::BigDecimal;
use playoff_bracket::models::{
    Lineup, NflPlayerId, Position, PositionScore, SlotAssignment, SlotStatus, StatLine,
    StatLookup,
};
use playoff_bracket::{
    initialize_bracket, Bracket, CompetitorId, ProviderError, Round, RosterProvider, RosterScore,
    Seeding, StatLineProvider, TiebreakerConfiguration,
};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use uuid::Uuid;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

/// Seeds 1..=n named "Team 1".."Team n"; regular-season totals fall with seed.
pub fn seeds(n: u32) -> Vec<Seeding> {
    (1..=n)
        .map(|seed| {
            Seeding::new(
                Uuid::new_v4(),
                format!("Team {seed}"),
                seed,
                BigDecimal::from(1500 - 10 * i64::from(seed)),
            )
        })
        .collect()
}

pub fn bracket(n: u32) -> Bracket {
    init_logging();
    initialize_bracket(
        Uuid::new_v4(),
        "Test League",
        seeds(n),
        TiebreakerConfiguration::default(),
    )
    .unwrap()
}

pub fn id_of_seed(bracket: &Bracket, seed: u32) -> CompetitorId {
    bracket
        .players
        .values()
        .find(|p| p.seed == seed)
        .map(|p| p.competitor_id)
        .unwrap()
}

pub fn starter(position: Position, points: &str, touchdowns: u32) -> PositionScore {
    PositionScore {
        position,
        lineup: Lineup::Starter,
        player: None,
        points: dec(points),
        status: SlotStatus::Final,
        stats: Some(StatLine {
            passing_touchdowns: touchdowns,
            ..StatLine::default()
        }),
    }
}

pub fn bench(points: &str) -> PositionScore {
    PositionScore {
        lineup: Lineup::Bench,
        stats: None,
        ..starter(Position::Rb, points, 0)
    }
}

/// A final score with a single starting slot carrying all the points and touchdowns,
/// plus one bench slot.
pub fn score_with(
    bracket: &Bracket,
    id: CompetitorId,
    round: Round,
    total: &str,
    touchdowns: u32,
    bench_points: &str,
) -> RosterScore {
    let name = bracket.player(id).unwrap().name.clone();
    RosterScore::from_slots(
        id,
        name,
        round,
        vec![
            starter(Position::Qb, total, touchdowns),
            bench(bench_points),
        ],
    )
}

pub fn final_score(bracket: &Bracket, id: CompetitorId, round: Round, total: &str) -> RosterScore {
    score_with(bracket, id, round, total, 0, "0")
}

/// Record final scores for every matchup of the current round; the home side (better seed)
/// gets `home_total` and the away side `away_total`.
pub fn score_round(bracket: &mut Bracket, home_total: &str, away_total: &str) {
    let round = bracket.current_round();
    let sides: Vec<(CompetitorId, CompetitorId)> = bracket
        .matchups_for(round)
        .iter()
        .map(|m| (m.home.competitor_id, m.away.competitor_id))
        .collect();
    for (home, away) in sides {
        let h = final_score(bracket, home, round, home_total);
        let a = final_score(bracket, away, round, away_total);
        bracket.record_score(h).unwrap();
        bracket.record_score(a).unwrap();
    }
}

/// Roster feed backed by a fixed map.
#[derive(Default)]
pub struct FakeRosters {
    pub rosters: HashMap<CompetitorId, Vec<SlotAssignment>>,
}

impl FakeRosters {
    pub fn with(mut self, id: CompetitorId, slots: Vec<SlotAssignment>) -> Self {
        self.rosters.insert(id, slots);
        self
    }
}

impl RosterProvider for FakeRosters {
    fn roster_slots(
        &self,
        competitor_id: CompetitorId,
        _round: Round,
        _week: u32,
    ) -> Result<Vec<SlotAssignment>, ProviderError> {
        self.rosters
            .get(&competitor_id)
            .cloned()
            .ok_or(ProviderError::RosterNotFound(competitor_id))
    }
}

/// Stat feed whose lines can be changed mid-test and which can be made to time out.
#[derive(Default)]
pub struct FakeStats {
    lines: RwLock<HashMap<NflPlayerId, StatLookup>>,
    timing_out: AtomicBool,
}

impl FakeStats {
    pub fn set(&self, player_id: NflPlayerId, lookup: StatLookup) {
        self.lines.write().unwrap().insert(player_id, lookup);
    }

    pub fn time_out(&self, on: bool) {
        self.timing_out.store(on, Ordering::SeqCst);
    }
}

impl StatLineProvider for FakeStats {
    fn stat_line(&self, player_id: NflPlayerId, week: u32) -> Result<StatLookup, ProviderError> {
        if self.timing_out.load(Ordering::SeqCst) {
            return Err(ProviderError::Timeout(format!(
                "stats for player {player_id} week {week}"
            )));
        }
        Ok(self
            .lines
            .read()
            .unwrap()
            .get(&player_id)
            .cloned()
            .unwrap_or(StatLookup::Pending))
    }
}
