//! Roster slots, stat lines and per-round roster scores.

use crate::models::player::CompetitorId;
use crate::models::round::Round;
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

/// NFL player identifier as issued by the stats feed.
pub type NflPlayerId = u64;

/// Roster position a slot is scored as.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    Flex,
    SuperFlex,
    K,
    Def,
}

/// Whether a slot counts toward the roster total.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lineup {
    #[default]
    Starter,
    Bench,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AssignedPlayer {
    pub player_id: NflPlayerId,
    pub name: String,
}

/// One slot of a competitor's roster for a given week, as handed out by the roster provider.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub position: Position,
    #[serde(default)]
    pub lineup: Lineup,
    /// None for an unfilled slot.
    pub player: Option<AssignedPlayer>,
}

impl SlotAssignment {
    pub fn starter(position: Position, player_id: NflPlayerId, name: impl Into<String>) -> Self {
        Self {
            position,
            lineup: Lineup::Starter,
            player: Some(AssignedPlayer {
                player_id,
                name: name.into(),
            }),
        }
    }

    pub fn bench(position: Position, player_id: NflPlayerId, name: impl Into<String>) -> Self {
        Self {
            lineup: Lineup::Bench,
            ..Self::starter(position, player_id, name)
        }
    }

    pub fn empty(position: Position) -> Self {
        Self {
            position,
            lineup: Lineup::Starter,
            player: None,
        }
    }
}

/// Raw statistics for one NFL player in one week. Missing fields count as zero.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatLine {
    pub passing_yards: i32,
    pub passing_touchdowns: u32,
    pub interceptions: u32,
    pub rushing_yards: i32,
    pub rushing_touchdowns: u32,
    pub receiving_yards: i32,
    pub receiving_touchdowns: u32,
    pub receptions: u32,
    pub fumbles_lost: u32,
    pub sacks: u32,
    pub defensive_interceptions: u32,
    pub fumble_recoveries: u32,
    pub safeties: u32,
    pub defensive_touchdowns: u32,
    /// Only reported for team defenses.
    pub points_allowed: Option<u32>,
    pub field_goals_0_39: u32,
    pub field_goals_40_49: u32,
    pub field_goals_50_plus: u32,
    pub extra_points: u32,
}

impl StatLine {
    pub fn touchdowns(&self) -> u32 {
        self.passing_touchdowns
            + self.rushing_touchdowns
            + self.receiving_touchdowns
            + self.defensive_touchdowns
    }

    pub fn turnovers(&self) -> u32 {
        self.interceptions + self.fumbles_lost
    }
}

/// What the stat-line provider knows about a player for a week.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "stats")]
pub enum StatLookup {
    /// Game finished; the line will not change.
    Final(StatLine),
    /// Game under way; partial line.
    Live(StatLine),
    /// Player's team is on bye.
    Bye,
    /// Game finished without the player recording a snap.
    DidNotPlay,
    /// Game not started or no data yet.
    Pending,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Final,
    Live,
    Bye,
    DidNotPlay,
    Pending,
    Empty,
}

impl SlotStatus {
    /// True once the slot's points can no longer change.
    pub fn is_settled(self) -> bool {
        !matches!(self, SlotStatus::Live | SlotStatus::Pending)
    }
}

/// Points earned by one roster slot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PositionScore {
    pub position: Position,
    pub lineup: Lineup,
    pub player: Option<AssignedPlayer>,
    pub points: BigDecimal,
    pub status: SlotStatus,
    pub stats: Option<StatLine>,
}

impl PositionScore {
    pub fn is_starter(&self) -> bool {
        self.lineup == Lineup::Starter
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player.as_ref().map(|p| p.name.as_str())
    }
}

/// A competitor's score for one round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RosterScore {
    pub competitor_id: CompetitorId,
    pub competitor_name: String,
    pub round: Round,
    pub position_scores: Vec<PositionScore>,
    /// Sum of starter points.
    pub total_score: BigDecimal,
    pub total_touchdowns: u32,
    pub total_turnovers: u32,
    /// True only once every slot, bench included, is settled.
    pub is_complete: bool,
}

impl RosterScore {
    /// Build a score and its aggregates from slot results. Bench slots never count toward totals.
    pub fn from_slots(
        competitor_id: CompetitorId,
        competitor_name: impl Into<String>,
        round: Round,
        position_scores: Vec<PositionScore>,
    ) -> Self {
        let starters = || position_scores.iter().filter(|p| p.is_starter());
        let total_score: BigDecimal = starters().map(|p| &p.points).sum();
        let total_touchdowns = starters()
            .filter_map(|p| p.stats.as_ref())
            .map(StatLine::touchdowns)
            .sum();
        let total_turnovers = starters()
            .filter_map(|p| p.stats.as_ref())
            .map(StatLine::turnovers)
            .sum();
        let is_complete = position_scores.iter().all(|p| p.status.is_settled());
        Self {
            competitor_id,
            competitor_name: competitor_name.into(),
            round,
            total_score,
            total_touchdowns,
            total_turnovers,
            is_complete,
            position_scores,
        }
    }

    pub fn starters(&self) -> impl Iterator<Item = &PositionScore> {
        self.position_scores.iter().filter(|p| p.is_starter())
    }

    pub fn bench_points(&self) -> BigDecimal {
        self.position_scores
            .iter()
            .filter(|p| !p.is_starter())
            .map(|p| &p.points)
            .sum()
    }

    /// Starter slot points, highest first.
    pub fn starter_points_desc(&self) -> Vec<BigDecimal> {
        let mut points: Vec<BigDecimal> = self.starters().map(|p| p.points.clone()).collect();
        points.sort_by(|a, b| b.cmp(a));
        points
    }

    pub fn highest_slot_score(&self) -> BigDecimal {
        self.starter_points_desc()
            .into_iter()
            .next()
            .unwrap_or_else(BigDecimal::zero)
    }

    /// Slots, bench included, whose points may still change.
    pub fn slots_remaining(&self) -> usize {
        self.position_scores
            .iter()
            .filter(|p| !p.status.is_settled())
            .count()
    }
}
