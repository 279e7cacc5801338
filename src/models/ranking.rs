//! Ranking snapshots.

use crate::models::player::{CompetitorId, PlayerStatus};
use crate::models::round::Round;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which score a ranking is built from. The two views are stored apart.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingView {
    /// That round's total only.
    PerRound,
    /// Running total over every round up to and including that round.
    Cumulative,
}

impl RankingView {
    pub fn from_flag(cumulative: bool) -> Self {
        if cumulative {
            RankingView::Cumulative
        } else {
            RankingView::PerRound
        }
    }

    pub fn is_cumulative(self) -> bool {
        self == RankingView::Cumulative
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayoffRanking {
    pub competitor_id: CompetitorId,
    pub name: String,
    /// 1-based; never shared.
    pub rank: u32,
    /// Rank in the previous round's snapshot of the same view.
    pub previous_rank: Option<u32>,
    pub score: BigDecimal,
    pub round: Round,
    pub is_cumulative: bool,
    pub rounds_survived: u32,
    pub status: PlayerStatus,
    pub generated_at: DateTime<Utc>,
}

impl PlayoffRanking {
    /// Positive when the competitor climbed.
    pub fn rank_change(&self) -> Option<i64> {
        self.previous_rank
            .map(|prev| i64::from(prev) - i64::from(self.rank))
    }
}
