//! Bracket competitors: seeding input and per-competitor lifecycle.

use crate::models::bracket::BracketError;
use crate::models::round::Round;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a league member competing in the bracket.
pub type CompetitorId = Uuid;

/// One row of seeding input for bracket initialization.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Seeding {
    pub competitor_id: CompetitorId,
    pub name: String,
    /// 1-based; seed 1 is strongest.
    pub seed: u32,
    pub regular_season_score: BigDecimal,
}

impl Seeding {
    pub fn new(
        competitor_id: CompetitorId,
        name: impl Into<String>,
        seed: u32,
        regular_season_score: BigDecimal,
    ) -> Self {
        Self {
            competitor_id,
            name: name.into(),
            seed,
            regular_season_score,
        }
    }
}

/// Who knocked a competitor out, and when.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Elimination {
    pub round: Round,
    pub eliminated_by: CompetitorId,
    pub at: DateTime<Utc>,
}

/// Competitor lifecycle. Only `Active` may transition, and only once.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum PlayerStatus {
    #[default]
    Active,
    Eliminated(Elimination),
    Champion,
}

impl PlayerStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PlayerStatus::Active => "active",
            PlayerStatus::Eliminated(_) => "eliminated",
            PlayerStatus::Champion => "champion",
        }
    }
}

/// A competitor's entry in the bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub competitor_id: CompetitorId,
    pub name: String,
    pub seed: u32,
    pub regular_season_score: BigDecimal,
    pub status: PlayerStatus,
}

impl PlayerEntry {
    pub fn from_seeding(seeding: Seeding) -> Self {
        Self {
            competitor_id: seeding.competitor_id,
            name: seeding.name,
            seed: seeding.seed,
            regular_season_score: seeding.regular_season_score,
            status: PlayerStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    pub fn elimination(&self) -> Option<&Elimination> {
        match &self.status {
            PlayerStatus::Eliminated(e) => Some(e),
            _ => None,
        }
    }

    /// Mark the competitor as eliminated. Fails unless currently active.
    pub fn eliminate(
        &mut self,
        round: Round,
        eliminated_by: CompetitorId,
        at: DateTime<Utc>,
    ) -> Result<(), BracketError> {
        if !self.is_active() {
            return Err(self.illegal("eliminate"));
        }
        self.status = PlayerStatus::Eliminated(Elimination {
            round,
            eliminated_by,
            at,
        });
        Ok(())
    }

    /// Mark the competitor as champion. Fails unless currently active.
    pub fn crown(&mut self) -> Result<(), BracketError> {
        if !self.is_active() {
            return Err(self.illegal("crown"));
        }
        self.status = PlayerStatus::Champion;
        Ok(())
    }

    fn illegal(&self, event: &'static str) -> BracketError {
        BracketError::IllegalTransition {
            entity: "competitor",
            from: self.status.label(),
            event,
        }
    }
}
