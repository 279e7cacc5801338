//! League scoring rules (full-PPR defaults).
//!
//! Values are decimals serialized as strings, e.g. `"0.04"`. Write them as strings in JSON
//! configuration too: bare JSON numbers go through binary floating point on the way in.

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

/// `units * 10^-scale`, e.g. `points(4, 2)` is 0.04.
fn points(units: i64, scale: i64) -> BigDecimal {
    BigDecimal::new(BigInt::from(units), scale)
}

/// Points awarded to a defense allowing at most `max_allowed` points.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PointsAllowedTier {
    /// None marks the open-ended last tier.
    pub max_allowed: Option<u32>,
    pub points: BigDecimal,
}

impl PointsAllowedTier {
    pub fn up_to(max_allowed: u32, points: BigDecimal) -> Self {
        Self {
            max_allowed: Some(max_allowed),
            points,
        }
    }

    pub fn and_above(points: BigDecimal) -> Self {
        Self {
            max_allowed: None,
            points,
        }
    }
}

/// Immutable per-league mapping from stat events to fantasy points.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub passing_yard: BigDecimal,
    pub passing_touchdown: BigDecimal,
    pub interception: BigDecimal,
    pub rushing_yard: BigDecimal,
    pub rushing_touchdown: BigDecimal,
    pub receiving_yard: BigDecimal,
    pub receiving_touchdown: BigDecimal,
    pub reception: BigDecimal,
    pub fumble_lost: BigDecimal,

    pub passing_300_bonus: BigDecimal,
    pub rushing_100_bonus: BigDecimal,
    pub receiving_100_bonus: BigDecimal,

    pub extra_point: BigDecimal,
    pub field_goal_0_39: BigDecimal,
    pub field_goal_40_49: BigDecimal,
    pub field_goal_50_plus: BigDecimal,

    pub sack: BigDecimal,
    pub defensive_interception: BigDecimal,
    pub fumble_recovery: BigDecimal,
    pub safety: BigDecimal,
    pub defensive_touchdown: BigDecimal,
    /// Checked in order; the first tier whose bound covers the value applies. Bounds ascend
    /// and the last tier is open-ended. If a hand-built list has no covering tier, the last
    /// tier applies.
    pub points_allowed_tiers: Vec<PointsAllowedTier>,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            passing_yard: points(4, 2),
            passing_touchdown: points(4, 0),
            interception: points(-2, 0),
            rushing_yard: points(1, 1),
            rushing_touchdown: points(6, 0),
            receiving_yard: points(1, 1),
            receiving_touchdown: points(6, 0),
            reception: points(1, 0),
            fumble_lost: points(-2, 0),

            passing_300_bonus: points(3, 0),
            rushing_100_bonus: points(3, 0),
            receiving_100_bonus: points(3, 0),

            extra_point: points(1, 0),
            field_goal_0_39: points(3, 0),
            field_goal_40_49: points(4, 0),
            field_goal_50_plus: points(5, 0),

            sack: points(1, 0),
            defensive_interception: points(2, 0),
            fumble_recovery: points(2, 0),
            safety: points(2, 0),
            defensive_touchdown: points(6, 0),
            points_allowed_tiers: vec![
                PointsAllowedTier::up_to(0, points(10, 0)),
                PointsAllowedTier::up_to(6, points(7, 0)),
                PointsAllowedTier::up_to(13, points(4, 0)),
                PointsAllowedTier::up_to(20, points(1, 0)),
                PointsAllowedTier::up_to(27, BigDecimal::zero()),
                PointsAllowedTier::and_above(points(-4, 0)),
            ],
        }
    }
}

impl ScoringRules {
    /// Parse rules from JSON. Omitted fields keep their defaults; tier lists are validated.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let rules: Self = serde_json::from_str(json)?;
        rules
            .check_tiers()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;
        Ok(rules)
    }

    /// Tiers must ascend strictly and end with exactly one open-ended tier.
    fn check_tiers(&self) -> Result<(), String> {
        let Some((last, bounded)) = self.points_allowed_tiers.split_last() else {
            return Err("points_allowed_tiers must not be empty".into());
        };
        if last.max_allowed.is_some() {
            return Err("the last points-allowed tier must be open-ended".into());
        }
        let mut previous: Option<u32> = None;
        for tier in bounded {
            let max = tier
                .max_allowed
                .ok_or("only the last points-allowed tier may be open-ended")?;
            if let Some(p) = previous.filter(|p| max <= *p) {
                return Err(format!(
                    "points-allowed tier bounds must ascend, {max} follows {p}"
                ));
            }
            previous = Some(max);
        }
        Ok(())
    }

    /// Tier points for a defense that allowed `allowed` points.
    pub fn points_allowed_score(&self, allowed: u32) -> BigDecimal {
        self.points_allowed_tiers
            .iter()
            .find(|tier| tier.max_allowed.map_or(true, |max| allowed <= max))
            .or_else(|| self.points_allowed_tiers.last())
            .map(|tier| tier.points.clone())
            .unwrap_or_else(BigDecimal::zero)
    }
}
