//! Playoff rounds and the bracket-level phase.

use serde::{Deserialize, Serialize};

/// One stage of single-elimination play, traversed in declaration order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    WildCard,
    Divisional,
    Conference,
    Championship,
}

impl Round {
    pub const ALL: [Round; 4] = [
        Round::WildCard,
        Round::Divisional,
        Round::Conference,
        Round::Championship,
    ];

    /// Largest bracket the round sequence can hold (one slot per first-round side).
    pub const MAX_BRACKET_SIZE: usize = 16;

    pub fn next(self) -> Option<Round> {
        match self {
            Round::WildCard => Some(Round::Divisional),
            Round::Divisional => Some(Round::Conference),
            Round::Conference => Some(Round::Championship),
            Round::Championship => None,
        }
    }

    pub fn previous(self) -> Option<Round> {
        match self {
            Round::WildCard => None,
            Round::Divisional => Some(Round::WildCard),
            Round::Conference => Some(Round::Divisional),
            Round::Championship => Some(Round::Conference),
        }
    }

    pub fn is_final(self) -> bool {
        self.next().is_none()
    }

    /// Zero-based position in the full sequence.
    pub fn ordinal(self) -> u32 {
        match self {
            Round::WildCard => 0,
            Round::Divisional => 1,
            Round::Conference => 2,
            Round::Championship => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Round::WildCard => "Wild Card",
            Round::Divisional => "Divisional",
            Round::Conference => "Conference",
            Round::Championship => "Championship",
        }
    }

    /// Opening round for a bracket with `size` first-round slots (a power of two).
    /// Smaller brackets skip the early rounds so every bracket ends in the Championship.
    pub fn first_for_bracket_size(size: usize) -> Option<Round> {
        match size {
            2 => Some(Round::Championship),
            4 => Some(Round::Conference),
            8 => Some(Round::Divisional),
            16 => Some(Round::WildCard),
            _ => None,
        }
    }

    /// This round and every round after it, in order.
    pub fn through_final(self) -> impl Iterator<Item = Round> {
        Round::ALL.into_iter().filter(move |r| *r >= self)
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Where the bracket is in its lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase", content = "round")]
pub enum BracketPhase {
    /// Matchups of this round are being played.
    Active(Round),
    /// The final has been decided; no further mutation.
    Complete,
}

impl BracketPhase {
    /// Phase after `round` has been fully resolved.
    pub fn after(round: Round) -> BracketPhase {
        match round.next() {
            Some(next) => BracketPhase::Active(next),
            None => BracketPhase::Complete,
        }
    }

    pub fn is_complete(self) -> bool {
        self == BracketPhase::Complete
    }
}
