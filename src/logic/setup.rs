//! Bracket initialization: validate seeding, build entries and first-round matchups.

use crate::models::{
    Bracket, BracketError, LeagueId, Matchup, MatchupSide, PlayerEntry, Round, Seeding,
    TiebreakerConfiguration,
};
use bigdecimal::BigDecimal;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::str::FromStr;

/// Seed the bracket and build the opening round.
///
/// Seeds must be exactly 1..=N with 2 <= N <= 16. The bracket is sized to the next power of
/// two; slot k pairs seed k with seed (size + 1 - k), so top seeds can only meet late. When
/// that opponent does not exist, seed k gets a bye into the second round.
pub fn initialize_bracket(
    league_id: LeagueId,
    league_name: impl Into<String>,
    seeds: Vec<Seeding>,
    tiebreakers: TiebreakerConfiguration,
) -> Result<Bracket, BracketError> {
    let mut seeds = validate_seeding(seeds)?;
    seeds.sort_by_key(|s| s.seed);

    let n = seeds.len();
    let size = n.next_power_of_two();
    let first_round = Round::first_for_bracket_size(size).ok_or_else(|| {
        BracketError::InvalidSeeding(format!(
            "{n} competitors do not fit a bracket of at most {}",
            Round::MAX_BRACKET_SIZE
        ))
    })?;

    let mut bracket = Bracket::new(league_id, league_name, first_round, tiebreakers);
    let entries: Vec<PlayerEntry> = seeds.into_iter().map(PlayerEntry::from_seeding).collect();

    let mut matchups = Vec::with_capacity(size / 2);
    for k in 0..size / 2 {
        let top = &entries[k];
        match entries.get(size - 1 - k) {
            Some(bottom) => {
                let number = matchups.len() as u32 + 1;
                matchups.push(Matchup::new(
                    bracket.id,
                    first_round,
                    number,
                    MatchupSide::from(top),
                    MatchupSide::from(bottom),
                ));
            }
            None => bracket.first_round_byes.push(top.competitor_id),
        }
    }

    log::info!(
        "Initialized bracket for league {} ({}): {} competitors, {} opening in the {} round, {} bye(s)",
        bracket.league_name,
        league_id,
        n,
        matchups.len() * 2,
        first_round,
        bracket.first_round_byes.len()
    );

    bracket.total_players = n;
    bracket.players = entries
        .into_iter()
        .map(|e| (e.competitor_id, e))
        .collect();
    bracket.matchups.insert(first_round, matchups);
    Ok(bracket)
}

/// Check the seed set is contiguous 1..=N with unique competitors and names.
fn validate_seeding(seeds: Vec<Seeding>) -> Result<Vec<Seeding>, BracketError> {
    let n = seeds.len();
    if n < 2 {
        return Err(BracketError::InvalidSeeding(format!(
            "need at least 2 competitors, got {n}"
        )));
    }
    if n > Round::MAX_BRACKET_SIZE {
        return Err(BracketError::InvalidSeeding(format!(
            "at most {} competitors are supported, got {n}",
            Round::MAX_BRACKET_SIZE
        )));
    }

    let mut seen_seeds = HashSet::new();
    let mut seen_ids = HashSet::new();
    for s in &seeds {
        if s.seed == 0 || s.seed as usize > n {
            return Err(BracketError::InvalidSeeding(format!(
                "seed {} is outside 1..={n}",
                s.seed
            )));
        }
        if !seen_seeds.insert(s.seed) {
            return Err(BracketError::InvalidSeeding(format!(
                "seed {} is assigned more than once",
                s.seed
            )));
        }
        if !seen_ids.insert(s.competitor_id) {
            return Err(BracketError::InvalidSeeding(format!(
                "competitor {} is seeded more than once",
                s.competitor_id
            )));
        }
        if s.name.trim().is_empty() {
            return Err(BracketError::InvalidSeeding(format!(
                "competitor {} has no name",
                s.competitor_id
            )));
        }
    }
    // n distinct seeds all within 1..=n means the set is exactly 1..=n.
    Ok(seeds)
}

#[derive(Deserialize)]
struct SeedRow {
    competitor_id: uuid::Uuid,
    name: String,
    seed: u32,
    regular_season_score: String,
}

/// Read seeding rows from CSV with header
/// `competitor_id,name,seed,regular_season_score`.
pub fn read_seeds_csv<R: Read>(reader: R) -> Result<Vec<Seeding>, BracketError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut seeds = Vec::new();
    for (line, row) in rdr.deserialize::<SeedRow>().enumerate() {
        let row = row.map_err(|e| BracketError::InvalidSeeding(format!("row {}: {e}", line + 1)))?;
        // Parsed from text so scores never pass through binary floating point.
        let regular_season_score = BigDecimal::from_str(&row.regular_season_score).map_err(|e| {
            BracketError::InvalidSeeding(format!(
                "row {}: bad regular season score {:?}: {e}",
                line + 1,
                row.regular_season_score
            ))
        })?;
        seeds.push(Seeding::new(
            row.competitor_id,
            row.name,
            row.seed,
            regular_season_score,
        ));
    }
    Ok(seeds)
}
