//! Integration tests for bracket initialization and seeding import.

mod common;

use common::{bracket, dec, id_of_seed, seeds};
use playoff_bracket::{
    initialize_bracket, read_seeds_csv, BracketError, BracketPhase, MatchupStatus, PlayerStatus,
    Round, Seeding, TiebreakerConfiguration,
};
use uuid::Uuid;

fn seed_pairs(b: &playoff_bracket::Bracket) -> Vec<(u32, u32)> {
    b.matchups_for(b.first_round)
        .iter()
        .map(|m| (m.home.seed, m.away.seed))
        .collect()
}

#[test]
fn four_competitors_pair_one_vs_four_and_two_vs_three() {
    let b = bracket(4);
    assert_eq!(b.first_round, Round::Conference);
    assert_eq!(b.phase, BracketPhase::Active(Round::Conference));
    assert_eq!(seed_pairs(&b), vec![(1, 4), (2, 3)]);
    assert!(b.first_round_byes.is_empty());
    assert_eq!(b.total_players, 4);
    assert!(b
        .players
        .values()
        .all(|p| p.status == PlayerStatus::Active));
    for (i, m) in b.matchups_for(Round::Conference).iter().enumerate() {
        assert_eq!(m.matchup_number, i as u32 + 1);
        assert_eq!(m.status, MatchupStatus::Scheduled);
        assert_eq!(m.bracket_id, b.id);
    }
}

#[test]
fn bracket_size_picks_opening_round() {
    assert_eq!(bracket(2).first_round, Round::Championship);
    assert_eq!(bracket(8).first_round, Round::Divisional);
    assert_eq!(bracket(16).first_round, Round::WildCard);
    assert_eq!(
        seed_pairs(&bracket(8)),
        vec![(1, 8), (2, 7), (3, 6), (4, 5)]
    );
}

#[test]
fn top_seeds_get_byes_when_field_is_not_a_power_of_two() {
    let b = bracket(3);
    assert_eq!(b.first_round, Round::Conference);
    assert_eq!(seed_pairs(&b), vec![(2, 3)]);
    assert_eq!(b.first_round_byes, vec![id_of_seed(&b, 1)]);

    let b = bracket(6);
    assert_eq!(b.first_round, Round::Divisional);
    assert_eq!(seed_pairs(&b), vec![(3, 6), (4, 5)]);
    assert_eq!(
        b.first_round_byes,
        vec![id_of_seed(&b, 1), id_of_seed(&b, 2)]
    );

    let b = bracket(5);
    assert_eq!(seed_pairs(&b), vec![(4, 5)]);
    assert_eq!(b.first_round_byes.len(), 3);
}

#[test]
fn seeds_may_arrive_in_any_order() {
    let mut input = seeds(4);
    input.reverse();
    let b = initialize_bracket(
        Uuid::new_v4(),
        "League",
        input,
        TiebreakerConfiguration::default(),
    )
    .unwrap();
    assert_eq!(seed_pairs(&b), vec![(1, 4), (2, 3)]);
}

fn init(seeds: Vec<Seeding>) -> Result<playoff_bracket::Bracket, BracketError> {
    initialize_bracket(
        Uuid::new_v4(),
        "League",
        seeds,
        TiebreakerConfiguration::default(),
    )
}

#[test]
fn rejects_fewer_than_two_competitors() {
    assert!(matches!(init(seeds(1)), Err(BracketError::InvalidSeeding(_))));
    assert!(matches!(init(Vec::new()), Err(BracketError::InvalidSeeding(_))));
}

#[test]
fn rejects_more_than_sixteen_competitors() {
    assert!(matches!(init(seeds(17)), Err(BracketError::InvalidSeeding(_))));
}

#[test]
fn rejects_gaps_and_duplicate_seeds() {
    let mut gap = seeds(4);
    gap[3].seed = 5;
    assert!(matches!(init(gap), Err(BracketError::InvalidSeeding(_))));

    let mut dup = seeds(4);
    dup[3].seed = 1;
    assert!(matches!(init(dup), Err(BracketError::InvalidSeeding(_))));

    let mut zero = seeds(4);
    zero[0].seed = 0;
    assert!(matches!(init(zero), Err(BracketError::InvalidSeeding(_))));
}

#[test]
fn rejects_same_competitor_twice_and_blank_names() {
    let mut twice = seeds(4);
    twice[1].competitor_id = twice[0].competitor_id;
    assert!(matches!(init(twice), Err(BracketError::InvalidSeeding(_))));

    let mut blank = seeds(4);
    blank[2].name = "  ".into();
    assert!(matches!(init(blank), Err(BracketError::InvalidSeeding(_))));
}

#[test]
fn reads_seeds_from_csv() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let data = format!(
        "competitor_id,name,seed,regular_season_score\n{a}, Gridiron Gang ,1,1620.35\n{b},Blitz,2,1580.10\n"
    );
    let rows = read_seeds_csv(data.as_bytes()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].competitor_id, a);
    assert_eq!(rows[0].name, "Gridiron Gang");
    assert_eq!(rows[0].seed, 1);
    assert_eq!(rows[0].regular_season_score, dec("1620.35"));
    assert_eq!(rows[1].regular_season_score, dec("1580.10"));

    let bracket = init(rows).unwrap();
    assert_eq!(bracket.matchups_for(Round::Championship).len(), 1);
}

#[test]
fn csv_errors_name_the_row() {
    let data = format!(
        "competitor_id,name,seed,regular_season_score\n{},A,1,100\n{},B,2,lots\n",
        Uuid::new_v4(),
        Uuid::new_v4()
    );
    match read_seeds_csv(data.as_bytes()) {
        Err(BracketError::InvalidSeeding(msg)) => assert!(msg.contains("row 2"), "{msg}"),
        other => panic!("expected InvalidSeeding, got {other:?}"),
    }
}

#[test]
fn fresh_round_lists_unscored_matchups() {
    let b = bracket(8);
    let details = playoff_bracket::round_matchups(&b, Round::Divisional);
    assert_eq!(details.len(), 4);
    for (i, d) in details.iter().enumerate() {
        assert_eq!(d.matchup_number, i as u32 + 1);
        assert_eq!(d.status, MatchupStatus::Scheduled);
        assert_eq!(d.home.score, None);
        assert!(!d.home.is_complete);
        assert!(d.slot_comparisons.is_empty());
        assert_eq!(d.winner_id, None);
        assert!(!d.is_upset);
    }
    assert!(playoff_bracket::round_matchups(&b, Round::Conference).is_empty());
}
