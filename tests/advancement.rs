//! Integration tests for round advancement.

mod common;

use common::{bracket, dec, final_score, id_of_seed, score_round, score_with};
use playoff_bracket::models::{Lineup, Position, PositionScore, SlotStatus};
use playoff_bracket::{
    process_advancement, Bracket, BracketError, BracketPhase, CompetitorId, MatchupStatus,
    PlayerStatus, Round, RosterScore, TiebreakerMethod,
};
use rand::seq::SliceRandom;
use std::collections::HashSet;

#[test]
fn four_team_bracket_plays_to_a_champion() {
    let mut b = bracket(4);
    let (s1, s2, s3, s4) = (
        id_of_seed(&b, 1),
        id_of_seed(&b, 2),
        id_of_seed(&b, 3),
        id_of_seed(&b, 4),
    );
    let r = Round::Conference;
    b.record_score(final_score(&b, s1, r, "120.5")).unwrap();
    b.record_score(final_score(&b, s4, r, "90.0")).unwrap();
    b.record_score(score_with(&b, s2, r, "103.2", 3, "12.4")).unwrap();
    b.record_score(score_with(&b, s3, r, "103.2", 3, "9.1")).unwrap();

    let result = process_advancement(&mut b, r).unwrap();
    assert_eq!(result.eliminated, vec![s4, s3]);
    assert_eq!(result.advancing, vec![s1, s2]);
    assert!(!result.complete);
    assert_eq!(result.next_round, Some(Round::Championship));

    let first = &result.matchup_results[0].outcome;
    assert_eq!(first.winner_id, s1);
    assert_eq!(first.margin, dec("30.5"));
    assert!(first.tiebreaker.is_none());
    assert!(!first.is_upset);

    let second = &result.matchup_results[1].outcome;
    assert_eq!(second.winner_id, s2);
    assert_eq!(second.margin, dec("0"));
    let tb = second.tiebreaker.as_ref().unwrap();
    assert_eq!(tb.method_used, TiebreakerMethod::BenchPoints);
    assert!(!tb.cascade_exhausted);

    assert!(b
        .matchups_for(r)
        .iter()
        .all(|m| m.status == MatchupStatus::Completed));
    let out = b.player(s3).unwrap().elimination().unwrap();
    assert_eq!(out.round, r);
    assert_eq!(out.eliminated_by, s2);
    assert_eq!(b.phase, BracketPhase::Active(Round::Championship));

    let final_matchups = b.matchups_for(Round::Championship);
    assert_eq!(final_matchups.len(), 1);
    assert_eq!(final_matchups[0].home.competitor_id, s1);
    assert_eq!(final_matchups[0].away.competitor_id, s2);

    let f = Round::Championship;
    b.record_score(final_score(&b, s1, f, "110")).unwrap();
    b.record_score(final_score(&b, s2, f, "130")).unwrap();
    let result = process_advancement(&mut b, f).unwrap();
    assert!(result.complete);
    assert_eq!(result.next_round, None);
    assert_eq!(result.eliminated, vec![s1]);
    assert_eq!(result.advancing, vec![s2]);
    assert!(result.matchup_results[0].outcome.is_upset);

    assert!(b.is_complete());
    assert_eq!(b.phase, BracketPhase::Complete);
    assert_eq!(b.player(s2).unwrap().status, PlayerStatus::Champion);
    assert_eq!(b.champion().unwrap().competitor_id, s2);
    assert_eq!(b.rounds_survived(s2), 2);
    assert_eq!(b.rounds_survived(s1), 1);
    assert_eq!(b.rounds_survived(s4), 0);
}

#[test]
fn only_the_current_round_can_advance() {
    let mut b = bracket(4);
    score_round(&mut b, "100", "90");
    assert_eq!(
        process_advancement(&mut b, Round::Championship),
        Err(BracketError::InvalidRoundTransition {
            requested: Round::Championship,
            current: Round::Conference,
        })
    );
    assert!(matches!(
        process_advancement(&mut b, Round::Divisional),
        Err(BracketError::InvalidRoundTransition { .. })
    ));

    process_advancement(&mut b, Round::Conference).unwrap();
    assert!(matches!(
        process_advancement(&mut b, Round::Conference),
        Err(BracketError::InvalidRoundTransition { .. })
    ));
}

#[test]
fn completed_bracket_rejects_further_advancement() {
    let mut b = bracket(2);
    score_round(&mut b, "100", "90");
    process_advancement(&mut b, Round::Championship).unwrap();
    for round in Round::ALL {
        assert_eq!(
            process_advancement(&mut b, round),
            Err(BracketError::AlreadyComplete)
        );
    }
}

#[test]
fn unfinished_scores_block_advancement_without_changing_anything() {
    let mut b = bracket(4);
    let r = Round::Conference;
    let s1 = id_of_seed(&b, 1);
    let s4 = id_of_seed(&b, 4);

    let unscored = b.clone();
    assert_eq!(
        process_advancement(&mut b, r),
        Err(BracketError::IncompleteRound { round: r, pending: 2 })
    );
    assert_eq!(b, unscored);

    b.record_score(final_score(&b, s1, r, "100")).unwrap();
    let live = RosterScore::from_slots(
        s4,
        "Team 4",
        r,
        vec![PositionScore {
            position: Position::Qb,
            lineup: Lineup::Starter,
            player: None,
            points: dec("12"),
            status: SlotStatus::Live,
            stats: None,
        }],
    );
    b.record_score(live).unwrap();
    score_matchup(&mut b, 2, "80", "70");

    let before = b.clone();
    let err = process_advancement(&mut b, r).unwrap_err();
    assert_eq!(err, BracketError::IncompleteRound { round: r, pending: 1 });
    assert!(err.is_retryable());
    assert_eq!(b, before);

    b.record_score(final_score(&b, s4, r, "99")).unwrap();
    assert!(process_advancement(&mut b, r).is_ok());
}

fn score_matchup(b: &mut Bracket, number: u32, home: &str, away: &str) {
    let r = b.current_round();
    let m = b.matchups_for(r)[number as usize - 1].clone();
    let h = final_score(b, m.home.competitor_id, r, home);
    let a = final_score(b, m.away.competitor_id, r, away);
    b.record_score(h).unwrap();
    b.record_score(a).unwrap();
}

#[test]
fn every_entrant_is_either_eliminated_or_advancing() {
    for n in [2, 3, 5, 6, 8, 11, 16] {
        let mut b = bracket(n);
        while !b.is_complete() {
            let round = b.current_round();
            let mut entering: HashSet<CompetitorId> = b
                .matchups_for(round)
                .iter()
                .flat_map(|m| [m.home.competitor_id, m.away.competitor_id])
                .collect();
            if round == b.first_round {
                entering.extend(b.first_round_byes.iter().copied());
            }

            score_round(&mut b, "101", "99");
            let result = process_advancement(&mut b, round).unwrap();

            let eliminated: HashSet<_> = result.eliminated.iter().copied().collect();
            let advancing: HashSet<_> = result.advancing.iter().copied().collect();
            assert_eq!(
                result.eliminated.len() + result.advancing.len(),
                entering.len(),
                "{n} competitors, {round} round"
            );
            assert!(eliminated.is_disjoint(&advancing));
            assert_eq!(
                eliminated.union(&advancing).copied().collect::<HashSet<_>>(),
                entering
            );
        }
        assert_eq!(b.active_players().count(), 0);
        assert!(b.champion().is_some());
    }
}

#[test]
fn top_seed_faces_weakest_survivor_next_round() {
    let mut b = bracket(8);
    score_round(&mut b, "120", "100");
    process_advancement(&mut b, Round::Divisional).unwrap();
    let pairs: Vec<(u32, u32)> = b
        .matchups_for(Round::Conference)
        .iter()
        .map(|m| (m.home.seed, m.away.seed))
        .collect();
    assert_eq!(pairs, vec![(1, 4), (2, 3)]);
}

#[test]
fn bye_recipient_meets_opening_round_winner() {
    let mut b = bracket(3);
    let (s1, s2, s3) = (id_of_seed(&b, 1), id_of_seed(&b, 2), id_of_seed(&b, 3));
    // Seed 3 upsets seed 2.
    score_round(&mut b, "80", "100");
    let result = process_advancement(&mut b, Round::Conference).unwrap();
    assert_eq!(result.eliminated, vec![s2]);
    assert_eq!(result.advancing, vec![s1, s3]);
    assert!(result.matchup_results[0].outcome.is_upset);
    assert_eq!(b.rounds_survived(s1), 1);

    let fin = &b.matchups_for(Round::Championship)[0];
    assert_eq!((fin.home.competitor_id, fin.away.competitor_id), (s1, s3));
}

#[test]
fn advancement_is_deterministic_regardless_of_scoring_order() {
    let base = bracket(8);
    let round = base.first_round;
    let mut scores: Vec<RosterScore> = Vec::new();
    for m in base.matchups_for(round) {
        // All ties: winners come purely from the cascade.
        scores.push(score_with(&base, m.home.competitor_id, round, "95.5", 2, "4"));
        scores.push(score_with(&base, m.away.competitor_id, round, "95.5", 2, "4"));
    }

    let mut rng = rand::thread_rng();
    let mut runs = Vec::new();
    for _ in 0..5 {
        let mut b = base.clone();
        scores.shuffle(&mut rng);
        for s in &scores {
            b.record_score(s.clone()).unwrap();
        }
        let result = process_advancement(&mut b, round).unwrap();
        let methods: Vec<_> = result
            .matchup_results
            .iter()
            .map(|r| r.outcome.tiebreaker.as_ref().map(|t| t.method_used))
            .collect();
        runs.push((result.eliminated, result.advancing, methods));
    }
    assert!(runs.windows(2).all(|w| w[0] == w[1]));
    // Identical profiles except for regular-season score, which favors the better seed.
    assert_eq!(
        runs[0].2,
        vec![Some(TiebreakerMethod::RegularSeasonScore); 4]
    );
}

#[test]
fn live_bench_slot_blocks_a_tiebreak_on_bench_points() {
    let mut b = bracket(2);
    let (s1, s2) = (id_of_seed(&b, 1), id_of_seed(&b, 2));
    let r = Round::Championship;
    b.record_score(score_with(&b, s1, r, "100.0", 2, "3.0")).unwrap();
    let mut live_bench = score_with(&b, s2, r, "100.0", 2, "5.0");
    live_bench.position_scores[1].status = SlotStatus::Live;
    let live_bench = RosterScore::from_slots(s2, "Team 2", r, live_bench.position_scores);
    assert!(!live_bench.is_complete);
    b.record_score(live_bench).unwrap();

    let before = b.clone();
    assert_eq!(
        process_advancement(&mut b, r),
        Err(BracketError::IncompleteRound { round: r, pending: 1 })
    );
    assert_eq!(b, before);
    assert!(b.champion().is_none());
}

#[test]
fn current_round_without_matchups_is_rejected() {
    let mut b = bracket(4);
    b.matchups.remove(&Round::Conference);
    assert_eq!(
        process_advancement(&mut b, Round::Conference),
        Err(BracketError::RoundHasNoMatchups(Round::Conference))
    );
}
