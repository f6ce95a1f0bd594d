// Integration tests for the draft engine.
//
// These drive `DraftEngine` through whole drafts using only the public API:
// board shape, snake ordering, turn ownership, pick commit failures, reset,
// completion and recommendations.

use std::collections::{BTreeMap, HashSet};

use draftcalc_core::engine::DraftEngine;
use draftcalc_core::league::{default_roster_requirements, LeagueConfiguration, TOTAL_ROUNDS};
use draftcalc_core::player::{Player, Position};
use draftcalc_core::scorer::Recommendation;
use draftcalc_core::sources::default_players;
use draftcalc_core::DraftError;

// ===========================================================================
// Test helpers
// ===========================================================================

fn league(teams: i64, position: i64, snake: bool) -> LeagueConfiguration {
    LeagueConfiguration::create(teams, position, snake, default_roster_requirements()).unwrap()
}

/// `n` players cycling through the six positions.
fn players(n: usize) -> Vec<Player> {
    (1..=n)
        .map(|i| {
            Player::new(
                format!("p{i}"),
                format!("Player {i}"),
                Position::ALL[i % Position::ALL.len()],
                "FA",
            )
            .with_rank(i as i32)
            .with_points(400.0 - i as f64)
            .with_adp(i as f64)
            .with_tier(1 + (i as i32 - 1) / 24)
        })
        .collect()
}

fn engine(teams: i64, position: i64, snake: bool) -> DraftEngine {
    let total = teams as usize * TOTAL_ROUNDS as usize;
    DraftEngine::with_players(players(total + 10), league(teams, position, snake)).unwrap()
}

/// Pick `player_id` for whoever is on the clock.
fn pick_on_clock(engine: &mut DraftEngine, player_id: &str) -> Result<(), DraftError> {
    let snap = engine.state();
    let team = snap.team_on_clock.unwrap_or(1);
    engine
        .make_pick(player_id, team, snap.state.current_round, snap.state.current_pick)
        .map(|_| ())
}

// ===========================================================================
// Board and ordering
// ===========================================================================

#[test]
fn board_has_every_slot_for_all_league_sizes() {
    for teams in 8..=16 {
        let e = engine(teams, 1, true);
        let board = e.board();
        assert_eq!(board.len(), TOTAL_ROUNDS as usize);
        assert!(board.iter().all(|round| round.len() == teams as usize));

        let numbers: Vec<u32> = board.iter().flatten().map(|p| p.pick_number).collect();
        let unique: HashSet<u32> = numbers.iter().copied().collect();
        assert_eq!(numbers.len(), teams as usize * 15);
        assert_eq!(unique.len(), numbers.len());
        assert_eq!(numbers, (1..=teams as u32 * 15).collect::<Vec<_>>());
    }
}

#[test]
fn snake_rounds_reverse() {
    let e = engine(10, 1, true);
    let board = e.board();
    let round = |r: usize| board[r].iter().map(|p| p.team_id).collect::<Vec<_>>();
    assert_eq!(round(0), (1..=10).collect::<Vec<_>>());
    assert_eq!(round(1), (1..=10).rev().collect::<Vec<_>>());
    assert_eq!(round(2), (1..=10).collect::<Vec<_>>());
}

#[test]
fn linear_rounds_do_not_reverse() {
    let e = engine(10, 1, false);
    for round in e.board() {
        let teams: Vec<u32> = round.iter().map(|p| p.team_id).collect();
        assert_eq!(teams, (1..=10).collect::<Vec<_>>());
    }
}

#[test]
fn snake_turns_follow_board() {
    let mut e = engine(8, 1, true);
    let mut owners = Vec::new();
    for i in 1..=16 {
        owners.push(e.state().team_on_clock.unwrap());
        pick_on_clock(&mut e, &format!("p{i}")).unwrap();
    }
    let expected: Vec<u32> = (1..=8).chain((1..=8).rev()).collect();
    assert_eq!(owners, expected);

    let history = e.history();
    assert_eq!(history.len(), 16);
    assert_eq!(history[8].team_id, 8);
    assert_eq!(history[15].team_id, 1);
}

// ===========================================================================
// User pick scenario
// ===========================================================================

#[test]
fn twelve_team_user_at_five() {
    let mut e = engine(12, 5, true);
    let mut user_picks = Vec::new();
    for i in 1..=24 {
        let snap = e.state();
        if snap.is_user_pick {
            user_picks.push(snap.state.current_pick);
            assert_eq!(snap.team_on_clock, Some(5));
        }
        pick_on_clock(&mut e, &format!("p{i}")).unwrap();
    }
    // Round 1 slot 5, round 2 slot 8 (12 - 5 + 1).
    assert_eq!(user_picks, vec![5, 20]);
}

// ===========================================================================
// Pick failures
// ===========================================================================

#[test]
fn second_pick_of_same_player_fails() {
    let mut e = engine(8, 1, true);
    pick_on_clock(&mut e, "p1").unwrap();
    let before = e.state();
    let err = pick_on_clock(&mut e, "p1").unwrap_err();
    assert!(matches!(err, DraftError::AlreadyDrafted { ref player_id } if player_id == "p1"));
    assert_eq!(e.state(), before);
}

#[test]
fn stale_turn_is_conflict() {
    let mut e = engine(12, 1, true);
    pick_on_clock(&mut e, "p1").unwrap();
    // Client still thinks pick 1 is on the clock.
    let err = e.make_pick("p2", 1, 1, 1).unwrap_err();
    match err {
        DraftError::Conflict { expected, actual } => {
            assert_eq!(expected, "round 1, pick 2, team 2");
            assert_eq!(actual, "round 1, pick 1, team 1");
        }
        other => panic!("expected Conflict, got {other:?}"),
    }
    assert!(e.catalog().get("p2").unwrap().is_available());
}

// ===========================================================================
// Progress, completion and reset
// ===========================================================================

#[test]
fn full_draft_completes_exactly_once() {
    let mut e = engine(8, 3, true);
    let total = 8 * 15;
    let mut completions = 0;
    let mut last_pick = e.state().state.current_pick;
    assert_eq!(last_pick, 1);

    for i in 1..=total {
        let was_complete = e.state().state.is_complete;
        pick_on_clock(&mut e, &format!("p{i}")).unwrap();
        let state = e.state().state;
        assert_eq!(state.current_pick, last_pick + 1);
        last_pick = state.current_pick;
        if state.is_complete && !was_complete {
            completions += 1;
            assert_eq!(state.current_pick, total as u32 + 1);
        }
    }
    assert_eq!(completions, 1);

    let snap = e.state();
    assert!(snap.state.is_complete);
    assert_eq!(snap.state.current_round, 15);
    assert_eq!(snap.team_on_clock, None);
    assert!(!snap.is_user_pick);
    assert!(e.board().iter().flatten().all(|p| p.is_filled()));
    assert!(snap.teams.iter().all(|t| t.roster.len() == 15));

    let err = e.make_pick("p200", 1, 15, total as u32 + 1).unwrap_err();
    assert_eq!(err.kind(), "invalid_state");
    assert_eq!(e.state(), snap);
}

#[test]
fn reset_after_picks_restores_catalog() {
    let mut e = engine(10, 1, true);
    let catalog_size = e.catalog().len();
    for i in 1..=25 {
        pick_on_clock(&mut e, &format!("p{i}")).unwrap();
    }
    assert_eq!(e.state().available_players.len(), catalog_size - 25);

    e.reset();
    let snap = e.state();
    assert_eq!(snap.available_players.len(), catalog_size);
    assert!(!snap.state.is_complete);
    assert_eq!(snap.state.current_pick, 1);
    assert_eq!(snap.state.current_round, 1);
    assert!(e.board().iter().flatten().all(|p| !p.is_filled()));

    // The same players can be drafted again.
    pick_on_clock(&mut e, "p1").unwrap();
}

// ===========================================================================
// Recommendations
// ===========================================================================

#[test]
fn need_for_lone_running_back() {
    let mut pool = vec![Player::new("rb", "Lone Back", Position::RB, "SF")
        .with_rank(5)
        .with_points(300.0)
        .with_adp(5.0)];
    for i in 0..9 {
        pool.push(
            Player::new(format!("wr{i}"), format!("Receiver {i}"), Position::WR, "FA")
                .with_rank(10 + i)
                .with_points(250.0)
                .with_adp(20.0),
        );
    }
    let requirements = BTreeMap::from([(Position::QB, 0), (Position::RB, 2)]);
    let config = LeagueConfiguration::create(12, 5, true, requirements).unwrap();
    let e = DraftEngine::with_players(pool, config).unwrap();

    let rec = e.suggest(5, 1).unwrap();
    assert_eq!(rec.team_needs()[&Position::RB], 4.0);
    assert_eq!(rec.team_needs()[&Position::QB], 0.0);
    let best = rec.optimal_pick().unwrap();
    assert!((best.breakdown.need_weight - 0.95).abs() < 1e-12);
}

#[test]
fn sample_players_suggestion_is_stable() {
    let e = DraftEngine::with_players(default_players(), LeagueConfiguration::default()).unwrap();
    let first = e.suggest(1, 1).unwrap();
    let second = e.suggest(1, 1).unwrap();
    assert_eq!(first, second);
    match first {
        Recommendation::Candidates {
            optimal_pick,
            alternatives,
            reasoning,
            ..
        } => {
            assert_eq!(alternatives.len(), 3);
            assert!(alternatives.iter().all(|a| a.score <= optimal_pick.score));
            assert!(!reasoning.is_empty());
        }
        other => panic!("expected candidates, got {other:?}"),
    }
}

#[test]
fn drafting_everyone_leaves_no_candidates() {
    let mut e = DraftEngine::with_players(players(5), league(8, 1, true)).unwrap();
    for i in 1..=5 {
        pick_on_clock(&mut e, &format!("p{i}")).unwrap();
    }
    let rec = e.suggest(6, 1).unwrap();
    assert!(matches!(rec, Recommendation::NoCandidates { .. }));
    assert!(rec.team_needs().values().all(|&n| n > 0.0));
}
