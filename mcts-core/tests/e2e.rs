//! End-to-end scenarios from spec.md §8: whole searches and whole
//! self-play games, exercised the way `hexwar-cli`'s
//! `tests/integration_test.rs` drives the teacher's stack rather than unit
//! testing an isolated function.

use mcts_core::config::SearchConfig;
use mcts_core::{leaf, root as root_parallel, sequential, tree_parallel, SearchTree};
use mcts_games::{GameState, GobangState, NimState, OthelloState};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn nim_fifteen_sequential_thousand_iterations_finds_the_forced_win() {
    let state = NimState::new(15);
    let config = SearchConfig::default().with_iter_max(1000);
    let mut rng = ChaCha8Rng::seed_from_u64(101);
    let mv = sequential::uct(&state, &config, None, &mut rng);
    assert_eq!(mv, 3, "taking 3 leaves a multiple of 4, the forced win");
}

#[test]
fn nim_twelve_sequential_returns_a_legal_move_and_a_populated_tree() {
    let state = NimState::new(12);
    let config = SearchConfig::default().with_iter_max(1000);
    let tree = SearchTree::new();
    let mut rng = ChaCha8Rng::seed_from_u64(102);
    let mv = sequential::uct(&state, &config, Some(&tree), &mut rng);
    assert!(state.get_moves().contains(&mv));
    let root_node = tree.get_node(&state);
    assert!(!root_node.lock().unwrap().children().is_empty(), "children report must be non-empty");
}

#[test]
fn nim_four_every_root_child_value_is_at_or_below_half_and_visits_are_spread() {
    // Player 1 to move on a pile of 4 is the losing side: every reply hands
    // the forced win to player 2, so every child's mean value (from its own
    // player_just_moved viewpoint, i.e. player 1's) should sit at or below
    // the break-even point as visits accumulate.
    let state = NimState::new(4);
    let config = SearchConfig::default().with_iter_max(500).without_pruning();
    let tree: SearchTree<NimState> = SearchTree::new();
    let root_node = tree.get_node(&state);
    let mut rng = ChaCha8Rng::seed_from_u64(103);
    let _ = sequential::uct(&state, &config, Some(&tree), &mut rng);

    let guard = root_node.lock().unwrap();
    assert_eq!(guard.children().len(), 3, "all three legal moves should be explored with 500 iterations");
    for child in guard.children().values() {
        let c = child.lock().unwrap();
        assert!(c.value() <= 0.5 + 1e-9, "losing position: child value {} should not exceed 0.5", c.value());
        assert!(c.visits() >= 1.0);
    }
}

#[test]
fn othello_four_by_four_sequential_self_play_terminates_consistently_with_piece_counts() {
    let mut state = OthelloState::new(4);
    let config = SearchConfig::default().with_iter_max(2000);
    let mut rng = ChaCha8Rng::seed_from_u64(104);

    let mut plies = 0;
    while !state.is_terminal() {
        let mv = sequential::uct(&state, &config, None, &mut rng);
        state.do_move(mv);
        plies += 1;
        assert!(plies < 200, "a 4x4 Othello game must terminate well before 200 plies");
    }

    let r1 = state.get_result(1);
    let r2 = state.get_result(2);
    let consistent = (r1 == 1.0 && r2 == 0.0) || (r1 == 0.0 && r2 == 1.0) || (r1 == 0.5 && r2 == 0.5);
    assert!(consistent, "result_p1={r1} result_p2={r2} must agree on a single winner or a draw");
}

#[test]
fn gobang_eight_by_eight_fifty_move_self_play_terminates() {
    let mut state = GobangState::new(8, 5);
    let config = SearchConfig::default().with_iter_max(200);
    let mut rng = ChaCha8Rng::seed_from_u64(105);

    let mut plies = 0;
    while !state.is_terminal() && plies < 50 {
        let mv = sequential::uct(&state, &config, None, &mut rng);
        state.do_move(mv);
        plies += 1;
    }
    assert!(state.is_terminal() || plies == 50, "either five-in-a-row or the board fills within 50 moves");
}

#[test]
fn tree_parallel_othello_six_by_six_four_workers_respects_node_budget_and_legality() {
    let state = OthelloState::new(6);
    let config = SearchConfig::default().with_iter_max(2000).with_workers(4);
    let tree = SearchTree::new();
    let mut rng = ChaCha8Rng::seed_from_u64(106);
    let mv = tree_parallel::uct(&state, &config, &tree, &mut rng).unwrap();
    assert!(state.get_moves().contains(&mv));
    assert!(tree.len() <= config.iter_max, "node count must not exceed the total iteration budget");
}

#[test]
fn root_parallel_nim_fifteen_four_workers_still_finds_the_forced_win() {
    let state = NimState::new(15);
    let config = SearchConfig::default().with_iter_max(1000).with_workers(4);
    let mut rng = ChaCha8Rng::seed_from_u64(107);
    let mv = root_parallel::uct(&state, &config, &mut rng).unwrap();
    assert_eq!(mv, 3);
}

#[test]
fn leaf_parallel_gobang_self_play_is_legal_throughout() {
    let mut state = GobangState::new(6, 4);
    let config = SearchConfig::default().with_iter_max(100).with_workers(4);
    let tree = SearchTree::new();
    let mut rng = ChaCha8Rng::seed_from_u64(108);

    let mut plies = 0;
    while !state.is_terminal() && plies < 36 {
        let legal = state.get_moves();
        let mv = leaf::uct(&state, &config, &tree, &mut rng).unwrap();
        assert!(legal.contains(&mv));
        state.do_move(mv);
        plies += 1;
    }
}
