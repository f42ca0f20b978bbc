//! Property tests for tree bookkeeping and move legality.

mod common;

use common::{Nim, Take};
use engine_core::Oracle;
use games_chess::{parse_fen, ChessOracle, MaterialModel, STARTPOS};
use mcts::{EvaluatorError, MctsSearch, RolloutEvaluator, SearchConfig, ValueEvaluator};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn visits_are_conserved(
        stones in 1u32..40,
        max_take in 1u32..5,
        iterations in 1u32..200,
        seed in any::<u64>(),
    ) {
        let oracle = Nim { max_take };
        let config = SearchConfig::default()
            .with_iterations(iterations)
            .with_max_rollout_depth(20)
            .with_seed(seed);
        let mut evaluator = RolloutEvaluator::from_config(&config);

        let mut search = MctsSearch::new(&oracle, &mut evaluator, config, stones).unwrap();
        let result = search.run().unwrap();
        let tree = search.tree();

        prop_assert_eq!(result.failed_iterations, 0);
        prop_assert_eq!(result.root_visits, result.iterations_run);

        for (index, node) in tree.arena().iter().enumerate() {
            let child_visits: u32 = node.children.iter().map(|&c| tree.get(c).visit_count).sum();
            prop_assert!(node.visit_count >= child_visits);
            prop_assert!(node.mean_value().abs() <= 1.0 + 1e-9);

            if index == 0 {
                // Nim roots here have stones, so every visit passes to a child
                prop_assert_eq!(node.visit_count, child_visits);
            } else if node.is_terminal() {
                // Every visit ends here
                prop_assert!(node.children.is_empty());
                prop_assert!(node.visit_count > 0);
            } else {
                // Only the iteration that created the node stops on it
                prop_assert_eq!(node.visit_count, child_visits + 1);
            }

            if node.is_prepared() {
                let legal = oracle.legal_moves(&node.position).unwrap().len();
                let expected = if node.is_terminal() { 0 } else { legal };
                prop_assert_eq!(node.children.len() + node.untried_moves().len(), expected);
            }
        }
    }

    #[test]
    fn untried_moves_only_shrink_as_budget_grows(
        stones in 1u32..25,
        max_take in 1u32..5,
        max_iterations in 2u32..60,
        seed in any::<u64>(),
    ) {
        let oracle = Nim { max_take };
        let run = |iterations: u32| {
            let config = SearchConfig::default()
                .with_iterations(iterations)
                .with_max_rollout_depth(20)
                .with_seed(seed);
            let mut evaluator = RolloutEvaluator::from_config(&config);
            let mut search = MctsSearch::new(&oracle, &mut evaluator, config, stones).unwrap();
            search.run().unwrap();
            search.tree().clone()
        };

        // The same seed replays the same first iterations, so each tree
        // extends the previous one node for node.
        let mut previous = run(1);
        for iterations in 2..=max_iterations {
            let current = run(iterations);
            prop_assert!(current.len() >= previous.len());

            for (before, after) in previous.arena().iter().zip(current.arena()) {
                prop_assert_eq!(before.position, after.position);
                prop_assert!(after.visit_count >= before.visit_count);
                prop_assert!(after.children.len() >= before.children.len());
                if before.is_prepared() {
                    prop_assert!(after.is_prepared());
                    prop_assert!(after.untried_moves().len() <= before.untried_moves().len());
                    prop_assert_eq!(
                        after.children.len() + after.untried_moves().len(),
                        before.children.len() + before.untried_moves().len()
                    );
                }
            }
            previous = current;
        }
    }

    #[test]
    fn best_move_is_legal_and_most_visited(
        stones in 2u32..30,
        max_take in 1u32..4,
        iterations in 1u32..150,
    ) {
        let oracle = Nim { max_take };
        let config = SearchConfig::default().with_iterations(iterations).with_max_rollout_depth(30);
        let mut evaluator = RolloutEvaluator::from_config(&config);

        let mut search = MctsSearch::new(&oracle, &mut evaluator, config, stones).unwrap();
        let result = search.run().unwrap();
        let tree = search.tree();

        let best = result.best_move.unwrap();
        prop_assert!(oracle.legal_moves(&stones).unwrap().contains(&best));

        let summaries = tree.child_summaries(tree.root());
        let best_visits = summaries.iter().find(|s| s.mv == best).map(|s| s.visits);
        let max_visits = summaries.iter().map(|s| s.visits).max();
        prop_assert_eq!(best_visits, max_visits);
    }

    #[test]
    fn chess_search_returns_legal_move(
        walk in prop::collection::vec(any::<prop::sample::Index>(), 0..24),
        iterations in 1u32..40,
    ) {
        let oracle = ChessOracle::new();
        let mut board = parse_fen(STARTPOS).unwrap();
        for index in &walk {
            let moves = oracle.legal_moves(&board).unwrap();
            if moves.is_empty() {
                break;
            }
            board = oracle.apply(&board, &moves[index.index(moves.len())]).unwrap();
        }

        let model = MaterialModel::default();
        let mut evaluator = ValueEvaluator::new(move |b: &cozy_chess::Board| {
            Ok::<f32, EvaluatorError>(model.value(b))
        });
        let config = SearchConfig::default().with_iterations(iterations);

        let mut search = MctsSearch::new(&oracle, &mut evaluator, config, board.clone()).unwrap();
        let result = search.run().unwrap();

        let legal = if oracle.terminal(&board).unwrap().is_terminal() {
            Vec::new()
        } else {
            oracle.legal_moves(&board).unwrap()
        };
        match result.best_move {
            Some(mv) => prop_assert!(legal.contains(&mv)),
            None => prop_assert!(legal.is_empty()),
        }
    }
}

#[test]
fn nim_take_is_rejected_when_too_large() {
    let oracle = Nim { max_take: 3 };
    assert!(oracle.apply(&2, &Take(3)).is_err());
    assert_eq!(oracle.apply(&5, &Take(3)).unwrap(), 2);
}
