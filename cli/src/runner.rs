//! Search runner shared by the one-shot and line modes.
//!
//! Line mode keeps one process alive for many positions: each input line is
//! a FEN and each answer is a single `bestmove` line, flushed immediately so
//! a parent process can read it back over a pipe.

use anyhow::{Context, Result};
use cozy_chess::Board;
use engine_config::EvaluatorKind;
use games_chess::{format_move, parse_fen, ChessOracle, MaterialModel};
use mcts::{
    BestChildCriterion, Evaluator, EvaluatorError, MctsSearch, RolloutEvaluator, SearchConfig,
    ValueEvaluator,
};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

use crate::config::Config;

/// Answer printed when there is no move to play.
const NO_MOVE: &str = "bestmove (none)";

pub struct Runner {
    oracle: ChessOracle,
    search_config: SearchConfig,
    evaluator: EvaluatorKind,
    material: MaterialModel,
    show_stats: bool,
}

impl Runner {
    pub fn new(config: &Config) -> Self {
        Self {
            oracle: ChessOracle::new(),
            search_config: config.search_config(),
            evaluator: config.evaluator,
            material: MaterialModel::new(config.material_scale),
            show_stats: config.show_stats,
        }
    }

    /// Search a single FEN and write its answer. An invalid FEN is an error.
    pub fn run_fen<W: Write>(&self, fen: &str, out: &mut W) -> Result<()> {
        let board = parse_fen(fen).with_context(|| format!("invalid --fen '{}'", fen))?;
        self.run_board(board, out)
    }

    /// Answer one FEN per input line until the input closes or a `quit` line.
    ///
    /// Empty lines are skipped. An invalid FEN is logged and answered with
    /// `bestmove (none)` so every request still gets exactly one reply.
    /// Returns the number of positions answered.
    pub fn run_lines<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> Result<u32> {
        let mut answered = 0;

        for line in input.lines() {
            let line = line.context("failed to read input line")?;
            let fen = line.trim();

            if fen.is_empty() {
                debug!("Skipping empty input line");
                continue;
            }
            if fen == "quit" {
                break;
            }

            match parse_fen(fen) {
                Ok(board) => self.run_board(board, out)?,
                Err(e) => {
                    warn!(error = %e, "Skipping invalid position");
                    writeln!(out, "{}", NO_MOVE)?;
                    out.flush()?;
                }
            }
            answered += 1;
        }

        Ok(answered)
    }

    fn run_board<W: Write>(&self, board: Board, out: &mut W) -> Result<()> {
        info!(
            fen = %board,
            iterations = self.search_config.iterations,
            exploration = self.search_config.exploration_constant,
            evaluator = %self.evaluator,
            "Starting search"
        );

        match self.evaluator {
            EvaluatorKind::Rollout => {
                let mut evaluator = RolloutEvaluator::from_config(&self.search_config);
                self.search(&mut evaluator, board, out)
            }
            EvaluatorKind::Material => {
                let model = self.material;
                let mut evaluator = ValueEvaluator::new(move |board: &Board| {
                    Ok::<f32, EvaluatorError>(model.value(board))
                });
                self.search(&mut evaluator, board, out)
            }
        }
    }

    fn search<E, W>(&self, evaluator: &mut E, board: Board, out: &mut W) -> Result<()>
    where
        E: Evaluator<ChessOracle>,
        W: Write,
    {
        let mut search = MctsSearch::new(&self.oracle, evaluator, self.search_config.clone(), board)
            .context("failed to start search")?;
        let result = search.run().context("search failed")?;

        info!(
            iterations = result.iterations_run,
            failed = result.failed_iterations,
            root_visits = result.root_visits,
            value = result.value,
            stop_reason = ?result.stop_reason,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "Search finished"
        );

        let tree = search.tree();
        let root_board = &tree.get(tree.root()).position;

        if self.show_stats {
            let mut summaries = tree.child_summaries(tree.root());
            summaries.sort_by(|a, b| b.visits.cmp(&a.visits));
            for summary in &summaries {
                writeln!(
                    out,
                    "info move {} visits {} value {:.3}",
                    format_move(root_board, &summary.mv),
                    summary.visits,
                    summary.mean_value
                )?;
            }
            let stats = tree.stats();
            let best_mean = tree
                .best_child(tree.root(), BestChildCriterion::HighestMean)
                .and_then(|id| tree.get(id).incoming_move.as_ref())
                .map(|mv| format_move(root_board, mv));
            writeln!(
                out,
                "info nodes {} depth {} value {:.3} highest-mean {}",
                stats.total_nodes,
                stats.max_depth,
                result.value,
                best_mean.as_deref().unwrap_or("(none)")
            )?;
        }

        match &result.best_move {
            Some(mv) => writeln!(out, "bestmove {}", format_move(root_board, mv))?,
            None => writeln!(out, "{}", NO_MOVE)?,
        }
        out.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_chess::STARTPOS;

    const BACK_RANK_MATE: &str = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";
    const MATED: &str = "R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1";

    fn material_config(iterations: u32) -> Config {
        Config {
            fen: STARTPOS.into(),
            stdin: false,
            iterations,
            exploration: 1.4,
            max_rollout_depth: 20,
            time_budget_ms: 0,
            branching_factor: 0,
            seed: 1,
            evaluator: EvaluatorKind::Material,
            material_scale: 400.0,
            log_level: "info".into(),
            show_stats: false,
        }
    }

    fn output_lines(out: Vec<u8>) -> Vec<String> {
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn run_lines_answers_every_position() {
        let runner = Runner::new(&material_config(2000));
        let input = format!("not a fen\n\n{}\n{}\n", BACK_RANK_MATE, MATED);
        let mut out = Vec::new();

        let answered = runner.run_lines(input.as_bytes(), &mut out).unwrap();

        assert_eq!(answered, 3);
        assert_eq!(
            output_lines(out),
            vec!["bestmove (none)", "bestmove a1a8", "bestmove (none)"]
        );
    }

    #[test]
    fn run_lines_stops_at_quit() {
        let runner = Runner::new(&material_config(20));
        let input = format!("{}\nquit\n{}\n", STARTPOS, STARTPOS);
        let mut out = Vec::new();

        let answered = runner.run_lines(input.as_bytes(), &mut out).unwrap();

        assert_eq!(answered, 1);
        let lines = output_lines(out);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("bestmove "));
    }

    #[test]
    fn run_lines_with_empty_input_answers_nothing() {
        let runner = Runner::new(&material_config(20));
        let mut out = Vec::new();

        assert_eq!(runner.run_lines("".as_bytes(), &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn run_fen_rejects_invalid_position() {
        let runner = Runner::new(&material_config(20));
        let mut out = Vec::new();

        let err = runner.run_fen("8/8/8 w", &mut out).unwrap_err();
        assert!(err.to_string().contains("invalid --fen"));
        assert!(out.is_empty());
    }

    #[test]
    fn castling_is_printed_as_king_move() {
        let mut config = material_config(60);
        config.show_stats = true;
        let runner = Runner::new(&config);
        let mut out = Vec::new();

        runner
            .run_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", &mut out)
            .unwrap();

        let lines = output_lines(out);
        assert!(lines.iter().any(|l| l.starts_with("info move e1g1 ")));
        assert!(lines.iter().any(|l| l.starts_with("info move e1c1 ")));
        assert!(!lines.iter().any(|l| l.contains("e1h1") || l.contains("e1a1")));
        assert!(lines.last().unwrap().starts_with("bestmove "));
    }
}
