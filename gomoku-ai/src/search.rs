//! 搜索引擎
//!
//! 按策略表依次询问各个提议者，困难难度的兜底是迭代加深 Minimax + Alpha-Beta 剪枝。
//! 任何提议者出错（包括 panic）都退回到兜底着法，保证棋盘有空位时一定给出合法着法。

use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use gomoku_core::{Board, Move, Player, Position};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::candidates::{meaningful_cells, ordered_candidates};
use crate::config::{AiConfig, SearchConfig};
use crate::deadline::{Clock, Deadline};
use crate::evaluate::Evaluator;
use crate::tactics::{
    best_by_evaluation, find_critical_defense, find_multiple_threat, find_prevent_threat,
    find_winning_move, MoveProposer, Strategy,
};

/// 成五的基础分
pub const WIN_SCORE: i32 = 10_000;

/// 分数绝对值超过此值视为已分胜负，停止加深
pub const FORCED_RESULT_THRESHOLD: i32 = 9_000;

/// 兜底选择时评估的候选数
pub const BACKUP_CANDIDATES: usize = 10;

/// Alpha-Beta 初始窗口
const SCORE_INFINITY: i32 = 1_000_000_000;

/// 剩余深度为 depth 时成五的分数：剩余深度越大，胜得越早，分数越高
pub fn win_score(depth: u8) -> i32 {
    WIN_SCORE + depth as i32
}

/// Minimax 搜索结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i32,
    pub best_move: Option<Position>,
    /// 根节点的搜索深度
    pub depth: u8,
    pub nodes: u64,
}

impl SearchResult {
    fn leaf(score: i32) -> Self {
        Self {
            score,
            best_move: None,
            depth: 0,
            nodes: 1,
        }
    }
}

/// 一次选着的诊断信息
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub chosen: Option<Move>,
    /// 给出着法的提议者
    pub proposer: Option<MoveProposer>,
    /// 迭代加深完成的最深层数（未使用深度搜索为 0）
    pub depth_reached: u8,
    pub nodes: u64,
    pub score: Option<i32>,
    pub elapsed: Duration,
}

impl SearchReport {
    fn empty() -> Self {
        Self {
            chosen: None,
            proposer: None,
            depth_reached: 0,
            nodes: 0,
            score: None,
            elapsed: Duration::ZERO,
        }
    }
}

/// AI 引擎
#[derive(Debug, Clone)]
pub struct AiEngine {
    config: SearchConfig,
    evaluator: Evaluator,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: SearchConfig) -> Self {
        Self {
            evaluator: Evaluator::new(config.win_condition, config.style),
            config,
        }
    }

    /// 从 AI 配置创建
    pub fn from_ai_config(ai: &AiConfig, win_condition: usize) -> Self {
        Self::new(SearchConfig::new(ai, win_condition))
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// 为 player 选择着法，棋盘已满时返回 None
    pub fn select_move(&self, board: &Board, player: Player) -> Option<Move> {
        self.select_move_with_rng(board, player, &mut rand::thread_rng())
    }

    /// 使用指定随机源选择着法
    pub fn select_move_with_rng<R: Rng>(
        &self,
        board: &Board,
        player: Player,
        rng: &mut R,
    ) -> Option<Move> {
        self.analyze(board, player, rng).chosen
    }

    /// 在后台线程中选择着法，不阻塞异步运行时
    pub async fn select_move_async(&self, board: Board, player: Player) -> Option<Move> {
        let engine = self.clone();
        let search_board = board.clone();
        match tokio::task::spawn_blocking(move || engine.select_move(&search_board, player)).await {
            Ok(mv) => mv,
            Err(e) => {
                error!("AI 搜索任务失败: {}", e);
                self.backup_move(&board, player).map(|pos| Move::at(pos, player))
            }
        }
    }

    /// 选择着法并返回诊断信息
    pub fn analyze<R: Rng>(&self, board: &Board, player: Player, rng: &mut R) -> SearchReport {
        let started_at = Instant::now();
        let mut report = SearchReport::empty();

        if board.is_full() {
            return report;
        }

        let strategy = Strategy::for_config(&self.config);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.run_strategy(&strategy, board, player, rng, &mut report)
        }));

        let proposal = match outcome {
            Ok(proposal) => proposal,
            Err(_) => {
                warn!("AI 搜索出现异常，改用兜底着法");
                None
            }
        };

        let chosen = match proposal.filter(|(pos, _)| board.is_empty_at(*pos)) {
            Some(found) => Some(found),
            None => self
                .backup_move(board, player)
                .map(|pos| (pos, MoveProposer::Backup)),
        };

        report.elapsed = started_at.elapsed();
        if let Some((pos, proposer)) = chosen {
            let mv = Move::at(pos, player);
            info!(
                "AI {} 选择 {} (来源 {:?}, 深度 {}, 节点 {}, 耗时 {:?})",
                self.config.difficulty.display_name(),
                mv,
                proposer,
                report.depth_reached,
                report.nodes,
                report.elapsed
            );
            report.chosen = Some(mv);
            report.proposer = Some(proposer);
        }
        report
    }

    /// 依次询问提议者，第一个给出着法的生效
    fn run_strategy<R: Rng>(
        &self,
        strategy: &Strategy,
        board: &Board,
        player: Player,
        rng: &mut R,
        report: &mut SearchReport,
    ) -> Option<(Position, MoveProposer)> {
        let use_tactics = match strategy.tactics_rate {
            Some(rate) => rng.gen::<f64>() < rate,
            None => true,
        };

        for &proposer in &strategy.proposers {
            if proposer.is_tactical() && !use_tactics {
                continue;
            }
            if let Some(pos) = self.propose(proposer, board, player, rng, report) {
                debug!("{:?} 提议 {}", proposer, pos);
                return Some((pos, proposer));
            }
        }
        None
    }

    fn propose<R: Rng>(
        &self,
        proposer: MoveProposer,
        board: &Board,
        player: Player,
        rng: &mut R,
        report: &mut SearchReport,
    ) -> Option<Position> {
        let opponent = player.opponent();
        let win_condition = self.config.win_condition;

        match proposer {
            MoveProposer::ImmediateWin => find_winning_move(board, player, win_condition),
            MoveProposer::BlockWin => find_winning_move(board, opponent, win_condition),
            MoveProposer::MultiThreat => find_multiple_threat(board, player, &self.evaluator),
            MoveProposer::CriticalDefense => {
                find_critical_defense(board, opponent, &self.evaluator)
            }
            MoveProposer::PreventThreat => find_prevent_threat(board, opponent, &self.evaluator),
            MoveProposer::Evaluation => best_by_evaluation(board, player, &self.evaluator),
            MoveProposer::DeepSearch => {
                let deadline = Deadline::start(self.config.time_budget);
                let result = self.search(board, player, &deadline);
                report.depth_reached = result.depth;
                report.nodes = result.nodes;
                report.score = Some(result.score);
                result.best_move
            }
            MoveProposer::Random => board.empty_cells().choose(rng).copied(),
            MoveProposer::Backup => self.backup_move(board, player),
        }
    }

    /// 迭代加深搜索
    ///
    /// 每层开始前检查时间，已用超过预算 80% 不再加深；分数已分胜负时提前结束。
    /// 返回最后一次给出着法的迭代结果，nodes 为所有迭代的累计节点数。
    pub fn search<C: Clock>(
        &self,
        board: &Board,
        player: Player,
        deadline: &Deadline<C>,
    ) -> SearchResult {
        let mut best = SearchResult {
            score: 0,
            best_move: None,
            depth: 0,
            nodes: 0,
        };
        let mut nodes = 0;

        for depth in 1..=self.config.max_depth {
            if !deadline.allows_deepening() {
                debug!("时间不足，停止在深度 {}", depth - 1);
                break;
            }

            let result = self.alpha_beta(
                board,
                depth,
                -SCORE_INFINITY,
                SCORE_INFINITY,
                true,
                player,
                deadline,
            );
            nodes += result.nodes;
            debug!(
                "深度 {} 完成: 分数 {}, 着法 {:?}, 节点 {}",
                depth, result.score, result.best_move, result.nodes
            );

            if result.best_move.is_some() {
                best = result;
            }
            if result.score.abs() > FORCED_RESULT_THRESHOLD {
                break;
            }
        }

        best.nodes = nodes;
        best
    }

    /// Minimax + Alpha-Beta
    ///
    /// 分数始终站在 root 一方：maximizing 节点由 root 落子，否则由对方落子。
    /// 时间耗尽时返回静态评估。
    #[allow(clippy::too_many_arguments)]
    pub fn alpha_beta<C: Clock>(
        &self,
        board: &Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        root: Player,
        deadline: &Deadline<C>,
    ) -> SearchResult {
        if depth == 0 || deadline.is_exhausted() {
            return SearchResult::leaf(self.evaluator.evaluate_position(board, root));
        }

        let mover = if maximizing { root } else { root.opponent() };
        let candidates = ordered_candidates(board, mover, depth, self.config.win_condition);
        if candidates.is_empty() {
            return SearchResult {
                depth,
                ..SearchResult::leaf(0)
            };
        }

        let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move = None;
        let mut nodes = 1;

        for pos in candidates {
            let child = board.with_stone(pos, mover);
            if child.check_win(pos, mover, self.config.win_condition) {
                let score = if maximizing { win_score(depth) } else { -win_score(depth) };
                return SearchResult {
                    score,
                    best_move: Some(pos),
                    depth,
                    nodes: nodes + 1,
                };
            }

            let result =
                self.alpha_beta(&child, depth - 1, alpha, beta, !maximizing, root, deadline);
            nodes += result.nodes;

            if maximizing {
                if result.score > best_score {
                    best_score = result.score;
                    best_move = Some(pos);
                }
                alpha = alpha.max(result.score);
            } else {
                if result.score < best_score {
                    best_score = result.score;
                    best_move = Some(pos);
                }
                beta = beta.min(result.score);
            }

            if beta <= alpha || deadline.is_exhausted() {
                break;
            }
        }

        SearchResult {
            score: best_score,
            best_move,
            depth,
            nodes,
        }
    }

    /// 兜底着法：能赢就赢，能挡就挡，否则在前几个有意义空位里取单层评估最高者
    pub fn backup_move(&self, board: &Board, player: Player) -> Option<Position> {
        let win_condition = self.config.win_condition;
        if let Some(pos) = find_winning_move(board, player, win_condition) {
            return Some(pos);
        }
        if let Some(pos) = find_winning_move(board, player.opponent(), win_condition) {
            return Some(pos);
        }

        let mut cells = meaningful_cells(board);
        if cells.is_empty() {
            cells = board.empty_cells();
        }

        let mut best: Option<(Position, i32)> = None;
        for pos in cells.into_iter().take(BACKUP_CANDIDATES) {
            let score = self
                .evaluator
                .evaluate_position(&board.with_stone(pos, player), player);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((pos, score));
            }
        }
        best.map(|(pos, _)| pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Difficulty, EvaluationStyle};
    use crate::deadline::ManualClock;
    use gomoku_core::{Game, GameConfig, Notation};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn engine(difficulty: Difficulty, style: EvaluationStyle, win_condition: usize) -> AiEngine {
        AiEngine::new(SearchConfig::from_difficulty(difficulty, style, win_condition))
    }

    const ALL_STYLES: [EvaluationStyle; 3] = [
        EvaluationStyle::Offensive,
        EvaluationStyle::Defensive,
        EvaluationStyle::Balanced,
    ];

    fn full_window<C: Clock>(
        engine: &AiEngine,
        board: &Board,
        depth: u8,
        root: Player,
        deadline: &Deadline<C>,
    ) -> SearchResult {
        engine.alpha_beta(board, depth, -SCORE_INFINITY, SCORE_INFINITY, true, root, deadline)
    }

    /// 黑方落 (2,3) 后形成两端都空的三连，4 连即胜
    fn forced_win_board() -> Board {
        Notation::parse(
            "
            . . . . . . .
            O . . . . O .
            . . . . X X .
            X . . . . . O
            . . . . X . .
            . . . . . . .
            . . X O . . O
            ",
        )
        .unwrap()
    }

    #[test]
    fn test_search_empty_board() {
        let board = Board::new(15);
        for difficulty in [Difficulty::Medium, Difficulty::Hard] {
            let mv = engine(difficulty, EvaluationStyle::Balanced, 5)
                .select_move(&board, Player::Black)
                .unwrap();
            assert_eq!(mv.position(), Position::new(7, 7));
            assert_eq!(mv.player, Player::Black);
        }
    }

    #[test]
    fn test_full_board_has_no_move() {
        let board = Board::new(1).with_stone(Position::new(0, 0), Player::Black);
        let engine = engine(Difficulty::Hard, EvaluationStyle::Balanced, 5);
        assert_eq!(engine.select_move(&board, Player::White), None);
        assert_eq!(engine.backup_move(&board, Player::White), None);
    }

    #[test]
    fn test_hard_blocks_four() {
        let mut board = Board::new(15);
        for col in 4..8 {
            board.set(Position::new(7, col), Player::Black);
        }
        for (row, col) in [(7, 3), (8, 5), (6, 9)] {
            board.set(Position::new(row, col), Player::White);
        }

        let report = engine(Difficulty::Hard, EvaluationStyle::Balanced, 5).analyze(
            &board,
            Player::White,
            &mut ChaCha8Rng::seed_from_u64(7),
        );
        assert_eq!(report.chosen, Some(Move::new(7, 8, Player::White)));
        assert_eq!(report.proposer, Some(MoveProposer::BlockWin));
    }

    #[test]
    fn test_win_before_block() {
        let board = Notation::parse(
            "
            . . . . . . .
            X X X . . . .
            . . . . . . .
            O O O . . . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
            ",
        )
        .unwrap();
        for difficulty in [Difficulty::Medium, Difficulty::Hard] {
            for style in ALL_STYLES {
                let mv = engine(difficulty, style, 4)
                    .select_move(&board, Player::White)
                    .unwrap();
                assert_eq!(mv.position(), Position::new(3, 3));
            }
        }
    }

    #[test]
    fn test_offensive_multi_threat() {
        let board = Notation::parse(
            "
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . X X . . .
            . . . X . . . . .
            . . . X . . . . .
            . . . . . . . . .
            . . . . . . . . .
            . . . . . . . . .
            ",
        )
        .unwrap();
        let report = engine(Difficulty::Medium, EvaluationStyle::Offensive, 5).analyze(
            &board,
            Player::Black,
            &mut ChaCha8Rng::seed_from_u64(1),
        );
        assert_eq!(report.chosen.map(|mv| mv.position()), Some(Position::new(3, 3)));
        assert_eq!(report.proposer, Some(MoveProposer::MultiThreat));
    }

    #[test]
    fn test_alpha_beta_forced_win() {
        let board = forced_win_board();
        let engine = engine(Difficulty::Hard, EvaluationStyle::Balanced, 4);
        let clock = ManualClock::frozen();
        let deadline = Deadline::with_clock(&clock, Duration::from_millis(1000));

        let shallow = full_window(&engine, &board, 1, Player::Black, &deadline);
        assert!(shallow.score < FORCED_RESULT_THRESHOLD);

        let result = full_window(&engine, &board, 3, Player::Black, &deadline);
        assert_eq!(result.score, win_score(1));
        assert_eq!(result.best_move, Some(Position::new(2, 3)));
    }

    #[test]
    fn test_sooner_win_scores_higher() {
        let engine = engine(Difficulty::Hard, EvaluationStyle::Balanced, 4);
        let clock = ManualClock::frozen();
        let deadline = Deadline::with_clock(&clock, Duration::from_millis(1000));

        // 已经是两端都空的三连：下一手直接成四
        let board = forced_win_board().with_stone(Position::new(2, 3), Player::Black);
        let immediate = full_window(&engine, &board, 3, Player::Black, &deadline);
        assert_eq!(immediate.score, win_score(3));

        let delayed = full_window(&engine, &forced_win_board(), 3, Player::Black, &deadline);
        assert!(immediate.score > delayed.score);

        // 轮到白方时，黑方下一手成四：对白方来说越早输分数越低
        let losing = full_window(&engine, &board, 2, Player::White, &deadline);
        assert_eq!(losing.score, -win_score(1));
    }

    #[test]
    fn test_iterative_deepening_stops_on_forced_win() {
        let engine = engine(Difficulty::Hard, EvaluationStyle::Balanced, 4);
        let clock = ManualClock::frozen();
        let deadline = Deadline::with_clock(&clock, Duration::from_millis(1000));

        let result = engine.search(&forced_win_board(), Player::Black, &deadline);
        assert_eq!(result.depth, 3);
        assert_eq!(result.best_move, Some(Position::new(2, 3)));
        assert!(result.nodes > 0);
    }

    #[test]
    fn test_deadline_stops_deepening() {
        let engine = engine(Difficulty::Hard, EvaluationStyle::Balanced, 4);
        // 每次读时钟前进半个预算
        let clock = ManualClock::stepping(Duration::from_millis(500));
        let deadline = Deadline::with_clock(&clock, Duration::from_millis(1000));

        let result = engine.search(&forced_win_board(), Player::Black, &deadline);
        assert_eq!(result.depth, 1);
        assert!(result.best_move.is_some());
    }

    #[test]
    fn test_easy_seeded_is_reproducible() {
        let mut board = Board::new(15);
        board.set(Position::new(7, 7), Player::Black);
        let engine = engine(Difficulty::Easy, EvaluationStyle::Balanced, 5);

        let pick = |seed| {
            engine.select_move_with_rng(&board, Player::White, &mut ChaCha8Rng::seed_from_u64(seed))
        };
        let first = pick(42);
        let second = pick(42);
        assert_eq!(first, second);
        assert!(board.is_empty_at(first.unwrap().position()));
    }

    #[test]
    fn test_easy_tactics_draw() {
        let board = Notation::parse(
            "
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . X X X . . .
            . . . . . . .
            . . . . . . .
            . O . O . . .
            ",
        )
        .unwrap();
        let engine = engine(Difficulty::Easy, EvaluationStyle::Balanced, 4);

        // 首次取值 0.0，低于 0.3：检查必胜
        let report = engine.analyze(&board, Player::Black, &mut StepRng::new(0, 0));
        assert_eq!(report.proposer, Some(MoveProposer::ImmediateWin));
        assert_eq!(report.chosen, Some(Move::new(3, 0, Player::Black)));

        // 首次取值接近 1.0：跳过战术检查，随机落子
        let report = engine.analyze(&board, Player::Black, &mut StepRng::new(u64::MAX, 1));
        assert_eq!(report.proposer, Some(MoveProposer::Random));
        assert!(board.is_empty_at(report.chosen.unwrap().position()));
    }

    #[test]
    fn test_offensive_takes_critical_defense() {
        let board = Board::new(15)
            .with_stone(Position::new(4, 4), Player::Black)
            .with_stone(Position::new(4, 6), Player::White)
            .with_stone(Position::new(4, 7), Player::White)
            .with_stone(Position::new(4, 8), Player::White);

        let report = engine(Difficulty::Medium, EvaluationStyle::Offensive, 5).analyze(
            &board,
            Player::Black,
            &mut ChaCha8Rng::seed_from_u64(3),
        );
        assert_eq!(report.proposer, Some(MoveProposer::CriticalDefense));
        assert_eq!(report.chosen, Some(Move::new(4, 5, Player::Black)));
    }

    #[test]
    fn test_backup_move() {
        let engine = engine(Difficulty::Medium, EvaluationStyle::Balanced, 4);
        let board = Notation::parse(
            "
            . . . . .
            . X X X .
            . . . . .
            . . . . .
            . . . . .
            ",
        )
        .unwrap();
        // 白方无法取胜，必须挡
        assert_eq!(engine.backup_move(&board, Player::White), Some(Position::new(1, 0)));
        assert_eq!(engine.backup_move(&Board::new(5), Player::Black), Some(Position::new(2, 2)));
    }

    #[test]
    fn test_self_play_only_legal_moves() {
        let mut engines = vec![
            (engine(Difficulty::Easy, EvaluationStyle::Balanced, 5), 9),
            (engine(Difficulty::Medium, EvaluationStyle::Balanced, 5), 9),
        ];
        for style in ALL_STYLES {
            let config = SearchConfig {
                max_depth: 2,
                ..SearchConfig::from_difficulty(Difficulty::Hard, style, 4)
            };
            engines.push((AiEngine::new(config), 7));
        }

        for (engine, board_size) in engines {
            let win_condition = engine.config().win_condition;
            let mut game = Game::new(GameConfig {
                board_size,
                win_condition,
                ..GameConfig::default()
            });
            let mut rng = ChaCha8Rng::seed_from_u64(2024);

            while game.is_active() {
                let report = engine.analyze(game.board(), game.current_player(), &mut rng);
                let mv = report.chosen.unwrap();
                assert!(game.board().is_empty_at(mv.position()));
                assert_eq!(mv.player, game.current_player());
                assert!(game.try_make_move(mv.row, mv.col).is_ok());
            }
            assert!(game.outcome().is_terminal());
        }
    }

    #[tokio::test]
    async fn test_select_move_async() {
        let board = Board::new(15).with_stone(Position::new(7, 7), Player::Black);
        let engine = engine(Difficulty::Medium, EvaluationStyle::Defensive, 5);
        let mv = engine.select_move_async(board.clone(), Player::White).await.unwrap();
        assert!(board.is_empty_at(mv.position()));
        assert_eq!(mv.player, Player::White);
    }
}
