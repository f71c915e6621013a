//! 搜索引擎
//!
//! Minimax + Alpha-Beta 剪枝，白方极大、红方极小

use draughts_core::{Board, DraughtsError, Move, MoveGenerator, Side};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::evaluate::{EvalWeights, Evaluator, Score};

/// 默认搜索深度
pub const DEFAULT_SEARCH_DEPTH: u8 = 4;

/// Alpha 初始下界（整数下界，必败信号严格在窗口内部）
pub const ALPHA_START: Score = Score::MIN;

/// Beta 初始上界
pub const BETA_START: Score = Score::MAX;

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// AI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    pub max_depth: u8,
    /// 随机走子概率（Easy 难度故意下出缓手）
    pub random_move_chance: f32,
    /// 评估权重
    pub weights: EvalWeights,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                difficulty,
                max_depth: 2,
                random_move_chance: 0.3,
                weights: EvalWeights::default(),
            },
            Difficulty::Medium => Self {
                difficulty,
                max_depth: DEFAULT_SEARCH_DEPTH,
                random_move_chance: 0.0,
                weights: EvalWeights::default(),
            },
            Difficulty::Hard => Self {
                difficulty,
                max_depth: 6,
                random_move_chance: 0.0,
                weights: EvalWeights::default(),
            },
        }
    }

    /// 启动期配置校验
    pub fn validate(&self) -> draughts_core::Result<()> {
        if self.max_depth == 0 {
            return Err(DraughtsError::InvalidConfig {
                reason: "max_depth must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.random_move_chance) {
            return Err(DraughtsError::InvalidConfig {
                reason: format!("random_move_chance out of range: {}", self.random_move_chance),
            });
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Medium)
    }
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    evaluator: Evaluator,
    nodes_searched: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        let evaluator = Evaluator::with_weights(config.weights.clone());
        Self {
            config,
            evaluator,
            nodes_searched: 0,
        }
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty(difficulty))
    }

    /// 按配置搜索走法
    ///
    /// 无合法走法返回 None（调用方应在此之前做终局检查）；
    /// 唯一合法走法直接返回；Easy 难度按概率随机走子。
    pub fn search(&mut self, board: &Board, side: Side) -> Option<Move> {
        let moves = MoveGenerator::legal_moves(board, side);
        if moves.is_empty() {
            return None;
        }
        if moves.len() == 1 {
            return Some(moves[0].clone());
        }

        if self.config.random_move_chance > 0.0
            && rand::random::<f32>() < self.config.random_move_chance
        {
            let mut rng = rand::thread_rng();
            return moves.choose(&mut rng).cloned();
        }

        let best = self.best_move(board, side, self.config.max_depth);
        debug!(
            "搜索完成: depth={} nodes={} best={:?}",
            self.config.max_depth,
            self.nodes_searched,
            best.as_ref().map(|mv| mv.to_string())
        );
        best
    }

    /// 固定深度的确定性最佳走法
    pub fn best_move(&mut self, board: &Board, side: Side, depth: u8) -> Option<Move> {
        self.search_with_score(board, side, depth).1
    }

    /// 返回根节点分数与最佳走法
    pub fn search_with_score(
        &mut self,
        board: &Board,
        side: Side,
        depth: u8,
    ) -> (Score, Option<Move>) {
        self.nodes_searched = 0;
        self.minimax(depth, board, side, ALPHA_START, BETA_START)
    }

    /// 本次搜索访问的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    fn minimax(
        &mut self,
        depth: u8,
        board: &Board,
        side: Side,
        mut alpha: Score,
        mut beta: Score,
    ) -> (Score, Option<Move>) {
        self.nodes_searched += 1;

        if depth == 0 || !board.playable() {
            return (self.evaluator.evaluate(board), None);
        }

        // 走法按确定性生成顺序展开，同分保留先遇到的
        if side == Side::White {
            let mut value = Score::MIN;
            let mut best = None;
            for (mv, next) in Self::successors(board, side) {
                let (eval, _) = self.minimax(depth - 1, &next, Side::Red, alpha, beta);
                if best.is_none() || eval > value {
                    value = eval;
                    best = Some(mv);
                }
                alpha = alpha.max(eval);
                if eval >= beta {
                    return (value, best);
                }
            }
            (value, best)
        } else {
            let mut value = Score::MAX;
            let mut best = None;
            for (mv, next) in Self::successors(board, side) {
                let (eval, _) = self.minimax(depth - 1, &next, Side::White, alpha, beta);
                if best.is_none() || eval < value {
                    value = eval;
                    best = Some(mv);
                }
                beta = beta.min(eval);
                if eval <= alpha {
                    return (value, best);
                }
            }
            (value, best)
        }
    }

    /// 把每个合法走法物化为完整执行后的后继棋盘
    /// （整条连跳链逐跳重放，含链末升王）
    fn successors(board: &Board, side: Side) -> Vec<(Move, Board)> {
        MoveGenerator::legal_moves(board, side)
            .into_iter()
            .map(|mv| {
                let mut next = board.clone();
                next.apply_move(&mv);
                (mv, next)
            })
            .collect()
    }
}
