//! 棋局评估函数
//!
//! 把棋盘映射为单个带符号分数（白方视角，正值利白）。
//! 分数由一组互相独立的启发式计数按可配置权重加权求和，
//! 外加一项双方走法潜力差。

use serde::{Deserialize, Serialize};

use draughts_core::{Board, Move, MoveGenerator, Side};

use crate::heuristics;
use crate::patterns;

/// 评估分数
pub type Score = i64;

/// 必胜信号，严格位于搜索窗口内部
pub const WIN_SCORE: Score = i32::MAX as Score;
/// 必败信号
pub const LOSS_SCORE: Score = i32::MIN as Score;

/// 评估权重配置（全部可调）
///
/// 默认值复现参考实现的相对量级：
/// 子力 > 王加成 > 连跳奖励 > 棋形奖励 > 位置奖励。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalWeights {
    /// 每枚棋子的子力分
    pub man: Score,
    /// 王的额外子力分
    pub king: Score,
    /// 黄金格占据
    pub golden_square: Score,
    /// 中央区域占据
    pub middle_box: Score,
    /// 中间两行侧翼占据
    pub middle_flank: Score,
    /// 边列占据
    pub side_column: Score,
    /// 受保护棋子
    pub protection: Score,
    /// 被困棋子（负值）
    pub stuck: Score,
    /// 满方阵棋形
    pub full_square: Score,
    /// 半方阵棋形
    pub half_square: Score,
    /// 满门形棋形
    pub full_gate: Score,
    /// 半门形棋形
    pub half_gate: Score,
    /// 钳形棋形
    pub pincer: Score,
    /// 最大连通块规模
    pub cluster: Score,
    /// 走法潜力项整体权重
    pub move_potential: Score,
    /// 走法：把棋子从威胁下救出
    pub saving_move: Score,
    /// 走法：落点受保护
    pub protecting_move: Score,
    /// 走法：抵达升王行
    pub kinging_move: Score,
    /// 走法：直接取胜
    pub winning_move: Score,
    /// 走法：连跳基础奖励（再按深度递增）
    pub chain_move: Score,
    /// 走法：落点暴露在威胁下（负值）
    pub exposed_move: Score,
    /// 走法：放弃受保护的位置（负值）
    pub abandon_move: Score,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            man: 2,
            king: 15,
            golden_square: 3,
            middle_box: 3,
            middle_flank: 2,
            side_column: 1,
            protection: 4,
            stuck: -1,
            full_square: 5,
            half_square: 3,
            full_gate: 2,
            half_gate: 1,
            pincer: 2,
            cluster: 1,
            move_potential: 2,
            saving_move: 14,
            protecting_move: 16,
            kinging_move: 20,
            winning_move: 1000,
            chain_move: 50,
            exposed_move: -99,
            abandon_move: -15,
        }
    }
}

/// 启发式计数函数：返回 (白方, 红方) 计数对
type Heuristic = fn(&Board) -> (Score, Score);

/// 评估器
pub struct Evaluator {
    weights: EvalWeights,
}

impl Evaluator {
    /// 使用默认权重创建评估器
    pub fn new() -> Self {
        Self::with_weights(EvalWeights::default())
    }

    /// 使用自定义权重创建评估器
    pub fn with_weights(weights: EvalWeights) -> Self {
        Self { weights }
    }

    /// 当前权重
    pub fn weights(&self) -> &EvalWeights {
        &self.weights
    }

    /// 评估局面
    ///
    /// 一方无子或无合法走法时返回必胜/必败信号，压倒其余所有项。
    /// 纯函数：内部只在临时副本上推演，不修改传入棋盘。
    pub fn evaluate(&self, board: &Board) -> Score {
        let counts = board.counts();
        if counts.white == 0 {
            return LOSS_SCORE;
        }
        if counts.red == 0 {
            return WIN_SCORE;
        }

        // 双方走法只生成一次：困毙判定与走法潜力共用
        let white_moves = MoveGenerator::legal_moves(board, Side::White);
        let red_moves = MoveGenerator::legal_moves(board, Side::Red);
        if white_moves.is_empty() {
            return LOSS_SCORE;
        }
        if red_moves.is_empty() {
            return WIN_SCORE;
        }

        // 子力：王同时计入总数，再拿额外加成
        let mut score = (counts.white as Score - counts.red as Score) * self.weights.man
            + (counts.white_kings as Score - counts.red_kings as Score) * self.weights.king;

        for (heuristic, weight) in self.term_table() {
            let (white, red) = heuristic(board);
            score += (white - red) * weight;
        }

        score + self.move_potential(board, &white_moves, &red_moves)
    }

    /// 启发式注册表：独立计数函数与对应权重
    fn term_table(&self) -> [(Heuristic, Score); 12] {
        let w = &self.weights;
        [
            (heuristics::golden_square_count, w.golden_square),
            (heuristics::middle_box_count, w.middle_box),
            (heuristics::middle_flank_count, w.middle_flank),
            (heuristics::side_column_count, w.side_column),
            (heuristics::protection_count, w.protection),
            (heuristics::stuck_count, w.stuck),
            (patterns::full_square_count, w.full_square),
            (patterns::half_square_count, w.half_square),
            (patterns::full_gate_count, w.full_gate),
            (patterns::half_gate_count, w.half_gate),
            (patterns::pincer_count, w.pincer),
            (patterns::largest_cluster, w.cluster),
        ]
    }

    /// 走法潜力：双方各取最佳单步走法分，差值加权计入总分
    fn move_potential(&self, board: &Board, white_moves: &[Move], red_moves: &[Move]) -> Score {
        let white = self.best_move_weight(board, white_moves, Side::White);
        let red = self.best_move_weight(board, red_moves, Side::Red);
        (white - red) * self.weights.move_potential
    }

    fn best_move_weight(&self, board: &Board, moves: &[Move], side: Side) -> Score {
        moves
            .iter()
            .map(|mv| self.move_weight(board, mv, side))
            .fold(0, Score::max)
    }

    /// 单个走法的潜力分
    fn move_weight(&self, board: &Board, mv: &Move, side: Side) -> Score {
        let w = &self.weights;
        let was_capturable = heuristics::is_capturable(board, mv.from());
        let was_protected = heuristics::is_protected(board, mv.from(), side);
        let kinging = board.piece_at(mv.from()).is_some_and(|piece| !piece.king)
            && mv.to().row == side.promotion_row();

        // 在副本上走完整条链再审视局面
        let mut after = board.clone();
        after.apply_move(mv);
        let now_capturable = heuristics::is_capturable(&after, mv.to());
        let now_protected = heuristics::is_protected(&after, mv.to(), side);

        let mut weight = 0;
        if was_capturable && !now_capturable {
            weight += w.saving_move;
        }
        if now_protected {
            weight += w.protecting_move;
        }
        if kinging {
            weight += w.kinging_move;
        }
        if self.wins_game(&after, side) {
            weight += w.winning_move;
        }
        if mv.depth() > 0 {
            weight += w.chain_move + mv.depth() as Score + 1;
        }
        if now_capturable {
            weight += w.exposed_move;
        }
        if was_protected && !now_protected {
            weight += w.abandon_move;
        }
        weight
    }

    /// 走完后对方是否已经输掉（无子或无子可动）
    fn wins_game(&self, board: &Board, side: Side) -> bool {
        let opponent = side.opponent();
        board.counts().total(opponent) == 0
            || MoveGenerator::legal_moves(board, opponent).is_empty()
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
