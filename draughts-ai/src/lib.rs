//! 国际跳棋 AI 引擎
//!
//! 包含:
//! - 棋局评估函数（启发式注册表加权求和）
//! - 启发式统计与威胁判定
//! - 棋形模式识别与连通块分析
//! - Minimax + Alpha-Beta 搜索

mod evaluate;
mod heuristics;
mod patterns;
mod search;

pub use evaluate::{EvalWeights, Evaluator, Score, LOSS_SCORE, WIN_SCORE};
pub use search::{
    AiConfig, AiEngine, Difficulty, ALPHA_START, BETA_START, DEFAULT_SEARCH_DEPTH,
};
