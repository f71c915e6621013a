//! 国际跳棋核心规则库（10x10，飞王，强制连跳）
//!
//! 包含:
//! - 棋子、棋盘、坐标等核心数据结构
//! - 走法生成、连跳探索与强制吃子规则
//! - 对局回合状态机

mod board;
mod cell;
mod constants;
mod error;
mod game;
mod moves;

pub use board::{Board, PieceCounts};
pub use cell::{Cell, Piece, Position, Side};
pub use constants::*;
pub use error::{DraughtsError, Result};
pub use game::{Game, GameState};
pub use moves::{Hop, Move, MoveGenerator, MoveKind};
