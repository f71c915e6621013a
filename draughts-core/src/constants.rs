//! 核心常量定义

/// 棋盘宽度（列数）
pub const BOARD_WIDTH: usize = 10;

/// 棋盘高度（行数）
pub const BOARD_HEIGHT: usize = 10;

/// 棋盘格子总数
pub const SQUARE_COUNT: usize = BOARD_WIDTH * BOARD_HEIGHT;

/// 每方初始棋子数
pub const PIECES_PER_SIDE: usize = 20;

/// 每方开局占据的行数
pub const HOME_ROWS: usize = 4;
