//! 棋子与格子定义

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH, SQUARE_COUNT};

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// 白方（先手，在下方，向上行进）
    White,
    /// 红方（后手，在上方，向下行进）
    Red,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::White => Side::Red,
            Side::Red => Side::White,
        }
    }

    /// 前进方向的行增量
    pub fn forward(&self) -> i8 {
        match self {
            Side::White => -1,
            Side::Red => 1,
        }
    }

    /// 升王行（对方底线）
    pub fn promotion_row(&self) -> u8 {
        match self {
            Side::White => 0,
            Side::Red => (BOARD_HEIGHT - 1) as u8,
        }
    }
}

/// 棋子（普通兵或王）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    pub king: bool,
}

impl Piece {
    /// 创建普通兵
    pub fn man(side: Side) -> Self {
        Self { side, king: false }
    }

    /// 创建王
    pub fn king(side: Side) -> Self {
        Self { side, king: true }
    }
}

/// 格子状态
///
/// 连跳探索过程中被跳过的棋子先进入 `PendingCapture` 状态，
/// 整条跳跃链结束后才真正移除。该状态只出现在走法生成内部的
/// 临时棋盘副本上，对局棋盘上不会出现。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// 空格
    Empty,
    /// 有棋子
    Occupied(Piece),
    /// 已被跳过、等待链末移除的棋子
    PendingCapture(Piece),
}

impl Cell {
    /// 是否为真正的空格
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// 是否可作为行进路径（空格或待移除棋子，飞王可穿越）
    pub fn is_vacant(&self) -> bool {
        matches!(self, Cell::Empty | Cell::PendingCapture(_))
    }

    /// 获取在位棋子（待移除棋子不算）
    pub fn occupant(&self) -> Option<Piece> {
        match self {
            Cell::Occupied(piece) => Some(*piece),
            _ => None,
        }
    }

    /// 是否为指定阵营的在位棋子
    pub fn is_side(&self, side: Side) -> bool {
        matches!(self.occupant(), Some(piece) if piece.side == side)
    }
}

/// 棋盘位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 行 (0-9)
    pub row: u8,
    /// 列 (0-9)
    pub col: u8,
}

impl Position {
    /// 创建新位置
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < BOARD_HEIGHT && (col as usize) < BOARD_WIDTH {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// 创建新位置（不检查边界，内部使用）
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// 检查位置是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.row as usize) < BOARD_HEIGHT && (self.col as usize) < BOARD_WIDTH
    }

    /// 是否为深色格（可落子格，行列和为奇数）
    pub fn is_playing_square(&self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    /// 获取偏移后的位置
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Position> {
        let new_row = self.row as i8 + dr;
        let new_col = self.col as i8 + dc;
        if new_row >= 0
            && (new_row as usize) < BOARD_HEIGHT
            && new_col >= 0
            && (new_col as usize) < BOARD_WIDTH
        {
            Some(Position {
                row: new_row as u8,
                col: new_col as u8,
            })
        } else {
            None
        }
    }

    /// 左上方向单步
    pub fn north_west(&self) -> Option<Position> {
        self.offset(-1, -1)
    }

    /// 右上方向单步
    pub fn north_east(&self) -> Option<Position> {
        self.offset(-1, 1)
    }

    /// 右下方向单步
    pub fn south_east(&self) -> Option<Position> {
        self.offset(1, 1)
    }

    /// 左下方向单步
    pub fn south_west(&self) -> Option<Position> {
        self.offset(1, -1)
    }

    /// 棋盘内的对角相邻位置（按左上、右上、右下、左下顺序）
    pub fn diagonal_neighbours(&self) -> Vec<Position> {
        [
            self.north_west(),
            self.north_east(),
            self.south_east(),
            self.south_west(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// 转换为数组索引
    pub fn to_index(&self) -> usize {
        self.row as usize * BOARD_WIDTH + self.col as usize
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < SQUARE_COUNT {
            Some(Position {
                row: (index / BOARD_WIDTH) as u8,
                col: (index % BOARD_WIDTH) as u8,
            })
        } else {
            None
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
