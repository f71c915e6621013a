//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Piece, Position, Side};
use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH, HOME_ROWS, SQUARE_COUNT};
use crate::moves::{Hop, Move};

/// 双方棋子统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PieceCounts {
    /// 白方棋子总数（含王）
    pub white: usize,
    /// 红方棋子总数（含王）
    pub red: usize,
    /// 白方王数
    pub white_kings: usize,
    /// 红方王数
    pub red_kings: usize,
}

impl PieceCounts {
    /// 指定阵营的棋子总数
    pub fn total(&self, side: Side) -> usize {
        match side {
            Side::White => self.white,
            Side::Red => self.red,
        }
    }

    /// 指定阵营的王数
    pub fn kings(&self, side: Side) -> usize {
        match side {
            Side::White => self.white_kings,
            Side::Red => self.red_kings,
        }
    }
}

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// 10x10 棋盘，索引为 row * 10 + col，使用 Vec 以支持 serde
    squares: Vec<Cell>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![Cell::Empty; SQUARE_COUNT],
        }
    }

    /// 创建初始棋盘
    ///
    /// 双方各 20 枚普通兵落在己方四行的深色格上：
    /// 红方第 0-3 行，白方第 6-9 行，中间两行为空。
    pub fn initial() -> Self {
        let mut board = Self::empty();

        for row in 0..HOME_ROWS as u8 {
            for col in 0..BOARD_WIDTH as u8 {
                let pos = Position::new_unchecked(row, col);
                if pos.is_playing_square() {
                    board.set(pos, Cell::Occupied(Piece::man(Side::Red)));
                }
            }
        }

        for row in (BOARD_HEIGHT - HOME_ROWS) as u8..BOARD_HEIGHT as u8 {
            for col in 0..BOARD_WIDTH as u8 {
                let pos = Position::new_unchecked(row, col);
                if pos.is_playing_square() {
                    board.set(pos, Cell::Occupied(Piece::man(Side::White)));
                }
            }
        }

        board
    }

    /// 获取指定位置的格子，越界返回 None
    pub fn get(&self, pos: Position) -> Option<Cell> {
        if pos.is_valid() {
            Some(self.squares[pos.to_index()])
        } else {
            None
        }
    }

    /// 设置指定位置的格子
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if pos.is_valid() {
            self.squares[pos.to_index()] = cell;
        }
    }

    /// 获取指定位置的在位棋子
    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.get(pos).and_then(|cell| cell.occupant())
    }

    /// 获取指定阵营的所有棋子位置（行主序）
    pub fn pieces(&self, side: Side) -> Vec<(Position, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.side == side)
            .collect()
    }

    /// 获取所有在位棋子（行主序）
    pub fn all_pieces(&self) -> Vec<(Position, Piece)> {
        let mut result = Vec::new();
        for index in 0..SQUARE_COUNT {
            if let Some(piece) = self.squares[index].occupant() {
                // from_index 对 0..SQUARE_COUNT 必然有效
                if let Some(pos) = Position::from_index(index) {
                    result.push((pos, piece));
                }
            }
        }
        result
    }

    /// 移除指定位置的棋子
    pub fn remove_piece(&mut self, pos: Position) {
        self.set(pos, Cell::Empty);
    }

    /// 将被跳过的棋子标记为待移除（连跳探索用）
    pub fn mark_pending(&mut self, pos: Position) {
        if let Some(piece) = self.piece_at(pos) {
            self.set(pos, Cell::PendingCapture(piece));
        }
    }

    /// 升王
    pub fn promote_to_king(&mut self, pos: Position) {
        if let Some(piece) = self.piece_at(pos) {
            self.set(pos, Cell::Occupied(Piece::king(piece.side)));
        }
    }

    /// 移动棋子（不检查规则），保留王标记
    pub fn move_piece(&mut self, from: Position, to: Position) {
        if let Some(piece) = self.piece_at(from) {
            self.set(from, Cell::Empty);
            self.set(to, Cell::Occupied(piece));
        }
    }

    /// 执行一跳：先移除被吃子，再移动棋子
    pub fn apply_hop(&mut self, hop: &Hop) {
        if let Some(takes) = hop.takes {
            self.remove_piece(takes);
        }
        self.move_piece(hop.from, hop.to);
    }

    /// 指定行是否为该阵营的底线（升王行）
    pub fn is_board_end(row: u8, side: Side) -> bool {
        row == side.promotion_row()
    }

    /// 若指定位置是到达底线的普通兵则升王，返回是否升王
    pub fn try_promote(&mut self, pos: Position) -> bool {
        match self.piece_at(pos) {
            Some(piece) if !piece.king && Self::is_board_end(pos.row, piece.side) => {
                self.promote_to_king(pos);
                true
            }
            _ => false,
        }
    }

    /// 完整执行一个走法（含整条跳跃链），返回是否升王
    pub fn apply_move(&mut self, mv: &Move) -> bool {
        for hop in mv.hops() {
            self.apply_hop(hop);
        }
        self.try_promote(mv.to())
    }

    /// 统计双方棋子
    pub fn counts(&self) -> PieceCounts {
        let mut counts = PieceCounts::default();
        for (_, piece) in self.all_pieces() {
            match piece.side {
                Side::White => {
                    counts.white += 1;
                    if piece.king {
                        counts.white_kings += 1;
                    }
                }
                Side::Red => {
                    counts.red += 1;
                    if piece.king {
                        counts.red_kings += 1;
                    }
                }
            }
        }
        counts
    }

    /// 对局是否仍可继续
    ///
    /// 任意一方无子，或双方各剩一王（公认和棋局面）时返回 false。
    pub fn playable(&self) -> bool {
        let counts = self.counts();
        if counts.white == 0 || counts.red == 0 {
            return false;
        }
        // 单王对单王，和棋
        if counts.white == 1
            && counts.red == 1
            && counts.white_kings == 1
            && counts.red_kings == 1
        {
            return false;
        }
        true
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}
