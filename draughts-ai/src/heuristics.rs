//! 局面启发式统计
//!
//! 每个计数函数独立扫描棋盘，返回 (白方, 红方) 计数对，
//! 由评估器按权重加权求和。

use draughts_core::{Board, Position, Side};

use crate::evaluate::Score;

/// 四个对角方向（左上、右上、右下、左下）
const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, 1), (1, -1)];

/// 白方黄金格（中心要点）
pub const GOLDEN_SQUARE_WHITE: Position = Position::new_unchecked(5, 4);
/// 红方黄金格
pub const GOLDEN_SQUARE_RED: Position = Position::new_unchecked(4, 5);

/// 己方棋子占据己方黄金格的计数
pub fn golden_square_count(board: &Board) -> (Score, Score) {
    let white = board
        .piece_at(GOLDEN_SQUARE_WHITE)
        .is_some_and(|piece| piece.side == Side::White) as Score;
    let red = board
        .piece_at(GOLDEN_SQUARE_RED)
        .is_some_and(|piece| piece.side == Side::Red) as Score;
    (white, red)
}

/// 中央区域（中间两行去掉两侧通道）的棋子计数
pub fn middle_box_count(board: &Board) -> (Score, Score) {
    region_count(board, 4..=5, 2..=7)
}

/// 中间两行两侧通道的棋子计数
pub fn middle_flank_count(board: &Board) -> (Score, Score) {
    let (white_left, red_left) = region_count(board, 4..=5, 0..=1);
    let (white_right, red_right) = region_count(board, 4..=5, 8..=9);
    (white_left + white_right, red_left + red_right)
}

/// 边列（第 0 列与第 9 列）的棋子计数
pub fn side_column_count(board: &Board) -> (Score, Score) {
    let (white_left, red_left) = region_count(board, 0..=9, 0..=0);
    let (white_right, red_right) = region_count(board, 0..=9, 9..=9);
    (white_left + white_right, red_left + red_right)
}

/// 指定行列区域内的双方棋子计数
fn region_count(
    board: &Board,
    rows: std::ops::RangeInclusive<u8>,
    cols: std::ops::RangeInclusive<u8>,
) -> (Score, Score) {
    let mut white = 0;
    let mut red = 0;
    for row in rows {
        for col in cols.clone() {
            match board.piece_at(Position::new_unchecked(row, col)) {
                Some(piece) if piece.side == Side::White => white += 1,
                Some(_) => red += 1,
                None => {}
            }
        }
    }
    (white, red)
}

/// 受保护棋子计数
pub fn protection_count(board: &Board) -> (Score, Score) {
    let mut white = 0;
    let mut red = 0;
    for (pos, piece) in board.all_pieces() {
        if is_protected(board, pos, piece.side) {
            match piece.side {
                Side::White => white += 1,
                Side::Red => red += 1,
            }
        }
    }
    (white, red)
}

/// 棋子是否受保护：贴边或有同色对角邻居
pub fn is_protected(board: &Board, pos: Position, side: Side) -> bool {
    if pos.col == 0 || pos.col == 9 || pos.row == 0 || pos.row == 9 {
        return true;
    }
    pos.diagonal_neighbours()
        .into_iter()
        .any(|neighbour| board.get(neighbour).is_some_and(|cell| cell.is_side(side)))
}

/// 动弹不得的棋子计数（只看相邻空位，不含吃子跳）
pub fn stuck_count(board: &Board) -> (Score, Score) {
    let mut white = 0;
    let mut red = 0;
    for (pos, piece) in board.all_pieces() {
        let stuck = if piece.king {
            // 王需要四个对角方向全部受阻
            DIAGONALS
                .iter()
                .all(|&(dr, dc)| !is_open(board, pos, dr, dc))
        } else {
            let forward = piece.side.forward();
            !is_open(board, pos, forward, -1) && !is_open(board, pos, forward, 1)
        };
        if stuck {
            match piece.side {
                Side::White => white += 1,
                Side::Red => red += 1,
            }
        }
    }
    (white, red)
}

/// 指定方向的相邻格是否为盘内空位
fn is_open(board: &Board, pos: Position, dr: i8, dc: i8) -> bool {
    pos.offset(dr, dc)
        .and_then(|next| board.get(next))
        .is_some_and(|cell| cell.is_empty())
}

/// 棋子当前是否会被对方吃掉
///
/// 对每个方向检查：正后方落点为空，且该方向上第一个棋子
/// 是能完成这次跳跃的敌子（相邻的向前吃的兵，或任意距离的飞王）。
pub fn is_capturable(board: &Board, pos: Position) -> bool {
    let Some(victim) = board.piece_at(pos) else {
        return false;
    };
    let enemy = victim.side.opponent();

    for (dr, dc) in DIAGONALS {
        let Some(landing) = pos.offset(-dr, -dc) else {
            continue;
        };
        if !board
            .get(landing)
            .is_some_and(|cell| cell.is_empty())
        {
            continue;
        }

        // 沿攻击方向找第一个棋子
        let mut current = pos;
        let mut distance = 0;
        while let Some(next) = current.offset(dr, dc) {
            distance += 1;
            let Some(cell) = board.get(next) else {
                break;
            };
            if cell.is_empty() {
                current = next;
                continue;
            }
            if let Some(attacker) = cell.occupant() {
                if attacker.side == enemy {
                    // 飞王任意距离可吃；兵必须相邻且向前吃
                    if attacker.king || (distance == 1 && -dr == enemy.forward()) {
                        return true;
                    }
                }
            }
            break;
        }
    }
    false
}
