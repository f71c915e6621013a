//! 走法生成与强制吃子规则

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::cell::{Position, Side};

/// 四个对角方向（左上、右上、右下、左下）
const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, 1), (1, -1)];

/// 一跳：一次物理移动，吃子跳记录被吃子位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hop {
    /// 起始位置
    pub from: Position,
    /// 落点
    pub to: Position,
    /// 被吃的棋子位置（如果有）
    pub takes: Option<Position>,
}

/// 走法
///
/// 由依次执行的跳步组成，普通走子只有一跳；
/// 多跳走法的每一跳都是吃子跳。构造函数保证至少一跳。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    hops: Vec<Hop>,
}

impl Move {
    /// 创建普通走法
    pub fn step(from: Position, to: Position) -> Self {
        Self {
            hops: vec![Hop {
                from,
                to,
                takes: None,
            }],
        }
    }

    /// 创建单跳吃子走法
    pub fn capture(from: Position, to: Position, takes: Position) -> Self {
        Self {
            hops: vec![Hop {
                from,
                to,
                takes: Some(takes),
            }],
        }
    }

    /// 从跳步序列创建走法，序列不能为空
    pub fn from_hops(hops: Vec<Hop>) -> Self {
        debug_assert!(!hops.is_empty());
        Self { hops }
    }

    /// 在链尾追加一跳，生成新的走法
    pub(crate) fn extended(&self, hop: Hop) -> Self {
        let mut hops = self.hops.clone();
        hops.push(hop);
        Self { hops }
    }

    /// 跳步序列
    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    /// 起始位置
    pub fn from(&self) -> Position {
        self.hops[0].from
    }

    /// 最终落点
    pub fn to(&self) -> Position {
        self.hops[self.hops.len() - 1].to
    }

    /// 链深度：首跳为 0，之后每一跳加一
    pub fn depth(&self) -> usize {
        self.hops.len() - 1
    }

    /// 是否为吃子走法
    pub fn is_capture(&self) -> bool {
        self.hops[0].takes.is_some()
    }

    /// 是否吃掉指定位置的棋子
    pub fn captures(&self, pos: Position) -> bool {
        self.hops.iter().any(|hop| hop.takes == Some(pos))
    }

    /// 全部被吃子位置（按跳跃顺序）
    pub fn captured(&self) -> Vec<Position> {
        self.hops.iter().filter_map(|hop| hop.takes).collect()
    }

    /// 走法路径：起点后跟每一跳的落点，仅用于展示
    pub fn path(&self) -> Vec<Position> {
        let mut path = vec![self.from()];
        path.extend(self.hops.iter().map(|hop| hop.to));
        path
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from(), self.to())?;
        if self.is_capture() {
            write!(f, " (takes {})", self.captured().len())?;
        }
        Ok(())
    }
}

/// 走法类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// 不合法
    Invalid,
    /// 普通走子（含王的直线飞行）
    Step,
    /// 吃子跳跃，记录被吃子后方的落点
    Capture { landing: Position },
}

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 判定从 from 走向 to 属于哪类走法
    ///
    /// to 为空位（或待移除棋子）时是普通走子：兵只能向前，王不限方向；
    /// to 为相邻敌子且其正后方为空位时是吃子跳，兵只能向前吃。
    /// 调用方负责保证 to 位于 from 的对角线上。
    pub fn move_kind(board: &Board, from: Position, to: Position, side: Side) -> MoveKind {
        let Some(piece) = board.piece_at(from) else {
            return MoveKind::Invalid;
        };
        if piece.side != side {
            return MoveKind::Invalid;
        }
        let Some(target) = board.get(to) else {
            return MoveKind::Invalid;
        };

        // 普通走子：空位或待移除棋子均可通过
        if target.is_vacant() {
            let forward = match side {
                Side::White => to.row < from.row,
                Side::Red => to.row > from.row,
            };
            if forward || piece.king {
                return MoveKind::Step;
            }
            return MoveKind::Invalid;
        }

        // 吃子：目标必须是在位敌子，待移除棋子不可再吃
        let Some(victim) = target.occupant() else {
            return MoveKind::Invalid;
        };
        if victim.side == side {
            return MoveKind::Invalid;
        }

        let dr = (to.row as i8 - from.row as i8).signum();
        let dc = (to.col as i8 - from.col as i8).signum();
        if dr == 0 || dc == 0 {
            return MoveKind::Invalid;
        }
        // 兵只能向前吃
        if !piece.king && dr != side.forward() {
            return MoveKind::Invalid;
        }

        // 落点必须是真正的空格
        match to.offset(dr, dc) {
            Some(landing) if board.get(landing).is_some_and(|cell| cell.is_empty()) => {
                MoveKind::Capture { landing }
            }
            _ => MoveKind::Invalid,
        }
    }

    /// 生成指定棋子的全部候选走法（未过滤）
    ///
    /// 王沿四条对角线累积普通走法直到受阻，遇到可吃敌子时
    /// 发出吃子跳并递归探索后续连跳；兵检查对角相邻格。
    pub fn possible_moves(board: &Board, pos: Position, side: Side) -> Vec<Move> {
        let mut moves = Vec::new();
        let Some(piece) = board.piece_at(pos) else {
            return moves;
        };
        if piece.side != side {
            return moves;
        }

        if piece.king {
            for dir in DIAGONALS {
                Self::line_of_sight_moves(board, pos, dir, side, &mut moves);
            }
        } else {
            for neighbour in pos.diagonal_neighbours() {
                match Self::move_kind(board, pos, neighbour, side) {
                    MoveKind::Step => moves.push(Move::step(pos, neighbour)),
                    MoveKind::Capture { landing } => {
                        let mv = Move::capture(pos, landing, neighbour);
                        moves.push(mv.clone());
                        let next = Self::board_for_next_hop(board, pos, landing, neighbour);
                        moves.extend(Self::capture_chains(&next, landing, side, &mv));
                    }
                    MoveKind::Invalid => {}
                }
            }
        }
        moves
    }

    /// 递归探索连跳延续
    ///
    /// 在临时棋盘副本上将被吃子标记为待移除后继续搜索，
    /// 每条延续（含中途前缀）都作为独立候选返回，由深度过滤定夺。
    fn capture_chains(board: &Board, pos: Position, side: Side, prefix: &Move) -> Vec<Move> {
        let mut moves = Vec::new();
        let Some(piece) = board.piece_at(pos) else {
            return moves;
        };
        if piece.side != side {
            return moves;
        }

        if piece.king {
            for dir in DIAGONALS {
                Self::line_of_sight_captures(board, pos, dir, side, prefix, &mut moves);
            }
        } else {
            for neighbour in pos.diagonal_neighbours() {
                if let MoveKind::Capture { landing } =
                    Self::move_kind(board, pos, neighbour, side)
                {
                    let mv = prefix.extended(Hop {
                        from: pos,
                        to: landing,
                        takes: Some(neighbour),
                    });
                    moves.push(mv.clone());
                    let next = Self::board_for_next_hop(board, pos, landing, neighbour);
                    moves.extend(Self::capture_chains(&next, landing, side, &mv));
                }
            }
        }
        moves
    }

    /// 王的直线走法：沿射线累积空位走法，止于第一个棋子；
    /// 若该棋子可吃则发出吃子跳并递归连跳探索
    fn line_of_sight_moves(
        board: &Board,
        pos: Position,
        (dr, dc): (i8, i8),
        side: Side,
        moves: &mut Vec<Move>,
    ) {
        let mut current = pos;
        while let Some(next) = current.offset(dr, dc) {
            match Self::move_kind(board, pos, next, side) {
                MoveKind::Step => {
                    moves.push(Move::step(pos, next));
                    current = next;
                }
                MoveKind::Capture { landing } => {
                    let mv = Move::capture(pos, landing, next);
                    moves.push(mv.clone());
                    let next_board = Self::board_for_next_hop(board, pos, landing, next);
                    moves.extend(Self::capture_chains(&next_board, landing, side, &mv));
                    return;
                }
                MoveKind::Invalid => return,
            }
        }
    }

    /// 王在连跳中的延续：滑过空位寻找下一个可吃敌子，不产生普通走法
    fn line_of_sight_captures(
        board: &Board,
        pos: Position,
        (dr, dc): (i8, i8),
        side: Side,
        prefix: &Move,
        moves: &mut Vec<Move>,
    ) {
        let mut current = pos;
        while let Some(next) = current.offset(dr, dc) {
            match Self::move_kind(board, pos, next, side) {
                MoveKind::Step => {
                    current = next;
                }
                MoveKind::Capture { landing } => {
                    let mv = prefix.extended(Hop {
                        from: pos,
                        to: landing,
                        takes: Some(next),
                    });
                    moves.push(mv.clone());
                    let next_board = Self::board_for_next_hop(board, pos, landing, next);
                    moves.extend(Self::capture_chains(&next_board, landing, side, &mv));
                    return;
                }
                MoveKind::Invalid => return,
            }
        }
    }

    /// 为下一跳准备棋盘副本：标记被吃子并移动跳跃棋子
    fn board_for_next_hop(board: &Board, from: Position, to: Position, taken: Position) -> Board {
        let mut next = board.clone();
        next.mark_pending(taken);
        next.move_piece(from, to);
        next
    }

    /// 强制吃子过滤
    ///
    /// 两段全局过滤：存在吃子走法时淘汰所有非吃子走法，
    /// 再在吃子走法中只保留链深度最大的（最长链强制）。
    pub fn filter_moves(moves: Vec<Move>) -> Vec<Move> {
        let any_capture = moves.iter().any(|mv| mv.is_capture());
        let mut filtered: Vec<Move> = if any_capture {
            moves.into_iter().filter(|mv| mv.is_capture()).collect()
        } else {
            return moves;
        };
        let max_depth = filtered.iter().map(|mv| mv.depth()).max().unwrap_or(0);
        filtered.retain(|mv| mv.depth() == max_depth);
        filtered
    }

    /// 生成指定阵营的全部合法走法
    ///
    /// 强制吃子规则作用于整个回合，必须在所有棋子的
    /// 候选走法合集上统一过滤，而不是逐子过滤。
    pub fn legal_moves(board: &Board, side: Side) -> Vec<Move> {
        let mut all = Vec::new();
        for (pos, _) in board.pieces(side) {
            all.extend(Self::possible_moves(board, pos, side));
        }
        Self::filter_moves(all)
    }

    /// 指定棋子的合法走法：全局过滤后限定起点
    ///
    /// 当别的棋子握有更长的吃子链时，该棋子没有合法走法。
    pub fn legal_moves_for_piece(board: &Board, pos: Position, side: Side) -> Vec<Move> {
        Self::legal_moves(board, side)
            .into_iter()
            .filter(|mv| mv.from() == pos)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Cell, Piece};

    fn place(board: &mut Board, row: u8, col: u8, piece: Piece) {
        board.set(Position::new_unchecked(row, col), Cell::Occupied(piece));
    }

    #[test]
    fn test_opening_moves_are_steps() {
        // 开局只有普通走法，深度全为 0
        let board = Board::initial();
        let moves = MoveGenerator::legal_moves(&board, Side::White);

        // 第 6 行五枚前排兵：边上的一枚只有一个方向
        assert_eq!(moves.len(), 9);
        for mv in &moves {
            assert!(!mv.is_capture());
            assert_eq!(mv.depth(), 0);
            assert_eq!(mv.from().row, 6);
            assert_eq!(mv.to().row, 5);
        }

        // 红方对称
        let moves = MoveGenerator::legal_moves(&board, Side::Red);
        assert_eq!(moves.len(), 9);
    }

    #[test]
    fn test_man_step_forward_only() {
        let mut board = Board::empty();
        place(&mut board, 5, 4, Piece::man(Side::White));

        let moves = MoveGenerator::legal_moves(&board, Side::White);

        // 只能向上走两个对角
        assert_eq!(moves.len(), 2);
        for mv in &moves {
            assert_eq!(mv.to().row, 4);
        }
    }

    #[test]
    fn test_move_kind_classification() {
        let mut board = Board::empty();
        place(&mut board, 5, 4, Piece::man(Side::White));
        place(&mut board, 4, 3, Piece::man(Side::Red));

        let from = Position::new_unchecked(5, 4);

        // 向前空位是普通走法
        assert_eq!(
            MoveGenerator::move_kind(&board, from, Position::new_unchecked(4, 5), Side::White),
            MoveKind::Step
        );
        // 向后空位对兵不合法
        assert_eq!(
            MoveGenerator::move_kind(&board, from, Position::new_unchecked(6, 5), Side::White),
            MoveKind::Invalid
        );
        // 相邻敌子且落点为空是吃子跳
        assert_eq!(
            MoveGenerator::move_kind(&board, from, Position::new_unchecked(4, 3), Side::White),
            MoveKind::Capture {
                landing: Position::new_unchecked(3, 2)
            }
        );
        // 空起点或他方棋子不合法
        assert_eq!(
            MoveGenerator::move_kind(&board, Position::new_unchecked(7, 2), from, Side::White),
            MoveKind::Invalid
        );
        assert_eq!(
            MoveGenerator::move_kind(&board, from, Position::new_unchecked(4, 3), Side::Red),
            MoveKind::Invalid
        );
    }

    #[test]
    fn test_mandatory_capture() {
        // 有吃必吃：其他棋子的普通走法被全部淘汰
        let mut board = Board::empty();
        place(&mut board, 5, 4, Piece::man(Side::White));
        place(&mut board, 4, 3, Piece::man(Side::Red));
        place(&mut board, 8, 7, Piece::man(Side::White));

        let moves = MoveGenerator::legal_moves(&board, Side::White);

        assert_eq!(moves.len(), 1);
        let mv = &moves[0];
        assert!(mv.is_capture());
        assert_eq!(mv.from(), Position::new_unchecked(5, 4));
        assert_eq!(mv.to(), Position::new_unchecked(3, 2));
        assert!(mv.captures(Position::new_unchecked(4, 3)));
    }

    #[test]
    fn test_man_cannot_capture_backward() {
        let mut board = Board::empty();
        place(&mut board, 4, 3, Piece::man(Side::White));
        place(&mut board, 5, 4, Piece::man(Side::Red));

        // (6, 5) 为空，但兵不能向后吃
        let moves = MoveGenerator::legal_moves(&board, Side::White);
        assert!(moves.iter().all(|mv| !mv.is_capture()));
    }

    #[test]
    fn test_capture_chain() {
        // 两段连跳：(7,2) -> (5,4) -> (3,6)
        let mut board = Board::empty();
        place(&mut board, 7, 2, Piece::man(Side::White));
        place(&mut board, 6, 3, Piece::man(Side::Red));
        place(&mut board, 4, 5, Piece::man(Side::Red));

        let moves = MoveGenerator::legal_moves(&board, Side::White);

        // 深度过滤后只剩完整链
        assert_eq!(moves.len(), 1);
        let mv = &moves[0];
        assert_eq!(mv.depth(), 1);
        assert_eq!(mv.hops().len(), 2);
        assert_eq!(
            mv.path(),
            vec![
                Position::new_unchecked(7, 2),
                Position::new_unchecked(5, 4),
                Position::new_unchecked(3, 6),
            ]
        );
        assert_eq!(
            mv.captured(),
            vec![Position::new_unchecked(6, 3), Position::new_unchecked(4, 5)]
        );
    }

    #[test]
    fn test_longest_chain_mandatory() {
        // 一条单跳、一条双跳，只保留双跳
        let mut board = Board::empty();
        place(&mut board, 7, 2, Piece::man(Side::White));
        place(&mut board, 6, 3, Piece::man(Side::Red));
        place(&mut board, 4, 5, Piece::man(Side::Red));
        place(&mut board, 6, 1, Piece::man(Side::Red));

        let moves = MoveGenerator::legal_moves(&board, Side::White);

        assert!(!moves.is_empty());
        for mv in &moves {
            assert_eq!(mv.depth(), 1, "短链应被淘汰: {}", mv);
        }
    }

    #[test]
    fn test_chain_cannot_recapture() {
        // 被跳过的棋子标记为待移除，不能在同一条链里再次被吃
        let mut board = Board::empty();
        place(&mut board, 5, 2, Piece::king(Side::White));
        place(&mut board, 4, 3, Piece::man(Side::Red));
        place(&mut board, 2, 3, Piece::man(Side::Red));

        let moves = MoveGenerator::legal_moves(&board, Side::White);

        // 每条链中同一棋子至多被吃一次
        for mv in &moves {
            let mut captured = mv.captured();
            captured.sort_by_key(|pos| pos.to_index());
            captured.dedup();
            assert_eq!(captured.len(), mv.captured().len(), "重复吃子: {}", mv);
        }
    }

    #[test]
    fn test_king_line_of_sight_moves() {
        // 空盘中心的王有 17 个普通走法
        let mut board = Board::empty();
        place(&mut board, 5, 4, Piece::king(Side::White));

        let moves = MoveGenerator::legal_moves(&board, Side::White);
        assert_eq!(moves.len(), 17);
    }

    #[test]
    fn test_king_blocked_by_own_piece() {
        let mut board = Board::empty();
        place(&mut board, 5, 4, Piece::king(Side::White));
        place(&mut board, 3, 2, Piece::man(Side::White));

        let moves = MoveGenerator::legal_moves(&board, Side::White);

        // 左上方向只能走一格，己方棋子的走法另计
        let king_moves: Vec<_> = moves
            .iter()
            .filter(|mv| mv.from() == Position::new_unchecked(5, 4))
            .collect();
        assert_eq!(king_moves.len(), 14);
    }

    #[test]
    fn test_king_distant_capture() {
        // 飞王远距离吃子，落点在被吃子正后方
        let mut board = Board::empty();
        place(&mut board, 9, 0, Piece::king(Side::White));
        place(&mut board, 5, 4, Piece::man(Side::Red));

        let moves = MoveGenerator::legal_moves(&board, Side::White);

        assert_eq!(moves.len(), 1);
        let mv = &moves[0];
        assert!(mv.captures(Position::new_unchecked(5, 4)));
        assert_eq!(mv.to(), Position::new_unchecked(4, 5));
    }

    #[test]
    fn test_king_cannot_capture_through_blocker() {
        // 射线上先遇到己方棋子，后面的敌子吃不到
        let mut board = Board::empty();
        place(&mut board, 9, 0, Piece::king(Side::White));
        place(&mut board, 7, 2, Piece::man(Side::White));
        place(&mut board, 5, 4, Piece::man(Side::Red));

        let king_moves =
            MoveGenerator::possible_moves(&board, Position::new_unchecked(9, 0), Side::White);
        assert!(king_moves.iter().all(|mv| !mv.is_capture()));
    }

    #[test]
    fn test_king_capture_needs_empty_landing() {
        let mut board = Board::empty();
        place(&mut board, 9, 0, Piece::king(Side::White));
        place(&mut board, 5, 4, Piece::man(Side::Red));
        place(&mut board, 4, 5, Piece::man(Side::Red));

        let moves = MoveGenerator::legal_moves(&board, Side::White);
        assert!(moves.iter().all(|mv| !mv.is_capture()));
    }

    #[test]
    fn test_king_flies_over_pending_capture() {
        // 待移除棋子不阻挡飞王的视线
        let mut board = Board::empty();
        place(&mut board, 8, 1, Piece::king(Side::White));
        board.set(
            Position::new_unchecked(6, 3),
            Cell::PendingCapture(Piece::man(Side::Red)),
        );
        place(&mut board, 4, 5, Piece::man(Side::Red));

        let moves =
            MoveGenerator::possible_moves(&board, Position::new_unchecked(8, 1), Side::White);
        let capture = moves.iter().find(|mv| mv.is_capture());
        assert!(capture.is_some(), "飞王应能穿越待移除棋子");
        assert!(capture.unwrap().captures(Position::new_unchecked(4, 5)));
    }

    #[test]
    fn test_empty_square_yields_no_moves() {
        let board = Board::initial();
        // 空格和他方棋子都返回空列表而不是错误
        assert!(MoveGenerator::possible_moves(
            &board,
            Position::new_unchecked(5, 4),
            Side::White
        )
        .is_empty());
        assert!(MoveGenerator::possible_moves(
            &board,
            Position::new_unchecked(0, 1),
            Side::White
        )
        .is_empty());
    }

    #[test]
    fn test_legal_moves_for_piece_global_filter() {
        // 强制吃子全局生效：没有吃子链的棋子没有合法走法
        let mut board = Board::empty();
        place(&mut board, 5, 4, Piece::man(Side::White));
        place(&mut board, 4, 3, Piece::man(Side::Red));
        place(&mut board, 8, 7, Piece::man(Side::White));

        let other = MoveGenerator::legal_moves_for_piece(
            &board,
            Position::new_unchecked(8, 7),
            Side::White,
        );
        assert!(other.is_empty());

        let capturer = MoveGenerator::legal_moves_for_piece(
            &board,
            Position::new_unchecked(5, 4),
            Side::White,
        );
        assert_eq!(capturer.len(), 1);
        assert!(capturer[0].is_capture());
    }

    #[test]
    fn test_filter_moves_no_captures_keeps_all() {
        let a = Move::step(Position::new_unchecked(6, 1), Position::new_unchecked(5, 0));
        let b = Move::step(Position::new_unchecked(6, 3), Position::new_unchecked(5, 2));
        let filtered = MoveGenerator::filter_moves(vec![a.clone(), b.clone()]);
        assert_eq!(filtered, vec![a, b]);
    }

    #[test]
    fn test_legal_moves_replay_consistency() {
        // 每个合法走法的跳步链首尾相接，且重新判定不为 Invalid
        let mut board = Board::empty();
        place(&mut board, 7, 2, Piece::man(Side::White));
        place(&mut board, 6, 3, Piece::man(Side::Red));
        place(&mut board, 4, 5, Piece::man(Side::Red));
        place(&mut board, 6, 7, Piece::man(Side::White));

        for mv in MoveGenerator::legal_moves(&board, Side::White) {
            let hops = mv.hops();
            assert_eq!(hops[0].from, mv.from());
            for pair in hops.windows(2) {
                assert_eq!(pair[0].to, pair[1].from);
            }
            assert_ne!(
                MoveGenerator::move_kind(&board, mv.from(), mv.hops()[0].to, Side::White),
                MoveKind::Invalid
            );
        }
    }
}
