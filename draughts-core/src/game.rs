//! 对局控制
//!
//! 回合状态机、强制吃子检查、供动画使用的棋盘快照队列

use std::collections::VecDeque;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::{Board, PieceCounts};
use crate::cell::{Position, Side};
use crate::error::{DraughtsError, Result};
use crate::moves::{Move, MoveGenerator};

/// 对局状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// 进行中
    Running,
    /// 白方胜
    WhiteWins,
    /// 红方胜
    RedWins,
    /// 和棋
    Draw,
}

/// 对局
#[derive(Debug)]
pub struct Game {
    /// 当前棋盘
    board: Board,
    /// 当前走子方
    current_turn: Side,
    /// 回合计数
    turn: u32,
    /// 对局状态
    state: GameState,
    /// 棋子统计缓存
    counts: PieceCounts,
    /// 开始时间
    started: Instant,
    /// 动画快照队列：每一跳之后的棋盘副本
    board_queue: VecDeque<Board>,
}

impl Game {
    /// 创建新对局，白方先手
    pub fn new() -> Self {
        Self::from_board(Board::initial(), Side::White)
    }

    /// 从指定局面创建对局
    pub fn from_board(board: Board, current_turn: Side) -> Self {
        let counts = board.counts();
        Self {
            board,
            current_turn,
            turn: 0,
            state: GameState::Running,
            counts,
            started: Instant::now(),
            board_queue: VecDeque::new(),
        }
    }

    /// 当前棋盘
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 当前走子方
    pub fn current_turn(&self) -> Side {
        self.current_turn
    }

    /// 当前回合数
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// 对局状态
    pub fn state(&self) -> GameState {
        self.state
    }

    /// 对局是否仍在进行
    pub fn is_running(&self) -> bool {
        self.state == GameState::Running
    }

    /// 棋子统计
    pub fn counts(&self) -> PieceCounts {
        self.counts
    }

    /// 开始至今的秒数
    pub fn elapsed_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    /// 当前走子方的全部合法走法
    pub fn legal_moves(&self) -> Vec<Move> {
        MoveGenerator::legal_moves(&self.board, self.current_turn)
    }

    /// 指定棋子的合法走法
    pub fn legal_moves_for_piece(&self, pos: Position) -> Vec<Move> {
        MoveGenerator::legal_moves_for_piece(&self.board, pos, self.current_turn)
    }

    /// 当前走子方的所有吃子候选（过滤前的必走探测）
    pub fn forced_moves(&self) -> Vec<Move> {
        let mut forced = Vec::new();
        for (pos, _) in self.board.pieces(self.current_turn) {
            forced.extend(
                MoveGenerator::possible_moves(&self.board, pos, self.current_turn)
                    .into_iter()
                    .filter(|mv| mv.is_capture()),
            );
        }
        forced
    }

    /// 指定棋子是否握有吃子候选
    pub fn has_forced_move(&self, pos: Position) -> bool {
        MoveGenerator::possible_moves(&self.board, pos, self.current_turn)
            .iter()
            .any(|mv| mv.is_capture())
    }

    /// 执行走法
    ///
    /// 走法必须属于当前走子方的合法走法集合，否则返回错误
    /// 且棋盘保持原样。逐跳执行并在每一跳后入队棋盘快照。
    pub fn make_move(&mut self, mv: &Move) -> Result<()> {
        if self.state != GameState::Running {
            return Err(DraughtsError::GameOver);
        }
        let from = mv.from();
        let piece = self.board.piece_at(from).ok_or(DraughtsError::NoPiece {
            row: from.row,
            col: from.col,
        })?;
        if piece.side != self.current_turn {
            return Err(DraughtsError::NotYourTurn);
        }
        if !self.legal_moves().contains(mv) {
            let to = mv.to();
            return Err(DraughtsError::NoSuchMove {
                from_row: from.row,
                from_col: from.col,
                to_row: to.row,
                to_col: to.col,
            });
        }

        let last = mv.hops().len() - 1;
        for (index, hop) in mv.hops().iter().enumerate() {
            self.board.apply_hop(hop);
            if index == last && self.board.try_promote(hop.to) {
                debug!("升王: {}", hop.to);
            }
            self.board_queue.push_back(self.board.clone());
        }

        self.counts = self.board.counts();
        self.end_turn();
        Ok(())
    }

    /// 是否还有等待播放的棋盘快照
    pub fn has_queued_board(&self) -> bool {
        !self.board_queue.is_empty()
    }

    /// 取出最早的棋盘快照
    pub fn pop_queued_board(&mut self) -> Option<Board> {
        self.board_queue.pop_front()
    }

    /// 状态概要
    pub fn status_display(&self) -> String {
        match self.state {
            GameState::WhiteWins => "White Wins".to_string(),
            GameState::RedWins => "Red Wins".to_string(),
            GameState::Draw => "Draw".to_string(),
            GameState::Running => format!(
                "White: {} ({} Kings) | Red: {} ({} Kings) | Turn: {} | Time (s): {}",
                self.counts.white,
                self.counts.white_kings,
                self.counts.red,
                self.counts.red_kings,
                self.turn,
                self.elapsed_secs()
            ),
        }
    }

    /// 结束当前回合：刷新对局状态，未结束则换边
    fn end_turn(&mut self) {
        self.refresh_state();
        if self.state == GameState::Running {
            self.turn += 1;
            self.current_turn = self.current_turn.opponent();
            debug!("回合 {}，轮到 {:?}", self.turn, self.current_turn);
        } else {
            info!("对局结束: {:?}，共 {} 回合", self.state, self.turn);
        }
    }

    /// 重新判定对局状态
    fn refresh_state(&mut self) {
        if self.counts.white == 0 {
            self.state = GameState::RedWins;
            return;
        }
        if self.counts.red == 0 {
            self.state = GameState::WhiteWins;
            return;
        }
        // 单王对单王
        if !self.board.playable() {
            self.state = GameState::Draw;
            return;
        }
        // 下一个走子方无子可动则判负
        let next = self.current_turn.opponent();
        if MoveGenerator::legal_moves(&self.board, next).is_empty() {
            self.state = match next {
                Side::White => GameState::RedWins,
                Side::Red => GameState::WhiteWins,
            };
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
