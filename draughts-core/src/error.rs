//! 错误类型定义

use thiserror::Error;

/// 跳棋规则错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraughtsError {
    /// 无效的位置
    #[error("Invalid position: ({row}, {col})")]
    InvalidPosition { row: i8, col: i8 },

    /// 指定位置没有棋子
    #[error("No piece at position ({row}, {col})")]
    NoPiece { row: u8, col: u8 },

    /// 不是你的回合
    #[error("Not your turn")]
    NotYourTurn,

    /// 不存在这样的合法走法
    #[error("No such move: from ({from_row}, {from_col}) to ({to_row}, {to_col})")]
    NoSuchMove {
        from_row: u8,
        from_col: u8,
        to_row: u8,
        to_col: u8,
    },

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,

    /// 无效的配置
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// 操作结果类型
pub type Result<T> = std::result::Result<T, DraughtsError>;
