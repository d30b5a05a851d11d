//! エラーハンドリング
//!
//! 想定内の結果（ファイルなし・処理済み等）はエラーにせず、呼び出し側の戻り値で表す。
//! ここに来るのは I/O 失敗・引数不正など、呼び出しを中断すべきものだけ。

/// エラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Env(String),
    #[error("JSON error: {0}")]
    Json(String),
    #[error("{0}")]
    System(String),
}

impl Error {
    /// I/O エラー
    pub fn io_msg(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    /// 引数不正エラー
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// 環境変数・設定の解決エラー
    pub fn env(msg: impl Into<String>) -> Self {
        Error::Env(msg.into())
    }

    /// システムエラー
    pub fn system(msg: impl Into<String>) -> Self {
        Error::System(msg.into())
    }

    /// 終了コード（sysexits.h 準拠）
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) => 64,
            Error::Json(_) => 65,
            Error::System(_) => 70,
            Error::Io(_) => 74,
            Error::Env(_) => 78,
        }
    }

    /// 使い方の表示が必要なエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}
