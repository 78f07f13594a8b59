//! エラー型定義
//!
//! 名前テーブル・ルールの読み込み時にのみ発生する。
//! 1件ごとの名前解決はエラーにならない（未解決は `Resolution::Unresolved`）。

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid rule: {0}")]
    Rule(String),
}

impl Error {
    /// 正規表現のコンパイルエラーを元パターン付きで包む
    pub fn pattern(pattern: &str, source: regex::Error) -> Self {
        Error::Pattern {
            pattern: pattern.to_string(),
            source,
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
