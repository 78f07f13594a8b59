//! 名前解決・レコードの型定義
//!
//! - NameEntry: 正規の (英語キー, 日本語表示名) の組
//! - ResolvedIdentity: パイプラインの出力
//! - Record: CSVの1行（date, pt, name, namae）

use serde::{Deserialize, Serialize};

/// 正規の名前エントリ
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameEntry {
    /// 英語キー（name列）
    pub english: String,
    /// 日本語表示名（namae列）
    pub japanese: String,
}

impl NameEntry {
    pub fn new(english: impl Into<String>, japanese: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            japanese: japanese.into(),
        }
    }
}

/// どの段階で名前が確定したか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// 正規化後が空文字列だった
    EmptyDefault,
    /// 語彙と完全一致
    Exact,
    /// 特別キーワードによる変換
    SpecialCase,
    /// 近似一致（スコア付き）
    Fuzzy { score: u8 },
    /// 確定できず入力をそのまま返した
    Unresolved,
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::EmptyDefault => write!(f, "空文字デフォルト"),
            Resolution::Exact => write!(f, "完全一致"),
            Resolution::SpecialCase => write!(f, "特別変換"),
            Resolution::Fuzzy { score } => write!(f, "近似一致({})", score),
            Resolution::Unresolved => write!(f, "未解決"),
        }
    }
}

/// 名前解決の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub english: String,
    pub japanese: String,
    pub resolution: Resolution,
}

impl ResolvedIdentity {
    pub fn from_entry(entry: &NameEntry, resolution: Resolution) -> Self {
        Self {
            english: entry.english.clone(),
            japanese: entry.japanese.clone(),
            resolution,
        }
    }

    /// 未解決: 正規化済み文字列を両フィールドにそのまま入れる
    pub fn unresolved(normalized: &str) -> Self {
        Self {
            english: normalized.to_string(),
            japanese: normalized.to_string(),
            resolution: Resolution::Unresolved,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution != Resolution::Unresolved
    }

    /// (英語キー, 日本語表示名) のタプルとして取得
    pub fn pair(&self) -> (&str, &str) {
        (&self.english, &self.japanese)
    }
}

/// 出力レコード（CSVの1行）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 日付（YYYY/MM/DD）
    pub date: String,
    /// ポイント（整数の文字列）
    pub pt: String,
    /// 英語キー
    pub name: String,
    /// 日本語表示名
    pub namae: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_echoes_input() {
        let identity = ResolvedIdentity::unresolved("山由");
        assert_eq!(identity.pair(), ("山由", "山由"));
        assert!(!identity.is_resolved());
    }

    #[test]
    fn test_from_entry() {
        let entry = NameEntry::new("Yamada", "山田");
        let identity = ResolvedIdentity::from_entry(&entry, Resolution::Exact);
        assert_eq!(identity.pair(), ("Yamada", "山田"));
        assert!(identity.is_resolved());
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(Resolution::Fuzzy { score: 75 }.to_string(), "近似一致(75)");
        assert_eq!(Resolution::Unresolved.to_string(), "未解決");
    }

    #[test]
    fn test_record_serialize_field_names() {
        let record = Record {
            date: "2024/01/05".into(),
            pt: "1200".into(),
            name: "Yamada".into(),
            namae: "山田".into(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"date":"2024/01/05","pt":"1200","name":"Yamada","namae":"山田"}"#
        );
    }
}
