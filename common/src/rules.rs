//! 正規化ルール・誤認識パターン・特別変換
//!
//! 設定ファイルの緩い形（RuleRecord）は読み込み時にタグ付きの
//! NormalizationRule へ変換し、不正なレコードはその場で拒否する。

use crate::error::{Error, Result};
use crate::types::NameEntry;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// 設定ファイル上のルールレコード
///
/// `keywords` + `normalized_name` か `pattern` + `replacement` のどちらか一方。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

/// 名前の正規化ルール
#[derive(Debug, Clone)]
pub enum NormalizationRule {
    /// いずれかのキーワードを含めば `normalized_name` を即返す
    Keyword {
        keywords: Vec<String>,
        normalized_name: String,
    },
    /// クリーンアップ中の正規表現置換（置換文字列は `$1` 形式）
    Pattern { pattern: Regex, replacement: String },
}

impl NormalizationRule {
    pub fn keyword<K, S>(keywords: K, normalized_name: impl Into<String>) -> Result<Self>
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
        if keywords.is_empty() {
            return Err(Error::Rule("keyword rule without keywords".into()));
        }
        if keywords.iter().any(|k| k.is_empty()) {
            return Err(Error::Rule("keyword rule with an empty keyword".into()));
        }
        Ok(NormalizationRule::Keyword {
            keywords,
            normalized_name: normalized_name.into(),
        })
    }

    pub fn pattern(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let compiled = Regex::new(pattern).map_err(|e| Error::pattern(pattern, e))?;
        Ok(NormalizationRule::Pattern {
            pattern: compiled,
            replacement: replacement.into(),
        })
    }

    /// キーワードルールが入力に該当すれば正規化名を返す
    pub fn keyword_match(&self, text: &str) -> Option<&str> {
        match self {
            NormalizationRule::Keyword {
                keywords,
                normalized_name,
            } if keywords.iter().any(|k| text.contains(k.as_str())) => {
                Some(normalized_name.as_str())
            }
            _ => None,
        }
    }
}

impl TryFrom<RuleRecord> for NormalizationRule {
    type Error = Error;

    fn try_from(record: RuleRecord) -> Result<Self> {
        match record {
            RuleRecord {
                keywords: Some(keywords),
                normalized_name: Some(name),
                pattern: None,
                replacement: None,
            } => NormalizationRule::keyword(keywords, name),
            RuleRecord {
                keywords: None,
                normalized_name: None,
                pattern: Some(pattern),
                replacement: Some(replacement),
            } => NormalizationRule::pattern(&pattern, replacement),
            other => Err(Error::Rule(format!(
                "expected keywords+normalized_name or pattern+replacement, got {:?}",
                other
            ))),
        }
    }
}

/// 既知のOCR誤認識パターン（一致部分を削除する）
#[derive(Debug, Clone)]
pub struct ErrorPattern(Regex);

impl ErrorPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(ErrorPattern)
            .map_err(|e| Error::pattern(pattern, e))
    }

    pub fn strip<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.0.replace_all(text, "")
    }
}

/// 設定ファイル上の特別変換レコード
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecialCaseRecord {
    pub trigger_keywords: Vec<String>,
    pub target: NameEntry,
}

/// 特別変換: キーワードを含めば近似一致より先に確定する
#[derive(Debug, Clone)]
pub struct SpecialCase {
    trigger_keywords: Vec<String>,
    target: NameEntry,
}

impl SpecialCase {
    pub fn new<K, S>(trigger_keywords: K, target: NameEntry) -> Result<Self>
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let trigger_keywords: Vec<String> = trigger_keywords.into_iter().map(Into::into).collect();
        if trigger_keywords.is_empty() || trigger_keywords.iter().any(|k| k.is_empty()) {
            return Err(Error::Rule(format!(
                "special case for `{}` needs non-empty trigger keywords",
                target.japanese
            )));
        }
        Ok(Self {
            trigger_keywords,
            target,
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.trigger_keywords.iter().any(|k| text.contains(k.as_str()))
    }

    pub fn target(&self) -> &NameEntry {
        &self.target
    }
}

impl TryFrom<SpecialCaseRecord> for SpecialCase {
    type Error = Error;

    fn try_from(record: SpecialCaseRecord) -> Result<Self> {
        SpecialCase::new(record.trigger_keywords, record.target)
    }
}

/// 特別変換一式（空文字デフォルト＋キーワード変換）
#[derive(Debug, Clone, Default)]
pub struct SpecialCases {
    pub empty_default: NameEntry,
    pub cases: Vec<SpecialCase>,
}

impl SpecialCases {
    /// 宣言順で最初に該当する特別変換の対象
    pub fn find(&self, text: &str) -> Option<&NameEntry> {
        self.cases.iter().find(|c| c.matches(text)).map(SpecialCase::target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> RuleRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_keyword_record_converts() {
        let rule = NormalizationRule::try_from(record(
            r#"{"keywords": ["ポラ", "リス"], "normalized_name": "ポラリス"}"#,
        ))
        .unwrap();
        assert_eq!(rule.keyword_match("こぐまポラ"), Some("ポラリス"));
        assert_eq!(rule.keyword_match("山田"), None);
    }

    #[test]
    fn test_pattern_record_converts() {
        let rule = NormalizationRule::try_from(record(
            r#"{"pattern": "^ロ田", "replacement": "山田"}"#,
        ))
        .unwrap();
        assert!(matches!(rule, NormalizationRule::Pattern { .. }));
        assert_eq!(rule.keyword_match("ロ田"), None);
    }

    #[test]
    fn test_mixed_record_rejected() {
        let result = NormalizationRule::try_from(record(
            r#"{"keywords": ["a"], "pattern": "b", "replacement": "c"}"#,
        ));
        assert!(matches!(result, Err(Error::Rule(_))));
    }

    #[test]
    fn test_incomplete_record_rejected() {
        let result = NormalizationRule::try_from(record(r#"{"pattern": "b"}"#));
        assert!(result.is_err());
        let result = NormalizationRule::try_from(record(r#"{"keywords": ["a"]}"#));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = serde_json::from_str::<RuleRecord>(r#"{"keyword": ["a"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_keyword_rejected() {
        assert!(NormalizationRule::keyword([""], "x").is_err());
        assert!(NormalizationRule::keyword(Vec::<String>::new(), "x").is_err());
    }

    #[test]
    fn test_invalid_regex_reports_pattern() {
        let err = ErrorPattern::new("[abc").unwrap_err();
        assert!(matches!(err, Error::Pattern { ref pattern, .. } if pattern == "[abc"));
    }

    #[test]
    fn test_error_pattern_strip() {
        let pattern = ErrorPattern::new("を$").unwrap();
        assert_eq!(pattern.strip("山田を"), "山田");
        assert_eq!(pattern.strip("をか山田"), "をか山田");
    }

    #[test]
    fn test_special_cases_first_match_wins() {
        let cases = SpecialCases {
            empty_default: NameEntry::new("Unknown", "不明"),
            cases: vec![
                SpecialCase::new(["ポラ"], NameEntry::new("Polaris", "ポラリス")).unwrap(),
                SpecialCase::new(["ポ"], NameEntry::new("Po", "ポ")).unwrap(),
            ],
        };
        assert_eq!(cases.find("こぐまポラ").unwrap().english, "Polaris");
        assert_eq!(cases.find("ポチ").unwrap().english, "Po");
        assert!(cases.find("山田").is_none());
    }
}
