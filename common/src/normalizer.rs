//! 名前文字列の正規化
//!
//! 1. キーワードルールによる即時変換
//! 2. 全角スペース → 半角
//! 3. 絵文字・記号の除去
//! 4. 誤認識パターンの除去
//! 5. パターンルールによる置換
//! 6. 全角英数字 → 半角
//! 7. 連続空白の統一・前後トリム
//!
//! 出力が変化しなくなるまで繰り返すため、正規化は冪等になる。
//! ただし `MAX_PASSES` 回で収束しない設定（置換で文字列が伸び続けるルールなど）では
//! 打ち切った時点の値を返し、冪等性は保証されない。

use crate::error::{Error, Result};
use crate::rules::{ErrorPattern, NormalizationRule};
use regex::Regex;

/// 変化が止まらない設定でも打ち切る回数
const MAX_PASSES: usize = 8;

lazy_static::lazy_static! {
    // 英数字・かな・漢字・繰り返し記号・空白以外
    static ref SYMBOL_RE: Regex = Regex::new(r"[^\wぁ-んァ-ヶ一-龠々ー～\s]+").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// 全角数字・英字を半角へ変換する（記号・かなはそのまま）
pub fn fold_full_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            'Ａ'..='Ｚ' => char::from(b'A' + (c as u32 - 'Ａ' as u32) as u8),
            'ａ'..='ｚ' => char::from(b'a' + (c as u32 - 'ａ' as u32) as u8),
            _ => c,
        })
        .collect()
}

/// 正規化器（誤認識パターンと正規化ルールを保持）
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    error_patterns: Vec<ErrorPattern>,
    rules: Vec<NormalizationRule>,
}

impl TextNormalizer {
    /// キーワードルールの正規化名は正規化の不動点でなければならない
    pub fn new(error_patterns: Vec<ErrorPattern>, rules: Vec<NormalizationRule>) -> Result<Self> {
        let normalizer = Self {
            error_patterns,
            rules,
        };

        for rule in &normalizer.rules {
            if let NormalizationRule::Keyword {
                normalized_name, ..
            } = rule
            {
                let renormalized = normalizer.normalize(normalized_name);
                if &renormalized != normalized_name {
                    return Err(Error::Rule(format!(
                        "normalized_name `{}` is not stable under normalization (becomes `{}`)",
                        normalized_name, renormalized
                    )));
                }
            }
        }

        Ok(normalizer)
    }

    /// 名前文字列を正規化する。失敗しない。
    pub fn normalize(&self, raw: &str) -> String {
        let mut current = raw.to_string();

        for _ in 0..MAX_PASSES {
            if let Some(name) = self.keyword_override(&current) {
                return name.to_string();
            }

            let cleaned = self.clean(&current);
            if cleaned == current {
                return cleaned;
            }
            current = cleaned;
        }

        tracing::warn!(
            raw,
            normalized = %current,
            passes = MAX_PASSES,
            "normalization did not settle; check pattern rules"
        );
        current
    }

    /// 宣言順で最初に該当したキーワードルールの正規化名
    fn keyword_override(&self, text: &str) -> Option<&str> {
        self.rules.iter().find_map(|rule| rule.keyword_match(text))
    }

    /// 手順2〜7を1回適用する
    fn clean(&self, text: &str) -> String {
        let unified = text.replace('\u{3000}', " ");

        let mut cleaned = SYMBOL_RE.replace_all(&unified, "").into_owned();

        for pattern in &self.error_patterns {
            cleaned = pattern.strip(&cleaned).into_owned();
        }

        for rule in &self.rules {
            if let NormalizationRule::Pattern {
                pattern,
                replacement,
            } = rule
            {
                cleaned = pattern
                    .replace_all(&cleaned, replacement.as_str())
                    .into_owned();
            }
        }

        let folded = fold_full_width(&cleaned);
        WHITESPACE_RE.replace_all(&folded, " ").trim().to_string()
    }
}
