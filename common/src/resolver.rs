//! 正規化済み文字列から正規名を確定する
//!
//! 空文字 → 完全一致 → 特別変換 → 近似一致（閾値判定）→ 未解決 の順。

use crate::error::{Error, Result};
use crate::fuzzy::best_match;
use crate::rules::SpecialCases;
use crate::types::{ResolvedIdentity, Resolution};
use crate::vocabulary::Vocabulary;

/// 近似一致の採用閾値（デフォルト）
pub const DEFAULT_MATCH_THRESHOLD: u8 = 60;

#[derive(Debug, Clone)]
pub struct IdentityResolver {
    vocabulary: Vocabulary,
    special_cases: SpecialCases,
    threshold: u8,
}

impl IdentityResolver {
    pub fn new(vocabulary: Vocabulary, special_cases: SpecialCases, threshold: u8) -> Result<Self> {
        if threshold > 100 {
            return Err(Error::Config(format!(
                "match threshold must be within 0..=100, got {}",
                threshold
            )));
        }
        Ok(Self {
            vocabulary,
            special_cases,
            threshold,
        })
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// 正規化済みの名前を解決する。失敗しない。
    pub fn resolve(&self, normalized: &str) -> ResolvedIdentity {
        if normalized.is_empty() {
            return ResolvedIdentity::from_entry(
                &self.special_cases.empty_default,
                Resolution::EmptyDefault,
            );
        }

        if let Some(entry) = self.vocabulary.get(normalized) {
            return ResolvedIdentity::from_entry(entry, Resolution::Exact);
        }

        if let Some(target) = self.special_cases.find(normalized) {
            return ResolvedIdentity::from_entry(target, Resolution::SpecialCase);
        }

        match best_match(normalized, &self.vocabulary) {
            Some(m) if m.score >= self.threshold => {
                tracing::debug!(
                    input = normalized,
                    matched = %m.entry.japanese,
                    score = m.score,
                    "fuzzy match accepted"
                );
                ResolvedIdentity::from_entry(m.entry, Resolution::Fuzzy { score: m.score })
            }
            best => {
                tracing::debug!(
                    input = normalized,
                    best_score = best.map(|m| m.score),
                    threshold = self.threshold,
                    "name left unresolved"
                );
                ResolvedIdentity::unresolved(normalized)
            }
        }
    }
}
