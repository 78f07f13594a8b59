//! 近似一致（編集距離ベースの類似度スコア）

use crate::types::NameEntry;
use crate::vocabulary::Vocabulary;

/// 類似度スコア（0〜100の整数）
///
/// 正規化レーベンシュタイン比 `(最大長 - 距離) / 最大長` を四捨五入する。
/// 距離は文字（Unicodeスカラー値）単位。
pub fn similarity_score(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }

    let max_len = a.chars().count().max(b.chars().count());
    let distance = strsim::levenshtein(a, b);
    let matched = max_len - distance;

    ((matched * 200 + max_len) / (2 * max_len)) as u8
}

/// 近似一致の候補
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyMatch<'a> {
    pub entry: &'a NameEntry,
    pub score: u8,
}

/// 語彙の中で最もスコアの高い候補を返す
///
/// 同点の場合は語彙の宣言順で先に現れたものを採用する。
pub fn best_match<'a>(query: &str, vocabulary: &'a Vocabulary) -> Option<FuzzyMatch<'a>> {
    let mut best: Option<FuzzyMatch<'a>> = None;

    for entry in vocabulary.entries() {
        let score = similarity_score(query, &entry.japanese);
        if best.map_or(true, |b| score > b.score) {
            best = Some(FuzzyMatch { entry, score });
        }
    }

    best
}
