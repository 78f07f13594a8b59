//! OCRエンジン
//!
//! 画像1枚からテキスト行を取り出す。行ごとの確信度を返せるエンジンは
//! `confidence` を埋め、閾値未満の行は名前解決の前に捨てる。

mod tesseract;

pub use tesseract::{check_tesseract, parse_tsv_output, TesseractCli};

use crate::error::Result;
use std::path::Path;

/// OCRで得た1行
#[derive(Debug, Clone, PartialEq)]
pub struct OcrLine {
    pub text: String,
    /// 0.0〜1.0（エンジンが返さない場合は None）
    pub confidence: Option<f32>,
}

impl OcrLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence: Some(confidence),
        }
    }
}

/// OCRエンジンの共通インターフェース
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;

    fn extract(&self, image_path: &Path) -> Result<Vec<OcrLine>>;
}

/// 確信度が `min_confidence` 未満の行を除外する（確信度なしの行は残す）
pub fn filter_confident(lines: Vec<OcrLine>, min_confidence: f32) -> Vec<OcrLine> {
    lines
        .into_iter()
        .filter(|line| line.confidence.map_or(true, |c| c >= min_confidence))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_confident() {
        let lines = vec![
            OcrLine::with_confidence("2024年1月5日", 0.9),
            OcrLine::with_confidence("ノイズ", 0.1),
            OcrLine::with_confidence("境界", 0.2),
            OcrLine::new("確信度なし"),
        ];
        let kept: Vec<String> = filter_confident(lines, 0.2)
            .into_iter()
            .map(|l| l.text)
            .collect();
        assert_eq!(kept, vec!["2024年1月5日", "境界", "確信度なし"]);
    }
}
