//! OCR結果の精度評価
//!
//! 抽出行と期待行を比較して一致率（%）を出す。

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 期待テキストファイル `{"expected_texts": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpectedTexts {
    pub expected_texts: Vec<String>,
}

impl ExpectedTexts {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub struct TextEvaluator;

impl TextEvaluator {
    /// 日付表記を `/` 区切りに揃え、空白を1つにまとめる
    pub fn normalize_text(text: &str) -> String {
        let text = text.replace('年', "/").replace('月', "/").replace('日', "");
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// 期待行のうち抽出結果に完全一致で含まれる割合
    pub fn compare(extracted: &[String], expected: &[String]) -> f64 {
        if expected.is_empty() {
            return 0.0;
        }
        let matched = expected.iter().filter(|line| extracted.contains(line)).count();
        matched as f64 / expected.len() as f64 * 100.0
    }

    /// 正規化後、いずれかの抽出行と部分一致（どちら向きでも可）する期待行の割合
    pub fn compare_normalized(extracted: &[String], expected: &[String]) -> f64 {
        if expected.is_empty() {
            return 0.0;
        }

        let normalized_extracted: Vec<String> =
            extracted.iter().map(|l| Self::normalize_text(l)).collect();

        let matched = expected
            .iter()
            .map(|l| Self::normalize_text(l))
            .filter(|exp| {
                normalized_extracted
                    .iter()
                    .any(|ext| ext.contains(exp.as_str()) || exp.contains(ext.as_str()))
            })
            .count();

        matched as f64 / expected.len() as f64 * 100.0
    }
}
