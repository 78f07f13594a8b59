//! 名前テーブル・誤認識パターン・正規化ルールの読み込み
//!
//! 設定ディレクトリ構成:
//! - `name_data.json`:      `{"name_table": [["Yamada", "山田"], ...]}`
//! - `error_patterns.json`: `{"error_patterns": ["を$", ...]}`
//! - `sensitive_data.json`: 正規化ルールと特別変換
//!
//! 読み込みは起動時に1回だけ。不完全な設定ではパイプラインを作らない。

use crate::error::{Error, Result};
use crate::rules::{
    ErrorPattern, NormalizationRule, RuleRecord, SpecialCase, SpecialCaseRecord, SpecialCases,
};
use crate::types::NameEntry;
use crate::vocabulary::Vocabulary;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const NAME_DATA_FILE: &str = "name_data.json";
pub const ERROR_PATTERNS_FILE: &str = "error_patterns.json";
pub const SENSITIVE_DATA_FILE: &str = "sensitive_data.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameDataFile {
    pub name_table: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorPatternsFile {
    pub error_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecialNameMapping {
    pub default_empty: NameEntry,
    #[serde(default)]
    pub special_cases: Vec<SpecialCaseRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensitiveDataFile {
    #[serde(default)]
    pub name_normalization_rules: Vec<RuleRecord>,
    pub special_name_mapping: SpecialNameMapping,
}

/// 読み込み済みの名前解決設定一式（以後変更しない）
#[derive(Debug, Clone)]
pub struct NameTables {
    pub vocabulary: Vocabulary,
    pub error_patterns: Vec<ErrorPattern>,
    pub rules: Vec<NormalizationRule>,
    pub special_cases: SpecialCases,
}

impl NameTables {
    /// 設定ディレクトリから3ファイルを読み込む
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let name_data = read_config_file(dir, NAME_DATA_FILE)?;
        let error_patterns = read_config_file(dir, ERROR_PATTERNS_FILE)?;
        let sensitive_data = read_config_file(dir, SENSITIVE_DATA_FILE)?;

        let tables = Self::from_json(&name_data, &error_patterns, &sensitive_data)?;
        tracing::info!(
            dir = %dir.display(),
            names = tables.vocabulary.len(),
            error_patterns = tables.error_patterns.len(),
            rules = tables.rules.len(),
            "name tables loaded"
        );
        Ok(tables)
    }

    /// JSON文字列から構築する
    pub fn from_json(name_data: &str, error_patterns: &str, sensitive_data: &str) -> Result<Self> {
        let name_data: NameDataFile = serde_json::from_str(name_data)?;
        let error_patterns: ErrorPatternsFile = serde_json::from_str(error_patterns)?;
        let sensitive_data: SensitiveDataFile = serde_json::from_str(sensitive_data)?;
        Self::from_files(name_data, error_patterns, sensitive_data)
    }

    /// デシリアライズ済みの設定から構築する
    pub fn from_files(
        name_data: NameDataFile,
        error_patterns: ErrorPatternsFile,
        sensitive_data: SensitiveDataFile,
    ) -> Result<Self> {
        let vocabulary = Vocabulary::from_pairs(name_data.name_table)?;
        if vocabulary.is_empty() {
            return Err(Error::Config("name_table is empty".into()));
        }

        let error_patterns = error_patterns
            .error_patterns
            .iter()
            .map(|p| ErrorPattern::new(p))
            .collect::<Result<Vec<_>>>()?;

        let rules = sensitive_data
            .name_normalization_rules
            .into_iter()
            .map(NormalizationRule::try_from)
            .collect::<Result<Vec<_>>>()?;

        let mapping = sensitive_data.special_name_mapping;
        let special_cases = SpecialCases {
            empty_default: mapping.default_empty,
            cases: mapping
                .special_cases
                .into_iter()
                .map(SpecialCase::try_from)
                .collect::<Result<Vec<_>>>()?,
        };

        Ok(Self {
            vocabulary,
            error_patterns,
            rules,
            special_cases,
        })
    }
}

fn read_config_file(dir: &Path, file_name: &str) -> Result<String> {
    let path = dir.join(file_name);
    if !path.exists() {
        return Err(Error::Config(format!(
            "設定ファイルが見つかりません: {}",
            path.display()
        )));
    }
    Ok(std::fs::read_to_string(path)?)
}
