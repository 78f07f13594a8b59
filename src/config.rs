use crate::error::{NamaeError, Result};
use namae_ocr_common::DEFAULT_MATCH_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ユーザー設定（~/.config/namae-ocr/config.json）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// tesseract実行ファイル
    pub tesseract_cmd: String,
    /// TESSDATA_PREFIX（未設定なら環境に任せる）
    pub tessdata_prefix: Option<PathBuf>,
    /// 認識言語
    pub language: String,
    /// Page Segmentation Mode
    pub psm: u8,
    /// OCR Engine Mode
    pub oem: u8,
    pub dpi: u32,
    /// 名前テーブルのディレクトリ
    pub table_dir: PathBuf,
    /// 近似一致の採用閾値（0〜100）
    pub match_threshold: u8,
    /// この確信度未満のOCR行は捨てる
    pub min_confidence: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tesseract_cmd: "tesseract".into(),
            tessdata_prefix: None,
            language: "jpn+jpn_vert".into(),
            psm: 6,
            oem: 1,
            dpi: 300,
            table_dir: PathBuf::from("config/private"),
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            min_confidence: 0.2,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| NamaeError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("namae-ocr").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.match_threshold > 100 {
            return Err(NamaeError::Config(format!(
                "match_threshold は 0〜100 で指定してください: {}",
                self.match_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(NamaeError::Config(format!(
                "min_confidence は 0.0〜1.0 で指定してください: {}",
                self.min_confidence
            )));
        }
        Ok(())
    }

    /// tessdata_prefix を環境変数 TESSDATA_PREFIX で上書き
    pub fn effective_tessdata_prefix(&self) -> Option<PathBuf> {
        std::env::var_os("TESSDATA_PREFIX")
            .map(PathBuf::from)
            .or_else(|| self.tessdata_prefix.clone())
    }
}
