//! Tesseract CLI連携
//!
//! `tesseract <image> stdout --oem 1 --psm 6 -l jpn+jpn_vert --dpi 300 tsv`
//!
//! TSV出力の単語を (page, block, par, line) ごとにまとめて1行にし、
//! 単語の確信度の平均を行の確信度（0.0〜1.0）とする。

use super::{OcrEngine, OcrLine};
use crate::config::Config;
use crate::error::{NamaeError, Result};
use regex::Regex;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

#[derive(Debug, Clone)]
pub struct TesseractCli {
    pub cmd: String,
    pub language: String,
    pub psm: u8,
    pub oem: u8,
    pub dpi: u32,
    pub tessdata_prefix: Option<PathBuf>,
}

impl TesseractCli {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cmd: config.tesseract_cmd.clone(),
            language: config.language.clone(),
            psm: config.psm,
            oem: config.oem,
            dpi: config.dpi,
            tessdata_prefix: config.effective_tessdata_prefix(),
        }
    }

    /// コマンドライン引数（実行ファイル名を除く）
    pub fn args(&self, image_path: &Path) -> Vec<String> {
        vec![
            image_path.display().to_string(),
            "stdout".into(),
            "--oem".into(),
            self.oem.to_string(),
            "--psm".into(),
            self.psm.to_string(),
            "-l".into(),
            self.language.clone(),
            "--dpi".into(),
            self.dpi.to_string(),
            "tsv".into(),
        ]
    }

    fn run(&self, args: &[String]) -> Result<Output> {
        let mut command = Command::new(&self.cmd);
        command.args(args);
        if let Some(prefix) = &self.tessdata_prefix {
            command.env("TESSDATA_PREFIX", prefix);
        }

        command.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => NamaeError::TesseractNotFound(self.cmd.clone()),
            _ => NamaeError::Ocr(format!("Tesseract実行エラー: {}", e)),
        })
    }
}

impl OcrEngine for TesseractCli {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn extract(&self, image_path: &Path) -> Result<Vec<OcrLine>> {
        let output = self.run(&self.args(image_path))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NamaeError::Ocr(format!(
                "Tesseract failed (code {:?}): {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let lines = parse_tsv_output(&tsv)?;
        tracing::debug!(image = %image_path.display(), lines = lines.len(), "tesseract output");
        Ok(lines)
    }
}

/// TSVの1行（level 5 が単語）
#[derive(Debug, Deserialize)]
struct TsvRow {
    level: u32,
    page_num: u32,
    block_num: u32,
    par_num: u32,
    line_num: u32,
    conf: f32,
    #[serde(default)]
    text: String,
}

const WORD_LEVEL: u32 = 5;

/// 行の組み立て中の状態
struct LineBuilder {
    key: (u32, u32, u32, u32),
    text: String,
    conf_sum: f32,
    conf_count: u32,
}

impl LineBuilder {
    fn push_word(&mut self, word: &str, conf: f32) {
        // 日本語同士は詰め、英数字が隣接する境界だけ空白を入れる
        let needs_space = match (self.text.chars().last(), word.chars().next()) {
            (Some(prev), Some(next)) => prev.is_ascii() || next.is_ascii(),
            _ => false,
        };
        if needs_space {
            self.text.push(' ');
        }
        self.text.push_str(word);
        if conf >= 0.0 {
            self.conf_sum += conf;
            self.conf_count += 1;
        }
    }

    fn finish(self) -> Option<OcrLine> {
        if self.text.is_empty() {
            return None;
        }
        Some(match self.conf_count {
            0 => OcrLine::new(self.text),
            n => OcrLine::with_confidence(self.text, self.conf_sum / n as f32 / 100.0),
        })
    }
}

/// `tesseract ... tsv` の出力を行単位にまとめる
pub fn parse_tsv_output(tsv: &str) -> Result<Vec<OcrLine>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .from_reader(tsv.as_bytes());

    let mut lines = Vec::new();
    let mut current: Option<LineBuilder> = None;

    for row in reader.deserialize::<TsvRow>() {
        let row = row.map_err(|e| NamaeError::Ocr(format!("TSV解析エラー: {}", e)))?;
        let word = row.text.trim();
        if row.level != WORD_LEVEL || word.is_empty() {
            continue;
        }

        let key = (row.page_num, row.block_num, row.par_num, row.line_num);
        if current.as_ref().map_or(true, |line| line.key != key) {
            lines.extend(current.take().and_then(LineBuilder::finish));
            current = Some(LineBuilder {
                key,
                text: String::new(),
                conf_sum: 0.0,
                conf_count: 0,
            });
        }
        if let Some(line) = current.as_mut() {
            line.push_word(word, row.conf);
        }
    }
    lines.extend(current.and_then(LineBuilder::finish));

    Ok(lines)
}

/// Tesseractが利用可能か確認し、バージョンを返す
pub fn check_tesseract(tesseract: &TesseractCli) -> Result<String> {
    let output = tesseract.run(&["--version".to_string()])?;

    // 古いバージョンはstderrに出力する
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let banner = if stdout.trim().is_empty() { stderr } else { stdout };

    parse_version(&banner).ok_or_else(|| {
        NamaeError::TesseractNotFound(format!("{} のバージョンを取得できません", tesseract.cmd))
    })
}

fn parse_version(banner: &str) -> Option<String> {
    lazy_static::lazy_static! {
        static ref VERSION_RE: Regex = Regex::new(r"(?i)tesseract\s+v?(\d[\w.\-]*)").unwrap();
    }
    VERSION_RE.captures(banner).map(|caps| caps[1].to_string())
}
