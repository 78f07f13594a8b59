//! 画像フォルダからのレコード抽出
//!
//! 画像ごとに 前処理 → OCR → 確信度フィルタ → 行解析/名前解決 を行い、
//! 結果を画像の並び順のまま結合する。

use crate::error::{NamaeError, Result};
use crate::ocr::{filter_confident, OcrEngine, OcrLine};
use crate::preprocess::{prepare_image, write_temp_png, PreprocessMethod};
use crate::scanner::ImageInfo;
use indicatif::{ProgressBar, ProgressStyle};
use namae_ocr_common::{extract_records, NamePipeline, Record};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// 抽出オプション
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub preprocess: PreprocessMethod,
    pub min_confidence: f32,
    /// OCRテキストの保存先（`<ファイル名>.txt`）
    pub dump_text: Option<PathBuf>,
    /// true ならレコードを画像順のまま出力する（既定は全体を逆順）
    pub keep_order: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            preprocess: PreprocessMethod::default(),
            min_confidence: 0.2,
            dump_text: None,
            keep_order: false,
        }
    }
}

/// 画像1枚分の抽出結果
#[derive(Debug, Clone)]
pub struct ImageExtraction {
    pub file_name: String,
    pub lines: Vec<String>,
    pub records: Vec<Record>,
}

/// 処理に失敗した画像
#[derive(Debug, Clone)]
pub struct ImageFailure {
    pub file_name: String,
    pub message: String,
}

/// フォルダ全体の抽出結果
#[derive(Debug, Default)]
pub struct ExtractReport {
    pub records: Vec<Record>,
    pub processed: usize,
    /// データが1件も取れなかった画像
    pub empty: Vec<String>,
    pub failures: Vec<ImageFailure>,
}

pub fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-")
}

/// OCRを実行する（`None` なら元画像をそのまま渡す）
pub fn ocr_image(
    engine: &dyn OcrEngine,
    path: &Path,
    method: PreprocessMethod,
) -> Result<Vec<OcrLine>> {
    if method == PreprocessMethod::None {
        return engine.extract(path);
    }

    let prepared = prepare_image(path, method)?;
    // 一時ファイルはOCR完了まで保持する
    let temp = write_temp_png(&prepared)?;
    engine.extract(temp.path())
}

/// 画像1枚を処理する
pub fn extract_image(
    image: &ImageInfo,
    engine: &dyn OcrEngine,
    pipeline: &NamePipeline,
    options: &ExtractOptions,
) -> Result<ImageExtraction> {
    let lines = ocr_image(engine, &image.path, options.preprocess)?;
    let lines: Vec<String> = filter_confident(lines, options.min_confidence)
        .into_iter()
        .map(|line| line.text)
        .collect();

    if let Some(dir) = &options.dump_text {
        save_text(dir, &image.file_name, &lines)?;
    }

    let records = extract_records(lines.iter().map(String::as_str), pipeline);
    tracing::debug!(
        image = %image.file_name,
        engine = engine.name(),
        lines = lines.len(),
        records = records.len(),
        "image processed"
    );

    Ok(ImageExtraction {
        file_name: image.file_name.clone(),
        lines,
        records,
    })
}

/// OCRテキストを `<dir>/<file_name>.txt` に保存する
///
/// 拡張子を残すので `a.png` と `a.jpg` は別ファイルになる（並列実行でも衝突しない）。
pub fn save_text(dir: &Path, file_name: &str, lines: &[String]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.txt", file_name));
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(&path, content)?;
    Ok(path)
}

/// 画像群を並列に処理し、画像順にレコードを結合する
///
/// 失敗した画像は警告を出してスキップする。
pub fn extract_images(
    images: &[ImageInfo],
    engine: &dyn OcrEngine,
    pipeline: &NamePipeline,
    options: &ExtractOptions,
    progress: &ProgressBar,
) -> ExtractReport {
    let results: Vec<(&ImageInfo, Result<ImageExtraction>)> = images
        .par_iter()
        .map(|image| {
            progress.set_message(image.file_name.clone());
            let result = extract_image(image, engine, pipeline, options);
            progress.inc(1);
            (image, result)
        })
        .collect();

    let mut report = ExtractReport::default();
    for (image, result) in results {
        match result {
            Ok(extraction) => {
                report.processed += 1;
                if extraction.records.is_empty() {
                    tracing::info!(image = %image.file_name, "no valid data");
                    report.empty.push(extraction.file_name);
                } else {
                    report.records.extend(extraction.records);
                }
            }
            Err(e) => {
                tracing::warn!(image = %image.file_name, error = %e, "image skipped");
                report.failures.push(ImageFailure {
                    file_name: image.file_name.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    if !options.keep_order {
        report.records.reverse();
    }

    tracing::info!(
        processed = report.processed,
        failed = report.failures.len(),
        records = report.records.len(),
        "extraction finished"
    );
    report
}

/// `--jobs` 指定時は専用スレッドプールで実行する
pub fn extract_images_with_jobs(
    images: &[ImageInfo],
    engine: &dyn OcrEngine,
    pipeline: &NamePipeline,
    options: &ExtractOptions,
    progress: &ProgressBar,
    jobs: Option<usize>,
) -> Result<ExtractReport> {
    match jobs {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n.max(1))
                .build()
                .map_err(|e| NamaeError::Config(format!("スレッドプールを作成できません: {}", e)))?;
            Ok(pool.install(|| extract_images(images, engine, pipeline, options, progress)))
        }
        None => Ok(extract_images(images, engine, pipeline, options, progress)),
    }
}
