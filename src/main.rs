use anyhow::Context;
use clap::Parser;
use indicatif::ProgressBar;
use namae_ocr::{cli, config, error, export, extractor, ocr, scanner};
use namae_ocr_common::{ExpectedTexts, NamePipeline, NameTables, TextEvaluator};
use cli::{Cli, Commands};
use config::Config;
use extractor::ExtractOptions;
use ocr::{OcrEngine, TesseractCli};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "namae_ocr=debug,namae_ocr_common=debug"
    } else {
        "namae_ocr=info,namae_ocr_common=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// 名前テーブルを読み込んでパイプラインを作る（引数指定が設定より優先）
fn load_pipeline(
    config: &Config,
    tables: Option<PathBuf>,
    threshold: Option<u8>,
) -> anyhow::Result<NamePipeline> {
    let table_dir = tables.unwrap_or_else(|| config.table_dir.clone());
    let threshold = threshold.unwrap_or(config.match_threshold);

    let tables = NameTables::load_dir(&table_dir)
        .with_context(|| format!("名前テーブルを読み込めません: {}", table_dir.display()))?;
    let pipeline = NamePipeline::new(tables, threshold).context("名前補正の設定が不正です")?;
    Ok(pipeline)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load().context("設定ファイルを読み込めません")?;

    match cli.command {
        Commands::Extract {
            folder,
            output,
            tables,
            preprocess,
            threshold,
            keep_order,
            dump_text,
            jobs,
        } => {
            println!("📸 namae-ocr - レコード抽出\n");

            // 1. 名前テーブル
            println!("[1/4] 名前テーブルを読み込み中...");
            let pipeline = load_pipeline(&config, tables, threshold)?;
            println!(
                "✔ {}件の名前を読み込み（閾値: {}）\n",
                pipeline.resolver().vocabulary().len(),
                pipeline.resolver().threshold()
            );

            // 2. 画像スキャン
            println!("[2/4] 画像をスキャン中...");
            let images = scanner::scan_folder(&folder)?;
            if images.is_empty() {
                return Err(error::NamaeError::NoImagesFound(folder.display().to_string()).into());
            }
            println!("✔ {}枚の画像を検出\n", images.len());

            // 3. OCR
            println!("[3/4] OCR解析中... (前処理: {})", preprocess);
            let engine = TesseractCli::from_config(&config);
            let version = ocr::check_tesseract(&engine)?;
            tracing::debug!(engine = engine.name(), version = %version, "ocr engine available");

            let options = ExtractOptions {
                preprocess,
                min_confidence: config.min_confidence,
                dump_text,
                keep_order,
            };
            let progress = ProgressBar::new(images.len() as u64).with_style(extractor::progress_style());
            let report = extractor::extract_images_with_jobs(
                &images, &engine, &pipeline, &options, &progress, jobs,
            )?;
            progress.finish_and_clear();

            println!(
                "✔ {}枚を処理（データなし: {}枚, 失敗: {}枚）",
                report.processed,
                report.empty.len(),
                report.failures.len()
            );
            for failure in &report.failures {
                println!("  ⚠ {}: {}", failure.file_name, failure.message);
            }
            println!();

            if report.records.is_empty() {
                return Err(error::NamaeError::NoRecords.into());
            }

            // 4. CSV出力
            println!("[4/4] CSVを保存中...");
            let output_path = export::output_path(output.as_deref());
            export::write_csv(&report.records, &output_path)?;
            println!("✔ {}件を保存: {}", report.records.len(), output_path.display());

            println!("\n✅ 抽出完了");
        }

        Commands::Resolve {
            names,
            tables,
            threshold,
        } => {
            let pipeline = load_pipeline(&config, tables, threshold)?;
            for name in &names {
                let identity = pipeline.resolve_identity(name);
                println!(
                    "{} → {} / {} ({})",
                    name, identity.english, identity.japanese, identity.resolution
                );
            }
        }

        Commands::Evaluate {
            image,
            expected,
            preprocess,
        } => {
            println!("🔍 namae-ocr - OCR精度評価\n");
            evaluate(&config, &image, &expected, preprocess)?;
        }

        Commands::Check => {
            let engine = TesseractCli::from_config(&config);
            let version = ocr::check_tesseract(&engine)?;
            println!("✔ Tesseract {} ({})", version, engine.cmd);
            match &engine.tessdata_prefix {
                Some(prefix) => println!("  TESSDATA_PREFIX: {}", prefix.display()),
                None => println!("  TESSDATA_PREFIX: 未設定"),
            }
            println!("  言語: {}", engine.language);
        }

        Commands::Config {
            show,
            set_tesseract_cmd,
            set_tessdata_prefix,
            set_threshold,
        } => {
            let mut config = config;
            let changed =
                set_tesseract_cmd.is_some() || set_tessdata_prefix.is_some() || set_threshold.is_some();

            if let Some(cmd) = set_tesseract_cmd {
                config.tesseract_cmd = cmd;
            }
            if let Some(prefix) = set_tessdata_prefix {
                config.tessdata_prefix = Some(prefix);
            }
            if let Some(threshold) = set_threshold {
                config.match_threshold = threshold;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  tesseract: {}", config.tesseract_cmd);
                println!(
                    "  TESSDATA_PREFIX: {}",
                    config
                        .tessdata_prefix
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".into())
                );
                println!("  言語: {} (psm {}, oem {}, dpi {})", config.language, config.psm, config.oem, config.dpi);
                println!("  名前テーブル: {}", config.table_dir.display());
                println!("  近似一致の閾値: {}", config.match_threshold);
                println!("  最小確信度: {}", config.min_confidence);
            }
        }
    }

    Ok(())
}

fn evaluate(
    config: &Config,
    image: &Path,
    expected: &Path,
    preprocess: namae_ocr::preprocess::PreprocessMethod,
) -> anyhow::Result<()> {
    let expected = ExpectedTexts::from_file(expected)
        .with_context(|| format!("期待テキストを読み込めません: {}", expected.display()))?;

    let engine = TesseractCli::from_config(config);
    let lines = extractor::ocr_image(&engine, image, preprocess)?;
    let lines: Vec<String> = ocr::filter_confident(lines, config.min_confidence)
        .into_iter()
        .map(|line| line.text)
        .collect();

    println!("抽出テキスト（前処理: {}）:", preprocess);
    for line in &lines {
        println!("  {}", line);
    }
    println!();

    let standard = TextEvaluator::compare(&lines, &expected.expected_texts);
    let normalized = TextEvaluator::compare_normalized(&lines, &expected.expected_texts);
    println!("標準精度: {:.2}%", standard);
    println!("正規化精度: {:.2}%", normalized);
    Ok(())
}
