//! 抽出パイプラインの統合テスト
//!
//! 名前テーブルをディレクトリから読み込み、偽のOCRエンジンで
//! スキャン → OCR → 名前補正 → CSV出力 までを通す。

use indicatif::ProgressBar;
use namae_ocr::error::{NamaeError, Result};
use namae_ocr::export::{read_csv, write_csv};
use namae_ocr::extractor::{extract_images, ExtractOptions};
use namae_ocr::ocr::{OcrEngine, OcrLine};
use namae_ocr::preprocess::PreprocessMethod;
use namae_ocr::scanner;
use namae_ocr_common::{NamePipeline, NameTables, Record};
use std::path::Path;
use tempfile::tempdir;

const NAME_DATA: &str = r#"{
  "name_table": [
    ["Yamada", "山田太郎"],
    ["Sato", "佐藤花子"],
    ["Suzuki", "鈴木"]
  ]
}"#;

const ERROR_PATTERNS: &str = r#"{"error_patterns": ["を$", "^の"]}"#;

const SENSITIVE_DATA: &str = r#"{
  "name_normalization_rules": [
    {"keywords": ["すずき", "スズキ"], "normalized_name": "鈴木"},
    {"pattern": "^(山田)\\s*(太郎)$", "replacement": "$1$2"}
  ],
  "special_name_mapping": {
    "default_empty": {"english": "Unknown", "japanese": "不明"},
    "special_cases": [
      {"trigger_keywords": ["運営"], "target": {"english": "Admin", "japanese": "運営事務局"}}
    ]
  }
}"#;

fn write_tables(dir: &Path) {
    std::fs::write(dir.join("name_data.json"), NAME_DATA).unwrap();
    std::fs::write(dir.join("error_patterns.json"), ERROR_PATTERNS).unwrap();
    std::fs::write(dir.join("sensitive_data.json"), SENSITIVE_DATA).unwrap();
}

fn load_pipeline(dir: &Path) -> NamePipeline {
    write_tables(dir);
    let tables = NameTables::load_dir(dir).expect("テーブル読み込み失敗");
    NamePipeline::new(tables, 60).unwrap()
}

/// 画像ファイルの内容をテキストとして読む偽OCR
struct TextFileOcr;

impl OcrEngine for TextFileOcr {
    fn name(&self) -> &str {
        "text-file"
    }

    fn extract(&self, image_path: &Path) -> Result<Vec<OcrLine>> {
        let content = std::fs::read_to_string(image_path)
            .map_err(|e| NamaeError::Ocr(format!("{}: {}", image_path.display(), e)))?;
        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(OcrLine::new)
            .collect())
    }
}

fn record(date: &str, pt: &str, name: &str, namae: &str) -> Record {
    Record {
        date: date.into(),
        pt: pt.into(),
        name: name.into(),
        namae: namae.into(),
    }
}

#[test]
fn test_resolution_scenarios() {
    let dir = tempdir().unwrap();
    let pipeline = load_pipeline(dir.path());

    let cases = [
        ("山田　太郎を", ("Yamada", "山田太郎")),
        ("すずきさん", ("Suzuki", "鈴木")),
        ("運営からのお知らせ", ("Admin", "運営事務局")),
        ("佐籐花子", ("Sato", "佐藤花子")),
        ("", ("Unknown", "不明")),
        ("★☆", ("Unknown", "不明")),
        ("田中一郎", ("田中一郎", "田中一郎")),
    ];

    for (raw, expected) in cases {
        let identity = pipeline.resolve_identity(raw);
        assert_eq!(identity.pair(), expected, "input: {:?}", raw);
    }
}

#[test]
fn test_extract_folder_to_csv() {
    let tables_dir = tempdir().unwrap();
    let pipeline = load_pipeline(tables_dir.path());

    let screens = tempdir().unwrap();
    std::fs::write(
        screens.path().join("IMG_0001.png"),
        "ポイント履歴\n2024年3月2日\n1,200pt 山田 太郎を\n80pt スズキ\n",
    )
    .unwrap();
    std::fs::write(
        screens.path().join("IMG_0002.PNG"),
        "2024年3月1日\n300ｐｔ 佐籐花子\n",
    )
    .unwrap();
    std::fs::write(screens.path().join("IMG_0003.jpg"), "読み取れない画像\n").unwrap();
    std::fs::write(screens.path().join("memo.txt"), "2024年3月3日\n10pt 山田太郎\n").unwrap();

    let images = scanner::scan_folder(screens.path()).unwrap();
    assert_eq!(images.len(), 3);

    let options = ExtractOptions {
        preprocess: PreprocessMethod::None,
        ..Default::default()
    };
    let report = extract_images(&images, &TextFileOcr, &pipeline, &options, &ProgressBar::hidden());
    assert_eq!(report.processed, 3);
    assert_eq!(report.empty, vec!["IMG_0003.jpg"]);
    assert!(report.failures.is_empty());

    // 既定では全体を逆順にする
    let expected = vec![
        record("2024/03/01", "300", "Sato", "佐藤花子"),
        record("2024/03/02", "80", "Suzuki", "鈴木"),
        record("2024/03/02", "1200", "Yamada", "山田太郎"),
    ];
    assert_eq!(report.records, expected);

    let out = tempdir().unwrap();
    let csv_path = out.path().join("output.csv");
    write_csv(&report.records, &csv_path).unwrap();
    assert_eq!(read_csv(&csv_path).unwrap(), expected);
}

#[test]
fn test_unreadable_image_is_skipped() {
    let tables_dir = tempdir().unwrap();
    let pipeline = load_pipeline(tables_dir.path());

    let screens = tempdir().unwrap();
    std::fs::write(screens.path().join("a.png"), "2024年3月1日\n5pt 鈴木\n").unwrap();
    // UTF-8として読めないファイル
    std::fs::write(screens.path().join("b.png"), [0xff, 0xfe, 0x00, 0x89]).unwrap();

    let images = scanner::scan_folder(screens.path()).unwrap();
    let options = ExtractOptions {
        preprocess: PreprocessMethod::None,
        keep_order: true,
        ..Default::default()
    };
    let report = extract_images(&images, &TextFileOcr, &pipeline, &options, &ProgressBar::hidden());

    assert_eq!(report.records, vec![record("2024/03/01", "5", "Suzuki", "鈴木")]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file_name, "b.png");
}

#[test]
fn test_preprocessing_rejects_non_image() {
    let tables_dir = tempdir().unwrap();
    let pipeline = load_pipeline(tables_dir.path());

    let screens = tempdir().unwrap();
    std::fs::write(screens.path().join("fake.png"), "2024年3月1日\n5pt 鈴木\n").unwrap();

    let images = scanner::scan_folder(screens.path()).unwrap();
    let report = extract_images(
        &images,
        &TextFileOcr,
        &pipeline,
        &ExtractOptions::default(),
        &ProgressBar::hidden(),
    );

    assert!(report.records.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].message.contains("fake.png"));
}
