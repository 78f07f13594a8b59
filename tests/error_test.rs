//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use namae_ocr::config::Config;
use namae_ocr::error::NamaeError;
use namae_ocr::ocr::{check_tesseract, OcrEngine, TesseractCli};
use namae_ocr::scanner;
use namae_ocr_common::{NamePipeline, NameTables};
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(NamaeError::FolderNotFound(_))));
}

/// 画像のないフォルダをスキャンした場合
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");

    // 画像以外のみ作成
    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    // 空フォルダはエラーではなく空のVecを返す
    let result = scanner::scan_folder(dir.path()).unwrap();
    assert!(result.is_empty());
}

/// 名前テーブルのディレクトリが存在しない場合
#[test]
fn test_missing_table_dir() {
    let result = NameTables::load_dir(Path::new("/nonexistent/tables"));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("name_data.json"), "{}", err);
}

/// 不正な正規表現を含む誤認識パターン
#[test]
fn test_invalid_error_pattern() {
    let result = NameTables::from_json(
        r#"{"name_table": [["Yamada", "山田"]]}"#,
        r#"{"error_patterns": ["(unclosed"]}"#,
        r#"{"special_name_mapping": {"default_empty": {"english": "Unknown", "japanese": "不明"}}}"#,
    );
    assert!(matches!(result, Err(namae_ocr_common::Error::Pattern { .. })));
}

/// 閾値が範囲外の場合はパイプラインを作らない
#[test]
fn test_threshold_out_of_range() {
    let tables = NameTables::from_json(
        r#"{"name_table": [["Yamada", "山田"]]}"#,
        r#"{"error_patterns": []}"#,
        r#"{"special_name_mapping": {"default_empty": {"english": "Unknown", "japanese": "不明"}}}"#,
    )
    .unwrap();
    assert!(NamePipeline::new(tables, 101).is_err());
}

/// tesseractが見つからない場合
#[test]
fn test_tesseract_not_found() {
    let config = Config {
        tesseract_cmd: "/nonexistent/tesseract-12345".into(),
        ..Default::default()
    };
    let engine = TesseractCli::from_config(&config);

    let err = check_tesseract(&engine).unwrap_err();
    assert!(matches!(err, NamaeError::TesseractNotFound(_)));
    assert!(err.to_string().contains("Tesseract"));

    assert!(engine.extract(Path::new("dummy.png")).is_err());
}

/// 共通ライブラリのエラーはそのままのメッセージで包む
#[test]
fn test_common_error_transparent() {
    let inner = namae_ocr_common::Error::Config("name_table is empty".into());
    let message = inner.to_string();
    let err: NamaeError = inner.into();
    assert_eq!(err.to_string(), message);
}

/// NamaeErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        NamaeError::Config("テスト設定エラー".to_string()),
        NamaeError::FileNotFound("expected.json".to_string()),
        NamaeError::FolderNotFound("/path/to/folder".to_string()),
        NamaeError::ImageLoad("broken.png".to_string()),
        NamaeError::Ocr("exit 1".to_string()),
        NamaeError::NoImagesFound("フォルダ".to_string()),
        NamaeError::NoRecords,
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}
