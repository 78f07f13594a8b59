use thiserror::Error;

#[derive(Error, Debug)]
pub enum NamaeError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("Tesseract OCRが見つかりません（{0}）。インストールとパス設定を確認してください")]
    TesseractNotFound(String),

    #[error("OCR実行エラー: {0}")]
    Ocr(String),

    #[error("CSV書き込みエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("どの画像からもデータが抽出できません。OCRの精度や画像内容を確認してください")]
    NoRecords,

    #[error(transparent)]
    Common(#[from] namae_ocr_common::Error),
}

pub type Result<T> = std::result::Result<T, NamaeError>;
