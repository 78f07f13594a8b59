//! namae-ocr
//!
//! ポイント履歴のスクリーンショットをOCRし、日付・ポイント・名前を
//! CSVに書き出す。名前の補正は `namae_ocr_common` が担う。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod extractor;
pub mod ocr;
pub mod preprocess;
pub mod scanner;
