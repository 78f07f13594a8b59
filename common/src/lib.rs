//! namae-ocr common library
//!
//! OCRで読み取った名前断片を正規名へ復元するコア処理。
//! 画像・OCRエンジンには依存しない純粋な関数群。

pub mod error;
pub mod types;
pub mod vocabulary;
pub mod rules;
pub mod tables;
pub mod normalizer;
pub mod fuzzy;
pub mod resolver;
pub mod pipeline;
pub mod parser;
pub mod evaluation;

pub use error::{Error, Result};
pub use types::{NameEntry, Record, ResolvedIdentity, Resolution};
pub use vocabulary::Vocabulary;
pub use rules::{ErrorPattern, NormalizationRule, SpecialCase, SpecialCases};
pub use tables::NameTables;
pub use normalizer::{fold_full_width, TextNormalizer};
pub use fuzzy::{best_match, similarity_score};
pub use resolver::{IdentityResolver, DEFAULT_MATCH_THRESHOLD};
pub use pipeline::NamePipeline;
pub use parser::{extract_records, parse_date_line, parse_points_line, DateLine};
pub use evaluation::{ExpectedTexts, TextEvaluator};
