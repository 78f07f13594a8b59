mod csv_file;

pub use csv_file::{read_csv, write_csv, CSV_HEADER};

use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "output.csv";

/// 出力先を決める（ディレクトリ指定なら `output.csv` を付ける）
pub fn output_path(output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => path.join(DEFAULT_OUTPUT),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(DEFAULT_OUTPUT),
    }
}
