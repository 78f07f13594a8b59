//! CSV出力（UTF-8 BOM付き。Excelでそのまま開ける）

use crate::error::Result;
use namae_ocr_common::Record;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

pub const CSV_HEADER: [&str; 4] = ["date", "pt", "name", "namae"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn write_csv(records: &[Record], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(UTF8_BOM)?;

    // レコードが0件でもヘッダーは書く
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    tracing::info!(path = %path.display(), records = records.len(), "csv written");
    Ok(())
}

/// 書き出したCSVを読み戻す（BOMは読み飛ばす）
pub fn read_csv(path: &Path) -> Result<Vec<Record>> {
    let mut content = Vec::new();
    File::open(path)?.read_to_end(&mut content)?;
    let body = content.strip_prefix(UTF8_BOM).unwrap_or(&content[..]);

    let mut reader = csv::Reader::from_reader(body);
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<Record>, _>>()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, pt: &str, name: &str, namae: &str) -> Record {
        Record {
            date: date.into(),
            pt: pt.into(),
            name: name.into(),
            namae: namae.into(),
        }
    }

    #[test]
    fn test_write_csv_with_bom_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("output.csv");
        let records = vec![
            record("2024/01/05", "1200", "Yamada", "山田"),
            record("2024/01/06", "50", "Sato, Hanako", "佐藤花子"),
        ];

        write_csv(&records, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert_eq!(
            text,
            "date,pt,name,namae\n2024/01/05,1200,Yamada,山田\n2024/01/06,50,\"Sato, Hanako\",佐藤花子\n"
        );

        assert_eq!(read_csv(&path).unwrap(), records);
    }

    #[test]
    fn test_write_empty_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_csv(&[], &path).unwrap();
        assert!(read_csv(&path).unwrap().is_empty());
    }
}
