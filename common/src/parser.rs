//! OCRテキスト行のパーサー
//!
//! 日付行（`2024年1月5日`）で現在の日付を更新し、それ以降の
//! ポイント行（`1,200pt 山田`）を1レコードとして取り出す。
//! 名前部分は NamePipeline で正規名へ解決する。

use crate::normalizer::fold_full_width;
use crate::pipeline::NamePipeline;
use crate::types::Record;
use chrono::{Datelike, NaiveDate};
use regex::Regex;

lazy_static::lazy_static! {
    // OCRで「日」が「晶」になることがある
    static ref DATE_RE: Regex =
        Regex::new(r"(\d{4})\s*年\s*(\d{1,2})\s*月\s*(\d{1,2})\s*[日晶]").unwrap();
    static ref PT_NAME_RE: Regex =
        Regex::new(r"([\d,\.]+)\s*[pPｐＰ]?[tTｔＴ]\s+(.*)").unwrap();
}

/// 日付行の解析結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateLine {
    /// `YYYY/MM/DD` 形式に整形済み
    Valid(String),
    /// 日付パターンには一致したが暦上存在しない
    Invalid,
}

/// 日付行なら整形した日付を返す。日付行でなければ None。
pub fn parse_date_line(line: &str) -> Option<DateLine> {
    let caps = DATE_RE.captures(line)?;

    let year = fold_full_width(&caps[1]).parse::<i32>().ok();
    let month = fold_full_width(&caps[2]).parse::<u32>().ok();
    let day = fold_full_width(&caps[3]).parse::<u32>().ok();

    let date = match (year, month, day) {
        (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d),
        _ => None,
    };

    Some(match date {
        Some(date) => DateLine::Valid(format!(
            "{:04}/{:02}/{:02}",
            date.year(),
            date.month(),
            date.day()
        )),
        None => DateLine::Invalid,
    })
}

/// ポイント行なら (ポイント, 名前断片) を返す
///
/// ポイントのカンマ・ドットは桁区切りとみなして除去する。
/// 数値にならない場合は None。
pub fn parse_points_line(line: &str) -> Option<(u64, &str)> {
    let caps = PT_NAME_RE.captures(line)?;
    let raw_points = caps.get(1)?.as_str();
    let raw_name = caps.get(2)?.as_str();

    let digits: String = fold_full_width(raw_points)
        .chars()
        .filter(|c| *c != ',' && *c != '.')
        .collect();

    match digits.parse::<u64>() {
        Ok(points) => Some((points, raw_name)),
        Err(_) => {
            tracing::debug!(line, raw_points, "points could not be parsed");
            None
        }
    }
}

/// OCRで得た行の並びからレコードを抽出する
pub fn extract_records<'a, I>(lines: I, pipeline: &NamePipeline) -> Vec<Record>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut records = Vec::new();
    let mut current_date: Option<String> = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(date_line) = parse_date_line(line) {
            current_date = match date_line {
                DateLine::Valid(date) => {
                    tracing::debug!(date = %date, line, "date detected");
                    Some(date)
                }
                DateLine::Invalid => {
                    tracing::warn!(line, "invalid date");
                    None
                }
            };
            continue;
        }

        let Some(date) = current_date.as_deref() else {
            continue;
        };

        let Some((points, raw_name)) = parse_points_line(line) else {
            tracing::debug!(line, "skipped line (no points)");
            continue;
        };

        let identity = pipeline.resolve_identity(raw_name);
        if identity.english.is_empty() || identity.japanese.is_empty() {
            tracing::debug!(line, "skipped record with empty name");
            continue;
        }

        tracing::debug!(
            date,
            points,
            name = %identity.english,
            namae = %identity.japanese,
            resolution = %identity.resolution,
            "record detected"
        );

        records.push(Record {
            date: date.to_string(),
            pt: points.to_string(),
            name: identity.english,
            namae: identity.japanese,
        });
    }

    records
}
