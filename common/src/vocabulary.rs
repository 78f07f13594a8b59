//! 名前語彙（namae列 → name列の対応表）
//!
//! 宣言順を保持する。近似一致の同点時はこの順で先頭が勝つ。

use crate::error::{Error, Result};
use crate::types::NameEntry;
use std::collections::HashMap;

/// 既知の正規名の閉じた集合
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Vec<NameEntry>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// (英語, 日本語) の組から構築する
    ///
    /// 日本語表示名の重複・空文字は設定エラー。
    pub fn from_pairs<I, E, J>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (E, J)>,
        E: Into<String>,
        J: Into<String>,
    {
        Self::from_entries(pairs.into_iter().map(|(e, j)| NameEntry::new(e, j)))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = NameEntry>) -> Result<Self> {
        let mut vocabulary = Self::default();

        for entry in entries {
            if entry.japanese.is_empty() {
                return Err(Error::Config(format!(
                    "empty japanese name for `{}` in name table",
                    entry.english
                )));
            }
            if vocabulary.index.contains_key(&entry.japanese) {
                return Err(Error::Config(format!(
                    "duplicate japanese name `{}` in name table",
                    entry.japanese
                )));
            }
            vocabulary
                .index
                .insert(entry.japanese.clone(), vocabulary.entries.len());
            vocabulary.entries.push(entry);
        }

        Ok(vocabulary)
    }

    /// 日本語表示名で完全一致検索
    pub fn get(&self, japanese: &str) -> Option<&NameEntry> {
        self.index.get(japanese).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, japanese: &str) -> bool {
        self.index.contains_key(japanese)
    }

    /// 宣言順のエントリ
    pub fn entries(&self) -> &[NameEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
