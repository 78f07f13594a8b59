//! 名前解決パイプライン: `resolve(normalize(raw))`
//!
//! 行パーサーから呼ばれる唯一の入口。状態を持たないので
//! `&NamePipeline` を複数スレッドで共有できる。

use crate::error::Result;
use crate::normalizer::TextNormalizer;
use crate::resolver::IdentityResolver;
use crate::tables::NameTables;
use crate::types::ResolvedIdentity;

#[derive(Debug, Clone)]
pub struct NamePipeline {
    normalizer: TextNormalizer,
    resolver: IdentityResolver,
}

impl NamePipeline {
    pub fn new(tables: NameTables, threshold: u8) -> Result<Self> {
        let normalizer = TextNormalizer::new(tables.error_patterns, tables.rules)?;
        let resolver = IdentityResolver::new(tables.vocabulary, tables.special_cases, threshold)?;
        Ok(Self {
            normalizer,
            resolver,
        })
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    /// 生の名前断片を正規名へ解決する
    pub fn resolve_identity(&self, raw_name: &str) -> ResolvedIdentity {
        let normalized = self.normalizer.normalize(raw_name);
        self.resolver.resolve(&normalized)
    }
}
