use std::collections::HashMap;

use romeotag_core::{IdentityKey, PolicyLookup};

use crate::error::Result;
use crate::source::{PolicyRegistry, RegistryQuery};

/// Lookups already made during this run, keyed by journal identity.
pub type RunCache = HashMap<IdentityKey, PolicyLookup>;

/// How a lookup result was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Served from the run cache; no registry query was made.
    Cached(PolicyLookup),
    FoundByIssn(PolicyLookup),
    FoundByTitle(PolicyLookup),
    /// Every applicable query came back empty. Still cached.
    NotFound(PolicyLookup),
}

impl Resolution {
    pub fn lookup(&self) -> &PolicyLookup {
        match self {
            Resolution::Cached(l)
            | Resolution::FoundByIssn(l)
            | Resolution::FoundByTitle(l)
            | Resolution::NotFound(l) => l,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Resolution::Cached(_))
    }
}

/// Memoizing front of the policy registry, scoped to one run.
pub struct PolicyResolver<'a> {
    registry: &'a dyn PolicyRegistry,
    cache: RunCache,
    queries: u32,
}

impl<'a> PolicyResolver<'a> {
    pub fn new(registry: &'a dyn PolicyRegistry) -> Self {
        Self {
            registry,
            cache: RunCache::new(),
            queries: 0,
        }
    }

    /// Cached entries are returned as-is, even with zero hits. Otherwise
    /// ISSN is tried first and title only when ISSN is absent or empty-handed.
    ///
    /// A failed registry query leaves the cache untouched for `key`.
    pub async fn resolve(
        &mut self,
        key: &IdentityKey,
        issn: Option<&str>,
        title: Option<&str>,
    ) -> Result<Resolution> {
        if let Some(cached) = self.cache.get(key) {
            tracing::debug!(%key, hits = cached.hits, "run cache hit");
            return Ok(Resolution::Cached(cached.clone()));
        }

        let resolution = self.query_registry(issn, title).await?;
        self.cache.insert(key.clone(), resolution.lookup().clone());
        Ok(resolution)
    }

    async fn query_registry(&mut self, issn: Option<&str>, title: Option<&str>) -> Result<Resolution> {
        let mut by_issn = None;
        if let Some(issn) = issn {
            let lookup = self.query(RegistryQuery::Issn(issn)).await?;
            if lookup.hits > 0 {
                return Ok(Resolution::FoundByIssn(lookup));
            }
            by_issn = Some(lookup);
        }

        if let Some(title) = title {
            let lookup = self.query(RegistryQuery::Title(title)).await?;
            return Ok(if lookup.hits > 0 {
                Resolution::FoundByTitle(lookup)
            } else {
                Resolution::NotFound(lookup)
            });
        }

        Ok(Resolution::NotFound(by_issn.unwrap_or_default()))
    }

    async fn query(&mut self, query: RegistryQuery<'_>) -> Result<PolicyLookup> {
        self.queries += 1;
        self.registry.lookup(query).await
    }

    /// Registry queries issued so far, including failed ones.
    pub fn queries(&self) -> u32 {
        self.queries
    }

    pub fn cache(&self) -> &RunCache {
        &self.cache
    }
}
