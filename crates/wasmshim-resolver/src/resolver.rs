//! Version resolver: lookup table, archive and cache combined

use crate::cache::{CacheStats, ContentCache};
use crate::error::{ResolveError, ResolveResult};
use crate::source::ShimSource;
use crate::table::LookupTable;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, warn};
use wasmshim_crypto::Fingerprint;
use wasmshim_formats::ArchiveReader;

/// Resolves toolchain versions to shim content
///
/// Lookups go through the cache first. On a miss the version is mapped to a
/// fingerprint, the source is scanned for it, and the returned bytes are
/// hashed again before they are cached.
///
/// # Examples
///
/// ```
/// use wasmshim_formats::{ArchiveBuilder, ArchiveReader};
/// use wasmshim_resolver::{LookupTable, VersionResolver};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut builder = ArchiveBuilder::new();
/// let fingerprint = builder.add(b"A".to_vec());
/// let archive = ArchiveReader::new(builder.build()?.data);
///
/// let table = LookupTable::from_pairs([("go1.21.0", fingerprint)]);
/// let resolver = VersionResolver::new(table, archive, "go1.21.0");
///
/// assert_eq!(&resolver.current()?[..], b"A");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct VersionResolver<S = ArchiveReader> {
    table: LookupTable,
    source: S,
    cache: Arc<ContentCache>,
    current_version: String,
}

impl<S: ShimSource> VersionResolver<S> {
    /// Create a resolver with an empty cache
    ///
    /// `current_version` is the embedding process's own toolchain version,
    /// used by [`current`](Self::current).
    pub fn new(table: LookupTable, source: S, current_version: impl Into<String>) -> Self {
        Self {
            table,
            source,
            cache: Arc::new(ContentCache::new()),
            current_version: current_version.into(),
        }
    }

    /// Use a caller-owned cache
    ///
    /// The cache must only ever be shared between resolvers over the same
    /// table and archive.
    pub fn with_cache(mut self, cache: Arc<ContentCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Shim content for `version`
    pub fn content(&self, version: &str) -> ResolveResult<Bytes> {
        self.cache.get_or_try_insert_with(version, || {
            debug!(version, "shim cache miss");
            self.load(version)
        })
    }

    /// Shim content for the configured current version
    pub fn current(&self) -> ResolveResult<Bytes> {
        self.content(&self.current_version)
    }

    /// Resolve and cache every version in the table
    ///
    /// Returns the number of versions resolved. Stops at the first failure.
    pub fn preload_all(&self) -> ResolveResult<usize> {
        let versions = self.table.versions();
        for version in &versions {
            self.content(version)?;
        }
        Ok(versions.len())
    }

    /// Current toolchain version
    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    /// Lookup table
    pub fn table(&self) -> &LookupTable {
        &self.table
    }

    /// Content source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Shared cache handle
    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }

    /// Cache counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn load(&self, version: &str) -> ResolveResult<Bytes> {
        let expected = self.table.resolve(version)?;
        let content = self
            .source
            .find_by_fingerprint(&expected)
            .map_err(|e| ResolveError::from_archive(version, e))?;

        let actual = Fingerprint::from_data(&content);
        if actual != expected {
            warn!(version, %expected, %actual, "shim content failed integrity check");
            return Err(ResolveError::IntegrityMismatch {
                version: version.to_string(),
                expected,
                actual,
            });
        }

        debug!(version, fingerprint = %expected.short(), bytes = content.len(), "resolved shim");
        Ok(content)
    }
}
