use std::sync::Arc;

use crate::engine::{run, TraversalOrder, WalkConfig};
use crate::entry::DirEntry;
use crate::error::BridgeError;
use crate::results::Listing;
use crate::traits::{Filter, Provider};

// ---------------------------------------------------------------------------
// ScanBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and running a one-off directory scan.
///
/// Created via [`vfs_bridge::scan()`](crate::scan). Configure with chained
/// builder methods, then call [`run()`](ScanBuilder::run) to execute.
///
/// # Example
///
/// ```rust,ignore
/// let listing = vfs_bridge::scan()
///     .provider(FileSystemProvider::new())
///     .root("file:///srv/music")
///     .extensions(["flac", "ogg"])
///     .collect_errors(true)
///     .run()?;
/// ```
#[derive(Default)]
pub struct ScanBuilder {
    provider: Option<Arc<dyn Provider>>,
    root:     Option<String>,
    filter:   Option<Box<dyn Filter>>,
    config:   WalkConfig,
}

impl ScanBuilder {
    // ── Provider ──────────────────────────────────────────────────────────

    /// Set the provider that performs all filesystem access.
    pub fn provider(mut self, p: impl Provider + 'static) -> Self {
        self.provider = Some(Arc::new(p));
        self
    }

    /// Use a provider that is shared with other scans or a [`Bridge`](crate::Bridge).
    pub fn shared_provider(mut self, p: Arc<dyn Provider>) -> Self {
        self.provider = Some(p);
        self
    }

    /// Address of the directory to scan.
    pub fn root(mut self, address: impl Into<String>) -> Self {
        self.root = Some(address.into());
        self
    }

    // ── Filter ────────────────────────────────────────────────────────────

    /// Set a custom filter. Closures `Fn(&DirEntry) -> bool` are accepted.
    pub fn filter(mut self, f: impl Filter + 'static) -> Self {
        self.filter = Some(Box::new(f));
        self
    }

    /// Keep only files whose name contains `pattern` (case-insensitive).
    pub fn matching(mut self, pattern: impl Into<String>) -> Self {
        self.filter = Some(Box::new(NameContains {
            pattern: pattern.into().to_lowercase(),
        }));
        self
    }

    /// Keep only files with one of the given extensions (case-insensitive,
    /// without the leading dot).
    pub fn extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filter = Some(Box::new(ExtensionSet {
            exts: exts.into_iter().map(|e| e.as_ref().to_lowercase()).collect(),
        }));
        self
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Order in which discovered directories are expanded.
    /// Defaults to [`TraversalOrder::DepthFirst`].
    pub fn order(mut self, order: TraversalOrder) -> Self {
        self.config.order = order;
        self
    }

    /// Truncate result names to fit a fixed record of `cap` slots
    /// (terminator included). Unbounded by default.
    pub fn name_capacity(mut self, cap: usize) -> Self {
        self.config.name_capacity = Some(cap);
        self
    }

    /// Skip directories already reached through another path (symlinks,
    /// aliased mounts). Disabled by default: without it a symlink cycle
    /// never terminates.
    pub fn dedupe(mut self, yes: bool) -> Self {
        self.config.dedupe = yes;
        self
    }

    /// Collect skipped-branch faults into [`Listing::errors`].
    pub fn collect_errors(mut self, yes: bool) -> Self {
        self.config.collect_errors = yes;
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Execute the scan and return the listing.
    ///
    /// Blocks until every reachable directory has been listed.
    ///
    /// # Errors
    ///
    /// Returns `Err` when no provider or root was set, or when the root
    /// itself cannot be resolved or listed. Faults below the root never fail
    /// the scan.
    pub fn run(self) -> Result<Listing, BridgeError> {
        let provider = self
            .provider
            .ok_or_else(|| BridgeError::Provider("no provider set".into()))?;
        let root = self
            .root
            .ok_or_else(|| BridgeError::InvalidAddress("no root set".into()))?;

        run(provider.as_ref(), &root, self.filter.as_deref(), &self.config)
    }
}

// ---------------------------------------------------------------------------
// Built-in filters
// ---------------------------------------------------------------------------

struct NameContains {
    pattern: String,
}

impl Filter for NameContains {
    fn accept(&self, entry: &DirEntry) -> bool {
        entry.name.to_lowercase().contains(&self.pattern)
    }
}

struct ExtensionSet {
    exts: Vec<String>,
}

impl Filter for ExtensionSet {
    fn accept(&self, entry: &DirEntry) -> bool {
        match entry.name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                let ext = ext.to_lowercase();
                self.exts.iter().any(|e| *e == ext)
            }
            _ => false,
        }
    }
}
