use std::cmp::Ordering;
use std::sync::Arc;

use crate::engine::{run, TraversalOrder, WalkConfig};
use crate::entry::{DirEntry, DIRENT_NAME_CAPACITY};
use crate::error::BridgeError;
use crate::location::scheme_of;
use crate::results::Listing;
use crate::stream::Stream;
use crate::traits::{Filter, Provider};

/// Schemes advertised to the host when none are configured.
pub const DEFAULT_SCHEMES: &[&str] = &["smb://", "sftp://", "http://"];

/// Static description of the plugin as the host registers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    pub id:            &'static str,
    pub name:          &'static str,
    pub description:   &'static str,
    pub copyright:     &'static str,
    /// Project home page; empty when the package declares none.
    pub website:       &'static str,
    pub api_version:   (u32, u32),
    pub version:       (u32, u32),
}

pub const PLUGIN_INFO: PluginInfo = PluginInfo {
    id:          "vfs_bridge",
    name:        "VFS bridge",
    description: "Remote filesystem access (SMB, SFTP, HTTP) through a VFS provider",
    copyright:   env!("CARGO_PKG_LICENSE"),
    website:     env!("CARGO_PKG_REPOSITORY"),
    api_version: (1, 0),
    version:     (0, 1),
};

/// Comparator shape accepted by [`Bridge::scandir`].
pub type Comparator<'a> = &'a dyn Fn(&DirEntry, &DirEntry) -> Ordering;

// ---------------------------------------------------------------------------
// BridgeBuilder
// ---------------------------------------------------------------------------

/// Configuration for a [`Bridge`], created via [`Bridge::builder()`].
pub struct BridgeBuilder {
    provider: Arc<dyn Provider>,
    schemes:  Vec<String>,
    config:   WalkConfig,
}

impl BridgeBuilder {
    /// Replace the advertised scheme table. Entries are prefixes such as
    /// `"smb://"`.
    pub fn schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    /// Traversal order used by [`Bridge::scandir`].
    pub fn order(mut self, order: TraversalOrder) -> Self {
        self.config.order = order;
        self
    }

    /// Output name capacity for `scandir`, terminator included.
    /// Defaults to [`DIRENT_NAME_CAPACITY`].
    pub fn name_capacity(mut self, cap: usize) -> Self {
        self.config.name_capacity = Some(cap);
        self
    }

    /// Never truncate `scandir` names.
    pub fn unbounded_names(mut self) -> Self {
        self.config.name_capacity = None;
        self
    }

    /// Skip directories already reached through another path.
    pub fn dedupe(mut self, yes: bool) -> Self {
        self.config.dedupe = yes;
        self
    }

    /// Keep skipped-branch faults in [`Listing::errors`].
    pub fn collect_errors(mut self, yes: bool) -> Self {
        self.config.collect_errors = yes;
        self
    }

    /// Start the plugin.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Inactive`] if the provider reports it is not
    /// running; the host should leave the plugin disabled.
    pub fn start(self) -> Result<Bridge, BridgeError> {
        if !self.provider.is_active() {
            log::warn!("provider not active, {} disabled", PLUGIN_INFO.id);
            return Err(BridgeError::Inactive);
        }
        log::debug!("{} started, schemes {:?}", PLUGIN_INFO.id, self.schemes);
        Ok(Bridge {
            provider: self.provider,
            schemes:  self.schemes,
            config:   self.config,
        })
    }
}

// ---------------------------------------------------------------------------
// Bridge
// ---------------------------------------------------------------------------

/// The plugin instance the host talks to.
///
/// Created once at startup with [`Bridge::start`] (or [`Bridge::builder`])
/// and passed to every host operation. [`Bridge::stop`] tears it down.
pub struct Bridge {
    provider: Arc<dyn Provider>,
    schemes:  Vec<String>,
    config:   WalkConfig,
}

impl Bridge {
    pub fn builder(provider: impl Provider + 'static) -> BridgeBuilder {
        Self::builder_shared(Arc::new(provider))
    }

    pub fn builder_shared(provider: Arc<dyn Provider>) -> BridgeBuilder {
        BridgeBuilder {
            provider,
            schemes: DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect(),
            config: WalkConfig {
                name_capacity: Some(DIRENT_NAME_CAPACITY),
                ..WalkConfig::default()
            },
        }
    }

    /// Start with default settings.
    pub fn start(provider: impl Provider + 'static) -> Result<Bridge, BridgeError> {
        Self::builder(provider).start()
    }

    /// Tear the plugin down, releasing the provider.
    pub fn stop(self) {
        log::debug!("{} stopped", PLUGIN_INFO.id);
    }

    pub fn info(&self) -> &'static PluginInfo {
        &PLUGIN_INFO
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Scheme prefixes the host should route to this plugin.
    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }

    /// Whether `address` starts with one of the advertised schemes.
    pub fn supports(&self, address: &str) -> bool {
        let Some(scheme) = scheme_of(address) else {
            return false;
        };
        self.schemes
            .iter()
            .any(|s| s.trim_end_matches("://").eq_ignore_ascii_case(scheme))
    }

    pub fn is_streaming(&self) -> bool {
        false
    }

    pub fn is_container(&self, _address: &str) -> bool {
        false
    }

    /// Open `address` for reading.
    ///
    /// The content type is queried first; failing that query fails the open.
    pub fn open(&self, address: &str) -> Result<Stream, BridgeError> {
        log::debug!("open {address}");
        if !self.supports(address) {
            return Err(BridgeError::UnsupportedScheme(address.to_owned()));
        }

        let location = self.provider.resolve(address)?;
        let content_type = self.provider.content_type(&location).inspect_err(|e| {
            log::warn!("cannot query {address}: {e}");
        })?;
        let handle = self.provider.open(&location).inspect_err(|e| {
            log::warn!("cannot open {address} for reading: {e}");
        })?;

        Ok(Stream::new(self.provider.address_of(&location), content_type, handle))
    }

    /// List every file below `address`.
    ///
    /// `selector` sees each file's bare name. `comparator` is accepted for
    /// host compatibility and not applied; callers sort with
    /// [`Listing::sort_by`].
    ///
    /// # Errors
    ///
    /// Fails only if the root's scheme is not advertised, or the root itself
    /// cannot be resolved or listed.
    pub fn scandir(
        &self,
        address: &str,
        selector: Option<&dyn Filter>,
        comparator: Option<Comparator<'_>>,
    ) -> Result<Listing, BridgeError> {
        if comparator.is_some() {
            log::debug!("scandir {address}: comparator ignored");
        }
        if !self.supports(address) {
            return Err(BridgeError::UnsupportedScheme(address.to_owned()));
        }
        run(self.provider.as_ref(), address, selector, &self.config)
    }
}
