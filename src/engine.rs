use std::collections::{HashSet, VecDeque};
use std::time::Instant;

use crate::entry::{DirEntry, FileKind};
use crate::error::BridgeError;
use crate::location::Location;
use crate::results::{Listing, ScanStats};
use crate::traits::{Children, Filter, Provider};

// ---------------------------------------------------------------------------
// WalkConfig
// ---------------------------------------------------------------------------

/// Which pending directory is expanded next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    /// Newly found directories go to the front of the worklist, so the most
    /// recently discovered subdirectory is expanded first.
    #[default]
    DepthFirst,

    /// Newly found directories go to the back of the worklist; a level is
    /// finished before the next one starts.
    BreadthFirst,
}

/// Traversal parameters passed from the builders to the engine.
#[derive(Debug, Clone, Default)]
pub struct WalkConfig {
    pub order:          TraversalOrder,
    /// Fixed output record capacity, terminator included. `None` = unbounded.
    pub name_capacity:  Option<usize>,
    /// Skip directories whose canonical address was already visited.
    pub dedupe:         bool,
    pub collect_errors: bool,
}

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// Walk every directory below `root` and collect the files it contains.
///
/// Blocking and single-threaded: every provider call runs on the caller's
/// thread. Faults below the root are logged and that branch is skipped.
///
/// The root is stricter: failing to resolve it, or failing to open its
/// listing, returns `Err`, so an unreachable root never looks like an empty
/// one. Once the root's listing is open, a fault part way through it is
/// handled like any other directory: earlier children are kept and the scan
/// returns `Ok`.
pub(crate) fn run(
    provider: &dyn Provider,
    root:     &str,
    filter:   Option<&dyn Filter>,
    config:   &WalkConfig,
) -> Result<Listing, BridgeError> {
    let start = Instant::now();

    let root = provider.resolve(root)?;
    log::debug!("scan {root} ({:?})", config.order);

    let mut walk = Walk {
        provider,
        filter,
        config,
        entries: Vec::new(),
        errors:  Vec::new(),
        stats:   ScanStats::default(),
        visited: HashSet::new(),
    };
    let mut pending = VecDeque::new();

    if config.dedupe {
        walk.first_visit(&root);
    }
    let children = provider.list_children(&root)?;
    walk.expand(&root, children, &mut pending);

    while let Some(dir) = pending.pop_front() {
        match provider.list_children(&dir) {
            Ok(children) => walk.expand(&dir, children, &mut pending),
            Err(e)       => walk.skip(&dir, e),
        }
    }

    walk.stats.duration = start.elapsed();
    log::debug!(
        "scan {root} done: {} entries, {} dirs, {} skipped",
        walk.entries.len(),
        walk.stats.dirs,
        walk.stats.skipped
    );

    Ok(Listing {
        entries: walk.entries,
        stats:   walk.stats,
        errors:  walk.errors,
    })
}

// ---------------------------------------------------------------------------
// Walk state
// ---------------------------------------------------------------------------

struct Walk<'a> {
    provider: &'a dyn Provider,
    filter:   Option<&'a dyn Filter>,
    config:   &'a WalkConfig,
    entries:  Vec<DirEntry>,
    errors:   Vec<BridgeError>,
    stats:    ScanStats,
    visited:  HashSet<String>,
}

impl Walk<'_> {
    /// Consume one directory's listing. `children` is dropped on return,
    /// which releases the provider's listing handle on every path.
    fn expand(&mut self, dir: &Location, children: Children<'_>, pending: &mut VecDeque<Location>) {
        self.stats.dirs += 1;

        for child in children {
            match child {
                Ok(name) => self.visit(dir, &name, pending),
                Err(e @ BridgeError::InvalidName { .. }) => {
                    // Only this child is unreachable; its siblings still list.
                    log::warn!("skipping entry: {e}");
                    self.record(e);
                }
                Err(e) => {
                    // Keep what was already yielded, abandon the rest.
                    self.skip(dir, e);
                    break;
                }
            }
        }
    }

    fn visit(&mut self, dir: &Location, name: &str, pending: &mut VecDeque<Location>) {
        let child = self.provider.child(dir, name);

        let kind = match self.provider.type_of(&child) {
            Ok(kind) => kind,
            Err(e) => {
                log::warn!("cannot query type of {child}, treating as file: {e}");
                self.record(e);
                FileKind::Other
            }
        };

        if kind.is_dir() {
            if self.config.dedupe && !self.first_visit(&child) {
                log::debug!("already visited {child}");
                return;
            }
            match self.config.order {
                TraversalOrder::DepthFirst   => pending.push_front(child),
                TraversalOrder::BreadthFirst => pending.push_back(child),
            }
            return;
        }

        self.stats.files += 1;

        if let Some(filter) = self.filter {
            let view = DirEntry::with_capacity(name, self.config.name_capacity);
            if !filter.accept(&view) {
                return;
            }
        }

        let address = self.provider.address_of(&child);
        self.entries.push(DirEntry::with_capacity(&address, self.config.name_capacity));
    }

    /// Returns `false` if `dir` (or an alias of it) was seen before.
    fn first_visit(&mut self, dir: &Location) -> bool {
        let key = self
            .provider
            .canonical_address(dir)
            .unwrap_or_else(|| self.provider.address_of(dir));
        self.visited.insert(key)
    }

    fn skip(&mut self, dir: &Location, e: BridgeError) {
        log::warn!("skipping {dir}: {e}");
        self.stats.skipped += 1;
        self.record(e);
    }

    fn record(&mut self, e: BridgeError) {
        if self.config.collect_errors {
            self.errors.push(e);
        }
    }
}
