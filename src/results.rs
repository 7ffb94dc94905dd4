use std::cmp::Ordering;
use std::time::Duration;

use crate::entry::DirEntry;
use crate::error::BridgeError;

/// The output of a completed directory scan.
///
/// `entries` holds accepted files in discovery order; its length is the
/// scan's match count. `errors` is opt-in via `.collect_errors(true)`.
#[derive(Debug)]
pub struct Listing {
    /// Accepted files, full addresses, in the order they were found.
    pub entries: Vec<DirEntry>,

    /// Scan statistics.
    pub stats: ScanStats,

    /// Branch faults that were logged and skipped during the walk.
    /// Only populated if error collection was enabled.
    pub errors: Vec<BridgeError>,
}

impl Listing {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names as string slices, in result order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Reorder entries with a caller-supplied comparator.
    ///
    /// Scans never sort on their own; hosts that pass a comparator to
    /// `scandir` apply it here.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&DirEntry, &DirEntry) -> Ordering,
    {
        self.entries.sort_by(compare);
    }
}

/// Statistics for a completed scan.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Non-directory children encountered (accepted or not).
    pub files: usize,

    /// Directories whose children were listed, the root included.
    pub dirs: usize,

    /// Directories abandoned because of a listing fault.
    pub skipped: usize,

    /// Wall-clock time from scan start to completion.
    pub duration: Duration,
}
