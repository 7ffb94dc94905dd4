//! # vfs-bridge
//!
//! Lets a media player's VFS plugin surface read files on remote or virtual
//! filesystems (SMB, SFTP, HTTP) by delegating to a pluggable VFS provider.
//!
//! The crate owns no transport. It owns the translation: the host's
//! open/read/seek/tell/rewind/getlength/scandir calls become calls on a
//! [`Provider`]. The one piece with logic of its own is the directory walk
//! behind `scandir`, which flattens a whole tree into a list of file
//! addresses and survives faults in individual branches.
//!
//! # Quick Start
//!
//! ```rust
//! use vfs_bridge::{Bridge, MemoryProvider};
//!
//! let mem = MemoryProvider::new();
//! mem.insert("music/a.flac", b"fLaC".to_vec());
//! mem.insert("music/sub/b.flac", b"fLaC".to_vec());
//!
//! let bridge = Bridge::builder(mem).schemes(["mem://"]).start().unwrap();
//!
//! let listing = bridge.scandir("mem://music", None, None).unwrap();
//! assert_eq!(listing.len(), 2);
//!
//! let mut stream = bridge.open("mem://music/a.flac").unwrap();
//! assert_eq!(stream.length().unwrap(), 4);
//! # stream.close();
//! # bridge.stop();
//! ```
//!
//! # One-off scans
//!
//! ```rust
//! use vfs_bridge::{MemoryProvider, TraversalOrder};
//!
//! let mem = MemoryProvider::new();
//! mem.insert("a.flac", vec![]);
//! mem.insert("notes.txt", vec![]);
//!
//! let listing = vfs_bridge::scan()
//!     .provider(mem)
//!     .root("mem://")
//!     .extensions(["flac"])
//!     .order(TraversalOrder::BreadthFirst)
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(listing.names().collect::<Vec<_>>(), vec!["mem://a.flac"]);
//! ```

#![forbid(unsafe_code)]

mod bridge;
mod builder;
mod engine;
mod entry;
mod error;
mod filesystem;
mod location;
mod memory;
mod results;
mod stream;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use bridge::{Bridge, BridgeBuilder, Comparator, PluginInfo, DEFAULT_SCHEMES, PLUGIN_INFO};
pub use builder::ScanBuilder;
pub use engine::{TraversalOrder, WalkConfig};
pub use entry::{DirEntry, FileKind, DIRENT_NAME_CAPACITY};
pub use error::BridgeError;
pub use filesystem::FileSystemProvider;
pub use location::Location;
pub use memory::{Fault, MemoryProvider};
pub use results::{Listing, ScanStats};
pub use stream::{Stream, Whence};
pub use traits::{Children, Filter, Provider, ProviderStream};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`ScanBuilder`] to configure and run a directory scan.
pub fn scan() -> ScanBuilder {
    ScanBuilder::default()
}
