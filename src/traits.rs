use std::io::SeekFrom;

use crate::entry::{DirEntry, FileKind};
use crate::error::BridgeError;
use crate::location::Location;

/// Lazy sequence of child names returned by [`Provider::list_children`].
///
/// Dropping the iterator closes the underlying listing handle, whether or not
/// it was drained.
///
/// A [`BridgeError::InvalidName`] item skips that one child and the walk keeps
/// reading. Any other `Err` abandons the rest of the directory.
pub type Children<'a> = Box<dyn Iterator<Item = Result<String, BridgeError>> + 'a>;

/// A virtual-filesystem backend: the library that actually talks SMB, SFTP,
/// HTTP or local disk.
///
/// The bridge never does I/O of its own. Every directory listing, type query
/// and byte read is forwarded here.
///
/// # Object Safety
///
/// `Provider` is object-safe. The bridge stores providers as
/// `Arc<dyn Provider>`, so listings come back as boxed iterators rather than
/// `impl Iterator`.
///
/// # Thread Safety
///
/// `Send + Sync` are required. Each scan owns its own worklist, so concurrent
/// scans only share the provider; whether concurrent reads against one
/// provider are safe is the provider's contract.
///
/// # Error Handling
///
/// Faults on one branch of a tree (a directory that vanished, a share with no
/// permission) should be returned as recoverable `Err`s. The walk logs and
/// skips them rather than aborting.
///
/// # Example
///
/// ```rust,ignore
/// use vfs_bridge::{BridgeError, Children, FileKind, Location, Provider, ProviderStream};
///
/// struct Nothing;
///
/// impl Provider for Nothing {
///     fn resolve(&self, address: &str) -> Result<Location, BridgeError> {
///         Location::parse(address)
///     }
///     fn list_children(&self, _dir: &Location) -> Result<Children<'_>, BridgeError> {
///         Ok(Box::new(std::iter::empty()))
///     }
///     fn type_of(&self, _loc: &Location) -> Result<FileKind, BridgeError> {
///         Ok(FileKind::Directory)
///     }
///     fn open(&self, loc: &Location) -> Result<Box<dyn ProviderStream>, BridgeError> {
///         Err(BridgeError::NotFound(loc.to_string()))
///     }
/// }
/// ```
pub trait Provider: Send + Sync {
    /// Whether the backing library is up. Checked once by
    /// [`Bridge::start`](crate::Bridge::start).
    fn is_active(&self) -> bool {
        true
    }

    /// Turn an address into a usable location, or fail if it cannot be
    /// reached at all (bad address, auth failure, host unreachable).
    fn resolve(&self, address: &str) -> Result<Location, BridgeError>;

    /// Enumerate the immediate children of a directory by name.
    fn list_children(&self, dir: &Location) -> Result<Children<'_>, BridgeError>;

    /// The location of child `name` inside `dir`.
    fn child(&self, dir: &Location, name: &str) -> Location {
        dir.join(name)
    }

    /// Report whether `location` is a file, a directory, or something else.
    fn type_of(&self, location: &Location) -> Result<FileKind, BridgeError>;

    /// Full address string of `location`.
    fn address_of(&self, location: &Location) -> String {
        location.address().to_owned()
    }

    /// A canonical address under which aliases of the same directory (symlinks,
    /// overlapping mounts) compare equal. `None` if the provider cannot tell.
    fn canonical_address(&self, _location: &Location) -> Option<String> {
        None
    }

    /// Open `location` for reading.
    fn open(&self, location: &Location) -> Result<Box<dyn ProviderStream>, BridgeError>;

    /// MIME content type of `location`, if the provider knows one.
    fn content_type(&self, _location: &Location) -> Result<Option<String>, BridgeError> {
        Ok(None)
    }
}

/// An open byte stream handed out by [`Provider::open`].
pub trait ProviderStream: Send {
    /// Read up to `buf.len()` bytes. `Ok(0)` means end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, BridgeError>;

    /// Whether [`seek`](ProviderStream::seek) is supported at all.
    fn can_seek(&self) -> bool;

    /// Move the read position, returning the new absolute offset.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, BridgeError>;

    /// Current absolute read position.
    fn tell(&self) -> u64;

    /// Total length in bytes.
    fn size(&self) -> Result<u64, BridgeError>;
}

/// Decides whether a discovered file belongs in the scan results.
///
/// The entry passed in carries the bare child name only. Filters are never
/// consulted for directories.
///
/// Any `Fn(&DirEntry) -> bool + Send + Sync` closure is a `Filter`.
///
/// # Example
///
/// ```rust
/// use vfs_bridge::{DirEntry, Filter};
///
/// struct FlacOnly;
///
/// impl Filter for FlacOnly {
///     fn accept(&self, entry: &DirEntry) -> bool {
///         entry.name.to_lowercase().ends_with(".flac")
///     }
/// }
///
/// assert!(FlacOnly.accept(&DirEntry::new("Track 01.FLAC")));
/// ```
pub trait Filter: Send + Sync {
    /// Returns `true` if this entry should be included in results.
    fn accept(&self, entry: &DirEntry) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&DirEntry) -> bool + Send + Sync,
{
    fn accept(&self, entry: &DirEntry) -> bool {
        self(entry)
    }
}
