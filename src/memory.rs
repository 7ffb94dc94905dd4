use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::entry::FileKind;
use crate::error::BridgeError;
use crate::location::Location;
use crate::traits::{Children, Provider, ProviderStream};

/// A failure injected into a [`MemoryProvider`] path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Listing the directory fails immediately.
    Listing,
    /// Listing yields this many names, then fails.
    ListingAfter(usize),
    /// Type queries on the path fail.
    Type,
}

/// In-memory provider for tests and embedded content.
///
/// Keys are `/`-separated paths with no leading slash; an address maps to a
/// key by dropping any `scheme://` prefix and surrounding slashes, so
/// `mem://music/a.flac` and `/music/a.flac` name the same file. Directories
/// exist explicitly (via [`create_dir`](MemoryProvider::create_dir)) or
/// implicitly whenever a file path runs through them. The empty key is the
/// root and always exists.
///
/// Cloning is cheap and clones share state, so a test can keep a handle
/// after giving one to a [`Bridge`](crate::Bridge).
///
/// # Example
///
/// ```ignore
/// let mem = MemoryProvider::new();
/// mem.insert("music/a.flac", b"fLaC".to_vec());
/// mem.inject("music/broken", Fault::Listing);
/// ```
#[derive(Clone, Default)]
pub struct MemoryProvider {
    tree:          Arc<RwLock<Tree>>,
    open_listings: Arc<AtomicUsize>,
}

#[derive(Default)]
struct Tree {
    files:       BTreeMap<String, Vec<u8>>,
    dirs:        BTreeSet<String>,
    faults:      HashMap<String, Fault>,
    unseekable:  bool,
}

impl Tree {
    fn is_dir(&self, key: &str) -> bool {
        if key.is_empty() || self.dirs.contains(key) {
            return true;
        }
        let prefix = format!("{key}/");
        self.files.keys().any(|k| k.starts_with(&prefix))
            || self.dirs.iter().any(|d| d.starts_with(&prefix))
    }

    fn children(&self, key: &str) -> Vec<String> {
        let prefix = if key.is_empty() {
            String::new()
        } else {
            format!("{key}/")
        };
        let mut names = BTreeSet::new();
        for path in self.files.keys().chain(self.dirs.iter()) {
            if let Some(rest) = path.strip_prefix(&prefix) {
                let child = rest.split('/').next().unwrap_or(rest);
                if !child.is_empty() {
                    names.insert(child.to_owned());
                }
            }
        }
        names.into_iter().collect()
    }
}

fn key_of(location: &Location) -> String {
    location.path_part().trim_matches('/').to_owned()
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_tree(&self) -> RwLockReadGuard<'_, Tree> {
        self.tree.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tree(&self) -> RwLockWriteGuard<'_, Tree> {
        self.tree.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or overwrite a file.
    pub fn insert(&self, path: impl Into<String>, data: Vec<u8>) {
        let path = path.into().trim_matches('/').to_owned();
        self.write_tree().files.insert(path, data);
    }

    /// Create an (initially empty) directory.
    pub fn create_dir(&self, path: impl Into<String>) {
        let path = path.into().trim_matches('/').to_owned();
        self.write_tree().dirs.insert(path);
    }

    /// Make operations on `path` fail.
    pub fn inject(&self, path: impl Into<String>, fault: Fault) {
        let path = path.into().trim_matches('/').to_owned();
        self.write_tree().faults.insert(path, fault);
    }

    /// Make every stream opened from now on report itself as non-seekable.
    pub fn set_seekable(&self, yes: bool) {
        self.write_tree().unseekable = !yes;
    }

    /// Number of directory listings handed out and not yet dropped.
    pub fn open_listings(&self) -> usize {
        self.open_listings.load(Ordering::SeqCst)
    }
}

impl Provider for MemoryProvider {
    fn resolve(&self, address: &str) -> Result<Location, BridgeError> {
        let location = Location::parse(address)?;
        let key = key_of(&location);
        let tree = self.read_tree();
        if tree.files.contains_key(&key) || tree.is_dir(&key) {
            Ok(location)
        } else {
            Err(BridgeError::NotFound(address.to_owned()))
        }
    }

    fn list_children(&self, dir: &Location) -> Result<Children<'_>, BridgeError> {
        let key = key_of(dir);
        let tree = self.read_tree();

        let fail_after = match tree.faults.get(&key) {
            Some(Fault::Listing) => {
                return Err(BridgeError::PermissionDenied(dir.address().to_owned()));
            }
            Some(Fault::ListingAfter(n)) => Some(*n),
            _ => None,
        };
        if !tree.is_dir(&key) {
            return Err(if tree.files.contains_key(&key) {
                BridgeError::InvalidAddress(dir.address().to_owned())
            } else {
                BridgeError::NotFound(dir.address().to_owned())
            });
        }

        self.open_listings.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ChildNames {
            names:      tree.children(&key).into_iter(),
            yielded:    0,
            fail_after,
            address:    dir.address().to_owned(),
            failed:     false,
            open:       Arc::clone(&self.open_listings),
        }))
    }

    fn type_of(&self, location: &Location) -> Result<FileKind, BridgeError> {
        let key = key_of(location);
        let tree = self.read_tree();
        if tree.faults.get(&key) == Some(&Fault::Type) {
            return Err(BridgeError::Provider(format!("type query failed: {location}")));
        }
        if tree.files.contains_key(&key) {
            Ok(FileKind::File)
        } else if tree.is_dir(&key) {
            Ok(FileKind::Directory)
        } else {
            Err(BridgeError::NotFound(location.address().to_owned()))
        }
    }

    fn open(&self, location: &Location) -> Result<Box<dyn ProviderStream>, BridgeError> {
        let tree = self.read_tree();
        let data = tree
            .files
            .get(&key_of(location))
            .cloned()
            .ok_or_else(|| BridgeError::NotFound(location.address().to_owned()))?;
        Ok(Box::new(MemoryStream {
            cursor:   Cursor::new(data),
            seekable: !tree.unseekable,
            address:  location.address().to_owned(),
        }))
    }
}

/// Directory listing that counts itself open until dropped.
struct ChildNames {
    names:      std::vec::IntoIter<String>,
    yielded:    usize,
    fail_after: Option<usize>,
    address:    String,
    failed:     bool,
    open:       Arc<AtomicUsize>,
}

impl Iterator for ChildNames {
    type Item = Result<String, BridgeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if self.fail_after == Some(self.yielded) {
            self.failed = true;
            return Some(Err(BridgeError::Provider(format!(
                "listing interrupted: {}",
                self.address
            ))));
        }
        let name = self.names.next()?;
        self.yielded += 1;
        Some(Ok(name))
    }
}

impl Drop for ChildNames {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

struct MemoryStream {
    cursor:   Cursor<Vec<u8>>,
    seekable: bool,
    address:  String,
}

impl ProviderStream for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, BridgeError> {
        self.cursor
            .read(buf)
            .map_err(|e| BridgeError::io(&self.address, e))
    }

    fn can_seek(&self) -> bool {
        self.seekable
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, BridgeError> {
        if !self.seekable {
            return Err(BridgeError::NotSeekable);
        }
        self.cursor
            .seek(pos)
            .map_err(|e| BridgeError::io(&self.address, e))
    }

    fn tell(&self) -> u64 {
        self.cursor.position()
    }

    fn size(&self) -> Result<u64, BridgeError> {
        Ok(self.cursor.get_ref().len() as u64)
    }
}
