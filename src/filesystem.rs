use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::entry::FileKind;
use crate::error::BridgeError;
use crate::location::Location;
use crate::traits::{Children, Provider, ProviderStream};

/// Provider for the local disk.
///
/// Accepts `file://` URIs and bare paths; other schemes are refused at
/// [`resolve`](Provider::resolve). Addresses are used literally, with no
/// percent-decoding. Type queries follow symlinks, so a link to a directory
/// is walked as a directory.
///
/// All I/O is blocking `std::fs`.
///
/// # Example
///
/// ```ignore
/// let bridge = Bridge::builder(FileSystemProvider::new())
///     .schemes(["file://"])
///     .start()?;
/// let listing = bridge.scandir("file:///srv/music", None, None)?;
/// ```
#[derive(Debug, Default, Clone)]
pub struct FileSystemProvider;

impl FileSystemProvider {
    pub fn new() -> Self {
        Self
    }
}

fn local_path(location: &Location) -> &Path {
    Path::new(location.path_part())
}

impl Provider for FileSystemProvider {
    fn resolve(&self, address: &str) -> Result<Location, BridgeError> {
        let location = Location::parse(address)?;
        match location.scheme() {
            None | Some("file") => {}
            Some(_) => return Err(BridgeError::UnsupportedScheme(address.to_owned())),
        }
        fs::metadata(local_path(&location)).map_err(|e| BridgeError::io(address, e))?;
        Ok(location)
    }

    fn list_children(&self, dir: &Location) -> Result<Children<'_>, BridgeError> {
        let address = dir.address().to_owned();
        let reader = fs::read_dir(local_path(dir)).map_err(|e| BridgeError::io(&address, e))?;
        Ok(Box::new(reader.map(move |entry| {
            let entry = entry.map_err(|e| BridgeError::io(&address, e))?;
            entry.file_name().into_string().map_err(|raw| BridgeError::InvalidName {
                dir:  address.clone(),
                name: raw.to_string_lossy().into_owned(),
            })
        })))
    }

    fn type_of(&self, location: &Location) -> Result<FileKind, BridgeError> {
        let meta = fs::metadata(local_path(location))
            .map_err(|e| BridgeError::io(location.address(), e))?;
        let ft = meta.file_type();
        Ok(if ft.is_dir() {
            FileKind::Directory
        } else if ft.is_file() {
            FileKind::File
        } else {
            FileKind::Other
        })
    }

    fn canonical_address(&self, location: &Location) -> Option<String> {
        fs::canonicalize(local_path(location))
            .ok()
            .map(|p| p.to_string_lossy().into_owned())
    }

    fn open(&self, location: &Location) -> Result<Box<dyn ProviderStream>, BridgeError> {
        let file = File::open(local_path(location))
            .map_err(|e| BridgeError::io(location.address(), e))?;
        Ok(Box::new(FileStream {
            file,
            pos: 0,
            address: location.address().to_owned(),
        }))
    }

    fn content_type(&self, location: &Location) -> Result<Option<String>, BridgeError> {
        let path = local_path(location);
        let meta = fs::metadata(path).map_err(|e| BridgeError::io(location.address(), e))?;
        if meta.is_dir() {
            return Ok(Some("inode/directory".into()));
        }
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Ok(Some(content_type_for(&ext).into()))
    }
}

/// Guess a MIME type from a lowercase file extension.
fn content_type_for(ext: &str) -> &'static str {
    match ext {
        "flac"         => "audio/flac",
        "mp3"          => "audio/mpeg",
        "ogg" | "oga"  => "audio/ogg",
        "opus"         => "audio/opus",
        "wav"          => "audio/x-wav",
        "m4a" | "mp4"  => "audio/mp4",
        "aac"          => "audio/aac",
        "wv"           => "audio/x-wavpack",
        "ape"          => "audio/x-ape",
        "mpc"          => "audio/x-musepack",
        "m3u" | "m3u8" => "audio/x-mpegurl",
        "pls"          => "audio/x-scpls",
        "cue"          => "application/x-cue",
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "txt"          => "text/plain",
        _              => "application/octet-stream",
    }
}

struct FileStream {
    file:    File,
    pos:     u64,
    address: String,
}

impl ProviderStream for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, BridgeError> {
        let n = self
            .file
            .read(buf)
            .map_err(|e| BridgeError::io(&self.address, e))?;
        self.pos += n as u64;
        Ok(n)
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, BridgeError> {
        self.pos = self
            .file
            .seek(pos)
            .map_err(|e| BridgeError::io(&self.address, e))?;
        Ok(self.pos)
    }

    fn tell(&self) -> u64 {
        self.pos
    }

    fn size(&self) -> Result<u64, BridgeError> {
        self.file
            .metadata()
            .map(|m| m.len())
            .map_err(|e| BridgeError::io(&self.address, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_uri(path: &Path) -> String {
        format!("file://{}", path.display())
    }

    #[test]
    fn resolve_existing_bare_path() {
        let dir = tempfile::tempdir().unwrap();
        let p = FileSystemProvider::new();
        let loc = p.resolve(&dir.path().to_string_lossy()).unwrap();
        assert_eq!(loc.scheme(), None);
    }

    #[test]
    fn resolve_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = FileSystemProvider::new().resolve(&file_uri(&missing)).unwrap_err();
        assert!(matches!(err, BridgeError::NotFound(_)));
    }

    #[test]
    fn resolve_rejects_remote_scheme() {
        let err = FileSystemProvider::new().resolve("smb://nas/music").unwrap_err();
        assert!(matches!(err, BridgeError::UnsupportedScheme(_)));
    }

    #[test]
    fn list_children_returns_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.flac"), b"").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let p = FileSystemProvider::new();
        let loc = p.resolve(&file_uri(dir.path())).unwrap();
        let mut names: Vec<String> = p.list_children(&loc).unwrap().map(Result::unwrap).collect();
        names.sort();
        assert_eq!(names, vec!["a.flac", "sub"]);
    }

    #[test]
    fn type_of_file_and_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.flac"), b"").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let p = FileSystemProvider::new();
        let root = p.resolve(&file_uri(dir.path())).unwrap();
        assert_eq!(p.type_of(&root.join("a.flac")).unwrap(), FileKind::File);
        assert_eq!(p.type_of(&root.join("sub")).unwrap(), FileKind::Directory);
        assert!(p.type_of(&root.join("gone")).is_err());
    }

    #[test]
    fn content_type_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("song.FLAC"), b"").unwrap();
        fs::write(dir.path().join("blob.xyz"), b"").unwrap();

        let p = FileSystemProvider::new();
        let root = p.resolve(&file_uri(dir.path())).unwrap();
        assert_eq!(p.content_type(&root.join("song.FLAC")).unwrap().as_deref(), Some("audio/flac"));
        assert_eq!(
            p.content_type(&root.join("blob.xyz")).unwrap().as_deref(),
            Some("application/octet-stream")
        );
        assert_eq!(p.content_type(&root).unwrap().as_deref(), Some("inode/directory"));
    }

    #[test]
    fn stream_reads_and_seeks() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.bin"), b"0123456789").unwrap();

        let p = FileSystemProvider::new();
        let root = p.resolve(&file_uri(dir.path())).unwrap();
        let mut s = p.open(&root.join("a.bin")).unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(s.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"0123");
        assert_eq!(s.tell(), 4);
        assert_eq!(s.seek(SeekFrom::End(-2)).unwrap(), 8);
        assert_eq!(s.size().unwrap(), 10);
    }
}
