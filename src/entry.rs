/// Name capacity of a POSIX `struct dirent`, terminator included.
pub const DIRENT_NAME_CAPACITY: usize = 256;

/// A single record produced by a directory scan.
///
/// In a [`Listing`](crate::Listing) the name is the full address of a
/// discovered file. A [`Filter`](crate::Filter) sees a narrower view: the
/// bare child name, with no parent address and no type information.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirEntry {
    /// Displayable name. Full address in results, child name in filters.
    pub name: String,
}

impl DirEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Build an entry whose name fits a fixed-size record of `capacity`
    /// slots, one of which the host reserves for the terminator.
    ///
    /// Over-long names are cut to `capacity - 1` characters. `None` keeps the
    /// name whole.
    pub fn with_capacity(name: &str, capacity: Option<usize>) -> Self {
        match capacity {
            Some(cap) => Self::new(truncate_chars(name, cap.saturating_sub(1))),
            None      => Self::new(name),
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None           => s,
    }
}

/// What a provider reports a location to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A regular file.
    File,

    /// A directory; its children are walked.
    Directory,

    /// Anything else (special files, mountables, shortcuts). Treated as a leaf.
    Other,
}

impl FileKind {
    pub fn is_dir(self) -> bool {
        self == FileKind::Directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_untouched() {
        assert_eq!(DirEntry::with_capacity("a.flac", Some(16)).name, "a.flac");
    }

    #[test]
    fn long_name_truncated_to_capacity_minus_one() {
        let name = "x".repeat(300);
        let entry = DirEntry::with_capacity(&name, Some(DIRENT_NAME_CAPACITY));
        assert_eq!(entry.name.chars().count(), DIRENT_NAME_CAPACITY - 1);
    }

    #[test]
    fn exact_fit_is_truncated_by_one() {
        let entry = DirEntry::with_capacity("abcd", Some(4));
        assert_eq!(entry.name, "abc");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let entry = DirEntry::with_capacity("ééééé", Some(3));
        assert_eq!(entry.name, "éé");
    }

    #[test]
    fn unbounded_keeps_everything() {
        let name = "y".repeat(1000);
        assert_eq!(DirEntry::with_capacity(&name, None).name, name);
    }

    #[test]
    fn zero_capacity_yields_empty_name() {
        assert_eq!(DirEntry::with_capacity("abc", Some(0)).name, "");
    }
}
