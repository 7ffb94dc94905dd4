use std::fmt;

use crate::error::BridgeError;

/// An addressable file or directory on some filesystem.
///
/// Addresses are URI-like (`smb://nas/music`, `sftp://host/home/me`) or bare
/// local paths (`/srv/music`). A `Location` never touches the filesystem
/// itself; providers produce them from [`Provider::resolve`](crate::Provider::resolve)
/// and consume them in every other call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    address: String,
}

impl Location {
    /// Wrap an address string. Empty and whitespace-only addresses are rejected.
    pub fn parse(address: impl Into<String>) -> Result<Self, BridgeError> {
        let address = address.into();
        if address.trim().is_empty() {
            return Err(BridgeError::InvalidAddress(address));
        }
        Ok(Self { address })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// The scheme name (`"smb"`, `"file"`, ...) or `None` for a bare path.
    pub fn scheme(&self) -> Option<&str> {
        scheme_of(&self.address)
    }

    /// The address with any `scheme://` prefix removed.
    pub fn path_part(&self) -> &str {
        match self.address.find("://") {
            Some(pos) if self.scheme().is_some() => &self.address[pos + 3..],
            _ => &self.address,
        }
    }

    /// The address of `name` inside this location, joined with exactly one `/`.
    pub fn join(&self, name: &str) -> Location {
        let name = name.trim_start_matches('/');
        let address = if self.address.ends_with('/') {
            format!("{}{name}", self.address)
        } else {
            format!("{}/{name}", self.address)
        };
        Location { address }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

/// Extract the scheme of `address` per RFC 3986: a letter followed by
/// letters, digits, `+`, `-` or `.`, terminated by `://`.
pub(crate) fn scheme_of(address: &str) -> Option<&str> {
    let pos = address.find("://")?;
    let scheme = &address[..pos];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(scheme)
    } else {
        None
    }
}
