use std::io::{self, SeekFrom};

use crate::error::BridgeError;
use crate::traits::ProviderStream;

/// Origin for [`Stream::seek`], mirroring C's `SEEK_SET/SEEK_CUR/SEEK_END`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Start,
    Current,
    End,
}

impl Whence {
    /// Map a raw C `whence` value. Unknown values seek from the start.
    pub fn from_raw(whence: i32) -> Self {
        match whence {
            1 => Whence::Current,
            2 => Whence::End,
            _ => Whence::Start,
        }
    }
}

/// A file opened through a [`Bridge`](crate::Bridge).
///
/// Every operation forwards to the provider's stream. The content type is
/// captured once at open time. Dropping a `Stream` releases the provider
/// handle; [`close`](Stream::close) does the same explicitly.
pub struct Stream {
    address:      String,
    content_type: Option<String>,
    handle:       Option<Box<dyn ProviderStream>>,
}

impl Stream {
    pub(crate) fn new(
        address: String,
        content_type: Option<String>,
        handle: Box<dyn ProviderStream>,
    ) -> Self {
        Self {
            address,
            content_type,
            handle: Some(handle),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    fn handle(&mut self) -> Result<&mut Box<dyn ProviderStream>, BridgeError> {
        self.handle.as_mut().ok_or(BridgeError::StreamClosed)
    }

    /// Read up to `buf.len()` bytes; `Ok(0)` at end of stream.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, BridgeError> {
        self.handle()?.read(buf)
    }

    /// `fread`-style read: fill up to `buf.len() / item_size` items and
    /// return how many whole items were read.
    pub fn read_items(&mut self, buf: &mut [u8], item_size: usize) -> Result<usize, BridgeError> {
        if item_size == 0 {
            return Ok(0);
        }
        let want = buf.len() - buf.len() % item_size;
        let bytes = self.read(&mut buf[..want])?;
        Ok(bytes / item_size)
    }

    /// Move the read position and return the new absolute offset.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64, BridgeError> {
        let handle = self.handle()?;
        if !handle.can_seek() {
            return Err(BridgeError::NotSeekable);
        }
        let pos = match whence {
            Whence::Start => {
                let start = u64::try_from(offset).map_err(|_| BridgeError::InvalidSeek(offset))?;
                SeekFrom::Start(start)
            }
            Whence::Current => SeekFrom::Current(offset),
            Whence::End     => SeekFrom::End(offset),
        };
        handle.seek(pos)
    }

    pub fn tell(&self) -> Result<u64, BridgeError> {
        self.handle
            .as_ref()
            .map(|h| h.tell())
            .ok_or(BridgeError::StreamClosed)
    }

    /// Seek back to the start. A no-op on non-seekable streams; seek errors
    /// are logged, not returned.
    pub fn rewind(&mut self) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        if handle.can_seek() {
            if let Err(e) = handle.seek(SeekFrom::Start(0)) {
                log::warn!("rewind {} failed: {e}", self.address);
            }
        }
    }

    /// Total length of the underlying file in bytes.
    pub fn length(&self) -> Result<u64, BridgeError> {
        self.handle
            .as_ref()
            .ok_or(BridgeError::StreamClosed)?
            .size()
    }

    /// Release the provider handle. Further calls fail with `StreamClosed`.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            log::debug!("close {}", self.address);
        }
    }
}

impl io::Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Stream::read(self, buf).map_err(io::Error::other)
    }
}
