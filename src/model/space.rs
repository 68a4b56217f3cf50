//! Byte sources the view reads from. The view never owns how bytes get
//! fetched, it only asks for a size and for ranges.

use tracing::{event, Level};

use crate::model::addr;

pub mod buffer;
pub mod file;

#[derive(Debug)]
pub enum FetchResult {
    Ok(Vec<u8>),
    /// Fewer bytes than requested were available; end of data.
    Partial(Vec<u8>),
    Unreadable,
    IoError(std::io::Error),
}

impl FetchResult {
    /// Whatever bytes were obtained. Short reads and failures both just mean
    /// "this is where the data ends"; I/O errors get logged on the way.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            FetchResult::Ok(bytes) | FetchResult::Partial(bytes) => bytes,
            FetchResult::Unreadable => Vec::new(),
            FetchResult::IoError(e) => {
                event!(Level::WARN, "read failed, treating as end of data: {}", e);
                Vec::new()
            }
        }
    }
}

pub trait ByteStream {
    fn size(&self) -> addr::Offset;

    fn read(&self, offset: addr::Offset, length: usize) -> FetchResult;

    /// Streams that can only be consumed front to back have to be
    /// materialized before they can back a view.
    fn is_sequential(&self) -> bool {
        false
    }
}

impl<T: ByteStream + ?Sized> ByteStream for Box<T> {
    fn size(&self) -> addr::Offset {
        (**self).size()
    }

    fn read(&self, offset: addr::Offset, length: usize) -> FetchResult {
        (**self).read(offset, length)
    }

    fn is_sequential(&self) -> bool {
        (**self).is_sequential()
    }
}

/// Reads `[offset, offset + length)`, truncated at the first short read.
pub fn read_range(stream: &dyn ByteStream, offset: addr::Offset, length: usize) -> Vec<u8> {
    if offset < 0 || length == 0 {
        return Vec::new();
    }
    stream.read(offset, length).into_bytes()
}

/// Size of the attached stream, or zero with nothing attached.
pub fn size_of(stream: Option<&dyn ByteStream>) -> addr::Offset {
    stream.map_or(0, |s| std::cmp::max(0, s.size()))
}
