use std::io::Read;

use crate::model::addr;
use crate::model::space;

/// A stream held entirely in memory. Also what sequential or unsized
/// streams get materialized into.
#[derive(Debug, Clone, Default)]
pub struct MemoryByteStream {
    bytes: Vec<u8>,
}

impl MemoryByteStream {
    pub fn new(bytes: Vec<u8>) -> MemoryByteStream {
        MemoryByteStream { bytes }
    }

    /// Drains a reader into memory.
    pub fn from_reader(mut reader: impl Read) -> std::io::Result<MemoryByteStream> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(MemoryByteStream { bytes })
    }

    /// Copies everything another stream will give us, front to back,
    /// stopping at its first short read. Works for streams that claim a
    /// size of zero.
    pub fn materialize(stream: &dyn space::ByteStream) -> MemoryByteStream {
        const CHUNK: usize = 64 * 1024;

        let mut bytes = Vec::new();
        loop {
            let offset = bytes.len() as addr::Offset;
            match stream.read(offset, CHUNK) {
                space::FetchResult::Ok(chunk) if !chunk.is_empty() => bytes.extend(chunk),
                other => {
                    bytes.extend(other.into_bytes());
                    break;
                }
            }
        }

        MemoryByteStream { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl space::ByteStream for MemoryByteStream {
    fn size(&self) -> addr::Offset {
        self.bytes.len() as addr::Offset
    }

    fn read(&self, offset: addr::Offset, length: usize) -> space::FetchResult {
        let Ok(begin) = usize::try_from(offset) else { return space::FetchResult::Unreadable };

        if begin >= self.bytes.len() {
            return space::FetchResult::Unreadable;
        }

        let end = begin.saturating_add(length).min(self.bytes.len());
        let out = self.bytes[begin..end].to_vec();

        if out.len() == length {
            space::FetchResult::Ok(out)
        } else {
            space::FetchResult::Partial(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_matches::assert_matches;

    use crate::model::space::ByteStream;

    /// Hands out bytes a few at a time and does not know its size.
    struct Trickle {
        bytes: Vec<u8>,
    }

    impl space::ByteStream for Trickle {
        fn size(&self) -> addr::Offset {
            0
        }

        fn read(&self, offset: addr::Offset, length: usize) -> space::FetchResult {
            let begin = offset as usize;
            let end = std::cmp::min(begin + std::cmp::min(length, 3), self.bytes.len());
            if begin >= end {
                space::FetchResult::Unreadable
            } else if end - begin == length {
                space::FetchResult::Ok(self.bytes[begin..end].to_vec())
            } else {
                space::FetchResult::Partial(self.bytes[begin..end].to_vec())
            }
        }

        fn is_sequential(&self) -> bool {
            true
        }
    }

    #[test]
    fn reads() {
        let stream = MemoryByteStream::new((0..10).collect());
        assert_eq!(stream.size(), 10);
        assert_matches!(stream.read(0, 4), space::FetchResult::Ok(b) if b == vec![0, 1, 2, 3]);
        assert_matches!(stream.read(8, 4), space::FetchResult::Partial(b) if b == vec![8, 9]);
        assert_matches!(stream.read(10, 4), space::FetchResult::Unreadable);
        assert_matches!(stream.read(-4, 4), space::FetchResult::Unreadable);
    }

    #[test]
    fn materialize_stops_at_short_read() {
        let trickle = Trickle { bytes: (0..7).collect() };
        let stream = MemoryByteStream::materialize(&trickle);
        /* the first short read ends materialization */
        assert_eq!(stream.bytes(), &[0, 1, 2]);
    }

    #[test]
    fn from_reader() {
        let stream = MemoryByteStream::from_reader(&b"hello"[..]).unwrap();
        assert_eq!(stream.size(), 5);
        assert_eq!(stream.bytes(), b"hello");
    }
}
