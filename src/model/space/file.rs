use std::io::Read;
use std::io::Seek;

use tracing::{event, Level};

use crate::model::addr;
use crate::model::space;

enum State {
    Open(std::fs::File),
    Closed,
    Error(std::io::Error),
}

/// A stream backed by a seekable file, read on demand.
pub struct FileByteStream {
    inner: parking_lot::Mutex<State>,
    size: addr::Offset,
    pub path: std::path::PathBuf,
}

impl FileByteStream {
    pub fn new(path: std::path::PathBuf) -> FileByteStream {
        FileByteStream {
            inner: parking_lot::Mutex::new(State::Closed),
            size: 0,
            path,
        }
    }

    /// In case of error, the error is returned instead of being stored in this object as an error state.
    pub fn try_open(path: std::path::PathBuf) -> Result<FileByteStream, std::io::Error> {
        let file = std::fs::File::open(&path)?;
        let size = file.metadata()?.len() as addr::Offset;

        Ok(FileByteStream {
            inner: parking_lot::Mutex::new(State::Open(file)),
            size,
            path,
        })
    }

    /// In case of error, the error is stored in this object as an error state instead of being returned.
    pub fn open(&mut self) {
        let mut guard = self.inner.lock();

        match &*guard {
            State::Open(_) => {},
            State::Closed | State::Error(_) => *guard = match std::fs::File::open(&self.path).and_then(|f| f.metadata().map(|m| (f, m.len()))) {
                Ok((f, len)) => {
                    self.size = len as addr::Offset;
                    State::Open(f)
                },
                Err(e) => {
                    event!(Level::WARN, "failed to open {}: {}", self.path.display(), e);
                    State::Error(e)
                },
            },
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(&*self.inner.lock(), State::Open(_))
    }

    fn read_sync(&self, offset: u64, mut out: Vec<u8>) -> space::FetchResult {
        let mut inner = self.inner.lock();

        match &mut *inner {
            State::Open(file) => file.seek(std::io::SeekFrom::Start(offset))
                .and_then(|_| read_fully(file, &mut out[..]))
                .map(|r| {
                    match r {
                        i if i == out.len() => space::FetchResult::Ok(out),
                        0 => space::FetchResult::Unreadable,
                        i => {
                            out.truncate(i);
                            space::FetchResult::Partial(out)
                        }
                    }}).unwrap_or_else(space::FetchResult::IoError),

            _ => space::FetchResult::Unreadable,
        }
    }
}

/* a single read() may come back short without being at end of file */
fn read_fully(file: &mut std::fs::File, out: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < out.len() {
        match file.read(&mut out[total..]) {
            Ok(0) => break,
            Ok(n) => total+= n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

impl space::ByteStream for FileByteStream {
    fn size(&self) -> addr::Offset {
        self.size
    }

    fn read(&self, offset: addr::Offset, length: usize) -> space::FetchResult {
        match u64::try_from(offset) {
            Ok(offset) => self.read_sync(offset, vec![0; length]),
            Err(_) => space::FetchResult::Unreadable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use assert_matches::assert_matches;

    use crate::model::space::ByteStream;

    #[test]
    fn reads_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&(0u8..32).collect::<Vec<u8>>()).unwrap();
        tmp.flush().unwrap();

        let stream = FileByteStream::try_open(tmp.path().to_path_buf()).unwrap();
        assert_eq!(stream.size(), 32);
        assert_matches!(stream.read(4, 4), space::FetchResult::Ok(b) if b == vec![4, 5, 6, 7]);
        assert_matches!(stream.read(30, 4), space::FetchResult::Partial(b) if b == vec![30, 31]);
        assert_matches!(stream.read(32, 4), space::FetchResult::Unreadable);
        assert_matches!(stream.read(-1, 4), space::FetchResult::Unreadable);
    }

    #[test]
    fn missing_file() {
        assert!(FileByteStream::try_open("/nonexistent/hexview/file".into()).is_err());

        let mut stream = FileByteStream::new("/nonexistent/hexview/file".into());
        stream.open();
        assert!(!stream.is_open());
        assert_eq!(stream.size(), 0);
        assert_matches!(stream.read(0, 4), space::FetchResult::Unreadable);
    }
}
