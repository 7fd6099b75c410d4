use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::AudioFile;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// A seekable byte stream handed to the decoder.
pub trait ReadSeek: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> ReadSeek for T {}

/// Where a track's bytes come from.
pub trait MediaSource: Send + Sync + fmt::Debug {
    /// File name, extension included.
    fn name(&self) -> &str;

    /// Read up to `len` bytes from the start of the source.
    fn read_head(&self, len: usize) -> Result<Vec<u8>, SourceError>;

    /// Open the full byte stream for playback.
    fn open(&self) -> Result<Box<dyn ReadSeek>, SourceError>;

    /// Decode enough of the source to learn its duration.
    fn probe_duration(&self) -> Option<Duration>;
}

/// A source backed by a file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SourceError {
        SourceError::Io {
            name: self.name.clone(),
            source,
        }
    }
}

impl MediaSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_head(&self, len: usize) -> Result<Vec<u8>, SourceError> {
        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let mut buf = Vec::new();
        file.take(len as u64)
            .read_to_end(&mut buf)
            .map_err(|e| self.io_error(e))?;
        Ok(buf)
    }

    fn open(&self) -> Result<Box<dyn ReadSeek>, SourceError> {
        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn probe_duration(&self) -> Option<Duration> {
        match lofty::read_from_path(&self.path) {
            Ok(tagged) => {
                let d = tagged.properties().duration();
                (!d.is_zero()).then_some(d)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "duration probe failed");
                None
            }
        }
    }
}
