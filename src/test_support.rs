//! Fixtures shared across test modules.

use std::ffi::OsString;
use std::io::Cursor;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::time::Duration;

use crate::library::{MediaSource, ReadSeek, SourceError};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Serializes every test that reads or writes process environment.
pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Restores the previous value of `key` on drop.
pub struct EnvGuard {
    key: &'static str,
    old: Option<OsString>,
}

impl EnvGuard {
    pub fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    pub fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}


/// A source held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    pub name: String,
    pub bytes: Vec<u8>,
    pub duration: Option<Duration>,
}

impl MemorySource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bytes: Vec::new(),
            duration: None,
        }
    }

    pub fn with_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.bytes = bytes;
        self
    }

    pub fn with_duration(mut self, secs: u64) -> Self {
        self.duration = Some(Duration::from_secs(secs));
        self
    }

    pub fn shared(self) -> Arc<dyn MediaSource> {
        Arc::new(self)
    }
}

impl MediaSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_head(&self, len: usize) -> Result<Vec<u8>, SourceError> {
        Ok(self.bytes[..len.min(self.bytes.len())].to_vec())
    }

    fn open(&self) -> Result<Box<dyn ReadSeek>, SourceError> {
        Ok(Box::new(Cursor::new(self.bytes.clone())))
    }

    fn probe_duration(&self) -> Option<Duration> {
        self.duration
    }
}

/// A minimal ID3v2.3 tag holding UTF-8 text frames.
pub fn id3v23_tag(frames: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (id, text) in frames {
        let mut payload = vec![3u8];
        payload.extend_from_slice(text.as_bytes());
        body.extend_from_slice(id.as_bytes());
        body.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        body.extend_from_slice(&[0, 0]);
        body.extend_from_slice(&payload);
    }
    let size = body.len() as u32;
    let mut out = b"ID3\x03\x00\x00".to_vec();
    out.extend_from_slice(&[
        ((size >> 21) & 0x7f) as u8,
        ((size >> 14) & 0x7f) as u8,
        ((size >> 7) & 0x7f) as u8,
        (size & 0x7f) as u8,
    ]);
    out.extend_from_slice(&body);
    out
}
