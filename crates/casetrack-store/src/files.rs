//! Directory-backed implementation of [`EvidenceFiles`].
//!
//! Stored refs are flat file names inside one evidence directory; the ref
//! never contains a path separator, so a stored ref cannot escape the root.
//! The preview size check reads file metadata only; an oversized file is
//! reported without its payload ever being loaded.

use std::fs;
use std::path::PathBuf;

use casetrack_error::{CaseTrackError, Result};
use parking_lot::Mutex;
use tracing::debug;

use crate::traits::{EvidenceFiles, Preview, mime_type_for};

/// Evidence bytes stored as individual files under one directory.
#[derive(Debug)]
pub struct DirEvidenceFiles {
    root: PathBuf,
    next: Mutex<u64>,
}

impl DirEvidenceFiles {
    /// Open (creating if needed) the evidence directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            next: Mutex::new(1),
        })
    }

    /// Keep file names flat and filesystem-safe.
    fn sanitize(name: &str) -> String {
        let cleaned: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if cleaned.is_empty() {
            "file".to_owned()
        } else {
            cleaned
        }
    }

    fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        let mut next = self.next.lock();
        // Bump past collisions from earlier sessions against the same dir.
        loop {
            let stored_ref = format!("ev-{:06}-{}", *next, Self::sanitize(file_name));
            *next += 1;
            let path = self.root.join(&stored_ref);
            if path.exists() {
                continue;
            }
            fs::write(&path, bytes)?;
            debug!(stored_ref = %stored_ref, size = bytes.len(), "evidence stored");
            return Ok(stored_ref);
        }
    }

    fn resolve(&self, stored_ref: &str) -> Result<PathBuf> {
        if stored_ref.is_empty()
            || stored_ref.contains('/')
            || stored_ref.contains('\\')
            || stored_ref.contains("..")
        {
            return Err(CaseTrackError::validation(format!(
                "invalid stored ref: {stored_ref:?}"
            )));
        }
        Ok(self.root.join(stored_ref))
    }
}

impl EvidenceFiles for DirEvidenceFiles {
    fn add_file(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        self.store(file_name, bytes)
    }

    fn paste_image(&self, bytes: &[u8]) -> Result<(String, String)> {
        let n = *self.next.lock();
        let file_name = format!("pasted-{n}.png");
        let stored_ref = self.store(&file_name, bytes)?;
        Ok((file_name, stored_ref))
    }

    fn preview(&self, stored_ref: &str, limit: u64) -> Result<Preview> {
        let path = self.resolve(stored_ref)?;
        let meta = fs::metadata(&path)?;
        let size = meta.len();
        if size > limit {
            return Ok(Preview::TooLarge { size, limit });
        }
        let bytes = fs::read(&path)?;
        Ok(Preview::Content {
            bytes,
            mime_type: mime_type_for(stored_ref).to_owned(),
        })
    }

    fn remove(&self, stored_ref: &str) -> Result<()> {
        let path = self.resolve(stored_ref)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory evidence files
// ---------------------------------------------------------------------------

/// In-memory [`EvidenceFiles`] for tests and throwaway sessions.
///
/// Cloning shares the underlying blobs.
#[derive(Debug, Clone, Default)]
pub struct MemEvidenceFiles {
    inner: std::sync::Arc<Mutex<MemFilesInner>>,
}

#[derive(Debug, Default)]
struct MemFilesInner {
    blobs: std::collections::HashMap<String, Vec<u8>>,
    next: u64,
}

impl MemEvidenceFiles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().blobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EvidenceFiles for MemEvidenceFiles {
    fn add_file(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        let mut inner = self.inner.lock();
        inner.next += 1;
        let stored_ref = format!("mem-{:06}-{}", inner.next, DirEvidenceFiles::sanitize(file_name));
        inner.blobs.insert(stored_ref.clone(), bytes.to_vec());
        Ok(stored_ref)
    }

    fn paste_image(&self, bytes: &[u8]) -> Result<(String, String)> {
        let n = self.inner.lock().next + 1;
        let file_name = format!("pasted-{n}.png");
        let stored_ref = self.add_file(&file_name, bytes)?;
        Ok((file_name, stored_ref))
    }

    fn preview(&self, stored_ref: &str, limit: u64) -> Result<Preview> {
        let inner = self.inner.lock();
        let bytes = inner
            .blobs
            .get(stored_ref)
            .ok_or_else(|| CaseTrackError::storage(format!("no such blob: {stored_ref}")))?;
        let size = bytes.len() as u64;
        if size > limit {
            return Ok(Preview::TooLarge { size, limit });
        }
        Ok(Preview::Content {
            bytes: bytes.clone(),
            mime_type: mime_type_for(stored_ref).to_owned(),
        })
    }

    fn remove(&self, stored_ref: &str) -> Result<()> {
        self.inner.lock().blobs.remove(stored_ref);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
