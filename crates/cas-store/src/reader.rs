//! Existence check, length query, and open-for-read, with access-pattern
//! hints.

use std::path::Path;

use bitflags::bitflags;
use tokio::fs::File;

use crate::address::Address;
use crate::canonical;
use crate::error::Error;
use crate::observer;

bitflags! {
    /// Access-pattern hints for [`try_open`]. `Sequential` and
    /// `RandomAccess` are mutually exclusive in intent but the store must
    /// not error if both are set; `Sequential` wins when both are present.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct ReadOptions: u8 {
        /// No hints; the default.
        const NONE = 0;
        /// Hint: the caller will scan the stream sequentially.
        const SEQUENTIAL = 1 << 0;
        /// Hint: the caller will perform random seeks.
        const RANDOM_ACCESS = 1 << 1;
        /// Enable the async read path explicitly (the store's read path is
        /// always async internally; this flag only documents caller intent
        /// and is otherwise a no-op today).
        const ASYNCHRONOUS = 1 << 2;
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions::NONE
    }
}

impl ReadOptions {
    /// Resolve the effective precedence: `Sequential` wins when both
    /// `Sequential` and `RandomAccess` are set.
    fn effective(self) -> ReadOptions {
        if self.contains(ReadOptions::SEQUENTIAL) {
            self & !ReadOptions::RANDOM_ACCESS
        } else {
            self
        }
    }
}

/// A handle to an open, read-only stored object or sibling. Once obtained,
/// the bytes it will read are exactly the bytes originally written under
/// that address, regardless of any subsequent delete: removing the
/// directory entry does not truncate or alter an already-open reader's
/// view on the filesystems this store targets.
pub struct StoredReader {
    file: File,
}

impl StoredReader {
    fn new(file: File) -> Self {
        Self { file }
    }

    /// Access the inner async file handle for reading.
    pub fn into_inner(self) -> File {
        self.file
    }

    /// Borrow the inner async file handle for reading.
    pub fn inner_mut(&mut self) -> &mut File {
        &mut self.file
    }
}

fn resolve_path(root: &Path, address: &Address, encoding: Option<&str>) -> Result<std::path::PathBuf, Error> {
    canonical::path_for(root, address, encoding)
}

/// Pure existence test on the canonical path (+ optional encoding suffix).
pub async fn contains(root: &Path, address: &Address, encoding: Option<&str>) -> bool {
    match resolve_path(root, address, encoding) {
        Ok(path) => tokio::fs::metadata(path).await.is_ok(),
        Err(_) => false,
    }
}

/// Atomically test existence and, on success, open a read-only stream
/// that permits shared reads by other threads/processes.
pub async fn try_open(
    root: &Path,
    address: &Address,
    options: ReadOptions,
    encoding: Option<&str>,
) -> Result<Option<StoredReader>, Error> {
    let _ = options.effective(); // hints don't change behavior on a plain File today
    let path = resolve_path(root, address, encoding)?;
    match File::open(&path).await {
        Ok(file) => {
            if let Ok(meta) = file.metadata().await {
                observer::observer().read_bytes(meta.len());
            }
            Ok(Some(StoredReader::new(file)))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Size, from filesystem metadata, of the matching path.
pub async fn try_length(
    root: &Path,
    address: &Address,
    encoding: Option<&str>,
) -> Result<Option<u64>, Error> {
    let path = resolve_path(root, address, encoding)?;
    match tokio::fs::metadata(&path).await {
        Ok(meta) => {
            observer::observer().read_bytes(meta.len());
            Ok(Some(meta.len()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Io(e)),
    }
}
