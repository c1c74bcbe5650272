//! The public, object-oriented facade over the free functions in
//! `writer`, `reader`, `enumerator`, and `deleter`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncRead;

use crate::address::Address;
use crate::cancel::CancelToken;
use crate::deleter;
use crate::encoding::Encoding;
use crate::enumerator::Enumerator;
use crate::error::Error;
use crate::reader::{self, ReadOptions, StoredReader};
use crate::writer::{self, DEFAULT_BUF_LEN};
use crate::Coordinator;

/// Configuration for opening a [`Store`].
#[derive(Clone, Debug)]
pub struct StoreConfig {
    root: PathBuf,
    read_buffer_bytes: usize,
}

impl StoreConfig {
    /// Build a config rooted at `root`, using the default 4 096-byte
    /// streaming buffer. The directory is created lazily on first write,
    /// not here.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), read_buffer_bytes: DEFAULT_BUF_LEN }
    }

    /// Override the streaming read/write buffer size.
    pub fn with_read_buffer_bytes(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes;
        self
    }

    /// The configured root path.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// A content-addressable store rooted at a single directory, with a
/// shared coordinator guarding every mutating operation against
/// concurrent siblings of itself.
pub struct Store {
    root: PathBuf,
    coordinator: Coordinator,
    read_buffer_bytes: usize,
}

impl Store {
    /// Open a store at the configured root, creating the root directory if
    /// it does not already exist.
    pub fn new(config: StoreConfig) -> Result<Self, Error> {
        std::fs::create_dir_all(&config.root).map_err(Error::Io)?;
        Ok(Self {
            root: config.root,
            coordinator: Coordinator::new(),
            read_buffer_bytes: config.read_buffer_bytes,
        })
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stream `src` to EOF, place it under its content address, and
    /// materialize any requested encoded siblings. Returns the same
    /// address on a deduplicated write as on the original write.
    pub async fn write<R>(
        &self,
        src: R,
        cancel: Option<CancelToken>,
        encodings: &[Arc<dyn Encoding>],
    ) -> Result<Address, Error>
    where
        R: AsyncRead + Unpin,
    {
        writer::write(&self.root, &self.coordinator, src, cancel, encodings, self.read_buffer_bytes).await
    }

    /// Whether the base object (or, with `encoding`, a specific sibling)
    /// exists.
    pub async fn contains(&self, address: &Address, encoding: Option<&str>) -> bool {
        reader::contains(&self.root, address, encoding).await
    }

    /// Open a read-only stream for the base object or a named sibling, if
    /// present.
    pub async fn try_open(
        &self,
        address: &Address,
        options: ReadOptions,
        encoding: Option<&str>,
    ) -> Result<Option<StoredReader>, Error> {
        reader::try_open(&self.root, address, options, encoding).await
    }

    /// Size in bytes of the base object or a named sibling, if present.
    pub async fn try_length(
        &self,
        address: &Address,
        encoding: Option<&str>,
    ) -> Result<Option<u64>, Error> {
        reader::try_length(&self.root, address, encoding).await
    }

    /// A lazy iterator over every address currently stored.
    pub fn list(&self) -> std::io::Result<Enumerator> {
        Enumerator::new(self.root.clone())
    }

    /// Remove the base object and every encoded sibling that exists on
    /// disk for `address`. Returns `false` if nothing was present.
    pub async fn delete(&self, address: &Address) -> Result<bool, Error> {
        deleter::delete(&self.root, &self.coordinator, address).await
    }
}
