//! Streaming write protocol: hash-while-writing to a temp file, atomic
//! placement under the address, and sibling-encoding materialization.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

use crate::address::Address;
use crate::cancel::CancelToken;
use crate::canonical;
use crate::coordinator::Coordinator;
use crate::digest::DigestAccumulator;
use crate::encoding::Encoding;
use crate::error::Error;
use crate::observer;

/// Default buffer size for the double-buffered hash-and-write loop, used
/// by [`crate::StoreConfig`] unless overridden.
pub const DEFAULT_BUF_LEN: usize = 4096;

enum LoopError {
    Io(io::Error),
    Cancelled,
}

/// Whether [`place_atomically`] created the base object or found it
/// already present (a deduplicated write of identical content).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Placement {
    Created,
    AlreadyPresent,
}

impl From<io::Error> for LoopError {
    fn from(e: io::Error) -> Self {
        LoopError::Io(e)
    }
}

/// Double-buffered read+write loop: overlaps the read of the next chunk
/// with the write of the previous one, feeding the digest with each
/// just-read chunk exactly once, in stream order.
async fn double_buffered_copy<R, W>(
    mut reader: R,
    mut writer: W,
    cancel: Option<&CancelToken>,
    buf_len: usize,
) -> Result<(u64, Address), LoopError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut a = vec![0u8; buf_len];
    let mut b = vec![0u8; buf_len];
    let mut write_pending: Option<usize> = None;
    let mut total: u64 = 0;
    let mut acc = DigestAccumulator::new();

    loop {
        if let Some(c) = cancel {
            if c.is_cancelled() {
                return Err(LoopError::Cancelled);
            }
        }

        let read_fut = reader.read(&mut a);
        let n = match write_pending.take() {
            Some(wlen) => {
                let write_fut = writer.write_all(&b[..wlen]);
                let (read_res, write_res) = tokio::join!(read_fut, write_fut);
                write_res?;
                read_res?
            }
            None => read_fut.await?,
        };

        acc.update(&a[..n]);
        total += n as u64;
        if n == 0 {
            break;
        }

        std::mem::swap(&mut a, &mut b);
        write_pending = Some(n);
    }

    if let Some(wlen) = write_pending.take() {
        writer.write_all(&b[..wlen]).await?;
    }
    writer.flush().await?;
    Ok((total, acc.finalize()))
}

/// Allocate a temp file under `root/.tmp` (same volume as the store root,
/// so the eventual rename is a move, not a copy).
async fn allocate_temp_file(root: &Path) -> io::Result<(PathBuf, File)> {
    let tmp_dir = root.join(".tmp");
    fs::create_dir_all(&tmp_dir).await?;
    let mut attempt: u64 = 0;
    loop {
        let candidate = tmp_dir.join(format!("write-{}-{}.tmp", std::process::id(), attempt));
        match fs::OpenOptions::new().write(true).create_new(true).open(&candidate).await {
            Ok(f) => return Ok((candidate, f)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                attempt = attempt.wrapping_add(1);
                continue;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn set_readonly(path: &Path) -> io::Result<()> {
    let meta = fs::metadata(path).await?;
    let mut perm = meta.permissions();
    perm.set_readonly(true);
    fs::set_permissions(path, perm).await
}

/// Atomically place `tmp_path` at `final_path` under the coordinator's
/// upgradeable discipline: if the target already exists, discard the temp
/// file (idempotent write); otherwise create the fan-out subdirectory,
/// rename, and mark read-only.
async fn place_atomically(
    coordinator: &Coordinator,
    tmp_path: &Path,
    final_path: &Path,
) -> Result<Placement, Error> {
    {
        let _read = coordinator.read_section().await;
        if final_path.exists() {
            drop(_read);
            let _ = fs::remove_file(tmp_path).await;
            trace!(path = %final_path.display(), "duplicate content, discarding temp file");
            return Ok(Placement::AlreadyPresent);
        }
    }

    let _write = coordinator.write_section().await;
    if final_path.exists() {
        drop(_write);
        let _ = fs::remove_file(tmp_path).await;
        return Ok(Placement::AlreadyPresent);
    }

    if let Some(parent) = final_path.parent() {
        fs::create_dir_all(parent).await?;
    }
    match fs::rename(tmp_path, final_path).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            let _ = fs::remove_file(tmp_path).await;
            return Ok(Placement::AlreadyPresent);
        }
        Err(e) => return Err(Error::Io(e)),
    }
    if final_path.exists() {
        set_readonly(final_path).await.map_err(Error::Io)?;
    }
    Ok(Placement::Created)
}

/// Materialize the encoded sibling for `encoding` if it is not already
/// present. Failures here do not invalidate the base object. Placement of
/// the finished sibling goes through the same upgradeable-section
/// discipline as [`place_atomically`]: it's as much a filesystem-layout
/// mutation as the base object's own placement.
async fn materialize_sibling(
    root: &Path,
    coordinator: &Coordinator,
    address: &Address,
    encoding: &Arc<dyn Encoding>,
) -> Result<(), Error> {
    let base = canonical::base_path(root, address);
    let sibling = canonical::sibling_path(root, address, encoding.name())?;

    {
        let _read = coordinator.read_section().await;
        if sibling.exists() {
            return Ok(());
        }
    }

    let (tmp_path, tmp_file) = allocate_temp_file(root).await?;
    let dst = tmp_file
        .try_into_std()
        .expect("freshly opened temp file has no in-flight operations");
    let base_for_blocking = base.clone();
    let encoding = encoding.clone();
    let result: io::Result<()> = tokio::task::spawn_blocking(move || {
        let src = std::fs::File::open(&base_for_blocking)?;
        let mut reader: Box<dyn io::Read + Send> = Box::new(std::io::BufReader::new(src));
        let mut writer = encoding.encode(Box::new(std::io::BufWriter::new(dst)));
        io::copy(&mut reader, &mut writer)?;
        writer.flush()?;
        Ok(())
    })
    .await
    .map_err(|e| Error::Io(io::Error::other(e)))?;
    result?;

    let _write = coordinator.write_section().await;
    if sibling.exists() {
        drop(_write);
        let _ = fs::remove_file(&tmp_path).await;
        return Ok(());
    }
    match fs::rename(&tmp_path, &sibling).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            let _ = fs::remove_file(&tmp_path).await;
            return Ok(());
        }
        Err(e) => return Err(Error::Io(e)),
    }
    if sibling.exists() {
        set_readonly(&sibling).await.map_err(Error::Io)?;
    }
    Ok(())
}

/// Streaming write: consume `src` to EOF, hashing while writing it to a
/// temp file, then atomically place it under its content address and
/// materialize any requested encoded siblings.
pub async fn write<R>(
    root: &Path,
    coordinator: &Coordinator,
    src: R,
    cancel: Option<CancelToken>,
    encodings: &[Arc<dyn Encoding>],
    buf_len: usize,
) -> Result<Address, Error>
where
    R: AsyncRead + Unpin,
{
    let (tmp_path, tmp_file) = allocate_temp_file(root).await?;

    let copy_result = double_buffered_copy(src, tmp_file, cancel.as_ref(), buf_len).await;
    let (_total, address) = match copy_result {
        Ok(ok) => ok,
        Err(LoopError::Cancelled) => {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(Error::Cancelled);
        }
        Err(LoopError::Io(e)) => {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(Error::Io(e));
        }
    };

    let final_path = canonical::base_path(root, &address);
    match place_atomically(coordinator, &tmp_path, &final_path).await? {
        Placement::Created => {
            debug!(address = %address, bytes = _total, "object written");
            observer::observer().write_bytes(_total);
        }
        Placement::AlreadyPresent => {
            debug!(address = %address, bytes = _total, "object already present, deduplicated");
            observer::observer().dedup_hit();
        }
    }

    for encoding in encodings {
        materialize_sibling(root, coordinator, &address, encoding).await?;
    }

    Ok(address)
}
