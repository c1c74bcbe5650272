//! Deletion: remove a base object and every encoded sibling on disk for
//! it, discovered by scanning the fan-out subdirectory rather than by
//! trusting a caller-supplied encoding list.

use std::ffi::OsStr;
use std::path::Path;

use tokio::fs;

use crate::address::Address;
use crate::canonical;
use crate::coordinator::Coordinator;
use crate::error::Error;
use crate::observer;

async fn clear_readonly_and_remove(path: &Path) -> std::io::Result<bool> {
    let meta = match fs::metadata(path).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    let mut perm = meta.permissions();
    if perm.readonly() {
        perm.set_readonly(false);
        fs::set_permissions(path, perm).await?;
    }
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Whether `entry_name` is the base object's filename or one of its
/// encoded siblings (`name` or `name.<suffix>`).
fn matches_object_or_sibling(entry_name: &OsStr, object_name: &str) -> bool {
    let Some(entry_name) = entry_name.to_str() else { return false };
    entry_name == object_name
        || entry_name
            .strip_prefix(object_name)
            .is_some_and(|rest| rest.starts_with('.') && rest.len() > 1)
}

/// Remove the base object and every encoded sibling that exists on disk
/// for `address`, found by scanning its fan-out subdirectory. Returns
/// `true` if anything was actually removed, `false` if the address was
/// already absent. Runs entirely under the coordinator's write section so
/// it can never race a concurrent write's existence check.
pub async fn delete(root: &Path, coordinator: &Coordinator, address: &Address) -> Result<bool, Error> {
    let _guard = coordinator.write_section().await;

    let subdir = canonical::subdir_for(root, address);
    let object_name = canonical::base_path(root, address)
        .file_name()
        .expect("base_path always has a filename")
        .to_str()
        .expect("object filenames are ASCII hex")
        .to_owned();

    let mut read_dir = match fs::read_dir(&subdir).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(Error::Io(e)),
    };

    let mut removed_count: u64 = 0;
    while let Some(entry) = read_dir.next_entry().await.map_err(Error::Io)? {
        if !matches_object_or_sibling(&entry.file_name(), &object_name) {
            continue;
        }
        if clear_readonly_and_remove(&entry.path()).await.map_err(Error::Io)? {
            removed_count += 1;
        }
    }

    if removed_count > 0 {
        observer::observer().delete_count(removed_count);
    }
    Ok(removed_count > 0)
}
