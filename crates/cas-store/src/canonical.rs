//! Deterministic mapping from an address (+ optional encoding tag) to a
//! filesystem path, shared by the writer, reader, enumerator and deleter.

use std::path::{Path, PathBuf};

use crate::address::Address;
use crate::error::Error;

/// Length, in hex characters, of the fan-out prefix directory.
pub const PREFIX_LEN: usize = 4;

/// Length, in hex characters, of the base object's filename.
pub const NAME_LEN: usize = 40 - PREFIX_LEN;

/// The fan-out subdirectory for `address`, e.g. `root/ABCD`.
pub fn subdir_for(root: &Path, address: &Address) -> PathBuf {
    let text = address.to_text();
    root.join(&text[..PREFIX_LEN])
}

/// The canonical path of the base (unencoded) object for `address`.
pub fn base_path(root: &Path, address: &Address) -> PathBuf {
    let text = address.to_text();
    subdir_for(root, address).join(&text[PREFIX_LEN..])
}

/// The canonical path of the encoded sibling `name` for `address`.
///
/// Returns [`Error::InvalidArgument`] if `name` fails
/// [`is_valid_encoding_name`].
pub fn sibling_path(root: &Path, address: &Address, name: &str) -> Result<PathBuf, Error> {
    if !is_valid_encoding_name(name) {
        return Err(Error::InvalidArgument(format!("invalid encoding name: {name:?}")));
    }
    let mut path = base_path(root, address).into_os_string();
    path.push(".");
    path.push(name);
    Ok(PathBuf::from(path))
}

/// The canonical path for an address and an optional encoding name.
pub fn path_for(root: &Path, address: &Address, encoding: Option<&str>) -> Result<PathBuf, Error> {
    match encoding {
        Some(name) => sibling_path(root, address, name),
        None => Ok(base_path(root, address)),
    }
}

/// Encoding names must be non-empty, contain no path separators or `.`,
/// and be drawn from `[A-Za-z0-9_-]`.
pub fn is_valid_encoding_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Whether `name` is a well-formed fan-out prefix directory name.
pub fn is_valid_prefix_name(name: &str) -> bool {
    name.len() == PREFIX_LEN && name.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Whether `name` is a well-formed base object filename.
pub fn is_valid_object_name(name: &str) -> bool {
    name.len() == NAME_LEN && name.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn addr() -> Address {
        Address::parse("0A4D55A8D778E5022FAB701977C5D840BBC486D0").unwrap()
    }

    #[test]
    fn subdir_uses_first_four_hex_chars() {
        let root = PathBuf::from("/root");
        assert_eq!(subdir_for(&root, &addr()), PathBuf::from("/root/0A4D"));
    }

    #[test]
    fn base_path_uses_remaining_thirty_six_chars() {
        let root = PathBuf::from("/root");
        assert_eq!(
            base_path(&root, &addr()),
            PathBuf::from("/root/0A4D/55A8D778E5022FAB701977C5D840BBC486D0")
        );
    }

    #[test]
    fn sibling_path_appends_dot_name() {
        let root = PathBuf::from("/root");
        let p = sibling_path(&root, &addr(), "gzip").unwrap();
        assert_eq!(p, PathBuf::from("/root/0A4D/55A8D778E5022FAB701977C5D840BBC486D0.gzip"));
    }

    #[test]
    fn sibling_path_rejects_bad_names() {
        let root = PathBuf::from("/root");
        assert!(sibling_path(&root, &addr(), "").is_err());
        assert!(sibling_path(&root, &addr(), "a/b").is_err());
        assert!(sibling_path(&root, &addr(), "a.b").is_err());
    }

    #[test]
    fn prefix_and_object_name_validation() {
        assert!(is_valid_prefix_name("0A4D"));
        assert!(!is_valid_prefix_name("0A4"));
        assert!(!is_valid_prefix_name("0A4G"));
        assert!(is_valid_object_name(&"A".repeat(36)));
        assert!(!is_valid_object_name(&"A".repeat(35)));
    }
}
