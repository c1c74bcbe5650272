//! Lazy, synchronous enumeration of every base object under the store
//! root. Built as a plain [`Iterator`] so callers can `take`, `filter`, or
//! break out of a `for` loop without the store buffering the whole listing.

use std::fs::ReadDir;
use std::io;
use std::path::PathBuf;

use crate::address::Address;
use crate::canonical;

/// Iterates the fan-out subdirectories, then the object filenames within
/// each, skipping anything that doesn't match the two-level naming
/// contract (stray files, the `.tmp` staging directory, encoded siblings).
pub struct Enumerator {
    root: PathBuf,
    top: ReadDir,
    current_prefix: Option<(String, ReadDir)>,
}

impl Enumerator {
    pub(crate) fn new(root: PathBuf) -> io::Result<Self> {
        let top = std::fs::read_dir(&root)?;
        Ok(Self { root, top, current_prefix: None })
    }

    /// The store root this enumerator was opened against.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn advance_prefix(&mut self) -> Option<io::Result<()>> {
        loop {
            let entry = match self.top.next()? {
                Ok(e) => e,
                Err(e) => return Some(Err(e)),
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            if !canonical::is_valid_prefix_name(&name) {
                continue;
            }
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            match std::fs::read_dir(&path) {
                Ok(rd) => {
                    self.current_prefix = Some((name, rd));
                    return Some(Ok(()));
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl Iterator for Enumerator {
    type Item = io::Result<Address>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_prefix.is_none() {
                match self.advance_prefix() {
                    Some(Ok(())) => {}
                    Some(Err(e)) => return Some(Err(e)),
                    None => return None,
                }
            }

            let (prefix, rd) = self.current_prefix.as_mut().unwrap();
            match rd.next() {
                Some(Ok(entry)) => {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    if !canonical::is_valid_object_name(&name) {
                        continue;
                    }
                    let text = format!("{prefix}{name}");
                    match Address::parse(&text) {
                        Ok(addr) => return Some(Ok(addr)),
                        Err(_) => continue,
                    }
                }
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    self.current_prefix = None;
                    continue;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::Coordinator;
    use crate::writer;
    use std::collections::BTreeSet;
    use std::io::Cursor;

    #[tokio::test]
    async fn lists_every_written_object_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let coordinator = Coordinator::new();
        let mut expected = BTreeSet::new();
        for b in 0u8..20 {
            let data = vec![b; 37];
            let addr = writer::write(dir.path(), &coordinator, Cursor::new(data), None, &[], writer::DEFAULT_BUF_LEN)
                .await
                .unwrap();
            expected.insert(addr);
        }

        let found: BTreeSet<Address> = Enumerator::new(dir.path().to_path_buf())
            .unwrap()
            .collect::<io::Result<BTreeSet<_>>>()
            .unwrap();
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn siblings_and_tmp_staging_are_not_listed() {
        use crate::encoding::{Encoding, GzipEncoding};
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let coordinator = Coordinator::new();
        let encodings: Vec<Arc<dyn Encoding>> = vec![Arc::new(GzipEncoding)];
        let addr = writer::write(dir.path(), &coordinator, Cursor::new(vec![3u8; 64]), None, &encodings, writer::DEFAULT_BUF_LEN)
            .await
            .unwrap();

        let found: Vec<Address> = Enumerator::new(dir.path().to_path_buf())
            .unwrap()
            .collect::<io::Result<Vec<_>>>()
            .unwrap();
        assert_eq!(found, vec![addr]);
    }

    #[test]
    fn empty_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let found: Vec<_> = Enumerator::new(dir.path().to_path_buf())
            .unwrap()
            .collect::<io::Result<Vec<_>>>()
            .unwrap();
        assert!(found.is_empty());
    }
}
