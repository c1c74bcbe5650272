//! Convenience registry mapping encoding names to capabilities, so callers
//! can build a slice of encodings once and pass it to every write instead
//! of threading individual `Arc<dyn Encoding>` values through call sites.

use std::collections::HashMap;
use std::sync::Arc;

use super::{DeflateEncoding, Encoding, GzipEncoding};

/// A small lookup of encoding name -> capability, built once by the caller
/// and handed to [`Store::write`](crate::store::Store::write) as a slice.
#[derive(Clone, Default)]
pub struct EncodingRegistry {
    by_name: HashMap<String, Arc<dyn Encoding>>,
}

impl EncodingRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self { by_name: HashMap::new() }
    }

    /// A registry pre-populated with the reference `gzip` and `deflate`
    /// encodings.
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        reg.insert(Arc::new(GzipEncoding));
        reg.insert(Arc::new(DeflateEncoding));
        reg
    }

    /// Register (or replace) an encoding under its own name.
    pub fn insert(&mut self, encoding: Arc<dyn Encoding>) {
        self.by_name.insert(encoding.name().to_string(), encoding);
    }

    /// Look up an encoding by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Encoding>> {
        self.by_name.get(name).cloned()
    }

    /// All registered encodings, in unspecified order.
    pub fn all(&self) -> Vec<Arc<dyn Encoding>> {
        self.by_name.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_gzip_and_deflate() {
        let reg = EncodingRegistry::with_defaults();
        assert!(reg.get("gzip").is_some());
        assert!(reg.get("deflate").is_some());
        assert!(reg.get("zstd").is_none());
    }
}
