//! Named stream transform pairs (encode/decode), pluggable.

pub mod deflate;
pub mod gzip;
pub mod registry;

use std::io::{Read, Write};

/// A pluggable, named stream transform. `decode(encode(x))` must equal `x`
/// for every byte sequence `x`.
pub trait Encoding: Send + Sync {
    /// Stable identifier used as the filename suffix after the dot.
    fn name(&self) -> &str;

    /// Wrap a writable sink so that bytes written to the wrapper are stored
    /// encoded in `sink`.
    fn encode<'a>(&self, sink: Box<dyn Write + Send + 'a>) -> Box<dyn Write + Send + 'a>;

    /// Wrap a readable source so bytes read from the wrapper are decoded.
    fn decode<'a>(&self, src: Box<dyn Read + Send + 'a>) -> Box<dyn Read + Send + 'a>;
}

pub use deflate::DeflateEncoding;
pub use gzip::GzipEncoding;
pub use registry::EncodingRegistry;
