//! Reference gzip realization of the [`Encoding`](super::Encoding) capability.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use super::Encoding;

/// Gzip encoding, named exactly `"gzip"`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GzipEncoding;

impl Encoding for GzipEncoding {
    fn name(&self) -> &str {
        "gzip"
    }

    fn encode<'a>(&self, sink: Box<dyn Write + Send + 'a>) -> Box<dyn Write + Send + 'a> {
        Box::new(GzEncoder::new(sink, Compression::default()))
    }

    fn decode<'a>(&self, src: Box<dyn Read + Send + 'a>) -> Box<dyn Read + Send + 'a> {
        Box::new(GzDecoder::new(src))
    }
}
