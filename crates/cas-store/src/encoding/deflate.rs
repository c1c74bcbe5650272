//! Reference deflate realization of the [`Encoding`](super::Encoding) capability.

use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use super::Encoding;

/// Raw deflate encoding, named exactly `"deflate"`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeflateEncoding;

impl Encoding for DeflateEncoding {
    fn name(&self) -> &str {
        "deflate"
    }

    fn encode<'a>(&self, sink: Box<dyn Write + Send + 'a>) -> Box<dyn Write + Send + 'a> {
        Box::new(DeflateEncoder::new(sink, Compression::default()))
    }

    fn decode<'a>(&self, src: Box<dyn Read + Send + 'a>) -> Box<dyn Read + Send + 'a> {
        Box::new(DeflateDecoder::new(src))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read as _, Write as _};

    #[test]
    fn round_trips_arbitrary_bytes() {
        let enc = DeflateEncoding;
        let data = b"0123456789".repeat(500);

        let mut compressed = Vec::new();
        {
            let mut w = enc.encode(Box::new(&mut compressed));
            w.write_all(&data).unwrap();
            w.flush().unwrap();
        }

        let mut out = Vec::new();
        let mut r = enc.decode(Box::new(Cursor::new(compressed)));
        r.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn name_is_deflate() {
        assert_eq!(DeflateEncoding.name(), "deflate");
    }
}
