//! Streaming SHA-1 accumulator and one-shot digest helpers.

use std::io::{self, Read};

use sha1::{Digest as _, Sha1};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::address::Address;

/// Size of the read buffer used by the one-shot digest paths, matching the
/// writer's streaming loop buffer size.
pub const DIGEST_BUFFER_BYTES: usize = 4096;

/// Streaming SHA-1 accumulator. Not safe for concurrent calls on the same
/// instance; build one per hashing operation.
pub struct DigestAccumulator {
    inner: Sha1,
}

impl DigestAccumulator {
    /// Start a fresh accumulator.
    pub fn new() -> Self {
        Self { inner: Sha1::new() }
    }

    /// Feed more bytes into the running digest.
    pub fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    /// Consume the accumulator and produce the resulting address.
    pub fn finalize(self) -> Address {
        let out = self.inner.finalize();
        Address::from_bytes(&out).expect("SHA-1 output is always 20 bytes")
    }
}

impl Default for DigestAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot digest over a synchronous stream, read to EOF in 4 096-byte
/// chunks. Safe to call concurrently from multiple threads on distinct
/// streams: each call owns a fresh accumulator.
pub fn compute_sync<R: Read>(mut reader: R) -> io::Result<Address> {
    let mut acc = DigestAccumulator::new();
    let mut buf = [0u8; DIGEST_BUFFER_BYTES];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        acc.update(&buf[..n]);
    }
    Ok(acc.finalize())
}

/// One-shot digest over an async stream, read to EOF in 4 096-byte chunks.
pub async fn compute_async<R: AsyncRead + Unpin>(mut reader: R) -> io::Result<Address> {
    let mut acc = DigestAccumulator::new();
    let mut buf = [0u8; DIGEST_BUFFER_BYTES];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        acc.update(&buf[..n]);
    }
    Ok(acc.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn known_vector_hello_world() {
        let addr = compute_sync(Cursor::new(b"Hello World".to_vec())).unwrap();
        assert_eq!(addr.to_text(), "0A4D55A8D778E5022FAB701977C5D840BBC486D0");
    }

    #[tokio::test]
    async fn async_matches_sync() {
        let data = b"the quick brown fox jumps over the lazy dog".to_vec();
        let sync = compute_sync(Cursor::new(data.clone())).unwrap();
        let asyn = compute_async(Cursor::new(data)).await.unwrap();
        assert_eq!(sync, asyn);
    }

    #[test]
    fn streaming_matches_one_shot() {
        let data = vec![0xAB; 100_000];
        let mut acc = DigestAccumulator::new();
        for chunk in data.chunks(777) {
            acc.update(chunk);
        }
        let streamed = acc.finalize();
        let one_shot = compute_sync(Cursor::new(data)).unwrap();
        assert_eq!(streamed, one_shot);
    }

    #[test]
    fn empty_input_has_known_digest() {
        let addr = compute_sync(Cursor::new(Vec::new())).unwrap();
        assert_eq!(addr.to_text(), "DA39A3EE5E6B4B0D3255BFEF95601890AFD80709");
    }
}
