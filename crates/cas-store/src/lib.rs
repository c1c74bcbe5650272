//! Content-addressable filesystem store.
//!
//! Objects are identified by the SHA-1 digest of their bytes, written
//! atomically via a staged temp file and rename, and deduplicated
//! automatically: two writes of identical content resolve to the same
//! address and the second never touches the filesystem's object table
//! twice. Pre-encoded "sibling" artifacts (gzip, deflate, or any type
//! implementing [`Encoding`]) can be materialized alongside an object for
//! callers that want to skip the recompression on every read.

mod address;
mod cancel;
mod canonical;
mod coordinator;
mod deleter;
mod digest;
mod encoding;
mod enumerator;
mod error;
mod observer;
mod reader;
mod store;
mod writer;

pub use address::{Address, ParseError, ADDRESS_LEN};
pub use cancel::CancelToken;
pub use coordinator::Coordinator;
pub use digest::{compute_async, compute_sync, DigestAccumulator};
pub use encoding::{DeflateEncoding, Encoding, EncodingRegistry, GzipEncoding};
pub use enumerator::Enumerator;
pub use error::Error;
pub use observer::{set_observer, ObserverSpan, StoreObserver};
pub use reader::{ReadOptions, StoredReader};
pub use store::{Store, StoreConfig};
