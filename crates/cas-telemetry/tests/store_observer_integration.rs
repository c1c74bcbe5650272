#![cfg(feature = "otel")]

use std::sync::Arc;

use cas_store::{set_observer, Encoding, GzipEncoding, Store, StoreConfig};
use cas_telemetry::store_observer::global as store_global;

fn temp_dir_path() -> std::path::PathBuf {
    let p = std::env::temp_dir().join(format!("cas_store_obs_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&p);
    std::fs::create_dir_all(&p).unwrap();
    p
}

#[tokio::test]
async fn registers_observer_and_survives_write_dedup_delete() {
    let _ = set_observer(store_global());

    let dir = temp_dir_path();
    let store = Store::new(StoreConfig::with_root(&dir)).unwrap();
    let encodings: Vec<Arc<dyn Encoding>> = vec![Arc::new(GzipEncoding)];

    let data = b"abc".repeat(100);
    let first = store.write(std::io::Cursor::new(data.clone()), None, &encodings).await.unwrap();
    let second = store.write(std::io::Cursor::new(data), None, &encodings).await.unwrap();
    assert_eq!(first, second);

    assert!(store.delete(&first).await.unwrap());

    let _ = std::fs::remove_dir_all(&dir);
}
