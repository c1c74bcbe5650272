use std::sync::Arc;

use cas_store::{Encoding, GzipEncoding, Store, StoreConfig};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    cas_telemetry::init_json_logging();

    #[cfg(feature = "otel")]
    {
        cas_telemetry::init_otel("cas-store-demo")?;
        cas_store::set_observer(cas_telemetry::store_observer::global());
    }

    let dir = std::env::temp_dir().join("cas_store_otlp_demo");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir)?;

    let store = Store::new(StoreConfig::with_root(&dir))?;
    let encodings: Vec<Arc<dyn Encoding>> = vec![Arc::new(GzipEncoding)];

    let data = b"hello otlp".to_vec();
    let address = store.write(std::io::Cursor::new(data.clone()), None, &encodings).await?;
    let again = store.write(std::io::Cursor::new(data), None, &encodings).await?;
    assert_eq!(address, again);

    println!("wrote and deduplicated object {address}");
    Ok(())
}
