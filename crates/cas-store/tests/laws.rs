//! Property-based checks of the round-trip and idempotence laws.

use std::io::Cursor;

use cas_store::{Address, Store, StoreConfig};
use proptest::prelude::*;

proptest! {
    #[test]
    fn address_round_trip_law(bytes in prop::collection::vec(any::<u8>(), 20)) {
        let addr = Address::from_bytes(&bytes).unwrap();
        let text = addr.to_text();
        prop_assert_eq!(Address::parse(&text).unwrap(), addr);
        prop_assert_eq!(text, text.to_uppercase());
    }

    #[test]
    fn write_idempotence_law(data in prop::collection::vec(any::<u8>(), 0..4096)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let store = Store::new(StoreConfig::with_root(dir.path())).unwrap();

            let once = store.write(Cursor::new(data.clone()), None, &[]).await.unwrap();
            let twice_first = store.write(Cursor::new(data.clone()), None, &[]).await.unwrap();
            let twice_second = store.write(Cursor::new(data), None, &[]).await.unwrap();

            prop_assert_eq!(once, twice_first);
            prop_assert_eq!(twice_first, twice_second);

            let listed: Vec<Address> = store.list().unwrap().collect::<std::io::Result<Vec<_>>>().unwrap();
            prop_assert_eq!(listed.len(), 1);
            Ok(())
        })?;
    }
}
