//! OTel-backed [`StoreObserver`] implementation. Provides counters for
//! write/read/delete volume and a dedup-hit rate; spans are best-effort.

use once_cell::sync::OnceCell;
use opentelemetry::metrics::{Counter, Meter, Unit};
use opentelemetry::{global, KeyValue};

use cas_store::{ObserverSpan, StoreObserver};

struct Instruments {
    write_bytes: Counter<u64>,
    read_bytes: Counter<u64>,
    dedup_hits: Counter<u64>,
    deletes: Counter<u64>,
}

static INSTR: OnceCell<Instruments> = OnceCell::new();
static INSTANCE: OnceCell<OtelStoreObserver> = OnceCell::new();

fn ensure_instruments() -> &'static Instruments {
    INSTR.get_or_init(|| {
        let meter: Meter = global::meter("cas_store");
        Instruments {
            write_bytes: meter
                .u64_counter("cas_store.write.bytes")
                .with_description("Bytes accepted by write()")
                .with_unit(Unit::new("By"))
                .init(),
            read_bytes: meter
                .u64_counter("cas_store.read.bytes")
                .with_description("Bytes reported by successful reads")
                .with_unit(Unit::new("By"))
                .init(),
            dedup_hits: meter
                .u64_counter("cas_store.write.dedup_hits")
                .with_description("Writes that resolved to content already present")
                .init(),
            deletes: meter
                .u64_counter("cas_store.delete.count")
                .with_description("Base-or-sibling files removed by delete()")
                .init(),
        }
    })
}

/// A [`StoreObserver`] that mirrors every event into an OTLP metrics
/// pipeline via the global OpenTelemetry meter provider.
#[derive(Clone, Copy)]
pub struct OtelStoreObserver;

impl StoreObserver for OtelStoreObserver {
    fn write_bytes(&self, n: u64) {
        if n > 0 {
            ensure_instruments().write_bytes.add(n, &[KeyValue::new("op", "write")]);
        }
    }

    fn dedup_hit(&self) {
        ensure_instruments().dedup_hits.add(1, &[]);
    }

    fn read_bytes(&self, n: u64) {
        if n > 0 {
            ensure_instruments().read_bytes.add(n, &[KeyValue::new("op", "read")]);
        }
    }

    fn delete_count(&self, n: u64) {
        if n > 0 {
            ensure_instruments().deletes.add(n, &[]);
        }
    }

    fn span(&self, name: &'static str) -> ObserverSpan {
        let span = tracing::span!(tracing::Level::INFO, "cas_store", op = name);
        ObserverSpan::from_guard(span.entered())
    }
}

/// The process-wide instance, suitable for [`cas_store::set_observer`].
pub fn global() -> &'static OtelStoreObserver {
    INSTANCE.get_or_init(|| {
        let _ = ensure_instruments();
        OtelStoreObserver
    })
}
