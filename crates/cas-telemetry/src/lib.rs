//! Structured logging bootstrap and an optional OpenTelemetry-backed
//! [`cas_store::StoreObserver`] implementation.

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

#[cfg(feature = "otel")]
pub mod store_observer;

/// Errors from setting up the optional OTel pipeline.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The OTLP exporter or pipeline failed to initialize.
    #[error("otel setup failed: {0}")]
    Otel(String),
}

/// Install a JSON-formatted `tracing` subscriber filtered by `RUST_LOG`
/// (default `info`). Safe to call once at process startup; a second call
/// is a silent no-op since a global subscriber is already installed.
pub fn init_json_logging() {
    let fmt_layer = fmt::layer().json().with_current_span(true).with_span_list(true);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Initialize the OTel tracer pipeline (behind the `otel` feature). Does
/// not attach a tracing-subscriber layer; combine with
/// [`init_json_logging`] if both log and trace export are wanted.
#[cfg(feature = "otel")]
pub fn init_otel(service_name: &str) -> Result<(), TelemetryError> {
    use opentelemetry::KeyValue;
    use opentelemetry_sdk::trace as sdktrace;
    use opentelemetry_sdk::{runtime, Resource};

    let resource = Resource::new(vec![KeyValue::new("service.name", service_name.to_owned())]);
    let _tracer_provider = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(opentelemetry_otlp::new_exporter().http())
        .with_trace_config(sdktrace::config().with_resource(resource))
        .install_batch(runtime::Tokio)
        .map_err(|e| TelemetryError::Otel(e.to_string()))?;
    Ok(())
}
