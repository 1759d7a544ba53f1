//! Tracing subscriber setup with optional OTLP span export.
//!
//! Webhook handling and dispatch spans (`http.mobile_push_webhook`,
//! `dispatcher.dispatch`) are exported when OpenTelemetry is enabled.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `NOTIFY_OTEL__ENABLED` | Enable OpenTelemetry tracing | `false` |
//! | `NOTIFY_OTEL__ENDPOINT` | OTLP gRPC endpoint | `http://localhost:4317` |
//! | `NOTIFY_OTEL__SERVICE_NAME` | Service name in traces | `notify-webhook` |
//! | `NOTIFY_OTEL__SAMPLING_RATIO` | Trace sampling ratio (0.0-1.0) | `1.0` |

use opentelemetry::{trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing_subscriber::{
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

use crate::config::OtelConfig;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("OTLP exporter: {0}")]
    Exporter(String),

    #[error("tracing subscriber already installed: {0}")]
    Subscriber(#[from] TryInitError),
}

/// Flushes and shuts down span export when dropped.
///
/// Hold it in `main` until the server has stopped; spans still queued in the
/// batch exporter are sent during the drop.
#[must_use]
pub struct TelemetryGuard {
    provider: Option<TracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        let Some(provider) = self.provider.take() else {
            return;
        };
        if let Err(e) = provider.shutdown() {
            tracing::warn!(error = %e, "Span exporter did not shut down cleanly");
        }
    }
}

/// Install the global tracing subscriber, exporting spans over OTLP when
/// `config.enabled` is set.
pub fn init_telemetry(config: &OtelConfig) -> Result<TelemetryGuard, TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let provider = config.enabled.then(|| span_pipeline(config)).transpose()?;
    let otel_layer = provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(config.service_name.clone()))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(otel_layer)
        .try_init()?;

    if provider.is_some() {
        tracing::info!(
            endpoint = %config.endpoint,
            service_name = %config.service_name,
            sampling_ratio = config.sampling_ratio,
            "Span export enabled"
        );
    } else {
        tracing::info!("Span export disabled");
    }

    Ok(TelemetryGuard { provider })
}

fn span_pipeline(config: &OtelConfig) -> Result<TracerProvider, TelemetryError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.endpoint)
        .build()
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

    Ok(TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_sampler(sampler(config.sampling_ratio))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(Resource::new([
            KeyValue::new(SERVICE_NAME, config.service_name.clone()),
            KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        ]))
        .build())
}

/// Ratios outside (0, 1) collapse to always-on / always-off.
fn sampler(ratio: f64) -> Sampler {
    if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    }
}
