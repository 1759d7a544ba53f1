//! First-match classification of raw webhook bodies.
//!
//! The body is parsed into a `serde_json::Value` once and every registered
//! schema attempts a typed extraction from that value, in registry order.
//! The first schema that both decodes and validates wins.

use std::fmt;

use axum::body::Bytes;
use serde_json::Value;
use thiserror::Error;

use super::payload::{
    AddressTxsConfirmed, Discriminator, LnurlPayInfo, LnurlPayInvoice, PaymentReceived,
    PayloadSchema, SchemaViolation, SwapUpdated, TxConfirmed, WebhookPayload,
};

/// A registered schema: identity plus its extraction routine
#[derive(Clone, Copy)]
pub struct SchemaEntry {
    pub name: &'static str,
    pub discriminator: Discriminator,
    attempt: fn(&Value) -> Result<WebhookPayload, SchemaViolation>,
}

impl SchemaEntry {
    pub fn attempt(&self, value: &Value) -> Result<WebhookPayload, SchemaViolation> {
        (self.attempt)(value)
    }
}

impl fmt::Debug for SchemaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaEntry")
            .field("name", &self.name)
            .field("discriminator", &self.discriminator)
            .finish()
    }
}

/// serde would also decode a JSON array into a struct, in field order.
/// Only objects are accepted, for the body and for its `data` member.
fn require_objects(value: &Value) -> Result<(), SchemaViolation> {
    let Some(body) = value.as_object() else {
        return Err(SchemaViolation::NotAnObject("body"));
    };
    match body.get("data") {
        Some(data) if !data.is_object() => Err(SchemaViolation::NotAnObject("data")),
        _ => Ok(()),
    }
}

fn attempt<T: PayloadSchema>(value: &Value) -> Result<WebhookPayload, SchemaViolation> {
    require_objects(value)?;
    let payload = T::deserialize(value)?;
    payload.validate()?;
    Ok(payload.into())
}

macro_rules! schema_entry {
    ($schema:ty) => {
        SchemaEntry {
            name: <$schema>::NAME,
            discriminator: <$schema>::DISCRIMINATOR,
            attempt: attempt::<$schema>,
        }
    };
}

/// Registered schemas in match priority order. Earlier entries win ties.
pub static REGISTRY: &[SchemaEntry] = &[
    schema_entry!(LnurlPayInfo),
    schema_entry!(LnurlPayInvoice),
    schema_entry!(PaymentReceived),
    schema_entry!(TxConfirmed),
    schema_entry!(AddressTxsConfirmed),
    schema_entry!(SwapUpdated),
];

/// Body matched none of the registered schemas
#[derive(Debug, Error)]
#[error("unsupported payload: matched none of {attempted} schemas")]
pub struct UnsupportedPayload {
    body: Bytes,
    attempted: usize,
}

impl UnsupportedPayload {
    /// The raw body exactly as received
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }
}

/// Classify a raw body against the default registry.
pub fn classify(body: &Bytes) -> Result<WebhookPayload, UnsupportedPayload> {
    classify_with(REGISTRY, body)
}

/// Classify a raw body against the given schemas, in order.
pub fn classify_with(
    schemas: &[SchemaEntry],
    body: &Bytes,
) -> Result<WebhookPayload, UnsupportedPayload> {
    let unsupported = || UnsupportedPayload {
        body: body.clone(),
        attempted: schemas.len(),
    };

    // Not JSON at all: no schema can match.
    let value: Value = serde_json::from_slice(body).map_err(|_| unsupported())?;

    classify_value(schemas, &value).ok_or_else(unsupported)
}

/// Classify an already parsed body against the given schemas, in order.
pub fn classify_value(schemas: &[SchemaEntry], value: &Value) -> Option<WebhookPayload> {
    schemas
        .iter()
        .find_map(|schema| schema.attempt(value).ok())
}
