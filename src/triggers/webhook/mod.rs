//! Webhook trigger: backend event callbacks turned into push notifications.
//!
//! - `target`: device targeting from the query string
//! - `payload`: the accepted event schemas
//! - `classifier`: ordered first-match classification of raw bodies
//! - `translate`: payload + target to canonical notification record
//! - `handler`: the HTTP endpoint tying the steps together

mod classifier;
mod handler;
mod payload;
mod target;
mod translate;

pub use classifier::{
    classify, classify_value, classify_with, SchemaEntry, UnsupportedPayload, REGISTRY,
};
pub use handler::mobile_push_webhook;
pub use payload::{
    AddressTxsConfirmed, AddressTxsConfirmedData, Discriminator, LnurlPayInfo, LnurlPayInfoData,
    LnurlPayInvoice, LnurlPayInvoiceData, PaymentReceived, PaymentReceivedData, PayloadSchema,
    SchemaViolation, SwapUpdated, SwapUpdatedData, TxConfirmed, TxConfirmedData, WebhookPayload,
    SWAP_UPDATED_TEMPLATE,
};
pub use target::{MobilePushQuery, TargetDescriptor, TargetError};
