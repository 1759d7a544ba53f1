//! Event schemas accepted on the webhook.
//!
//! Every schema is identified by a discriminator field. Five of them use
//! `template`; swap updates arrive with `event` instead. Both spellings are
//! part of the wire format and must stay distinct.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::notification::NotificationData;

/// Canonical template name for swap status updates
pub const SWAP_UPDATED_TEMPLATE: &str = "swap_updated";

/// Field/value pair that identifies a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discriminator {
    pub field: &'static str,
    pub value: &'static str,
}

impl Discriminator {
    const fn template(value: &'static str) -> Self {
        Self {
            field: "template",
            value,
        }
    }

    const fn event(value: &'static str) -> Self {
        Self {
            field: "event",
            value,
        }
    }
}

/// Why a body did not match a schema
#[derive(Debug, Error)]
pub enum SchemaViolation {
    #[error("malformed body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("expected {field} = {expected:?}, got {actual:?}")]
    DiscriminatorMismatch {
        field: &'static str,
        expected: &'static str,
        actual: String,
    },

    #[error("{0} must be a JSON object")]
    NotAnObject(&'static str),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' must be at least {min}")]
    BelowMinimum { field: &'static str, min: u64 },
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), SchemaViolation> {
    if value.is_empty() {
        return Err(SchemaViolation::MissingField(field));
    }
    Ok(())
}

fn require_min(field: &'static str, value: u64, min: u64) -> Result<(), SchemaViolation> {
    if value < min {
        return Err(SchemaViolation::BelowMinimum { field, min });
    }
    Ok(())
}

/// A declarative event schema.
pub trait PayloadSchema: DeserializeOwned + Into<WebhookPayload> {
    /// Schema name used in logs
    const NAME: &'static str;
    const DISCRIMINATOR: Discriminator;
    const DISPLAY_MESSAGE: &'static str;

    /// Value found in the discriminator field of the body
    fn discriminator_value(&self) -> &str;

    /// Per-field constraints, checked after the discriminator.
    fn validate_fields(&self) -> Result<(), SchemaViolation>;

    /// Outward-facing template name
    fn template(&self) -> &str {
        self.discriminator_value()
    }

    fn data(&self) -> NotificationData;

    fn validate(&self) -> Result<(), SchemaViolation> {
        let actual = self.discriminator_value();
        if actual != Self::DISCRIMINATOR.value {
            return Err(SchemaViolation::DiscriminatorMismatch {
                field: Self::DISCRIMINATOR.field,
                expected: Self::DISCRIMINATOR.value,
                actual: actual.to_string(),
            });
        }
        self.validate_fields()
    }
}

// Absent fields decode to their defaults so that they fail validation as
// "missing" rather than as malformed JSON.

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LnurlPayInfoData {
    #[serde(default)]
    pub callback_url: String,
    #[serde(default)]
    pub reply_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LnurlPayInfo {
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub data: LnurlPayInfoData,
}

impl PayloadSchema for LnurlPayInfo {
    const NAME: &'static str = "LnurlPayInfo";
    const DISCRIMINATOR: Discriminator = Discriminator::template("lnurlpay_info");
    const DISPLAY_MESSAGE: &'static str = "Receiving payment";

    fn discriminator_value(&self) -> &str {
        &self.template
    }

    fn validate_fields(&self) -> Result<(), SchemaViolation> {
        require_non_empty("callback_url", &self.data.callback_url)?;
        require_non_empty("reply_url", &self.data.reply_url)
    }

    fn data(&self) -> NotificationData {
        NotificationData::from([
            ("callback_url".to_string(), self.data.callback_url.as_str().into()),
            ("reply_url".to_string(), self.data.reply_url.as_str().into()),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LnurlPayInvoiceData {
    /// Amount in millisatoshi
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub reply_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LnurlPayInvoice {
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub data: LnurlPayInvoiceData,
}

impl PayloadSchema for LnurlPayInvoice {
    const NAME: &'static str = "LnurlPayInvoice";
    const DISCRIMINATOR: Discriminator = Discriminator::template("lnurlpay_invoice");
    const DISPLAY_MESSAGE: &'static str = "Invoice requested";

    fn discriminator_value(&self) -> &str {
        &self.template
    }

    fn validate_fields(&self) -> Result<(), SchemaViolation> {
        require_min("amount", self.data.amount, 1)?;
        require_non_empty("reply_url", &self.data.reply_url)
    }

    fn data(&self) -> NotificationData {
        NotificationData::from([
            ("amount".to_string(), self.data.amount.into()),
            ("reply_url".to_string(), self.data.reply_url.as_str().into()),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaymentReceivedData {
    #[serde(default)]
    pub payment_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentReceived {
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub data: PaymentReceivedData,
}

impl PayloadSchema for PaymentReceived {
    const NAME: &'static str = "PaymentReceived";
    const DISCRIMINATOR: Discriminator = Discriminator::template("payment_received");
    const DISPLAY_MESSAGE: &'static str = "Incoming payment";

    fn discriminator_value(&self) -> &str {
        &self.template
    }

    fn validate_fields(&self) -> Result<(), SchemaViolation> {
        require_non_empty("payment_hash", &self.data.payment_hash)
    }

    fn data(&self) -> NotificationData {
        NotificationData::from([(
            "payment_hash".to_string(),
            self.data.payment_hash.as_str().into(),
        )])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TxConfirmedData {
    #[serde(default)]
    pub tx_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TxConfirmed {
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub data: TxConfirmedData,
}

impl PayloadSchema for TxConfirmed {
    const NAME: &'static str = "TxConfirmed";
    const DISCRIMINATOR: Discriminator = Discriminator::template("tx_confirmed");
    const DISPLAY_MESSAGE: &'static str = "Transaction confirmed";

    fn discriminator_value(&self) -> &str {
        &self.template
    }

    fn validate_fields(&self) -> Result<(), SchemaViolation> {
        require_non_empty("tx_id", &self.data.tx_id)
    }

    fn data(&self) -> NotificationData {
        NotificationData::from([("tx_id".to_string(), self.data.tx_id.as_str().into())])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddressTxsConfirmedData {
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressTxsConfirmed {
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub data: AddressTxsConfirmedData,
}

impl PayloadSchema for AddressTxsConfirmed {
    const NAME: &'static str = "AddressTxsConfirmed";
    const DISCRIMINATOR: Discriminator = Discriminator::template("address_txs_confirmed");
    const DISPLAY_MESSAGE: &'static str = "Address transactions confirmed";

    fn discriminator_value(&self) -> &str {
        &self.template
    }

    fn validate_fields(&self) -> Result<(), SchemaViolation> {
        require_non_empty("address", &self.data.address)
    }

    fn data(&self) -> NotificationData {
        NotificationData::from([("address".to_string(), self.data.address.as_str().into())])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SwapUpdatedData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SwapUpdated {
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub data: SwapUpdatedData,
}

impl PayloadSchema for SwapUpdated {
    const NAME: &'static str = "SwapUpdated";
    const DISCRIMINATOR: Discriminator = Discriminator::event("swap.update");
    const DISPLAY_MESSAGE: &'static str = "Swap updated";

    fn discriminator_value(&self) -> &str {
        &self.event
    }

    fn validate_fields(&self) -> Result<(), SchemaViolation> {
        require_non_empty("id", &self.data.id)?;
        require_non_empty("status", &self.data.status)
    }

    fn template(&self) -> &str {
        SWAP_UPDATED_TEMPLATE
    }

    fn data(&self) -> NotificationData {
        NotificationData::from([
            ("id".to_string(), self.data.id.as_str().into()),
            ("status".to_string(), self.data.status.as_str().into()),
        ])
    }
}

/// A body that matched exactly one registered schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookPayload {
    LnurlPayInfo(LnurlPayInfo),
    LnurlPayInvoice(LnurlPayInvoice),
    PaymentReceived(PaymentReceived),
    TxConfirmed(TxConfirmed),
    AddressTxsConfirmed(AddressTxsConfirmed),
    SwapUpdated(SwapUpdated),
}

macro_rules! impl_from_schema {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for WebhookPayload {
                fn from(payload: $variant) -> Self {
                    WebhookPayload::$variant(payload)
                }
            }
        )*
    };
}

impl_from_schema!(
    LnurlPayInfo,
    LnurlPayInvoice,
    PaymentReceived,
    TxConfirmed,
    AddressTxsConfirmed,
    SwapUpdated,
);

impl WebhookPayload {
    pub fn schema_name(&self) -> &'static str {
        match self {
            WebhookPayload::LnurlPayInfo(_) => LnurlPayInfo::NAME,
            WebhookPayload::LnurlPayInvoice(_) => LnurlPayInvoice::NAME,
            WebhookPayload::PaymentReceived(_) => PaymentReceived::NAME,
            WebhookPayload::TxConfirmed(_) => TxConfirmed::NAME,
            WebhookPayload::AddressTxsConfirmed(_) => AddressTxsConfirmed::NAME,
            WebhookPayload::SwapUpdated(_) => SwapUpdated::NAME,
        }
    }

    pub fn template(&self) -> &str {
        match self {
            WebhookPayload::LnurlPayInfo(p) => p.template(),
            WebhookPayload::LnurlPayInvoice(p) => p.template(),
            WebhookPayload::PaymentReceived(p) => p.template(),
            WebhookPayload::TxConfirmed(p) => p.template(),
            WebhookPayload::AddressTxsConfirmed(p) => p.template(),
            WebhookPayload::SwapUpdated(p) => p.template(),
        }
    }

    pub fn display_message(&self) -> &'static str {
        match self {
            WebhookPayload::LnurlPayInfo(_) => LnurlPayInfo::DISPLAY_MESSAGE,
            WebhookPayload::LnurlPayInvoice(_) => LnurlPayInvoice::DISPLAY_MESSAGE,
            WebhookPayload::PaymentReceived(_) => PaymentReceived::DISPLAY_MESSAGE,
            WebhookPayload::TxConfirmed(_) => TxConfirmed::DISPLAY_MESSAGE,
            WebhookPayload::AddressTxsConfirmed(_) => AddressTxsConfirmed::DISPLAY_MESSAGE,
            WebhookPayload::SwapUpdated(_) => SwapUpdated::DISPLAY_MESSAGE,
        }
    }

    pub fn data(&self) -> NotificationData {
        match self {
            WebhookPayload::LnurlPayInfo(p) => p.data(),
            WebhookPayload::LnurlPayInvoice(p) => p.data(),
            WebhookPayload::PaymentReceived(p) => p.data(),
            WebhookPayload::TxConfirmed(p) => p.data(),
            WebhookPayload::AddressTxsConfirmed(p) => p.data(),
            WebhookPayload::SwapUpdated(p) => p.data(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::notification::DataValue;

    fn parse<T: PayloadSchema>(value: serde_json::Value) -> Result<T, SchemaViolation> {
        let payload: T = serde_json::from_value(value)?;
        payload.validate()?;
        Ok(payload)
    }

    #[test]
    fn test_lnurlpay_info_requires_both_urls() {
        let ok = parse::<LnurlPayInfo>(json!({
            "template": "lnurlpay_info",
            "data": {"callback_url": "https://cb", "reply_url": "https://reply"}
        }))
        .unwrap();
        assert_eq!(ok.data.callback_url, "https://cb");

        let err = parse::<LnurlPayInfo>(json!({
            "template": "lnurlpay_info",
            "data": {"callback_url": "https://cb"}
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaViolation::MissingField("reply_url")));
    }

    #[test]
    fn test_lnurlpay_invoice_amount_minimum() {
        let err = parse::<LnurlPayInvoice>(json!({
            "template": "lnurlpay_invoice",
            "data": {"amount": 0, "reply_url": "https://reply"}
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaViolation::BelowMinimum { field: "amount", min: 1 }
        ));

        let err = parse::<LnurlPayInvoice>(json!({
            "template": "lnurlpay_invoice",
            "data": {"reply_url": "https://reply"}
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaViolation::BelowMinimum { .. }));

        let ok = parse::<LnurlPayInvoice>(json!({
            "template": "lnurlpay_invoice",
            "data": {"amount": 1, "reply_url": "https://reply"}
        }))
        .unwrap();
        assert_eq!(ok.data.amount, 1);
    }

    #[test]
    fn test_lnurlpay_invoice_rejects_non_integer_amounts() {
        for amount in [json!(-5), json!(1.5), json!("100")] {
            let err = parse::<LnurlPayInvoice>(json!({
                "template": "lnurlpay_invoice",
                "data": {"amount": amount, "reply_url": "https://reply"}
            }))
            .unwrap_err();
            assert!(matches!(err, SchemaViolation::Decode(_)));
        }
    }

    #[test]
    fn test_discriminator_mismatch() {
        let err = parse::<TxConfirmed>(json!({
            "template": "payment_received",
            "data": {"tx_id": "t1"}
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaViolation::DiscriminatorMismatch { field: "template", expected: "tx_confirmed", .. }
        ));
    }

    #[test]
    fn test_empty_required_string_is_missing() {
        let err = parse::<PaymentReceived>(json!({
            "template": "payment_received",
            "data": {"payment_hash": ""}
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaViolation::MissingField("payment_hash")));
    }

    #[test]
    fn test_missing_data_object() {
        let err = parse::<AddressTxsConfirmed>(json!({"template": "address_txs_confirmed"}))
            .unwrap_err();
        assert!(matches!(err, SchemaViolation::MissingField("address")));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let ok = parse::<TxConfirmed>(json!({
            "template": "tx_confirmed",
            "data": {"tx_id": "t1", "block_height": 800000},
            "sent_at": "2024-01-01"
        }))
        .unwrap();
        assert_eq!(ok.data.tx_id, "t1");
    }

    // Swap updates are keyed by `event`, not `template`.
    #[test]
    fn test_swap_update_uses_event_field() {
        let ok = parse::<SwapUpdated>(json!({
            "event": "swap.update",
            "data": {"id": "s1", "status": "done"}
        }))
        .unwrap();
        assert_eq!(ok.template(), SWAP_UPDATED_TEMPLATE);

        let err = parse::<SwapUpdated>(json!({
            "template": "swap.update",
            "data": {"id": "s1", "status": "done"}
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaViolation::DiscriminatorMismatch { field: "event", .. }
        ));
    }

    #[test]
    fn test_data_mapping_types() {
        let payload = WebhookPayload::from(
            parse::<LnurlPayInvoice>(json!({
                "template": "lnurlpay_invoice",
                "data": {"amount": 21000, "reply_url": "https://reply"}
            }))
            .unwrap(),
        );

        let data = payload.data();
        assert_eq!(data.get("amount"), Some(&DataValue::Unsigned(21000)));
        assert_eq!(
            data.get("reply_url"),
            Some(&DataValue::Text("https://reply".to_string()))
        );
        assert_eq!(payload.display_message(), "Invoice requested");
        assert_eq!(payload.schema_name(), "LnurlPayInvoice");
    }

    #[test]
    fn test_discriminator_values_are_distinct() {
        let discriminators = [
            LnurlPayInfo::DISCRIMINATOR,
            LnurlPayInvoice::DISCRIMINATOR,
            PaymentReceived::DISCRIMINATOR,
            TxConfirmed::DISCRIMINATOR,
            AddressTxsConfirmed::DISCRIMINATOR,
            SwapUpdated::DISCRIMINATOR,
        ];
        for (i, a) in discriminators.iter().enumerate() {
            for b in &discriminators[i + 1..] {
                assert_ne!(a.value, b.value);
            }
        }
    }
}
