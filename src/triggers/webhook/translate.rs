use crate::notification::NotificationRecord;

use super::payload::WebhookPayload;
use super::target::TargetDescriptor;

impl WebhookPayload {
    /// Build the canonical notification for this payload and device target.
    pub fn to_notification(&self, target: &TargetDescriptor) -> NotificationRecord {
        NotificationRecord {
            template: self.template().to_string(),
            display_message: self.display_message().to_string(),
            platform: target.platform,
            target_token: target.token.clone(),
            app_data: target.app_data.clone(),
            data: self.data(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Bytes;
    use serde_json::json;

    use super::*;
    use crate::notification::{DataValue, NotificationData, Platform};
    use crate::triggers::webhook::classifier::classify;

    fn classify_json(value: serde_json::Value) -> WebhookPayload {
        classify(&Bytes::from(serde_json::to_vec(&value).unwrap())).unwrap()
    }

    fn ios_target() -> TargetDescriptor {
        TargetDescriptor {
            platform: Platform::Ios,
            token: "abc123".to_string(),
            app_data: None,
        }
    }

    #[test]
    fn test_payment_received_record() {
        let payload = classify_json(json!({
            "template": "payment_received",
            "data": {"payment_hash": "h1"}
        }));

        let record = payload.to_notification(&ios_target());

        assert_eq!(
            record,
            NotificationRecord {
                template: "payment_received".to_string(),
                display_message: "Incoming payment".to_string(),
                platform: Platform::Ios,
                target_token: "abc123".to_string(),
                app_data: None,
                data: NotificationData::from([(
                    "payment_hash".to_string(),
                    DataValue::Text("h1".to_string())
                )]),
            }
        );
    }

    #[test]
    fn test_swap_update_uses_canonical_template() {
        let payload = classify_json(json!({
            "event": "swap.update",
            "data": {"id": "s1", "status": "done"}
        }));
        let target = TargetDescriptor {
            platform: Platform::Android,
            token: "tok".to_string(),
            app_data: Some("ctx".to_string()),
        };

        let record = payload.to_notification(&target);

        assert_eq!(record.template, "swap_updated");
        assert_ne!(record.template, "swap.update");
        assert_eq!(record.display_message, "Swap updated");
        assert_eq!(record.platform, Platform::Android);
        assert_eq!(record.app_data.as_deref(), Some("ctx"));
        assert_eq!(record.data.len(), 2);
        assert_eq!(record.data["status"], DataValue::Text("done".to_string()));
    }

    #[test]
    fn test_display_messages() {
        let cases = [
            (
                json!({"template": "lnurlpay_info", "data": {"callback_url": "c", "reply_url": "r"}}),
                "Receiving payment",
            ),
            (
                json!({"template": "lnurlpay_invoice", "data": {"amount": 7, "reply_url": "r"}}),
                "Invoice requested",
            ),
            (
                json!({"template": "tx_confirmed", "data": {"tx_id": "t"}}),
                "Transaction confirmed",
            ),
            (
                json!({"template": "address_txs_confirmed", "data": {"address": "a"}}),
                "Address transactions confirmed",
            ),
        ];

        for (body, message) in cases {
            let record = classify_json(body).to_notification(&ios_target());
            assert_eq!(record.display_message, message);
        }
    }

    #[test]
    fn test_translation_is_deterministic() {
        let payload = classify_json(json!({
            "template": "lnurlpay_invoice",
            "data": {"amount": 1000, "reply_url": "https://reply"}
        }));
        let target = ios_target();

        let first = serde_json::to_vec(&payload.to_notification(&target)).unwrap();
        let second = serde_json::to_vec(&payload.to_notification(&target)).unwrap();
        assert_eq!(first, second);
    }
}
