use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Mobile platform a notification is delivered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported platform '{0}', expected 'ios' or 'android'")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    /// Case-sensitive: `iOS` or `ANDROID` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            other => Err(UnknownPlatform(other.to_string())),
        }
    }
}

/// A value in the notification data map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Unsigned(u64),
    Text(String),
}

impl From<u64> for DataValue {
    fn from(value: u64) -> Self {
        DataValue::Unsigned(value)
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::Text(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Text(value.to_string())
    }
}

/// Ordered so that serialized records are stable.
pub type NotificationData = BTreeMap<String, DataValue>;

/// Canonical notification handed to the delivery subsystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Outward-facing template name (e.g. "payment_received")
    pub template: String,
    /// Human-readable message shown on the device
    pub display_message: String,
    pub platform: Platform,
    /// Device push token
    pub target_token: String,
    /// Opaque app data, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_data: Option<String>,
    pub data: NotificationData,
}
