//! Device targeting parameters taken from the webhook query string.

use thiserror::Error;

use crate::notification::{Platform, UnknownPlatform};

/// Raw query parameters of a mobile push webhook
#[derive(Debug, Default, Clone)]
pub struct MobilePushQuery {
    pub platform: Option<String>,
    pub token: Option<String>,
    pub app_data: Option<String>,
}

/// Builds the query from decoded key/value pairs. A repeated key keeps its
/// first value; unknown keys are ignored.
impl FromIterator<(String, String)> for MobilePushQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "platform" => &mut query.platform,
                "token" => &mut query.token,
                "app_data" => &mut query.app_data,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

/// Validated device target for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    pub platform: Platform,
    pub token: String,
    /// Opaque to this service
    pub app_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("missing required query parameter 'platform'")]
    MissingPlatform,

    #[error(transparent)]
    InvalidPlatform(#[from] UnknownPlatform),

    #[error("missing required query parameter 'token'")]
    MissingToken,
}

impl TryFrom<MobilePushQuery> for TargetDescriptor {
    type Error = TargetError;

    fn try_from(query: MobilePushQuery) -> Result<Self, Self::Error> {
        let platform = query
            .platform
            .filter(|p| !p.is_empty())
            .ok_or(TargetError::MissingPlatform)?
            .parse::<Platform>()?;

        let token = query
            .token
            .filter(|t| !t.is_empty())
            .ok_or(TargetError::MissingToken)?;

        Ok(Self {
            platform,
            token,
            app_data: query.app_data,
        })
    }
}
