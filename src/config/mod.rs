mod settings;

pub use settings::{DeliveryConfig, OtelConfig, ServerConfig, Settings};
