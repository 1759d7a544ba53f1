use std::sync::Arc;

use crate::config::Settings;
use crate::notification::{create_deliverer, NotificationDeliverer, NotificationDispatcher};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let deliverer = create_deliverer(&settings.delivery);
        Self::with_deliverer(settings, deliverer)
    }

    /// Build state around an explicit delivery backend
    pub fn with_deliverer(settings: Settings, deliverer: Arc<dyn NotificationDeliverer>) -> Self {
        Self {
            settings: Arc::new(settings),
            dispatcher: Arc::new(NotificationDispatcher::new(deliverer)),
        }
    }
}
