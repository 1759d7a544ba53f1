//! Canonical notification records and their hand-off to the delivery subsystem.

mod deliverer;
mod dispatcher;
mod types;

pub use deliverer::{
    create_deliverer, DeliveryError, HttpDeliverer, LogDeliverer, NotificationDeliverer,
};
pub use dispatcher::{DispatcherStats, DispatcherStatsSnapshot, NotificationDispatcher};
pub use types::{DataValue, NotificationData, NotificationRecord, Platform, UnknownPlatform};
