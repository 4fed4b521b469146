//! Call notification model

pub mod payload;
pub mod render;

pub use payload::{
    CallNotification, ForegroundServiceType, Importance, NotificationAction,
    NotificationActionId, NotificationChannel, Visibility,
};
pub use render::{NotificationRenderer, ServiceTypePolicy};
