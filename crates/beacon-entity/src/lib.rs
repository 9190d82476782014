//! # beacon-entity
//!
//! Domain model for the Beacon notification service: the persisted
//! notification row, its category, pre- and post-fan-out DTOs, and the
//! persistence port implemented by `beacon-database`.

pub mod fanout;
pub mod notification;

pub use fanout::{CreateNotificationInput, FanoutRequest, TargetScope};
pub use notification::category::NotificationCategory;
pub use notification::model::{Notification, NotificationFilter};
pub use notification::store::NotificationStore;
