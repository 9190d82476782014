//! # beacon-service
//!
//! Application services for Beacon: the fan-out pipeline that turns one
//! broker event into per-recipient rows and live pushes, the query service
//! behind the pull API, and the periodic retention purge.

pub mod fanout;
pub mod notification;
pub mod retention;

pub use fanout::FanoutService;
pub use notification::NotificationService;
pub use retention::RetentionTask;
