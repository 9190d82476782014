//! # beacon-database
//!
//! PostgreSQL infrastructure for Beacon: connection pool construction,
//! migration runner, and the [`NotificationRepository`] implementation of
//! the `NotificationStore` port.
//!
//! [`NotificationRepository`]: repositories::notification::NotificationRepository

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::create_pool;
