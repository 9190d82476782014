//! # beacon-hub
//!
//! In-process broadcast index for live push sessions, keyed by
//! `(tenant, user)`. Delivery is best-effort: the persisted row is the
//! ground truth and a listener that misses a push recovers via pull.

pub mod hub;

pub use hub::{ListenerHandle, PushHub, LISTENER_BUFFER};
