//! # beacon-core
//!
//! Core crate for the Beacon notification service. Contains configuration
//! schemas, the unified error system, and shared response types.
//!
//! This crate has **no** internal dependencies on other Beacon crates.

pub mod config;
pub mod error;
pub mod response;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
