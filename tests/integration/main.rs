//! Router-level integration tests against an in-memory store.

mod api_test;
mod helpers;
mod stream_test;
