//! SSE stream handler.
//!
//! Each session registers one listener with the push hub, emits a
//! `connected` handshake, then forwards whatever the hub delivers. The
//! listener is unregistered when the response stream is dropped — client
//! disconnect included.

use std::convert::Infallible;
use std::sync::Arc;

use axum::http::HeaderName;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::StreamExt;
use futures::stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

use beacon_hub::{ListenerHandle, PushHub, LISTENER_BUFFER};

use crate::extractors::AuthUser;
use crate::state::AppState;
use axum::extract::State;

/// Unregisters the listener when the session's stream is dropped.
struct SessionGuard {
    hub: Arc<PushHub>,
    handle: ListenerHandle,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.hub.unregister(&self.handle);
        info!(
            tenant = %self.handle.tenant_key,
            user = %self.handle.user_id,
            "SSE stream closed"
        );
    }
}

/// GET /notifications/stream — long-lived SSE push channel.
pub async fn stream(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let (tx, rx) = mpsc::channel::<String>(LISTENER_BUFFER);
    let handle = state.hub.register(&auth.tenant_key, &auth.user_id, tx);

    info!(tenant = %auth.tenant_key, user = %auth.user_id, "SSE stream opened");

    let guard = SessionGuard {
        hub: state.hub.clone(),
        handle,
    };

    let connected = Event::default().event("connected").data(r#"{"status":"ok"}"#);
    let notifications = ReceiverStream::new(rx)
        .map(|payload| Event::default().event("notification").data(payload));

    let events = stream::once(async move { connected })
        .chain(notifications)
        .map(move |event| {
            // The guard lives as long as the stream; dropping the response
            // body unregisters the listener.
            let _keep_registered = &guard;
            Ok::<Event, Infallible>(event)
        });

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
            (HeaderName::from_static("x-accel-buffering"), "no"),
        ],
        Sse::new(events).keep_alive(KeepAlive::default()),
    )
}
