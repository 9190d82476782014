//! Event handler registry.
//!
//! Decoders are registered once during startup through [`RegistryBuilder`]
//! and the resulting [`HandlerRegistry`] is immutable: dispatch never takes
//! a lock. Registering two decoders for the same `(topic, eventType)` is a
//! programmer error and panics at build time.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use beacon_entity::fanout::FanoutRequest;

/// Maps raw record bytes to a fan-out request. `None` means "skip this
/// record" — malformed, uninteresting, or failing decoder validation.
pub type Decoder = fn(&[u8]) -> Option<FanoutRequest>;

fn registry_key(topic: &str, event_type: &str) -> String {
    format!("{topic}:{event_type}")
}

/// Accumulates decoder registrations before the process enters its main
/// phase.
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: HashMap<String, Decoder>,
}

impl RegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a decoder to a `(topic, eventType)` pair.
    ///
    /// # Panics
    ///
    /// Panics when the pair is already registered.
    pub fn register(mut self, topic: &str, event_type: &str, decoder: Decoder) -> Self {
        let key = registry_key(topic, event_type);
        if self.handlers.insert(key.clone(), decoder).is_some() {
            panic!("registry: duplicate handler registered for key: {key}");
        }
        self
    }

    /// Bind a decoder to a whole topic, bypassing `eventType` routing.
    /// Used for topics like `notification-commands` where the entire record
    /// is the command.
    ///
    /// # Panics
    ///
    /// Panics when the topic already has a direct decoder.
    pub fn register_direct(self, topic: &str, decoder: Decoder) -> Self {
        self.register(topic, "", decoder)
    }

    /// Freeze the table.
    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            handlers: self.handlers,
        }
    }
}

/// The frozen decoder table.
pub struct HandlerRegistry {
    handlers: HashMap<String, Decoder>,
}

impl HandlerRegistry {
    /// Typed dispatch: peek at the `eventType` field of the JSON envelope
    /// and route. Unparseable bytes, a missing key, or no registered decoder
    /// all skip the record.
    pub fn dispatch(&self, topic: &str, payload: &[u8]) -> Option<FanoutRequest> {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(default, rename = "eventType")]
            event_type: String,
        }

        let probe: Probe = match serde_json::from_slice(payload) {
            Ok(p) => p,
            Err(e) => {
                warn!(topic, error = %e, "registry: failed to probe eventType");
                return None;
            }
        };

        let key = registry_key(topic, &probe.event_type);
        match self.handlers.get(&key) {
            Some(decoder) => decoder(payload),
            None => {
                debug!(key, "registry: no handler registered");
                None
            }
        }
    }

    /// Direct dispatch: the decoder registered for the topic itself, without
    /// `eventType` routing.
    pub fn dispatch_direct(&self, topic: &str, payload: &[u8]) -> Option<FanoutRequest> {
        let decoder = self.handlers.get(&registry_key(topic, ""))?;
        decoder(payload)
    }

    /// Decode a record the way the consumer does: direct dispatch first,
    /// then typed dispatch.
    pub fn decode(&self, topic: &str, payload: &[u8]) -> Option<FanoutRequest> {
        self.dispatch_direct(topic, payload)
            .or_else(|| self.dispatch(topic, payload))
    }
}
