//! Request handling shared by the gRPC service and the HTTP gateway.
//!
//! Endpoints validate inbound requests, normalise pagination parameters, run the
//! storage call under a [`Deadline`](super::Deadline) and classify failures into
//! [`ServerError`](super::errors::ServerError)s. They never persist anything on
//! their own.

mod blog;
pub use blog::BlogEndpoint;

use std::time::Duration;

use super::Deadline;
use crate::{params, traits};

/// Shared context for all endpoints.
pub struct EndpointContext {
    pub store: traits::StoreRef,
    pub request_timeout: Duration,
}

impl EndpointContext {
    pub fn new(store: traits::StoreRef) -> Self {
        Self {
            store,
            request_timeout: params::configurables().request_timeout,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Budget of a request that carries no deadline of its own.
    pub fn deadline(&self) -> Deadline {
        Deadline::new(self.request_timeout)
    }
}
