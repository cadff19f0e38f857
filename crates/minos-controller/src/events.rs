//! Controller lifecycle notifications.
//!
//! The dispatcher and the render helpers publish [`ControllerEvent`]s on an
//! [`EventBus`]. Publishing never blocks and never fails; events sent while
//! nobody listens are dropped.

use std::time::Duration;

use http::Method;
use minos_core::RequestContext;
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 256;

/// A request lifecycle notification.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    /// A bound route accepted a request.
    RequestStarted {
        /// Request method.
        method: Method,
        /// Request URL including the query.
        url: String,
    },
    /// A template finished rendering, successfully or not.
    RenderFinished {
        /// Template name.
        template: String,
        /// Time spent in the template engine.
        elapsed: Duration,
    },
    /// The response for a rendered request is complete.
    RequestFinished {
        /// Request method.
        method: Method,
        /// Time since dispatch started.
        elapsed: Duration,
        /// Dispatch metadata, when the request went through the dispatcher.
        context: Option<RequestContext>,
    },
}

impl ControllerEvent {
    /// Short event name, as used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RequestStarted { .. } => "request-started",
            Self::RenderFinished { .. } => "render-finished",
            Self::RequestFinished { .. } => "request-finished",
        }
    }
}

/// Broadcast channel for [`ControllerEvent`]s.
///
/// Cloning yields another handle to the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ControllerEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per slow subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes `event` to every current subscriber.
    pub fn emit(&self, event: ControllerEvent) {
        tracing::trace!(event = event.name(), "controller event");
        let _ = self.sender.send(event);
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}
