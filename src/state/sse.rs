use tokio::sync::{Mutex, broadcast};

use crate::dto::sse::ServerEvent;

/// SSE-specific sub-state carved out from [`AppState`](super::AppState).
pub struct SseState {
    public: SseHub,
    admin: AdminSseState,
}

impl SseState {
    /// Build the SSE sub-tree with per-stream channel capacities.
    pub fn new(public_capacity: usize, admin_capacity: usize) -> Self {
        Self {
            public: SseHub::new(public_capacity),
            admin: AdminSseState::new(admin_capacity),
        }
    }

    /// Hub feeding scoreboard displays.
    pub fn public(&self) -> &SseHub {
        &self.public
    }

    /// Operator console hub and its token.
    pub fn admin(&self) -> &AdminSseState {
        &self.admin
    }
}

/// The operator console stream: one hub and the token of its single subscriber.
pub struct AdminSseState {
    hub: SseHub,
    token: Mutex<Option<String>>,
}

impl AdminSseState {
    fn new(capacity: usize) -> Self {
        Self {
            hub: SseHub::new(capacity),
            token: Mutex::new(None),
        }
    }

    /// Borrow the broadcast hub used for operator-only events.
    pub fn hub(&self) -> &SseHub {
        &self.hub
    }

    /// Token issued to the connected operator console, if any.
    pub fn token(&self) -> &Mutex<Option<String>> {
        &self.token
    }
}

/// Fan-out of [`ServerEvent`]s to every connected SSE client.
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SseHub {
    /// Construct a hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Whether any client is currently listening.
    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }

    /// Send an event to all current subscribers. Having nobody listening is not an error.
    pub fn broadcast(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_events_in_order() {
        let hub = SseHub::new(4);
        assert!(!hub.has_subscribers());

        let mut rx = hub.subscribe();
        assert!(hub.has_subscribers());

        hub.broadcast(ServerEvent::new(Some("info".to_string()), "one".into()));
        hub.broadcast(ServerEvent::new(None, "two".into()));

        assert_eq!(rx.recv().await.unwrap().data, "one");
        let second = rx.recv().await.unwrap();
        assert_eq!(second.data, "two");
        assert!(second.event.is_none());
    }
}
