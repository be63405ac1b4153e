//! Personal Menu Events
//!
//! Page-level notifications other components can observe.

use tokio::sync::broadcast;

/// Events emitted by the personal menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// A refresh cycle has started (its fetches may still be in flight)
    PersonalMenuUpdated { cycle: u64 },
}

/// Broadcast sender for [`PanelEvent`]s; sending without subscribers is fine.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PanelEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(16)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: PanelEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("no personal menu event subscribers");
        }
    }
}
