//! Deferred badge overlay
//!
//! The badge overlay may load after the personal menu. Whoever provides it
//! publishes it into a [`BadgeSlot`]; the refresh orchestrator either uses it
//! straight away or waits on the slot's readiness channel.

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::BadgeOverlay;

use super::state::SharedState;

type Overlay = Option<Arc<dyn BadgeOverlay>>;

/// Readiness channel for the badge overlay capability
#[derive(Clone)]
pub struct BadgeSlot {
    tx: Arc<watch::Sender<Overlay>>,
}

impl Default for BadgeSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BadgeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadgeSlot")
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl BadgeSlot {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Make the overlay available; wakes every pending wait
    pub fn publish(&self, overlay: Arc<dyn BadgeOverlay>) {
        self.tx.send_replace(Some(overlay));
    }

    pub fn is_ready(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn current(&self) -> Overlay {
        self.tx.borrow().clone()
    }

    /// Initialize the overlay now if available, otherwise once it is published.
    ///
    /// Returns the handle of the pending wait, if one was registered.
    pub fn init_when_ready(&self, state: &SharedState) -> Option<JoinHandle<()>> {
        if let Some(overlay) = self.current() {
            overlay.init_overlay();
            state.record_badge_init();
            return None;
        }

        tracing::debug!("badge overlay not loaded yet, waiting");
        let mut rx = self.tx.subscribe();
        let state = state.clone();
        Some(tokio::spawn(async move {
            let overlay = match rx.wait_for(Option::is_some).await {
                Ok(ready) => ready.clone(),
                Err(_) => return,
            };
            if let Some(overlay) = overlay {
                overlay.init_overlay();
                state.record_badge_init();
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingOverlay(AtomicUsize);

    impl BadgeOverlay for CountingOverlay {
        fn init_overlay(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_ready_overlay_initializes_immediately() {
        let slot = BadgeSlot::new();
        let overlay = Arc::new(CountingOverlay::default());
        slot.publish(overlay.clone());

        let state = SharedState::default();
        assert!(slot.init_when_ready(&state).is_none());
        assert_eq!(overlay.0.load(Ordering::SeqCst), 1);
        assert_eq!(state.badges().unwrap().overlay_inits, 1);
    }

    #[tokio::test]
    async fn test_pending_wait_initializes_exactly_once() {
        let slot = BadgeSlot::new();
        let state = SharedState::default();
        let wait = slot.init_when_ready(&state).expect("wait registered");

        tokio::task::yield_now().await;
        assert_eq!(state.badges().unwrap().overlay_inits, 0);

        let overlay = Arc::new(CountingOverlay::default());
        slot.publish(overlay.clone());
        wait.await.unwrap();
        // Republishing does not re-run a finished wait
        slot.publish(overlay.clone());
        tokio::task::yield_now().await;

        assert_eq!(overlay.0.load(Ordering::SeqCst), 1);
        assert_eq!(state.badges().unwrap().overlay_inits, 1);
    }
}
