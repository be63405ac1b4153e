//! Widget fetcher
//!
//! Paints cached markup straight away, then fetches fresh markup in a
//! detached task. Each task is independent: nothing cancels it, and whichever
//! response lands last owns the region and the cache entry.

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::core::{FetchError, Notifier, WidgetType};
use crate::storage::CacheStore;
use crate::transport::{classify, WidgetPayload, WidgetSource};

use super::state::{SharedState, WidgetStatus};

#[derive(Clone)]
pub struct WidgetFetcher {
    state: SharedState,
    cache: Arc<CacheStore>,
    source: Arc<dyn WidgetSource>,
    notifier: Arc<dyn Notifier>,
    sesskey: String,
}

impl WidgetFetcher {
    pub fn new(
        state: SharedState,
        cache: Arc<CacheStore>,
        source: Arc<dyn WidgetSource>,
        notifier: Arc<dyn Notifier>,
        sesskey: impl Into<String>,
    ) -> Self {
        Self {
            state,
            cache,
            source,
            notifier,
            sesskey: sesskey.into(),
        }
    }

    /// Load one widget; a no-op when the page has no region for it.
    ///
    /// The returned handle may be dropped: the fetch keeps running.
    pub fn load(&self, widget: WidgetType) -> Option<JoinHandle<()>> {
        if !self.state.has_region(widget) {
            return None;
        }

        let cache_key = widget.cache_key(&self.sesskey);
        if let Some(html) = self.cache.get(&cache_key) {
            tracing::info!("using locally stored {}", widget);
            self.state.paint_cached(widget, html);
        }

        tracing::info!("fetching {}", widget);
        self.state.set_widget_status(widget, WidgetStatus::Loading);

        let fetcher = self.clone();
        Some(tokio::spawn(async move {
            let response = fetcher.source.fetch(widget).await;
            fetcher.apply(widget, cache_key, response).await;
        }))
    }

    async fn apply(
        &self,
        widget: WidgetType,
        cache_key: String,
        response: Result<serde_json::Value, FetchError>,
    ) {
        let payload = match response {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("fetching {} failed, keeping current content: {}", widget, e);
                self.state
                    .set_widget_status(widget, WidgetStatus::Failed(e.to_string()));
                return;
            }
        };

        match classify(&payload) {
            WidgetPayload::Error { message } => {
                self.notifier.show_error(&message);
                self.state
                    .set_widget_status(widget, WidgetStatus::ServerError(message));
            }
            WidgetPayload::Markup { html } => {
                tracing::info!("fetched {}", widget);
                self.store(cache_key, html.clone()).await;
                self.state.apply_markup(widget, html);
            }
            WidgetPayload::Empty => {
                tracing::info!("fetched {} (no markup)", widget);
                self.state.mark_content_loaded(widget);
            }
        }
    }

    /// Write markup to the cache off the async workers; the medium may be a file
    async fn store(&self, cache_key: String, html: String) {
        let cache = self.cache.clone();
        // A failed write has already wiped and logged; rendering goes ahead
        let write = tokio::task::spawn_blocking(move || cache.set(&cache_key, &html));
        if let Err(e) = write.await {
            tracing::warn!("cache write task ended abnormally: {}", e);
        }
    }
}
