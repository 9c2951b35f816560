//! Read-through cache of ordered-plot status with single-flight fetching.
//!
//! At most one request to `/api/plots/ordered` is in flight at a time.
//! Callers that arrive while it runs await the same shared future instead of
//! starting their own. Failures never reach callers: they get the last good
//! listing, however old, or an empty one.

use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::api::PlotApi;
use crate::models::OrderedPlot;

/// `None` means the fetch failed; the error was already logged.
type SharedFetch = Shared<BoxFuture<'static, Option<Arc<Vec<OrderedPlot>>>>>;

struct Entry {
    plots: Arc<Vec<OrderedPlot>>,
    fetched_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entry: Option<Entry>,
    in_flight: Option<SharedFetch>,
    /// Bumped on invalidation so detached fetches do not store their result.
    generation: u64,
}

pub struct OrderStatusCache {
    api: Arc<dyn PlotApi>,
    ttl: Duration,
    state: Arc<Mutex<CacheState>>,
}

impl OrderStatusCache {
    pub fn new(api: Arc<dyn PlotApi>, ttl: Duration) -> Self {
        Self {
            api,
            ttl,
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    /// Current ordered plots, fetched at most once per TTL window.
    pub async fn get(&self) -> Arc<Vec<OrderedPlot>> {
        let fetch = {
            let mut state = self.state.lock().await;
            if let Some(entry) = &state.entry {
                if entry.fetched_at.elapsed() < self.ttl {
                    return Arc::clone(&entry.plots);
                }
            }
            match state.in_flight.clone() {
                Some(fetch) => {
                    debug!("Joining in-flight ordered plots fetch");
                    fetch
                }
                None => {
                    let fetch = self.start_fetch(state.generation);
                    state.in_flight = Some(fetch.clone());
                    fetch
                }
            }
        };

        if let Some(plots) = fetch.await {
            return plots;
        }

        let state = self.state.lock().await;
        match &state.entry {
            Some(entry) => {
                debug!("Serving stale ordered plots ({} entries)", entry.plots.len());
                Arc::clone(&entry.plots)
            }
            None => Arc::new(Vec::new()),
        }
    }

    /// Drop the cached listing and detach any in-flight fetch.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.entry = None;
        state.in_flight = None;
        state.generation += 1;
        debug!("Ordered plots cache invalidated");
    }

    fn start_fetch(&self, generation: u64) -> SharedFetch {
        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);

        async move {
            let result = api.fetch_ordered_plots().await;

            let mut state = state.lock().await;
            let current = state.generation == generation;
            if current {
                state.in_flight = None;
            }

            match result {
                Ok(plots) => {
                    let plots = Arc::new(plots);
                    if current {
                        state.entry = Some(Entry {
                            plots: Arc::clone(&plots),
                            fetched_at: Instant::now(),
                        });
                    }
                    Some(plots)
                }
                Err(err) => {
                    warn!("Failed to fetch ordered plots: {}", err);
                    None
                }
            }
        }
        .boxed()
        .shared()
    }
}
