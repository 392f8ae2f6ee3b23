//! Results renderer: turns a places response into staggered card appends.
//!
//! Card `i` is appended `i × stagger` after render start (80 ms by default).
//! Appends are fire-and-forget tasks; the caller gets a [`RenderBatch`] it may
//! await, cancel or simply drop.

pub mod card;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

pub use card::{Card, MapAffordance, MapStyle};
pub use view::{ResultsView, TerminalView};

use crate::places::PlacesResponse;

pub const STAGGER: Duration = Duration::from_millis(80);
pub const NO_RESULTS: &str = "No gyms found.";

pub struct Renderer {
    view: Arc<dyn ResultsView>,
    map_style: MapStyle,
    stagger: Duration,
    generation: Arc<AtomicU64>,
    discard_stale: bool,
}

impl Renderer {
    pub fn new(view: Arc<dyn ResultsView>, map_style: MapStyle) -> Self {
        Self {
            view,
            map_style,
            stagger: STAGGER,
            generation: Arc::new(AtomicU64::new(0)),
            discard_stale: false,
        }
    }

    /// When set, appends from an older render are dropped once a newer render
    /// has started. Off by default: overlapping renders both reach the view.
    pub fn discard_stale(mut self, discard: bool) -> Self {
        self.discard_stale = discard;
        self
    }

    /// Clear the view and schedule one append per feature, in input order.
    ///
    /// Must be called from within a tokio runtime.
    pub fn render(&self, response: Option<&PlacesResponse>) -> RenderBatch {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.clear();

        let features = match response {
            Some(resp) if !resp.is_empty() => &resp.features,
            _ => {
                self.view.show_message(NO_RESULTS);
                return RenderBatch { generation, scheduled: 0, handles: Vec::new() };
            }
        };

        // Cards are built up front so every star rating is drawn at render time.
        let cards: Vec<Card> = {
            let mut rng = rand::thread_rng();
            features
                .iter()
                .map(|f| Card::build(f, &self.map_style, &mut rng))
                .collect()
        };

        let start = Instant::now();
        let handles: Vec<_> = cards
            .into_iter()
            .enumerate()
            .map(|(i, card)| {
                let view = Arc::clone(&self.view);
                let latest = Arc::clone(&self.generation);
                let discard_stale = self.discard_stale;
                let deadline = start + self.stagger * i as u32;
                tokio::spawn(async move {
                    tokio::time::sleep_until(deadline).await;
                    if discard_stale && latest.load(Ordering::SeqCst) != generation {
                        log::debug!("Dropping card from stale render #{}", generation);
                        return;
                    }
                    view.append_card(card);
                })
            })
            .collect();

        log::debug!("Render #{} scheduled {} cards", generation, handles.len());
        RenderBatch { generation, scheduled: handles.len(), handles }
    }
}

/// The scheduled appends of one render.
#[derive(Debug)]
pub struct RenderBatch {
    generation: u64,
    scheduled: usize,
    handles: Vec<JoinHandle<()>>,
}

impl RenderBatch {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of cards scheduled; zero when the "no results" message was shown.
    pub fn scheduled(&self) -> usize {
        self.scheduled
    }

    /// Abort appends that have not fired yet.
    pub fn cancel(&self) {
        for handle in &self.handles {
            handle.abort();
        }
    }

    /// Wait until every scheduled append has fired (or was cancelled).
    pub async fn settle(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    log::error!("Card append task failed: {}", e);
                }
            }
        }
    }
}
