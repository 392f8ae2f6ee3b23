//! In-memory [`ResultsView`] that records every call with its tokio timestamp.

use std::sync::Mutex;

use tokio::time::Instant;

use super::card::Card;
use super::view::ResultsView;

#[derive(Debug, Clone)]
pub(crate) enum ViewEvent {
    Loading(bool),
    Cleared(Instant),
    Message(String),
    Card(Card, Instant),
}

#[derive(Default)]
pub(crate) struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
    loading: Mutex<bool>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.lock().unwrap()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Message(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    /// Every card ever appended, in append order.
    pub fn cards(&self) -> Vec<(Card, Instant)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Card(c, at) => Some((c, at)),
                _ => None,
            })
            .collect()
    }

    /// Timestamp of the most recent `clear`.
    pub fn last_cleared(&self) -> Option<Instant> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::Cleared(at) => Some(at),
            _ => None,
        })
    }

    pub fn loading_transitions(&self) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Loading(l) => Some(l),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ResultsView for RecordingView {
    fn set_loading(&self, loading: bool) {
        *self.loading.lock().unwrap() = loading;
        self.push(ViewEvent::Loading(loading));
    }

    fn clear(&self) {
        self.push(ViewEvent::Cleared(Instant::now()));
    }

    fn show_message(&self, message: &str) {
        self.push(ViewEvent::Message(message.to_string()));
    }

    fn append_card(&self, card: Card) {
        self.push(ViewEvent::Card(card, Instant::now()));
    }
}
