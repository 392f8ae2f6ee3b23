//! The visible results surface.

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::card::Card;

/// Where search state and results become visible.
///
/// Implementations are shared between the controller and the scheduled card
/// appends, so every method takes `&self`.
pub trait ResultsView: Send + Sync {
    /// Show or hide the loader; while loading, prior results are dimmed.
    fn set_loading(&self, loading: bool);
    fn clear(&self);
    /// Replace the results area with a single message.
    fn show_message(&self, message: &str);
    fn append_card(&self, card: Card);
}

/// Cards to stdout, loader state to stderr.
pub struct TerminalView {
    loading: AtomicBool,
    cards: AtomicUsize,
    out: Mutex<Box<dyn Write + Send>>,
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::with_output(Box::new(std::io::stdout()))
    }
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards and messages go to `out` instead of stdout.
    pub fn with_output(out: Box<dyn Write + Send>) -> Self {
        Self {
            loading: AtomicBool::new(false),
            cards: AtomicUsize::new(0),
            out: Mutex::new(out),
        }
    }

    // one write per entry so concurrent appends never interleave lines
    fn emit(&self, args: std::fmt::Arguments<'_>) -> std::io::Result<()> {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        out.write_fmt(args)?;
        out.flush()
    }
}

impl ResultsView for TerminalView {
    fn set_loading(&self, loading: bool) {
        let was = self.loading.swap(loading, Ordering::SeqCst);
        if loading && !was {
            eprintln!("  \u{23F3} Searching...");
        }
    }

    fn clear(&self) {
        self.cards.store(0, Ordering::SeqCst);
    }

    fn show_message(&self, message: &str) {
        self.cards.store(0, Ordering::SeqCst);
        if let Err(e) = self.emit(format_args!("  {}\n", message)) {
            log::debug!("Could not write message to output: {}", e);
        }
    }

    fn append_card(&self, card: Card) {
        let n = self.cards.fetch_add(1, Ordering::SeqCst) + 1;
        if let Err(e) = self.emit(format_args!("\n  #{}\n{}", n, card)) {
            log::debug!("Could not write card #{} to output: {}", n, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    fn card(title: &str) -> Card {
        Card {
            icon: crate::render::card::ICON,
            title: title.into(),
            address: "1 Main St".into(),
            stars: 4,
            coordinates: None,
            map: None,
        }
    }

    #[test]
    fn test_cards_are_numbered_from_last_clear() {
        let buf = SharedBuf::default();
        let view = TerminalView::with_output(Box::new(buf.clone()));

        view.append_card(card("Gym A"));
        view.clear();
        view.append_card(card("Gym B"));
        view.append_card(card("Gym C"));

        let text = buf.text();
        assert!(text.contains("#1\n") && text.contains("Gym A"));
        assert!(text.find("Gym B").unwrap() < text.find("#2\n").unwrap());
        assert!(text.contains("Gym C"));
    }

    #[test]
    fn test_message_is_written() {
        let buf = SharedBuf::default();
        let view = TerminalView::with_output(Box::new(buf.clone()));
        view.show_message("No gyms found.");
        assert_eq!(buf.text(), "  No gyms found.\n");
    }

    #[test]
    fn test_write_failure_is_not_fatal() {
        let view = TerminalView::with_output(Box::new(ClosedPipe));
        view.show_message("No gyms found.");
        view.append_card(card("Gym A"));
        view.append_card(card("Gym B"));
        assert_eq!(view.cards.load(Ordering::SeqCst), 2);
    }
}
