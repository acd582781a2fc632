/// Search input coalescing
///
/// The text box updates immediately, but the query engine only sees a
/// "committed" term once typing pauses. Each keystroke issues a new
/// ticket and cancels every older one; the UI schedules a timer per
/// ticket and hands it back when the timer fires. Only the newest ticket
/// commits.
use std::time::Duration;

/// Default pause before a search term is committed
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Identifies one scheduled commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Default)]
pub struct SearchDebouncer {
    /// What the user has typed so far
    raw: String,
    /// Latest issued ticket; anything older is cancelled
    generation: u64,
    /// Whether `generation` is still waiting for its timer
    pending: bool,
}

impl SearchDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text box content
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Record a keystroke; cancels the previous timer
    pub fn input(&mut self, text: String) -> Ticket {
        self.raw = text;
        self.generation += 1;
        self.pending = true;
        Ticket(self.generation)
    }

    /// Timer for `ticket` fired.
    ///
    /// Returns the term to commit, or `None` if a newer keystroke
    /// superseded this ticket.
    pub fn commit(&mut self, ticket: Ticket) -> Option<String> {
        if !self.pending || ticket.0 != self.generation {
            return None;
        }
        self.pending = false;
        Some(self.raw.clone())
    }
}

/// Timer future used by the UI to schedule a commit
pub async fn wait(ticket: Ticket, delay: Duration) -> Ticket {
    tokio::time::sleep(delay).await;
    ticket
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_ticket_commits() {
        let mut debouncer = SearchDebouncer::new();

        let first = debouncer.input("h".to_string());
        let second = debouncer.input("ha".to_string());
        let third = debouncer.input("hat".to_string());

        assert_eq!(debouncer.raw(), "hat");
        assert_eq!(debouncer.commit(first), None);
        assert_eq!(debouncer.commit(second), None);
        assert_eq!(debouncer.commit(third), Some("hat".to_string()));

        // a ticket commits once
        assert_eq!(debouncer.commit(third), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_returns_ticket() {
        let mut debouncer = SearchDebouncer::new();
        let ticket = debouncer.input("x".to_string());

        let fired = wait(ticket, SEARCH_DEBOUNCE).await;
        assert_eq!(debouncer.commit(fired), Some("x".to_string()));
    }
}
