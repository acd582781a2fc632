/// Number of products shown before any "load more"
pub const INITIAL_VISIBLE_COUNT: usize = 20;

/// Number of products revealed per "load more"
pub const LOAD_MORE_COUNT: usize = 20;

/// Progressive reveal over the filtered result set.
///
/// Only the cursor lives here; the results are passed in on each call.
/// The cursor grows by `step` on demand and falls back to `initial` on
/// [`PageWindow::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    visible: usize,
    initial: usize,
    step: usize,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(INITIAL_VISIBLE_COUNT, LOAD_MORE_COUNT)
    }
}

impl PageWindow {
    pub fn new(initial: usize, step: usize) -> Self {
        Self {
            visible: initial,
            initial,
            step,
        }
    }

    /// Raw cursor value; may be larger than a short result set
    pub fn visible_count(&self) -> usize {
        self.visible
    }

    pub fn reset(&mut self) {
        self.visible = self.initial;
    }

    /// Reveal the next page of `total` results.
    ///
    /// Returns `false` when everything is already visible.
    pub fn advance(&mut self, total: usize) -> bool {
        if self.visible_count() >= total {
            return false;
        }
        self.visible = (self.visible + self.step).min(total);
        true
    }

    /// Number of rows actually shown out of `total`
    pub fn shown(&self, total: usize) -> usize {
        self.visible_count().min(total)
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.visible_count() < total
    }

    /// Visible prefix of `items`
    pub fn window_of<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.shown(items.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_result_set() {
        let mut window = PageWindow::default();
        let items: Vec<u32> = (0..15).collect();

        assert_eq!(window.window_of(&items).len(), 15);
        assert!(!window.has_more(items.len()));
        assert!(!window.advance(items.len()));
        assert_eq!(window.visible_count(), INITIAL_VISIBLE_COUNT);
    }

    #[test]
    fn test_advance_caps_at_total() {
        let mut window = PageWindow::default();

        assert!(window.advance(50));
        assert_eq!(window.visible_count(), 40);
        assert!(window.advance(50));
        assert_eq!(window.visible_count(), 50);

        // idempotent once everything is visible
        assert!(!window.advance(50));
        assert_eq!(window.visible_count(), 50);
    }

    #[test]
    fn test_reset_restores_initial() {
        let mut window = PageWindow::new(5, 10);
        window.advance(100);
        window.advance(100);
        assert_eq!(window.visible_count(), 25);

        window.reset();
        assert_eq!(window.visible_count(), 5);

        let items = ["a", "b", "c", "d", "e", "f"];
        assert_eq!(window.window_of(&items), &["a", "b", "c", "d", "e"]);
    }
}
