/// View layer
///
/// Pure rendering of the storefront state into iced widgets:
/// - Product cards and list rows (card.rs)
/// - Search box, filters, sort and view toggles (filters.rs)
/// - Product detail page (detail.rs)
use std::path::PathBuf;

pub mod card;
pub mod detail;
pub mod filters;

/// Grid of cards or one row per product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Loading state of one cached image
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSlot {
    Pending,
    Ready(PathBuf),
    Failed,
}

/// First `max` characters of `text`, with an ellipsis if cut
pub fn truncate(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}

/// `$12.50`
pub fn price(value: f64) -> String {
    format!("${:.2}", value)
}
