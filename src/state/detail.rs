/// Product detail page state
///
/// Tracks which product is open, the carousel position and the purchase
/// quantity. "Add to cart" only produces a notification.
use super::data::{CatalogItem, ItemId};
use crate::error::NotFoundError;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    /// Waiting for the item lookup
    Loading(ItemId),
    Found(ProductDetail),
    NotFound(NotFoundError),
}

impl DetailState {
    /// Apply the lookup outcome for `id`.
    ///
    /// Returns `false` (and keeps the current state) unless the page is
    /// still waiting on exactly this product. A duplicate response must not
    /// rebuild a page the user is already interacting with.
    pub fn resolve(&mut self, id: ItemId, outcome: Result<CatalogItem, NotFoundError>) -> bool {
        if !matches!(self, DetailState::Loading(pending) if *pending == id) {
            return false;
        }
        *self = match outcome {
            Ok(item) => DetailState::Found(ProductDetail::new(item)),
            Err(err) => DetailState::NotFound(err),
        };
        true
    }

    pub fn detail_mut(&mut self) -> Option<&mut ProductDetail> {
        match self {
            DetailState::Found(detail) => Some(detail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    pub item: CatalogItem,
    /// Index into `item.images`
    image_index: usize,
    quantity: u32,
}

impl ProductDetail {
    pub fn new(item: CatalogItem) -> Self {
        Self {
            item,
            image_index: 0,
            quantity: 1,
        }
    }

    pub fn image_index(&self) -> usize {
        self.image_index
    }

    /// URL of the image the carousel shows
    pub fn current_image(&self) -> Option<&str> {
        self.item.images.get(self.image_index).map(String::as_str)
    }

    pub fn next_image(&mut self) {
        let count = self.item.images.len();
        if count > 0 {
            self.image_index = (self.image_index + 1) % count;
        }
    }

    pub fn previous_image(&mut self) {
        let count = self.item.images.len();
        if count > 0 {
            self.image_index = (self.image_index + count - 1) % count;
        }
    }

    pub fn select_image(&mut self, index: usize) {
        if index < self.item.images.len() {
            self.image_index = index;
        }
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Quantity can't go past the stock on hand
    pub fn increment(&mut self) {
        if self.quantity < self.item.stock {
            self.quantity += 1;
        }
    }

    pub fn decrement(&mut self) {
        if self.quantity > 1 {
            self.quantity -= 1;
        }
    }

    /// Confirmation for the (stub) add-to-cart action, `None` when out of stock
    pub fn add_to_cart(&self) -> Option<String> {
        if !self.item.is_in_stock() {
            return None;
        }
        Some(format!("Added {} × {} to cart!", self.quantity, self.item.title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::product;

    fn detail(stock: u32, images: usize) -> ProductDetail {
        let mut item = product(9, "Lamp", 40.0, "home", None);
        item.stock = stock;
        item.images = (0..images).map(|i| format!("https://img/{i}.webp")).collect();
        ProductDetail::new(item)
    }

    #[test]
    fn test_carousel_wraps() {
        let mut page = detail(3, 3);
        assert_eq!(page.current_image(), Some("https://img/0.webp"));

        page.previous_image();
        assert_eq!(page.image_index(), 2);
        page.next_image();
        assert_eq!(page.image_index(), 0);

        page.select_image(7);
        assert_eq!(page.image_index(), 0);
        page.select_image(1);
        assert_eq!(page.current_image(), Some("https://img/1.webp"));
    }

    #[test]
    fn test_carousel_without_images() {
        let mut page = detail(3, 0);
        page.next_image();
        page.previous_image();
        assert_eq!(page.current_image(), None);
    }

    #[test]
    fn test_quantity_bounds() {
        let mut page = detail(2, 1);
        page.decrement();
        assert_eq!(page.quantity(), 1);

        page.increment();
        page.increment();
        assert_eq!(page.quantity(), 2);
        assert_eq!(page.add_to_cart().as_deref(), Some("Added 2 × Lamp to cart!"));
    }

    #[test]
    fn test_out_of_stock_cannot_be_added() {
        let page = detail(0, 1);
        assert_eq!(page.add_to_cart(), None);
    }

    #[test]
    fn test_resolve_ignores_other_items() {
        let mut state = DetailState::Loading(9);

        assert!(!state.resolve(4, Err(NotFoundError::missing(4))));
        assert_eq!(state, DetailState::Loading(9));

        assert!(state.resolve(9, Err(NotFoundError::missing(9))));
        assert!(matches!(state, DetailState::NotFound(_)));
    }

    #[test]
    fn test_duplicate_response_keeps_page() {
        let mut state = DetailState::Loading(9);
        assert!(state.resolve(9, Ok(detail(5, 3).item)));

        let page = state.detail_mut().unwrap();
        page.next_image();
        page.increment();
        page.increment();

        assert!(!state.resolve(9, Ok(detail(5, 3).item)));
        assert!(!state.resolve(9, Err(NotFoundError::missing(9))));

        let page = state.detail_mut().unwrap();
        assert_eq!(page.image_index(), 1);
        assert_eq!(page.quantity(), 3);
    }
}
