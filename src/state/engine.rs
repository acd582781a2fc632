use tracing::{debug, info, warn};

use super::data::{CatalogItem, Facets, FilterCriteria, SortMode};
use super::facets::derive_facets;
use super::query;
use super::window::PageWindow;
use crate::error::LoadError;

/// Where the catalog load currently stands
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    Failed(LoadError),
}

/// What the product list should render
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatalogStatus<'a> {
    Loading,
    /// The fetch failed; distinct from an empty catalog
    Failed(&'a LoadError),
    /// Loaded fine, but nothing matches the criteria (or the catalog is empty)
    NoResults,
    Results,
}

/// A single criteria mutation coming from the controls
#[derive(Debug, Clone, PartialEq)]
pub enum CriteriaChange {
    Search(String),
    Category(Option<String>),
    Brand(Option<String>),
    PriceCeiling(f64),
    Sort(SortMode),
}

impl CriteriaChange {
    /// Search, category and brand changes start over at the first page;
    /// sort and price changes keep the reveal position.
    pub fn resets_window(&self) -> bool {
        matches!(
            self,
            CriteriaChange::Search(_) | CriteriaChange::Category(_) | CriteriaChange::Brand(_)
        )
    }
}

/// Tags one catalog request so late responses can be told apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// The Catalog State Engine
///
/// Single owner of the catalog, the active criteria, the derived facets
/// and the page window. Every mutation goes through [`CatalogEngine::apply`]
/// (or a catalog load) and synchronously recomputes the result set.
/// Performs no I/O: catalogs are handed in by the caller.
#[derive(Debug, Default)]
pub struct CatalogEngine {
    catalog: Vec<CatalogItem>,
    facets: Facets,
    criteria: FilterCriteria,
    /// Positions into `catalog`, in display order
    results: Vec<usize>,
    window: PageWindow,
    state: LoadState,
    /// Most recently issued load ticket
    latest_load: u64,
}

impl CatalogEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Catalog loading ==========

    /// Start a (re)load. Only the response for the returned ticket will be applied.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_load += 1;
        self.state = LoadState::Loading;
        LoadTicket(self.latest_load)
    }

    /// Apply the outcome of the request tagged with `ticket`.
    ///
    /// Responses for anything but the latest ticket are dropped.
    /// Returns whether the outcome was applied.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        outcome: Result<Vec<CatalogItem>, LoadError>,
    ) -> bool {
        if ticket.0 != self.latest_load {
            debug!(
                "Discarding stale catalog response (ticket {}, latest {})",
                ticket.0, self.latest_load
            );
            return false;
        }

        match outcome {
            Ok(items) => self.replace_catalog(items),
            Err(err) => {
                warn!("Catalog load failed: {}", err);
                self.state = LoadState::Failed(err);
            }
        }
        true
    }

    /// Install a new catalog and rederive everything from it
    pub fn replace_catalog(&mut self, items: Vec<CatalogItem>) {
        self.catalog = items;
        self.facets = derive_facets(&self.catalog);

        // The ceiling is initialised from the catalog once; a ceiling the
        // user already picked survives a refresh, as long as it still fits.
        let max_price = self.facets.max_price;
        if self.criteria.price_ceiling <= 0.0 {
            if max_price > 0.0 {
                self.criteria.price_ceiling = max_price;
            }
        } else if self.criteria.price_ceiling > max_price {
            self.criteria.price_ceiling = max_price;
        }

        self.state = LoadState::Ready;
        self.recompute();

        info!(
            "Catalog ready: {} products, {} categories, {} brands",
            self.catalog.len(),
            self.facets.categories.len(),
            self.facets.brands.len()
        );
    }

    // ========== Criteria ==========

    /// Dispatch a criteria change.
    ///
    /// Returns `false` if the value was already current (nothing recomputed,
    /// window untouched).
    pub fn apply(&mut self, change: CriteriaChange) -> bool {
        let resets_window = change.resets_window();

        let changed = match change {
            CriteriaChange::Search(term) => replace(&mut self.criteria.search, term),
            CriteriaChange::Category(category) => replace(&mut self.criteria.category, category),
            CriteriaChange::Brand(brand) => replace(&mut self.criteria.brand, brand),
            CriteriaChange::PriceCeiling(ceiling) => {
                let ceiling = ceiling.clamp(0.0, self.facets.max_price);
                replace(&mut self.criteria.price_ceiling, ceiling)
            }
            CriteriaChange::Sort(mode) => replace(&mut self.criteria.sort_mode, mode),
        };

        if !changed {
            return false;
        }

        if resets_window {
            self.window.reset();
        }
        self.recompute();
        true
    }

    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        self.apply(CriteriaChange::Search(term.into()))
    }

    pub fn set_category(&mut self, category: Option<String>) -> bool {
        self.apply(CriteriaChange::Category(category))
    }

    pub fn set_brand(&mut self, brand: Option<String>) -> bool {
        self.apply(CriteriaChange::Brand(brand))
    }

    pub fn set_price_ceiling(&mut self, ceiling: f64) -> bool {
        self.apply(CriteriaChange::PriceCeiling(ceiling))
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) -> bool {
        self.apply(CriteriaChange::Sort(mode))
    }

    /// Reveal the next page. Returns `false` when nothing was left to show.
    pub fn request_more(&mut self) -> bool {
        self.window.advance(self.results.len())
    }

    fn recompute(&mut self) {
        self.results = query::select(&self.catalog, &self.criteria);
    }

    // ========== Read side ==========

    /// Products in the current page, in display order
    pub fn visible(&self) -> impl Iterator<Item = &CatalogItem> + '_ {
        self.window
            .window_of(&self.results)
            .iter()
            .map(|&index| &self.catalog[index])
    }

    /// Number of products currently shown
    pub fn shown_count(&self) -> usize {
        self.window.shown(self.results.len())
    }

    /// Number of products matching the criteria
    pub fn total_matches(&self) -> usize {
        self.results.len()
    }

    pub fn has_more(&self) -> bool {
        self.window.has_more(self.results.len())
    }

    #[cfg(test)]
    pub fn catalog(&self) -> &[CatalogItem] {
        &self.catalog
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    #[cfg(test)]
    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    pub fn status(&self) -> CatalogStatus<'_> {
        match &self.state {
            LoadState::Loading => CatalogStatus::Loading,
            LoadState::Failed(err) => CatalogStatus::Failed(err),
            LoadState::Ready if self.results.is_empty() => CatalogStatus::NoResults,
            LoadState::Ready => CatalogStatus::Results,
        }
    }
}

/// Store `value` in `slot`, reporting whether it differed
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
