use iced::widget::{button, column, container, horizontal_space, row, scrollable, text, Column};
use iced::{Alignment, Element, Length, Size, Task, Theme};
use iced_aw::Wrap;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clap::Parser;

mod config;
mod error;
mod media;
mod source;
mod state;
mod ui;

use config::Config;
use error::{ImageError, LoadError, NotFoundError};
use media::{ImageCache, Tier};
use source::{ActiveSource, CachedSource, CatalogSource, HttpSource};
use state::data::{CatalogItem, ItemId, SortMode};
use state::debounce::{self, SearchDebouncer, Ticket};
use state::detail::DetailState;
use state::engine::{CatalogEngine, CatalogStatus, LoadTicket};
use ui::filters::Choice;
use ui::{ImageSlot, ViewMode};

/// How far down the list (0.0-1.0) counts as reaching the end
const LOAD_MORE_THRESHOLD: f32 = 0.9;

/// Gap between grid cards, both directions
const GRID_GAP: f32 = 20.0;

/// Which page is on screen
#[derive(Debug)]
enum Page {
    Catalog,
    Product(DetailState),
}

/// Main application state
struct Storefront {
    config: Config,
    /// Where products come from
    source: ActiveSource,
    /// Product image cache
    images: ImageCache,
    /// Catalog, criteria, facets and page window
    engine: CatalogEngine,
    /// Search box text and pending commit
    search: SearchDebouncer,
    view_mode: ViewMode,
    dark_mode: bool,
    page: Page,
    thumbnails: HashMap<ItemId, ImageSlot>,
    /// Carousel images keyed by (product, image index)
    previews: HashMap<(ItemId, usize), ImageSlot>,
    /// Add-to-cart confirmation
    notice: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// A catalog fetch finished
    CatalogLoaded(LoadTicket, Result<Vec<CatalogItem>, LoadError>),
    /// User asked to fetch the catalog again
    Reload,
    /// Search box edited
    SearchChanged(String),
    /// Debounce timer for a search edit fired
    SearchCommitted(Ticket),
    CategorySelected(Choice),
    BrandSelected(Choice),
    PriceChanged(f64),
    SortSelected(SortMode),
    ViewModeSelected(ViewMode),
    ToggleTheme,
    /// Product list scrolled
    Scrolled(scrollable::Viewport),
    LoadMore,
    OpenProduct(ItemId),
    ProductLoaded(ItemId, Result<CatalogItem, NotFoundError>),
    BackToCatalog,
    PreviousImage,
    NextImage,
    SelectImage(usize),
    IncreaseQuantity,
    DecreaseQuantity,
    AddToCart,
    DismissNotice,
    ThumbnailReady(ItemId, Result<PathBuf, ImageError>),
    PreviewReady(ItemId, usize, Result<PathBuf, ImageError>),
}

impl Storefront {
    /// Create a new instance of the application and start loading the catalog
    fn new(config: Config, source: ActiveSource, images: ImageCache) -> (Self, Task<Message>) {
        let mut app = Storefront {
            config,
            source,
            images,
            engine: CatalogEngine::new(),
            search: SearchDebouncer::new(),
            view_mode: ViewMode::default(),
            dark_mode: true,
            page: Page::Catalog,
            thumbnails: HashMap::new(),
            previews: HashMap::new(),
            notice: None,
        };

        let task = app.load_catalog();
        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CatalogLoaded(ticket, outcome) => {
                if self.engine.finish_load(ticket, outcome) {
                    return self.request_thumbnails();
                }
                Task::none()
            }
            Message::Reload => self.load_catalog(),

            // ========== Criteria ==========
            Message::SearchChanged(input) => {
                // The box updates now; the query waits for typing to pause
                let ticket = self.search.input(input);
                Task::perform(
                    debounce::wait(ticket, self.config.search_debounce()),
                    Message::SearchCommitted,
                )
            }
            Message::SearchCommitted(ticket) => match self.search.commit(ticket) {
                Some(term) => {
                    debug!("Search committed: {:?}", term);
                    self.refresh_if(|engine| engine.set_search(term))
                }
                None => Task::none(),
            },
            Message::CategorySelected(choice) => {
                self.refresh_if(|engine| engine.set_category(choice.into_value()))
            }
            Message::BrandSelected(choice) => {
                self.refresh_if(|engine| engine.set_brand(choice.into_value()))
            }
            Message::PriceChanged(ceiling) => {
                self.refresh_if(|engine| engine.set_price_ceiling(ceiling))
            }
            Message::SortSelected(mode) => {
                debug!("Sort mode: {}", mode.key());
                self.refresh_if(|engine| engine.set_sort_mode(mode))
            }
            Message::ViewModeSelected(mode) => {
                self.view_mode = mode;
                Task::none()
            }
            Message::ToggleTheme => {
                self.dark_mode = !self.dark_mode;
                Task::none()
            }

            // ========== Infinite scroll ==========
            Message::Scrolled(viewport) => {
                if reached_end(&self.page, viewport.relative_offset().y) {
                    return self.refresh_if(CatalogEngine::request_more);
                }
                Task::none()
            }
            Message::LoadMore => self.refresh_if(CatalogEngine::request_more),

            // ========== Product page ==========
            Message::OpenProduct(id) => {
                info!("Opening product {}", id);
                self.page = Page::Product(DetailState::Loading(id));
                self.notice = None;

                let source = self.source.clone();
                Task::perform(async move { source.fetch_item(id).await }, move |outcome| {
                    Message::ProductLoaded(id, outcome)
                })
            }
            Message::ProductLoaded(id, outcome) => {
                if let Page::Product(state) = &mut self.page {
                    if !state.resolve(id, outcome) {
                        debug!("Ignoring late response for product {}", id);
                    }
                }
                self.request_preview()
            }
            Message::BackToCatalog => {
                self.page = Page::Catalog;
                self.notice = None;
                Task::none()
            }
            Message::PreviousImage => {
                if let Some(detail) = self.detail_mut() {
                    detail.previous_image();
                }
                self.request_preview()
            }
            Message::NextImage => {
                if let Some(detail) = self.detail_mut() {
                    detail.next_image();
                }
                self.request_preview()
            }
            Message::SelectImage(index) => {
                if let Some(detail) = self.detail_mut() {
                    detail.select_image(index);
                }
                self.request_preview()
            }
            Message::IncreaseQuantity => {
                if let Some(detail) = self.detail_mut() {
                    detail.increment();
                }
                Task::none()
            }
            Message::DecreaseQuantity => {
                if let Some(detail) = self.detail_mut() {
                    detail.decrement();
                }
                Task::none()
            }
            Message::AddToCart => {
                let notice = self.detail_mut().and_then(|detail| detail.add_to_cart());
                if let Some(notice) = &notice {
                    info!("{}", notice);
                }
                self.notice = notice;
                Task::none()
            }
            Message::DismissNotice => {
                self.notice = None;
                Task::none()
            }

            // ========== Images ==========
            Message::ThumbnailReady(id, outcome) => {
                self.thumbnails.insert(id, image_slot(outcome));
                Task::none()
            }
            Message::PreviewReady(id, index, outcome) => {
                self.previews.insert((id, index), image_slot(outcome));
                Task::none()
            }
        }
    }

    /// Start a catalog fetch; only the newest one is applied
    fn load_catalog(&mut self) -> Task<Message> {
        let ticket = self.engine.begin_load();
        let source = self.source.clone();
        let limit = self.config.catalog_limit;

        info!("Loading catalog (limit {})", limit);
        Task::perform(async move { source.fetch_catalog(limit).await }, move |outcome| {
            Message::CatalogLoaded(ticket, outcome)
        })
    }

    /// Run an engine mutation; if it changed anything, fetch images for
    /// the products that became visible
    fn refresh_if(&mut self, mutate: impl FnOnce(&mut CatalogEngine) -> bool) -> Task<Message> {
        if mutate(&mut self.engine) {
            self.request_thumbnails()
        } else {
            Task::none()
        }
    }

    /// Queue thumbnail downloads for visible products not seen yet
    fn request_thumbnails(&mut self) -> Task<Message> {
        let mut tasks = Vec::new();

        for item in self.engine.visible() {
            if item.thumbnail.is_empty() || self.thumbnails.contains_key(&item.id) {
                continue;
            }
            self.thumbnails.insert(item.id, ImageSlot::Pending);

            let id = item.id;
            let url = item.thumbnail.clone();
            let images = self.images.clone();
            tasks.push(Task::perform(
                async move { images.fetch(Tier::Thumbnail, id.to_string(), url).await },
                move |outcome| Message::ThumbnailReady(id, outcome),
            ));
        }

        Task::batch(tasks)
    }

    /// Queue the download of the carousel image currently selected
    fn request_preview(&mut self) -> Task<Message> {
        let Page::Product(DetailState::Found(detail)) = &self.page else {
            return Task::none();
        };
        let id = detail.item.id;
        let index = detail.image_index();
        let Some(url) = detail.current_image().map(str::to_string) else {
            return Task::none();
        };

        if self.previews.contains_key(&(id, index)) {
            return Task::none();
        }
        self.previews.insert((id, index), ImageSlot::Pending);

        let images = self.images.clone();
        Task::perform(
            async move { images.fetch(Tier::Preview, format!("{}-{}", id, index), url).await },
            move |outcome| Message::PreviewReady(id, index, outcome),
        )
    }

    fn detail_mut(&mut self) -> Option<&mut state::detail::ProductDetail> {
        match &mut self.page {
            Page::Product(state) => state.detail_mut(),
            Page::Catalog => None,
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let header = row![
            text("Smart Product Explorer").size(32),
            horizontal_space(),
            button(text(if self.dark_mode { "Light mode" } else { "Dark mode" }))
                .on_press(Message::ToggleTheme)
                .style(button::secondary),
        ]
        .align_y(Alignment::Center);

        let page: Element<Message> = match &self.page {
            Page::Catalog => self.catalog_view(),
            Page::Product(state) => {
                let preview = match state {
                    DetailState::Found(detail) => {
                        self.previews.get(&(detail.item.id, detail.image_index()))
                    }
                    _ => None,
                };
                ui::detail::view(state, preview, self.notice.as_deref())
            }
        };

        let content = column![header, page].spacing(24).padding(32);

        scrollable(container(content).center_x(Length::Fill))
            .on_scroll(Message::Scrolled)
            .height(Length::Fill)
            .into()
    }

    fn catalog_view(&self) -> Element<Message> {
        let results: Element<Message> = match self.engine.status() {
            CatalogStatus::Loading => {
                Wrap::with_elements((0..8).map(|_| ui::card::skeleton()).collect())
                    .spacing(GRID_GAP)
                    .line_spacing(GRID_GAP)
                    .into()
            }
            CatalogStatus::Failed(err) => column![
                text("Couldn't load products").size(24),
                text(err.to_string()).size(14),
                button(text("Try again"))
                    .on_press(Message::Reload)
                    .style(button::primary)
                    .padding([10, 20]),
            ]
            .spacing(12)
            .align_x(Alignment::Center)
            .width(Length::Fill)
            .into(),
            CatalogStatus::NoResults => column![
                text("No products found").size(24),
                text("Try a different search or loosen the filters.").size(14),
            ]
            .spacing(8)
            .align_x(Alignment::Center)
            .width(Length::Fill)
            .into(),
            CatalogStatus::Results => self.results_view(),
        };

        column![
            ui::filters::search_bar(self.search.raw()),
            ui::filters::filter_bar(&self.engine, self.view_mode),
            results,
        ]
        .spacing(24)
        .into()
    }

    fn results_view(&self) -> Element<Message> {
        let visible = self.engine.visible();

        let products: Element<Message> = match self.view_mode {
            ViewMode::Grid => Wrap::with_elements(
                visible
                    .map(|item| ui::card::grid_card(item, self.thumbnails.get(&item.id)))
                    .collect(),
            )
            .spacing(GRID_GAP)
            .line_spacing(GRID_GAP)
            .into(),
            ViewMode::List => Column::with_children(
                visible.map(|item| ui::card::list_row(item, self.thumbnails.get(&item.id))),
            )
            .spacing(12)
            .into(),
        };

        let mut content = column![products].spacing(20).align_x(Alignment::Center);

        if self.engine.has_more() {
            content = content.push(
                button(text("Load more"))
                    .on_press(Message::LoadMore)
                    .style(button::secondary)
                    .padding([10, 24]),
            );
        }

        content
            .push(
                text(format!(
                    "Showing {} of {} products",
                    self.engine.shown_count(),
                    self.engine.total_matches()
                ))
                .size(13),
            )
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        if self.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

/// Whether a scroll to `offset` (0.0 top, 1.0 bottom) should reveal more rows.
///
/// The product page shares the scrollable, so only the catalog counts.
fn reached_end(page: &Page, offset: f32) -> bool {
    matches!(page, Page::Catalog) && offset >= LOAD_MORE_THRESHOLD
}

fn image_slot(outcome: Result<PathBuf, ImageError>) -> ImageSlot {
    match outcome {
        Ok(path) => ImageSlot::Ready(path),
        Err(e) => {
            debug!("Image unavailable: {}", e);
            ImageSlot::Failed
        }
    }
}

/// Pick the catalog source for this run
fn build_source(config: &Config) -> Result<(ActiveSource, ImageCache), LoadError> {
    let http = HttpSource::new(&config.api_url, config.request_timeout())?;
    let images = ImageCache::new(http.client().clone(), config.cache_root());

    let source = if config.no_cache {
        ActiveSource::Direct(http)
    } else {
        ActiveSource::Cached(CachedSource::new(
            http,
            config.snapshot_path(),
            config.revalidate(),
        ))
    };

    Ok((source, images))
}

fn main() -> iced::Result {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("storefront=info,warn")),
        )
        .init();

    let config = Config::parse();

    let (source, images) = match build_source(&config) {
        Ok(parts) => parts,
        Err(e) => {
            error!("Cannot start storefront: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Storefront starting against {} (cache: {})",
        config.api_url,
        if config.no_cache { "off" } else { "on" }
    );

    iced::application("Smart Product Explorer", Storefront::update, Storefront::view)
        .theme(Storefront::theme)
        .window_size(Size::new(1280.0, 860.0))
        .centered()
        .run_with(move || Storefront::new(config, source, images))
}
