use iced::widget::{button, column, container, horizontal_space, image, row, text};
use iced::{Alignment, Color, Element, Length};

use super::{price, truncate, ImageSlot};
use crate::state::data::CatalogItem;
use crate::Message;

/// Width of a grid card
const CARD_WIDTH: f32 = 250.0;

const MUTED: Color = Color::from_rgb(0.55, 0.55, 0.6);
const ACCENT: Color = Color::from_rgb(0.93, 0.36, 0.25);

/// Product card for the grid layout
pub fn grid_card<'a>(item: &'a CatalogItem, thumb: Option<&'a ImageSlot>) -> Element<'a, Message> {
    let content = column![
        thumbnail(thumb, Length::Fill, 180.0),
        text(item.title.as_str()).size(16),
        text(item.category.as_str()).size(12).color(MUTED),
        row![
            text(format!("★ {:.1}", item.rating)).size(13),
            horizontal_space(),
            text(item.stock_label()).size(13).color(MUTED),
        ],
        row![text(price(item.price)).size(20), horizontal_space(), discount_badge(item)]
            .align_y(Alignment::Center),
    ]
    .spacing(8)
    .width(Length::Fixed(CARD_WIDTH));

    clickable(item, content.into())
}

/// Product row for the list layout
pub fn list_row<'a>(item: &'a CatalogItem, thumb: Option<&'a ImageSlot>) -> Element<'a, Message> {
    let details = column![
        text(item.title.as_str()).size(18),
        text(truncate(&item.description, 140)).size(13).color(MUTED),
        text(format!("{} · {}", item.brand_or_unknown(), item.category)).size(12),
    ]
    .spacing(6)
    .width(Length::Fill);

    let pricing = column![
        text(price(item.price)).size(20),
        discount_badge(item),
        text(format!("★ {:.1}", item.rating)).size(13),
        text(item.stock_label()).size(12).color(MUTED),
    ]
    .spacing(4)
    .align_x(Alignment::End);

    let content = row![
        thumbnail(thumb, Length::Fixed(120.0), 120.0),
        details,
        pricing
    ]
    .spacing(16)
    .align_y(Alignment::Center);

    clickable(item, content.into())
}

/// Grey box shown while the catalog loads
pub fn skeleton<'a>() -> Element<'a, Message> {
    container(text("").size(16))
        .width(Length::Fixed(CARD_WIDTH))
        .height(Length::Fixed(300.0))
        .style(container::rounded_box)
        .into()
}

fn clickable<'a>(item: &'a CatalogItem, content: Element<'a, Message>) -> Element<'a, Message> {
    container(
        button(content)
            .on_press(Message::OpenProduct(item.id))
            .style(button::text)
            .padding(12),
    )
    .style(container::rounded_box)
    .into()
}

fn discount_badge<'a>(item: &CatalogItem) -> Element<'a, Message> {
    if item.has_discount() {
        text(format!("-{:.0}%", item.discount_percentage))
            .size(13)
            .color(ACCENT)
            .into()
    } else {
        text("").into()
    }
}

/// Cached image, or a placeholder until it is ready
pub fn thumbnail<'a>(slot: Option<&ImageSlot>, width: Length, height: f32) -> Element<'a, Message> {
    match slot {
        Some(ImageSlot::Ready(path)) => image(image::Handle::from_path(path.clone()))
            .width(width)
            .height(Length::Fixed(height))
            .into(),
        Some(ImageSlot::Failed) => placeholder("No image", width, height),
        _ => placeholder("Loading image…", width, height),
    }
}

fn placeholder<'a>(label: &'a str, width: Length, height: f32) -> Element<'a, Message> {
    container(text(label).size(12).color(MUTED))
        .center_x(width)
        .center_y(Length::Fixed(height))
        .into()
}
