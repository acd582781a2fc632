use iced::widget::{button, column, container, horizontal_space, row, text, Row, Space};
use iced::{Alignment, Color, Element, Length};

use super::card::thumbnail;
use super::{price, ImageSlot};
use crate::state::detail::{DetailState, ProductDetail};
use crate::Message;

const MUTED: Color = Color::from_rgb(0.55, 0.55, 0.6);
const SUCCESS: Color = Color::from_rgb(0.2, 0.65, 0.35);
const DANGER: Color = Color::from_rgb(0.85, 0.25, 0.25);

/// The whole product page for every detail state
pub fn view<'a>(
    state: &'a DetailState,
    preview: Option<&'a ImageSlot>,
    notice: Option<&'a str>,
) -> Element<'a, Message> {
    let back = button(text("← Back to Products"))
        .on_press(Message::BackToCatalog)
        .style(button::text);

    let body: Element<'a, Message> = match state {
        DetailState::Loading(_) => container(text("Loading product…").size(18))
            .center_x(Length::Fill)
            .padding(60)
            .into(),
        DetailState::NotFound(_) => not_found(),
        DetailState::Found(detail) => found(detail, preview, notice),
    };

    column![back, body].spacing(16).padding(24).into()
}

fn not_found<'a>() -> Element<'a, Message> {
    let content = column![
        text("Product Not Found").size(36),
        text("The product you are looking for could not be found.").color(MUTED),
        button(text("Back to Products"))
            .on_press(Message::BackToCatalog)
            .style(button::primary)
            .padding([12, 24]),
    ]
    .spacing(16)
    .align_x(Alignment::Center);

    container(content).center_x(Length::Fill).padding(60).into()
}

fn found<'a>(
    detail: &'a ProductDetail,
    preview: Option<&'a ImageSlot>,
    notice: Option<&'a str>,
) -> Element<'a, Message> {
    let item = &detail.item;

    // ========== Carousel ==========
    let image_count = item.images.len();
    let carousel = column![
        thumbnail(preview, Length::Fixed(480.0), 480.0),
        row![
            button(text("‹")).on_press_maybe((image_count > 1).then_some(Message::PreviousImage)),
            horizontal_space(),
            text(if image_count == 0 {
                "No images".to_string()
            } else {
                format!("{} / {}", detail.image_index() + 1, image_count)
            })
            .size(13)
            .color(MUTED),
            horizontal_space(),
            button(text("›")).on_press_maybe((image_count > 1).then_some(Message::NextImage)),
        ]
        .align_y(Alignment::Center)
        .width(Length::Fixed(480.0)),
        Row::with_children((0..image_count).map(|index| {
            let style = if index == detail.image_index() {
                button::primary
            } else {
                button::secondary
            };
            button(text((index + 1).to_string()).size(12))
                .on_press(Message::SelectImage(index))
                .style(style)
                .into()
        }))
        .spacing(6),
    ]
    .spacing(12);

    // ========== Pricing ==========
    let pricing: Element<'a, Message> = if item.has_discount() {
        column![
            row![
                text(price(item.discounted_price())).size(32),
                text(format!("was {}", price(item.price))).size(16).color(MUTED),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
            text(format!("Save {:.0}% OFF", item.discount_percentage))
                .size(14)
                .color(SUCCESS),
        ]
        .spacing(4)
        .into()
    } else {
        text(price(item.price)).size(32).into()
    };

    let stock_color = if item.is_in_stock() { SUCCESS } else { DANGER };

    // ========== Purchase ==========
    let in_stock = item.is_in_stock();
    let quantity = row![
        button(text("−")).on_press_maybe(
            (in_stock && detail.quantity() > 1).then_some(Message::DecreaseQuantity)
        ),
        text(detail.quantity().to_string()).size(18),
        button(text("+")).on_press_maybe(
            (detail.quantity() < item.stock).then_some(Message::IncreaseQuantity)
        ),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let add_to_cart = button(text(if in_stock { "Add to Cart" } else { "Out of Stock" }))
        .on_press_maybe(in_stock.then_some(Message::AddToCart))
        .style(button::primary)
        .padding([12, 24]);

    let mut info = column![
        text(item.category.to_uppercase()).size(12).color(MUTED),
        text(item.title.as_str()).size(30),
        text(format!("by {}", item.brand_or_unknown())).size(14).color(MUTED),
        row![
            text(format!("★ {:.1}", item.rating)).size(16),
            text(item.stock_label()).size(14).color(stock_color),
        ]
        .spacing(16),
        pricing,
        text(item.description.as_str()).size(15),
        row![quantity, add_to_cart].spacing(24).align_y(Alignment::Center),
    ]
    .spacing(14)
    .width(Length::Fill);

    if let Some(notice) = notice {
        info = info.push(
            row![
                text(notice).color(SUCCESS),
                button(text("Dismiss").size(12))
                    .on_press(Message::DismissNotice)
                    .style(button::text),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
        );
    }

    row![carousel, Space::with_width(Length::Fixed(32.0)), info].into()
}
