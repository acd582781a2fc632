use iced::widget::{button, column, pick_list, row, slider, text, text_input, Space};
use iced::{Alignment, Element, Length};
use std::fmt;

use super::{price, ViewMode};
use crate::state::data::{FilterCriteria, SortMode};
use crate::state::engine::CatalogEngine;
use crate::Message;

/// One entry of the category / brand pickers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// No filter; carries the label to show
    All(&'static str),
    Value(String),
}

impl Choice {
    fn list(all: &'static str, values: &[String]) -> Vec<Choice> {
        std::iter::once(Choice::All(all))
            .chain(values.iter().cloned().map(Choice::Value))
            .collect()
    }

    fn selected(all: &'static str, value: &Option<String>) -> Choice {
        match value {
            Some(value) => Choice::Value(value.clone()),
            None => Choice::All(all),
        }
    }

    /// Criteria value: `None` for "all"
    pub fn into_value(self) -> Option<String> {
        match self {
            Choice::All(_) => None,
            Choice::Value(value) => Some(value),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All(label) => f.write_str(label),
            Choice::Value(value) => f.write_str(value),
        }
    }
}

const ALL_CATEGORIES: &str = "All Categories";
const ALL_BRANDS: &str = "All Brands";

/// Search box; `raw` is the text as typed, before debouncing
pub fn search_bar<'a>(raw: &'a str) -> Element<'a, Message> {
    text_input("Search products, brands, categories…", raw)
        .on_input(Message::SearchChanged)
        .padding(12)
        .size(16)
        .into()
}

/// Category, brand, price, sort and layout controls
pub fn filter_bar<'a>(engine: &'a CatalogEngine, view_mode: ViewMode) -> Element<'a, Message> {
    let facets = engine.facets();
    let criteria = engine.criteria();

    let category = labeled(
        "Category",
        pick_list(
            Choice::list(ALL_CATEGORIES, &facets.categories),
            Some(Choice::selected(ALL_CATEGORIES, &criteria.category)),
            Message::CategorySelected,
        )
        .width(Length::Fixed(200.0))
        .into(),
    );

    let brand = labeled(
        "Brand",
        pick_list(
            Choice::list(ALL_BRANDS, &facets.brands),
            Some(Choice::selected(ALL_BRANDS, &criteria.brand)),
            Message::BrandSelected,
        )
        .width(Length::Fixed(200.0))
        .into(),
    );

    let sort = labeled(
        "Sort by",
        pick_list(SortMode::ALL, Some(criteria.sort_mode), Message::SortSelected)
            .width(Length::Fixed(200.0))
            .into(),
    );

    row![
        category,
        brand,
        price_slider(criteria, facets.max_price),
        sort,
        Space::with_width(Length::Fill),
        view_toggle(view_mode),
    ]
    .spacing(20)
    .align_y(Alignment::End)
    .into()
}

fn price_slider<'a>(criteria: &FilterCriteria, max_price: f64) -> Element<'a, Message> {
    // Nothing to slide over until a catalog with prices is loaded
    if max_price <= 0.0 {
        return Space::with_width(Length::Fixed(220.0)).into();
    }

    column![
        row![
            text("Price Range").size(13),
            Space::with_width(Length::Fill),
            text(price(criteria.price_ceiling)).size(13),
        ],
        slider(0.0..=max_price, criteria.price_ceiling, Message::PriceChanged).step(1.0),
        row![
            text("$0").size(11),
            Space::with_width(Length::Fill),
            text(price(max_price)).size(11),
        ],
    ]
    .spacing(6)
    .width(Length::Fixed(220.0))
    .into()
}

fn view_toggle<'a>(view_mode: ViewMode) -> Element<'a, Message> {
    let toggle = |label: &'a str, mode: ViewMode| {
        let style = if view_mode == mode {
            button::primary
        } else {
            button::secondary
        };
        button(text(label).size(13))
            .on_press(Message::ViewModeSelected(mode))
            .style(style)
            .padding([6, 12])
    };

    row![toggle("Grid", ViewMode::Grid), toggle("List", ViewMode::List)]
        .spacing(4)
        .into()
}

fn labeled<'a>(label: &'a str, control: Element<'a, Message>) -> Element<'a, Message> {
    column![text(label).size(13), control].spacing(6).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_list_starts_with_all() {
        let choices = Choice::list(ALL_BRANDS, &["Apple".to_string(), "Unknown".to_string()]);
        assert_eq!(choices[0].to_string(), "All Brands");
        assert_eq!(choices[2], Choice::Value("Unknown".to_string()));
        assert_eq!(choices.len(), 3);
    }

    #[test]
    fn test_choice_to_criteria() {
        assert_eq!(Choice::All(ALL_CATEGORIES).into_value(), None);
        assert_eq!(
            Choice::Value("beauty".to_string()).into_value(),
            Some("beauty".to_string())
        );
        assert_eq!(
            Choice::selected(ALL_CATEGORIES, &None),
            Choice::All(ALL_CATEGORIES)
        );
    }
}
