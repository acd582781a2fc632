/// Query engine: filters and orders the catalog for the active criteria
///
/// All predicates are ANDed. Sorting runs after filtering and is stable,
/// so ties keep catalog order. The catalog itself is never reordered.
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::data::{CatalogItem, FilterCriteria, SortMode};

/// Matching items as positions into `catalog`, in display order.
///
/// The state engine keeps positions instead of references so it can own
/// the catalog and the result set side by side.
pub fn select(catalog: &[CatalogItem], criteria: &FilterCriteria) -> Vec<usize> {
    let term = normalize_term(&criteria.search);

    let mut matches: Vec<usize> = catalog
        .iter()
        .enumerate()
        .filter(|(_, item)| matches(item, criteria, &term))
        .map(|(index, _)| index)
        .collect();

    // slice::sort_by is stable, which the tie-breaking rule relies on
    match criteria.sort_mode {
        SortMode::Default => {}
        SortMode::PriceAsc => {
            matches.sort_by(|&a, &b| catalog[a].price.total_cmp(&catalog[b].price))
        }
        SortMode::PriceDesc => {
            matches.sort_by(|&a, &b| catalog[b].price.total_cmp(&catalog[a].price))
        }
        SortMode::NameAsc => {
            matches.sort_by(|&a, &b| collate(&catalog[a].title, &catalog[b].title))
        }
        SortMode::NameDesc => {
            matches.sort_by(|&a, &b| collate(&catalog[b].title, &catalog[a].title))
        }
        SortMode::RatingDesc => {
            matches.sort_by(|&a, &b| catalog[b].rating.total_cmp(&catalog[a].rating))
        }
    }

    matches
}

/// Trimmed, lowercased search term; empty means "no search"
fn normalize_term(search: &str) -> String {
    search.trim().to_lowercase()
}

fn matches(item: &CatalogItem, criteria: &FilterCriteria, term: &str) -> bool {
    if let Some(category) = &criteria.category {
        if item.category != *category {
            return false;
        }
    }

    if let Some(brand) = &criteria.brand {
        if item.brand_or_unknown() != brand {
            return false;
        }
    }

    // Inclusive ceiling; zero or negative disables the filter
    if criteria.price_ceiling > 0.0 && item.price > criteria.price_ceiling {
        return false;
    }

    if !term.is_empty() {
        // Plain substring containment, no tokenizing or fuzzy matching
        let haystack = format!(
            "{} {} {} {}",
            item.title,
            item.description,
            item.category,
            item.brand.as_deref().unwrap_or_default()
        )
        .to_lowercase();
        return haystack.contains(term);
    }

    true
}

/// Human-friendly title ordering.
///
/// Compared in tiers, each only breaking ties of the one before:
/// 1. base letters, ignoring accents and case ("Éclair" sorts with "eclair")
/// 2. accents, unaccented first
/// 3. case, lowercase first
/// 4. code points, so the ordering is total
pub fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented(a).cmp(accented(b)))
        .then_with(|| case_marks(a).cmp(case_marks(b)))
        .then_with(|| a.cmp(b))
}

fn base_letters(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accented(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd().flat_map(char::to_lowercase)
}

fn case_marks(text: &str) -> impl Iterator<Item = bool> + '_ {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::product;
    use pretty_assertions::assert_eq;

    fn apply<'a>(catalog: &'a [CatalogItem], criteria: &FilterCriteria) -> Vec<&'a CatalogItem> {
        select(catalog, criteria)
            .into_iter()
            .map(|index| &catalog[index])
            .collect()
    }

    fn titles(items: &[&CatalogItem]) -> Vec<String> {
        items.iter().map(|item| item.title.clone()).collect()
    }

    fn shop() -> Vec<CatalogItem> {
        vec![
            product(1, "Red Shirt", 20.0, "clothing", None),
            product(2, "Blue Hat", 10.0, "accessories", None),
        ]
    }

    #[test]
    fn test_category_filter() {
        let catalog = shop();
        let criteria = FilterCriteria {
            category: Some("clothing".to_string()),
            ..Default::default()
        };
        assert_eq!(titles(&apply(&catalog, &criteria)), vec!["Red Shirt"]);

        // exact match only
        let criteria = FilterCriteria {
            category: Some("Clothing".to_string()),
            ..Default::default()
        };
        assert!(apply(&catalog, &criteria).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let catalog = shop();
        let criteria = FilterCriteria {
            search: "  HAT ".to_string(),
            ..Default::default()
        };
        assert_eq!(titles(&apply(&catalog, &criteria)), vec!["Blue Hat"]);

        // category text is searchable too
        let criteria = FilterCriteria {
            search: "access".to_string(),
            ..Default::default()
        };
        assert_eq!(titles(&apply(&catalog, &criteria)), vec!["Blue Hat"]);

        // no fuzzy matching
        let criteria = FilterCriteria {
            search: "hta".to_string(),
            ..Default::default()
        };
        assert!(apply(&catalog, &criteria).is_empty());
    }

    #[test]
    fn test_search_covers_brand() {
        let catalog = vec![
            product(1, "Mascara", 9.0, "beauty", Some("Essence")),
            product(2, "Lipstick", 12.0, "beauty", None),
        ];
        let criteria = FilterCriteria {
            search: "essence".to_string(),
            ..Default::default()
        };
        assert_eq!(titles(&apply(&catalog, &criteria)), vec!["Mascara"]);
    }

    #[test]
    fn test_price_asc() {
        let catalog = shop();
        let criteria = FilterCriteria {
            sort_mode: SortMode::PriceAsc,
            ..Default::default()
        };
        assert_eq!(titles(&apply(&catalog, &criteria)), vec!["Blue Hat", "Red Shirt"]);
    }

    #[test]
    fn test_price_ceiling() {
        let catalog = shop();

        // zero means no ceiling
        let criteria = FilterCriteria { price_ceiling: 0.0, ..Default::default() };
        assert_eq!(apply(&catalog, &criteria).len(), 2);

        // inclusive bound
        let criteria = FilterCriteria { price_ceiling: 10.0, ..Default::default() };
        assert_eq!(titles(&apply(&catalog, &criteria)), vec!["Blue Hat"]);

        let criteria = FilterCriteria { price_ceiling: 9.99, ..Default::default() };
        assert!(apply(&catalog, &criteria).is_empty());
    }

    #[test]
    fn test_brand_filter_uses_unknown_fallback() {
        let catalog = vec![
            product(1, "Mascara", 9.0, "beauty", Some("Essence")),
            product(2, "Lipstick", 12.0, "beauty", None),
        ];
        let criteria = FilterCriteria {
            brand: Some("Unknown".to_string()),
            ..Default::default()
        };
        assert_eq!(titles(&apply(&catalog, &criteria)), vec!["Lipstick"]);
    }

    #[test]
    fn test_filters_are_anded() {
        let catalog = vec![
            product(1, "Red Shirt", 20.0, "clothing", Some("Zara")),
            product(2, "Red Hat", 15.0, "accessories", Some("Zara")),
            product(3, "Red Dress", 80.0, "clothing", Some("Zara")),
            product(4, "Red Jeans", 30.0, "clothing", Some("Levis")),
        ];
        let criteria = FilterCriteria {
            search: "red".to_string(),
            category: Some("clothing".to_string()),
            brand: Some("Zara".to_string()),
            price_ceiling: 50.0,
            sort_mode: SortMode::Default,
        };
        assert_eq!(titles(&apply(&catalog, &criteria)), vec!["Red Shirt"]);
    }

    #[test]
    fn test_sorts_are_stable() {
        let catalog = vec![
            product(1, "b", 5.0, "x", None),
            product(2, "a", 5.0, "x", None),
            product(3, "c", 1.0, "x", None),
            product(4, "d", 5.0, "x", None),
        ];

        let asc = FilterCriteria { sort_mode: SortMode::PriceAsc, ..Default::default() };
        assert_eq!(titles(&apply(&catalog, &asc)), vec!["c", "b", "a", "d"]);

        let desc = FilterCriteria { sort_mode: SortMode::PriceDesc, ..Default::default() };
        assert_eq!(titles(&apply(&catalog, &desc)), vec!["b", "a", "d", "c"]);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let catalog = vec![
            product(1, "banana", 1.0, "x", None),
            product(2, "Cherry", 1.0, "x", None),
            product(3, "apple", 1.0, "x", None),
        ];

        let asc = FilterCriteria { sort_mode: SortMode::NameAsc, ..Default::default() };
        assert_eq!(titles(&apply(&catalog, &asc)), vec!["apple", "banana", "Cherry"]);

        let desc = FilterCriteria { sort_mode: SortMode::NameDesc, ..Default::default() };
        assert_eq!(titles(&apply(&catalog, &desc)), vec!["Cherry", "banana", "apple"]);
    }

    #[test]
    fn test_name_sort_folds_accents() {
        let catalog = vec![
            product(1, "Zebra Lamp", 1.0, "x", None),
            product(2, "Éclair Tray", 1.0, "x", None),
            product(3, "Banana Bowl", 1.0, "x", None),
        ];

        let asc = FilterCriteria { sort_mode: SortMode::NameAsc, ..Default::default() };
        assert_eq!(
            titles(&apply(&catalog, &asc)),
            vec!["Banana Bowl", "Éclair Tray", "Zebra Lamp"]
        );

        let desc = FilterCriteria { sort_mode: SortMode::NameDesc, ..Default::default() };
        assert_eq!(
            titles(&apply(&catalog, &desc)),
            vec!["Zebra Lamp", "Éclair Tray", "Banana Bowl"]
        );
    }

    #[test]
    fn test_collate_tie_breaks() {
        // accents only decide between otherwise equal titles
        assert_eq!(collate("eclair", "éclair"), Ordering::Less);
        assert_eq!(collate("éclair", "ecrin"), Ordering::Less);
        // then case, lowercase first
        assert_eq!(collate("a", "A"), Ordering::Less);
        assert_eq!(collate("apple", "Apple"), Ordering::Less);
        assert_eq!(collate("Apple", "banana"), Ordering::Less);
        // precomposed and decomposed forms tie on every tier but the last
        assert_ne!(collate("\u{e9}", "e\u{301}"), Ordering::Equal);
        assert_eq!(collate("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_rating_desc_and_default_order() {
        let mut catalog = shop();
        catalog[0].rating = 3.1;
        catalog[1].rating = 4.7;

        let rating = FilterCriteria { sort_mode: SortMode::RatingDesc, ..Default::default() };
        assert_eq!(titles(&apply(&catalog, &rating)), vec!["Blue Hat", "Red Shirt"]);

        // back to default restores catalog order regardless of the previous sort
        let default = FilterCriteria::default();
        assert_eq!(titles(&apply(&catalog, &default)), vec!["Red Shirt", "Blue Hat"]);
    }

    #[test]
    fn test_result_is_subset_of_catalog() {
        let catalog = shop();
        let criteria = FilterCriteria {
            search: "e".to_string(),
            sort_mode: SortMode::NameDesc,
            ..Default::default()
        };
        for item in apply(&catalog, &criteria) {
            assert!(catalog.contains(item));
        }
    }
}
