use std::collections::BTreeSet;

use super::data::{CatalogItem, Facets};

/// Compute the filter options offered for a catalog.
///
/// Always run against the full catalog so the options don't shrink as
/// filters are applied. The catalog is small, so this is recomputed from
/// scratch on every load.
pub fn derive_facets(catalog: &[CatalogItem]) -> Facets {
    let categories: BTreeSet<&str> = catalog.iter().map(|item| item.category.as_str()).collect();
    let brands: BTreeSet<&str> = catalog.iter().map(CatalogItem::brand_or_unknown).collect();

    let max_price = catalog
        .iter()
        .map(|item| item.price)
        .fold(0.0_f64, f64::max);

    Facets {
        categories: categories.into_iter().map(str::to_owned).collect(),
        brands: brands.into_iter().map(str::to_owned).collect(),
        max_price,
    }
}
