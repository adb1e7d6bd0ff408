//! Catalog views: filtering, sorting and pagination over product cards.
//!
//! The view engine is stateless with respect to persistence: it captures the
//! catalog in page order once and recomputes filter -> sort -> paginate on
//! demand. Pagination applies to the filtered and sorted result.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Money;

pub const DEFAULT_PAGE_SIZE: usize = 4;

/// One product card as rendered on the catalog page. Derived per page load,
/// never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub category: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Original catalog order, restricted to the current result set.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    Name,
    /// Descending numeric suffix of the id. Fails open to the incoming order
    /// when any id has no parsable suffix.
    Newest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceRange {
    /// Inclusive on both ends.
    Between(i64, i64),
    AtLeast(i64),
}

impl PriceRange {
    /// Parses the price filter's select values: `"100000-150000"` or
    /// `"3000000+"`. Empty or malformed input means no filter.
    pub fn parse(raw: &str) -> Option<PriceRange> {
        let raw = raw.trim();
        if let Some(min) = raw.strip_suffix('+') {
            return min.parse().ok().map(PriceRange::AtLeast);
        }
        let (min, max) = raw.split_once('-')?;
        Some(PriceRange::Between(min.parse().ok()?, max.parse().ok()?))
    }

    pub fn contains(&self, price: Money) -> bool {
        match *self {
            PriceRange::Between(min, max) => price.amount() >= min && price.amount() <= max,
            PriceRange::AtLeast(min) => price.amount() >= min,
        }
    }
}

/// One combined state of the catalog controls.
#[derive(Clone, Debug)]
pub struct CatalogQuery {
    pub query: String,
    pub category: Option<String>,
    pub price_range: Option<PriceRange>,
    pub sort: SortMode,
    pub page_size: usize,
    pub page: usize,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: None,
            price_range: None,
            sort: SortMode::Relevance,
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub items: Vec<ProductCardView>,
    pub page: usize,
    pub total_pages: usize,
}

pub struct CatalogView {
    products: Vec<ProductCardView>,
}

impl CatalogView {
    pub fn new(products: Vec<ProductCardView>) -> Self {
        Self { products }
    }

    /// Full catalog in original page order.
    pub fn products(&self) -> &[ProductCardView] {
        &self.products
    }

    /// Case-insensitive substring match on name or description, exact
    /// category match, inclusive price bounds. Empty controls filter nothing.
    pub fn filter(
        &self,
        query: &str,
        category: Option<&str>,
        price_range: Option<PriceRange>,
    ) -> Vec<ProductCardView> {
        let needle = query.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                let matches_query = needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle);
                let matches_category =
                    category.map_or(true, |c| c.is_empty() || p.category == c);
                let matches_price = price_range.map_or(true, |r| r.contains(p.price));
                matches_query && matches_category && matches_price
            })
            .cloned()
            .collect()
    }

    pub fn sort(&self, mut view: Vec<ProductCardView>, mode: SortMode) -> Vec<ProductCardView> {
        match mode {
            SortMode::Relevance => {
                return self
                    .products
                    .iter()
                    .filter(|p| view.iter().any(|v| v.id == p.id))
                    .cloned()
                    .collect();
            }
            SortMode::PriceAsc => view.sort_by_key(|p| p.price.amount()),
            SortMode::PriceDesc => view.sort_by_key(|p| Reverse(p.price.amount())),
            SortMode::Name => {
                view.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
            }
            SortMode::Newest => {
                if view.iter().all(|p| id_suffix(&p.id).is_some()) {
                    view.sort_by_key(|p| Reverse(id_suffix(&p.id).unwrap_or(0)));
                }
            }
        }
        view
    }

    /// `page` is clamped to `[1, total_pages]`; an empty view still has one
    /// (empty) page.
    pub fn paginate(&self, view: Vec<ProductCardView>, page_size: usize, page: usize) -> Page {
        let page_size = page_size.max(1);
        let total_pages = view.len().div_ceil(page_size).max(1);
        let page = page.clamp(1, total_pages);
        let items = view
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect();
        Page {
            items,
            page,
            total_pages,
        }
    }

    /// Runs the whole pipeline for one control state.
    pub fn query(&self, q: &CatalogQuery) -> Page {
        let filtered = self.filter(&q.query, q.category.as_deref(), q.price_range);
        let sorted = self.sort(filtered, q.sort);
        self.paginate(sorted, q.page_size, q.page)
    }
}

fn id_suffix(id: &str) -> Option<u64> {
    id.rsplit('-').next().and_then(|s| s.parse().ok())
}
