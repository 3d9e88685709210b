//! View pipeline: sort → filter → paginate.
//!
//! Everything here is a pure derivation over a borrowed slice of items. The store is
//! never reordered; only the returned page owns copies of the visible items.

use core::cmp::Ordering;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ItemId, ValueObject};

use crate::item::{Item, parse_price, parse_quantity};

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Field the view can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Id,
    Name,
    Quantity,
    Price,
    Category,
}

impl SortField {
    fn compare(self, a: &Item, b: &Item) -> Ordering {
        match self {
            SortField::Id => a.id_typed().cmp(&b.id_typed()),
            SortField::Name => a.name().cmp(b.name()),
            SortField::Quantity => a.quantity().cmp(&b.quantity()),
            SortField::Price => a.price().total_cmp(&b.price()),
            SortField::Category => a.category().cmp(b.category()),
        }
    }
}

impl FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(SortField::Id),
            "name" => Ok(SortField::Name),
            "quantity" | "qty" => Ok(SortField::Quantity),
            "price" => Ok(SortField::Price),
            "category" => Ok(SortField::Category),
            other => Err(DomainError::validation(format!(
                "unknown sort field {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn ascending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    fn compare(self, a: &Item, b: &Item) -> Ordering {
        let ordering = self.field.compare(a, b);
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl ValueObject for SortOrder {}

/// Conjunctive item filter. Unset bounds always pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemFilter {
    pub search: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_quantity: Option<u64>,
    pub max_quantity: Option<u64>,
    pub category: Option<String>,
}

impl ValueObject for ItemFilter {}

impl ItemFilter {
    pub fn matches(&self, item: &Item) -> bool {
        self.matches_search(item.name())
            && self.min_price.is_none_or(|min| item.price() >= min)
            && self.max_price.is_none_or(|max| item.price() <= max)
            && self.min_quantity.is_none_or(|min| item.quantity() >= min)
            && self.max_quantity.is_none_or(|max| item.quantity() <= max)
            && self
                .category
                .as_deref()
                .is_none_or(|category| item.category() == category)
    }

    fn matches_search(&self, name: &str) -> bool {
        self.search.is_empty() || name.to_lowercase().contains(&self.search.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parse an optional price bound from raw input; blank input clears the bound.
pub fn parse_price_bound(raw: &str) -> DomainResult<Option<f64>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_price(raw).map(Some)
}

/// Parse an optional quantity bound from raw input; blank input clears the bound.
pub fn parse_quantity_bound(raw: &str) -> DomainResult<Option<u64>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_quantity(raw).map(Some)
}

/// Everything that decides which items are on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewCriteria {
    pub filter: ItemFilter,
    pub sort: Option<SortOrder>,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewCriteria {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl ViewCriteria {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            filter: ItemFilter::default(),
            sort: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Sort by `field`; selecting the active field again flips the direction.
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort = Some(match self.sort {
            Some(order) if order.field == field => SortOrder {
                field,
                direction: order.direction.reversed(),
            },
            _ => SortOrder::ascending(field),
        });
    }
}

/// One page of the derived view.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Item>,
    /// Effective 1-based page number after clamping.
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    /// Number of items that passed the filter, across all pages.
    pub total_matches: usize,
}

impl Page {
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(Item::id_typed).collect()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Stable sort of a snapshot. With no order the store order is kept.
pub fn sort_items<'a>(items: &'a [Item], order: Option<SortOrder>) -> Vec<&'a Item> {
    let mut sorted: Vec<&Item> = items.iter().collect();
    if let Some(order) = order {
        sorted.sort_by(|a, b| order.compare(a, b));
    }
    sorted
}

pub fn filter_items<'a>(items: Vec<&'a Item>, filter: &ItemFilter) -> Vec<&'a Item> {
    items.into_iter().filter(|item| filter.matches(item)).collect()
}

/// `ceil(total / page_size)`.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

/// Clamp a requested page into `1..=max(page_count, 1)`.
pub fn clamp_page(page: usize, page_count: usize) -> usize {
    page.clamp(1, page_count.max(1))
}

pub fn paginate(items: &[&Item], page: usize, page_size: usize) -> Page {
    let page_size = page_size.max(1);
    let page_count = page_count(items.len(), page_size);
    let page = clamp_page(page, page_count);
    let start = (page - 1) * page_size;

    Page {
        items: items
            .iter()
            .skip(start)
            .take(page_size)
            .map(|item| (*item).clone())
            .collect(),
        page,
        page_count,
        page_size,
        total_matches: items.len(),
    }
}

/// Run the full pipeline.
pub fn run(items: &[Item], criteria: &ViewCriteria) -> Page {
    let sorted = sort_items(items, criteria.sort);
    let filtered = filter_items(sorted, &criteria.filter);
    let page = paginate(&filtered, criteria.page, criteria.page_size);
    tracing::debug!(
        total = items.len(),
        matches = page.total_matches,
        page = page.page,
        page_count = page.page_count,
        "view recomputed"
    );
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemDraft;

    fn item(id: u64, name: &str, quantity: u64, price: f64, category: &str) -> Item {
        Item::from_draft(
            ItemId::new(id),
            ItemDraft {
                name: name.into(),
                quantity,
                price,
                category: category.into(),
            },
        )
    }

    fn sample() -> Vec<Item> {
        vec![
            item(1, "Apple", 10, 5.0, "Fruits"),
            item(2, "Laptop", 2, 900.0, "Electronics"),
            item(3, "Pineapple", 4, 12.5, "Fruits"),
            item(4, "Chair", 8, 45.0, "Furniture"),
            item(5, "apple juice", 30, 3.0, "Drinks"),
            item(6, "Banana", 20, 3.0, "Fruits"),
            item(7, "Desk", 1, 150.0, "Furniture"),
        ]
    }

    fn names(items: &[Item]) -> Vec<&str> {
        items.iter().map(Item::name).collect()
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let filter = ItemFilter {
            search: "APP".into(),
            ..ItemFilter::default()
        };
        let items = sample();
        let matched: Vec<&str> = items
            .iter()
            .filter(|i| filter.matches(i))
            .map(Item::name)
            .collect();
        assert_eq!(matched, vec!["Apple", "Pineapple", "apple juice"]);
    }

    #[test]
    fn filter_is_conjunctive() {
        let filter = ItemFilter {
            search: "app".into(),
            min_price: Some(10.0),
            ..ItemFilter::default()
        };
        let items = sample();
        let matched: Vec<&str> = items
            .iter()
            .filter(|i| filter.matches(i))
            .map(Item::name)
            .collect();
        assert_eq!(matched, vec!["Pineapple"]);
    }

    #[test]
    fn bounds_are_inclusive() {
        let filter = ItemFilter {
            min_price: Some(3.0),
            max_price: Some(5.0),
            min_quantity: Some(10),
            max_quantity: Some(20),
            ..ItemFilter::default()
        };
        let items = sample();
        let matched: Vec<&str> = items
            .iter()
            .filter(|i| filter.matches(i))
            .map(Item::name)
            .collect();
        assert_eq!(matched, vec!["Apple", "Banana"]);
    }

    #[test]
    fn category_filter_is_exact() {
        let filter = ItemFilter {
            category: Some("Furniture".into()),
            ..ItemFilter::default()
        };
        let items = sample();
        assert_eq!(items.iter().filter(|i| filter.matches(i)).count(), 2);
    }

    #[test]
    fn sort_is_stable_and_does_not_touch_input() {
        let items = sample();
        let before = items.clone();
        let sorted = sort_items(&items, Some(SortOrder::ascending(SortField::Price)));
        let sorted_names: Vec<&str> = sorted.iter().map(|i| i.name()).collect();
        // "apple juice" and "Banana" tie on price 3.0 and keep store order.
        assert_eq!(
            sorted_names,
            vec!["apple juice", "Banana", "Apple", "Pineapple", "Chair", "Desk", "Laptop"]
        );
        assert_eq!(items, before);
    }

    #[test]
    fn descending_sort_reverses_field_order() {
        let items = sample();
        let sorted = sort_items(&items, Some(SortOrder::descending(SortField::Quantity)));
        let quantities: Vec<u64> = sorted.iter().map(|i| i.quantity()).collect();
        assert_eq!(quantities, vec![30, 20, 10, 8, 4, 2, 1]);
    }

    #[test]
    fn toggle_sort_flips_then_switches_field() {
        let mut criteria = ViewCriteria::default();
        criteria.toggle_sort(SortField::Name);
        assert_eq!(criteria.sort, Some(SortOrder::ascending(SortField::Name)));
        criteria.toggle_sort(SortField::Name);
        assert_eq!(criteria.sort, Some(SortOrder::descending(SortField::Name)));
        criteria.toggle_sort(SortField::Price);
        assert_eq!(criteria.sort, Some(SortOrder::ascending(SortField::Price)));
    }

    #[test]
    fn sort_field_parses_aliases() {
        assert_eq!("Qty".parse::<SortField>().unwrap(), SortField::Quantity);
        assert!("weight".parse::<SortField>().is_err());
    }

    #[test]
    fn paginate_slices_by_page_size() {
        let items = sample();
        let mut criteria = ViewCriteria::default();
        let first = run(&items, &criteria);
        assert_eq!(first.page_count, 2);
        assert_eq!(first.items.len(), 5);
        assert!(first.has_next());
        assert!(!first.has_previous());

        criteria.page = 2;
        let second = run(&items, &criteria);
        assert_eq!(names(&second.items), vec!["Banana", "Desk"]);
        assert!(!second.has_next());
    }

    #[test]
    fn out_of_range_page_is_clamped_to_last_page() {
        let items = sample();
        let criteria = ViewCriteria {
            page: 9,
            ..ViewCriteria::default()
        };
        let page = run(&items, &criteria);
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn empty_result_reports_page_one_of_zero() {
        let criteria = ViewCriteria {
            page: 3,
            ..ViewCriteria::default()
        };
        let page = run(&[], &criteria);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn blank_bounds_clear_and_bad_bounds_fail() {
        assert_eq!(parse_price_bound("  ").unwrap(), None);
        assert_eq!(parse_price_bound("2.5").unwrap(), Some(2.5));
        assert!(parse_price_bound("cheap").is_err());
        assert_eq!(parse_quantity_bound("").unwrap(), None);
        assert!(parse_quantity_bound("-4").is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_items() -> impl Strategy<Value = Vec<Item>> {
            prop::collection::vec(
                (
                    "[a-cA-C]{1,4}",
                    0u64..50,
                    0u32..200,
                    prop::sample::select(vec!["Fruits", "Tools", "Misc"]),
                ),
                0..30,
            )
            .prop_map(|rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(i, (name, quantity, cents, category))| {
                        item(i as u64 + 1, &name, quantity, f64::from(cents) / 4.0, category)
                    })
                    .collect()
            })
        }

        fn arb_sort() -> impl Strategy<Value = Option<SortOrder>> {
            prop::option::of(
                (
                    prop::sample::select(vec![
                        SortField::Id,
                        SortField::Name,
                        SortField::Quantity,
                        SortField::Price,
                        SortField::Category,
                    ]),
                    any::<bool>(),
                )
                    .prop_map(|(field, desc)| {
                        if desc {
                            SortOrder::descending(field)
                        } else {
                            SortOrder::ascending(field)
                        }
                    }),
            )
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: concatenating every page reproduces the filtered, sorted sequence.
            #[test]
            fn pages_partition_the_filtered_sequence(
                items in arb_items(),
                sort in arb_sort(),
                page_size in 1usize..8,
                search in "[a-c]{0,2}",
            ) {
                let filter = ItemFilter { search, ..ItemFilter::default() };
                let expected: Vec<Item> = filter_items(sort_items(&items, sort), &filter)
                    .into_iter()
                    .cloned()
                    .collect();

                let mut criteria = ViewCriteria::with_page_size(page_size);
                criteria.filter = filter;
                criteria.sort = sort;

                let count = page_count(expected.len(), page_size);
                prop_assert_eq!(count, expected.len().div_ceil(page_size));

                let mut concatenated = Vec::new();
                for page in 1..=count {
                    criteria.page = page;
                    let result = run(&items, &criteria);
                    prop_assert_eq!(result.page, page);
                    prop_assert!(result.items.len() <= page_size);
                    concatenated.extend(result.items);
                }
                prop_assert_eq!(concatenated, expected);
            }

            /// Property: tightening any single bound never grows the result.
            #[test]
            fn stricter_filters_never_match_more(
                items in arb_items(),
                min_price in 0u32..50,
                extra in 1u32..50,
                min_quantity in 0u64..25,
            ) {
                let loose = ItemFilter {
                    min_price: Some(f64::from(min_price)),
                    min_quantity: Some(min_quantity),
                    ..ItemFilter::default()
                };
                let stricter = [
                    ItemFilter { min_price: Some(f64::from(min_price + extra)), ..loose.clone() },
                    ItemFilter { min_quantity: Some(min_quantity + u64::from(extra)), ..loose.clone() },
                    ItemFilter { search: "a".into(), ..loose.clone() },
                    ItemFilter { category: Some("Fruits".into()), ..loose.clone() },
                    ItemFilter { max_price: Some(f64::from(min_price)), ..loose.clone() },
                ];

                let base = items.iter().filter(|i| loose.matches(i)).count();
                for filter in &stricter {
                    let narrowed = items.iter().filter(|i| filter.matches(i)).count();
                    prop_assert!(narrowed <= base);
                }
            }

            /// Property: running the pipeline never reorders the input.
            #[test]
            fn pipeline_leaves_store_order_intact(items in arb_items(), sort in arb_sort()) {
                let before = items.clone();
                let criteria = ViewCriteria { sort, ..ViewCriteria::default() };
                let _ = run(&items, &criteria);
                prop_assert_eq!(items, before);
            }
        }
    }
}
