//! Catalog search over loaded listings.

use crate::listing::{BookListing, Condition, ListingType};
use serde::{Deserialize, Serialize};

/// Catalog categories offered when listing or filtering books.
pub const CATEGORIES: [&str; 8] = [
    "Engineering & Technology",
    "Medical & Health Sciences",
    "Business & Economics",
    "Natural Sciences",
    "Humanities & Literature",
    "Social Sciences",
    "Law & Legal Studies",
    "Education",
];

/// Filters for the catalog. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingQuery {
    /// Case-insensitive text matched against title, author and course code
    pub text: Option<String>,
    /// Exact category
    pub category: Option<String>,
    /// Exact condition
    pub condition: Option<Condition>,
    /// Exact listing type
    pub listing_type: Option<ListingType>,
    /// Highest acceptable price; free and exchange listings always pass
    pub max_price: Option<f64>,
}

impl ListingQuery {
    /// Query matching everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text. Blank text clears it.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = (!text.trim().is_empty()).then(|| text.trim().to_string());
        self
    }

    /// Restrict to one category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict to one condition.
    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Restrict to one listing type.
    #[must_use]
    pub fn listing_type(mut self, listing_type: ListingType) -> Self {
        self.listing_type = Some(listing_type);
        self
    }

    /// Cap the price.
    #[must_use]
    pub fn max_price(mut self, max_price: f64) -> Self {
        self.max_price = Some(max_price);
        self
    }

    /// True when no filter is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Does `listing` satisfy every filter?
    pub fn matches(&self, listing: &BookListing) -> bool {
        self.text.as_deref().is_none_or(|text| text_matches(listing, text))
            && self.category.as_deref().is_none_or(|c| listing.category == c)
            && self.condition.is_none_or(|c| listing.condition == c)
            && self.listing_type.is_none_or(|t| listing.listing_type == t)
            && self.max_price.is_none_or(|cap| within_price(listing, cap))
    }

    /// Matching listings, in input order.
    pub fn apply<'a>(&self, listings: &'a [BookListing]) -> Vec<&'a BookListing> {
        listings.iter().filter(|l| self.matches(l)).collect()
    }
}

/// Substring match on title, author or course code, ignoring case.
pub(crate) fn text_matches(listing: &BookListing, text: &str) -> bool {
    let needle = text.to_lowercase();
    listing.title.to_lowercase().contains(&needle)
        || listing.author.to_lowercase().contains(&needle)
        || listing
            .course_code
            .as_deref()
            .is_some_and(|code| code.to_lowercase().contains(&needle))
}

/// Free and exchange listings cost nothing; unpriced sales never pass a cap.
pub(crate) fn within_price(listing: &BookListing, cap: f64) -> bool {
    match listing.listing_type {
        ListingType::Free | ListingType::Exchange => true,
        ListingType::Sell | ListingType::Unknown => listing.price.is_some_and(|p| p <= cap),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<BookListing> {
        vec![
            BookListing::new("1", "Calculus: Early Transcendentals", "James Stewart")
                .with_category("Natural Sciences")
                .with_course_code("MATH101")
                .with_condition(Condition::Good)
                .with_offer(ListingType::Sell, Some(85.0)),
            BookListing::new("2", "Gray's Anatomy", "Henry Gray")
                .with_category("Medical & Health Sciences")
                .with_condition(Condition::LikeNew)
                .with_offer(ListingType::Exchange, None),
            BookListing::new("3", "Principles of Economics", "N. Gregory Mankiw")
                .with_category("Business & Economics")
                .with_course_code("ECON201")
                .with_condition(Condition::Fair)
                .with_offer(ListingType::Free, None),
            BookListing::new("4", "Introduction to Algorithms", "Cormen")
                .with_category("Engineering & Technology")
                .with_course_code("CS301")
                .with_condition(Condition::Good)
                .with_offer(ListingType::Sell, Some(120.0)),
        ]
    }

    fn ids(hits: &[&BookListing]) -> Vec<String> {
        hits.iter().map(|l| l.id.clone()).collect()
    }

    #[test]
    fn test_empty_query_matches_all_in_order() {
        let books = catalog();
        let query = ListingQuery::new().text("   ");
        assert!(query.is_empty());
        assert_eq!(ids(&query.apply(&books)), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_text_matches_title_author_and_course() {
        let books = catalog();
        assert_eq!(ids(&ListingQuery::new().text("calculus").apply(&books)), vec!["1"]);
        assert_eq!(ids(&ListingQuery::new().text("MANKIW").apply(&books)), vec!["3"]);
        assert_eq!(ids(&ListingQuery::new().text("cs3").apply(&books)), vec!["4"]);
        assert!(ListingQuery::new().text("quantum").apply(&books).is_empty());
    }

    #[test]
    fn test_exact_filters_combine() {
        let books = catalog();
        let query = ListingQuery::new()
            .condition(Condition::Good)
            .listing_type(ListingType::Sell)
            .category("Engineering & Technology");
        assert_eq!(ids(&query.apply(&books)), vec!["4"]);
    }

    #[test]
    fn test_max_price_keeps_free_and_exchange() {
        let books = catalog();
        assert_eq!(
            ids(&ListingQuery::new().max_price(100.0).apply(&books)),
            vec!["1", "2", "3"]
        );
        assert_eq!(ids(&ListingQuery::new().max_price(10.0).apply(&books)), vec!["2", "3"]);
    }

    #[test]
    fn test_categories_are_known() {
        for book in catalog() {
            assert!(CATEGORIES.contains(&book.category.as_str()));
        }
    }
}
