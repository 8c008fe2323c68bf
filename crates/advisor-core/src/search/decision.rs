//! Heuristic gate for web-search augmentation.
//!
//! Matching is plain case-insensitive substring search, so it is deliberately
//! over-inclusive ("news" contains "new"). A false positive costs one extra
//! search call; a false negative only means a less current answer.

/// Temporal and commercial-intent terms that warrant a live search.
pub const WEB_SEARCH_KEYWORDS: &[&str] = &[
    "latest",
    "new",
    "recent",
    "current",
    "price",
    "cost",
    "buy",
    "purchase",
    "available",
    "where to find",
    "reviews",
    "rating",
    "compare",
    "vs",
    "launch",
    "released",
    "trending",
    "popular",
    "best seller",
    "on sale",
    "discount",
    "ingredients list",
    "full ingredients",
    "updated formula",
];

/// Returns true when `message` contains any of [`WEB_SEARCH_KEYWORDS`].
pub fn should_search(message: &str) -> bool {
    let message = message.to_lowercase();
    WEB_SEARCH_KEYWORDS
        .iter()
        .any(|keyword| message.contains(keyword))
}
