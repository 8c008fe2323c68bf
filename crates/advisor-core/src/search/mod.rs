//! Web search: the augmentation gate, result models and service trait.

pub mod decision;
pub mod model;
pub mod service;

pub use decision::{WEB_SEARCH_KEYWORDS, should_search};
pub use model::{WebSearchResult, brand_scoped_query, format_search_results};
pub use service::WebSearchService;
