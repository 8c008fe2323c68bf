//! Web search domain models.

use serde::{Deserialize, Serialize};

/// Brands the search query is scoped to.
const SEARCH_BRANDS: &[&str] = &["L'Oréal", "CeraVe", "Maybelline", "Garnier"];

/// Sites the search query is restricted to.
const SEARCH_SITES: &[&str] = &[
    "loreal.com",
    "cerave.com",
    "maybelline.com",
    "garnier.com",
];

/// A single web search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSearchResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: String,
}

/// Builds the brand-scoped query string sent to the search service.
pub fn brand_scoped_query(message: &str) -> String {
    let sites: Vec<String> = SEARCH_SITES
        .iter()
        .map(|site| format!("site:{site}"))
        .collect();
    format!(
        "{} {} {}",
        message.trim(),
        SEARCH_BRANDS.join(" "),
        sites.join(" OR ")
    )
}

/// Renders results as a numbered block for the system instructions.
///
/// Returns an empty string when there is nothing to add.
pub fn format_search_results(results: &[WebSearchResult]) -> String {
    if results.is_empty() {
        return String::new();
    }

    let formatted: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            format!(
                "{}. {}\n   URL: {}\n   Info: {}",
                index + 1,
                result.title,
                result.url,
                result.snippet
            )
        })
        .collect();

    format!(
        "\n\nCURRENT WEB INFORMATION:\n{}\n\nUse this current information to provide up-to-date \
         details about products, pricing, availability, or recent launches. \
         Always cite sources when using this information.",
        formatted.join("\n\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_scoped_to_brand_sites() {
        let query = brand_scoped_query("  latest serum  ");
        assert!(query.starts_with("latest serum L'Oréal CeraVe Maybelline Garnier site:"));
        assert!(query.ends_with("site:maybelline.com OR site:garnier.com"));
    }

    #[test]
    fn empty_results_format_to_nothing() {
        assert_eq!(format_search_results(&[]), "");
    }

    #[test]
    fn results_are_numbered() {
        let results = vec![
            WebSearchResult {
                title: "CeraVe Serum".into(),
                url: "https://cerave.com/serum".into(),
                snippet: "Now $19.99".into(),
            },
            WebSearchResult {
                title: "Review".into(),
                url: "https://example.com".into(),
                snippet: String::new(),
            },
        ];

        let block = format_search_results(&results);

        assert!(block.starts_with(
            "\n\nCURRENT WEB INFORMATION:\n1. CeraVe Serum\n   URL: https://cerave.com/serum\n   Info: Now $19.99"
        ));
        assert!(block.contains("\n\n2. Review\n"));
        assert!(block.contains("Always cite sources"));
    }
}
