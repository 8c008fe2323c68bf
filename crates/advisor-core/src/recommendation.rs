//! Maps free-form assistant text back to catalog products.
//!
//! This is keyword text-mining, not parsing: any brand, category or product
//! type mentioned in the reply pulls in every catalog product that mentions
//! the same word.

use std::collections::HashSet;

use crate::product::{Product, ProductCatalog};

/// Maximum number of products surfaced for one reply.
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Brand, category and product-type keywords, scanned in this order.
pub const RECOMMENDATION_KEYWORDS: &[&str] = &[
    "CeraVe",
    "Maybelline",
    "Garnier",
    "L'Oréal",
    "Loreal",
    "cleanser",
    "moisturizer",
    "serum",
    "sunscreen",
    "foundation",
    "mascara",
    "lipstick",
    "shampoo",
    "conditioner",
    "cream",
];

/// Products referenced by `response`, at most [`MAX_RECOMMENDATIONS`], unique by id.
pub fn extract(response: &str, catalog: &ProductCatalog) -> Vec<Product> {
    let response = response.to_lowercase();
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for keyword in RECOMMENDATION_KEYWORDS {
        let keyword = keyword.to_lowercase();
        if !response.contains(&keyword) {
            continue;
        }

        for product in catalog.products().iter().filter(|p| p.mentions(&keyword)) {
            if seen.insert(product.id) {
                found.push(product.clone());
                if found.len() == MAX_RECOMMENDATIONS {
                    return found;
                }
            }
        }
    }

    found
}
