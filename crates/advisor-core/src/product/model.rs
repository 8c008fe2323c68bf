//! Product domain models.

use serde::{Deserialize, Serialize};

/// Identifier of a product, unique within one catalog load.
pub type ProductId = i64;

/// An immutable catalog entry.
///
/// Identity is `id`; every other field is descriptive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    /// Image URI
    pub image: String,
}

impl Product {
    /// Short label used in prompts and listings: `"{name} by {brand}"`.
    pub fn label(&self) -> String {
        format!("{} by {}", self.name, self.brand)
    }

    /// Case-insensitive substring match against name, brand or category.
    ///
    /// `needle_lower` must already be lowercased.
    pub(crate) fn mentions(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
            || self.brand.to_lowercase().contains(needle_lower)
            || self.category.to_lowercase().contains(needle_lower)
    }
}

/// Category + free-text filter applied to the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// `None` or `"all"` means no category restriction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Search term, matched against name, brand, description and category.
    #[serde(default)]
    pub term: String,
}

impl CatalogFilter {
    pub fn new(category: Option<String>, term: impl Into<String>) -> Self {
        Self {
            category,
            term: term.into(),
        }
    }

    /// The active category restriction, if any.
    pub fn active_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != "all")
    }

    /// The normalized search term (lowercased, trimmed), if any.
    pub fn normalized_term(&self) -> Option<String> {
        let term = self.term.trim().to_lowercase();
        (!term.is_empty()).then_some(term)
    }

    pub fn is_empty(&self) -> bool {
        self.active_category().is_none() && self.normalized_term().is_none()
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.active_category()
            && product.category != category
        {
            return false;
        }

        match self.normalized_term() {
            Some(term) => {
                product.name.to_lowercase().contains(&term)
                    || product.brand.to_lowercase().contains(&term)
                    || product.description.to_lowercase().contains(&term)
                    || product.category.to_lowercase().contains(&term)
            }
            None => true,
        }
    }

    /// `Showing X of Y products ...` for an active filter, `None` otherwise.
    pub fn describe(&self, shown: usize, total: usize) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let mut summary = format!("Showing {shown} of {total} products");
        if let Some(term) = self.normalized_term() {
            summary.push_str(&format!(" for \"{term}\""));
        }
        if let Some(category) = self.active_category() {
            summary.push_str(&format!(" in {category}"));
        }
        Some(summary)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Product;

    pub fn product(id: i64, name: &str, brand: &str, category: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            brand: brand.to_string(),
            category: category.to_string(),
            description: format!("{name} from {brand}"),
            image: format!("https://example.com/{id}.png"),
        }
    }

    pub fn sample_catalog() -> Vec<Product> {
        vec![
            product(1, "Hydrating Facial Cleanser", "CeraVe", "cleanser"),
            product(2, "Daily Moisturizing Lotion", "CeraVe", "moisturizer"),
            product(3, "Lash Sensational Mascara", "Maybelline", "makeup"),
            product(4, "Micellar Cleansing Water", "Garnier", "cleanser"),
            product(5, "Revitalift Hyaluronic Acid Serum", "L'Oréal Paris", "skincare"),
            product(6, "Fit Me Foundation", "Maybelline", "makeup"),
            product(7, "Elvive Shampoo", "L'Oréal Paris", "haircare"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::product;
    use super::*;

    #[test]
    fn product_round_trips_with_expected_field_names() {
        let json = r#"{"id":3,"name":"Serum","brand":"CeraVe","category":"skincare","description":"d","image":"img.png"}"#;
        let parsed: Product = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.id, 3);
        assert_eq!(parsed.label(), "Serum by CeraVe");
    }

    #[test]
    fn filter_all_category_is_unrestricted() {
        let filter = CatalogFilter::new(Some("all".into()), "  ");
        assert!(filter.is_empty());
        assert!(filter.matches(&product(1, "A", "B", "makeup")));
    }

    #[test]
    fn filter_composes_category_and_term() {
        let filter = CatalogFilter::new(Some("cleanser".into()), "CERAVE");
        assert!(filter.matches(&product(1, "Foaming Cleanser", "CeraVe", "cleanser")));
        assert!(!filter.matches(&product(2, "Micellar Water", "Garnier", "cleanser")));
        assert!(!filter.matches(&product(3, "Lotion", "CeraVe", "moisturizer")));
    }

    #[test]
    fn summary_only_for_active_filters() {
        assert_eq!(CatalogFilter::default().describe(5, 5), None);
        assert_eq!(
            CatalogFilter::new(Some("makeup".into()), " Mascara ").describe(1, 9),
            Some("Showing 1 of 9 products for \"mascara\" in makeup".to_string())
        );
        assert_eq!(
            CatalogFilter::new(Some("all".into()), "serum").describe(2, 9),
            Some("Showing 2 of 9 products for \"serum\"".to_string())
        );
    }

    #[test]
    fn filter_term_matches_description() {
        let mut p = product(1, "Lotion", "CeraVe", "moisturizer");
        p.description = "Contains ceramides and niacinamide".into();
        assert!(CatalogFilter::new(None, "niacinamide").matches(&p));
    }
}
