//! Terminal rendering of products and conversation turns.

use colored::{ColoredString, Colorize};

use advisor_core::product::Product;
use advisor_core::theme::Theme;

/// Accent used for assistant text and headings.
pub fn accent(text: &str, theme: Theme) -> ColoredString {
    match theme {
        Theme::Light => text.blue(),
        Theme::Dark => text.bright_cyan(),
    }
}

pub fn product_line(product: &Product, selected: bool) -> String {
    let marker = if selected { "[x]" } else { "[ ]" };
    format!(
        "{} {:>3}  {}  {}",
        marker,
        product.id,
        product.name.bold(),
        format!("{} · {}", product.brand, product.category).bright_black()
    )
}

/// Prints a product listing, marking members of the selection.
pub fn print_products<F>(products: &[Product], summary: Option<&str>, is_selected: F)
where
    F: Fn(&Product) -> bool,
{
    if let Some(summary) = summary {
        println!("{}", summary.bright_black());
    }
    if products.is_empty() {
        println!("{}", "No products found.".yellow());
        return;
    }
    for product in products {
        println!("{}", product_line(product, is_selected(product)));
    }
}

pub fn print_selection(products: &[Product]) {
    if products.is_empty() {
        println!("{}", "No products selected yet.".bright_black());
        return;
    }
    println!("{}", format!("Selected products ({}):", products.len()).bold());
    for product in products {
        println!("{}", product_line(product, true));
    }
}

pub fn print_assistant(text: &str, theme: Theme) {
    for line in text.lines() {
        println!("{}", accent(line, theme));
    }
}

/// Shows products the reply mentioned.
pub fn print_recommendations(products: &[Product]) {
    if products.is_empty() {
        return;
    }
    println!("{}", "Recommended from the catalog:".bright_magenta());
    for product in products {
        println!(
            "  {} {}  {}",
            format!("#{}", product.id).bright_black(),
            product.name,
            product.brand.bright_black()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_line_marks_selection() {
        colored::control::set_override(false);
        let product = Product {
            id: 7,
            name: "Elvive Shampoo".into(),
            brand: "L'Oréal Paris".into(),
            category: "haircare".into(),
            description: String::new(),
            image: String::new(),
        };

        assert_eq!(
            product_line(&product, true),
            "[x]   7  Elvive Shampoo  L'Oréal Paris · haircare"
        );
        assert!(product_line(&product, false).starts_with("[ ]"));
    }
}
