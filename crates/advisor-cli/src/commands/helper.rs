//! rustyline helper: slash-command completion, highlighting and hints.
//!
//! While a `/products ...` line is being typed, a debounced job counts the
//! matching products. The count is a best-effort hint: rustyline only asks
//! for hints on edits and cursor moves, so it appears once typing pauses
//! longer than the debounce and the line is redrawn for the same input.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::{Arc, Mutex, RwLock};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use advisor_application::Debouncer;
use advisor_core::product::{CatalogFilter, ProductCatalog};

pub const COMMANDS: &[&str] = &[
    "/products", "/select", "/selected", "/clear", "/routine", "/reload", "/theme", "/help",
];

/// Live filter preview: the input line it was computed for, and the hint.
type Preview = Arc<Mutex<Option<(String, String)>>>;

pub struct CliHelper {
    catalog: Arc<RwLock<ProductCatalog>>,
    debouncer: Debouncer,
    preview: Preview,
}

impl CliHelper {
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(RwLock::new(ProductCatalog::default())),
            debouncer: Debouncer::default(),
            preview: Arc::new(Mutex::new(None)),
        }
    }

    /// Replaces the catalog used for previews and category completion.
    pub fn set_catalog(&self, catalog: ProductCatalog) {
        *self
            .catalog
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = catalog;
    }

    fn categories(&self) -> Vec<String> {
        self.catalog
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .categories()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn schedule_preview(&self, line: &str) {
        let catalog = self.catalog.clone();
        let preview = self.preview.clone();
        let line = line.to_string();

        self.debouncer.schedule(async move {
            let hint = {
                let catalog = catalog.read().unwrap_or_else(|poisoned| poisoned.into_inner());
                let categories: Vec<&str> = catalog.categories();
                let filter = parse_products_args(line.trim_start_matches("/products"), &categories);
                format!("  ({} matches)", catalog.filter(&filter).len())
            };
            *preview.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some((line, hint));
        });
    }

    /// The finished preview for exactly `line`, if the debounced job has run.
    fn cached_preview(&self, line: &str) -> Option<String> {
        self.preview
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .filter(|(for_line, _)| for_line == line)
            .map(|(_, hint)| hint.clone())
    }
}

/// Parses `/products [category] [term]` arguments.
///
/// The first word is a category when it names one (or is "all"); every
/// remaining word is the search term.
pub fn parse_products_args(args: &str, categories: &[&str]) -> CatalogFilter {
    let args = args.trim();
    let (first, rest) = args.split_once(char::is_whitespace).unwrap_or((args, ""));

    let is_category = first.eq_ignore_ascii_case("all")
        || categories.iter().any(|c| c.eq_ignore_ascii_case(first));
    if is_category && !first.is_empty() {
        let category = categories
            .iter()
            .find(|c| c.eq_ignore_ascii_case(first))
            .map_or_else(|| "all".to_string(), |c| c.to_string());
        CatalogFilter::new(Some(category), rest.trim())
    } else {
        CatalogFilter::new(None, args)
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if let Some(partial) = line.strip_prefix("/products ")
            && !partial.contains(' ')
        {
            let start = pos - partial.len();
            let candidates = self
                .categories()
                .into_iter()
                .filter(|c| c.starts_with(partial))
                .map(|c| Pair {
                    display: c.clone(),
                    replacement: c,
                })
                .collect();
            return Ok((start, candidates));
        }

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = COMMANDS
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.to_string(),
                    replacement: cmd.to_string(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with("/products ") {
            self.schedule_preview(line);
            return self.cached_preview(line);
        }

        if line.starts_with('/') && !line.contains(' ') {
            COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_application::FILTER_DEBOUNCE;
    use advisor_core::product::Product;

    const CATEGORIES: &[&str] = &["cleanser", "makeup", "skincare"];

    #[test]
    fn first_word_is_category_when_known() {
        let filter = parse_products_args(" Makeup  lash mascara", CATEGORIES);
        assert_eq!(filter.category.as_deref(), Some("makeup"));
        assert_eq!(filter.term, "lash mascara");
    }

    #[test]
    fn unknown_first_word_is_part_of_the_term() {
        let filter = parse_products_args("cerave lotion", CATEGORIES);
        assert_eq!(filter.category, None);
        assert_eq!(filter.term, "cerave lotion");
    }

    #[test]
    fn all_clears_the_category() {
        let filter = parse_products_args("all serum", CATEGORIES);
        assert_eq!(filter.active_category(), None);
        assert_eq!(filter.term, "serum");
        assert!(parse_products_args("", CATEGORIES).is_empty());
    }

    fn product(id: i64, name: &str, category: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            brand: "CeraVe".to_string(),
            category: category.to_string(),
            description: String::new(),
            image: String::new(),
        }
    }

    async fn settle() {
        tokio::time::sleep(FILTER_DEBOUNCE * 2).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn preview_is_ready_after_the_debounce_for_the_same_line() {
        let helper = CliHelper::new();
        helper.set_catalog(ProductCatalog::new(vec![
            product(1, "Hydrating Facial Cleanser", "cleanser"),
            product(2, "Daily Moisturizing Lotion", "moisturizer"),
            product(3, "Foaming Facial Cleanser", "cleanser"),
        ]));

        helper.schedule_preview("/products cleanser");
        assert_eq!(helper.cached_preview("/products cleanser"), None);
        settle().await;

        assert_eq!(
            helper.cached_preview("/products cleanser"),
            Some("  (2 matches)".to_string())
        );
        assert_eq!(helper.cached_preview("/products cleanser c"), None);
    }
}
