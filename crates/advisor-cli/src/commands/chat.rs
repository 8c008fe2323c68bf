//! `advisor chat`: the interactive advisor REPL.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use advisor_application::{AdvisorUseCase, Overrides, RoutineOutcome, build_usecase};
use advisor_core::config::AdvisorConfig;
use advisor_core::conversation::TurnRole;
use advisor_core::product::ProductId;
use advisor_core::search;
use advisor_core::theme::Theme;
use advisor_infrastructure::{AdvisorPaths, ApiCredentials};

use super::helper::{self, CliHelper};
use super::render;

const CHAT_FALLBACK: &str =
    "I'm sorry, I'm having trouble connecting right now. Please try again in a moment!";
const ROUTINE_FALLBACK: &str =
    "I'm sorry, I had trouble creating your routine. Please try again in a moment!";
const NO_SELECTION: &str = "Please select some products first before generating a routine!";

const HELP: &str = "\
/products [category] [term]  List products (category \"all\" for every category)
/select <id>                 Add or remove a product from your selection
/selected                    Show your selection
/clear                       Remove every selected product
/routine                     Generate a routine for your selection
/reload                      Reload the product catalog
/theme [light|dark]          Toggle or set the color theme
quit | exit                  Leave the advisor
Anything else is sent to the advisor.";

enum Flow {
    Continue,
    Quit,
}

struct Repl {
    usecase: AdvisorUseCase,
    editor: Editor<CliHelper, DefaultHistory>,
}

pub async fn run(
    config: &AdvisorConfig,
    credentials: &ApiCredentials,
    catalog_path: Option<PathBuf>,
) -> Result<()> {
    let usecase = build_usecase(config, credentials, &Overrides { catalog_path })?;

    let mut editor = Editor::new()?;
    editor.set_helper(Some(CliHelper::new()));
    let history_path = AdvisorPaths::history_file().ok();
    if let Some(path) = &history_path
        && let Err(e) = editor.load_history(path)
    {
        tracing::debug!("[Repl] No line history loaded: {}", e);
    }

    let mut repl = Repl { usecase, editor };
    repl.start().await;
    repl.event_loop().await;

    if let Some(path) = &history_path {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if let Err(e) = repl.editor.save_history(path) {
            tracing::warn!("[Repl] Failed to save line history: {}", e);
        }
    }

    Ok(())
}

impl Repl {
    fn theme(&self) -> Theme {
        self.usecase.theme()
    }

    async fn start(&mut self) {
        println!("{}", "=== Beauty Advisor ===".bright_magenta().bold());
        println!(
            "{}",
            "Type /help for commands, or ask anything about skincare, makeup and hair care."
                .bright_black()
        );
        println!();

        match self.usecase.initialize().await {
            Ok(reload) => {
                self.sync_catalog().await;
                if reload.pruned > 0 {
                    println!(
                        "{}",
                        format!(
                            "{} selected products are no longer available and were removed.",
                            reload.pruned
                        )
                        .yellow()
                    );
                }
            }
            Err(e) => {
                println!(
                    "{}",
                    format!("Unable to load products: {e}. Use /reload to try again.").red()
                );
            }
        }

        let theme = self.theme();
        for turn in self.usecase.history().await {
            if turn.role == TurnRole::Assistant {
                render::print_assistant(&turn.content, theme);
            }
        }
        println!();
    }

    async fn event_loop(&mut self) {
        loop {
            match self.editor.readline("you> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if let Err(e) = self.editor.add_history_entry(trimmed) {
                        tracing::debug!("[Repl] History entry rejected: {}", e);
                    }

                    if let Flow::Quit = self.dispatch(trimmed).await {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "CTRL-D detected. Exiting...".bright_green());
                    break;
                }
                Err(err) => {
                    eprintln!("{}", format!("Error: {err:?}").red());
                    break;
                }
            }
        }
    }

    async fn dispatch(&mut self, input: &str) -> Flow {
        let (command, args) = input.split_once(' ').unwrap_or((input, ""));
        let args = args.trim();

        match command {
            "quit" | "exit" => return Flow::Quit,
            "/help" => println!("{}", HELP.bright_black()),
            "/products" => self.list_products(args).await,
            "/select" => self.toggle(args).await,
            "/selected" => render::print_selection(&self.usecase.selected_products().await),
            "/clear" => self.clear().await,
            "/routine" => self.routine().await,
            "/reload" => self.reload().await,
            "/theme" => self.switch_theme(args),
            _ if command.starts_with('/') => {
                println!("{}", format!("Unknown command {command}. Type /help.").yellow());
            }
            _ => self.chat(input).await,
        }

        Flow::Continue
    }

    async fn list_products(&self, args: &str) {
        let categories = self.usecase.categories().await;
        let categories: Vec<&str> = categories.iter().map(String::as_str).collect();
        let filter = helper::parse_products_args(args, &categories);

        let view = self.usecase.filter_products(&filter).await;
        let selected = self.usecase.selected_products().await;
        render::print_products(&view.products, view.summary.as_deref(), |p| {
            selected.iter().any(|s| s.id == p.id)
        });
        if filter.is_empty() {
            println!(
                "{}",
                format!("Categories: {}", categories.join(", ")).bright_black()
            );
        }
    }

    async fn toggle(&self, args: &str) {
        let Ok(id) = args.parse::<ProductId>() else {
            println!("{}", "Usage: /select <product id>".yellow());
            return;
        };

        match self.usecase.toggle_product(id).await {
            Ok(change) if change.selected => {
                println!("{}", format!("Added {}", change.product.label()).green());
            }
            Ok(change) => {
                println!("{}", format!("Removed {}", change.product.label()).yellow());
            }
            Err(e) => println!("{}", e.to_string().red()),
        }
    }

    async fn clear(&mut self) {
        if self.usecase.selected_products().await.is_empty() {
            println!("{}", "No products selected yet.".bright_black());
            return;
        }

        let confirmed = match self
            .editor
            .readline("Are you sure you want to clear all selected products? (y/N) ")
        {
            Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        };

        if confirmed {
            self.usecase.clear_selection().await;
            println!("{}", "Selection cleared.".green());
        }
    }

    async fn routine(&self) {
        println!("{}", "Creating your personalized routine...".bright_black());

        let theme = self.theme();
        match self.usecase.generate_routine().await {
            Ok(RoutineOutcome::Generated(routine)) => {
                println!("{}", "Your Personalized Routine".bold());
                render::print_assistant(&routine, theme);
            }
            Ok(RoutineOutcome::NoSelection) => render::print_assistant(NO_SELECTION, theme),
            Err(_) => render::print_assistant(ROUTINE_FALLBACK, theme),
        }
        println!();
    }

    async fn reload(&self) {
        match self.usecase.reload_catalog().await {
            Ok(reload) => {
                self.sync_catalog().await;
                println!("{}", format!("Loaded {} products.", reload.products).green());
                if reload.pruned > 0 {
                    println!(
                        "{}",
                        format!(
                            "Removed {} unavailable products from your selection.",
                            reload.pruned
                        )
                        .yellow()
                    );
                }
            }
            Err(e) => println!("{}", format!("Unable to load products: {e}").red()),
        }
    }

    fn switch_theme(&self, args: &str) {
        let theme = if args.is_empty() {
            self.usecase.toggle_theme()
        } else {
            match args.parse::<Theme>() {
                Ok(theme) => {
                    self.usecase.set_theme(theme);
                    theme
                }
                Err(e) => {
                    println!("{}", e.to_string().red());
                    return;
                }
            }
        };
        println!("{}", render::accent(&format!("Theme: {theme}"), theme));
    }

    async fn chat(&self, message: &str) {
        let status = if search::should_search(message) {
            "Searching for current information..."
        } else {
            "Thinking..."
        };
        println!("{}", status.bright_black());

        let theme = self.theme();
        match self.usecase.submit_message(message).await {
            Ok(reply) => {
                render::print_assistant(&reply.text, theme);
                render::print_recommendations(&reply.recommendations);
                if reply.used_web_search {
                    println!("{}", "Includes current web information".bright_black());
                }
            }
            Err(_) => render::print_assistant(CHAT_FALLBACK, theme),
        }
        println!();
    }

    async fn sync_catalog(&self) {
        if let Some(helper) = self.editor.helper() {
            helper.set_catalog(self.usecase.catalog().await);
        }
    }
}
