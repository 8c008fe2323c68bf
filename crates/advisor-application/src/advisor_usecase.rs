//! Advisor use case implementation.
//!
//! `AdvisorUseCase` drives the control flow of one advisor session: catalog
//! (re)loads and reconciliation, selection changes, chat turns with optional
//! web augmentation, and routine generation.

use std::sync::Arc;

use advisor_core::chat::{ChatCompletionService, ChatRequest};
use advisor_core::config::ChatConfig;
use advisor_core::conversation::Turn;
use advisor_core::error::{AdvisorError, Result};
use advisor_core::product::{CatalogFilter, CatalogSource, Product, ProductCatalog, ProductId};
use advisor_core::recommendation;
use advisor_core::search::{self, WebSearchService};
use advisor_core::selection::SelectionObserver;
use advisor_core::session::SessionState;
use advisor_core::storage::KeyValueStore;
use advisor_core::theme::{Theme, ThemeStore};
use advisor_interaction::prompts;
use tokio::sync::{Mutex, RwLock};

/// Assistant reply to a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    /// Catalog products mentioned by the reply, to render inline.
    pub recommendations: Vec<Product>,
    /// Whether live web results were injected into the request.
    pub used_web_search: bool,
}

/// Result of a routine generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineOutcome {
    /// Nothing is selected; no request was made.
    NoSelection,
    Generated(String),
}

/// Result of toggling a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub product: Product,
    /// Membership after the toggle.
    pub selected: bool,
}

/// Outcome of a catalog load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogReload {
    pub products: usize,
    /// Selected products dropped because they left the catalog.
    pub pruned: usize,
}

/// Filtered view of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredProducts {
    pub products: Vec<Product>,
    pub total: usize,
    /// `Showing X of Y products ...`, present only when a filter is active.
    pub summary: Option<String>,
}

/// Use case coordinating the session state with the catalog and remote services.
///
/// # Concurrency
///
/// The session state sits behind a single async mutex that is held only for
/// snapshots and mutations, never across a network call. Callers should keep
/// at most one chat request outstanding at a time.
pub struct AdvisorUseCase {
    state: Mutex<SessionState>,
    catalog: RwLock<ProductCatalog>,
    catalog_source: Arc<dyn CatalogSource>,
    chat_service: Arc<dyn ChatCompletionService>,
    search_service: Option<Arc<dyn WebSearchService>>,
    theme_store: ThemeStore,
    chat_config: ChatConfig,
}

impl AdvisorUseCase {
    /// Creates a use case with an empty selection and no search service.
    ///
    /// Call [`initialize`](Self::initialize) before use.
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        catalog_source: Arc<dyn CatalogSource>,
        chat_service: Arc<dyn ChatCompletionService>,
    ) -> Self {
        Self {
            state: Mutex::new(SessionState::new(storage.clone())),
            catalog: RwLock::new(ProductCatalog::default()),
            catalog_source,
            chat_service,
            search_service: None,
            theme_store: ThemeStore::new(storage),
            chat_config: ChatConfig::default(),
        }
    }

    /// Enables web-search augmentation.
    pub fn with_search_service(mut self, search_service: Arc<dyn WebSearchService>) -> Self {
        self.search_service = Some(search_service);
        self
    }

    /// Overrides token budgets and temperature.
    pub fn with_chat_config(mut self, chat_config: ChatConfig) -> Self {
        self.chat_config = chat_config;
        self
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Restores the persisted selection, loads the catalog, reconciles the two
    /// and greets the user.
    ///
    /// Fails with `CatalogUnavailable` if the catalog cannot be loaded; the
    /// restored selection is kept in that case.
    pub async fn initialize(&self) -> Result<CatalogReload> {
        self.state.lock().await.selection_mut().restore();

        let reload = self.reload_catalog().await?;

        let mut state = self.state.lock().await;
        if state.conversation().is_empty() {
            state
                .conversation_mut()
                .append_assistant_turn(prompts::WELCOME_MESSAGE);
        }

        tracing::info!(
            "[Advisor] Initialized with {} products, {} selected",
            reload.products,
            state.selection().len()
        );
        Ok(reload)
    }

    /// Loads the catalog, replaces the cached copy and reconciles the selection.
    pub async fn reload_catalog(&self) -> Result<CatalogReload> {
        let products = self.catalog_source.load().await.map_err(|e| {
            tracing::error!("[Advisor] Catalog load failed: {}", e);
            match e {
                AdvisorError::CatalogUnavailable(_) => e,
                other => AdvisorError::catalog_unavailable(other.to_string()),
            }
        })?;

        let catalog = ProductCatalog::new(products);
        let pruned = self.state.lock().await.selection_mut().reconcile(&catalog);
        let reload = CatalogReload {
            products: catalog.len(),
            pruned,
        };
        *self.catalog.write().await = catalog;

        Ok(reload)
    }

    // ============================================================================
    // Catalog
    // ============================================================================

    /// Snapshot of the current catalog.
    pub async fn catalog(&self) -> ProductCatalog {
        self.catalog.read().await.clone()
    }

    pub async fn categories(&self) -> Vec<String> {
        self.catalog
            .read()
            .await
            .categories()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Applies a category/search filter to the current catalog.
    pub async fn filter_products(&self, filter: &CatalogFilter) -> FilteredProducts {
        let catalog = self.catalog.read().await;
        let products: Vec<Product> = catalog.filter(filter).into_iter().cloned().collect();
        let total = catalog.len();
        let summary = filter.describe(products.len(), total);

        FilteredProducts {
            products,
            total,
            summary,
        }
    }

    // ============================================================================
    // Selection
    // ============================================================================

    /// Toggles the product with `id`.
    ///
    /// The id is looked up in the catalog first and then in the selection, so
    /// products that are selected but no longer listed can still be removed.
    pub async fn toggle_product(&self, id: ProductId) -> Result<SelectionChange> {
        let from_catalog = self.catalog.read().await.find(id).cloned();

        let mut state = self.state.lock().await;
        let product = match from_catalog {
            Some(product) => product,
            None => state
                .selection()
                .find(id)
                .cloned()
                .ok_or_else(|| AdvisorError::not_found("product", id.to_string()))?,
        };

        let selected = state.selection_mut().toggle(&product);
        Ok(SelectionChange { product, selected })
    }

    /// Empties the selection. Confirmation is the caller's responsibility.
    pub async fn clear_selection(&self) {
        self.state.lock().await.selection_mut().clear();
    }

    pub async fn selected_products(&self) -> Vec<Product> {
        self.state.lock().await.selection().products().to_vec()
    }

    pub async fn is_selected(&self, id: ProductId) -> bool {
        self.state.lock().await.selection().contains(id)
    }

    /// Registers a listener for selection changes.
    pub async fn subscribe_selection(&self, observer: SelectionObserver) {
        self.state.lock().await.selection_mut().subscribe(observer);
    }

    // ============================================================================
    // Conversation
    // ============================================================================

    /// Sends a user message and records the exchange.
    ///
    /// Search failures degrade to an unaugmented request. A chat failure is
    /// returned as `RemoteService` and leaves the history untouched.
    pub async fn submit_message(&self, text: &str) -> Result<ChatReply> {
        let message = text.trim();
        if message.is_empty() {
            return Err(AdvisorError::invalid_input("message is empty"));
        }

        let web_results = if search::should_search(message) {
            self.web_context(message).await
        } else {
            String::new()
        };
        let used_web_search = !web_results.is_empty();

        let (suffix, history) = {
            let state = self.state.lock().await;
            (state.context_suffix(), state.conversation().history().to_vec())
        };

        let system = prompts::render_chat_system_prompt(&suffix.to_string(), &web_results)?;
        let request = ChatRequest {
            system,
            history,
            user_message: message.to_string(),
            max_tokens: self.chat_config.max_tokens,
            temperature: self.chat_config.temperature,
        };

        let reply = self.chat_service.complete(request).await.map_err(|e| {
            tracing::error!("[Advisor] Chat request failed: {}", e);
            e
        })?;

        {
            let mut state = self.state.lock().await;
            let conversation = state.conversation_mut();
            conversation.append_user_turn(message);
            conversation.append_assistant_turn(reply.clone());
        }

        let recommendations = recommendation::extract(&reply, &*self.catalog.read().await);

        Ok(ChatReply {
            text: reply,
            recommendations,
            used_web_search,
        })
    }

    /// Generates a routine for the current selection.
    ///
    /// With nothing selected no request is made.
    pub async fn generate_routine(&self) -> Result<RoutineOutcome> {
        let selection = self.selected_products().await;
        if selection.is_empty() {
            return Ok(RoutineOutcome::NoSelection);
        }

        let prompt = prompts::render_routine_prompt(&selection)?;
        let request = ChatRequest {
            system: prompts::ROUTINE_SYSTEM_PROMPT.to_string(),
            history: Vec::new(),
            user_message: prompt,
            max_tokens: self.chat_config.routine_max_tokens,
            temperature: self.chat_config.temperature,
        };

        let routine = self.chat_service.complete(request).await.map_err(|e| {
            tracing::error!("[Advisor] Routine generation failed: {}", e);
            e
        })?;

        self.state
            .lock()
            .await
            .conversation_mut()
            .set_generated_routine(routine.clone());

        tracing::info!("[Advisor] Generated routine for {} products", selection.len());
        Ok(RoutineOutcome::Generated(routine))
    }

    pub async fn history(&self) -> Vec<Turn> {
        self.state.lock().await.conversation().history().to_vec()
    }

    pub async fn generated_routine(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .conversation()
            .generated_routine()
            .map(str::to_string)
    }

    // ============================================================================
    // Theme
    // ============================================================================

    pub fn theme(&self) -> Theme {
        self.theme_store.load()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.theme_store.save(theme);
    }

    pub fn toggle_theme(&self) -> Theme {
        self.theme_store.toggle()
    }

    /// Fetches and formats web results; any failure yields no augmentation.
    async fn web_context(&self, message: &str) -> String {
        let Some(search_service) = &self.search_service else {
            tracing::debug!("[Advisor] Web search requested but no search service configured");
            return String::new();
        };

        let query = search::brand_scoped_query(message);
        match search_service.search(&query).await {
            Ok(results) => search::format_search_results(&results),
            Err(e) => {
                tracing::warn!("[Advisor] Web search failed, continuing without it: {}", e);
                String::new()
            }
        }
    }
}
