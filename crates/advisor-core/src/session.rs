//! Session state.
//!
//! The selection and the conversation live for the whole session and are
//! owned by one explicit object rather than ambient globals.

use std::sync::Arc;

use crate::conversation::{ContextSuffix, ConversationContext};
use crate::selection::SelectionStore;
use crate::storage::KeyValueStore;

/// Everything the advisor mutates during a session.
pub struct SessionState {
    selection: SelectionStore,
    conversation: ConversationContext,
}

impl SessionState {
    /// Starts with an empty selection and no history.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            selection: SelectionStore::new(storage),
            conversation: ConversationContext::new(),
        }
    }

    /// Starts with the selection restored from storage and no history.
    pub fn restore(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            selection: SelectionStore::restored(storage),
            conversation: ConversationContext::new(),
        }
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionStore {
        &mut self.selection
    }

    pub fn conversation(&self) -> &ConversationContext {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut ConversationContext {
        &mut self.conversation
    }

    /// Context suffix for the next outbound request.
    pub fn context_suffix(&self) -> ContextSuffix {
        self.conversation
            .build_context_suffix(self.selection.products())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::model::fixtures::product;
    use crate::storage::{InMemoryKeyValueStore, SELECTED_PRODUCTS_KEY};

    #[test]
    fn restore_picks_up_persisted_selection() {
        let raw = serde_json::to_string(&vec![product(4, "Water", "Garnier", "cleanser")]).unwrap();
        let storage = Arc::new(InMemoryKeyValueStore::with_entry(SELECTED_PRODUCTS_KEY, raw));

        let state = SessionState::restore(storage.clone());
        let fresh = SessionState::new(storage);

        assert_eq!(state.selection().len(), 1);
        assert!(fresh.selection().is_empty());
        assert!(state.conversation().is_empty());
    }

    #[test]
    fn context_suffix_tracks_selection() {
        let mut state = SessionState::new(Arc::new(InMemoryKeyValueStore::new()));
        state
            .selection_mut()
            .toggle(&product(4, "Micellar Water", "Garnier", "cleanser"));

        let suffix = state.context_suffix();

        assert!(suffix.selection.contains("Micellar Water by Garnier"));
    }
}
