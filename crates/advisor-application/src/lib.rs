//! Application layer: the advisor use case and its wiring.

pub mod advisor_usecase;
pub mod bootstrap;
pub mod debounce;

pub use advisor_usecase::{
    AdvisorUseCase, CatalogReload, ChatReply, FilteredProducts, RoutineOutcome, SelectionChange,
};
pub use bootstrap::{Overrides, build_usecase, open_storage};
pub use debounce::{Debouncer, FILTER_DEBOUNCE};
