// Cookbook - Core Library
// Recipe registry plus recipe expansion, shared by the CLI, the API server and tests

pub mod entry;
pub mod registry;
pub mod summary;
pub mod naming;
pub mod seed;
pub mod config;
pub mod logging;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use entry::{Entry, EntryKind, Ingredient, Recipe, RequiredItem};
pub use registry::{AddError, EntryInfo, Registry, Snapshot};
pub use summary::{summarize, IngredientQuantity, Summary, SummaryError};
pub use naming::{normalize_name, NameError};
pub use seed::load_seed;
pub use config::ServerConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
