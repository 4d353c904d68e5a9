// Pokédex Favorites - Core Library
// Exposes all modules for use in the TUI, the web server, and tests

pub mod entity;
pub mod error;
pub mod catalog;   // Remote catalog fetch (index + parallel details)
pub mod db;        // Local persistence of the favorites snapshot
pub mod partition; // Collection/favorites split
pub mod view;      // Pure view model
pub mod app;       // Session state + action dispatcher
pub mod config;

// Re-export commonly used types
pub use entity::{Entity, EntityId};
pub use error::CatalogError;
pub use catalog::{CatalogClient, EntityRef, DEFAULT_API_URL, DEFAULT_LIMIT};
pub use db::{FavoritesStore, FAVORITES_KEY, setup_database};
pub use partition::{Partition, Side};
pub use view::{render, sort_by_name, Card, CardAction, SortDirection, ViewModel};
pub use app::{Action, App};
pub use config::{init_logging, Config};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
