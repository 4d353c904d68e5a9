// App - explicit state container for one browsing session
//
// Owns the partition, the sort direction and the favorites store. All
// mutation goes through `dispatch`, which persists favorites when they
// change and hands back a fresh view model.

use crate::db::FavoritesStore;
use crate::entity::{Entity, EntityId};
use crate::error::CatalogError;
use crate::partition::{Partition, Side};
use crate::view::{self, SortDirection, ViewModel};
use anyhow::Result;
use tracing::{debug, error, info};

/// User intents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move an entity to the other side of the partition
    ToggleFavorite(EntityId),
    ToggleSort,
    Reset,
}

pub struct App {
    store: FavoritesStore,
    partition: Partition,
    sort_direction: SortDirection,
    /// Last failed catalog fetch; only a successful fetch clears it
    fetch_error: Option<String>,
    /// Last failed snapshot write; cleared by the next successful write
    persist_error: Option<String>,
}

impl App {
    /// Empty session; nothing is shown until a catalog is loaded
    pub fn new(store: FavoritesStore) -> Self {
        Self {
            store,
            partition: Partition::default(),
            sort_direction: SortDirection::default(),
            fetch_error: None,
            persist_error: None,
        }
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn store(&self) -> &FavoritesStore {
        &self.store
    }

    /// Failure to show the user, fetch errors first
    pub fn last_error(&self) -> Option<&str> {
        self.fetch_error
            .as_deref()
            .or(self.persist_error.as_deref())
    }

    /// Set while the catalog could not be fetched; retry is offered
    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    /// Seed the partition from a freshly fetched catalog and the snapshot
    pub fn load_catalog(&mut self, catalog: Vec<Entity>) -> Result<()> {
        let persisted = self.store.load_favorites()?;
        self.partition = Partition::initialize(catalog, &persisted);
        self.fetch_error = None;

        // Only used for the log line, so an unreadable timestamp is not fatal
        let saved_at = self.store.favorites_updated_at().unwrap_or_default();
        info!(
            catalog = self.partition.catalog().len(),
            favorites = self.partition.favorites_count(),
            dropped = self.partition.unknown_ids(&persisted).len(),
            saved_at = ?saved_at,
            "partition initialized"
        );
        Ok(())
    }

    /// Take the outcome of a catalog fetch
    ///
    /// A failed fetch leaves the current state alone (empty on first load).
    pub fn apply_fetch(&mut self, result: Result<Vec<Entity>, CatalogError>) {
        let outcome = match result {
            Ok(catalog) => self.load_catalog(catalog),
            Err(e) => Err(e.into()),
        };

        if let Err(e) = outcome {
            error!(error = %e, "failed to load catalog");
            self.fetch_error = Some(format!("Failed to load catalog: {}", e));
        }
    }

    /// Apply one user action and return the re-rendered view
    pub fn dispatch(&mut self, action: Action) -> ViewModel {
        debug!(?action, "dispatch");

        match action {
            Action::ToggleFavorite(id) => self.toggle_favorite(id),
            Action::ToggleSort => self.sort_direction = self.sort_direction.toggled(),
            Action::Reset => self.reset(),
        }

        self.view()
    }

    pub fn view(&self) -> ViewModel {
        view::render(&self.partition, self.sort_direction)
    }

    fn toggle_favorite(&mut self, id: EntityId) {
        let moved = match self.partition.side_of(id) {
            Some(Side::Collection) => self.partition.add_to_favorites(id),
            Some(Side::Favorites) => self.partition.remove_from_favorites(id),
            None => {
                debug!(id, "toggle for unknown entity ignored");
                false
            }
        };

        if moved {
            let saved = self.store.save_favorites(self.partition.favorites());
            self.record_persistence(saved);
        }
    }

    fn reset(&mut self) {
        let cleared = self.store.clear_favorites();
        self.record_persistence(cleared);
        self.partition.reset();
    }

    fn record_persistence(&mut self, result: Result<()>) {
        match result {
            Ok(()) => self.persist_error = None,
            Err(e) => {
                error!(error = %e, "failed to persist favorites");
                self.persist_error = Some(format!("Failed to save favorites: {}", e));
            }
        }
    }
}
