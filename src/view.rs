// View Renderer - pure view model derived from partition + sort direction
//
// Rendering adapters (TUI, web) only draw what this produces. Every call
// builds a fresh model; stored partition order is never touched.

use crate::entity::{Entity, EntityId};
use crate::partition::Partition;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortDirection::Ascending
    }

    /// Label of the toggle control: names the order a click switches to
    pub fn toggle_label(self) -> &'static str {
        match self {
            SortDirection::Ascending => "Sort Z-A",
            SortDirection::Descending => "Sort A-Z",
        }
    }
}

/// What a card's button does when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardAction {
    AddFavorite,
    RemoveFavorite,
}

impl CardAction {
    pub fn label(self) -> &'static str {
        match self {
            CardAction::AddFavorite => "Fav",
            CardAction::RemoveFavorite => "Remove",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: EntityId,
    pub name: String,
    pub image: Option<String>,
    pub base_experience: u32,
    pub action: CardAction,
    pub action_label: &'static str,
}

impl Card {
    fn from_entity(entity: &Entity, action: CardAction) -> Self {
        Card {
            id: entity.id,
            name: entity.name.clone(),
            image: entity.image.clone(),
            base_experience: entity.base_experience,
            action,
            action_label: action.label(),
        }
    }
}

/// Declarative description of one full render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub collection: Vec<Card>,
    pub favorites: Vec<Card>,
    pub sort_direction: SortDirection,
    pub sort_label: &'static str,
    pub total_experience: u64,
    pub favorites_count: usize,
    pub summary: String,
    pub scoreboard: String,
}

pub fn render(partition: &Partition, direction: SortDirection) -> ViewModel {
    let collection = sort_by_name(partition.collection(), direction)
        .iter()
        .map(|e| Card::from_entity(e, CardAction::AddFavorite))
        .collect();

    let favorites = sort_by_name(partition.favorites(), direction)
        .iter()
        .map(|e| Card::from_entity(e, CardAction::RemoveFavorite))
        .collect();

    let total_experience = partition.total_experience();
    let favorites_count = partition.favorites_count();

    ViewModel {
        collection,
        favorites,
        sort_direction: direction,
        sort_label: direction.toggle_label(),
        total_experience,
        favorites_count,
        summary: format!("Total EXP of Favorites: {}", total_experience),
        scoreboard: format!("Favorites Count: {}", favorites_count),
    }
}

/// Sorted copy of `entities` by name
pub fn sort_by_name(entities: &[Entity], direction: SortDirection) -> Vec<Entity> {
    let mut sorted = entities.to_vec();
    sorted.sort_by(|a, b| match direction {
        SortDirection::Ascending => compare_names(&a.name, &b.name),
        SortDirection::Descending => compare_names(&b.name, &a.name),
    });
    sorted
}

/// Case-insensitive first, raw order for ties
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
