// Entity - one catalog item fetched from the remote API
//
// Identity is the numeric id. Name, image and base experience are values
// that may differ between a persisted snapshot and the live catalog; the
// live catalog always wins.

use serde::{Deserialize, Serialize};

/// Primary key of a catalog entity
pub type EntityId = u32;

// ============================================================================
// ENTITY
// ============================================================================

/// Immutable catalog record
///
/// Serialized field names match the snapshot format stored under the
/// `favorites` key, so older snapshots keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,

    /// Display name and sort key
    #[serde(default)]
    pub name: String,

    /// Sprite URI, opaque to us (the API may return null)
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub base_experience: u32,
}

impl Entity {
    pub fn new(id: EntityId, name: &str, base_experience: u32) -> Self {
        Entity {
            id,
            name: name.to_string(),
            image: None,
            base_experience,
        }
    }

    /// Attach an image URI
    pub fn with_image(mut self, image: &str) -> Self {
        self.image = Some(image.to_string());
        self
    }
}
