use std::collections::BTreeSet;
use std::sync::Arc;

use crate::errors::LocalResult;
use crate::local::KeyValueStore;

/// Key holding a JSON array of the recipe ids this client has liked.
pub const LIKED_KEY: &str = "liked_recipes";

/// The recipes this client has already liked. Only ever grows.
#[derive(Clone)]
pub struct LikedSet {
    store: Arc<dyn KeyValueStore>,
}

impl LikedSet {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn ids(&self) -> BTreeSet<i64> {
        let Some(raw) = self.store.get(LIKED_KEY) else {
            return BTreeSet::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            tracing::warn!("Ignoring unreadable liked recipes {raw:?}: {err}");
            BTreeSet::new()
        })
    }

    pub fn contains(&self, recipe_id: i64) -> bool {
        self.ids().contains(&recipe_id)
    }

    /// Remember a like. Returns false if the recipe was already in the set.
    pub fn insert(&self, recipe_id: i64) -> LocalResult<bool> {
        let mut ids = self.ids();
        if !ids.insert(recipe_id) {
            return Ok(false);
        }
        self.store.set(LIKED_KEY, &serde_json::to_string(&ids)?)?;
        Ok(true)
    }
}
