use std::sync::Arc;

use tokio::sync::RwLock;

use crate::likes::LikedSet;
use crate::models::Recipe;
use crate::store::RecipeStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Found(Recipe),
    /// Terminal: there is nothing more this view can do.
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    /// The sheet now reports this many likes.
    Liked(u32),
    AlreadyLiked,
    /// Another like from this view has not come back yet.
    InFlight,
    /// Nothing to like until the recipe has been found.
    NotLoaded,
    /// Nothing changed locally; the user may try again.
    Failed,
}

struct DetailInner {
    state: DetailState,
    likes: u32,
    liked: bool,
    like_in_flight: bool,
}

/// One recipe, its like counter, and whether this client already liked it.
pub struct DetailView {
    recipe_id: i64,
    store: Arc<dyn RecipeStore>,
    liked_set: LikedSet,
    inner: RwLock<DetailInner>,
}

impl DetailView {
    pub fn new(recipe_id: i64, store: Arc<dyn RecipeStore>, liked_set: LikedSet) -> Self {
        Self {
            recipe_id,
            store,
            liked_set,
            inner: RwLock::new(DetailInner {
                state: DetailState::Loading,
                likes: 0,
                liked: false,
                like_in_flight: false,
            }),
        }
    }

    pub fn recipe_id(&self) -> i64 {
        self.recipe_id
    }

    /// Fetch the recipe. A missing recipe, or one that could not be fetched, is not found.
    pub async fn load(&self) {
        let fetched = self.store.get_recipe(self.recipe_id).await;
        let mut inner = self.inner.write().await;
        match fetched {
            Ok(Some(recipe)) => {
                inner.likes = recipe.likes;
                inner.liked = self.liked_set.contains(self.recipe_id);
                inner.state = DetailState::Found(recipe);
            }
            Ok(None) => {
                tracing::info!("Recipe {} not found", self.recipe_id);
                inner.state = DetailState::NotFound;
            }
            Err(err) => {
                tracing::error!("Could not load recipe {}: {err}", self.recipe_id);
                inner.state = DetailState::NotFound;
            }
        }
    }

    pub async fn state(&self) -> DetailState {
        self.inner.read().await.state.clone()
    }

    pub async fn likes(&self) -> u32 {
        self.inner.read().await.likes
    }

    pub async fn already_liked(&self) -> bool {
        self.inner.read().await.liked
    }

    /// Whether the like button should be enabled.
    pub async fn can_like(&self) -> bool {
        let inner = self.inner.read().await;
        matches!(inner.state, DetailState::Found(_)) && !inner.liked && !inner.like_in_flight
    }

    /// Add this client's one like. Only one like can be in flight per view.
    pub async fn like(&self) -> LikeOutcome {
        {
            let mut inner = self.inner.write().await;
            if !matches!(inner.state, DetailState::Found(_)) {
                return LikeOutcome::NotLoaded;
            }
            // Another view on this client may have liked it since we loaded
            if inner.liked || self.liked_set.contains(self.recipe_id) {
                inner.liked = true;
                return LikeOutcome::AlreadyLiked;
            }
            if inner.like_in_flight {
                return LikeOutcome::InFlight;
            }
            inner.like_in_flight = true;
        }

        let result = self.store.increment_like(self.recipe_id).await;

        let mut inner = self.inner.write().await;
        inner.like_in_flight = false;
        match result {
            Ok(Some(likes)) => {
                if let Err(err) = self.liked_set.insert(self.recipe_id) {
                    tracing::error!("Could not remember like of {}: {err}", self.recipe_id);
                }
                inner.likes = likes;
                inner.liked = true;
                if let DetailState::Found(recipe) = &mut inner.state {
                    recipe.likes = likes;
                }
                LikeOutcome::Liked(likes)
            }
            Ok(None) => {
                tracing::warn!("Recipe {} vanished before it could be liked", self.recipe_id);
                LikeOutcome::Failed
            }
            Err(err) => {
                tracing::error!("Could not like recipe {}: {err}", self.recipe_id);
                LikeOutcome::Failed
            }
        }
    }
}
