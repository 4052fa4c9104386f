//! The remote recipe sheet.
use async_trait::async_trait;
use pantry::sheet::{
    CategoryListEnvelope, RecipeEnvelope, RecipeListEnvelope, RecipePatch, SheetRecipe,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::errors::{StoreError, StoreResult};
use crate::models::{Category, Recipe, RecipeForm};

/// Everything the views need from the recipe collection.
///
/// Nothing here retries; failures go straight back to the caller.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// All recipes, in the order the sheet keeps them.
    async fn list_recipes(&self) -> StoreResult<Vec<Recipe>>;

    /// One recipe, or `None` if the sheet has no such row.
    async fn get_recipe(&self, recipe_id: i64) -> StoreResult<Option<Recipe>>;

    /// Append a recipe. Its like count always starts at zero.
    async fn create_recipe(&self, form: &RecipeForm) -> StoreResult<Recipe>;

    /// Overwrite every field of an existing recipe.
    async fn update_recipe(&self, recipe_id: i64, form: &RecipeForm) -> StoreResult<Recipe>;

    async fn delete_recipe(&self, recipe_id: i64) -> StoreResult<()>;

    /// Add one like and return the new count, or `None` if the recipe is gone.
    ///
    /// This reads the current count and writes back count + 1, so two clients
    /// liking at the same moment can lose one of the increments.
    async fn increment_like(&self, recipe_id: i64) -> StoreResult<Option<u32>>;

    async fn list_categories(&self) -> StoreResult<Vec<Category>>;
}

/// `RecipeStore` over the sheet's REST API.
#[derive(Clone)]
pub struct SheetClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl SheetClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.base_url.clone()).with_token(config.token.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{method} {url}");
        let request = self.client.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and decode its body. A 404 is `None`; any other failure is an error.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> StoreResult<Option<T>> {
        let response = request.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response).await?;
        Ok(Some(response.json().await?))
    }

    /// Like `fetch`, but a 404 is an error too.
    async fn fetch_existing<T: DeserializeOwned>(&self, request: RequestBuilder) -> StoreResult<T> {
        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: Response) -> StoreResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let url = response.url().to_string();
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status { url, status, body })
}

#[async_trait]
impl RecipeStore for SheetClient {
    async fn list_recipes(&self) -> StoreResult<Vec<Recipe>> {
        let list: RecipeListEnvelope = self
            .fetch_existing(self.request(Method::GET, "/recipes"))
            .await?;
        Ok(list.recipes.into_iter().map(Recipe::from).collect())
    }

    async fn get_recipe(&self, recipe_id: i64) -> StoreResult<Option<Recipe>> {
        let found: Option<RecipeEnvelope<SheetRecipe>> = self
            .fetch(self.request(Method::GET, &format!("/recipes/{recipe_id}")))
            .await?;
        Ok(found.map(|envelope| envelope.recipe.into()))
    }

    async fn create_recipe(&self, form: &RecipeForm) -> StoreResult<Recipe> {
        let recipe = SheetRecipe {
            likes: 0,
            ..form.to_sheet()
        };
        let created: RecipeEnvelope<SheetRecipe> = self
            .fetch_existing(
                self.request(Method::POST, "/recipes")
                    .json(&RecipeEnvelope { recipe }),
            )
            .await?;
        tracing::info!("Created recipe {:?}", created.recipe.id);
        Ok(created.recipe.into())
    }

    async fn update_recipe(&self, recipe_id: i64, form: &RecipeForm) -> StoreResult<Recipe> {
        let updated: RecipeEnvelope<SheetRecipe> = self
            .fetch_existing(
                self.request(Method::PUT, &format!("/recipes/{recipe_id}"))
                    .json(&RecipeEnvelope {
                        recipe: form.to_sheet(),
                    }),
            )
            .await?;
        tracing::info!("Updated recipe {recipe_id}");
        Ok(updated.recipe.into())
    }

    async fn delete_recipe(&self, recipe_id: i64) -> StoreResult<()> {
        let response = self
            .request(Method::DELETE, &format!("/recipes/{recipe_id}"))
            .send()
            .await?;
        check_status(response).await?;
        tracing::info!("Deleted recipe {recipe_id}");
        Ok(())
    }

    async fn increment_like(&self, recipe_id: i64) -> StoreResult<Option<u32>> {
        let Some(current) = self.get_recipe(recipe_id).await? else {
            return Ok(None);
        };
        let likes = current.likes.saturating_add(1);
        let updated: Option<RecipeEnvelope<SheetRecipe>> = self
            .fetch(
                self.request(Method::PUT, &format!("/recipes/{recipe_id}"))
                    .json(&RecipeEnvelope {
                        recipe: RecipePatch::likes(likes),
                    }),
            )
            .await?;
        Ok(updated.map(|envelope| envelope.recipe.likes))
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let list: CategoryListEnvelope = self
            .fetch_existing(self.request(Method::GET, "/categories"))
            .await?;
        Ok(list.categories.into_iter().map(Category::from).collect())
    }
}
