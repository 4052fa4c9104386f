use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use pantry::sheet::{
    CategoryEnvelope, CategoryListEnvelope, RecipeEnvelope, RecipeListEnvelope, RecipePatch,
    SheetRecipe,
};

use crate::{
    auth::SheetPrincipal,
    config::AuthConfig,
    database::Database,
    errors::{WebError, WebResult},
    models::{Category, Recipe},
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: AuthConfig,
}

impl FromRef<AppState> for AuthConfig {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Build the sheet API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // `GET /health` goes to `health`
        .route("/health", get(health))
        // `GET /recipes` lists every row, `POST /recipes` appends one
        .route("/recipes", get(list_recipes).post(create_recipe))
        // `GET`, `PUT` and `DELETE` a single row
        .route(
            "/recipes/:recipe_id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .route("/categories", get(list_categories))
        .route("/categories/:category_id", get(get_category))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

// Just reply that everything is okay
async fn health() -> StatusCode {
    StatusCode::OK
}

async fn list_recipes(
    State(state): State<AppState>,
    _: SheetPrincipal,
) -> WebResult<Json<RecipeListEnvelope>> {
    let recipes = Recipe::list_all(&state.db)?
        .into_iter()
        .map(SheetRecipe::from)
        .collect();
    Ok(Json(RecipeListEnvelope { recipes }))
}

async fn get_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<i64>,
    _: SheetPrincipal,
) -> WebResult<Json<RecipeEnvelope<SheetRecipe>>> {
    let recipe = Recipe::get_by_id(&state.db, recipe_id)?.ok_or(WebError::NotFound)?;
    Ok(Json(RecipeEnvelope {
        recipe: recipe.into(),
    }))
}

async fn create_recipe(
    State(state): State<AppState>,
    _: SheetPrincipal,
    Json(upload): Json<RecipeEnvelope<SheetRecipe>>,
) -> WebResult<Json<RecipeEnvelope<SheetRecipe>>> {
    let recipe = Recipe::push(&state.db, upload.recipe)?;
    tracing::info!("Added recipe {}", recipe.recipe_id);
    Ok(Json(RecipeEnvelope {
        recipe: recipe.into(),
    }))
}

/// Edit a row. Like the spreadsheet API it stands in for, only the fields present change.
async fn update_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<i64>,
    _: SheetPrincipal,
    Json(patch): Json<RecipeEnvelope<RecipePatch>>,
) -> WebResult<Json<RecipeEnvelope<SheetRecipe>>> {
    let recipe = Recipe::patch(&state.db, recipe_id, patch.recipe)?.ok_or(WebError::NotFound)?;
    Ok(Json(RecipeEnvelope {
        recipe: recipe.into(),
    }))
}

async fn delete_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<i64>,
    _: SheetPrincipal,
) -> WebResult<StatusCode> {
    if Recipe::delete(&state.db, recipe_id)? {
        tracing::info!("Deleted recipe {recipe_id}");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(WebError::NotFound)
    }
}

async fn list_categories(
    State(state): State<AppState>,
    _: SheetPrincipal,
) -> WebResult<Json<CategoryListEnvelope>> {
    let categories = Category::list_all(&state.db)?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(CategoryListEnvelope { categories }))
}

async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
    _: SheetPrincipal,
) -> WebResult<Json<CategoryEnvelope>> {
    let category = Category::get_by_id(&state.db, category_id)?.ok_or(WebError::NotFound)?;
    Ok(Json(CategoryEnvelope {
        category: category.into(),
    }))
}
