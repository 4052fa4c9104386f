//! An in-memory `RecipeStore` for view tests.
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use pantry::sheet::{RecipePatch, SheetCategory, SheetRecipe};
use reqwest::StatusCode;

use crate::errors::{StoreError, StoreResult};
use crate::models::{Category, Recipe, RecipeForm};
use crate::store::RecipeStore;

#[derive(Default)]
struct Sheet {
    rows: Vec<SheetRecipe>,
    categories: Vec<SheetCategory>,
    next_id: i64,
    failing: bool,
    calls: BTreeMap<&'static str, usize>,
}

/// Rows are kept in storage shape so every call goes through the translation.
#[derive(Default)]
pub(crate) struct FakeStore {
    sheet: Mutex<Sheet>,
    latency: Duration,
}

impl FakeStore {
    pub(crate) fn with_titles(titles: &[&str]) -> Self {
        let store = Self::default();
        for title in titles {
            store.insert(SheetRecipe {
                title: title.to_string(),
                image: format!("https://img.example/{title}.jpg"),
                category: "Desserts".into(),
                ..Default::default()
            });
        }
        store.sheet().categories = vec![
            SheetCategory {
                id: 1,
                name: "Starters".into(),
            },
            SheetCategory {
                id: 2,
                name: "Desserts".into(),
            },
        ];
        store
    }

    /// Every call sleeps this long before touching the sheet.
    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn sheet(&self) -> MutexGuard<'_, Sheet> {
        self.sheet.lock().unwrap()
    }

    pub(crate) fn insert(&self, mut row: SheetRecipe) -> i64 {
        let mut sheet = self.sheet();
        sheet.next_id += 1;
        let id = sheet.next_id;
        row.id = Some(id);
        sheet.rows.push(row);
        id
    }

    pub(crate) fn row(&self, recipe_id: i64) -> Option<SheetRecipe> {
        self.sheet()
            .rows
            .iter()
            .find(|r| r.id == Some(recipe_id))
            .cloned()
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.sheet().failing = failing;
    }

    /// How many times `operation` was called, including failed calls.
    pub(crate) fn calls(&self, operation: &str) -> usize {
        self.sheet().calls.get(operation).copied().unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.sheet().calls.values().sum()
    }

    async fn enter(&self, operation: &'static str) -> StoreResult<MutexGuard<'_, Sheet>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let mut sheet = self.sheet();
        *sheet.calls.entry(operation).or_default() += 1;
        if sheet.failing {
            return Err(StoreError::Status {
                url: format!("fake://{operation}"),
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "sheet offline".into(),
            });
        }
        Ok(sheet)
    }
}

#[async_trait]
impl RecipeStore for FakeStore {
    async fn list_recipes(&self) -> StoreResult<Vec<Recipe>> {
        let sheet = self.enter("list_recipes").await?;
        Ok(sheet.rows.iter().cloned().map(Recipe::from).collect())
    }

    async fn get_recipe(&self, recipe_id: i64) -> StoreResult<Option<Recipe>> {
        let sheet = self.enter("get_recipe").await?;
        Ok(sheet
            .rows
            .iter()
            .find(|r| r.id == Some(recipe_id))
            .cloned()
            .map(Recipe::from))
    }

    async fn create_recipe(&self, form: &RecipeForm) -> StoreResult<Recipe> {
        let mut sheet = self.enter("create_recipe").await?;
        sheet.next_id += 1;
        let row = SheetRecipe {
            id: Some(sheet.next_id),
            likes: 0,
            ..form.to_sheet()
        };
        sheet.rows.push(row.clone());
        Ok(row.into())
    }

    async fn update_recipe(&self, recipe_id: i64, form: &RecipeForm) -> StoreResult<Recipe> {
        let mut sheet = self.enter("update_recipe").await?;
        let row = sheet
            .rows
            .iter_mut()
            .find(|r| r.id == Some(recipe_id))
            .ok_or_else(|| StoreError::Status {
                url: format!("fake://recipes/{recipe_id}"),
                status: StatusCode::NOT_FOUND,
                body: String::new(),
            })?;
        RecipePatch::from(form.to_sheet()).apply(row);
        Ok(row.clone().into())
    }

    async fn delete_recipe(&self, recipe_id: i64) -> StoreResult<()> {
        let mut sheet = self.enter("delete_recipe").await?;
        sheet.rows.retain(|r| r.id != Some(recipe_id));
        Ok(())
    }

    async fn increment_like(&self, recipe_id: i64) -> StoreResult<Option<u32>> {
        let mut sheet = self.enter("increment_like").await?;
        Ok(sheet
            .rows
            .iter_mut()
            .find(|r| r.id == Some(recipe_id))
            .map(|row| {
                row.likes += 1;
                row.likes
            }))
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let sheet = self.enter("list_categories").await?;
        Ok(sheet.categories.iter().cloned().map(Category::from).collect())
    }
}
