use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{Category, FormField, Recipe, RecipeForm};
use crate::store::RecipeStore;

/// What the form buffer is for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    Edit(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Recipe),
    Updated(Recipe),
    /// Required fields were blank; nothing was sent.
    Invalid(Vec<FormField>),
    /// Another save or delete is still running.
    Busy,
    /// The sheet refused; both collections were reloaded.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Busy,
    Failed,
}

#[derive(Default)]
struct AdminInner {
    recipes: Vec<Recipe>,
    categories: Vec<Category>,
    form: RecipeForm,
    mode: FormMode,
    loaded: bool,
    saving: bool,
}

impl AdminInner {
    fn reset_form(&mut self) {
        self.form = RecipeForm::default();
        self.mode = FormMode::Create;
    }
}

/// The admin table and its create/edit form.
///
/// Successful saves are merged into the local table from the sheet's answer,
/// failures resync everything from the sheet.
pub struct AdminView {
    store: Arc<dyn RecipeStore>,
    inner: RwLock<AdminInner>,
}

impl AdminView {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self {
            store,
            inner: RwLock::default(),
        }
    }

    /// Fetch recipes and categories side by side. A failed fetch leaves its collection empty.
    pub async fn load(&self) {
        self.reload().await;
    }

    /// Returns whether the recipe table came from the sheet.
    async fn reload(&self) -> bool {
        let (recipes, categories) =
            tokio::join!(self.store.list_recipes(), self.store.list_categories());
        let fresh = recipes.is_ok();
        let recipes = recipes.unwrap_or_else(|err| {
            tracing::error!("Could not load recipes: {err}");
            vec![]
        });
        let categories = categories.unwrap_or_else(|err| {
            tracing::error!("Could not load categories: {err}");
            vec![]
        });
        let mut inner = self.inner.write().await;
        inner.recipes = recipes;
        inner.categories = categories;
        inner.loaded = true;
        fresh
    }

    pub async fn is_loaded(&self) -> bool {
        self.inner.read().await.loaded
    }

    pub async fn is_saving(&self) -> bool {
        self.inner.read().await.saving
    }

    pub async fn recipes(&self) -> Vec<Recipe> {
        self.inner.read().await.recipes.clone()
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.inner.read().await.categories.clone()
    }

    pub async fn form(&self) -> RecipeForm {
        self.inner.read().await.form.clone()
    }

    pub async fn mode(&self) -> FormMode {
        self.inner.read().await.mode
    }

    /// Empty the form for a new recipe.
    pub async fn start_create(&self) {
        self.inner.write().await.reset_form();
    }

    /// Fill the form from a recipe in the table. Returns false if there is no such recipe,
    /// in which case the form is left alone.
    pub async fn start_edit(&self, recipe_id: i64) -> bool {
        let mut inner = self.inner.write().await;
        let Some(form) = inner
            .recipes
            .iter()
            .find(|r| r.id == recipe_id)
            .map(Recipe::to_form)
        else {
            return false;
        };
        inner.form = form;
        inner.mode = FormMode::Edit(recipe_id);
        true
    }

    /// Change fields of the form without leaving the current mode.
    pub async fn edit_form(&self, edit: impl FnOnce(&mut RecipeForm)) {
        edit(&mut self.inner.write().await.form);
    }

    /// Save the form: create in create mode, overwrite in edit mode.
    pub async fn submit(&self) -> SubmitOutcome {
        let (form, mode) = {
            let mut inner = self.inner.write().await;
            if inner.saving {
                return SubmitOutcome::Busy;
            }
            let missing = inner.form.missing_fields();
            if !missing.is_empty() {
                tracing::warn!("Not saving, missing required fields: {missing:?}");
                return SubmitOutcome::Invalid(missing);
            }
            inner.saving = true;
            (inner.form.clone(), inner.mode)
        };

        let saved = match mode {
            FormMode::Create => self.store.create_recipe(&form).await,
            FormMode::Edit(recipe_id) => self.store.update_recipe(recipe_id, &form).await,
        };

        match saved {
            Ok(recipe) => {
                let mut inner = self.inner.write().await;
                let outcome = match mode {
                    FormMode::Create => {
                        inner.recipes.push(recipe.clone());
                        SubmitOutcome::Created(recipe)
                    }
                    FormMode::Edit(recipe_id) => {
                        match inner.recipes.iter().position(|r| r.id == recipe_id) {
                            Some(index) => inner.recipes[index] = recipe.clone(),
                            None => inner.recipes.push(recipe.clone()),
                        }
                        SubmitOutcome::Updated(recipe)
                    }
                };
                inner.reset_form();
                inner.saving = false;
                outcome
            }
            Err(err) => {
                tracing::error!("Could not save recipe: {err}");
                self.resync().await;
                SubmitOutcome::Failed
            }
        }
    }

    /// Delete a recipe. There is no undo.
    pub async fn delete(&self, recipe_id: i64) -> DeleteOutcome {
        {
            let mut inner = self.inner.write().await;
            if inner.saving {
                return DeleteOutcome::Busy;
            }
            inner.saving = true;
        }

        match self.store.delete_recipe(recipe_id).await {
            Ok(()) => {
                let mut inner = self.inner.write().await;
                inner.recipes.retain(|r| r.id != recipe_id);
                if inner.mode == FormMode::Edit(recipe_id) {
                    inner.reset_form();
                }
                inner.saving = false;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                tracing::error!("Could not delete recipe {recipe_id}: {err}");
                self.resync().await;
                DeleteOutcome::Failed
            }
        }
    }

    /// Reload both collections after a failed mutation, then release the saving flag.
    ///
    /// An edit whose recipe is missing from a freshly reloaded table goes back to create mode.
    async fn resync(&self) {
        tracing::info!("Reloading admin view");
        let fresh = self.reload().await;
        let mut inner = self.inner.write().await;
        if let (true, FormMode::Edit(recipe_id)) = (fresh, inner.mode) {
            if !inner.recipes.iter().any(|r| r.id == recipe_id) {
                tracing::warn!("Recipe {recipe_id} is gone, dropping its edit");
                inner.reset_form();
            }
        }
        inner.saving = false;
    }
}
