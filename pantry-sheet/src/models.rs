use crate::database::{Database, FromRow};
use anyhow::Result;
use pantry::sheet::{RecipePatch, SheetCategory, SheetRecipe};
use rusqlite::{params, OptionalExtension};

/// A row of the Recipe table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub recipe_id: i64,
    pub title: String,
    pub image: String,
    pub prep_time: String,
    pub ingredients: String,
    pub instructions: String,
    pub likes: u32,
    pub category: String,
}

impl FromRow for Recipe {
    /// Create a new recipe from an sql row, provided by rusqlite, using named columns.
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            recipe_id: row.get("recipe_id")?,
            title: row.get("title")?,
            image: row.get("image")?,
            prep_time: row.get("prep_time")?,
            ingredients: row.get("ingredients")?,
            instructions: row.get("instructions")?,
            likes: row.get("likes")?,
            category: row.get("category")?,
        })
    }
}

impl From<Recipe> for SheetRecipe {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: Some(recipe.recipe_id),
            title: recipe.title,
            image: recipe.image,
            prep_time: recipe.prep_time,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            likes: recipe.likes,
            category: recipe.category,
        }
    }
}

impl Recipe {
    fn with_id(recipe_id: i64, row: SheetRecipe) -> Self {
        Self {
            recipe_id,
            title: row.title,
            image: row.image,
            prep_time: row.prep_time,
            ingredients: row.ingredients,
            instructions: row.instructions,
            likes: row.likes,
            category: row.category,
        }
    }

    /// List all the recipes in sheet order.
    pub fn list_all(db: &Database) -> Result<Vec<Recipe>> {
        db.collect_rows("SELECT * FROM Recipe ORDER BY recipe_id", params![])
    }

    /// Get a recipe by ID
    pub fn get_by_id(db: &Database, recipe_id: i64) -> Result<Option<Self>> {
        Ok(db
            .collect_rows(
                "SELECT * FROM Recipe WHERE recipe_id = ?",
                params![recipe_id],
            )?
            .pop())
    }

    /// Append a new row. Any id in the upload is ignored; SQLite assigns one.
    pub fn push(db: &Database, upload: SheetRecipe) -> Result<Self> {
        let conn = db.pool.get()?;
        conn.execute(
            "INSERT INTO Recipe (title, image, prep_time, ingredients, instructions, likes, category)
            VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                upload.title,
                upload.image,
                upload.prep_time,
                upload.ingredients,
                upload.instructions,
                upload.likes,
                upload.category
            ],
        )?;
        let recipe_id = conn.last_insert_rowid();
        Ok(Self::with_id(recipe_id, upload))
    }

    /// Change only the fields present in `patch`.
    ///
    /// Returns `None` when there is no such row.
    pub fn patch(db: &Database, recipe_id: i64, patch: RecipePatch) -> Result<Option<Self>> {
        let mut conn = db.pool.get()?;
        let tx = conn.transaction()?;
        let current = tx
            .query_row(
                "SELECT * FROM Recipe WHERE recipe_id = ?",
                params![recipe_id],
                |row| Recipe::from_row(row),
            )
            .optional()?;
        let Some(current) = current else {
            return Ok(None);
        };
        let mut row = SheetRecipe::from(current);
        patch.apply(&mut row);
        tx.execute(
            "UPDATE Recipe
            SET title = ?, image = ?, prep_time = ?, ingredients = ?, instructions = ?, likes = ?, category = ?
            WHERE recipe_id = ?",
            params![
                row.title,
                row.image,
                row.prep_time,
                row.ingredients,
                row.instructions,
                row.likes,
                row.category,
                recipe_id
            ],
        )?;
        tx.commit()?;
        Ok(Some(Self::with_id(recipe_id, row)))
    }

    /// Delete a recipe. Returns whether a row was removed.
    pub fn delete(db: &Database, recipe_id: i64) -> Result<bool> {
        let conn = db.pool.get()?;
        let removed = conn.execute("DELETE FROM Recipe WHERE recipe_id = ?", params![recipe_id])?;
        Ok(removed > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub category_id: i64,
    pub name: String,
}

impl FromRow for Category {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            category_id: row.get("category_id")?,
            name: row.get("name")?,
        })
    }
}

impl From<Category> for SheetCategory {
    fn from(category: Category) -> Self {
        Self {
            id: category.category_id,
            name: category.name,
        }
    }
}

impl Category {
    pub fn list_all(db: &Database) -> Result<Vec<Category>> {
        db.collect_rows("SELECT * FROM Category ORDER BY category_id", params![])
    }

    pub fn get_by_id(db: &Database, category_id: i64) -> Result<Option<Self>> {
        Ok(db
            .collect_rows(
                "SELECT * FROM Category WHERE category_id = ?",
                params![category_id],
            )?
            .pop())
    }
}
