//! Wire types for the spreadsheet-backed recipe API.
//!
//! These are the storage-facing shapes: the field names match the sheet's
//! column headers, and every record travels wrapped in a named envelope
//! (`{"recipe": {...}}`, `{"recipes": [...]}`, `{"categories": [...]}`).
use serde::{Deserialize, Deserializer, Serialize};

/// Spreadsheets leave empty cells as `null`; treat those like missing fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One row of the `recipes` sheet.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SheetRecipe {
    /// Assigned by the store. Absent on create requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(deserialize_with = "null_as_default")]
    pub prep_time: String,
    /// Newline separated list of ingredients
    #[serde(deserialize_with = "null_as_default")]
    pub ingredients: String,
    /// Newline separated list of steps
    #[serde(deserialize_with = "null_as_default")]
    pub instructions: String,
    #[serde(deserialize_with = "null_as_default")]
    pub likes: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
}

/// A partial update of a recipe row. Only the fields that are present change.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RecipePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl RecipePatch {
    /// A patch that only carries a new like count.
    pub fn likes(likes: u32) -> Self {
        Self {
            likes: Some(likes),
            ..Default::default()
        }
    }

    /// Apply the present fields onto an existing row.
    pub fn apply(self, row: &mut SheetRecipe) {
        if let Some(title) = self.title {
            row.title = title;
        }
        if let Some(image) = self.image {
            row.image = image;
        }
        if let Some(prep_time) = self.prep_time {
            row.prep_time = prep_time;
        }
        if let Some(ingredients) = self.ingredients {
            row.ingredients = ingredients;
        }
        if let Some(instructions) = self.instructions {
            row.instructions = instructions;
        }
        if let Some(likes) = self.likes {
            row.likes = likes;
        }
        if let Some(category) = self.category {
            row.category = category;
        }
    }
}

impl From<SheetRecipe> for RecipePatch {
    fn from(row: SheetRecipe) -> Self {
        Self {
            title: Some(row.title),
            image: Some(row.image),
            prep_time: Some(row.prep_time),
            ingredients: Some(row.ingredients),
            instructions: Some(row.instructions),
            likes: Some(row.likes),
            category: Some(row.category),
        }
    }
}

/// One row of the `categories` sheet.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SheetCategory {
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// `{"recipe": ...}`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RecipeEnvelope<T> {
    pub recipe: T,
}

/// `{"recipes": [...]}`
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct RecipeListEnvelope {
    #[serde(default)]
    pub recipes: Vec<SheetRecipe>,
}

/// `{"category": ...}`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CategoryEnvelope {
    pub category: SheetCategory,
}

/// `{"categories": [...]}`
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct CategoryListEnvelope {
    #[serde(default)]
    pub categories: Vec<SheetCategory>,
}
