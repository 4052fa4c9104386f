//! UI-facing records and their translation to and from the sheet's storage shape.
//!
//! | storage        | UI                              |
//! |----------------|---------------------------------|
//! | `title`        | `title`                         |
//! | `image`        | `image_url`                     |
//! | `prep_time`    | `prep_time_label`               |
//! | `ingredients`  | `ingredients`                   |
//! | `instructions` | `instructions`                  |
//! | `likes`        | `likes`                         |
//! | `category`     | `category` and `category_selector` |
use pantry::sheet::{SheetCategory, SheetRecipe};
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// A recipe as the views see it.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Assigned by the sheet, starting at 1. Zero means the sheet has not assigned one.
    pub id: i64,
    pub title: String,
    pub image_url: String,
    pub prep_time_label: String,
    pub ingredients: String,
    pub instructions: String,
    pub likes: u32,
    pub category: String,
    /// The value of the admin form's category picker. Always equal to `category`
    /// on records that came from the sheet.
    pub category_selector: String,
}

impl From<SheetRecipe> for Recipe {
    fn from(row: SheetRecipe) -> Self {
        Self {
            id: row.id.unwrap_or_default(),
            title: row.title,
            image_url: row.image,
            prep_time_label: row.prep_time,
            ingredients: row.ingredients,
            instructions: row.instructions,
            likes: row.likes,
            category_selector: row.category.clone(),
            category: row.category,
        }
    }
}

impl From<&Recipe> for SheetRecipe {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: (recipe.id != 0).then_some(recipe.id),
            ..recipe.to_form().to_sheet()
        }
    }
}

impl Recipe {
    /// Fill a form buffer with every field of this recipe.
    pub fn to_form(&self) -> RecipeForm {
        RecipeForm {
            title: self.title.clone(),
            image_url: self.image_url.clone(),
            prep_time_label: self.prep_time_label.clone(),
            ingredients: self.ingredients.clone(),
            instructions: self.instructions.clone(),
            likes: self.likes,
            category_selector: if self.category_selector.is_empty() {
                self.category.clone()
            } else {
                self.category_selector.clone()
            },
        }
    }

    /// The ingredients block, one item per non-blank line.
    pub fn ingredient_lines(&self) -> impl Iterator<Item = &str> {
        non_blank_lines(&self.ingredients)
    }

    /// The instructions block, one step per non-blank line.
    pub fn step_lines(&self) -> impl Iterator<Item = &str> {
        non_blank_lines(&self.instructions)
    }
}

fn non_blank_lines(block: &str) -> impl Iterator<Item = &str> {
    block.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// The admin form buffer. `RecipeForm::default()` is the empty create form.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RecipeForm {
    pub title: String,
    pub image_url: String,
    pub prep_time_label: String,
    pub ingredients: String,
    pub instructions: String,
    pub likes: u32,
    pub category_selector: String,
}

/// Fields the admin form refuses to submit empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum FormField {
    Title,
    ImageUrl,
    Category,
}

impl RecipeForm {
    /// Required fields that are blank, in form order.
    pub fn missing_fields(&self) -> Vec<FormField> {
        [
            (FormField::Title, &self.title),
            (FormField::ImageUrl, &self.image_url),
            (FormField::Category, &self.category_selector),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Translate to the storage shape, without an id. The selector becomes the stored category.
    pub fn to_sheet(&self) -> SheetRecipe {
        SheetRecipe {
            id: None,
            title: self.title.clone(),
            image: self.image_url.clone(),
            prep_time: self.prep_time_label.clone(),
            ingredients: self.ingredients.clone(),
            instructions: self.instructions.clone(),
            likes: self.likes,
            category: self.category_selector.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl From<SheetCategory> for Category {
    fn from(row: SheetCategory) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}
