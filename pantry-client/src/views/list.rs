use crate::models::Recipe;
use crate::store::RecipeStore;

pub const PAGE_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Ready,
}

/// The public listing: every recipe, a title filter and a page cursor.
#[derive(Debug, Clone)]
pub struct ListView {
    recipes: Vec<Recipe>,
    search: String,
    page: usize,
    state: ListState,
}

impl Default for ListView {
    fn default() -> Self {
        Self {
            recipes: vec![],
            search: String::new(),
            page: 1,
            state: ListState::Loading,
        }
    }
}

impl ListView {
    /// A ready view over recipes that are already in hand.
    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes,
            state: ListState::Ready,
            ..Default::default()
        }
    }

    /// Fetch the whole collection. On failure the listing is simply empty.
    pub async fn load(&mut self, store: &dyn RecipeStore) {
        self.recipes = match store.list_recipes().await {
            Ok(recipes) => {
                tracing::info!("Loaded {} recipes", recipes.len());
                recipes
            }
            Err(err) => {
                tracing::error!("Could not load recipes: {err}");
                vec![]
            }
        };
        self.state = ListState::Ready;
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Change the filter text. Always goes back to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    /// Pages are 1-based and not clamped: past the last page there is simply nothing to show.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Recipes whose title contains the search text, ignoring case.
    pub fn filtered(&self) -> impl Iterator<Item = &Recipe> {
        let needle = self.search.to_lowercase();
        self.recipes
            .iter()
            .filter(move |recipe| recipe.title.to_lowercase().contains(&needle))
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered().count()
    }

    pub fn page_count(&self) -> usize {
        self.filtered_count().div_ceil(PAGE_SIZE)
    }

    /// The recipes on the current page.
    pub fn visible(&self) -> Vec<&Recipe> {
        self.filtered()
            .skip(self.page.saturating_sub(1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect()
    }

    pub fn is_empty_after_filter(&self) -> bool {
        self.state == ListState::Ready && self.visible().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeStore;

    fn titles(view: &ListView) -> Vec<&str> {
        view.visible().iter().map(|r| r.title.as_str()).collect()
    }

    async fn loaded(titles: &[&str]) -> ListView {
        let mut view = ListView::default();
        view.load(&FakeStore::with_titles(titles)).await;
        view
    }

    #[tokio::test]
    async fn seven_recipes_span_two_pages() {
        let mut view = loaded(&["R1", "R2", "R3", "R4", "R5", "R6", "R7"]).await;
        assert_eq!(view.state(), ListState::Ready);
        assert_eq!(view.page_count(), 2);
        assert_eq!(titles(&view), ["R1", "R2", "R3", "R4", "R5", "R6"]);

        view.set_page(2);
        assert_eq!(titles(&view), ["R7"]);

        view.set_search("");
        assert_eq!(view.page(), 1);
        assert_eq!(titles(&view), ["R1", "R2", "R3", "R4", "R5", "R6"]);
    }

    #[tokio::test]
    async fn search_ignores_case_and_only_looks_at_titles() {
        let mut view = loaded(&["Apple Pie", "Pineapple Salsa", "Banana Bread"]).await;
        view.set_search("APPLE");
        assert_eq!(titles(&view), ["Apple Pie", "Pineapple Salsa"]);

        // Every fake recipe has category "Desserts", which must not match
        view.set_search("dessert");
        assert!(view.visible().is_empty());
    }

    #[tokio::test]
    async fn no_match_means_no_pages() {
        let mut view = loaded(&["Soup"]).await;
        view.set_search("zzz");
        assert_eq!(view.filtered_count(), 0);
        assert_eq!(view.page_count(), 0);
        assert!(view.is_empty_after_filter());
    }

    #[tokio::test]
    async fn changing_the_search_resets_the_page() {
        let names: Vec<String> = (1..=20).map(|i| format!("Cake {i}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut view = loaded(&names).await;
        view.set_page(3);
        view.set_search("cake");
        assert_eq!(view.page(), 1);
        view.set_page(2);
        view.set_search("cake 1");
        assert_eq!(view.page(), 1);
    }

    #[tokio::test]
    async fn pages_past_the_end_are_empty() {
        let mut view = loaded(&["A", "B"]).await;
        view.set_page(9);
        assert!(view.visible().is_empty());
        assert!(view.is_empty_after_filter());
    }

    #[tokio::test]
    async fn failed_load_leaves_an_empty_ready_list() {
        let store = FakeStore::with_titles(&["A"]);
        store.set_failing(true);
        let mut view = ListView::default();
        assert_eq!(view.state(), ListState::Loading);
        assert!(!view.is_empty_after_filter());
        view.load(&store).await;
        assert_eq!(view.state(), ListState::Ready);
        assert!(view.recipes().is_empty());
        assert_eq!(view.page_count(), 0);
    }

    #[test]
    fn keeps_server_order() {
        let view = ListView::from_recipes(
            ["Zucchini", "Apple"]
                .iter()
                .map(|t| Recipe {
                    title: t.to_string(),
                    ..Default::default()
                })
                .collect(),
        );
        assert_eq!(titles(&view), ["Zucchini", "Apple"]);
    }
}
