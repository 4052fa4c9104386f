use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use pantry_client::{
    config::{Config, LoggingConfig},
    likes::LikedSet,
    local::{FileStore, KeyValueStore},
    models::{FormField, Recipe, RecipeForm},
    session::{LoginOutcome, Route, Session},
    store::{RecipeStore, SheetClient},
    views::{
        AdminView, DeleteOutcome, DetailState, DetailView, LikeOutcome, ListView, SubmitOutcome,
    },
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Browse the recipe collection, and manage it once logged in
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "pantry.yml")]
    config: String,
    /// Base URL of the recipe sheet, overriding the configuration
    #[arg(long)]
    api: Option<String>,
    /// Where to keep the session and liked recipes, overriding the configuration
    #[arg(long)]
    state: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List recipes, six to a page
    List {
        /// Only show recipes whose title contains this text
        #[arg(short, long, default_value = "")]
        search: String,
        /// Page to show, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Show one recipe
    Show { id: i64 },
    /// Like a recipe. Each recipe can be liked once from this machine.
    Like { id: i64 },
    /// Log in to the admin panel
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Log out of the admin panel
    Logout,
    /// Show whether you are logged in
    Status,
    /// Manage recipes (requires login)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand, Debug)]
enum AdminAction {
    /// List every recipe with its id
    List,
    /// List the categories recipes can belong to
    Categories,
    /// Add a recipe
    Create(RecipeArgs),
    /// Change a recipe. Fields that are not given keep their value.
    Update {
        id: i64,
        #[command(flatten)]
        fields: RecipeArgs,
    },
    /// Delete a recipe
    Delete { id: i64 },
}

#[derive(Args, Debug, Default)]
struct RecipeArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
    /// Free text, like "45 min"
    #[arg(long)]
    prep_time: Option<String>,
    /// One ingredient; repeat for more
    #[arg(long)]
    ingredient: Vec<String>,
    /// One preparation step; repeat for more
    #[arg(long)]
    step: Vec<String>,
    #[arg(long)]
    category: Option<String>,
}

impl RecipeArgs {
    /// Overwrite the form fields that were given on the command line.
    fn apply(self, form: &mut RecipeForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(image_url) = self.image_url {
            form.image_url = image_url;
        }
        if let Some(prep_time) = self.prep_time {
            form.prep_time_label = prep_time;
        }
        if !self.ingredient.is_empty() {
            form.ingredients = self.ingredient.join("\n");
        }
        if !self.step.is_empty() {
            form.instructions = self.step.join("\n");
        }
        if let Some(category) = self.category {
            form.category_selector = category;
        }
    }
}

fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "pantry.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .json()
                .with_writer(non_blocking)
                .with_env_filter(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config).context("Loading configuration")?;
    if let Some(api) = cli.api {
        config.api.base_url = api;
    }
    if let Some(state) = cli.state {
        config.storage.path = state;
    }
    let _guard = init_tracing(&config.logging);

    let file_store = FileStore::open(&config.storage.path)
        .with_context(|| format!("Opening local state {}", config.storage.path))?;
    let sheet = SheetClient::from_config(&config.api);
    tracing::debug!(
        "Using sheet at {} with local state in {}",
        sheet.base_url(),
        file_store.path().display()
    );
    let local: Arc<dyn KeyValueStore> = Arc::new(file_store);
    let store: Arc<dyn RecipeStore> = Arc::new(sheet);
    let session = Session::new(local.clone()).with_login_delay(config.login.delay());

    // Errors return through main instead of exiting, so `_guard` drops and flushes the log
    match cli.command {
        Command::List { search, page } => list(store.as_ref(), search, page).await,
        Command::Show { id } => show(DetailView::new(id, store, LikedSet::new(local))).await?,
        Command::Like { id } => like(DetailView::new(id, store, LikedSet::new(local))).await?,
        Command::Login { username, password } => {
            match session.login(&username, &password).await {
                LoginOutcome::Success { .. } => println!("Logged in as {username}"),
                LoginOutcome::Failure { message } => bail!(message),
            }
        }
        Command::Logout => {
            session.logout();
            println!("Logged out");
        }
        Command::Status => {
            if session.is_authenticated() {
                println!("Logged in");
            } else {
                println!("Not logged in");
            }
        }
        Command::Admin { action } => match session.guard(Route::Admin) {
            Route::Admin => admin(AdminView::new(store), action).await?,
            _ => bail!(
                "The admin panel needs a session. \
                 Log in with `pantry login admin --password ...` first."
            ),
        },
    }
    Ok(())
}

async fn list(store: &dyn RecipeStore, search: String, page: usize) {
    let mut view = ListView::default();
    view.load(store).await;
    view.set_search(search);
    view.set_page(page);

    if view.is_empty_after_filter() {
        println!("No recipes found.");
        return;
    }
    for recipe in view.visible() {
        println!("{}", summary_line(recipe));
    }
    println!(
        "\nPage {} of {} ({} recipes)",
        view.page(),
        view.page_count(),
        view.filtered_count()
    );
}

fn summary_line(recipe: &Recipe) -> String {
    format!(
        "#{:<4} {:<40} {:<10} {:>4} likes  [{}]",
        recipe.id, recipe.title, recipe.prep_time_label, recipe.likes, recipe.category
    )
}

/// Load a detail view and hand back its recipe, if there is one.
async fn found(view: &DetailView) -> Option<Recipe> {
    view.load().await;
    match view.state().await {
        DetailState::Found(recipe) => Some(recipe),
        DetailState::Loading | DetailState::NotFound => None,
    }
}

async fn show(view: DetailView) -> Result<()> {
    let Some(recipe) = found(&view).await else {
        bail!("Recipe {} not found", view.recipe_id());
    };
    println!("{}", recipe.title);
    println!("Category: {}", recipe.category);
    println!("Preparation time: {}", recipe.prep_time_label);
    println!("Image: {}", recipe.image_url);
    println!(
        "Likes: {}{}",
        view.likes().await,
        if view.already_liked().await {
            " (including yours)"
        } else {
            ""
        }
    );
    println!("\nIngredients:");
    for ingredient in recipe.ingredient_lines() {
        println!("  - {ingredient}");
    }
    println!("\nPreparation:");
    for (number, step) in recipe.step_lines().enumerate() {
        println!("  {}. {step}", number + 1);
    }
    Ok(())
}

async fn like(view: DetailView) -> Result<()> {
    if found(&view).await.is_none() {
        bail!("Recipe {} not found", view.recipe_id());
    }
    match view.like().await {
        LikeOutcome::Liked(likes) => println!("Liked! {likes} likes now."),
        LikeOutcome::AlreadyLiked => println!("You already liked this recipe."),
        LikeOutcome::InFlight | LikeOutcome::NotLoaded => {}
        LikeOutcome::Failed => bail!("Could not like the recipe, try again later."),
    }
    Ok(())
}

async fn admin(view: AdminView, action: AdminAction) -> Result<()> {
    view.load().await;
    match action {
        AdminAction::List => {
            for recipe in view.recipes().await {
                println!("{}", summary_line(&recipe));
            }
        }
        AdminAction::Categories => {
            println!(
                "{}",
                view.categories().await.iter().map(|c| &c.name).join("\n")
            );
        }
        AdminAction::Create(fields) => {
            view.start_create().await;
            view.edit_form(|form| fields.apply(form)).await;
            report_submit(view.submit().await)?;
        }
        AdminAction::Update { id, fields } => {
            if !view.start_edit(id).await {
                bail!("Recipe {id} not found");
            }
            view.edit_form(|form| fields.apply(form)).await;
            report_submit(view.submit().await)?;
        }
        AdminAction::Delete { id } => match view.delete(id).await {
            DeleteOutcome::Deleted => println!("Deleted recipe {id}"),
            DeleteOutcome::Busy => {}
            DeleteOutcome::Failed => bail!("Could not delete recipe {id}"),
        },
    }
    Ok(())
}

fn report_submit(outcome: SubmitOutcome) -> Result<()> {
    match outcome {
        SubmitOutcome::Created(recipe) => println!("Created recipe #{}", recipe.id),
        SubmitOutcome::Updated(recipe) => println!("Updated recipe #{}", recipe.id),
        SubmitOutcome::Invalid(missing) => {
            let names = missing
                .into_iter()
                .map(|field| format!("{} ({})", <&'static str>::from(field), field_flag(field)))
                .join(", ");
            bail!("Missing required fields: {names}");
        }
        SubmitOutcome::Busy => {}
        SubmitOutcome::Failed => bail!("Could not save the recipe"),
    }
    Ok(())
}

fn field_flag(field: FormField) -> &'static str {
    match field {
        FormField::Title => "--title",
        FormField::ImageUrl => "--image-url",
        FormField::Category => "--category",
    }
}

#[cfg(test)]
mod tests {
    use pantry_client::local::MemoryStore;

    use super::*;

    /// A sheet that refuses every connection.
    fn unreachable_store() -> Arc<dyn RecipeStore> {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);
        Arc::new(SheetClient::new(format!("http://{address}")))
    }

    fn detail(id: i64) -> DetailView {
        let local: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::default());
        DetailView::new(id, unreachable_store(), LikedSet::new(local))
    }

    #[tokio::test]
    async fn failures_come_back_as_errors() {
        let err = show(detail(5)).await.unwrap_err();
        assert_eq!(err.to_string(), "Recipe 5 not found");
        assert!(like(detail(5)).await.is_err());

        let update = AdminAction::Update {
            id: 5,
            fields: RecipeArgs::default(),
        };
        let err = admin(AdminView::new(unreachable_store()), update).await.unwrap_err();
        assert_eq!(err.to_string(), "Recipe 5 not found");
        let delete = AdminAction::Delete { id: 5 };
        assert!(admin(AdminView::new(unreachable_store()), delete).await.is_err());
    }

    #[test]
    fn missing_fields_name_their_flags() {
        let err = report_submit(SubmitOutcome::Invalid(vec![
            FormField::Title,
            FormField::Category,
        ]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: title (--title), category (--category)"
        );
        assert!(report_submit(SubmitOutcome::Busy).is_ok());
    }
}
