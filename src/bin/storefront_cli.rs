use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use storefront::{
    catalog::{AnyProduct, LatestProducts, ProductFields},
    config,
    db::{self, DbPool},
    entities::catalog::CategoryModel,
    services::commerce::{CategoryInput, CategoryService},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = CliContext::initialize().await?;

    match cli.command {
        Commands::Migrate => handle_migrate(&context).await?,
        Commands::Category(command) => handle_category_command(&context, command, cli.json).await?,
        Commands::Latest(args) => handle_latest(&context, args, cli.json).await?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(name = "storefront", about = "Storefront catalog maintenance CLI", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON when available"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,
    /// Manage product categories
    #[command(subcommand)]
    Category(CategoryCommands),
    /// Show the newest products across product types
    Latest(LatestArgs),
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Create a category
    Add(CategoryAddArgs),
    /// List categories by name
    List,
}

#[derive(Args)]
struct CategoryAddArgs {
    #[arg(long, help = "Display name of the category")]
    name: String,
    #[arg(long, help = "Unique URL slug (letters, digits, '-' and '_')")]
    slug: String,
}

#[derive(Args)]
struct LatestArgs {
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "notebook,smartphone",
        help = "Comma-separated product type tags"
    )]
    types: Vec<String>,
    #[arg(long, help = "Type tag whose products are listed first")]
    priority: Option<String>,
}

struct CliContext {
    db: Arc<DbPool>,
}

impl CliContext {
    async fn initialize() -> Result<Self> {
        let config = config::load_config().context("failed to load application config")?;
        config::init_tracing(config.log_level(), config.log_json);

        let db_pool = db::establish_connection_from_app_config(&config)
            .await
            .context("failed to connect to database")?;

        Ok(Self {
            db: Arc::new(db_pool),
        })
    }

    fn category_service(&self) -> CategoryService {
        CategoryService::new(self.db.clone())
    }
}

async fn handle_migrate(context: &CliContext) -> Result<()> {
    db::run_migrations(&context.db)
        .await
        .context("failed to run migrations")?;
    println!("Migrations applied");
    Ok(())
}

async fn handle_category_command(
    context: &CliContext,
    command: CategoryCommands,
    json: bool,
) -> Result<()> {
    let service = context.category_service();
    match command {
        CategoryCommands::Add(args) => {
            let category = service
                .create(CategoryInput::new(args.name, args.slug))
                .await
                .context("failed to create category")?;
            if json {
                print_json(&category)?;
            } else {
                println!("Created category {} (id {})", category.slug, category.id);
            }
        }
        CategoryCommands::List => {
            let categories = service.list().await.context("failed to list categories")?;
            if json {
                print_json(&categories)?;
            } else if categories.is_empty() {
                println!("No categories");
            } else {
                categories.iter().for_each(render_category);
            }
        }
    }
    Ok(())
}

async fn handle_latest(context: &CliContext, args: LatestArgs, json: bool) -> Result<()> {
    let tags: Vec<&str> = args.types.iter().map(|t| t.trim()).collect();
    let products = LatestProducts::for_main_page(&*context.db, &tags, args.priority.as_deref())
        .await
        .context("failed to load latest products")?;

    if json {
        print_json(&products)?;
    } else if products.is_empty() {
        println!("No products");
    } else {
        products.iter().for_each(render_product);
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_category(category: &CategoryModel) {
    println!("- {} • slug {} • id {}", category, category.slug, category.id);
}

fn render_product(product: &AnyProduct) {
    println!(
        "- [{}] {} • {} • price {}",
        product.kind(),
        product.id(),
        product,
        product.price()
    );
}
