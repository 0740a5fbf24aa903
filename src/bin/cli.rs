use std::{path::PathBuf, process, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use printshop::cli::{CreateAdminOutcome, OfflineSecretStore, add_demo_data, create_admin};
use printshop::state::build_sessions;
use printshop_config::SecurityConfig;
use printshop_db::{DatabaseConfig, PgPool, init_db_pool, run_migrations};
use printshop_models::RegisterRequest;

#[derive(Parser)]
#[command(name = "printshop-cli")]
#[command(about = "Printshop CLI - administrative tools for the printer shop", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// First name of the admin
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the admin
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Load demo producers and products into the catalog
    AddDemoData {
        /// Path to the demo data file
        #[arg(long, default_value = "demo/demo-data.json")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    printshop_observability::init_basic_console_logging();

    let cli = Cli::parse();

    let pool = match connect().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("\n❌ Database initialization error: {e:#}");
            process::exit(1);
        }
    };

    match cli.command {
        Commands::CreateAdmin {
            first_name,
            last_name,
            email,
            password,
        } => handle_create_admin(pool, first_name, last_name, email, password).await,
        Commands::AddDemoData { path } => handle_add_demo_data(&pool, path).await,
    }
}

async fn connect() -> anyhow::Result<PgPool> {
    let config = DatabaseConfig::from_env().context("DATABASE_URL must be set")?;
    let pool = init_db_pool(&config).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

fn prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(label)
            .interact_text()
            .with_context(|| format!("failed to read {}", label.to_lowercase())),
    }
}

fn prompt_password(value: Option<String>) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("failed to read password"),
    }
}

fn read_admin_details(
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<RegisterRequest> {
    Ok(RegisterRequest {
        first_name: prompt(first_name, "First name")?,
        last_name: prompt(last_name, "Last name")?,
        email: prompt(email, "Email address")?,
        password: prompt_password(password)?,
    })
}

async fn handle_create_admin(
    pool: PgPool,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let request = match read_admin_details(first_name, last_name, email, password) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("\n❌ {e:#}");
            process::exit(1);
        }
    };

    let security = match SecurityConfig::from_env() {
        Ok(security) => security,
        Err(e) => {
            eprintln!("\n❌ Invalid security configuration: {e}");
            process::exit(1);
        }
    };
    let sessions = build_sessions(pool, Arc::new(OfflineSecretStore), &security);

    match create_admin(&sessions, request).await {
        Ok(CreateAdminOutcome::Created(admin)) => {
            println!("\n✅ Admin created successfully!");
            println!("   Email: {}", admin.email);
            println!("   Name: {} {}", admin.first_name, admin.last_name);
        }
        Ok(CreateAdminOutcome::EmailTaken) => {
            println!("\nℹ️  User with this email already exists");
        }
        Err(e) => {
            eprintln!("\n❌ Error creating admin: {e:#}");
            process::exit(1);
        }
    }
}

async fn handle_add_demo_data(pool: &PgPool, path: PathBuf) {
    match add_demo_data(pool, &path).await {
        Ok(summary) => {
            println!(
                "\n✅ Demo data loaded: {} producers, {} products",
                summary.producers, summary.products
            );
        }
        Err(e) => {
            eprintln!("\n❌ Error loading demo data: {e:#}");
            process::exit(1);
        }
    }
}
