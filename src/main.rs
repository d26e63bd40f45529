use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use acme_planner::{api, config::AppConfig, db};

#[derive(Parser)]
#[command(name = "acme-planner")]
#[command(about = "Task and work plan planner")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port for HTTP API (overrides ACME_PLANNER_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Register a user account
    AddUser {
        username: String,

        /// Also grant the manager role
        #[arg(long)]
        manager: bool,
    },
    /// Add a term to the spam list
    AddSpam { term: String },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "acme_planner=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_database(config: &AppConfig) -> anyhow::Result<db::Database> {
    let db = match &config.database_path {
        Some(path) => db::Database::open(path.clone())?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;
    Ok(db)
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let port = config.port;
    tracing::info!("Starting planner on port {}", port);

    let db = open_database(&config)?;
    let app = api::create_router_with_config(db, config);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Planner listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = AppConfig::from_env();

    match cli.command {
        Some(Commands::Serve { port }) => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await?;
        }
        Some(Commands::AddUser { username, manager }) => {
            let db = open_database(&config)?;
            let account = db.create_user_account(&username)?;
            if manager {
                db.create_manager(account.id)?;
            }
            println!(
                "Created user {}{}",
                account.username,
                if manager { " (manager)" } else { "" }
            );
        }
        Some(Commands::AddSpam { term }) => {
            let db = open_database(&config)?;
            if db.add_spam_word(&term)? {
                println!("Added spam term {:?}", term);
            } else {
                println!("Spam term {:?} already listed", term);
            }
        }
        None => serve(config).await?,
    }

    Ok(())
}
