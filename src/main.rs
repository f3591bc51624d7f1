use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use yatube_api::{
    app,
    config::Config,
    connect,
    groups::{models::CreateGroup, utils::create_group, utils::slugify},
    users::{models::CreateUser, utils::create_user},
    AppState,
};

#[derive(Parser)]
#[command(name = "yatube-api")]
#[command(version, about = "REST API for users, groups, posts and comments")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run migrations and start the HTTP server (default)
    Serve,

    /// Create a user account
    CreateUser {
        username: String,
        #[arg(long, env = "YATUBE_PASSWORD")]
        password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },

    /// Create a group; the slug is derived from the title unless given
    CreateGroup {
        title: String,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yatube_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("read configuration from environment")?;

    let db = connect(&config).await.context("db connection")?;

    Migrator::up(&db, None).await.context("run migrations")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let addr: SocketAddr = format!("{}:{}", config.host, config.port)
                .parse()
                .context("parse listen address")?;

            let app = app(AppState { db });

            tracing::info!("listening on {}", addr);

            axum::Server::bind(&addr)
                .serve(app.into_make_service())
                .with_graceful_shutdown(shutdown_signal())
                .await
                .context("start server")?;
        }
        Commands::CreateUser {
            username,
            password,
            first_name,
            last_name,
        } => {
            let user = create_user(
                &db,
                CreateUser {
                    username,
                    password,
                    first_name,
                    last_name,
                },
            )
            .await
            .map_err(|e| anyhow::anyhow!("{e}"))?;

            println!("created user '{}' with id {}", user.username, user.id);
        }
        Commands::CreateGroup {
            title,
            slug,
            description,
        } => {
            let slug = slug.unwrap_or_else(|| slugify(&title));

            let group = create_group(
                &db,
                CreateGroup {
                    title,
                    slug,
                    description,
                },
            )
            .await
            .map_err(|e| anyhow::anyhow!("{e}"))?;

            println!("created group '{}' with id {}", group.slug, group.id);
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
    tracing::info!("shutting down");
}
