//! CLI administration tool for linkbio.
//!
//! Manages users and login sessions, inspects link lists and performs
//! database checks without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a user (prompts for missing values)
//! cargo run --bin admin -- user create --username alice
//!
//! # Issue a session token for a user
//! cargo run --bin admin -- session create alice --days 7
//!
//! # Show a user's links in display order
//! cargo run --bin admin -- links alice
//!
//! # Revoke a session
//! cargo run --bin admin -- session revoke 12
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `SESSION_SIGNING_SECRET` (required for `session` commands): must match the server

use linkbio::application::services::AuthService;
use linkbio::application::services::auth_service::DEFAULT_SESSION_TTL_DAYS;
use linkbio::domain::repositories::LinkRepository;
use linkbio::infrastructure::persistence::{
    PgLinkRepository, PgSessionRepository, PgUserRepository,
};

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

type AdminAuthService = AuthService<PgSessionRepository, PgUserRepository>;

/// CLI tool for managing linkbio.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage login sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Show a user's links in display order
    Links {
        /// Username (case-insensitive)
        username: String,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        #[arg(short, long)]
        username: Option<String>,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List all users
    List,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Issue a session token for a user
    Create {
        username: String,

        /// Session lifetime in days
        #[arg(short, long, default_value_t = DEFAULT_SESSION_TTL_DAYS)]
        days: i64,
    },

    /// List a user's sessions
    List { username: String },

    /// Revoke a session by id
    Revoke {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Session { action } => handle_session_action(action, &pool).await?,
        Commands::Links { username } => show_links(&pool, &username).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn auth_service(pool: &PgPool, signing_secret: String) -> AdminAuthService {
    let pool = Arc::new(pool.clone());

    AuthService::new(
        Arc::new(PgSessionRepository::new(pool.clone())),
        Arc::new(PgUserRepository::new(pool)),
        signing_secret,
    )
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    // User commands never hash tokens, so the secret is optional here.
    let auth = auth_service(
        pool,
        std::env::var("SESSION_SIGNING_SECRET").unwrap_or_default(),
    );

    match action {
        UserAction::Create { username, name } => create_user(&auth, username, name).await,
        UserAction::List => list_users(&auth).await,
    }
}

/// Creates a user, prompting for any value not given on the command line.
async fn create_user(
    auth: &AdminAuthService,
    username: Option<String>,
    name: Option<String>,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Display name")
            .allow_empty(true)
            .interact_text()?,
    };

    let user = auth
        .create_user(&username, &name)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!("{}", "✅ User created".green().bold());
    println!("  ID:       {}", user.id.bright_black());
    println!("  Username: {}", user.display_username.cyan());
    println!();

    Ok(())
}

async fn list_users(auth: &AdminAuthService) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let users = auth
        .list_users()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        return Ok(());
    }

    println!(
        "  {:<22} {:<31} {:<20}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for user in &users {
        println!(
            "  {:<22} {:<31} {}",
            user.id.bright_black(),
            user.display_username.cyan(),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn handle_session_action(action: SessionAction, pool: &PgPool) -> Result<()> {
    let secret = std::env::var("SESSION_SIGNING_SECRET")
        .context("SESSION_SIGNING_SECRET must be set")?;
    let auth = auth_service(pool, secret);

    match action {
        SessionAction::Create { username, days } => create_session(&auth, &username, days).await,
        SessionAction::List { username } => list_sessions(&auth, &username).await,
        SessionAction::Revoke { id, yes } => revoke_session(&auth, id, yes).await,
    }
}

/// Issues a session and prints the raw token once.
///
/// Only the HMAC of the token is stored, so it cannot be shown again.
async fn create_session(auth: &AdminAuthService, username: &str, days: i64) -> Result<()> {
    if days <= 0 {
        anyhow::bail!("--days must be positive");
    }

    let user = auth
        .find_user(username)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let (token, session) = auth
        .issue_session(&user.id, Duration::days(days))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to issue session: {}", e))?;

    println!("{}", "🔑 Session issued".bright_blue().bold());
    println!();
    println!("  User:    {}", user.display_username.cyan());
    println!("  ID:      {}", session.id.to_string().bright_black());
    println!(
        "  Expires: {}",
        session.expires_at.format("%Y-%m-%d %H:%M").to_string()
    );
    println!("  Token:   {}", token.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/links",
        token.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_sessions(auth: &AdminAuthService, username: &str) -> Result<()> {
    let user = auth
        .find_user(username)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let sessions = auth
        .list_sessions(&user.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list sessions: {}", e))?;

    println!(
        "{} {}",
        "📋 Sessions of".bright_blue().bold(),
        user.display_username.cyan()
    );
    println!();

    if sessions.is_empty() {
        println!("{}", "  No sessions found".yellow());
        return Ok(());
    }

    let now = Utc::now();
    for session in &sessions {
        let status = if session.revoked_at.is_some() {
            "REVOKED".red()
        } else if session.is_active_at(now) {
            "ACTIVE".green()
        } else {
            "EXPIRED".yellow()
        };

        println!(
            "  {:<6} created {}  expires {}  {}",
            session.id.to_string().bright_black(),
            session.created_at.format("%Y-%m-%d %H:%M"),
            session.expires_at.format("%Y-%m-%d %H:%M"),
            status
        );
    }
    println!();

    Ok(())
}

async fn revoke_session(auth: &AdminAuthService, id: i64, skip_confirm: bool) -> Result<()> {
    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Revoke session {id}?"))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let revoked = auth
        .revoke_session(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke session: {}", e))?;

    if revoked {
        println!("{}", "✅ Session revoked".green().bold());
    } else {
        println!("{}", "⚠️  Session not found or already revoked".yellow());
    }

    Ok(())
}

/// Prints a user's links with positions, state and click totals.
async fn show_links(pool: &PgPool, username: &str) -> Result<()> {
    let user = auth_service(pool, String::new())
        .find_user(username)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let links = PgLinkRepository::new(Arc::new(pool.clone()));

    let list = links
        .list_by_user(&user.id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!(
        "{} {}",
        "🔗 Links of".bright_blue().bold(),
        user.display_username.cyan()
    );
    println!();

    if list.is_empty() {
        println!("{}", "  No links".yellow());
        return Ok(());
    }

    for link in &list {
        let state = if link.is_active {
            "active".green()
        } else {
            "hidden".bright_black()
        };

        println!(
            "  {:>3}  {:<30} {:<8} {:>8} clicks  {}",
            link.position.to_string().bright_white().bold(),
            link.title.cyan(),
            state,
            link.total_clicks,
            link.url.bright_black()
        );
    }
    println!();

    Ok(())
}

/// Displays totals for users, links, clicks and active sessions.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(total_clicks), 0)::BIGINT FROM links")
            .fetch_one(pool)
            .await?;

    let sessions_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sessions WHERE revoked_at IS NULL AND expires_at > NOW()",
    )
    .fetch_one(pool)
    .await?;

    println!(
        "  Users:           {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Links:           {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:          {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!(
        "  Active sessions: {}",
        sessions_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
